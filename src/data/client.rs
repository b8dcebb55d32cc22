//! Resilient fetch client.
//!
//! Every remote read in the crate goes through [`FetchClient::fetch`], which
//! retries a bounded number of times and converts any remaining failure into
//! `None`. Callers treat `None` as "no data for this call", never as fatal.
//!
//! The transport and the clock are injected so tests can script responses and
//! observe pauses without real network traffic or real sleeping.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::AppError;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const STATUS_OK: u16 = 200;
const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Raw HTTP reply as seen by the retry loop.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// A request that never produced a status line (connect, timeout, read errors).
#[derive(Debug, Clone)]
pub struct TransportError(pub String);

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One blocking GET.
pub trait Transport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<RawResponse, TransportError>;
}

/// Source of pauses. The real clock sleeps the thread.
pub trait Clock {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Bounded retry schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per call, rate-limited ones included.
    pub max_attempts: u32,
    /// Pause after an HTTP 429.
    pub rate_limit_cooldown: Duration,
    /// Pause after any other non-OK status.
    pub status_cooldown: Duration,
    /// Pause after a transport failure or an unparseable body.
    pub transport_cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            rate_limit_cooldown: Duration::from_secs(30),
            status_cooldown: Duration::from_secs(2),
            transport_cooldown: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }
}

/// Outcome of a single attempt, before the policy decides what to do next.
enum Attempt {
    Done(Value),
    RateLimited,
    BadStatus(u16),
    Failed(String),
}

pub struct FetchClient<T, C> {
    transport: T,
    clock: C,
    base_url: String,
    policy: RetryPolicy,
}

impl<T: Transport, C: Clock> FetchClient<T, C> {
    pub fn new(transport: T, clock: C, base_url: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            clock,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Pause on the client's clock. Pipelines use this for their pacing delays.
    pub fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            self.clock.sleep(duration);
        }
    }

    /// Full URL for an endpoint path relative to the API root.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// GET `endpoint` and parse the body as JSON.
    ///
    /// Returns `None` once every attempt has failed.
    pub fn fetch(&self, endpoint: &str, query: &[(&str, String)]) -> Option<Value> {
        let url = self.url(endpoint);
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let cooldown = match self.attempt(&url, query) {
                Attempt::Done(value) => return Some(value),
                Attempt::RateLimited => {
                    warn!(
                        url = %url,
                        attempt,
                        wait_secs = self.policy.rate_limit_cooldown.as_secs_f64(),
                        "Rate limited"
                    );
                    self.policy.rate_limit_cooldown
                }
                Attempt::BadStatus(status) => {
                    warn!(url = %url, attempt, status, "API returned non-OK status");
                    self.policy.status_cooldown
                }
                Attempt::Failed(error) => {
                    warn!(url = %url, attempt, error = %error, "Request failed");
                    self.policy.transport_cooldown
                }
            };

            if attempt < max_attempts {
                self.clock.sleep(cooldown);
            }
        }

        debug!(url = %url, max_attempts, "Giving up on request");
        None
    }

    fn attempt(&self, url: &str, query: &[(&str, String)]) -> Attempt {
        match self.transport.get(url, query) {
            Ok(resp) if resp.status == STATUS_OK => match serde_json::from_str(&resp.body) {
                Ok(value) => Attempt::Done(value),
                Err(e) => Attempt::Failed(format!("invalid JSON body: {e}")),
            },
            Ok(resp) if resp.status == STATUS_TOO_MANY_REQUESTS => Attempt::RateLimited,
            Ok(resp) => Attempt::BadStatus(resp.status),
            Err(e) => Attempt::Failed(e.0),
        }
    }
}

/// `reqwest` blocking transport with the session headers the API expects.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-GB,en;q=0.9"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(settings.http_timeout)
            .build()
            .map_err(client_build_error)?;

        Ok(Self { client })
    }
}

/// A client that cannot be built points at the TLS backend or the host, not
/// at how the tool was invoked.
fn client_build_error(err: impl std::fmt::Display) -> AppError {
    AppError::runtime(format!("Failed to build HTTP client: {err}"))
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<RawResponse, TransportError> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|e| TransportError(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp.text().map_err(|e| TransportError(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted transport and recording clock shared by unit tests.

    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    #[derive(Default)]
    pub struct ScriptedTransport {
        replies: RefCell<VecDeque<Result<RawResponse, TransportError>>>,
        pub requests: RefCell<Vec<(String, Vec<(String, String)>)>>,
    }

    impl ScriptedTransport {
        pub fn push_status(&self, status: u16, body: &str) {
            self.replies.borrow_mut().push_back(Ok(RawResponse {
                status,
                body: body.to_string(),
            }));
        }

        pub fn push_json(&self, body: serde_json::Value) {
            self.push_status(200, &body.to_string());
        }

        pub fn push_error(&self, message: &str) {
            self.replies
                .borrow_mut()
                .push_back(Err(TransportError(message.to_string())));
        }
    }

    impl Transport for ScriptedTransport {
        fn get(&self, url: &str, query: &[(&str, String)]) -> Result<RawResponse, TransportError> {
            self.requests.borrow_mut().push((
                url.to_string(),
                query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            ));
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError("script exhausted".into())))
        }
    }

    #[derive(Default)]
    pub struct RecordingClock {
        pub sleeps: RefCell<Vec<Duration>>,
    }

    impl Clock for RecordingClock {
        fn sleep(&self, duration: Duration) {
            self.sleeps.borrow_mut().push(duration);
        }
    }

    pub fn client() -> FetchClient<ScriptedTransport, RecordingClock> {
        FetchClient::new(
            ScriptedTransport::default(),
            RecordingClock::default(),
            "https://api.test/api/",
            RetryPolicy::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::testing::client;
    use super::*;

    #[test]
    fn success_returns_parsed_body_without_pausing() {
        let client = client();
        client.transport().push_json(json!({"items": []}));

        let value = client.fetch("/Members/Search", &[("skip", "0".to_string())]);

        assert_eq!(value, Some(json!({"items": []})));
        assert!(client.clock().sleeps.borrow().is_empty());
        let requests = client.transport().requests.borrow();
        assert_eq!(requests[0].0, "https://api.test/api/Members/Search");
        assert_eq!(requests[0].1, vec![("skip".to_string(), "0".to_string())]);
    }

    #[test]
    fn two_rate_limits_then_success_uses_long_cooldown_twice() {
        let client = client();
        client.transport().push_status(429, "");
        client.transport().push_status(429, "");
        client.transport().push_json(json!({"value": 1}));

        assert_eq!(client.fetch("Members/1", &[]), Some(json!({"value": 1})));
        assert_eq!(
            *client.clock().sleeps.borrow(),
            vec![Duration::from_secs(30), Duration::from_secs(30)]
        );
    }

    #[test]
    fn exhausted_attempts_return_none() {
        let client = client();
        client.transport().push_status(500, "oops");
        client.transport().push_error("connection reset");
        client.transport().push_status(503, "");

        assert_eq!(client.fetch("Members/1", &[]), None);
        assert_eq!(client.transport().requests.borrow().len(), 3);
        // No pause after the final attempt.
        assert_eq!(
            *client.clock().sleeps.borrow(),
            vec![Duration::from_secs(2), Duration::from_secs(3)]
        );
    }

    #[test]
    fn rate_limits_count_toward_the_attempt_budget() {
        let client = client();
        for _ in 0..3 {
            client.transport().push_status(429, "");
        }
        client.transport().push_json(json!({}));

        assert_eq!(client.fetch("Members/1", &[]), None);
        assert_eq!(client.transport().requests.borrow().len(), 3);
    }

    #[test]
    fn unparseable_body_is_retried_like_a_transport_failure() {
        let client = client();
        client.transport().push_status(200, "<html>maintenance</html>");
        client.transport().push_json(json!({"ok": true}));

        assert_eq!(client.fetch("Members/1", &[]), Some(json!({"ok": true})));
        assert_eq!(*client.clock().sleeps.borrow(), vec![Duration::from_secs(3)]);
    }

    #[test]
    fn single_attempt_policy_never_pauses() {
        let client = FetchClient::new(
            super::testing::ScriptedTransport::default(),
            super::testing::RecordingClock::default(),
            "https://api.test/api",
            RetryPolicy::default().with_max_attempts(1),
        );
        client.transport().push_status(429, "");

        assert_eq!(client.fetch("Members/1", &[]), None);
        assert!(client.clock().sleeps.borrow().is_empty());
    }

    #[test]
    fn client_build_failure_is_a_runtime_error() {
        let err = client_build_error("no TLS backend");
        assert_eq!(err.exit_code(), crate::error::EXIT_RUNTIME);
        assert_ne!(err.exit_code(), crate::error::EXIT_USAGE);
        assert!(err.message().contains("no TLS backend"));
    }

    #[test]
    fn default_settings_build_an_http_transport() {
        assert!(HttpTransport::new(&Settings::default()).is_ok());
    }
}
