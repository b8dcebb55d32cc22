//! Runtime settings.
//!
//! Values come from the environment (optionally seeded from a `.env` file);
//! command-line flags may override some of them afterwards.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::ChamberProfile;
use crate::error::AppError;

pub const DEFAULT_API_BASE_URL: &str = "https://members-api.parliament.uk/api";
pub const DEFAULT_SITE_URL: &str = "https://members.parliament.uk";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Root of the members API, without a trailing slash.
    pub api_base_url: String,
    /// Public site that hosts the human-facing contact pages.
    pub site_url: String,
    pub http_timeout: Duration,
    /// Directory holding snapshot and output files.
    pub data_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            data_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut settings = Self::default();

        if let Some(url) = non_blank(lookup("MEMBERS_API_BASE_URL")) {
            settings.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = non_blank(lookup("MEMBERS_SITE_URL")) {
            settings.site_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = non_blank(lookup("MEMBERS_HTTP_TIMEOUT_SECS")) {
            let secs: u64 = raw.parse().map_err(|_| {
                AppError::usage(format!(
                    "MEMBERS_HTTP_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'."
                ))
            })?;
            if secs == 0 {
                return Err(AppError::usage("MEMBERS_HTTP_TIMEOUT_SECS must be > 0."));
            }
            settings.http_timeout = Duration::from_secs(secs);
        }
        if let Some(dir) = non_blank(lookup("MEMBERS_DATA_DIR")) {
            settings.data_dir = PathBuf::from(dir);
        }

        Ok(settings)
    }

    pub fn snapshot_path(&self, profile: &ChamberProfile) -> PathBuf {
        self.data_dir.join(profile.snapshot_file)
    }

    pub fn output_path(&self, profile: &ChamberProfile) -> PathBuf {
        self.data_dir.join(profile.output_file)
    }

    /// Public contact page for one member.
    pub fn contact_url(&self, member_id: &str) -> String {
        format!("{}/member/{member_id}/contact", self.site_url)
    }

    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.data_dir = dir.to_path_buf();
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
