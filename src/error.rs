//! Application error type.
//!
//! Remote failures never reach this type: the fetch client absorbs them and
//! reports "no data" instead. What is left are the conditions that should stop
//! a run and tell the operator what to do, each tagged with a process exit code.

/// Invalid invocation or configuration.
pub const EXIT_USAGE: u8 = 2;
/// A required local input (the roster snapshot) is missing or unreadable.
pub const EXIT_MISSING_INPUT: u8 = 3;
/// Writing a snapshot or output file failed.
pub const EXIT_IO: u8 = 4;
/// The process could not set itself up (HTTP client, interrupt handler).
pub const EXIT_RUNTIME: u8 = 5;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, message)
    }

    pub fn missing_input(message: impl Into<String>) -> Self {
        Self::new(EXIT_MISSING_INPUT, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(EXIT_IO, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(EXIT_RUNTIME, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
