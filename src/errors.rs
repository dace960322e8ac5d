use std::error::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShellErrorType {
    ArchiveError,
    AuditError,
    SessionClosed,
    ConfigError,
    IOError,
}

#[derive(Debug)]
pub struct ShellError {
    pub error_type: ShellErrorType,
    pub message: String,
}

impl ShellError {
    pub fn new(error_type: ShellErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
        }
    }
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.error_type, self.message)
    }
}

impl From<std::io::Error> for ShellError {
    fn from(error: std::io::Error) -> Self {
        Self {
            error_type: ShellErrorType::IOError,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for ShellError {
    fn from(error: serde_json::Error) -> Self {
        Self {
            error_type: ShellErrorType::AuditError,
            message: error.to_string(),
        }
    }
}

impl Error for ShellError {}

pub type Result<T> = std::result::Result<T, ShellError>;
