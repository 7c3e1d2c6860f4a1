//! Error and exit-code taxonomy.
//!
//! Three scopes: process-fatal (`Error`), record-level (`RecordError`,
//! counted in `StreamSummary` rather than propagated), and the exit code a
//! caller maps a terminal `Error`/stream outcome onto (`ExitCode`).

/// Process-fatal and stream-fatal errors. Every library-facing error in
/// this crate is one of these variants, never a bare `String` or
/// `Box<dyn std::error::Error>`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("vocabulary error: {0}")]
    VocabularyError(String),

    #[error("tokenization failed: {0}")]
    TokenizationFailed(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("pricing error: {0}")]
    PricingError(String),

    #[error("line {line} exceeds maximum length ({max} bytes)")]
    LineTooLong { line: u64, max: usize },

    #[error("quota exceeded at line {line}")]
    QuotaExceeded { line: u64 },

    #[error("record error at line {line}: {source}")]
    RecordFatal { line: u64, source: RecordError },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Record-level errors: each is logged with its line number and counted
/// in `lines_failed`; the record is skipped unless `fail_on_error` is
/// set, in which case it is promoted to `Error::RecordFatal`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RecordError {
    #[error("invalid JSON")]
    InvalidJson,

    #[error("missing or invalid field: {0}")]
    MissingField(String),

    #[error("tokenization failed: {0}")]
    TokenizationFailed(String),

    #[error("pricing lookup failed: {0}")]
    PricingLookup(String),
}

impl RecordError {
    /// Short, stable name used in the error-stream log line.
    pub fn name(&self) -> &'static str {
        match self {
            RecordError::InvalidJson => "invalid_json",
            RecordError::MissingField(_) => "missing_field",
            RecordError::TokenizationFailed(_) => "tokenization_failed",
            RecordError::PricingLookup(_) => "pricing_lookup_failed",
        }
    }
}

/// Reserved process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Ok = 0,
    Generic = 1,
    Usage = 2,
    Quota = 64,
    Partial = 65,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::UnknownEncoding(_) => ExitCode::Usage,
            Error::QuotaExceeded { .. } => ExitCode::Quota,
            Error::VocabularyError(_)
            | Error::TokenizationFailed(_)
            | Error::InvalidToken(_)
            | Error::PricingError(_)
            | Error::LineTooLong { .. }
            | Error::RecordFatal { .. }
            | Error::Io(_) => ExitCode::Generic,
        }
    }
}
