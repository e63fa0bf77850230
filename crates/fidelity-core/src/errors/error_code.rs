//! Stable machine-readable error codes for reports and the CLI.

/// Every error enum implements this to provide a structured error code
/// string that survives serialization into a report.
pub trait FidelityErrorCode {
    /// Returns the error code string (e.g., "MALFORMED_INPUT").
    fn error_code(&self) -> &'static str;

    /// Returns the tagged error string: `[ERROR_CODE] message`.
    fn tagged_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const MALFORMED_INPUT: &str = "MALFORMED_INPUT";
pub const SCORE_OUT_OF_SCALE: &str = "SCORE_OUT_OF_SCALE";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const ORACLE_TRANSIENT: &str = "ORACLE_TRANSIENT";
pub const ORACLE_PERMANENT: &str = "ORACLE_PERMANENT";
pub const ORACLE_UNAVAILABLE: &str = "ORACLE_UNAVAILABLE";
