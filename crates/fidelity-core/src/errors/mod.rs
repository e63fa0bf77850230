//! Error handling for the fidelity engine.
//! One error enum per subsystem, `thiserror` only. Binaries may wrap these
//! in `anyhow` for context, the libraries never do.

pub mod config_error;
pub mod error_code;
pub mod fidelity_error;
pub mod input_error;
pub mod oracle_error;

pub use config_error::ConfigError;
pub use error_code::FidelityErrorCode;
pub use fidelity_error::{FidelityError, FidelityResult};
pub use input_error::InputError;
pub use oracle_error::OracleError;
