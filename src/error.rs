//! Crate error type
//!
//! Gameplay never fails; only configuration and persistence do.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplashError {
    #[error("invalid tuning value for `{field}`: {reason}")]
    InvalidTuning {
        field: &'static str,
        reason: String,
    },
    #[error("I/O error")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("JSON error")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, SplashError>;
