//! Error types for clash-core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid round duration: {0} seconds")]
    InvalidDuration(f32),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
