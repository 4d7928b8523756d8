//! Error types for the XGL ICD
//!
//! This module defines the error types returned by every driver entry point,
//! along with the `ResultCode` taxonomy exposed to API callers.

use std::fmt;

/// Result type for driver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Driver errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A system allocation (object base, IR container, kernel buffer) failed
    OutOfMemory,

    /// Shader byte code is smaller than its own header
    InvalidMemorySize,

    /// Shader byte code is not valid BIL, or source compilation failed
    BadShaderCode,

    /// Unknown or already destroyed handle
    InvalidHandle(String),

    /// Driver or device initialization failed
    InitializationFailed(String),
}

impl Error {
    /// Result code reported to API callers for this error
    pub fn result_code(&self) -> ResultCode {
        match self {
            Error::OutOfMemory => ResultCode::ErrorOutOfMemory,
            Error::InvalidMemorySize => ResultCode::ErrorInvalidMemorySize,
            Error::BadShaderCode => ResultCode::ErrorBadShaderCode,
            Error::InvalidHandle(_) => ResultCode::ErrorInvalidHandle,
            Error::InitializationFailed(_) => ResultCode::ErrorInitializationFailed,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfMemory => write!(f, "Out of memory"),
            Error::InvalidMemorySize => write!(f, "Invalid memory size"),
            Error::BadShaderCode => write!(f, "Bad shader code"),
            Error::InvalidHandle(msg) => write!(f, "Invalid handle: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Result codes returned through the `(handle, code)` form of the entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    Success,
    ErrorOutOfMemory,
    ErrorInvalidMemorySize,
    ErrorBadShaderCode,
    ErrorInvalidHandle,
    ErrorInitializationFailed,
}

impl ResultCode {
    /// Whether this code reports success
    pub fn is_success(self) -> bool {
        self == ResultCode::Success
    }
}

impl<T> From<&Result<T>> for ResultCode {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => ResultCode::Success,
            Err(e) => e.result_code(),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
