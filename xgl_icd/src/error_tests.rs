//! Unit tests for error.rs
//!
//! Tests all Error variants, their Display output and the ResultCode mapping.

use crate::error::{Error, Result, ResultCode};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_out_of_memory_display() {
    let err = Error::OutOfMemory;
    assert_eq!(format!("{}", err), "Out of memory");
}

#[test]
fn test_invalid_memory_size_display() {
    let err = Error::InvalidMemorySize;
    assert_eq!(format!("{}", err), "Invalid memory size");
}

#[test]
fn test_bad_shader_code_display() {
    let err = Error::BadShaderCode;
    assert_eq!(format!("{}", err), "Bad shader code");
}

#[test]
fn test_invalid_handle_display() {
    let err = Error::InvalidHandle("shader already destroyed".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid handle"));
    assert!(display.contains("shader already destroyed"));
}

#[test]
fn test_initialization_failed_display() {
    let err = Error::InitializationFailed("ICD not initialized".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Initialization failed"));
    assert!(display.contains("ICD not initialized"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::BadShaderCode;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug = format!("{:?}", Error::InvalidHandle("x".to_string()));
    assert!(debug.contains("InvalidHandle"));
    assert_eq!(format!("{:?}", Error::OutOfMemory), "OutOfMemory");
}

#[test]
fn test_error_clone_eq() {
    let err = Error::InitializationFailed("no compiler".to_string());
    assert_eq!(err.clone(), err);
    assert_ne!(Error::OutOfMemory, Error::BadShaderCode);
}

// ============================================================================
// RESULT CODE TESTS
// ============================================================================

#[test]
fn test_result_code_mapping() {
    assert_eq!(Error::OutOfMemory.result_code(), ResultCode::ErrorOutOfMemory);
    assert_eq!(Error::InvalidMemorySize.result_code(), ResultCode::ErrorInvalidMemorySize);
    assert_eq!(Error::BadShaderCode.result_code(), ResultCode::ErrorBadShaderCode);
    assert_eq!(
        Error::InvalidHandle(String::new()).result_code(),
        ResultCode::ErrorInvalidHandle
    );
    assert_eq!(
        Error::InitializationFailed(String::new()).result_code(),
        ResultCode::ErrorInitializationFailed
    );
}

#[test]
fn test_result_code_from_result() {
    let ok: Result<u32> = Ok(7);
    let err: Result<u32> = Err(Error::BadShaderCode);

    assert_eq!(ResultCode::from(&ok), ResultCode::Success);
    assert!(ResultCode::from(&ok).is_success());
    assert_eq!(ResultCode::from(&err), ResultCode::ErrorBadShaderCode);
    assert!(!ResultCode::from(&err).is_success());
}
