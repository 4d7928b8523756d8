//! Unit tests for dev.rs

use crate::alloc::{SystemAllocType, TrackingAllocator};
use crate::dev::{Device, DeviceConfig, DeviceExtensions};
use crate::error::Error;
use crate::obj::DbgObjectType;
use crate::shader::mock_compiler::MockCompiler;
use std::sync::Arc;

#[test]
fn test_default_config() {
    let config = DeviceConfig::default();
    assert!(config.extensions.is_empty());
    assert!(config.compiler.is_none());
    assert_eq!(config.debug, cfg!(debug_assertions));
}

#[test]
fn test_config_debug_format_hides_collaborators() {
    let debug = format!("{:?}", DeviceConfig::default());
    assert!(debug.contains("DeviceConfig"));
    assert!(debug.contains("compiler: false"));
}

#[test]
fn test_device_without_extensions() {
    let device = Device::new(DeviceConfig::default()).unwrap();
    assert!(!device.has_extension(DeviceExtensions::COMPILE_GLSL));
    assert!(device.compiler().is_none());
    assert_eq!(device.gpu_name(), "Intel GPU");
    assert_eq!(device.base().object_type(), DbgObjectType::Device);
}

#[test]
fn test_device_with_glsl_extension() {
    let device = Device::new(DeviceConfig {
        extensions: DeviceExtensions::COMPILE_GLSL,
        compiler: Some(Arc::new(MockCompiler::new())),
        ..DeviceConfig::default()
    })
    .unwrap();

    assert!(device.has_extension(DeviceExtensions::COMPILE_GLSL));
    assert_eq!(device.extensions(), DeviceExtensions::COMPILE_GLSL);
    assert!(device.compiler().is_some());
}

#[test]
fn test_glsl_extension_requires_compiler() {
    let result = Device::new(DeviceConfig {
        extensions: DeviceExtensions::COMPILE_GLSL,
        ..DeviceConfig::default()
    });
    assert!(matches!(result, Err(Error::InitializationFailed(_))));
}

#[test]
fn test_device_object_accounted() {
    let tracker = Arc::new(TrackingAllocator::new());
    let device = Device::new(DeviceConfig {
        allocator: tracker.clone(),
        ..DeviceConfig::default()
    })
    .unwrap();
    assert_eq!(tracker.live_count_of(SystemAllocType::ApiObject), 1);

    drop(device);
    assert_eq!(tracker.live_count(), 0);
}

#[test]
fn test_device_out_of_memory() {
    let tracker = Arc::new(TrackingAllocator::new());
    tracker.fail_nth(0);
    let result = Device::new(DeviceConfig {
        allocator: tracker.clone(),
        ..DeviceConfig::default()
    });
    assert_eq!(result.unwrap_err(), Error::OutOfMemory);
}
