/// XGL ICD - driver-wide state: device and object registries, logger
///
/// API handles are slotmap keys into registries held in thread-safe static
/// storage, so a stale handle is rejected instead of aliasing a newer object.

use std::sync::{Arc, OnceLock, RwLock};
use std::time::SystemTime;
use slotmap::{new_key_type, SlotMap};

use crate::dev::{Device, DeviceConfig};
use crate::error::{Error, Result};
use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
use crate::shader::Shader;

new_key_type! {
    /// Opaque device handle
    pub struct DeviceHandle;

    /// Opaque shader handle
    pub struct ShaderHandle;
}

// ===== INTERNAL STATE =====

/// Global driver state storage
static ICD_STATE: OnceLock<IcdState> = OnceLock::new();

/// Global logger (initialized from `XGL_LOG`)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

struct ShaderEntry {
    device: DeviceHandle,
    shader: Arc<Shader>,
}

struct IcdState {
    devices: RwLock<SlotMap<DeviceHandle, Arc<Device>>>,
    shaders: RwLock<SlotMap<ShaderHandle, ShaderEntry>>,
}

impl IcdState {
    fn new() -> Self {
        Self {
            devices: RwLock::new(SlotMap::with_key()),
            shaders: RwLock::new(SlotMap::with_key()),
        }
    }
}

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::from_env())))
}

// ===== PUBLIC API =====

/// Driver singleton
///
/// # Example
///
/// ```no_run
/// use xgl_icd::xgl::{Icd, DeviceConfig};
///
/// Icd::initialize()?;
/// let device = Icd::create_device(DeviceConfig::default())?;
/// // ... create shaders through xgl_icd::xgl::api ...
/// Icd::destroy_device(device)?;
/// Icd::shutdown();
/// # Ok::<(), xgl_icd::xgl::Error>(())
/// ```
pub struct Icd;

impl Icd {
    /// Log an error before returning it
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::InitializationFailed(msg) => {
                crate::icd_error!("xgl::Icd", "Initialization failed: {}", msg);
            }
            Error::InvalidHandle(msg) => {
                crate::icd_error!("xgl::Icd", "Invalid handle: {}", msg);
            }
            _ => {
                crate::icd_error!("xgl::Icd", "ICD error: {}", error);
            }
        }
        error
    }

    fn state() -> Result<&'static IcdState> {
        ICD_STATE.get().ok_or_else(|| {
            Self::log_and_return_error(Error::InitializationFailed(
                "ICD not initialized. Call Icd::initialize() first.".to_string(),
            ))
        })
    }

    fn poisoned(what: &str) -> Error {
        Self::log_and_return_error(Error::InitializationFailed(format!("{} lock poisoned", what)))
    }

    /// Initialize the driver (idempotent)
    pub fn initialize() -> Result<()> {
        ICD_STATE.get_or_init(IcdState::new);
        Ok(())
    }

    /// Destroy every shader, then every device
    ///
    /// The driver stays initialized; handles issued before the call become invalid.
    pub fn shutdown() {
        if let Some(state) = ICD_STATE.get() {
            // Shaders BEFORE devices (shaders were created from them)
            let shaders = state.shaders.write().map(|mut s| std::mem::take(&mut *s));
            let devices = state.devices.write().map(|mut d| std::mem::take(&mut *d));
            drop(shaders);
            drop(devices);
        }
    }

    // ===== DEVICES =====

    /// Create a device and return its handle
    ///
    /// # Errors
    ///
    /// - `InitializationFailed` if the driver is not initialized or the
    ///   configuration is invalid
    /// - `OutOfMemory` if the device object cannot be allocated
    pub fn create_device(config: DeviceConfig) -> Result<DeviceHandle> {
        let state = Self::state()?;
        let gpu_name = config.gpu_name.clone();
        let extensions = config.extensions;

        let device = Device::new(config).map_err(Self::log_and_return_error)?;

        let handle = state
            .devices
            .write()
            .map_err(|_| Self::poisoned("Device registry"))?
            .insert(Arc::new(device));

        crate::icd_info!(
            "xgl::Icd",
            "Created device {:?} on {} (extensions: {:?})",
            handle,
            gpu_name,
            extensions
        );
        Ok(handle)
    }

    /// Resolve a device handle
    pub fn device(handle: DeviceHandle) -> Result<Arc<Device>> {
        let state = Self::state()?;
        let devices = state.devices.read().map_err(|_| Self::poisoned("Device registry"))?;
        devices.get(handle).cloned().ok_or_else(|| {
            Self::log_and_return_error(Error::InvalidHandle(format!("unknown device {:?}", handle)))
        })
    }

    /// Destroy a device and every shader created from it
    pub fn destroy_device(handle: DeviceHandle) -> Result<()> {
        let state = Self::state()?;

        let device = state
            .devices
            .write()
            .map_err(|_| Self::poisoned("Device registry"))?
            .remove(handle)
            .ok_or_else(|| {
                Self::log_and_return_error(Error::InvalidHandle(format!("unknown device {:?}", handle)))
            })?;

        let mut orphans = Vec::new();
        {
            let mut shaders = state.shaders.write().map_err(|_| Self::poisoned("Shader registry"))?;
            let keys: Vec<ShaderHandle> = shaders
                .iter()
                .filter(|(_, entry)| entry.device == handle)
                .map(|(key, _)| key)
                .collect();
            for key in keys {
                if let Some(entry) = shaders.remove(key) {
                    orphans.push(entry.shader);
                }
            }
        }

        crate::icd_info!(
            "xgl::Icd",
            "Destroyed device {:?} ({} shaders released)",
            handle,
            orphans.len()
        );
        drop(orphans);
        drop(device);
        Ok(())
    }

    // ===== OBJECTS =====

    /// Publish a fully constructed shader and return its handle
    pub(crate) fn register_shader(device: DeviceHandle, shader: Shader) -> Result<ShaderHandle> {
        let state = Self::state()?;
        let mut shaders = state.shaders.write().map_err(|_| Self::poisoned("Shader registry"))?;
        Ok(shaders.insert(ShaderEntry {
            device,
            shader: Arc::new(shader),
        }))
    }

    /// Resolve a shader handle
    pub fn shader(handle: ShaderHandle) -> Result<Arc<Shader>> {
        let state = Self::state()?;
        let shaders = state.shaders.read().map_err(|_| Self::poisoned("Shader registry"))?;
        shaders.get(handle).map(|entry| Arc::clone(&entry.shader)).ok_or_else(|| {
            Self::log_and_return_error(Error::InvalidHandle(format!("unknown shader {:?}", handle)))
        })
    }

    /// Destroy an object
    ///
    /// The handle is invalid afterwards; destroying it again returns
    /// `InvalidHandle`. Teardown runs once the last outstanding reference
    /// returned by `Icd::shader` is dropped.
    pub fn destroy_object(handle: ShaderHandle) -> Result<()> {
        let state = Self::state()?;
        let entry = state
            .shaders
            .write()
            .map_err(|_| Self::poisoned("Shader registry"))?
            .remove(handle)
            .ok_or_else(|| {
                Self::log_and_return_error(Error::InvalidHandle(format!("unknown shader {:?}", handle)))
            })?;

        drop(entry);
        Ok(())
    }

    /// Number of live shader handles
    pub fn shader_count() -> usize {
        ICD_STATE
            .get()
            .and_then(|state| state.shaders.read().ok().map(|s| s.len()))
            .unwrap_or(0)
    }

    // ===== LOGGING API =====

    /// Replace the logger
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = self::logger();
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Restore the default logger
    pub fn reset_logger() {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(DefaultLogger::from_env());
        }
    }

    /// Log without file:line (used by the icd_* macros)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Log with file:line (used by icd_error!)
    pub fn log_detailed(severity: LogSeverity, source: &str, message: String, file: &'static str, line: u32) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "icd_tests.rs"]
mod tests;
