/// Device - capability flags, allocator and compiler bridge of one GPU device

use std::fmt;
use std::sync::Arc;
use bitflags::bitflags;

use crate::alloc::{SystemAllocator, TrackingAllocator};
use crate::error::{Error, Result};
use crate::obj::{BaseObject, DbgObjectType};
use crate::shader::ShaderCompiler;

bitflags! {
    /// Driver extensions enabled on a device
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DeviceExtensions: u32 {
        /// Accept GLSL source through `StructureType::IntelShaderCreateInfo`
        const COMPILE_GLSL = 1 << 0;
    }
}

/// Device configuration
#[derive(Clone)]
pub struct DeviceConfig {
    /// Extensions to enable
    pub extensions: DeviceExtensions,
    /// Keep a debug record (copied create info) on every object
    pub debug: bool,
    /// Name reported in logs
    pub gpu_name: String,
    /// Allocation callbacks
    pub allocator: Arc<dyn SystemAllocator>,
    /// Compiler bridge, required by `COMPILE_GLSL`
    pub compiler: Option<Arc<dyn ShaderCompiler>>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            extensions: DeviceExtensions::empty(),
            debug: cfg!(debug_assertions),
            gpu_name: "Intel GPU".to_string(),
            allocator: Arc::new(TrackingAllocator::new()),
            compiler: None,
        }
    }
}

impl fmt::Debug for DeviceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceConfig")
            .field("extensions", &self.extensions)
            .field("debug", &self.debug)
            .field("gpu_name", &self.gpu_name)
            .field("compiler", &self.compiler.is_some())
            .finish()
    }
}

/// A logical device
///
/// Capability flags are fixed at creation; shader creation only reads them.
pub struct Device {
    base: BaseObject,
    gpu_name: String,
    extensions: DeviceExtensions,
    debug: bool,
    allocator: Arc<dyn SystemAllocator>,
    compiler: Option<Arc<dyn ShaderCompiler>>,
}

impl Device {
    /// Create a device from its configuration
    ///
    /// # Errors
    ///
    /// - `InitializationFailed` if `COMPILE_GLSL` is requested without a compiler
    /// - `OutOfMemory` if the device object cannot be allocated
    pub fn new(config: DeviceConfig) -> Result<Self> {
        if config.extensions.contains(DeviceExtensions::COMPILE_GLSL) && config.compiler.is_none() {
            return Err(Error::InitializationFailed(
                "COMPILE_GLSL extension requires a shader compiler".to_string(),
            ));
        }

        let base = BaseObject::create(
            &config.allocator,
            config.debug,
            DbgObjectType::Device,
            std::mem::size_of::<Device>(),
            None,
        )?;

        Ok(Self {
            base,
            gpu_name: config.gpu_name,
            extensions: config.extensions,
            debug: config.debug,
            allocator: config.allocator,
            compiler: config.compiler,
        })
    }

    pub fn has_extension(&self, ext: DeviceExtensions) -> bool {
        self.extensions.contains(ext)
    }

    pub fn extensions(&self) -> DeviceExtensions {
        self.extensions
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    pub fn gpu_name(&self) -> &str {
        &self.gpu_name
    }

    pub fn allocator(&self) -> &Arc<dyn SystemAllocator> {
        &self.allocator
    }

    pub fn compiler(&self) -> Option<&Arc<dyn ShaderCompiler>> {
        self.compiler.as_ref()
    }

    pub fn base(&self) -> &BaseObject {
        &self.base
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("gpu_name", &self.gpu_name)
            .field("extensions", &self.extensions)
            .field("debug", &self.debug)
            .finish()
    }
}

#[cfg(test)]
#[path = "dev_tests.rs"]
mod tests;
