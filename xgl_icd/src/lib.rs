/*!
# XGL ICD

Shader-object creation for the Intel XGL installable client driver.

A shader is created from a device handle and a create info whose code is
either a BIL module or, with the `COMPILE_GLSL` extension, GLSL source handed
to an external compiler. Either way the result is a shader object owning a
driver-internal IR container, ready for pipeline creation.

## Architecture

- **Icd**: driver singleton, device/shader registries and logger
- **Device**: capability flags, allocator, compiler bridge
- **Shader**: lifecycle manager, picks the BIL or GLSL front-end
- **bil**: header validation and BIL translation
- **glsl**: `ShaderCompiler` bridge for the GLSL extension
- **api**: entry points working on opaque handles

Compiler backends implement `ShaderCompiler` in their own crate.
*/

// Internal modules
mod error;
mod icd;
mod alloc;
mod dev;
mod obj;
pub mod log;
pub mod shader;
pub mod api;

// Main xgl namespace module
pub mod xgl {
    // Error types
    pub use crate::error::{Error, Result, ResultCode};

    // Driver singleton and handles
    pub use crate::icd::{Icd, DeviceHandle, ShaderHandle};

    // Devices and objects
    pub use crate::dev::{Device, DeviceConfig, DeviceExtensions};
    pub use crate::obj::{BaseObject, DbgObjectType, DebugRecord};

    // Allocation callbacks
    pub use crate::alloc::{Allocation, HeapBuffer, SystemAllocType, SystemAllocator, TrackingAllocator};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, format_entry, LOG_LEVEL_ENV};
    }

    // Shader sub-module
    pub mod shader {
        pub use crate::shader::*;
    }

    // Entry points
    pub mod api {
        pub use crate::api::*;
    }
}
