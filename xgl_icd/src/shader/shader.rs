/// Shader objects and their creation

use crate::dev::{Device, DeviceExtensions};
use crate::error::Result;
use crate::obj::{BaseObject, DbgObjectType, DebugRecord};
use crate::shader::bil::{self, BilView};
use crate::shader::glsl::{self, CompileGlsl, ShaderStage};
use crate::shader::ir::Ir;

/// Create-info structure discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureType {
    /// Core shader create info, code is BIL
    ShaderCreateInfo,
    /// COMPILE_GLSL extension create info, code is a `CompileGlsl` block
    IntelShaderCreateInfo,
}

/// Descriptor for creating a shader
#[derive(Debug, Clone, Copy)]
pub struct ShaderCreateInfo<'a> {
    pub s_type: StructureType,
    pub code: &'a [u8],
    /// Creation flags, kept on the shader object
    pub flags: u32,
}

impl<'a> ShaderCreateInfo<'a> {
    /// Core create info for a BIL module
    pub fn bil(code: &'a [u8]) -> Self {
        Self {
            s_type: StructureType::ShaderCreateInfo,
            code,
            flags: 0,
        }
    }

    /// Extension create info for a `CompileGlsl` block
    pub fn glsl(code: &'a [u8]) -> Self {
        Self {
            s_type: StructureType::IntelShaderCreateInfo,
            code,
            flags: 0,
        }
    }
}

/// Where a shader's IR comes from, decided once per creation
#[derive(Debug, Clone, Copy)]
pub enum ShaderSource<'a> {
    Bil(BilView<'a>),
    Glsl(CompileGlsl<'a>),
}

impl<'a> ShaderSource<'a> {
    /// Pick the front-end for `info` on `device`
    ///
    /// GLSL is only taken when the device has `COMPILE_GLSL` and the create
    /// info carries the extension discriminator; everything else must be BIL.
    pub fn select(device: &Device, info: &ShaderCreateInfo<'a>) -> Result<Self> {
        if device.has_extension(DeviceExtensions::COMPILE_GLSL)
            && info.s_type == StructureType::IntelShaderCreateInfo
        {
            Ok(ShaderSource::Glsl(CompileGlsl::parse(info.code)?))
        } else {
            Ok(ShaderSource::Bil(bil::validate(info.code)?))
        }
    }
}

/// A shader object
///
/// Always owns an IR container. Dropping the shader destroys the compiled
/// program (if any), frees the IR container, then releases the object base.
#[derive(Debug)]
pub struct Shader {
    ir: Ir,
    base: BaseObject,
    flags: u32,
}

impl Shader {
    /// Create a shader object
    ///
    /// On any failure everything allocated so far is released before the
    /// error is returned.
    ///
    /// # Errors
    ///
    /// - `OutOfMemory` if the object base, IR container or kernel buffer
    ///   cannot be allocated
    /// - `InvalidMemorySize` if BIL code is shorter than its header
    /// - `BadShaderCode` if the BIL magic is wrong or GLSL fails to compile
    pub fn create(device: &Device, info: &ShaderCreateInfo<'_>) -> Result<Self> {
        let base = BaseObject::create(
            device.allocator(),
            device.debug_enabled(),
            DbgObjectType::Shader,
            std::mem::size_of::<Shader>(),
            Some(info.code),
        )?;

        let source = ShaderSource::select(device, info).map_err(|e| {
            crate::icd_warn!("xgl::Shader", "Rejected shader code ({} bytes): {}", info.code.len(), e);
            e
        })?;

        let ir = match source {
            ShaderSource::Bil(view) => bil::translate(device, &view)?,
            ShaderSource::Glsl(request) => glsl::compile(device, &base, &request)?,
        };

        crate::icd_debug!(
            "xgl::Shader",
            "Created shader on {} ({} bytes of IR, flags {:#x})",
            device.gpu_name(),
            ir.size(),
            info.flags
        );

        Ok(Self {
            ir,
            base,
            flags: info.flags,
        })
    }

    pub fn ir(&self) -> &Ir {
        &self.ir
    }

    /// Flags from the create info
    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub fn object_type(&self) -> DbgObjectType {
        self.base.object_type()
    }

    pub fn debug_record(&self) -> Option<&DebugRecord> {
        self.base.debug_record()
    }

    /// Stage of the compiled program, `None` for BIL shaders
    pub fn stage(&self) -> Option<ShaderStage> {
        self.ir.program().map(|p| p.stage())
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        crate::icd_trace!("xgl::Shader", "Destroying shader ({} bytes of IR)", self.ir.size());
    }
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
