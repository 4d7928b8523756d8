/// GLSL compiler bridge (COMPILE_GLSL extension)
///
/// With the extension enabled, `StructureType::IntelShaderCreateInfo` code is
/// a `CompileGlsl` block: `stage: u32 | flags: u32 | UTF-8 source`, integers
/// little-endian, source optionally NUL-terminated.

use crate::alloc::{icd_alloc, SystemAllocType};
use crate::dev::Device;
use crate::error::{Error, Result};
use crate::obj::BaseObject;
use crate::shader::ir::Ir;

/// Size of the fixed part of a `CompileGlsl` block
pub const COMPILE_GLSL_HEADER_SIZE: usize = 8;

/// Pipeline stage a shader is compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    TessControl,
    TessEvaluation,
    Geometry,
    Fragment,
    Compute,
}

impl ShaderStage {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(ShaderStage::Vertex),
            1 => Some(ShaderStage::TessControl),
            2 => Some(ShaderStage::TessEvaluation),
            3 => Some(ShaderStage::Geometry),
            4 => Some(ShaderStage::Fragment),
            5 => Some(ShaderStage::Compute),
            _ => None,
        }
    }

    pub fn to_raw(self) -> u32 {
        match self {
            ShaderStage::Vertex => 0,
            ShaderStage::TessControl => 1,
            ShaderStage::TessEvaluation => 2,
            ShaderStage::Geometry => 3,
            ShaderStage::Fragment => 4,
            ShaderStage::Compute => 5,
        }
    }
}

/// A GLSL compile request read from shader create info
#[derive(Debug, Clone, Copy)]
pub struct CompileGlsl<'a> {
    pub stage: ShaderStage,
    pub flags: u32,
    pub source: &'a str,
    code_size: usize,
}

impl<'a> CompileGlsl<'a> {
    /// Read a compile request from shader code
    ///
    /// # Errors
    ///
    /// `BadShaderCode` if the block is truncated, names an unknown stage, or
    /// the source is not UTF-8.
    pub fn parse(code: &'a [u8]) -> Result<Self> {
        if code.len() < COMPILE_GLSL_HEADER_SIZE {
            return Err(Error::BadShaderCode);
        }

        let (stage_bytes, rest) = code.split_at(4);
        let (flag_bytes, text) = rest.split_at(4);
        let stage_raw = u32::from_le_bytes([stage_bytes[0], stage_bytes[1], stage_bytes[2], stage_bytes[3]]);
        let flags = u32::from_le_bytes([flag_bytes[0], flag_bytes[1], flag_bytes[2], flag_bytes[3]]);

        let stage = ShaderStage::from_raw(stage_raw).ok_or(Error::BadShaderCode)?;

        let text = match text.iter().position(|&b| b == 0) {
            Some(nul) => &text[..nul],
            None => text,
        };
        let source = std::str::from_utf8(text).map_err(|_| Error::BadShaderCode)?;

        Ok(Self {
            stage,
            flags,
            source,
            code_size: code.len(),
        })
    }

    /// Build the code bytes of a compile request
    pub fn encode(stage: ShaderStage, flags: u32, source: &str) -> Vec<u8> {
        let mut code = Vec::with_capacity(COMPILE_GLSL_HEADER_SIZE + source.len() + 1);
        code.extend_from_slice(&stage.to_raw().to_le_bytes());
        code.extend_from_slice(&flags.to_le_bytes());
        code.extend_from_slice(source.as_bytes());
        code.push(0);
        code
    }

    /// Size of the code block this request was read from
    pub fn code_size(&self) -> usize {
        self.code_size
    }
}

/// A program produced by a `ShaderCompiler`
///
/// Dropping the program releases it in the compiler.
pub trait ShaderProgram: Send + Sync {
    fn stage(&self) -> ShaderStage;

    fn entry_point(&self) -> &str;
}

/// External high-level language compiler
pub trait ShaderCompiler: Send + Sync {
    /// Compile `source` for the shader whose base is `shader`
    ///
    /// Returns `None` when compilation fails.
    fn create_program(&self, shader: &BaseObject, source: &CompileGlsl<'_>) -> Option<Box<dyn ShaderProgram>>;
}

/// Compile a GLSL request into an IR container
///
/// The container is only handed back once the compiler produced a program.
///
/// # Errors
///
/// - `OutOfMemory` if the container cannot be allocated
/// - `BadShaderCode` if the device has no compiler or compilation fails
pub fn compile(device: &Device, shader: &BaseObject, source: &CompileGlsl<'_>) -> Result<Ir> {
    let compiler = device.compiler().ok_or(Error::BadShaderCode)?;

    let container = icd_alloc(
        device.allocator(),
        std::mem::size_of::<Ir>(),
        std::mem::align_of::<Ir>(),
        SystemAllocType::InternalShader,
    )
    .ok_or(Error::OutOfMemory)?;

    let program = compiler.create_program(shader, source).ok_or_else(|| {
        crate::icd_warn!("xgl::Glsl", "{:?} shader failed to compile", source.stage);
        Error::BadShaderCode
    })?;

    Ok(Ir::with_program(container, source.code_size(), program))
}

#[cfg(test)]
#[path = "glsl_tests.rs"]
mod tests;
