/// Shader module - shader objects and their two front-ends (BIL, GLSL)

pub mod bil;
pub mod glsl;
pub mod ir;
pub mod shader;

pub use bil::{BilHeader, BilView, BIL_HEADER_SIZE, BIL_MAGIC, BIL_VERSION};
pub use glsl::{CompileGlsl, ShaderCompiler, ShaderProgram, ShaderStage, COMPILE_GLSL_HEADER_SIZE};
pub use ir::Ir;
pub use shader::*;

// Scripted compiler for tests (no real GLSL front-end required)
#[cfg(test)]
pub mod mock_compiler;
