/*!
# XGL ICD - naga GLSL compiler backend

Implements `ShaderCompiler` for the `COMPILE_GLSL` extension of `xgl_icd`
with naga's GLSL front-end and module validator.

```no_run
use std::sync::Arc;
use xgl_icd::xgl::{DeviceConfig, DeviceExtensions, Icd};
use xgl_icd_compiler_naga::NagaCompiler;

Icd::initialize()?;
let device = Icd::create_device(DeviceConfig {
    extensions: DeviceExtensions::COMPILE_GLSL,
    compiler: Some(Arc::new(NagaCompiler::new())),
    ..DeviceConfig::default()
})?;
# Ok::<(), xgl_icd::xgl::Error>(())
```
*/

mod naga_compiler;
mod naga_program;

pub use naga_compiler::{CompileStats, NagaCompiler, NagaCompilerConfig};
pub use naga_program::NagaProgram;
