/// NagaProgram - a validated naga module, implementation of ShaderProgram

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use xgl_icd::xgl::shader::{ShaderProgram, ShaderStage};

/// Program compiled by `NagaCompiler`
pub struct NagaProgram {
    pub(crate) module: naga::Module,
    pub(crate) info: naga::valid::ModuleInfo,
    pub(crate) stage: ShaderStage,
    pub(crate) entry_point: String,
    /// Live-program counter of the owning compiler
    pub(crate) live: Arc<AtomicUsize>,
}

impl NagaProgram {
    pub fn module(&self) -> &naga::Module {
        &self.module
    }

    pub fn info(&self) -> &naga::valid::ModuleInfo {
        &self.info
    }
}

impl ShaderProgram for NagaProgram {
    fn stage(&self) -> ShaderStage {
        self.stage
    }

    fn entry_point(&self) -> &str {
        &self.entry_point
    }
}

impl Drop for NagaProgram {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::Relaxed);
    }
}
