/// Mock compiler bridge for unit tests
///
/// Compiles anything containing `void main` unless told to fail, and counts
/// live programs so tests can check that every program gets destroyed.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::obj::BaseObject;
use crate::shader::glsl::{CompileGlsl, ShaderCompiler, ShaderProgram, ShaderStage};

pub struct MockProgram {
    pub stage: ShaderStage,
    pub source: String,
    live: Arc<AtomicUsize>,
}

impl ShaderProgram for MockProgram {
    fn stage(&self) -> ShaderStage {
        self.stage
    }

    fn entry_point(&self) -> &str {
        "main"
    }
}

impl Drop for MockProgram {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct MockCompiler {
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
    live: Arc<AtomicUsize>,
}

impl MockCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let compiler = Self::default();
        compiler.fail.store(true, Ordering::SeqCst);
        compiler
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn live_programs(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl ShaderCompiler for MockCompiler {
    fn create_program(&self, _shader: &BaseObject, source: &CompileGlsl<'_>) -> Option<Box<dyn ShaderProgram>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) || !source.source.contains("void main") {
            return None;
        }

        self.live.fetch_add(1, Ordering::SeqCst);
        Some(Box::new(MockProgram {
            stage: source.stage,
            source: source.source.to_string(),
            live: Arc::clone(&self.live),
        }))
    }
}
