/// NagaCompiler - GLSL to naga IR through naga's front-end and validator

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use xgl_icd::xgl::shader::{CompileGlsl, ShaderCompiler, ShaderProgram, ShaderStage};
use xgl_icd::xgl::BaseObject;
use xgl_icd::{icd_debug, icd_warn};

use crate::naga_program::NagaProgram;

/// Compiler configuration
#[derive(Debug, Clone)]
pub struct NagaCompilerConfig {
    /// Preprocessor defines passed to every compilation
    pub defines: Vec<(String, String)>,
    /// Run the naga validator on parsed modules
    pub validate: bool,
}

impl Default for NagaCompilerConfig {
    fn default() -> Self {
        Self {
            defines: Vec::new(),
            validate: true,
        }
    }
}

/// Compile statistics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileStats {
    pub compiled: u32,
    pub unsupported_stage: u32,
    pub parse_errors: u32,
    pub validation_errors: u32,
    /// Compilations that reclaimed a front-end poisoned by a panic
    pub frontend_recoveries: u32,
}

#[derive(Default)]
struct StatsTracker {
    compiled: AtomicU32,
    unsupported_stage: AtomicU32,
    parse_errors: AtomicU32,
    validation_errors: AtomicU32,
    frontend_recoveries: AtomicU32,
}

/// GLSL compiler backed by naga
///
/// naga's GLSL front-end only handles vertex, fragment and compute shaders;
/// other stages fail to compile. The request's `flags` word is reserved: it
/// is logged when non-zero and otherwise ignored.
pub struct NagaCompiler {
    config: NagaCompilerConfig,
    frontend: Mutex<naga::front::glsl::Frontend>,
    stats: StatsTracker,
    live: Arc<AtomicUsize>,
}

impl NagaCompiler {
    pub fn new() -> Self {
        Self::with_config(NagaCompilerConfig::default())
    }

    pub fn with_config(config: NagaCompilerConfig) -> Self {
        Self {
            config,
            frontend: Mutex::new(naga::front::glsl::Frontend::default()),
            stats: StatsTracker::default(),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of programs not yet destroyed
    pub fn live_programs(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> CompileStats {
        CompileStats {
            compiled: self.stats.compiled.load(Ordering::Relaxed),
            unsupported_stage: self.stats.unsupported_stage.load(Ordering::Relaxed),
            parse_errors: self.stats.parse_errors.load(Ordering::Relaxed),
            validation_errors: self.stats.validation_errors.load(Ordering::Relaxed),
            frontend_recoveries: self.stats.frontend_recoveries.load(Ordering::Relaxed),
        }
    }

    fn naga_stage(stage: ShaderStage) -> Option<naga::ShaderStage> {
        match stage {
            ShaderStage::Vertex => Some(naga::ShaderStage::Vertex),
            ShaderStage::Fragment => Some(naga::ShaderStage::Fragment),
            ShaderStage::Compute => Some(naga::ShaderStage::Compute),
            ShaderStage::TessControl | ShaderStage::TessEvaluation | ShaderStage::Geometry => None,
        }
    }

    fn parse(&self, stage: naga::ShaderStage, source: &str) -> Option<naga::Module> {
        let mut options = naga::front::glsl::Options::from(stage);
        for (name, value) in &self.config.defines {
            options.defines.insert(name.clone(), value.clone());
        }

        // Frontend::parse resets its state, so a poisoned front-end is reusable
        let mut frontend = match self.frontend.lock() {
            Ok(frontend) => frontend,
            Err(poisoned) => {
                self.stats.frontend_recoveries.fetch_add(1, Ordering::Relaxed);
                icd_warn!("xgl::naga", "GLSL front-end lock poisoned, recovering");
                self.frontend.clear_poison();
                poisoned.into_inner()
            }
        };
        match frontend.parse(&options, source) {
            Ok(module) => Some(module),
            Err(errors) => {
                self.stats.parse_errors.fetch_add(1, Ordering::Relaxed);
                icd_warn!("xgl::naga", "GLSL parse failed: {}", errors);
                None
            }
        }
    }

    fn validate(&self, module: &naga::Module) -> Option<naga::valid::ModuleInfo> {
        let mut validator = naga::valid::Validator::new(
            if self.config.validate {
                naga::valid::ValidationFlags::all()
            } else {
                naga::valid::ValidationFlags::empty()
            },
            naga::valid::Capabilities::all(),
        );
        match validator.validate(module) {
            Ok(info) => Some(info),
            Err(error) => {
                self.stats.validation_errors.fetch_add(1, Ordering::Relaxed);
                icd_warn!("xgl::naga", "Module validation failed: {}", error);
                None
            }
        }
    }
}

impl Default for NagaCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderCompiler for NagaCompiler {
    fn create_program(&self, shader: &BaseObject, source: &CompileGlsl<'_>) -> Option<Box<dyn ShaderProgram>> {
        let Some(stage) = Self::naga_stage(source.stage) else {
            self.stats.unsupported_stage.fetch_add(1, Ordering::Relaxed);
            icd_warn!("xgl::naga", "{:?} shaders are not supported", source.stage);
            return None;
        };

        if source.flags != 0 {
            icd_debug!("xgl::naga", "Ignoring compile flags {:#x}", source.flags);
        }

        let module = self.parse(stage, source.source)?;
        let info = self.validate(&module)?;

        let entry_point = module
            .entry_points
            .iter()
            .find(|ep| ep.stage == stage)
            .map(|ep| ep.name.clone())
            .unwrap_or_else(|| "main".to_string());

        self.stats.compiled.fetch_add(1, Ordering::Relaxed);
        self.live.fetch_add(1, Ordering::Relaxed);
        icd_debug!(
            "xgl::naga",
            "Compiled {:?} program '{}' for {:?} ({} functions)",
            source.stage,
            entry_point,
            shader.object_type(),
            module.functions.len()
        );

        Some(Box::new(NagaProgram {
            module,
            info,
            stage: source.stage,
            entry_point,
            live: Arc::clone(&self.live),
        }))
    }
}

#[cfg(test)]
#[path = "naga_compiler_tests.rs"]
mod tests;
