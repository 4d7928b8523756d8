//! Unit tests for NagaCompiler internals

use std::sync::Arc;

use xgl_icd::xgl::shader::{CompileGlsl, ShaderCompiler, ShaderStage};
use xgl_icd::xgl::{BaseObject, DbgObjectType, SystemAllocator, TrackingAllocator};

use crate::naga_compiler::NagaCompiler;

const FRAGMENT: &str = "#version 450
layout(location = 0) out vec4 o_color;
void main() {
    o_color = vec4(0.0, 1.0, 0.0, 1.0);
}
";

fn base() -> BaseObject {
    let allocator: Arc<dyn SystemAllocator> = Arc::new(TrackingAllocator::new());
    BaseObject::create(&allocator, false, DbgObjectType::Shader, 64, None).unwrap()
}

#[test]
fn test_poisoned_frontend_is_recovered() {
    let compiler = Arc::new(NagaCompiler::new());

    let holder = Arc::clone(&compiler);
    let _ = std::thread::spawn(move || {
        let _guard = holder.frontend.lock().unwrap();
        panic!("poison the front-end");
    })
    .join();
    assert!(compiler.frontend.is_poisoned());

    let code = CompileGlsl::encode(ShaderStage::Fragment, 0, FRAGMENT);
    let request = CompileGlsl::parse(&code).unwrap();
    assert!(compiler.create_program(&base(), &request).is_some());

    let stats = compiler.stats();
    assert_eq!(stats.frontend_recoveries, 1);
    assert_eq!(stats.compiled, 1);
    assert!(!compiler.frontend.is_poisoned());
}

#[test]
fn test_flags_do_not_affect_compilation() {
    let compiler = NagaCompiler::new();
    let code = CompileGlsl::encode(ShaderStage::Fragment, 0xdead_beef, FRAGMENT);
    let request = CompileGlsl::parse(&code).unwrap();

    let program = compiler.create_program(&base(), &request).unwrap();
    assert_eq!(program.stage(), ShaderStage::Fragment);
    assert_eq!(program.entry_point(), "main");
}
