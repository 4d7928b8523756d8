/// IR container owned by a shader object

use std::fmt;

use crate::alloc::{Allocation, HeapBuffer};
use crate::shader::glsl::ShaderProgram;

enum IrPayload {
    /// Kernel translated from BIL
    Kernel(HeapBuffer),
    /// Program produced by the compiler bridge
    Program(Box<dyn ShaderProgram>),
}

/// Driver-internal representation of one shader
///
/// Holds either a kernel buffer or a compiled program, never both. Dropping
/// the container destroys the program or frees the kernel first, then
/// releases the container allocation itself.
pub struct Ir {
    payload: IrPayload,
    size: usize,
    container: Allocation,
}

impl Ir {
    pub(crate) fn with_kernel(container: Allocation, kernel: HeapBuffer) -> Self {
        Self {
            size: kernel.len(),
            payload: IrPayload::Kernel(kernel),
            container,
        }
    }

    pub(crate) fn with_program(container: Allocation, size: usize, program: Box<dyn ShaderProgram>) -> Self {
        Self {
            payload: IrPayload::Program(program),
            size,
            container,
        }
    }

    /// Program size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn kernel(&self) -> Option<&[u8]> {
        match &self.payload {
            IrPayload::Kernel(kernel) => Some(&kernel[..]),
            IrPayload::Program(_) => None,
        }
    }

    pub fn program(&self) -> Option<&dyn ShaderProgram> {
        match &self.payload {
            IrPayload::Kernel(_) => None,
            IrPayload::Program(program) => Some(&**program),
        }
    }

    /// Bytes accounted for the container itself
    pub fn container_size(&self) -> usize {
        self.container.size()
    }
}

impl fmt::Debug for Ir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let payload = match &self.payload {
            IrPayload::Kernel(_) => "kernel",
            IrPayload::Program(_) => "program",
        };
        f.debug_struct("Ir")
            .field("size", &self.size)
            .field("payload", &payload)
            .finish()
    }
}
