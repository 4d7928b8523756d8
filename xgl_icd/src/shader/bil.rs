/// BIL (binary intermediate language) validation and translation

use bytemuck::{Pod, Zeroable};

use crate::alloc::{icd_alloc, HeapBuffer, SystemAllocType};
use crate::dev::Device;
use crate::error::{Error, Result};
use crate::shader::ir::Ir;

/// Magic number opening every BIL module
pub const BIL_MAGIC: u32 = 0x0723_0203;

/// BIL version this driver was written against
pub const BIL_VERSION: u32 = 99;

/// Size of `BilHeader` in bytes
pub const BIL_HEADER_SIZE: usize = std::mem::size_of::<BilHeader>();

/// Fixed header at the start of a BIL module, in host byte order
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct BilHeader {
    pub magic: u32,
    pub version: u32,
    /// Magic number of the tool that generated the module
    pub gen_magic: u32,
}

impl BilHeader {
    /// Header for a module targeting the current BIL version
    pub fn new(gen_magic: u32) -> Self {
        Self {
            magic: BIL_MAGIC,
            version: BIL_VERSION,
            gen_magic,
        }
    }

    /// Header bytes followed by `payload`
    pub fn encode(&self, payload: &[u8]) -> Vec<u8> {
        let mut code = Vec::with_capacity(BIL_HEADER_SIZE + payload.len());
        code.extend_from_slice(bytemuck::bytes_of(self));
        code.extend_from_slice(payload);
        code
    }
}

/// A validated BIL module: its header plus the bytes that follow it
#[derive(Debug, Clone, Copy)]
pub struct BilView<'a> {
    header: BilHeader,
    payload: &'a [u8],
}

impl<'a> BilView<'a> {
    pub fn header(&self) -> &BilHeader {
        &self.header
    }

    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// `code.len() - BIL_HEADER_SIZE`
    pub fn payload_size(&self) -> usize {
        self.payload.len()
    }
}

/// Check that `code` starts with a BIL header
///
/// # Errors
///
/// - `InvalidMemorySize` if `code` is shorter than the header
/// - `BadShaderCode` if the magic number does not match
pub fn validate(code: &[u8]) -> Result<BilView<'_>> {
    if code.len() < BIL_HEADER_SIZE {
        return Err(Error::InvalidMemorySize);
    }

    let (head, payload) = code.split_at(BIL_HEADER_SIZE);
    let header: BilHeader = bytemuck::pod_read_unaligned(head);
    if header.magic != BIL_MAGIC {
        return Err(Error::BadShaderCode);
    }

    if header.version != BIL_VERSION {
        crate::icd_warn!(
            "xgl::Bil",
            "BIL version {} differs from supported version {}",
            header.version,
            BIL_VERSION
        );
    }

    Ok(BilView { header, payload })
}

/// Translate a validated module into an IR container
///
/// The kernel buffer holds the payload as-is; instruction selection happens
/// when a pipeline consumes the IR.
///
/// # Errors
///
/// `OutOfMemory` if the container or the kernel buffer cannot be allocated.
/// Nothing stays allocated on failure.
pub fn translate(device: &Device, bil: &BilView<'_>) -> Result<Ir> {
    let allocator = device.allocator();

    let container = icd_alloc(
        allocator,
        std::mem::size_of::<Ir>(),
        std::mem::align_of::<Ir>(),
        SystemAllocType::InternalShader,
    )
    .ok_or(Error::OutOfMemory)?;

    let mut kernel = HeapBuffer::alloc(allocator, bil.payload_size(), SystemAllocType::InternalShader)
        .ok_or(Error::OutOfMemory)?;
    kernel.copy_from_slice(bil.payload());

    Ok(Ir::with_kernel(container, kernel))
}

#[cfg(test)]
#[path = "bil_tests.rs"]
mod tests;
