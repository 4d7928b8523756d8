/// Object base shared by every driver object kind

use std::sync::Arc;

use crate::alloc::{icd_alloc, Allocation, HeapBuffer, SystemAllocType, SystemAllocator};
use crate::error::{Error, Result};

/// Object kind marker reported to debug layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbgObjectType {
    Device,
    Shader,
}

/// Copy of the create info an object was built from (debug devices only)
#[derive(Debug)]
pub struct DebugRecord {
    create_info: HeapBuffer,
}

impl DebugRecord {
    pub fn create_info(&self) -> &[u8] {
        &self.create_info
    }
}

/// Allocation and debug metadata common to all objects
///
/// Dropping the base releases the object allocation and its debug record.
#[derive(Debug)]
pub struct BaseObject {
    object_type: DbgObjectType,
    allocation: Allocation,
    dbg: Option<DebugRecord>,
}

impl BaseObject {
    /// Allocate an object base of `size` bytes
    ///
    /// When `debug` is set and a create info is given, its bytes are copied
    /// into a debug record.
    pub fn create(
        allocator: &Arc<dyn SystemAllocator>,
        debug: bool,
        object_type: DbgObjectType,
        size: usize,
        create_info: Option<&[u8]>,
    ) -> Result<Self> {
        let allocation = icd_alloc(allocator, size, std::mem::align_of::<u64>(), SystemAllocType::ApiObject)
            .ok_or(Error::OutOfMemory)?;

        let dbg = match create_info {
            Some(info) if debug => {
                let mut copy = HeapBuffer::alloc(allocator, info.len(), SystemAllocType::Debug)
                    .ok_or(Error::OutOfMemory)?;
                copy.copy_from_slice(info);
                Some(DebugRecord { create_info: copy })
            }
            _ => None,
        };

        Ok(Self {
            object_type,
            allocation,
            dbg,
        })
    }

    pub fn object_type(&self) -> DbgObjectType {
        self.object_type
    }

    pub fn size(&self) -> usize {
        self.allocation.size()
    }

    pub fn debug_record(&self) -> Option<&DebugRecord> {
        self.dbg.as_ref()
    }
}

#[cfg(test)]
#[path = "obj_tests.rs"]
mod tests;
