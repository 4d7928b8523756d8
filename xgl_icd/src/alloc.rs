//! System allocation accounting
//!
//! Every driver-internal allocation is reported to a `SystemAllocator` with a
//! type tag before memory is handed out. The returned `Allocation` guard
//! reports the matching free when it is dropped, so an allocation can never
//! be freed twice or forgotten on an early return.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};
use rustc_hash::FxHashMap;

/// Allocation type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemAllocType {
    /// Object bases visible through the API
    ApiObject,
    /// Generic driver-internal memory
    Internal,
    /// IR containers and kernel buffers
    InternalShader,
    /// Debug records (copied create infos)
    Debug,
}

/// Allocation callbacks supplied at device creation
///
/// `alloc` returns `false` to refuse an allocation, which the driver reports
/// as `Error::OutOfMemory`. Every successful `alloc` is paired with exactly
/// one `free` carrying the same size and type.
pub trait SystemAllocator: Send + Sync {
    fn alloc(&self, size: usize, alignment: usize, alloc_type: SystemAllocType) -> bool;
    fn free(&self, size: usize, alloc_type: SystemAllocType);
}

/// An accounted allocation, freed on drop
pub struct Allocation {
    allocator: Arc<dyn SystemAllocator>,
    size: usize,
    alloc_type: SystemAllocType,
}

impl Allocation {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn alloc_type(&self) -> SystemAllocType {
        self.alloc_type
    }
}

impl fmt::Debug for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allocation")
            .field("size", &self.size)
            .field("alloc_type", &self.alloc_type)
            .finish()
    }
}

impl Drop for Allocation {
    fn drop(&mut self) {
        self.allocator.free(self.size, self.alloc_type);
    }
}

/// Request an accounted allocation, `None` when the allocator refuses it
pub fn icd_alloc(
    allocator: &Arc<dyn SystemAllocator>,
    size: usize,
    alignment: usize,
    alloc_type: SystemAllocType,
) -> Option<Allocation> {
    if !allocator.alloc(size, alignment, alloc_type) {
        return None;
    }
    Some(Allocation {
        allocator: Arc::clone(allocator),
        size,
        alloc_type,
    })
}

/// Zero-initialized byte buffer backed by an accounted allocation
#[derive(Debug)]
pub struct HeapBuffer {
    data: Vec<u8>,
    allocation: Allocation,
}

impl HeapBuffer {
    /// Allocate `size` bytes, `None` if either the allocator or the heap refuses
    pub fn alloc(
        allocator: &Arc<dyn SystemAllocator>,
        size: usize,
        alloc_type: SystemAllocType,
    ) -> Option<Self> {
        let allocation = icd_alloc(allocator, size, std::mem::align_of::<u32>(), alloc_type)?;

        let mut data = Vec::new();
        data.try_reserve_exact(size).ok()?;
        data.resize(size, 0);

        Some(Self { data, allocation })
    }

    pub fn alloc_type(&self) -> SystemAllocType {
        self.allocation.alloc_type()
    }
}

impl Deref for HeapBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for HeapBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

// ============================================================================
// TrackingAllocator
// ============================================================================

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Usage {
    count: usize,
    bytes: usize,
}

#[derive(Default)]
struct TrackingState {
    live: FxHashMap<SystemAllocType, Usage>,
    live_bytes: usize,
    total_allocations: usize,
    budget: Option<usize>,
    fail_countdown: Option<usize>,
}

/// Default allocator: per-type live accounting with an optional byte budget
///
/// `fail_nth` injects a single refusal, which is how the out-of-memory paths
/// of object creation are exercised.
#[derive(Default)]
pub struct TrackingAllocator {
    state: Mutex<TrackingState>,
}

impl TrackingAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse any allocation that would push live bytes past `bytes`
    pub fn with_budget(bytes: usize) -> Self {
        let allocator = Self::new();
        if let Ok(mut state) = allocator.state.lock() {
            state.budget = Some(bytes);
        }
        allocator
    }

    /// Refuse the `n`-th allocation from now (0 = the next one), once
    pub fn fail_nth(&self, n: usize) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_countdown = Some(n);
        }
    }

    /// Number of live allocations across all types
    pub fn live_count(&self) -> usize {
        self.state
            .lock()
            .map(|s| s.live.values().map(|u| u.count).sum())
            .unwrap_or(0)
    }

    /// Number of live bytes across all types
    pub fn live_bytes(&self) -> usize {
        self.state.lock().map(|s| s.live_bytes).unwrap_or(0)
    }

    pub fn live_count_of(&self, alloc_type: SystemAllocType) -> usize {
        self.usage_of(alloc_type).count
    }

    pub fn live_bytes_of(&self, alloc_type: SystemAllocType) -> usize {
        self.usage_of(alloc_type).bytes
    }

    /// Successful allocations since creation
    pub fn total_allocations(&self) -> usize {
        self.state.lock().map(|s| s.total_allocations).unwrap_or(0)
    }

    fn usage_of(&self, alloc_type: SystemAllocType) -> Usage {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.live.get(&alloc_type).copied())
            .unwrap_or_default()
    }
}

impl SystemAllocator for TrackingAllocator {
    fn alloc(&self, size: usize, _alignment: usize, alloc_type: SystemAllocType) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };

        if let Some(n) = state.fail_countdown {
            if n == 0 {
                state.fail_countdown = None;
                return false;
            }
            state.fail_countdown = Some(n - 1);
        }

        let Some(new_live) = state.live_bytes.checked_add(size) else {
            return false;
        };
        if state.budget.is_some_and(|budget| new_live > budget) {
            return false;
        }

        state.live_bytes = new_live;
        state.total_allocations += 1;
        let usage = state.live.entry(alloc_type).or_default();
        usage.count += 1;
        usage.bytes += size;
        true
    }

    fn free(&self, size: usize, alloc_type: SystemAllocType) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        state.live_bytes = state.live_bytes.saturating_sub(size);
        if let Some(usage) = state.live.get_mut(&alloc_type) {
            debug_assert!(usage.count > 0, "free without matching alloc: {:?}", alloc_type);
            usage.count = usage.count.saturating_sub(1);
            usage.bytes = usage.bytes.saturating_sub(size);
        }
    }
}

#[cfg(test)]
#[path = "alloc_tests.rs"]
mod tests;
