//! Heap allocation accounting
//!
//! [`CountingAllocator`] forwards to the system allocator and counts every
//! successful allocation. Install it in the binary (or a test crate) with
//! `#[global_allocator]`; without it every snapshot reads zero.

use serde::Serialize;
use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

static ALLOCATED_BYTES: AtomicU64 = AtomicU64::new(0);
static ALLOCATIONS: AtomicU64 = AtomicU64::new(0);

/// Global allocator wrapper counting allocated bytes and calls
pub struct CountingAllocator;

impl CountingAllocator {
    fn record(size: usize) {
        ALLOCATED_BYTES.fetch_add(size as u64, Ordering::Relaxed);
        ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
    }
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            Self::record(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            Self::record(layout.size());
        }
        ptr
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            // Only growth is new memory
            Self::record(new_size.saturating_sub(layout.size()));
        }
        new_ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
    }
}

/// Cumulative allocation counters at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AllocationSnapshot {
    /// Bytes allocated since process start
    pub bytes: u64,
    /// Allocation calls since process start
    pub count: u64,
}

impl AllocationSnapshot {
    /// Read the current counters
    pub fn take() -> Self {
        Self {
            bytes: ALLOCATED_BYTES.load(Ordering::Relaxed),
            count: ALLOCATIONS.load(Ordering::Relaxed),
        }
    }

    /// Allocations between `earlier` and `self`
    pub fn since(&self, earlier: &AllocationSnapshot) -> AllocationSnapshot {
        AllocationSnapshot {
            bytes: self.bytes.saturating_sub(earlier.bytes),
            count: self.count.saturating_sub(earlier.count),
        }
    }
}
