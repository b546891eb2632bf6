//! Physical frame allocator boundary.
//!
//! Handing out and reclaiming physical page frames is an out-of-scope
//! collaborator (the kernel's frame allocator lives elsewhere). This module
//! only states the narrow interface the paging primitives need from it.

use super::table::PageTable;

/// A 4 KiB-aligned physical frame address.
pub type PhysAddr = u32;

/// What `map_page` and friends need from the physical frame allocator.
pub trait PhysFrameAllocator {
    /// Allocate one zeroed 4 KiB frame, or `None` if none remain.
    fn alloc_physical_page(&self) -> Option<PhysAddr>;

    /// Return a frame previously obtained from `alloc_physical_page` on the
    /// same allocator.
    fn free_physical_page(&self, addr: PhysAddr);

    /// Obtain a mutable view of the page-table-sized frame at `addr`.
    ///
    /// # Safety
    /// `addr` must currently be allocated on `self` (via `alloc_physical_page`,
    /// or be the address of the shared early directory, which is never
    /// freed), and the caller must not alias this frame through another
    /// reference for the lifetime of the one returned here.
    unsafe fn frame_mut(&self, addr: PhysAddr) -> &mut PageTable;
}
