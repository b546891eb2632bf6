//! Two-level x86 paging primitives (spec: `map_page`, `map_zone`,
//! `unmap_zone`, `page_directory_create`, `page_directory_destroy`,
//! `is_user_addr`).
//!
//! None of these take a lock: callers mutate a page directory under
//! whatever critical section the owning task subsystem already holds, the
//! same discipline the scheduler's run queues rely on.

use crate::error::{PagingError, PagingResult};
use crate::paging_defs::{PAGE_SIZE_4KB, PageFlags};

use super::phys::{PhysAddr, PhysFrameAllocator};
use super::table::{PageTable, split_virt};

/// Directory entries `[0, SHARED_DIRECTORY_ENTRIES)` are copied verbatim
/// from the shared early directory into every freshly created address
/// space and are never freed by `page_directory_destroy`. They carry the
/// kernel identity mapping and essential device mappings visible to all
/// processes.
pub const SHARED_DIRECTORY_ENTRIES: usize = 64;

#[inline]
fn is_aligned(addr: u32) -> bool {
    addr % PAGE_SIZE_4KB == 0
}

/// Map one 4 KiB page. `virt` and `phy` must both be page-aligned.
pub fn map_page(
    dir: &mut PageTable,
    alloc: &dyn PhysFrameAllocator,
    virt: u32,
    phy: u32,
    flags: PageFlags,
) -> PagingResult<()> {
    if !is_aligned(virt) || !is_aligned(phy) {
        return Err(PagingError::Misaligned);
    }

    let (pd_index, pt_index, _) = split_virt(virt);
    let pde = dir.entries[pd_index];
    let table_phys = if PageTable::is_present(pde) {
        PageFlags::extract_address(pde)
    } else {
        let frame = alloc
            .alloc_physical_page()
            .ok_or(PagingError::OutOfMemory)?;
        // SAFETY: `frame` was just allocated from `alloc`.
        let table = unsafe { alloc.frame_mut(frame) };
        *table = PageTable::zeroed();
        dir.entries[pd_index] = frame | (flags | PageFlags::PRESENT).bits();
        frame
    };

    // SAFETY: `table_phys` is either the frame just allocated above, or an
    // existing present directory entry, both live frames on `alloc`.
    let table = unsafe { alloc.frame_mut(table_phys) };
    table.entries[pt_index] = phy | (flags | PageFlags::PRESENT).bits();
    Ok(())
}

/// Map a contiguous virtual range onto a contiguous physical range.
///
/// `v0`/`p0` are aligned down and `v1`/`p1` aligned up to page granularity.
/// The two (aligned) ranges must have equal length; a mismatch is a caller
/// contract violation and panics rather than returning an error.
pub fn map_zone(
    dir: &mut PageTable,
    alloc: &dyn PhysFrameAllocator,
    v0: u32,
    v1: u32,
    p0: u32,
    p1: u32,
    flags: PageFlags,
) -> PagingResult<()> {
    let v0 = slopos_lib::align_down_u32(v0, PAGE_SIZE_4KB);
    let v1 = slopos_lib::align_up_u32(v1, PAGE_SIZE_4KB);
    let p0 = slopos_lib::align_down_u32(p0, PAGE_SIZE_4KB);
    let p1 = slopos_lib::align_up_u32(p1, PAGE_SIZE_4KB);

    assert_eq!(
        v1 - v0,
        p1 - p0,
        "map_zone: virtual and physical zone sizes differ"
    );

    let mut virt = v0;
    let mut phy = p0;
    while virt < v1 {
        map_page(dir, alloc, virt, phy, flags)?;
        virt += PAGE_SIZE_4KB;
        phy += PAGE_SIZE_4KB;
    }
    Ok(())
}

/// Unmap a virtual range. Page tables themselves are never freed here —
/// only the leaf entries are cleared.
pub fn unmap_zone(dir: &mut PageTable, alloc: &dyn PhysFrameAllocator, v0: u32, v1: u32) {
    let v0 = slopos_lib::align_down_u32(v0, PAGE_SIZE_4KB);
    let v1 = slopos_lib::align_up_u32(v1, PAGE_SIZE_4KB);

    let mut virt = v0;
    while virt < v1 {
        let (pd_index, pt_index, _) = split_virt(virt);
        let pde = dir.entries[pd_index];
        if PageTable::is_present(pde) {
            let table_phys = PageFlags::extract_address(pde);
            // SAFETY: a present directory entry always names a live frame.
            let table = unsafe { alloc.frame_mut(table_phys) };
            table.entries[pt_index] = 0;
        }
        virt += PAGE_SIZE_4KB;
    }
}

/// Allocate a fresh address space, seeded with the shared kernel mappings.
pub fn page_directory_create(
    alloc: &dyn PhysFrameAllocator,
    early_directory: &PageTable,
) -> PagingResult<PhysAddr> {
    let frame = alloc
        .alloc_physical_page()
        .ok_or(PagingError::OutOfMemory)?;
    // SAFETY: `frame` was just allocated from `alloc`.
    let dir = unsafe { alloc.frame_mut(frame) };
    *dir = PageTable::zeroed();
    dir.entries[..SHARED_DIRECTORY_ENTRIES]
        .copy_from_slice(&early_directory.entries[..SHARED_DIRECTORY_ENTRIES]);
    Ok(frame)
}

/// Free every process-private page table and the directory frame itself.
/// The shared low entries (`[0, SHARED_DIRECTORY_ENTRIES)`) are never freed.
///
/// # Safety
/// `dir_phys` must be a directory frame obtained from `page_directory_create`
/// on `alloc` and not yet destroyed.
pub unsafe fn page_directory_destroy(alloc: &dyn PhysFrameAllocator, dir_phys: PhysAddr) {
    // SAFETY: caller guarantees `dir_phys` is a live directory frame.
    let dir = unsafe { alloc.frame_mut(dir_phys) };
    for entry in &dir.entries[SHARED_DIRECTORY_ENTRIES..] {
        if PageTable::is_present(*entry) {
            alloc.free_physical_page(PageFlags::extract_address(*entry));
        }
    }
    alloc.free_physical_page(dir_phys);
}

/// True iff `virt` has a present leaf entry marked user-accessible.
pub fn is_user_addr(dir: &PageTable, alloc: &dyn PhysFrameAllocator, virt: u32) -> bool {
    let (pd_index, pt_index, _) = split_virt(virt);
    let pde = dir.entries[pd_index];
    if !PageTable::is_present(pde) {
        return false;
    }
    let table_phys = PageFlags::extract_address(pde);
    // SAFETY: `pde` is present, so it names a live page-table frame.
    let table = unsafe { alloc.frame_mut(table_phys) };
    let pte = table.entries[pt_index];
    PageTable::is_present(pte) && pte & PageFlags::US.bits() != 0
}
