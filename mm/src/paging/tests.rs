use super::ops::{
    SHARED_DIRECTORY_ENTRIES, is_user_addr, map_page, map_zone, page_directory_create,
    page_directory_destroy, unmap_zone,
};
use super::table::PageTable;
use super::test_fixtures::FakeFrameAllocator;
use crate::paging_defs::{PAGE_SIZE_4KB, PageFlags};

#[test]
fn map_page_then_lookup_round_trips() {
    let alloc = FakeFrameAllocator::new();
    let mut dir = PageTable::zeroed();

    map_page(&mut dir, &alloc, 0x4000, 0x1000, PageFlags::KERNEL_RW).unwrap();
    assert!(!is_user_addr(&dir, &alloc, 0x4000));
}

#[test]
fn map_page_sets_user_flag() {
    let alloc = FakeFrameAllocator::new();
    let mut dir = PageTable::zeroed();

    map_page(&mut dir, &alloc, 0x0020_0000, 0x3000, PageFlags::USER_RW).unwrap();
    assert!(is_user_addr(&dir, &alloc, 0x0020_0000));
}

#[test]
fn map_page_rejects_unaligned_addresses() {
    let alloc = FakeFrameAllocator::new();
    let mut dir = PageTable::zeroed();
    assert!(map_page(&mut dir, &alloc, 0x1001, 0x2000, PageFlags::KERNEL_RW).is_err());
    assert!(map_page(&mut dir, &alloc, 0x1000, 0x2001, PageFlags::KERNEL_RW).is_err());
}

#[test]
fn map_page_reuses_existing_table_for_same_directory_entry() {
    let alloc = FakeFrameAllocator::new();
    let mut dir = PageTable::zeroed();

    map_page(&mut dir, &alloc, 0x0000_1000, 0x5000, PageFlags::KERNEL_RW).unwrap();
    let frames_after_first = alloc.allocated_frame_count();
    map_page(&mut dir, &alloc, 0x0000_2000, 0x6000, PageFlags::KERNEL_RW).unwrap();

    // Same page directory entry (pd_index 0) -> no new table frame needed.
    assert_eq!(alloc.allocated_frame_count(), frames_after_first);
}

#[test]
fn map_zone_maps_every_page_in_range() {
    let alloc = FakeFrameAllocator::new();
    let mut dir = PageTable::zeroed();

    let span = PAGE_SIZE_4KB * 4;
    map_zone(
        &mut dir,
        &alloc,
        0x10_0000,
        0x10_0000 + span,
        0x20_0000,
        0x20_0000 + span,
        PageFlags::USER_RW,
    )
    .unwrap();

    for i in 0..4 {
        assert!(is_user_addr(&dir, &alloc, 0x10_0000 + i * PAGE_SIZE_4KB));
    }
}

#[test]
#[should_panic(expected = "virtual and physical zone sizes differ")]
fn map_zone_panics_on_size_mismatch() {
    let alloc = FakeFrameAllocator::new();
    let mut dir = PageTable::zeroed();
    map_zone(
        &mut dir,
        &alloc,
        0x10_0000,
        0x10_0000 + PAGE_SIZE_4KB,
        0x20_0000,
        0x20_0000 + 2 * PAGE_SIZE_4KB,
        PageFlags::USER_RW,
    )
    .unwrap();
}

#[test]
fn unmap_zone_clears_leaf_entries_without_freeing_tables() {
    let alloc = FakeFrameAllocator::new();
    let mut dir = PageTable::zeroed();

    map_page(&mut dir, &alloc, 0x30_0000, 0x40_0000, PageFlags::USER_RW).unwrap();
    assert!(is_user_addr(&dir, &alloc, 0x30_0000));

    unmap_zone(&mut dir, &alloc, 0x30_0000, 0x30_0000 + PAGE_SIZE_4KB);
    assert!(!is_user_addr(&dir, &alloc, 0x30_0000));
}

#[test]
fn page_directory_create_inherits_shared_entries_only() {
    let alloc = FakeFrameAllocator::new();
    let mut early = PageTable::zeroed();
    early.entries[0] = 0xAAAA_A000 | PageFlags::KERNEL_RW.bits();
    early.entries[SHARED_DIRECTORY_ENTRIES] = 0xBBBB_B000 | PageFlags::KERNEL_RW.bits();

    let dir_phys = page_directory_create(&alloc, &early).unwrap();
    // SAFETY: `dir_phys` was just allocated above and is still live.
    let dir = unsafe { alloc.frame_mut(dir_phys) };

    assert_eq!(dir.entries[0], early.entries[0]);
    assert_eq!(dir.entries[SHARED_DIRECTORY_ENTRIES], 0);
}

#[test]
fn page_directory_destroy_frees_private_tables_but_not_shared_ones() {
    let alloc = FakeFrameAllocator::new();
    let mut early = PageTable::zeroed();
    early.entries[0] = 0xAAAA_A000 | PageFlags::KERNEL_RW.bits();

    let dir_phys = page_directory_create(&alloc, &early).unwrap();
    {
        // SAFETY: `dir_phys` is live for the duration of this block.
        let dir = unsafe { alloc.frame_mut(dir_phys) };
        let private_virt = (SHARED_DIRECTORY_ENTRIES as u32) << super::table::PD_SHIFT;
        map_page(dir, &alloc, private_virt, 0x9000, PageFlags::USER_RW).unwrap();
    }
    let frames_before = alloc.allocated_frame_count();

    // SAFETY: `dir_phys` came from `page_directory_create` and has not yet
    // been destroyed.
    unsafe { page_directory_destroy(&alloc, dir_phys) };

    // The directory frame and the one private table frame are freed; the
    // shared entry at index 0 never owned a frame through this allocator
    // (it was forged for the test), so only 2 frames actually existed.
    assert!(alloc.allocated_frame_count() < frames_before);
}

#[test]
fn is_user_addr_false_for_unmapped_address() {
    let alloc = FakeFrameAllocator::new();
    let dir = PageTable::zeroed();
    assert!(!is_user_addr(&dir, &alloc, 0x1234_0000));
}
