//! Two-level x86 paging: directories and tables of 1024 32-bit entries,
//! a page-aligned virtual/physical space, and the mapping primitives built
//! on top of them.

mod ops;
mod phys;
mod table;

#[cfg(test)]
mod test_fixtures;
#[cfg(test)]
mod tests;

pub use ops::{
    SHARED_DIRECTORY_ENTRIES, is_user_addr, map_page, map_zone, page_directory_create,
    page_directory_destroy, unmap_zone,
};
pub use phys::{PhysAddr, PhysFrameAllocator};
pub use table::{ENTRIES_PER_TABLE, PAGE_SHIFT, PD_SHIFT, PT_SHIFT, PageTable, split_virt};
