//! Page table entry flags and sizing constants for the 2-level x86 scheme.
//!
//! A directory or table entry is a 32-bit word: the upper 20 bits hold the
//! 4 KiB-aligned physical frame, the lower 12 carry flags. Only the three
//! flags the hardware format actually needs for this kernel are modelled.

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct PageFlags: u32 {
        /// Entry maps to a present frame (bit 0).
        const PRESENT = 1 << 0;
        /// Frame is writable; otherwise read-only (bit 1).
        const RW      = 1 << 1;
        /// Frame is accessible from user mode, ring 3 (bit 2).
        const US      = 1 << 2;

        /// Kernel read-write mapping (PRESENT | RW).
        const KERNEL_RW = Self::PRESENT.bits() | Self::RW.bits();
        /// Kernel read-only mapping (PRESENT only).
        const KERNEL_RO = Self::PRESENT.bits();
        /// User read-write mapping (PRESENT | RW | US).
        const USER_RW = Self::PRESENT.bits() | Self::RW.bits() | Self::US.bits();
        /// User read-only mapping (PRESENT | US).
        const USER_RO = Self::PRESENT.bits() | Self::US.bits();
    }
}

impl PageFlags {
    /// Mask over the low 12 bits that an entry's frame address never occupies.
    pub const FLAGS_MASK: u32 = 0xFFF;

    /// Mask over the upper 20 bits that hold the 4 KiB-aligned frame address.
    pub const ADDRESS_MASK: u32 = !Self::FLAGS_MASK;

    #[inline]
    pub const fn extract_address(entry: u32) -> u32 {
        entry & Self::ADDRESS_MASK
    }
}

/// Page size for both directory and table entries on this architecture.
pub const PAGE_SIZE_4KB: u32 = 0x1000;
