//! Error type for the paging subsystem.

use core::fmt;

/// Errors the 2-level x86 paging primitives can report.
///
/// Zone-size mismatches between a virtual and physical range are treated as
/// a caller contract violation (see `map_zone`) and panic rather than
/// returning a variant here, matching how the rest of this crate separates
/// recoverable conditions from programmer error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingError {
    /// A virtual or physical address was not 4 KiB aligned.
    Misaligned,
    /// The platform's physical page allocator returned nothing.
    OutOfMemory,
}

impl fmt::Display for PagingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            PagingError::Misaligned => "address is not 4 KiB aligned",
            PagingError::OutOfMemory => "physical page allocation failed",
        };
        f.write_str(msg)
    }
}

pub type PagingResult<T> = Result<T, PagingError>;
