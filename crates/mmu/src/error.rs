//! Error types for the software-managed MMU.

use crate::types::Vpn;
use std::{collections::TryReserveError, fmt};

/// A [Result] type over a generic value with [Fault].
pub type TranslationResult<T> = Result<T, Fault>;

/// A fault raised while translating a virtual address. Faults never mutate the page table, so the
/// caller may keep issuing translations after receiving one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The page table entry for the page is not marked valid.
    NotValid {
        /// The virtual page number that faulted.
        vpn: Vpn,
    },
    /// The page table entry is valid, but the page may not be accessed.
    NotAccessible {
        /// The virtual page number that faulted.
        vpn: Vpn,
    },
    /// The virtual page number lies beyond the end of the page table.
    OutOfRange {
        /// The virtual page number that faulted.
        vpn: Vpn,
        /// The number of entries in the page table.
        entries: u64,
    },
}

impl Fault {
    /// Returns the virtual page number that caused the fault.
    pub fn vpn(&self) -> Vpn {
        match self {
            Fault::NotValid { vpn }
            | Fault::NotAccessible { vpn }
            | Fault::OutOfRange { vpn, .. } => *vpn,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::NotValid { .. } => write!(f, "Segmentation Fault"),
            Fault::NotAccessible { .. } => write!(f, "Protection Fault"),
            Fault::OutOfRange { vpn, entries } => {
                write!(f, "Out of range (vpn {vpn} >= {entries} entries)")
            }
        }
    }
}

impl std::error::Error for Fault {}

/// An error raised while configuring the MMU. None of these ever reach translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The address space width is outside of `1..=32` bits.
    AddressSpaceBits(u32),
    /// The page size is outside of `1..=4096` bytes.
    PageSize(u32),
    /// The page size is not a power of two.
    PageSizeNotPowerOfTwo(u32),
    /// The address space is narrower than a single page.
    AddressSpaceTooSmall {
        /// The requested address space width in bits.
        address_space_bits: u32,
        /// The width of the page offset in bits.
        page_size_bits: u32,
    },
    /// The page table has more entries than the host can index.
    TableTooLarge(u64),
    /// A supplied page table does not have one entry per page of the address space.
    TableSizeMismatch {
        /// The number of entries the geometry requires.
        expected: u64,
        /// The number of entries the table holds.
        actual: u64,
    },
    /// The page table could not be allocated.
    Allocation(TryReserveError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::AddressSpaceBits(bits) => {
                write!(f, "address_space_bits should be between 1 and 32, got {bits}")
            }
            ConfigError::PageSize(size) => {
                write!(f, "page_size should be between 1 and 4096, got {size}")
            }
            ConfigError::PageSizeNotPowerOfTwo(size) => {
                write!(f, "page_size should be a power of two, got {size}")
            }
            ConfigError::AddressSpaceTooSmall { address_space_bits, page_size_bits } => write!(
                f,
                "a {address_space_bits} bit address space cannot hold a single 2^{page_size_bits} byte page"
            ),
            ConfigError::TableTooLarge(entries) => {
                write!(f, "page table of {entries} entries cannot be indexed on this host")
            }
            ConfigError::TableSizeMismatch { expected, actual } => {
                write!(f, "page table holds {actual} entries, expected {expected}")
            }
            ConfigError::Allocation(e) => write!(f, "failed to allocate the page table: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Allocation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TryReserveError> for ConfigError {
    fn from(e: TryReserveError) -> Self {
        ConfigError::Allocation(e)
    }
}
