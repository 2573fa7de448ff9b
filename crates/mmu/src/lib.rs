//! A software-managed MMU: a single, flat page table translating 32-bit virtual addresses to
//! physical addresses for a configurable address space and page size.
//!
//! The pieces are used in sequence:
//! 1. A [Geometry] is validated from the address space width and the page size.
//! 2. The [Layout] constants (masks and shifts) are derived from it.
//! 3. A [PageTable] is allocated and filled with the synthetic initial pattern.
//! 4. The [Mmu] answers translation queries against that table.

pub mod types;

mod error;
pub use error::{ConfigError, Fault, TranslationResult};

mod layout;
pub use layout::{Geometry, Layout, MAX_ADDRESS_SPACE_BITS, MAX_PAGE_SIZE};

mod pte;
pub use pte::{PageTableEntry, PteFlags, PFN_POSITION, PTE_SIZE};

mod table;
pub use table::PageTable;

mod mmu;
pub use mmu::{Mmu, Trace, Walk};

#[cfg(test)]
pub(crate) mod test_utils;
