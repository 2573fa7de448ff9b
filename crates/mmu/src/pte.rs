//! This module contains the [PageTableEntry] type and its bit-packed format.
//!
//! ```text
//!  31                        12 11          2    1        0
//! +----------------------------+-------------+--------+-------+
//! |            PFN             |  reserved   | ACCESS | VALID |
//! +----------------------------+-------------+--------+-------+
//! ```

use crate::types::Pfn;
use bitflags::bitflags;
use std::fmt;

/// The size of a [PageTableEntry] in bytes.
pub const PTE_SIZE: usize = 4;

/// The bit position of the frame number within a [PageTableEntry].
///
/// This is fixed regardless of the simulated page size, and is deliberately distinct from
/// [Layout::pfn_shift], which is only used when rebuilding a physical address.
///
/// [Layout::pfn_shift]: crate::Layout::pfn_shift
pub const PFN_POSITION: u32 = 12;

bitflags! {
    /// Permission and presence bits held in the low bits of a [PageTableEntry].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PteFlags: u32 {
        /// The entry maps a page.
        const VALID = 1 << 0;
        /// The mapped page may be accessed.
        const ACCESS = 1 << 1;
    }
}

/// A single 4 byte page table entry.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PageTableEntry(u32);

impl PageTableEntry {
    /// An entry that maps nothing.
    pub const EMPTY: Self = Self(0);

    /// Create a new [PageTableEntry] for a frame number with the given flags.
    ///
    /// Frame numbers wider than 20 bits lose their high bits, as the frame field is only 20 bits
    /// wide.
    pub fn new(pfn: Pfn, flags: PteFlags) -> Self {
        Self((pfn << PFN_POSITION) | flags.bits())
    }

    /// Reinterpret a raw 32 bit value as a [PageTableEntry].
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw 32 bit value of the entry.
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Returns the physical frame number held by the entry.
    pub const fn pfn(&self) -> Pfn {
        self.0 >> PFN_POSITION
    }

    /// Returns the flags held by the entry. Reserved bits are dropped.
    pub fn flags(&self) -> PteFlags {
        PteFlags::from_bits_truncate(self.0)
    }

    /// Returns `true` if the valid bit is set.
    pub fn is_valid(&self) -> bool {
        self.flags().contains(PteFlags::VALID)
    }

    /// Returns `true` if the access bit is set.
    pub fn is_accessible(&self) -> bool {
        self.flags().contains(PteFlags::ACCESS)
    }

    /// Returns the little-endian byte representation of the entry.
    pub fn to_le_bytes(&self) -> [u8; PTE_SIZE] {
        self.0.to_le_bytes()
    }
}

impl fmt::Debug for PageTableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageTableEntry")
            .field("raw", &format_args!("{:#010x}", self.0))
            .field("pfn", &self.pfn())
            .field("flags", &self.flags())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn entry_packs_fields() {
        let entry = PageTableEntry::new(2, PteFlags::VALID | PteFlags::ACCESS);
        assert_eq!(entry.raw(), 0x2003);
        assert_eq!(entry.pfn(), 2);
        assert!(entry.is_valid());
        assert!(entry.is_accessible());
        assert_eq!(entry.to_le_bytes(), [0x03, 0x20, 0x00, 0x00]);
    }

    #[test]
    fn empty_entry_is_invalid() {
        assert_eq!(PageTableEntry::default(), PageTableEntry::EMPTY);
        assert!(!PageTableEntry::EMPTY.is_valid());
        assert!(!PageTableEntry::EMPTY.is_accessible());
        assert_eq!(PageTableEntry::EMPTY.pfn(), 0);
    }

    #[test]
    fn reserved_bits_are_ignored() {
        let entry = PageTableEntry::from_raw(0x0000_5FF5);
        assert_eq!(entry.pfn(), 5);
        assert_eq!(entry.flags(), PteFlags::VALID);
        assert!(!entry.is_accessible());
    }

    #[test]
    fn frame_number_truncates_to_field_width() {
        let entry = PageTableEntry::new(0x0010_0001, PteFlags::VALID);
        assert_eq!(entry.pfn(), 0x1);
    }
}
