//! Contains the [PageTable] for the software-managed MMU.

use crate::{
    error::ConfigError,
    layout::Geometry,
    pte::{PageTableEntry, PteFlags, PTE_SIZE},
    types::Vpn,
};

/// A flat, single-level page table: one [PageTableEntry] per virtual page of the address space.
///
/// The table is allocated once, populated once by [PageTable::init_synthetic], and only read
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTable {
    entries: Vec<PageTableEntry>,
}

impl PageTable {
    /// Allocate a zero-filled [PageTable] with one entry per page of the [Geometry].
    ///
    /// ## Takes
    /// - `geometry`: The validated geometry of the address space.
    ///
    /// ## Returns
    /// - `Ok(table)` with every entry invalid.
    /// - `Err(_)` if the table cannot be indexed on this host or the allocation fails.
    pub fn alloc(geometry: &Geometry) -> Result<Self, ConfigError> {
        let num_ptes = geometry.num_ptes();
        let len = usize::try_from(num_ptes).map_err(|_| ConfigError::TableTooLarge(num_ptes))?;

        let mut entries = Vec::new();
        entries.try_reserve_exact(len)?;
        entries.resize(len, PageTableEntry::EMPTY);

        tracing::debug!(
            target: "swmmu::table",
            "Allocated page table with {} entries ({} bytes)",
            len,
            len * PTE_SIZE
        );

        Ok(Self { entries })
    }

    /// Build a [PageTable] from existing entries.
    pub fn from_entries(entries: Vec<PageTableEntry>) -> Self {
        Self { entries }
    }

    /// Populate the table with the synthetic initial pattern.
    ///
    /// Only the lower half of the table is filled; the upper half stays invalid. Entry `i` maps
    /// frame `2 * i`. Every fourth entry, starting at zero, is valid but inaccessible and all
    /// others are valid and accessible.
    pub fn init_synthetic(&mut self) {
        let half = self.entries.len() / 2;
        for (i, entry) in self.entries[..half].iter_mut().enumerate() {
            // `i < 2^31`, so the frame number cannot overflow.
            let pfn = (i as u32) * 2;
            let flags = if i % 4 == 0 {
                PteFlags::VALID
            } else {
                PteFlags::VALID | PteFlags::ACCESS
            };
            *entry = PageTableEntry::new(pfn, flags);
        }

        tracing::debug!(target: "swmmu::table", "Initialized {} of {} entries", half, self.len());
    }

    /// Look up the entry for a virtual page number.
    ///
    /// ## Returns
    /// - `Some(entry)` if the page number is within the table.
    /// - `None` if it lies beyond the end of the table.
    #[inline(always)]
    pub fn entry(&self, vpn: Vpn) -> Option<PageTableEntry> {
        self.entries.get(usize::try_from(vpn).ok()?).copied()
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the entries of the table, in page number order.
    pub fn iter(&self) -> impl Iterator<Item = &PageTableEntry> {
        self.entries.iter()
    }

    /// Returns the byte image of the table, each entry packed as 4 little-endian bytes.
    pub fn as_bytes_le(&self) -> Vec<u8> {
        self.entries.iter().flat_map(PageTableEntry::to_le_bytes).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn table(address_space_bits: u32, page_size: u32) -> PageTable {
        let mut table = PageTable::alloc(&Geometry::new(address_space_bits, page_size).unwrap())
            .unwrap();
        table.init_synthetic();
        table
    }

    #[test]
    fn alloc_is_zeroed() {
        let table = PageTable::alloc(&Geometry::new(16, 256).unwrap()).unwrap();
        assert_eq!(table.len(), 256);
        assert!(table.iter().all(|e| *e == PageTableEntry::EMPTY));
    }

    #[test]
    fn init_fills_lower_half() {
        let table = table(16, 256);
        let (lower, upper) = table.entries.split_at(128);
        assert!(lower.iter().all(PageTableEntry::is_valid));
        assert!(upper.iter().all(|e| e.raw() == 0));
    }

    #[test]
    fn init_pattern() {
        let table = table(16, 256);
        assert_eq!(table.entry(0).unwrap().raw(), 0x0000_0001);
        assert_eq!(table.entry(1).unwrap().raw(), 0x0000_2003);
        assert_eq!(table.entry(2).unwrap().raw(), 0x0000_4003);
        assert_eq!(table.entry(3).unwrap().raw(), 0x0000_6003);
        assert_eq!(table.entry(4).unwrap().raw(), 0x0000_8001);
        assert_eq!(table.entry(127).unwrap().pfn(), 254);
        for (i, entry) in table.iter().take(128).enumerate() {
            assert_eq!(entry.is_accessible(), i % 4 != 0, "entry {i}");
        }
    }

    #[test]
    fn init_single_entry_table_stays_invalid() {
        let table = table(12, 4096);
        assert_eq!(table.len(), 1);
        assert!(!table.entry(0).unwrap().is_valid());
    }

    #[test]
    fn entry_is_bounds_checked() {
        let table = table(16, 256);
        assert!(table.entry(255).is_some());
        assert!(table.entry(256).is_none());
        assert!(table.entry(u32::MAX).is_none());
    }

    #[test]
    fn byte_image() {
        let table = table(3, 2);
        assert_eq!(
            table.as_bytes_le(),
            vec![0x01, 0x00, 0x00, 0x00, 0x03, 0x20, 0x00, 0x00, 0, 0, 0, 0, 0, 0, 0, 0]
        );
    }
}
