//! This module contains the [Mmu], which owns the page table and performs address translation.

use crate::{
    error::{ConfigError, Fault, TranslationResult},
    layout::{Geometry, Layout},
    pte::PageTableEntry,
    table::PageTable,
    types::{PhysicalAddress, VirtualAddress, Vpn},
};
use std::fmt;

/// A hook receiving the [Trace] of every translation.
type TraceHook = Box<dyn Fn(&Trace) + Send + Sync>;

/// The diagnostic record of a single translation: the page number that was looked up and the
/// entry that was found for it, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trace {
    /// The translated virtual address.
    pub virtual_address: VirtualAddress,
    /// The virtual page number extracted from the address.
    pub vpn: Vpn,
    /// The page table entry for the page, or `None` if the page number is out of range.
    pub entry: Option<PageTableEntry>,
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entry {
            Some(entry) => write!(
                f,
                "(vpn:{}, pfn: {}, valid: {}, access: {})",
                self.vpn,
                entry.pfn(),
                entry.is_valid() as u8,
                entry.is_accessible() as u8
            ),
            None => write!(f, "(vpn:{}, out of range)", self.vpn),
        }
    }
}

/// The outcome of a translation together with its [Trace].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walk {
    /// The diagnostic record of the translation.
    pub trace: Trace,
    /// The translated physical address, or the fault raised.
    pub result: TranslationResult<PhysicalAddress>,
}

/// The [Mmu] owns a [PageTable] along with the [Layout] constants used to index it, and
/// translates virtual addresses against it.
///
/// The table is never mutated after construction, so an [Mmu] can be shared between threads and
/// translations are repeatable.
pub struct Mmu {
    /// The geometry of the address space.
    geometry: Geometry,
    /// The masks and shifts derived from the geometry.
    layout: Layout,
    /// The page table. Plays the part of the page table base register.
    table: PageTable,
    /// An optional observer of every translation.
    hook: Option<TraceHook>,
}

impl Mmu {
    /// Create a new [Mmu] with a freshly allocated and initialized page table.
    ///
    /// ## Takes
    /// - `address_space_bits`: The width of the virtual address space, in `1..=32`.
    /// - `page_size`: The size of a page in bytes. A power of two in `1..=4096`.
    ///
    /// ## Returns
    /// - `Ok(mmu)` if the configuration is valid and the table could be allocated.
    /// - `Err(_)` otherwise.
    pub fn new(address_space_bits: u32, page_size: u32) -> Result<Self, ConfigError> {
        let geometry = Geometry::new(address_space_bits, page_size)?;
        let mut table = PageTable::alloc(&geometry)?;
        table.init_synthetic();
        Self::from_parts(geometry, table)
    }

    /// Create a new [Mmu] from a [Geometry] and an already populated [PageTable].
    ///
    /// ## Returns
    /// - `Ok(mmu)` if the table has exactly one entry per page of the geometry.
    /// - `Err(_)` otherwise.
    pub fn from_parts(geometry: Geometry, table: PageTable) -> Result<Self, ConfigError> {
        let (expected, actual) = (geometry.num_ptes(), table.len() as u64);
        if expected != actual {
            return Err(ConfigError::TableSizeMismatch { expected, actual });
        }

        let layout = geometry.layout();
        tracing::debug!(
            target: "swmmu::translate",
            "MMU ready: vpn_mask={:#010x}, offset_mask={:#010x}, shift={}, pfn_shift={}",
            layout.vpn_mask,
            layout.offset_mask,
            layout.shift,
            layout.pfn_shift
        );

        Ok(Self { geometry, layout, table, hook: None })
    }

    /// Install a hook that observes the [Trace] of every translation.
    pub fn with_trace_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Trace) + Send + Sync + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Returns the [Geometry] of the address space.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Returns the [Layout] constants.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Returns the [PageTable].
    pub fn table(&self) -> &PageTable {
        &self.table
    }

    /// Translate a virtual address to a physical address.
    ///
    /// ## Takes
    /// - `address`: The virtual address to translate.
    ///
    /// ## Returns
    /// - `Ok(physical_address)` if the page is valid and accessible.
    /// - `Err(Fault::NotValid)` if the page is not valid.
    /// - `Err(Fault::NotAccessible)` if the page is valid but not accessible.
    /// - `Err(Fault::OutOfRange)` if the page number lies beyond the page table.
    pub fn translate(&self, address: VirtualAddress) -> TranslationResult<PhysicalAddress> {
        self.walk(address).result
    }

    /// Translate a virtual address, returning the [Trace] of the lookup alongside the result.
    pub fn walk(&self, address: VirtualAddress) -> Walk {
        let vpn = self.layout.vpn(address);
        let entry = self.table.entry(vpn);
        let trace = Trace { virtual_address: address, vpn, entry };

        match entry {
            Some(e) => tracing::trace!(
                target: "swmmu::translate",
                "{:#x}: vpn={}, pfn={}, valid={}, access={}",
                address,
                vpn,
                e.pfn(),
                e.is_valid(),
                e.is_accessible()
            ),
            None => tracing::trace!(
                target: "swmmu::translate",
                "{:#x}: vpn={} out of range",
                address,
                vpn
            ),
        }
        if let Some(hook) = &self.hook {
            hook(&trace);
        }

        let result = match entry {
            None => Err(Fault::OutOfRange { vpn, entries: self.geometry.num_ptes() }),
            // Validity is checked before permissions.
            Some(e) if !e.is_valid() => Err(Fault::NotValid { vpn }),
            Some(e) if !e.is_accessible() => Err(Fault::NotAccessible { vpn }),
            Some(e) => Ok((e.pfn() << self.layout.pfn_shift) | self.layout.offset(address)),
        };

        Walk { trace, result }
    }
}

impl fmt::Debug for Mmu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mmu")
            .field("geometry", &self.geometry)
            .field("layout", &self.layout)
            .field("entries", &self.table.len())
            .field("hook", &self.hook.is_some())
            .finish()
    }
}
