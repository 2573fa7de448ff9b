//! This module contains the [Geometry] of an address space as well as the [Layout] constants
//! derived from it.

use crate::{
    error::ConfigError,
    types::{VirtualAddress, Vpn},
};
use serde::Serialize;

/// The widest supported address space, in bits.
pub const MAX_ADDRESS_SPACE_BITS: u32 = 32;

/// The largest supported page size, in bytes.
pub const MAX_PAGE_SIZE: u32 = 4096;

/// The [Geometry] of a simulated address space: its width and the size of its pages.
///
/// A [Geometry] can only be obtained through [Geometry::new], so holding one guarantees that the
/// page size is a power of two within range and that the page table has at least one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    address_space_bits: u32,
    page_size: u32,
}

impl Geometry {
    /// Validate a new [Geometry].
    ///
    /// ## Takes
    /// - `address_space_bits`: The width of the virtual address space, in `1..=32`.
    /// - `page_size`: The size of a page in bytes. A power of two in `1..=4096`.
    ///
    /// ## Returns
    /// - `Ok(geometry)` if the configuration is supported.
    /// - `Err(_)` describing the first rejected parameter otherwise.
    pub fn new(address_space_bits: u32, page_size: u32) -> Result<Self, ConfigError> {
        if !(1..=MAX_ADDRESS_SPACE_BITS).contains(&address_space_bits) {
            return Err(ConfigError::AddressSpaceBits(address_space_bits));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(ConfigError::PageSize(page_size));
        }
        if !page_size.is_power_of_two() {
            return Err(ConfigError::PageSizeNotPowerOfTwo(page_size));
        }

        let page_size_bits = page_size.trailing_zeros();
        if address_space_bits < page_size_bits {
            return Err(ConfigError::AddressSpaceTooSmall { address_space_bits, page_size_bits });
        }

        Ok(Self { address_space_bits, page_size })
    }

    /// Returns the width of the virtual address space in bits.
    pub fn address_space_bits(&self) -> u32 {
        self.address_space_bits
    }

    /// Returns the page size in bytes.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns `log2(page_size)`.
    pub fn page_size_bits(&self) -> u32 {
        self.page_size.trailing_zeros()
    }

    /// Returns the number of entries in the page table, `2^(address_space_bits - page_size_bits)`.
    pub fn num_ptes(&self) -> u64 {
        1u64 << (self.address_space_bits - self.page_size_bits())
    }

    /// Derive the [Layout] constants for this geometry.
    pub fn layout(&self) -> Layout {
        Layout::compute(self.page_size)
    }
}

/// The [Layout] constants used to decompose a virtual address into a virtual page number and an
/// in-page offset, and to rebuild a physical address from a frame number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    /// `log2(page_size)`.
    pub page_size_bits: u32,
    /// Selects the bits of a virtual address that form the virtual page number.
    pub vpn_mask: u32,
    /// The amount to shift a masked virtual address right by to obtain the virtual page number.
    pub shift: u32,
    /// The amount to shift a frame number left by when rebuilding a physical address.
    pub pfn_shift: u32,
    /// Selects the bits of a virtual address that form the in-page offset.
    pub offset_mask: u32,
}

impl Layout {
    /// Compute the [Layout] for a page size.
    ///
    /// The page size is not validated here; it must be a power of two in `1..=4096`, which
    /// [Geometry::new] guarantees.
    pub fn compute(page_size: u32) -> Self {
        let page_size_bits = page_size.trailing_zeros();

        // A page size of one leaves no offset bits at all. Shifting a u32 by 32 is not defined,
        // so an empty mask is produced explicitly in that case.
        let offset_mask = u32::MAX.checked_shr(u32::BITS - page_size_bits).unwrap_or(0);
        let vpn_mask = (u32::MAX >> page_size_bits) << page_size_bits;

        Self {
            page_size_bits,
            vpn_mask,
            shift: page_size_bits,
            pfn_shift: page_size_bits,
            offset_mask,
        }
    }

    /// Extract the virtual page number from a virtual address.
    #[inline(always)]
    pub fn vpn(&self, address: VirtualAddress) -> Vpn {
        (address & self.vpn_mask) >> self.shift
    }

    /// Extract the in-page offset from a virtual address.
    #[inline(always)]
    pub fn offset(&self, address: VirtualAddress) -> u32 {
        address & self.offset_mask
    }
}
