//! This module contains the type aliases used within this crate.

/// A [VirtualAddress] is a 32 bit address issued by the simulated process.
pub type VirtualAddress = u32;

/// A [PhysicalAddress] is the 32 bit result of a successful translation.
pub type PhysicalAddress = u32;

/// A [Vpn] is the virtual page number extracted from a [VirtualAddress]. It doubles as the index
/// of the page table entry describing the page.
pub type Vpn = u32;

/// A [Pfn] is the physical frame number stored within a page table entry.
pub type Pfn = u32;
