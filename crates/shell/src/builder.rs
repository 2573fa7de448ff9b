//! The [SessionBuilder] struct is a helper for building a [Session] struct.

use crate::{session::DEFAULT_PROMPT, Session};
use anyhow::{anyhow, Result};
use swmmu_core::Mmu;

/// The [SessionBuilder] struct is a helper for building a [Session] struct.
#[derive(Default, Debug)]
pub struct SessionBuilder {
    /// The width of the simulated address space in bits.
    address_space_bits: Option<u32>,
    /// The page size in bytes.
    page_size: Option<u32>,
    /// Whether to print the lookup trace of every translation.
    trace: bool,
    /// The prompt printed before reading each address.
    prompt: Option<String>,
}

impl SessionBuilder {
    /// Builds the [Session] struct from the information contained within the [SessionBuilder].
    ///
    /// The page table is allocated and initialized here; an invalid configuration or a failed
    /// allocation is reported before any input is read.
    pub fn build(self) -> Result<Session> {
        let address_space_bits =
            self.address_space_bits.ok_or(anyhow!("Missing address space size"))?;
        let page_size = self.page_size.ok_or(anyhow!("Missing page size"))?;

        tracing::info!(
            target: "swmmu::shell",
            "Building MMU with a {} bit address space and {} byte pages",
            address_space_bits,
            page_size
        );
        let mmu = Mmu::new(address_space_bits, page_size)?;

        Ok(Session {
            mmu,
            trace: self.trace,
            prompt: self.prompt.unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
        })
    }

    pub fn with_address_space_bits(mut self, address_space_bits: u32) -> Self {
        self.address_space_bits = Some(address_space_bits);
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_prompt(mut self, prompt: Option<String>) -> Self {
        self.prompt = prompt;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use swmmu_core::ConfigError;

    #[test]
    fn build_requires_geometry() {
        assert!(SessionBuilder::default().with_page_size(4096).build().is_err());
        assert!(SessionBuilder::default().with_address_space_bits(32).build().is_err());
    }

    #[test]
    fn build_rejects_invalid_configuration() {
        let err = SessionBuilder::default()
            .with_address_space_bits(32)
            .with_page_size(1000)
            .build()
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::PageSizeNotPowerOfTwo(1000))
        );
    }

    #[test]
    fn build_defaults() {
        let session = SessionBuilder::default()
            .with_address_space_bits(16)
            .with_page_size(256)
            .build()
            .unwrap();
        assert_eq!(session.mmu().table().len(), 256);
        assert_eq!(session.prompt, DEFAULT_PROMPT);
        assert!(!session.trace);
    }
}
