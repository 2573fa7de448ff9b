//! The `dump` subcommand for the swmmu binary

use super::{GeometryArgs, SubcommandDispatcher};
use anyhow::{ensure, Result};
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use swmmu_core::{Mmu, PageTableEntry};

/// Command line arguments for `swmmu dump`
#[derive(Args, Debug)]
#[command(author, version, about)]
pub(crate) struct DumpArgs {
    #[command(flatten)]
    geometry: GeometryArgs,

    /// The first page table index to print.
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// The number of entries to print.
    #[arg(long, default_value_t = 16)]
    count: usize,
}

/// A single page table entry, as printed by `swmmu dump`.
#[derive(Serialize, Debug)]
struct EntryRecord {
    index: usize,
    raw: String,
    pfn: u32,
    valid: bool,
    access: bool,
}

impl EntryRecord {
    fn new(index: usize, entry: &PageTableEntry) -> Self {
        Self {
            index,
            raw: format!("{:#010x}", entry.raw()),
            pfn: entry.pfn(),
            valid: entry.is_valid(),
            access: entry.is_accessible(),
        }
    }
}

impl DumpArgs {
    /// Writes the requested window of the page table as JSON to `out`.
    fn render<W: Write>(&self, mut out: W) -> Result<()> {
        let mmu = Mmu::new(self.geometry.address_space_bits, self.geometry.page_size)?;
        let table = mmu.table();
        ensure!(
            self.start < table.len(),
            "Start index {} is beyond the page table ({} entries)",
            self.start,
            table.len()
        );

        tracing::info!(
            target: "swmmu-cli::dump",
            "Dumping {} entries from index {}",
            self.count,
            self.start
        );
        let records = table
            .iter()
            .enumerate()
            .skip(self.start)
            .take(self.count)
            .map(|(i, e)| EntryRecord::new(i, e))
            .collect::<Vec<_>>();

        serde_json::to_writer_pretty(&mut out, &records)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}

impl SubcommandDispatcher for DumpArgs {
    fn dispatch(self) -> Result<()> {
        self.render(io::stdout().lock())
    }
}
