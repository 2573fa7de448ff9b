//! The `layout` subcommand for the swmmu binary

use super::{GeometryArgs, SubcommandDispatcher};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use swmmu_core::{Geometry, Layout, PFN_POSITION};

/// Command line arguments for `swmmu layout`
#[derive(Args, Debug)]
#[command(author, version, about)]
pub(crate) struct LayoutArgs {
    #[command(flatten)]
    geometry: GeometryArgs,
}

/// The geometry and layout of an address space, as printed by `swmmu layout`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct LayoutReport {
    geometry: Geometry,
    num_ptes: u64,
    pfn_position: u32,
    layout: Layout,
}

impl LayoutArgs {
    /// Writes the layout report as JSON to `out`.
    fn render<W: Write>(&self, mut out: W) -> Result<()> {
        let geometry = Geometry::new(self.geometry.address_space_bits, self.geometry.page_size)?;
        let report = LayoutReport {
            geometry,
            num_ptes: geometry.num_ptes(),
            pfn_position: PFN_POSITION,
            layout: geometry.layout(),
        };

        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}

impl SubcommandDispatcher for LayoutArgs {
    fn dispatch(self) -> Result<()> {
        self.render(io::stdout().lock())
    }
}
