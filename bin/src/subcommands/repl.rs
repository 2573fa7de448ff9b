//! The `repl` subcommand for the swmmu binary

use super::{GeometryArgs, SubcommandDispatcher};
use anyhow::Result;
use clap::Args;
use std::io;
use swmmu_shell::SessionBuilder;

/// Command line arguments for `swmmu repl`
#[derive(Args, Debug)]
#[command(author, version, about)]
pub(crate) struct ReplArgs {
    #[command(flatten)]
    geometry: GeometryArgs,

    /// Do not print the page table lookup trace of each translation.
    #[arg(long)]
    no_trace: bool,

    /// Replace the prompt printed before each address.
    #[arg(long)]
    prompt: Option<String>,
}

impl SubcommandDispatcher for ReplArgs {
    fn dispatch(self) -> Result<()> {
        let session = SessionBuilder::default()
            .with_address_space_bits(self.geometry.address_space_bits)
            .with_page_size(self.geometry.page_size)
            .with_trace(!self.no_trace)
            .with_prompt(self.prompt)
            .build()?;

        tracing::info!(target: "swmmu-cli::repl", "Starting session: {:?}", session.mmu());
        let summary = session.run(io::stdin().lock(), io::stdout().lock())?;
        tracing::info!(target: "swmmu-cli::repl", "Translated {} addresses", summary.translations);

        Ok(())
    }
}
