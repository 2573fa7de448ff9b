//! Subcommands for the `swmmu` binary

use anyhow::Result;
use clap::{value_parser, Args, Subcommand};

mod dump;
mod layout;
mod repl;
mod translate;

pub(crate) trait SubcommandDispatcher {
    /// Dispatches the subcommand
    fn dispatch(self) -> Result<()>;
}

/// The subcommands for the `swmmu` binary
#[derive(Subcommand, Debug)]
pub(crate) enum SwmmuSubcommand {
    /// Translate virtual addresses read interactively from stdin
    Repl(repl::ReplArgs),
    /// Translate the given virtual addresses and exit
    Translate(translate::TranslateArgs),
    /// Print the geometry and layout constants as JSON
    Layout(layout::LayoutArgs),
    /// Print a window of the initialized page table as JSON
    Dump(dump::DumpArgs),
}

impl SubcommandDispatcher for SwmmuSubcommand {
    fn dispatch(self) -> Result<()> {
        match self {
            SwmmuSubcommand::Repl(args) => args.dispatch(),
            SwmmuSubcommand::Translate(args) => args.dispatch(),
            SwmmuSubcommand::Layout(args) => args.dispatch(),
            SwmmuSubcommand::Dump(args) => args.dispatch(),
        }
    }
}

/// The address space configuration shared by every subcommand.
#[derive(Args, Debug, Clone, Copy)]
pub(crate) struct GeometryArgs {
    /// The size of the virtual address space in bits (1-32).
    #[arg(value_parser = value_parser!(u32).range(1..=32))]
    pub(crate) address_space_bits: u32,

    /// The page size in bytes. A power of two between 1 and 4096.
    #[arg(value_parser = value_parser!(u32).range(1..=4096))]
    pub(crate) page_size: u32,
}

/// Parses a hexadecimal 32 bit address, with or without a `0x` prefix.
pub(crate) fn parse_hex_address(s: &str) -> Result<u32, String> {
    swmmu_shell::parse_address(s).ok_or_else(|| format!("invalid virtual address {s:?}"))
}
