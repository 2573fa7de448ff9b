//! The `swmmu` binary: a software-managed MMU simulator.

use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser};
use subcommands::{SubcommandDispatcher, SwmmuSubcommand};
use tracing::Level;

mod subcommands;

/// Command line arguments for `swmmu`
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Verbosity level (0-3). Logs are written to stderr.
    #[arg(long = "verbose", short = 'v', action = ArgAction::Count)]
    verbosity: u8,

    /// The subcommand to run.
    #[command(subcommand)]
    subcommand: SwmmuSubcommand,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing_subscriber(args.verbosity)?;
    args.subcommand.dispatch()
}

/// Initializes the tracing subscriber
///
/// # Arguments
/// * `verbosity_level` - The verbosity level (0-3)
///
/// # Returns
/// * `Result<()>` - Ok if successful, Err otherwise.
fn init_tracing_subscriber(verbosity_level: u8) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(match verbosity_level {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(|e| anyhow!(e))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_translate_args() {
        let args =
            Args::try_parse_from(["swmmu", "-vv", "translate", "32", "4096", "1000", "0x2010"])
                .unwrap();
        assert_eq!(args.verbosity, 2);
        assert!(matches!(args.subcommand, SwmmuSubcommand::Translate(_)));
    }

    #[test]
    fn reject_out_of_range_geometry() {
        assert!(Args::try_parse_from(["swmmu", "layout", "0", "4096"]).is_err());
        assert!(Args::try_parse_from(["swmmu", "layout", "33", "4096"]).is_err());
        assert!(Args::try_parse_from(["swmmu", "layout", "32", "8192"]).is_err());
        assert!(Args::try_parse_from(["swmmu", "repl", "32", "4096", "--no-trace"]).is_ok());
    }

    #[test]
    fn reject_bad_addresses() {
        assert!(Args::try_parse_from(["swmmu", "translate", "32", "4096", "xyz"]).is_err());
        assert!(Args::try_parse_from(["swmmu", "translate", "32", "4096"]).is_err());
        for bad in ["+142", "", "0x", "0x+1", "100000000"] {
            assert!(
                Args::try_parse_from(["swmmu", "translate", "16", "256", bad]).is_err(),
                "{bad:?} should be rejected"
            );
        }
        assert!(Args::try_parse_from(["swmmu", "translate", "16", "256", "0x142"]).is_ok());
    }
}
