//! The `translate` subcommand for the swmmu binary

use super::{parse_hex_address, GeometryArgs, SubcommandDispatcher};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::io::{self, Write};
use swmmu_core::{Fault, Mmu, Walk};

/// Command line arguments for `swmmu translate`
#[derive(Args, Debug)]
#[command(author, version, about)]
pub(crate) struct TranslateArgs {
    #[command(flatten)]
    geometry: GeometryArgs,

    /// The hexadecimal virtual addresses to translate.
    #[arg(required = true, value_parser = parse_hex_address)]
    addresses: Vec<u32>,

    /// Print the results as a JSON array.
    #[arg(long)]
    json: bool,
}

/// A single translation result, as printed by `--json`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TranslationRecord {
    virtual_address: String,
    vpn: u32,
    pfn: Option<u32>,
    valid: Option<bool>,
    access: Option<bool>,
    physical_address: Option<String>,
    fault: Option<&'static str>,
}

impl From<Walk> for TranslationRecord {
    fn from(walk: Walk) -> Self {
        let entry = walk.trace.entry;
        Self {
            virtual_address: format!("{:#010x}", walk.trace.virtual_address),
            vpn: walk.trace.vpn,
            pfn: entry.map(|e| e.pfn()),
            valid: entry.map(|e| e.is_valid()),
            access: entry.map(|e| e.is_accessible()),
            physical_address: walk.result.ok().map(|pa| format!("{pa:#010x}")),
            fault: walk.result.err().map(|f| match f {
                Fault::NotValid { .. } => "notValid",
                Fault::NotAccessible { .. } => "notAccessible",
                Fault::OutOfRange { .. } => "outOfRange",
            }),
        }
    }
}

impl TranslateArgs {
    /// Translates every address and writes the results to `out`.
    fn render<W: Write>(&self, mut out: W) -> Result<()> {
        let mmu = Mmu::new(self.geometry.address_space_bits, self.geometry.page_size)?;
        tracing::info!(
            target: "swmmu-cli::translate",
            "Translating {} addresses with {:?}",
            self.addresses.len(),
            mmu
        );

        let walks = self.addresses.iter().map(|va| mmu.walk(*va));
        if self.json {
            let records = walks.map(TranslationRecord::from).collect::<Vec<_>>();
            serde_json::to_writer_pretty(&mut out, &records)?;
            writeln!(out)?;
        } else {
            for walk in walks {
                let va = walk.trace.virtual_address;
                match walk.result {
                    Ok(pa) => writeln!(out, "{va:#010x} {} -> {pa:#010x}", walk.trace)?,
                    Err(fault) => writeln!(out, "{va:#010x} {} -> {fault}", walk.trace)?,
                }
            }
        }

        out.flush()?;
        Ok(())
    }
}

impl SubcommandDispatcher for TranslateArgs {
    fn dispatch(self) -> Result<()> {
        self.render(io::stdout().lock())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::{json, Value};

    fn args(json: bool) -> TranslateArgs {
        TranslateArgs {
            geometry: GeometryArgs { address_space_bits: 16, page_size: 256 },
            addresses: vec![0x0, 0x142, 0xFFFF, 0x10000],
            json,
        }
    }

    fn render(args: &TranslateArgs) -> String {
        let mut out = Vec::new();
        args.render(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn json_records() {
        let value: Value = serde_json::from_str(&render(&args(true))).unwrap();
        assert_eq!(
            value,
            json!([
                {
                    "virtualAddress": "0x00000000", "vpn": 0, "pfn": 0, "valid": true,
                    "access": false, "physicalAddress": null, "fault": "notAccessible"
                },
                {
                    "virtualAddress": "0x00000142", "vpn": 1, "pfn": 2, "valid": true,
                    "access": true, "physicalAddress": "0x00000242", "fault": null
                },
                {
                    "virtualAddress": "0x0000ffff", "vpn": 255, "pfn": 0, "valid": false,
                    "access": false, "physicalAddress": null, "fault": "notValid"
                },
                {
                    "virtualAddress": "0x00010000", "vpn": 256, "pfn": null, "valid": null,
                    "access": null, "physicalAddress": null, "fault": "outOfRange"
                },
            ])
        );
    }

    #[test]
    fn text_lines() {
        let output = render(&args(false));
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                "0x00000000 (vpn:0, pfn: 0, valid: 1, access: 0) -> Protection Fault",
                "0x00000142 (vpn:1, pfn: 2, valid: 1, access: 1) -> 0x00000242",
                "0x0000ffff (vpn:255, pfn: 0, valid: 0, access: 0) -> Segmentation Fault",
                "0x00010000 (vpn:256, out of range) -> Out of range (vpn 256 >= 256 entries)",
            ]
        );
    }

    #[test]
    fn invalid_geometry_is_reported() {
        let args = TranslateArgs {
            geometry: GeometryArgs { address_space_bits: 32, page_size: 1000 },
            addresses: vec![0],
            json: false,
        };
        assert!(args.render(Vec::new()).is_err());
    }
}
