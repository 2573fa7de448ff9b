//! This module contains the [Session] struct and its associated methods.

use anyhow::Result;
use std::io::{BufRead, Write};
use swmmu_core::{
    types::{PhysicalAddress, VirtualAddress},
    Fault, Mmu, TranslationResult,
};

/// Printed once when a session starts.
pub const BANNER: &str = "Welcome to Software-managed MMU";

/// Printed before reading each address.
pub const DEFAULT_PROMPT: &str =
    "Input a virtual address of hexadecimal value without \"0x\" (-1 to exit): ";

/// Tokens that end a session.
const EXIT_TOKENS: [&str; 4] = ["-1", "q", "quit", "exit"];

/// A single parsed line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Translate a virtual address.
    Translate(VirtualAddress),
    /// Nothing to do; read the next line.
    Skip,
    /// End the session.
    Exit,
    /// The line could not be understood. Ends the session.
    Invalid(String),
}

impl Command {
    /// Parse a line of input. Addresses are hexadecimal, with or without a `0x` prefix.
    pub fn parse(line: &str) -> Self {
        let token = line.trim();
        if token.is_empty() {
            return Command::Skip;
        }
        if EXIT_TOKENS.iter().any(|t| token.eq_ignore_ascii_case(t)) {
            return Command::Exit;
        }

        match parse_address(token) {
            Some(address) => Command::Translate(address),
            None => Command::Invalid(token.to_string()),
        }
    }
}

/// Parse a 32 bit hexadecimal virtual address, with or without a `0x` prefix.
///
/// Only hex digits are accepted after the prefix; signs, whitespace and empty digit strings are
/// rejected.
pub fn parse_address(token: &str) -> Option<VirtualAddress> {
    let digits = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")).unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Counters describing a finished [Session].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// The number of addresses translated.
    pub translations: u64,
    /// Translations that produced a physical address.
    pub successes: u64,
    /// Translations that hit an invalid entry.
    pub not_valid: u64,
    /// Translations that hit an inaccessible entry.
    pub not_accessible: u64,
    /// Translations whose page number lay beyond the table.
    pub out_of_range: u64,
}

impl SessionSummary {
    fn record(&mut self, result: &TranslationResult<PhysicalAddress>) {
        self.translations += 1;
        match result {
            Ok(_) => self.successes += 1,
            Err(Fault::NotValid { .. }) => self.not_valid += 1,
            Err(Fault::NotAccessible { .. }) => self.not_accessible += 1,
            Err(Fault::OutOfRange { .. }) => self.out_of_range += 1,
        }
    }
}

/// The [Session] struct reads virtual addresses line by line and reports their translation
/// against the [Mmu] it owns.
#[derive(Debug)]
pub struct Session {
    /// The MMU answering the queries.
    pub(crate) mmu: Mmu,
    /// Whether to print the lookup trace of every translation.
    pub(crate) trace: bool,
    /// The prompt printed before reading each address.
    pub(crate) prompt: String,
}

impl Session {
    /// Returns the [Mmu] owned by the session.
    pub fn mmu(&self) -> &Mmu {
        &self.mmu
    }

    /// Run the session until the input is exhausted, an exit token is read, or a line cannot be
    /// parsed.
    ///
    /// ## Takes
    /// - `input`: The source of virtual addresses, one per line.
    /// - `output`: The sink for the banner, prompts and results.
    ///
    /// ## Returns
    /// - `Ok(summary)` once the session ends.
    /// - `Err(_)` if reading the input or writing the output fails.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        let mut line = String::new();

        writeln!(output, "{BANNER}")?;
        loop {
            write!(output, "{}", self.prompt)?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break;
            }

            match Command::parse(&line) {
                Command::Translate(address) => {
                    let walk = self.mmu.walk(address);
                    summary.record(&walk.result);

                    write!(output, "Virtual address: {}", c_hex(address))?;
                    if self.trace {
                        write!(output, " {} ", walk.trace)?;
                    }
                    match walk.result {
                        Ok(physical) => {
                            writeln!(output, " -> Physical address: {}", c_hex(physical))?
                        }
                        Err(fault) => {
                            tracing::debug!(
                                target: "swmmu::shell",
                                "{} at vpn {}",
                                fault,
                                fault.vpn()
                            );
                            match fault {
                                Fault::NotValid { .. } => {
                                    writeln!(output, " -> Segmentation Fault.")?
                                }
                                Fault::NotAccessible { .. } => {
                                    writeln!(output, " -> Protection Fault.")?
                                }
                                Fault::OutOfRange { .. } => writeln!(output, " -> Out of range.")?,
                            }
                        }
                    }
                }
                Command::Skip => continue,
                Command::Exit => break,
                Command::Invalid(token) => {
                    tracing::warn!(
                        target: "swmmu::shell",
                        "Unparsable input {:?}, ending session",
                        token
                    );
                    writeln!(output, "Invalid virtual address: {token}")?;
                    break;
                }
            }
        }
        output.flush()?;

        tracing::info!(
            target: "swmmu::shell",
            "Session ended after {} translations ({} ok, {} segmentation, {} protection, {} out of range)",
            summary.translations,
            summary.successes,
            summary.not_valid,
            summary.not_accessible,
            summary.out_of_range
        );

        Ok(summary)
    }
}

/// Format a value the way C's `%#x` does: `0x`-prefixed lowercase hex, except for zero.
fn c_hex(value: u32) -> String {
    if value == 0 {
        "0".to_string()
    } else {
        format!("{value:#x}")
    }
}
