//! An interactive, line-oriented translation session on top of the [swmmu_core::Mmu].

mod builder;
pub use builder::SessionBuilder;

mod session;
pub use session::{parse_address, Command, Session, SessionSummary, BANNER, DEFAULT_PROMPT};
