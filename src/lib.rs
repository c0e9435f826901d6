//! Raid Roster - spreadsheet named ranges to a Lua SavedVariables table
//!
//! This library reads a raid roster laid out in spreadsheet named ranges
//! (Tanks, Kicks, Heals, Pally_Kings, ...), normalizes the loosely typed
//! cells into a canonical document and writes it as a Lua table literal for
//! the RaidAnnounce addon.
//!
//! # Features
//!
//! - Tolerant cell parsing: labels like "Tanks" or "TBD" are ignored, kick
//!   slots read "1", "G1", "1st Kick" or "Kick 1"
//! - Deterministic Lua output in `Global = { ... }` and `return { ... }` forms
//! - Named ranges from YAML/JSON documents or workbook defined names (.xlsx)
//!
//! # Example
//!
//! ```no_run
//! use raid_roster::export::{ExportDocument, ExportFormat};
//! use raid_roster::source::NamedRanges;
//!
//! let ranges = NamedRanges::load("raid.xlsx")?;
//! let document = ExportDocument::assemble(&ranges);
//! print!("{}", document.render(&ExportFormat::Return));
//! # Ok::<(), raid_roster::error::RosterError>(())
//! ```

pub mod cli;
pub mod error;
pub mod export;
pub mod normalize;
pub mod parser;
pub mod source;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use error::{RosterError, RosterResult};
pub use export::{Export, ExportDocument, ExportFormat};
pub use source::{NamedRanges, RangeSource};
pub use types::{CellGrid, HealAssignRow, SlotMap};
