//! Export assembler
//!
//! Reads every expected named range from a [`RangeSource`], runs the field
//! parsers and nests the results into one [`ExportDocument`]. The document
//! renders as a Lua table in two wrappers that share a byte-identical body:
//!
//! ```text
//! MyRaidData = {          return {
//!   groups = { },           groups = { },
//!   ...                     ...
//! }                       }
//! ```

use crate::parser::{read_group_map, read_heal_assign, read_kicks, read_list, read_single, MAX_KICK_SLOT};
use crate::source::RangeSource;
use crate::types::{self, HealAssignRow, SlotMap};
use crate::writer::{render_heal_assign, render_list, render_numeric_map, render_string_map};
use serde::Serialize;
use tracing::debug;

/// Global variable assigned by the default export
pub const DEFAULT_GLOBAL_NAME: &str = "MyRaidData";

/// Which wrapper to put around the document body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportFormat {
    /// `<global> = { ... }`, for SavedVariables files
    Assign(String),
    /// `return { ... }`, for `loadstring`/`dofile` style loaders
    Return,
}

impl Default for ExportFormat {
    fn default() -> Self {
        ExportFormat::Assign(DEFAULT_GLOBAL_NAME.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PallyBuffs {
    pub might_wisdom: String,
    pub kings: String,
    pub light: String,
    pub salv_sanct: String,
}

impl PallyBuffs {
    fn entries(&self) -> [(&'static str, &str); 4] {
        [
            ("might_wisdom", self.might_wisdom.as_str()),
            ("kings", self.kings.as_str()),
            ("light", self.light.as_str()),
            ("salv_sanct", self.salv_sanct.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Buffs {
    pub pally: PallyBuffs,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Debuffs {
    pub recklessness: String,
    pub elements: String,
    pub shadows: String,
    pub demo_shout: String,
    pub thunderclap: String,
}

impl Debuffs {
    fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("recklessness", self.recklessness.as_str()),
            ("elements", self.elements.as_str()),
            ("shadows", self.shadows.as_str()),
            ("demo_shout", self.demo_shout.as_str()),
            ("thunderclap", self.thunderclap.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Priests {
    pub fort: SlotMap,
    pub shadow: SlotMap,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Mages {
    pub ai: SlotMap,
}

/// Everything the addon receives, in export order.
///
/// `groups` is reserved by the addon and always exported empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportDocument {
    pub groups: SlotMap,
    pub buffs: Buffs,
    pub debuffs: Debuffs,
    pub priests: Priests,
    pub mages: Mages,
    pub kicks: SlotMap,
    pub tranq: Vec<String>,
    pub fear_ward: Vec<String>,
    pub heals: SlotMap,
    pub heal_assign: Vec<HealAssignRow>,
    pub tanks: Vec<String>,
}

/// Both renderings of one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub assign: String,
    pub return_form: String,
}

impl ExportDocument {
    /// Read and parse every expected named range. Missing ranges are empty.
    pub fn assemble<S: RangeSource + ?Sized>(source: &S) -> Self {
        let grid = |name: &str| {
            let grid = source.display_values(name);
            if grid.is_none() {
                debug!(range = name, "named range not found");
            }
            grid
        };

        let document = Self {
            groups: SlotMap::new(),
            buffs: Buffs {
                pally: PallyBuffs {
                    might_wisdom: read_single(grid(types::PALLY_MIGHT_WISDOM).as_ref()),
                    kings: read_single(grid(types::PALLY_KINGS).as_ref()),
                    light: read_single(grid(types::PALLY_LIGHT).as_ref()),
                    salv_sanct: read_single(grid(types::PALLY_SALV_SANCT).as_ref()),
                },
            },
            debuffs: Debuffs {
                recklessness: read_single(grid(types::DEBUFF_RECKLESSNESS).as_ref()),
                elements: read_single(grid(types::DEBUFF_ELEMENTS).as_ref()),
                shadows: read_single(grid(types::DEBUFF_SHADOWS).as_ref()),
                demo_shout: read_single(grid(types::DEBUFF_DEMO_SHOUT).as_ref()),
                thunderclap: read_single(grid(types::DEBUFF_THUNDERCLAP).as_ref()),
            },
            priests: Priests {
                fort: read_group_map(grid(types::FORT).as_ref()),
                shadow: read_group_map(grid(types::SHADOW).as_ref()),
            },
            mages: Mages {
                ai: read_group_map(grid(types::AI).as_ref()),
            },
            kicks: read_kicks(grid(types::KICKS).as_ref()),
            tranq: read_list(grid(types::TRANQ).as_ref()),
            fear_ward: read_list(grid(types::FEAR_WARD).as_ref()),
            heals: read_group_map(grid(types::HEALS).as_ref()),
            heal_assign: read_heal_assign(grid(types::HEAL_ASSIGN).as_ref()),
            tanks: read_list(grid(types::TANKS).as_ref()),
        };

        debug!(
            tanks = document.tanks.len(),
            kicks = document.kicks.len(),
            heal_assign = document.heal_assign.len(),
            "assembled export document"
        );
        document
    }

    /// Kick slots 1..5, empty string for unassigned slots
    pub fn kick_slots(&self) -> SlotMap {
        (1..=MAX_KICK_SLOT)
            .map(|slot| (slot, self.kicks.get(&slot).cloned().unwrap_or_default()))
            .collect()
    }

    /// Table body shared by both wrappers, one field per line
    pub fn render_body(&self) -> String {
        let mut body = String::new();
        let mut field = |line: String| {
            body.push_str("  ");
            body.push_str(&line);
            body.push_str(",\n");
        };

        field("groups = { }".to_string());
        field(format!(
            "buffs = {{ pally = {} }}",
            render_string_map(&self.buffs.pally.entries())
        ));
        field(format!("debuffs = {}", render_string_map(&self.debuffs.entries())));
        field(format!(
            "priests = {{ fort = {}, shadow = {} }}",
            render_numeric_map(&self.priests.fort),
            render_numeric_map(&self.priests.shadow)
        ));
        field(format!("mages   = {{ ai = {} }}", render_numeric_map(&self.mages.ai)));
        field(format!("kicks = {}", render_numeric_map(&self.kick_slots())));
        field(format!("tranq = {}", render_list(&self.tranq)));
        field(format!("fear_ward = {}", render_list(&self.fear_ward)));
        field(format!("heals = {}", render_numeric_map(&self.heals)));
        field(format!("heal_assign = {}", render_heal_assign(&self.heal_assign)));
        field(format!("tanks = {}", render_list(&self.tanks)));

        body
    }

    pub fn render(&self, format: &ExportFormat) -> String {
        wrap(&self.render_body(), format)
    }

    /// Render both wrappers from a single body
    pub fn export(&self, global_name: &str) -> Export {
        let body = self.render_body();
        Export {
            assign: wrap(&body, &ExportFormat::Assign(global_name.to_string())),
            return_form: wrap(&body, &ExportFormat::Return),
        }
    }
}

fn wrap(body: &str, format: &ExportFormat) -> String {
    match format {
        ExportFormat::Assign(global) => format!("{} = {{\n{}}}\n", global, body),
        ExportFormat::Return => format!("return {{\n{}}}\n", body),
    }
}
