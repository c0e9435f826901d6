//! Field parsers, one per named range shape.
//!
//! Every parser is total: an absent range yields the shape's empty value and
//! a malformed row or cell is skipped. Nothing here returns an error.

use crate::normalize::{looks_like_name, lowercase, trim};
use crate::types::{CellGrid, HealAssignRow, SlotMap};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Highest kick rotation slot
pub const MAX_KICK_SLOT: u8 = 5;

/// Highest raid group number
pub const MAX_GROUP: u8 = 8;

/// Rows read from the HealAssign table
pub const MAX_HEAL_ASSIGN_ROWS: usize = 8;

// "1", "G2", "grp 3", "Group 4"; the digit must not run into an ASCII word char
static KICK_LEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:g|grp|group)?\s*([1-5])(?:[^0-9A-Za-z_]|$)").expect("valid kick pattern")
});

// "1st kick", "2 kick" (matched against the lowercased cell)
static KICK_ORDINAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)([1-5])(?:st|nd|rd|th)?\s*kick(?:[^0-9A-Za-z_]|$)").expect("valid kick pattern")
});

// "kick 3", "kick3"
static KICK_TRAILING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"kick\s*([1-5])(?:[^0-9A-Za-z_]|$)").expect("valid kick pattern"));

static GROUP_PREFIXED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:g|grp|group)?\s*([1-8])(?:[^0-9A-Za-z_]|$)").expect("valid group pattern")
});

static GROUP_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-8]$").expect("valid group pattern"));

/// Names from any grid shape, flattened row-major
pub fn read_list(grid: Option<&CellGrid>) -> Vec<String> {
    let Some(grid) = grid else {
        return Vec::new();
    };

    grid.cells()
        .map(|cell| trim(cell))
        .filter(|cell| {
            let keep = looks_like_name(cell.as_str());
            if !keep && !cell.is_empty() {
                debug!(cell = %cell, "skipping non-name cell");
            }
            keep
        })
        .collect()
}

/// First name in the grid, or an empty string
pub fn read_single(grid: Option<&CellGrid>) -> String {
    read_list(grid).into_iter().next().unwrap_or_default()
}

/// Kick rotation: slot 1..5 -> name.
///
/// Accepts one column (row order is the slot) or two columns `[index, name]`
/// where the index cell can read "1", "G1", "1st Kick" or "Kick 1". An
/// explicit index in the first column always wins over row position. When
/// two rows claim the same slot the later row wins.
pub fn read_kicks(grid: Option<&CellGrid>) -> SlotMap {
    let mut slots = SlotMap::new();
    let Some(grid) = grid else {
        return slots;
    };
    let single_column = grid.width() == 1;

    for (row, cells) in grid.rows().iter().enumerate() {
        let left = trim(cells.first().map(String::as_str));
        let right = if single_column {
            String::new()
        } else {
            trim(cells.get(1).map(String::as_str))
        };

        let slot = kick_slot(&left).or_else(|| {
            // Plain list: row order is the slot
            if single_column {
                u8::try_from(row + 1).ok()
            } else {
                None
            }
        });
        let name = if single_column { left } else { right };

        match slot {
            Some(slot) if (1..=MAX_KICK_SLOT).contains(&slot) && looks_like_name(name.as_str()) => {
                if let Some(previous) = slots.insert(slot, name) {
                    debug!(slot, previous = %previous, "kick slot overwritten by later row");
                }
            }
            _ => debug!(row = row + 1, "skipping kick row"),
        }
    }

    slots
}

/// Explicit slot number in a kick index cell
fn kick_slot(cell: &str) -> Option<u8> {
    let lc = lowercase(cell);
    KICK_LEADING
        .captures(cell)
        .or_else(|| KICK_ORDINAL.captures(&lc))
        .or_else(|| KICK_TRAILING.captures(&lc))
        .and_then(|caps| caps.get(1))
        .and_then(|digit| digit.as_str().parse().ok())
}

/// Raid group -> name map (AI, Fort, Shadow, Heals).
///
/// Two or more columns: `[group, name]` with the group written as `3`, `G3`,
/// `Grp 3` or `Group 3`. One column: the first eight rows are groups 1..8.
pub fn read_group_map(grid: Option<&CellGrid>) -> SlotMap {
    let mut groups = SlotMap::new();
    let Some(grid) = grid else {
        return groups;
    };

    if grid.width() >= 2 {
        for cells in grid.rows() {
            let group = group_number(&cells[0]);
            let name = trim(cells[1].as_str());
            match group {
                Some(group) if looks_like_name(name.as_str()) => {
                    groups.insert(group, name);
                }
                _ => debug!(group_cell = %cells[0], name = %name, "skipping group row"),
            }
        }
    } else {
        for (row, cells) in grid.rows().iter().take(usize::from(MAX_GROUP)).enumerate() {
            let name = trim(cells.first().map(String::as_str));
            if looks_like_name(name.as_str()) {
                // row < MAX_GROUP, so this always fits
                groups.insert(row as u8 + 1, name);
            }
        }
    }

    groups
}

/// Group number 1..8 from a group cell
fn group_number(cell: &str) -> Option<u8> {
    let t = trim(cell);
    GROUP_PREFIXED
        .captures(&t)
        .and_then(|caps| caps.get(1))
        .map(|digit| digit.as_str())
        .or_else(|| GROUP_BARE.find(&t).map(|m| m.as_str()))
        .and_then(|digit| digit.parse().ok())
}

/// Tank/healer assignment table.
///
/// Only the first eight rows are read. A row is kept when its tank cell is a
/// name. Healer cells are copied trimmed, without name validation.
pub fn read_heal_assign(grid: Option<&CellGrid>) -> Vec<HealAssignRow> {
    let Some(grid) = grid else {
        return Vec::new();
    };

    grid.rows()
        .iter()
        .take(MAX_HEAL_ASSIGN_ROWS)
        .filter_map(|cells| {
            let column = |idx: usize| trim(cells.get(idx).map(String::as_str));
            let tank = column(0);
            if !looks_like_name(tank.as_str()) {
                debug!(tank = %tank, "skipping heal assignment row without a tank");
                return None;
            }
            Some(HealAssignRow::new(tank, column(1), column(2)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kick_slot_patterns() {
        assert_eq!(kick_slot("1"), Some(1));
        assert_eq!(kick_slot("G2"), Some(2));
        assert_eq!(kick_slot("grp 3"), Some(3));
        assert_eq!(kick_slot("Group 4"), Some(4));
        assert_eq!(kick_slot("1st Kick"), Some(1));
        assert_eq!(kick_slot("3rd kick"), Some(3));
        assert_eq!(kick_slot("Kick 5"), Some(5));
        assert_eq!(kick_slot("kick5"), Some(5));
        assert_eq!(kick_slot("Kick 6"), None);
        assert_eq!(kick_slot("6"), None);
        assert_eq!(kick_slot("Alice"), None);
        assert_eq!(kick_slot(""), None);
    }

    #[test]
    fn test_kick_slot_requires_boundary() {
        // "12" is not slot 1
        assert_eq!(kick_slot("12"), None);
    }

    #[test]
    fn test_group_number_patterns() {
        assert_eq!(group_number("1"), Some(1));
        assert_eq!(group_number(" 8 "), Some(8));
        assert_eq!(group_number("G3"), Some(3));
        assert_eq!(group_number("grp7"), Some(7));
        assert_eq!(group_number("Group 2"), Some(2));
        assert_eq!(group_number("9"), None);
        assert_eq!(group_number("0"), None);
        assert_eq!(group_number("G9"), None);
        assert_eq!(group_number("Raid"), None);
    }
}
