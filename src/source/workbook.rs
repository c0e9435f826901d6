//! Workbook importer - defined names (.xlsx, .xlsm, .xlsb, .xls, .ods) → named ranges

use crate::error::{RosterError, RosterResult};
use crate::source::NamedRanges;
use crate::types::CellGrid;
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reads a workbook and resolves each defined name to the display values it
/// covers.
pub struct WorkbookImporter {
    path: PathBuf,
}

impl WorkbookImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Resolve all defined names.
    ///
    /// Names that do not point at a single rectangular area of an existing
    /// sheet (`#REF!`, constants, multi-area unions) are skipped with a
    /// warning.
    pub fn import(&self) -> RosterResult<NamedRanges> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            RosterError::Workbook(format!(
                "Failed to open '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        let defined_names = workbook.defined_names().to_vec();
        let mut sheets: HashMap<String, Range<Data>> = HashMap::new();
        let mut ranges = NamedRanges::new();

        for (name, formula) in defined_names {
            // Built-in names (print areas, filter ranges)
            if name.starts_with("_xlnm.") {
                debug!(name = %name, "skipping built-in defined name");
                continue;
            }

            let Some(reference) = RangeReference::parse(&formula) else {
                warn!(name = %name, formula = %formula, "defined name is not a cell range");
                continue;
            };

            if !sheets.contains_key(&reference.sheet) {
                match workbook.worksheet_range(&reference.sheet) {
                    Ok(range) => {
                        sheets.insert(reference.sheet.clone(), range);
                    }
                    Err(e) => {
                        warn!(name = %name, sheet = %reference.sheet, error = %e, "sheet not readable");
                        continue;
                    }
                }
            }

            if let Some(sheet) = sheets.get(&reference.sheet) {
                let grid = reference.read(sheet);
                debug!(
                    name = %name,
                    rows = grid.height(),
                    cols = grid.width(),
                    "resolved defined name"
                );
                ranges.insert(name, grid);
            }
        }

        Ok(ranges)
    }
}

/// One end of an A1 reference. Whole-column (`$A`) and whole-row (`$3`)
/// references leave the other coordinate open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRef {
    row: Option<u32>,
    col: Option<u32>,
}

/// A single-area reference such as `'Raid Plan'!$B$2:$C$9`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeReference {
    pub sheet: String,
    start: CellRef,
    end: CellRef,
}

impl RangeReference {
    /// Parse the formula text of a defined name. A leading `=` is tolerated.
    ///
    /// Accepts the A1 form written by Excel (`'Raid Plan'!$A$1:$A$5`) and the
    /// OpenDocument cell range address (`$'Raid Plan'.$A$1:.$A$5`).
    pub fn parse(formula: &str) -> Option<Self> {
        let formula = formula.trim().trim_start_matches('=');
        Self::parse_a1(formula).or_else(|| Self::parse_ods(formula))
    }

    fn parse_a1(formula: &str) -> Option<Self> {
        let bang = formula.rfind('!')?;
        let (sheet, area) = (&formula[..bang], &formula[bang + 1..]);

        let sheet = match sheet.strip_prefix('\'') {
            Some(quoted) => quoted.strip_suffix('\'')?.replace("''", "'"),
            None => sheet.to_string(),
        };
        if sheet.is_empty() || area.contains(',') {
            return None;
        }

        let (start, end) = match area.split_once(':') {
            Some((start, end)) => (parse_cell_ref(start)?, parse_cell_ref(end)?),
            None => {
                let cell = parse_cell_ref(area)?;
                (cell, cell)
            }
        };

        Some(Self { sheet, start, end })
    }

    /// `$Sheet.$A$1:.$B$2`; the end may repeat the sheet or leave it out
    fn parse_ods(formula: &str) -> Option<Self> {
        // Multi-area addresses are space separated
        if find_unquoted(formula, b' ').is_some() {
            return None;
        }

        let (start_text, end_text) = match find_unquoted(formula, b':') {
            Some(colon) => (&formula[..colon], Some(&formula[colon + 1..])),
            None => (formula, None),
        };

        let (sheet, start) = parse_ods_cell(start_text)?;
        let sheet = sheet?;
        let end = match end_text {
            Some(text) => {
                let (end_sheet, end) = parse_ods_cell(text)?;
                if end_sheet.is_some_and(|end_sheet| end_sheet != sheet) {
                    return None;
                }
                end
            }
            None => start,
        };

        Some(Self { sheet, start, end })
    }

    /// Absolute (first row, first col, last row, last col), zero-based.
    ///
    /// Open ends are closed against the sheet's used area, and rows below it
    /// are cut off since they can only hold blanks. Columns stay as declared
    /// so a two-column range keeps its shape. `None` when the sheet is empty
    /// or the range lies entirely below the used area.
    fn bounds(&self, sheet: &Range<Data>) -> Option<(u32, u32, u32, u32)> {
        let (used_last_row, used_last_col) = sheet.end()?;

        let (first_row, last_row) = ordered(
            self.start.row.unwrap_or(0),
            self.end.row.unwrap_or(used_last_row),
        );
        let (first_col, last_col) = ordered(
            self.start.col.unwrap_or(0),
            self.end.col.unwrap_or(used_last_col),
        );

        let last_row = last_row.min(used_last_row);
        if first_row > last_row {
            return None;
        }

        Some((first_row, first_col, last_row, last_col))
    }

    /// Display values of the referenced area
    pub fn read(&self, sheet: &Range<Data>) -> CellGrid {
        let Some((first_row, first_col, last_row, last_col)) = self.bounds(sheet) else {
            return CellGrid::default();
        };

        CellGrid::new((first_row..=last_row).map(|row| {
            (first_col..=last_col)
                .map(|col| {
                    sheet
                        .get_value((row, col))
                        .map(display_value)
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>()
        }))
    }
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    (a.min(b), a.max(b))
}

/// Byte offset of the first `needle` outside single quotes
fn find_unquoted(text: &str, needle: u8) -> Option<usize> {
    let mut quoted = false;
    for (idx, byte) in text.bytes().enumerate() {
        match byte {
            b'\'' => quoted = !quoted,
            b if b == needle && !quoted => return Some(idx),
            _ => {}
        }
    }
    None
}

/// One end of an OpenDocument address: `$'Raid Plan'.$A$1`, `Sheet1.B2` or
/// `.$A$5`. Returns the sheet (when present) and the cell.
fn parse_ods_cell(text: &str) -> Option<(Option<String>, CellRef)> {
    let text = text.strip_prefix('$').unwrap_or(text);

    let (sheet, cell) = match text.strip_prefix('\'') {
        Some(quoted) => {
            let close = closing_quote(quoted)?;
            let cell = quoted[close + 1..].strip_prefix('.')?;
            (Some(quoted[..close].replace("''", "'")), cell)
        }
        None => {
            let dot = text.rfind('.')?;
            let sheet = &text[..dot];
            ((!sheet.is_empty()).then(|| sheet.to_string()), &text[dot + 1..])
        }
    };

    if sheet.as_deref() == Some("") {
        return None;
    }
    Some((sheet, parse_cell_ref(cell)?))
}

/// Index of the quote closing a quoted sheet name, skipping `''` escapes
fn closing_quote(quoted: &str) -> Option<usize> {
    let bytes = quoted.as_bytes();
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'\'' {
            if bytes.get(idx + 1) == Some(&b'\'') {
                idx += 2;
                continue;
            }
            return Some(idx);
        }
        idx += 1;
    }
    None
}

/// Cell text as the spreadsheet shows it
fn display_value(cell: &Data) -> String {
    match cell {
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}

/// `$B$12` → row 11, col 1; `$B` and `12` leave one side open
fn parse_cell_ref(text: &str) -> Option<CellRef> {
    let text = text.replace('$', "");
    let letters_end = text
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    let (letters, digits) = text.split_at(letters_end);

    let col = if letters.is_empty() {
        None
    } else {
        Some(column_letters_to_index(letters)?)
    };
    let row = if digits.is_empty() {
        None
    } else {
        let row: u32 = digits.parse().ok()?;
        Some(row.checked_sub(1)?)
    };

    if row.is_none() && col.is_none() {
        return None;
    }
    Some(CellRef { row, col })
}

/// Convert column letters to a zero-based index (A → 0, AA → 26)
fn column_letters_to_index(letters: &str) -> Option<u32> {
    if letters.len() > 3 {
        return None;
    }
    let mut index: u32 = 0;
    for c in letters.chars() {
        let digit = u32::from(c.to_ascii_uppercase()) - u32::from('A') + 1;
        index = index * 26 + digit;
    }
    index.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters_to_index() {
        assert_eq!(column_letters_to_index("A"), Some(0));
        assert_eq!(column_letters_to_index("b"), Some(1));
        assert_eq!(column_letters_to_index("Z"), Some(25));
        assert_eq!(column_letters_to_index("AA"), Some(26));
        assert_eq!(column_letters_to_index("AB"), Some(27));
        assert_eq!(column_letters_to_index("ZZ"), Some(701));
        assert_eq!(column_letters_to_index("ABCD"), None);
    }

    #[test]
    fn test_parse_single_area() {
        let reference = RangeReference::parse("Sheet1!$A$2:$B$6").unwrap();
        assert_eq!(reference.sheet, "Sheet1");
        assert_eq!(reference.start, CellRef { row: Some(1), col: Some(0) });
        assert_eq!(reference.end, CellRef { row: Some(5), col: Some(1) });
    }

    #[test]
    fn test_parse_quoted_sheet_and_single_cell() {
        let reference = RangeReference::parse("='Raid Plan ''25'!C3").unwrap();
        assert_eq!(reference.sheet, "Raid Plan '25");
        assert_eq!(reference.start, reference.end);
        assert_eq!(reference.start, CellRef { row: Some(2), col: Some(2) });
    }

    #[test]
    fn test_parse_ods_address() {
        let reference = RangeReference::parse("$'Raid Plan'.$A$1:.$A$5").unwrap();
        assert_eq!(reference.sheet, "Raid Plan");
        assert_eq!(reference.start, CellRef { row: Some(0), col: Some(0) });
        assert_eq!(reference.end, CellRef { row: Some(4), col: Some(0) });

        let reference = RangeReference::parse("$Buffs.$B$2:$Buffs.$C$9").unwrap();
        assert_eq!(reference.sheet, "Buffs");
        assert_eq!(reference.end, CellRef { row: Some(8), col: Some(2) });

        let reference = RangeReference::parse("$'It''s Raid'.$C$3").unwrap();
        assert_eq!(reference.sheet, "It's Raid");
        assert_eq!(reference.start, reference.end);
    }

    #[test]
    fn test_parse_ods_rejects_non_ranges() {
        assert!(RangeReference::parse(".$A$1").is_none());
        assert!(RangeReference::parse("$Buffs.$A$1:$Raid.$A$2").is_none());
        assert!(RangeReference::parse("$Buffs.$A$1 $Buffs.$C$1").is_none());
        assert!(RangeReference::parse("$'Raid Plan.$A$1").is_none());
    }

    #[test]
    fn test_parse_whole_column() {
        let reference = RangeReference::parse("Roster!$A:$A").unwrap();
        assert_eq!(reference.start, CellRef { row: None, col: Some(0) });
    }

    #[test]
    fn test_parse_rejects_non_ranges() {
        assert!(RangeReference::parse("#REF!").is_none());
        assert!(RangeReference::parse("Sheet1!#REF!").is_none());
        assert!(RangeReference::parse("42").is_none());
        assert!(RangeReference::parse("Sheet1!$A$1,Sheet1!$C$1").is_none());
        assert!(RangeReference::parse("Sheet1!$A$0").is_none());
    }

    #[test]
    fn test_read_pads_missing_cells() {
        let mut sheet: Range<Data> = Range::new((0, 0), (2, 1));
        sheet.set_value((0, 0), Data::String("G1".to_string()));
        sheet.set_value((0, 1), Data::String("Jaina".to_string()));
        sheet.set_value((1, 0), Data::Float(2.0));
        sheet.set_value((2, 1), Data::Bool(true));

        let reference = RangeReference::parse("Sheet1!$A$1:$C$3").unwrap();
        let grid = reference.read(&sheet);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.cell(0, 1), Some("Jaina"));
        assert_eq!(grid.cell(1, 0), Some("2"));
        assert_eq!(grid.cell(1, 1), Some(""));
        assert_eq!(grid.cell(2, 1), Some("TRUE"));
        assert_eq!(grid.cell(2, 2), Some(""));
    }

    #[test]
    fn test_read_tall_reference_stops_at_used_rows() {
        let mut sheet: Range<Data> = Range::new((0, 0), (2, 1));
        sheet.set_value((0, 0), Data::String("G1".to_string()));
        sheet.set_value((0, 1), Data::String("Jaina".to_string()));
        sheet.set_value((2, 0), Data::String("G3".to_string()));

        let reference = RangeReference::parse("Sheet1!$A$1:$B$1048576").unwrap();
        let grid = reference.read(&sheet);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.cell(2, 0), Some("G3"));

        let reference = RangeReference::parse("Sheet1!$A$1:$XFD$1048576").unwrap();
        assert_eq!(reference.read(&sheet).height(), 3);
    }

    #[test]
    fn test_read_below_used_area_is_empty() {
        let mut sheet: Range<Data> = Range::new((0, 0), (1, 0));
        sheet.set_value((0, 0), Data::String("Bruen".to_string()));

        let reference = RangeReference::parse("Sheet1!$A$10:$A$20").unwrap();
        assert!(reference.read(&sheet).is_empty());
    }

    #[test]
    fn test_read_keeps_declared_columns() {
        // Second column is blank in the sheet but still part of the range
        let mut sheet: Range<Data> = Range::new((0, 0), (1, 0));
        sheet.set_value((0, 0), Data::String("G1".to_string()));
        sheet.set_value((1, 0), Data::String("G2".to_string()));

        let reference = RangeReference::parse("Sheet1!$A$1:$B$50").unwrap();
        let grid = reference.read(&sheet);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.width(), 2);
    }

    #[test]
    fn test_read_whole_column_stops_at_used_area() {
        let mut sheet: Range<Data> = Range::new((0, 0), (2, 0));
        sheet.set_value((0, 0), Data::String("Bruen".to_string()));
        sheet.set_value((2, 0), Data::String("Kaz".to_string()));

        let reference = RangeReference::parse("Sheet1!$A:$A").unwrap();
        let grid = reference.read(&sheet);
        assert_eq!(grid, CellGrid::column(["Bruen", "", "Kaz"]));
    }
}
