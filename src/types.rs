use serde::Serialize;
use std::collections::BTreeMap;

//==============================================================================
// Cell Grid
//==============================================================================

/// Display values of one named range, row-major.
///
/// Every row has the same number of columns; short rows are padded with
/// empty strings when the grid is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellGrid {
    rows: Vec<Vec<String>>,
    width: usize,
}

impl CellGrid {
    /// Build a grid from rows of display strings, padding to the widest row
    pub fn new<R, C, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { rows, width }
    }

    /// Single-column grid, one cell per row
    pub fn column<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(cells.into_iter().map(|cell| vec![cell]))
    }

    /// 1x1 grid
    pub fn single(cell: impl Into<String>) -> Self {
        Self::new(vec![vec![cell]])
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.width == 0
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Cell at (row, col), `None` when out of bounds
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }
}

//==============================================================================
// Parsed Field Shapes
//==============================================================================

/// Sparse slot/group number -> name mapping. Iterates in ascending key order.
pub type SlotMap = BTreeMap<u8, String>;

/// One row of the HealAssign table: a tank and up to two healers.
///
/// Healer columns are kept verbatim (trimmed) and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealAssignRow {
    pub tank: String,
    pub healer_a: String,
    pub healer_b: String,
}

impl HealAssignRow {
    pub fn new(
        tank: impl Into<String>,
        healer_a: impl Into<String>,
        healer_b: impl Into<String>,
    ) -> Self {
        Self {
            tank: tank.into(),
            healer_a: healer_a.into(),
            healer_b: healer_b.into(),
        }
    }

    /// Fields in serialization order
    pub fn fields(&self) -> [&str; 3] {
        [
            self.tank.as_str(),
            self.healer_a.as_str(),
            self.healer_b.as_str(),
        ]
    }
}

//==============================================================================
// Named Ranges
//==============================================================================

/// How a named range is expected to be laid out in the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeShape {
    /// Any shape, flattened to a list of names
    List,
    /// Single cell (or list; first name used)
    Single,
    /// 1 column (rows 1..5) or 2 columns [index, name]
    Kicks,
    /// 2 columns [group, name] or 1 column (8 rows = groups 1..8)
    GroupMap,
    /// 3 columns, up to 8 rows: [Tank | HealerA | HealerB]
    HealAssign,
}

impl RangeShape {
    pub fn describe(&self) -> &'static str {
        match self {
            RangeShape::List => "1 column list",
            RangeShape::Single => "single cell (or list; first cell used)",
            RangeShape::Kicks => "either 1 column (rows 1..5) OR 2 cols [index, name]",
            RangeShape::GroupMap => {
                "either 2 cols [group, name] (group can be 1..8 or G1..G8) OR 1 col (8 rows = groups 1..8)"
            }
            RangeShape::HealAssign => "3 columns, up to 8 rows -> [Tank | HealerA | HealerB]",
        }
    }
}

pub const TANKS: &str = "Tanks";
pub const KICKS: &str = "Kicks";
pub const TRANQ: &str = "Tranq";
pub const FEAR_WARD: &str = "FearWard";
pub const HEAL_ASSIGN: &str = "HealAssign";
pub const AI: &str = "AI";
pub const FORT: &str = "Fort";
pub const SHADOW: &str = "Shadow";
pub const HEALS: &str = "Heals";
pub const PALLY_MIGHT_WISDOM: &str = "Pally_MightWisdom";
pub const PALLY_KINGS: &str = "Pally_Kings";
pub const PALLY_LIGHT: &str = "Pally_Light";
pub const PALLY_SALV_SANCT: &str = "Pally_SalvSanct";
pub const DEBUFF_RECKLESSNESS: &str = "Debuff_Recklessness";
pub const DEBUFF_ELEMENTS: &str = "Debuff_Elements";
pub const DEBUFF_SHADOWS: &str = "Debuff_Shadows";
pub const DEBUFF_DEMO_SHOUT: &str = "Debuff_DemoShout";
pub const DEBUFF_THUNDERCLAP: &str = "Debuff_Thunderclap";

/// Every named range the export reads, in help-text order
pub const EXPECTED_RANGES: &[(&str, RangeShape)] = &[
    (TANKS, RangeShape::List),
    (KICKS, RangeShape::Kicks),
    (TRANQ, RangeShape::List),
    (FEAR_WARD, RangeShape::List),
    (HEAL_ASSIGN, RangeShape::HealAssign),
    (AI, RangeShape::GroupMap),
    (FORT, RangeShape::GroupMap),
    (SHADOW, RangeShape::GroupMap),
    (HEALS, RangeShape::GroupMap),
    (PALLY_MIGHT_WISDOM, RangeShape::Single),
    (PALLY_KINGS, RangeShape::Single),
    (PALLY_LIGHT, RangeShape::Single),
    (PALLY_SALV_SANCT, RangeShape::Single),
    (DEBUFF_RECKLESSNESS, RangeShape::Single),
    (DEBUFF_ELEMENTS, RangeShape::Single),
    (DEBUFF_SHADOWS, RangeShape::Single),
    (DEBUFF_DEMO_SHOUT, RangeShape::Single),
    (DEBUFF_THUNDERCLAP, RangeShape::Single),
];
