//! Named range sources
//!
//! The export never reaches into a spreadsheet itself. It asks a
//! [`RangeSource`] for the display values of each named range and treats a
//! missing range as empty. Three sources are provided:
//! - any closure `Fn(&str) -> Option<CellGrid>`
//! - [`NamedRanges`] loaded from a YAML or JSON document
//! - [`NamedRanges`] resolved from a workbook's defined names
//!   (see [`WorkbookImporter`])

mod workbook;

pub use workbook::{RangeReference, WorkbookImporter};

use crate::error::{RosterError, RosterResult};
use crate::types::CellGrid;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::info;

const NOT_A_MAPPING: &str = "top level must map range names to cells";

/// Optional top-level key holding the range mapping
const WRAPPER_KEY: &str = "ranges";

/// Lookup of display values by named range
pub trait RangeSource {
    /// Display values of `range_name`, or `None` when the range does not exist
    fn display_values(&self, range_name: &str) -> Option<CellGrid>;
}

impl<F> RangeSource for F
where
    F: Fn(&str) -> Option<CellGrid>,
{
    fn display_values(&self, range_name: &str) -> Option<CellGrid> {
        self(range_name)
    }
}

/// In-memory named ranges, keyed by exact (case-sensitive) name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedRanges {
    ranges: HashMap<String, CellGrid>,
}

impl NamedRanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, grid: CellGrid) {
        self.ranges.insert(name.into(), grid);
    }

    pub fn get(&self, name: &str) -> Option<&CellGrid> {
        self.ranges.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ranges.contains_key(name)
    }

    /// Range names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ranges.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Parse a YAML named range document.
    ///
    /// The document maps range names to a single value, a list (one column)
    /// or a list of rows, optionally nested under a top-level `ranges:` key:
    ///
    /// ```yaml
    /// ranges:
    ///   Tanks: [Bruen, Kaz]
    ///   Kicks:
    ///     - [G1, Sly]
    ///     - [Kick 2, Vex]
    ///   Pally_Kings: Uther
    /// ```
    pub fn from_yaml_str(content: &str) -> RosterResult<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        let mapping = value
            .as_mapping()
            .ok_or_else(|| RosterError::InvalidDocument(NOT_A_MAPPING.to_string()))?;
        let wrapped = mapping
            .get(WRAPPER_KEY)
            .is_some_and(serde_yaml::Value::is_mapping);
        if wrapped && mapping.len() > 1 {
            return Err(mixed_layout(mapping.keys().filter_map(serde_yaml::Value::as_str)));
        }
        let document: RangeDocument = serde_yaml::from_value(value)?;
        Ok(document.into_ranges())
    }

    /// Parse a JSON named range document (same layout as YAML)
    pub fn from_json_str(content: &str) -> RosterResult<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let object = value
            .as_object()
            .ok_or_else(|| RosterError::InvalidDocument(NOT_A_MAPPING.to_string()))?;
        let wrapped = object
            .get(WRAPPER_KEY)
            .is_some_and(serde_json::Value::is_object);
        if wrapped && object.len() > 1 {
            return Err(mixed_layout(object.keys().map(String::as_str)));
        }
        let document: RangeDocument = serde_json::from_value(value)?;
        Ok(document.into_ranges())
    }

    /// Resolve every defined name of a workbook into a grid
    pub fn from_workbook<P: AsRef<Path>>(path: P) -> RosterResult<Self> {
        WorkbookImporter::new(path).import()
    }

    /// Load named ranges from a file, picking the reader by extension
    pub fn load<P: AsRef<Path>>(path: P) -> RosterResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let ranges = match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&std::fs::read_to_string(path)?)?,
            "json" => Self::from_json_str(&std::fs::read_to_string(path)?)?,
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Self::from_workbook(path)?,
            _ => return Err(RosterError::UnsupportedInput(path.display().to_string())),
        };

        info!(path = %path.display(), ranges = ranges.len(), "loaded named ranges");
        Ok(ranges)
    }
}

impl RangeSource for NamedRanges {
    fn display_values(&self, range_name: &str) -> Option<CellGrid> {
        self.ranges.get(range_name).cloned()
    }
}

impl<S: Into<String>> FromIterator<(S, CellGrid)> for NamedRanges {
    fn from_iter<I: IntoIterator<Item = (S, CellGrid)>>(iter: I) -> Self {
        Self {
            ranges: iter
                .into_iter()
                .map(|(name, grid)| (name.into(), grid))
                .collect(),
        }
    }
}

//==============================================================================
// Document Model
//==============================================================================

/// Ranges found both under `ranges:` and at the top level
fn mixed_layout<'a>(keys: impl Iterator<Item = &'a str>) -> RosterError {
    let stray: Vec<&str> = keys.filter(|key| *key != WRAPPER_KEY).collect();
    RosterError::InvalidDocument(format!(
        "keys next to `{}:` would be ignored: {}",
        WRAPPER_KEY,
        stray.join(", ")
    ))
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RangeDocument {
    Wrapped(WrappedRanges),
    Bare(BTreeMap<String, RangeValue>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WrappedRanges {
    ranges: BTreeMap<String, RangeValue>,
}

impl RangeDocument {
    fn into_ranges(self) -> NamedRanges {
        let ranges = match self {
            RangeDocument::Wrapped(WrappedRanges { ranges }) | RangeDocument::Bare(ranges) => ranges,
        };
        ranges
            .into_iter()
            .map(|(name, value)| (name, value.into_grid()))
            .collect()
    }
}

/// One named range: a list of rows, or a single cell
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RangeValue {
    Rows(Vec<RowValue>),
    Cell(CellValue),
}

impl RangeValue {
    fn into_grid(self) -> CellGrid {
        match self {
            RangeValue::Rows(rows) => CellGrid::new(rows.into_iter().map(RowValue::into_cells)),
            RangeValue::Cell(cell) => CellGrid::single(cell.display()),
        }
    }
}

/// A row is either a list of cells or a lone cell (one-column range)
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RowValue {
    Cells(Vec<CellValue>),
    Cell(CellValue),
}

impl RowValue {
    fn into_cells(self) -> Vec<String> {
        match self {
            RowValue::Cells(cells) => cells.into_iter().map(|cell| cell.display()).collect(),
            RowValue::Cell(cell) => vec![cell.display()],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
    Empty(()),
}

impl CellValue {
    /// Text as a spreadsheet would display it
    fn display(self) -> String {
        match self {
            CellValue::Text(s) => s,
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Flag(true) => "TRUE".to_string(),
            CellValue::Flag(false) => "FALSE".to_string(),
            CellValue::Empty(()) => String::new(),
        }
    }
}
