use crate::error::{RosterError, RosterResult};
use crate::export::{ExportDocument, ExportFormat};
use crate::source::NamedRanges;
use crate::types::{CellGrid, RangeShape, EXPECTED_RANGES};
use crate::writer::is_lua_identifier;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Presence of one expected named range in a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeStatus {
    pub name: &'static str,
    pub shape: RangeShape,
    /// (rows, cols) when the range exists
    pub size: Option<(usize, usize)>,
}

/// Check every expected range against the loaded source
pub fn range_report(ranges: &NamedRanges) -> Vec<RangeStatus> {
    EXPECTED_RANGES
        .iter()
        .map(|&(name, shape)| RangeStatus {
            name,
            shape,
            size: ranges.get(name).map(|grid: &CellGrid| (grid.height(), grid.width())),
        })
        .collect()
}

/// Help text listing every named range and its expected layout
pub fn ranges_help() -> String {
    let width = EXPECTED_RANGES
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0)
        + 1;

    let mut help = String::from("Name these ranges (Data → Named ranges). Shapes:\n\n");
    for (name, shape) in EXPECTED_RANGES {
        help.push_str(&format!(
            "{:<width$} {}\n",
            format!("{}:", name),
            shape.describe(),
            width = width
        ));
    }
    help.push_str("\nTip: cells like \"Raid\" or \"Tanks\" are ignored (treated as labels, not names).\n");
    help
}

/// Load a source and render the Lua export text
pub fn render_export(input: &Path, format: &ExportFormat) -> RosterResult<String> {
    if let ExportFormat::Assign(global) = format {
        if !is_lua_identifier(global) {
            return Err(RosterError::InvalidGlobalName(global.clone()));
        }
    }

    let ranges = NamedRanges::load(input)?;
    Ok(ExportDocument::assemble(&ranges).render(format))
}

/// Execute the export command.
///
/// Without `--output` the Lua text goes to stdout and status lines go to
/// stderr, so the command can be piped straight into a SavedVariables file.
pub fn export(
    input: PathBuf,
    output: Option<PathBuf>,
    format: ExportFormat,
    verbose: bool,
) -> RosterResult<()> {
    if verbose {
        eprintln!("{}", "📜 Raid Roster - Lua Export".bold().green());
        eprintln!("   Input: {}", input.display());
        match &format {
            ExportFormat::Assign(global) => eprintln!("   Format: {} = {{ ... }}", global.cyan()),
            ExportFormat::Return => eprintln!("   Format: {}", "return { ... }".cyan()),
        }
        eprintln!();
    }

    let lua = render_export(&input, &format)?;

    match output {
        Some(path) => {
            fs::write(&path, &lua)?;
            println!("{}", "✅ Export Complete!".bold().green());
            println!("   Lua file: {}\n", path.display());
        }
        None => print!("{}", lua),
    }

    Ok(())
}

/// Execute the inspect command - which ranges resolved and what they parsed to
pub fn inspect(input: PathBuf, json: bool) -> RosterResult<()> {
    println!("{}", "🔍 Raid Roster - Inspect".bold().green());
    println!("   Input: {}\n", input.display());

    let ranges = NamedRanges::load(&input)?;
    let report = range_report(&ranges);

    println!("{}", "📋 Named Ranges:".bold().cyan());
    for status in &report {
        match status.size {
            Some((rows, cols)) => println!(
                "   {} {} ({}x{})",
                "✅".green(),
                status.name.bright_blue(),
                rows,
                cols
            ),
            None => println!(
                "   {} {} {}",
                "⚠️ ".yellow(),
                status.name.bright_blue(),
                format!("missing - {}", status.shape.describe()).yellow()
            ),
        }
    }

    let extra: Vec<&str> = ranges
        .names()
        .into_iter()
        .filter(|name| !EXPECTED_RANGES.iter().any(|(expected, _)| expected == name))
        .collect();
    if !extra.is_empty() {
        println!("\n   Ignored ranges: {}", extra.join(", "));
    }
    println!();

    let document = ExportDocument::assemble(&ranges);
    println!("{}", "📐 Parsed Document:".bold().cyan());
    let rendered = if json {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_yaml::to_string(&document)?
    };
    println!("{}", rendered);

    Ok(())
}

/// Execute the ranges command
pub fn ranges() -> RosterResult<()> {
    println!("{}", "📖 Raid Roster - Named Ranges".bold().green());
    println!();
    print!("{}", ranges_help());
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
