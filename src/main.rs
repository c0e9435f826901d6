use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use raid_roster::cli;
use raid_roster::export::{ExportFormat, DEFAULT_GLOBAL_NAME};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "raid-roster")]
#[command(about = "Export raid roster named ranges as a Lua SavedVariables table.")]
#[command(long_about = "Raid Roster - named ranges in, Lua table out

Reads the roster named ranges (Tanks, Kicks, Heals, Pally_Kings, ...) from a
workbook or a YAML/JSON document and writes the RaidAnnounce export.

COMMANDS:
  export   - Write the Lua table (MyRaidData = { ... } or return { ... })
  inspect  - Show which named ranges were found and what they parsed to
  ranges   - List the expected named ranges and their shapes

EXAMPLES:
  raid-roster export raid.xlsx > RaidAnnounce.lua
  raid-roster export raid.xlsx --format return -o raid_data.lua
  raid-roster inspect roster.yaml")]
#[command(version)]
struct Cli {
    /// Show progress and debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Wrapper {
    /// <global> = { ... }
    Assign,
    /// return { ... }
    Return,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Export the roster as a Lua table.

INPUTS:
  .xlsx .xlsm .xlsb .xls .ods  - workbook defined names are the named ranges
  .yaml .yml .json             - document mapping range names to cells

  Tanks: [Bruen, Kaz]
  Kicks:
    - [G1, Sly]
    - [Kick 2, Vex]
  Pally_Kings: Uther

OUTPUT:
  Written to stdout unless --output is given. Both formats share an
  identical body; only the opening line differs.")]
    /// Export the roster as a Lua table
    Export {
        /// Workbook or named range document
        input: PathBuf,

        /// Output Lua file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Wrapper around the table body
        #[arg(short, long, value_enum, default_value_t = Wrapper::Assign, env = "RAID_ROSTER_FORMAT")]
        format: Wrapper,

        /// Global variable name for the assign format
        #[arg(short, long, default_value = DEFAULT_GLOBAL_NAME, env = "RAID_ROSTER_GLOBAL")]
        global: String,
    },

    /// Show which named ranges were found and the parsed document
    Inspect {
        /// Workbook or named range document
        input: PathBuf,

        /// Print the parsed document as JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// List the expected named ranges and their shapes
    Ranges,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "raid_roster=debug"
    } else {
        "raid_roster=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Export {
            input,
            output,
            format,
            global,
        } => {
            let format = match format {
                Wrapper::Assign => ExportFormat::Assign(global),
                Wrapper::Return => ExportFormat::Return,
            };
            cli::export(input.clone(), output, format, cli.verbose)
                .with_context(|| format!("export failed for {}", input.display()))
        }

        Commands::Inspect { input, json } => cli::inspect(input.clone(), json)
            .with_context(|| format!("inspect failed for {}", input.display())),

        Commands::Ranges => cli::ranges().context("ranges failed"),
    }
}
