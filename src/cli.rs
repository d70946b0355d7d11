//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::i18n::Locale;
use crate::models::{
    ApplicationMethod, GrowthStage, HarvestStage, IrrigationMethod, PestSeverity, TaskType,
    TreeStatus, Variety, Weather,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DurianTrack - record keeper and analytics for durian orchards
///
/// Track trees, growth measurements, fertilizer/irrigation/pest
/// treatments, harvests, and scheduled tasks in a single JSON data
/// file, and derive farm analytics and reports from them.
///
/// Examples:
///   duriantrack init
///   duriantrack add-tree --code A-001 --variety musang-king
///   duriantrack record harvest --tree A-001 --stage harvest --weight 32.5 --price 18
///   duriantrack task add --title "Fertilize block A" --task-type fertilizer --due 2025-09-15
///   duriantrack analytics
///   duriantrack report --format markdown
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    ///
    /// If not specified, looks for .duriantrack.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Path of the JSON data file
    #[arg(long, value_name = "FILE", env = "DURIANTRACK_DATA", global = true)]
    pub data_file: Option<PathBuf>,

    /// Display language for reports and exports
    #[arg(long, value_name = "LOCALE", global = true)]
    pub locale: Option<Locale>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a default .duriantrack.toml and an empty data file
    Init,

    /// Register a farm
    AddFarm(AddFarmArgs),

    /// Register a planting block within a farm
    AddBlock(AddBlockArgs),

    /// Register a tree
    AddTree(AddTreeArgs),

    /// Update fields of an existing tree
    EditTree(EditTreeArgs),

    /// Delete a tree and all of its records
    RemoveTree {
        /// Tree code
        #[arg(long)]
        code: String,
    },

    /// List trees, optionally filtered
    Trees {
        /// Only trees of this variety
        #[arg(long)]
        variety: Option<Variety>,
        /// Only trees with this status
        #[arg(long)]
        status: Option<TreeStatus>,
        /// Only trees in this block (by block name)
        #[arg(long)]
        block: Option<String>,
    },

    /// Append an activity record to a tree
    #[command(subcommand)]
    Record(RecordCommand),

    /// Manage scheduled tasks
    #[command(subcommand)]
    Task(TaskCommand),

    /// Print farm analytics (yield, revenue, growth trend, stats)
    Analytics {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Generate a farm report file
    Report {
        /// Output file path (defaults to the configured report output)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format (markdown, json)
        #[arg(long, default_value = "markdown", value_name = "FORMAT")]
        format: OutputFormat,
    },

    /// Export a collection as CSV
    Export {
        /// Which collection to export
        #[arg(value_name = "WHAT")]
        what: ExportKind,

        /// Output file path (defaults to <what>_export.csv)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
pub struct AddFarmArgs {
    /// Farm name
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub village: Option<String>,
    #[arg(long)]
    pub district: Option<String>,
    #[arg(long)]
    pub province: Option<String>,
    /// Elevation in meters
    #[arg(long)]
    pub elevation: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct AddBlockArgs {
    /// Block name, e.g. "Block A"
    #[arg(long)]
    pub name: String,
    /// Farm name the block belongs to (defaults to the only farm)
    #[arg(long)]
    pub farm: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct AddTreeArgs {
    /// Unique tree code, e.g. "A-012"
    #[arg(long)]
    pub code: String,
    #[arg(long)]
    pub variety: Variety,
    /// Cultivar name when --variety other
    #[arg(long)]
    pub variety_other: Option<String>,
    /// Block name
    #[arg(long)]
    pub block: Option<String>,
    /// Planting date (YYYY-MM-DD)
    #[arg(long)]
    pub planted: Option<NaiveDate>,
    #[arg(long)]
    pub rootstock: Option<String>,
    /// Row spacing in meters
    #[arg(long)]
    pub row_spacing: Option<f64>,
    /// In-row tree spacing in meters
    #[arg(long)]
    pub tree_spacing: Option<f64>,
    #[arg(long, default_value = "active")]
    pub status: TreeStatus,
    #[arg(long)]
    pub lat: Option<f64>,
    #[arg(long)]
    pub lng: Option<f64>,
    #[arg(long, default_value = "")]
    pub notes: String,
}

/// Only the fields given on the command line change; everything else
/// keeps its stored value.
#[derive(clap::Args, Debug)]
pub struct EditTreeArgs {
    /// Tree code
    #[arg(long)]
    pub code: String,
    #[arg(long)]
    pub variety: Option<Variety>,
    /// Cultivar name when --variety other
    #[arg(long)]
    pub variety_other: Option<String>,
    /// Block name
    #[arg(long)]
    pub block: Option<String>,
    /// Planting date (YYYY-MM-DD)
    #[arg(long)]
    pub planted: Option<NaiveDate>,
    #[arg(long)]
    pub rootstock: Option<String>,
    /// Row spacing in meters
    #[arg(long)]
    pub row_spacing: Option<f64>,
    /// In-row tree spacing in meters
    #[arg(long)]
    pub tree_spacing: Option<f64>,
    #[arg(long)]
    pub status: Option<TreeStatus>,
    #[arg(long)]
    pub lat: Option<f64>,
    #[arg(long)]
    pub lng: Option<f64>,
    #[arg(long)]
    pub notes: Option<String>,
}

/// Per-record-type subcommands under `record`.
#[derive(Subcommand, Debug)]
pub enum RecordCommand {
    /// Growth measurement
    Growth(GrowthArgs),
    /// Fertilizer application
    Fertilizer(FertilizerArgs),
    /// Irrigation event
    Irrigation(IrrigationArgs),
    /// Pest or disease observation
    Pest(PestArgs),
    /// Flowering/harvest observation
    Harvest(HarvestArgs),
}

#[derive(clap::Args, Debug)]
pub struct GrowthArgs {
    /// Tree code
    #[arg(long)]
    pub tree: String,
    /// Record date (defaults to today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Height in meters
    #[arg(long)]
    pub height: Option<f64>,
    /// Trunk diameter in centimeters
    #[arg(long)]
    pub diameter: Option<f64>,
    /// Canopy diameter in meters
    #[arg(long)]
    pub canopy: Option<f64>,
    #[arg(long)]
    pub stage: Option<GrowthStage>,
    /// Vigor score, 1 (weak) to 5 (vigorous)
    #[arg(long, default_value = "3")]
    pub vigor: u8,
    /// Photo URLs
    #[arg(long, value_delimiter = ',')]
    pub photos: Vec<String>,
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(clap::Args, Debug)]
pub struct FertilizerArgs {
    /// Tree code
    #[arg(long)]
    pub tree: String,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Product name, e.g. "NPK 15-15-15"
    #[arg(long)]
    pub fertilizer: String,
    /// Amount applied per tree
    #[arg(long)]
    pub amount: Option<f64>,
    /// Unit for --amount
    #[arg(long, default_value = "kg")]
    pub unit: String,
    #[arg(long)]
    pub method: Option<ApplicationMethod>,
    #[arg(long)]
    pub soil_ph: Option<f64>,
    #[arg(long)]
    pub soil_ec: Option<f64>,
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(clap::Args, Debug)]
pub struct IrrigationArgs {
    /// Tree code
    #[arg(long)]
    pub tree: String,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub method: Option<IrrigationMethod>,
    #[arg(long)]
    pub minutes: Option<f64>,
    #[arg(long)]
    pub liters: Option<f64>,
    #[arg(long)]
    pub weather: Option<Weather>,
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(clap::Args, Debug)]
pub struct PestArgs {
    /// Tree code
    #[arg(long)]
    pub tree: String,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Pest or disease name, e.g. "Stem Borer" or "Other"
    #[arg(long)]
    pub pest: String,
    /// Free-text name when --pest Other
    #[arg(long)]
    pub pest_other: Option<String>,
    #[arg(long)]
    pub severity: PestSeverity,
    /// Treatment product applied, if any
    #[arg(long)]
    pub treatment: Option<String>,
    /// Photo URLs
    #[arg(long, value_delimiter = ',')]
    pub photos: Vec<String>,
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(clap::Args, Debug)]
pub struct HarvestArgs {
    /// Tree code
    #[arg(long)]
    pub tree: String,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub stage: Option<HarvestStage>,
    /// Estimated fruit still on the tree
    #[arg(long)]
    pub estimated: Option<u32>,
    /// Fruit actually harvested
    #[arg(long)]
    pub harvested: Option<u32>,
    /// Total harvested weight in kg
    #[arg(long)]
    pub weight: Option<f64>,
    #[arg(long)]
    pub grade_a: Option<u32>,
    #[arg(long)]
    pub grade_b: Option<u32>,
    #[arg(long)]
    pub grade_c: Option<u32>,
    /// Sale price per kg
    #[arg(long)]
    pub price: Option<f64>,
    #[arg(long, default_value = "")]
    pub notes: String,
}

/// Subcommands under `task`.
#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Schedule a task
    Add(TaskAddArgs),
    /// List tasks grouped by due-date bucket
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
    },
    /// Mark a task completed (spawns the next occurrence for repeating tasks)
    Done {
        /// Task id, e.g. "task-3"
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Print the task calendar for a month
    Calendar {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12 (defaults to the current month)
        #[arg(long)]
        month: Option<u32>,
    },
}

#[derive(clap::Args, Debug)]
pub struct TaskAddArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub task_type: TaskType,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: NaiveDate,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Repeat cadence in days (omit for no repeat)
    #[arg(long)]
    pub repeat_days: Option<u32>,
    /// Tree code to attach the task to
    #[arg(long)]
    pub tree: Option<String>,
    /// Block name to attach the task to
    #[arg(long)]
    pub block: Option<String>,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Which collection to export as CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportKind {
    Trees,
    Harvest,
    Farms,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match &self.command {
            Command::Record(RecordCommand::Growth(args)) => {
                if !(1..=5).contains(&args.vigor) {
                    return Err("Vigor score must be between 1 and 5".to_string());
                }
                if args.height.is_some_and(|h| h < 0.0) {
                    return Err("Height must not be negative".to_string());
                }
            }
            Command::Record(RecordCommand::Harvest(args)) => {
                if args.weight.is_some_and(|w| w < 0.0) {
                    return Err("Weight must not be negative".to_string());
                }
                if args.price.is_some_and(|p| p < 0.0) {
                    return Err("Price must not be negative".to_string());
                }
            }
            Command::Record(RecordCommand::Pest(args)) => {
                if args.pest == "Other" && args.pest_other.is_none() {
                    return Err("--pest Other requires --pest-other".to_string());
                }
            }
            Command::AddTree(args) => {
                if args.variety == Variety::Other && args.variety_other.is_none() {
                    return Err("--variety other requires --variety-other".to_string());
                }
            }
            Command::EditTree(args) => {
                if args.variety == Some(Variety::Other) && args.variety_other.is_none() {
                    return Err("--variety other requires --variety-other".to_string());
                }
            }
            Command::Task(TaskCommand::Calendar { month, .. }) => {
                if month.is_some_and(|m| !(1..=12).contains(&m)) {
                    return Err("Month must be between 1 and 12".to_string());
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args(command: Command) -> Args {
        Args {
            command,
            config: None,
            data_file: None,
            locale: None,
            verbose: false,
            quiet: false,
        }
    }

    #[test]
    fn test_validation_conflicting_verbosity() {
        let mut args = make_args(Command::Init);
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_vigor_range() {
        let growth = GrowthArgs {
            tree: "A-001".to_string(),
            date: None,
            height: None,
            diameter: None,
            canopy: None,
            stage: None,
            vigor: 6,
            photos: Vec::new(),
            notes: String::new(),
        };
        let args = make_args(Command::Record(RecordCommand::Growth(growth)));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_other_variety_needs_name() {
        let add = AddTreeArgs {
            code: "A-001".to_string(),
            variety: Variety::Other,
            variety_other: None,
            block: None,
            planted: None,
            rootstock: None,
            row_spacing: None,
            tree_spacing: None,
            status: TreeStatus::Active,
            lat: None,
            lng: None,
            notes: String::new(),
        };
        let args = make_args(Command::AddTree(add));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args(Command::Init);
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_parse_add_tree() {
        let args = Args::try_parse_from([
            "duriantrack",
            "add-tree",
            "--code",
            "A-001",
            "--variety",
            "musang-king",
            "--planted",
            "2022-03-15",
        ])
        .unwrap();

        match args.command {
            Command::AddTree(add) => {
                assert_eq!(add.code, "A-001");
                assert_eq!(add.variety, Variety::MusangKing);
                assert_eq!(
                    add.planted,
                    NaiveDate::from_ymd_opt(2022, 3, 15)
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_edit_tree_partial_fields() {
        let args = Args::try_parse_from([
            "duriantrack",
            "edit-tree",
            "--code",
            "A-001",
            "--status",
            "sick",
        ])
        .unwrap();

        match args.command {
            Command::EditTree(edit) => {
                assert_eq!(edit.code, "A-001");
                assert_eq!(edit.status, Some(TreeStatus::Sick));
                // Unspecified fields stay untouched.
                assert_eq!(edit.variety, None);
                assert_eq!(edit.planted, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_validation_edit_tree_other_variety_needs_name() {
        let edit = EditTreeArgs {
            code: "A-001".to_string(),
            variety: Some(Variety::Other),
            variety_other: None,
            block: None,
            planted: None,
            rootstock: None,
            row_spacing: None,
            tree_spacing: None,
            status: None,
            lat: None,
            lng: None,
            notes: None,
        };
        let args = make_args(Command::EditTree(edit));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_parse_remove_tree() {
        let args =
            Args::try_parse_from(["duriantrack", "remove-tree", "--code", "A-001"]).unwrap();
        match args.command {
            Command::RemoveTree { code } => assert_eq!(code, "A-001"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_task_add() {
        let args = Args::try_parse_from([
            "duriantrack",
            "task",
            "add",
            "--title",
            "Fertilize block A",
            "--task-type",
            "fertilizer",
            "--due",
            "2025-09-15",
            "--repeat-days",
            "30",
        ])
        .unwrap();

        match args.command {
            Command::Task(TaskCommand::Add(add)) => {
                assert_eq!(add.task_type, TaskType::Fertilizer);
                assert_eq!(add.repeat_days, Some(30));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
