//! # CLI definitions
//!
//! Command-line arguments and subcommands, parsed with `clap` derive.
//!
//! ## Command tree
//! - `project add` / `project list`
//! - `estimate`: estimate one element and record it
//! - `history`: recorded estimates of a project
//! - `bom`: bill of materials of a project
//! - `report`: text or PDF report of one record
//! - `types`: supported element types and their dimensions
//! - `settings`: show or change ledger-wide settings

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use takeoff_core::calculations::Strictness;
use takeoff_core::elements::ElementInput;
use takeoff_core::project::GlobalSettings;

/// Takeoff - construction material estimates
#[derive(Parser)]
#[command(name = "takeoff")]
#[command(version)]
#[command(about = "Estimate raw construction materials for structural elements", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Ledger file holding projects and recorded estimates
    #[arg(long, global = true, env = "TAKEOFF_LEDGER", default_value = "takeoff.tko")]
    pub ledger: PathBuf,

    /// Name recorded as the lock owner while the ledger is open for writing
    #[arg(long, global = true, env = "TAKEOFF_USER", default_value = "takeoff")]
    pub user: String,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Estimate the materials of one element and record it
    Estimate(EstimateArgs),

    /// List the recorded estimates of a project, oldest first
    History(ProjectArg),

    /// Sum every recorded material of a project
    Bom(ProjectArg),

    /// Render one recorded estimate as text or PDF
    Report(ReportArgs),

    /// List element types and the dimensions each requires
    Types,

    /// Show the ledger settings, or change them when options are given
    Settings(SettingsArgs),
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// Register a new project
    Add(ProjectAddArgs),

    /// List projects, oldest first
    List,
}

#[derive(Args)]
pub struct ProjectAddArgs {
    /// Project name
    #[arg(long)]
    pub name: String,

    /// Client name
    #[arg(long, default_value = "")]
    pub client: String,

    /// Site address
    #[arg(long, default_value = "")]
    pub address: String,

    /// Responsible engineer
    #[arg(long, default_value = "")]
    pub engineer: String,
}

#[derive(Args)]
pub struct ProjectArg {
    /// Project id, or its exact name
    #[arg(short, long)]
    pub project: String,
}

#[derive(Args)]
pub struct EstimateArgs {
    /// Project id, or its exact name
    #[arg(short, long)]
    pub project: String,

    /// Element type (e.g. square-column, slab-subfloor, brick-wall)
    #[arg(short = 't', long = "type")]
    pub element_type: String,

    /// Height in meters
    #[arg(long)]
    pub height: Option<f64>,

    /// Width in meters
    #[arg(long)]
    pub width: Option<f64>,

    /// Length in meters
    #[arg(long)]
    pub length: Option<f64>,

    /// Thickness in meters
    #[arg(long)]
    pub thickness: Option<f64>,

    /// Depth in meters (accepted, not used by any formula)
    #[arg(long)]
    pub depth: Option<f64>,

    /// Validation policy; overrides the ledger setting
    #[arg(long, env = "TAKEOFF_STRICTNESS")]
    pub strictness: Option<Strictness>,

    /// Shorthand for `--strictness lenient`; takes precedence
    #[arg(long)]
    pub lenient: bool,

    /// Compute and print without recording
    #[arg(long)]
    pub dry_run: bool,
}

impl EstimateArgs {
    /// The element as typed on the command line, not yet checked.
    pub fn element_input(&self) -> ElementInput {
        ElementInput {
            element_type: Some(self.element_type.clone()),
            height: self.height,
            width: self.width,
            length: self.length,
            thickness: self.thickness,
            depth: self.depth,
        }
    }

    /// Flag, then environment, then the ledger's own setting.
    pub fn strictness_or(&self, ledger_default: Strictness) -> Strictness {
        if self.lenient {
            Strictness::Lenient
        } else {
            self.strictness.unwrap_or(ledger_default)
        }
    }
}

#[derive(Args)]
pub struct ReportArgs {
    /// Record id
    #[arg(short, long)]
    pub record: String,

    /// Write a PDF to this path instead of printing text
    #[arg(long, value_name = "OUT")]
    pub pdf: Option<PathBuf>,
}

#[derive(Args)]
pub struct SettingsArgs {
    /// Default validation policy for new estimates
    #[arg(long)]
    pub strictness: Option<Strictness>,

    /// Decimal places for non-count quantities in reports
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=9))]
    pub report_decimals: Option<u8>,
}

impl SettingsArgs {
    pub fn is_update(&self) -> bool {
        self.strictness.is_some() || self.report_decimals.is_some()
    }

    /// `current` with the given options applied.
    pub fn apply(&self, current: GlobalSettings) -> GlobalSettings {
        GlobalSettings {
            strictness: self.strictness.unwrap_or(current.strictness),
            report_decimals: self
                .report_decimals
                .map(usize::from)
                .unwrap_or(current.report_decimals),
        }
    }
}
