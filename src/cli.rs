use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hmcreport")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Consolidate HMC scanner spreadsheet exports into an inventory report")]
#[command(
    long_about = "HmcReport scans a directory of HMC scanner spreadsheet exports (.xls/.xlsx), \
                  classifies each sheet (system, LPAR, processor, memory, network adapter) and \
                  renders one consolidated Markdown report with summary counts and tables."
)]
#[command(after_help = "EXAMPLES:\n  \
    hmcreport\n  \
    hmcreport ./scans --output inventory.md\n  \
    hmcreport --config my-config.toml --verbose\n  \
    hmcreport --dry-run ./scans")]
pub struct Cli {
    /// Input directory containing .xls/.xlsx exports (defaults to HMCscannerfile)
    pub input_dir: Option<PathBuf>,

    /// Report output path (defaults to System_Server_Report.md)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report title
    #[arg(long)]
    pub title: Option<String>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for console results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (list the files that would be processed without extracting)
    #[arg(long, help = "Show what would be processed without writing the report")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_input_dir(self.input_dir.clone())
            .with_output_path(self.output.clone())
            .with_title(self.title.clone())
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0 && !self.quiet
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
