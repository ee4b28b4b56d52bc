pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod report;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, InputConfig, ReportConfig};
pub use error::{HmcReportError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    ExtractionProgress, Inventory, InventorySummary, SheetExtractor, WorkbookExtractor,
};
pub use report::ReportComposer;
pub use scanner::{SourceDiscovery, SpreadsheetFile};
pub use ui::{OutputFormatter, OutputMode, ProgressAwareOutput, ProgressManager};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Final account of one extraction run, suitable for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub summary: InventorySummary,
    pub files_processed: usize,
    pub sheets_processed: usize,
    pub records_extracted: usize,
    pub warnings: Vec<String>,
    pub output_path: String,
    pub generated_at: DateTime<Utc>,
}

/// Main library interface: discovers scanner exports, extracts their
/// inventory and writes the consolidated report.
pub struct HmcReport {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl HmcReport {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    /// Create an HmcReport instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            crate::cli::OutputFormat::Human => OutputMode::Human,
            crate::cli::OutputFormat::Json => OutputMode::Json,
            crate::cli::OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbose,
            cli_args.quiet,
        ))
    }

    /// Run the full pipeline: discover, extract, compose, write.
    pub fn generate_report(&self) -> Result<RunReport> {
        self.output_formatter
            .start_operation("Starting inventory extraction");

        let files = self.discover_sources()?;

        if files.is_empty() {
            return Err(HmcReportError::NoInputFiles {
                directory: self.config.input.directory.display().to_string(),
            });
        }

        self.output_formatter
            .info(&format!("Found {} spreadsheet files", files.len()));

        let (inventory, progress) = self.extract_inventory(&files);

        let warning_output =
            ProgressAwareOutput::new(&self.output_formatter, Some(&self.progress_manager));
        for warning in &progress.errors {
            warning_output.warning(warning);
        }

        self.output_formatter
            .start_operation("Writing inventory report");

        let composer = ReportComposer::new(&self.config.report.title);
        composer.write_report(&inventory, &self.config.report.path)?;

        self.output_formatter.success(&format!(
            "Report written to {}",
            self.config.report.path.display()
        ));

        self.output_formatter.print_extraction_summary(&progress);

        Ok(RunReport {
            summary: inventory.summary(),
            files_processed: progress.files_processed,
            sheets_processed: progress.sheets_processed,
            records_extracted: progress.records_extracted,
            warnings: progress.errors.clone(),
            output_path: self.config.report.path.display().to_string(),
            generated_at: Utc::now(),
        })
    }

    /// Enumerate the spreadsheet files the run would process.
    pub fn discover_sources(&self) -> Result<Vec<SpreadsheetFile>> {
        let discovery = SourceDiscovery::new(&self.config.input);
        let files = discovery.discover(&self.config.input.directory)?;

        let stats = discovery.get_statistics(&files);
        self.output_formatter.debug(&stats.display_summary());

        Ok(files)
    }

    /// Extract all files with progress tracking
    fn extract_inventory(&self, files: &[SpreadsheetFile]) -> (Inventory, ExtractionProgress) {
        self.output_formatter
            .start_operation("Reading scanner exports");

        let file_progress = self.progress_manager.create_file_progress(files.len() as u64);
        let progress_callback = {
            let pb = file_progress.clone();
            move |progress: &ExtractionProgress| {
                ui::progress::update_file_progress(&pb, progress);
            }
        };

        let extractor = WorkbookExtractor::new();
        let (inventory, progress) = extractor.extract_all(files, Some(&progress_callback));

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Extracted {} records", progress.records_extracted),
            progress.elapsed(),
        );

        (inventory, progress)
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(HmcReportError::Io)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &HmcReportError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
