use clap::Parser;
use hmcreport::{Cli, Config, HmcReport, HmcReportError, OutputFormatter, OutputMode, UserFriendlyError};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let app = match HmcReport::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&e);
            return 6;
        }
    };

    if cli.dry_run {
        return handle_dry_run(&app);
    }

    match app.generate_report() {
        Ok(report) => {
            app.output_formatter().print_run_report(&report);

            if report.warnings.is_empty() {
                0
            } else {
                2 // Success with warnings
            }
        }
        Err(e) => {
            app.handle_error(&e);

            match e {
                HmcReportError::NoInputFiles { .. } => 3,
                HmcReportError::OutputWrite { .. } => 4,
                HmcReportError::Permission { .. } => 5,
                HmcReportError::Config { .. } => 6,
                _ => 1,
            }
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "hmcreport.toml".to_string());

    match HmcReport::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  hmcreport --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(app: &HmcReport) -> i32 {
    let formatter = app.output_formatter();

    formatter.info("DRY RUN MODE - No report will be written");
    formatter.print_separator();

    formatter.info("Configuration that would be used:");
    let config = app.config();

    println!("  Input directory: {}", config.input.directory.display());
    println!("  Extensions: {}", config.input.extensions.join(", "));
    println!("  Max depth: {}", config.input.max_depth);
    println!("  Report path: {}", config.report.path.display());
    println!("  Report title: {}", config.report.title);

    formatter.print_separator();

    let files = match app.discover_sources() {
        Ok(files) => files,
        Err(e) => {
            formatter.error(&format!("Discovery failed: {}", e.user_message()));
            return 1;
        }
    };

    if files.is_empty() {
        formatter.warning(&format!(
            "No spreadsheet files found in {}",
            config.input.directory.display()
        ));
    } else {
        formatter.info(&format!("Would process {} files:", files.len()));
        for file in &files {
            println!("  {} ({})", file.filename, file.format_size());
        }
    }

    formatter.print_separator();
    formatter.success("Dry run completed successfully");
    formatter.info("Run without --dry-run to generate the report");

    0
}

fn print_startup_error(error: &HmcReportError) {
    // Basic formatter for errors raised before the app is configured
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmcreport::OutputFormat;
    use std::fs;
    use tempfile::TempDir;

    fn test_cli(config_path: Option<std::path::PathBuf>) -> Cli {
        Cli {
            input_dir: None,
            output: None,
            title: None,
            config: config_path,
            output_format: OutputFormat::Plain,
            verbose: 0,
            quiet: true,
            dry_run: false,
            generate_config: false,
        }
    }

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let mut cli = test_cli(Some(config_path.clone()));
        cli.generate_config = true;

        let exit_code = handle_generate_config(&cli);
        assert_eq!(exit_code, 0);
        assert!(config_path.exists());

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[input]"));
    }

    #[test]
    fn test_dry_run_with_missing_directory() {
        let temp_dir = TempDir::new().unwrap();

        let mut config = Config::default();
        config.input.directory = temp_dir.path().join("does-not-exist");

        let app = HmcReport::new(config, OutputMode::Plain, 0, true);
        let exit_code = handle_dry_run(&app);
        assert_eq!(exit_code, 0);
    }

    #[test]
    fn test_dry_run_lists_discovered_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("scan.xlsx"), b"stub").unwrap();

        let mut config = Config::default();
        config.input.directory = temp_dir.path().to_path_buf();

        let app = HmcReport::new(config, OutputMode::Plain, 0, true);
        let exit_code = handle_dry_run(&app);
        assert_eq!(exit_code, 0);
    }
}
