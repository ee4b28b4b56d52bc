use crate::error::{HmcReportError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub input: InputConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub directory: PathBuf,
    pub extensions: Vec<String>,
    pub max_depth: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    pub path: PathBuf,
    pub title: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            // The directory name the HMC scanner drops its exports into.
            directory: PathBuf::from("HMCscannerfile"),
            extensions: vec!["xls".to_string(), "xlsx".to_string()],
            max_depth: 1,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("System_Server_Report.md"),
            title: "System Server Report".to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(HmcReportError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| HmcReportError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| HmcReportError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["hmcreport.toml", ".hmcreport.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref input_dir) = cli_args.input_dir {
            self.input.directory = input_dir.clone();
        }

        if let Some(ref output_path) = cli_args.output_path {
            self.report.path = output_path.clone();
        }

        if let Some(ref title) = cli_args.title {
            self.report.title = title.clone();
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| HmcReportError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| HmcReportError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.input.extensions.is_empty() {
            return Err(HmcReportError::Config {
                message: "At least one spreadsheet extension must be specified".to_string(),
            });
        }

        if self.input.max_depth == 0 {
            return Err(HmcReportError::Config {
                message: "Maximum directory depth must be greater than 0".to_string(),
            });
        }

        if self.report.title.trim().is_empty() {
            return Err(HmcReportError::Config {
                message: "Report title must not be empty".to_string(),
            });
        }

        if self.report.path.as_os_str().is_empty() {
            return Err(HmcReportError::Config {
                message: "Report path must not be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub input_dir: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub title: Option<String>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input_dir(mut self, input_dir: Option<PathBuf>) -> Self {
        self.input_dir = input_dir;
        self
    }

    pub fn with_output_path(mut self, output_path: Option<PathBuf>) -> Self {
        self.output_path = output_path;
        self
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.directory, PathBuf::from("HMCscannerfile"));
        assert_eq!(config.input.extensions, vec!["xls", "xlsx"]);
        assert_eq!(config.report.path, PathBuf::from("System_Server_Report.md"));
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.input.extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let config = Config::default();
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded_config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.report.title, loaded_config.report.title);
        assert_eq!(config.input.extensions, loaded_config.input.extensions);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_input_dir(Some(PathBuf::from("scans")))
            .with_output_path(Some(PathBuf::from("out/report.md")));

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.input.directory, PathBuf::from("scans"));
        assert_eq!(config.report.path, PathBuf::from("out/report.md"));
        assert_eq!(config.report.title, "System Server Report");
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(!sample.is_empty());
        assert!(sample.contains("[input]"));
        assert!(sample.contains("[report]"));
    }

    #[test]
    fn test_missing_config_file() {
        assert!(Config::load_from_file("does-not-exist.toml").is_err());
    }
}
