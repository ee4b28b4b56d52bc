use thiserror::Error;

#[derive(Error, Debug)]
pub enum HmcReportError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("No spreadsheet files found in {directory}")]
    NoInputFiles { directory: String },

    #[error("Failed to read spreadsheet {file}: {message}")]
    Spreadsheet { file: String, message: String },

    #[error("Failed to write report to {path}")]
    OutputWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Permission denied: {path}")]
    Permission { path: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for HmcReportError {
    fn user_message(&self) -> String {
        match self {
            HmcReportError::NoInputFiles { directory } => {
                format!("No spreadsheet files found in {}", directory)
            }
            HmcReportError::Spreadsheet { file, message } => {
                format!("Could not read spreadsheet {}: {}", file, message)
            }
            HmcReportError::OutputWrite { path, source } => {
                format!("Could not write report to {}: {}", path, source)
            }
            HmcReportError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            HmcReportError::Permission { path } => {
                format!("Permission denied accessing: {}", path)
            }
            HmcReportError::InvalidPath { path } => {
                format!("Invalid path: {}", path)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            HmcReportError::NoInputFiles { .. } => Some(
                "Place the HMC scanner .xls/.xlsx exports in the input directory, or point \
                 hmcreport at another directory (first positional argument or [input] directory \
                 in the config file)."
                    .to_string(),
            ),
            HmcReportError::Spreadsheet { .. } => Some(
                "The file may be corrupt or saved in an unsupported format. Re-export it from \
                 the HMC scanner and try again."
                    .to_string(),
            ),
            HmcReportError::OutputWrite { .. } => Some(
                "Check that the destination directory exists and is writable, or choose a \
                 different report path with --output."
                    .to_string(),
            ),
            HmcReportError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present."
                    .to_string(),
            ),
            HmcReportError::Permission { .. } => Some(
                "Ensure you have the necessary read/write permissions for the target directory."
                    .to_string(),
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for HmcReportError {
    fn from(error: toml::de::Error) -> Self {
        HmcReportError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HmcReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = HmcReportError::NoInputFiles {
            directory: "HMCscannerfile".to_string(),
        };
        assert!(error.user_message().contains("No spreadsheet files"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_spreadsheet_error_names_file() {
        let error = HmcReportError::Spreadsheet {
            file: "scan_2024.xlsx".to_string(),
            message: "not a zip archive".to_string(),
        };
        assert!(error.user_message().contains("scan_2024.xlsx"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_error = toml::from_str::<toml::Value>("not = valid = toml").unwrap_err();
        let error = HmcReportError::from(toml_error);
        assert!(matches!(error, HmcReportError::Config { .. }));
    }
}
