use crate::config::InputConfig;
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct SpreadsheetFile {
    pub source_path: PathBuf,
    pub filename: String,
    pub extension: String,
    pub size: u64,
    pub modified: SystemTime,
}

impl SpreadsheetFile {
    pub fn new(source_path: PathBuf, size: u64, modified: SystemTime) -> Self {
        let filename = source_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        let extension = source_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        Self {
            source_path,
            filename,
            extension,
            size,
            modified,
        }
    }

    pub fn is_legacy_format(&self) -> bool {
        self.extension == "xls"
    }

    pub fn format_size(&self) -> String {
        format_bytes(self.size)
    }
}

pub struct SourceDiscovery {
    extensions: Vec<String>,
    max_depth: usize,
}

impl SourceDiscovery {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            extensions: config
                .extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
            max_depth: config.max_depth,
        }
    }

    /// Enumerate spreadsheet files under `root`. A missing directory or a
    /// directory without matching files yields an empty list, not an error;
    /// the caller decides whether that is terminal.
    pub fn discover<P: AsRef<Path>>(&self, root: P) -> Result<Vec<SpreadsheetFile>> {
        let root_path = root.as_ref();

        if !root_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();

        let walker = WalkDir::new(root_path)
            .max_depth(self.max_depth)
            .follow_links(false)
            .into_iter();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // Unreadable entries are skipped; the run must not die on
                // one bad directory permission.
                Err(_) => continue,
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if !self.is_spreadsheet(entry.path()) {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(_) => continue,
            };

            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            files.push(SpreadsheetFile::new(
                entry.path().to_path_buf(),
                metadata.len(),
                modified,
            ));
        }

        // Sort by filename for deterministic processing and report output.
        files.sort_by(|a, b| a.filename.cmp(&b.filename));

        Ok(files)
    }

    pub fn is_spreadsheet(&self, path: &Path) -> bool {
        // Office lock files start with ~$ and carry the same extension.
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.starts_with("~$") {
                return false;
            }
        }

        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn get_statistics(&self, files: &[SpreadsheetFile]) -> ScanStatistics {
        let total_files = files.len();
        let total_size = files.iter().map(|f| f.size).sum();

        let mut files_by_extension = std::collections::HashMap::new();
        for file in files {
            *files_by_extension.entry(file.extension.clone()).or_insert(0) += 1;
        }

        ScanStatistics {
            total_files,
            total_size,
            files_by_extension,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub total_size: u64,
    pub files_by_extension: std::collections::HashMap<String, usize>,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan Results:\n  Total files: {}\n  Total size: {}\n",
            self.total_files,
            format_bytes(self.total_size)
        );

        if !self.files_by_extension.is_empty() {
            summary.push_str("  Files by type:\n");
            let mut extensions: Vec<_> = self.files_by_extension.iter().collect();
            extensions.sort_by(|a, b| b.1.cmp(a.1));

            for (ext, count) in extensions {
                summary.push_str(&format!("    {}: {} files\n", ext, count));
            }
        }

        summary
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
