use crate::error::{HmcReportError, Result};
use crate::extractor::records::{Inventory, MISSING_VALUE};
use chrono::Utc;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Renders an inventory as a Markdown report and writes it to disk.
///
/// The document layout is fixed: title, generation timestamp, a summary
/// block, then one table per record kind in a stable order. Running the
/// composer twice over the same inventory produces identical tables.
pub struct ReportComposer {
    title: String,
}

impl ReportComposer {
    pub fn new<S: Into<String>>(title: S) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn compose(&self, inventory: &Inventory) -> String {
        let summary = inventory.summary();
        let mut doc = String::new();

        doc.push_str(&format!("# {}\n\n", self.title));
        doc.push_str(&format!(
            "Generated: {}\n\n",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ));

        doc.push_str("## Summary\n\n");
        doc.push_str(&format!("- Systems: {}\n", summary.distinct_systems));
        doc.push_str(&format!("- LPARs: {}\n", summary.lpars));
        doc.push_str(&format!("- Processor entries: {}\n", summary.processor_entries));
        doc.push_str(&format!("- Memory entries: {}\n", summary.memory_entries));
        doc.push_str(&format!("- Network adapters: {}\n\n", summary.network_adapters));

        self.compose_systems(inventory, &mut doc);
        self.compose_lpars(inventory, &mut doc);
        self.compose_processors(inventory, &mut doc);
        self.compose_memory(inventory, &mut doc);
        self.compose_network_adapters(inventory, &mut doc);

        doc
    }

    fn compose_systems(&self, inventory: &Inventory, doc: &mut String) {
        doc.push_str("## Systems\n\n");
        if inventory.systems.is_empty() {
            doc.push_str("No system records found.\n\n");
            return;
        }

        doc.push_str("| Hostname | Serial | Model | Firmware | Scan Date | Source |\n");
        doc.push_str("|----------|--------|-------|----------|-----------|--------|\n");
        for record in &inventory.systems {
            doc.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                cell(&record.hostname),
                cell(&record.serial),
                cell(&record.model),
                cell(&record.firmware),
                cell(&record.scan_date),
                escape_cell(&record.source_file),
            ));
        }
        doc.push('\n');
    }

    fn compose_lpars(&self, inventory: &Inventory, doc: &mut String) {
        doc.push_str("## LPARs\n\n");
        if inventory.lpars.is_empty() {
            doc.push_str("No LPAR records found.\n\n");
            return;
        }

        doc.push_str("| Name | System | State | Processors | Memory | Source |\n");
        doc.push_str("|------|--------|-------|------------|--------|--------|\n");
        for record in &inventory.lpars {
            doc.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                cell(&record.name),
                cell(&record.system),
                cell(&record.state),
                cell(&record.processors),
                cell(&record.memory),
                escape_cell(&record.source_file),
            ));
        }
        doc.push('\n');
    }

    fn compose_processors(&self, inventory: &Inventory, doc: &mut String) {
        doc.push_str("## Processors\n\n");
        if inventory.processors.is_empty() {
            doc.push_str("No processor records found.\n\n");
            return;
        }

        doc.push_str("| System | Type | Count | Clock | Source |\n");
        doc.push_str("|--------|------|-------|-------|--------|\n");
        for record in &inventory.processors {
            doc.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                cell(&record.system),
                cell(&record.kind),
                cell(&record.count),
                cell(&record.clock),
                escape_cell(&record.source_file),
            ));
        }
        doc.push('\n');
    }

    fn compose_memory(&self, inventory: &Inventory, doc: &mut String) {
        doc.push_str("## Memory\n\n");
        if inventory.memory.is_empty() {
            doc.push_str("No memory records found.\n\n");
            return;
        }

        doc.push_str("| System | Total | Available | Source |\n");
        doc.push_str("|--------|-------|-----------|--------|\n");
        for record in &inventory.memory {
            doc.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                cell(&record.system),
                cell(&record.total),
                cell(&record.available),
                escape_cell(&record.source_file),
            ));
        }
        doc.push('\n');
    }

    fn compose_network_adapters(&self, inventory: &Inventory, doc: &mut String) {
        doc.push_str("## Network Adapters\n\n");
        if inventory.network_adapters.is_empty() {
            doc.push_str("No network adapter records found.\n\n");
            return;
        }

        doc.push_str("| System | Name | Type | Status | Source |\n");
        doc.push_str("|--------|------|------|--------|--------|\n");
        for record in &inventory.network_adapters {
            doc.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                cell(&record.system),
                cell(&record.name),
                cell(&record.kind),
                cell(&record.status),
                escape_cell(&record.source_file),
            ));
        }
        doc.push('\n');
    }

    /// Write the report atomically: compose into a temp file next to the
    /// target, then persist over it. Readers never see a half-written report.
    pub fn write_report<P: AsRef<Path>>(&self, inventory: &Inventory, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = self.compose(inventory);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| HmcReportError::OutputWrite {
                    path: path.display().to_string(),
                    source,
                })?;
            }
        }

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp = NamedTempFile::new_in(dir).map_err(|source| HmcReportError::OutputWrite {
            path: path.display().to_string(),
            source,
        })?;

        temp.write_all(content.as_bytes())
            .map_err(|source| HmcReportError::OutputWrite {
                path: path.display().to_string(),
                source,
            })?;

        temp.persist(path)
            .map_err(|err| HmcReportError::OutputWrite {
                path: path.display().to_string(),
                source: err.error,
            })?;

        Ok(())
    }
}

fn cell(value: &Option<String>) -> String {
    match value {
        Some(v) => escape_cell(v),
        None => MISSING_VALUE.to_string(),
    }
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::records::{LparRecord, SystemRecord};
    use tempfile::TempDir;

    fn sample_inventory() -> Inventory {
        let mut inventory = Inventory::new();
        inventory.systems.push(SystemRecord {
            hostname: Some("hmc01".to_string()),
            serial: Some("0612ABC".to_string()),
            model: Some("9119-MME".to_string()),
            firmware: None,
            scan_date: None,
            source_file: "scan.xlsx".to_string(),
        });
        inventory.lpars.push(LparRecord {
            name: Some("prod-db".to_string()),
            system: Some("hmc01".to_string()),
            state: Some("Running".to_string()),
            processors: Some("4".to_string()),
            memory: Some("32768".to_string()),
            source_file: "scan.xlsx".to_string(),
        });
        inventory
    }

    #[test]
    fn test_compose_contains_sections_in_order() {
        let composer = ReportComposer::new("System Server Report");
        let doc = composer.compose(&sample_inventory());

        let systems = doc.find("## Systems").unwrap();
        let lpars = doc.find("## LPARs").unwrap();
        let processors = doc.find("## Processors").unwrap();
        let memory = doc.find("## Memory").unwrap();
        let network = doc.find("## Network Adapters").unwrap();

        assert!(systems < lpars);
        assert!(lpars < processors);
        assert!(processors < memory);
        assert!(memory < network);
    }

    #[test]
    fn test_missing_values_render_sentinel() {
        let composer = ReportComposer::new("Report");
        let doc = composer.compose(&sample_inventory());

        assert!(doc.contains("| hmc01 | 0612ABC | 9119-MME | N/A | N/A | scan.xlsx |"));
    }

    #[test]
    fn test_empty_inventory_renders_placeholders() {
        let composer = ReportComposer::new("Report");
        let doc = composer.compose(&Inventory::new());

        assert!(doc.contains("No system records found."));
        assert!(doc.contains("No LPAR records found."));
        assert!(doc.contains("No network adapter records found."));
        assert!(doc.contains("- Systems: 0"));
    }

    #[test]
    fn test_pipe_characters_are_escaped() {
        let mut inventory = Inventory::new();
        inventory.systems.push(SystemRecord {
            hostname: Some("a|b".to_string()),
            serial: None,
            model: None,
            firmware: None,
            scan_date: None,
            source_file: "scan.xlsx".to_string(),
        });

        let composer = ReportComposer::new("Report");
        let doc = composer.compose(&inventory);
        assert!(doc.contains("a\\|b"));
    }

    #[test]
    fn test_table_rows_are_stable_across_runs() {
        let composer = ReportComposer::new("Report");
        let inventory = sample_inventory();

        let first = composer.compose(&inventory);
        let second = composer.compose(&inventory);

        let tables = |doc: &str| doc.split("## Summary").nth(1).unwrap().to_string();
        // Only the timestamp line may differ between runs.
        assert_eq!(tables(&first), tables(&second));
    }

    #[test]
    fn test_write_report_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reports").join("out.md");

        let composer = ReportComposer::new("Report");
        composer.write_report(&sample_inventory(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Report"));
        assert!(content.contains("prod-db"));
    }
}
