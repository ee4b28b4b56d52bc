use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Display value for a field whose column was absent or whose cell was
/// empty. Table rows always render every column, so absence must be a
/// visible placeholder rather than a dropped cell.
pub const MISSING_VALUE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemRecord {
    pub hostname: Option<String>,
    pub serial: Option<String>,
    pub model: Option<String>,
    pub firmware: Option<String>,
    pub scan_date: Option<String>,
    pub source_file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LparRecord {
    pub name: Option<String>,
    pub system: Option<String>,
    pub state: Option<String>,
    pub processors: Option<String>,
    pub memory: Option<String>,
    pub source_file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorRecord {
    pub system: Option<String>,
    pub kind: Option<String>,
    pub count: Option<String>,
    pub clock: Option<String>,
    pub source_file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub system: Option<String>,
    pub total: Option<String>,
    pub available: Option<String>,
    pub source_file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAdapterRecord {
    pub system: Option<String>,
    pub name: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
    pub source_file: String,
}

/// Append-only accumulator for everything extracted during one run.
/// Records are created once here and consumed once by the composer.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub systems: Vec<SystemRecord>,
    pub lpars: Vec<LparRecord>,
    pub processors: Vec<ProcessorRecord>,
    pub memory: Vec<MemoryRecord>,
    pub network_adapters: Vec<NetworkAdapterRecord>,
    pub warnings: Vec<String>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_records(&self) -> usize {
        self.systems.len()
            + self.lpars.len()
            + self.processors.len()
            + self.memory.len()
            + self.network_adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_records() == 0
    }

    pub fn add_warning<S: Into<String>>(&mut self, warning: S) {
        self.warnings.push(warning.into());
    }

    /// Merge another inventory into this one. Used when per-file extraction
    /// runs on worker threads and the results are combined afterwards.
    pub fn merge(&mut self, other: Inventory) {
        self.systems.extend(other.systems);
        self.lpars.extend(other.lpars);
        self.processors.extend(other.processors);
        self.memory.extend(other.memory);
        self.network_adapters.extend(other.network_adapters);
        self.warnings.extend(other.warnings);
    }

    pub fn summary(&self) -> InventorySummary {
        // Distinct systems are keyed by the hostname/serial pair; two rows
        // for the same machine across files count once.
        let distinct: HashSet<(Option<&str>, Option<&str>)> = self
            .systems
            .iter()
            .map(|s| (s.hostname.as_deref(), s.serial.as_deref()))
            .collect();

        InventorySummary {
            distinct_systems: distinct.len(),
            lpars: self.lpars.len(),
            processor_entries: self.processors.len(),
            memory_entries: self.memory.len(),
            network_adapters: self.network_adapters.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub distinct_systems: usize,
    pub lpars: usize,
    pub processor_entries: usize,
    pub memory_entries: usize,
    pub network_adapters: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system(hostname: &str, serial: &str, source: &str) -> SystemRecord {
        SystemRecord {
            hostname: Some(hostname.to_string()),
            serial: Some(serial.to_string()),
            model: None,
            firmware: None,
            scan_date: None,
            source_file: source.to_string(),
        }
    }

    #[test]
    fn test_distinct_systems_by_hostname_serial() {
        let mut inventory = Inventory::new();
        inventory.systems.push(system("p9-prod", "06AB123", "a.xlsx"));
        inventory.systems.push(system("p9-prod", "06AB123", "b.xlsx"));
        inventory.systems.push(system("p9-dev", "06CD456", "a.xlsx"));

        let summary = inventory.summary();
        assert_eq!(summary.distinct_systems, 2);
    }

    #[test]
    fn test_merge_combines_collections() {
        let mut left = Inventory::new();
        left.systems.push(system("host-a", "S1", "a.xlsx"));
        left.add_warning("warn-a");

        let mut right = Inventory::new();
        right.systems.push(system("host-b", "S2", "b.xlsx"));
        right.lpars.push(LparRecord {
            name: Some("lpar1".to_string()),
            system: Some("host-b".to_string()),
            state: None,
            processors: None,
            memory: None,
            source_file: "b.xlsx".to_string(),
        });

        left.merge(right);

        assert_eq!(left.systems.len(), 2);
        assert_eq!(left.lpars.len(), 1);
        assert_eq!(left.warnings, vec!["warn-a".to_string()]);
        assert_eq!(left.total_records(), 3);
    }

    #[test]
    fn test_empty_inventory() {
        let inventory = Inventory::new();
        assert!(inventory.is_empty());

        let summary = inventory.summary();
        assert_eq!(summary.distinct_systems, 0);
        assert_eq!(summary.network_adapters, 0);
    }
}
