use crate::extractor::classifier::{classify_sheet, normalize_header, HeaderMap, SheetCategory};
use crate::extractor::records::{
    Inventory, LparRecord, MemoryRecord, NetworkAdapterRecord, ProcessorRecord, SystemRecord,
};
use calamine::{Data, Range};
use regex::Regex;

/// Stateless per-sheet extractor. Classifies a sheet, maps its header row
/// to record fields and turns each data row into one record.
pub struct SheetExtractor {
    fiber_pattern: Regex,
    ansi_pattern: Regex,
}

impl SheetExtractor {
    pub fn new() -> Self {
        Self {
            // Fiber-channel adapters are excluded from network reporting.
            // Bare "fc" is not matched; it collides with ordinary adapter
            // feature codes.
            fiber_pattern: Regex::new(r"(?i)fib(er|re)").expect("hardcoded pattern"),
            ansi_pattern: Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("hardcoded pattern"),
        }
    }

    /// Extract all records from one sheet into `inventory`. Returns the
    /// number of records produced; an unclassifiable sheet yields zero.
    pub fn extract_range(
        &self,
        source_file: &str,
        sheet_name: &str,
        range: &Range<Data>,
        inventory: &mut Inventory,
    ) -> usize {
        let mut rows = range.rows();

        let header_row = match rows.next() {
            Some(row) => row,
            None => return 0,
        };

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| normalize_header(&self.clean_cell(cell)))
            .collect();

        let category = match classify_sheet(sheet_name, &headers) {
            Some(category) => category,
            // Benign: sheets like change logs or legends carry nothing we
            // recognize.
            None => return 0,
        };

        let header_map = HeaderMap::build(category, &headers);
        let mut extracted = 0;

        for row in rows {
            let cells: Vec<String> = row.iter().map(|cell| self.clean_cell(cell)).collect();

            if cells.iter().all(|cell| cell.is_empty()) {
                continue;
            }

            let field = |name: &str| -> Option<String> {
                header_map
                    .get(name)
                    .and_then(|idx| cells.get(idx))
                    .filter(|value| !value.is_empty())
                    .cloned()
            };

            match category {
                SheetCategory::System => inventory.systems.push(SystemRecord {
                    hostname: field("hostname"),
                    serial: field("serial"),
                    model: field("model"),
                    firmware: field("firmware"),
                    scan_date: field("scan_date"),
                    source_file: source_file.to_string(),
                }),
                SheetCategory::Lpar => inventory.lpars.push(LparRecord {
                    name: field("name"),
                    system: field("system"),
                    state: field("state"),
                    processors: field("processors"),
                    memory: field("memory"),
                    source_file: source_file.to_string(),
                }),
                SheetCategory::Processor => inventory.processors.push(ProcessorRecord {
                    system: field("system"),
                    kind: field("kind"),
                    count: field("count"),
                    clock: field("clock"),
                    source_file: source_file.to_string(),
                }),
                SheetCategory::Memory => inventory.memory.push(MemoryRecord {
                    system: field("system"),
                    total: field("total"),
                    available: field("available"),
                    source_file: source_file.to_string(),
                }),
                SheetCategory::NetworkAdapter => {
                    let kind = field("kind");
                    let name = field("name");

                    // Hard filter: fiber cards never reach the collection.
                    if self.is_fiber(kind.as_deref()) || self.is_fiber(name.as_deref()) {
                        continue;
                    }

                    inventory.network_adapters.push(NetworkAdapterRecord {
                        system: field("system"),
                        name,
                        kind,
                        status: field("status"),
                        source_file: source_file.to_string(),
                    });
                }
            }

            extracted += 1;
        }

        extracted
    }

    pub fn is_fiber(&self, value: Option<&str>) -> bool {
        value.is_some_and(|v| self.fiber_pattern.is_match(v))
    }

    /// Scanner exports carry stray ANSI sequences and control characters;
    /// strip them and trim before any matching happens.
    fn clean_cell(&self, cell: &Data) -> String {
        let raw = cell_to_string(cell);
        let without_ansi = self.ansi_pattern.replace_all(&raw, "");
        without_ansi
            .chars()
            .filter(|c| !c.is_control())
            .collect::<String>()
            .trim()
            .to_string()
    }
}

impl Default for SheetExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{:.0}", f)
            } else {
                format!("{}", f)
            }
        }
        Data::Int(i) => format!("{}", i),
        Data::Bool(b) => {
            if *b {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        Data::Error(e) => format!("#ERROR: {:?}", e),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(cells: &[&[&str]]) -> Range<Data> {
        let rows = cells.len() as u32;
        let cols = cells.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (rows.saturating_sub(1), cols.saturating_sub(1)));

        for (r, row) in cells.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    range.set_value((r as u32, c as u32), Data::String(value.to_string()));
                }
            }
        }

        range
    }

    #[test]
    fn test_system_sheet_extraction() {
        let range = sheet(&[
            &["System Name", "Serial Number", "Type Model", "FW Level"],
            &["p9-prod-01", "06AB123", "9009-42A", "VL950_092"],
            &["p9-prod-02", "06CD456", "9009-42A", "VL950_092"],
        ]);

        let extractor = SheetExtractor::new();
        let mut inventory = Inventory::new();
        let count = extractor.extract_range("scan.xlsx", "system_summary", &range, &mut inventory);

        assert_eq!(count, 2);
        assert_eq!(inventory.systems.len(), 2);
        assert_eq!(inventory.systems[0].hostname.as_deref(), Some("p9-prod-01"));
        assert_eq!(inventory.systems[0].serial.as_deref(), Some("06AB123"));
        assert_eq!(inventory.systems[0].scan_date, None);
        assert_eq!(inventory.systems[0].source_file, "scan.xlsx");
    }

    #[test]
    fn test_unclassifiable_sheet_is_skipped() {
        let range = sheet(&[&["Foo", "Bar"], &["1", "2"]]);

        let extractor = SheetExtractor::new();
        let mut inventory = Inventory::new();
        let count = extractor.extract_range("scan.xlsx", "Legend", &range, &mut inventory);

        assert_eq!(count, 0);
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_empty_rows_are_skipped() {
        let range = sheet(&[
            &["LPAR Name", "Managed System", "State"],
            &["lpar01", "p9-prod-01", "Running"],
            &["", "", ""],
            &["lpar02", "p9-prod-01", "Not Activated"],
        ]);

        let extractor = SheetExtractor::new();
        let mut inventory = Inventory::new();
        let count = extractor.extract_range("scan.xlsx", "lpar_profiles", &range, &mut inventory);

        assert_eq!(count, 2);
        assert_eq!(inventory.lpars.len(), 2);
        assert_eq!(inventory.lpars[1].state.as_deref(), Some("Not Activated"));
    }

    #[test]
    fn test_fiber_adapters_are_excluded() {
        let range = sheet(&[
            &["Managed System", "Adapter Name", "Adapter Type", "Status"],
            &["p9-prod-01", "ent0", "Ethernet", "Available"],
            &["p9-prod-01", "fcs0", "Fiber Channel", "Available"],
            &["p9-prod-01", "Fibre card slot 2", "Other", "Defined"],
            &["p9-prod-01", "ent1", "Ethernet", "Defined"],
        ]);

        let extractor = SheetExtractor::new();
        let mut inventory = Inventory::new();
        let count = extractor.extract_range("scan.xlsx", "network", &range, &mut inventory);

        assert_eq!(count, 2);
        assert_eq!(inventory.network_adapters.len(), 2);
        assert!(inventory
            .network_adapters
            .iter()
            .all(|a| !extractor.is_fiber(a.kind.as_deref()) && !extractor.is_fiber(a.name.as_deref())));
    }

    #[test]
    fn test_missing_column_leaves_field_unset() {
        let range = sheet(&[
            &["Managed System", "Total Memory (GB)"],
            &["p9-prod-01", "512"],
            &["p9-prod-02", "1024"],
        ]);

        let extractor = SheetExtractor::new();
        let mut inventory = Inventory::new();
        extractor.extract_range("scan.xlsx", "memory", &range, &mut inventory);

        assert_eq!(inventory.memory.len(), 2);
        for record in &inventory.memory {
            assert!(record.total.is_some());
            assert_eq!(record.available, None);
        }
    }

    #[test]
    fn test_numeric_cells_are_stringified() {
        let mut range = Range::new((0, 0), (1, 1));
        range.set_value((0, 0), Data::String("Managed System".to_string()));
        range.set_value((0, 1), Data::String("Total Memory".to_string()));
        range.set_value((1, 0), Data::String("p9-prod-01".to_string()));
        range.set_value((1, 1), Data::Float(512.0));

        let extractor = SheetExtractor::new();
        let mut inventory = Inventory::new();
        extractor.extract_range("scan.xlsx", "memory", &range, &mut inventory);

        assert_eq!(inventory.memory[0].total.as_deref(), Some("512"));
    }

    #[test]
    fn test_cell_cleaning_strips_ansi_and_controls() {
        let extractor = SheetExtractor::new();
        let cell = Data::String("\x1b[31mp9-prod-01\x1b[0m\t ".to_string());
        assert_eq!(extractor.clean_cell(&cell), "p9-prod-01");
    }

    #[test]
    fn test_fiber_pattern_variants() {
        let extractor = SheetExtractor::new();
        assert!(extractor.is_fiber(Some("Fiber Channel")));
        assert!(extractor.is_fiber(Some("FIBRE")));
        assert!(extractor.is_fiber(Some("2-port fibre adapter")));
        assert!(!extractor.is_fiber(Some("Ethernet")));
        assert!(!extractor.is_fiber(None));
    }

    #[test]
    fn test_mixed_sources_accumulate() {
        let range_a = sheet(&[
            &["Hostname", "Serial"],
            &["host-a", "S1"],
        ]);
        let range_b = sheet(&[
            &["Hostname", "Serial"],
            &["host-b", "S2"],
        ]);

        let extractor = SheetExtractor::new();
        let mut inventory = Inventory::new();
        extractor.extract_range("a.xls", "system", &range_a, &mut inventory);
        extractor.extract_range("b.xlsx", "system", &range_b, &mut inventory);

        assert_eq!(inventory.systems.len(), 2);
        assert_eq!(inventory.summary().distinct_systems, 2);
        assert_eq!(inventory.systems[0].source_file, "a.xls");
        assert_eq!(inventory.systems[1].source_file, "b.xlsx");
    }
}
