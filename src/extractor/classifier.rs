use std::collections::{HashMap, HashSet};

/// The five record categories a sheet can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetCategory {
    System,
    Lpar,
    Processor,
    Memory,
    NetworkAdapter,
}

impl SheetCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            SheetCategory::System => "System Information",
            SheetCategory::Lpar => "LPAR Information",
            SheetCategory::Processor => "Processor Information",
            SheetCategory::Memory => "Memory Information",
            SheetCategory::NetworkAdapter => "Network Adapters",
        }
    }
}

// Sheet-name keyword sets, evaluated in this order. The precedence is
// fixed so an ambiguous name like "System_LPAR" always lands on the more
// specific category (LPAR) rather than whichever set happens to match
// first in an unordered lookup.
const LPAR_NAME_KEYWORDS: &[&str] = &["lpar", "partition"];
const PROCESSOR_NAME_KEYWORDS: &[&str] = &["proc", "cpu"];
const MEMORY_NAME_KEYWORDS: &[&str] = &["mem"];
const NETWORK_NAME_KEYWORDS: &[&str] = &["network", "adapter", "ethernet"];
const SYSTEM_NAME_KEYWORDS: &[&str] = &["system", "hmc", "server"];

/// One extractable field and the header spellings that map to it, ordered
/// most specific first.
pub struct FieldSpec {
    pub name: &'static str,
    pub synonyms: &'static [&'static str],
}

pub const SYSTEM_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "hostname",
        synonyms: &[
            "hostname",
            "host name",
            "system name",
            "server name",
            "managed system",
            "host",
        ],
    },
    FieldSpec {
        name: "serial",
        synonyms: &["serial"],
    },
    FieldSpec {
        name: "model",
        synonyms: &["machine type", "type model", "model"],
    },
    FieldSpec {
        name: "firmware",
        synonyms: &["firmware", "fw level", "microcode"],
    },
    FieldSpec {
        name: "scan_date",
        synonyms: &["scan date", "execution date", "scan time", "date"],
    },
];

pub const LPAR_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "name",
        synonyms: &["lpar name", "partition name", "name", "lpar", "partition"],
    },
    FieldSpec {
        name: "system",
        synonyms: &["managed system", "system", "server", "host"],
    },
    FieldSpec {
        name: "state",
        synonyms: &["state", "status"],
    },
    FieldSpec {
        name: "processors",
        synonyms: &["processing units", "entitled proc", "processors", "proc", "cpu"],
    },
    FieldSpec {
        name: "memory",
        synonyms: &["memory", "mem"],
    },
];

pub const PROCESSOR_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "system",
        synonyms: &["managed system", "system", "server", "host"],
    },
    FieldSpec {
        name: "kind",
        synonyms: &["processor type", "proc type", "type", "model"],
    },
    FieldSpec {
        name: "count",
        synonyms: &["count", "cores", "quantity", "units", "number"],
    },
    FieldSpec {
        name: "clock",
        synonyms: &["clock", "speed", "ghz", "mhz", "frequency"],
    },
];

pub const MEMORY_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "system",
        synonyms: &["managed system", "system", "server", "host"],
    },
    FieldSpec {
        name: "total",
        synonyms: &["total", "installed", "configurable"],
    },
    FieldSpec {
        name: "available",
        synonyms: &["available", "avail", "free"],
    },
];

pub const NETWORK_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "system",
        synonyms: &["managed system", "system", "server", "host"],
    },
    FieldSpec {
        name: "name",
        synonyms: &["adapter name", "description", "adapter", "device", "name"],
    },
    FieldSpec {
        name: "kind",
        synonyms: &["adapter type", "type"],
    },
    FieldSpec {
        name: "status",
        synonyms: &["status", "state"],
    },
];

pub fn field_specs(category: SheetCategory) -> &'static [FieldSpec] {
    match category {
        SheetCategory::System => SYSTEM_FIELDS,
        SheetCategory::Lpar => LPAR_FIELDS,
        SheetCategory::Processor => PROCESSOR_FIELDS,
        SheetCategory::Memory => MEMORY_FIELDS,
        SheetCategory::NetworkAdapter => NETWORK_FIELDS,
    }
}

/// Normalize a header or sheet name for keyword matching: lowercase,
/// separators to spaces, collapsed whitespace.
pub fn normalize_header(raw: &str) -> String {
    raw.to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Classify a sheet by its name, falling back to the header row for
/// unnamed/generic system sheets. Returns `None` for sheets that match no
/// category; those are skipped silently.
pub fn classify_sheet(sheet_name: &str, headers: &[String]) -> Option<SheetCategory> {
    let name = normalize_header(sheet_name);

    let name_matches = |keywords: &[&str]| keywords.iter().any(|kw| name.contains(kw));

    if name_matches(LPAR_NAME_KEYWORDS) {
        return Some(SheetCategory::Lpar);
    }
    if name_matches(PROCESSOR_NAME_KEYWORDS) {
        return Some(SheetCategory::Processor);
    }
    if name_matches(MEMORY_NAME_KEYWORDS) {
        return Some(SheetCategory::Memory);
    }
    if name_matches(NETWORK_NAME_KEYWORDS) {
        return Some(SheetCategory::NetworkAdapter);
    }
    if name_matches(SYSTEM_NAME_KEYWORDS) {
        return Some(SheetCategory::System);
    }

    // Anything else is a system-info candidate only if the header row
    // carries hostname-like or serial-like columns.
    let identifying: &[&str] = &["hostname", "host name", "system name", "serial"];
    if headers
        .iter()
        .any(|h| identifying.iter().any(|kw| h.contains(kw)))
    {
        return Some(SheetCategory::System);
    }

    None
}

/// Mapping from field names to header-row column indices for one sheet.
/// A field with no matching header simply has no entry; every row of that
/// sheet then leaves the field unset.
#[derive(Debug, Default)]
pub struct HeaderMap {
    columns: HashMap<&'static str, usize>,
}

impl HeaderMap {
    pub fn build(category: SheetCategory, headers: &[String]) -> Self {
        let mut columns = HashMap::new();
        let mut claimed = HashSet::new();

        // Fields are matched in declaration order and synonyms most
        // specific first, so "LPAR Name" is claimed by the name field
        // before the generic "name" spelling can bind elsewhere. A claimed
        // column is excluded from later fields.
        for spec in field_specs(category) {
            'synonyms: for synonym in spec.synonyms {
                for (idx, header) in headers.iter().enumerate() {
                    if claimed.contains(&idx) {
                        continue;
                    }
                    if header.contains(synonym) {
                        columns.insert(spec.name, idx);
                        claimed.insert(idx);
                        break 'synonyms;
                    }
                }
            }
        }

        Self { columns }
    }

    pub fn get(&self, field: &str) -> Option<usize> {
        self.columns.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
