pub mod source_discovery;

pub use source_discovery::{ScanStatistics, SourceDiscovery, SpreadsheetFile};
