pub mod classifier;
pub mod records;
pub mod sheet;
pub mod workbook;

pub use classifier::{HeaderMap, SheetCategory};
pub use records::{
    Inventory, InventorySummary, LparRecord, MemoryRecord, NetworkAdapterRecord, ProcessorRecord,
    SystemRecord, MISSING_VALUE,
};
pub use sheet::SheetExtractor;
pub use workbook::{open_spreadsheet, ExtractionProgress, WorkbookExtractor};
