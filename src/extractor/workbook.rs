use crate::error::{HmcReportError, Result};
use crate::extractor::records::Inventory;
use crate::extractor::sheet::SheetExtractor;
use crate::scanner::SpreadsheetFile;
use calamine::{open_workbook, open_workbook_auto, Reader, Sheets, Xls, Xlsx};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ExtractionProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub sheets_processed: usize,
    pub records_extracted: usize,
    pub current_file: Option<String>,
    pub start_time: Instant,
    pub errors: Vec<String>,
}

impl ExtractionProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            sheets_processed: 0,
            records_extracted: 0,
            current_file: None,
            start_time: Instant::now(),
            errors: Vec::new(),
        }
    }

    pub fn update_file(&mut self, filename: String, sheets: usize, records: usize) {
        self.files_processed += 1;
        self.sheets_processed += sheets;
        self.records_extracted += records;
        self.current_file = Some(filename);
    }

    pub fn add_error<S: Into<String>>(&mut self, error: S) {
        self.errors.push(error.into());
    }

    pub fn percentage(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.files_processed as f64 / self.total_files as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn estimated_remaining(&self) -> Duration {
        if self.files_processed == 0 {
            return Duration::from_secs(0);
        }

        let elapsed = self.elapsed();
        let per_file = elapsed.as_secs_f64() / self.files_processed as f64;
        let remaining = self.total_files.saturating_sub(self.files_processed);
        Duration::from_secs_f64(per_file * remaining as f64)
    }
}

/// Outcome of one file's extraction, merged into the run totals.
#[derive(Debug, Clone)]
struct FileOutcome {
    filename: String,
    sheets_processed: usize,
    records_extracted: usize,
}

/// Drives extraction over whole spreadsheets: opens each workbook, walks
/// its sheets and feeds every readable range to the `SheetExtractor`.
pub struct WorkbookExtractor {
    sheet_extractor: SheetExtractor,
}

impl WorkbookExtractor {
    pub fn new() -> Self {
        Self {
            sheet_extractor: SheetExtractor::new(),
        }
    }

    /// Extract every file, accumulating records and per-file warnings.
    /// A file that cannot be opened is skipped with a warning; the run
    /// continues with the remaining files.
    pub fn extract_all(
        &self,
        files: &[SpreadsheetFile],
        progress_callback: Option<&dyn Fn(&ExtractionProgress)>,
    ) -> (Inventory, ExtractionProgress) {
        let mut inventory = Inventory::new();
        let mut progress = ExtractionProgress::new(files.len());

        #[cfg(feature = "parallel")]
        let outcomes: Vec<(Inventory, FileOutcome)> = {
            use rayon::prelude::*;
            files.par_iter().map(|file| self.extract_one(file)).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let outcomes = files.iter().map(|file| self.extract_one(file));

        for (file_inventory, outcome) in outcomes {
            for warning in &file_inventory.warnings {
                progress.add_error(warning.clone());
            }
            inventory.merge(file_inventory);
            progress.update_file(
                outcome.filename,
                outcome.sheets_processed,
                outcome.records_extracted,
            );

            if let Some(callback) = progress_callback {
                callback(&progress);
            }
        }

        (inventory, progress)
    }

    /// Extract a single spreadsheet into its own inventory. Failures are
    /// recorded as warnings on that inventory rather than propagated, so
    /// one corrupt export never aborts the batch.
    fn extract_one(&self, file: &SpreadsheetFile) -> (Inventory, FileOutcome) {
        let mut inventory = Inventory::new();
        let mut outcome = FileOutcome {
            filename: file.filename.clone(),
            sheets_processed: 0,
            records_extracted: 0,
        };

        let mut workbook = match open_spreadsheet(&file.source_path) {
            Ok(workbook) => workbook,
            Err(err) => {
                inventory.add_warning(format!("Skipped {}: {}", file.filename, err));
                return (inventory, outcome);
            }
        };

        let sheet_names = workbook.sheet_names().to_owned();

        for sheet_name in sheet_names {
            let range = match workbook.worksheet_range(&sheet_name) {
                Ok(range) => range,
                Err(err) => {
                    inventory.add_warning(format!(
                        "Skipped sheet '{}' in {}: {}",
                        sheet_name, file.filename, err
                    ));
                    continue;
                }
            };

            outcome.records_extracted += self.sheet_extractor.extract_range(
                &file.filename,
                &sheet_name,
                &range,
                &mut inventory,
            );
            outcome.sheets_processed += 1;
        }

        (inventory, outcome)
    }
}

impl Default for WorkbookExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Open a spreadsheet, sniffing the format first and falling back to the
/// explicit readers. Scanner exports are sometimes misnamed (an xlsx body
/// behind a .xls extension, or vice versa), so a failed sniff gets a
/// second chance with each concrete reader before the file is given up on.
pub fn open_spreadsheet(path: &Path) -> Result<Sheets<BufReader<File>>> {
    let auto_err = match open_workbook_auto(path) {
        Ok(workbook) => return Ok(workbook),
        Err(err) => err,
    };

    if let Ok(workbook) = open_workbook::<Xlsx<BufReader<File>>, _>(path) {
        return Ok(Sheets::Xlsx(workbook));
    }

    if let Ok(workbook) = open_workbook::<Xls<BufReader<File>>, _>(path) {
        return Ok(Sheets::Xls(workbook));
    }

    Err(HmcReportError::Spreadsheet {
        file: path.display().to_string(),
        message: auto_err.to_string(),
    })
}
