use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::alignment::{AlignmentEmitter, Document, EmitSummary};
use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::workbook::{Sheet, WorkbookReader};

// @module: Application controller for workbook conversion

/// Main application controller: workbook in, aligned corpus out
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load `input_file` and build the aligned document without writing it
    pub fn convert<P: AsRef<Path>>(&self, input_file: P) -> Result<Document, AppError> {
        let input_file = input_file.as_ref();
        if !FileManager::file_exists(input_file) {
            return Err(AppError::File(format!("Input file does not exist: {:?}", input_file)));
        }

        let sheet = WorkbookReader::open(input_file)?;
        self.convert_sheet(&sheet)
    }

    /// Build the aligned document for an already loaded sheet
    pub fn convert_sheet(&self, sheet: &Sheet) -> Result<Document, AppError> {
        let total_rows = sheet.row_range().map(|rows| rows.count()).unwrap_or(0);
        let progress_bar = Self::progress_bar(total_rows as u64);

        let emitter = AlignmentEmitter::new(&self.config)?.with_progress(progress_bar.clone());
        let result = emitter.emit(sheet);
        progress_bar.finish_and_clear();

        Ok(result?)
    }

    /// Run the main workflow: read, align, then write the output in one go
    ///
    /// Nothing is written when any cell fails to transform.
    pub fn run<P1: AsRef<Path>, P2: AsRef<Path>>(&self, input_file: P1, output_file: P2) -> Result<EmitSummary, AppError> {
        let start_time = Instant::now();
        let input_file = input_file.as_ref();
        let output_file = output_file.as_ref();

        self.log_languages();
        if self.config.dirty {
            info!("Dirty mode: cell markup is only normalized");
        }

        let document = self.convert(input_file)?;

        FileManager::write_to_file(output_file, &document.to_xml())
            .map_err(|e| AppError::File(format!("{:#}", e)))?;

        let summary = document.summary;
        info!(
            "{} rows scanned, {} pairs written, {} rows merged, {} empty, {} unpaired",
            summary.rows_scanned, summary.pairs, summary.merged_rows, summary.empty_rows, summary.unpaired_rows
        );
        if summary.unpaired_rows > 0 {
            warn!("{} row(s) had a single cell and were left out", summary.unpaired_rows);
        }
        info!(
            "Success: {} ({})",
            output_file.display(),
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    fn log_languages(&self) {
        for (column, code) in self.config.language.iter().enumerate() {
            match language_utils::get_language_name(code) {
                Ok(name) => debug!("Column {}: {} ({})", column, name, code),
                Err(_) => debug!("Column {}: {}", column, code),
            }
        }
    }

    fn progress_bar(total_rows: u64) -> ProgressBar {
        let progress_bar = ProgressBar::new(total_rows);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
