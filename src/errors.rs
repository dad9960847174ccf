/*!
 * Error types for the sheetalign application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised while validating or compiling a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read or parsed
    #[error("Failed to load configuration: {0}")]
    Load(String),

    /// A strip or replace pattern is not a usable opening tag
    #[error("Invalid tag pattern '{pattern}': {reason}")]
    InvalidTagPattern {
        /// The pattern as written in the configuration
        pattern: String,
        /// Why the pattern was rejected
        reason: String,
    },

    /// A divide rule has an empty delimiter or an invalid wrapper tag
    #[error("Invalid divide rule [{delimiter:?}, {wrapper:?}]: {reason}")]
    InvalidDivideRule {
        /// Delimiter as configured
        delimiter: String,
        /// Wrapper tag name as configured
        wrapper: String,
        /// Why the rule was rejected
        reason: String,
    },

    /// A row or parent tag name is not a valid XML name
    #[error("Invalid tag name for {field}: '{value}'")]
    InvalidTagName {
        /// Configuration key holding the name
        field: &'static str,
        /// The rejected value
        value: String,
    },

    /// More language codes than columns
    #[error("At most two language codes are supported, got {0}")]
    TooManyLanguages(usize),
}

/// Errors that can occur while transforming a single cell
#[derive(Error, Debug)]
pub enum TransformError {
    /// The cell markup could not be parsed as a fragment
    #[error("Malformed markup at position {position}: {message}")]
    Markup {
        /// Byte offset reported by the parser
        position: u64,
        /// Parser message
        message: String,
    },

    /// A transform failure tied to a sheet position
    #[error("Row {row}, column {column}: {source}")]
    Cell {
        /// 1-based row number as displayed by spreadsheet software
        row: u32,
        /// 0-based column index
        column: u32,
        /// Underlying failure
        #[source]
        source: Box<TransformError>,
    },
}

impl TransformError {
    /// Attach the sheet position to a transform failure
    pub fn at(self, row: u32, column: u32) -> Self {
        match self {
            Self::Cell { .. } => self,
            other => Self::Cell {
                row: row + 1,
                column,
                source: Box::new(other),
            },
        }
    }
}

/// Errors that can occur while reading a workbook
#[derive(Error, Debug)]
pub enum WorkbookError {
    /// The workbook could not be opened
    #[error("Failed to open workbook: {0}")]
    Open(String),

    /// The workbook has no worksheet
    #[error("Workbook contains no worksheet")]
    NoSheet,

    /// The first worksheet could not be read
    #[error("Failed to read worksheet '{sheet}': {message}")]
    Sheet {
        /// Worksheet name
        sheet: String,
        /// Reader message
        message: String,
    },

    /// A package part could not be read
    #[error("Failed to read workbook part '{part}': {message}")]
    Part {
        /// Path of the part inside the package
        part: String,
        /// Reader message
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from configuration handling
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from cell transformation
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Error from workbook reading
    #[error("Workbook error: {0}")]
    Workbook(#[from] WorkbookError),
}
