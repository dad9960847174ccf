// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use sheetalign::app_config::{self, Config};
use sheetalign::app_controller::Controller;
use sheetalign::errors::AppError;
use sheetalign::file_utils::FileManager;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for sheetalign
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// sheetalign - bilingual spreadsheet to aligned XML corpus
///
/// Reads the first two columns of a workbook's first sheet and writes one
/// pair of cross-referencing segments per row.
#[derive(Parser, Debug)]
#[command(name = "sheetalign")]
#[command(version)]
#[command(about = "Convert a two-column bilingual spreadsheet into an aligned XML corpus")]
#[command(long_about = "sheetalign reads the first sheet of a workbook, treats column A as the source \
and column B as the target language, and writes an XML document with one pair of linked segments per row.

EXAMPLES:
    sheetalign -i corpus.xlsx                     # Write corpus.xml with the built-in rules
    sheetalign -i corpus.xlsx -c rules.json       # Use a configuration file
    sheetalign -i corpus.xlsx --dirty             # Only normalize markup, write corpus-dirty.xml
    sheetalign -i corpus.xlsx --ignore-halves     # Do not merge one-sided rows
    sheetalign completions bash > sheetalign.bash # Generate bash completions

CONFIGURATION:
    A JSON file with stripTags, replaceTags, divideBy, rowTagName, parentTagName,
    language, mergeContinuations and logLevel. Missing keys use built-in defaults.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input workbook (.xlsx, .xlsm, .xls, .ods)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (default: input with an .xml extension; --dirty adds -dirty to an .xml name)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Skip all transform rules and only normalize cell markup
    #[arg(long)]
    dirty: bool,

    /// Do not merge one-sided rows into the preceding pair
    #[arg(long)]
    ignore_halves: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> ExitCode {
    // The logger accepts everything; the effective level is set via set_max_level
    if CustomLogger::init(LevelFilter::Trace).is_err() {
        return ExitCode::FAILURE;
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "sheetalign", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    match run_convert(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            error!("{}", hint_for(&e));
            ExitCode::FAILURE
        }
    }
}

fn run_convert(options: CommandLineOptions) -> Result<(), AppError> {
    if let Some(level) = &options.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level((&level).into());
    }

    let Some(input) = options.input else {
        info!("Please provide an input file, use --help or -h for help.");
        return Ok(());
    };

    let mut config = match &options.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if options.dirty {
        config = config.into_dirty();
    }
    if options.ignore_halves {
        config.merge_continuations = false;
    }
    if let Some(level) = options.log_level {
        config.log_level = level.into();
    }
    log::set_max_level((&config.log_level).into());

    let output = FileManager::output_path(&input, options.output.as_deref(), config.dirty);
    let controller = Controller::with_config(config)?;
    controller.run(&input, &output)?;

    Ok(())
}

fn hint_for(error: &AppError) -> &'static str {
    match error {
        AppError::Config(_) => "Hint: check the configuration file and its tag patterns",
        AppError::Transform(_) => "Hint: fix the markup of the reported cell or rerun with --dirty",
        AppError::Workbook(_) => "Hint: make sure the input is a readable .xlsx, .xlsm, .xls or .ods workbook",
        AppError::File(_) => "Hint: check that the input exists and the output location is writable",
    }
}
