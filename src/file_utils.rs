use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

/// Suffix appended to the output file stem in dirty mode
pub const DIRTY_SUFFIX: &str = "-dirty";

/// Extension of the generated corpus
pub const OUTPUT_EXTENSION: &str = "xml";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path for the aligned corpus
    // @params: input_file, explicit output (wins when given), dirty flag
    // An explicit `.xml` output still gets the dirty suffix; other names are kept
    pub fn output_path<P: AsRef<Path>>(input_file: P, explicit: Option<&Path>, dirty: bool) -> PathBuf {
        if let Some(explicit) = explicit {
            return if dirty { Self::with_dirty_suffix(explicit) } else { explicit.to_path_buf() };
        }

        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        if dirty {
            output_filename.push_str(DIRTY_SUFFIX);
        }
        output_filename.push('.');
        output_filename.push_str(OUTPUT_EXTENSION);

        input_file.with_file_name(output_filename)
    }

    fn with_dirty_suffix(path: &Path) -> PathBuf {
        let is_xml = path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(OUTPUT_EXTENSION));
        let Some(stem) = path.file_stem().map(|stem| stem.to_string_lossy().to_string()) else {
            return path.to_path_buf();
        };
        if !is_xml || stem.ends_with(DIRTY_SUFFIX) {
            return path.to_path_buf();
        }

        let extension = path.extension().unwrap_or_default().to_string_lossy();
        path.with_file_name(format!("{}{}.{}", stem, DIRTY_SUFFIX, extension))
    }

    /// Write a string to a file in one call, creating the parent directory
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
