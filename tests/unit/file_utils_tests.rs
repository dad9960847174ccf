/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use sheetalign::file_utils::FileManager;
use std::path::Path;

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));

    Ok(())
}

/// Test that file_exists returns false for directories and missing files
#[test]
fn test_file_exists_withDirectoryOrMissingFile_shouldReturnFalse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.xlsx")));

    Ok(())
}

/// Test the derived output path of a clean run
#[test]
fn test_output_path_withoutExplicitOutput_shouldSwapExtension() {
    let output_path = FileManager::output_path(Path::new("/tmp/input/corpus.xlsx"), None, false);
    assert_eq!(output_path, Path::new("/tmp/input/corpus.xml"));
}

/// Test the derived output path of a dirty run
#[test]
fn test_output_path_withDirtyMode_shouldAddDirtySuffix() {
    let output_path = FileManager::output_path(Path::new("/tmp/input/corpus.ods"), None, true);
    assert_eq!(output_path, Path::new("/tmp/input/corpus-dirty.xml"));
}

/// Test that dirty mode also marks an explicit `.xml` output
#[test]
fn test_output_path_withExplicitXmlInDirtyMode_shouldAddDirtySuffix() {
    let output_path = FileManager::output_path(Path::new("corpus.xlsx"), Some(Path::new("/tmp/out.xml")), true);
    assert_eq!(output_path, Path::new("/tmp/out-dirty.xml"));

    let clean_path = FileManager::output_path(Path::new("corpus.xlsx"), Some(Path::new("/tmp/out.xml")), false);
    assert_eq!(clean_path, Path::new("/tmp/out.xml"));
}

/// Test that an input without extension still gets `.xml`
#[test]
fn test_output_path_withoutExtension_shouldAppendXml() {
    let output_path = FileManager::output_path(Path::new("corpus"), None, false);
    assert_eq!(output_path, Path::new("corpus.xml"));
}

/// Test that write_to_file creates missing parent directories
#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("nested").join("out.xml");

    FileManager::write_to_file(&target, "<body/>")?;

    assert_eq!(std::fs::read_to_string(&target)?, "<body/>");
    assert!(temp_dir.path().join("nested").is_dir());

    Ok(())
}
