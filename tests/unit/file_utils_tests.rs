/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;
use std::path::Path;
use smisub::file_utils::{FileManager, SAMI_EXTENSIONS};
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "exists.smi", "content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));

    Ok(())
}

/// Test that generate_output_path swaps the extension
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() {
    let output_path = FileManager::generate_output_path(
        Path::new("/tmp/input/movie.smi"),
        Path::new("/tmp/output"),
        "srt",
    );
    assert_eq!(output_path, Path::new("/tmp/output/movie.srt"));

    let dotted = FileManager::generate_output_path(Path::new("a.b.smi"), Path::new("out"), ".srt");
    assert_eq!(dotted, Path::new("out/a.b.srt"));
}

/// Test recursive discovery of SAMI files
#[test]
fn test_find_files_withNestedDirectories_shouldFindSamiFilesOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("season1");
    fs::create_dir_all(&nested)?;

    common::create_test_file(temp_dir.path(), "a.smi", "x")?;
    common::create_test_file(&nested, "b.SMI", "x")?;
    common::create_test_file(&nested, "c.sami", "x")?;
    common::create_test_file(&nested, "d.srt", "x")?;

    let files = FileManager::find_files(temp_dir.path(), &SAMI_EXTENSIONS)?;

    assert_eq!(files.len(), 3);
    assert!(files.iter().all(|f| FileManager::is_sami_file(f)));
    Ok(())
}

/// Test extension matching
#[test]
fn test_has_extension_withDotsAndCase_shouldMatch() {
    assert!(FileManager::has_extension("movie.SmI", &["smi"]));
    assert!(FileManager::has_extension("movie.smi", &[".smi"]));
    assert!(!FileManager::has_extension("movie", &["smi"]));
    assert!(!FileManager::has_extension("movie.srt", &SAMI_EXTENSIONS));
}

/// Test appending to a log file
#[test]
fn test_append_to_log_file_withTwoWrites_shouldKeepBoth() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let log_path = temp_dir.path().join("logs").join("issues.log");

    FileManager::append_to_log_file(&log_path, "first")?;
    FileManager::append_to_log_file(&log_path, "second")?;

    let content = fs::read_to_string(&log_path)?;
    assert_eq!(content.lines().count(), 2);
    assert!(content.contains("] first"));
    assert!(content.contains("] second"));
    Ok(())
}
