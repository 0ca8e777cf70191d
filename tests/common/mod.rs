/*!
 * Common test utilities for the smisub test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A small but messy SAMI document: mixed tag case, a missing class
/// marker, an unclosed font tag, a comment and out-of-order cues.
pub const MALFORMED_SAMI: &str = "<SAMI>
<HEAD>
<TITLE>Test</TITLE>
<STYLE TYPE=\"text/css\">
<!--
P { margin-left: 8pt; }
.KRCC { Name: Korean; lang: ko-KR; }
-->
</STYLE>
</HEAD>
<BODY>
<!-- translator note -->
<sync start=5000><P Class=KRCC>Third line
<SYNC Start=1000>First<br>line
<Sync Start=3000><P Class=KRCC><Font Face=\"Gulim\"Second line
</font>
</BODY>
</SAMI>
";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a test file holding raw bytes
pub fn create_test_bytes(dir: &Path, filename: &str, content: &[u8]) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates the malformed sample SAMI file
pub fn create_test_sami(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, MALFORMED_SAMI)
}

/// Route library logs to the test output
pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
