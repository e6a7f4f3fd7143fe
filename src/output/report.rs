use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::Path;

use crate::assessment::Assessment;

/// Save an assessment as pretty JSON.
///
/// Uses atomic-write-file so a crash never leaves a half-written report.
pub fn write_report(path: &Path, assessment: &Assessment) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, assessment).context("Failed to serialize assessment")?;

    file.commit().context("Failed to save assessment report")?;

    Ok(())
}

/// Load a previously saved assessment report
pub fn read_report(path: &Path) -> Result<Assessment> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open assessment report at {}", path.display()))?;

    serde_json::from_reader(file).context("Failed to load assessment report")
}
