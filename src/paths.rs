//! Platform data directory paths

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

/// Get the data directory path
pub fn data_dir() -> Result<PathBuf> {
    let proj_dirs =
        ProjectDirs::from("", "", "dojo").context("Failed to determine data directory")?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

/// Get the directory holding installed course JSON files
pub fn courses_dir() -> Result<PathBuf> {
    Ok(data_dir()?.join("courses"))
}

/// Default location of the progress store
pub fn progress_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("progress.json"))
}

/// Default location of the study-tracking store
pub fn tracking_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("tracking.json"))
}
