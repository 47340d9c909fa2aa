//! Progress export and import
//!
//! Export writes the whole progress record to a JSON file the learner can
//! carry between machines. Import validates the file structurally before the
//! typed parse and replaces the store wholesale; an invalid file is rejected
//! without touching any stored state.

use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::progress::model::UserProgress;
use crate::progress::store::ProgressStore;

/// Why an import was rejected
#[derive(Debug, Error)]
pub enum ImportError {
    /// Could not read the file
    #[error("Failed to read import file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not JSON, or not the right shape
    #[error("Import file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The JSON parses but is not a progress export
    #[error("Import file is not a progress export: {reason}")]
    Invalid {
        /// Which structural check failed
        reason: String,
    },

    /// The imported record could not be persisted
    #[error("Failed to persist imported progress: {0}")]
    Persist(anyhow::Error),
}

/// Write the progress record to `path` as pretty-printed JSON
pub fn export_progress(store: &ProgressStore, path: &Path) -> Result<()> {
    let contents = serde_json::to_string_pretty(store.data())
        .with_context(|| "Failed to serialize progress for export")?;

    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write export to {:?}", path))?;

    tracing::info!(?path, "progress exported");
    Ok(())
}

/// Replace the store's contents with the record in `path`.
///
/// The payload must carry a `courses` object and a numeric `current_streak`
/// to be accepted; anything else is rejected before any state changes.
pub fn import_progress(store: &mut ProgressStore, path: &Path) -> Result<(), ImportError> {
    let contents = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;

    if !value.get("courses").is_some_and(|v| v.is_object()) {
        return Err(ImportError::Invalid { reason: "missing courses object".into() });
    }
    if !value.get("current_streak").is_some_and(|v| v.is_number()) {
        return Err(ImportError::Invalid { reason: "missing numeric current_streak".into() });
    }

    let data: UserProgress = serde_json::from_value(value)?;
    store.replace(data).map_err(ImportError::Persist)?;

    tracing::info!(?path, "progress imported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn temp_store(dir: &TempDir) -> ProgressStore {
        ProgressStore::open_at(dir.path().join("progress.json")).unwrap()
    }

    #[test]
    fn export_then_import_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut store = temp_store(&dir);

        store.mark_lesson_complete("c1", "l1").unwrap();
        store.save_note("c1", "l1", "carried over").unwrap();
        let exported = dir.path().join("backup.json");
        export_progress(&store, &exported).unwrap();

        store.reset().unwrap();
        assert_eq!(store.total_completed_lessons(), 0);

        import_progress(&mut store, &exported).unwrap();
        assert!(store.is_lesson_complete("c1", "l1"));
        assert_eq!(store.get_note("c1", "l1"), "carried over");
    }

    #[test]
    fn import_rejects_payload_without_courses() {
        let dir = TempDir::new().unwrap();
        let mut store = temp_store(&dir);
        store.mark_lesson_complete("c1", "l1").unwrap();
        let before = store.data().clone();

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"current_streak": 3}"#).unwrap();

        let err = import_progress(&mut store, &bad).unwrap_err();
        assert!(matches!(err, ImportError::Invalid { .. }));
        assert_eq!(store.data(), &before);
    }

    #[test]
    fn import_rejects_non_numeric_streak() {
        let dir = TempDir::new().unwrap();
        let mut store = temp_store(&dir);

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"courses": {}, "current_streak": "three"}"#).unwrap();

        assert!(matches!(
            import_progress(&mut store, &bad),
            Err(ImportError::Invalid { .. })
        ));
    }

    #[test]
    fn import_rejects_malformed_json_untouched() {
        let dir = TempDir::new().unwrap();
        let mut store = temp_store(&dir);
        store.save_note("c1", "l1", "still here").unwrap();

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "not json at all {").unwrap();

        assert!(matches!(import_progress(&mut store, &bad), Err(ImportError::Parse(_))));
        assert_eq!(store.get_note("c1", "l1"), "still here");
    }
}
