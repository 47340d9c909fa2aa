//! Course catalog
//!
//! Loads installed course JSON files from the data directory. The catalog is
//! the delivery end of the content pipeline: authoring and parsing happen
//! elsewhere, and everything here is read-only well-typed [`Course`] trees.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::model::Course;
use crate::paths;

/// All installed courses
#[derive(Debug, Default)]
pub struct Catalog {
    courses: Vec<Course>,
}

impl Catalog {
    /// Load every course from the default courses directory
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::courses_dir()?)
    }

    /// Load every `*.json` course file under `dir`
    pub fn load_from(dir: &Path) -> Result<Self> {
        let mut courses = Vec::new();

        if dir.exists() {
            let entries = fs::read_dir(dir)
                .with_context(|| format!("Failed to read courses directory {:?}", dir))?;

            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    courses.push(load_course(&path)?);
                }
            }
        }

        courses.sort_by(|a, b| a.title.cmp(&b.title));
        tracing::info!(count = courses.len(), "course catalog loaded");
        Ok(Self { courses })
    }

    /// All courses, sorted by title
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Find a course by ID or slug
    pub fn find(&self, key: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == key || c.slug == key)
    }
}

/// Load a single course file
pub fn load_course(path: &Path) -> Result<Course> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read course from {:?}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse course {:?}", path))
}

/// Where a course with the given slug would be installed
pub fn course_path(slug: &str) -> Result<PathBuf> {
    Ok(paths::courses_dir()?.join(format!("{}.json", slug)))
}
