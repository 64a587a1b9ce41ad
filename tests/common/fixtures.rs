// Test fixtures for integration testing

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Notes directory fixture for creating synthetic test data
pub struct TestNotes {
    pub dir: TempDir,
    pub files: Vec<PathBuf>,
}

impl TestNotes {
    /// Create a small notes collection
    #[allow(dead_code)]
    pub fn small() -> Self {
        Self::with_files(&[
            ("a.md", "hello world"),
            ("recipes/pasta.md", "# Pasta\n\nBoil water, add salt, cook for nine minutes."),
            ("work/meeting.txt", "Discussed the quarterly roadmap and hiring plans."),
        ])
    }

    /// Create with custom files
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        let mut paths = Vec::new();

        for (path, content) in files {
            let full_path = dir.path().join(path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&full_path, content).unwrap();
            paths.push(full_path);
        }

        Self { dir, files: paths }
    }

    /// Root path of the notes directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
