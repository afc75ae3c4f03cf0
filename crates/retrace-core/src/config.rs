use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "retrace";
const SCREENSHOTS_DIR_NAME: &str = "screenshots";
const DB_FILE_NAME: &str = "recall.db";

/// Resolved filesystem locations for the capture pipeline.
///
/// The probe itself consumes nothing from these; they are handed to the
/// screenshot and storage collaborators downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub root: PathBuf,
    pub screenshots_dir: PathBuf,
    pub db_path: PathBuf,
}

impl StoragePaths {
    /// Resolve the storage layout, creating directories as needed.
    ///
    /// An explicit override directory wins verbatim; otherwise the
    /// platform application-support directory is used.
    ///
    /// # Errors
    ///
    /// Returns an error if no application-support directory can be
    /// determined or the directories cannot be created.
    pub fn resolve(override_dir: Option<&Path>) -> Result<Self> {
        let root = match override_dir {
            Some(dir) => dir.to_path_buf(),
            None => default_app_dir()?,
        };
        let paths = Self {
            screenshots_dir: root.join(SCREENSHOTS_DIR_NAME),
            db_path: root.join(DB_FILE_NAME),
            root,
        };
        fs::create_dir_all(&paths.screenshots_dir)?;
        Ok(paths)
    }
}

/// Platform application-support folder for retrace
/// (`~/Library/Application Support/retrace` on macOS).
fn default_app_dir() -> Result<PathBuf> {
    let mut path =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to get application support dir"))?;
    path.push(APP_DIR_NAME);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_directory_wins() {
        let dir = tempfile::tempdir().unwrap();
        let paths = StoragePaths::resolve(Some(dir.path())).unwrap();

        assert_eq!(paths.root, dir.path());
        assert_eq!(paths.screenshots_dir, dir.path().join("screenshots"));
        assert_eq!(paths.db_path, dir.path().join("recall.db"));
    }

    #[test]
    fn test_screenshots_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("storage");

        let paths = StoragePaths::resolve(Some(&nested)).unwrap();
        assert!(paths.screenshots_dir.is_dir());
        // the database file itself is the storage layer's to create
        assert!(!paths.db_path.exists());
    }
}
