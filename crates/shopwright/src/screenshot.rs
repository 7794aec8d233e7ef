//! Screenshot artifacts.
//!
//! Files are named `<label>_<YYYY-mm-dd_HH-MM-SS_mmm>.png`. Labels are
//! sanitized so product names with spaces or slashes stay valid file names.

use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

use crate::result::{ShopError, ShopResult};

/// Timestamp format appended to every screenshot label
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S_%3f";

/// Default screenshot directory
pub const DEFAULT_SCREENSHOT_DIR: &str = "screenshots";

/// Writes PNG captures into one directory.
#[derive(Debug, Clone)]
pub struct ScreenshotManager {
    dir: PathBuf,
}

impl Default for ScreenshotManager {
    fn default() -> Self {
        Self::new(DEFAULT_SCREENSHOT_DIR)
    }
}

impl ScreenshotManager {
    /// Create a manager writing into `dir` (created on first capture)
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for `label` at `at`
    #[must_use]
    pub fn file_name(label: &str, at: DateTime<Local>) -> String {
        format!("{}_{}.png", sanitize_label(label), at.format(TIMESTAMP_FORMAT))
    }

    /// Write already-encoded PNG bytes under `label`, returning the file path.
    pub fn save(&self, label: &str, png: &[u8]) -> ShopResult<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| ShopError::Screenshot {
            label: label.to_string(),
            message: format!("cannot create {}: {e}", self.dir.display()),
        })?;
        let path = self.dir.join(Self::file_name(label, Local::now()));
        fs::write(&path, png).map_err(|e| ShopError::Screenshot {
            label: label.to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "Screenshot saved");
        Ok(path)
    }

    /// Remove every file in the directory. A missing directory is not an error.
    pub fn clear(&self) -> ShopResult<usize> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let mut removed = 0;
        for entry in entries {
            let path = entry?.path();
            if path.is_file() {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        tracing::info!(dir = %self.dir.display(), removed, "Cleared screenshot directory");
        Ok(removed)
    }
}

/// Keep `[A-Za-z0-9_-]`, map everything else to `_`.
#[must_use]
pub fn sanitize_label(label: &str) -> String {
    let cleaned: String = label
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "screenshot".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_file_name_format() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            ScreenshotManager::file_name("browser_launched", at),
            "browser_launched_2024-03-09_14-05-07_000.png"
        );
    }

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("added_Bajaj Iron/1000W"), "added_Bajaj_Iron_1000W");
        assert_eq!(sanitize_label("  "), "screenshot");
    }

    #[test]
    fn test_save_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let manager = ScreenshotManager::new(tmp.path().join("shots"));
        let path = manager.save("home", b"\x89PNG").unwrap();

        assert!(path.starts_with(manager.dir()));
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("home_"));
        assert_eq!(fs::read(&path).unwrap(), b"\x89PNG");
    }

    #[test]
    fn test_clear() {
        let tmp = TempDir::new().unwrap();
        let manager = ScreenshotManager::new(tmp.path());
        manager.save("a", b"1").unwrap();
        manager.save("b", b"2").unwrap();
        assert_eq!(manager.clear().unwrap(), 2);
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_clear_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let manager = ScreenshotManager::new(tmp.path().join("absent"));
        assert_eq!(manager.clear().unwrap(), 0);
    }
}
