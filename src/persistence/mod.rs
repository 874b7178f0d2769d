//! Save/load persistence
//!
//! Features:
//! - Plain JSON documents
//! - Atomic writes (tmp → rename)
//! - Missing file is not an error

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Load a JSON document. Returns `Ok(None)` if the file does not exist.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&text)?))
}

/// Save a JSON document, replacing any previous version atomically
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, serde_json::to_string_pretty(value)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
pub(crate) fn scratch_path(name: &str) -> PathBuf {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "splashsort-test-{}-{}-{}",
        std::process::id(),
        n,
        name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        value: u32,
    }

    #[test]
    fn test_missing_file_is_none() {
        let path = scratch_path("missing.json");
        let loaded: Option<Doc> = load_json(&path).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch_path("doc.json");
        save_json(&path, &Doc { value: 7 }).unwrap();
        let loaded: Option<Doc> = load_json(&path).unwrap();
        assert_eq!(loaded, Some(Doc { value: 7 }));
        assert!(!tmp_path(&path).exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let path = scratch_path("corrupt.json");
        fs::write(&path, "{ not json").unwrap();
        let loaded: Result<Option<Doc>> = load_json(&path);
        assert!(matches!(loaded, Err(crate::SplashError::Json { .. })));
        let _ = fs::remove_file(&path);
    }
}
