//! Persisted preference record (`~/.config/gtasks/config.json`).
//!
//! The record currently holds one field, the current task list. Reads are
//! forgiving: a missing file or content that does not parse yields the
//! default record so a damaged file never blocks the rest of the tool.
//! Writes go through a temp file plus rename and always re-read first so
//! fields this build does not know about survive.

use crate::config::default_preferences_path;
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// The persisted preference record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_task_list: Option<String>,
    /// Unknown fields, kept so read-modify-write never drops them.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Storage seam for the preference record.
///
/// The command resolver takes this as an injected dependency; production code
/// uses [`FilePreferenceStore`], tests use an in-memory store.
pub trait PreferenceStore: Send + Sync {
    /// Load the record. Only unrecoverable I/O fails.
    fn read(&self) -> Result<Preferences, StoreError>;

    /// Persist the full record.
    fn write(&self, prefs: &Preferences) -> Result<(), StoreError>;

    /// Convenience read of the current task list.
    fn get_current_list(&self) -> Result<Option<String>, StoreError> {
        Ok(self.read()?.current_task_list)
    }

    /// Read-modify-write of the current task list.
    fn set_current_list(&self, list_id: &str) -> Result<(), StoreError> {
        let mut prefs = self.read()?;
        prefs.current_task_list = Some(list_id.to_string());
        self.write(&prefs)
    }
}

/// JSON-file backed preference store.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default per-user location.
    pub fn at_default_location() -> Result<Self, StoreError> {
        default_preferences_path()
            .map(Self::new)
            .ok_or(StoreError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn read(&self) -> Result<Preferences, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Preferences::default());
            }
            // Invalid UTF-8 is a content problem, not an I/O one.
            Err(err) if err.kind() == std::io::ErrorKind::InvalidData => {
                tracing::warn!(
                    path = %self.path.display(),
                    "preference file is not valid UTF-8; using defaults"
                );
                return Ok(Preferences::default());
            }
            Err(err) => return Err(StoreError::Io(err)),
        };
        if text.trim().is_empty() {
            return Ok(Preferences::default());
        }
        match serde_json::from_str::<Preferences>(&text) {
            Ok(prefs) => Ok(prefs),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "preference file is unreadable; using defaults"
                );
                Ok(Preferences::default())
            }
        }
    }

    fn write(&self, prefs: &Preferences) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut text = serde_json::to_string_pretty(prefs)?;
        text.push('\n');

        let tmp = temp_sibling(&self.path);
        let result = write_then_rename(&tmp, &self.path, text.as_bytes());
        if result.is_err() {
            let _ = std::fs::remove_file(&tmp);
        }
        result?;
        tracing::info!(path = %self.path.display(), "saved preferences");
        Ok(())
    }
}

fn write_then_rename(tmp: &Path, dest: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    std::fs::rename(tmp, dest)
}

/// Temp path in the same directory so the final rename stays on one filesystem.
fn temp_sibling(path: &Path) -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let name = path
        .file_name()
        .map(|value| value.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config.json".to_string());
    let seq = NEXT.fetch_add(1, Ordering::Relaxed);
    path.with_file_name(format!(".{name}.{}.{seq}.tmp", std::process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;

    fn store_in(tmp: &TestTempDir) -> FilePreferenceStore {
        FilePreferenceStore::new(tmp.child("gtasks/config.json"))
    }

    #[test]
    fn missing_file_reads_as_default() {
        let tmp = TestTempDir::new("prefs-missing");
        let store = store_in(&tmp);
        assert_eq!(store.read().expect("read"), Preferences::default());
        assert_eq!(store.get_current_list().expect("get"), None);
        assert!(!store.path().exists(), "read must not create the file");
    }

    #[test]
    fn malformed_file_reads_as_default() {
        let tmp = TestTempDir::new("prefs-malformed");
        tmp.write_text("gtasks/config.json", "{ not json");
        let store = store_in(&tmp);
        assert_eq!(store.get_current_list().expect("get"), None);
    }

    #[test]
    fn wrong_shape_reads_as_default() {
        let tmp = TestTempDir::new("prefs-shape");
        tmp.write_text("gtasks/config.json", "[1, 2, 3]");
        let store = store_in(&tmp);
        assert_eq!(store.read().expect("read"), Preferences::default());

        tmp.write_text("gtasks/config.json", r#"{"current_task_list": 42}"#);
        assert_eq!(store.read().expect("read"), Preferences::default());
    }

    #[test]
    fn set_then_get_round_trips_and_creates_parent_dirs() {
        let tmp = TestTempDir::new("prefs-roundtrip");
        let store = store_in(&tmp);
        store.set_current_list("MTIzNDU2").expect("set");
        assert_eq!(
            store.read().expect("read").current_task_list.as_deref(),
            Some("MTIzNDU2")
        );

        store.set_current_list("other").expect("overwrite");
        assert_eq!(
            store.get_current_list().expect("get").as_deref(),
            Some("other")
        );
    }

    #[test]
    fn set_preserves_unknown_fields() {
        let tmp = TestTempDir::new("prefs-unknown");
        tmp.write_text(
            "gtasks/config.json",
            r#"{"current_task_list": "old", "theme": "dark", "nested": {"a": 1}}"#,
        );
        let store = store_in(&tmp);
        store.set_current_list("new").expect("set");

        let raw = std::fs::read_to_string(store.path()).expect("raw");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value["current_task_list"], "new");
        assert_eq!(value["theme"], "dark");
        assert_eq!(value["nested"]["a"], 1);
    }

    #[test]
    fn set_over_corrupt_file_replaces_it_with_valid_record() {
        let tmp = TestTempDir::new("prefs-corrupt-set");
        tmp.write_text("gtasks/config.json", "\u{0}\u{1}garbage");
        let store = store_in(&tmp);
        store.set_current_list("abc").expect("set");
        let raw = std::fs::read_to_string(store.path()).expect("raw");
        assert!(serde_json::from_str::<serde_json::Value>(&raw).is_ok());
        assert_eq!(
            store.get_current_list().expect("get").as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn write_leaves_no_temp_files_behind() {
        let tmp = TestTempDir::new("prefs-tmp");
        let store = store_in(&tmp);
        store.set_current_list("x").expect("set");
        let entries: Vec<_> = std::fs::read_dir(tmp.child("gtasks"))
            .expect("dir")
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["config.json".to_string()]);
    }

    #[test]
    fn empty_record_serializes_as_empty_object() {
        let text = serde_json::to_string(&Preferences::default()).expect("serialize");
        assert_eq!(text, "{}");
    }

    #[cfg(feature = "fuzz-tests")]
    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn set_current_list_round_trips(id in "[A-Za-z0-9_\\-]{1,40}") {
                let tmp = TestTempDir::new("prefs-prop");
                let store = store_in(&tmp);
                store.set_current_list(&id).expect("set");
                prop_assert_eq!(store.read().expect("read").current_task_list, Some(id));
            }
        }
    }
}
