//! Durable storage for the current token and its rotation history.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::token::Credential;

/// Fixed file name inside the configured tokens directory.
pub const TOKENS_FILE_NAME: &str = "tokens.json";

/// On-disk shape: the credential in use plus every credential it superseded,
/// oldest first. `previous` is append-only and never contains the value held
/// in `current` at the moment of a write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokensFile {
    pub current: Option<Credential>,
    #[serde(default)]
    pub previous: Vec<Credential>,
}

/// Storage abstraction for the tokens file.
///
/// `read` distinguishes not-found from parse and IO failures so the caller
/// can decide which ones to downgrade; the coordinator treats all of them as
/// "no data" and logs the unexpected ones.
pub trait CredentialStore: Send + Sync {
    fn exists(&self) -> bool;
    fn read(&self) -> Result<TokensFile, StoreError>;
    fn write(&self, history: &TokensFile) -> Result<(), StoreError>;
}

/// File-backed store writing `tokens.json` under a configured directory.
///
/// Writes are plain overwrites, not atomic renames: a crash mid-write can
/// truncate the file. Single owning process assumed; there is no
/// cross-process locking.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKENS_FILE_NAME)
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        if !self.dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.dir).map_err(|err| StoreError::Io(err.to_string()))?;
        }
        Ok(())
    }
}

impl CredentialStore for FileTokenStore {
    fn exists(&self) -> bool {
        self.path().exists()
    }

    fn read(&self) -> Result<TokensFile, StoreError> {
        let raw = fs::read_to_string(self.path())?;
        let file: TokensFile = serde_json::from_str(&raw)?;
        Ok(file)
    }

    fn write(&self, history: &TokensFile) -> Result<(), StoreError> {
        self.ensure_dir()?;
        let serialized = serde_json::to_vec(history)?;
        fs::write(self.path(), serialized).map_err(|err| StoreError::Io(err.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, FileTokenStore) {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    fn raw(value: &str) -> Credential {
        Credential::Raw(value.to_string())
    }

    #[test]
    fn exists_is_false_before_first_write() {
        let (_dir, store) = temp_store();
        assert!(!store.exists());
    }

    #[test]
    fn read_missing_file_is_not_found() {
        let (_dir, store) = temp_store();
        assert!(matches!(store.read(), Err(StoreError::NotFound)));
    }

    #[test]
    fn round_trip_preserves_current_and_previous_order() {
        let (_dir, store) = temp_store();
        let history = TokensFile {
            current: Some(raw("tok-3")),
            previous: vec![raw("tok-1"), raw("tok-2")],
        };
        store.write(&history).unwrap();
        assert!(store.exists());

        let loaded = store.read().unwrap();
        assert_eq!(loaded, history);
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let (dir, store) = temp_store();
        std::fs::write(dir.path().join(TOKENS_FILE_NAME), "{not-json").unwrap();
        assert!(matches!(store.read(), Err(StoreError::Parse(_))));
    }

    #[test]
    fn write_overwrites_existing_file() {
        let (_dir, store) = temp_store();
        store
            .write(&TokensFile {
                current: Some(raw("old")),
                previous: vec![],
            })
            .unwrap();
        store
            .write(&TokensFile {
                current: Some(raw("new")),
                previous: vec![raw("old")],
            })
            .unwrap();

        let loaded = store.read().unwrap();
        assert_eq!(loaded.current, Some(raw("new")));
        assert_eq!(loaded.previous, vec![raw("old")]);
    }

    #[test]
    fn write_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("tokens"));
        store.write(&TokensFile::default()).unwrap();
        assert!(store.exists());
    }

    #[test]
    fn file_format_matches_legacy_layout() {
        let (dir, store) = temp_store();
        store
            .write(&TokensFile {
                current: Some(raw("tok-2")),
                previous: vec![raw("tok-1")],
            })
            .unwrap();

        let raw_json = std::fs::read_to_string(dir.path().join(TOKENS_FILE_NAME)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw_json).unwrap();
        assert_eq!(json["current"], "tok-2");
        assert_eq!(json["previous"][0], "tok-1");
    }
}
