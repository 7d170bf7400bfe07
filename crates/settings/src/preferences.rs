use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::string_list;

const PREFERENCES_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to read preferences {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse preferences {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize preferences {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write preferences {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Key-value contract the rest of the application persists through.
///
/// Reads and writes are infallible; durable backends buffer changes and
/// report I/O failures from their own flush operation.
pub trait PreferenceStore {
    /// Raw stored value, if any.
    fn get(&self, key: &str) -> Option<String>;

    fn put(&mut self, key: &str, value: String);

    fn remove(&mut self, key: &str);

    /// Decoded list stored under `key`; an empty list means "not present".
    fn get_string_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|raw| string_list::decode(&raw))
            .unwrap_or_default()
    }

    fn put_string_list(&mut self, key: &str, items: &[String]) {
        self.put(key, string_list::encode(items));
    }

    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Reads `true`/`false`; anything else yields `default`.
    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key).as_deref().map(str::trim) {
            Some("true") => true,
            Some("false") => false,
            _ => default,
        }
    }

    fn put_bool(&mut self, key: &str, value: bool) {
        self.put(key, value.to_string());
    }
}

/// 記憶體內的偏好設定。 / In-memory preference store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryPreferences {
    entries: BTreeMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryPreferences
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PreferencesDocument {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

fn default_version() -> u32 {
    PREFERENCES_VERSION
}

impl Default for PreferencesDocument {
    fn default() -> Self {
        Self {
            version: PREFERENCES_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

impl PreferencesDocument {
    fn sanitize(&mut self) {
        if self.version == 0 {
            self.version = PREFERENCES_VERSION;
        }
    }
}

/// JSON file-backed preference store. Changes stay in memory until [`PreferencesFile::save`].
#[derive(Debug)]
pub struct PreferencesFile {
    path: PathBuf,
    data: PreferencesDocument,
}

impl PreferencesFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: PreferencesDocument::default(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PreferencesError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "preferences file missing, starting empty");
            return Ok(Self::new(path));
        }

        let data = read_document(&path)?;
        Ok(Self { path, data })
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.data.entries
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<(), PreferencesError> {
        let payload = self.render(&self.path)?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload.as_bytes()).map_err(|source| PreferencesError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| PreferencesError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(
            path = %self.path.display(),
            entries = self.data.entries.len(),
            "saved preferences"
        );
        Ok(())
    }

    pub fn export_to(&self, path: impl AsRef<Path>) -> Result<(), PreferencesError> {
        let path = path.as_ref().to_path_buf();
        let payload = self.render(&path)?;
        fs::write(&path, payload.as_bytes())
            .map_err(|source| PreferencesError::Write { path, source })
    }

    /// 匯入外部檔案並覆寫目前設定，原檔備份為 `.bak`。 / Replaces the current entries with
    /// an external file, backing up the existing one first.
    pub fn import_from(&mut self, source: impl AsRef<Path>) -> Result<(), PreferencesError> {
        let data = read_document(source.as_ref())?;
        self.backup_existing()?;
        self.data = data;
        self.save()
    }

    fn render(&self, target: &Path) -> Result<String, PreferencesError> {
        create_parent(target)?;
        serde_json::to_string_pretty(&self.data).map_err(|source| PreferencesError::Serialize {
            path: target.to_path_buf(),
            source,
        })
    }

    fn backup_existing(&self) -> Result<(), PreferencesError> {
        if self.path.exists() {
            let backup = self.path.with_extension("bak");
            create_parent(&backup)?;
            fs::copy(&self.path, &backup).map_err(|source| PreferencesError::Write {
                path: backup,
                source,
            })?;
        }
        Ok(())
    }
}

impl PreferenceStore for PreferencesFile {
    fn get(&self, key: &str) -> Option<String> {
        self.data.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: String) {
        self.data.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.data.entries.remove(key);
    }
}

fn read_document(path: &Path) -> Result<PreferencesDocument, PreferencesError> {
    let contents = fs::read_to_string(path).map_err(|source| PreferencesError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut data: PreferencesDocument =
        serde_json::from_str(&contents).map_err(|source| PreferencesError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    data.sanitize();
    Ok(data)
}

fn create_parent(path: &Path) -> Result<(), PreferencesError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| PreferencesError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
