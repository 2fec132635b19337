pub mod repository;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Synchronous string-keyed, string-valued storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
struct StoreFile {
    entries: BTreeMap<String, String>,
}

/// A flat JSON object on disk. Every `set` rewrites the whole file via a
/// sibling `.tmp` file renamed over it.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    file: StoreFile,
}

impl JsonFileStore {
    /// A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self> {
        let file = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("unable to read store file {}", path.display()))?;
            parse_store_text(&content)?
        } else {
            StoreFile::default()
        };
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("unable to create {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(&self.file)?;
        let staging = self.staging_path();
        fs::write(&staging, format!("{text}\n"))
            .with_context(|| format!("unable to write store file {}", staging.display()))?;
        fs::rename(&staging, &self.path)
            .with_context(|| format!("unable to replace store file {}", self.path.display()))?;
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.file.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.file
            .entries
            .insert(key.to_string(), value.to_string());
        self.write()
    }
}

fn parse_store_text(content: &str) -> Result<StoreFile> {
    if content.trim().is_empty() {
        return Ok(StoreFile::default());
    }
    serde_json::from_str::<StoreFile>(content).map_err(|err| {
        let line = err.line();
        let column = err.column();
        anyhow!("invalid store JSON at line {line}, column {column}: {err}")
    })
}

#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_entries<const N: usize>(entries: [(&str, &str); N]) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        }
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
