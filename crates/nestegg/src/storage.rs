//! Scenario storage in the data directory
//!
//! Directory structure:
//! ~/.nestegg/
//!   nestegg.log
//!   scenarios/
//!     retire-at-60.yaml
//!     conservative.yaml

use std::fs;
use std::path::{Path, PathBuf};

use nestegg_core::config::SimulationParameters;

use crate::util::io::atomic_write;

/// Error types for storage operations
#[derive(Debug)]
pub enum StorageError {
    Io(String),
    Parse(String),
    Serialize(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "IO error: {msg}"),
            StorageError::Parse(msg) => write!(f, "Parse error: {msg}"),
            StorageError::Serialize(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Named, persisted simulation parameter sets
pub trait ScenarioStore {
    fn save(&self, name: &str, params: &SimulationParameters) -> Result<(), StorageError>;

    /// `Ok(None)` when no scenario with that name exists
    fn load(&self, name: &str) -> Result<Option<SimulationParameters>, StorageError>;

    /// Stored scenario names, sorted
    fn list(&self) -> Result<Vec<String>, StorageError>;

    /// Remove a scenario; returns whether one existed
    fn delete(&self, name: &str) -> Result<bool, StorageError>;
}

/// Scenario files under a root data directory
pub struct DataDirectory {
    root: PathBuf,
}

impl DataDirectory {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Get the default data directory path (~/.nestegg/)
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".nestegg")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn scenarios_dir(&self) -> PathBuf {
        self.root.join("scenarios")
    }

    fn scenario_path(&self, name: &str) -> PathBuf {
        self.scenarios_dir()
            .join(format!("{}.yaml", sanitize_filename(name)))
    }

    /// Check if the data directory has been initialized
    pub fn exists(&self) -> bool {
        self.scenarios_dir().exists()
    }

    /// Create the directory structure
    pub fn init(&self) -> Result<(), StorageError> {
        fs::create_dir_all(self.scenarios_dir()).map_err(|e| {
            StorageError::Io(format!("Failed to create scenarios directory: {e}"))
        })
    }
}

impl ScenarioStore for DataDirectory {
    fn save(&self, name: &str, params: &SimulationParameters) -> Result<(), StorageError> {
        if !self.exists() {
            self.init()?;
        }

        let yaml = serde_saphyr::to_string(params)
            .map_err(|e| StorageError::Serialize(format!("Failed to serialize scenario: {e}")))?;

        let path = self.scenario_path(name);
        atomic_write(&path, &yaml)
            .map_err(|e| StorageError::Io(format!("Failed to write scenario: {e}")))?;

        tracing::debug!(scenario = name, path = %path.display(), "scenario saved");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Option<SimulationParameters>, StorageError> {
        let path = self.scenario_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| StorageError::Io(format!("Failed to read scenario: {e}")))?;

        serde_saphyr::from_str(&content)
            .map(Some)
            .map_err(|e| StorageError::Parse(format!("Failed to parse scenario {name:?}: {e}")))
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        let dir = self.scenarios_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir)
            .map_err(|e| StorageError::Io(format!("Failed to read scenarios directory: {e}")))?;

        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| ext == "yaml" || ext == "yml")
            })
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(String::from))
            .collect();
        names.sort();
        Ok(names)
    }

    fn delete(&self, name: &str) -> Result<bool, StorageError> {
        let path = self.scenario_path(name);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)
            .map_err(|e| StorageError::Io(format!("Failed to delete scenario: {e}")))?;
        tracing::debug!(scenario = name, "scenario deleted");
        Ok(true)
    }
}

/// Sanitize a filename to be safe for the filesystem
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
