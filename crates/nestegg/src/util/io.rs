//! File helpers shared by the commands and the data directory

use std::fs;
use std::io;
use std::path::Path;

use color_eyre::eyre::{WrapErr, eyre};
use serde::de::DeserializeOwned;

/// Write `content` next to `path` and rename it into place.
///
/// A reader never observes a half-written file.
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Input document encodings recognised by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.json` is JSON; everything else is read as YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Parse `content` in the given format
pub fn parse_document<T: DeserializeOwned>(
    content: &str,
    format: DocumentFormat,
) -> color_eyre::Result<T> {
    match format {
        DocumentFormat::Json => Ok(serde_json::from_str(content)?),
        DocumentFormat::Yaml => serde_saphyr::from_str(content).map_err(|e| eyre!("{e}")),
    }
}

/// Read and parse a JSON or YAML file
pub fn load_document<T: DeserializeOwned>(path: &Path) -> color_eyre::Result<T> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    parse_document(&content, DocumentFormat::from_path(path))
        .wrap_err_with(|| format!("failed to parse {}", path.display()))
}
