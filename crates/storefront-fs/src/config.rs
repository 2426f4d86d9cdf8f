//! Format-agnostic configuration loading

use crate::{Error, NormalizedPath, Result};
use serde::de::DeserializeOwned;

/// File extensions recognised by [`ConfigStore`], in lookup order.
pub const CONFIG_EXTENSIONS: &[&str] = &["toml", "json", "yaml", "yml"];

/// Format-agnostic configuration store.
///
/// Detects format from the file extension and deserializes transparently.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    /// Create a new ConfigStore.
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let native = path.to_native();
        let content = std::fs::read_to_string(&native).map_err(|e| Error::io(&native, e))?;
        let extension = path.extension().unwrap_or("");
        tracing::debug!(path = %path, format = extension, "Loading config file");

        match extension.to_lowercase().as_str() {
            "toml" => toml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: native,
                format: "TOML".into(),
                message: e.to_string(),
            }),
            "json" => serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
                path: native,
                format: "JSON".into(),
                message: e.to_string(),
            }),
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: native,
                format: "YAML".into(),
                message: e.to_string(),
            }),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    /// Find the first existing `<dir>/<stem>.<ext>` over [`CONFIG_EXTENSIONS`].
    pub fn find(&self, dir: &NormalizedPath, stem: &str) -> Option<NormalizedPath> {
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| dir.join(&format!("{stem}.{ext}")))
            .find(NormalizedPath::is_file)
    }
}
