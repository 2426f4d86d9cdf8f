//! Per-extension configuration from the `[name, { ... }]` tuple form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_enabled() -> bool {
    true
}

/// Per-extension configuration declared next to the package name.
///
/// Only `enabled` has meaning to the toolkit itself; every other key is kept
/// for the extension to interpret.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ExtensionConfig {
    /// Whether the extension participates in resolution and composition.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Arbitrary extension-specific configuration values.
    #[serde(default, flatten)]
    pub settings: BTreeMap<String, Value>,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            settings: BTreeMap::new(),
        }
    }
}

impl ExtensionConfig {
    /// Look up an extension-specific setting.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    /// Look up a string setting.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(Value::as_str)
    }
}
