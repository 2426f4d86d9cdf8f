//! One element of the project's `app.extensions` list.

use serde::{Deserialize, Serialize};

use crate::config::ExtensionConfig;
use crate::error::Result;
use crate::name::ExtensionName;

/// A configured extension: either a bare package name or a
/// `[package, config]` pair.
///
/// ```
/// use storefront_extensions::ExtensionEntry;
///
/// let entries: Vec<ExtensionEntry> = serde_json::from_str(
///     r#"["extension-a", ["@acme/extension-b", {"enabled": false}]]"#,
/// )
/// .unwrap();
///
/// assert_eq!(entries[0].package(), "extension-a");
/// assert!(entries[0].is_enabled());
/// assert_eq!(entries[1].package(), "@acme/extension-b");
/// assert!(!entries[1].is_enabled());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtensionEntry {
    /// `"extension-a"`
    Name(String),
    /// `["extension-a", { enabled = true, ... }]`
    Configured(String, ExtensionConfig),
}

impl ExtensionEntry {
    /// The package name, with the tuple form unwrapped.
    pub fn package(&self) -> &str {
        match self {
            Self::Name(name) | Self::Configured(name, _) => name,
        }
    }

    /// The declared configuration, or the default for a bare name.
    pub fn config(&self) -> ExtensionConfig {
        match self {
            Self::Name(_) => ExtensionConfig::default(),
            Self::Configured(_, config) => config.clone(),
        }
    }

    /// Whether the entry takes part in resolution and composition.
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Name(_) => true,
            Self::Configured(_, config) => config.enabled,
        }
    }

    /// Parse the package name against the naming rule.
    pub fn name(&self) -> Result<ExtensionName> {
        ExtensionName::parse(self.package())
    }
}

impl From<&str> for ExtensionEntry {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<(&str, ExtensionConfig)> for ExtensionEntry {
    fn from((name, config): (&str, ExtensionConfig)) -> Self {
        Self::Configured(name.to_string(), config)
    }
}
