//! Extension package naming rule.
//!
//! Every extension package is named `extension-<short>` with an optional
//! npm-style scope: `@acme/extension-store-locator`. The short name is what
//! consumers match against file paths; the full name is what appears under
//! `node_modules/`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Pattern every extension package name must match.
pub const EXTENSION_NAME_PATTERN: &str = r"^(?:@([^/]+)/)?extension-(.+)$";

static EXTENSION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EXTENSION_NAME_PATTERN).unwrap());

/// A package name that follows the extension naming rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionName {
    package: String,
    namespace: Option<String>,
    short_name: String,
}

impl ExtensionName {
    /// Parse a package name, capturing its scope and short name.
    pub fn parse(package: &str) -> Result<Self> {
        let captures = EXTENSION_NAME
            .captures(package)
            .ok_or_else(|| Error::InvalidName {
                name: package.to_string(),
                reason: format!("expected a name matching {EXTENSION_NAME_PATTERN}"),
            })?;

        Ok(Self {
            package: package.to_string(),
            namespace: captures.get(1).map(|m| m.as_str().to_string()),
            short_name: captures[2].to_string(),
        })
    }

    /// Whether `package` follows the naming rule.
    pub fn is_valid(package: &str) -> bool {
        EXTENSION_NAME.is_match(package)
    }

    /// The full package name, including scope.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The scope without the leading `@`, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The part after `extension-`.
    pub fn short_name(&self) -> &str {
        &self.short_name
    }
}

impl fmt::Display for ExtensionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.package)
    }
}
