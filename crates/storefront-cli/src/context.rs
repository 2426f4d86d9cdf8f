//! Project discovery
//!
//! Commands work from any directory below a project: without `--project`
//! the nearest ancestor holding a `storefront.{toml,json,yaml,yml}` file is
//! used, falling back to the current directory.

use std::path::{Path, PathBuf};

use storefront_extensions::project::PROJECT_CONFIG_STEM;
use storefront_extensions::{ProjectConfig, ProjectConfigResolver};
use storefront_fs::{ConfigStore, NormalizedPath};

use crate::error::Result;

/// A loaded project: its absolute root and merged configuration.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub root: NormalizedPath,
    pub config: ProjectConfig,
}

impl ProjectContext {
    /// Locate and load the project.
    pub fn load(project: Option<&Path>, config_dir: Option<&Path>, cwd: &Path) -> Result<Self> {
        let root = match project {
            Some(dir) => NormalizedPath::new(cwd.join(dir)),
            None => discover_root(cwd),
        };
        let root = root.canonicalize()?;
        tracing::debug!(root = %root, "Using project root");

        let resolver = match config_dir {
            Some(dir) => ProjectConfigResolver::with_global_config_dir(root.clone(), dir.to_path_buf()),
            None => ProjectConfigResolver::new(root.clone()),
        };
        if !resolver.has_config() {
            tracing::warn!(root = %root, "No storefront config found, using defaults");
        }
        let config = resolver.resolve()?;

        Ok(Self { root, config })
    }

    /// Absolute form of a file argument. Relative paths are taken from the
    /// project root.
    pub fn path_arg(&self, arg: &Path) -> NormalizedPath {
        if arg.is_absolute() {
            NormalizedPath::new(arg)
        } else {
            self.root.join(NormalizedPath::new(arg).as_str())
        }
    }
}

fn discover_root(cwd: &Path) -> NormalizedPath {
    let store = ConfigStore::new();
    cwd.ancestors()
        .map(NormalizedPath::new)
        .find(|dir| store.find(dir, PROJECT_CONFIG_STEM).is_some())
        .unwrap_or_else(|| NormalizedPath::new(cwd))
}

/// Current directory, for commands that need one.
pub fn current_dir() -> Result<PathBuf> {
    Ok(std::env::current_dir()?)
}
