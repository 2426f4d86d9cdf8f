//! [`TestProject`] builder for override-resolution scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary storefront project: base app files at the root, extension
/// packages under `node_modules/`, and a `storefront.toml`.
///
/// # Example
///
/// ```rust,no_run
/// use storefront_test_utils::project::TestProject;
///
/// let project = TestProject::new();
/// project.write_config(&["extension-a", "extension-b"]);
/// project.add_base_file("app/components/header.jsx", "export default 'base'");
/// project.add_extension_file("extension-b", "app/components/header.jsx", "export default 'b'");
/// project.assert_file_exists("node_modules/extension-b/app/components/header.jsx");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary project directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the project root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `path` (relative to the root), creating parents.
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        full_path
    }

    /// Write a base-app file.
    pub fn add_base_file(&self, path: &str, content: &str) -> PathBuf {
        self.write_file(path, content)
    }

    /// Write a file inside `node_modules/<package>/`.
    pub fn add_extension_file(&self, package: &str, path: &str, content: &str) -> PathBuf {
        self.write_file(&format!("node_modules/{package}/{path}"), content)
    }

    /// Write `storefront.toml` declaring `extensions` as bare names.
    pub fn write_config(&self, extensions: &[&str]) -> PathBuf {
        let list = extensions
            .iter()
            .map(|e| format!("\"{}\"", e))
            .collect::<Vec<_>>()
            .join(", ");
        self.write_file("storefront.toml", &format!("[app]\nextensions = [{list}]\n"))
    }

    /// Write `storefront.toml` verbatim.
    pub fn write_raw_config(&self, content: &str) -> PathBuf {
        self.write_file("storefront.toml", content)
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }
}
