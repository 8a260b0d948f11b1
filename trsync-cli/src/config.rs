//! Optional per-project settings from `trsync.toml`.
//!
//! ```toml
//! source_language = "en"
//! call_markers = ["S", "NS"]
//! include = ["*.lua"]
//! restore_unused = false
//!
//! [translator]
//! program = "my-translate"
//! args = ["--engine", "google"]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// File name looked up in each project directory.
pub const CONFIG_FILE_NAME: &str = "trsync.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub source_language: String,
    pub call_markers: Vec<String>,
    pub include: Vec<String>,
    pub restore_unused: bool,
    pub translator: Option<TranslatorConfig>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            source_language: "en".to_string(),
            call_markers: vec!["S".to_string()],
            include: vec!["*.lua".to_string()],
            restore_unused: false,
            translator: None,
        }
    }
}

/// External translator command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TranslatorConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ProjectConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Invalid config: {}", e))
    }

    /// Loads `explicit` if given, else `<project_dir>/trsync.toml` when present,
    /// else defaults.
    pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<Self, String> {
        let path: PathBuf = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = project_dir.join(CONFIG_FILE_NAME);
                if !candidate.is_file() {
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let content = std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read config '{}': {}", path.display(), e))?;
        Self::from_toml_str(&content)
            .map_err(|e| format!("{} ({})", e, path.display()))
    }
}
