//! Locating the files of one project on disk.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use tracing::{debug, warn};
use trsync::formats::{TEMPLATE_FILE_NAME, infer_locale_from_path, is_tr_file};

/// Directory holding the template and `.tr` files, relative to the project root.
pub const LOCALE_DIR: &str = "locale";

/// A source file's path and text.
#[derive(Debug, Clone)]
pub struct SourceModule {
    pub path: PathBuf,
    pub text: String,
}

/// A `.tr` file and the locale taken from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleFileRef {
    pub path: PathBuf,
    pub locale: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn locale_dir(&self) -> PathBuf {
        self.root.join(LOCALE_DIR)
    }

    pub fn template_path(&self) -> PathBuf {
        self.locale_dir().join(TEMPLATE_FILE_NAME)
    }

    /// All source files matching `include`, sorted by path.
    ///
    /// Files that cannot be read as UTF-8 are skipped with a warning.
    pub fn source_modules(&self, include: &[String]) -> Result<Vec<SourceModule>, String> {
        let set = build_glob_set(include)?;
        let mut paths: Vec<PathBuf> = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_exclude(true)
            .parents(false)
            .build()
            .filter_map(|dent| match dent {
                Ok(dent) => Some(dent),
                Err(e) => {
                    warn!("skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|dent| dent.file_type().is_some_and(|ft| ft.is_file()))
            .map(|dent| dent.into_path())
            .filter(|path| matches_include(&set, &self.root, path))
            .collect();
        paths.sort();

        let mut modules = Vec::with_capacity(paths.len());
        for path in paths {
            match std::fs::read_to_string(&path) {
                Ok(text) => modules.push(SourceModule { path, text }),
                Err(e) => warn!(path = %path.display(), "skipping source file: {}", e),
            }
        }
        debug!(root = %self.root.display(), modules = modules.len(), "collected sources");
        Ok(modules)
    }

    /// Every `.tr` file in the locale directory, sorted by path.
    pub fn tr_files(&self) -> Result<Vec<LocaleFileRef>, String> {
        let dir = self.locale_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut files: Vec<LocaleFileRef> = WalkBuilder::new(&dir)
            .standard_filters(false)
            .build()
            .filter_map(Result::ok)
            .filter(|dent| dent.file_type().is_some_and(|ft| ft.is_file()))
            .map(|dent| dent.into_path())
            .filter(|path| is_tr_file(path))
            .map(|path| LocaleFileRef {
                locale: infer_locale_from_path(&path),
                path,
            })
            .collect();
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, String> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).map_err(|e| format!("Invalid glob pattern '{}': {}", pattern, e))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| format!("Failed to build glob set: {}", e))
}

/// Patterns without `/` match the file name, others the path below the root.
fn matches_include(set: &GlobSet, root: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    set.is_match(relative) || path.file_name().is_some_and(|name| set.is_match(name))
}
