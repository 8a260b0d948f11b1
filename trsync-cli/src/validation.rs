use std::path::Path;

use globset::Glob;
use trsync::config::MOD_CONF;
use trsync::languages::{is_supported, resolve_language};

/// Validate project directory exists and carries a `mod.conf`
pub fn validate_project_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("Directory does not exist: {}", path.display()));
    }

    if !path.is_dir() {
        return Err(format!("Path is not a directory: {}", path.display()));
    }

    if !path.join(MOD_CONF).is_file() {
        return Err(format!(
            "No {} found in {}",
            MOD_CONF,
            path.display()
        ));
    }

    Ok(())
}

/// Validate output directory exists or can be created
pub fn validate_output_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if let Some(parent) = path_obj.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        return Err(format!("Cannot create output directory: {}", e));
    }

    Ok(())
}

/// Validate a locale id can be sent to the machine translation service
pub fn validate_language_code(lang: &str) -> Result<(), String> {
    if lang.is_empty() {
        return Err("Language code cannot be empty".to_string());
    }

    resolve_language(lang, is_supported)
        .map(|_| ())
        .map_err(|e| format!("{}", e))
}

/// Validate a locale id is well formed, whether or not it can be machine translated
pub fn validate_locale_id(lang: &str) -> Result<(), String> {
    resolve_language(lang, |_| true)
        .map(|_| ())
        .map_err(|e| format!("{}", e))
}

/// Validate include glob patterns
pub fn validate_include_patterns(patterns: &[String]) -> Result<(), String> {
    if patterns.is_empty() {
        return Err("At least one include pattern is required".to_string());
    }

    for pattern in patterns {
        Glob::new(pattern).map_err(|e| format!("Invalid glob pattern '{}': {}", pattern, e))?;
    }

    Ok(())
}
