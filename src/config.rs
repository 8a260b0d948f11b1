//! Reading the module name from a project's `mod.conf`.

use std::path::Path;

use crate::error::Error;

/// Name of the project descriptor holding the module name.
pub const MOD_CONF: &str = "mod.conf";

/// Returns the value of the first `name = <modname>` line.
///
/// Spaces around `=` are optional and the name ends at the first whitespace.
/// An empty name counts as missing.
pub fn parse_modname(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let rest = line.strip_prefix("name")?.trim_start_matches(' ');
        let value = rest.strip_prefix('=')?.trim_start_matches(' ');
        let name = value.split_whitespace().next()?;
        Some(name.to_string())
    })
}

/// Reads `mod.conf` in `project_dir` and returns the module name.
pub fn read_modname<P: AsRef<Path>>(project_dir: P) -> Result<String, Error> {
    let path = project_dir.as_ref().join(MOD_CONF);
    let content = std::fs::read_to_string(&path)?;
    parse_modname(&content).ok_or_else(|| Error::MissingModName(path.display().to_string()))
}
