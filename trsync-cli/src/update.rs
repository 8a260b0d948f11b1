use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};
use trsync::{
    Extractor, ExtractorConfig, Parser, SyncOptions, SyncReport, Template, TrFile, read_modname,
    sync_tr_file,
};

use crate::config::ProjectConfig;
use crate::project::Project;
use crate::validation::{
    validate_include_patterns, validate_locale_id, validate_output_path, validate_project_dir,
};

#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    pub dirs: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    /// Only regenerate the template, leave `.tr` files alone.
    pub template_only: bool,
    pub restore_unused: bool,
    /// Locales to create a `.tr` file for when none exists yet.
    pub add_langs: Vec<String>,
    pub report_json: Option<String>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocaleUpdate {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<PathBuf>,
    pub summary: SyncReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectUpdate {
    pub project: PathBuf,
    pub modname: String,
    pub modules: usize,
    pub template_keys: usize,
    pub locales: Vec<LocaleUpdate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

fn sync_one(
    path: &Path,
    template: &Template,
    modname: &str,
    options: &SyncOptions,
    dry_run: bool,
) -> Result<LocaleUpdate, String> {
    let existing = if path.exists() {
        Some(
            TrFile::read_from(path)
                .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?,
        )
    } else {
        None
    };

    let outcome = sync_tr_file(template, modname, existing.as_ref(), options);
    let mut backup_path = None;
    if !dry_run {
        if let Some(backup) = &outcome.backup {
            backup_path = Some(backup.write_next_to(path).map_err(|e| {
                format!("Failed to write backup for '{}': {}", path.display(), e)
            })?);
        }
        outcome
            .file
            .write_atomic(path)
            .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
    }

    Ok(LocaleUpdate {
        path: path.to_path_buf(),
        backup: backup_path,
        summary: outcome.report,
    })
}

/// Regenerates the template of one project and syncs its `.tr` files.
///
/// A failing `.tr` file is recorded in `errors` and the others are still processed.
pub fn update_project(dir: &Path, opts: &UpdateOptions) -> Result<ProjectUpdate, String> {
    validate_project_dir(dir)?;
    let config = ProjectConfig::load(dir, opts.config.as_deref())?;
    validate_include_patterns(&config.include)?;
    let modname = read_modname(dir).map_err(|e| e.to_string())?;
    println!("Updating translations for {}", modname);

    let extractor =
        Extractor::new(&ExtractorConfig::new().with_call_markers(config.call_markers.clone()))
            .map_err(|e| e.to_string())?;
    let project = Project::new(dir);
    let modules = project.source_modules(&config.include)?;
    for module in &modules {
        info!(path = %module.path.display(), "scanning");
    }
    let template = Template::build(&extractor, modules.iter().map(|m| m.text.as_str()));

    let template_path = project.template_path();
    if !opts.dry_run {
        std::fs::create_dir_all(project.locale_dir())
            .map_err(|e| format!("Cannot create locale directory: {}", e))?;
        template
            .write_atomic(&template_path)
            .map_err(|e| format!("Failed to write template: {}", e))?;
    }
    println!(
        "Template: {} strings from {} files -> {}",
        template.len(),
        modules.len(),
        template_path.display()
    );

    let mut result = ProjectUpdate {
        project: dir.to_path_buf(),
        modname: modname.clone(),
        modules: modules.len(),
        template_keys: template.len(),
        locales: Vec::new(),
        errors: Vec::new(),
    };
    if opts.template_only {
        return Ok(result);
    }

    let mut paths: Vec<PathBuf> = project
        .tr_files()?
        .into_iter()
        .map(|file| file.path)
        .collect();
    for lang in &opts.add_langs {
        let path = project
            .locale_dir()
            .join(format!("{}.{}.tr", modname, lang));
        if !paths.contains(&path) {
            paths.push(path);
        }
    }

    let sync_options = SyncOptions {
        restore_unused: opts.restore_unused || config.restore_unused,
    };
    for path in paths {
        match sync_one(&path, &template, &modname, &sync_options, opts.dry_run) {
            Ok(update) => {
                println!(
                    "  {}: {} added, {} kept, {} untranslated, {} moved to unused",
                    path.display(),
                    update.summary.added,
                    update.summary.preserved,
                    update.summary.untranslated,
                    update.summary.moved_to_unused
                );
                result.locales.push(update);
            }
            Err(e) => {
                warn!("{}", e);
                eprintln!("Error: {}", e);
                result.errors.push(e);
            }
        }
    }

    Ok(result)
}

fn write_report(path: &str, projects: &[ProjectUpdate]) -> Result<(), String> {
    let text = serde_json::to_string_pretty(projects)
        .map_err(|e| format!("Failed to serialize report JSON: {}", e))?;
    std::fs::write(path, text).map_err(|e| format!("Failed to write report JSON '{}': {}", path, e))
}

pub fn run_update_command(opts: UpdateOptions) -> Result<(), String> {
    for lang in &opts.add_langs {
        validate_locale_id(lang)?;
    }
    if let Some(report_path) = &opts.report_json {
        validate_output_path(report_path)?;
    }

    let dirs = if opts.dirs.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        opts.dirs.clone()
    };

    let mut projects = Vec::new();
    let mut failures = Vec::new();
    for dir in &dirs {
        match update_project(dir, &opts) {
            Ok(project) => {
                failures.extend(project.errors.iter().cloned());
                projects.push(project);
            }
            Err(e) => {
                eprintln!("Error: {}: {}", dir.display(), e);
                failures.push(format!("{}: {}", dir.display(), e));
            }
        }
    }

    if let Some(report_path) = &opts.report_json {
        write_report(report_path, &projects)?;
        println!("Report JSON written: {}", report_path);
    }

    if opts.dry_run {
        println!("Dry-run mode: no files were written");
    }

    if failures.is_empty() {
        println!("Done.");
        Ok(())
    } else {
        Err(format!("{} unit(s) failed", failures.len()))
    }
}
