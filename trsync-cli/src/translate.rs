use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};
use trsync::{Parser, TrFile, TranslateOptions, TranslateReport, auto_translate};

use crate::config::ProjectConfig;
use crate::project::Project;
use crate::translator::CommandTranslator;
use crate::validation::{validate_language_code, validate_output_path, validate_project_dir};

#[derive(Debug, Clone, Default)]
pub struct TranslateCommandOptions {
    pub dirs: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    /// Overrides `[translator] program` from the config file.
    pub translator: Option<String>,
    pub translator_args: Vec<String>,
    pub source_lang: Option<String>,
    /// Only these locales; all when empty.
    pub langs: Vec<String>,
    pub report_json: Option<String>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocaleTranslation {
    pub path: PathBuf,
    pub locale: String,
    pub summary: TranslateReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectTranslation {
    pub project: PathBuf,
    pub locales: Vec<LocaleTranslation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

fn resolve_translator(
    opts: &TranslateCommandOptions,
    config: &ProjectConfig,
) -> Result<CommandTranslator, String> {
    if let Some(program) = &opts.translator {
        return Ok(CommandTranslator::new(
            program.clone(),
            opts.translator_args.clone(),
        ));
    }
    match &config.translator {
        Some(translator) => Ok(CommandTranslator::new(
            translator.program.clone(),
            translator.args.clone(),
        )),
        None => Err(
            "No translator configured: pass --translator or set [translator] in trsync.toml"
                .to_string(),
        ),
    }
}

fn translate_one(
    path: &Path,
    locale: &str,
    translator: &CommandTranslator,
    options: &TranslateOptions,
    dry_run: bool,
) -> Result<TranslateReport, String> {
    let file = TrFile::read_from(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    let (translated, report) = auto_translate(&file, locale, translator, options)
        .map_err(|e| format!("{}: {}", path.display(), e))?;

    if report.translated > 0 && !dry_run {
        translated
            .write_atomic(path)
            .map_err(|e| format!("Failed to write '{}': {}", path.display(), e))?;
    }
    Ok(report)
}

/// Machine translates the untranslated records of every `.tr` file in one project.
pub fn translate_project(
    dir: &Path,
    opts: &TranslateCommandOptions,
) -> Result<ProjectTranslation, String> {
    validate_project_dir(dir)?;
    let config = ProjectConfig::load(dir, opts.config.as_deref())?;
    let translator = resolve_translator(opts, &config)?;
    let options = TranslateOptions {
        source_language: opts
            .source_lang
            .clone()
            .unwrap_or_else(|| config.source_language.clone()),
    };

    let mut result = ProjectTranslation {
        project: dir.to_path_buf(),
        locales: Vec::new(),
        errors: Vec::new(),
    };

    for file in Project::new(dir).tr_files()? {
        let Some(locale) = file.locale else {
            warn!(path = %file.path.display(), "cannot infer locale from file name, skipping");
            continue;
        };
        if !opts.langs.is_empty() && !opts.langs.iter().any(|l| l == &locale) {
            continue;
        }

        info!(path = %file.path.display(), locale = %locale, "translating");
        match translate_one(&file.path, &locale, &translator, &options, opts.dry_run) {
            Ok(report) => {
                if report.service_called {
                    println!(
                        "  {}: {} of {} strings translated",
                        file.path.display(),
                        report.translated,
                        report.candidates
                    );
                } else {
                    println!("  {}: nothing to translate", file.path.display());
                }
                result.locales.push(LocaleTranslation {
                    path: file.path,
                    locale,
                    summary: report,
                });
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                result.errors.push(e);
            }
        }
    }

    Ok(result)
}

pub fn run_translate_command(opts: TranslateCommandOptions) -> Result<(), String> {
    for lang in &opts.langs {
        validate_language_code(lang)?;
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
    let mut failures = 0usize;
    for dir in &dirs {
        println!("Translating {}", dir.display());
        match translate_project(dir, &opts) {
            Ok(project) => {
                failures += project.errors.len();
                projects.push(project);
            }
            Err(e) => {
                eprintln!("Error: {}: {}", dir.display(), e);
                failures += 1;
            }
        }
    }

    if let Some(report_path) = &opts.report_json {
        let text = serde_json::to_string_pretty(&projects)
            .map_err(|e| format!("Failed to serialize report JSON: {}", e))?;
        std::fs::write(report_path, text)
            .map_err(|e| format!("Failed to write report JSON '{}': {}", report_path, e))?;
        println!("Report JSON written: {}", report_path);
    }

    if opts.dry_run {
        println!("Dry-run mode: no files were written");
    }

    if failures == 0 {
        println!("Done.");
        Ok(())
    } else {
        Err(format!("{} unit(s) failed", failures))
    }
}
