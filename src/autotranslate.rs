//! Filling untranslated records through an external translation service.
//!
//! Every untranslated key is cut at its `@n` markers; the text pieces of all
//! records are deduplicated and sent to the [`Translator`] in a single batch.
//! A record is only filled in when every one of its pieces came back
//! translated, and it then gets a warning comment above it. Records that
//! could not be fully translated stay empty so a later run can retry them.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::Error,
    formats::{Line, Record, TrFile},
    languages,
    placeholder::{self, Token},
};

/// Comment placed above every machine-translated record.
pub const MACHINE_TRANSLATION_WARNING: &str = "#WARNING: AUTOTRANSLATED BY MACHINE TRANSLATION";

/// An external machine-translation service.
pub trait Translator {
    /// Translates `texts` from `source` to `target`.
    ///
    /// The returned map goes from input text to translated text. Texts the
    /// service could not handle may simply be left out.
    fn translate(
        &self,
        texts: &[String],
        source: &str,
        target: &str,
    ) -> Result<HashMap<String, String>, Error>;

    /// Whether the service accepts the (normalized) language `code`.
    fn supports_language(&self, code: &str) -> bool {
        languages::is_supported(code)
    }
}

impl<T: Translator + ?Sized> Translator for &T {
    fn translate(
        &self,
        texts: &[String],
        source: &str,
        target: &str,
    ) -> Result<HashMap<String, String>, Error> {
        (**self).translate(texts, source, target)
    }

    fn supports_language(&self, code: &str) -> bool {
        (**self).supports_language(code)
    }
}

/// Options for [`auto_translate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Language the keys are written in.
    pub source_language: String,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            source_language: "en".to_string(),
        }
    }
}

/// Counters describing one auto-translate pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TranslateReport {
    /// Service language code the locale resolved to.
    pub target_language: String,
    /// Untranslated records found.
    pub candidates: usize,
    /// Distinct text pieces sent to the service.
    pub fragments: usize,
    /// Records filled in.
    pub translated: usize,
    /// Pieces the service left out or returned unchanged.
    pub failed_fragments: usize,
    /// Records still untranslated afterwards.
    pub left_untranslated: usize,
    /// Whether the service was called at all.
    pub service_called: bool,
}

/// Distinct text pieces of all untranslated records, sorted.
pub fn collect_fragments(file: &TrFile) -> Vec<String> {
    let batch: BTreeSet<&str> = file
        .records()
        .filter(|(_, record)| !record.is_translated())
        .flat_map(|(_, record)| placeholder::fragments(&record.key))
        .collect();
    batch.into_iter().map(str::to_string).collect()
}

/// Rebuilds `key` from translated pieces; `None` as soon as one piece is missing.
pub fn resolve_key(key: &str, mapping: &HashMap<String, String>) -> Option<String> {
    placeholder::split(key)
        .into_iter()
        .try_fold(String::with_capacity(key.len()), |mut out, token| {
            match token {
                Token::Marker => out.push_str(token.as_str()),
                Token::Text(text) => out.push_str(mapping.get(text)?),
            }
            Some(out)
        })
}

/// Fills untranslated records of `file` for `locale` using `translator`.
///
/// The locale id is validated before anything else. The service is called at
/// most once, and not at all when nothing needs translating.
pub fn auto_translate<T>(
    file: &TrFile,
    locale: &str,
    translator: &T,
    options: &TranslateOptions,
) -> Result<(TrFile, TranslateReport), Error>
where
    T: Translator + ?Sized,
{
    let target = languages::resolve_language(locale, |code| translator.supports_language(code))?;
    let mut report = TranslateReport {
        target_language: target.clone(),
        candidates: file.untranslated_count(),
        ..TranslateReport::default()
    };

    let batch = collect_fragments(file);
    report.fragments = batch.len();
    if batch.is_empty() {
        report.left_untranslated = report.candidates;
        debug!(locale, "nothing to translate");
        return Ok((file.clone(), report));
    }

    info!(
        locale,
        language = %target,
        fragments = batch.len(),
        "calling translation service"
    );
    let mut mapping = translator.translate(&batch, &options.source_language, &target)?;
    report.service_called = true;

    // identical or empty results count as failures so the record is retried later;
    // a line break would split the record into several physical lines
    mapping.retain(|origin, translated| {
        !translated.is_empty()
            && origin != translated
            && !translated.contains(['\n', '\r'])
    });
    report.failed_fragments = batch
        .iter()
        .filter(|fragment| !mapping.contains_key(*fragment))
        .count();

    let mut lines = Vec::with_capacity(file.lines.len() + report.candidates);
    for line in &file.lines {
        let resolved = match line {
            Line::Record(record) if !record.is_translated() => resolve_key(&record.key, &mapping),
            _ => None,
        };
        match (line, resolved) {
            (Line::Record(record), Some(value)) => {
                let warned = matches!(
                    lines.last(),
                    Some(Line::Comment(text)) if text == MACHINE_TRANSLATION_WARNING
                );
                if !warned {
                    lines.push(Line::Comment(MACHINE_TRANSLATION_WARNING.to_string()));
                }
                lines.push(Line::Record(Record::new(record.key.clone(), value)));
                report.translated += 1;
            }
            _ => lines.push(line.clone()),
        }
    }
    report.left_untranslated = report.candidates - report.translated;

    debug!(
        locale,
        translated = report.translated,
        failed = report.failed_fragments,
        "auto-translate finished"
    );

    Ok((
        TrFile {
            lines,
            trailing_newline: file.trailing_newline,
            crlf: file.crlf,
        },
        report,
    ))
}
