//! Translatable string extraction from source modules.
//!
//! A literal is extracted when it is the first argument of a call to one of the
//! configured call markers, e.g. `S("Hello")` or `S('Hello %s', name)`.
//! Literals joined with `..` inside the same call are treated as one string.
//!
//! Only single- and double-quoted literals are recognized; long-bracket
//! literals (`S([[...]])`) are skipped without error.

use std::collections::BTreeSet;

use regex::Regex;

use crate::{error::Error, placeholder};

/// Configuration for an [`Extractor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Function names whose first string argument is translatable.
    pub call_markers: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            call_markers: vec!["S".to_string()],
        }
    }
}

impl ExtractorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_call_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.call_markers = markers.into_iter().map(Into::into).collect();
        self
    }
}

/// A compiled quote-specific pattern.
#[derive(Debug, Clone)]
struct LiteralPattern {
    regex: Regex,
    quote: char,
}

/// Scans module text for translatable literals.
#[derive(Debug, Clone)]
pub struct Extractor {
    patterns: Vec<LiteralPattern>,
}

impl Extractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self, Error> {
        if config.call_markers.is_empty() {
            return Err(Error::config_error("at least one call marker is required"));
        }

        let mut patterns = Vec::with_capacity(config.call_markers.len() * 2);
        for marker in &config.call_markers {
            for quote in ['"', '\''] {
                patterns.push(LiteralPattern {
                    regex: Regex::new(&literal_call_pattern(marker, quote))?,
                    quote,
                });
            }
        }

        Ok(Self { patterns })
    }

    /// Returns the encoded keys of every translatable literal in `module_text`.
    pub fn extract(&self, module_text: &str) -> BTreeSet<String> {
        let mut keys = BTreeSet::new();

        for pattern in &self.patterns {
            for caps in pattern.regex.captures_iter(module_text) {
                let Some(body) = caps.get(1) else {
                    continue;
                };
                let key = unescape_quote(&placeholder::encode(body.as_str()), pattern.quote);
                if !key.is_empty() {
                    keys.insert(key);
                }
            }
        }

        keys
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            patterns: ['"', '\'']
                .into_iter()
                .filter_map(|quote| {
                    Regex::new(&literal_call_pattern("S", quote))
                        .ok()
                        .map(|regex| LiteralPattern { regex, quote })
                })
                .collect(),
        }
    }
}

/// `\bMARKER(` + quoted literal (with `..` joins) + `,` or `)`.
fn literal_call_pattern(marker: &str, quote: char) -> String {
    let q = regex::escape(&quote.to_string());
    format!(
        r#"(?s)\b{marker}\(\s*{q}((?:\\.|[^{q}\\]|{q}\s*\.\.\s*{q})*){q}\s*[,)]"#,
        marker = regex::escape(marker),
        q = q,
    )
}

fn unescape_quote(key: &str, quote: char) -> String {
    key.replace(&format!("\\{quote}"), &quote.to_string())
}
