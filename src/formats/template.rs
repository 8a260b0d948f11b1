//! The translation template (`locale/template.txt`).
//!
//! One line per key, `key=`, sorted and without duplicates. The template never
//! carries translations.

use std::collections::BTreeSet;
use std::io::{BufRead, Write};

use tracing::debug;

use crate::{
    error::Error,
    extract::Extractor,
    formats::tr::Line,
    traits::Parser,
};

/// Sorted, deduplicated snapshot of every known key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    keys: Vec<String>,
}

impl Template {
    /// Runs `extractor` over every module and collects the union of keys.
    pub fn build<'a, I>(extractor: &Extractor, modules: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut keys = BTreeSet::new();
        for (index, text) in modules.into_iter().enumerate() {
            let found = extractor.extract(text);
            debug!(module = index, strings = found.len(), "extracted module");
            keys.extend(found);
        }
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: BTreeSet<String> = keys.into_iter().map(Into::into).collect();
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.keys.iter()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys
            .binary_search_by(|probe| probe.as_str().cmp(key))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Renders the template text, one `key=` line each.
    pub fn render(&self) -> String {
        self.keys.iter().map(|key| format!("{key}=\n")).collect()
    }
}

impl<'a> IntoIterator for &'a Template {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

impl Parser for Template {
    /// Reads the keys back from a template; values and non-record lines are ignored.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut keys = Vec::new();
        for line in reader.lines() {
            if let Line::Record(record) = Line::parse(&line?) {
                keys.push(record.key);
            }
        }
        Ok(Template::from_keys(keys))
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        writer
            .write_all(self.render().as_bytes())
            .map_err(Error::Io)
    }
}
