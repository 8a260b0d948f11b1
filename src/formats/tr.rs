//! Support for `.tr` locale files.
//!
//! A `.tr` file is line based:
//!
//! ```text
//! # textdomain: mymod
//! Hello@nWorld=Bonjour@nMonde
//! Stone=
//! ##### not used anymore #####
//! Old=Ancien
//! ```
//!
//! Comment lines start with `#` (after optional spaces). Any other line holding
//! a bare `=` is a record: everything before the first bare `=` is the key,
//! the rest is the value. Lines that are neither are kept as raw text.
//! Rendering an unmodified [`TrFile`] reproduces its input byte for byte.
//!
//! Files whose every line ends with `\r\n` are read and written with that
//! terminator. In files mixing both, a stray `\r` stays part of the line text.

use std::fmt::Display;
use std::io::{BufRead, Read, Write};

use crate::{error::Error, placeholder, traits::Parser};

/// Prefix of the domain header comment.
pub const TEXTDOMAIN_PREFIX: &str = "# textdomain:";

/// Separator comment in front of the unused partition.
pub const UNUSED_SEPARATOR: &str = "##### not used anymore #####";

/// A `.tr` file as an ordered sequence of lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrFile {
    pub lines: Vec<Line>,
    /// Whether the last line was terminated.
    pub trailing_newline: bool,
    /// Lines are terminated by `\r\n` instead of `\n`.
    pub crlf: bool,
}

/// One line of a `.tr` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A comment, stored verbatim including the leading `#`.
    Comment(String),
    /// A `key=value` record.
    Record(Record),
    /// Anything else (blank or malformed lines), stored verbatim.
    Raw(String),
}

/// A translation record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Encoded source text.
    pub key: String,
    /// Translated text; empty when not translated yet.
    pub value: String,
}

/// Which side of the unused separator a record sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Used,
    Unused,
}

impl Record {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn untranslated(key: impl Into<String>) -> Self {
        Self::new(key, String::new())
    }

    /// A value holding only a leftover `\r` counts as empty.
    pub fn is_translated(&self) -> bool {
        !self.value.trim_end_matches('\r').is_empty()
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

impl Line {
    /// Classifies a single line (without its line terminator).
    pub fn parse(line: &str) -> Self {
        if line.trim_start().starts_with('#') {
            return Line::Comment(line.to_string());
        }
        match placeholder::find_bare_equals(line) {
            Some(idx) if idx > 0 => Line::Record(Record::new(&line[..idx], &line[idx + 1..])),
            _ => Line::Raw(line.to_string()),
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Line::Record(record) => Some(record),
            _ => None,
        }
    }

    /// The module name if this line is a domain header.
    pub fn textdomain(&self) -> Option<&str> {
        let Line::Comment(text) = self else {
            return None;
        };
        let name = text
            .trim_start()
            .strip_prefix('#')?
            .trim_start()
            .strip_prefix("textdomain:")?
            .trim();
        (!name.is_empty()).then_some(name)
    }

    pub fn is_unused_separator(&self) -> bool {
        matches!(self, Line::Comment(text) if text.trim() == UNUSED_SEPARATOR)
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Line::Raw(text) if text.trim().is_empty())
    }
}

impl Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Line::Comment(text) | Line::Raw(text) => f.write_str(text),
            Line::Record(record) => record.fmt(f),
        }
    }
}

impl TrFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses file content. Never fails: unrecognized lines become [`Line::Raw`].
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }

        let crlf = uses_crlf(text);
        let terminator = if crlf { "\r\n" } else { "\n" };
        let (body, trailing_newline) = match text.strip_suffix(terminator) {
            Some(body) => (body, true),
            None => (text, false),
        };

        Self {
            lines: body.split(terminator).map(Line::parse).collect(),
            trailing_newline,
            crlf,
        }
    }

    fn line_terminator(&self) -> &'static str {
        if self.crlf { "\r\n" } else { "\n" }
    }

    /// Serializes the file back to text.
    pub fn render(&self) -> String {
        let mut out = self
            .lines
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(self.line_terminator());
        if self.trailing_newline && !self.lines.is_empty() {
            out.push_str(self.line_terminator());
        }
        out
    }

    /// The module name from the first domain header comment, if any.
    pub fn textdomain(&self) -> Option<&str> {
        self.lines.iter().find_map(Line::textdomain)
    }

    /// All records with the partition they belong to, in file order.
    pub fn records(&self) -> impl Iterator<Item = (Partition, &Record)> {
        let mut partition = Partition::Used;
        self.lines.iter().filter_map(move |line| {
            if line.is_unused_separator() {
                partition = Partition::Unused;
            }
            line.as_record().map(|record| (partition, record))
        })
    }

    pub fn find_record(&self, key: &str) -> Option<&Record> {
        self.records()
            .map(|(_, record)| record)
            .find(|record| record.key == key)
    }

    /// Number of records that still need a translation.
    pub fn untranslated_count(&self) -> usize {
        self.records()
            .filter(|(_, record)| !record.is_translated())
            .count()
    }

    pub fn push_comment(&mut self, text: impl Into<String>) {
        self.lines.push(Line::Comment(text.into()));
    }

    pub fn push_record(&mut self, record: Record) {
        self.lines.push(Line::Record(record));
    }
}

/// True when the text has line breaks and every one of them is `\r\n`.
fn uses_crlf(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut breaks = text.match_indices('\n').map(|(idx, _)| idx).peekable();
    breaks.peek().is_some() && breaks.all(|idx| idx > 0 && bytes[idx - 1] == b'\r')
}

impl Parser for TrFile {
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(TrFile::parse(&text))
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        writer
            .write_all(self.render().as_bytes())
            .map_err(Error::Io)
    }
}
