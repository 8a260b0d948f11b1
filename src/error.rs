//! All error types for the trsync crate.
//!
//! These are returned from all fallible operations (reading, writing, extraction, translation).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("unable to find module name in `{0}`")]
    MissingModName(String),

    #[error("invalid language code `{0}`")]
    InvalidLanguage(String),

    #[error("language `{0}` is not supported by the translator")]
    UnsupportedLanguage(String),

    #[error("translation service error: {message}")]
    Translation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// Creates a new translation service error with optional source error
    pub fn translation_error(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Translation {
            message: message.into(),
            source,
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_pattern_error() {
        let regex_error = regex::Regex::new("(unclosed").unwrap_err();
        let error = Error::from(regex_error);
        assert!(error.to_string().starts_with("invalid extraction pattern"));
    }

    #[test]
    fn test_missing_modname_error() {
        let error = Error::MissingModName("./mod.conf".to_string());
        assert_eq!(
            error.to_string(),
            "unable to find module name in `./mod.conf`"
        );
    }

    #[test]
    fn test_translation_error_with_source() {
        let source_error = Box::new(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        let error = Error::translation_error("translator exited early", Some(source_error));
        assert_eq!(
            error.to_string(),
            "translation service error: translator exited early"
        );
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_language_errors() {
        assert_eq!(
            Error::InvalidLanguage("12".to_string()).to_string(),
            "invalid language code `12`"
        );
        assert_eq!(
            Error::UnsupportedLanguage("jbo".to_string()).to_string(),
            "language `jbo` is not supported by the translator"
        );
    }

    #[test]
    fn test_config_error() {
        let error = Error::config_error("bad include glob");
        assert_eq!(error.to_string(), "config error: bad include glob");
    }
}
