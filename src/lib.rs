#![forbid(unsafe_code)]
//! Translation template and `.tr` locale file toolkit for Rust.
//!
//! Extracts translatable literals from source modules, keeps a sorted template
//! of every known string, synchronizes per-locale `.tr` files against it
//! without losing existing translations, and can fill missing translations
//! through an external machine-translation service while leaving `@n` line
//! markers untouched.
//!
//! # Quick Start
//!
//! ```rust
//! use trsync::{Extractor, SyncOptions, Template, sync_tr_file};
//!
//! let template = Template::build(&Extractor::default(), [r#"S("Hello\nWorld")"#]);
//! assert_eq!(template.render(), "Hello@nWorld=\n");
//!
//! let outcome = sync_tr_file(&template, "mymod", None, &SyncOptions::default());
//! assert!(outcome.file.render().starts_with("# textdomain: mymod\nHello@nWorld=\n"));
//! ```
//!
//! # Modules
//!
//! - [`placeholder`]: key encoding and marker-aware splitting
//! - [`extract`]: literal extraction from source text
//! - [`formats`]: the template and `.tr` file formats
//! - [`operations`]: template/locale synchronization
//! - [`autotranslate`]: machine translation of untranslated records

pub mod autotranslate;
pub mod config;
pub mod error;
pub mod extract;
pub mod formats;
pub mod languages;
pub mod operations;
pub mod placeholder;
pub mod traits;

// Re-export most used types for easy consumption
pub use crate::{
    autotranslate::{
        MACHINE_TRANSLATION_WARNING, TranslateOptions, TranslateReport, Translator, auto_translate,
    },
    config::read_modname,
    error::Error,
    extract::{Extractor, ExtractorConfig},
    formats::{Line, Partition, Record, Template, TrFile},
    operations::{Backup, SyncOptions, SyncOutcome, SyncReport, sync_tr_file},
    traits::Parser,
};
