//! CLI library for testing purposes

pub mod config;
pub mod project;
pub mod translate;
pub mod translator;
pub mod update;
pub mod validation;

pub use config::ProjectConfig;
pub use translator::CommandTranslator;
