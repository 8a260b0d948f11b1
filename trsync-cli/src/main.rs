use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use trsync_cli::translate::{TranslateCommandOptions, run_translate_command};
use trsync_cli::update::{UpdateOptions, run_update_command};

#[derive(Parser, Debug)]
#[command(name = "trsync", author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v, -vv). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Regenerate locale/template.txt and sync every .tr file with it.
    Update {
        /// Mod directories to process (default: current directory)
        dirs: Vec<PathBuf>,

        /// Config file to use instead of <dir>/trsync.toml
        #[arg(long)]
        config: Option<PathBuf>,

        /// Move unused translations back when their key is used again
        #[arg(long)]
        restore_unused: bool,

        /// Create locale/<mod>.<LANG>.tr when it does not exist yet
        #[arg(long = "add-lang", value_name = "LANG")]
        add_langs: Vec<String>,

        /// Write a JSON summary to this file
        #[arg(long)]
        report_json: Option<String>,

        /// Show what would change without writing any file
        #[arg(long)]
        dry_run: bool,
    },

    /// Only regenerate locale/template.txt.
    Template {
        /// Mod directories to process (default: current directory)
        dirs: Vec<PathBuf>,

        /// Config file to use instead of <dir>/trsync.toml
        #[arg(long)]
        config: Option<PathBuf>,

        /// Show what would change without writing any file
        #[arg(long)]
        dry_run: bool,
    },

    /// Fill untranslated entries through an external translator command.
    Translate {
        /// Mod directories to process (default: current directory)
        dirs: Vec<PathBuf>,

        /// Config file to use instead of <dir>/trsync.toml
        #[arg(long)]
        config: Option<PathBuf>,

        /// Translator program; reads a JSON request on stdin, prints a JSON map
        #[arg(long)]
        translator: Option<String>,

        /// Argument passed to the translator program (repeatable)
        #[arg(long = "translator-arg", value_name = "ARG", allow_hyphen_values = true)]
        translator_args: Vec<String>,

        /// Language of the source strings (default: en)
        #[arg(long)]
        source_lang: Option<String>,

        /// Only translate these locales (repeatable)
        #[arg(long = "lang", value_name = "LANG")]
        langs: Vec<String>,

        /// Write a JSON summary to this file
        #[arg(long)]
        report_json: Option<String>,

        /// Show what would change without writing any file
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate shell completion script
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.commands {
        Commands::Update {
            dirs,
            config,
            restore_unused,
            add_langs,
            report_json,
            dry_run,
        } => run_update_command(UpdateOptions {
            dirs,
            config,
            template_only: false,
            restore_unused,
            add_langs,
            report_json,
            dry_run,
        }),
        Commands::Template {
            dirs,
            config,
            dry_run,
        } => run_update_command(UpdateOptions {
            dirs,
            config,
            template_only: true,
            dry_run,
            ..Default::default()
        }),
        Commands::Translate {
            dirs,
            config,
            translator,
            translator_args,
            source_lang,
            langs,
            report_json,
            dry_run,
        } => run_translate_command(TranslateCommandOptions {
            dirs,
            config,
            translator,
            translator_args,
            source_lang,
            langs,
            report_json,
            dry_run,
        }),
        Commands::Completions { shell } => {
            let mut cmd = Args::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
