mod admonitions;
mod commands;
mod config;
mod diagnostics;
mod error;
mod locales;
mod registry;
mod report;
mod resolver;
mod route;
mod scanner;
mod suggestions;
mod types;
mod walker;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::Context;
use crate::report::Format;

#[derive(Parser)]
#[command(name = "doclinks", version, about = "Build gate for localized documentation trees")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: `.doclinks.toml` next to the output directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Documentation root holding one directory per locale (default: derived from OUT_DIR)
    #[arg(long, global = true)]
    docs_root: Option<PathBuf>,

    /// Report format
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log resolution progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every gate, as the site build's post-build hook does
    All {
        /// Build output directory
        out_dir: PathBuf,
    },
    /// Check admonition container keywords
    Admonitions {
        /// Build output directory
        out_dir: PathBuf,
    },
    /// Verify every LocalizedLink target exists in some locale
    Links {
        /// Build output directory
        out_dir: PathBuf,
    },
    /// Check every base-locale page exists in each locale
    Locales {
        /// Build output directory
        out_dir: PathBuf,
    },
}

impl Commands {
    /// The build output directory every subcommand receives.
    fn out_dir(&self) -> &PathBuf {
        return match self {
            Self::All { out_dir }
            | Self::Admonitions { out_dir }
            | Self::Links { out_dir }
            | Self::Locales { out_dir } => out_dir,
        };
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    return match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    };
}

/// Load the context and dispatch the subcommand.
///
/// # Errors
///
/// Returns the gate's failure or any fatal error.
fn run(cli: &Cli) -> Result<(), error::Error> {
    let locale_override = std::env::var(config::LOCALES_ENV).ok().filter(|v| return !v.trim().is_empty());
    let ctx = Context::load(
        cli.command.out_dir(),
        cli.docs_root.as_deref(),
        cli.config.as_deref(),
        locale_override.as_deref(),
        cli.format,
    )?;

    return match cli.command {
        Commands::All { .. } => commands::all(&ctx),
        Commands::Admonitions { .. } => commands::admonitions(&ctx),
        Commands::Links { .. } => commands::links(&ctx),
        Commands::Locales { .. } => commands::locales(&ctx),
    };
}

/// Route `tracing` events to stderr. `RUST_LOG` wins unless `--verbose` is set.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("doclinks=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| return EnvFilter::new("doclinks=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
