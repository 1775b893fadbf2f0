//! Namegraph CLI - Resolve identifier manifests from the command line

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "namegraph")]
#[command(version)]
#[command(about = "Collision-free, dependency-ordered identifier assignment")]
#[command(long_about = r#"
Namegraph reads a manifest of namespaces and the entities inside them, then
assigns every entity a name that:
  • respects the names it depends on
  • never collides inside its namespace
  • avoids everything its forbidden namespaces hold

Example usage:
  namegraph resolve names.toml
  namegraph resolve names.json --format json --strict
  namegraph check names.toml
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Text
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Assign names to every entity in a manifest
    Resolve {
        /// Manifest file (.toml or .json)
        manifest: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputMode,

        /// Fail when some entities cannot be named
        #[arg(long)]
        strict: bool,

        /// Only avoid names held by forbidden namespaces
        #[arg(long)]
        no_guard: bool,

        /// Filler character of the default naming function
        #[arg(long)]
        filler: Option<char>,

        /// Path to the config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate a manifest without resolving it
    Check {
        /// Manifest file (.toml or .json)
        manifest: PathBuf,
    },

    /// Write a default namegraph.toml
    Init {
        /// Where to write the config
        #[arg(short, long, default_value = "namegraph.toml")]
        path: PathBuf,

        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Resolve {
            manifest,
            format,
            strict,
            no_guard,
            filler,
            config,
        } => {
            let config = namegraph::config::load_config(config.as_deref())?.unwrap_or_default();
            let mut options = config.resolve_options();
            if no_guard {
                options.guard_own_namespace = false;
            }
            let settings = commands::ResolveSettings {
                options,
                filler: filler.unwrap_or_else(|| config.filler()),
                strict: strict || config.strict(),
            };
            commands::run_resolve(&manifest, &settings, format)
        }
        Commands::Check { manifest } => commands::run_check(&manifest),
        Commands::Init { path, force } => commands::run_init(&path, force),
    }
}
