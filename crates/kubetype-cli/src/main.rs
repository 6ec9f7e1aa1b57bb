//! Kubetype CLI - type Kubernetes manifests against a schema registry

use clap::{Parser, Subcommand};
use kubetype_core::Codec;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod display;
mod error;
mod exit_codes;

use config::Config;
use error::Result;

#[derive(Parser)]
#[command(name = "kubetype")]
#[command(author = "Kubetype Contributors")]
#[command(version)]
#[command(about = "Type Kubernetes manifests against a schema registry", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Configuration file (default: ~/.config/kubetype/config.yaml)
    #[arg(long, global = true, env = "KUBETYPE_CONFIG")]
    config: Option<PathBuf>,

    /// Schema catalog file (YAML or JSON), overrides the configured one
    #[arg(long, global = true, env = "KUBETYPE_REGISTRY")]
    registry: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert manifests to their typed form and emit them again
    Convert {
        /// Manifest file, or `-` for standard input
        #[arg(default_value = "-")]
        file: PathBuf,

        /// Output format: yaml, json or json-pretty
        #[arg(short, long)]
        output: Option<Codec>,
    },

    /// Show the registered type name for an apiVersion and kind
    Resolve {
        /// Manifest apiVersion (e.g. apps/v1)
        api_version: String,

        /// Manifest kind (case-insensitive)
        kind: String,
    },

    /// List the kinds known to the registry
    Kinds,

    /// Check that every document of the given files converts
    Validate {
        /// Manifest files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output validation results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let registry = commands::load_registry(cli.registry.as_deref(), &config)?;

    let codec = match &cli.command {
        Commands::Convert { output, .. } => *output,
        _ => None,
    };
    let converter = commands::manifest_converter(registry, &config, codec);

    match cli.command {
        Commands::Convert { file, .. } => commands::convert::run(&converter, &file),

        Commands::Resolve { api_version, kind } => {
            commands::resolve::run(&converter, &api_version, &kind)
        }

        Commands::Kinds => commands::kinds::run(&converter),

        Commands::Validate { files, json } => commands::validate::run(&converter, &files, json),
    }
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let code = match run(cli) {
        Ok(()) => exit_codes::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };
    std::process::exit(code);
}
