mod cmd;
mod output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use modulex_core::config::Config;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "modulex",
    about = "Annotation-driven guidance dispatcher: accepts annotations and frames, streams instructions to a signaling endpoint",
    version,
    propagate_version = true
)]
struct Cli {
    /// Storage root holding images/, videos/ and modulex.yaml (default: cwd)
    #[arg(long, global = true, env = "MODULEX_ROOT")]
    root: Option<PathBuf>,

    /// Base URL of the signaling endpoint (overrides modulex.yaml)
    #[arg(long, global = true, env = "MODULEX_SIGNALING_URL")]
    signaling_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "5000")]
        port: u16,
    },

    /// Send a single instruction to the signaling endpoint
    Notify {
        /// Instruction text
        text: String,
    },

    /// Show the effective configuration
    Config {
        /// Output as JSON
        #[arg(long, short = 'j')]
        json: bool,
    },
}

fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn load_config(root: &Path, signaling_url: Option<String>) -> anyhow::Result<Config> {
    Config::load(root)
        .and_then(|cfg| cfg.with_signaling_url(signaling_url))
        .with_context(|| format!("failed to load configuration from {}", root.display()))
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } | Commands::Notify { .. } => tracing::Level::INFO,
        Commands::Config { .. } => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root = resolve_root(cli.root.as_deref());

    let result = load_config(&root, cli.signaling_url).and_then(|config| match cli.command {
        Commands::Serve { host, port } => cmd::serve::run(config, &host, port),
        Commands::Notify { text } => cmd::notify::run(&config, &text),
        Commands::Config { json } => cmd::config::run(&config, json),
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
