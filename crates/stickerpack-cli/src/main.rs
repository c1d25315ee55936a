mod commands;

use clap::{Args, Parser, Subcommand};
use commands::{Failure, EXIT_FAILURE};
use stickerpack_core::{Loader, LoaderConfig, PackSource};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const DEFAULT_STORE: &str = "~/.local/share/stickerpack";

#[derive(Debug, Parser)]
#[command(
    name = "stickerpack",
    version,
    about = "Validate, import, and load sticker packs"
)]
struct Cli {
    /// Path to the loader config file (default: ~/.config/stickerpack/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct StoreArg {
    /// Pack store directory (default: config `store`, then ~/.local/share/stickerpack).
    #[arg(long)]
    store: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse and validate a JSON manifest.
    Check {
        /// Path to the manifest file.
        #[arg(default_value = "contents.json")]
        manifest: PathBuf,
    },
    /// Load every pack from a store, resolving asset sizes.
    Load {
        #[command(flatten)]
        store: StoreArg,
    },
    /// Import the packs of a manifest and their assets into a store.
    Import {
        /// Path to the manifest file.
        manifest: PathBuf,
        /// Directory holding the sticker and tray image files.
        #[arg(long)]
        assets: PathBuf,
        #[command(flatten)]
        store: StoreArg,
    },
    /// List the packs in a store without reading assets.
    List {
        #[command(flatten)]
        store: StoreArg,
    },
    /// Show one pack in detail.
    Inspect {
        /// Pack identifier.
        identifier: String,
        /// Read the pack from this manifest.
        #[arg(long, conflicts_with = "store", required_unless_present = "store")]
        manifest: Option<PathBuf>,
        /// Read the pack from this store directory.
        #[arg(long)]
        store: Option<String>,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("STICKERPACK_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("error: {msg}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    let loader = Loader::from_config(&config);
    let json_output = cli.json;
    let store_path = |arg: Option<String>| resolve_store(arg.as_deref(), &config);

    let result = match cli.command {
        Commands::Check { manifest } => commands::check::run(&loader, &manifest, json_output),
        Commands::Load { store } => {
            commands::load::run(&loader, &store_path(store.store), json_output)
        }
        Commands::Import {
            manifest,
            assets,
            store,
        } => commands::import::run(
            &loader,
            &manifest,
            &assets,
            &store_path(store.store),
            json_output,
        ),
        Commands::List { store } => commands::list::run(&store_path(store.store), json_output),
        Commands::Inspect {
            identifier,
            manifest,
            store,
        } => {
            let source = match manifest {
                Some(path) => PackSource::Manifest(path),
                None => PackSource::Store(store_path(store)),
            };
            commands::inspect::run(&loader, &identifier, &source, json_output)
        }
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(Failure { code, message }) => {
            eprintln!("error: {message}");
            ExitCode::from(code)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<LoaderConfig, String> {
    let config = match path {
        Some(p) => LoaderConfig::load(&expand_tilde(&p.to_string_lossy())),
        None => LoaderConfig::load_default(),
    };
    config.map_err(|e| format!("config error: {e}"))
}

fn resolve_store(arg: Option<&str>, config: &LoaderConfig) -> PathBuf {
    match (arg, &config.store) {
        (Some(s), _) => expand_tilde(s),
        (None, Some(p)) => expand_tilde(&p.to_string_lossy()),
        (None, None) => expand_tilde(DEFAULT_STORE),
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(stripped);
        }
    }
    PathBuf::from(path)
}
