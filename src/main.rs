//! Quire - A small emacs-flavoured terminal text editor.
//!
//! # Usage
//!
//! ```bash
//! quire notes.txt
//! quire --bind "C-c s=save-buffer" notes.txt
//! quire --log quire.log notes.txt
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use quire::app::App;
use quire::config::{
    ConfigFlags, apply_bindings, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use quire::input::default_key_map;

/// A small emacs-flavoured terminal text editor
#[derive(Parser, Debug)]
#[command(name = "quire", version, about, long_about = None)]
struct Cli {
    /// File to edit; created on first save if it does not exist
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Write debug events to a file
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,

    /// Add a key binding, e.g. "C-c s=save-buffer" (repeatable)
    #[arg(long, value_name = "SEQ=COMMAND")]
    bind: Vec<String>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

// The terminal belongs to the editor, so events only ever go to a file.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false);
    match path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let log_path = effective
        .log
        .clone()
        .or_else(|| std::env::var_os("QUIRE_LOG").map(PathBuf::from));
    init_logging(log_path.as_deref())?;
    tracing::debug!(?cli, bindings = effective.bindings.len(), "configuration loaded");

    let keys = apply_bindings(default_key_map(), &effective.bindings)
        .context("Invalid key binding")?;

    App::new(cli.file)
        .with_keys(keys)
        .run()
        .context("Application error")
}
