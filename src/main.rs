mod assistant;
mod config;
mod controller;
mod document_model;
mod host;
mod logging;
mod view;

use anyhow::{Context, Result};
use clap::Parser;
use config::RcLoader;
use controller::EditorController;
use host::FsHostBridge;
use std::path::PathBuf;

/// Block de Notas IA: a plain text editor with a canned assistant panel.
#[derive(Parser, Debug)]
#[command(name = "notas-ia", version, about)]
struct Args {
    /// File to open at startup. A missing file is created on first save.
    file: Option<PathBuf>,

    /// Configuration file (overrides discovery of .notasrc)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where to write the log (default: notas-ia.log in the temp directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print a sample .notasrc and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", RcLoader::generate_sample_rc());
        return Ok(());
    }

    let log_path = args.log_file.clone().unwrap_or_else(logging::default_log_path);
    let _log_guard = logging::init(&log_path);

    let config = RcLoader::load_config(args.config.as_deref())
        .context("failed to load configuration")?;

    let mut controller = EditorController::new(FsHostBridge::new(), &config);
    controller.start(args.file);

    controller
        .run()
        .map_err(|err| anyhow::anyhow!("{err}"))
        .context("editor terminated with an error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["notas-ia", "nota.txt", "--config", "rc", "--log-file", "x.log"]);
        assert_eq!(args.file, Some(PathBuf::from("nota.txt")));
        assert_eq!(args.config, Some(PathBuf::from("rc")));
        assert_eq!(args.log_file, Some(PathBuf::from("x.log")));
        assert!(!args.print_config);
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["notas-ia"]);
        assert!(args.file.is_none());
        assert!(args.config.is_none());
    }
}
