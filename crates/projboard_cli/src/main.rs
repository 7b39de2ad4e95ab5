//! Terminal front end for the project board.
//!
//! # Responsibility
//! - Resolve configuration from an optional JSON file and command-line overrides.
//! - Start file logging when a log directory is configured.
//! - Mount the board and drive it from stdin.

mod app;
mod command;
mod view;

use app::Session;
use clap::Parser;
use log::info;
use projboard_core::{core_version, init_logging, BoardConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "projboard", version, about = "Drag-and-drop project board in the terminal")]
struct Cli {
    /// JSON config file with form rules and logging settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the configured log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Overrides the configured log directory; must be absolute.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn resolve_config(cli: &Cli) -> Result<BoardConfig, String> {
    let mut config = match &cli.config {
        Some(path) => BoardConfig::load(path).map_err(|err| err.to_string())?,
        None => BoardConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("projboard: {message}");
            return ExitCode::from(2);
        }
    };

    if let Some(dir) = &config.log_dir {
        if let Err(message) = init_logging(&config.log_level, &dir.to_string_lossy()) {
            eprintln!("projboard: {message}");
            return ExitCode::FAILURE;
        }
    }

    let session = match Session::mount(&config) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("projboard: failed to mount board: {err}");
            return ExitCode::FAILURE;
        }
    };
    info!("event=cli_start module=cli status=ok version={}", core_version());

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    match session.run(stdin.lock(), &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("projboard: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_config, Cli};
    use clap::Parser;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from(["projboard", "--log-level", "warn", "--log-dir", "/tmp/pb"]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir.unwrap().to_str(), Some("/tmp/pb"));
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let cli = Cli::parse_from(["projboard", "--log-dir", "logs"]);
        assert!(resolve_config(&cli).unwrap_err().contains("absolute"));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let cli = Cli::parse_from(["projboard", "--config", "/nonexistent/projboard.json"]);
        assert!(resolve_config(&cli)
            .unwrap_err()
            .contains("failed to read config"));
    }
}
