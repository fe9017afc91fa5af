//! Command-line configuration and logging set-up.

use std::{fs::File, path::PathBuf, time::Duration};

use clap::Parser;
use color_eyre::eyre::Result;
use env_logger::{Builder, Target};
use log::LevelFilter;

use crate::{
    animation::{Timing, MAZE_DELAY_MS, PATH_DELAY_MS, VISIT_DELAY_MS},
    grid::Position,
};

/// Default number of grid rows.
pub const DEFAULT_ROWS: usize = 20;

/// Default number of grid columns.
pub const DEFAULT_COLS: usize = 50;

/// Default start position, as accepted by `--start`.
pub const DEFAULT_START: &str = "2,3";

/// Default finish position, as accepted by `--finish`.
pub const DEFAULT_FINISH: &str = "10,20";

/// Session configuration.
///
/// This structure holds every setting the application reads at start-up. It is parsed from the
/// command line; every field has a default matching the reference board.
#[derive(Clone, Debug, Parser, PartialEq, Eq)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Number of grid rows.
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// Number of grid columns.
    #[arg(long, default_value_t = DEFAULT_COLS)]
    pub cols: usize,

    /// Start position, as `row,col`.
    #[arg(long, default_value = DEFAULT_START)]
    pub start: Position,

    /// Finish position, as `row,col`.
    #[arg(long, default_value = DEFAULT_FINISH)]
    pub finish: Position,

    /// Seed for maze generation and endpoint respawns. Random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Delay between search visit steps, in milliseconds.
    #[arg(long, default_value_t = VISIT_DELAY_MS)]
    pub visit_delay_ms: u64,

    /// Delay between shortest-path reveal steps, in milliseconds.
    #[arg(long, default_value_t = PATH_DELAY_MS)]
    pub path_delay_ms: u64,

    /// Delay between maze wall steps, in milliseconds.
    #[arg(long, default_value_t = MAZE_DELAY_MS)]
    pub maze_delay_ms: u64,

    /// File to write logs to. Logging is off when omitted, since the terminal belongs to the UI.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            start: Position::new(2, 3),
            finish: Position::new(10, 20),
            seed: None,
            visit_delay_ms: VISIT_DELAY_MS,
            path_delay_ms: PATH_DELAY_MS,
            maze_delay_ms: MAZE_DELAY_MS,
            log_file: None,
        }
    }
}

impl Config {
    /// Returns the animation delays configured for the session.
    #[must_use]
    pub const fn timing(&self) -> Timing {
        Timing {
            visit: Duration::from_millis(self.visit_delay_ms),
            path: Duration::from_millis(self.path_delay_ms),
            maze: Duration::from_millis(self.maze_delay_ms),
        }
    }

    /// Installs the file logger when a log file was requested.
    ///
    /// The level defaults to `info` and can be overridden through `RUST_LOG`.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`] if the log file cannot be created.
    /// - [`log::SetLoggerError`] if a logger was already installed.
    pub fn init_logging(&self) -> Result<()> {
        let Some(path) = &self.log_file else {
            return Ok(());
        };

        let file = File::create(path)?;
        Builder::new()
            .filter_level(LevelFilter::Info)
            .parse_default_env()
            .target(Target::Pipe(Box::new(file)))
            .try_init()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_board() {
        let config = Config::parse_from(["pathgrid"]);

        assert_eq!(config, Config::default());
        assert_eq!(config.timing(), Timing::default());
    }

    #[test]
    fn test_parse_overrides() {
        let config = Config::parse_from([
            "pathgrid",
            "--rows",
            "8",
            "--cols",
            "9",
            "--start",
            "0,0",
            "--finish",
            "7,8",
            "--seed",
            "42",
            "--path-delay-ms",
            "5",
        ]);

        assert_eq!(config.rows, 8);
        assert_eq!(config.cols, 9);
        assert_eq!(config.start, Position::new(0, 0));
        assert_eq!(config.finish, Position::new(7, 8));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.timing().path, Duration::from_millis(5));
    }

    #[test]
    fn test_malformed_position_is_rejected() {
        let result = Config::try_parse_from(["pathgrid", "--start", "two,three"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_logging_without_file_is_a_no_op() {
        assert!(Config::default().init_logging().is_ok());
    }
}
