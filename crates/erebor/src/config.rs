//! Runtime settings for the command-line front end

use std::path::{Path, PathBuf};

/// Environment variable naming the snapshot file.
pub const STATE_ENV: &str = "EREBOR_STATE";

/// Environment variable naming the shell history file.
pub const HISTORY_ENV: &str = "EREBOR_HISTORY";

/// Default shell history file, relative to the working directory.
pub const DEFAULT_HISTORY_FILE: &str = ".erebor_history";

/// Resolved settings for a run.
///
/// Built from command-line flags and environment variables by the binary;
/// tests construct it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Snapshot loaded at startup (if it exists) and saved on exit
    pub state_path: Option<PathBuf>,

    /// Where the interactive shell keeps its line history
    pub history_path: PathBuf,

    /// Continue a script after a failing line
    pub keep_going: bool,

    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            state_path: None,
            history_path: PathBuf::from(DEFAULT_HISTORY_FILE),
            keep_going: false,
            log_filter: log_filter_for(0).to_string(),
        }
    }
}

impl Settings {
    /// Create settings with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a snapshot file.
    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = Some(path.into());
        self
    }

    /// Use a different history file.
    pub fn with_history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = path.into();
        self
    }

    /// Keep running scripts past failing lines.
    pub fn with_keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// Pick the log filter from a `-v` count.
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.log_filter = log_filter_for(verbosity).to_string();
        self
    }

    /// The snapshot file, if one is configured.
    pub fn state_path(&self) -> Option<&Path> {
        self.state_path.as_deref()
    }
}

/// Map a `-v` count to a filter directive.
pub fn log_filter_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "erebor=info,warn",
        2 => "erebor=debug,info",
        _ => "trace",
    }
}
