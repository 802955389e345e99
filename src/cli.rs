//! CLI definition and parsing.
//! Defines Args/Command and provides parse() for command-line handling.
//!
//! Notes:
//! - Global flags may appear before or after the subcommand.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};
use crate::fs_ops::TraversalOrder;

/// Portable filesystem helpers.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Portable filesystem helpers and a bounded directory-size walker")]
pub struct Args {
    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs and results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Print the config file location used by fsutils and exit.
    #[arg(long)]
    pub print_config: bool,

    /// Write a template config file at the default location and exit.
    #[arg(long)]
    pub init_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Total size in bytes of all files under a directory.
    Size {
        #[arg(value_hint = ValueHint::DirPath)]
        path: PathBuf,
        /// Levels to descend (root = 1, 0 = unlimited).
        #[arg(short = 'm', long)]
        max_depth: Option<u32>,
        /// Worklist order: lifo or fifo.
        #[arg(long)]
        order: Option<TraversalOrder>,
    },
    /// Does the path exist?
    Exists {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
    },
    /// Is the path a directory?
    IsDir {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
    },
    /// Is the path a regular file?
    IsFile {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
    },
    /// Is the owner read bit set?
    Readable {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
    },
    /// Is the owner write bit set?
    Writable {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
    },
    /// Are both owner read and write bits set?
    ReadWrite {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
    },
    /// Size in bytes of a regular file (0 otherwise).
    FileSize {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
    /// Join two segments with the platform separator.
    Join { left: PathBuf, right: PathBuf },
    /// Convert `/` separators to the platform separator.
    Native { path: String },
    /// Expand a leading `~` to the home directory.
    Expand { path: String },
    /// Print the current working directory.
    Cwd,
    /// Create one directory (absolute path on Unix).
    Mkdir {
        #[arg(value_hint = ValueHint::DirPath)]
        path: PathBuf,
    },
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
        if let Some(Command::Size {
            max_depth, order, ..
        }) = &self.command
        {
            if let Some(d) = max_depth {
                cfg.max_depth = *d;
            }
            if let Some(o) = order {
                cfg.order = *o;
            }
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
