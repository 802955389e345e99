//! Application orchestrator.
//! Loads/merges config, initializes logging, and dispatches the subcommand.
//!
//! Exit status: `Ok(true)` maps to success. Predicates (`exists`, `is-dir`, ...) return
//! their answer; `size` returns false when the walk was truncated.

use anyhow::{bail, Context, Result};
use serde_json::json;
use std::path::Path;
use tracing::{debug, error, info};

use fsutils::cli::{Args, Command};
use fsutils::config::{create_template_config, default_config_path, load_config};
use fsutils::output as out;
use fsutils::{
    exists, expand_user, get_cwd, get_file_size, is_directory, is_file, is_readable,
    is_readable_and_writable, is_writable, join_path, mkdir, to_native_path, walk_directory_size,
    Config, SystemAllocator,
};

use crate::logging::init_tracing;

/// Run the CLI application. Returns whether the process should exit successfully.
pub fn run(args: Args) -> Result<bool> {
    // Handled before logging init so nothing else is printed.
    if args.print_config {
        match default_config_path() {
            Some(p) => {
                out::print_user(&p.display().to_string());
                if !p.exists() {
                    out::print_info("No config file exists there yet; run with --init-config to create one.");
                }
            }
            None => out::print_error("Could not determine a default config path"),
        }
        return Ok(true);
    }
    if args.init_config {
        let Some(p) = default_config_path() else {
            bail!("Could not determine a default config path");
        };
        if p.exists() {
            out::print_warn(&format!("Config already exists: {}", p.display()));
            return Ok(true);
        }
        create_template_config(&p)?;
        out::print_success(&format!("Template config written to {}", p.display()));
        return Ok(true);
    }

    let mut cfg = load_config()?;
    args.apply_overrides(&mut cfg);

    let _guard = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;
    debug!(?args, ?cfg, "Starting fsutils");

    let Some(command) = args.command.as_ref() else {
        bail!("No command given; see --help");
    };
    dispatch(command, &cfg, args.json)
}

fn print_bool(answer: bool, json: bool) -> bool {
    if json {
        out::print_user(&json!({ "result": answer }).to_string());
    } else {
        out::print_user(if answer { "true" } else { "false" });
    }
    answer
}

fn print_path(p: &Path, json: bool) {
    if json {
        out::print_user(&json!({ "path": p.to_string_lossy() }).to_string());
    } else {
        out::print_user(&p.display().to_string());
    }
}

fn dispatch(command: &Command, cfg: &Config, json: bool) -> Result<bool> {
    match command {
        Command::Size { path, .. } => Ok(run_size(path, cfg, json)),
        Command::Exists { path } => Ok(print_bool(exists(path), json)),
        Command::IsDir { path } => Ok(print_bool(is_directory(path), json)),
        Command::IsFile { path } => Ok(print_bool(is_file(path), json)),
        Command::Readable { path } => Ok(print_bool(is_readable(path), json)),
        Command::Writable { path } => Ok(print_bool(is_writable(path), json)),
        Command::ReadWrite { path } => Ok(print_bool(is_readable_and_writable(path), json)),
        Command::FileSize { path } => {
            let size = get_file_size(path);
            if json {
                out::print_user(&json!({ "path": path.to_string_lossy(), "size": size }).to_string());
            } else {
                out::print_user(&size.to_string());
            }
            Ok(is_file(path))
        }
        Command::Join { left, right } => {
            print_path(&join_path(left, right), json);
            Ok(true)
        }
        Command::Native { path } => {
            print_path(Path::new(&to_native_path(path)), json);
            Ok(true)
        }
        Command::Expand { path } => {
            let expanded = expand_user(path).context("Could not determine the home directory")?;
            print_path(&expanded, json);
            Ok(true)
        }
        Command::Cwd => {
            let cwd = get_cwd().context("Failed to read the current directory")?;
            print_path(&cwd, json);
            Ok(true)
        }
        Command::Mkdir { path } => {
            mkdir(path).with_context(|| format!("Failed to create directory '{}'", path.display()))?;
            info!(path = %path.display(), "Directory ready");
            Ok(true)
        }
    }
}

fn run_size(path: &Path, cfg: &Config, json: bool) -> bool {
    let report = walk_directory_size(path, cfg.max_depth, cfg.order, &SystemAllocator);
    if let Some(e) = &report.error {
        error!(code = e.code(), kind = e.kind(), path = %path.display(), "Size walk incomplete");
    }
    if json {
        out::print_user(
            &json!({
                "path": path.to_string_lossy(),
                "total": report.total,
                "files": report.files,
                "directories": report.directories,
                "completed": report.completed,
                "max_depth": cfg.max_depth,
                "order": cfg.order.to_string(),
            })
            .to_string(),
        );
    } else {
        out::print_user(&report.total.to_string());
    }
    report.completed
}
