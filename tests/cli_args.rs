use clap::Parser;
use fsutils::cli::{Args, Command};
use fsutils::{Config, LogLevel, TraversalOrder};
use std::path::PathBuf;

#[test]
fn effective_log_level_precedence() {
    let args = Args::parse_from(["fsutils", "--debug", "--log-level", "quiet", "cwd"]);
    assert_eq!(args.effective_log_level(), Some(LogLevel::Debug));

    let args = Args::parse_from(["fsutils", "cwd", "--log-level", "info"]);
    assert_eq!(args.effective_log_level(), Some(LogLevel::Info));
}

#[test]
fn size_flags_override_config() {
    let args = Args::parse_from([
        "fsutils", "size", "/data", "--max-depth", "3", "--order", "fifo", "--log-file", "/tmp/x.log",
    ]);
    assert_eq!(
        args.command,
        Some(Command::Size {
            path: PathBuf::from("/data"),
            max_depth: Some(3),
            order: Some(TraversalOrder::Fifo),
        })
    );
    let mut cfg = Config {
        max_depth: 9,
        ..Config::default()
    };
    args.apply_overrides(&mut cfg);
    assert_eq!(cfg.max_depth, 3);
    assert_eq!(cfg.order, TraversalOrder::Fifo);
    assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/x.log")));
}

#[test]
fn unset_flags_keep_config() {
    let args = Args::parse_from(["fsutils", "size", "/data"]);
    let mut cfg = Config {
        max_depth: 4,
        order: TraversalOrder::Fifo,
        log_level: LogLevel::Quiet,
        log_file: None,
    };
    let before = cfg.clone();
    args.apply_overrides(&mut cfg);
    assert_eq!(cfg, before);
}

#[test]
fn bad_order_is_rejected() {
    assert!(Args::try_parse_from(["fsutils", "size", "/data", "--order", "random"]).is_err());
}
