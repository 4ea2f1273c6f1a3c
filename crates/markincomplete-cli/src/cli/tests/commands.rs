//! Tests for config, set-extension and replay parsing.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::Path;

#[test]
fn cli_parse_config() {
    match parse(&["markincomplete", "config"]) {
        CliCommand::Config => {}
        _ => panic!("expected Config"),
    }
}

#[test]
fn cli_parse_set_extension() {
    match parse(&["markincomplete", "set-extension", "part"]) {
        CliCommand::SetExtension { extension } => assert_eq!(extension, "part"),
        _ => panic!("expected SetExtension"),
    }
}

#[test]
fn cli_parse_set_extension_requires_value() {
    assert!(Cli::try_parse_from(["markincomplete", "set-extension"]).is_err());
}

#[test]
fn cli_parse_replay() {
    match parse(&["markincomplete", "replay", "session.toml"]) {
        CliCommand::Replay { path, extension } => {
            assert_eq!(path, Path::new("session.toml"));
            assert!(extension.is_none());
        }
        _ => panic!("expected Replay"),
    }
}

#[test]
fn cli_parse_replay_with_extension_override() {
    match parse(&["markincomplete", "replay", "s.toml", "--extension", "dl"]) {
        CliCommand::Replay { extension, .. } => assert_eq!(extension.as_deref(), Some("dl")),
        _ => panic!("expected Replay"),
    }
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["markincomplete", "bench"]).is_err());
}
