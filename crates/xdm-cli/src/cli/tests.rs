use super::*;
use std::path::Path;

fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn cli_parse_sync() {
    match parse(&["xdm", "sync", "--config", "deps/xdm.toml"]) {
        CliCommand::Sync { config, jobs } => {
            assert_eq!(config, Path::new("deps/xdm.toml"));
            assert_eq!(jobs, None);
        }
        _ => panic!("expected Sync"),
    }
}

#[test]
fn cli_parse_sync_jobs() {
    match parse(&["xdm", "sync", "-c", "xdm.toml", "--jobs", "0"]) {
        CliCommand::Sync { jobs, .. } => assert_eq!(jobs, Some(0)),
        _ => panic!("expected Sync with jobs"),
    }
}

#[test]
fn cli_parse_config_aliases() {
    for flag in ["--cnfg", "--configuration-path"] {
        match parse(&["xdm", "sync", flag, "a.toml"]) {
            CliCommand::Sync { config, .. } => assert_eq!(config, Path::new("a.toml")),
            _ => panic!("expected Sync via {}", flag),
        }
    }
}

#[test]
fn cli_parse_list() {
    match parse(&["xdm", "list", "--config", "xdm.toml"]) {
        CliCommand::List { config } => assert_eq!(config, Path::new("xdm.toml")),
        _ => panic!("expected List"),
    }
}

#[test]
fn cli_requires_config() {
    assert!(Cli::try_parse_from(["xdm", "sync"]).is_err());
    assert!(Cli::try_parse_from(["xdm", "list"]).is_err());
}
