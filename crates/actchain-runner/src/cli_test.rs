use super::{Cli, Commands, OutputFormat};
use clap::{CommandFactory, Parser};
use std::path::Path;

#[test]
fn cli_help_includes_required_top_level_commands() {
    let mut command = Cli::command();
    let help = command.render_long_help().to_string();
    assert!(help.contains("export"));
    assert!(help.contains("groups"));
    assert!(help.contains("check"));
}

#[test]
fn cli_parses_export_with_out_path() {
    let cli = Cli::try_parse_from([
        "actchain",
        "export",
        "--manifest",
        "actions.yaml",
        "--out",
        "chain.schema.json",
        "--format",
        "json",
    ])
    .expect("export must parse");
    match cli.command {
        Commands::Export(command) => {
            assert_eq!(command.manifest.as_deref(), Some(Path::new("actions.yaml")));
            assert_eq!(command.out.as_deref(), Some(Path::new("chain.schema.json")));
            assert_eq!(command.format, OutputFormat::Json);
            assert!(command.config.is_none());
        }
        _ => panic!("expected export"),
    }
}

#[test]
fn cli_parses_check_in_interchange_mode() {
    let cli = Cli::try_parse_from([
        "actchain",
        "check",
        "--manifest",
        "actions.yaml",
        "--invocation",
        "tree.json",
        "--interchange",
        "--verbose",
    ])
    .expect("check must parse");
    assert!(cli.verbose);
    match cli.command {
        Commands::Check(command) => {
            assert!(command.interchange);
            assert_eq!(command.invocation, Path::new("tree.json"));
            assert_eq!(command.format, OutputFormat::Text);
        }
        _ => panic!("expected check"),
    }
}

#[test]
fn cli_check_requires_invocation() {
    let result = Cli::try_parse_from(["actchain", "check", "--manifest", "actions.yaml"]);
    assert!(result.is_err());
}

#[test]
fn cli_groups_accepts_config_only() {
    let cli = Cli::try_parse_from(["actchain", "groups", "--config", "runner.yaml"])
        .expect("groups must parse");
    match cli.command {
        Commands::Groups(command) => {
            assert!(command.manifest.is_none());
            assert_eq!(command.config.as_deref(), Some(Path::new("runner.yaml")));
        }
        _ => panic!("expected groups"),
    }
}
