//! runbatch CLI - deploy configured computational runs
//!
//! Usage: runbatch [OPTIONS] <CONFIG>
//!
//! Reads a YAML configuration document describing a batch of runs and deploys
//! them, one at a time, to local or remote hosts.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

/// Deploy a batch of configured runs described by a YAML config file
#[derive(Parser, Debug)]
#[command(name = "runbatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file describing the runs
    config: PathBuf,

    /// Base path for resolving relative input and output paths
    #[arg(short, long, default_value = ".")]
    basepath: PathBuf,

    /// Subset of run ids to deploy, e.g. "1,5-6,7" (default: all)
    #[arg(short, long)]
    runs: Option<String>,

    /// What to do when a run's output directory already exists
    #[arg(long, value_parser = ["abort", "remove", "use"], default_value = "abort")]
    if_exists: String,

    /// Continue with the remaining runs when one fails
    #[arg(long)]
    ignore_fail: bool,

    /// Create directories and stage files without running any commands
    #[arg(long, alias = "test-run")]
    dry_run: bool,

    /// Logging level
    #[arg(long, value_parser = ["debug", "info", "exec", "warning", "error"], default_value = "info")]
    log_level: String,

    /// Emit NDJSON events instead of human-readable output
    #[arg(long)]
    json: bool,

    /// Skip interactive confirmation prompts
    #[arg(short = 'y', long)]
    yes: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    commands::deploy::cmd_deploy(
        &cli.config,
        &cli.basepath,
        cli.runs.as_deref(),
        &cli.if_exists,
        cli.ignore_fail,
        cli.dry_run,
        cli.yes,
        &cli.log_level,
        cli.json,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_config_path_only() {
        let cli = Cli::try_parse_from(["runbatch", "config.yaml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config.yaml"));
        assert_eq!(cli.basepath, PathBuf::from("."));
        assert_eq!(cli.if_exists, "abort");
        assert!(!cli.ignore_fail);
        assert!(!cli.dry_run);
        assert!(!cli.yes);
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn parses_full_option_set() {
        let cli = Cli::try_parse_from([
            "runbatch",
            "config.yaml",
            "--basepath",
            "/work",
            "--runs",
            "1,5-6,7",
            "--if-exists",
            "remove",
            "--ignore-fail",
            "--dry-run",
            "--log-level",
            "exec",
            "--yes",
        ])
        .unwrap();

        assert_eq!(cli.basepath, PathBuf::from("/work"));
        assert_eq!(cli.runs.as_deref(), Some("1,5-6,7"));
        assert_eq!(cli.if_exists, "remove");
        assert!(cli.ignore_fail);
        assert!(cli.dry_run);
        assert!(cli.yes);
        assert_eq!(cli.log_level, "exec");
    }

    #[test]
    fn test_run_is_an_alias_for_dry_run() {
        let cli = Cli::try_parse_from(["runbatch", "config.yaml", "--test-run"]).unwrap();
        assert!(cli.dry_run);
    }

    #[test]
    fn rejects_unknown_if_exists_value() {
        assert!(Cli::try_parse_from(["runbatch", "config.yaml", "--if-exists", "explode"])
            .is_err());
    }

    #[test]
    fn config_argument_is_required() {
        assert!(Cli::try_parse_from(["runbatch"]).is_err());
    }
}
