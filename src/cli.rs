//! Command-line interface for the reward importer
//!
//! The importer is normally invoked without arguments; the flags only move
//! the config file and the reward files away from the working directory.

use std::path::PathBuf;

use clap::Parser;

use crate::helpers::CONFIG_NAME;

/// Kraken staking rewards importer
#[derive(Parser, Debug)]
#[command(name = "kraken-import")]
#[command(about = "Imports staking reward CSV exports into PostgreSQL", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path of the configuration file
    #[arg(long, default_value = CONFIG_NAME)]
    pub config: PathBuf,

    /// Directory containing the staking_rewards_<CURRENCY>.csv files
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_arguments() {
        let cli = Cli::try_parse_from(["kraken-import"]).unwrap();

        assert_eq!(cli.config, PathBuf::from("krakenimport.conf"));
        assert_eq!(cli.dir, PathBuf::from("."));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "kraken-import",
            "--config",
            "/etc/kraken/import.conf",
            "--dir",
            "/var/lib/kraken",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("/etc/kraken/import.conf"));
        assert_eq!(cli.dir, PathBuf::from("/var/lib/kraken"));
        assert!(cli.verbose);
    }

    #[test]
    fn test_rejects_positional_arguments() {
        assert!(Cli::try_parse_from(["kraken-import", "BTC"]).is_err());
    }
}
