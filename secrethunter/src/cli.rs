//! Command line interface definition using `clap`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "secrethunter",
    version,
    about = "Scan file systems for secrets such as API keys, credentials and private keys"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan file system for secrets using one of the scan methods. If no
    /// directories or files are provided, the file system root is scanned.
    #[command(subcommand)]
    Scan(ScanMethod),
}

#[derive(Debug, Subcommand)]
pub enum ScanMethod {
    /// Scan using regular-expression secret patterns.
    Pattern {
        /// File with regular expression patterns of secrets to scan for.
        /// Patterns can be found on https://github.com/mazen160/secrets-patterns-db
        #[arg(short, long)]
        patterns: Option<PathBuf>,

        /// Directories or files to scan.
        paths: Vec<String>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Scan for base64 encoded secrets.
    #[command(alias = "base")]
    #[command(alias = "64")]
    Base64 {
        /// Minimum token length considered for decoding.
        #[arg(short, long, default_value_t = 8)]
        length: usize,

        /// Directories or files to scan.
        paths: Vec<String>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Scan for high-entropy words resembling generated passwords.
    Entropy {
        /// Directories or files to scan.
        paths: Vec<String>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

/// Flags shared by every scan method.
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Output file for the generated report; printed to standard output
    /// otherwise.
    #[arg(short, long, default_value = "Stdout")]
    pub out: String,

    /// Comma separated list of regular expressions and/or files (with
    /// regular expressions) used to exclude files or directories during the
    /// scan.
    #[arg(short = 'x', long, default_value = "")]
    pub exclusions: String,

    /// Throttling value (from 10 to 80) capping the CPU usage of the
    /// system during the scan.
    #[arg(short, long, default_value_t = 65)]
    pub throttling: u8,

    /// Maximum number of vCPUs used by the tool.
    #[arg(short, long)]
    pub cpu: Option<usize>,

    /// Force execution, inhibiting throttling.
    #[arg(short, long)]
    pub force: bool,
}
