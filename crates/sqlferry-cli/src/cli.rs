use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sqlferry",
    about = "Shared database snapshots over versioned blob storage",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Storage root for the file-backed stores (defaults to $SQLFERRY_ROOT,
    /// then ".sqlferry")
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the current version record and history summary
    Status(StatusArgs),
    /// List blob versions, newest first
    Versions(VersionsArgs),
    /// Run the retention sweep for the configured domain
    Sweep(SweepArgs),
    /// Delete the domain's version records (full reset)
    Reset(ResetArgs),
}

#[derive(Args)]
pub struct StatusArgs {}

#[derive(Args)]
pub struct VersionsArgs {
    /// Show at most this many versions
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}

#[derive(Args)]
pub struct SweepArgs {
    /// Override the configured retention count
    #[arg(long)]
    pub keep: Option<usize>,
}

#[derive(Args)]
pub struct ResetArgs {
    /// Actually perform the reset
    #[arg(long)]
    pub yes: bool,
}
