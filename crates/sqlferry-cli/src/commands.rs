use std::path::PathBuf;

use colored::Colorize;
use sqlferry_blob::{BlobStore, FsBlobStore};
use sqlferry_janitor::run_scheduled_sweep;
use sqlferry_sync::SyncConfig;
use sqlferry_version::{FsVersionStore, VersionStore};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = SyncConfig::from_env()?;
    let root = cli
        .root
        .or_else(|| std::env::var_os("SQLFERRY_ROOT").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(".sqlferry"));
    let versions = FsVersionStore::open(root.join("versions"))?;
    let blobs = FsBlobStore::open(root.join("blobs"))?;

    match cli.command {
        Command::Status(_) => cmd_status(&config, &versions, &blobs),
        Command::Versions(args) => cmd_versions(&config, &versions, &blobs, args),
        Command::Sweep(args) => cmd_sweep(&config, &versions, &blobs, args),
        Command::Reset(args) => cmd_reset(&config, &versions, args),
    }
}

fn cmd_status(
    config: &SyncConfig,
    versions: &FsVersionStore,
    blobs: &FsBlobStore,
) -> anyhow::Result<()> {
    println!("Domain: {}", config.domain.to_string().yellow().bold());
    match versions.latest(&config.domain)? {
        Some(record) => {
            println!("Version: {}", record.version.to_string().bold());
            println!("Content: {}", record.content_id.to_string().cyan());
            println!("Path: {}", record.path);
        }
        None => println!("Version: {} (no record)", "0".bold()),
    }
    let history = blobs.list_versions(&config.blob_key)?;
    println!(
        "History: {} blob version(s) under {}",
        history.len().to_string().bold(),
        config.blob_key,
    );
    Ok(())
}

fn cmd_versions(
    config: &SyncConfig,
    versions: &FsVersionStore,
    blobs: &FsBlobStore,
    args: VersionsArgs,
) -> anyhow::Result<()> {
    let current = versions
        .latest(&config.domain)?
        .map(|record| record.content_id);
    let history = blobs.list_versions(&config.blob_key)?;
    if history.is_empty() {
        println!("No versions.");
        return Ok(());
    }
    for version in history.iter().take(args.limit) {
        let mut markers = Vec::new();
        if version.is_latest {
            markers.push("latest".green().to_string());
        }
        if Some(&version.id) == current.as_ref() {
            markers.push("current".yellow().to_string());
        }
        let markers = if markers.is_empty() {
            String::new()
        } else {
            format!(" ({})", markers.join(", "))
        };
        println!(
            "{}  {:>10}  {}{}",
            version.created_at.format("%Y-%m-%d %H:%M:%S"),
            version.size,
            version.id.to_string().cyan(),
            markers,
        );
    }
    if history.len() > args.limit {
        println!("... and {} more", history.len() - args.limit);
    }
    Ok(())
}

fn cmd_sweep(
    config: &SyncConfig,
    versions: &FsVersionStore,
    blobs: &FsBlobStore,
    args: SweepArgs,
) -> anyhow::Result<()> {
    let mut retention = config.retention.clone();
    if let Some(keep) = args.keep {
        retention.keep = keep;
    }
    let report = run_scheduled_sweep(versions, blobs, &config.domain, &config.blob_key, &retention)?;
    println!(
        "{} Sweep: examined {}, retained {}, deleted {}.",
        "✓".green(),
        report.examined.to_string().bold(),
        report.retained.to_string().bold(),
        report.deleted.len().to_string().bold(),
    );
    Ok(())
}

fn cmd_reset(
    config: &SyncConfig,
    versions: &FsVersionStore,
    args: ResetArgs,
) -> anyhow::Result<()> {
    if !args.yes {
        println!(
            "{} Would delete all version records for {}. Re-run with --yes to confirm.",
            "!".yellow().bold(),
            config.domain.to_string().yellow(),
        );
        return Ok(());
    }
    let removed = versions.clear(&config.domain)?;
    println!(
        "{} Removed {} version record(s) for {}.",
        "✓".green(),
        removed.to_string().bold(),
        config.domain.to_string().yellow(),
    );
    Ok(())
}
