//! Artifact Bootstrap CLI
//!
//! Runs the update sequence outside of a host process: useful for seeding an
//! install directory, checking what a host will load on its next start, and
//! verifying artifacts by hand.

use anyhow::{bail, Context, Result};
use artifact_bootstrap::engine::{
    activation::SearchPathHost,
    cli::{Cli, Commands, OutputFormat},
    config::{Channel, Settings},
    updater::{verify, ManifestSource, RemoteManifest},
    Bootstrapper,
};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    artifact_bootstrap::engine::logging::init_logging(cli.verbose);

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    let bootstrapper = Bootstrapper::new(cli.bootstrap_config());
    let json = cli.format == OutputFormat::Json;

    match cli.command {
        Commands::Ensure { offline, channel } => cmd_ensure(&bootstrapper, offline, channel, json),
        Commands::Status => cmd_status(&bootstrapper, json),
        Commands::Digest { file } => cmd_digest(&file, json),
        Commands::Manifest { channel } => cmd_manifest(&bootstrapper, channel, json),
    }
}

fn effective_settings(bootstrapper: &Bootstrapper, offline: bool, channel: Option<Channel>) -> Settings {
    let mut settings = bootstrapper.settings();
    if offline {
        settings = settings.offline();
    }
    if let Some(channel) = channel {
        settings = settings.with_channel(channel);
    }
    settings
}

fn cmd_ensure(
    bootstrapper: &Bootstrapper,
    offline: bool,
    channel: Option<Channel>,
    json: bool,
) -> Result<()> {
    let settings = effective_settings(bootstrapper, offline, channel);
    let mut host = SearchPathHost::new();

    let report = bootstrapper
        .engine()
        .run_with(settings, &mut host)
        .context("bootstrap failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{} {}", "✓".green(), report.outcome);
        println!("  Artifact: {}", report.artifact_path.display());
        if let Some(digest) = &report.local_digest {
            println!("  SHA-256:  {}", digest);
        }
    }
    Ok(())
}

fn cmd_status(bootstrapper: &Bootstrapper, json: bool) -> Result<()> {
    let layout = bootstrapper.layout();
    let settings_path = layout.settings_path();
    let fallback_reason = Settings::try_load(&settings_path).err().map(|e| e.to_string());
    let settings = bootstrapper.settings();
    let artifact = layout.artifact_path();
    let installed = layout.has_artifact();
    let digest = installed.then(|| verify::digest(&artifact));

    if json {
        let status = serde_json::json!({
            "install_dir": layout.base_dir(),
            "settings_path": settings_path,
            "settings": settings,
            "settings_fallback": fallback_reason,
            "manifest_url": bootstrapper.config().manifest_url(),
            "artifact_path": artifact,
            "installed": installed,
            "sha256": digest,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Artifact Bootstrap Status".bold());
    println!("  Install dir:  {}", layout.base_dir().display());
    println!("  Settings:     {}", settings_path.display());
    if let Some(reason) = fallback_reason {
        println!("                {} ({})", "using defaults".yellow(), reason);
    }
    println!("  Auto update:  {}", settings.auto_update);
    println!("  Channel:      {}", settings.channel);
    println!("  Manifest:     {}", bootstrapper.config().manifest_url());
    println!("  Artifact:     {}", artifact.display());
    match digest {
        Some(digest) => println!("  Installed:    {} ({})", "yes".green(), digest),
        None => println!("  Installed:    {}", "no".red()),
    }
    Ok(())
}

fn cmd_digest(file: &Path, json: bool) -> Result<()> {
    let digest = verify::calculate_sha256(file)
        .with_context(|| format!("could not hash {}", file.display()))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "file": file,
                "sha256": digest,
            }))?
        );
    } else {
        println!("{}  {}", digest, file.display());
    }
    Ok(())
}

fn cmd_manifest(bootstrapper: &Bootstrapper, channel: Option<Channel>, json: bool) -> Result<()> {
    let channel = channel.unwrap_or(bootstrapper.settings().channel);
    let url = bootstrapper.config().manifest_url();

    let Some(manifest) = bootstrapper
        .manifest_client()
        .fetch(&url)
        .and_then(RemoteManifest::from_value)
    else {
        bail!("no manifest available from {}", url);
    };
    let Some(entry) = manifest.entry(channel) else {
        bail!("manifest has no entry for channel {}", channel);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        println!("{}", format!("Channel {}", channel).bold());
        println!("  URL:     {}", entry.url);
        println!("  SHA-256: {}", entry.sha256);
    }
    Ok(())
}
