//! attest daemon: command-line adapter over the attestation registry.

mod command_log;
mod config;
mod output;
mod sink;

use anyhow::{bail, Context};
use attest_registry::{replay, Envelope, EventSink, Registry, RegistrySnapshot};
use attest_types::{ItemId, Principal, ReviewerId};
use attest_utils::LogFormat;
use clap::Parser;
use config::DaemonConfig;
use sink::LogSink;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "attest-daemon", about = "Threshold attestation registry daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "ATTEST_CONFIG")]
    config: Option<PathBuf>,

    /// Administrator principal for a freshly created registry.
    #[arg(long, env = "ATTEST_ADMIN")]
    admin: Option<String>,

    /// Snapshot file to restore from and persist to.
    #[arg(long, env = "ATTEST_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "ATTEST_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "ATTEST_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Apply a JSON Lines command log in order and print the outcome.
    Replay {
        /// Command log path.
        log: PathBuf,
    },
    /// Apply a single JSON-encoded envelope.
    Apply {
        /// e.g. '{"caller":"admin","command":{"op":"verify","reviewer":1}}'
        envelope: String,
    },
    /// Verify a snapshot and print a summary.
    Inspect {
        /// Snapshot path.
        path: PathBuf,
    },
    /// Print one item and its reviewers from the configured snapshot.
    Item { id: u64 },
    /// Print one reviewer from the configured snapshot.
    Reviewer { id: u64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DaemonConfig::from_toml_file(path)?,
        None => DaemonConfig::default(),
    };
    if let Some(admin) = cli.admin {
        config.administrator = admin;
    }
    if let Some(path) = cli.snapshot {
        config.snapshot_path = Some(path);
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format.as_deref() {
        config.log_format = LogFormat::parse(format);
    }
    config.validate()?;

    attest_utils::init_tracing(config.log_format, &config.log_level);
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Command::Replay { log } => {
            let text = tokio::fs::read_to_string(&log)
                .await
                .with_context(|| format!("reading command log {}", log.display()))?;
            let envelopes = command_log::parse_command_log(&text)?;
            tracing::info!(entries = envelopes.len(), "replaying {}", log.display());

            let mut registry = open_registry(&config).await?;
            let report = replay(&mut registry, &envelopes);
            for rejection in &report.rejected {
                tracing::warn!(
                    index = rejection.index,
                    caller = %rejection.envelope.caller,
                    kind = rejection.error.kind().as_str(),
                    "command rejected: {}",
                    rejection.error
                );
            }
            tracing::info!(
                accepted = report.accepted,
                rejected = report.rejected.len(),
                "replay complete"
            );

            persist(&config, &registry).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&output::replay_report(&report, &registry))?
            );
        }
        Command::Apply { envelope } => {
            let envelope: Envelope =
                serde_json::from_str(&envelope).context("parsing envelope")?;
            let mut registry = open_registry(&config).await?;
            let applied = registry.apply(&envelope).map_err(|e| {
                tracing::warn!(kind = e.kind().as_str(), "command rejected: {e}");
                e
            })?;
            persist(&config, &registry).await?;
            println!("{}", output::applied(&applied));
        }
        Command::Inspect { path } => {
            let snapshot = read_snapshot(&path).await?;
            // Full invariant check, not just the hash.
            Registry::restore(snapshot.clone(), Arc::new(LogSink))?;
            println!(
                "{}",
                serde_json::to_string_pretty(&output::snapshot_summary(&snapshot))?
            );
        }
        Command::Item { id } => {
            let registry = open_existing(&config).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&output::item_view(&registry, ItemId::new(id)))?
            );
        }
        Command::Reviewer { id } => {
            let registry = open_existing(&config).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&registry.get_reviewer_info(ReviewerId::new(id)))?
            );
        }
    }

    Ok(())
}

async fn read_snapshot(path: &Path) -> anyhow::Result<RegistrySnapshot> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    Ok(RegistrySnapshot::from_bytes(&bytes)?)
}

/// Restore from the configured snapshot if it exists, otherwise start empty.
async fn open_registry(config: &DaemonConfig) -> anyhow::Result<Registry> {
    let sink: Arc<dyn EventSink> = Arc::new(LogSink);
    let admin = Principal::new(config.administrator.as_str());
    if let Some(path) = &config.snapshot_path {
        if tokio::fs::try_exists(path).await? {
            let snapshot = read_snapshot(path).await?;
            if snapshot.admin != admin {
                bail!(
                    "snapshot administrator {} differs from configured {}; the administrator cannot be changed",
                    snapshot.admin,
                    admin
                );
            }
            let registry = Registry::restore(snapshot, sink)?;
            tracing::info!(
                items = registry.item_count(),
                reviewers = registry.reviewer_count(),
                "restored registry from {}",
                path.display()
            );
            return Ok(registry);
        }
    }
    tracing::info!(%admin, "starting empty registry");
    Ok(Registry::with_sink(admin, sink)?)
}

async fn open_existing(config: &DaemonConfig) -> anyhow::Result<Registry> {
    let Some(path) = &config.snapshot_path else {
        bail!("no snapshot configured; pass --snapshot or set snapshot_path");
    };
    let snapshot = read_snapshot(path).await?;
    Ok(Registry::restore(snapshot, Arc::new(LogSink))?)
}

async fn persist(config: &DaemonConfig, registry: &Registry) -> anyhow::Result<()> {
    let Some(path) = &config.snapshot_path else {
        return Ok(());
    };
    let snapshot = registry.snapshot()?;
    tokio::fs::write(path, snapshot.to_bytes()?)
        .await
        .with_context(|| format!("writing snapshot {}", path.display()))?;
    tracing::info!(hash = %snapshot.hash_hex(), "snapshot written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_types::OpaqueValue;

    fn config_with(path: PathBuf) -> DaemonConfig {
        DaemonConfig {
            snapshot_path: Some(path),
            ..DaemonConfig::default()
        }
    }

    #[tokio::test]
    async fn persist_then_reopen_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with(dir.path().join("registry.snap"));

        let mut registry = open_registry(&config).await.unwrap();
        let item = registry
            .submit(Principal::new("o"), OpaqueValue::new(vec![1]), 85, 67)
            .unwrap();
        persist(&config, &registry).await.unwrap();

        let reopened = open_existing(&config).await.unwrap();
        assert!(reopened.get_item_info(item).submitted);
        let mut continued = open_registry(&config).await.unwrap();
        assert_eq!(
            continued
                .submit(Principal::new("o"), OpaqueValue::default(), 1, 51)
                .unwrap(),
            ItemId::new(2)
        );
    }

    #[tokio::test]
    async fn reopening_with_different_admin_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with(dir.path().join("registry.snap"));
        let registry = open_registry(&config).await.unwrap();
        persist(&config, &registry).await.unwrap();

        let other = DaemonConfig {
            administrator: "someone-else".into(),
            ..config
        };
        assert!(open_registry(&other).await.is_err());
    }

    #[tokio::test]
    async fn open_existing_requires_snapshot_path() {
        assert!(open_existing(&DaemonConfig::default()).await.is_err());
    }
}
