//! Command definitions and handlers for the `bastion` binary.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use bastion_common::{Principal, Role};
use bastion_config::Config;
use bastion_db::MemoryRecordStore;
use bastion_ranker::weight_backend::JsonFileWeightBackend;
use bastion_ranker::{ReadinessEngine, WeightGroup, WeightSet, WeightStore};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use crate::render;

#[derive(Debug, Parser)]
#[command(name = "bastion", version, about = "Settlement readiness scoring console")]
pub struct Cli {
    /// Path to bastion.toml (overrides BASTION_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score settlements, highest priority first
    Score(ScoreArgs),
    /// Inspect or change the scoring weights
    #[command(subcommand)]
    Weights(WeightsCommand),
}

#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Score a single settlement
    #[arg(long)]
    pub settlement: Option<Uuid>,
    /// Reference day (defaults to today)
    #[arg(long)]
    pub at: Option<NaiveDate>,
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum WeightsCommand {
    /// Print the current weights and any group warnings
    Show,
    /// Change coefficients; unspecified ones keep their current value
    Set(SetArgs),
    /// Validate a weights file (.toml, .yaml, .json) without saving
    Check { file: PathBuf },
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Acting user id
    #[arg(long = "as")]
    pub user: String,
    /// Role granted to the acting user (repeatable)
    #[arg(long = "role", required = true)]
    pub roles: Vec<Role>,
    /// Coefficient assignment such as readiness.personnel=0.5 (repeatable)
    #[arg(long = "set", value_parser = parse_assignment)]
    pub assignments: Vec<(String, f64)>,
    /// Rescale the named groups to sum to 1.0 before saving
    #[arg(long = "normalise", value_parser = parse_group)]
    pub normalise: Vec<WeightGroup>,
}

pub fn parse_assignment(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|e| format!("bad value for {name}: {e}"))?;
    Ok((name.trim().to_string(), value))
}

pub fn parse_group(s: &str) -> Result<WeightGroup, String> {
    WeightGroup::ALL
        .into_iter()
        .find(|g| g.as_str() == s)
        .ok_or_else(|| format!("unknown weight group '{s}'"))
}

/// Resolve configuration: explicit flag, then BASTION_CONFIG / ./bastion.toml.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config = match explicit {
        Some(path) => Config::from_path(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

pub fn weight_store(config: &Config) -> Arc<WeightStore> {
    let backend = Arc::new(JsonFileWeightBackend::new(&config.store.weights_path));
    Arc::new(WeightStore::new(backend, config.scoring.validation_policy))
}

pub async fn build_engine(config: &Config) -> Result<ReadinessEngine> {
    let records = MemoryRecordStore::from_json_file(&config.store.records_path)
        .await
        .with_context(|| format!("loading records from {}", config.store.records_path.display()))?;
    Ok(ReadinessEngine::new(
        Arc::new(records),
        weight_store(config),
        config.scoring.clone(),
    ))
}

pub async fn cmd_score(engine: &ReadinessEngine, args: &ScoreArgs) -> Result<String> {
    let scores = match args.settlement {
        Some(id) => vec![engine.score_settlement(id, args.at).await?],
        None => engine.score_all(args.at).await?,
    };
    if args.json {
        Ok(serde_json::to_string_pretty(&scores)?)
    } else {
        Ok(render::score_table(&scores))
    }
}

pub async fn cmd_weights_show(store: &WeightStore) -> String {
    let snapshot = store.load().await;
    render::weights_report(&snapshot.weights, Some((snapshot.version, snapshot.source)))
}

pub async fn cmd_weights_set(store: &WeightStore, args: &SetArgs) -> Result<String> {
    let principal = Principal::new(args.user.clone(), args.roles.iter().copied());

    let mut weights = store.load().await.weights;
    for (name, value) in &args.assignments {
        if !weights.set(name, *value) {
            bail!("unknown coefficient '{name}'");
        }
    }
    for group in &args.normalise {
        weights.normalise_group(*group);
    }

    let outcome = store.save(&principal, weights).await?;
    let mut out = format!("Saved weights version {}\n", outcome.version);
    for warning in &outcome.warnings {
        out.push_str(&format!("warning: {warning}\n"));
    }
    Ok(out)
}

pub fn cmd_weights_check(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let weights: WeightSet = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&content)?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    if let Err(reason) = weights.check_bounds() {
        bail!("invalid weights: {reason}");
    }
    Ok(render::weights_report(&weights, None))
}
