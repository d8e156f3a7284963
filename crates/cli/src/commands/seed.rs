use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use stayscore_core::config::{AppConfig, LoadOptions};
use stayscore_core::fixtures::{hotel_history, restaurant_history};
use stayscore_core::{ApplicationError, Domain, HistoricalDataset, SchemaCatalog};

use crate::commands::{application_failure, CommandResult};

pub const HOTEL_FILE: &str = "hotel_ml.json";
pub const RESTAURANT_FILE: &str = "restaurante_ml.json";

#[derive(Debug, Serialize)]
struct SeedSummary {
    rows: usize,
    seed: u64,
    datasets: Vec<SeededDataset>,
}

#[derive(Debug, Serialize)]
struct SeededDataset {
    domain: Domain,
    path: String,
    columns: usize,
    fingerprint: String,
}

/// Writes synthetic histories for both domains, into `out_dir` when given and to the
/// configured dataset paths otherwise.
pub fn run(rows: usize, seed: u64, out_dir: Option<&Path>) -> CommandResult {
    let targets = match out_dir {
        Some(dir) => (dir.join(HOTEL_FILE), dir.join(RESTAURANT_FILE)),
        None => match AppConfig::load(LoadOptions::default()) {
            Ok(config) => (config.data.hotel_dataset, config.data.restaurant_dataset),
            Err(error) => {
                return application_failure(
                    "seed",
                    ApplicationError::Configuration(error.to_string()),
                    &format!("seed:{rows}:{seed}"),
                );
            }
        },
    };

    let catalog = SchemaCatalog::standard();
    let minimum = [Domain::Hotel, Domain::Restaurant]
        .iter()
        .map(|domain| catalog.schema(*domain).feature_columns().len())
        .max()
        .unwrap_or_default();
    if rows < minimum {
        return CommandResult::failure(
            "seed",
            "seed_rows",
            format!("--rows must be at least {minimum} so the datasets can train a model"),
            3,
        );
    }

    let (hotel_path, restaurant_path) = targets;
    let generated = hotel_history(rows, seed)
        .and_then(|hotel| Ok((hotel, restaurant_history(rows, seed)?)));
    let (hotel, restaurant) = match generated {
        Ok(pair) => pair,
        Err(error) => {
            return CommandResult::failure("seed", error.error_class(), error.to_string(), 5);
        }
    };

    let mut datasets = Vec::with_capacity(2);
    for (domain, dataset, path) in
        [(Domain::Hotel, &hotel, hotel_path), (Domain::Restaurant, &restaurant, restaurant_path)]
    {
        match write_dataset(dataset, &path) {
            Ok(()) => datasets.push(SeededDataset {
                domain,
                path: path.display().to_string(),
                columns: dataset.columns().len(),
                fingerprint: dataset.fingerprint(),
            }),
            Err(error) => {
                return CommandResult::failure("seed", "dataset_write", format!("{error:#}"), 4);
            }
        }
    }

    tracing::info!(
        event_name = "cli.seed.completed",
        rows,
        seed,
        "synthetic histories written"
    );
    CommandResult::report("seed", &SeedSummary { rows, seed, datasets })
}

fn write_dataset(dataset: &HistoricalDataset, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("could not create `{}`", parent.display()))?;
    }
    let json = dataset.to_json()?;
    fs::write(path, json).with_context(|| format!("could not write `{}`", path.display()))
}
