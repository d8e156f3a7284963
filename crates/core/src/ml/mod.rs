//! Spend regression
//!
//! Fits a random-forest regressor on a domain's historical dataset for every request.
//! Inputs are standard-scaled with statistics taken from the training rows only, and
//! a fitted model is bound to the dataset fingerprint and feature columns it saw.

pub mod forest;
pub mod scaler;
pub mod tree;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{Domain, DomainSchema};
use crate::dataset::HistoricalDataset;
use crate::encoding::FeatureVector;
use crate::errors::EngineError;

pub use forest::RandomForest;
pub use scaler::StandardScaler;
pub use tree::{RegressionTree, TreeParams};

pub const DEFAULT_TREES: usize = 100;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub seed: u64,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: DEFAULT_TREES,
            seed: DEFAULT_SEED,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl ForestParams {
    pub fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        }
    }
}

/// Seam between the engine and model fitting. Implementations may memoise by
/// dataset fingerprint as long as the returned model is equivalent to a fresh fit.
pub trait ModelTrainer {
    fn train(
        &self,
        dataset: &HistoricalDataset,
        schema: &DomainSchema,
    ) -> Result<FittedModel, EngineError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RandomForestTrainer {
    params: ForestParams,
}

impl RandomForestTrainer {
    pub fn new(params: ForestParams) -> Self {
        Self { params }
    }
}

impl ModelTrainer for RandomForestTrainer {
    fn train(
        &self,
        dataset: &HistoricalDataset,
        schema: &DomainSchema,
    ) -> Result<FittedModel, EngineError> {
        train(dataset, schema, &self.params)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub training_rows: usize,
    pub feature_count: usize,
    pub r_squared: f64,
    pub dataset_fingerprint: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    domain: Domain,
    feature_columns: Vec<String>,
    scaler: StandardScaler,
    forest: RandomForest,
    training_rows: usize,
    dataset_fingerprint: String,
    r_squared: f64,
}

impl FittedModel {
    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            training_rows: self.training_rows,
            feature_count: self.feature_columns.len(),
            r_squared: self.r_squared,
            dataset_fingerprint: self.dataset_fingerprint.clone(),
        }
    }

    /// Scales `features` with the training statistics and averages the forest.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, EngineError> {
        if features.columns() != self.feature_columns.as_slice() {
            let missing = self
                .feature_columns
                .iter()
                .filter(|column| !features.columns().contains(column))
                .cloned()
                .collect();
            let unexpected = features
                .columns()
                .iter()
                .filter(|column| !self.feature_columns.contains(column))
                .cloned()
                .collect();
            return Err(EngineError::SchemaMismatch { domain: self.domain, missing, unexpected });
        }

        let estimate = self.forest.predict(&self.scaler.transform(features.values()));
        if !estimate.is_finite() {
            return Err(EngineError::NonFiniteEstimate);
        }
        Ok(estimate)
    }
}

/// Preconditions for fitting: the dataset matches the catalog exactly and has at least
/// one row per feature column.
pub fn ensure_trainable(
    dataset: &HistoricalDataset,
    schema: &DomainSchema,
) -> Result<(), EngineError> {
    schema.reconcile(dataset).into_result()?;

    let features = schema.feature_columns().len();
    if dataset.len() < features {
        return Err(EngineError::InsufficientData { rows: dataset.len(), features });
    }
    Ok(())
}

pub fn train(
    dataset: &HistoricalDataset,
    schema: &DomainSchema,
    params: &ForestParams,
) -> Result<FittedModel, EngineError> {
    ensure_trainable(dataset, schema)?;

    let feature_columns = schema.feature_columns();
    let missing = |column: &str| {
        EngineError::MalformedDataset(format!("column `{column}` disappeared after reconcile"))
    };
    let feature_indices = feature_columns
        .iter()
        .map(|column| dataset.column_index(column).ok_or_else(|| missing(column.as_str())))
        .collect::<Result<Vec<_>, _>>()?;
    let targets = dataset.column(schema.target).ok_or_else(|| missing(schema.target))?;

    let raw_rows: Vec<Vec<f64>> = dataset
        .rows()
        .iter()
        .map(|row| feature_indices.iter().map(|&index| row[index]).collect())
        .collect();

    let scaler = StandardScaler::fit(&raw_rows, feature_columns.len());
    let scaled: Vec<Vec<f64>> = raw_rows.iter().map(|row| scaler.transform(row)).collect();
    let forest =
        RandomForest::fit(&scaled, &targets, params.n_trees, params.seed, &params.tree_params());
    let fitted: Vec<f64> = scaled.iter().map(|row| forest.predict(row)).collect();
    let r_squared = r_squared(&targets, &fitted);
    let dataset_fingerprint = dataset.fingerprint();

    info!(
        event_name = "engine.train.completed",
        domain = %schema.domain,
        rows = dataset.len(),
        features = feature_columns.len(),
        trees = forest.tree_count(),
        r_squared,
        dataset_fingerprint = %dataset_fingerprint,
        "fitted spend model"
    );

    Ok(FittedModel {
        domain: schema.domain,
        feature_columns,
        scaler,
        forest,
        training_rows: dataset.len(),
        dataset_fingerprint,
        r_squared,
    })
}

/// Coefficient of determination; a constant target scores 1.0 when fitted exactly.
pub fn r_squared(actual: &[f64], fitted: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let total: f64 = actual.iter().map(|value| (value - mean).powi(2)).sum();
    let residual: f64 =
        actual.iter().zip(fitted).map(|(value, estimate)| (value - estimate).powi(2)).sum();

    if total <= f64::EPSILON {
        return if residual <= f64::EPSILON { 1.0 } else { 0.0 };
    }
    1.0 - residual / total
}
