use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Domain;
use crate::ml::ForestParams;

pub const MAX_TREES: u32 = 1000;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub data: DataConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DataConfig {
    pub hotel_dataset: PathBuf,
    pub restaurant_dataset: PathBuf,
}

impl DataConfig {
    pub fn dataset_path(&self, domain: Domain) -> &Path {
        match domain {
            Domain::Hotel => &self.hotel_dataset,
            Domain::Restaurant => &self.restaurant_dataset,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelConfig {
    pub trees: u32,
    pub seed: u64,
    /// `None` grows every tree until its leaves are pure or too small to split.
    pub max_depth: Option<u32>,
    pub min_samples_split: u32,
    pub min_samples_leaf: u32,
}

impl From<&ModelConfig> for ForestParams {
    fn from(model: &ModelConfig) -> Self {
        Self {
            n_trees: model.trees as usize,
            seed: model.seed,
            max_depth: model.max_depth.map(|depth| depth as usize),
            min_samples_split: model.min_samples_split as usize,
            min_samples_leaf: model.min_samples_leaf as usize,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub hotel_dataset: Option<PathBuf>,
    pub restaurant_dataset: Option<PathBuf>,
    pub model_trees: Option<u32>,
    pub model_seed: Option<u64>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig {
                hotel_dataset: PathBuf::from("data/hotel_ml.json"),
                restaurant_dataset: PathBuf::from("data/restaurante_ml.json"),
            },
            model: ModelConfig {
                trees: 100,
                seed: 42,
                max_depth: None,
                min_samples_split: 2,
                min_samples_leaf: 1,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("stayscore.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn forest_params(&self) -> ForestParams {
        ForestParams::from(&self.model)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(data) = patch.data {
            if let Some(hotel_dataset) = data.hotel_dataset {
                self.data.hotel_dataset = hotel_dataset;
            }
            if let Some(restaurant_dataset) = data.restaurant_dataset {
                self.data.restaurant_dataset = restaurant_dataset;
            }
        }

        if let Some(model) = patch.model {
            if let Some(trees) = model.trees {
                self.model.trees = trees;
            }
            if let Some(seed) = model.seed {
                self.model.seed = seed;
            }
            if let Some(max_depth) = model.max_depth {
                self.model.max_depth = Some(max_depth);
            }
            if let Some(min_samples_split) = model.min_samples_split {
                self.model.min_samples_split = min_samples_split;
            }
            if let Some(min_samples_leaf) = model.min_samples_leaf {
                self.model.min_samples_leaf = min_samples_leaf;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("STAYSCORE_HOTEL_DATASET") {
            self.data.hotel_dataset = PathBuf::from(value);
        }
        if let Some(value) = read_env("STAYSCORE_RESTAURANT_DATASET") {
            self.data.restaurant_dataset = PathBuf::from(value);
        }

        if let Some(value) = read_env("STAYSCORE_MODEL_TREES") {
            self.model.trees = parse_u32("STAYSCORE_MODEL_TREES", &value)?;
        }
        if let Some(value) = read_env("STAYSCORE_MODEL_SEED") {
            self.model.seed = parse_u64("STAYSCORE_MODEL_SEED", &value)?;
        }
        if let Some(value) = read_env("STAYSCORE_MODEL_MAX_DEPTH") {
            self.model.max_depth = parse_depth("STAYSCORE_MODEL_MAX_DEPTH", &value)?;
        }
        if let Some(value) = read_env("STAYSCORE_MODEL_MIN_SAMPLES_SPLIT") {
            self.model.min_samples_split =
                parse_u32("STAYSCORE_MODEL_MIN_SAMPLES_SPLIT", &value)?;
        }
        if let Some(value) = read_env("STAYSCORE_MODEL_MIN_SAMPLES_LEAF") {
            self.model.min_samples_leaf = parse_u32("STAYSCORE_MODEL_MIN_SAMPLES_LEAF", &value)?;
        }

        let log_level =
            read_env("STAYSCORE_LOGGING_LEVEL").or_else(|| read_env("STAYSCORE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("STAYSCORE_LOGGING_FORMAT").or_else(|| read_env("STAYSCORE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(hotel_dataset) = overrides.hotel_dataset {
            self.data.hotel_dataset = hotel_dataset;
        }
        if let Some(restaurant_dataset) = overrides.restaurant_dataset {
            self.data.restaurant_dataset = restaurant_dataset;
        }
        if let Some(trees) = overrides.model_trees {
            self.model.trees = trees;
        }
        if let Some(seed) = overrides.model_seed {
            self.model.seed = seed;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_data(&self.data)?;
        validate_model(&self.model)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("stayscore.toml"), PathBuf::from("config/stayscore.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_data(data: &DataConfig) -> Result<(), ConfigError> {
    if data.hotel_dataset.as_os_str().is_empty() {
        return Err(ConfigError::Validation("data.hotel_dataset must not be empty".to_string()));
    }
    if data.restaurant_dataset.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "data.restaurant_dataset must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_model(model: &ModelConfig) -> Result<(), ConfigError> {
    if model.trees == 0 || model.trees > MAX_TREES {
        return Err(ConfigError::Validation(format!(
            "model.trees must be in range 1..={MAX_TREES}"
        )));
    }

    if model.max_depth == Some(0) {
        return Err(ConfigError::Validation(
            "model.max_depth must be at least 1 (omit it for unlimited depth)".to_string(),
        ));
    }

    if model.min_samples_split < 2 {
        return Err(ConfigError::Validation(
            "model.min_samples_split must be at least 2".to_string(),
        ));
    }

    if model.min_samples_leaf == 0 {
        return Err(ConfigError::Validation(
            "model.min_samples_leaf must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// `none` and `unlimited` clear the depth limit.
fn parse_depth(key: &str, value: &str) -> Result<Option<u32>, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "none" | "unlimited" => Ok(None),
        _ => parse_u32(key, value).map(Some),
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    data: Option<DataPatch>,
    model: Option<ModelPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DataPatch {
    hotel_dataset: Option<PathBuf>,
    restaurant_dataset: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct ModelPatch {
    trees: Option<u32>,
    seed: Option<u64>,
    max_depth: Option<u32>,
    min_samples_split: Option<u32>,
    min_samples_leaf: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
