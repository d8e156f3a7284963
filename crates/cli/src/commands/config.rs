use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use stayscore_core::config::{AppConfig, LoadOptions};
use toml::Value;

struct Field<'a> {
    key_path: &'static str,
    value: String,
    env_keys: &'a [&'static str],
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let fields = [
        Field {
            key_path: "data.hotel_dataset",
            value: config.data.hotel_dataset.display().to_string(),
            env_keys: &["STAYSCORE_HOTEL_DATASET"],
        },
        Field {
            key_path: "data.restaurant_dataset",
            value: config.data.restaurant_dataset.display().to_string(),
            env_keys: &["STAYSCORE_RESTAURANT_DATASET"],
        },
        Field {
            key_path: "model.trees",
            value: config.model.trees.to_string(),
            env_keys: &["STAYSCORE_MODEL_TREES"],
        },
        Field {
            key_path: "model.seed",
            value: config.model.seed.to_string(),
            env_keys: &["STAYSCORE_MODEL_SEED"],
        },
        Field {
            key_path: "model.max_depth",
            value: config
                .model
                .max_depth
                .map(|depth| depth.to_string())
                .unwrap_or_else(|| "<unlimited>".to_string()),
            env_keys: &["STAYSCORE_MODEL_MAX_DEPTH"],
        },
        Field {
            key_path: "model.min_samples_split",
            value: config.model.min_samples_split.to_string(),
            env_keys: &["STAYSCORE_MODEL_MIN_SAMPLES_SPLIT"],
        },
        Field {
            key_path: "model.min_samples_leaf",
            value: config.model.min_samples_leaf.to_string(),
            env_keys: &["STAYSCORE_MODEL_MIN_SAMPLES_LEAF"],
        },
        Field {
            key_path: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["STAYSCORE_LOGGING_LEVEL", "STAYSCORE_LOG_LEVEL"],
        },
        Field {
            key_path: "logging.format",
            value: config.logging.format.as_str().to_string(),
            env_keys: &["STAYSCORE_LOGGING_FORMAT", "STAYSCORE_LOG_FORMAT"],
        },
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(fields.iter().map(|field| {
        render_line(
            field.key_path,
            &field.value,
            field_source(
                field.key_path,
                field.env_keys,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
        )
    }));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("stayscore.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/stayscore.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
