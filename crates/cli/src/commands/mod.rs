pub mod config;
pub mod doctor;
pub mod predict;
pub mod seed;

use std::fs;
use std::path::Path;

use serde::Serialize;
use stayscore_core::{ApplicationError, HistoricalDataset, InterfaceError};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

#[derive(Debug, Serialize)]
struct CommandReport<'a, T> {
    command: &'a str,
    status: &'a str,
    result: &'a T,
}

impl CommandResult {
    /// Successful outcome carrying a structured result instead of a message.
    pub fn report<T: Serialize>(command: &str, result: &T) -> Self {
        let report = CommandReport { command, status: "ok", result };
        match serde_json::to_string_pretty(&report) {
            Ok(output) => Self { exit_code: 0, output },
            Err(error) => Self::failure(command, "serialization", error.to_string(), 5),
        }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

pub(crate) fn load_dataset(path: &Path) -> Result<HistoricalDataset, ApplicationError> {
    let raw = fs::read_to_string(path).map_err(|error| {
        ApplicationError::Dataset(format!("could not read `{}`: {error}", path.display()))
    })?;
    Ok(HistoricalDataset::from_json(&raw)?)
}

/// Maps an application failure onto the interface taxonomy. Configuration failures keep
/// their own exit code so operators can tell them apart from engine faults.
pub(crate) fn application_failure(
    command: &str,
    error: ApplicationError,
    correlation_id: &str,
) -> CommandResult {
    let error_class = match &error {
        ApplicationError::Engine(engine) => engine.error_class(),
        ApplicationError::Dataset(_) => "dataset",
        ApplicationError::Configuration(_) => "config_validation",
    };
    let is_configuration = matches!(error, ApplicationError::Configuration(_));

    let interface = error.into_interface(correlation_id);
    let (detail, exit_code) = match &interface {
        InterfaceError::BadRequest { message, .. } => (message.clone(), 3),
        InterfaceError::ServiceUnavailable { message, .. } => (message.clone(), 4),
        InterfaceError::Internal { message, .. } if is_configuration => (message.clone(), 2),
        InterfaceError::Internal { message, .. } => (message.clone(), 5),
    };

    CommandResult::failure(
        command,
        error_class,
        format!("{} ({detail}) [correlation_id={correlation_id}]", interface.user_message()),
        exit_code,
    )
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\
             \"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
