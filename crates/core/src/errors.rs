use thiserror::Error;

use crate::catalog::Domain;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("unknown category `{value}` for field `{field}`")]
    UnknownCategory { field: String, value: String },
    #[error("`{field}` = {value} is outside the accepted range {min}..={max}")]
    OutOfRange { field: String, value: i64, min: i64, max: i64 },
    #[error("historical dataset has {rows} rows but the model needs at least {features}")]
    InsufficientData { rows: usize, features: usize },
    #[error(
        "{domain} dataset does not match the schema catalog (missing: [{}], unexpected: [{}])",
        .missing.join(", "),
        .unexpected.join(", ")
    )]
    SchemaMismatch { domain: Domain, missing: Vec<String>, unexpected: Vec<String> },
    #[error("malformed historical dataset: {0}")]
    MalformedDataset(String),
    #[error("model produced a non-finite spend estimate")]
    NonFiniteEstimate,
}

impl EngineError {
    pub fn unknown_category(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnknownCategory { field: field.into(), value: value.into() }
    }

    pub fn error_class(&self) -> &'static str {
        match self {
            Self::UnknownCategory { .. } => "unknown_category",
            Self::OutOfRange { .. } => "out_of_range",
            Self::InsufficientData { .. } => "insufficient_data",
            Self::SchemaMismatch { .. } => "schema_mismatch",
            Self::MalformedDataset(_) => "malformed_dataset",
            Self::NonFiniteEstimate => "non_finite_estimate",
        }
    }

    fn is_input_violation(&self) -> bool {
        matches!(self, Self::UnknownCategory { .. } | Self::OutOfRange { .. })
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("dataset failure: {0}")]
    Dataset(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The reservation could not be assessed. Check inputs and try again."
            }
            Self::ServiceUnavailable { .. } => {
                "Historical data is not usable right now. Check the dataset and retry."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Engine(error) if error.is_input_violation() => Self::BadRequest {
                message: error.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Engine(EngineError::NonFiniteEstimate) => Self::Internal {
                message: EngineError::NonFiniteEstimate.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Engine(error) => Self::ServiceUnavailable {
                message: error.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Dataset(message) => {
                Self::ServiceUnavailable { message, correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::Configuration(message) => {
                Self::Internal { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}
