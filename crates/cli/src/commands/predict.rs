use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use stayscore_core::config::{AppConfig, LoadOptions};
use stayscore_core::{
    ApplicationError, Domain, HotelReservation, ReservationAssessment, ReservationEngine,
    RestaurantReservation,
};

use crate::commands::{application_failure, load_dataset, CommandResult};

enum PredictError {
    InputRead(String),
    InputParse(String),
    Application(ApplicationError),
}

impl From<ApplicationError> for PredictError {
    fn from(error: ApplicationError) -> Self {
        Self::Application(error)
    }
}

enum Reservation {
    Hotel(HotelReservation),
    Restaurant(RestaurantReservation),
}

pub fn run(domain: Domain, input: &Path, dataset: Option<&Path>) -> CommandResult {
    let correlation_id = format!("predict:{domain}:{}", input.display());

    match assess(domain, input, dataset) {
        Ok(assessment) => CommandResult::report("predict", &assessment),
        Err(PredictError::InputRead(message)) => {
            CommandResult::failure("predict", "input_read", message, 3)
        }
        Err(PredictError::InputParse(message)) => {
            CommandResult::failure("predict", "input_parse", message, 3)
        }
        Err(PredictError::Application(error)) => {
            application_failure("predict", error, &correlation_id)
        }
    }
}

fn assess(
    domain: Domain,
    input: &Path,
    dataset: Option<&Path>,
) -> Result<ReservationAssessment, PredictError> {
    let config = AppConfig::load(LoadOptions::default())
        .map_err(|error| ApplicationError::Configuration(error.to_string()))?;

    let raw = fs::read_to_string(input).map_err(|error| {
        PredictError::InputRead(format!("could not read `{}`: {error}", input.display()))
    })?;
    let reservation = match domain {
        Domain::Hotel => Reservation::Hotel(parse_input(&raw)?),
        Domain::Restaurant => Reservation::Restaurant(parse_input(&raw)?),
    };

    let dataset_path = dataset.unwrap_or_else(|| config.data.dataset_path(domain));
    let history = load_dataset(dataset_path)?;
    let engine = ReservationEngine::new(config.forest_params());

    let assessment = match &reservation {
        Reservation::Hotel(stay) => engine.assess(stay, &history),
        Reservation::Restaurant(booking) => engine.assess(booking, &history),
    };

    assessment.map_err(|error| PredictError::Application(error.into()))
}

fn parse_input<T: DeserializeOwned>(raw: &str) -> Result<T, PredictError> {
    serde_json::from_str(raw)
        .map_err(|error| PredictError::InputParse(format!("invalid reservation JSON: {error}")))
}
