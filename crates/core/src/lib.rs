pub mod catalog;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod encoding;
pub mod engine;
pub mod errors;
pub mod fixtures;
pub mod ml;
pub mod probability;
pub mod scoring;
pub mod strategy;

pub use catalog::{Domain, DomainSchema, SchemaCatalog, SchemaReport, Season};
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use dataset::HistoricalDataset;
pub use domain::hotel::{HotelReservation, RoomType};
pub use domain::restaurant::{MealPeriod, RestaurantReservation};
pub use encoding::{encode_hotel, encode_restaurant, FeatureEncoder, FeatureVector};
pub use engine::{ReservationAssessment, ReservationEngine, ReservationPipeline};
pub use errors::{ApplicationError, EngineError, InterfaceError};
pub use ml::{FittedModel, ForestParams, ModelSummary, ModelTrainer, RandomForestTrainer};
pub use probability::{Behavior, ProbabilityEstimate, ReturnOutlook, PROBABILITY_CAP};
pub use scoring::{DomainRatios, PredictionResult};
pub use strategy::{
    classify, generate_strategy, Advisory, Recommendation, StrategyRecommendation, Tier,
};
