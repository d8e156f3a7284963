//! Reservation assessment pipeline
//!
//! `encode -> train -> score -> estimate -> classify -> strategy -> advisories`, run
//! synchronously for one reservation against one historical dataset. Nothing is kept
//! between calls: the model is fitted and dropped inside [`ReservationEngine::assess`].

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::{Domain, DomainSchema, SchemaCatalog};
use crate::dataset::HistoricalDataset;
use crate::domain::hotel::HotelReservation;
use crate::domain::restaurant::RestaurantReservation;
use crate::encoding::{encode_hotel, encode_restaurant, FeatureVector};
use crate::errors::EngineError;
use crate::ml::{FittedModel, ForestParams, ModelSummary, ModelTrainer, RandomForestTrainer};
use crate::probability::{
    estimate_hotel, estimate_restaurant, Behavior, ProbabilityEstimate, ReturnOutlook,
};
use crate::scoring::{score_hotel, score_restaurant, PredictionResult};
use crate::strategy::{
    classify, generate_strategy, hotel_advisories, restaurant_advisories, Advisory,
    StrategyRecommendation, Tier,
};

/// Per-domain steps of the pipeline.
pub trait ReservationPipeline {
    fn domain(&self) -> Domain;

    /// Nights for a stay, covers for a table.
    fn unit_count(&self) -> u32;

    fn encode(&self, schema: &DomainSchema) -> Result<FeatureVector, EngineError>;

    fn score(
        &self,
        model: &FittedModel,
        features: &FeatureVector,
    ) -> Result<PredictionResult, EngineError>;

    fn estimate(&self, prediction: &PredictionResult) -> Result<ProbabilityEstimate, EngineError>;

    fn advisories(&self, probabilities: &ProbabilityEstimate) -> Result<Vec<Advisory>, EngineError>;
}

impl ReservationPipeline for HotelReservation {
    fn domain(&self) -> Domain {
        Domain::Hotel
    }

    fn unit_count(&self) -> u32 {
        self.nights
    }

    fn encode(&self, schema: &DomainSchema) -> Result<FeatureVector, EngineError> {
        encode_hotel(self, schema)
    }

    fn score(
        &self,
        model: &FittedModel,
        features: &FeatureVector,
    ) -> Result<PredictionResult, EngineError> {
        score_hotel(model, features, self)
    }

    fn estimate(&self, prediction: &PredictionResult) -> Result<ProbabilityEstimate, EngineError> {
        estimate_hotel(self, prediction)
    }

    fn advisories(
        &self,
        probabilities: &ProbabilityEstimate,
    ) -> Result<Vec<Advisory>, EngineError> {
        Ok(hotel_advisories(self, probabilities))
    }
}

impl ReservationPipeline for RestaurantReservation {
    fn domain(&self) -> Domain {
        Domain::Restaurant
    }

    fn unit_count(&self) -> u32 {
        self.party_size
    }

    fn encode(&self, schema: &DomainSchema) -> Result<FeatureVector, EngineError> {
        encode_restaurant(self, schema)
    }

    fn score(
        &self,
        model: &FittedModel,
        features: &FeatureVector,
    ) -> Result<PredictionResult, EngineError> {
        score_restaurant(model, features, self)
    }

    fn estimate(&self, prediction: &PredictionResult) -> Result<ProbabilityEstimate, EngineError> {
        estimate_restaurant(self, prediction)
    }

    fn advisories(
        &self,
        probabilities: &ProbabilityEstimate,
    ) -> Result<Vec<Advisory>, EngineError> {
        restaurant_advisories(self, probabilities)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReservationAssessment {
    pub domain: Domain,
    pub prediction: PredictionResult,
    pub probabilities: ProbabilityEstimate,
    pub return_outlook: ReturnOutlook,
    pub tier: Tier,
    pub strategy: StrategyRecommendation,
    pub advisories: Vec<Advisory>,
    pub model: ModelSummary,
}

#[derive(Clone, Debug)]
pub struct ReservationEngine<T = RandomForestTrainer> {
    catalog: SchemaCatalog,
    trainer: T,
}

impl ReservationEngine<RandomForestTrainer> {
    pub fn new(params: ForestParams) -> Self {
        Self::with_trainer(SchemaCatalog::standard(), RandomForestTrainer::new(params))
    }
}

impl Default for ReservationEngine<RandomForestTrainer> {
    fn default() -> Self {
        Self::new(ForestParams::default())
    }
}

impl<T: ModelTrainer> ReservationEngine<T> {
    pub fn with_trainer(catalog: SchemaCatalog, trainer: T) -> Self {
        Self { catalog, trainer }
    }

    pub fn assess<R: ReservationPipeline>(
        &self,
        reservation: &R,
        dataset: &HistoricalDataset,
    ) -> Result<ReservationAssessment, EngineError> {
        let domain = reservation.domain();
        info!(
            event_name = "engine.assess.start",
            domain = %domain,
            unit_count = reservation.unit_count(),
            dataset_rows = dataset.len(),
            "assessing reservation"
        );

        self.run(reservation, dataset).map_err(|error| {
            warn!(
                event_name = "engine.assess.failed",
                domain = %domain,
                error_class = error.error_class(),
                error = %error,
                "reservation assessment failed"
            );
            error
        })
    }

    fn run<R: ReservationPipeline>(
        &self,
        reservation: &R,
        dataset: &HistoricalDataset,
    ) -> Result<ReservationAssessment, EngineError> {
        let domain = reservation.domain();
        let schema = self.catalog.schema(domain);

        let features = reservation.encode(schema)?;
        let model = self.trainer.train(dataset, schema)?;
        let prediction = reservation.score(&model, &features)?;
        let probabilities = reservation.estimate(&prediction)?;
        let tier = classify(&prediction);
        let strategy = generate_strategy(domain, tier);
        let advisories = reservation.advisories(&probabilities)?;
        let return_outlook = ReturnOutlook::from_probability(
            probabilities.get(Behavior::ReturnVisit).unwrap_or_default(),
        );

        info!(
            event_name = "engine.assess.completed",
            domain = %domain,
            total = %prediction.total,
            tier = tier.as_str(),
            roi_pct = %strategy.roi_pct,
            advisories = advisories.len(),
            "reservation assessed"
        );

        Ok(ReservationAssessment {
            domain,
            prediction,
            probabilities,
            return_outlook,
            tier,
            strategy,
            advisories,
            model: model.summary(),
        })
    }
}
