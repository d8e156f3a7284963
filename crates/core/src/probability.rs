//! Behaviour likelihoods
//!
//! Rule-based probabilities for secondary behaviours. Each one starts at a baseline and
//! only ever moves up, and every step is capped, so a value never leaves
//! `[baseline, PROBABILITY_CAP]`.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::hotel::HotelReservation;
use crate::domain::restaurant::{MealPeriod, RestaurantReservation};
use crate::errors::EngineError;
use crate::scoring::PredictionResult;

pub const PROBABILITY_CAP: f64 = 0.95;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    Spa,
    ReturnVisit,
    Wine,
    Dessert,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProbabilityEstimate {
    values: BTreeMap<Behavior, f64>,
}

impl ProbabilityEstimate {
    pub fn get(&self, behavior: Behavior) -> Option<f64> {
        self.values.get(&behavior).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Behavior, f64)> + '_ {
        self.values.iter().map(|(behavior, value)| (*behavior, *value))
    }

    fn with(mut self, behavior: Behavior, likelihood: Likelihood) -> Self {
        self.values.insert(behavior, likelihood.value());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnOutlook {
    High,
    Medium,
}

impl ReturnOutlook {
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.8 {
            Self::High
        } else {
            Self::Medium
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Likelihood(f64);

impl Likelihood {
    fn baseline(value: f64) -> Self {
        Self(value.min(PROBABILITY_CAP))
    }

    fn boost(self, when: bool, increment: f64) -> Self {
        if when {
            Self((self.0 + increment).min(PROBABILITY_CAP))
        } else {
            self
        }
    }

    fn value(self) -> f64 {
        self.0
    }
}

pub fn estimate_hotel(
    stay: &HotelReservation,
    prediction: &PredictionResult,
) -> Result<ProbabilityEstimate, EngineError> {
    let room = stay.room()?;

    let spa = Likelihood::baseline(0.3)
        .boost(stay.spa_interest, 0.4)
        .boost(room.is_premium(), 0.2);
    let return_visit = Likelihood::baseline(0.6)
        .boost(prediction.total > Decimal::from(300), 0.2)
        .boost(stay.lead_time_days > 30, 0.1);

    Ok(ProbabilityEstimate::default()
        .with(Behavior::Spa, spa)
        .with(Behavior::ReturnVisit, return_visit))
}

pub fn estimate_restaurant(
    booking: &RestaurantReservation,
    prediction: &PredictionResult,
) -> Result<ProbabilityEstimate, EngineError> {
    let dinner = booking.meal_period()? == MealPeriod::Dinner;

    let wine = Likelihood::baseline(0.4).boost(booking.wine_interest, 0.3).boost(dinner, 0.2);
    let dessert = Likelihood::baseline(0.5)
        .boost(booking.dessert, 0.3)
        .boost(booking.special_occasion, 0.2);
    let return_visit = Likelihood::baseline(0.7)
        .boost(prediction.per_unit > Decimal::from(30), 0.2)
        .boost(booking.is_vip(), 0.1);

    Ok(ProbabilityEstimate::default()
        .with(Behavior::Wine, wine)
        .with(Behavior::Dessert, dessert)
        .with(Behavior::ReturnVisit, return_visit))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{
        estimate_hotel, estimate_restaurant, Behavior, ReturnOutlook, PROBABILITY_CAP,
    };
    use crate::catalog::Domain;
    use crate::domain::hotel::{tests::reservation as stay, HotelReservation};
    use crate::domain::restaurant::{tests::reservation as booking, RestaurantReservation};
    use crate::scoring::{DomainRatios, PredictionResult};

    fn prediction(domain: Domain, total: i64, units: u32) -> PredictionResult {
        let total = Decimal::from(total);
        PredictionResult {
            domain,
            unit_count: units,
            base_component: total,
            incidental_component: Decimal::ZERO,
            total,
            per_unit: total / Decimal::from(units),
            raw_model_estimate: 0.0,
            ratios: DomainRatios::Hotel {
                room_share_pct: Decimal::ONE_HUNDRED,
                extras_share_pct: Decimal::ZERO,
            },
        }
    }

    #[test]
    fn plain_stay_keeps_baselines() {
        let estimate = estimate_hotel(&stay(), &prediction(Domain::Hotel, 200, 3)).unwrap();

        assert_eq!(estimate.get(Behavior::Spa), Some(0.3));
        assert_eq!(estimate.get(Behavior::ReturnVisit), Some(0.6));
        assert_eq!(estimate.get(Behavior::Wine), None);
    }

    #[test]
    fn spa_suite_guest_accumulates_every_boost() {
        let suite = HotelReservation {
            room_type: "Suite".to_owned(),
            spa_interest: true,
            lead_time_days: 45,
            ..stay()
        };

        let estimate = estimate_hotel(&suite, &prediction(Domain::Hotel, 900, 3)).unwrap();

        let spa = estimate.get(Behavior::Spa).unwrap();
        let return_visit = estimate.get(Behavior::ReturnVisit).unwrap();
        assert!((spa - 0.9).abs() < 1e-9);
        assert!((return_visit - 0.9).abs() < 1e-9);
        assert!(return_visit <= PROBABILITY_CAP);
    }

    #[test]
    fn vip_dinner_with_wine_and_dessert() {
        let dinner = RestaurantReservation {
            period: "Jantar".to_owned(),
            wine_interest: true,
            dessert: true,
            special_occasion: true,
            customer_type: "VIP".to_owned(),
            ..booking()
        };

        let estimate =
            estimate_restaurant(&dinner, &prediction(Domain::Restaurant, 160, 4)).unwrap();

        assert!((estimate.get(Behavior::Wine).unwrap() - 0.9).abs() < 1e-9);
        assert_eq!(estimate.get(Behavior::Dessert), Some(PROBABILITY_CAP));
        assert_eq!(estimate.get(Behavior::ReturnVisit), Some(PROBABILITY_CAP));
    }

    #[test]
    fn cheap_lunch_return_stays_at_baseline() {
        let estimate =
            estimate_restaurant(&booking(), &prediction(Domain::Restaurant, 60, 4)).unwrap();

        assert_eq!(estimate.get(Behavior::ReturnVisit), Some(0.7));
        assert_eq!(estimate.get(Behavior::Wine), Some(0.4));
        assert_eq!(estimate.iter().count(), 3);
    }

    #[test]
    fn return_outlook_boundary_is_strict() {
        assert_eq!(ReturnOutlook::from_probability(0.8), ReturnOutlook::Medium);
        assert_eq!(ReturnOutlook::from_probability(0.81).label(), "high");
    }
}
