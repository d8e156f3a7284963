//! Commercial strategy
//!
//! Classifies a scored reservation into a value tier and attaches the tier's offer
//! bundle with its cost, expected lift, and ROI verdict.

pub mod advisory;
pub mod offers;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Domain;
use crate::scoring::PredictionResult;

pub use advisory::{hotel_advisories, restaurant_advisories, Advisory};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Basic,
    MidValue,
    HighValue,
    Premium,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::MidValue => "mid_value",
            Self::HighValue => "high_value",
            Self::Premium => "premium",
        }
    }

    /// Tier for a spend figure using strict lower bounds (`value > bound`).
    fn from_spend(value: Decimal, bounds: [i64; 3]) -> Self {
        let [premium, high, mid] = bounds;
        if value > Decimal::from(premium) {
            Self::Premium
        } else if value > Decimal::from(high) {
            Self::HighValue
        } else if value > Decimal::from(mid) {
            Self::MidValue
        } else {
            Self::Basic
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Implement,
    Consider,
    Evaluate,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyRecommendation {
    pub domain: Domain,
    pub tier: Tier,
    pub offers: Vec<String>,
    pub cost: Decimal,
    pub revenue_lift: Decimal,
    pub roi_pct: Decimal,
    pub recommendation: Recommendation,
}

/// Hotel stays are tiered on the total, restaurant bookings on spend per cover.
pub fn classify(prediction: &PredictionResult) -> Tier {
    match prediction.domain {
        Domain::Hotel => Tier::from_spend(prediction.total, [500, 300, 150]),
        Domain::Restaurant => Tier::from_spend(prediction.per_unit, [40, 25, 15]),
    }
}

pub fn roi_pct(cost: Decimal, revenue_lift: Decimal) -> Decimal {
    if cost.is_zero() {
        return Decimal::ZERO;
    }
    (revenue_lift - cost) / cost * Decimal::ONE_HUNDRED
}

pub fn recommend(domain: Domain, roi_pct: Decimal) -> Recommendation {
    let (implement, consider) = match domain {
        Domain::Hotel => (100, 50),
        Domain::Restaurant => (150, 80),
    };
    if roi_pct > Decimal::from(implement) {
        Recommendation::Implement
    } else if roi_pct > Decimal::from(consider) {
        Recommendation::Consider
    } else {
        Recommendation::Evaluate
    }
}

pub fn generate_strategy(domain: Domain, tier: Tier) -> StrategyRecommendation {
    let (cost, lift) = offers::economics(domain, tier);
    let cost = Decimal::from(cost);
    let revenue_lift = Decimal::from(lift);
    let roi_pct = roi_pct(cost, revenue_lift);

    StrategyRecommendation {
        domain,
        tier,
        offers: offers::offers(domain, tier).iter().map(|offer| offer.to_string()).collect(),
        cost,
        revenue_lift,
        roi_pct,
        recommendation: recommend(domain, roi_pct),
    }
}
