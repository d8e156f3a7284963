//! Spend scoring
//!
//! Combines the model's estimate of the variable spend with the fixed, rule-based part
//! of the bill. Money is carried as [`Decimal`] so that `total = base + incidental`
//! holds exactly; the model estimate enters rounded to cents.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Domain, Season};
use crate::domain::hotel::{HotelReservation, RoomType};
use crate::domain::restaurant::{MealPeriod, RestaurantReservation};
use crate::encoding::FeatureVector;
use crate::errors::EngineError;
use crate::ml::FittedModel;

pub const HOTEL_NIGHTLY_RATE: Decimal = Decimal::from_parts(120, 0, 0, false, 0);
pub const RESTAURANT_FLOOR_PER_PERSON: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub domain: Domain,
    /// Nights for a hotel stay, covers for a restaurant booking.
    pub unit_count: u32,
    pub base_component: Decimal,
    pub incidental_component: Decimal,
    pub total: Decimal,
    pub per_unit: Decimal,
    pub raw_model_estimate: f64,
    pub ratios: DomainRatios,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainRatios {
    Hotel {
        room_share_pct: Decimal,
        extras_share_pct: Decimal,
    },
    Restaurant {
        list_price_per_person: Decimal,
        estimated_margin: Decimal,
        margin_share_pct: Decimal,
    },
}

pub fn room_coefficient(room: RoomType) -> Decimal {
    match room {
        RoomType::Standard => Decimal::ONE,
        RoomType::Superior => Decimal::new(13, 1),
        RoomType::Suite => Decimal::new(18, 1),
        RoomType::Familiar => Decimal::new(11, 1),
    }
}

pub fn season_coefficient(season: Season) -> Decimal {
    match season {
        Season::High => Decimal::new(14, 1),
        Season::Low => Decimal::new(8, 1),
        Season::Mid => Decimal::ONE,
    }
}

/// Undiscounted menu price per cover.
pub fn list_price_per_person(period: MealPeriod, tasting_menu: bool) -> Decimal {
    let price = match period {
        MealPeriod::Dinner => Decimal::from(25),
        MealPeriod::Lunch | MealPeriod::Snack => Decimal::from(15),
    };
    if tasting_menu {
        price * Decimal::new(25, 1)
    } else {
        price
    }
}

pub fn score_hotel(
    model: &FittedModel,
    features: &FeatureVector,
    stay: &HotelReservation,
) -> Result<PredictionResult, EngineError> {
    stay.validate()?;
    let raw = model.predict(features)?;

    let nights = Decimal::from(stay.nights);
    let base = HOTEL_NIGHTLY_RATE
        * nights
        * room_coefficient(stay.room()?)
        * season_coefficient(stay.season());
    let incidental = money(raw.max(0.0))?;
    let total = base + incidental;

    Ok(PredictionResult {
        domain: Domain::Hotel,
        unit_count: stay.nights,
        base_component: base,
        incidental_component: incidental,
        total,
        per_unit: total / nights,
        raw_model_estimate: raw,
        ratios: DomainRatios::Hotel {
            room_share_pct: share_pct(base, total),
            extras_share_pct: share_pct(incidental, total),
        },
    })
}

/// The party-size floor is the base component; anything the model expects above it is
/// incidental.
pub fn score_restaurant(
    model: &FittedModel,
    features: &FeatureVector,
    booking: &RestaurantReservation,
) -> Result<PredictionResult, EngineError> {
    booking.validate()?;
    let raw = model.predict(features)?;

    let covers = Decimal::from(booking.party_size);
    let floor = covers * RESTAURANT_FLOOR_PER_PERSON;
    let total = money(raw.max(0.0))?.max(floor);
    let margin = (money(raw)? * Decimal::new(3, 1)).round_dp(2);

    Ok(PredictionResult {
        domain: Domain::Restaurant,
        unit_count: booking.party_size,
        base_component: floor,
        incidental_component: total - floor,
        total,
        per_unit: total / covers,
        raw_model_estimate: raw,
        ratios: DomainRatios::Restaurant {
            list_price_per_person: list_price_per_person(
                booking.meal_period()?,
                booking.tasting_menu,
            ),
            estimated_margin: margin,
            margin_share_pct: share_pct(margin, total),
        },
    })
}

fn money(value: f64) -> Result<Decimal, EngineError> {
    Decimal::from_f64(value).map(|amount| amount.round_dp(2)).ok_or(EngineError::NonFiniteEstimate)
}

fn share_pct(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    (part / total * Decimal::ONE_HUNDRED).round_dp(2)
}
