use serde::{Deserialize, Serialize};

use crate::domain::hotel::HotelReservation;
use crate::domain::restaurant::{MealPeriod, RestaurantReservation};
use crate::errors::EngineError;
use crate::probability::{Behavior, ProbabilityEstimate};

/// Operational hint for front-of-house staff, attached next to the offer bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    WellnessFocus,
    EarlyPlanner,
    LastMinuteUpgrade,
    PremiumWineList,
    SpecialOccasion,
    LargeDinnerGroup,
    VipService,
}

impl Advisory {
    pub fn message(&self) -> &'static str {
        match self {
            Self::WellnessFocus => "High spa propensity: lead with wellness packages",
            Self::EarlyPlanner => "Early planner: offer advance-purchase perks",
            Self::LastMinuteUpgrade => "Last-minute booking: upgrade availability is likely",
            Self::PremiumWineList => "Strong wine interest: present the premium wine list",
            Self::SpecialOccasion => "Special occasion: prepare a personalised touch",
            Self::LargeDinnerGroup => "Large dinner group: suggest a shared set menu",
            Self::VipService => "VIP guest: assign senior service staff",
        }
    }
}

pub fn hotel_advisories(
    stay: &HotelReservation,
    probabilities: &ProbabilityEstimate,
) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    if probabilities.get(Behavior::Spa).is_some_and(|spa| spa > 0.7) {
        advisories.push(Advisory::WellnessFocus);
    }
    if stay.lead_time_days > 60 {
        advisories.push(Advisory::EarlyPlanner);
    }
    if stay.books_last_minute() {
        advisories.push(Advisory::LastMinuteUpgrade);
    }
    advisories
}

pub fn restaurant_advisories(
    booking: &RestaurantReservation,
    probabilities: &ProbabilityEstimate,
) -> Result<Vec<Advisory>, EngineError> {
    let mut advisories = Vec::new();
    if probabilities.get(Behavior::Wine).is_some_and(|wine| wine > 0.8) {
        advisories.push(Advisory::PremiumWineList);
    }
    if booking.special_occasion {
        advisories.push(Advisory::SpecialOccasion);
    }
    if booking.meal_period()? == MealPeriod::Dinner && booking.party_size > 6 {
        advisories.push(Advisory::LargeDinnerGroup);
    }
    if booking.is_vip() {
        advisories.push(Advisory::VipService);
    }
    Ok(advisories)
}
