use serde::{Deserialize, Serialize};

use super::ensure_range;
use crate::errors::EngineError;

pub const MAX_PARTY_SIZE: u32 = 12;

/// Raw restaurant booking form. Categorical fields hold the dataset's category labels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantReservation {
    pub party_size: u32,
    pub period: String,
    pub weekday: String,
    pub month: u32,
    #[serde(default)]
    pub special_table: bool,
    #[serde(default)]
    pub children: bool,
    #[serde(default)]
    pub special_occasion: bool,
    #[serde(default)]
    pub holiday: bool,
    #[serde(default)]
    pub local_event: bool,
    #[serde(default)]
    pub wine_interest: bool,
    #[serde(default)]
    pub dessert: bool,
    #[serde(default)]
    pub tasting_menu: bool,
    pub customer_type: String,
    pub booking_channel: String,
}

impl RestaurantReservation {
    pub fn validate(&self) -> Result<(), EngineError> {
        ensure_range("num_pessoas", self.party_size, 1, MAX_PARTY_SIZE)?;
        ensure_range("mes", self.month, 1, 12)?;
        Ok(())
    }

    pub fn meal_period(&self) -> Result<MealPeriod, EngineError> {
        self.period.parse()
    }

    pub fn is_vip(&self) -> bool {
        self.customer_type == "VIP"
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealPeriod {
    Lunch,
    Dinner,
    Snack,
}

impl std::str::FromStr for MealPeriod {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Almoco" => Ok(Self::Lunch),
            "Jantar" => Ok(Self::Dinner),
            "Lanche" => Ok(Self::Snack),
            other => Err(EngineError::unknown_category("periodo", other)),
        }
    }
}
