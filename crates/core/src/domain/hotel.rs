use serde::{Deserialize, Serialize};

use super::ensure_range;
use crate::catalog::Season;
use crate::errors::EngineError;

pub const MAX_NIGHTS: u32 = 14;
pub const MAX_GUESTS: u32 = 6;
pub const MAX_LEAD_TIME_DAYS: u32 = 365;

/// Raw hotel booking form. Categorical fields hold the dataset's category labels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelReservation {
    pub nights: u32,
    pub guests: u32,
    pub lead_time_days: u32,
    pub room_type: String,
    pub month: u32,
    #[serde(default)]
    pub weekend: bool,
    #[serde(default)]
    pub holiday: bool,
    #[serde(default)]
    pub city_event: bool,
    pub trip_purpose: String,
    #[serde(default)]
    pub spa_interest: bool,
    #[serde(default)]
    pub room_service: bool,
    #[serde(default)]
    pub late_checkout: bool,
    #[serde(default)]
    pub parking: bool,
    #[serde(default)]
    pub airport_transfer: bool,
    pub board: String,
    pub booking_channel: String,
}

impl HotelReservation {
    pub fn validate(&self) -> Result<(), EngineError> {
        ensure_range("noites", self.nights, 1, MAX_NIGHTS)?;
        ensure_range("num_hospedes", self.guests, 1, MAX_GUESTS)?;
        ensure_range("antecedencia_dias", self.lead_time_days, 0, MAX_LEAD_TIME_DAYS)?;
        ensure_range("mes", self.month, 1, 12)?;
        Ok(())
    }

    pub fn season(&self) -> Season {
        Season::for_month(self.month)
    }

    pub fn room(&self) -> Result<RoomType, EngineError> {
        self.room_type.parse()
    }

    pub fn books_early(&self) -> bool {
        self.lead_time_days > 30
    }

    pub fn books_last_minute(&self) -> bool {
        self.lead_time_days < 7
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Standard,
    Superior,
    Suite,
    Familiar,
}

impl RoomType {
    pub fn is_premium(&self) -> bool {
        matches!(self, Self::Suite | Self::Superior)
    }
}

impl std::str::FromStr for RoomType {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Standard" => Ok(Self::Standard),
            "Superior" => Ok(Self::Superior),
            "Suite" => Ok(Self::Suite),
            "Familiar" => Ok(Self::Familiar),
            other => Err(EngineError::unknown_category("tipo_quarto", other)),
        }
    }
}
