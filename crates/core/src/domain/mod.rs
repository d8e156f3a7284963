pub mod hotel;
pub mod restaurant;

use crate::errors::EngineError;

pub(crate) fn ensure_range(field: &str, value: u32, min: u32, max: u32) -> Result<(), EngineError> {
    if (min..=max).contains(&value) {
        return Ok(());
    }
    Err(EngineError::OutOfRange {
        field: field.to_owned(),
        value: i64::from(value),
        min: i64::from(min),
        max: i64::from(max),
    })
}
