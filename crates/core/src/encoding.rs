//! Feature encoding
//!
//! Turns a raw reservation into a [`FeatureVector`] whose columns match the training
//! schema of the domain's historical dataset, one-hot expanding every categorical field
//! over its full enumeration so the column set never depends on the input.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{DomainSchema, Season};
use crate::domain::hotel::HotelReservation;
use crate::domain::restaurant::RestaurantReservation;
use crate::errors::EngineError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns.iter().position(|name| name == column).map(|index| self.values[index])
    }

    pub(crate) fn set(&mut self, column: &str, value: f64) -> bool {
        match self.columns.iter().position(|name| name == column) {
            Some(index) => {
                self.values[index] = value;
                true
            }
            None => false,
        }
    }
}

/// Collects raw field values, then projects them onto the schema's feature columns.
pub struct FeatureEncoder<'a> {
    schema: &'a DomainSchema,
    fields: HashMap<String, f64>,
}

impl<'a> FeatureEncoder<'a> {
    pub fn new(schema: &'a DomainSchema) -> Self {
        Self { schema, fields: HashMap::new() }
    }

    pub fn numeric(mut self, column: &str, value: f64) -> Self {
        self.fields.insert(column.to_owned(), value);
        self
    }

    pub fn flag(self, column: &str, value: bool) -> Self {
        self.numeric(column, if value { 1.0 } else { 0.0 })
    }

    /// One-hot expands `value` over every enumerated category of `field`.
    pub fn category(mut self, field: &str, value: &str) -> Result<Self, EngineError> {
        let categorical = self
            .schema
            .categorical(field)
            .ok_or_else(|| EngineError::unknown_category("field", field))?;
        if !categorical.contains(value) {
            return Err(EngineError::unknown_category(field, value));
        }

        for known in categorical.values {
            let chosen = if *known == value { 1.0 } else { 0.0 };
            self.fields.insert(categorical.column(known), chosen);
        }
        Ok(self)
    }

    /// Month one-hot, plus the derived season when the schema asks for it.
    pub fn month(self, month: u32) -> Result<Self, EngineError> {
        let derives_season = self.schema.derives_season;
        let encoder = self.category("mes", &month.to_string())?;
        if derives_season {
            return encoder.category("epoca", Season::for_month(month).label());
        }
        Ok(encoder)
    }

    pub fn finish(self) -> FeatureVector {
        let columns = self.schema.feature_columns();
        let values = columns
            .iter()
            .map(|column| {
                self.fields
                    .get(column)
                    .copied()
                    .or_else(|| self.schema.placeholder(column))
                    .unwrap_or(0.0)
            })
            .collect();

        FeatureVector { columns, values }
    }
}

pub fn encode_hotel(
    stay: &HotelReservation,
    schema: &DomainSchema,
) -> Result<FeatureVector, EngineError> {
    stay.validate()?;

    let encoder = FeatureEncoder::new(schema)
        .numeric("noites", f64::from(stay.nights))
        .numeric("antecedencia_dias", f64::from(stay.lead_time_days))
        .numeric("num_hospedes", f64::from(stay.guests))
        .flag("fim_semana", stay.weekend)
        .flag("feriado", stay.holiday)
        .flag("evento_cidade", stay.city_event)
        .flag("foi_spa", stay.spa_interest)
        .flag("num_massagens", stay.spa_interest)
        .flag("pediu_room_service", stay.room_service)
        .flag("num_vezes_room_service", stay.room_service)
        .flag("late_checkout", stay.late_checkout)
        .flag("estacionamento", stay.parking)
        .flag("transfer_aeroporto", stay.airport_transfer)
        .flag("reserva_antecipada", stay.books_early())
        .flag("reserva_ultimo_minuto", stay.books_last_minute())
        .category("tipo_quarto", &stay.room_type)?
        .category("motivo_viagem", &stay.trip_purpose)?
        .category("canal_reserva", &stay.booking_channel)?
        .category("regime", &stay.board)?
        .month(stay.month)?;

    Ok(encoder.finish())
}

pub fn encode_restaurant(
    booking: &RestaurantReservation,
    schema: &DomainSchema,
) -> Result<FeatureVector, EngineError> {
    booking.validate()?;

    let encoder = FeatureEncoder::new(schema)
        .numeric("num_pessoas", f64::from(booking.party_size))
        .flag("mesa_especial", booking.special_table)
        .flag("criancas", booking.children)
        .flag("ocasiao_especial", booking.special_occasion)
        .flag("feriado", booking.holiday)
        .flag("evento_local", booking.local_event)
        .flag("vinho", booking.wine_interest)
        .flag("sobremesa", booking.dessert)
        .flag("menu_degustacao", booking.tasting_menu)
        .numeric("mes_num", f64::from(booking.month))
        .category("periodo", &booking.period)?
        .category("dia_semana", &booking.weekday)?
        .category("tipo_cliente", &booking.customer_type)?
        .category("canal_reserva", &booking.booking_channel)?
        .month(booking.month)?;

    Ok(encoder.finish())
}
