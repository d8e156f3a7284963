//! Deterministic synthetic history for both domains.
//!
//! Rows are generated from random but valid reservations, encoded with the production
//! encoder, and completed with a target that depends on the encoded fields, so a model
//! trained on them has signal to find. Used by the `seed` command and by tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::{self, Domain, SchemaCatalog};
use crate::dataset::HistoricalDataset;
use crate::domain::hotel::HotelReservation;
use crate::domain::restaurant::{MealPeriod, RestaurantReservation};
use crate::encoding::{encode_hotel, encode_restaurant, FeatureVector};
use crate::errors::EngineError;
use crate::scoring::{room_coefficient, season_coefficient, HOTEL_NIGHTLY_RATE};

pub fn hotel_history(rows: usize, seed: u64) -> Result<HistoricalDataset, EngineError> {
    let catalog = SchemaCatalog::standard();
    let schema = catalog.schema(Domain::Hotel);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut columns = schema.feature_columns();
    columns.push(catalog::hotel::TARGET.to_owned());
    columns.extend(catalog::hotel::EXCLUDED.iter().map(|column| column.to_string()));

    let mut table = Vec::with_capacity(rows);
    for _ in 0..rows {
        let stay = random_stay(&mut rng);
        let mut features = encode_hotel(&stay, schema)?;
        vary(&mut features, &mut rng, "rating_limpeza");
        vary(&mut features, &mut rng, "rating_staff");
        vary(&mut features, &mut rng, "rating_localizacao");
        vary(&mut features, &mut rng, "rating_geral");
        features.set("fez_reclamacao", chance(&mut rng, 0.1));
        features.set("desconto_aplicado", chance(&mut rng, 0.2));
        features.set("cliente_frequente", chance(&mut rng, 0.25));

        let nights = f64::from(stay.nights);
        let guests = f64::from(stay.guests);
        let room = stay.room()?;
        let list_rate =
            HOTEL_NIGHTLY_RATE * room_coefficient(room) * season_coefficient(stay.season());
        let nightly_rate = f64::try_from(list_rate).unwrap_or(120.0) * rng.gen_range(0.9..1.1);

        let spa =
            if stay.spa_interest { rng.gen_range(60.0..140.0) * guests.min(2.0) } else { 0.0 };
        let room_service =
            if stay.room_service { 18.0 * nights * rng.gen_range(0.6..1.2) } else { 0.0 };
        let minibar = nights * rng.gen_range(2.0..12.0);
        let bar = guests * nights * rng.gen_range(3.0..9.0);
        let mut other = 0.0;
        if stay.late_checkout {
            other += 25.0;
        }
        if stay.parking {
            other += 12.0 * nights;
        }
        if stay.airport_transfer {
            other += 45.0;
        }
        if stay.board == "Meia_Pensao" {
            other += 15.0 * guests * nights;
        }
        if room.is_premium() {
            other += 10.0 * nights;
        }

        let mut row = features.values().to_vec();
        row.push(cents(spa + room_service + minibar + bar + other));
        // gasto_quarto_total, preco_quarto_noite, consumo_minibar, consumo_bar_hotel, gasto_spa
        row.extend([
            cents(nightly_rate * nights),
            cents(nightly_rate),
            cents(minibar),
            cents(bar),
            cents(spa),
        ]);
        table.push(row);
    }

    HistoricalDataset::new(columns, table)
}

pub fn restaurant_history(rows: usize, seed: u64) -> Result<HistoricalDataset, EngineError> {
    let catalog = SchemaCatalog::standard();
    let schema = catalog.schema(Domain::Restaurant);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut columns = schema.feature_columns();
    columns.push(catalog::restaurant::TARGET.to_owned());
    columns.extend(catalog::restaurant::EXCLUDED.iter().map(|column| column.to_string()));

    let mut table = Vec::with_capacity(rows);
    for _ in 0..rows {
        let booking = random_booking(&mut rng);
        let mut features = encode_restaurant(&booking, schema)?;
        vary(&mut features, &mut rng, "rating_comida");
        vary(&mut features, &mut rng, "rating_servico");
        vary(&mut features, &mut rng, "rating_ambiente");
        features.set("tempo_espera_min", f64::from(rng.gen_range(0u32..=30)));
        features.set("fez_reclamacao", chance(&mut rng, 0.08));

        let party = f64::from(booking.party_size);
        let mut per_person = match booking.meal_period()? {
            MealPeriod::Dinner => 25.0,
            MealPeriod::Lunch | MealPeriod::Snack => 15.0,
        };
        if booking.tasting_menu {
            per_person *= 2.5;
        }
        per_person *= rng.gen_range(0.85..1.2);
        if booking.wine_interest {
            per_person += 9.0;
        }
        if booking.dessert {
            per_person += 5.0;
        }
        if booking.is_vip() {
            per_person += 6.0;
        }
        if booking.special_occasion {
            per_person += 4.0;
        }

        let total = cents(party * per_person + rng.gen_range(-5.0..5.0)).max(party * 10.0);

        let mut row = features.values().to_vec();
        row.push(total);
        // preco_medio_pessoa, rating_geral
        row.extend([cents(total / party), tenths(rng.gen_range(3.5..5.0))]);
        table.push(row);
    }

    HistoricalDataset::new(columns, table)
}

fn random_stay(rng: &mut StdRng) -> HotelReservation {
    let lead_time_days =
        if rng.gen_bool(0.2) { rng.gen_range(0..7) } else { rng.gen_range(7..=120) };
    HotelReservation {
        nights: rng.gen_range(1..=7),
        guests: rng.gen_range(1..=4),
        lead_time_days,
        room_type: pick(rng, catalog::hotel::ROOM_TYPES),
        month: rng.gen_range(1..=12),
        weekend: rng.gen_bool(0.4),
        holiday: rng.gen_bool(0.1),
        city_event: rng.gen_bool(0.15),
        trip_purpose: pick(rng, catalog::hotel::TRIP_PURPOSES),
        spa_interest: rng.gen_bool(0.35),
        room_service: rng.gen_bool(0.3),
        late_checkout: rng.gen_bool(0.2),
        parking: rng.gen_bool(0.3),
        airport_transfer: rng.gen_bool(0.15),
        board: pick(rng, catalog::hotel::BOARDS),
        booking_channel: pick(rng, catalog::hotel::BOOKING_CHANNELS),
    }
}

fn random_booking(rng: &mut StdRng) -> RestaurantReservation {
    RestaurantReservation {
        party_size: rng.gen_range(1..=8),
        period: pick(rng, catalog::restaurant::PERIODS),
        weekday: pick(rng, catalog::restaurant::WEEKDAYS),
        month: rng.gen_range(1..=12),
        special_table: rng.gen_bool(0.15),
        children: rng.gen_bool(0.25),
        special_occasion: rng.gen_bool(0.2),
        holiday: rng.gen_bool(0.1),
        local_event: rng.gen_bool(0.1),
        wine_interest: rng.gen_bool(0.4),
        dessert: rng.gen_bool(0.5),
        tasting_menu: rng.gen_bool(0.1),
        customer_type: pick(rng, catalog::restaurant::CUSTOMER_TYPES),
        booking_channel: pick(rng, catalog::restaurant::BOOKING_CHANNELS),
    }
}

fn pick(rng: &mut StdRng, values: &[&str]) -> String {
    values[rng.gen_range(0..values.len())].to_owned()
}

fn vary(features: &mut FeatureVector, rng: &mut StdRng, column: &str) {
    features.set(column, tenths(rng.gen_range(3.0..5.0)));
}

fn chance(rng: &mut StdRng, probability: f64) -> f64 {
    if rng.gen_bool(probability) {
        1.0
    } else {
        0.0
    }
}

fn cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
