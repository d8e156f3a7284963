use std::sync::OnceLock;

use proptest::prelude::*;
use rust_decimal::Decimal;
use stayscore_core::catalog::{hotel, restaurant};
use stayscore_core::probability::{estimate_hotel, estimate_restaurant};
use stayscore_core::scoring::{score_hotel, score_restaurant};
use stayscore_core::strategy::{recommend, roi_pct};
use stayscore_core::{
    classify, encode_hotel, encode_restaurant, fixtures, Behavior, Domain, DomainRatios,
    FittedModel, ForestParams, HotelReservation, PredictionResult, Recommendation,
    RestaurantReservation, SchemaCatalog, Tier, PROBABILITY_CAP,
};

fn trained(domain: Domain) -> &'static FittedModel {
    static HOTEL: OnceLock<FittedModel> = OnceLock::new();
    static RESTAURANT: OnceLock<FittedModel> = OnceLock::new();

    let cell = match domain {
        Domain::Hotel => &HOTEL,
        Domain::Restaurant => &RESTAURANT,
    };
    cell.get_or_init(|| {
        let history = match domain {
            Domain::Hotel => fixtures::hotel_history(80, 5),
            Domain::Restaurant => fixtures::restaurant_history(80, 5),
        }
        .expect("fixture history should generate");
        let catalog = SchemaCatalog::standard();
        let params = ForestParams { n_trees: 8, ..ForestParams::default() };
        stayscore_core::ml::train(&history, catalog.schema(domain), &params)
            .expect("fixture history should train")
    })
}

fn hotel_stay() -> impl Strategy<Value = HotelReservation> {
    (
        (1u32..=14, 1u32..=6, 0u32..=365, 1u32..=12),
        (
            prop::sample::select(hotel::ROOM_TYPES),
            prop::sample::select(hotel::TRIP_PURPOSES),
            prop::sample::select(hotel::BOARDS),
            prop::sample::select(hotel::BOOKING_CHANNELS),
        ),
        prop::array::uniform8(any::<bool>()),
    )
        .prop_map(|((nights, guests, lead, month), (room, purpose, board, channel), flags)| {
            HotelReservation {
                nights,
                guests,
                lead_time_days: lead,
                room_type: room.to_owned(),
                month,
                weekend: flags[0],
                holiday: flags[1],
                city_event: flags[2],
                trip_purpose: purpose.to_owned(),
                spa_interest: flags[3],
                room_service: flags[4],
                late_checkout: flags[5],
                parking: flags[6],
                airport_transfer: flags[7],
                board: board.to_owned(),
                booking_channel: channel.to_owned(),
            }
        })
}

fn restaurant_booking() -> impl Strategy<Value = RestaurantReservation> {
    (
        (1u32..=12, 1u32..=12),
        (
            prop::sample::select(restaurant::PERIODS),
            prop::sample::select(restaurant::WEEKDAYS),
            prop::sample::select(restaurant::CUSTOMER_TYPES),
            prop::sample::select(restaurant::BOOKING_CHANNELS),
        ),
        prop::array::uniform8(any::<bool>()),
    )
        .prop_map(|((party, month), (period, weekday, customer, channel), flags)| {
            RestaurantReservation {
                party_size: party,
                period: period.to_owned(),
                weekday: weekday.to_owned(),
                month,
                special_table: flags[0],
                children: flags[1],
                special_occasion: flags[2],
                holiday: flags[3],
                local_event: flags[4],
                wine_interest: flags[5],
                dessert: flags[6],
                tasting_menu: flags[7],
                customer_type: customer.to_owned(),
                booking_channel: channel.to_owned(),
            }
        })
}

fn hotel_prediction(total: Decimal) -> PredictionResult {
    PredictionResult {
        domain: Domain::Hotel,
        unit_count: 1,
        base_component: total,
        incidental_component: Decimal::ZERO,
        total,
        per_unit: total,
        raw_model_estimate: 0.0,
        ratios: DomainRatios::Hotel {
            room_share_pct: Decimal::ONE_HUNDRED,
            extras_share_pct: Decimal::ZERO,
        },
    }
}

fn restaurant_prediction(total: Decimal, covers: u32) -> PredictionResult {
    PredictionResult {
        domain: Domain::Restaurant,
        unit_count: covers,
        base_component: total,
        incidental_component: Decimal::ZERO,
        total,
        per_unit: total / Decimal::from(covers),
        raw_model_estimate: 0.0,
        ratios: DomainRatios::Restaurant {
            list_price_per_person: Decimal::from(25),
            estimated_margin: Decimal::ZERO,
            margin_share_pct: Decimal::ZERO,
        },
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn hotel_encoding_emits_exactly_the_schema_columns(stay in hotel_stay()) {
        let catalog = SchemaCatalog::standard();
        let schema = catalog.schema(Domain::Hotel);
        let expected = schema.feature_columns();
        let features = encode_hotel(&stay, schema).expect("valid stay should encode");

        prop_assert_eq!(features.columns(), expected.as_slice());
        prop_assert!(features.values().iter().all(|value| value.is_finite()));
        prop_assert_eq!(
            features.get(&format!("tipo_quarto_{}", stay.room_type)),
            Some(1.0)
        );
    }

    #[test]
    fn restaurant_encoding_emits_exactly_the_schema_columns(booking in restaurant_booking()) {
        let catalog = SchemaCatalog::standard();
        let schema = catalog.schema(Domain::Restaurant);
        let expected = schema.feature_columns();
        let features = encode_restaurant(&booking, schema).expect("valid booking should encode");

        prop_assert_eq!(features.columns(), expected.as_slice());
        for excluded in restaurant::EXCLUDED {
            prop_assert!(features.get(excluded).is_none());
        }
    }

    #[test]
    fn hotel_total_is_base_plus_incidentals(stay in hotel_stay()) {
        let catalog = SchemaCatalog::standard();
        let features = encode_hotel(&stay, catalog.schema(Domain::Hotel)).expect("encodes");
        let prediction = score_hotel(trained(Domain::Hotel), &features, &stay).expect("scores");

        prop_assert_eq!(
            prediction.total,
            prediction.base_component + prediction.incidental_component
        );
        prop_assert!(prediction.incidental_component >= Decimal::ZERO);
        prop_assert!(prediction.base_component > Decimal::ZERO);
        prop_assert_eq!(prediction.per_unit, prediction.total / Decimal::from(stay.nights));
    }

    #[test]
    fn restaurant_total_never_drops_below_the_party_floor(booking in restaurant_booking()) {
        let catalog = SchemaCatalog::standard();
        let features =
            encode_restaurant(&booking, catalog.schema(Domain::Restaurant)).expect("encodes");
        let prediction =
            score_restaurant(trained(Domain::Restaurant), &features, &booking).expect("scores");

        prop_assert!(prediction.total >= Decimal::from(15 * booking.party_size));
        prop_assert_eq!(
            prediction.total,
            prediction.base_component + prediction.incidental_component
        );
        prop_assert_eq!(
            prediction.per_unit,
            prediction.total / Decimal::from(booking.party_size)
        );
    }

    #[test]
    fn hotel_probabilities_stay_between_baseline_and_cap(
        stay in hotel_stay(),
        total in 0i64..2_000,
    ) {
        let estimate = estimate_hotel(&stay, &hotel_prediction(Decimal::from(total)))
            .expect("valid stay should estimate");

        let spa = estimate.get(Behavior::Spa).expect("spa is always estimated");
        let return_visit = estimate.get(Behavior::ReturnVisit).expect("return is always estimated");
        prop_assert!((0.3..=PROBABILITY_CAP).contains(&spa));
        prop_assert!((0.6..=PROBABILITY_CAP).contains(&return_visit));
    }

    #[test]
    fn restaurant_probabilities_never_exceed_the_cap(booking in restaurant_booking()) {
        let catalog = SchemaCatalog::standard();
        let features =
            encode_restaurant(&booking, catalog.schema(Domain::Restaurant)).expect("encodes");
        let prediction =
            score_restaurant(trained(Domain::Restaurant), &features, &booking).expect("scores");
        let estimate = estimate_restaurant(&booking, &prediction).expect("estimates");

        prop_assert_eq!(estimate.iter().count(), 3);
        for (_, probability) in estimate.iter() {
            prop_assert!(probability > 0.0 && probability <= PROBABILITY_CAP);
        }
    }

    #[test]
    fn higher_totals_never_land_in_a_lower_tier(a in 0i64..1_000, b in 0i64..1_000) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_tier = classify(&hotel_prediction(Decimal::from(low)));
        let high_tier = classify(&hotel_prediction(Decimal::from(high)));

        prop_assert!(low_tier <= high_tier);
        prop_assert!(Tier::Basic <= low_tier);
    }

    #[test]
    fn restaurant_tier_follows_spend_per_cover(
        a in 0i64..2_000,
        b in 0i64..2_000,
        covers in 1u32..=12,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_tier = classify(&restaurant_prediction(Decimal::from(low), covers));
        let high_tier = classify(&restaurant_prediction(Decimal::from(high), covers));
        prop_assert!(low_tier <= high_tier);

        let larger_party = classify(&restaurant_prediction(Decimal::from(high), covers + 1));
        prop_assert!(larger_party <= high_tier);
    }

    #[test]
    fn roi_recommendation_follows_its_thresholds(cost in 1i64..10_000, lift in 0i64..40_000) {
        let roi = roi_pct(Decimal::from(cost), Decimal::from(lift));
        let hotel = recommend(Domain::Hotel, roi);

        prop_assert_eq!(roi > Decimal::from(100), hotel == Recommendation::Implement);
        prop_assert_eq!(lift > cost, roi > Decimal::ZERO);
    }
}
