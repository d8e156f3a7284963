use super::Tier;
use crate::catalog::Domain;

const HOTEL_PREMIUM: &[&str] = &[
    "Free upgrade to a superior suite",
    "Welcome drink served in the room",
    "50% off spa treatments",
    "Free airport transfer",
    "Free late checkout",
];
const HOTEL_HIGH_VALUE: &[&str] = &[
    "Free room upgrade",
    "Free breakfast for the whole group",
    "30% off spa treatments",
    "Free premium WiFi",
];
const HOTEL_MID_VALUE: &[&str] = &[
    "Free breakfast for one guest",
    "20% off spa treatments",
    "Special in-room amenities",
];
const HOTEL_BASIC: &[&str] = &[
    "10% off breakfast",
    "Welcome gift at check-in",
    "Free WiFi for the whole stay",
];

const RESTAURANT_PREMIUM: &[&str] = &[
    "Complimentary starter or amuse-bouche",
    "Wine tasting at 20% off",
    "Special house dessert",
    "Complimentary digestifs",
    "Priority on future bookings",
];
const RESTAURANT_HIGH_VALUE: &[&str] = &[
    "Starter at 50% off",
    "Bottle of wine at 15% off",
    "Dessert at 30% off",
    "Complimentary coffee",
];
const RESTAURANT_MID_VALUE: &[&str] = &[
    "Starter offered with the main course",
    "Dessert at 20% off",
    "Coffee or tea on the house",
];
const RESTAURANT_BASIC: &[&str] = &[
    "Special bread starter on the house",
    "Coffee offered with dessert",
    "House birthday gift",
];

/// Ordered offer list for a tier; the first entry is the headline offer.
pub fn offers(domain: Domain, tier: Tier) -> &'static [&'static str] {
    match (domain, tier) {
        (Domain::Hotel, Tier::Premium) => HOTEL_PREMIUM,
        (Domain::Hotel, Tier::HighValue) => HOTEL_HIGH_VALUE,
        (Domain::Hotel, Tier::MidValue) => HOTEL_MID_VALUE,
        (Domain::Hotel, Tier::Basic) => HOTEL_BASIC,
        (Domain::Restaurant, Tier::Premium) => RESTAURANT_PREMIUM,
        (Domain::Restaurant, Tier::HighValue) => RESTAURANT_HIGH_VALUE,
        (Domain::Restaurant, Tier::MidValue) => RESTAURANT_MID_VALUE,
        (Domain::Restaurant, Tier::Basic) => RESTAURANT_BASIC,
    }
}

/// Intervention cost and expected revenue lift, in whole currency units.
pub fn economics(domain: Domain, tier: Tier) -> (i64, i64) {
    match (domain, tier) {
        (Domain::Hotel, Tier::Premium) => (80, 150),
        (Domain::Hotel, Tier::HighValue) => (50, 100),
        (Domain::Hotel, Tier::MidValue) => (30, 60),
        (Domain::Hotel, Tier::Basic) => (15, 25),
        (Domain::Restaurant, Tier::Premium) => (15, 35),
        (Domain::Restaurant, Tier::HighValue) => (10, 20),
        (Domain::Restaurant, Tier::MidValue) => (5, 12),
        (Domain::Restaurant, Tier::Basic) => (3, 6),
    }
}
