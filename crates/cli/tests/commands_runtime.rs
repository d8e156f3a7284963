use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use stayscore_cli::commands::{config, doctor, predict, seed};
use stayscore_core::{fixtures, Domain};
use tempfile::TempDir;

const HOTEL_STAY: &str = r#"{
    "nights": 3,
    "guests": 2,
    "lead_time_days": 45,
    "room_type": "Suite",
    "month": 8,
    "weekend": true,
    "trip_purpose": "Lazer",
    "spa_interest": true,
    "board": "Pequeno_Almoco",
    "booking_channel": "Direto"
}"#;

const RESTAURANT_BOOKING: &str = r#"{
    "party_size": 4,
    "period": "Jantar",
    "weekday": "Sabado",
    "month": 12,
    "wine_interest": true,
    "special_occasion": true,
    "customer_type": "Habitual",
    "booking_channel": "Website"
}"#;

#[test]
fn seeded_histories_support_predictions_for_both_domains() {
    let dir = TempDir::new().expect("tempdir should be created");
    let seeded = seed::run(60, 7, Some(dir.path()));
    assert_eq!(seeded.exit_code, 0, "expected seed success: {}", seeded.output);

    let payload = parse_payload(&seeded.output);
    assert_eq!(payload["command"], "seed");
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["result"]["datasets"].as_array().map(Vec::len), Some(2));

    let hotel_input = write_input(&dir, "stay.json", HOTEL_STAY);
    let restaurant_input = write_input(&dir, "booking.json", RESTAURANT_BOOKING);

    with_env(&[("STAYSCORE_MODEL_TREES", "10")], || {
        let hotel_dataset = dir.path().join(seed::HOTEL_FILE);
        let result = predict::run(Domain::Hotel, &hotel_input, Some(&hotel_dataset));
        assert_eq!(result.exit_code, 0, "expected hotel assessment: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["result"]["domain"], "hotel");
        assert_eq!(payload["result"]["model"]["training_rows"], 60);
        assert!(payload["result"]["probabilities"]["spa"].as_f64().is_some());

        let restaurant_dataset = dir.path().join(seed::RESTAURANT_FILE);
        let result =
            predict::run(Domain::Restaurant, &restaurant_input, Some(&restaurant_dataset));
        assert_eq!(result.exit_code, 0, "expected restaurant assessment: {}", result.output);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["result"]["domain"], "restaurant");
        assert!(payload["result"]["probabilities"]["wine"].as_f64().is_some());
    });
}

#[test]
fn seeding_is_deterministic_for_a_fixed_seed() {
    let first_dir = TempDir::new().expect("tempdir should be created");
    let second_dir = TempDir::new().expect("tempdir should be created");

    let first = parse_payload(&seed::run(60, 11, Some(first_dir.path())).output);
    let second = parse_payload(&seed::run(60, 11, Some(second_dir.path())).output);

    for index in 0..2 {
        assert_eq!(
            first["result"]["datasets"][index]["fingerprint"],
            second["result"]["datasets"][index]["fingerprint"]
        );
    }
}

#[test]
fn seed_rejects_row_counts_too_small_to_train() {
    let dir = TempDir::new().expect("tempdir should be created");
    let result = seed::run(5, 42, Some(dir.path()));

    assert_eq!(result.exit_code, 3);
    let payload = parse_payload(&result.output);
    assert_eq!(payload["error_class"], "seed_rows");
    assert!(!dir.path().join(seed::HOTEL_FILE).exists());
}

#[test]
fn unknown_room_type_is_reported_as_bad_request() {
    let dir = TempDir::new().expect("tempdir should be created");
    seed::run(60, 3, Some(dir.path()));
    let input = write_input(&dir, "stay.json", &HOTEL_STAY.replace("Suite", "Penthouse"));

    with_env(&[("STAYSCORE_MODEL_TREES", "5")], || {
        let dataset = dir.path().join(seed::HOTEL_FILE);
        let result = predict::run(Domain::Hotel, &input, Some(&dataset));

        assert_eq!(result.exit_code, 3, "expected input violation code");
        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "unknown_category");
        assert!(payload["message"].as_str().is_some_and(|message| message.contains("Penthouse")));
    });
}

#[test]
fn malformed_reservation_json_is_an_input_parse_failure() {
    let dir = TempDir::new().expect("tempdir should be created");
    let input = write_input(&dir, "stay.json", "{\"nights\": \"three\"}");
    let dataset = dir.path().join(seed::HOTEL_FILE);

    with_env(&[], || {
        seed::run(60, 3, Some(dir.path()));
        let result = predict::run(Domain::Hotel, &input, Some(&dataset));

        assert_eq!(result.exit_code, 3);
        assert_eq!(parse_payload(&result.output)["error_class"], "input_parse");
    });
}

#[test]
fn missing_history_is_reported_as_unavailable_dataset() {
    let dir = TempDir::new().expect("tempdir should be created");
    let input = write_input(&dir, "stay.json", HOTEL_STAY);
    let missing = dir.path().join("nowhere").join(seed::HOTEL_FILE);

    with_env(&[("STAYSCORE_HOTEL_DATASET", path_str(&missing))], || {
        let result = predict::run(Domain::Hotel, &input, None);

        assert_eq!(result.exit_code, 4, "expected unavailable dataset code");
        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "dataset");
        assert!(payload["message"]
            .as_str()
            .is_some_and(|message| message.contains("correlation_id=predict:hotel:")));
    });
}

#[test]
fn malformed_input_is_reported_before_the_history_is_loaded() {
    let dir = TempDir::new().expect("tempdir should be created");
    let input = write_input(&dir, "stay.json", "{\"nights\": \"three\"}");
    let missing = dir.path().join("nowhere").join(seed::HOTEL_FILE);

    with_env(&[], || {
        let result = predict::run(Domain::Hotel, &input, Some(&missing));

        assert_eq!(result.exit_code, 3, "expected input failure to win: {}", result.output);
        assert_eq!(parse_payload(&result.output)["error_class"], "input_parse");
    });
}

#[test]
fn seed_without_out_dir_reports_invalid_config() {
    with_env(&[("STAYSCORE_MODEL_SEED", "-1")], || {
        let result = seed::run(60, 42, None);

        assert_eq!(result.exit_code, 2, "expected config validation failure code");
        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["error_class"], "config_validation");
        assert!(payload["message"]
            .as_str()
            .is_some_and(|message| message.contains("correlation_id=seed:60:42")));
    });
}

#[test]
fn invalid_model_env_fails_config_validation() {
    let dir = TempDir::new().expect("tempdir should be created");
    let input = write_input(&dir, "stay.json", HOTEL_STAY);

    with_env(&[("STAYSCORE_MODEL_TREES", "lots")], || {
        let result = predict::run(Domain::Hotel, &input, None);

        assert_eq!(result.exit_code, 2, "expected config validation failure code");
        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "predict");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn doctor_passes_when_both_histories_are_trainable() {
    let dir = TempDir::new().expect("tempdir should be created");
    seed::run(60, 42, Some(dir.path()));
    let hotel = dir.path().join(seed::HOTEL_FILE);
    let restaurant = dir.path().join(seed::RESTAURANT_FILE);

    with_env(
        &[
            ("STAYSCORE_HOTEL_DATASET", path_str(&hotel)),
            ("STAYSCORE_RESTAURANT_DATASET", path_str(&restaurant)),
        ],
        || {
            let payload = parse_payload(&doctor::run(true));
            assert_eq!(payload["overall_status"], "pass");
            assert_eq!(payload["checks"].as_array().map(Vec::len), Some(3));
        },
    );
}

#[test]
fn doctor_flags_missing_history_and_skips_after_config_failure() {
    let dir = TempDir::new().expect("tempdir should be created");
    let missing = dir.path().join("absent.json");

    with_env(
        &[
            ("STAYSCORE_HOTEL_DATASET", path_str(&missing)),
            ("STAYSCORE_RESTAURANT_DATASET", path_str(&missing)),
        ],
        || {
            let payload = parse_payload(&doctor::run(true));
            assert_eq!(payload["overall_status"], "fail");
            assert_eq!(payload["checks"][0]["status"], "pass");
            assert_eq!(payload["checks"][1]["name"], "hotel_dataset");
            assert_eq!(payload["checks"][1]["status"], "fail");
        },
    );

    with_env(&[("STAYSCORE_LOGGING_FORMAT", "xml")], || {
        let human = doctor::run(false);
        assert!(human.starts_with("doctor: one or more readiness checks failed"));
        assert!(human.contains("- [fail] config_validation"));
        assert!(human.contains("- [skip] hotel_dataset"));
    });
}

#[test]
fn doctor_fails_a_history_too_short_to_train() {
    let dir = TempDir::new().expect("tempdir should be created");
    seed::run(60, 42, Some(dir.path()));
    let hotel = dir.path().join(seed::HOTEL_FILE);
    let short = dir.path().join("short_restaurant.json");
    let history = fixtures::restaurant_history(5, 1).expect("history should generate");
    fs::write(&short, history.to_json().expect("history should serialize"))
        .expect("history should be written");

    with_env(
        &[
            ("STAYSCORE_HOTEL_DATASET", path_str(&hotel)),
            ("STAYSCORE_RESTAURANT_DATASET", path_str(&short)),
        ],
        || {
            let payload = parse_payload(&doctor::run(true));
            assert_eq!(payload["overall_status"], "fail");
            assert_eq!(payload["checks"][1]["status"], "pass");
            assert_eq!(payload["checks"][2]["name"], "restaurant_dataset");
            assert_eq!(payload["checks"][2]["status"], "fail");
            assert!(payload["checks"][2]["details"]
                .as_str()
                .is_some_and(|details| details.contains("5 rows")));
        },
    );
}

#[test]
fn config_output_attributes_env_overrides() {
    with_env(&[("STAYSCORE_MODEL_TREES", "25"), ("STAYSCORE_LOG_LEVEL", "debug")], || {
        let output = config::run();

        assert!(output.contains("- model.trees = 25 (source: env (STAYSCORE_MODEL_TREES))"));
        assert!(output.contains("- logging.level = debug (source: env (STAYSCORE_LOG_LEVEL))"));
        assert!(output.contains("- model.seed = 42 (source: default)"));
    });
}

fn write_input(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("input should be written");
    path
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp paths should be valid UTF-8")
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "STAYSCORE_HOTEL_DATASET",
        "STAYSCORE_RESTAURANT_DATASET",
        "STAYSCORE_MODEL_TREES",
        "STAYSCORE_MODEL_SEED",
        "STAYSCORE_MODEL_MAX_DEPTH",
        "STAYSCORE_MODEL_MIN_SAMPLES_SPLIT",
        "STAYSCORE_MODEL_MIN_SAMPLES_LEAF",
        "STAYSCORE_LOGGING_LEVEL",
        "STAYSCORE_LOGGING_FORMAT",
        "STAYSCORE_LOG_LEVEL",
        "STAYSCORE_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(test_fn));

    for (key, value) in previous_values {
        match value {
            Some(value) => env::set_var(key, value),
            None => env::remove_var(key),
        }
    }

    if let Err(panic) = outcome {
        std::panic::resume_unwind(panic);
    }
}
