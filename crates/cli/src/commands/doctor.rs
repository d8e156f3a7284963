use serde::Serialize;
use stayscore_core::config::{AppConfig, LoadOptions};
use stayscore_core::ml::ensure_trainable;
use stayscore_core::{Domain, SchemaCatalog};

use crate::commands::load_dataset;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\
                 \"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            let catalog = SchemaCatalog::standard();
            checks.push(check_dataset(&config, &catalog, Domain::Hotel));
            checks.push(check_dataset(&config, &catalog, Domain::Restaurant));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["hotel_dataset", "restaurant_dataset"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

/// Loads the domain's history and checks it could train a model.
fn check_dataset(config: &AppConfig, catalog: &SchemaCatalog, domain: Domain) -> DoctorCheck {
    let name = match domain {
        Domain::Hotel => "hotel_dataset",
        Domain::Restaurant => "restaurant_dataset",
    };
    let path = config.data.dataset_path(domain);

    let dataset = match load_dataset(path) {
        Ok(dataset) => dataset,
        Err(error) => {
            return DoctorCheck { name, status: CheckStatus::Fail, details: error.to_string() };
        }
    };

    let schema = catalog.schema(domain);
    if let Err(error) = ensure_trainable(&dataset, schema) {
        return DoctorCheck { name, status: CheckStatus::Fail, details: error.to_string() };
    }

    DoctorCheck {
        name,
        status: CheckStatus::Pass,
        details: format!(
            "`{}` has {} rows matching the {domain} schema ({})",
            path.display(),
            dataset.len(),
            dataset.fingerprint()
        ),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
