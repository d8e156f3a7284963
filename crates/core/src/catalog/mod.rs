//! Schema catalog
//!
//! Static description of each historical dataset: which columns the encoder emits, which
//! categorical values exist, which columns are placeholders at prediction time, and which
//! columns must never reach the trainer because they are components of the target.

pub mod hotel;
pub mod restaurant;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::HistoricalDataset;
use crate::errors::EngineError;

pub const MONTH_VALUES: &[&str] = &["1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12"];
pub const SEASON_VALUES: &[&str] = &["Alta", "Baixa", "Media"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Hotel,
    Restaurant,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hotel => "hotel",
            Self::Restaurant => "restaurant",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Domain {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hotel" => Ok(Self::Hotel),
            "restaurant" => Ok(Self::Restaurant),
            other => Err(EngineError::unknown_category("domain", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    High,
    Low,
    Mid,
}

impl Season {
    /// Summer is high season, winter is low season, everything else is mid season.
    pub fn for_month(month: u32) -> Self {
        match month {
            7..=9 => Self::High,
            12 | 1 | 2 => Self::Low,
            _ => Self::Mid,
        }
    }

    /// Category label used by the historical datasets.
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "Alta",
            Self::Low => "Baixa",
            Self::Mid => "Media",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoricalField {
    pub name: &'static str,
    pub values: &'static [&'static str],
}

impl CategoricalField {
    pub fn column(&self, value: &str) -> String {
        format!("{}_{}", self.name, value)
    }

    pub fn columns(&self) -> impl Iterator<Item = String> + '_ {
        self.values.iter().map(move |value| self.column(value))
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|known| *known == value)
    }
}

/// Column whose real value is only known after the stay; filled with a neutral value.
#[derive(Clone, Debug, PartialEq)]
pub struct Placeholder {
    pub column: &'static str,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DomainSchema {
    pub domain: Domain,
    pub target: &'static str,
    /// Numeric and boolean columns taken from (or derived from) the raw description.
    pub direct_columns: &'static [&'static str],
    pub placeholders: Vec<Placeholder>,
    pub categoricals: Vec<CategoricalField>,
    /// Leakage columns present in the dataset but never used for training.
    pub excluded: &'static [&'static str],
    pub derives_season: bool,
}

impl DomainSchema {
    /// Training-schema columns in the order the encoder emits them.
    pub fn feature_columns(&self) -> Vec<String> {
        let excluded = |column: &str| {
            column == self.target || self.excluded.iter().any(|excluded| *excluded == column)
        };

        self.direct_columns
            .iter()
            .map(|column| column.to_string())
            .chain(self.placeholders.iter().map(|placeholder| placeholder.column.to_string()))
            .chain(self.categoricals.iter().flat_map(|field| field.columns()))
            .filter(|column| !excluded(column.as_str()))
            .collect()
    }

    pub fn categorical(&self, name: &str) -> Option<&CategoricalField> {
        self.categoricals.iter().find(|field| field.name == name)
    }

    pub fn placeholder(&self, column: &str) -> Option<f64> {
        self.placeholders
            .iter()
            .find(|placeholder| placeholder.column == column)
            .map(|placeholder| placeholder.value)
    }

    /// Compares a dataset's columns with the catalog. The dataset must carry the target,
    /// every excluded column, and exactly the catalog's feature columns.
    pub fn reconcile(&self, dataset: &HistoricalDataset) -> SchemaReport {
        let expected: BTreeSet<String> = self
            .feature_columns()
            .into_iter()
            .chain(std::iter::once(self.target.to_string()))
            .chain(self.excluded.iter().map(|column| column.to_string()))
            .collect();
        let present: BTreeSet<String> = dataset.columns().iter().cloned().collect();

        SchemaReport {
            domain: self.domain,
            missing: expected.difference(&present).cloned().collect(),
            unexpected: present.difference(&expected).cloned().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaReport {
    pub domain: Domain,
    pub missing: Vec<String>,
    pub unexpected: Vec<String>,
}

impl SchemaReport {
    pub fn is_consistent(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }

    pub fn into_result(self) -> Result<(), EngineError> {
        if self.is_consistent() {
            return Ok(());
        }
        Err(EngineError::SchemaMismatch {
            domain: self.domain,
            missing: self.missing,
            unexpected: self.unexpected,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SchemaCatalog {
    hotel: DomainSchema,
    restaurant: DomainSchema,
}

impl SchemaCatalog {
    pub fn standard() -> Self {
        Self { hotel: hotel::schema(), restaurant: restaurant::schema() }
    }

    pub fn schema(&self, domain: Domain) -> &DomainSchema {
        match domain {
            Domain::Hotel => &self.hotel,
            Domain::Restaurant => &self.restaurant,
        }
    }
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{Domain, SchemaCatalog, Season};

    #[test]
    fn season_map_covers_every_month() {
        let seasons: Vec<Season> = (1..=12).map(Season::for_month).collect();

        assert_eq!(seasons.iter().filter(|season| **season == Season::High).count(), 3);
        assert_eq!(seasons.iter().filter(|season| **season == Season::Low).count(), 3);
        assert_eq!(Season::for_month(8), Season::High);
        assert_eq!(Season::for_month(12), Season::Low);
        assert_eq!(Season::for_month(4), Season::Mid);
    }

    #[test]
    fn feature_columns_never_contain_target_or_leakage_columns() {
        let catalog = SchemaCatalog::standard();
        for domain in [Domain::Hotel, Domain::Restaurant] {
            let schema = catalog.schema(domain);
            let columns = schema.feature_columns();

            assert!(!columns.iter().any(|column| column == schema.target));
            for excluded in schema.excluded {
                assert!(!columns.iter().any(|column| column == excluded), "{excluded} leaked");
            }
        }
    }

    #[test]
    fn feature_columns_are_unique_and_static() {
        let catalog = SchemaCatalog::standard();
        let hotel = catalog.schema(Domain::Hotel).feature_columns();
        let restaurant = catalog.schema(Domain::Restaurant).feature_columns();

        assert_eq!(hotel.len(), 50);
        assert_eq!(restaurant.len(), 44);
        assert_eq!(hotel.iter().collect::<BTreeSet<_>>().len(), hotel.len());
        assert_eq!(restaurant.iter().collect::<BTreeSet<_>>().len(), restaurant.len());
    }

    #[test]
    fn hotel_derives_season_and_restaurant_does_not() {
        let catalog = SchemaCatalog::standard();
        let hotel = catalog.schema(Domain::Hotel).feature_columns();
        let restaurant = catalog.schema(Domain::Restaurant).feature_columns();

        assert!(hotel.contains(&"epoca_Alta".to_string()));
        assert!(!restaurant.iter().any(|column| column.starts_with("epoca_")));
    }

    #[test]
    fn domain_parses_case_insensitively() {
        assert_eq!("Hotel".parse::<Domain>(), Ok(Domain::Hotel));
        assert_eq!(" restaurant ".parse::<Domain>(), Ok(Domain::Restaurant));
        assert!("spa".parse::<Domain>().is_err());
    }
}
