//! Launch record dataset
//!
//! Loads the launch CSV once at startup into an immutable [`LaunchDataset`].
//! The row-index column written by pandas (`Unnamed: 0` or an empty header)
//! is dropped, the required columns are validated, and the payload bounds
//! used to seed the range slider are computed.
//!
//! ## Expected CSV layout
//!
//! ```text
//! ,Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category
//! 0,1,CCAFS LC-40,0,0.0,F9 v1.0  B0003,v1.0
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

pub const LAUNCH_SITE: &str = "Launch Site";
pub const PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const CLASS: &str = "class";
pub const BOOSTER_CATEGORY: &str = "Booster Version Category";
pub const FLIGHT_NUMBER: &str = "Flight Number";
pub const BOOSTER_VERSION: &str = "Booster Version";

/// Errors that can occur while loading the dataset
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Row {row}: invalid payload mass '{value}'")]
    InvalidPayload { row: usize, value: String },

    #[error("Row {row}: invalid class '{value}' (expected 0 or 1)")]
    InvalidClass { row: usize, value: String },

    #[error("Row {row}: empty value in column '{column}'")]
    EmptyValue { row: usize, column: &'static str },

    #[error("Row {row}: invalid flight number '{value}'")]
    InvalidFlightNumber { row: usize, value: String },

    #[error("Dataset contains no launch records")]
    Empty,
}

/// Binary launch outcome as encoded in the `class` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Numeric encoding used by the dataset (0 or 1)
    pub fn value(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        // pandas may write the column as float when it was ever coerced
        match raw.trim().parse::<f64>().ok()? {
            v if v == 0.0 => Some(Outcome::Failure),
            v if v == 1.0 => Some(Outcome::Success),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// One launch (one row of the CSV)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchRecord {
    pub launch_site: String,
    pub payload_mass_kg: f64,
    pub class: Outcome,
    pub booster_version_category: String,
    pub flight_number: Option<u32>,
    pub booster_version: Option<String>,
}

impl LaunchRecord {
    pub fn new(
        launch_site: impl Into<String>,
        payload_mass_kg: f64,
        class: Outcome,
        booster_version_category: impl Into<String>,
    ) -> Self {
        Self {
            launch_site: launch_site.into(),
            payload_mass_kg,
            class,
            booster_version_category: booster_version_category.into(),
            flight_number: None,
            booster_version: None,
        }
    }
}

/// The loaded, read-only record set with pre-computed indices
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    records: Vec<LaunchRecord>,
    /// Distinct launch sites, sorted
    sites: Vec<String>,
    /// Distinct booster version categories, sorted
    booster_categories: Vec<String>,
    min_payload: f64,
    max_payload: f64,
    /// Columns present in the source file after the index column was dropped
    columns: Vec<String>,
}

impl LaunchDataset {
    /// Load the dataset from a CSV file
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse the dataset from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let position = |name: &'static str| -> Result<usize, LoadError> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(LoadError::MissingColumn(name))
        };
        let site_idx = position(LAUNCH_SITE)?;
        let payload_idx = position(PAYLOAD_MASS)?;
        let class_idx = position(CLASS)?;
        let category_idx = position(BOOSTER_CATEGORY)?;
        let flight_idx = headers.iter().position(|h| h == FLIGHT_NUMBER);
        let version_idx = headers.iter().position(|h| h == BOOSTER_VERSION);

        let mut records = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let record = result?;
            let field = |idx: usize| record.get(idx).unwrap_or("").trim();
            let required = |idx: usize, column: &'static str| match field(idx) {
                "" => Err(LoadError::EmptyValue { row, column }),
                value => Ok(value.to_string()),
            };

            let payload_raw = field(payload_idx);
            let payload_mass_kg = payload_raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or_else(|| LoadError::InvalidPayload {
                    row,
                    value: payload_raw.to_string(),
                })?;

            let class_raw = field(class_idx);
            let class = Outcome::parse(class_raw).ok_or_else(|| LoadError::InvalidClass {
                row,
                value: class_raw.to_string(),
            })?;

            let flight_number = match flight_idx.map(field).filter(|s| !s.is_empty()) {
                Some(raw) => Some(raw.parse::<u32>().map_err(|_| {
                    LoadError::InvalidFlightNumber {
                        row,
                        value: raw.to_string(),
                    }
                })?),
                None => None,
            };

            records.push(LaunchRecord {
                launch_site: required(site_idx, LAUNCH_SITE)?,
                payload_mass_kg,
                class,
                booster_version_category: required(category_idx, BOOSTER_CATEGORY)?,
                flight_number,
                booster_version: version_idx
                    .map(field)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            });
        }

        let mut dataset = Self::from_records(records)?;
        dataset.columns = headers
            .into_iter()
            .filter(|h| !is_index_column(h))
            .collect();
        Ok(dataset)
    }

    /// Build a dataset from already parsed records
    pub fn from_records(records: Vec<LaunchRecord>) -> Result<Self, LoadError> {
        if records.is_empty() {
            return Err(LoadError::Empty);
        }

        let (min_payload, max_payload) = records.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), r| (lo.min(r.payload_mass_kg), hi.max(r.payload_mass_kg)),
        );
        let sites: BTreeSet<&str> = records.iter().map(|r| r.launch_site.as_str()).collect();
        let categories: BTreeSet<&str> = records
            .iter()
            .map(|r| r.booster_version_category.as_str())
            .collect();

        Ok(Self {
            sites: sites.into_iter().map(str::to_string).collect(),
            booster_categories: categories.into_iter().map(str::to_string).collect(),
            min_payload,
            max_payload,
            columns: vec![
                LAUNCH_SITE.to_string(),
                CLASS.to_string(),
                PAYLOAD_MASS.to_string(),
                BOOSTER_CATEGORY.to_string(),
            ],
            records,
        })
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    /// Distinct launch sites in sorted order
    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn contains_site(&self, site: &str) -> bool {
        self.sites.binary_search_by(|s| s.as_str().cmp(site)).is_ok()
    }

    /// Distinct booster version categories in sorted order
    pub fn booster_categories(&self) -> &[String] {
        &self.booster_categories
    }

    /// Smallest payload mass in the dataset (inclusive)
    pub fn min_payload(&self) -> f64 {
        self.min_payload
    }

    /// Largest payload mass in the dataset (inclusive)
    pub fn max_payload(&self) -> f64 {
        self.max_payload
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Schema summary for diagnostics
    pub fn summary(&self) -> DatasetSummary {
        let rows = self.records.len();
        let columns = self
            .columns
            .iter()
            .map(|name| {
                let (dtype, non_null) = match name.as_str() {
                    LAUNCH_SITE | BOOSTER_CATEGORY => ("object", rows),
                    PAYLOAD_MASS => ("float64", rows),
                    CLASS => ("int64", rows),
                    FLIGHT_NUMBER => (
                        "int64",
                        self.records.iter().filter(|r| r.flight_number.is_some()).count(),
                    ),
                    BOOSTER_VERSION => (
                        "object",
                        self.records
                            .iter()
                            .filter(|r| r.booster_version.is_some())
                            .count(),
                    ),
                    _ => ("ignored", 0),
                };
                ColumnSummary {
                    name: name.clone(),
                    dtype: dtype.to_string(),
                    non_null,
                }
            })
            .collect();

        let mut launches_per_site = BTreeMap::new();
        for record in &self.records {
            *launches_per_site
                .entry(record.launch_site.clone())
                .or_insert(0usize) += 1;
        }

        DatasetSummary {
            rows,
            columns,
            launches_per_site,
            min_payload: self.min_payload,
            max_payload: self.max_payload,
        }
    }
}

fn is_index_column(name: &str) -> bool {
    name.is_empty() || name.starts_with("Unnamed:")
}

/// Per-column entry of [`DatasetSummary`]
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: String,
    pub non_null: usize,
}

/// Human-readable description of the loaded schema
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
    pub launches_per_site: BTreeMap<String, usize>,
    pub min_payload: f64,
    pub max_payload: f64,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} launch records, {} columns", self.rows, self.columns.len())?;
        for (i, col) in self.columns.iter().enumerate() {
            writeln!(
                f,
                "  {:>2}  {:<26} {:>4} non-null  {}",
                i, col.name, col.non_null, col.dtype
            )?;
        }
        for (site, count) in &self.launches_per_site {
            writeln!(f, "  site {site}: {count} launches")?;
        }
        write!(
            f,
            "  payload range: {} - {} kg",
            self.min_payload, self.max_payload
        )
    }
}
