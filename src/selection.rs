//! Control values accepted by the chart handlers
//!
//! Raw values arriving from the page are validated here. Invalid values are
//! reported as [`SelectionError`]s and replaced by a defined fallback, so a
//! handler always receives a usable selection:
//!
//! - unknown or missing site → all sites
//! - missing payload range → the full `[min_payload, max_payload]` bound
//! - one missing payload bound → that side of the full bound
//! - inverted payload range → bounds swapped

use std::fmt;

use log::warn;
use serde::Serialize;
use thiserror::Error;

use crate::dataset::LaunchDataset;

/// Dropdown value that selects every launch site
pub const ALL_SITES: &str = "ALL";

/// Problems with a control value, each paired with a fallback
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("Unknown launch site '{value}', showing all sites")]
    InvalidSelection { value: String },

    #[error("No launch site selected, showing all sites")]
    MissingSelection,

    #[error("No payload range selected, showing {low} - {high} kg")]
    MissingRange { low: f64, high: f64 },

    #[error("No {bound} payload bound selected, using {value} kg")]
    MissingBound { bound: Bound, value: f64 },

    #[error("Payload range {low} - {high} kg is inverted, showing {high} - {low} kg")]
    InvertedRange { low: f64, high: f64 },
}

/// One side of a payload range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Lower => write!(f, "lower"),
            Bound::Upper => write!(f, "upper"),
        }
    }
}

/// Slider value as posted by the page; either bound may be absent
pub type RawRange = Option<(Option<f64>, Option<f64>)>;

/// Which launch sites a chart covers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum SiteSelector {
    All,
    Site(String),
}

impl SiteSelector {
    /// Interpret a dropdown value without checking it against a dataset
    pub fn parse(raw: &str) -> Self {
        if raw == ALL_SITES {
            SiteSelector::All
        } else {
            SiteSelector::Site(raw.to_string())
        }
    }

    /// Interpret a dropdown value, rejecting sites the dataset does not contain
    pub fn validate(raw: Option<&str>, dataset: &LaunchDataset) -> Result<Self, SelectionError> {
        let raw = raw.ok_or(SelectionError::MissingSelection)?;
        match Self::parse(raw) {
            SiteSelector::Site(site) if !dataset.contains_site(&site) => {
                Err(SelectionError::InvalidSelection { value: site })
            }
            selector => Ok(selector),
        }
    }

    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelector::All => true,
            SiteSelector::Site(selected) => selected == site,
        }
    }
}

impl fmt::Display for SiteSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSelector::All => write!(f, "{ALL_SITES}"),
            SiteSelector::Site(site) => write!(f, "{site}"),
        }
    }
}

/// Inclusive payload mass interval in kilograms
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadRange {
    pub low: f64,
    pub high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// The bound covering every record of the dataset
    pub fn full(dataset: &LaunchDataset) -> Self {
        Self::new(dataset.min_payload(), dataset.max_payload())
    }

    /// Validate a slider value
    pub fn validate(
        raw: Option<(f64, f64)>,
        dataset: &LaunchDataset,
    ) -> Result<Self, SelectionError> {
        match raw {
            None => {
                let full = Self::full(dataset);
                Err(SelectionError::MissingRange {
                    low: full.low,
                    high: full.high,
                })
            }
            Some((low, high)) if low > high => Err(SelectionError::InvertedRange { low, high }),
            Some((low, high)) => Ok(Self::new(low, high)),
        }
    }

    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        self.low <= payload_mass_kg && payload_mass_kg <= self.high
    }
}

/// Resolve a dropdown value, recording a warning when the fallback is used
pub fn resolve_site(
    raw: Option<&str>,
    dataset: &LaunchDataset,
    warnings: &mut Vec<SelectionError>,
) -> SiteSelector {
    SiteSelector::validate(raw, dataset).unwrap_or_else(|e| {
        warn!("{}", e);
        warnings.push(e);
        SiteSelector::All
    })
}

/// Resolve a slider value, recording a warning for every fallback used
///
/// A missing bound is taken from the matching side of the dataset's full
/// payload range before the pair is validated.
pub fn resolve_range(
    raw: RawRange,
    dataset: &LaunchDataset,
    warnings: &mut Vec<SelectionError>,
) -> PayloadRange {
    let full = PayloadRange::full(dataset);
    let mut fill = |value: Option<f64>, bound: Bound, fallback: f64| {
        value.unwrap_or_else(|| {
            let e = SelectionError::MissingBound {
                bound,
                value: fallback,
            };
            warn!("{}", e);
            warnings.push(e);
            fallback
        })
    };
    let pair = match raw {
        None | Some((None, None)) => None,
        Some((low, high)) => Some((
            fill(low, Bound::Lower, full.low),
            fill(high, Bound::Upper, full.high),
        )),
    };

    PayloadRange::validate(pair, dataset).unwrap_or_else(|e| {
        warn!("{}", e);
        let fallback = match &e {
            SelectionError::InvertedRange { low, high } => PayloadRange::new(*high, *low),
            _ => full,
        };
        warnings.push(e);
        fallback
    })
}
