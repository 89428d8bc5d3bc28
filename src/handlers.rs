//! Chart handlers
//!
//! Pure functions from control values to chart specifications. They never
//! mutate the dataset; every filter produces a temporary view.

use std::collections::BTreeMap;

use crate::chart::{ChartSpec, ColorMap, ScatterBuilder};
use crate::dataset::{
    BOOSTER_CATEGORY, CLASS, LaunchDataset, LaunchRecord, Outcome, PAYLOAD_MASS,
};
use crate::selection::{PayloadRange, SiteSelector};

/// Proportion slices as `(label, value)` pairs
///
/// - [`SiteSelector::All`]: one slice per site, valued by its success count
/// - [`SiteSelector::Site`]: one slice per outcome class present at the site,
///   valued by its launch count
pub fn proportion_slices(dataset: &LaunchDataset, selected: &SiteSelector) -> Vec<(String, f64)> {
    match selected {
        SiteSelector::All => {
            let mut successes: BTreeMap<&str, u64> = dataset
                .sites()
                .iter()
                .map(|site| (site.as_str(), 0))
                .collect();
            for record in dataset.records() {
                *successes.entry(record.launch_site.as_str()).or_insert(0) +=
                    u64::from(record.class.value());
            }
            successes
                .into_iter()
                .map(|(site, count)| (site.to_string(), count as f64))
                .collect()
        }
        SiteSelector::Site(site) => {
            let mut counts: BTreeMap<Outcome, u64> = BTreeMap::new();
            for record in dataset.records().iter().filter(|r| &r.launch_site == site) {
                *counts.entry(record.class).or_insert(0) += 1;
            }
            counts
                .into_iter()
                .map(|(class, count)| (class.to_string(), count as f64))
                .collect()
        }
    }
}

/// Records matching both the site filter and the inclusive payload range
pub fn filter_records<'a>(
    dataset: &'a LaunchDataset,
    selected: &SiteSelector,
    range: PayloadRange,
) -> Vec<&'a LaunchRecord> {
    dataset
        .records()
        .iter()
        .filter(|r| range.contains(r.payload_mass_kg) && selected.matches(&r.launch_site))
        .collect()
}

/// Pie chart of launch success for the selected site(s)
pub fn compute_proportion_chart(dataset: &LaunchDataset, selected: &SiteSelector) -> ChartSpec {
    let title = match selected {
        SiteSelector::All => "Total Success Launches by Site".to_string(),
        SiteSelector::Site(site) => format!("Total Success Launches for site {site}"),
    };
    ChartSpec::pie(title, proportion_slices(dataset, selected))
}

/// Scatter chart of payload mass against outcome, colored by booster category
pub fn compute_correlation_chart(
    dataset: &LaunchDataset,
    selected: &SiteSelector,
    range: PayloadRange,
) -> ChartSpec {
    let scope = match selected {
        SiteSelector::All => "all Sites".to_string(),
        SiteSelector::Site(site) => format!("site {site}"),
    };
    let title = format!(
        "Correlation between Payload and Success for {scope} within range {} - {} kg",
        range.low, range.high
    );

    let colors = ColorMap::new(dataset.booster_categories());
    let mut builder = ScatterBuilder::new(title, &colors)
        .axes(PAYLOAD_MASS, CLASS)
        .group_label(BOOSTER_CATEGORY);
    for record in filter_records(dataset, selected, range) {
        builder.point(
            &record.booster_version_category,
            record.payload_mass_kg,
            record.class.value(),
            hover_text(record),
        );
    }
    builder.build()
}

fn hover_text(record: &LaunchRecord) -> String {
    let mut text = record.launch_site.clone();
    if let Some(flight) = record.flight_number {
        text.push_str(&format!(" | flight {flight}"));
    }
    if let Some(version) = &record.booster_version {
        text.push_str(&format!(" | {version}"));
    }
    text
}
