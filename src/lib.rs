//! # launch-dashboard - Launch Records Dashboard
//!
//! An interactive web dashboard for exploring rocket launch outcomes.
//!
//! ## Overview
//!
//! The dashboard loads a CSV of launch records once at startup and serves a
//! single page with:
//!
//! 1. **Site dropdown** - all sites, or one launch site
//! 2. **Success pie chart** - successes per site, or success/failure counts
//!    for the selected site
//! 3. **Payload slider** - an inclusive payload mass range (0 - 10000 kg)
//! 4. **Payload scatter chart** - payload mass against outcome, colored by
//!    booster version category
//!
//! ## Usage
//!
//! ```bash
//! # Serve spacex_launch_dash.csv from the current directory on port 8050
//! launch-dashboard
//!
//! # Serve another file on another port
//! launch-dashboard --data launches.csv --port 3000
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! CSV ─▶ LaunchDataset ─▶ build_layout ─▶ page
//!                 │
//!                 └──▶ dispatch(binding, control values) ─▶ handler ─▶ ChartSpec
//! ```
//!
//! The handlers are pure functions of the dataset and the control values and
//! can be called directly:
//!
//! ```
//! use launch_dashboard::{
//!     LaunchDataset, LaunchRecord, Outcome, PayloadRange, SiteSelector,
//!     compute_correlation_chart,
//! };
//!
//! let dataset = LaunchDataset::from_records(vec![
//!     LaunchRecord::new("A", 1000.0, Outcome::Success, "FT"),
//!     LaunchRecord::new("B", 5000.0, Outcome::Failure, "FT"),
//! ])
//! .unwrap();
//! let chart = compute_correlation_chart(
//!     &dataset,
//!     &SiteSelector::All,
//!     PayloadRange::new(2000.0, 10000.0),
//! );
//! assert_eq!(chart.point_count(), 1);
//! ```

pub mod bindings;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod handlers;
pub mod layout;
pub mod selection;
pub mod web;

pub use bindings::{
    Binding, DispatchError, HandlerKind, UpdateRequest, UpdateResponse, binding_table, dispatch,
};
pub use chart::{ChartSpec, Trace};
pub use config::{ConfigError, DashboardConfig, load_config, load_config_file};
pub use dataset::{DatasetSummary, LaunchDataset, LaunchRecord, LoadError, Outcome};
pub use handlers::{compute_correlation_chart, compute_proportion_chart};
pub use layout::{LayoutNode, PageLayout, build_layout};
pub use selection::{ALL_SITES, PayloadRange, SelectionError, SiteSelector};
