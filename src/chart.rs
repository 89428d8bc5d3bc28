//! Chart specifications
//!
//! A [`ChartSpec`] is a JSON-serializable figure in the shape plotly.js
//! expects (`{ data: [...traces], layout: {...} }`). Rendering is left
//! entirely to the browser.

use std::collections::BTreeMap;

use serde::Serialize;

/// Default plotly qualitative colorway
const COLORWAY: [&str; 10] = [
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// A complete figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub data: Vec<Trace>,
    pub layout: ChartLayout,
}

/// One plotly trace
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Pie(PieTrace),
    Scatter(ScatterTrace),
}

/// Pie trace: one slice per label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub hole: f64,
    pub sort: bool,
}

/// Marker scatter trace for a single color group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    pub name: String,
    pub mode: &'static str,
    pub x: Vec<f64>,
    pub y: Vec<u8>,
    pub text: Vec<String>,
    pub marker: Marker,
    #[serde(rename = "legendgroup")]
    pub legend_group: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: String,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: Title,
}

/// Figure layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub title: Title,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
}

impl ChartSpec {
    /// Proportion chart built from `(label, value)` slices
    pub fn pie(title: impl Into<String>, slices: Vec<(String, f64)>) -> Self {
        let (labels, values) = slices.into_iter().unzip();
        Self {
            data: vec![Trace::Pie(PieTrace {
                labels,
                values,
                hole: 0.0,
                sort: false,
            })],
            layout: ChartLayout {
                title: Title::new(title),
                xaxis: None,
                yaxis: None,
                legend: None,
            },
        }
    }

    /// Total of all pie slice values
    pub fn slice_total(&self) -> f64 {
        self.data
            .iter()
            .map(|trace| match trace {
                Trace::Pie(pie) => pie.values.iter().sum(),
                Trace::Scatter(_) => 0.0,
            })
            .sum()
    }

    /// Total number of scatter points across all traces
    pub fn point_count(&self) -> usize {
        self.data
            .iter()
            .map(|trace| match trace {
                Trace::Scatter(scatter) => scatter.x.len(),
                Trace::Pie(_) => 0,
            })
            .sum()
    }
}

/// Accumulates grouped points and produces a scatter figure
pub struct ScatterBuilder<'a> {
    title: String,
    x_label: String,
    y_label: String,
    group_label: String,
    colors: &'a ColorMap,
    groups: BTreeMap<String, ScatterTrace>,
}

impl<'a> ScatterBuilder<'a> {
    pub fn new(title: impl Into<String>, colors: &'a ColorMap) -> Self {
        Self {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            group_label: String::new(),
            colors,
            groups: BTreeMap::new(),
        }
    }

    pub fn axes(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
        self
    }

    pub fn group_label(mut self, label: &str) -> Self {
        self.group_label = label.to_string();
        self
    }

    pub fn point(&mut self, group: &str, x: f64, y: u8, hover: String) {
        let colors = self.colors;
        let trace = self
            .groups
            .entry(group.to_string())
            .or_insert_with(|| ScatterTrace {
                name: group.to_string(),
                mode: "markers",
                x: Vec::new(),
                y: Vec::new(),
                text: Vec::new(),
                marker: Marker {
                    color: colors.color_for(group).to_string(),
                    size: 10,
                },
                legend_group: group.to_string(),
            });
        trace.x.push(x);
        trace.y.push(y);
        trace.text.push(hover);
    }

    pub fn build(self) -> ChartSpec {
        ChartSpec {
            data: self.groups.into_values().map(Trace::Scatter).collect(),
            layout: ChartLayout {
                title: Title::new(self.title),
                xaxis: Some(Axis {
                    title: Title::new(self.x_label),
                }),
                yaxis: Some(Axis {
                    title: Title::new(self.y_label),
                }),
                legend: Some(Legend {
                    title: Title::new(self.group_label),
                }),
            },
        }
    }
}

/// Stable category → color assignment, independent of which categories a
/// particular filtered view happens to contain
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, &'static str>,
}

impl ColorMap {
    pub fn new(categories: &[String]) -> Self {
        let mapping = categories
            .iter()
            .zip(COLORWAY.iter().cycle())
            .map(|(c, color)| (c.clone(), *color))
            .collect();
        Self { mapping }
    }

    pub fn color_for(&self, category: &str) -> &'static str {
        self.mapping.get(category).copied().unwrap_or("#7f7f7f")
    }
}
