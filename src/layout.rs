//! Page layout
//!
//! The page is an immutable tree of [`LayoutNode`]s built once at startup and
//! served to the browser as JSON. The browser script turns each node into
//! DOM elements; all dynamic behavior goes through the binding table.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::bindings::{PAYLOAD_SLIDER, PIE_CHART, SCATTER_CHART, SITE_DROPDOWN};
use crate::dataset::LaunchDataset;
use crate::selection::ALL_SITES;

pub const PAGE_TITLE: &str = "SpaceX Launch Records Dashboard";

pub const SLIDER_MIN: f64 = 0.0;
pub const SLIDER_MAX: f64 = 10000.0;
pub const SLIDER_STEP: f64 = 1000.0;

/// CSS properties applied to a node
pub type Style = BTreeMap<String, String>;

fn style(pairs: &[(&str, &str)]) -> Style {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// One element of the page tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutNode {
    Container { children: Vec<LayoutNode> },
    Heading { text: String, style: Style },
    Label { text: String },
    Paragraph { text: String },
    Break,
    Dropdown(Dropdown),
    RangeSlider(RangeSlider),
    Graph { id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

/// Single-choice selection control
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dropdown {
    pub id: String,
    pub options: Vec<DropdownOption>,
    pub value: String,
    pub placeholder: String,
    pub searchable: bool,
    pub style: Style,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderMark {
    pub value: f64,
    pub label: String,
}

/// Two-handle numeric range control
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSlider {
    pub id: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub marks: Vec<SliderMark>,
    pub value: [f64; 2],
}

/// The complete page description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLayout {
    pub title: String,
    pub root: LayoutNode,
}

#[cfg(test)]
impl PageLayout {
    /// Depth-first search for the node carrying `id`
    pub fn find(&self, id: &str) -> Option<&LayoutNode> {
        fn walk<'a>(node: &'a LayoutNode, id: &str) -> Option<&'a LayoutNode> {
            match node {
                LayoutNode::Container { children } => {
                    children.iter().find_map(|child| walk(child, id))
                }
                _ if node_id(node) == Some(id) => Some(node),
                _ => None,
            }
        }
        walk(&self.root, id)
    }

    /// Ids of every identifiable node, in document order
    pub fn component_ids(&self) -> Vec<&str> {
        fn collect<'a>(node: &'a LayoutNode, out: &mut Vec<&'a str>) {
            if let LayoutNode::Container { children } = node {
                for child in children {
                    collect(child, out);
                }
            } else if let Some(id) = node_id(node) {
                out.push(id);
            }
        }
        let mut ids = Vec::new();
        collect(&self.root, &mut ids);
        ids
    }
}

#[cfg(test)]
fn node_id(node: &LayoutNode) -> Option<&str> {
    match node {
        LayoutNode::Dropdown(d) => Some(d.id.as_str()),
        LayoutNode::RangeSlider(s) => Some(s.id.as_str()),
        LayoutNode::Graph { id } => Some(id.as_str()),
        _ => None,
    }
}

/// Build the dashboard page for a dataset
pub fn build_layout(dataset: &LaunchDataset) -> PageLayout {
    let options = std::iter::once(DropdownOption {
        label: "All Sites".to_string(),
        value: ALL_SITES.to_string(),
    })
    .chain(dataset.sites().iter().map(|site| DropdownOption {
        label: site.clone(),
        value: site.clone(),
    }))
    .collect();

    let marks = (0..=10u8)
        .map(|i| {
            let value = SLIDER_MIN + SLIDER_STEP * f64::from(i);
            SliderMark {
                value,
                label: value.to_string(),
            }
        })
        .collect();

    let root = LayoutNode::Container {
        children: vec![
            LayoutNode::Heading {
                text: PAGE_TITLE.to_string(),
                style: style(&[
                    ("text-align", "center"),
                    ("color", "#503D36"),
                    ("font-size", "40px"),
                ]),
            },
            LayoutNode::Container {
                children: vec![
                    LayoutNode::Label {
                        text: "Select Launch Site:".to_string(),
                    },
                    LayoutNode::Dropdown(Dropdown {
                        id: SITE_DROPDOWN.to_string(),
                        options,
                        value: ALL_SITES.to_string(),
                        placeholder: "Select a Launch Site here".to_string(),
                        searchable: true,
                        style: style(&[
                            ("width", "80%"),
                            ("padding", "3px"),
                            ("font-size", "20px"),
                        ]),
                    }),
                ],
            },
            LayoutNode::Break,
            LayoutNode::Container {
                children: vec![LayoutNode::Graph {
                    id: PIE_CHART.to_string(),
                }],
            },
            LayoutNode::Break,
            LayoutNode::Paragraph {
                text: "Payload range (Kg):".to_string(),
            },
            LayoutNode::RangeSlider(RangeSlider {
                id: PAYLOAD_SLIDER.to_string(),
                min: SLIDER_MIN,
                max: SLIDER_MAX,
                step: SLIDER_STEP,
                marks,
                value: [dataset.min_payload(), dataset.max_payload()],
            }),
            LayoutNode::Container {
                children: vec![LayoutNode::Graph {
                    id: SCATTER_CHART.to_string(),
                }],
            },
        ],
    };

    PageLayout {
        title: PAGE_TITLE.to_string(),
        root,
    }
}
