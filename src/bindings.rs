//! Reactive wiring between page controls and chart handlers
//!
//! The binding table declares which control values feed which handler and
//! which placeholder receives the result. The browser posts an
//! [`UpdateRequest`] whenever a control changes; [`dispatch`] resolves the
//! inputs and runs the bound handler.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::chart::ChartSpec;
use crate::dataset::LaunchDataset;
use crate::handlers::{compute_correlation_chart, compute_proportion_chart};
use crate::selection::{Bound, RawRange, resolve_range, resolve_site};

pub const SITE_DROPDOWN: &str = "site-dropdown";
pub const PAYLOAD_SLIDER: &str = "payload-slider";
pub const PIE_CHART: &str = "success-pie-chart";
pub const SCATTER_CHART: &str = "success-payload-scatter-chart";

/// Errors that can occur when dispatching an update
#[derive(Error, Debug, PartialEq)]
pub enum DispatchError {
    #[error("No binding targets output '{0}'")]
    UnknownOutput(String),

    #[error("Malformed value for input '{id}': {reason}")]
    MalformedInput { id: &'static str, reason: String },
}

/// A `(component id, property)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComponentProperty {
    pub id: &'static str,
    pub property: &'static str,
}

impl ComponentProperty {
    pub const fn new(id: &'static str, property: &'static str) -> Self {
        Self { id, property }
    }
}

/// Which pure handler a binding runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    Proportion,
    Correlation,
}

/// One `(inputs) -> handler -> output` entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub output: ComponentProperty,
    pub inputs: &'static [ComponentProperty],
    pub handler: HandlerKind,
}

impl Binding {
    /// Whether a change of control `id` should re-run this binding
    pub fn is_triggered_by(&self, id: &str) -> bool {
        self.inputs.iter().any(|input| input.id == id)
    }
}

static BINDINGS: [Binding; 2] = [
    Binding {
        output: ComponentProperty::new(PIE_CHART, "figure"),
        inputs: &[ComponentProperty::new(SITE_DROPDOWN, "value")],
        handler: HandlerKind::Proportion,
    },
    Binding {
        output: ComponentProperty::new(SCATTER_CHART, "figure"),
        inputs: &[
            ComponentProperty::new(SITE_DROPDOWN, "value"),
            ComponentProperty::new(PAYLOAD_SLIDER, "value"),
        ],
        handler: HandlerKind::Correlation,
    },
];

/// The complete binding table registered with the web runtime
pub fn binding_table() -> &'static [Binding] {
    &BINDINGS
}

/// Bindings that must re-run when control `id` changes
pub fn bindings_triggered_by(id: &str) -> impl Iterator<Item = &'static Binding> + '_ {
    BINDINGS.iter().filter(move |b| b.is_triggered_by(id))
}

/// Control id → outputs to refresh when that control changes
pub fn trigger_map() -> BTreeMap<&'static str, Vec<&'static str>> {
    let controls: BTreeSet<&'static str> = BINDINGS
        .iter()
        .flat_map(|b| b.inputs.iter().map(|input| input.id))
        .collect();
    controls
        .into_iter()
        .map(|id| {
            let outputs = bindings_triggered_by(id).map(|b| b.output.id).collect();
            (id, outputs)
        })
        .collect()
}

/// Binding table plus trigger map, as served to the page
#[derive(Debug, Clone, Serialize)]
pub struct BindingTable {
    pub bindings: &'static [Binding],
    pub triggers: BTreeMap<&'static str, Vec<&'static str>>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self {
            bindings: binding_table(),
            triggers: trigger_map(),
        }
    }
}

impl Default for BindingTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Current control values for one output, as posted by the page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRequest {
    pub output: String,
    #[serde(default)]
    pub inputs: BTreeMap<String, Value>,
}

impl UpdateRequest {
    pub fn new(output: &str) -> Self {
        Self {
            output: output.to_string(),
            inputs: BTreeMap::new(),
        }
    }

    pub fn with_input(mut self, id: &str, value: Value) -> Self {
        self.inputs.insert(id.to_string(), value);
        self
    }

    fn site(&self) -> Result<Option<&str>, DispatchError> {
        match self.inputs.get(SITE_DROPDOWN) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(site)) => Ok(Some(site.as_str())),
            Some(other) => Err(DispatchError::MalformedInput {
                id: SITE_DROPDOWN,
                reason: format!("expected a string, got {other}"),
            }),
        }
    }

    fn payload_range(&self) -> Result<RawRange, DispatchError> {
        let malformed = |reason: String| DispatchError::MalformedInput {
            id: PAYLOAD_SLIDER,
            reason,
        };
        let bound = |value: &Value, side: Bound| match value {
            Value::Null => Ok(None),
            Value::Number(n) => n
                .as_f64()
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(|| malformed(format!("{side} bound {n} is not finite"))),
            other => Err(malformed(format!("{side} bound {other} is not a number"))),
        };
        match self.inputs.get(PAYLOAD_SLIDER) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(bounds)) => match bounds.as_slice() {
                [low, high] => Ok(Some((bound(low, Bound::Lower)?, bound(high, Bound::Upper)?))),
                _ => Err(malformed(format!(
                    "expected two bounds, got {}",
                    bounds.len()
                ))),
            },
            Some(other) => Err(malformed(format!("expected [low, high], got {other}"))),
        }
    }
}

/// Handler result returned to the page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateResponse {
    pub output: String,
    pub figure: ChartSpec,
    /// Fallbacks applied to invalid control values
    pub warnings: Vec<String>,
}

/// Run the handler bound to `request.output`
pub fn dispatch(
    dataset: &LaunchDataset,
    request: &UpdateRequest,
) -> Result<UpdateResponse, DispatchError> {
    let binding = BINDINGS
        .iter()
        .find(|b| b.output.id == request.output)
        .ok_or_else(|| DispatchError::UnknownOutput(request.output.clone()))?;

    let mut warnings = Vec::new();
    let figure = match binding.handler {
        HandlerKind::Proportion => {
            let site = resolve_site(request.site()?, dataset, &mut warnings);
            debug!("proportion chart for {}", site);
            compute_proportion_chart(dataset, &site)
        }
        HandlerKind::Correlation => {
            let site = request.site()?;
            let range = request.payload_range()?;
            let site = resolve_site(site, dataset, &mut warnings);
            let range = resolve_range(range, dataset, &mut warnings);
            debug!(
                "correlation chart for {} within {} - {} kg",
                site, range.low, range.high
            );
            compute_correlation_chart(dataset, &site, range)
        }
    };

    Ok(UpdateResponse {
        output: binding.output.id.to_string(),
        figure,
        warnings: warnings.iter().map(ToString::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{LaunchRecord, Outcome};
    use crate::layout::build_layout;
    use crate::selection::{PayloadRange, SiteSelector};
    use serde_json::json;

    fn dataset() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            LaunchRecord::new("A", 1000.0, Outcome::Success, "FT"),
            LaunchRecord::new("B", 5000.0, Outcome::Failure, "FT"),
            LaunchRecord::new("A", 9000.0, Outcome::Success, "B4"),
        ])
        .unwrap()
    }

    #[test]
    fn test_binding_table_shape() {
        let table = binding_table();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].output.id, PIE_CHART);
        assert_eq!(table[0].inputs.len(), 1);
        assert_eq!(table[1].output.id, SCATTER_CHART);
        assert_eq!(table[1].inputs.len(), 2);
    }

    #[test]
    fn test_bindings_reference_layout_components() {
        let layout = build_layout(&dataset());
        for binding in binding_table() {
            assert!(layout.find(binding.output.id).is_some());
            for input in binding.inputs {
                assert!(layout.find(input.id).is_some(), "missing {}", input.id);
            }
        }
    }

    #[test]
    fn test_triggers() {
        let outputs: Vec<&str> = bindings_triggered_by(SITE_DROPDOWN)
            .map(|b| b.output.id)
            .collect();
        assert_eq!(outputs, vec![PIE_CHART, SCATTER_CHART]);

        let outputs: Vec<&str> = bindings_triggered_by(PAYLOAD_SLIDER)
            .map(|b| b.output.id)
            .collect();
        assert_eq!(outputs, vec![SCATTER_CHART]);

        assert_eq!(bindings_triggered_by(PIE_CHART).count(), 0);
    }

    #[test]
    fn test_trigger_map() {
        let triggers = trigger_map();
        assert_eq!(triggers.len(), 2);
        assert_eq!(triggers[SITE_DROPDOWN], vec![PIE_CHART, SCATTER_CHART]);
        assert_eq!(triggers[PAYLOAD_SLIDER], vec![SCATTER_CHART]);
    }

    #[test]
    fn test_dispatch_partial_range() {
        let ds = dataset();
        let request = UpdateRequest::new(SCATTER_CHART)
            .with_input(SITE_DROPDOWN, json!("A"))
            .with_input(PAYLOAD_SLIDER, json!([2000, null]));
        let response = dispatch(&ds, &request).unwrap();
        assert_eq!(
            response.warnings,
            vec!["No upper payload bound selected, using 9000 kg"]
        );
        assert_eq!(
            response.figure,
            compute_correlation_chart(
                &ds,
                &SiteSelector::Site("A".to_string()),
                PayloadRange::new(2000.0, 9000.0)
            )
        );
    }

    #[test]
    fn test_dispatch_proportion() {
        let ds = dataset();
        let request = UpdateRequest::new(PIE_CHART).with_input(SITE_DROPDOWN, json!("A"));
        let response = dispatch(&ds, &request).unwrap();
        assert_eq!(response.output, PIE_CHART);
        assert!(response.warnings.is_empty());
        assert_eq!(
            response.figure,
            compute_proportion_chart(&ds, &SiteSelector::Site("A".to_string()))
        );
    }

    #[test]
    fn test_dispatch_correlation() {
        let ds = dataset();
        let request = UpdateRequest::new(SCATTER_CHART)
            .with_input(SITE_DROPDOWN, json!("ALL"))
            .with_input(PAYLOAD_SLIDER, json!([2000, 10000]));
        let response = dispatch(&ds, &request).unwrap();
        assert!(response.warnings.is_empty());
        assert_eq!(response.figure.point_count(), 2);
    }

    #[test]
    fn test_dispatch_site_without_range_uses_full_range() {
        let ds = dataset();
        let request = UpdateRequest::new(SCATTER_CHART)
            .with_input(SITE_DROPDOWN, json!("A"))
            .with_input(PAYLOAD_SLIDER, Value::Null);
        let response = dispatch(&ds, &request).unwrap();
        assert_eq!(response.warnings.len(), 1);
        assert_eq!(
            response.figure,
            compute_correlation_chart(
                &ds,
                &SiteSelector::Site("A".to_string()),
                PayloadRange::new(1000.0, 9000.0)
            )
        );
        assert_eq!(response.figure.point_count(), 2);
    }

    #[test]
    fn test_dispatch_unknown_site_falls_back() {
        let ds = dataset();
        let request = UpdateRequest::new(PIE_CHART).with_input(SITE_DROPDOWN, json!("Z"));
        let response = dispatch(&ds, &request).unwrap();
        assert_eq!(response.warnings, vec!["Unknown launch site 'Z', showing all sites"]);
        assert_eq!(
            response.figure,
            compute_proportion_chart(&ds, &SiteSelector::All)
        );
    }

    #[test]
    fn test_dispatch_errors() {
        let ds = dataset();
        let err = dispatch(&ds, &UpdateRequest::new("nope")).unwrap_err();
        assert_eq!(err, DispatchError::UnknownOutput("nope".to_string()));

        let request = UpdateRequest::new(SCATTER_CHART)
            .with_input(SITE_DROPDOWN, json!("ALL"))
            .with_input(PAYLOAD_SLIDER, json!([1000]));
        assert!(matches!(
            dispatch(&ds, &request),
            Err(DispatchError::MalformedInput {
                id: PAYLOAD_SLIDER,
                ..
            })
        ));

        let request = UpdateRequest::new(SCATTER_CHART)
            .with_input(PAYLOAD_SLIDER, json!([1000, "heavy"]));
        assert_eq!(
            dispatch(&ds, &request),
            Err(DispatchError::MalformedInput {
                id: PAYLOAD_SLIDER,
                reason: "upper bound \"heavy\" is not a number".to_string(),
            })
        );

        let request = UpdateRequest::new(PIE_CHART).with_input(SITE_DROPDOWN, json!(42));
        assert!(matches!(
            dispatch(&ds, &request),
            Err(DispatchError::MalformedInput {
                id: SITE_DROPDOWN,
                ..
            })
        ));
    }
}
