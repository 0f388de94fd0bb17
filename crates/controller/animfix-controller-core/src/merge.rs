//! Parameter/layer merge.
//!
//! The target is reset, then rebuilt from the sources in order. Parameters
//! are merged by name; the first occurrence wins and later occurrences are
//! checked against it. Layers are concatenated once the parameter stage has
//! finished without errors, with the first layer of every source forced to
//! full weight.

use serde::Serialize;

use animfix_api_core::{Diagnostic, Severity, UndoSink};

use crate::controller::Controller;
use crate::error::MergeIssue;

const LOG_TARGET: &str = "animfix::merge";
const UNDO_DESCRIPTION: &str = "Merge Controllers";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    pub parameters_added: usize,
    pub layers_appended: usize,
    /// The layer stage was skipped because of a parameter error.
    pub aborted: bool,
}

/// Merges controllers and keeps the issues of the last merge.
#[derive(Debug, Default, Clone)]
pub struct ControllerMerger {
    issues: Vec<MergeIssue>,
}

impl ControllerMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues recorded by the most recent [`merge`](Self::merge).
    pub fn issues(&self) -> &[MergeIssue] {
        &self.issues
    }

    /// Issues of the most recent merge as (message, severity) pairs.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.issues.iter().map(MergeIssue::to_diagnostic).collect()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity() == Severity::Error)
    }

    /// Replace the contents of `target` with the merge of `sources`.
    pub fn merge(
        &mut self,
        target: &mut Controller,
        sources: &[Controller],
        undo: &mut dyn UndoSink,
    ) -> MergeOutcome {
        undo.begin_group();
        undo.record(&target.name, UNDO_DESCRIPTION);
        target.clear();
        self.issues.clear();

        let mut outcome = MergeOutcome::default();
        for source in sources {
            for (name, value) in &source.parameters {
                match target.parameter(name) {
                    None => {
                        target.add_parameter(name.clone(), *value);
                        outcome.parameters_added += 1;
                    }
                    Some(orig) if orig.kind() != value.kind() => {
                        self.issues.push(MergeIssue::ParameterTypeMismatch {
                            name: name.clone(),
                            was: orig.kind(),
                            now: value.kind(),
                        });
                    }
                    Some(orig) if orig.default_differs(value) => {
                        self.issues.push(MergeIssue::ParameterDefaultMismatch {
                            name: name.clone(),
                            was: *orig,
                            now: *value,
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        for issue in &self.issues {
            issue.to_diagnostic().log(LOG_TARGET);
        }
        if self.has_errors() {
            outcome.aborted = true;
            log::info!(
                target: LOG_TARGET,
                "merge into '{}' aborted before layers: {} parameters added",
                target.name,
                outcome.parameters_added
            );
            return outcome;
        }

        for source in sources {
            for (i, layer) in source.layers.iter().enumerate() {
                let mut layer = layer.clone();
                if i == 0 {
                    layer.default_weight = 1.0;
                }
                target.layers.push(layer);
                outcome.layers_appended += 1;
            }
        }

        log::info!(
            target: LOG_TARGET,
            "merged {} controllers into '{}': {} parameters, {} layers, {} issues",
            sources.len(),
            target.name,
            outcome.parameters_added,
            outcome.layers_appended,
            self.issues.len()
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Layer, ParameterValue};
    use animfix_api_core::{HistoryLog, NoHistory};

    fn source(name: &str, params: &[(&str, ParameterValue)], layers: &[(&str, f32)]) -> Controller {
        let mut c = Controller::new(name);
        for (n, v) in params {
            c.add_parameter(*n, *v);
        }
        for (n, w) in layers {
            c.layers.push(Layer::new(*n, *w));
        }
        c
    }

    #[test]
    fn default_mismatch_warns_and_keeps_first() {
        let a = source("A", &[("Speed", ParameterValue::Float(0.0))], &[("A0", 0.2)]);
        let b = source("B", &[("Speed", ParameterValue::Float(1.0))], &[("B0", 0.3), ("B1", 0.4)]);
        let mut target = Controller::new("T");
        let mut merger = ControllerMerger::new();
        let outcome = merger.merge(&mut target, &[a, b], &mut NoHistory);

        assert!(!outcome.aborted);
        assert_eq!(merger.issues().len(), 1);
        let diag = &merger.diagnostics()[0];
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.message, "Parameter default value mismatch: Speed was 0, now 1");
        assert_eq!(target.parameter("Speed"), Some(&ParameterValue::Float(0.0)));

        let weights: Vec<(&str, f32)> = target
            .layers
            .iter()
            .map(|l| (l.name.as_str(), l.default_weight))
            .collect();
        assert_eq!(weights, vec![("A0", 1.0), ("B0", 1.0), ("B1", 0.4)]);
    }

    #[test]
    fn type_mismatch_aborts_layer_stage() {
        let a = source(
            "A",
            &[("Speed", ParameterValue::Float(0.0)), ("Grounded", ParameterValue::Bool(true))],
            &[("A0", 1.0)],
        );
        let b = source(
            "B",
            &[("Speed", ParameterValue::Int(0)), ("Emote", ParameterValue::Int(3))],
            &[("B0", 1.0)],
        );
        let mut target = Controller::new("T").with_layer(Layer::new("stale", 1.0));
        let mut merger = ControllerMerger::new();
        let outcome = merger.merge(&mut target, &[a, b], &mut NoHistory);

        assert!(outcome.aborted);
        assert!(merger.has_errors());
        assert_eq!(
            merger.diagnostics()[0].message,
            "Parameter type mismatch: Speed was Float, now Int"
        );
        assert!(target.layers.is_empty());
        let names: Vec<&str> = target.parameters.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Speed", "Grounded", "Emote"]);
    }

    #[test]
    fn issues_are_rebuilt_per_invocation() {
        let a = source("A", &[("X", ParameterValue::Bool(true))], &[]);
        let b = source("B", &[("X", ParameterValue::Int(1))], &[]);
        let mut target = Controller::new("T");
        let mut merger = ControllerMerger::new();
        merger.merge(&mut target, &[a.clone(), b], &mut NoHistory);
        assert_eq!(merger.issues().len(), 1);
        merger.merge(&mut target, &[a], &mut NoHistory);
        assert!(merger.issues().is_empty());
    }

    #[test]
    fn target_recorded_once_before_reset() {
        let a = source("A", &[("X", ParameterValue::Trigger)], &[("A0", 0.5)]);
        let mut target = Controller::new("FX").with_parameter("old", ParameterValue::Int(1));
        let mut history = HistoryLog::new();
        ControllerMerger::new().merge(&mut target, &[a.clone(), a], &mut history);
        assert_eq!(history.entries().len(), 1);
        assert_eq!(history.entries()[0].object, "FX");
        assert!(target.parameter("old").is_none());
        assert_eq!(target.layers.len(), 2);
    }

    #[test]
    fn disjoint_merges_differ_only_in_layer_order() {
        let g1 = source("G1", &[("A", ParameterValue::Bool(false))], &[("L1", 0.5)]);
        let g2 = source("G2", &[("B", ParameterValue::Float(2.0))], &[("L2", 0.5)]);
        let mut m = ControllerMerger::new();
        let mut t12 = Controller::new("T");
        let mut t21 = Controller::new("T");
        m.merge(&mut t12, &[g1.clone(), g2.clone()], &mut NoHistory);
        m.merge(&mut t21, &[g2, g1], &mut NoHistory);

        let mut p12: Vec<_> = t12.parameters.iter().collect();
        let mut p21: Vec<_> = t21.parameters.iter().collect();
        p12.sort_by(|a, b| a.0.cmp(b.0));
        p21.sort_by(|a, b| a.0.cmp(b.0));
        assert_eq!(p12, p21);
        let l12: Vec<&str> = t12.layers.iter().map(|l| l.name.as_str()).collect();
        let l21: Vec<&str> = t21.layers.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(l12, vec!["L1", "L2"]);
        assert_eq!(l21, vec!["L2", "L1"]);
    }
}
