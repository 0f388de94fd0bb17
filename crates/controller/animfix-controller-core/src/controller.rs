//! Controller model: named parameters and an ordered layer stack.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    Bool,
    Int,
    Float,
    Trigger,
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParameterKind::Bool => "Bool",
            ParameterKind::Int => "Int",
            ParameterKind::Float => "Float",
            ParameterKind::Trigger => "Trigger",
        };
        f.write_str(s)
    }
}

/// Parameter default, typed by kind. Triggers carry no default.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Trigger,
}

impl ParameterValue {
    pub fn kind(&self) -> ParameterKind {
        match self {
            ParameterValue::Bool(_) => ParameterKind::Bool,
            ParameterValue::Int(_) => ParameterKind::Int,
            ParameterValue::Float(_) => ParameterKind::Float,
            ParameterValue::Trigger => ParameterKind::Trigger,
        }
    }

    /// Same kind, different default. Triggers never differ.
    pub fn default_differs(&self, other: &ParameterValue) -> bool {
        match (self, other) {
            (ParameterValue::Bool(a), ParameterValue::Bool(b)) => a != b,
            (ParameterValue::Int(a), ParameterValue::Int(b)) => a != b,
            (ParameterValue::Float(a), ParameterValue::Float(b)) => a != b,
            _ => false,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Bool(v) => write!(f, "{v}"),
            ParameterValue::Int(v) => write!(f, "{v}"),
            ParameterValue::Float(v) => write!(f, "{v}"),
            ParameterValue::Trigger => f.write_str("trigger"),
        }
    }
}

/// A layer of the controller. Layers have no identity beyond their position;
/// the state machine is carried as opaque host data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    #[serde(default = "full_weight")]
    pub default_weight: f32,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub state_machine: serde_json::Value,
}

fn full_weight() -> f32 {
    1.0
}

impl Layer {
    pub fn new(name: impl Into<String>, default_weight: f32) -> Self {
        Self {
            name: name.into(),
            default_weight,
            state_machine: serde_json::Value::Null,
        }
    }
}

/// Parameter graph plus layer stack. Parameters are keyed by name and keep
/// insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Controller {
    pub name: String,
    #[serde(default)]
    pub parameters: IndexMap<String, ParameterValue>,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl Controller {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: ParameterValue) -> Self {
        self.add_parameter(name, value);
        self
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Add a parameter unless one with that name exists. Returns whether it
    /// was added.
    pub fn add_parameter(&mut self, name: impl Into<String>, value: ParameterValue) -> bool {
        match self.parameters.entry(name.into()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterValue> {
        self.parameters.get(name)
    }

    /// Drop every parameter and layer.
    pub fn clear(&mut self) {
        self.parameters.clear();
        self.layers.clear();
    }
}
