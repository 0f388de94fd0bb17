//! Configuration for the binding fixer.

use serde::{Deserialize, Serialize};

use animfix_api_core::ComponentType;

use crate::error::ConfigError;
use crate::registry::{ConversionRule, IdentityMap, TableMap};

/// Fixer configuration. Every field has a default so partial JSON is accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixerConfig {
    /// Seed the registry with the renderer swaps from
    /// [`builtin_conversions`](crate::registry::builtin_conversions).
    pub builtin_conversions: bool,

    /// Extra conversion rules, applied after the built-in ones (later wins).
    pub conversions: Vec<ConversionRuleSpec>,

    /// Log a warning whenever a path resolves through duplicate-named siblings.
    pub warn_on_ambiguous_paths: bool,
}

impl Default for FixerConfig {
    fn default() -> Self {
        Self {
            builtin_conversions: true,
            conversions: Vec::new(),
            warn_on_ambiguous_paths: true,
        }
    }
}

impl FixerConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Serialized conversion rule. Without `properties` the rule keeps property
/// names unchanged; with it, only the listed properties convert.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversionRuleSpec {
    pub from: ComponentType,
    pub to: ComponentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<TableMap>,
}

impl ConversionRuleSpec {
    pub fn to_rule(&self) -> ConversionRule {
        match &self.properties {
            Some(table) => ConversionRule::new(self.from.clone(), self.to.clone(), table.clone()),
            None => ConversionRule::new(self.from.clone(), self.to.clone(), IdentityMap),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let cfg = FixerConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, FixerConfig::default());
        assert!(cfg.builtin_conversions);
    }

    #[test]
    fn parses_rules_with_and_without_tables() {
        let cfg = FixerConfig::from_json_str(
            r#"{
                "builtin_conversions": false,
                "conversions": [
                    { "from": "DynamicBone", "to": "PhysBone" },
                    { "from": "Light", "to": "Spotlight", "properties": { "m_Color": "color" } }
                ]
            }"#,
        )
        .unwrap();
        assert!(!cfg.builtin_conversions);
        let identity = cfg.conversions[0].to_rule();
        assert_eq!(
            identity.properties.map_property("anything").as_deref(),
            Some("anything")
        );
        let table = cfg.conversions[1].to_rule();
        assert_eq!(table.properties.map_property("m_Color").as_deref(), Some("color"));
        assert_eq!(table.properties.map_property("m_Range"), None);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            FixerConfig::from_json_str("{ nope"),
            Err(ConfigError::Parse { .. })
        ));
    }
}
