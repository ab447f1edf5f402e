use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One entry of a template's `params` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParamDef {
    pub name: String,
    pub expression: String,
    pub description: String,
}

/// A material referenced by a part instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MaterialRef {
    /// Material type name, looked up in the master conductivity table.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Domain of the instance the material is applied to. Defaults to the
    /// material type name when absent.
    #[serde(default)]
    pub label: Option<String>,
}

impl MaterialRef {
    pub fn domain(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.type_name)
    }
}

/// One entry of a template's `instances` array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InstanceDef {
    /// Part primitive type the instance is built from.
    #[serde(rename = "type")]
    pub type_name: String,
    pub label: String,
    #[serde(default)]
    pub materials: Vec<MaterialRef>,
    /// Instance parameter overrides, applied in key order.
    #[serde(default)]
    pub def: BTreeMap<String, String>,
    /// Any remaining free-form fields, forwarded to the backend with the
    /// instance.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A parsed cuff template.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TemplateData {
    pub params: Vec<ParamDef>,
    pub instances: Vec<InstanceDef>,
}

impl TemplateData {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Label of a parameter group derived from a template file name: everything
/// before the first `.`.
pub fn group_label(template_name: &str) -> &str {
    template_name.split('.').next().unwrap_or(template_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_params_and_instances_with_free_form_fields() {
        let data = TemplateData::from_value(json!({
            "params": [{"name": "r", "expression": "1[mm]", "description": "radius"}],
            "instances": [{
                "type": "TubeCuff_Primitive",
                "label": "cuff0",
                "materials": [{"type": "silicone", "label": "Cuff"}],
                "def": {"R_in": "r"},
                "note": "outer jacket"
            }]
        }))
        .unwrap();

        assert_eq!(data.params[0].expression, "1[mm]");
        let instance = &data.instances[0];
        assert_eq!(instance.type_name, "TubeCuff_Primitive");
        assert_eq!(instance.materials[0].domain(), "Cuff");
        assert_eq!(instance.def.get("R_in").map(String::as_str), Some("r"));
        assert_eq!(instance.extra.get("note"), Some(&json!("outer jacket")));
        assert!(!instance.extra.contains_key("label"));
    }

    #[test]
    fn materials_and_overrides_default_to_empty() {
        let data = TemplateData::from_value(json!({
            "params": [],
            "instances": [{"type": "CuffFill_Primitive", "label": "fill"}]
        }))
        .unwrap();
        assert!(data.instances[0].materials.is_empty());
        assert!(data.instances[0].def.is_empty());
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        assert!(TemplateData::from_value(json!({"params": []})).is_err());
        assert!(
            TemplateData::from_value(json!({
                "params": [{"name": "r", "expression": 1, "description": ""}],
                "instances": []
            }))
            .is_err()
        );
    }

    #[test]
    fn material_domain_falls_back_to_type_name() {
        let material = MaterialRef {
            type_name: "platinum".to_string(),
            label: None,
        };
        assert_eq!(material.domain(), "platinum");
    }

    #[test]
    fn group_label_strips_extension() {
        assert_eq!(group_label("Enteromedics.json"), "Enteromedics");
        assert_eq!(group_label("Purdue"), "Purdue");
    }
}
