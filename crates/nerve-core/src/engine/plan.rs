use crate::core::template::{InstanceDef, ParamDef, TemplateData, group_label};
use itertools::Itertools;

/// What building one template will create, in creation order.
///
/// Primitive and material types are distinct and listed by first occurrence,
/// materials deduplicated across every instance of the template.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildPlan {
    pub template: String,
    pub group_label: String,
    pub params: Vec<ParamDef>,
    pub primitive_types: Vec<String>,
    pub material_types: Vec<String>,
    pub instances: Vec<InstanceDef>,
}

impl BuildPlan {
    pub fn from_template(name: &str, data: TemplateData) -> Self {
        let primitive_types = data
            .instances
            .iter()
            .map(|i| i.type_name.clone())
            .unique()
            .collect();
        let material_types = data
            .instances
            .iter()
            .flat_map(|i| i.materials.iter().map(|m| m.type_name.clone()))
            .unique()
            .collect();
        Self {
            template: name.to_string(),
            group_label: group_label(name).to_string(),
            params: data.params,
            primitive_types,
            material_types,
            instances: data.instances,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn types_are_distinct_in_first_occurrence_order() {
        let data = TemplateData::from_value(json!({
            "params": [{"name": "r", "expression": "1[mm]", "description": "radius"}],
            "instances": [
                {"type": "RibbonContact_Primitive", "label": "c1",
                 "materials": [{"type": "Platinum"}, {"type": "silicone", "label": "recess"}]},
                {"type": "TubeCuff_Primitive", "label": "cuff", "materials": [{"type": "silicone"}]},
                {"type": "RibbonContact_Primitive", "label": "c2", "materials": [{"type": "Platinum"}]}
            ]
        }))
        .unwrap();

        let plan = BuildPlan::from_template("Enteromedics.json", data);
        assert_eq!(plan.group_label, "Enteromedics");
        assert_eq!(
            plan.primitive_types,
            ["RibbonContact_Primitive", "TubeCuff_Primitive"]
        );
        assert_eq!(plan.material_types, ["Platinum", "silicone"]);
        assert_eq!(plan.instances.len(), 3);
        assert_eq!(plan.params.len(), 1);
    }

    #[test]
    fn empty_template_plans_nothing() {
        let data = TemplateData::from_value(json!({"params": [], "instances": []})).unwrap();
        let plan = BuildPlan::from_template("Empty", data);
        assert!(plan.primitive_types.is_empty());
        assert!(plan.material_types.is_empty());
        assert_eq!(plan.group_label, "Empty");
    }
}
