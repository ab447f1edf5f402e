use super::error::BackendError;
use super::traits::{ContourRole, ModelBackend};
use crate::core::ids::Identifier;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slotmap::{SlotMap, new_key_type};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

new_key_type! {
    pub struct NodeKey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    ParamGroup,
    Part,
    PartFeature,
    Material,
    PartInstance,
    PhysicsFeature,
}

/// One object in the recorded model.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Fully qualified tag; part features are qualified as `part/feature`.
    pub tag: String,
    pub label: String,
    pub parent: Option<NodeKey>,
    pub properties: BTreeMap<String, String>,
}

/// A single backend call, in the order it was made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    CreateParamGroup {
        group: Identifier,
    },
    LabelParamGroup {
        group: Identifier,
        label: String,
    },
    SetParam {
        group: Identifier,
        name: String,
        expression: String,
        description: String,
    },
    SetGlobalParam {
        name: String,
        expression: String,
        description: String,
    },
    CreatePart {
        part: Identifier,
        label: String,
    },
    SetPartInput {
        part: Identifier,
        name: String,
        default: String,
    },
    CreatePartFeature {
        part: Identifier,
        feature: Identifier,
        feature_type: String,
        label: String,
    },
    CreateMaterial {
        material: Identifier,
        label: String,
    },
    SetMaterialProperty {
        material: Identifier,
        property: String,
        expression: String,
    },
    CreatePartInstance {
        instance: Identifier,
        part: Identifier,
        label: String,
    },
    SetInstanceParam {
        instance: Identifier,
        name: String,
        expression: String,
    },
    SetInstanceData {
        instance: Identifier,
        key: String,
        value: Value,
    },
    LinkMaterial {
        instance: Identifier,
        material: Identifier,
        domain: String,
    },
    ImportContours {
        instance: Identifier,
        role: ContourRole,
        paths: Vec<PathBuf>,
    },
    CreatePhysicsFeature {
        feature: Identifier,
        feature_type: String,
        instance: Identifier,
    },
    SetFeatureProperty {
        feature: Identifier,
        property: String,
        value: f64,
    },
    RunGeometry {
        tag: String,
    },
    Interpolate {
        result: Identifier,
        expression: String,
        points: Vec<[f64; 3]>,
    },
}

impl Operation {
    /// The snake_case name of this operation, as it appears in the journal.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateParamGroup { .. } => "create_param_group",
            Self::LabelParamGroup { .. } => "label_param_group",
            Self::SetParam { .. } => "set_param",
            Self::SetGlobalParam { .. } => "set_global_param",
            Self::CreatePart { .. } => "create_part",
            Self::SetPartInput { .. } => "set_part_input",
            Self::CreatePartFeature { .. } => "create_part_feature",
            Self::CreateMaterial { .. } => "create_material",
            Self::SetMaterialProperty { .. } => "set_material_property",
            Self::CreatePartInstance { .. } => "create_part_instance",
            Self::SetInstanceParam { .. } => "set_instance_param",
            Self::SetInstanceData { .. } => "set_instance_data",
            Self::LinkMaterial { .. } => "link_material",
            Self::ImportContours { .. } => "import_contours",
            Self::CreatePhysicsFeature { .. } => "create_physics_feature",
            Self::SetFeatureProperty { .. } => "set_feature_property",
            Self::RunGeometry { .. } => "run_geometry",
            Self::Interpolate { .. } => "interpolate",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    pub operations: Vec<Operation>,
}

impl Journal {
    pub fn count(&self, name: &str) -> usize {
        self.operations.iter().filter(|op| op.name() == name).count()
    }
}

/// An in-memory modeling backend.
///
/// Objects are kept in a slot map indexed by their qualified tag. Every
/// accepted call is appended to a [`Journal`]; rejected calls leave both the
/// graph and the journal untouched. Saving writes the journal as JSON.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    nodes: SlotMap<NodeKey, Node>,
    tags: HashMap<String, NodeKey>,
    global_params: BTreeMap<String, (String, String)>,
    journal: Journal,
    rejected: HashSet<&'static str>,
    /// Stand-in field evaluated by `interpolate`; there is no solver.
    potential: Option<fn(&Point3<f64>) -> f64>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call of the named operation fail with
    /// [`BackendError::Rejected`], the way a live engine refuses a call.
    pub fn with_rejection(mut self, operation: &'static str) -> Self {
        self.rejected.insert(operation);
        self
    }

    /// Answers interpolation requests by evaluating `field` at each point.
    pub fn with_potential(mut self, field: fn(&Point3<f64>) -> f64) -> Self {
        self.potential = Some(field);
        self
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn node(&self, tag: &str) -> Option<&Node> {
        self.tags.get(tag).and_then(|&key| self.nodes.get(key))
    }

    pub fn property(&self, tag: &str, name: &str) -> Option<&str> {
        self.node(tag)
            .and_then(|n| n.properties.get(name))
            .map(String::as_str)
    }

    pub fn global_param(&self, name: &str) -> Option<(&str, &str)> {
        self.global_params
            .get(name)
            .map(|(e, d)| (e.as_str(), d.as_str()))
    }

    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.values().filter(|n| n.kind == kind).count()
    }

    /// Children of the node tagged `tag`, in creation order.
    pub fn children(&self, tag: &str) -> Vec<&Node> {
        let Some(&parent) = self.tags.get(tag) else {
            return Vec::new();
        };
        self.nodes
            .values()
            .filter(|n| n.parent == Some(parent))
            .collect()
    }

    fn check(&self, op: &Operation) -> Result<(), BackendError> {
        if self.rejected.contains(op.name()) {
            return Err(BackendError::Rejected {
                operation: op.name().to_string(),
                reason: "operation refused by backend".to_string(),
            });
        }
        Ok(())
    }

    fn record(&mut self, op: Operation) {
        trace!("Recording backend operation: {:?}", op);
        self.journal.operations.push(op);
    }

    fn key(&self, tag: &str, kind: NodeKind) -> Result<NodeKey, BackendError> {
        match self.tags.get(tag) {
            Some(&key) if self.nodes[key].kind == kind => Ok(key),
            _ => Err(BackendError::UnknownTag(tag.to_string())),
        }
    }

    fn ensure_free(&self, tag: &str) -> Result<(), BackendError> {
        if self.tags.contains_key(tag) {
            return Err(BackendError::DuplicateTag(tag.to_string()));
        }
        Ok(())
    }

    fn insert(&mut self, kind: NodeKind, tag: String, label: &str, parent: Option<NodeKey>) {
        let key = self.nodes.insert(Node {
            kind,
            tag: tag.clone(),
            label: label.to_string(),
            parent,
            properties: BTreeMap::new(),
        });
        self.tags.insert(tag, key);
    }

    fn set_property(&mut self, key: NodeKey, name: &str, value: String) {
        self.nodes[key].properties.insert(name.to_string(), value);
    }
}

fn feature_tag(part: &Identifier, feature: &Identifier) -> String {
    format!("{part}/{feature}")
}

impl ModelBackend for RecordingBackend {
    fn create_param_group(&mut self, group: &Identifier) -> Result<(), BackendError> {
        let op = Operation::CreateParamGroup {
            group: group.clone(),
        };
        self.check(&op)?;
        self.ensure_free(group.as_str())?;
        self.insert(NodeKind::ParamGroup, group.to_string(), group.as_str(), None);
        self.record(op);
        Ok(())
    }

    fn label_param_group(
        &mut self,
        group: &Identifier,
        label: &str,
    ) -> Result<(), BackendError> {
        let op = Operation::LabelParamGroup {
            group: group.clone(),
            label: label.to_string(),
        };
        self.check(&op)?;
        let key = self.key(group.as_str(), NodeKind::ParamGroup)?;
        self.nodes[key].label = label.to_string();
        self.record(op);
        Ok(())
    }

    fn set_param(
        &mut self,
        group: &Identifier,
        name: &str,
        expression: &str,
        description: &str,
    ) -> Result<(), BackendError> {
        let op = Operation::SetParam {
            group: group.clone(),
            name: name.to_string(),
            expression: expression.to_string(),
            description: description.to_string(),
        };
        self.check(&op)?;
        let key = self.key(group.as_str(), NodeKind::ParamGroup)?;
        self.set_property(key, name, expression.to_string());
        self.record(op);
        Ok(())
    }

    fn set_global_param(
        &mut self,
        name: &str,
        expression: &str,
        description: &str,
    ) -> Result<(), BackendError> {
        let op = Operation::SetGlobalParam {
            name: name.to_string(),
            expression: expression.to_string(),
            description: description.to_string(),
        };
        self.check(&op)?;
        self.global_params.insert(
            name.to_string(),
            (expression.to_string(), description.to_string()),
        );
        self.record(op);
        Ok(())
    }

    fn create_part(&mut self, part: &Identifier, label: &str) -> Result<(), BackendError> {
        let op = Operation::CreatePart {
            part: part.clone(),
            label: label.to_string(),
        };
        self.check(&op)?;
        self.ensure_free(part.as_str())?;
        self.insert(NodeKind::Part, part.to_string(), label, None);
        self.record(op);
        Ok(())
    }

    fn set_part_input(
        &mut self,
        part: &Identifier,
        name: &str,
        default: &str,
    ) -> Result<(), BackendError> {
        let op = Operation::SetPartInput {
            part: part.clone(),
            name: name.to_string(),
            default: default.to_string(),
        };
        self.check(&op)?;
        let key = self.key(part.as_str(), NodeKind::Part)?;
        self.set_property(key, name, default.to_string());
        self.record(op);
        Ok(())
    }

    fn create_part_feature(
        &mut self,
        part: &Identifier,
        feature: &Identifier,
        feature_type: &str,
        label: &str,
    ) -> Result<(), BackendError> {
        let op = Operation::CreatePartFeature {
            part: part.clone(),
            feature: feature.clone(),
            feature_type: feature_type.to_string(),
            label: label.to_string(),
        };
        self.check(&op)?;
        let parent = self.key(part.as_str(), NodeKind::Part)?;
        let tag = feature_tag(part, feature);
        self.ensure_free(&tag)?;
        self.insert(NodeKind::PartFeature, tag.clone(), label, Some(parent));
        let key = self.tags[&tag];
        self.set_property(key, "type", feature_type.to_string());
        self.record(op);
        Ok(())
    }

    fn create_material(
        &mut self,
        material: &Identifier,
        label: &str,
    ) -> Result<(), BackendError> {
        let op = Operation::CreateMaterial {
            material: material.clone(),
            label: label.to_string(),
        };
        self.check(&op)?;
        self.ensure_free(material.as_str())?;
        self.insert(NodeKind::Material, material.to_string(), label, None);
        self.record(op);
        Ok(())
    }

    fn set_material_property(
        &mut self,
        material: &Identifier,
        property: &str,
        expression: &str,
    ) -> Result<(), BackendError> {
        let op = Operation::SetMaterialProperty {
            material: material.clone(),
            property: property.to_string(),
            expression: expression.to_string(),
        };
        self.check(&op)?;
        let key = self.key(material.as_str(), NodeKind::Material)?;
        self.set_property(key, property, expression.to_string());
        self.record(op);
        Ok(())
    }

    fn create_part_instance(
        &mut self,
        instance: &Identifier,
        part: &Identifier,
        label: &str,
    ) -> Result<(), BackendError> {
        let op = Operation::CreatePartInstance {
            instance: instance.clone(),
            part: part.clone(),
            label: label.to_string(),
        };
        self.check(&op)?;
        let parent = self.key(part.as_str(), NodeKind::Part)?;
        self.ensure_free(instance.as_str())?;
        self.insert(
            NodeKind::PartInstance,
            instance.to_string(),
            label,
            Some(parent),
        );
        self.record(op);
        Ok(())
    }

    fn set_instance_param(
        &mut self,
        instance: &Identifier,
        name: &str,
        expression: &str,
    ) -> Result<(), BackendError> {
        let op = Operation::SetInstanceParam {
            instance: instance.clone(),
            name: name.to_string(),
            expression: expression.to_string(),
        };
        self.check(&op)?;
        let key = self.key(instance.as_str(), NodeKind::PartInstance)?;
        self.set_property(key, name, expression.to_string());
        self.record(op);
        Ok(())
    }

    fn set_instance_data(
        &mut self,
        instance: &Identifier,
        key: &str,
        value: &Value,
    ) -> Result<(), BackendError> {
        let op = Operation::SetInstanceData {
            instance: instance.clone(),
            key: key.to_string(),
            value: value.clone(),
        };
        self.check(&op)?;
        let node = self.key(instance.as_str(), NodeKind::PartInstance)?;
        let rendered = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        self.set_property(node, key, rendered);
        self.record(op);
        Ok(())
    }

    fn link_material(
        &mut self,
        instance: &Identifier,
        material: &Identifier,
        domain: &str,
    ) -> Result<(), BackendError> {
        let op = Operation::LinkMaterial {
            instance: instance.clone(),
            material: material.clone(),
            domain: domain.to_string(),
        };
        self.check(&op)?;
        self.key(material.as_str(), NodeKind::Material)?;
        let key = self.key(instance.as_str(), NodeKind::PartInstance)?;
        self.set_property(key, &format!("material:{domain}"), material.to_string());
        self.record(op);
        Ok(())
    }

    fn import_contours(
        &mut self,
        instance: &Identifier,
        role: ContourRole,
        paths: &[PathBuf],
    ) -> Result<(), BackendError> {
        let op = Operation::ImportContours {
            instance: instance.clone(),
            role,
            paths: paths.to_vec(),
        };
        self.check(&op)?;
        let key = self.key(instance.as_str(), NodeKind::PartInstance)?;
        let property = match role {
            ContourRole::Inner => "inners",
            ContourRole::Outer => "outers",
        };
        self.set_property(key, property, paths.len().to_string());
        self.record(op);
        Ok(())
    }

    fn create_physics_feature(
        &mut self,
        feature: &Identifier,
        feature_type: &str,
        instance: &Identifier,
    ) -> Result<(), BackendError> {
        let op = Operation::CreatePhysicsFeature {
            feature: feature.clone(),
            feature_type: feature_type.to_string(),
            instance: instance.clone(),
        };
        self.check(&op)?;
        let parent = self.key(instance.as_str(), NodeKind::PartInstance)?;
        self.ensure_free(feature.as_str())?;
        self.insert(
            NodeKind::PhysicsFeature,
            feature.to_string(),
            feature_type,
            Some(parent),
        );
        self.record(op);
        Ok(())
    }

    fn set_feature_property(
        &mut self,
        feature: &Identifier,
        property: &str,
        value: f64,
    ) -> Result<(), BackendError> {
        let op = Operation::SetFeatureProperty {
            feature: feature.clone(),
            property: property.to_string(),
            value,
        };
        self.check(&op)?;
        let key = self.key(feature.as_str(), NodeKind::PhysicsFeature)?;
        self.set_property(key, property, value.to_string());
        self.record(op);
        Ok(())
    }

    fn run_geometry(&mut self, tag: &str) -> Result<(), BackendError> {
        let op = Operation::RunGeometry {
            tag: tag.to_string(),
        };
        self.check(&op)?;
        self.record(op);
        Ok(())
    }

    fn interpolate(
        &mut self,
        result: &Identifier,
        expression: &str,
        points: &[Point3<f64>],
    ) -> Result<Vec<f64>, BackendError> {
        let op = Operation::Interpolate {
            result: result.clone(),
            expression: expression.to_string(),
            points: points.iter().map(|p| [p.x, p.y, p.z]).collect(),
        };
        self.check(&op)?;
        let field = self.potential.ok_or(BackendError::Unsupported("interpolate"))?;
        self.record(op);
        debug!(
            "Evaluating '{}' for '{}' at {} point(s).",
            expression,
            result,
            points.len()
        );
        Ok(points.iter().map(field).collect())
    }

    fn save(&mut self, path: &Path) -> Result<(), BackendError> {
        let save_err = |source| BackendError::Save {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(save_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.journal)
            .map_err(|e| save_err(std::io::Error::other(e)))?;
        writer.flush().map_err(save_err)?;
        debug!(
            "Saved {} recorded operation(s) to {:?}",
            self.journal.operations.len(),
            path
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::{IdentifierManager, namespace};

    mod graph {
        use super::*;

        #[test]
        fn part_features_are_scoped_under_their_part() {
            let mut ids = IdentifierManager::new();
            let mut backend = RecordingBackend::new();
            let part_a = ids.next(namespace::PART);
            let part_b = ids.next(namespace::PART);
            let wp = IdentifierManager::new().next("wp");

            backend.create_part(&part_a, "A").unwrap();
            backend.create_part(&part_b, "B").unwrap();
            backend
                .create_part_feature(&part_a, &wp, "WorkPlane", "Plane")
                .unwrap();
            backend
                .create_part_feature(&part_b, &wp, "WorkPlane", "Plane")
                .unwrap();

            assert_eq!(backend.count(NodeKind::PartFeature), 2);
            assert_eq!(backend.children("part0").len(), 1);
            assert_eq!(backend.property("part1/wp0", "type"), Some("WorkPlane"));
        }

        #[test]
        fn duplicate_tags_are_refused() {
            let mut ids = IdentifierManager::new();
            let mut backend = RecordingBackend::new();
            let mat = ids.next(namespace::MATERIAL);
            backend.create_material(&mat, "Platinum").unwrap();
            assert!(matches!(
                backend.create_material(&mat, "Platinum"),
                Err(BackendError::DuplicateTag(tag)) if tag == "mat0"
            ));
            assert_eq!(backend.journal().count("create_material"), 1);
        }

        #[test]
        fn instances_require_an_existing_part() {
            let mut ids = IdentifierManager::new();
            let mut backend = RecordingBackend::new();
            let pi = ids.next(namespace::PART_INSTANCE);
            let part = ids.next(namespace::PART);
            assert!(matches!(
                backend.create_part_instance(&pi, &part, "cuff"),
                Err(BackendError::UnknownTag(_))
            ));
            assert!(backend.journal().operations.is_empty());
        }

        #[test]
        fn material_links_are_recorded_per_domain() {
            let mut ids = IdentifierManager::new();
            let mut backend = RecordingBackend::new();
            let part = ids.next(namespace::PART);
            let mat = ids.next(namespace::MATERIAL);
            let pi = ids.next(namespace::PART_INSTANCE);
            backend.create_part(&part, "Cuff").unwrap();
            backend.create_material(&mat, "silicone").unwrap();
            backend.create_part_instance(&pi, &part, "cuff0").unwrap();
            backend.link_material(&pi, &mat, "Cuff").unwrap();

            assert_eq!(backend.property("pi0", "material:Cuff"), Some("mat0"));
            assert_eq!(backend.node("pi0").unwrap().label, "cuff0");
        }
    }

    mod behavior {
        use super::*;

        #[test]
        fn rejected_operations_fail_without_recording() {
            let mut ids = IdentifierManager::new();
            let mut backend = RecordingBackend::new().with_rejection("create_part");
            let part = ids.next(namespace::PART);
            assert!(matches!(
                backend.create_part(&part, "Cuff"),
                Err(BackendError::Rejected { .. })
            ));
            assert!(backend.node("part0").is_none());
            assert!(backend.journal().operations.is_empty());
        }

        #[test]
        fn interpolation_is_unsupported_without_a_field() {
            let mut ids = IdentifierManager::new();
            let mut backend = RecordingBackend::new();
            let interp = ids.next(namespace::INTERPOLATION);
            assert!(matches!(
                backend.interpolate(&interp, "V", &[Point3::origin()]),
                Err(BackendError::Unsupported("interpolate"))
            ));
        }

        #[test]
        fn interpolation_evaluates_the_stand_in_field() {
            let mut ids = IdentifierManager::new();
            let mut backend = RecordingBackend::new().with_potential(|p| p.x + 2.0 * p.z);
            let interp = ids.next(namespace::INTERPOLATION);
            let values = backend
                .interpolate(
                    &interp,
                    "V",
                    &[Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 5.0, 3.0)],
                )
                .unwrap();
            assert_eq!(values, [1.0, 6.0]);
        }

        #[test]
        fn interpolation_is_journaled_and_can_be_refused() {
            let mut ids = IdentifierManager::new();
            let mut backend = RecordingBackend::new().with_potential(|p| p.z);
            let interp = ids.next(namespace::INTERPOLATION);
            backend
                .interpolate(&interp, "V", &[Point3::new(1.0, 2.0, 3.0)])
                .unwrap();
            assert_eq!(
                backend.journal().operations,
                [Operation::Interpolate {
                    result: interp.clone(),
                    expression: "V".to_string(),
                    points: vec![[1.0, 2.0, 3.0]],
                }]
            );

            let mut refusing = RecordingBackend::new()
                .with_potential(|p| p.z)
                .with_rejection("interpolate");
            assert!(matches!(
                refusing.interpolate(&interp, "V", &[Point3::origin()]),
                Err(BackendError::Rejected { .. })
            ));
            assert!(refusing.journal().operations.is_empty());
        }

        #[test]
        fn free_form_instance_data_is_kept_as_text() {
            let mut ids = IdentifierManager::new();
            let mut backend = RecordingBackend::new();
            let part = ids.next(namespace::PART);
            let pi = ids.next(namespace::PART_INSTANCE);
            backend.create_part(&part, "Cuff").unwrap();
            backend.create_part_instance(&pi, &part, "cuff0").unwrap();
            backend
                .set_instance_data(&pi, "position", &serde_json::json!("5[mm]"))
                .unwrap();
            backend
                .set_instance_data(&pi, "flags", &serde_json::json!([1, 2]))
                .unwrap();

            assert_eq!(backend.property("pi0", "position"), Some("5[mm]"));
            assert_eq!(backend.property("pi0", "flags"), Some("[1,2]"));
            assert_eq!(backend.journal().count("set_instance_data"), 2);
        }

        #[test]
        fn save_writes_journal_as_json() {
            let mut ids = IdentifierManager::new();
            let mut backend = RecordingBackend::new();
            let group = ids.next(namespace::PARAMETERS);
            backend.create_param_group(&group).unwrap();
            backend.set_global_param("fascicle0", "NaN", "0").unwrap();

            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("model.json");
            backend.save(&path).unwrap();

            let saved: Journal =
                serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(&saved, backend.journal());
            assert_eq!(backend.global_param("fascicle0"), Some(("NaN", "0")));
        }

        #[test]
        fn save_to_invalid_path_fails() {
            let mut backend = RecordingBackend::new();
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("missing").join("model.json");
            assert!(matches!(
                backend.save(&path),
                Err(BackendError::Save { .. })
            ));
        }
    }
}
