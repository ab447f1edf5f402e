use super::error::BackendError;
use crate::core::ids::Identifier;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Which boundary of a fascicle a set of imported contours describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContourRole {
    Inner,
    Outer,
}

/// The capabilities of a modeling engine that a model build consumes.
///
/// All objects the build creates are named with identifiers minted by an
/// [`IdentifierManager`](crate::core::ids::IdentifierManager); the backend
/// never invents names of its own. Part features are named within their
/// part, so the same feature identifier may appear under different parts.
///
/// Implementations are driven from a single thread, one call at a time.
pub trait ModelBackend {
    // --- Parameters ---

    fn create_param_group(&mut self, group: &Identifier) -> Result<(), BackendError>;

    fn label_param_group(&mut self, group: &Identifier, label: &str)
    -> Result<(), BackendError>;

    fn set_param(
        &mut self,
        group: &Identifier,
        name: &str,
        expression: &str,
        description: &str,
    ) -> Result<(), BackendError>;

    /// Sets a parameter in the model's default parameter group.
    fn set_global_param(
        &mut self,
        name: &str,
        expression: &str,
        description: &str,
    ) -> Result<(), BackendError>;

    // --- Geometry parts ---

    fn create_part(&mut self, part: &Identifier, label: &str) -> Result<(), BackendError>;

    /// Declares an input parameter of a part with its default expression.
    fn set_part_input(
        &mut self,
        part: &Identifier,
        name: &str,
        default: &str,
    ) -> Result<(), BackendError>;

    fn create_part_feature(
        &mut self,
        part: &Identifier,
        feature: &Identifier,
        feature_type: &str,
        label: &str,
    ) -> Result<(), BackendError>;

    // --- Materials ---

    fn create_material(&mut self, material: &Identifier, label: &str)
    -> Result<(), BackendError>;

    fn set_material_property(
        &mut self,
        material: &Identifier,
        property: &str,
        expression: &str,
    ) -> Result<(), BackendError>;

    // --- Part instances ---

    fn create_part_instance(
        &mut self,
        instance: &Identifier,
        part: &Identifier,
        label: &str,
    ) -> Result<(), BackendError>;

    fn set_instance_param(
        &mut self,
        instance: &Identifier,
        name: &str,
        expression: &str,
    ) -> Result<(), BackendError>;

    /// Hands a free-form template field of an instance to the engine as is.
    fn set_instance_data(
        &mut self,
        instance: &Identifier,
        key: &str,
        value: &Value,
    ) -> Result<(), BackendError>;

    /// Applies a material to one named domain of an instance.
    fn link_material(
        &mut self,
        instance: &Identifier,
        material: &Identifier,
        domain: &str,
    ) -> Result<(), BackendError>;

    fn import_contours(
        &mut self,
        instance: &Identifier,
        role: ContourRole,
        paths: &[PathBuf],
    ) -> Result<(), BackendError>;

    // --- Physics ---

    fn create_physics_feature(
        &mut self,
        feature: &Identifier,
        feature_type: &str,
        instance: &Identifier,
    ) -> Result<(), BackendError>;

    fn set_feature_property(
        &mut self,
        feature: &Identifier,
        property: &str,
        value: f64,
    ) -> Result<(), BackendError>;

    // --- Geometry sequence ---

    /// Builds the geometry sequence up to and including the feature `tag`.
    fn run_geometry(&mut self, tag: &str) -> Result<(), BackendError>;

    // --- Results ---

    /// Evaluates `expression` at each point and returns one value per point.
    fn interpolate(
        &mut self,
        result: &Identifier,
        expression: &str,
        points: &[Point3<f64>],
    ) -> Result<Vec<f64>, BackendError>;

    // --- Session ---

    fn save(&mut self, path: &Path) -> Result<(), BackendError>;
}
