use super::error::{InstanceCreationError, PartCreationError};
use super::primitives::{self, PrimitiveRecipe};
use crate::backend::{BackendError, ContourRole, ModelBackend};
use crate::core::fascicle::{FascicleGeometry, FascicleKind};
use crate::core::ids::{Identifier, IdentifierError, IdentifierManager, namespace};
use crate::core::template::{InstanceDef, MasterConfig};
use tracing::{debug, info};

const CONDUCTIVITY_PROPERTY: &str = "electricconductivity";
const POINT_CURRENT_SOURCE: &str = "PointCurrentSource";

/// Outcome of asking for a primitive or material to exist.
#[derive(Debug)]
pub enum Ensure<T> {
    /// Created earlier; nothing was done.
    AlreadyExists(T),
    /// Created by this call.
    Created(T),
    Failed(PartCreationError),
}

impl<T> Ensure<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn into_result(self) -> Result<T, PartCreationError> {
        match self {
            Self::AlreadyExists(v) | Self::Created(v) => Ok(v),
            Self::Failed(e) => Err(e),
        }
    }
}

/// Creates part primitives, materials, and part instances, each primitive
/// and material at most once per governing identifier manager.
///
/// The catalog borrows the manager and the backend, so it cannot outlive
/// either of them.
pub struct PartCatalog<'a, B: ModelBackend> {
    ids: &'a mut IdentifierManager,
    backend: &'a mut B,
}

impl<'a, B: ModelBackend> PartCatalog<'a, B> {
    pub fn new(ids: &'a mut IdentifierManager, backend: &'a mut B) -> Self {
        Self { ids, backend }
    }

    /// Makes sure the primitive `type_name` exists and returns the child
    /// manager scoping its internal features.
    pub fn ensure_primitive(&mut self, type_name: &str) -> Ensure<&IdentifierManager> {
        if self.ids.has_pseudonym(type_name) {
            let existing = match self.bound_in(type_name, namespace::PART) {
                Ok(id) => id,
                Err(e) => return Ensure::Failed(e.into()),
            };
            return match self.ids.scope(type_name) {
                Some(scope) => Ensure::AlreadyExists(scope),
                None => Ensure::Failed(PartCreationError::Incomplete {
                    type_name: type_name.to_string(),
                    id: existing,
                }),
            };
        }

        let Some(recipe) = primitives::recipe(type_name) else {
            return Ensure::Failed(PartCreationError::UnsupportedPrimitiveType(
                type_name.to_string(),
            ));
        };

        let part_id = match self.ids.next_named(namespace::PART, type_name) {
            Ok(id) => id,
            Err(e) => return Ensure::Failed(e.into()),
        };
        let child = match self.construct_primitive(&part_id, recipe) {
            Ok(child) => child,
            Err(e) => return Ensure::Failed(e.into_part_error(type_name)),
        };
        info!(
            "Created primitive '{}' as '{}' with {} feature(s).",
            type_name,
            part_id,
            recipe.features.len()
        );

        if let Err(e) = self.ids.adopt_scope(type_name, child) {
            return Ensure::Failed(e.into());
        }
        match self.ids.scope(type_name) {
            Some(scope) => Ensure::Created(scope),
            None => Ensure::Failed(PartCreationError::Incomplete {
                type_name: type_name.to_string(),
                id: part_id,
            }),
        }
    }

    fn construct_primitive(
        &mut self,
        part_id: &Identifier,
        recipe: &PrimitiveRecipe,
    ) -> Result<IdentifierManager, ConstructionError> {
        let mut child = IdentifierManager::new();
        self.backend.create_part(part_id, recipe.label)?;
        for (name, default) in recipe.inputs {
            self.backend.set_part_input(part_id, name, default)?;
        }
        for feature in recipe.features {
            let feature_id = child.next_named(feature.namespace, feature.label)?;
            self.backend
                .create_part_feature(part_id, &feature_id, feature.feature_type, feature.label)?;
        }
        Ok(child)
    }

    /// Makes sure the material `type_name` is defined, taking its
    /// conductivity from the master configuration.
    pub fn ensure_material(&mut self, type_name: &str, master: &MasterConfig) -> Ensure<Identifier> {
        if self.ids.has_pseudonym(type_name) {
            return match self.bound_in(type_name, namespace::MATERIAL) {
                Ok(id) if self.ids.scope(type_name).is_some() => Ensure::AlreadyExists(id),
                Ok(id) => Ensure::Failed(PartCreationError::Incomplete {
                    type_name: type_name.to_string(),
                    id,
                }),
                Err(e) => Ensure::Failed(e.into()),
            };
        }

        let Some(conductivity) = master.conductivity(type_name) else {
            return Ensure::Failed(PartCreationError::UnsupportedMaterialType(
                type_name.to_string(),
            ));
        };

        let material_id = match self.ids.next_named(namespace::MATERIAL, type_name) {
            Ok(id) => id,
            Err(e) => return Ensure::Failed(e.into()),
        };
        let created = self
            .backend
            .create_material(&material_id, type_name)
            .and_then(|_| {
                self.backend
                    .set_material_property(&material_id, CONDUCTIVITY_PROPERTY, conductivity)
            });
        if let Err(source) = created {
            return Ensure::Failed(PartCreationError::Backend {
                type_name: type_name.to_string(),
                source,
            });
        }
        // Materials have no internal features; the empty scope marks completion.
        if let Err(e) = self.ids.adopt_scope(type_name, IdentifierManager::new()) {
            return Ensure::Failed(e.into());
        }
        info!(
            "Defined material '{}' as '{}' ({} = {}).",
            type_name, material_id, CONDUCTIVITY_PROPERTY, conductivity
        );
        Ensure::Created(material_id)
    }

    /// Places one instance of an already-ensured primitive into the model.
    ///
    /// Never deduplicated: every call creates a new instance. Parameter
    /// overrides are applied first, then every free-form template field is
    /// handed to the backend. Returns the point current source created for
    /// current-carrying primitives.
    pub fn create_instance(
        &mut self,
        instance_id: &Identifier,
        instance: &InstanceDef,
    ) -> Result<Option<Identifier>, InstanceCreationError> {
        let label = instance.label.as_str();
        let part_id = self.ensured_part(label, &instance.type_name)?;

        let mut material_ids = Vec::with_capacity(instance.materials.len());
        for material in &instance.materials {
            let missing = || InstanceCreationError::MissingMaterial {
                label: label.to_string(),
                type_name: material.type_name.clone(),
            };
            let id = match self.bound_in(&material.type_name, namespace::MATERIAL) {
                Ok(id) => id,
                Err(IdentifierError::UnknownPseudonym(_)) => return Err(missing()),
                Err(e) => return Err(e.into()),
            };
            if self.ids.scope(&material.type_name).is_none() {
                return Err(missing());
            }
            material_ids.push((id, material.domain()));
        }

        let backend_err = |source| InstanceCreationError::Backend {
            label: label.to_string(),
            source,
        };
        self.backend
            .create_part_instance(instance_id, &part_id, label)
            .map_err(backend_err)?;
        for (name, expression) in &instance.def {
            self.backend
                .set_instance_param(instance_id, name, expression)
                .map_err(backend_err)?;
        }
        for (key, value) in &instance.extra {
            self.backend
                .set_instance_data(instance_id, key, value)
                .map_err(backend_err)?;
        }
        for (material_id, domain) in &material_ids {
            self.backend
                .link_material(instance_id, material_id, domain)
                .map_err(backend_err)?;
        }

        let carries_current = primitives::recipe(&instance.type_name)
            .is_some_and(|recipe| recipe.current_source);
        if !carries_current {
            return Ok(None);
        }
        let source_id = self.ids.next(namespace::CURRENT_SOURCE);
        self.backend
            .create_physics_feature(&source_id, POINT_CURRENT_SOURCE, instance_id)
            .map_err(backend_err)?;
        debug!(
            "Attached point current source '{}' to instance '{}'.",
            source_id, instance_id
        );
        Ok(Some(source_id))
    }

    /// Places one fascicle built from its contour files.
    pub fn create_fascicle_instance(
        &mut self,
        instance_id: &Identifier,
        label: &str,
        kind: FascicleKind,
        geometry: &FascicleGeometry,
    ) -> Result<(), InstanceCreationError> {
        let part_id = self.ensured_part(label, kind.primitive_name())?;
        let backend_err = |source| InstanceCreationError::Backend {
            label: label.to_string(),
            source,
        };
        self.backend
            .create_part_instance(instance_id, &part_id, label)
            .map_err(backend_err)?;
        self.backend
            .import_contours(instance_id, ContourRole::Inner, &geometry.inners)
            .map_err(backend_err)?;
        self.backend
            .import_contours(instance_id, ContourRole::Outer, &geometry.outers)
            .map_err(backend_err)?;
        Ok(())
    }

    fn ensured_part(&self, label: &str, type_name: &str) -> Result<Identifier, InstanceCreationError> {
        let missing = || InstanceCreationError::MissingPrimitive {
            label: label.to_string(),
            type_name: type_name.to_string(),
        };
        let part_id = match self.bound_in(type_name, namespace::PART) {
            Ok(id) => id,
            Err(IdentifierError::UnknownPseudonym(_)) => return Err(missing()),
            Err(e) => return Err(e.into()),
        };
        if self.ids.scope(type_name).is_none() {
            return Err(missing());
        }
        Ok(part_id)
    }

    /// Resolves `pseudonym`, requiring it to live in `expected` namespace.
    fn bound_in(&self, pseudonym: &str, expected: &str) -> Result<Identifier, IdentifierError> {
        let id = self.ids.get(pseudonym)?;
        if id.namespace() != expected {
            return Err(IdentifierError::DuplicatePseudonym {
                pseudonym: pseudonym.to_string(),
                existing: id.clone(),
                namespace: expected.to_string(),
            });
        }
        Ok(id.clone())
    }
}

enum ConstructionError {
    Backend(BackendError),
    Identifier(IdentifierError),
}

impl From<BackendError> for ConstructionError {
    fn from(e: BackendError) -> Self {
        Self::Backend(e)
    }
}

impl From<IdentifierError> for ConstructionError {
    fn from(e: IdentifierError) -> Self {
        Self::Identifier(e)
    }
}

impl ConstructionError {
    fn into_part_error(self, type_name: &str) -> PartCreationError {
        match self {
            Self::Backend(source) => PartCreationError::Backend {
                type_name: type_name.to_string(),
                source,
            },
            Self::Identifier(e) => PartCreationError::Identifier(e),
        }
    }
}
