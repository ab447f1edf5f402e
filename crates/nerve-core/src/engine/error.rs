use super::config::ConfigError;
use crate::backend::BackendError;
use crate::core::fascicle::FascicleError;
use crate::core::ids::{Identifier, IdentifierError};
use crate::core::io::coords::CoordsError;
use crate::core::template::TemplateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PartCreationError {
    #[error("No construction routine is known for primitive type '{0}'")]
    UnsupportedPrimitiveType(String),

    #[error("No conductivity is defined for material type '{0}' in the master configuration")]
    UnsupportedMaterialType(String),

    #[error("'{type_name}' was registered as '{id}' but its creation never completed")]
    Incomplete { type_name: String, id: Identifier },

    #[error("Backend failed while creating '{type_name}': {source}")]
    Backend {
        type_name: String,
        #[source]
        source: BackendError,
    },

    #[error(transparent)]
    Identifier(#[from] IdentifierError),
}

#[derive(Debug, Error)]
pub enum InstanceCreationError {
    #[error("Instance '{label}' references primitive '{type_name}', which has not been created")]
    MissingPrimitive { label: String, type_name: String },

    #[error("Instance '{label}' references material '{type_name}', which has not been defined")]
    MissingMaterial { label: String, type_name: String },

    #[error("Backend failed while creating instance '{label}': {source}")]
    Backend {
        label: String,
        #[source]
        source: BackendError,
    },

    #[error(transparent)]
    Identifier(#[from] IdentifierError),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    PartCreation(#[from] PartCreationError),

    #[error(transparent)]
    InstanceCreation(#[from] InstanceCreationError),

    #[error(transparent)]
    Fascicle(#[from] FascicleError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Coordinate file error: {0}")]
    Coords(#[from] CoordsError),
}

impl EngineError {
    /// Whether this error breaks a naming invariant. Such errors always
    /// propagate to the caller instead of being folded into a failed build.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::Identifier(_)
                | Self::PartCreation(PartCreationError::Identifier(_))
                | Self::InstanceCreation(InstanceCreationError::Identifier(_))
        )
    }

    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        if self.is_invariant_violation() {
            return 4;
        }
        match self {
            Self::Config(_) => 2,
            Self::Template(_) => 3,
            Self::PartCreation(_) => 5,
            Self::InstanceCreation(_) => 6,
            Self::Fascicle(_) => 7,
            Self::Backend(_) => 8,
            Self::Coords(_) => 9,
            Self::Identifier(_) => 4,
        }
    }
}
