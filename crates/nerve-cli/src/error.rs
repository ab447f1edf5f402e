use nervemodel::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The build ran to the end but a step failed along the way.
    #[error("Build of '{target}' failed: {source}")]
    BuildFailed {
        target: String,
        #[source]
        source: EngineError,
    },

    #[error("The model was built but could not be saved")]
    NotSaved,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Process exit code; each engine error kind keeps its own code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Core(e) | Self::BuildFailed { source: e, .. } => e.exit_code(),
            Self::Config(_) | Self::FileParsing { .. } => 2,
            Self::NotSaved => 10,
            Self::Io(_) | Self::Other(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nervemodel::core::ids::IdentifierError;

    #[test]
    fn engine_errors_keep_their_exit_codes() {
        let naming = EngineError::from(IdentifierError::UnknownPseudonym("x".into()));
        assert_eq!(CliError::from(naming).exit_code(), 4);

        let failed = CliError::BuildFailed {
            target: "Cuff.json".into(),
            source: EngineError::from(IdentifierError::DuplicateScope("x".into())),
        };
        assert_eq!(failed.exit_code(), 4);
        assert_eq!(CliError::Config("bad".into()).exit_code(), 2);
        assert_eq!(CliError::NotSaved.exit_code(), 10);
    }
}
