use super::error::EngineError;
use crate::core::ids::Identifier;
use std::fmt;

/// The step of a build at which it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Load,
    Parameters,
    Primitives,
    Materials,
    Instances,
    Fascicles,
    Currents,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Parameters => "parameters",
            Stage::Primitives => "primitives",
            Stage::Materials => "materials",
            Stage::Instances => "instances",
            Stage::Fascicles => "fascicles",
            Stage::Currents => "currents",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct BuildFailure {
    pub stage: Stage,
    pub error: EngineError,
}

/// Outcome of one orchestration call.
///
/// Identifiers in `committed` were minted (and possibly applied to the
/// backend) before any failure. They are not rolled back and will never be
/// reissued.
#[derive(Debug)]
pub struct BuildResult {
    /// Template name, or a fixed label for non-template builds.
    pub target: String,
    pub failure: Option<BuildFailure>,
    pub committed: Vec<Identifier>,
}

impl BuildResult {
    pub fn succeeded(target: impl Into<String>, committed: Vec<Identifier>) -> Self {
        Self {
            target: target.into(),
            failure: None,
            committed,
        }
    }

    pub fn failed(
        target: impl Into<String>,
        stage: Stage,
        error: EngineError,
        committed: Vec<Identifier>,
    ) -> Self {
        Self {
            target: target.into(),
            failure: Some(BuildFailure { stage, error }),
            committed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.failure {
            None => write!(
                f,
                "'{}' built ({} identifier(s))",
                self.target,
                self.committed.len()
            ),
            Some(failure) => write!(
                f,
                "'{}' failed at {} stage after {} identifier(s): {}",
                self.target,
                failure.stage,
                self.committed.len(),
                failure.error
            ),
        }
    }
}
