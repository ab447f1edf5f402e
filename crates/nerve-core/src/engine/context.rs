use super::catalog::PartCatalog;
use crate::backend::ModelBackend;
use crate::core::ids::{Identifier, IdentifierManager};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// A model being built: the backend session plus everything needed to name
/// things in it consistently.
///
/// The context owns the top-level [`IdentifierManager`]. Orchestration calls
/// borrow it mutably one at a time, so tests can build isolated contexts
/// without sharing any naming state.
pub struct ModelContext<B: ModelBackend> {
    backend: B,
    ids: IdentifierManager,
    /// Point current sources, keyed by the label of the instance they sit on.
    current_sources: Vec<(String, Identifier)>,
    root: PathBuf,
    dest: Option<PathBuf>,
}

impl<B: ModelBackend> ModelContext<B> {
    pub fn new(backend: B, root: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            ids: IdentifierManager::new(),
            current_sources: Vec::new(),
            root: root.into(),
            dest: None,
        }
    }

    /// Sets where [`save_default`](Self::save_default) writes. Relative paths
    /// are taken from the project root.
    pub fn with_destination(mut self, dest: impl Into<PathBuf>) -> Self {
        self.dest = Some(dest.into());
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn ids(&self) -> &IdentifierManager {
        &self.ids
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn destination(&self) -> Option<PathBuf> {
        self.dest.as_ref().map(|d| self.root.join(d))
    }

    pub fn current_sources(&self) -> &[(String, Identifier)] {
        &self.current_sources
    }

    pub(crate) fn register_current_source(&mut self, label: &str, source: Identifier) {
        self.current_sources.push((label.to_string(), source));
    }

    pub(crate) fn ids_mut(&mut self) -> &mut IdentifierManager {
        &mut self.ids
    }

    pub(crate) fn catalog(&mut self) -> PartCatalog<'_, B> {
        PartCatalog::new(&mut self.ids, &mut self.backend)
    }

    /// Saves the model session to `path`.
    ///
    /// A failed save is an operator-recoverable event: it is logged and
    /// reported as `false`.
    pub fn save(&mut self, path: &Path) -> bool {
        match self.backend.save(path) {
            Ok(()) => {
                info!("Saved model to {:?}.", path);
                true
            }
            Err(e) => {
                error!("Failed to save model to {:?}: {}", path, e);
                false
            }
        }
    }

    /// Saves to the configured destination; `false` if none is configured.
    pub fn save_default(&mut self) -> bool {
        match self.destination() {
            Some(path) => self.save(&path),
            None => {
                warn!("No save destination configured; the model was not saved.");
                false
            }
        }
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;
    use tempfile::tempdir;

    #[test]
    fn relative_destination_is_taken_from_project_root() {
        let ctx = ModelContext::new(RecordingBackend::new(), "/proj").with_destination("out/model.json");
        assert_eq!(ctx.destination(), Some(PathBuf::from("/proj/out/model.json")));

        let ctx = ModelContext::new(RecordingBackend::new(), "/proj").with_destination("/abs/m.json");
        assert_eq!(ctx.destination(), Some(PathBuf::from("/abs/m.json")));
    }

    #[test]
    fn save_reports_outcome_as_bool() {
        let dir = tempdir().unwrap();
        let mut ctx = ModelContext::new(RecordingBackend::new(), dir.path());
        assert!(!ctx.save_default());

        let mut ctx = ctx.with_destination("model.json");
        assert!(ctx.save_default());
        assert!(dir.path().join("model.json").is_file());

        assert!(!ctx.save(&dir.path().join("missing").join("model.json")));
    }
}
