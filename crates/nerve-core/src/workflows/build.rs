use crate::backend::ModelBackend;
use crate::core::fascicle::DirectoryFascicleSource;
use crate::core::template::{FsTemplateStore, TemplateStore};
use crate::engine::config::BuildSettings;
use crate::engine::context::ModelContext;
use crate::engine::error::EngineError;
use crate::engine::orchestrator::BuildOrchestrator;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::result::BuildResult;
use tracing::{info, instrument, warn};

/// Everything a full build did, step by step.
#[derive(Debug)]
pub struct BuildReport {
    /// One result per cuff preset, in preset order.
    pub templates: Vec<BuildResult>,
    /// One result per fascicle pass.
    pub fascicles: Vec<BuildResult>,
    pub currents: BuildResult,
    /// Whether the session was written to disk.
    pub saved: bool,
}

impl BuildReport {
    /// The earliest step that failed, in build order.
    pub fn first_failure(&self) -> Option<&BuildResult> {
        self.templates
            .iter()
            .chain(&self.fascicles)
            .chain(std::iter::once(&self.currents))
            .find(|r| !r.is_success())
    }

    /// Consumes the report, keeping only the earliest failed step.
    pub fn into_first_failure(self) -> Option<BuildResult> {
        self.templates
            .into_iter()
            .chain(self.fascicles)
            .chain(std::iter::once(self.currents))
            .find(|r| !r.is_success())
    }

    pub fn is_success(&self) -> bool {
        self.first_failure().is_none() && self.saved
    }
}

/// Opens the template store laid out as `settings` describes.
pub fn template_store(settings: &BuildSettings) -> FsTemplateStore {
    FsTemplateStore::with_layout(
        settings.project_root.clone(),
        &settings.templates_dir,
        &settings.config_dir,
        &settings.master_file,
    )
}

/// Builds the complete model described by the project's master configuration.
///
/// Cuff presets are built in order; a failed preset does not stop the ones
/// after it. Fascicles are read from the sample directory named by the master
/// configuration. The session is saved to `settings.save_path` when set, or
/// to the context's own destination otherwise.
///
/// # Errors
///
/// Fails if the master configuration cannot be loaded, if a naming invariant
/// is violated, or if the backend refuses to finalize the geometry.
#[instrument(skip_all, name = "build_workflow")]
pub fn run<B, S>(
    ctx: &mut ModelContext<B>,
    store: &S,
    settings: &BuildSettings,
    reporter: &ProgressReporter,
) -> Result<BuildReport, EngineError>
where
    B: ModelBackend,
    S: TemplateStore + ?Sized,
{
    // === Phase 0: Master configuration ===
    let master = reporter.phase("Configuration", || store.load_master())?;
    info!(
        "Building {} cuff preset(s) for sample '{}'.",
        master.cuff.preset.len(),
        master.sample
    );
    let fascicles_dir = master.fascicles_dir(ctx.root());

    let mut orchestrator = BuildOrchestrator::new(ctx, store);

    // === Phase 1: Cuff presets ===
    reporter.report(Progress::PhaseStart { name: "Cuffs" });
    reporter.report(Progress::TaskStart {
        total_steps: master.cuff.preset.len() as u64,
    });
    let mut templates = Vec::with_capacity(master.cuff.preset.len());
    for name in &master.cuff.preset {
        reporter.report(Progress::TemplateStart { name: name.clone() });
        let result = orchestrator.build_template(name)?;
        reporter.report(Progress::TemplateFinish {
            name: name.clone(),
            success: result.is_success(),
        });
        templates.push(result);
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Fascicles ===
    let source = DirectoryFascicleSource::new(fascicles_dir);
    let fascicles = reporter.phase("Fascicles", || -> Result<_, EngineError> {
        let mut passes = vec![orchestrator.add_fascicles(&source)?];
        if settings.rescan_fascicles {
            warn!(
                "Rescanning fascicles in {:?}; every fascicle is instantiated a second time.",
                source.dir()
            );
            passes.push(orchestrator.add_fascicles(&source)?);
        }
        Ok(passes)
    })?;

    // === Phase 3: Geometry and currents ===
    let currents = reporter.phase("Finalize", || -> Result<_, EngineError> {
        orchestrator.finalize_geometry(&settings.finalize_tag)?;
        orchestrator.loop_currents(settings.current_amplitude)
    })?;
    drop(orchestrator);

    // === Phase 4: Save ===
    let saved = reporter.phase("Save", || match &settings.save_path {
        Some(path) => {
            let path = ctx.root().join(path);
            ctx.save(&path)
        }
        None => ctx.save_default(),
    });

    let report = BuildReport {
        templates,
        fascicles,
        currents,
        saved,
    };
    match report.first_failure() {
        None => info!("Model build finished."),
        Some(failure) => warn!("Model build finished with failures; first: {}", failure),
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;
    use crate::core::template::MemoryTemplateStore;
    use crate::engine::config::BuildSettingsBuilder;
    use serde_json::json;
    use std::path::PathBuf;
    use std::sync::Mutex;

    fn settings(root: &std::path::Path) -> BuildSettings {
        BuildSettingsBuilder::new()
            .project_root(root.to_path_buf())
            .save_path(Some(PathBuf::from("model.json")))
            .build()
            .unwrap()
    }

    fn store() -> MemoryTemplateStore {
        MemoryTemplateStore::new()
            .with_master(json!({
                "cuff": {"preset": ["Bad.json", "Cuff.json"]},
                "sample": "Rat",
                "modes": {"write": "NONE"},
                "conductivities": {"Platinum": "9.43e6[S/m]"}
            }))
            .with_template("Bad.json", json!({"params": [], "instances": [{"type": "Nope", "label": "x"}]}))
            .with_template(
                "Cuff.json",
                json!({
                    "params": [],
                    "instances": [
                        {"type": "TubeCuff_Primitive", "label": "cuff"},
                        {"type": "uContact_Primitive", "label": "c1", "materials": [{"type": "Platinum"}]}
                    ]
                }),
            )
    }

    #[test]
    fn failed_preset_does_not_stop_the_build() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = ModelContext::new(RecordingBackend::new(), dir.path());
        let report = run(&mut ctx, &store(), &settings(dir.path()), &ProgressReporter::new()).unwrap();

        assert_eq!(report.templates.len(), 2);
        assert_eq!(report.first_failure().unwrap().target, "Bad.json");
        assert!(report.templates[1].is_success());
        assert_eq!(report.fascicles.len(), 1);
        assert!(report.saved);
        assert!(!report.is_success());
        assert!(dir.path().join("model.json").is_file());
        assert_eq!(ctx.backend().journal().count("run_geometry"), 1);
        assert_eq!(ctx.backend().property("pcs0", "Qjp"), Some("0.001"));
    }

    #[test]
    fn missing_master_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = ModelContext::new(RecordingBackend::new(), dir.path());
        let err = run(
            &mut ctx,
            &MemoryTemplateStore::new(),
            &settings(dir.path()),
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Template(_)));
    }

    #[test]
    fn rescan_runs_a_second_fascicle_pass() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = ModelContext::new(RecordingBackend::new(), dir.path());
        let mut settings = settings(dir.path());
        settings.rescan_fascicles = true;
        let report = run(&mut ctx, &store(), &settings, &ProgressReporter::new()).unwrap();
        assert_eq!(report.fascicles.len(), 2);
    }

    #[test]
    fn progress_reports_each_preset() {
        let dir = tempfile::tempdir().unwrap();
        let finished = Mutex::new(Vec::new());
        let messages = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| match event {
            Progress::TemplateFinish { name, success } => {
                finished.lock().unwrap().push((name, success));
            }
            Progress::Message(msg) => messages.lock().unwrap().push(msg),
            _ => {}
        }));
        let mut ctx = ModelContext::new(RecordingBackend::new(), dir.path());
        run(&mut ctx, &store(), &settings(dir.path()), &reporter).unwrap();
        drop(reporter);

        assert_eq!(
            finished.into_inner().unwrap(),
            [("Bad.json".to_string(), false), ("Cuff.json".to_string(), true)]
        );
        // A failed preset is reported by its finish event alone.
        assert!(messages.into_inner().unwrap().is_empty());
    }
}
