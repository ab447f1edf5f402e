use crate::cli::BuildArgs;
use crate::config::builder::build_config;
use crate::config::models::CliOverrides;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use nervemodel::backend::RecordingBackend;
use nervemodel::engine::context::ModelContext;
use nervemodel::engine::progress::ProgressReporter;
use nervemodel::engine::result::BuildResult;
use nervemodel::workflows::build::{self as workflow, BuildReport};
use tracing::info;

pub fn run(args: BuildArgs) -> Result<()> {
    let overrides = CliOverrides {
        save_path: args.output.clone(),
        finalize_tag: args.finalize_tag.clone(),
        current_amplitude: args.current,
        rescan_fascicles: args.rescan_fascicles,
    };
    let app = build_config(
        &args.project_root,
        args.config.as_deref(),
        &args.set_values,
        &overrides,
    )?;
    if let Some(source) = &app.source {
        info!("Settings loaded from {:?}", source);
    }
    let settings = app.settings;

    let store = workflow::template_store(&settings);
    let mut ctx = ModelContext::new(RecordingBackend::new(), &settings.project_root);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Building model in {}...", settings.project_root.display());
    info!("Invoking the core build workflow...");
    let report = workflow::run(&mut ctx, &store, &settings, &reporter)?;

    print_summary(&report, ctx.current_sources().len());
    let saved = report.saved;
    if let Some(failure) = report.into_first_failure() {
        return Err(into_cli_error(failure));
    }
    if !saved {
        return Err(CliError::NotSaved);
    }
    Ok(())
}

fn print_summary(report: &BuildReport, current_sources: usize) {
    for result in report.templates.iter().chain(&report.fascicles) {
        let mark = if result.is_success() { "✓" } else { "✗" };
        println!("{} {}", mark, result);
    }
    println!("  {} point current source(s) driven", current_sources);
    if report.saved {
        println!("✓ Model saved");
    }
}

fn into_cli_error(result: BuildResult) -> CliError {
    match result.failure {
        Some(failure) => CliError::BuildFailed {
            target: result.target,
            source: failure.error,
        },
        None => CliError::Other(anyhow::anyhow!("'{}' reported no failure", result.target)),
    }
}
