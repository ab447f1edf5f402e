use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use nervemodel::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// What the bar shows about the phase in flight.
struct BarState {
    pb: ProgressBar,
    phase: &'static str,
    failed: Vec<String>,
}

impl BarState {
    fn begin_phase(&mut self, name: &'static str) {
        self.phase = name;
        self.failed.clear();
        self.pb.reset();
        self.pb.set_length(0);
        self.pb.set_prefix("");
        self.pb.set_style(CliProgressHandler::spinner_style());
        self.pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        self.pb.set_message(name);
    }

    fn template_failed(&mut self, name: String) {
        self.failed.push(name);
        self.pb.set_prefix(format!("✗ {}", self.failed.len()));
    }

    /// "✓ Cuffs", or the failure tally when any template of the phase broke.
    fn phase_summary(&self) -> String {
        match self.failed.len() {
            0 => format!("✓ {}", self.phase),
            n => format!(
                "✗ {}: {} of {} template(s) failed ({})",
                self.phase,
                n,
                self.pb.length().unwrap_or(n as u64),
                self.failed.join(", ")
            ),
        }
    }
}

/// Renders build progress on stderr with a single `indicatif` bar. Failed
/// cuff templates are tallied in the bar prefix and named once the phase
/// ends; their errors are left to the final build summary.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<BarState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(BarState {
                pb,
                phase: "",
                failed: Vec::new(),
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => state.begin_phase(name),
                Progress::PhaseFinish => {
                    let summary = state.phase_summary();
                    state.pb.disable_steady_tick();
                    state.pb.finish_with_message(summary);
                }
                Progress::TaskStart { total_steps } => {
                    state.pb.disable_steady_tick();
                    state.pb.reset();
                    state.pb.set_length(total_steps);
                    state.pb.set_position(0);
                    state.pb.set_style(Self::bar_style());
                }
                Progress::TaskIncrement => state.pb.inc(1),
                Progress::TaskFinish => {
                    let len = state.pb.length().unwrap_or(0);
                    if state.pb.position() < len {
                        state.pb.set_position(len);
                    }
                    state.pb.finish();
                }
                Progress::TemplateStart { name } => state.pb.set_message(name),
                Progress::TemplateFinish { name, success } => {
                    if !success {
                        state.template_failed(name);
                    }
                }
                Progress::Message(msg) => {
                    if state.pb.is_finished() {
                        state.pb.set_message(msg);
                    } else {
                        state.pb.println(format!("  {}", msg));
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{prefix:>4.red} {msg:<24} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn preset(callback: &ProgressCallback<'static>, name: &str, success: bool) {
        callback(Progress::TemplateStart {
            name: name.to_string(),
        });
        callback(Progress::TemplateFinish {
            name: name.to_string(),
            success,
        });
        callback(Progress::TaskIncrement);
    }

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::new();
        let state = handler.state.lock().unwrap();
        assert_eq!(state.pb.length(), Some(0));
        assert!(state.pb.is_finished());
        assert!(state.failed.is_empty());
    }

    #[test]
    fn presets_drive_the_bar() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Cuffs" });
        callback(Progress::TaskStart { total_steps: 2 });
        callback(Progress::TemplateStart {
            name: "Purdue.json".to_string(),
        });
        {
            let state = handler.state.lock().unwrap();
            assert_eq!(state.pb.length(), Some(2));
            assert_eq!(state.pb.message(), "Purdue.json");
            assert_eq!(state.pb.prefix(), "");
        }

        callback(Progress::TaskIncrement);
        callback(Progress::TaskFinish);
        {
            let state = handler.state.lock().unwrap();
            assert!(state.pb.is_finished());
            assert_eq!(state.pb.position(), 2);
        }

        callback(Progress::PhaseFinish);
        assert_eq!(handler.state.lock().unwrap().pb.message(), "✓ Cuffs");
    }

    #[test]
    fn failed_templates_are_tallied_once() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Cuffs" });
        callback(Progress::TaskStart { total_steps: 3 });
        preset(&callback, "Bad.json", false);
        assert_eq!(handler.state.lock().unwrap().pb.prefix(), "✗ 1");
        preset(&callback, "Purdue.json", true);
        preset(&callback, "Worse.json", false);
        assert_eq!(handler.state.lock().unwrap().pb.prefix(), "✗ 2");

        callback(Progress::TaskFinish);
        callback(Progress::PhaseFinish);
        assert_eq!(
            handler.state.lock().unwrap().pb.message(),
            "✗ Cuffs: 2 of 3 template(s) failed (Bad.json, Worse.json)"
        );

        // The tally belongs to one phase.
        callback(Progress::PhaseStart { name: "Fascicles" });
        callback(Progress::PhaseFinish);
        let state = handler.state.lock().unwrap();
        assert!(state.failed.is_empty());
        assert_eq!(state.pb.message(), "✓ Fascicles");
    }

    #[test]
    fn callback_is_thread_safe() {
        let handler = CliProgressHandler::new();
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart { name: "Fascicles" });
            callback(Progress::TaskIncrement);
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let state = handler.state.lock().unwrap();
        assert!(state.pb.is_finished());
        assert_eq!(state.pb.message(), "✓ Fascicles");
    }
}
