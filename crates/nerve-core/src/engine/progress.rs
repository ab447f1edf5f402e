/// Events emitted while a model is being built.
#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    /// A cuff template is about to be built.
    TemplateStart { name: String },
    TemplateFinish { name: String, success: bool },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Runs `f` between a phase start and finish event.
    pub fn phase<T>(&self, name: &'static str, f: impl FnOnce() -> T) -> T {
        self.report(Progress::PhaseStart { name });
        let out = f();
        self.report(Progress::PhaseFinish);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn events_reach_the_callback_in_order() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            let tag = match event {
                Progress::PhaseStart { name } => name.to_string(),
                Progress::TaskStart { total_steps } => format!("task:{total_steps}"),
                Progress::TemplateFinish { name, success } => format!("{name}:{success}"),
                Progress::Message(m) => m,
                _ => "other".to_string(),
            };
            seen.lock().unwrap().push(tag);
        }));

        reporter.phase("Templates", || {
            reporter.report(Progress::TaskStart { total_steps: 2 });
            reporter.report(Progress::TemplateFinish {
                name: "cuff.json".to_string(),
                success: true,
            });
            reporter.report(Progress::Message("done".to_string()));
        });
        drop(reporter);

        assert_eq!(
            seen.into_inner().unwrap(),
            ["Templates", "task:2", "cuff.json:true", "done", "other"]
        );
    }

    #[test]
    fn reporter_without_callback_is_silent() {
        ProgressReporter::new().report(Progress::TaskIncrement);
    }
}
