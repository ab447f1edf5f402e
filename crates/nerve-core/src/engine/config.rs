use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Where the project's inputs live and how the finished model is handled.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSettings {
    pub project_root: PathBuf,
    pub templates_dir: String,
    pub config_dir: String,
    pub master_file: String,
    /// Save destination, relative to the project root unless absolute.
    pub save_path: Option<PathBuf>,
    /// Geometry feature up to which the sequence is built before saving.
    pub finalize_tag: String,
    /// Current (`Qjp`) applied to every point current source, in amperes.
    pub current_amplitude: f64,
    /// Run the fascicle pipeline a second time after the first pass.
    pub rescan_fascicles: bool,
}

#[derive(Default)]
pub struct BuildSettingsBuilder {
    project_root: Option<PathBuf>,
    templates_dir: Option<String>,
    config_dir: Option<String>,
    master_file: Option<String>,
    save_path: Option<PathBuf>,
    finalize_tag: Option<String>,
    current_amplitude: Option<f64>,
    rescan_fascicles: Option<bool>,
}

impl BuildSettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project_root(mut self, path: PathBuf) -> Self {
        self.project_root = Some(path);
        self
    }
    pub fn templates_dir(mut self, dir: impl Into<String>) -> Self {
        self.templates_dir = Some(dir.into());
        self
    }
    pub fn config_dir(mut self, dir: impl Into<String>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }
    pub fn master_file(mut self, file: impl Into<String>) -> Self {
        self.master_file = Some(file.into());
        self
    }
    pub fn save_path(mut self, path: Option<PathBuf>) -> Self {
        self.save_path = path;
        self
    }
    pub fn finalize_tag(mut self, tag: impl Into<String>) -> Self {
        self.finalize_tag = Some(tag.into());
        self
    }
    pub fn current_amplitude(mut self, amps: f64) -> Self {
        self.current_amplitude = Some(amps);
        self
    }
    pub fn rescan_fascicles(mut self, rescan: bool) -> Self {
        self.rescan_fascicles = Some(rescan);
        self
    }

    pub fn build(self) -> Result<BuildSettings, ConfigError> {
        let current_amplitude = self.current_amplitude.unwrap_or(0.001);
        if !current_amplitude.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: "current_amplitude",
                reason: format!("must be a finite number, got {current_amplitude}"),
            });
        }
        Ok(BuildSettings {
            project_root: self
                .project_root
                .ok_or(ConfigError::MissingParameter("project_root"))?,
            templates_dir: self.templates_dir.unwrap_or_else(|| ".templates".to_string()),
            config_dir: self.config_dir.unwrap_or_else(|| ".config".to_string()),
            master_file: self.master_file.unwrap_or_else(|| "master.json".to_string()),
            save_path: self.save_path,
            finalize_tag: self.finalize_tag.unwrap_or_else(|| "fin".to_string()),
            current_amplitude,
            rescan_fascicles: self.rescan_fascicles.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_root_is_required() {
        assert_eq!(
            BuildSettingsBuilder::new().build(),
            Err(ConfigError::MissingParameter("project_root"))
        );
    }

    #[test]
    fn unset_values_take_defaults() {
        let settings = BuildSettingsBuilder::new()
            .project_root(PathBuf::from("/proj"))
            .build()
            .unwrap();
        assert_eq!(settings.templates_dir, ".templates");
        assert_eq!(settings.config_dir, ".config");
        assert_eq!(settings.master_file, "master.json");
        assert_eq!(settings.finalize_tag, "fin");
        assert_eq!(settings.current_amplitude, 0.001);
        assert!(settings.save_path.is_none());
        assert!(!settings.rescan_fascicles);
    }

    #[test]
    fn non_finite_amplitude_is_rejected() {
        let result = BuildSettingsBuilder::new()
            .project_root(PathBuf::from("/proj"))
            .current_amplitude(f64::NAN)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                key: "current_amplitude",
                ..
            })
        ));
    }
}
