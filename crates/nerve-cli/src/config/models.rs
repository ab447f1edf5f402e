use nervemodel::engine::config::BuildSettings;
use std::path::PathBuf;

/// Command-line flags that take precedence over every settings layer.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub save_path: Option<PathBuf>,
    pub finalize_tag: Option<String>,
    pub current_amplitude: Option<f64>,
    pub rescan_fascicles: bool,
}

pub struct AppConfig {
    /// Settings file the values were read from, if any.
    pub source: Option<PathBuf>,
    pub settings: BuildSettings,
}
