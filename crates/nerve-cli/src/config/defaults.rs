use std::path::PathBuf;

pub struct DefaultsConfig {
    pub templates_dir: String,
    pub config_dir: String,
    pub master_file: String,
    pub save_path: PathBuf,
    pub finalize_tag: String,
    pub current_amplitude: f64,
    pub rescan_fascicles: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            templates_dir: ".templates".to_string(),
            config_dir: ".config".to_string(),
            master_file: "master.json".to_string(),
            save_path: PathBuf::from("model.json"),
            finalize_tag: "fin".to_string(),
            current_amplitude: 0.001,
            rescan_fascicles: false,
        }
    }
}
