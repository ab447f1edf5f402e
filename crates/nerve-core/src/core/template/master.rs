use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CuffConfig {
    /// Template names to build, in order.
    pub preset: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModesConfig {
    /// Output mode under which sample-derived geometry was written.
    pub write: String,
}

/// The project's master configuration.
///
/// Only the fields the build needs are typed; everything else in the file is
/// tolerated and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MasterConfig {
    pub cuff: CuffConfig,
    pub sample: String,
    pub modes: ModesConfig,
    /// Material property lookup table: material type name to conductivity
    /// expression.
    #[serde(default)]
    pub conductivities: BTreeMap<String, String>,
}

impl MasterConfig {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn conductivity(&self, material: &str) -> Option<&str> {
        self.conductivities.get(material).map(String::as_str)
    }

    /// Directory holding one subdirectory per fascicle for the configured
    /// sample and write mode.
    ///
    /// The two `0` components select the first slide of the first section;
    /// only two-dimensional samples are laid out this way.
    pub fn fascicles_dir(&self, project_root: &Path) -> PathBuf {
        project_root
            .join("data")
            .join("samples")
            .join(&self.sample)
            .join("0")
            .join("0")
            .join(&self.modes.write)
            .join("fascicles")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_master() -> MasterConfig {
        MasterConfig::from_value(json!({
            "cuff": {"preset": ["Purdue.json", "Enteromedics.json"]},
            "sample": "Rat16-3",
            "modes": {"write": "SECTIONWISE2D", "plot": "FIG"},
            "conductivities": {"platinum": "9.43e6[S/m]"},
            "scale": {"input": 1.0}
        }))
        .unwrap()
    }

    #[test]
    fn ignores_unrelated_fields() {
        let master = sample_master();
        assert_eq!(master.cuff.preset, vec!["Purdue.json", "Enteromedics.json"]);
        assert_eq!(master.modes.write, "SECTIONWISE2D");
    }

    #[test]
    fn conductivity_lookup() {
        let master = sample_master();
        assert_eq!(master.conductivity("platinum"), Some("9.43e6[S/m]"));
        assert_eq!(master.conductivity("gold"), None);
    }

    #[test]
    fn fascicles_dir_follows_sample_layout() {
        let master = sample_master();
        assert_eq!(
            master.fascicles_dir(Path::new("/proj")),
            PathBuf::from("/proj/data/samples/Rat16-3/0/0/SECTIONWISE2D/fascicles")
        );
    }

    #[test]
    fn missing_sample_is_rejected() {
        let result = MasterConfig::from_value(json!({
            "cuff": {"preset": []},
            "modes": {"write": "SECTIONWISE2D"}
        }));
        assert!(result.is_err());
    }
}
