use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the project keeps its inputs.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileProjectConfig {
    pub templates_dir: Option<String>,
    pub config_dir: Option<String>,
    pub master_file: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileBuildConfig {
    pub save_path: Option<PathBuf>,
    pub finalize_tag: Option<String>,
    pub current_amplitude: Option<f64>,
    pub rescan_fascicles: Option<bool>,
}

/// The settings file as written; every field is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub project: Option<FileProjectConfig>,
    pub build: Option<FileBuildConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading settings from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn kebab_case_sections_parse() {
        let config = FileConfig::from_toml(
            r#"
            [project]
            templates-dir = "templates"

            [build]
            save-path = "out/model.json"
            current-amplitude = 0.002
            rescan-fascicles = true
            "#,
        )
        .unwrap();

        let project = config.project.unwrap();
        assert_eq!(project.templates_dir.as_deref(), Some("templates"));
        assert!(project.master_file.is_none());
        let build = config.build.unwrap();
        assert_eq!(build.save_path, Some(PathBuf::from("out/model.json")));
        assert_eq!(build.current_amplitude, Some(0.002));
        assert_eq!(build.rescan_fascicles, Some(true));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::from_toml("[build]\ngeometry = \"geom1\"\n").is_err());
        assert!(FileConfig::from_toml("[solver]\n").is_err());
    }

    #[test]
    fn unparsable_file_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "[build\n").unwrap();

        let err = FileConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { path: p, .. } if p == path));
    }
}
