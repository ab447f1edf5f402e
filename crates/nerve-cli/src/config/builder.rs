use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{AppConfig, CliOverrides};
use crate::error::{CliError, Result};
use nervemodel::engine::config::BuildSettingsBuilder;
use std::path::{Path, PathBuf};

pub fn build_config(
    project_root: &Path,
    config_path: Option<&Path>,
    set_values: &[String],
    overrides: &CliOverrides,
) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match config_path {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let mut file_config = apply_set_values(file_config, set_values)?;

    let project = file_config.project.take().unwrap_or_default();
    let build = file_config.build.take().unwrap_or_default();

    let settings = BuildSettingsBuilder::new()
        .project_root(project_root.to_path_buf())
        .templates_dir(project.templates_dir.unwrap_or(defaults.templates_dir))
        .config_dir(project.config_dir.unwrap_or(defaults.config_dir))
        .master_file(project.master_file.unwrap_or(defaults.master_file))
        .save_path(Some(
            overrides
                .save_path
                .clone()
                .or(build.save_path)
                .unwrap_or(defaults.save_path),
        ))
        .finalize_tag(
            overrides
                .finalize_tag
                .clone()
                .or(build.finalize_tag)
                .unwrap_or(defaults.finalize_tag),
        )
        .current_amplitude(
            overrides
                .current_amplitude
                .or(build.current_amplitude)
                .unwrap_or(defaults.current_amplitude),
        )
        .rescan_fascicles(
            overrides.rescan_fascicles
                || build.rescan_fascicles.unwrap_or(defaults.rescan_fascicles),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        source: config_path.map(Path::to_path_buf),
        settings,
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "project.templates-dir" => {
                config
                    .project
                    .get_or_insert_with(Default::default)
                    .templates_dir = Some(value_str.to_string());
            }
            "project.config-dir" => {
                config.project.get_or_insert_with(Default::default).config_dir =
                    Some(value_str.to_string());
            }
            "project.master-file" => {
                config.project.get_or_insert_with(Default::default).master_file =
                    Some(value_str.to_string());
            }
            "build.save-path" => {
                config.build.get_or_insert_with(Default::default).save_path =
                    Some(PathBuf::from(value_str));
            }
            "build.finalize-tag" => {
                config.build.get_or_insert_with(Default::default).finalize_tag =
                    Some(value_str.to_string());
            }
            "build.current-amplitude" => {
                config
                    .build
                    .get_or_insert_with(Default::default)
                    .current_amplitude = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
                })?);
            }
            "build.rescan-fascicles" => {
                config
                    .build
                    .get_or_insert_with(Default::default)
                    .rescan_fascicles = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid boolean value for {}: {}", key, value_str))
                })?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn build(config: Option<&Path>, set: &[&str], overrides: &CliOverrides) -> Result<AppConfig> {
        let set: Vec<String> = set.iter().map(|s| s.to_string()).collect();
        build_config(Path::new("/proj"), config, &set, overrides)
    }

    #[test]
    fn defaults_fill_everything_not_given() {
        let app = build(None, &[], &CliOverrides::default()).unwrap();
        let s = app.settings;

        let defaults = DefaultsConfig::default();
        assert_eq!(s.project_root, PathBuf::from("/proj"));
        assert_eq!(s.templates_dir, defaults.templates_dir);
        assert_eq!(s.master_file, defaults.master_file);
        assert_eq!(s.finalize_tag, defaults.finalize_tag);
        assert_eq!(s.current_amplitude, defaults.current_amplitude);
        assert_eq!(s.save_path, Some(defaults.save_path));
        assert!(!s.rescan_fascicles);
        assert!(app.source.is_none());
    }

    #[test]
    fn layers_apply_in_order() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("settings.toml");
        fs::write(
            &cfg_path,
            r#"
            [project]
            config-dir = "cfg"

            [build]
            finalize-tag = "from-file"
            current-amplitude = 0.5
            save-path = "file.json"
            "#,
        )
        .unwrap();

        let overrides = CliOverrides {
            save_path: Some(PathBuf::from("flag.json")),
            ..Default::default()
        };
        let app = build(
            Some(cfg_path.as_path()),
            &["build.current-amplitude=0.25", "build.rescan-fascicles=true"],
            &overrides,
        )
        .unwrap();
        let s = app.settings;

        assert_eq!(s.config_dir, "cfg");
        assert_eq!(s.finalize_tag, "from-file");
        assert_eq!(s.current_amplitude, 0.25);
        assert!(s.rescan_fascicles);
        assert_eq!(s.save_path, Some(PathBuf::from("flag.json")));
        assert_eq!(app.source, Some(cfg_path));
    }

    #[test]
    fn flags_beat_set_values() {
        let overrides = CliOverrides {
            finalize_tag: Some("flag".to_string()),
            current_amplitude: Some(0.003),
            ..Default::default()
        };
        let app = build(
            None,
            &["build.finalize-tag=set", "build.current-amplitude=9"],
            &overrides,
        )
        .unwrap();
        assert_eq!(app.settings.finalize_tag, "flag");
        assert_eq!(app.settings.current_amplitude, 0.003);
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        let none = CliOverrides::default();
        assert!(matches!(build(None, &["no-equals"], &none), Err(CliError::Config(_))));
        assert!(matches!(build(None, &["build.unknown=1"], &none), Err(CliError::Config(_))));
        assert!(matches!(
            build(None, &["build.current-amplitude=lots"], &none),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn non_finite_amplitude_surfaces_as_config_error() {
        let app = build(None, &["build.current-amplitude=inf"], &CliOverrides::default());
        assert!(matches!(app, Err(CliError::Config(_))));
    }
}
