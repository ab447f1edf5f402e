use super::data::TemplateData;
use super::master::MasterConfig;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{name}' not found at '{path}'", path = path.display())]
    NotFound { name: String, path: PathBuf },

    #[error("Template '{name}' is malformed: {reason}")]
    Malformed { name: String, reason: String },

    #[error("File I/O error for '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Resolves template and master-configuration names to parsed data.
///
/// Repeated loads of the same name return equivalent data; implementations
/// may re-read or cache as they see fit.
pub trait TemplateStore {
    fn load_template(&self, name: &str) -> Result<TemplateData, TemplateError>;

    fn load_master(&self) -> Result<MasterConfig, TemplateError>;
}

/// Reads templates and the master configuration from a project tree.
///
/// Templates live at `<root>/<templates_dir>/<name>` and the master
/// configuration at `<root>/<config_dir>/<master_file>`.
#[derive(Debug, Clone)]
pub struct FsTemplateStore {
    root: PathBuf,
    templates_dir: String,
    config_dir: String,
    master_file: String,
}

impl FsTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            templates_dir: ".templates".to_string(),
            config_dir: ".config".to_string(),
            master_file: "master.json".to_string(),
        }
    }

    pub fn with_layout(
        root: impl Into<PathBuf>,
        templates_dir: &str,
        config_dir: &str,
        master_file: &str,
    ) -> Self {
        Self {
            root: root.into(),
            templates_dir: templates_dir.to_string(),
            config_dir: config_dir.to_string(),
            master_file: master_file.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn template_path(&self, name: &str) -> PathBuf {
        self.root.join(&self.templates_dir).join(name)
    }

    pub fn master_path(&self) -> PathBuf {
        self.root.join(&self.config_dir).join(&self.master_file)
    }

    fn read_json(name: &str, path: &Path) -> Result<Value, TemplateError> {
        debug!("Reading '{}' from {:?}", name, path);
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TemplateError::NotFound {
                    name: name.to_string(),
                    path: path.to_path_buf(),
                }
            } else {
                TemplateError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        serde_json::from_str(&content).map_err(|e| TemplateError::Malformed {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}

impl TemplateStore for FsTemplateStore {
    fn load_template(&self, name: &str) -> Result<TemplateData, TemplateError> {
        let value = Self::read_json(name, &self.template_path(name))?;
        parse_template(name, value)
    }

    fn load_master(&self) -> Result<MasterConfig, TemplateError> {
        let value = Self::read_json(&self.master_file, &self.master_path())?;
        parse_master(&self.master_file, value)
    }
}

/// Holds already-parsed JSON documents, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateStore {
    templates: HashMap<String, Value>,
    master: Option<Value>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, name: &str, value: Value) -> Self {
        self.templates.insert(name.to_string(), value);
        self
    }

    pub fn with_master(mut self, value: Value) -> Self {
        self.master = Some(value);
        self
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn load_template(&self, name: &str) -> Result<TemplateData, TemplateError> {
        let value = self
            .templates
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound {
                name: name.to_string(),
                path: PathBuf::from(name),
            })?;
        parse_template(name, value)
    }

    fn load_master(&self) -> Result<MasterConfig, TemplateError> {
        let value = self.master.clone().ok_or_else(|| TemplateError::NotFound {
            name: "master".to_string(),
            path: PathBuf::from("master"),
        })?;
        parse_master("master", value)
    }
}

fn parse_template(name: &str, value: Value) -> Result<TemplateData, TemplateError> {
    TemplateData::from_value(value).map_err(|e| TemplateError::Malformed {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

fn parse_master(name: &str, value: Value) -> Result<MasterConfig, TemplateError> {
    MasterConfig::from_value(value).map_err(|e| TemplateError::Malformed {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
