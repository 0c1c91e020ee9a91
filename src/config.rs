//! Configuration file support.
//!
//! Sources, lowest to highest priority:
//! - built-in defaults
//! - `lungscan.toml` in the working directory (optional)
//! - an explicit `--config` file (must exist)
//! - `LUNGSCAN_*` environment variables
//!
//! CLI flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::ModelId;

pub const DEFAULT_CONFIG_FILE: &str = "lungscan.toml";

pub const ENV_FORCE_CPU: &str = "LUNGSCAN_FORCE_CPU";
pub const ENV_RESNET_MODEL: &str = "LUNGSCAN_RESNET_MODEL";
pub const ENV_DENSENET_MODEL: &str = "LUNGSCAN_DENSENET_MODEL";

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub models: ModelsConfig,
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub resnet: ModelConfig,
    pub densenet: ModelConfig,
    /// Run a probe prediction per model at startup to check its output width.
    pub verify_on_load: bool,
}

/// One model artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub path: PathBuf,
    /// Class names in the order the model was trained with. When set, they
    /// must match the built-in label order.
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Hide any accelerator and run on CPU.
    pub force_cpu: bool,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            resnet: ModelConfig::new("models/chest_CT_SCAN-ResNet50.rten"),
            densenet: ModelConfig::new("models/chest_CT_SCAN-DenseNet201.rten"),
            verify_on_load: true,
        }
    }
}

impl ModelsConfig {
    pub fn get(&self, model: ModelId) -> &ModelConfig {
        match model {
            ModelId::ResNet50 => &self.resnet,
            ModelId::DenseNet201 => &self.densenet,
        }
    }
}

impl ModelConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            labels: None,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { force_cpu: true }
    }
}

impl AppConfig {
    /// Load defaults, then the project file, then `explicit`, then environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                info!("Loading config: {}", path.display());
                load_file(path)?
            }
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    info!("Loading project config: {}", local.display());
                    load_file(local)?
                } else {
                    debug!("No {} in working directory, using defaults", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Configuration(e.to_string()))
    }

    /// Apply `LUNGSCAN_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_FORCE_CPU) {
            self.runtime.force_cpu = parse_bool(&value).ok_or_else(|| {
                Error::Configuration(format!("{ENV_FORCE_CPU} must be a boolean, got {value:?}"))
            })?;
        }
        if let Some(path) = lookup(ENV_RESNET_MODEL) {
            self.models.resnet.path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_DENSENET_MODEL) {
            self.models.densenet.path = PathBuf::from(path);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.models.resnet.path == self.models.densenet.path {
            return Err(Error::Configuration(format!(
                "both models point at the same file: {}",
                self.models.resnet.path.display()
            )));
        }
        for model in ModelId::ENSEMBLE_ORDER {
            if let Some(labels) = &self.models.get(model).labels {
                if labels.is_empty() {
                    return Err(Error::Configuration(format!(
                        "label list for {model} is empty"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn load_file(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Configuration(format!("failed to read {}: {e}", path.display()))
    })?;
    AppConfig::from_toml(&content).map_err(|e| match e {
        Error::Configuration(msg) => {
            Error::Configuration(format!("failed to parse {}: {msg}", path.display()))
        }
        other => other,
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_empty_config() {
        let config = AppConfig::from_toml("").expect("parse empty config");
        assert!(config.runtime.force_cpu);
        assert!(config.models.verify_on_load);
        assert_eq!(
            config.models.resnet.path,
            PathBuf::from("models/chest_CT_SCAN-ResNet50.rten")
        );
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn test_parse_models_section() {
        let toml = r#"
[models]
verify_on_load = false

[models.resnet]
path = "/opt/models/resnet.rten"
labels = ["Adenocarcinoma", "Large Cell Carcinoma", "Normal", "Squamous Cell Carcinoma"]

[models.densenet]
path = "/opt/models/densenet.rten"

[runtime]
force_cpu = false
"#;
        let config = AppConfig::from_toml(toml).expect("parse models config");
        assert!(!config.models.verify_on_load);
        assert!(!config.runtime.force_cpu);
        assert_eq!(config.models.resnet.labels.as_ref().map(Vec::len), Some(4));
        assert!(config.models.densenet.labels.is_none());
        assert_eq!(
            config.models.get(ModelId::DenseNet201).path,
            PathBuf::from("/opt/models/densenet.rten")
        );
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let err = AppConfig::from_toml("[models\n").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_FORCE_CPU, "no"),
            (ENV_DENSENET_MODEL, "/tmp/dense.rten"),
        ]
        .into_iter()
        .collect();
        let mut config = AppConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert!(!config.runtime.force_cpu);
        assert_eq!(config.models.densenet.path, PathBuf::from("/tmp/dense.rten"));
        assert_eq!(
            config.models.resnet.path,
            PathBuf::from("models/chest_CT_SCAN-ResNet50.rten")
        );
    }

    #[test]
    fn test_bad_env_bool_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env(|key| (key == ENV_FORCE_CPU).then(|| "maybe".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_validate_rejects_shared_path_and_empty_labels() {
        let mut config = AppConfig::default();
        config.models.densenet.path = config.models.resnet.path.clone();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.models.resnet.labels = Some(Vec::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
