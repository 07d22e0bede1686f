use std::{env, fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_PATH_VAR: &str = "FORM_CELLS_CONFIG";
const STYLESHEET_VAR: &str = "FORM_CELLS_STYLESHEET";
const EDIT_LABEL_VAR: &str = "FORM_CELLS_EDIT_LABEL";
const POINTS_LABEL_VAR: &str = "FORM_CELLS_POINTS_LABEL";
const RERENDER_VAR: &str = "FORM_CELLS_RERENDER_ON_KERNEL_READY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("{name} must be true or false, got '{value}'")]
    InvalidFlag { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// stylesheet path, resolved by the host module loader
    pub stylesheet: String,

    /// label of the button that switches a form cell back to editing
    pub edit_label: String,

    /// text after each point input of a multiple-choice option
    pub points_label: String,

    /// run the bulk re-render again whenever the kernel reports ready
    pub rerender_on_kernel_ready: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            stylesheet: String::from("forms.css"),
            edit_label: String::from("Edit cell"),
            points_label: String::from("Points"),
            rerender_on_kernel_ready: true,
        }
    }
}

impl FormConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml_ng::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(ConfigError::from)
            .context(format!("failed to open config {}", path.display()))?;
        Self::from_yaml_str(&content).context(format!("failed to parse config {}", path.display()))
    }

    /// Loads `.env` if present, then the file named by `FORM_CELLS_CONFIG` (or the
    /// defaults), then applies the individual `FORM_CELLS_*` overrides.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|name| env::var(name).ok())?;

        tracing::debug!(?config, "form cells config loaded");
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(stylesheet) = lookup(STYLESHEET_VAR) {
            self.stylesheet = stylesheet;
        }
        if let Some(label) = lookup(EDIT_LABEL_VAR) {
            self.edit_label = label;
        }
        if let Some(label) = lookup(POINTS_LABEL_VAR) {
            self.points_label = label;
        }
        if let Some(flag) = lookup(RERENDER_VAR) {
            self.rerender_on_kernel_ready = parse_flag(RERENDER_VAR, &flag)?;
        }
        Ok(())
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = FormConfig::from_yaml_str("edit_label: Bearbeiten\n").unwrap();
        assert_eq!(
            config,
            FormConfig {
                edit_label: String::from("Bearbeiten"),
                ..FormConfig::default()
            }
        );
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let err = FormConfig::from_yaml_str("rerender_on_kernel_ready: [").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn from_file_reads_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "stylesheet: custom/forms.css\npoints_label: Pts").unwrap();

        let config = FormConfig::from_file(file.path()).unwrap();
        assert_eq!(config.stylesheet, "custom/forms.css");
        assert_eq!(config.points_label, "Pts");
        assert!(config.rerender_on_kernel_ready);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = FormConfig::from_file("/nonexistent/forms.yaml").unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/forms.yaml"));
    }

    #[test]
    fn overrides_apply_on_top() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (STYLESHEET_VAR, "other.css"),
            (RERENDER_VAR, "off"),
        ]);
        let mut config = FormConfig::default();
        config
            .apply_overrides(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.stylesheet, "other.css");
        assert!(!config.rerender_on_kernel_ready);
        assert_eq!(config.edit_label, "Edit cell");
    }

    #[test]
    fn invalid_flag_is_rejected() {
        let mut config = FormConfig::default();
        let err = config
            .apply_overrides(|name| (name == RERENDER_VAR).then(|| String::from("maybe")))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "FORM_CELLS_RERENDER_ON_KERNEL_READY must be true or false, got 'maybe'"
        );
    }
}
