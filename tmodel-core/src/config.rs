//! Training configuration for tmodel.
//!
//! Uses `figment` for layered configuration: defaults -> user config file ->
//! workspace config file -> explicit config file -> environment -> overrides.
//! Configuration is loaded from `~/.config/tmodel/config.toml` and/or
//! `.tmodel/config.toml` in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::TmodelError;

/// Placeholder substituted with a language code in `tokenizer_file`.
pub const TOKENIZER_PLACEHOLDER: &str = "{0}";

/// Prefix for environment variable overrides (`TMODEL_BATCH_SIZE`, `TMODEL_PRELOAD`, ...).
pub const ENV_PREFIX: &str = "TMODEL_";

/// String-valued keys. Their environment values are never parsed as numbers.
pub const TEXT_KEYS: [&str; 8] = [
    "datasource",
    "lang_src",
    "lang_tgt",
    "model_folder",
    "model_basename",
    "preload",
    "tokenizer_file",
    "experiment_name",
];

/// Hyperparameters and path settings for a translation training run.
///
/// Every field is always present. `preload` is the only optional one: `None`
/// means training starts from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Training batch size.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Number of training epochs.
    #[serde(default = "default_num_epochs")]
    pub num_epochs: usize,
    /// Learning rate.
    #[serde(default = "default_lr")]
    pub lr: f64,
    /// Maximum sequence length.
    #[serde(default = "default_seq_len")]
    pub seq_len: usize,
    /// Model embedding dimension.
    #[serde(default = "default_d_model")]
    pub d_model: usize,
    /// Dataset identifier, also the prefix of the resume directory.
    #[serde(default = "default_datasource")]
    pub datasource: String,
    /// Source language code.
    #[serde(default = "default_lang_src")]
    pub lang_src: String,
    /// Target language code.
    #[serde(default = "default_lang_tgt")]
    pub lang_tgt: String,
    /// Base directory name for checkpoints.
    #[serde(default = "default_model_folder")]
    pub model_folder: String,
    /// Filename prefix for checkpoint files.
    #[serde(default = "default_model_basename")]
    pub model_basename: String,
    /// Epoch label to resume from, or `"latest"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preload: Option<String>,
    /// Per-language tokenizer filename with a single `{0}` placeholder.
    #[serde(default = "default_tokenizer_file")]
    pub tokenizer_file: String,
    /// Directory/name for run logs.
    #[serde(default = "default_experiment_name")]
    pub experiment_name: String,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            num_epochs: default_num_epochs(),
            lr: default_lr(),
            seq_len: default_seq_len(),
            d_model: default_d_model(),
            datasource: default_datasource(),
            lang_src: default_lang_src(),
            lang_tgt: default_lang_tgt(),
            model_folder: default_model_folder(),
            model_basename: default_model_basename(),
            preload: None,
            tokenizer_file: default_tokenizer_file(),
            experiment_name: default_experiment_name(),
        }
    }
}

fn default_batch_size() -> usize {
    4
}

fn default_num_epochs() -> usize {
    10
}

fn default_lr() -> f64 {
    1e-4
}

fn default_seq_len() -> usize {
    350
}

fn default_d_model() -> usize {
    128
}

fn default_datasource() -> String {
    "Helsinki-NLP/opus_books".to_string()
}

fn default_lang_src() -> String {
    "en".to_string()
}

fn default_lang_tgt() -> String {
    "it".to_string()
}

fn default_model_folder() -> String {
    "weights".to_string()
}

fn default_model_basename() -> String {
    "tmodel_".to_string()
}

fn default_tokenizer_file() -> String {
    "tokenizer_{0}.json".to_string()
}

fn default_experiment_name() -> String {
    "runs/tmodel".to_string()
}

impl TrainingConfig {
    /// Tokenizer file for a language code, e.g. `tokenizer_en.json`.
    pub fn tokenizer_path(&self, lang: &str) -> PathBuf {
        PathBuf::from(self.tokenizer_file.replace(TOKENIZER_PLACEHOLDER, lang))
    }

    pub fn source_tokenizer_path(&self) -> PathBuf {
        self.tokenizer_path(&self.lang_src)
    }

    pub fn target_tokenizer_path(&self) -> PathBuf {
        self.tokenizer_path(&self.lang_tgt)
    }

    /// Check the values a loaded configuration must satisfy.
    pub fn validate(&self) -> Result<(), TmodelError> {
        let positive = [
            ("batch_size", self.batch_size),
            ("num_epochs", self.num_epochs),
            ("seq_len", self.seq_len),
            ("d_model", self.d_model),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(TmodelError::invalid_config(format!(
                    "{key} must be positive"
                )));
            }
        }

        if !self.lr.is_finite() || self.lr <= 0.0 {
            return Err(TmodelError::invalid_config(format!(
                "lr must be a positive number, got {}",
                self.lr
            )));
        }

        let non_empty = [
            ("model_folder", &self.model_folder),
            ("model_basename", &self.model_basename),
            ("lang_src", &self.lang_src),
            ("lang_tgt", &self.lang_tgt),
        ];
        for (key, value) in non_empty {
            if value.is_empty() {
                return Err(TmodelError::invalid_config(format!(
                    "{key} must not be empty"
                )));
            }
        }

        let placeholders = self.tokenizer_file.matches(TOKENIZER_PLACEHOLDER).count();
        if placeholders != 1 {
            return Err(TmodelError::invalid_config(format!(
                "tokenizer_file must contain exactly one '{TOKENIZER_PLACEHOLDER}' placeholder, found {placeholders} in '{}'",
                self.tokenizer_file
            )));
        }

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, TmodelError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn to_json(&self) -> Result<String, TmodelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Values supplied explicitly by the caller (usually CLI flags).
///
/// Unset fields leave the lower layers untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_folder: Option<String>,
}

fn is_text_key(key: &str) -> bool {
    TEXT_KEYS.iter().any(|text| text.eq_ignore_ascii_case(key))
}

fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "tmodel", "tmodel")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".tmodel").join("config.toml")
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides
/// 2. Environment variables (prefixed with `TMODEL_`)
/// 3. Explicit config file (`config_file`)
/// 4. Workspace-local config (`.tmodel/config.toml`)
/// 5. User config (`~/.config/tmodel/config.toml`)
/// 6. Built-in defaults
///
/// Text keys ([`TEXT_KEYS`]) are taken from the environment verbatim, so
/// `TMODEL_PRELOAD=05` yields the label `"05"` rather than the number `5`.
pub fn load_config(
    workspace: Option<&Path>,
    config_file: Option<&Path>,
    overrides: Option<&ConfigOverrides>,
) -> Result<TrainingConfig, TmodelError> {
    let mut figment = Figment::from(Serialized::defaults(TrainingConfig::default()));

    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            tracing::debug!(path = %user_config.display(), "Merging user config");
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            tracing::debug!(path = %ws_config.display(), "Merging workspace config");
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    if let Some(path) = config_file {
        if !path.is_file() {
            return Err(TmodelError::invalid_config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        tracing::debug!(path = %path.display(), "Merging explicit config file");
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(
        Env::prefixed(ENV_PREFIX).filter(|key| !is_text_key(key.as_str())),
    );
    for key in TEXT_KEYS {
        let var = format!("{ENV_PREFIX}{}", key.to_ascii_uppercase());
        if let Ok(value) = std::env::var(&var) {
            tracing::debug!(%var, "Merging text value from environment");
            figment = figment.merge(Serialized::default(key, value));
        }
    }

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    let config: TrainingConfig = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Check whether any tmodel configuration file exists (user-level or workspace-level).
pub fn config_exists(workspace: Option<&Path>) -> bool {
    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            return true;
        }
    }

    if let Some(ws) = workspace {
        if workspace_config_path(ws).exists() {
            return true;
        }
    }

    false
}
