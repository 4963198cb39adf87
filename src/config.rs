use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{MockupError, MockupResult};
use crate::markup::labels::LabelPolicy;

const CONFIG_FILE_NAME: &str = "mockup2html.toml";
const MODEL_ENV_VAR: &str = "MOCKUP2HTML_MODEL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub annotation: AnnotationConfig,
    #[serde(default)]
    pub markup: MarkupConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// ONNX export of the UI element model.
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// Index → label table handed back with every inference result.
    #[serde(default = "default_class_names")]
    pub class_names: Vec<String>,
    /// Square letterbox size the model was exported with.
    #[serde(default = "default_input_size")]
    pub input_size: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            class_names: default_class_names(),
            input_size: default_input_size(),
        }
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from("best_v3.onnx")
}

/// Vocabulary of the mockup model, in training index order.
pub fn default_class_names() -> Vec<String> {
    vec!["button", "card", "footer", "header", "image", "search_bar", "text"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_input_size() -> u32 {
    640
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default = "default_overlap")]
    pub overlap: f32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            confidence: default_confidence(),
            overlap: default_overlap(),
        }
    }
}

fn default_confidence() -> f32 {
    0.5
}

fn default_overlap() -> f32 {
    0.3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving both generated artifacts.
    #[serde(default = "default_processed_dir")]
    pub processed_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            processed_dir: default_processed_dir(),
        }
    }
}

fn default_processed_dir() -> PathBuf {
    PathBuf::from("static")
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnnotationConfig {
    #[serde(default = "default_outline")]
    pub outline: [u8; 3],
    #[serde(default = "default_stroke_width")]
    pub stroke_width: u32,
    /// Distance of the label from the box's top-left corner, in pixels.
    #[serde(default = "default_label_offset")]
    pub label_offset: i64,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            outline: default_outline(),
            stroke_width: default_stroke_width(),
            label_offset: default_label_offset(),
        }
    }
}

fn default_outline() -> [u8; 3] {
    [255, 0, 0]
}

fn default_stroke_width() -> u32 {
    2
}

fn default_label_offset() -> i64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkupConfig {
    /// Asset referenced by image and card placeholders.
    #[serde(default = "default_image_asset")]
    pub default_image: String,
    #[serde(default)]
    pub label_policy: LabelPolicy,
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            default_image: default_image_asset(),
            label_policy: LabelPolicy::default(),
            title: default_title(),
        }
    }
}

fn default_image_asset() -> String {
    "default.png".to_string()
}

fn default_title() -> String {
    "Document".to_string()
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> MockupResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Applies `MOCKUP2HTML_MODEL` on top of whatever the file said.
    fn apply_env_overrides(&mut self) {
        if let Ok(model) = std::env::var(MODEL_ENV_VAR) {
            if !model.trim().is_empty() {
                tracing::debug!(model = %model, "model path overridden from environment");
                self.detector.model_path = PathBuf::from(model);
            }
        }
    }
}

fn resolve_config_path() -> MockupResult<Option<PathBuf>> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Ok(Some(candidate));
            }
        }
    }

    let cwd = std::env::current_dir()?;
    let candidate = cwd.join(CONFIG_FILE_NAME);
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in working directory");
        return Ok(Some(candidate));
    }

    Ok(None)
}

/// Loads configuration from `explicit` when given, otherwise from the usual
/// locations, otherwise falls back to built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> MockupResult<AppConfig> {
    let path = match explicit {
        Some(path) if path.exists() => Some(path.to_path_buf()),
        Some(path) => {
            return Err(MockupError::Config(format!(
                "config file not found: {}",
                path.display()
            )))
        }
        None => resolve_config_path()?,
    };

    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)?;
            let config = AppConfig::from_toml_str(&content)?;
            tracing::info!(path = %path.display(), "config loaded");
            config
        }
        None => {
            tracing::warn!("{CONFIG_FILE_NAME} not found; using built-in defaults");
            AppConfig::default()
        }
    };

    config.apply_env_overrides();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_original_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.thresholds.confidence, 0.5);
        assert_eq!(config.thresholds.overlap, 0.3);
        assert_eq!(config.detector.input_size, 640);
        assert_eq!(config.annotation.outline, [255, 0, 0]);
        assert_eq!(config.annotation.stroke_width, 2);
        assert_eq!(config.annotation.label_offset, 10);
        assert_eq!(config.output.processed_dir, PathBuf::from("static"));
        assert_eq!(config.markup.default_image, "default.png");
        assert_eq!(config.markup.label_policy, LabelPolicy::Trusted);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [thresholds]
            confidence = 0.25

            [markup]
            label_policy = "sanitize"
            "#,
        )
        .unwrap();
        assert_eq!(config.thresholds.confidence, 0.25);
        assert_eq!(config.thresholds.overlap, 0.3);
        assert_eq!(config.markup.label_policy, LabelPolicy::Sanitize);
        assert_eq!(config.markup.title, "Document");
    }

    #[test]
    fn malformed_toml_is_reported() {
        let err = AppConfig::from_toml_str("[thresholds\nconfidence = ").unwrap_err();
        assert!(matches!(err, MockupError::TomlDe(_)));
    }

    #[test]
    fn explicit_missing_path_is_config_error() {
        let err = load_config(Some(Path::new("/nonexistent/mockup2html.toml"))).unwrap_err();
        assert!(matches!(err, MockupError::Config(_)));
    }
}
