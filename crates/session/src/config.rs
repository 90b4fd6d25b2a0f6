use catalog::{AssetLayout, INITIAL_MODEL};
use gpu::{CameraSettings, DEFAULT_CLEAR_COLOR, DEFAULT_FRAMING_MARGIN, OrbitSettings};
use serde::{Deserialize, Serialize};

/// Largest bounding dimension a model is scaled to, in scene units.
pub const DEFAULT_TARGET_SIZE: f64 = 0.7;

/// Where a freshly loaded model is placed before framing.
pub const DEFAULT_MODEL_OFFSET: [f64; 3] = [0.0, 2.0, -1.0];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub assets: AssetLayout,
    pub target_size: f64,
    pub model_offset: [f64; 3],
    pub framing_margin: f64,
    pub camera: CameraSettings,
    pub controls: OrbitSettings,
    pub clear_color: [f64; 3],
    pub initial_model: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            assets: AssetLayout::default(),
            target_size: DEFAULT_TARGET_SIZE,
            model_offset: DEFAULT_MODEL_OFFSET,
            framing_margin: DEFAULT_FRAMING_MARGIN,
            camera: CameraSettings::default(),
            controls: OrbitSettings::default(),
            clear_color: DEFAULT_CLEAR_COLOR,
            initial_model: INITIAL_MODEL.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "invalid viewer config JSON: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid viewer config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl ViewerConfig {
    /// Parses a partial config; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: ViewerConfig = serde_json::from_str(json).map_err(ConfigError::Json)?;
        config.assets = AssetLayout::new(config.assets.dir);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.target_size > 0.0 && self.target_size.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "target_size must be positive, got {}",
                self.target_size
            )));
        }
        if !(self.framing_margin > 0.0 && self.framing_margin.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "framing_margin must be positive, got {}",
                self.framing_margin
            )));
        }
        let fov = self.camera.fov_y_deg;
        if !(fov > 0.0 && fov < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.fov_y_deg must be in (0, 180), got {fov}"
            )));
        }
        if self.camera.near <= 0.0 || self.camera.far <= self.camera.near {
            return Err(ConfigError::Invalid(
                "camera planes must satisfy 0 < near < far".to_string(),
            ));
        }
        let c = &self.controls;
        if c.min_distance < 0.0 || c.max_distance < c.min_distance {
            return Err(ConfigError::Invalid(
                "controls distance limits must satisfy 0 <= min <= max".to_string(),
            ));
        }
        if c.max_polar_angle < c.min_polar_angle {
            return Err(ConfigError::Invalid(
                "controls polar limits must satisfy min <= max".to_string(),
            ));
        }
        if self.initial_model.trim().is_empty() {
            return Err(ConfigError::Invalid("initial_model must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.target_size, 0.7);
        assert_eq!(config.model_offset, [0.0, 2.0, -1.0]);
        assert_eq!(config.initial_model, "Onionring");
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config =
            ViewerConfig::from_json(r#"{"target_size": 1.2, "assets": {"dir": "cdn"}}"#)
                .expect("config");
        assert_eq!(config.target_size, 1.2);
        assert_eq!(config.assets.dir, "cdn/");
        assert_eq!(config.camera, CameraSettings::default());
    }

    #[test]
    fn rejects_non_positive_target_size() {
        let err = ViewerConfig::from_json(r#"{"target_size": 0}"#).expect_err("invalid");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_json() {
        let err = ViewerConfig::from_json("{").expect_err("invalid");
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn rejects_inverted_distance_limits() {
        let err = ViewerConfig::from_json(r#"{"controls": {"min_distance": 5, "max_distance": 1}}"#)
            .expect_err("invalid");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
