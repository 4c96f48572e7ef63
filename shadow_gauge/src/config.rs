use crate::calibration::CalibrationConfig;
use crate::core_modules::segmenter::SegmenterConfig;
use crate::core_modules::stability::StabilityConfig;
use serde::Deserialize;
use std::path::Path;

/// Top-level engine configuration. Every section is optional in TOML and falls
/// back to the tuned defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GaugeConfig {
    #[serde(default)]
    pub segmenter: SegmenterConfig,
    #[serde(default)]
    pub stability: StabilityConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl GaugeConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFile(path.display().to_string(), e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: GaugeConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let segmenter = &self.segmenter;
        if segmenter.threshold_floor > segmenter.threshold_ceiling {
            return Err(ConfigError::Invalid(format!(
                "segmenter.threshold_floor ({}) exceeds segmenter.threshold_ceiling ({})",
                segmenter.threshold_floor, segmenter.threshold_ceiling
            )));
        }
        if segmenter.saturation_limit.is_nan() || segmenter.saturation_limit <= 0.0 {
            return Err(ConfigError::Invalid(
                "segmenter.saturation_limit must be positive".into(),
            ));
        }

        let stability = &self.stability;
        if stability.window_size == 0 {
            return Err(ConfigError::Invalid(
                "stability.window_size must be at least 1".into(),
            ));
        }
        let tolerances = [
            ("stability.min_mean_area", stability.min_mean_area, true),
            (
                "stability.max_area_relative_std_dev",
                stability.max_area_relative_std_dev,
                false,
            ),
            (
                "stability.max_dimension_std_dev",
                stability.max_dimension_std_dev,
                false,
            ),
            (
                "stability.max_centroid_std_dev",
                stability.max_centroid_std_dev,
                false,
            ),
            (
                "stability.max_dimension_jitter",
                stability.max_dimension_jitter,
                false,
            ),
            (
                "stability.max_mean_intensity",
                stability.max_mean_intensity,
                false,
            ),
        ];
        for (name, value, zero_allowed) in tolerances {
            let valid = if zero_allowed { value >= 0.0 } else { value > 0.0 };
            if !valid || !value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be {} and finite, got {value}",
                    if zero_allowed { "non-negative" } else { "positive" }
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    ReadFile(String, std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

fn default_log_level() -> String {
    "info".into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_uses_defaults() {
        let config = GaugeConfig::from_toml_str("").unwrap();
        assert_eq!(config, GaugeConfig::default());
        assert_eq!(config.segmenter.threshold_floor, 30);
        assert_eq!(config.segmenter.threshold_ceiling, 80);
        assert_eq!(config.stability.window_size, 25);
        assert_eq!(config.stability.max_area_relative_std_dev, 0.05);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = GaugeConfig::from_toml_str(
            r#"
            [stability]
            window_size = 10
            max_mean_intensity = 70.0

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.stability.window_size, 10);
        assert_eq!(config.stability.max_mean_intensity, 70.0);
        assert_eq!(config.stability.min_mean_area, 150.0);
        assert_eq!(config.segmenter, SegmenterConfig::default());
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn inverted_threshold_bounds_are_rejected() {
        let err = GaugeConfig::from_toml_str(
            r#"
            [segmenter]
            threshold_floor = 90
            threshold_ceiling = 40
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = GaugeConfig::from_toml_str("[stability]\nwindow_size = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let err =
            GaugeConfig::from_toml_str("[stability]\nmax_centroid_std_dev = -1.0\n").unwrap_err();
        assert!(err.to_string().contains("max_centroid_std_dev"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = GaugeConfig::from_toml_str("[stability\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[calibration]\nmin_baseline_area = 400").unwrap();
        let config = GaugeConfig::load(file.path()).unwrap();
        assert_eq!(config.calibration.min_baseline_area, 400);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = GaugeConfig::load(Path::new("/nonexistent/shadow_gauge.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile(..)));
    }
}
