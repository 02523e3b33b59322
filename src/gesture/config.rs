use core::fmt;

pub const DEFAULT_FLICK_DETECT_DISTANCE: f32 = 20.0;
pub const DEFAULT_DOUBLE_CLICK_INTERVAL_MS: u64 = 1_000;
// Per-sample drag motion above this keeps the flick origin where it was.
pub const DEFAULT_FLICK_UPDATE_RANGE: f32 = 10.0;

/// Classifier thresholds, fixed for the lifetime of one handler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    /// Release displacement from the flick origin at which a release counts as a flick.
    pub flick_detect_distance: f32,
    pub double_click_interval_ms: u64,
    /// Largest per-sample drag delta that still moves the flick origin.
    pub flick_update_range: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            flick_detect_distance: DEFAULT_FLICK_DETECT_DISTANCE,
            double_click_interval_ms: DEFAULT_DOUBLE_CLICK_INTERVAL_MS,
            flick_update_range: DEFAULT_FLICK_UPDATE_RANGE,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_distance("flick_detect_distance", self.flick_detect_distance)?;
        validate_distance("flick_update_range", self.flick_update_range)?;
        if self.double_click_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "double_click_interval must be positive".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn flick_detect_distance_sq(&self) -> f32 {
        self.flick_detect_distance * self.flick_detect_distance
    }

    pub(crate) fn flick_update_range_sq(&self) -> f32 {
        self.flick_update_range * self.flick_update_range
    }
}

fn validate_distance(name: &str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Validation(format!(
            "{name} must be a finite, non-negative distance (got {value})"
        )));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    Validation(String),
    /// The host never supplied the background surface the handler attaches to.
    MissingSurface,
    /// The host surface refused the background layer.
    SurfaceAttach(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "failed to parse gesture config: {msg}"),
            ConfigError::Validation(msg) => write!(f, "invalid gesture config: {msg}"),
            ConfigError::MissingSurface => {
                f.write_str("target surface is missing, attach a surface before activation")
            }
            ConfigError::SurfaceAttach(msg) => {
                write!(f, "failed to attach background layer: {msg}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(feature = "config-toml")]
mod file {
    use serde::Deserialize;

    use super::{ConfigError, Thresholds};

    #[derive(Debug, Default, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct GestureConfigFile {
        #[serde(default)]
        gestures: GestureSection,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct GestureSection {
        flick_detect_distance: Option<f32>,
        double_click_interval_s: Option<f64>,
        flick_update_range: Option<f32>,
    }

    impl Thresholds {
        /// Parses a `[gestures]` table; missing keys keep their defaults.
        pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
            let parsed: GestureConfigFile =
                toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
            let section = parsed.gestures;
            let defaults = Thresholds::default();

            let double_click_interval_ms = match section.double_click_interval_s {
                Some(seconds) if !seconds.is_finite() || seconds <= 0.0 => {
                    return Err(ConfigError::Validation(format!(
                        "double_click_interval_s must be positive (got {seconds})"
                    )));
                }
                Some(seconds) => match (seconds * 1_000.0).round() as u64 {
                    0 => {
                        return Err(ConfigError::Validation(format!(
                            "double_click_interval_s is rounded to whole milliseconds; \
                             {seconds} s rounds to 0 ms"
                        )));
                    }
                    ms => ms,
                },
                None => defaults.double_click_interval_ms,
            };

            let thresholds = Thresholds {
                flick_detect_distance: section
                    .flick_detect_distance
                    .unwrap_or(defaults.flick_detect_distance),
                double_click_interval_ms,
                flick_update_range: section
                    .flick_update_range
                    .unwrap_or(defaults.flick_update_range),
            };
            thresholds.validate()?;
            Ok(thresholds)
        }

        pub fn from_toml_path(path: &std::path::Path) -> Result<Self, ConfigError> {
            let source = std::fs::read_to_string(path).map_err(|e| {
                ConfigError::Parse(format!("failed to read {}: {e}", path.display()))
            })?;
            Self::from_toml_str(&source)
        }
    }
}
