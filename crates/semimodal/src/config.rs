use std::time::Duration;

use serde::{Deserialize, Serialize};
use semimodal_core::Size;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid semimodal config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` = {value} is out of range, expected {expected}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        expected: &'static str,
    },
}

/// Visual and behavioural constants of the sheet.
///
/// Every field has a default, so a JSON document only needs the keys it changes:
///
/// ```rust
/// use semimodal::SemiModalConfig;
///
/// let config = SemiModalConfig::from_json(r#"{ "completion_threshold": 0.5 }"#).unwrap();
/// assert_eq!(config.completion_threshold, 0.5);
/// assert_eq!(config.corner_radius, 10.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemiModalConfig {
    /// Radius of the sheet's top corners.
    pub corner_radius: f32,
    pub indicator_corner_radius: f32,
    /// Overlay opacity while active.
    pub overlay_alpha: f32,
    /// Sheet height as a fraction of the container, unless the screen sizes itself.
    pub default_height_ratio: f32,
    /// Released drags beyond this progress dismiss; the rest snap back.
    pub completion_threshold: f32,
    pub dismiss_duration_secs: f32,
    pub indicator_width: f32,
    pub indicator_height: f32,
    /// Distance from the indicator's top edge to the sheet's top edge.
    pub indicator_offset: f32,
}

impl Default for SemiModalConfig {
    fn default() -> Self {
        Self {
            corner_radius: 10.0,
            indicator_corner_radius: 5.0,
            overlay_alpha: 0.5,
            default_height_ratio: 0.5,
            completion_threshold: 0.3,
            dismiss_duration_secs: 0.4,
            indicator_width: 60.0,
            indicator_height: 8.0,
            indicator_offset: 16.0,
        }
    }
}

impl SemiModalConfig {
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: SemiModalConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(
            field: &'static str,
            value: f32,
            expected: &'static str,
            ok: impl Fn(f32) -> bool,
        ) -> Result<(), ConfigError> {
            if value.is_finite() && ok(value) {
                Ok(())
            } else {
                Err(ConfigError::OutOfRange {
                    field,
                    value,
                    expected,
                })
            }
        }

        check("completion_threshold", self.completion_threshold, "0 < x < 1", |v| {
            v > 0.0 && v < 1.0
        })?;
        check("default_height_ratio", self.default_height_ratio, "0 < x <= 1", |v| {
            v > 0.0 && v <= 1.0
        })?;
        check("overlay_alpha", self.overlay_alpha, "0 <= x <= 1", |v| {
            (0.0..=1.0).contains(&v)
        })?;
        check("dismiss_duration_secs", self.dismiss_duration_secs, "x > 0", |v| v > 0.0)?;
        check("corner_radius", self.corner_radius, "x >= 0", |v| v >= 0.0)?;
        check("indicator_corner_radius", self.indicator_corner_radius, "x >= 0", |v| v >= 0.0)?;
        check("indicator_width", self.indicator_width, "x > 0", |v| v > 0.0)?;
        check("indicator_height", self.indicator_height, "x > 0", |v| v > 0.0)?;
        check("indicator_offset", self.indicator_offset, "x >= 0", |v| v >= 0.0)?;
        Ok(())
    }

    pub fn dismiss_duration(&self) -> Duration {
        Duration::from_secs_f32(self.dismiss_duration_secs)
    }

    pub fn indicator_size(&self) -> Size {
        Size::new(self.indicator_width, self.indicator_height)
    }
}
