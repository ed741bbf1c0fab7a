//! Stage configuration.
//!
//! All fields are optional in TOML; anything left out takes its default.
//!
//! ```toml
//! [renderer]
//! source_url = "https://example.com/hero.gif"
//! grid_width = 120
//! frames_per_second = 12
//!
//! [transitions]
//! settle_ms = 600
//! ```

use std::time::Duration;

use thiserror::Error;

use crate::render::{CharacterRamp, RampError, DEFAULT_RAMP};
use crate::timing::{TimingError, TransitionTimings};

/// Error type for invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidGrid { width: u32, height: u32 },
    #[error(transparent)]
    Ramp(#[from] RampError),
    #[error("frames_per_second must be a positive number, got {0}")]
    InvalidFps(f64),
    #[error("refresh_interval_ms must be positive")]
    InvalidRefreshInterval,
    #[error(transparent)]
    Timing(#[from] TimingError),
    #[cfg(feature = "toml")]
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Settings for the GIF→ASCII background.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RendererConfig {
    /// Asset to decode
    pub source_url: String,
    /// Characters per row
    pub grid_width: u32,
    /// Rows
    pub grid_height: u32,
    /// Glyphs ordered darkest to lightest
    pub character_ramp: String,
    pub frames_per_second: f64,
    /// How often the playback loop wakes up, standing in for the display's
    /// frame callback
    pub refresh_interval_ms: u64,
    /// Font size of the text block; line height matches it
    pub font_size_px: f64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            source_url: String::new(),
            grid_width: 100,
            grid_height: 30,
            character_ramp: DEFAULT_RAMP.to_string(),
            frames_per_second: 15.0,
            refresh_interval_ms: 16,
            font_size_px: 10.0,
        }
    }
}

impl RendererConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::InvalidGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        CharacterRamp::new(&self.character_ramp)?;
        if !(self.frames_per_second.is_finite() && self.frames_per_second > 0.0) {
            return Err(ConfigError::InvalidFps(self.frames_per_second));
        }
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::InvalidRefreshInterval);
        }
        Ok(())
    }

    pub fn ramp(&self) -> Result<CharacterRamp, ConfigError> {
        Ok(CharacterRamp::new(&self.character_ramp)?)
    }

    #[inline]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StageConfig {
    pub renderer: RendererConfig,
    pub transitions: TransitionTimings,
}

impl StageConfig {
    /// Parse and validate a TOML document.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.renderer.validate()?;
        self.transitions.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = StageConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.renderer.grid_width, 100);
        assert_eq!(config.renderer.grid_height, 30);
        assert_eq!(config.renderer.character_ramp, "@%#*+=-:. ");
        assert_eq!(config.renderer.frames_per_second, 15.0);
    }

    #[test]
    fn test_rejects_zero_grid() {
        let config = RendererConfig {
            grid_height: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidGrid { width: 100, height: 0 })
        ));
    }

    #[test]
    fn test_rejects_empty_ramp() {
        let config = RendererConfig {
            character_ramp: String::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Ramp(RampError::Empty))));
        assert!(config.ramp().is_err());
    }

    #[test]
    fn test_rejects_bad_fps() {
        for fps in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = RendererConfig {
                frames_per_second: fps,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::InvalidFps(_))), "{fps}");
        }
    }

    #[test]
    fn test_rejects_zero_refresh() {
        let config = RendererConfig {
            refresh_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRefreshInterval)));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_from_toml_partial() {
        let config = StageConfig::from_toml_str(
            r#"
            [renderer]
            source_url = "/hero.gif"
            grid_width = 80
            character_ramp = " .:-=+*#%@"
            frames_per_second = 12.5

            [transitions]
            settle_ms = 400
            "#,
        )
        .unwrap();

        assert_eq!(config.renderer.source_url, "/hero.gif");
        assert_eq!(config.renderer.grid_width, 80);
        assert_eq!(config.renderer.grid_height, 30);
        assert_eq!(config.renderer.frames_per_second, 12.5);
        assert_eq!(config.transitions.settle_ms, 400);
        assert_eq!(config.transitions.enter_ms, 650);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_from_toml_empty() {
        let config = StageConfig::from_toml_str("").unwrap();
        assert_eq!(config, StageConfig::default());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_from_toml_validates() {
        let result = StageConfig::from_toml_str(
            r#"
            [transitions]
            initial_fade_ms = 2000
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Timing(_))));

        let result = StageConfig::from_toml_str("[renderer]\ngrid_width = \"wide\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }
}
