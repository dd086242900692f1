//! Render settings
//!
//! Settings are plain serde data so they can be kept in a JSON file.
//! Missing fields fall back to their defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Largest N for the N x N subsample grid
pub const MAX_ANTIALIASING: u32 = 16;

/// Tunables shared by every backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Sphere-tracing iteration cap
    pub max_iterations: u32,
    /// Distance below which a ray counts as a hit
    pub precision: f32,
    /// Extra lift along the normal for shadow rays, on top of `precision`
    pub offset: f32,
    /// Central-difference step for normals
    pub normal_step: f32,
    /// Lower clamp of the lighting term
    pub ambient: f32,
    /// N x N subsamples per pixel
    pub antialiasing: u32,
    /// Color of rays that miss (RGB, 0-1)
    pub background: [f32; 3],
    /// Output encoding gamma
    pub gamma: f32,
    /// Worker threads for the parallel path (0 = one per core)
    pub threads: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            max_iterations: 1000,
            precision: 1e-3,
            offset: 1e-3,
            normal_step: 1e-3,
            ambient: 0.05,
            antialiasing: 1,
            background: [0.0, 0.0, 0.0],
            gamma: 2.2,
            threads: 0,
        }
    }
}

impl RenderSettings {
    /// Read settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file, returning defaults if it is missing or invalid
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reject values no backend can render with
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidParameter(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidParameter(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(1..=MAX_ANTIALIASING).contains(&self.antialiasing) {
            return Err(Error::InvalidParameter(format!(
                "antialiasing must be between 1 and {MAX_ANTIALIASING}, got {}",
                self.antialiasing
            )));
        }
        if !(self.precision > 0.0 && self.normal_step > 0.0) {
            return Err(Error::InvalidParameter(
                "precision and normal_step must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.ambient) {
            return Err(Error::InvalidParameter(format!(
                "ambient must be within [0, 1], got {}",
                self.ambient
            )));
        }
        if self.offset.is_nan() || self.offset < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "offset must be non-negative, got {}",
                self.offset
            )));
        }
        if self.gamma.is_nan() || self.gamma <= 0.0 {
            return Err(Error::InvalidParameter("gamma must be positive".to_string()));
        }
        Ok(())
    }

    /// Width over height
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn background(&self) -> glam::Vec3 {
        glam::Vec3::from_array(self.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(RenderSettings::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let settings: RenderSettings =
            serde_json::from_str(r#"{ "width": 64, "antialiasing": 2 }"#).unwrap();
        assert_eq!(settings.width, 64);
        assert_eq!(settings.antialiasing, 2);
        assert_eq!(settings.height, 600);
        assert_eq!(settings.max_iterations, 1000);
    }

    #[test]
    fn zero_size_is_rejected() {
        let settings = RenderSettings {
            width: 0,
            ..RenderSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn antialiasing_above_limit_is_rejected() {
        let settings = RenderSettings {
            antialiasing: 70_000,
            ..RenderSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(Error::InvalidParameter(_))
        ));

        let settings = RenderSettings {
            antialiasing: MAX_ANTIALIASING,
            ..RenderSettings::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn ambient_outside_unit_range_is_rejected() {
        for ambient in [1.5, -0.1, f32::NAN] {
            let settings = RenderSettings {
                ambient,
                ..RenderSettings::default()
            };
            assert!(settings.validate().is_err(), "ambient {ambient} accepted");
        }
    }

    #[test]
    fn negative_offset_is_rejected() {
        let settings = RenderSettings {
            offset: -1e-3,
            ..RenderSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("sdtrace_settings_does_not_exist.json");
        assert_eq!(
            RenderSettings::load_or_default(&path),
            RenderSettings::default()
        );
    }

    #[test]
    fn round_trips_through_file() {
        let path = std::env::temp_dir().join("sdtrace_settings_round_trip.json");
        let settings = RenderSettings {
            width: 32,
            height: 16,
            ambient: 0.1,
            ..RenderSettings::default()
        };
        fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();

        let loaded = RenderSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);

        fs::remove_file(&path).ok();
    }
}
