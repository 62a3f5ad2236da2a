use std::path::{Path, PathBuf};

use roadstream_animate::AnimConfig;
use roadstream_kernel::VehicleConfig;
use roadstream_procgen::GenConfig;
use roadstream_stream::StreamConfig;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Everything the frame driver needs, loadable from one YAML document.
/// Missing sections and fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Seed for the world generator. `None` draws one from the OS.
    pub seed: Option<u64>,
    pub vehicle: VehicleConfig,
    pub stream: StreamConfig,
    pub generation: GenConfig,
    pub animation: AnimConfig,
    /// Period of the extra roadside decorations.
    pub decoration_interval_ms: u64,
    /// How far ahead of the vehicle the timed decorations appear.
    pub decoration_ahead: f32,
    /// Frames of streaming cost kept for the HUD and the CLI.
    pub cost_history: usize,
    /// Once the vehicle is this far from the local origin, the world and the
    /// scene are shifted back so `f32` coordinates keep their precision.
    pub rebase_distance: f32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            seed: None,
            vehicle: VehicleConfig::default(),
            stream: StreamConfig::default(),
            generation: GenConfig::default(),
            animation: AnimConfig::default(),
            decoration_interval_ms: 5000,
            decoration_ahead: 100.0,
            cost_history: 120,
            rebase_distance: 4096.0,
        }
    }
}

/// Above this, a walker's step of a few hundredths of a unit loses
/// precision in `f32`.
const MAX_REBASE_DISTANCE: f32 = 16_384.0;

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must not be negative, got {value}")))
    }
}

fn probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must be within [0, 1], got {value}")))
    }
}

impl DriveConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Reject values the generators and the streaming controller cannot
    /// work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.generation;
        positive("generation.segment_length", g.segment_length)?;
        non_negative("generation.decoration_spacing", g.decoration_spacing)?;
        non_negative("generation.pedestrian_spacing", g.pedestrian_spacing)?;
        non_negative("generation.lamp_spacing", g.lamp_spacing)?;
        probability("generation.crosswalk_probability", g.crosswalk_probability)?;
        probability("generation.decoration_probability", g.decoration_probability)?;
        probability("generation.pedestrian_probability", g.pedestrian_probability)?;
        probability("generation.window_lit_probability", g.window_lit_probability)?;

        let s = &self.stream;
        positive("stream.lookahead", s.lookahead)?;
        non_negative("stream.segment_trailing", s.segment_trailing)?;
        non_negative("stream.prop_trailing", s.prop_trailing)?;
        non_negative("stream.crosswalk_trailing", s.crosswalk_trailing)?;
        if s.max_segments_per_frame == 0 {
            return Err(invalid("stream.max_segments_per_frame", "must be at least 1"));
        }

        let v = &self.vehicle;
        non_negative("vehicle.speed", v.speed)?;
        if !(v.lateral_easing > 0.0 && v.lateral_easing <= 1.0) {
            return Err(invalid(
                "vehicle.lateral_easing",
                format!("must be within (0, 1], got {}", v.lateral_easing),
            ));
        }

        let a = &self.animation;
        non_negative("animation.walk_behind", a.walk_behind)?;
        non_negative("animation.walk_ahead", a.walk_ahead)?;
        if a.respawn_ahead > a.walk_ahead || a.respawn_ahead < -a.walk_behind {
            return Err(invalid(
                "animation.respawn_ahead",
                "must lie inside the walking window",
            ));
        }

        if self.decoration_interval_ms == 0 {
            return Err(invalid("decoration_interval_ms", "must be positive"));
        }
        if !(g.segment_length..=MAX_REBASE_DISTANCE).contains(&self.rebase_distance) {
            return Err(invalid(
                "rebase_distance",
                format!(
                    "must be within [segment_length, {MAX_REBASE_DISTANCE}], got {}",
                    self.rebase_distance
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadstream_kernel::Lane;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = DriveConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.decoration_interval_ms, 5000);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = DriveConfig::from_yaml_str(
            "seed: 42\nvehicle:\n  start_lane: right\n  speed: 1.5\nstream:\n  lookahead: 300\n",
        )
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.vehicle.start_lane, Lane::Right);
        assert_eq!(config.vehicle.speed, 1.5);
        assert_eq!(config.vehicle.lateral_easing, 0.1);
        assert_eq!(config.stream.lookahead, 300.0);
        assert_eq!(config.stream.segment_trailing, 50.0);
        assert_eq!(config.generation, GenConfig::default());
    }

    #[test]
    fn empty_document_is_default() {
        let config = DriveConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, DriveConfig::default());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "generation:\n  crosswalk_probability: 1.0\n  star_count: 10").unwrap();
        let config = DriveConfig::load(file.path()).unwrap();
        assert_eq!(config.generation.crosswalk_probability, 1.0);
        assert_eq!(config.generation.star_count, 10);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DriveConfig::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("nope.yaml"));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let err = DriveConfig::from_yaml_str("stream: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let err = DriveConfig::from_yaml_str("vehicle:\n  start_lane: middle\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let cases = [
            ("generation:\n  segment_length: 0\n", "generation.segment_length"),
            ("generation:\n  crosswalk_probability: 1.5\n", "generation.crosswalk_probability"),
            ("stream:\n  max_segments_per_frame: 0\n", "stream.max_segments_per_frame"),
            ("stream:\n  lookahead: -5\n", "stream.lookahead"),
            ("vehicle:\n  lateral_easing: 0\n", "vehicle.lateral_easing"),
            ("animation:\n  respawn_ahead: 500\n", "animation.respawn_ahead"),
            ("decoration_interval_ms: 0\n", "decoration_interval_ms"),
            ("rebase_distance: 10\n", "rebase_distance"),
            ("rebase_distance: 100000\n", "rebase_distance"),
        ];
        for (yaml, expected) in cases {
            match DriveConfig::from_yaml_str(yaml) {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
                other => panic!("{yaml:?}: expected invalid {expected}, got {other:?}"),
            }
        }
    }
}
