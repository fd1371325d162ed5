use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, CoreError};
use crate::math::Vector2;
use crate::types::Bounds;

/// Global physics parameters handed to the world at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Acceleration added to vertical velocity, scaled by the step `dt`.
    pub gravity: Vector2,
    /// Per-step velocity damping factor. Only the x axis is applied.
    pub friction: Vector2,
    /// Reserved for bounce behaviour; not used by the resolution math.
    pub restitution: Vector2,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vector2::new(0.0, 9.8),
            friction: Vector2::new(0.3, 0.3),
            restitution: Vector2::new(0.2, 0.2),
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, v) in [
            ("gravity", self.gravity),
            ("friction", self.friction),
            ("restitution", self.restitution),
        ] {
            if !v.is_finite() {
                return Err(CoreError::InvalidArgument(format!(
                    "physics.{name} must be finite, got ({}, {})",
                    v.x, v.y
                )));
            }
        }
        Ok(())
    }
}

/// Engine configuration: physics, viewport and step rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub physics: PhysicsConfig,
    /// Render bounds used for offscreen checks.
    pub viewport: Bounds,
    /// Maximum number of physics steps per second.
    pub max_fps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            viewport: Bounds::default(),
            max_fps: 60,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        self.physics.validate()?;
        if self.max_fps == 0 {
            return Err(CoreError::InvalidArgument("max_fps must be at least 1".into()));
        }
        if !self.viewport.min.is_finite() || !self.viewport.max.is_finite() {
            return Err(CoreError::InvalidArgument("viewport must be finite".into()));
        }
        if self.viewport.width() <= 0.0 || self.viewport.height() <= 0.0 {
            return Err(CoreError::InvalidArgument(format!(
                "viewport must have a positive area, got {}x{}",
                self.viewport.width(),
                self.viewport.height()
            )));
        }
        Ok(())
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, picking the parser from the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let text = match ext.as_deref() {
            Some("yaml" | "yml" | "json") => std::fs::read_to_string(path)?,
            _ => return Err(ConfigError::UnknownFormat(path.to_path_buf())),
        };
        let config = if ext.as_deref() == Some("json") {
            Self::from_json_str(&text)?
        } else {
            Self::from_yaml_str(&text)?
        };
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_follow_canvas_demo() {
        let c = EngineConfig::default();
        assert_eq!(c.physics.gravity, Vector2::new(0.0, 9.8));
        assert_eq!(c.physics.friction, Vector2::new(0.3, 0.3));
        assert_eq!(c.physics.restitution, Vector2::new(0.2, 0.2));
        assert_eq!(c.max_fps, 60);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let c = EngineConfig::from_yaml_str("max_fps: 30\nphysics:\n  friction: { x: 1.0, y: 1.0 }\n")
            .unwrap();
        assert_eq!(c.max_fps, 30);
        assert_eq!(c.physics.friction, Vector2::ONE);
        assert_eq!(c.physics.gravity, Vector2::new(0.0, 9.8));
    }

    #[test]
    fn zero_fps_is_rejected() {
        let err = EngineConfig::from_json_str(r#"{ "max_fps": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(CoreError::InvalidArgument(_))));
    }

    #[test]
    fn empty_viewport_is_rejected() {
        let config = EngineConfig {
            viewport: Bounds::from_size(0.0, 600.0),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn yaml_round_trip() {
        let c = EngineConfig::default();
        let text = c.to_yaml().unwrap();
        assert_eq!(EngineConfig::from_yaml_str(&text).unwrap(), c);
    }

    #[test]
    fn load_picks_parser_from_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("engine.json");
        let mut f = std::fs::File::create(&json_path).unwrap();
        writeln!(f, r#"{{ "max_fps": 120 }}"#).unwrap();
        assert_eq!(EngineConfig::load(&json_path).unwrap().max_fps, 120);

        let yaml_path = dir.path().join("engine.yml");
        std::fs::write(&yaml_path, "max_fps: 24\n").unwrap();
        assert_eq!(EngineConfig::load(&yaml_path).unwrap().max_fps, 24);

        let toml_path = dir.path().join("engine.toml");
        std::fs::write(&toml_path, "max_fps = 24\n").unwrap();
        assert!(matches!(
            EngineConfig::load(&toml_path),
            Err(ConfigError::UnknownFormat(_))
        ));
    }
}
