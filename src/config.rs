use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::generator::GenParams;
use crate::movement::MoveSpeeds;
use crate::raycaster::RenderSettings;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Height of the internal framebuffer; width follows the window aspect.
    pub internal_height: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Dungeon Raycaster".to_owned(),
            width: 1024,
            height: 768,
            internal_height: 480,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub ceiling_color: u32,
    pub floor_color: u32,
    pub min_distance: f32,
    pub plane_length: f32,
    pub side_shading: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let settings = RenderSettings::default();
        Self {
            ceiling_color: settings.ceiling_color,
            floor_color: settings.floor_color,
            min_distance: settings.min_distance,
            plane_length: 0.66,
            side_shading: settings.side_shading,
        }
    }
}

impl RenderConfig {
    pub fn settings(&self) -> RenderSettings {
        RenderSettings {
            ceiling_color: self.ceiling_color,
            floor_color: self.floor_color,
            min_distance: self.min_distance,
            side_shading: self.side_shading,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub move_speed: f32,
    pub rot_speed: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        let speeds = MoveSpeeds::default();
        Self {
            move_speed: speeds.move_speed,
            rot_speed: speeds.rot_speed,
        }
    }
}

impl MovementConfig {
    pub fn speeds(&self) -> MoveSpeeds {
        MoveSpeeds {
            move_speed: self.move_speed,
            rot_speed: self.rot_speed,
        }
    }
}

/// Top-level game configuration. Every field has a default, so a partial
/// JSON file only overrides what it names.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub movement: MovementConfig,
    pub generation: GenParams,
    pub texture_path: PathBuf,
    /// Fixed level seed; `None` draws one from the OS.
    pub seed: Option<u64>,
    pub fire_revert_ms: u64,
}

impl GameConfig {
    /// Reads and validates a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would break generation or the framebuffer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generation.validate()?;
        if self.window.internal_height == 0 {
            return Err(ConfigError::InvalidRender(
                "window.internal_height must be at least 1".to_owned(),
            ));
        }
        let min_distance = self.render.min_distance;
        if !min_distance.is_finite() || min_distance <= 0.0 {
            return Err(ConfigError::InvalidRender(format!(
                "render.min_distance must be finite and positive, got {min_distance}"
            )));
        }
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn fire_revert(&self) -> Duration {
        Duration::from_millis(self.fire_revert_ms)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            render: RenderConfig::default(),
            movement: MovementConfig::default(),
            generation: GenParams::default(),
            texture_path: PathBuf::from("images/wall.png"),
            seed: None,
            fire_revert_ms: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json(
            r#"{ "seed": 42, "generation": { "grid_width": 30, "max_room_attempts": 10 } }"#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.generation.grid_width, 30);
        assert_eq!(config.generation.grid_height, 50);
        assert_eq!(config.generation.max_room_attempts, 10);
        assert_eq!(config.movement.move_speed, 0.05);
        assert_eq!(config.render.ceiling_color, 0x222222);
        assert_eq!(config.texture_path, PathBuf::from("images/wall.png"));
        assert_eq!(config.fire_revert(), Duration::from_millis(100));
    }

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_internal_height_is_rejected() {
        let config = GameConfig::from_json(r#"{ "window": { "internal_height": 0 } }"#).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRender(_))
        ));
    }

    #[test]
    fn non_positive_min_distance_is_rejected() {
        for text in [
            r#"{ "render": { "min_distance": 0.0 } }"#,
            r#"{ "render": { "min_distance": -0.5 } }"#,
        ] {
            let config = GameConfig::from_json(text).unwrap();
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidRender(_))
            ));
        }
    }

    #[test]
    fn load_runs_validation() {
        let path = std::env::temp_dir().join(format!(
            "dungeon_raycaster_zero_height_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "window": { "internal_height": 0 } }"#).unwrap();
        let result = GameConfig::load(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::InvalidRender(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = GameConfig::load(Path::new("no/such/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn size_ranges_parse_from_objects() {
        let config = GameConfig::from_json(
            r#"{ "generation": { "room_width": { "min": 3, "max": 5 } } }"#,
        )
        .unwrap();
        assert_eq!(config.generation.room_width.min, 3);
        assert_eq!(config.generation.room_width.max, 5);
    }
}
