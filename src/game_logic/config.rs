use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game_logic::{DEFAULT_FPS, ThemePhysics};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Physics and geometry profile for one race. Missing JSON fields take
/// their default values.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub fps: u32,
    pub width: f32,
    pub height: f32,
    pub lanes: u32,
    pub road_width: f32,
    pub segment_length: f32,
    pub rumble_length: usize,
    pub draw_distance: usize,
    pub fog_density: f32,
    pub centrifugal: f32,
    pub max_speed: f32,
    pub accel: f32,
    pub braking: f32,
    pub decel: f32,
    pub off_road_decel: f32,
    pub off_road_limit: f32,
    pub camera_height: f32,
    pub field_of_view: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        let fps = DEFAULT_FPS;
        let segment_length = 200.0;
        // one and a half segments per frame
        let max_speed = segment_length * fps as f32 * 1.5;
        Self {
            fps,
            width: 1024.0,
            height: 768.0,
            lanes: 3,
            road_width: 2000.0,
            segment_length,
            rumble_length: 3,
            draw_distance: 300,
            fog_density: 5.0,
            centrifugal: 0.3,
            max_speed,
            accel: max_speed / 5.0,
            braking: -max_speed,
            decel: -max_speed / 5.0,
            off_road_decel: -max_speed / 2.0,
            off_road_limit: max_speed / 4.0,
            camera_height: 1000.0,
            field_of_view: 100.0,
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Fixed simulation step in seconds
    pub fn step(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }

    pub fn scaled(&self, physics: &ThemePhysics, car: Option<&CarType>) -> Self {
        apply_theme_physics(self, physics, car)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarType {
    pub id: String,
    pub name: String,
    pub top_speed: f32,
    pub acceleration: f32,
    pub handling: f32,
    pub braking: f32,
}

impl CarType {
    fn new(id: &str, name: &str, top_speed: f32, acceleration: f32, handling: f32, braking: f32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            top_speed,
            acceleration,
            handling,
            braking,
        }
    }

    pub fn all() -> Vec<CarType> {
        vec![
            Self::new("esprit_road", "Esprit Road", 0.95, 1.0, 1.0, 1.0),
            Self::new("esprit_s4", "Esprit S4", 1.0, 1.1, 0.85, 1.05),
            Self::new("m200", "M200", 1.1, 0.85, 0.75, 0.9),
        ]
    }

    pub fn by_id(id: &str) -> Option<CarType> {
        Self::all().into_iter().find(|car| car.id == id)
    }
}

impl Default for CarType {
    fn default() -> Self {
        Self::new("esprit_road", "Esprit Road", 0.95, 1.0, 1.0, 1.0)
    }
}

/// Scaled copy of `base` for a theme and optional car
pub fn apply_theme_physics(base: &GameConfig, physics: &ThemePhysics, car: Option<&CarType>) -> GameConfig {
    let mut config = base.clone();
    config.max_speed *= physics.max_speed;
    config.accel *= physics.acceleration;
    config.braking *= physics.brake_force;
    config.off_road_decel *= physics.off_road_grip;
    config.centrifugal *= physics.grip;

    if let Some(car) = car {
        config.max_speed *= car.top_speed;
        config.accel *= car.acceleration;
        config.centrifugal *= car.handling;
        config.braking *= car.braking;
    }
    config
}
