use serde::{Deserialize, Serialize};

use crate::game_logic::{CarType, SpriteRef};

/// Per-player controls for one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub faster: bool,
    pub slower: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    pub name: String,
    /// Lateral offset; beyond +-1 is off the road
    pub x: f32,
    /// Fixed distance from the camera to the car
    pub z: f32,
    /// Distance travelled around the loop
    pub position: f32,
    pub speed: f32,
    pub car: CarType,
}

impl PlayerState {
    pub fn new(name: impl Into<String>, z: f32) -> Self {
        Self {
            name: name.into(),
            x: 0.0,
            z,
            position: 0.0,
            speed: 0.0,
            car: CarType::default(),
        }
    }

    pub fn is_off_road(&self) -> bool {
        self.x.abs() > 1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacingLine {
    Racing,
    Overtake,
    Defensive,
}

/// State for a championship racer
#[derive(Clone, Debug, PartialEq)]
pub struct SkillAi {
    pub car_id: usize,
    pub skill: f32,
    pub aggressiveness: f32,
    pub line: RacingLine,
    pub target_speed: f32,
    /// Frames left in the current mistake, counted at 60 per second
    pub mistake_frames: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum VehicleBehavior {
    /// Dodges the player and slower cars, otherwise holds speed
    Traffic,
    SkillAi(SkillAi),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Car {
    pub offset: f32,
    pub z: f32,
    pub sprite: SpriteRef,
    pub speed: f32,
    /// How far through its current segment, for sprite placement
    pub percent: f32,
    pub behavior: VehicleBehavior,
}

impl Car {
    pub fn traffic(offset: f32, z: f32, sprite: SpriteRef, speed: f32) -> Self {
        Self {
            offset,
            z,
            sprite,
            speed,
            percent: 0.0,
            behavior: VehicleBehavior::Traffic,
        }
    }

    pub fn width(&self) -> f32 {
        self.sprite.collision_width()
    }
}

/// Race-mode competitor that keeps its own lap position and is pulled
/// back toward the player when the gap grows.
#[derive(Clone, Debug, PartialEq)]
pub struct RaceOpponent {
    pub id: usize,
    pub name: String,
    pub position: f32,
    pub x: f32,
    pub speed: f32,
    pub car_id: String,
    pub skill: f32,
}
