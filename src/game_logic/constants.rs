use crate::game_logic::SegmentColor;

// Simulation timing
pub const DEFAULT_FPS: u32 = 60;
pub const MAX_FRAME_TIME: f32 = 1.0; // longest real frame fed to the accumulator

// Road block lengths, in segments
pub const LENGTH_SHORT: usize = 25;
pub const LENGTH_MEDIUM: usize = 50;

// Hill heights, in segment lengths of rise
pub const HILL_LOW: f32 = 20.0;
pub const HILL_MEDIUM: f32 = 40.0;
pub const HILL_HIGH: f32 = 60.0;

// Curvature per segment
pub const CURVE_EASY: f32 = 2.0;
pub const CURVE_MEDIUM: f32 = 4.0;
pub const CURVE_HARD: f32 = 6.0;

pub const CHECKPOINTS_PER_LAP: usize = 4;
pub const DEFAULT_TOTAL_LAPS: u8 = 3;

// Traffic
pub const TRAFFIC_LOOKAHEAD: usize = 20;
pub const TRAFFIC_DODGE_TOLERANCE: f32 = 1.2;
pub const TRAFFIC_HIT_TOLERANCE: f32 = 0.8;
pub const TRAFFIC_EDGE: f32 = 0.9;
pub const TRAFFIC_EDGE_NUDGE: f32 = 0.1;

// Player vs player
pub const PLAYER_COLLISION_RADIUS: f32 = 0.15;
pub const PLAYER_COLLISION_ELASTICITY: f32 = 0.5;

// Background parallax rates
pub const SKY_SPEED: f32 = 0.001;
pub const HILL_SPEED: f32 = 0.002;
pub const TREE_SPEED: f32 = 0.003;

pub const COLOR_LIGHT: SegmentColor = SegmentColor {
    road: "#6B6B6B",
    grass: "#10AA10",
    rumble: "#555555",
    lane: Some("#CCCCCC"),
};
pub const COLOR_DARK: SegmentColor = SegmentColor {
    road: "#696969",
    grass: "#009A00",
    rumble: "#BBBBBB",
    lane: None,
};
pub const COLOR_START: SegmentColor = SegmentColor {
    road: "white",
    grass: "white",
    rumble: "white",
    lane: None,
};
pub const COLOR_CHECKPOINT: SegmentColor = SegmentColor {
    road: "#FFFF88",
    grass: "#FFFF88",
    rumble: "#FFFF88",
    lane: None,
};
pub const COLOR_FINISH: SegmentColor = SegmentColor {
    road: "black",
    grass: "black",
    rumble: "black",
    lane: None,
};
