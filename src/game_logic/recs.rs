//! Racing Environment Construction Set: a parametric track generator driven
//! by nine 0–100 sliders plus a theme, and the short share code that
//! round-trips them.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game_logic::{
    BILLBOARDS, CURVE_EASY, CURVE_HARD, HILL_HIGH, HILL_LOW, LENGTH_SHORT, Mulberry32, PLANTS,
    SpriteRef, Theme, Track,
};

const CODE_ALPHABET: &[u8; 34] = b"0123456789ABCDEFGHJKLMNPQRSTUVWXYZ";
const SLIDERS: usize = 9;
/// Nine digits, a dash and a three-letter theme tag
const CODE_LENGTH: usize = SLIDERS + 1 + 3;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecsCodeError {
    #[error("code must be 13 characters, got {0}")]
    Length(usize),
    #[error("expected '-' before the theme tag")]
    Separator,
    #[error("invalid slider digit '{0}'")]
    Digit(char),
    #[error("unknown theme tag '{0}'")]
    Theme(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecsParams {
    /// How often blocks bend
    pub curves: f32,
    /// How often blocks climb or drop
    pub hills: f32,
    pub scenery: f32,
    /// Curve tightness, easy to hard
    pub sharpness: f32,
    /// Hill height, low to high
    pub steepness: f32,
    /// Lateral spread of roadside scenery
    pub scatter: f32,
    pub length: f32,
    pub difficulty: f32,
    pub obstacles: f32,
    pub theme: Theme,
}

pub const DEFAULT_RECS_PARAMS: RecsParams = RecsParams {
    curves: 50.0,
    hills: 40.0,
    scenery: 60.0,
    sharpness: 30.0,
    steepness: 30.0,
    scatter: 50.0,
    length: 50.0,
    difficulty: 40.0,
    obstacles: 30.0,
    theme: Theme::Night,
};

impl Default for RecsParams {
    fn default() -> Self {
        DEFAULT_RECS_PARAMS
    }
}

impl RecsParams {
    fn sliders(&self) -> [f32; SLIDERS] {
        [
            self.curves,
            self.hills,
            self.scenery,
            self.sharpness,
            self.steepness,
            self.scatter,
            self.length,
            self.difficulty,
            self.obstacles,
        ]
    }

    /// Generator seed folded from the layout sliders
    pub fn seed(&self) -> u32 {
        let seed = self.curves * 100000.0
            + self.hills * 10000.0
            + self.sharpness * 1000.0
            + self.steepness * 100.0
            + self.length * 10.0
            + self.obstacles;
        seed as i64 as u32
    }
}

pub fn encode_recs_code(params: &RecsParams) -> String {
    let last = (CODE_ALPHABET.len() - 1) as f32;
    let digits: String = params
        .sliders()
        .iter()
        .map(|v| {
            let index = ((v / 100.0) * last).round().clamp(0.0, last) as usize;
            CODE_ALPHABET[index] as char
        })
        .collect();
    format!("{}-{}", digits, params.theme.tag())
}

/// Inverse of [`encode_recs_code`]. Sliders come back on the 34-step grid.
pub fn decode_recs_code(code: &str) -> Result<RecsParams, RecsCodeError> {
    let chars: Vec<char> = code.trim().chars().collect();
    if chars.len() != CODE_LENGTH {
        return Err(RecsCodeError::Length(chars.len()));
    }
    if chars[SLIDERS] != '-' {
        return Err(RecsCodeError::Separator);
    }

    let last = (CODE_ALPHABET.len() - 1) as f32;
    let mut values = [0.0; SLIDERS];
    for (value, &c) in values.iter_mut().zip(&chars[..SLIDERS]) {
        let upper = c.to_ascii_uppercase();
        let digit = CODE_ALPHABET
            .iter()
            .position(|&a| a as char == upper)
            .ok_or(RecsCodeError::Digit(c))?;
        *value = (digit as f32 / last * 100.0).round();
    }

    let tag: String = chars[SLIDERS + 1..].iter().collect();
    let theme = Theme::from_tag(&tag).ok_or(RecsCodeError::Theme(tag))?;

    let [curves, hills, scenery, sharpness, steepness, scatter, length, difficulty, obstacles] =
        values;
    Ok(RecsParams {
        curves,
        hills,
        scenery,
        sharpness,
        steepness,
        scatter,
        length,
        difficulty,
        obstacles,
        theme,
    })
}

impl Track {
    /// Rebuild this track from RECS sliders. The same params always give
    /// the same track. Returns the new track length.
    pub fn generate_recs(&mut self, params: &RecsParams, player_z: f32) -> f32 {
        let mut rng = Mulberry32::new(params.seed());
        self.segments.clear();

        let blocks = 6 + (params.length / 100.0 * 14.0).round() as usize;
        let block = LENGTH_SHORT;
        let curve_intensity = CURVE_EASY + params.sharpness / 100.0 * (CURVE_HARD - CURVE_EASY);
        let hill_height = HILL_LOW + params.steepness / 100.0 * (HILL_HIGH - HILL_LOW);
        let curve_probability = 0.10 + params.curves / 100.0 * 0.70;
        let hill_probability = 0.10 + params.hills / 100.0 * 0.60;

        self.add_straight(block);
        for _ in 0..blocks.saturating_sub(2) {
            let is_curve = rng.next_f32() < curve_probability;
            let is_hill = rng.next_f32() < hill_probability;
            let dir = if rng.next_f32() > 0.5 { 1.0 } else { -1.0 };

            match (is_curve, is_hill) {
                (true, true) => {
                    let height = if rng.next_f32() > 0.5 { hill_height } else { -hill_height };
                    self.add_road(block, block, block, dir * curve_intensity, height);
                }
                (true, false) => self.add_curve(block, dir * curve_intensity, 0.0),
                (false, true) => {
                    let height = if rng.next_f32() > 0.5 { hill_height } else { -hill_height };
                    self.add_hill(block, height);
                }
                (false, false) => self.add_straight(block),
            }
        }
        self.add_downhill_to_end();

        let total = self.len();
        let density = params.scenery / 100.0;
        let scatter = 0.5 + params.scatter / 100.0 * 4.5;

        self.add_sprite(20, SpriteRef::Billboard07, -1.0);
        self.add_sprite(40, SpriteRef::Billboard06, 1.0);

        let scenery_step = ((5.0 / (density + 0.01)).round() as usize).max(2);
        for n in (50..total.saturating_sub(50)).step_by(scenery_step) {
            let side = if rng.next_f32() > 0.5 { 1.0 } else { -1.0 };
            let offset = side * (1.0 + rng.next_f32() * scatter);
            let plant = *rng.choose(&PLANTS);
            if rng.next_f32() < density {
                self.add_sprite(n, plant, offset);
            }
        }

        let billboard_step = ((500.0 / (density + 0.1)).round() as usize).max(100);
        for n in (100..total.saturating_sub(100)).step_by(billboard_step) {
            let side = if rng.next_f32() > 0.5 { 1.0 } else { -1.0 };
            let billboard = *rng.choose(&BILLBOARDS);
            self.add_sprite(n, billboard, -side);
        }

        let obstacle_density = params.difficulty / 100.0 * (params.obstacles / 100.0);
        let obstacle_step = ((1000.0 / (obstacle_density * 10.0 + 0.1)).round() as usize).max(50);
        for n in (200..total.saturating_sub(100)).step_by(obstacle_step) {
            if rng.next_f32() < obstacle_density * 2.0 {
                let side = if rng.next_f32() > 0.5 { 0.6 } else { -0.6 };
                self.add_sprite(n, SpriteRef::Boulder3, side);
            }
        }

        self.mark_checkpoints();
        self.mark_start(player_z);
        self.mark_finish();

        info!(
            "Built RECS track {}: {} segments, length {}",
            encode_recs_code(params),
            self.len(),
            self.length()
        );
        self.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_logic::{COLOR_CHECKPOINT, COLOR_FINISH, COLOR_START};

    const PLAYER_Z: f32 = 840.0;

    fn build(params: &RecsParams) -> Track {
        let mut track = Track::new(200.0, 3);
        track.generate_recs(params, PLAYER_Z);
        track
    }

    #[test]
    fn test_same_params_same_track() {
        let a = build(&DEFAULT_RECS_PARAMS);
        let b = build(&DEFAULT_RECS_PARAMS);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_params_differ() {
        let a = build(&DEFAULT_RECS_PARAMS);
        let b = build(&RecsParams {
            curves: 90.0,
            ..DEFAULT_RECS_PARAMS
        });
        assert_ne!(a, b);
    }

    #[test]
    fn test_length_slider_sets_block_count() {
        // leading straight + (blocks - 2) blocks + the 600 segment downhill
        let short = build(&RecsParams {
            length: 0.0,
            ..DEFAULT_RECS_PARAMS
        });
        assert_eq!(short.len(), 75 + 4 * 75 + 600);

        let long = build(&RecsParams {
            length: 100.0,
            ..DEFAULT_RECS_PARAMS
        });
        assert_eq!(long.len(), 75 + 18 * 75 + 600);
    }

    #[test]
    fn test_loop_closes_and_is_marked() {
        let track = build(&DEFAULT_RECS_PARAMS);
        assert!(track.last_y().abs() < 2.0 * track.segment_length);
        assert_eq!(track.length(), track.len() as f32 * 200.0);

        let start = track.find_segment_index(PLAYER_Z);
        assert_eq!(track.segments[start + 2].color, COLOR_START);
        assert_eq!(track.segments[start + 3].color, COLOR_START);
        assert_eq!(track.segments[track.len() - 1].color, COLOR_FINISH);

        let spc = track.segments_per_checkpoint();
        for i in 1..=4 {
            assert_eq!(track.segments[spc * i].color, COLOR_CHECKPOINT);
        }
    }

    #[test]
    fn test_no_obstacles_when_slider_is_zero() {
        let track = build(&RecsParams {
            obstacles: 0.0,
            ..DEFAULT_RECS_PARAMS
        });
        let boulders_on_road = track
            .segments
            .iter()
            .flat_map(|s| &s.sprites)
            .filter(|s| s.source == SpriteRef::Boulder3 && s.offset.abs() == 0.6)
            .count();
        assert_eq!(boulders_on_road, 0);
    }

    #[test]
    fn test_seed() {
        assert_eq!(DEFAULT_RECS_PARAMS.seed(), 5_000_000 + 400_000 + 30_000 + 3_000 + 500 + 30);
    }

    #[test]
    fn test_encode_default() {
        // round(v / 100 * 33) into the alphabet
        assert_eq!(encode_recs_code(&DEFAULT_RECS_PARAMS), "HDLAAHHDA-NIG");
    }

    #[test]
    fn test_decode_round_trip() {
        let code = encode_recs_code(&DEFAULT_RECS_PARAMS);
        let params = decode_recs_code(&code).unwrap();
        assert_eq!(encode_recs_code(&params), code);
        assert_eq!(params.theme, Theme::Night);

        let grid = RecsParams {
            curves: 100.0,
            hills: 0.0,
            theme: Theme::Desert,
            ..DEFAULT_RECS_PARAMS
        };
        let decoded = decode_recs_code(&encode_recs_code(&grid)).unwrap();
        assert_eq!(decoded.curves, 100.0);
        assert_eq!(decoded.hills, 0.0);
        assert_eq!(decoded.theme, Theme::Desert);
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode_recs_code("ABC"), Err(RecsCodeError::Length(3)));
        assert_eq!(decode_recs_code("HDLAAHHDA+NIG"), Err(RecsCodeError::Separator));
        assert_eq!(decode_recs_code("HDLAAHHDI-NIG"), Err(RecsCodeError::Digit('I')));
        assert_eq!(
            decode_recs_code("HDKAAHHDA-XYZ"),
            Err(RecsCodeError::Theme("XYZ".to_string()))
        );
    }
}
