use bevy::prelude::*;

use crate::game_logic::RaceOpponent;

pub const OPPONENT_NAMES: [&str; 10] = [
    "HAMILTON",
    "SCHUMACHER",
    "SENNA",
    "PROST",
    "LAUDA",
    "VETTEL",
    "ALONSO",
    "VILLENEUVE",
    "MANSELL",
    "PIQUET",
];

const GRID_SPACING: f32 = 600.0;
const GRID_LANE: f32 = 0.35;
const RUBBER_BAND_GAP: f32 = 5000.0;
const RUBBER_BAND_BOOST: f32 = 1.04;
const RUBBER_BAND_BRAKE: f32 = 0.96;

/// Ten opponents on a two-wide grid behind the start line, slowest first
pub fn init_race_opponents() -> Vec<RaceOpponent> {
    let opponents: Vec<RaceOpponent> = OPPONENT_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| RaceOpponent {
            id: i,
            name: name.to_string(),
            position: -((i + 1) as f32 * GRID_SPACING),
            x: if i % 2 == 0 { -GRID_LANE } else { GRID_LANE },
            speed: 0.0,
            car_id: if matches!(i, 1 | 2 | 4 | 6 | 8) {
                "esprit_s4".to_string()
            } else {
                "esprit_road".to_string()
            },
            skill: 0.75 + (i as f32 / 10.0) * 0.2,
        })
        .collect();
    info!("Race grid set with {} opponents", opponents.len());
    opponents
}

/// Chase `max_speed * skill`, then stretch or shrink toward the player
pub fn update_race_opponents(
    opponents: &mut [RaceOpponent],
    player_position: f32,
    max_speed: f32,
    track_length: f32,
    dt: f32,
) {
    for opponent in opponents.iter_mut() {
        let target = max_speed * opponent.skill;
        if opponent.speed < target {
            opponent.speed += max_speed * 0.3 * dt;
        } else {
            opponent.speed -= max_speed * 0.2 * dt;
        }
        opponent.speed = opponent.speed.clamp(0.0, max_speed * 1.05);

        let gap = player_position - opponent.position;
        if gap > RUBBER_BAND_GAP {
            opponent.speed *= RUBBER_BAND_BOOST;
        } else if gap < -RUBBER_BAND_GAP {
            opponent.speed *= RUBBER_BAND_BRAKE;
        }

        opponent.position += opponent.speed * dt;
        if opponent.position >= track_length {
            opponent.position -= track_length;
        }
    }
}

/// 1-based place of the player among the opponents
pub fn race_position(player_position: f32, opponents: &[RaceOpponent]) -> usize {
    1 + opponents
        .iter()
        .filter(|o| o.position > player_position)
        .count()
}

/// Opponents from just behind the player out to `draw_range` ahead,
/// farthest first so they can be painted back to front.
pub fn visible_opponents<'a>(
    opponents: &'a [RaceOpponent],
    player_position: f32,
    track_length: f32,
    draw_range: f32,
) -> Vec<&'a RaceOpponent> {
    let mut visible: Vec<&RaceOpponent> = opponents
        .iter()
        .filter(|o| {
            let mut relative = o.position - player_position;
            if relative < -track_length / 2.0 {
                relative += track_length;
            }
            if relative > track_length / 2.0 {
                relative -= track_length;
            }
            relative > -2000.0 && relative < draw_range
        })
        .collect();
    visible.sort_by(|a, b| b.position.total_cmp(&a.position));
    visible
}
