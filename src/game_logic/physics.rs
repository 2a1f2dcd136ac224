use bevy::prelude::*;

use crate::game_logic::{
    Car, GameConfig, InputState, PlayerState, SpriteRef, TRAFFIC_DODGE_TOLERANCE, TRAFFIC_EDGE,
    TRAFFIC_EDGE_NUDGE, TRAFFIC_HIT_TOLERANCE, TRAFFIC_LOOKAHEAD, Track, accelerate, increase,
    limit, overlap,
};

/// What the player ran into this tick, if anything
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Impact {
    Obstacle,
    Traffic { car: usize, intensity: f32 },
}

/// Lateral width of every player car in road-width units
pub fn player_width() -> f32 {
    SpriteRef::Car01.collision_width()
}

/// Steer away from `other`, harder when the conflict is close and the
/// closing speed high.
fn dodge(offset: f32, other_offset: f32, closing_speed: f32, step: usize, max_speed: f32) -> f32 {
    let dir = if other_offset > 0.5 {
        -1.0
    } else if other_offset < -0.5 {
        1.0
    } else if offset > other_offset {
        1.0
    } else {
        -1.0
    };
    dir * (1.0 / step as f32) * (closing_speed / max_speed)
}

/// Lateral nudge for traffic car `car_index`: look up to
/// `TRAFFIC_LOOKAHEAD` segments ahead for the player or a slower car in its
/// lane. Cars in the same segment that are further along count as one step
/// ahead.
#[allow(clippy::too_many_arguments)]
pub fn update_car_offset(
    car_index: usize,
    cars: &[Car],
    track: &Track,
    player_segment: usize,
    player_x: f32,
    player_w: f32,
    player_speed: f32,
    max_speed: f32,
    draw_distance: usize,
) -> f32 {
    let car = &cars[car_index];
    let car_w = car.width();
    let car_segment = track.find_segment_index(car.z);

    if car_segment as i64 - player_segment as i64 > draw_distance as i64 {
        return 0.0;
    }

    let blocks = |other: &Car| {
        car.speed > other.speed
            && overlap(car.offset, car_w, other.offset, other.width(), TRAFFIC_DODGE_TOLERANCE)
    };

    for &other_index in &track.segments[car_segment].cars {
        let other = &cars[other_index];
        if other_index != car_index && other.z > car.z && blocks(other) {
            return dodge(car.offset, other.offset, car.speed - other.speed, 1, max_speed);
        }
    }

    let count = track.len();
    for step in 1..TRAFFIC_LOOKAHEAD {
        let index = (car_segment + step) % count;

        if index == player_segment
            && car.speed > player_speed
            && overlap(player_x, player_w, car.offset, car_w, TRAFFIC_DODGE_TOLERANCE)
        {
            return dodge(car.offset, player_x, car.speed - player_speed, step, max_speed);
        }

        for &other_index in &track.segments[index].cars {
            let other = &cars[other_index];
            if other_index != car_index && blocks(other) {
                return dodge(car.offset, other.offset, car.speed - other.speed, step, max_speed);
            }
        }
    }

    if car.offset < -TRAFFIC_EDGE {
        TRAFFIC_EDGE_NUDGE
    } else if car.offset > TRAFFIC_EDGE {
        -TRAFFIC_EDGE_NUDGE
    } else {
        0.0
    }
}

pub fn clamp_player(player: &mut PlayerState, config: &GameConfig) {
    player.x = limit(player.x, -3.0, 3.0);
    player.speed = limit(player.speed, 0.0, config.max_speed);
}

/// One fixed step of player kinematics: advance, steer, throttle, off-road
/// drag, obstacle and traffic hits, then clamp.
pub fn update_player(
    player: &mut PlayerState,
    input: &InputState,
    track: &Track,
    cars: &[Car],
    config: &GameConfig,
    dt: f32,
) -> Option<Impact> {
    let track_length = track.length();
    let segment = track.find_segment(player.position + player.z);
    let player_w = player_width();
    let speed_percent = player.speed / config.max_speed;
    let dx = dt * 2.0 * speed_percent;
    let mut impact = None;

    player.position = increase(player.position, dt * player.speed, track_length);

    if input.left {
        player.x -= dx;
    } else if input.right {
        player.x += dx;
    }
    // pulled to the outside of the bend
    player.x -= dx * segment.curve * config.centrifugal;

    player.speed = if input.faster {
        accelerate(player.speed, config.accel, dt)
    } else if input.slower {
        accelerate(player.speed, config.braking, dt)
    } else {
        accelerate(player.speed, config.decel, dt)
    };

    if player.is_off_road() {
        if player.speed > config.off_road_limit {
            player.speed = accelerate(player.speed, config.off_road_decel, dt);
        }

        for sprite in &segment.sprites {
            let sprite_w = sprite.source.collision_width();
            let side = if sprite.offset > 0.0 { 1.0 } else { -1.0 };
            let sprite_x = sprite.offset + sprite_w / 2.0 * side;
            if overlap(player.x, player_w, sprite_x, sprite_w, 1.0) {
                debug!("{} hit {:?}", player.name, sprite.source);
                player.speed = config.max_speed / 5.0;
                player.position = increase(segment.p1.world.z, -player.z, track_length);
                impact = Some(Impact::Obstacle);
                break;
            }
        }
    }

    for &car_index in &segment.cars {
        let car = &cars[car_index];
        if player.speed > car.speed
            && overlap(player.x, player_w, car.offset, car.width(), TRAFFIC_HIT_TOLERANCE)
        {
            debug!("{} rear-ended car {}", player.name, car_index);
            player.speed = car.speed * (car.speed / player.speed);
            player.position = increase(car.z, -player.z, track_length);
            impact = Some(Impact::Traffic {
                car: car_index,
                intensity: 0.7,
            });
            break;
        }
    }

    clamp_player(player, config);
    impact
}
