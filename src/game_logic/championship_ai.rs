use bevy::prelude::*;
use rand::Rng;

use crate::game_logic::{CARS, Car, RacingLine, SkillAi, VehicleBehavior, increase};

pub const CHAMPIONSHIP_FIELD: usize = 19;
const FIELD_SPACING: f32 = 600.0;
const MISTAKE_FRAMES: f32 = 60.0;

/// The championship field, parked nose to tail ahead of the line with the
/// strongest drivers at the front.
pub fn init_championship_ai(track_length: f32, rng: &mut impl Rng) -> Vec<Car> {
    let field: Vec<Car> = (0..CHAMPIONSHIP_FIELD)
        .map(|i| {
            let back = (CHAMPIONSHIP_FIELD - i) as f32 * FIELD_SPACING;
            Car {
                offset: if i % 2 == 0 { -0.4 } else { 0.4 },
                z: increase(track_length, -back, track_length),
                sprite: CARS[i % CARS.len()],
                speed: 0.0,
                percent: 0.0,
                behavior: VehicleBehavior::SkillAi(SkillAi {
                    car_id: i,
                    skill: 0.7 + (i as f32 / CHAMPIONSHIP_FIELD as f32) * 0.3,
                    aggressiveness: rng.random::<f32>(),
                    line: RacingLine::Racing,
                    target_speed: 0.0,
                    mistake_frames: 0.0,
                }),
            }
        })
        .collect();
    info!("Championship field of {} cars on the grid", field.len());
    field
}

/// Pick a line and target speed, occasionally make a mistake, then steer
/// and throttle toward the target. Traffic cars are left untouched.
pub fn update_racing_ai(
    car: &mut Car,
    curve: f32,
    player_track_z: f32,
    dt: f32,
    max_speed: f32,
    rng: &mut impl Rng,
) {
    let car_z = car.z;
    let VehicleBehavior::SkillAi(ai) = &mut car.behavior else {
        return;
    };

    if ai.mistake_frames > 0.0 {
        ai.mistake_frames -= dt * 60.0;
    }

    if car_z < player_track_z {
        ai.line = RacingLine::Overtake;
        ai.target_speed = max_speed * ai.skill * (1.0 + ai.aggressiveness * 0.1);
    } else {
        ai.line = RacingLine::Defensive;
        ai.target_speed = max_speed * ai.skill;
    }

    if curve.abs() > 2.0 {
        ai.target_speed *= 0.8;
    }

    if ai.mistake_frames <= 0.0 && rng.random::<f32>() < 0.001 * (1.0 - ai.skill) {
        debug!("Car {} ran wide", ai.car_id);
        ai.mistake_frames = MISTAKE_FRAMES;
    }

    if ai.mistake_frames > 0.0 {
        ai.target_speed *= 0.7;
        let drift = if curve > 0.0 { -0.05 } else { 0.05 };
        car.offset += drift * dt;
    } else {
        let target_offset = match ai.line {
            RacingLine::Overtake if car.offset > 0.0 => 0.6,
            RacingLine::Overtake => -0.6,
            _ => 0.0,
        };
        car.offset += (target_offset - car.offset) * dt * 2.0;
    }

    if car.speed < ai.target_speed {
        car.speed += max_speed * 0.4 * dt;
    } else {
        car.speed -= max_speed * 0.5 * dt;
    }

    car.speed = car.speed.clamp(0.0, max_speed * 1.2);
    car.offset = car.offset.clamp(-0.9, 0.9);
}
