use bevy::prelude::*;

use crate::game_logic::{
    PLAYER_COLLISION_ELASTICITY, PLAYER_COLLISION_RADIUS, PlayerState, RaceOpponent,
};

const OPPONENT_COLLISION_THRESHOLD: f32 = 0.25;
const OPPONENT_PLAYER_SPEED_LOSS: f32 = 0.4;
const OPPONENT_SPEED_LOSS: f32 = 0.25;
const OPPONENT_PUSH: f32 = 0.05;
pub const OPPONENT_COLLISION_INTENSITY: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerCollision {
    pub p1: usize,
    pub p2: usize,
    pub distance: f32,
    pub dx: f32,
    pub dz: f32,
}

/// Separation of two players in (lateral, track position) space
pub fn player_distance(a: &PlayerState, b: &PlayerState) -> f32 {
    Vec2::new(a.x - b.x, a.position - b.position).length()
}

pub fn check_player_collision(a: &PlayerState, b: &PlayerState, radius: f32) -> bool {
    player_distance(a, b) < radius
}

/// Push two touching players apart by half the overlap and trade some speed
pub fn resolve_player_collision(a: &mut PlayerState, b: &mut PlayerState) {
    let delta = Vec2::new(a.x - b.x, a.position - b.position);
    let distance = delta.length();
    if distance == 0.0 {
        return;
    }

    let normal = delta / distance;
    let push = (PLAYER_COLLISION_RADIUS - distance) * 0.5;
    a.x += normal.x * push;
    a.position += normal.y * push;
    b.x -= normal.x * push;
    b.position -= normal.y * push;

    // speeds move toward each other
    let transfer = (b.speed - a.speed) * PLAYER_COLLISION_ELASTICITY;
    a.speed = (a.speed + transfer * 0.5).max(0.0);
    b.speed = (b.speed - transfer * 0.5).max(0.0);
}

pub fn check_all_player_collisions(players: &[PlayerState]) -> Vec<PlayerCollision> {
    let mut collisions = Vec::new();
    for i in 0..players.len() {
        for j in (i + 1)..players.len() {
            let (a, b) = (&players[i], &players[j]);
            if check_player_collision(a, b, PLAYER_COLLISION_RADIUS) {
                collisions.push(PlayerCollision {
                    p1: i,
                    p2: j,
                    distance: player_distance(a, b),
                    dx: a.x - b.x,
                    dz: a.position - b.position,
                });
            }
        }
    }
    collisions
}

pub fn resolve_all_player_collisions(players: &mut [PlayerState]) -> usize {
    let collisions = check_all_player_collisions(players);
    for collision in &collisions {
        let (head, tail) = players.split_at_mut(collision.p2);
        resolve_player_collision(&mut head[collision.p1], &mut tail[0]);
        debug!(
            "Players {} and {} collided at distance {:.3}",
            collision.p1, collision.p2, collision.distance
        );
    }
    collisions.len()
}

/// Relative standing of `other` as seen from `me`
pub fn player_relative_position(me: &PlayerState, other: &PlayerState) -> (bool, f32, f32) {
    let dz = other.position - me.position;
    (dz > 0.0, dz.abs(), (other.x - me.x).abs())
}

fn segment_of(position: f32, track_length: f32, segment_length: f32, segments: usize) -> usize {
    let wrapped = position.rem_euclid(track_length);
    (wrapped / segment_length).floor() as usize % segments
}

/// Bump the player against any race opponent in the same or an adjacent
/// segment and within the lateral threshold. Returns how many were hit.
pub fn check_opponent_collisions(
    player: &mut PlayerState,
    opponents: &mut [RaceOpponent],
    track_length: f32,
    segment_length: f32,
    segments: usize,
    dt: f32,
) -> usize {
    if segments == 0 {
        return 0;
    }
    let player_segment = segment_of(player.position, track_length, segment_length, segments);
    let mut hits = 0;

    for opponent in opponents.iter_mut() {
        let opponent_segment = segment_of(opponent.position, track_length, segment_length, segments);
        let diff = player_segment.abs_diff(opponent_segment);
        if diff > 1 && diff < segments - 1 {
            continue;
        }

        if (player.x - opponent.x).abs() < OPPONENT_COLLISION_THRESHOLD {
            player.speed *= 1.0 - OPPONENT_PLAYER_SPEED_LOSS * dt * 8.0;
            opponent.speed *= 1.0 - OPPONENT_SPEED_LOSS * dt * 8.0;
            let push = if player.x < opponent.x { -1.0 } else { 1.0 };
            player.x += push * OPPONENT_PUSH;
            debug!("{} bumped {}", player.name, opponent.name);
            hits += 1;
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(x: f32, position: f32, speed: f32) -> PlayerState {
        let mut p = PlayerState::new("P", 0.0);
        p.x = x;
        p.position = position;
        p.speed = speed;
        p
    }

    fn opponent(x: f32, position: f32) -> RaceOpponent {
        RaceOpponent {
            id: 0,
            name: "SENNA".to_string(),
            position,
            x,
            speed: 10000.0,
            car_id: "esprit_s4".to_string(),
            skill: 0.9,
        }
    }

    #[test]
    fn test_players_push_apart_and_trade_speed() {
        let mut players = vec![player(0.0, 100.0, 5000.0), player(0.1, 100.0, 1000.0)];
        assert_eq!(check_all_player_collisions(&players).len(), 1);
        assert_eq!(resolve_all_player_collisions(&mut players), 1);
        assert!(players[0].x < 0.0);
        assert!(players[1].x > 0.1);
        // faster car gives up speed to the slower one
        assert!((players[0].speed - 4000.0).abs() < 0.01);
        assert!((players[1].speed - 2000.0).abs() < 0.01);
        assert!(player_distance(&players[0], &players[1]) >= 0.1);
    }

    #[test]
    fn test_far_players_do_not_collide() {
        let mut players = vec![player(0.0, 0.0, 100.0), player(0.5, 0.0, 100.0)];
        assert_eq!(resolve_all_player_collisions(&mut players), 0);
        assert_eq!(players[0].x, 0.0);
    }

    #[test]
    fn test_coincident_players_are_left_alone() {
        let mut a = player(0.0, 10.0, 100.0);
        let mut b = player(0.0, 10.0, 200.0);
        resolve_player_collision(&mut a, &mut b);
        assert_eq!(a.speed, 100.0);
    }

    #[test]
    fn test_relative_position() {
        let me = player(0.0, 100.0, 0.0);
        let other = player(-0.5, 400.0, 0.0);
        assert_eq!(player_relative_position(&me, &other), (true, 300.0, 0.5));
    }

    #[test]
    fn test_opponent_bump() {
        let mut p = player(0.0, 1000.0, 10000.0);
        let mut opponents = vec![opponent(0.1, 1150.0), opponent(0.1, 5000.0)];
        let dt = 1.0 / 60.0;
        let hits = check_opponent_collisions(&mut p, &mut opponents, 20000.0, 200.0, 100, dt);
        assert_eq!(hits, 1);
        assert!((p.speed - 10000.0 * (1.0 - 0.4 * dt * 8.0)).abs() < 0.01);
        assert!((opponents[0].speed - 10000.0 * (1.0 - 0.25 * dt * 8.0)).abs() < 0.01);
        assert_eq!(opponents[1].speed, 10000.0);
        assert!((p.x - -0.05).abs() < 1e-6);
    }

    #[test]
    fn test_opponent_bump_across_the_line() {
        let mut p = player(0.0, 50.0, 10000.0);
        // grid slot behind the line wraps to the last segment
        let mut opponents = vec![opponent(0.0, -100.0)];
        let hits = check_opponent_collisions(&mut p, &mut opponents, 20000.0, 200.0, 100, 1.0 / 60.0);
        assert_eq!(hits, 1);
        assert!(p.x > 0.0);
    }
}
