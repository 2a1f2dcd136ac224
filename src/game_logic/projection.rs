use bevy::prelude::*;

use crate::game_logic::{GameConfig, PlayerState, Track, exponential_fog, interpolate, percent_remaining};

/// Post-projection screen coordinates; transient, rewritten every frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub w: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldPoint {
    pub world: Vec3,
    pub camera: Vec3,
    pub screen: ScreenPoint,
}

impl WorldPoint {
    pub fn at(y: f32, z: f32) -> Self {
        Self {
            world: Vec3::new(0.0, y, z),
            ..default()
        }
    }
}

/// Distance from the eye to the projection plane for a horizontal field of view
pub fn camera_depth(field_of_view: f32) -> f32 {
    1.0 / (field_of_view / 2.0).to_radians().tan()
}

/// Fixed distance from the camera to the player car
pub fn player_z(camera_height: f32, camera_depth: f32) -> f32 {
    camera_height * camera_depth
}

pub fn resolution(height: f32, base_height: f32) -> f32 {
    height / base_height
}

/// World to camera to screen. The caller must skip points whose camera z is
/// at or behind the projection plane.
#[allow(clippy::too_many_arguments)]
pub fn project(
    p: &mut WorldPoint,
    camera_x: f32,
    camera_y: f32,
    camera_z: f32,
    camera_depth: f32,
    width: f32,
    height: f32,
    road_width: f32,
) {
    p.camera = p.world - Vec3::new(camera_x, camera_y, camera_z);
    p.screen.scale = camera_depth / p.camera.z;
    p.screen.x = (width / 2.0 + p.screen.scale * p.camera.x * width / 2.0).round();
    p.screen.y = (height / 2.0 - p.screen.scale * p.camera.y * height / 2.0).round();
    p.screen.w = (p.screen.scale * road_width * width / 2.0).round();
}

/// Project `draw_distance` segments ahead of the camera and return the ones
/// a renderer should draw, nearest first. Segments behind the camera, facing
/// away, or hidden behind a nearer crest are left out.
pub fn project_road(
    track: &mut Track,
    player: &PlayerState,
    config: &GameConfig,
    camera_depth: f32,
) -> Vec<usize> {
    let track_length = track.length();
    let base_index = track.find_segment_index(player.position);
    let base_percent = percent_remaining(player.position, track.segment_length);
    let player_segment = track.find_segment(player.position + player.z);
    let player_percent = percent_remaining(player.position + player.z, track.segment_length);
    let player_y = interpolate(
        player_segment.p1.world.y,
        player_segment.p2.world.y,
        player_percent,
    );
    let camera_y = player_y + config.camera_height;

    let mut max_y = config.height;
    let mut x = 0.0;
    let mut dx = -(track.segments[base_index].curve * base_percent);
    let mut visible = Vec::new();

    let count = track.len();
    for n in 0..config.draw_distance.min(count) {
        let index = (base_index + n) % count;
        let segment = &mut track.segments[index];
        segment.looped = segment.index < base_index;
        segment.fog = exponential_fog(n as f32 / config.draw_distance as f32, config.fog_density);
        segment.clip = max_y;

        let camera_z = player.position - if segment.looped { track_length } else { 0.0 };
        let camera_x = player.x * config.road_width;
        project(
            &mut segment.p1,
            camera_x - x,
            camera_y,
            camera_z,
            camera_depth,
            config.width,
            config.height,
            config.road_width,
        );
        project(
            &mut segment.p2,
            camera_x - x - dx,
            camera_y,
            camera_z,
            camera_depth,
            config.width,
            config.height,
            config.road_width,
        );

        x += dx;
        dx += segment.curve;

        if segment.p1.camera.z <= camera_depth
            || segment.p2.screen.y >= segment.p1.screen.y
            || segment.p2.screen.y >= max_y
        {
            continue;
        }

        visible.push(index);
        max_y = segment.p1.screen.y;
    }
    visible
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_depth_for_hundred_degrees() {
        let d = camera_depth(100.0);
        assert!((d - 1.0 / 50f32.to_radians().tan()).abs() < 1e-6);
        assert!((player_z(1000.0, d) - 1000.0 * d).abs() < 1e-3);
        assert_eq!(resolution(960.0, 480.0), 2.0);
    }

    #[test]
    fn test_project_center_point() {
        let mut p = WorldPoint {
            world: Vec3::new(0.0, 0.0, 1000.0),
            ..default()
        };
        project(&mut p, 0.0, 0.0, 0.0, 1.0, 1024.0, 768.0, 2000.0);
        assert_eq!(p.camera.z, 1000.0);
        assert!((p.screen.scale - 0.001).abs() < 1e-7);
        assert_eq!(p.screen.x, 512.0);
        assert_eq!(p.screen.y, 384.0);
        assert_eq!(p.screen.w, (0.001f32 * 2000.0 * 512.0).round());
    }

    #[test]
    fn test_project_shrinks_with_distance() {
        let mut near = WorldPoint {
            world: Vec3::new(500.0, -100.0, 500.0),
            ..default()
        };
        let mut far = WorldPoint {
            world: Vec3::new(500.0, -100.0, 5000.0),
            ..default()
        };
        project(&mut near, 0.0, 0.0, 0.0, 0.84, 1024.0, 768.0, 2000.0);
        project(&mut far, 0.0, 0.0, 0.0, 0.84, 1024.0, 768.0, 2000.0);
        assert!(near.screen.w > far.screen.w);
        // below the camera projects below the horizon
        assert!(near.screen.y > 384.0 && far.screen.y > 384.0);
        assert!(near.screen.y > far.screen.y);
        assert!(near.screen.x > far.screen.x);
    }

    fn flat_track() -> Track {
        let mut track = Track::new(200.0, 3);
        track.add_straight(200);
        track
    }

    #[test]
    fn test_project_road_flat_is_monotonic() {
        let mut track = flat_track();
        let config = GameConfig::default();
        let depth = camera_depth(config.field_of_view);
        let player = PlayerState::new("P1", player_z(config.camera_height, depth));
        let visible = project_road(&mut track, &player, &config, depth);
        assert!(!visible.is_empty());
        for pair in visible.windows(2) {
            let a = &track.segments[pair[0]];
            let b = &track.segments[pair[1]];
            assert!(b.p1.screen.y <= a.p1.screen.y);
            assert!(b.fog <= a.fog);
        }
    }

    #[test]
    fn test_project_road_marks_looped_segments() {
        let mut track = flat_track();
        let config = GameConfig::default();
        let depth = camera_depth(config.field_of_view);
        let mut player = PlayerState::new("P1", player_z(config.camera_height, depth));
        player.position = track.length() - 10.0 * track.segment_length;
        project_road(&mut track, &player, &config, depth);
        assert!(track.segments[5].looped);
        assert!(!track.segments[track.len() - 5].looped);
    }
}
