use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_logic::{
    CARS, Car, GameConfig, HILL_SPEED, Impact, InputState, LapCounter, LapEvent,
    OPPONENT_COLLISION_INTENSITY, PlayerState, RaceOpponent, Ranking, RecsParams, SKY_SPEED,
    SpriteRef, TREE_SPEED, Theme, Track, VehicleBehavior, camera_depth, check_opponent_collisions,
    clamp_player, format_time, increase, init_championship_ai, init_race_opponents,
    percent_remaining, player_rankings, player_width, player_z, project_road, race_position,
    resolve_all_player_collisions, update_car_offset, update_player, update_race_opponents,
    update_racing_ai,
};

pub const OBSTACLE_COLLISION_INTENSITY: f32 = 1.0;
const MIRROR_COLORS: [&str; 4] = ["#dc2626", "#3b82f6", "#f59e0b", "#10b981"];

/// Called with an impact intensity in `[0, 1]` whenever a player hits something
pub type CollisionCallback = Box<dyn FnMut(f32) + Send + Sync>;

/// All mutable race state. Player 0 drives the camera, traffic avoidance,
/// parallax and lap clock.
#[derive(Resource)]
pub struct WorldState {
    pub config: GameConfig,
    /// Unscaled profile that themes and cars are applied to
    pub base_config: GameConfig,
    pub theme: Theme,
    pub camera_depth: f32,
    pub players: Vec<PlayerState>,
    pub inputs: Vec<InputState>,
    pub lap_counters: Vec<LapCounter>,
    pub cars: Vec<Car>,
    pub race_opponents: Vec<RaceOpponent>,
    pub track: Track,
    pub sky_offset: f32,
    pub hill_offset: f32,
    pub tree_offset: f32,
    pub current_lap_time: f32,
    pub last_lap_time: Option<f32>,
    pub fast_lap_time: Option<f32>,
    finished_count: usize,
    rng: StdRng,
    on_collision: Option<CollisionCallback>,
}

/// New world on the default config with a night track. Players without a
/// name are called `PLAYER n`.
pub fn create_world(player_count: usize, player_names: &[String]) -> WorldState {
    WorldState::new(GameConfig::default(), player_count, player_names, rand::random())
}

pub fn reset_cars(world: &mut WorldState, total_cars: usize) {
    world.reset_cars(total_cars);
}

pub fn update(world: &mut WorldState, dt: f32) {
    world.update(dt);
}

impl WorldState {
    pub fn new(config: GameConfig, player_count: usize, player_names: &[String], seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let depth = camera_depth(config.field_of_view);
        let z = player_z(config.camera_height, depth);

        let mut track = Track::new(config.segment_length, config.rumble_length);
        track.reset_for_theme(Theme::default(), z, rng.random());

        let players: Vec<PlayerState> = (0..player_count.max(1))
            .map(|i| match player_names.get(i) {
                Some(name) if !name.is_empty() => PlayerState::new(name.clone(), z),
                _ => PlayerState::new(format!("PLAYER {}", i + 1), z),
            })
            .collect();
        let inputs = vec![InputState::default(); players.len()];
        let lap_counters = vec![LapCounter::default(); players.len()];

        let mut world = Self {
            config: config.clone(),
            base_config: config,
            theme: Theme::default(),
            camera_depth: depth,
            players,
            inputs,
            lap_counters,
            cars: Vec::new(),
            race_opponents: Vec::new(),
            track,
            sky_offset: 0.0,
            hill_offset: 0.0,
            tree_offset: 0.0,
            current_lap_time: 0.0,
            last_lap_time: None,
            fast_lap_time: None,
            finished_count: 0,
            rng,
            on_collision: None,
        };
        world.set_theme(Theme::default());
        info!("World created for {} player(s)", world.players.len());
        world
    }

    pub fn track_length(&self) -> f32 {
        self.track.length()
    }

    pub fn player_z(&self) -> f32 {
        player_z(self.config.camera_height, self.camera_depth)
    }

    pub fn set_collision_callback(&mut self, callback: impl FnMut(f32) + Send + Sync + 'static) {
        self.on_collision = Some(Box::new(callback));
    }

    fn collided(&mut self, intensity: f32) {
        if let Some(callback) = self.on_collision.as_mut() {
            callback(intensity);
        }
    }

    /// Re-derive the physics profile for `theme` and player 0's car
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        let car = self.players.first().map(|p| &p.car);
        self.config = self.base_config.scaled(&theme.physics(), car);
        self.config.fog_density = theme.fog_density();
    }

    /// Switch theme and rebuild the track with that theme's layout
    pub fn load_theme(&mut self, theme: Theme) -> f32 {
        self.set_theme(theme);
        let z = self.player_z();
        let seed = self.rng.random();
        self.track.reset_for_theme(theme, z, seed);
        self.restart();
        self.track_length()
    }

    /// Rebuild the track from RECS sliders under their theme's physics
    pub fn load_recs(&mut self, params: &RecsParams) -> f32 {
        self.set_theme(params.theme);
        let z = self.player_z();
        self.track.generate_recs(params, z);
        self.restart();
        self.track_length()
    }

    /// Back to the grid: no vehicles, players at the start, clocks cleared
    pub fn restart(&mut self) {
        self.cars.clear();
        self.race_opponents.clear();
        for segment in &mut self.track.segments {
            segment.cars.clear();
        }
        for player in &mut self.players {
            player.position = 0.0;
            player.speed = 0.0;
            player.x = 0.0;
        }
        for counter in &mut self.lap_counters {
            *counter = LapCounter::new(counter.total_laps);
        }
        self.sky_offset = 0.0;
        self.hill_offset = 0.0;
        self.tree_offset = 0.0;
        self.current_lap_time = 0.0;
        self.last_lap_time = None;
        self.fast_lap_time = None;
        self.finished_count = 0;
    }

    /// Add a car to the world and list it in the segment its `z` maps to
    pub fn add_car(&mut self, car: Car) -> usize {
        let index = self.cars.len();
        let segment = self.track.find_segment_index(car.z);
        self.track.segments[segment].cars.push(index);
        self.cars.push(car);
        index
    }

    /// Replace all cars with `total_cars` traffic cars at random segments
    pub fn reset_cars(&mut self, total_cars: usize) {
        self.cars.clear();
        for segment in &mut self.track.segments {
            segment.cars.clear();
        }

        let max_speed = self.config.max_speed;
        let segments = self.track.len();
        for _ in 0..total_cars {
            let side = if self.rng.random::<bool>() { -0.8 } else { 0.8 };
            let offset = self.rng.random::<f32>() * side;
            let z = (self.rng.random::<f32>() * segments as f32).floor() * self.config.segment_length;
            let sprite = CARS[self.rng.random_range(0..CARS.len())];
            let spread = if sprite == SpriteRef::Semi { 4.0 } else { 2.0 };
            let speed = max_speed / 4.0 + self.rng.random::<f32>() * max_speed / spread;
            self.add_car(Car::traffic(offset, z, sprite, speed));
        }
        info!("Placed {} traffic cars", total_cars);
    }

    /// Put the championship field on the grid alongside any traffic
    pub fn add_championship_field(&mut self) {
        let field = init_championship_ai(self.track_length(), &mut self.rng);
        for car in field {
            self.add_car(car);
        }
    }

    pub fn add_race_opponents(&mut self) {
        self.race_opponents = init_race_opponents();
    }

    /// One fixed step of the whole simulation
    pub fn update(&mut self, dt: f32) {
        let track_length = self.track_length();
        let segment_length = self.track.segment_length;
        let start_position = self.players[0].position;
        let player_curve = self
            .track
            .find_segment(start_position + self.players[0].z)
            .curve;

        self.update_cars(dt);

        let previous: Vec<f32> = self.players.iter().map(|p| p.position).collect();
        for i in 0..self.players.len() {
            let impact = update_player(
                &mut self.players[i],
                &self.inputs[i],
                &self.track,
                &self.cars,
                &self.config,
                dt,
            );
            match impact {
                Some(Impact::Obstacle) => self.collided(OBSTACLE_COLLISION_INTENSITY),
                Some(Impact::Traffic { intensity, .. }) => self.collided(intensity),
                None => {}
            }
        }

        if self.players.len() > 1 && resolve_all_player_collisions(&mut self.players) > 0 {
            for player in &mut self.players {
                player.position = increase(player.position, 0.0, track_length);
                clamp_player(player, &self.config);
            }
        }

        if !self.race_opponents.is_empty() {
            update_race_opponents(
                &mut self.race_opponents,
                self.players[0].position,
                self.config.max_speed,
                track_length,
                dt,
            );
            let hits = check_opponent_collisions(
                &mut self.players[0],
                &mut self.race_opponents,
                track_length,
                segment_length,
                self.track.len(),
                dt,
            );
            clamp_player(&mut self.players[0], &self.config);
            for _ in 0..hits {
                self.collided(OPPONENT_COLLISION_INTENSITY);
            }
        }

        let position_delta = (self.players[0].position - start_position) / segment_length;
        self.sky_offset = increase(self.sky_offset, SKY_SPEED * player_curve * position_delta, 1.0);
        self.hill_offset = increase(self.hill_offset, HILL_SPEED * player_curve * position_delta, 1.0);
        self.tree_offset = increase(self.tree_offset, TREE_SPEED * player_curve * position_delta, 1.0);

        self.update_lap_clock(start_position, dt);
        self.update_lap_counters(&previous);
    }

    /// Steer, move and re-file every car in the segment its new `z` maps to
    fn update_cars(&mut self, dt: f32) {
        let track_length = self.track_length();
        let player = &self.players[0];
        let player_track_z = player.position + player.z;
        let player_segment = self.track.find_segment_index(player_track_z);
        let (player_x, player_speed) = (player.x, player.speed);
        let player_w = player_width();

        for i in 0..self.cars.len() {
            let old_segment = self.track.find_segment_index(self.cars[i].z);
            if matches!(self.cars[i].behavior, VehicleBehavior::SkillAi(_)) {
                let curve = self.track.segments[old_segment].curve;
                update_racing_ai(
                    &mut self.cars[i],
                    curve,
                    player_track_z,
                    dt,
                    self.config.max_speed,
                    &mut self.rng,
                );
            } else {
                let nudge = update_car_offset(
                    i,
                    &self.cars,
                    &self.track,
                    player_segment,
                    player_x,
                    player_w,
                    player_speed,
                    self.config.max_speed,
                    self.config.draw_distance,
                );
                self.cars[i].offset += nudge;
            }

            let car = &mut self.cars[i];
            car.z = increase(car.z, dt * car.speed, track_length);
            car.percent = percent_remaining(car.z, self.track.segment_length);

            let new_segment = self.track.find_segment_index(car.z);
            if new_segment != old_segment {
                let listed = &mut self.track.segments[old_segment].cars;
                if let Some(slot) = listed.iter().position(|&c| c == i) {
                    listed.remove(slot);
                }
                self.track.segments[new_segment].cars.push(i);
            }
        }
    }

    /// Player 0's lap clock: a lap ends when the player crosses the start
    /// line with the clock running.
    fn update_lap_clock(&mut self, start_position: f32, dt: f32) {
        let player = &self.players[0];
        if player.position <= player.z {
            return;
        }
        if self.current_lap_time > 0.0 && start_position < player.z {
            let lap_time = self.current_lap_time;
            self.last_lap_time = Some(lap_time);
            self.current_lap_time = 0.0;
            if self.fast_lap_time.is_none_or(|best| lap_time < best) {
                self.fast_lap_time = Some(lap_time);
                info!("Fastest lap {}", format_time(lap_time));
            } else {
                info!("Lap time {}", format_time(lap_time));
            }
        } else {
            self.current_lap_time += dt;
        }
    }

    fn update_lap_counters(&mut self, previous: &[f32]) {
        let track_length = self.track_length();
        let segment_length = self.track.segment_length;
        let per_checkpoint = self.track.segments_per_checkpoint();

        for (i, counter) in self.lap_counters.iter_mut().enumerate() {
            let player = &self.players[i];
            let event = counter.update(
                previous[i],
                player.position,
                player.z,
                track_length,
                segment_length,
                per_checkpoint,
            );
            if event == Some(LapEvent::Finished) {
                self.finished_count += 1;
                counter.finish_order = Some(self.finished_count);
                info!("{} finished in place {}", player.name, self.finished_count);
            }
        }
    }

    /// Fill the projection fields for player 0's view and return the
    /// visible segment indices, nearest first.
    pub fn project_road(&mut self) -> Vec<usize> {
        project_road(&mut self.track, &self.players[0], &self.config, self.camera_depth)
    }

    pub fn rankings(&self) -> Vec<Ranking> {
        player_rankings(&self.lap_counters, &self.players, self.track_length())
    }

    /// Player 0's place among the race opponents
    pub fn race_position(&self) -> usize {
        race_position(self.players[0].position, &self.race_opponents)
    }

    pub fn race_finished(&self) -> bool {
        self.lap_counters.iter().all(|c| c.has_finished)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MirrorCar {
    pub offset: f32,
    /// Gap behind the player as a fraction of the mirror range
    pub distance: f32,
    pub color: &'static str,
}

/// Cars behind the player within `mirror_range`, farthest first
pub fn get_mirror_cars(
    cars: &[Car],
    player_position: f32,
    track_length: f32,
    mirror_range: f32,
    max_cars: usize,
) -> Vec<MirrorCar> {
    let mut mirror: Vec<MirrorCar> = cars
        .iter()
        .filter_map(|car| {
            let mut behind = player_position - car.z;
            if behind < 0.0 {
                behind += track_length;
            }
            (behind > 0.0 && behind < mirror_range).then(|| MirrorCar {
                offset: car.offset,
                distance: (behind / mirror_range).min(1.0),
                color: MIRROR_COLORS[(car.offset * 10.0).abs().floor() as usize % MIRROR_COLORS.len()],
            })
        })
        .collect();
    mirror.sort_by(|a, b| b.distance.total_cmp(&a.distance));
    mirror.truncate(max_cars);
    mirror
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn world() -> WorldState {
        WorldState::new(GameConfig::default(), 1, &[], 7)
    }

    fn straight_world(segments: usize, curve: f32) -> WorldState {
        let mut world = world();
        world.track = Track::new(200.0, 3);
        world.track.add_road(0, segments, 0, curve, 0.0);
        world
    }

    fn assert_membership(world: &WorldState) {
        for (i, car) in world.cars.iter().enumerate() {
            let home = world.track.find_segment_index(car.z);
            for segment in &world.track.segments {
                let listed = segment.cars.iter().filter(|&&c| c == i).count();
                let expected = usize::from(segment.index == home);
                assert_eq!(listed, expected, "car {} in segment {}", i, segment.index);
            }
        }
    }

    #[test]
    fn test_create_world_names_players() {
        let names = vec!["ALICE".to_string()];
        let world = WorldState::new(GameConfig::default(), 3, &names, 1);
        assert_eq!(world.players.len(), 3);
        assert_eq!(world.inputs.len(), 3);
        assert_eq!(world.players[0].name, "ALICE");
        assert_eq!(world.players[2].name, "PLAYER 3");
        assert!(!world.track.is_empty());
        assert!((world.players[0].z - world.player_z()).abs() < 1e-3);
    }

    #[test]
    fn test_set_theme_scales_config() {
        let mut world = world();
        world.set_theme(Theme::Snow);
        let physics = Theme::Snow.physics();
        let car = &world.players[0].car;
        let expected = world.base_config.max_speed * physics.max_speed * car.top_speed;
        assert!((world.config.max_speed - expected).abs() < 0.01);
        assert_eq!(world.config.fog_density, Theme::Snow.fog_density());
        // base profile is never touched
        assert_eq!(world.base_config, GameConfig::default());
    }

    #[test]
    fn test_reset_cars_membership_holds_while_driving() {
        let mut world = world();
        world.reset_cars(60);
        assert_eq!(world.cars.len(), 60);
        assert_membership(&world);

        world.inputs[0].faster = true;
        for _ in 0..300 {
            world.update(1.0 / 60.0);
        }
        assert_membership(&world);

        let max_speed = world.config.max_speed;
        for car in &world.cars {
            assert!(car.speed >= max_speed / 4.0 && car.speed <= max_speed * 0.75);
            assert!((0.0..world.track_length()).contains(&car.z));
        }
    }

    #[test]
    fn test_bounded_state_from_wild_values() {
        for dt in [0.0, 0.25, 1.0] {
            let mut world = world();
            world.players[0].x = 12.0;
            world.players[0].speed = 1.0e7;
            world.inputs[0].faster = true;
            world.update(dt);
            let player = &world.players[0];
            assert!((-3.0..=3.0).contains(&player.x));
            assert!(player.speed >= 0.0 && player.speed <= world.config.max_speed);
        }
    }

    #[test]
    fn test_centrifugal_pull_in_update() {
        let mut world = straight_world(100, 5.0);
        world.players[0].speed = 10000.0;
        world.update(1.0 / 60.0);
        assert!(world.players[0].x < 0.0);
    }

    #[test]
    fn test_position_wraps_around() {
        let mut world = world();
        let length = world.track_length();
        world.players[0].position = length - 100.0;
        world.players[0].speed = world.config.max_speed;
        assert!(world.config.max_speed / 60.0 > 100.0);
        world.update(1.0 / 60.0);
        let position = world.players[0].position;
        assert!((0.0..length).contains(&position));
    }

    #[test]
    fn test_lap_clock_records_and_tracks_best() {
        let mut world = straight_world(100, 0.0);
        let z = world.players[0].z;
        world.current_lap_time = 30.0;
        world.players[0].position = z - 10.0;
        world.players[0].speed = 6000.0;
        world.update(1.0 / 60.0);
        assert_eq!(world.last_lap_time, Some(30.0));
        assert_eq!(world.fast_lap_time, Some(30.0));
        assert_eq!(world.current_lap_time, 0.0);

        world.update(1.0 / 60.0);
        assert!((world.current_lap_time - 1.0 / 60.0).abs() < 1e-6);

        // slower lap keeps the best
        world.current_lap_time = 40.0;
        world.players[0].position = z - 10.0;
        world.update(1.0 / 60.0);
        assert_eq!(world.last_lap_time, Some(40.0));
        assert_eq!(world.fast_lap_time, Some(30.0));
    }

    #[test]
    fn test_clock_waits_behind_the_line() {
        let mut world = world();
        world.update(1.0 / 60.0);
        assert_eq!(world.current_lap_time, 0.0);
    }

    #[test]
    fn test_collision_callback_fires_on_traffic_hit() {
        let mut world = straight_world(50, 0.0);
        let hits = Arc::new(Mutex::new(Vec::new()));
        let sink = hits.clone();
        world.set_collision_callback(move |intensity| sink.lock().unwrap().push(intensity));

        let z = world.players[0].z;
        world.players[0].position = 2000.0;
        world.players[0].speed = 9000.0;
        world.add_car(Car::traffic(0.0, 2000.0 + z + 50.0, SpriteRef::Car01, 1000.0));
        world.update(1.0 / 60.0);

        assert_eq!(*hits.lock().unwrap(), vec![0.7]);
        assert!(world.players[0].speed < 1000.0);
    }

    #[test]
    fn test_players_bump_each_other() {
        let mut world = WorldState::new(GameConfig::default(), 2, &[], 3);
        world.players[0].position = 5000.0;
        world.players[1].position = 5000.0;
        world.players[1].x = 0.05;
        world.update(1.0 / 60.0);
        assert!(world.players[1].x - world.players[0].x > 0.05);
    }

    #[test]
    fn test_race_opponents_move_and_rank() {
        let mut world = world();
        world.add_race_opponents();
        assert_eq!(world.race_position(), 1);
        for _ in 0..120 {
            world.update(1.0 / 60.0);
        }
        assert!(world.race_opponents.iter().all(|o| o.speed > 0.0));
        // the stationary player has been passed
        assert!(world.race_position() > 1);
    }

    #[test]
    fn test_championship_field_races() {
        let mut world = world();
        world.add_championship_field();
        assert_eq!(world.cars.len(), 19);
        assert_membership(&world);
        for _ in 0..240 {
            world.update(1.0 / 60.0);
        }
        assert_membership(&world);
        let cap = world.config.max_speed * 1.2;
        assert!(world.cars.iter().all(|c| c.speed > 0.0 && c.speed <= cap));
        assert!(world.cars.iter().all(|c| c.offset.abs() <= 0.9));
    }

    #[test]
    fn test_load_recs_is_reproducible() {
        let params = RecsParams::default();
        let mut a = world();
        let mut b = WorldState::new(GameConfig::default(), 1, &[], 99);
        a.reset_cars(10);
        let length = a.load_recs(&params);
        b.load_recs(&params);
        assert_eq!(a.track, b.track);
        assert_eq!(length, a.track.len() as f32 * 200.0);
        assert!(a.cars.is_empty());
        assert!(a.track.segments.iter().all(|s| s.cars.is_empty()));
    }

    #[test]
    fn test_load_theme_rebuilds_track() {
        let mut world = world();
        world.players[0].position = 1234.0;
        let length = world.load_theme(Theme::Desert);
        assert_eq!(world.theme, Theme::Desert);
        assert_eq!(length, world.track_length());
        assert_eq!(world.players[0].position, 0.0);
    }

    #[test]
    fn test_project_road_from_world() {
        let mut world = world();
        let visible = world.project_road();
        // the segment under the camera is behind the projection plane
        assert!(!visible.contains(&0));
        // near segments whose far edge is still below the screen are hidden
        let first = (1..world.config.draw_distance)
            .find(|&i| {
                let s = &world.track.segments[i];
                s.p1.camera.z > world.camera_depth
                    && s.p2.screen.y < s.p1.screen.y
                    && s.p2.screen.y < world.config.height
            })
            .unwrap();
        assert_eq!(visible[0], first);
        assert!(world.track.segments[first].p1.screen.scale > 0.0);
    }

    #[test]
    fn test_parallax_rates() {
        let mut world = straight_world(50, 4.0);
        world.players[0].speed = 12000.0;
        world.update(1.0 / 60.0);
        assert!(world.sky_offset > 0.0);
        assert!((world.hill_offset - 2.0 * world.sky_offset).abs() < 1e-6);
        assert!((world.tree_offset - 3.0 * world.sky_offset).abs() < 1e-6);

        let mut world = straight_world(50, 0.0);
        world.players[0].speed = 12000.0;
        world.update(1.0 / 60.0);
        assert_eq!(world.sky_offset, 0.0);
        assert_eq!(world.hill_offset, 0.0);
        assert_eq!(world.tree_offset, 0.0);
    }

    #[test]
    fn test_mirror_distance_is_normalized() {
        let cars = vec![Car::traffic(0.25, 400.0, SpriteRef::Car01, 100.0)];
        let mirror = get_mirror_cars(&cars, 500.0, 10000.0, 1000.0, 3);
        assert_eq!(mirror.len(), 1);
        assert_eq!(mirror[0].distance, 0.1);
        assert_eq!(mirror[0].color, "#f59e0b");
    }

    #[test]
    fn test_mirror_wraps_sorts_and_truncates() {
        let cars = vec![
            Car::traffic(0.0, 9900.0, SpriteRef::Car01, 0.0),
            Car::traffic(0.0, 9500.0, SpriteRef::Car01, 0.0),
            Car::traffic(0.0, 50.0, SpriteRef::Car01, 0.0),
            Car::traffic(0.0, 100.0, SpriteRef::Car01, 0.0),
            Car::traffic(0.0, 5000.0, SpriteRef::Car01, 0.0),
        ];
        let mirror = get_mirror_cars(&cars, 100.0, 10000.0, 1000.0, 2);
        assert_eq!(mirror.len(), 2);
        assert!((mirror[0].distance - 0.6).abs() < 1e-4);
        assert!((mirror[1].distance - 0.2).abs() < 1e-4);
    }
}
