use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use road_racers::game_logic::{GameConfig, WorldState, decode_recs_code, format_time};
use road_racers::race_plugin::{RacePlugin, RaceStep};

const TRAFFIC_CARS: usize = 40;
const STEER_DEADZONE: f32 = 0.2;

/// `road-racers [config.json] [recs-code]`
#[derive(Resource, Default)]
struct RaceArgs {
    config_path: Option<String>,
    recs_code: Option<String>,
}

fn main() {
    let mut args = std::env::args().skip(1);
    let race_args = RaceArgs {
        config_path: args.next(),
        recs_code: args.next(),
    };

    // Headless: no window, the runner ticks the schedule and FixedUpdate
    // catches the simulation up to real time.
    App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 120.0,
            ))),
            LogPlugin::default(),
            RacePlugin::default(),
        ))
        .insert_resource(race_args)
        .add_systems(Startup, setup_race)
        .add_systems(FixedUpdate, drive_players.before(RaceStep))
        .add_systems(Update, finish_race)
        .run();
}

fn load_config(path: Option<&str>) -> GameConfig {
    let Some(path) = path else {
        return GameConfig::default();
    };
    match GameConfig::from_json_file(path) {
        Ok(config) => {
            info!("Loaded config from {}", path);
            config
        }
        Err(e) => {
            warn!("Using default config, could not load {}: {}", path, e);
            GameConfig::default()
        }
    }
}

fn setup_race(mut commands: Commands, args: Res<RaceArgs>, mut fixed: ResMut<Time<Fixed>>) {
    let config = load_config(args.config_path.as_deref());
    fixed.set_timestep_hz(config.fps.max(1) as f64);

    let mut world = WorldState::new(config, 1, &[], rand::random());
    if let Some(code) = args.recs_code.as_deref() {
        match decode_recs_code(code) {
            Ok(params) => {
                world.load_recs(&params);
            }
            Err(e) => warn!("Ignoring RECS code {}: {}", code, e),
        }
    }

    world.reset_cars(TRAFFIC_CARS);
    world.add_race_opponents();
    world.set_collision_callback(|intensity| debug!("Impact at intensity {:.1}", intensity));

    info!(
        "Race on {} track, {} laps of {}",
        world.theme.name(),
        world.lap_counters[0].total_laps,
        world.track_length()
    );
    commands.insert_resource(world);
}

/// Flat out, steering back toward the centre line
fn drive_players(mut world: ResMut<WorldState>) {
    let world = &mut *world;
    for (input, player) in world.inputs.iter_mut().zip(&world.players) {
        input.faster = true;
        input.left = player.x > STEER_DEADZONE;
        input.right = player.x < -STEER_DEADZONE;
    }
}

fn finish_race(world: Option<Res<WorldState>>, mut exit: EventWriter<AppExit>) {
    let Some(world) = world else {
        return;
    };
    if !world.race_finished() {
        return;
    }

    info!("Race finished in position {}", world.race_position());
    if let Some(best) = world.fast_lap_time {
        info!("Fastest lap {}", format_time(best));
    }
    exit.write(AppExit::Success);
}
