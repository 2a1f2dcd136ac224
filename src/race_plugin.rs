use std::time::Duration;

use bevy::prelude::*;

use crate::game_logic::{DEFAULT_FPS, MAX_FRAME_TIME, WorldState};

/// Runs the simulation step; order input systems `.before(RaceStep)`
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct RaceStep;

/// Accumulator for driving a world from wall-clock frames outside Bevy.
/// The world only ever sees `step`-sized ticks.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedStepper {
    pub step: f32,
    pub accumulator: f32,
}

impl FixedStepper {
    pub fn new(fps: u32) -> Self {
        Self {
            step: 1.0 / fps.max(1) as f32,
            accumulator: 0.0,
        }
    }

    /// Feed one frame's elapsed seconds (clamped to `MAX_FRAME_TIME`) and
    /// run as many whole steps as fit. Returns how many ran.
    pub fn advance(&mut self, world: &mut WorldState, elapsed: f32) -> usize {
        self.accumulator += elapsed.max(0.0).min(MAX_FRAME_TIME);
        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            world.update(self.step);
            steps += 1;
        }
        steps
    }
}

/// Steps `WorldState` in `FixedUpdate` at the configured rate
pub struct RacePlugin {
    pub fps: u32,
}

impl Default for RacePlugin {
    fn default() -> Self {
        Self { fps: DEFAULT_FPS }
    }
}

impl Plugin for RacePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(self.fps.max(1) as f64))
            .add_systems(Startup, cap_frame_time)
            .add_systems(FixedUpdate, step_world.in_set(RaceStep));
    }
}

// a long stall should not turn into a burst of catch-up ticks
fn cap_frame_time(mut time: ResMut<Time<Virtual>>) {
    time.set_max_delta(Duration::from_secs_f32(MAX_FRAME_TIME));
}

pub fn step_world(time: Res<Time>, world: Option<ResMut<WorldState>>) {
    if let Some(mut world) = world {
        world.update(time.delta_secs());
    }
}
