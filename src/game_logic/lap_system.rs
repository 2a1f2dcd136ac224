use bevy::prelude::*;

use crate::game_logic::{CHECKPOINTS_PER_LAP, DEFAULT_TOTAL_LAPS, PlayerState};

// Time challenge tuning
pub const DEFAULT_TIME_LIMIT: f32 = 45.0;
pub const CHECKPOINT_TIME_BONUS: f32 = 3.0;
pub const LAP_TIME_BONUS: f32 = 20.0;
pub const CHECKPOINT_SCORE_BONUS: u32 = 25;
pub const LAP_SCORE_BONUS: u32 = 100;
pub const BASE_TIME_PER_SEGMENT: f32 = 0.15;
pub const MIN_TIME_LIMIT: f32 = 30.0;

/// Fraction of the lap after which a wrap past the line counts as a lap
const LAP_WRAP_ZONE: f32 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LapEvent {
    Checkpoint(usize),
    LapComplete(u8),
    Finished,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LapCounter {
    pub current_lap: u8,
    pub total_laps: u8,
    pub has_finished: bool,
    pub next_checkpoint: usize, // 1-based index of the next checkpoint to hit
    pub finish_order: Option<usize>,
}

impl Default for LapCounter {
    fn default() -> Self {
        Self::new(DEFAULT_TOTAL_LAPS)
    }
}

/// Which checkpoint zone a track position falls in; zone 0 is the start
pub fn checkpoint_index(position: f32, segment_length: f32, segments_per_checkpoint: usize) -> usize {
    let segment = (position / segment_length).floor().max(0.0) as usize;
    segment / segments_per_checkpoint.max(1)
}

impl LapCounter {
    pub fn new(total_laps: u8) -> Self {
        Self {
            current_lap: 1,
            total_laps,
            has_finished: false,
            next_checkpoint: 1,
            finish_order: None,
        }
    }

    /// Track checkpoint and lap progress between two consecutive positions.
    /// A lap only counts once every checkpoint of the lap has been passed.
    pub fn update(
        &mut self,
        previous_position: f32,
        position: f32,
        player_z: f32,
        track_length: f32,
        segment_length: f32,
        segments_per_checkpoint: usize,
    ) -> Option<LapEvent> {
        if self.has_finished {
            return None;
        }

        let zone = checkpoint_index(position, segment_length, segments_per_checkpoint);
        if zone == self.next_checkpoint && zone <= CHECKPOINTS_PER_LAP {
            info!("Reached checkpoint {}", zone);
            self.next_checkpoint += 1;
            return Some(LapEvent::Checkpoint(zone));
        }

        let crossed_line = previous_position > LAP_WRAP_ZONE * track_length && position < player_z;
        if crossed_line && self.next_checkpoint > CHECKPOINTS_PER_LAP {
            self.current_lap += 1;
            self.next_checkpoint = 1;
            if self.current_lap > self.total_laps {
                self.has_finished = true;
                info!("Finished all {} laps", self.total_laps);
                return Some(LapEvent::Finished);
            }
            info!("Lap complete {}", self.current_lap - 1);
            return Some(LapEvent::LapComplete(self.current_lap - 1));
        }
        None
    }

    /// Distance covered in the race so far
    pub fn progress(&self, position: f32, track_length: f32) -> f32 {
        self.current_lap.saturating_sub(1) as f32 * track_length + position
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ranking {
    pub player: usize,
    pub rank: usize,
    pub lap: u8,
    pub progress: f32,
    pub finished: bool,
}

/// Finished players by finishing order, then everyone else by distance
pub fn player_rankings(counters: &[LapCounter], players: &[PlayerState], track_length: f32) -> Vec<Ranking> {
    let mut rankings: Vec<(Ranking, Option<usize>)> = counters
        .iter()
        .zip(players)
        .enumerate()
        .map(|(i, (counter, player))| {
            (
                Ranking {
                    player: i,
                    rank: 0,
                    lap: counter.current_lap,
                    progress: counter.progress(player.position, track_length),
                    finished: counter.has_finished,
                },
                counter.finish_order,
            )
        })
        .collect();

    rankings.sort_by(|(a, a_order), (b, b_order)| match (a.finished, b.finished) {
        (true, true) => a_order.cmp(b_order),
        (true, false) => std::cmp::Ordering::Less,
        (false, true) => std::cmp::Ordering::Greater,
        (false, false) => b.progress.total_cmp(&a.progress),
    });

    rankings
        .into_iter()
        .enumerate()
        .map(|(i, (mut ranking, _))| {
            ranking.rank = i + 1;
            ranking
        })
        .collect()
}

/// Lap clock text: `S.t` under a minute, `M.SS.t` above
pub fn format_time(seconds: f32) -> String {
    let minutes = (seconds / 60.0).floor();
    let secs = (seconds - minutes * 60.0).floor() as u32;
    let tenths = (10.0 * (seconds - seconds.floor())).floor() as u32;
    if minutes > 0.0 {
        format!("{}.{:02}.{}", minutes as u32, secs, tenths)
    } else {
        format!("{}.{}", secs, tenths)
    }
}

/// Countdown race: checkpoints and laps buy back time and add score
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct TimeChallenge {
    pub time_limit: f32,
    pub current_time: f32,
    pub score: u32,
    pub lap: u8,
    pub total_laps: u8,
    pub checkpoints_passed: usize,
    pub game_over: bool,
    pub won: bool,
    pub bonus_flash: f32,
}

pub fn calculate_time_limit(track_length: f32, segment_length: f32) -> f32 {
    let segments = (track_length / segment_length).floor();
    MIN_TIME_LIMIT.max((segments * BASE_TIME_PER_SEGMENT).floor())
}

impl TimeChallenge {
    pub fn new(track_length: f32, segment_length: f32) -> Self {
        let time_limit = if track_length > 0.0 {
            calculate_time_limit(track_length, segment_length)
        } else {
            DEFAULT_TIME_LIMIT
        };
        Self {
            time_limit,
            current_time: time_limit,
            score: 0,
            lap: 1,
            total_laps: DEFAULT_TOTAL_LAPS,
            checkpoints_passed: 0,
            game_over: false,
            won: false,
            bonus_flash: 0.0,
        }
    }

    /// Count down; returns false once time has run out
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.game_over {
            return false;
        }
        self.bonus_flash = (self.bonus_flash - dt).max(0.0);
        self.current_time -= dt;
        if self.current_time <= 0.0 {
            self.current_time = 0.0;
            self.game_over = true;
            self.won = false;
            info!("Time challenge over with score {}", self.score);
            return false;
        }
        true
    }

    pub fn on_checkpoint(&mut self, index: usize) {
        if self.game_over {
            return;
        }
        self.current_time += CHECKPOINT_TIME_BONUS;
        self.score += CHECKPOINT_SCORE_BONUS;
        self.checkpoints_passed = index;
        self.bonus_flash = 1.5;
    }

    pub fn on_lap(&mut self) {
        if self.game_over {
            return;
        }
        self.lap += 1;
        self.checkpoints_passed = 0;
        if self.lap > self.total_laps {
            self.score += (self.current_time * 50.0).floor() as u32 + LAP_SCORE_BONUS;
            self.game_over = true;
            self.won = true;
            self.bonus_flash = 0.0;
            info!("Time challenge won with score {}", self.score);
            return;
        }
        self.current_time += LAP_TIME_BONUS;
        self.score += LAP_SCORE_BONUS;
        self.bonus_flash = 2.0;
    }

    pub fn apply(&mut self, event: LapEvent) {
        match event {
            LapEvent::Checkpoint(index) => self.on_checkpoint(index),
            LapEvent::LapComplete(_) | LapEvent::Finished => self.on_lap(),
        }
    }
}
