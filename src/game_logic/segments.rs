use bevy::prelude::*;

use crate::game_logic::{
    CHECKPOINTS_PER_LAP, COLOR_CHECKPOINT, COLOR_DARK, COLOR_FINISH, COLOR_LIGHT, COLOR_START,
    CURVE_EASY, CURVE_MEDIUM, HILL_LOW, HILL_MEDIUM, LENGTH_MEDIUM, LENGTH_SHORT, Mulberry32,
    SpriteRef, Theme, WorldPoint, ease_in, ease_in_out,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentColor {
    pub road: &'static str,
    pub grass: &'static str,
    pub rumble: &'static str,
    pub lane: Option<&'static str>,
}

/// Roadside decoration; `offset` is lateral in half road widths
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentSprite {
    pub source: SpriteRef,
    pub offset: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub p1: WorldPoint,
    pub p2: WorldPoint,
    pub curve: f32,
    pub color: SegmentColor,
    pub sprites: Vec<SegmentSprite>,
    /// Indices into the world's car list for cars whose `z` maps here
    pub cars: Vec<usize>,
    // filled in by the projection pass
    pub looped: bool,
    pub fog: f32,
    pub clip: f32,
}

/// The circular road: an arena of segments plus the dimensions that
/// every builder and lookup needs.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub segments: Vec<Segment>,
    pub segment_length: f32,
    pub rumble_length: usize,
}

impl Track {
    pub fn new(segment_length: f32, rumble_length: usize) -> Self {
        Self {
            segments: Vec::new(),
            segment_length,
            rumble_length: rumble_length.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Total distance around the loop
    pub fn length(&self) -> f32 {
        self.segments.len() as f32 * self.segment_length
    }

    /// Panics on an empty track; a track must be built before lookups.
    pub fn find_segment_index(&self, z: f32) -> usize {
        (z / self.segment_length).floor() as usize % self.segments.len()
    }

    pub fn find_segment(&self, z: f32) -> &Segment {
        &self.segments[self.find_segment_index(z)]
    }

    /// Elevation where the next segment will start
    pub fn last_y(&self) -> f32 {
        self.segments.last().map_or(0.0, |s| s.p2.world.y)
    }

    pub fn add_segment(&mut self, curve: f32, y: f32) {
        let n = self.segments.len();
        let color = if (n / self.rumble_length) % 2 == 1 {
            COLOR_DARK
        } else {
            COLOR_LIGHT
        };
        let p1 = WorldPoint::at(self.last_y(), n as f32 * self.segment_length);
        let p2 = WorldPoint::at(y, (n + 1) as f32 * self.segment_length);
        self.segments.push(Segment {
            index: n,
            p1,
            p2,
            curve,
            color,
            sprites: Vec::new(),
            cars: Vec::new(),
            looped: false,
            fog: 0.0,
            clip: 0.0,
        });
    }

    /// Out-of-range indices are ignored
    pub fn add_sprite(&mut self, n: usize, source: SpriteRef, offset: f32) {
        if let Some(segment) = self.segments.get_mut(n) {
            segment.sprites.push(SegmentSprite { source, offset });
        }
    }

    /// Ease curvature in over `enter`, hold it, ease it out over `leave`,
    /// while elevation eases across the whole block by `y` segment lengths.
    pub fn add_road(&mut self, enter: usize, hold: usize, leave: usize, curve: f32, y: f32) {
        let start_y = self.last_y();
        let end_y = start_y + y.trunc() * self.segment_length;
        let total = (enter + hold + leave) as f32;

        for n in 0..enter {
            self.add_segment(
                ease_in(0.0, curve, n as f32 / enter as f32),
                ease_in_out(start_y, end_y, n as f32 / total),
            );
        }
        for n in 0..hold {
            self.add_segment(curve, ease_in_out(start_y, end_y, (enter + n) as f32 / total));
        }
        for n in 0..leave {
            self.add_segment(
                ease_in_out(curve, 0.0, n as f32 / leave as f32),
                ease_in_out(start_y, end_y, (enter + hold + n) as f32 / total),
            );
        }
    }

    pub fn add_straight(&mut self, num: usize) {
        self.add_road(num, num, num, 0.0, 0.0);
    }

    pub fn add_hill(&mut self, num: usize, height: f32) {
        self.add_road(num, num, num, 0.0, height);
    }

    pub fn add_curve(&mut self, num: usize, curve: f32, height: f32) {
        self.add_road(num, num, num, curve, height);
    }

    pub fn add_low_rolling_hills(&mut self) {
        let n = LENGTH_SHORT;
        self.add_road(n, n, n, 0.0, HILL_LOW / 2.0);
        self.add_road(n, n, n, 0.0, -HILL_LOW);
        self.add_road(n, n, n, CURVE_EASY, HILL_LOW);
        self.add_road(n, n, n, 0.0, 0.0);
        self.add_road(n, n, n, -CURVE_EASY, HILL_LOW / 2.0);
        self.add_road(n, n, n, 0.0, 0.0);
    }

    pub fn add_s_curves(&mut self) {
        let n = LENGTH_MEDIUM;
        self.add_road(n, n, n, -CURVE_EASY, 0.0);
        self.add_road(n, n, n, CURVE_MEDIUM, HILL_MEDIUM);
        self.add_road(n, n, n, CURVE_EASY, -HILL_LOW);
        self.add_road(n, n, n, -CURVE_EASY, HILL_MEDIUM);
        self.add_road(n, n, n, -CURVE_MEDIUM, -HILL_MEDIUM);
    }

    pub fn add_bumps(&mut self) {
        for height in [5.0, -2.0, -5.0, 8.0, 5.0, -7.0, 5.0, -2.0] {
            self.add_road(10, 10, 10, 0.0, height);
        }
    }

    /// Long easy bend that brings elevation back to zero so the loop closes
    pub fn add_downhill_to_end(&mut self) {
        let drop = -self.last_y() / self.segment_length;
        self.add_road(200, 200, 200, -CURVE_EASY, drop);
    }

    pub fn segments_per_checkpoint(&self) -> usize {
        self.segments.len() / (CHECKPOINTS_PER_LAP + 1)
    }

    /// Start line sits just ahead of the player's segment
    pub fn mark_start(&mut self, player_z: f32) {
        let start = self.find_segment_index(player_z);
        for index in [start + 2, start + 3] {
            if let Some(segment) = self.segments.get_mut(index) {
                segment.color = COLOR_START;
            }
        }
    }

    pub fn mark_checkpoints(&mut self) {
        let total = self.segments.len();
        let spacing = self.segments_per_checkpoint();
        for i in 1..=CHECKPOINTS_PER_LAP {
            let index = spacing * i;
            if index + self.rumble_length < total {
                self.segments[index].color = COLOR_CHECKPOINT;
                self.add_sprite(index, SpriteRef::CheckpointBanner, 0.0);
            }
        }
    }

    pub fn mark_finish(&mut self) {
        let total = self.segments.len();
        for segment in self.segments.iter_mut().skip(total.saturating_sub(self.rumble_length)) {
            segment.color = COLOR_FINISH;
        }
        if let Some(index) = total.checked_sub(self.rumble_length + 5) {
            self.add_sprite(index, SpriteRef::FinishBanner, 0.0);
        }
    }

    /// Rebuild this track with the fixed layout and scenery of `theme`.
    /// Returns the new track length.
    pub fn reset_for_theme(&mut self, theme: Theme, player_z: f32, seed: u32) -> f32 {
        self.segments.clear();
        let mut rng = Mulberry32::new(seed);

        theme.build_layout(self);
        self.add_downhill_to_end();
        theme.add_scenery(self, &mut rng);

        self.mark_start(player_z);
        self.mark_checkpoints();
        self.mark_finish();

        info!(
            "Built {} track: {} segments, length {}",
            theme.name(),
            self.segments.len(),
            self.length()
        );
        self.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Track {
        Track::new(200.0, 3)
    }

    #[test]
    fn test_add_road_counts() {
        let mut t = track();
        t.add_road(2, 3, 2, 0.0, 0.0);
        assert_eq!(t.len(), 7);
    }

    #[test]
    fn test_add_road_eases_curve_in() {
        let mut t = track();
        t.add_road(5, 0, 5, 10.0, 0.0);
        assert_eq!(t.segments[0].curve, 0.0);
        let c = t.segments[4].curve;
        assert!(c > 0.0 && c < 10.0);
    }

    #[test]
    fn test_straight_decomposition() {
        let mut t = track();
        t.add_straight(12);
        assert_eq!(t.len(), 36);
        assert!(t.segments.iter().all(|s| s.curve == 0.0));
    }

    #[test]
    fn test_segments_are_contiguous() {
        let mut t = track();
        t.add_straight(LENGTH_SHORT);
        t.add_curve(LENGTH_SHORT, CURVE_MEDIUM, HILL_LOW);
        t.add_bumps();
        for pair in t.segments.windows(2) {
            assert_eq!(pair[0].p2.world.z, pair[1].p1.world.z);
            assert_eq!(pair[0].p2.world.y, pair[1].p1.world.y);
        }
        assert_eq!(t.segments[0].p1.world.z, 0.0);
        let last = t.segments.last().unwrap();
        assert_eq!(last.p2.world.z, t.length());
    }

    #[test]
    fn test_hill_reaches_height() {
        let mut t = track();
        t.add_hill(10, 20.0);
        // the last eased sample lands just short of the full rise
        assert!(t.last_y() > 0.99 * 4000.0 && t.last_y() <= 4000.0);
    }

    #[test]
    fn test_downhill_returns_to_ground() {
        let mut t = track();
        t.add_hill(LENGTH_SHORT, HILL_MEDIUM);
        t.add_downhill_to_end();
        assert!(t.last_y().abs() < 2.0 * t.segment_length);
    }

    #[test]
    fn test_rumble_colors_alternate() {
        let mut t = track();
        t.add_straight(4);
        assert_eq!(t.segments[0].color, COLOR_LIGHT);
        assert_eq!(t.segments[2].color, COLOR_LIGHT);
        assert_eq!(t.segments[3].color, COLOR_DARK);
        assert_eq!(t.segments[6].color, COLOR_LIGHT);
    }

    #[test]
    fn test_find_segment_wraps() {
        let mut t = track();
        t.add_straight(10);
        let len = t.len();
        for n in 0..(len * 3) {
            let z = n as f32 * t.segment_length;
            assert_eq!(t.find_segment(z).index, n % len);
        }
    }

    #[test]
    #[should_panic]
    fn test_find_segment_on_empty_track_panics() {
        track().find_segment(0.0);
    }

    #[test]
    fn test_last_y_on_empty_is_zero() {
        assert_eq!(track().last_y(), 0.0);
    }

    #[test]
    fn test_add_sprite_out_of_range_is_ignored() {
        let mut t = track();
        t.add_straight(1);
        t.add_sprite(99, SpriteRef::Tree1, 1.0);
        t.add_sprite(1, SpriteRef::Tree1, 1.0);
        assert_eq!(t.segments.iter().map(|s| s.sprites.len()).sum::<usize>(), 1);
    }

    #[test]
    fn test_theme_track_markers() {
        let mut t = track();
        let length = t.reset_for_theme(Theme::Night, 1000.0 * 0.84, 1);
        assert_eq!(length, t.length());
        assert_eq!(t.segments[0].p1.world.z, 0.0);

        let start = t.find_segment_index(840.0);
        assert_eq!(t.segments[start + 2].color, COLOR_START);
        assert_eq!(t.segments[start + 3].color, COLOR_START);

        let spacing = t.segments_per_checkpoint();
        for i in 1..=CHECKPOINTS_PER_LAP {
            let seg = &t.segments[spacing * i];
            assert_eq!(seg.color, COLOR_CHECKPOINT);
            assert!(seg.sprites.iter().any(|s| s.source == SpriteRef::CheckpointBanner));
        }

        let n = t.len();
        assert!(t.segments[n - 3..].iter().all(|s| s.color == COLOR_FINISH));
        assert!(t.segments[n - 8].sprites.iter().any(|s| s.source == SpriteRef::FinishBanner));
    }

    #[test]
    fn test_every_theme_closes_the_loop() {
        for theme in Theme::ALL {
            let mut t = track();
            t.reset_for_theme(theme, 840.0, 7);
            assert!(t.len() > 600, "{:?} too short", theme);
            let last = t.segments.last().unwrap();
            assert_eq!(last.p2.world.z, t.length());
            assert!(
                last.p2.world.y.abs() < 2.0 * t.segment_length,
                "{:?} ends off the ground",
                theme
            );
        }
    }

    #[test]
    fn test_theme_track_reproducible_for_seed() {
        let mut a = track();
        let mut b = track();
        a.reset_for_theme(Theme::Country, 840.0, 42);
        b.reset_for_theme(Theme::Country, 840.0, 42);
        assert_eq!(a, b);
    }
}
