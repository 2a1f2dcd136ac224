use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::game_logic::{
    BILLBOARDS, CURVE_EASY as CE, CURVE_HARD as CH, CURVE_MEDIUM as CM, HILL_HIGH as HH,
    HILL_LOW as HL, HILL_MEDIUM as HM, LENGTH_MEDIUM as M, LENGTH_SHORT as S, Mulberry32, PLANTS,
    SpriteRef, Track,
};

/// Per-theme multipliers applied to a base physics profile
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThemePhysics {
    pub grip: f32,
    pub off_road_grip: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub brake_force: f32,
}

impl ThemePhysics {
    const fn new(grip: f32, off_road_grip: f32, max_speed: f32, acceleration: f32, brake_force: f32) -> Self {
        Self {
            grip,
            off_road_grip,
            max_speed,
            acceleration,
            brake_force,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown theme '{0}'")]
pub struct ThemeParseError(pub String);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Night,
    Fog,
    Snow,
    Storm,
    Desert,
    Future,
    Marsh,
    Mountains,
    Lakes,
    Country,
    City,
    Roadworks,
    Windy,
}

impl Theme {
    pub const ALL: [Theme; 13] = [
        Theme::Night,
        Theme::Fog,
        Theme::Snow,
        Theme::Storm,
        Theme::Desert,
        Theme::Future,
        Theme::Marsh,
        Theme::Mountains,
        Theme::Lakes,
        Theme::Country,
        Theme::City,
        Theme::Roadworks,
        Theme::Windy,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Theme::Night => "night",
            Theme::Fog => "fog",
            Theme::Snow => "snow",
            Theme::Storm => "storm",
            Theme::Desert => "desert",
            Theme::Future => "future",
            Theme::Marsh => "marsh",
            Theme::Mountains => "mountains",
            Theme::Lakes => "lakes",
            Theme::Country => "country",
            Theme::City => "city",
            Theme::Roadworks => "roadworks",
            Theme::Windy => "windy",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Night => "Night",
            Theme::Fog => "Fog",
            Theme::Snow => "Snow",
            Theme::Storm => "Storm",
            Theme::Desert => "Desert",
            Theme::Future => "Future",
            Theme::Marsh => "Marsh",
            Theme::Mountains => "Mountains",
            Theme::Lakes => "Lakes",
            Theme::Country => "Country",
            Theme::City => "City",
            Theme::Roadworks => "Roadworks",
            Theme::Windy => "Windy",
        }
    }

    pub fn fog_density(&self) -> f32 {
        match self {
            Theme::Fog => 8.0,
            Theme::Storm => 6.0,
            Theme::Night | Theme::Marsh | Theme::Mountains => 4.0,
            Theme::Snow | Theme::Desert | Theme::City | Theme::Roadworks => 3.0,
            Theme::Future | Theme::Lakes | Theme::Country | Theme::Windy => 2.0,
        }
    }

    pub fn physics(&self) -> ThemePhysics {
        match self {
            Theme::Night => ThemePhysics::new(1.0, 0.8, 1.0, 1.0, 1.0),
            Theme::Fog => ThemePhysics::new(1.0, 0.9, 0.95, 1.0, 1.0),
            Theme::Snow => ThemePhysics::new(0.6, 0.3, 0.85, 0.8, 0.5),
            Theme::Storm => ThemePhysics::new(0.85, 0.6, 0.9, 0.95, 0.9),
            Theme::Desert => ThemePhysics::new(0.95, 0.4, 1.0, 0.9, 1.0),
            Theme::Future => ThemePhysics::new(1.0, 0.8, 1.2, 1.1, 1.0),
            Theme::Marsh => ThemePhysics::new(0.7, 0.3, 0.85, 0.7, 0.8),
            Theme::Mountains => ThemePhysics::new(1.0, 0.5, 0.9, 0.95, 1.1),
            Theme::Lakes => ThemePhysics::new(0.9, 0.6, 1.0, 1.0, 0.9),
            Theme::Country => ThemePhysics::new(1.0, 0.7, 1.0, 1.0, 1.0),
            Theme::City => ThemePhysics::new(1.0, 0.3, 1.1, 1.0, 1.0),
            Theme::Roadworks => ThemePhysics::new(1.0, 0.5, 0.85, 0.9, 1.2),
            Theme::Windy => ThemePhysics::new(0.95, 0.7, 1.0, 1.0, 1.0),
        }
    }

    /// Three-letter tag used in share codes
    pub fn tag(&self) -> String {
        self.id()[..3].to_uppercase()
    }

    pub fn from_tag(tag: &str) -> Option<Theme> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.tag().eq_ignore_ascii_case(tag))
    }

    pub fn next(self) -> Self {
        let i = Theme::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Theme::ALL[(i + 1) % Theme::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Theme::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Theme::ALL[(i + Theme::ALL.len() - 1) % Theme::ALL.len()]
    }

    /// Append this theme's fixed sequence of road blocks
    pub(crate) fn build_layout(self, track: &mut Track) {
        match self {
            // fast sweeping highway
            Theme::Night => {
                track.add_straight(S);
                track.add_curve(M, CE, HL);
                track.add_straight(S);
                track.add_curve(M, -CE, 0.0);
                track.add_curve(S, CM, HM);
                track.add_straight(M);
                track.add_curve(S, -CM, HL);
                track.add_straight(S);
            }
            Theme::Fog => {
                track.add_straight(S);
                track.add_curve(S, CM, 0.0);
                track.add_curve(S, -CH, HL);
                track.add_straight(S);
                track.add_curve(S, CH, HM);
                track.add_bumps();
                track.add_curve(S, -CM, 0.0);
            }
            Theme::Snow => {
                track.add_straight(S);
                track.add_s_curves();
                track.add_hill(S, HL);
                track.add_curve(S, CM, 0.0);
                track.add_bumps();
                track.add_curve(S, -CM, HM);
                track.add_straight(S);
            }
            Theme::Storm => {
                track.add_straight(S);
                track.add_curve(S, CE, 0.0);
                track.add_bumps();
                track.add_curve(M, -CM, HL);
                track.add_bumps();
                track.add_curve(S, CE, HM);
                track.add_straight(S);
            }
            Theme::Desert => {
                track.add_straight(M);
                track.add_curve(S, CE, HL);
                track.add_straight(M);
                track.add_hill(S, HM);
                track.add_straight(S);
                track.add_curve(S, -CE, HL);
                track.add_straight(S);
            }
            // chicanes and short straights
            Theme::Future => {
                track.add_straight(S);
                track.add_curve(S, CH, 0.0);
                track.add_curve(S, -CH, 0.0);
                track.add_straight(S);
                track.add_curve(S, CM, HL);
                track.add_straight(S);
                track.add_curve(S, -CM, 0.0);
                track.add_curve(S, CE, HM);
            }
            Theme::Marsh => {
                track.add_curve(S, CM, HL);
                track.add_curve(S, -CM, HL);
                track.add_bumps();
                track.add_curve(S, CM, 0.0);
                track.add_straight(S);
                track.add_curve(S, -CH, HM);
                track.add_straight(S);
            }
            // switchbacks
            Theme::Mountains => {
                track.add_straight(S);
                track.add_curve(S, CH, HH);
                track.add_curve(S, -CH, HM);
                track.add_straight(S);
                track.add_hill(S, HH);
                track.add_curve(S, CM, HL);
                track.add_curve(S, -CM, 0.0);
            }
            Theme::Lakes => {
                track.add_straight(S);
                track.add_low_rolling_hills();
                track.add_curve(S, CM, HL);
                track.add_straight(S);
                track.add_curve(S, -CM, HM);
                track.add_low_rolling_hills();
            }
            Theme::Country => {
                track.add_straight(S);
                track.add_low_rolling_hills();
                track.add_curve(S, CE, HL);
                track.add_hill(S, HM);
                track.add_straight(S);
                track.add_curve(S, -CE, 0.0);
                track.add_low_rolling_hills();
            }
            // flat grid with sharp corners
            Theme::City => {
                track.add_straight(M);
                track.add_curve(S, CH, 0.0);
                track.add_straight(M);
                track.add_curve(S, -CH, 0.0);
                track.add_straight(S);
                track.add_curve(S, CM, HL);
                track.add_straight(S);
            }
            Theme::Roadworks => {
                track.add_straight(S);
                track.add_bumps();
                track.add_curve(S, CM, 0.0);
                track.add_bumps();
                track.add_curve(S, -CM, HL);
                track.add_straight(S);
                track.add_bumps();
            }
            Theme::Windy => {
                track.add_straight(M);
                track.add_curve(S, CE, 0.0);
                track.add_straight(M);
                track.add_curve(S, -CE, HL);
                track.add_straight(S);
                track.add_hill(S, HL);
                track.add_straight(S);
            }
        }
    }

    /// Roadside sprites characteristic of the theme, drawn from `rng`
    pub(crate) fn add_scenery(self, track: &mut Track, rng: &mut Mulberry32) {
        let len = track.len();
        track.add_sprite(20, SpriteRef::Billboard07, -1.0);
        track.add_sprite(40, SpriteRef::Billboard06, 1.0);

        match self {
            Theme::Night | Theme::City => {
                for n in (50..len.saturating_sub(20)).step_by(8) {
                    track.add_sprite(n, SpriteRef::Column, 1.1);
                    if n % 24 == 0 {
                        track.add_sprite(n, *rng.choose(&BILLBOARDS), -1.2);
                    }
                }
            }
            Theme::Desert | Theme::Windy => {
                for n in (40..len.saturating_sub(10)).step_by(6) {
                    let offset = rng.sign() * (1.5 + rng.next_f32());
                    track.add_sprite(n, SpriteRef::DeadTree1, offset);
                    if n % 30 == 0 {
                        track.add_sprite(n, SpriteRef::Boulder3, rng.sign() * 1.5);
                    }
                }
            }
            Theme::Snow | Theme::Mountains => {
                for n in (30..len.saturating_sub(10)).step_by(4) {
                    let offset = rng.sign() * (1.5 + rng.next_f32());
                    track.add_sprite(n, SpriteRef::Tree1, offset);
                    if n % 10 == 0 {
                        track.add_sprite(n, SpriteRef::Boulder2, rng.sign() * 2.0);
                    }
                    if n % 15 == 0 {
                        let offset = rng.sign() * (2.0 + rng.next_f32());
                        track.add_sprite(n, SpriteRef::Tree2, offset);
                    }
                }
            }
            Theme::Future => {
                for n in (30..len.saturating_sub(10)).step_by(10) {
                    track.add_sprite(n, SpriteRef::Column, 1.1);
                    track.add_sprite(n, SpriteRef::Column, -1.1);
                    if n % 30 == 0 {
                        track.add_sprite(n, *rng.choose(&BILLBOARDS), 1.3);
                    }
                }
            }
            Theme::Marsh | Theme::Lakes | Theme::Country => {
                for n in (30..len.saturating_sub(10)).step_by(3) {
                    let plant = *rng.choose(&PLANTS);
                    let offset = rng.sign() * (1.5 + rng.next_f32() * 2.0);
                    track.add_sprite(n, plant, offset);
                    if n % 20 == 0 {
                        track.add_sprite(n, SpriteRef::Billboard02, -1.3);
                    }
                }
            }
            Theme::Roadworks => {
                for n in (20..len.saturating_sub(5)).step_by(5) {
                    let billboard = *rng.choose(&BILLBOARDS);
                    track.add_sprite(n, billboard, rng.sign() * 1.2);
                    if n % 15 == 0 {
                        track.add_sprite(n, SpriteRef::Boulder3, rng.sign() * 1.4);
                    }
                }
            }
            // palms and billboards
            Theme::Fog | Theme::Storm => {
                for n in (20..len.saturating_sub(10)).step_by(5) {
                    let offset = rng.sign() * (1.5 + rng.next_f32());
                    track.add_sprite(n, SpriteRef::PalmTree, offset);
                    if n % 25 == 0 {
                        track.add_sprite(n, *rng.choose(&BILLBOARDS), -1.3);
                    }
                }
            }
        }
    }
}

impl FromStr for Theme {
    type Err = ThemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Theme::ALL
            .into_iter()
            .find(|theme| theme.id() == lower)
            .ok_or_else(|| ThemeParseError(s.to_string()))
    }
}
