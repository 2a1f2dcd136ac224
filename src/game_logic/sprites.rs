use serde::{Deserialize, Serialize};

/// Source rectangle of a sprite inside the sprite atlas, in atlas pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl SpriteRect {
    const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteRef {
    CheckpointBanner,
    FinishBanner,
    PalmTree,
    Billboard01,
    Billboard02,
    Billboard03,
    Billboard04,
    Billboard05,
    Billboard06,
    Billboard07,
    Billboard08,
    Billboard09,
    Tree1,
    Tree2,
    DeadTree1,
    DeadTree2,
    Boulder1,
    Boulder2,
    Boulder3,
    Column,
    Bush1,
    Bush2,
    Cactus,
    Stump,
    Semi,
    Truck,
    Car01,
    Car02,
    Car03,
    Car04,
    PlayerUphillLeft,
    PlayerUphillStraight,
    PlayerUphillRight,
    PlayerLeft,
    PlayerStraight,
    PlayerRight,
}

impl SpriteRef {
    pub const fn rect(self) -> SpriteRect {
        match self {
            SpriteRef::CheckpointBanner => SpriteRect::new(5., 5., 400., 120.),
            SpriteRef::FinishBanner => SpriteRect::new(410., 5., 400., 120.),
            SpriteRef::PalmTree => SpriteRect::new(5., 5., 215., 540.),
            SpriteRef::Billboard08 => SpriteRect::new(230., 5., 385., 265.),
            SpriteRef::Tree1 => SpriteRect::new(625., 5., 360., 360.),
            SpriteRef::DeadTree1 => SpriteRect::new(5., 555., 135., 332.),
            SpriteRef::Billboard09 => SpriteRect::new(150., 555., 328., 282.),
            SpriteRef::Boulder3 => SpriteRect::new(230., 280., 320., 220.),
            SpriteRef::Column => SpriteRect::new(995., 5., 200., 315.),
            SpriteRef::Billboard01 => SpriteRect::new(625., 375., 300., 170.),
            SpriteRef::Billboard06 => SpriteRect::new(488., 555., 298., 190.),
            SpriteRef::Billboard05 => SpriteRect::new(5., 897., 298., 190.),
            SpriteRef::Billboard07 => SpriteRect::new(313., 897., 298., 190.),
            SpriteRef::Boulder2 => SpriteRect::new(621., 897., 298., 140.),
            SpriteRef::Tree2 => SpriteRect::new(1205., 5., 282., 295.),
            SpriteRef::Billboard04 => SpriteRect::new(1205., 310., 268., 170.),
            SpriteRef::DeadTree2 => SpriteRect::new(1205., 490., 150., 260.),
            SpriteRef::Boulder1 => SpriteRect::new(1205., 760., 168., 248.),
            SpriteRef::Bush1 => SpriteRect::new(5., 1097., 240., 155.),
            SpriteRef::Cactus => SpriteRect::new(929., 897., 235., 118.),
            SpriteRef::Bush2 => SpriteRect::new(255., 1097., 232., 152.),
            SpriteRef::Billboard03 => SpriteRect::new(5., 1262., 230., 220.),
            SpriteRef::Billboard02 => SpriteRect::new(245., 1262., 215., 220.),
            SpriteRef::Stump => SpriteRect::new(995., 330., 195., 140.),
            SpriteRef::Semi => SpriteRect::new(1365., 490., 122., 144.),
            SpriteRef::Truck => SpriteRect::new(1365., 644., 100., 78.),
            SpriteRef::Car03 => SpriteRect::new(1383., 760., 88., 55.),
            SpriteRef::Car02 => SpriteRect::new(1383., 825., 80., 59.),
            SpriteRef::Car04 => SpriteRect::new(1383., 894., 80., 57.),
            SpriteRef::Car01 => SpriteRect::new(1205., 1018., 80., 56.),
            SpriteRef::PlayerUphillLeft => SpriteRect::new(1383., 961., 80., 45.),
            SpriteRef::PlayerUphillStraight => SpriteRect::new(1295., 1018., 80., 45.),
            SpriteRef::PlayerUphillRight => SpriteRect::new(1385., 1018., 80., 45.),
            SpriteRef::PlayerLeft => SpriteRect::new(995., 480., 80., 41.),
            SpriteRef::PlayerStraight => SpriteRect::new(1085., 480., 80., 41.),
            SpriteRef::PlayerRight => SpriteRect::new(995., 531., 80., 41.),
        }
    }

    /// Lateral footprint in road-width units, used by every collision test
    pub fn collision_width(self) -> f32 {
        self.rect().w * SPRITE_SCALE
    }
}

/// Atlas pixels to road-width units; the player car is 0.3 road widths wide
pub const SPRITE_SCALE: f32 = 0.3 * (1.0 / 80.0);

pub const BILLBOARDS: [SpriteRef; 9] = [
    SpriteRef::Billboard01,
    SpriteRef::Billboard02,
    SpriteRef::Billboard03,
    SpriteRef::Billboard04,
    SpriteRef::Billboard05,
    SpriteRef::Billboard06,
    SpriteRef::Billboard07,
    SpriteRef::Billboard08,
    SpriteRef::Billboard09,
];

pub const PLANTS: [SpriteRef; 12] = [
    SpriteRef::Tree1,
    SpriteRef::Tree2,
    SpriteRef::DeadTree1,
    SpriteRef::DeadTree2,
    SpriteRef::PalmTree,
    SpriteRef::Bush1,
    SpriteRef::Bush2,
    SpriteRef::Cactus,
    SpriteRef::Stump,
    SpriteRef::Boulder1,
    SpriteRef::Boulder2,
    SpriteRef::Boulder3,
];

pub const CARS: [SpriteRef; 6] = [
    SpriteRef::Car01,
    SpriteRef::Car02,
    SpriteRef::Car03,
    SpriteRef::Car04,
    SpriteRef::Semi,
    SpriteRef::Truck,
];
