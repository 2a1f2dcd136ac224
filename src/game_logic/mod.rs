pub mod constants;
pub mod math;
pub mod mulberry;
pub mod sprites;
pub mod projection;
pub mod config;
pub mod themes;
pub mod segments;
pub mod recs;
pub mod components;
pub mod physics;
pub mod collisions;
pub mod opponents;
pub mod championship_ai;
pub mod lap_system;
pub mod world;

pub use constants::*;
pub use math::*;
pub use mulberry::*;
pub use sprites::*;
pub use projection::*;
pub use config::*;
pub use themes::*;
pub use segments::*;
pub use recs::*;
pub use components::*;
pub use physics::*;
pub use collisions::*;
pub use opponents::*;
pub use championship_ai::*;
pub use lap_system::*;
pub use world::*;
