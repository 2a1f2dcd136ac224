pub mod game_logic;
pub mod race_plugin;
