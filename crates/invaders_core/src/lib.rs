pub mod app;
pub mod audio;
pub mod bitmap;
pub mod collision;
pub mod entity;
pub mod formation;
pub mod input;
pub mod leaderboard;
pub mod projectile;
pub mod render;
pub mod scene;
pub mod shield;
pub mod sound;
pub mod sprites;
pub mod targeting;

pub use app::InvadersApp;
pub use scene::{
    CreditScene, GameScene, GameSceneInit, LeaderboardScene, Phase, Scene, TitleScene,
};

/// Logical screen width in pixels (the cabinet monitor is 224x256, rotated).
pub const SCREEN_WIDTH: usize = 224;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 256;
/// Default integer scaling factor for the SDL2 frontend.
pub const SCREEN_SCALE: u32 = 3;
/// Ticks per second the game scene is designed around.
pub const FRAME_RATE_HZ: u32 = 60;

/// Columns in the alien formation.
pub const COLUMNS: usize = 11;
/// Rows in the alien formation.
pub const ROWS: usize = 5;

/// Pixels an alien moves sideways when it takes its step.
pub const ALIEN_STEP_X: i32 = 2;
/// Pixels the whole formation drops when it meets a screen edge.
pub const ALIEN_STEP_Y: i32 = 8;
/// A row whose first alien is left of this x has met the left edge.
pub const LEFT_EDGE: i32 = 8;
/// A row whose last alien is right of this x has met the right edge.
pub const RIGHT_EDGE: i32 = SCREEN_WIDTH as i32 - 40;
/// Any alien at or below this y has landed and ends the game.
pub const INVASION_Y: i32 = 216;

/// The player's fixed row.
pub const PLAYER_Y: i32 = 216;
pub const PLAYER_MIN_X: i32 = 16;
pub const PLAYER_MAX_X: i32 = SCREEN_WIDTH as i32 - 32;
pub const STARTING_LIVES: u32 = 3;
/// Points between bonus lives.
pub const BONUS_LIFE_POINTS: i32 = 1500;

/// Bullets above this y have missed and pop against the top of the playfield.
pub const BULLET_TOP: i32 = 34;
/// Bullets below this y have passed the player.
pub const BULLET_BOTTOM: i32 = 231;
pub const PLAYER_BULLET_SPEED: i32 = -4;
pub const ALIEN_BULLET_SPEED: i32 = 1;

/// Explosion length of aliens and bullets, in ticks.
pub const EXPLOSION_FRAMES: u32 = 15;
/// Explosion length of the player, in ticks.
pub const PLAYER_EXPLOSION_FRAMES: u32 = 30;

pub const SHIELD_COUNT: usize = 4;
pub const SHIELD_Y: i32 = 192;
