/// All gameplay tunables in one place.
///
/// The simulation runs in a fixed 800×600 world regardless of terminal size;
/// the display layer scales world coordinates down to cells.

pub const SCREEN_WIDTH: f32 = 800.0;
pub const SCREEN_HEIGHT: f32 = 600.0;

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_WIDTH: f32 = 30.0;
pub const PLAYER_HEIGHT: f32 = 15.0;
/// Horizontal units moved per frame while a direction key is held.
pub const PLAYER_SPEED: f32 = 5.0;
pub const START_LIVES: i32 = 3;

// ── Enemies & formation ───────────────────────────────────────────────────────

pub const ENEMY_WIDTH: f32 = 25.0;
pub const ENEMY_HEIGHT: f32 = 16.0;

pub const GRID_ROWS: usize = 5;
pub const GRID_COLS: usize = 8;
pub const GRID_X_SPACING: f32 = 50.0;
pub const GRID_Y_SPACING: f32 = 15.0;
pub const GRID_START_X: f32 = 50.0;
pub const GRID_START_Y: f32 = 50.0;

/// Starting horizontal formation speed (units per frame).
pub const ENEMY_START_SPEED: f32 = 1.0;
/// Added to the formation speed at every difficulty step.
pub const ENEMY_SPEED_INCREMENT: f32 = 0.5;
/// Vertical shift applied to every enemy when the formation bounces.
pub const ENEMY_MOVE_DOWN: f32 = 10.0;
/// Per-enemy, per-frame probability of firing a bullet.
pub const ENEMY_FIRE_CHANCE: f64 = 0.001;
/// Enemy animation frames toggle on this period.
pub const ANIM_PERIOD_MS: u64 = 1000;
/// Number of frame pairs the sprite sheet carries; one is picked per enemy
/// at spawn.
pub const ENEMY_FRAME_PAIRS: usize = 3;

// ── Bullets ───────────────────────────────────────────────────────────────────

pub const BULLET_WIDTH: f32 = 4.0;
pub const BULLET_HEIGHT: f32 = 10.0;
/// Vertical units per frame, up for the player and down for enemies.
pub const BULLET_SPEED: f32 = 5.0;
/// Minimum interval between two player shots.
pub const FIRE_COOLDOWN_MS: u64 = 500;

// ── Session ───────────────────────────────────────────────────────────────────

pub const WIN_SCORE: u32 = 50;
/// The session times out once elapsed time exceeds this many seconds.
pub const TIME_LIMIT_SECS: u64 = 100;
pub const TARGET_FPS: u64 = 60;
