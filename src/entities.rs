/// All game entity types — position data plus the per-frame motion and
/// animation rules that belong to each entity.  Everything that coordinates
/// entities with each other (formation bounces, collisions, difficulty)
/// lives in `compute`.

use crate::config::{
    ANIM_PERIOD_MS, BULLET_HEIGHT, BULLET_SPEED, BULLET_WIDTH, ENEMY_HEIGHT, ENEMY_WIDTH,
    PLAYER_HEIGHT, PLAYER_WIDTH, SCREEN_HEIGHT,
};

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

/// The player ship.  It has no autonomous motion; `compute` translates input
/// intent into clamped position changes.
#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, w: PLAYER_WIDTH, h: PLAYER_HEIGHT }
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Which of the two sprite frames an enemy is currently showing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimPhase {
    Initial,
    Intermediate,
}

/// One member of the formation.  Horizontal motion is shared (direction and
/// speed come from the session), but animation is per-enemy: the frame pair
/// is picked at spawn and the toggle deadline drifts independently, so
/// enemies blink out of phase with each other.
#[derive(Clone, Debug)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    /// Index into the sprite sheet's frame pairs (0..3), chosen at spawn.
    pub frame_pair: usize,
    pub phase: AnimPhase,
    /// Monotonic-ms deadline for the next phase toggle.
    pub switch_at: u64,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, w: ENEMY_WIDTH, h: ENEMY_HEIGHT }
    }

    /// Move with the formation and toggle the animation frame when the
    /// per-enemy deadline passes.
    pub fn advance(&mut self, direction: i32, speed: f32, now_ms: u64) {
        if now_ms >= self.switch_at {
            self.phase = match self.phase {
                AnimPhase::Initial => AnimPhase::Intermediate,
                AnimPhase::Intermediate => AnimPhase::Initial,
            };
            self.switch_at = now_ms + ANIM_PERIOD_MS;
        }
        self.x += direction as f32 * speed;
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// A player bullet, travelling upward.
#[derive(Clone, Debug)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
}

impl Bullet {
    /// Spawn with the given center-x, with the bullet's bottom at `bottom`.
    pub fn new(center_x: f32, bottom: f32) -> Bullet {
        Bullet { x: center_x - BULLET_WIDTH / 2.0, y: bottom - BULLET_HEIGHT }
    }

    pub fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, w: BULLET_WIDTH, h: BULLET_HEIGHT }
    }

    pub fn advance(&mut self) {
        self.y -= BULLET_SPEED;
    }

    /// Fully above the top edge.
    pub fn offscreen(&self) -> bool {
        self.rect().bottom() < 0.0
    }
}

/// An enemy bullet, travelling downward.
#[derive(Clone, Debug)]
pub struct EnemyBullet {
    pub x: f32,
    pub y: f32,
}

impl EnemyBullet {
    /// Spawn with the given center-x, with the bullet's top at `top`.
    pub fn new(center_x: f32, top: f32) -> EnemyBullet {
        EnemyBullet { x: center_x - BULLET_WIDTH / 2.0, y: top }
    }

    pub fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, w: BULLET_WIDTH, h: BULLET_HEIGHT }
    }

    pub fn advance(&mut self) {
        self.y += BULLET_SPEED;
    }

    /// Fully below the bottom edge.
    pub fn offscreen(&self) -> bool {
        self.y > SCREEN_HEIGHT
    }
}

// ── Session state ─────────────────────────────────────────────────────────────

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EndReason {
    Win,
    Loss,
    TimedOut,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    Over(EndReason),
}

/// The entire session state, threaded through every frame update.  All
/// counters (score, lives, direction, speed) live here rather than in
/// globals.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Player bullets, travelling up.
    pub bullets: Vec<Bullet>,
    /// Enemy bullets, travelling down.
    pub enemy_bullets: Vec<EnemyBullet>,
    pub score: u32,
    pub lives: i32,
    pub elapsed_secs: u64,
    /// Monotonic-ms timestamp of the last successful shot.  `None` means the
    /// player has not fired yet, so the first attempt is always allowed.
    pub last_shot: Option<u64>,
    /// Shared formation direction: +1 rightward, -1 leftward.
    pub direction: i32,
    /// Shared formation speed, raised by difficulty scaling.
    pub speed: f32,
    pub status: GameStatus,
}
