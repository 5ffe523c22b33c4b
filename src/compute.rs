/// Game-logic functions.
///
/// Every public function takes the session's `GameState` (and, where needed,
/// a monotonic-ms clock reading and an RNG handle) and mutates it in place.
/// Side effects are limited to the state and the injected RNG, so tests can
/// drive whole sessions with a seeded RNG and a hand-rolled clock.

use rand::Rng;

use crate::config::{
    ENEMY_FIRE_CHANCE, ENEMY_FRAME_PAIRS, ENEMY_HEIGHT, ENEMY_MOVE_DOWN, ENEMY_SPEED_INCREMENT,
    ENEMY_START_SPEED, ENEMY_WIDTH, FIRE_COOLDOWN_MS, GRID_COLS, GRID_ROWS, GRID_START_X,
    GRID_START_Y, GRID_X_SPACING, GRID_Y_SPACING, PLAYER_SPEED, PLAYER_WIDTH, SCREEN_HEIGHT,
    SCREEN_WIDTH, START_LIVES, TIME_LIMIT_SECS, WIN_SCORE, ANIM_PERIOD_MS,
};
use crate::entities::{
    AnimPhase, Bullet, EndReason, Enemy, EnemyBullet, GameState, GameStatus, Player,
};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the starting state for a fresh session: player at the bottom
/// center, a full enemy grid, everything else zeroed.
pub fn init_state(now_ms: u64, rng: &mut impl Rng) -> GameState {
    GameState {
        player: Player {
            x: SCREEN_WIDTH * 0.5,
            y: SCREEN_HEIGHT * 0.9,
        },
        enemies: spawn_enemies_in_grid(rng, now_ms),
        bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        score: 0,
        lives: START_LIVES,
        elapsed_secs: 0,
        last_shot: None,
        direction: 1,
        speed: ENEMY_START_SPEED,
        status: GameStatus::Playing,
    }
}

/// Lay out the full enemy grid.  Each enemy draws a random frame pair so
/// neighbouring enemies animate out of phase.
pub fn spawn_enemies_in_grid(rng: &mut impl Rng, now_ms: u64) -> Vec<Enemy> {
    let mut enemies = Vec::with_capacity(GRID_ROWS * GRID_COLS);
    for row in 0..GRID_ROWS {
        for col in 0..GRID_COLS {
            enemies.push(Enemy {
                x: GRID_START_X + col as f32 * (ENEMY_WIDTH + GRID_X_SPACING),
                y: GRID_START_Y + row as f32 * (ENEMY_HEIGHT + GRID_Y_SPACING),
                frame_pair: rng.gen_range(0..ENEMY_FRAME_PAIRS),
                phase: AnimPhase::Initial,
                switch_at: now_ms + ANIM_PERIOD_MS,
            });
        }
    }
    enemies
}

// ── Input-driven transitions ─────────────────────────────────────────────────

pub fn move_player_left(state: &mut GameState) {
    state.player.x = (state.player.x - PLAYER_SPEED).max(0.0);
}

pub fn move_player_right(state: &mut GameState) {
    state.player.x = (state.player.x + PLAYER_SPEED).min(SCREEN_WIDTH - PLAYER_WIDTH);
}

/// Fire a bullet from the player's nose, subject to the cooldown.  Attempts
/// inside the cooldown window are dropped, not queued.  Returns whether a
/// bullet was actually fired.
pub fn try_shoot(state: &mut GameState, now_ms: u64) -> bool {
    let ready = match state.last_shot {
        None => true,
        Some(last) => now_ms.saturating_sub(last) >= FIRE_COOLDOWN_MS,
    };
    if !ready {
        return false;
    }
    let p = state.player.rect();
    state.bullets.push(Bullet::new(p.center_x(), p.y));
    state.last_shot = Some(now_ms);
    true
}

// ── Collision resolver ───────────────────────────────────────────────────────

/// Resolve player bullets against the formation.
///
/// Each bullet removes at most one enemy (the first it overlaps) and scores
/// one point.  The moment the score reaches the win threshold the pass
/// returns immediately — remaining bullets are left untouched for this
/// frame.  Bullets that missed and have risen past the top edge are pruned
/// as a cleanup step of the same pass.
pub fn resolve_collisions(
    bullets: &mut Vec<Bullet>,
    enemies: &mut Vec<Enemy>,
    mut score: u32,
) -> (u32, bool) {
    let mut bi = 0;
    while bi < bullets.len() {
        let bullet_rect = bullets[bi].rect();
        if let Some(ei) = enemies.iter().position(|e| e.rect().intersects(&bullet_rect)) {
            enemies.remove(ei);
            bullets.remove(bi);
            score += 1;
            if score >= WIN_SCORE {
                return (score, true);
            }
            continue;
        }
        if bullets[bi].y < -10.0 {
            bullets.remove(bi);
            continue;
        }
        bi += 1;
    }
    (score, false)
}

/// Outcome precedence used for formation-empty endings and the terminal
/// message: the score threshold wins over everything, then exhausted lives,
/// then the clock.
pub fn outcome(score: u32, lives: i32) -> EndReason {
    if score >= WIN_SCORE {
        EndReason::Win
    } else if lives <= 0 {
        EndReason::Loss
    } else {
        EndReason::TimedOut
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.  `now_ms` is the monotonic clock
/// reading for this frame; all randomness (enemy fire) comes through `rng`.
///
/// A transition into `Over` halts the rest of the frame: nothing after the
/// ending step runs, so e.g. a win at exactly the threshold is not followed
/// by the difficulty bonus point.
pub fn tick(state: &mut GameState, now_ms: u64, rng: &mut impl Rng) {
    if state.status != GameStatus::Playing {
        return;
    }

    state.elapsed_secs = now_ms / 1000;

    // ── 1. Advance the formation ─────────────────────────────────────────────
    let (direction, speed) = (state.direction, state.speed);
    for enemy in &mut state.enemies {
        enemy.advance(direction, speed, now_ms);
    }

    // ── 2. Advance bullets, dropping the ones that left the screen ───────────
    for bullet in &mut state.bullets {
        bullet.advance();
    }
    state.bullets.retain(|b| !b.offscreen());
    for bullet in &mut state.enemy_bullets {
        bullet.advance();
    }
    state.enemy_bullets.retain(|b| !b.offscreen());

    // ── 3. Scan the formation: random fire + edge contact ────────────────────
    let mut bounced = false;
    for enemy in &state.enemies {
        if rng.gen_bool(ENEMY_FIRE_CHANCE) {
            let r = enemy.rect();
            state.enemy_bullets.push(EnemyBullet::new(r.center_x(), r.bottom()));
        }
        if enemy.rect().right() >= SCREEN_WIDTH || enemy.x <= 0.0 {
            bounced = true;
        }
    }

    // ── 4. Formation bounce ──────────────────────────────────────────────────
    // Same-frame reaction: the drop happens now, the direction flip takes
    // effect from the next frame's movement.
    if bounced {
        state.direction = -state.direction;
        for enemy in &mut state.enemies {
            enemy.y += ENEMY_MOVE_DOWN;
        }
    }

    // ── 5. Player bullets vs enemies ─────────────────────────────────────────
    let (new_score, won) = resolve_collisions(&mut state.bullets, &mut state.enemies, state.score);
    let scored = new_score > state.score;
    state.score = new_score;
    if won {
        state.status = GameStatus::Over(EndReason::Win);
        return;
    }

    // ── 6. Enemy bullets vs player ───────────────────────────────────────────
    // Every overlapping bullet costs a life, independently.
    let player_rect = state.player.rect();
    let before = state.enemy_bullets.len();
    state.enemy_bullets.retain(|b| !b.rect().intersects(&player_rect));
    let hits = (before - state.enemy_bullets.len()) as i32;
    if hits > 0 {
        state.lives -= hits;
        if state.lives <= 0 {
            state.status = GameStatus::Over(EndReason::Loss);
            return;
        }
    }

    // ── 7. Difficulty scaling ────────────────────────────────────────────────
    // Checked once per frame, only directly after a collision-driven score
    // change.  The extra point is part of the contract; the check is not
    // re-applied after its own increment.
    if scored && state.score > 0 && state.score % 10 == 0 {
        state.speed += ENEMY_SPEED_INCREMENT;
        state.score += 1;
    }

    // ── 8. End-of-session checks ─────────────────────────────────────────────
    if state.enemies.is_empty() {
        state.status = GameStatus::Over(outcome(state.score, state.lives));
        return;
    }
    if state.elapsed_secs > TIME_LIMIT_SECS {
        state.status = GameStatus::Over(EndReason::TimedOut);
    }
}
