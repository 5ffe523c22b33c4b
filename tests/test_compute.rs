use fixed_formation::compute::*;
use fixed_formation::config::*;
use fixed_formation::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_state() -> GameState {
    GameState {
        player: Player { x: 400.0, y: 540.0 },
        enemies: Vec::new(),
        bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        score: 0,
        lives: 3,
        elapsed_secs: 0,
        last_shot: None,
        direction: 1,
        speed: 1.0,
        status: GameStatus::Playing,
    }
}

fn make_enemy(x: f32, y: f32) -> Enemy {
    Enemy {
        x,
        y,
        frame_pair: 0,
        phase: AnimPhase::Initial,
        switch_at: ANIM_PERIOD_MS,
    }
}

/// A faraway enemy that keeps the formation non-empty without interfering
/// with the scenario under test.
fn bystander() -> Enemy {
    make_enemy(600.0, 50.0)
}

/// Enemy bullets near the top of the screen were randomly fired during the
/// frame; the ones a scenario planted all start much lower.
fn planted_enemy_bullets(s: &GameState) -> Vec<&EnemyBullet> {
    s.enemy_bullets.iter().filter(|b| b.y > 100.0).collect()
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_player_position() {
    let s = init_state(0, &mut seeded_rng());
    assert_eq!(s.player.x, 400.0); // width * 0.5
    assert_eq!(s.player.y, 540.0); // height * 0.9
    assert_eq!(s.lives, 3);
}

#[test]
fn init_state_spawns_full_grid() {
    let s = init_state(0, &mut seeded_rng());
    assert_eq!(s.enemies.len(), GRID_ROWS * GRID_COLS); // 5 × 8 = 40
    assert!(s.bullets.is_empty());
    assert!(s.enemy_bullets.is_empty());
    assert_eq!(s.score, 0);
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn init_state_formation_defaults() {
    let s = init_state(0, &mut seeded_rng());
    assert_eq!(s.direction, 1);
    assert_eq!(s.speed, ENEMY_START_SPEED);
    assert_eq!(s.last_shot, None);
}

// ── spawn_enemies_in_grid ─────────────────────────────────────────────────────

#[test]
fn grid_positions_follow_spacing() {
    let enemies = spawn_enemies_in_grid(&mut seeded_rng(), 0);
    // First enemy at the grid origin
    assert_eq!(enemies[0].x, 50.0);
    assert_eq!(enemies[0].y, 50.0);
    // Row 0, col 1: x steps by enemy width + x spacing
    assert_eq!(enemies[1].x, 50.0 + 25.0 + 50.0);
    assert_eq!(enemies[1].y, 50.0);
    // Row 1, col 0: y steps by enemy height + y spacing
    assert_eq!(enemies[GRID_COLS].x, 50.0);
    assert_eq!(enemies[GRID_COLS].y, 50.0 + 16.0 + 15.0);
}

#[test]
fn grid_enemies_get_valid_frame_pairs_and_deadlines() {
    let enemies = spawn_enemies_in_grid(&mut seeded_rng(), 7000);
    for e in &enemies {
        assert!(e.frame_pair < ENEMY_FRAME_PAIRS);
        assert_eq!(e.phase, AnimPhase::Initial);
        assert_eq!(e.switch_at, 7000 + ANIM_PERIOD_MS);
    }
}

// ── player movement ───────────────────────────────────────────────────────────

#[test]
fn move_left_normal() {
    let mut s = make_state(); // x = 400
    move_player_left(&mut s);
    assert_eq!(s.player.x, 395.0);
}

#[test]
fn move_left_clamps_at_zero() {
    let mut s = make_state();
    s.player.x = 3.0;
    move_player_left(&mut s);
    assert_eq!(s.player.x, 0.0);
}

#[test]
fn move_right_normal() {
    let mut s = make_state();
    move_player_right(&mut s);
    assert_eq!(s.player.x, 405.0);
}

#[test]
fn move_right_clamps_at_screen_edge() {
    let mut s = make_state();
    s.player.x = SCREEN_WIDTH - PLAYER_WIDTH - 2.0;
    move_player_right(&mut s);
    assert_eq!(s.player.x, SCREEN_WIDTH - PLAYER_WIDTH);
}

// ── try_shoot & cooldown ──────────────────────────────────────────────────────

#[test]
fn first_shot_is_always_allowed() {
    let mut s = make_state();
    assert!(try_shoot(&mut s, 0));
    assert_eq!(s.bullets.len(), 1);
    assert_eq!(s.last_shot, Some(0));
}

#[test]
fn shot_spawns_centered_on_player_nose() {
    let mut s = make_state(); // player at (400, 540), 30 wide
    try_shoot(&mut s, 0);
    let b = &s.bullets[0];
    assert_eq!(b.x, 415.0 - BULLET_WIDTH / 2.0); // centered on x = 415
    assert_eq!(b.y, 540.0 - BULLET_HEIGHT); // bottom flush with player top
}

#[test]
fn cooldown_drops_attempts_silently() {
    // t=0 succeeds, t=300 dropped, t=600 succeeds
    let mut s = make_state();
    assert!(try_shoot(&mut s, 0));
    assert!(!try_shoot(&mut s, 300));
    assert_eq!(s.bullets.len(), 1);
    assert_eq!(s.last_shot, Some(0)); // dropped attempt leaves no trace
    assert!(try_shoot(&mut s, 600));
    assert_eq!(s.bullets.len(), 2);
    assert_eq!(s.last_shot, Some(600));
}

#[test]
fn cooldown_boundary_is_inclusive() {
    let mut s = make_state();
    assert!(try_shoot(&mut s, 0));
    assert!(try_shoot(&mut s, FIRE_COOLDOWN_MS));
}

// ── tick — formation movement ────────────────────────────────────────────────

#[test]
fn enemies_move_by_direction_times_speed() {
    let mut s = make_state();
    s.enemies.push(make_enemy(300.0, 50.0));
    s.speed = 1.5;
    s.direction = -1;
    tick(&mut s, 16, &mut seeded_rng());
    assert_eq!(s.enemies[0].x, 298.5);
    assert_eq!(s.enemies[0].y, 50.0); // no bounce, no drop
}

#[test]
fn enemies_share_the_formation_direction() {
    let mut s = make_state();
    s.enemies.push(make_enemy(200.0, 50.0));
    s.enemies.push(make_enemy(400.0, 81.0));
    tick(&mut s, 16, &mut seeded_rng());
    assert_eq!(s.enemies[0].x, 201.0);
    assert_eq!(s.enemies[1].x, 401.0);
}

// ── tick — bounce ─────────────────────────────────────────────────────────────

#[test]
fn bounce_on_right_edge_drops_and_reverses() {
    let mut s = make_state();
    s.enemies.push(make_enemy(775.0, 50.0)); // advances to 776, right edge 801
    s.enemies.push(make_enemy(300.0, 50.0));
    tick(&mut s, 16, &mut seeded_rng());
    // Same-frame reaction: every member drops now
    assert_eq!(s.enemies[0].y, 60.0);
    assert_eq!(s.enemies[1].y, 60.0);
    // Direction inverts for the following frame
    assert_eq!(s.direction, -1);
    assert_eq!(s.enemies[0].x, 776.0);
}

#[test]
fn bounce_on_left_edge() {
    let mut s = make_state();
    s.direction = -1;
    s.enemies.push(make_enemy(0.5, 50.0)); // advances to -0.5
    s.enemies.push(bystander());
    tick(&mut s, 16, &mut seeded_rng());
    assert_eq!(s.direction, 1);
    assert_eq!(s.enemies[0].y, 60.0);
    assert_eq!(s.enemies[1].y, 60.0);
}

#[test]
fn no_bounce_away_from_edges() {
    let mut s = make_state();
    s.enemies.push(make_enemy(300.0, 50.0));
    tick(&mut s, 16, &mut seeded_rng());
    assert_eq!(s.direction, 1);
    assert_eq!(s.enemies[0].y, 50.0);
}

// ── resolve_collisions ────────────────────────────────────────────────────────

#[test]
fn hit_removes_bullet_and_enemy_and_scores() {
    let mut bullets = vec![Bullet { x: 310.0, y: 55.0 }];
    let mut enemies = vec![make_enemy(300.0, 50.0)];
    let (score, over) = resolve_collisions(&mut bullets, &mut enemies, 0);
    assert_eq!(score, 1);
    assert!(!over);
    assert!(bullets.is_empty());
    assert!(enemies.is_empty());
}

#[test]
fn miss_leaves_everything_in_place() {
    let mut bullets = vec![Bullet { x: 100.0, y: 400.0 }];
    let mut enemies = vec![make_enemy(300.0, 50.0)];
    let (score, over) = resolve_collisions(&mut bullets, &mut enemies, 5);
    assert_eq!(score, 5);
    assert!(!over);
    assert_eq!(bullets.len(), 1);
    assert_eq!(enemies.len(), 1);
}

#[test]
fn one_enemy_removed_per_colliding_bullet() {
    // Bullet overlaps two stacked enemies; only the first found is removed
    let mut bullets = vec![Bullet { x: 310.0, y: 55.0 }];
    let mut enemies = vec![make_enemy(300.0, 50.0), make_enemy(305.0, 52.0)];
    let (score, _) = resolve_collisions(&mut bullets, &mut enemies, 0);
    assert_eq!(score, 1);
    assert_eq!(enemies.len(), 1);
    assert!(bullets.is_empty());
}

#[test]
fn cleanup_prunes_bullets_past_the_top() {
    let mut bullets = vec![Bullet { x: 100.0, y: -15.0 }, Bullet { x: 100.0, y: 200.0 }];
    let mut enemies = vec![make_enemy(600.0, 50.0)];
    let (score, _) = resolve_collisions(&mut bullets, &mut enemies, 0);
    assert_eq!(score, 0);
    assert_eq!(bullets.len(), 1);
    assert_eq!(bullets[0].y, 200.0);
}

#[test]
fn win_threshold_short_circuits_the_pass() {
    // Two bullets each over an enemy; the first hit reaches the threshold,
    // so the second bullet is never processed
    let mut bullets = vec![Bullet { x: 310.0, y: 55.0 }, Bullet { x: 610.0, y: 55.0 }];
    let mut enemies = vec![make_enemy(300.0, 50.0), make_enemy(600.0, 50.0)];
    let (score, over) = resolve_collisions(&mut bullets, &mut enemies, WIN_SCORE - 1);
    assert_eq!(score, WIN_SCORE);
    assert!(over);
    assert_eq!(bullets.len(), 1);
    assert_eq!(enemies.len(), 1);
}

// ── tick — scoring & win ──────────────────────────────────────────────────────

#[test]
fn tick_scores_a_collision() {
    let mut s = make_state();
    s.enemies.push(make_enemy(300.0, 50.0));
    s.enemies.push(bystander());
    // Enemies advance (x+1) then bullets advance (y-5) before resolution
    s.bullets.push(Bullet { x: 310.0, y: 60.0 });
    tick(&mut s, 16, &mut seeded_rng());
    assert_eq!(s.score, 1);
    assert_eq!(s.enemies.len(), 1);
    assert!(s.bullets.is_empty());
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn tick_win_at_threshold_halts_the_frame() {
    let mut s = make_state();
    s.score = WIN_SCORE - 1;
    s.enemies.push(make_enemy(300.0, 50.0));
    s.enemies.push(bystander());
    s.bullets.push(Bullet { x: 310.0, y: 60.0 });
    tick(&mut s, 16, &mut seeded_rng());
    assert_eq!(s.status, GameStatus::Over(EndReason::Win));
    // The transition halts the frame: the difficulty check never runs, so
    // a win at an exact multiple of ten stays there
    assert_eq!(s.score, WIN_SCORE);
    assert_eq!(s.speed, 1.0);
}

#[test]
fn score_never_decreases_across_ticks() {
    let mut s = make_state();
    s.score = 7;
    s.enemies.push(bystander());
    for i in 0..10 {
        let before = s.score;
        tick(&mut s, 16 * (i + 1), &mut seeded_rng());
        assert!(s.score >= before);
    }
}

// ── tick — difficulty scaling ────────────────────────────────────────────────

#[test]
fn difficulty_step_at_multiple_of_ten() {
    let mut s = make_state();
    s.score = 9;
    s.enemies.push(make_enemy(300.0, 50.0));
    s.enemies.push(bystander());
    s.bullets.push(Bullet { x: 310.0, y: 60.0 });
    tick(&mut s, 16, &mut seeded_rng());
    // Kill takes the score to 10; the check bumps speed and adds the extra point
    assert_eq!(s.score, 11);
    assert_eq!(s.speed, 1.0 + ENEMY_SPEED_INCREMENT);
}

#[test]
fn no_difficulty_step_off_multiples() {
    let mut s = make_state();
    s.score = 3;
    s.enemies.push(make_enemy(300.0, 50.0));
    s.enemies.push(bystander());
    s.bullets.push(Bullet { x: 310.0, y: 60.0 });
    tick(&mut s, 16, &mut seeded_rng());
    assert_eq!(s.score, 4);
    assert_eq!(s.speed, 1.0);
}

#[test]
fn no_difficulty_step_without_a_scoring_event() {
    // Score sitting on a multiple of ten does not re-trigger on idle frames
    let mut s = make_state();
    s.score = 20;
    s.enemies.push(bystander());
    tick(&mut s, 16, &mut seeded_rng());
    assert_eq!(s.score, 20);
    assert_eq!(s.speed, 1.0);
}

// ── tick — enemy bullets vs player ───────────────────────────────────────────

#[test]
fn enemy_bullet_hit_costs_a_life() {
    let mut s = make_state(); // player rect (400, 540, 30, 15)
    s.enemies.push(bystander());
    s.enemy_bullets.push(EnemyBullet { x: 410.0, y: 534.0 }); // advances into the player
    tick(&mut s, 16, &mut seeded_rng());
    assert_eq!(s.lives, 2);
    assert!(planted_enemy_bullets(&s).is_empty()); // the hit removed it
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn simultaneous_hits_cost_lives_independently() {
    let mut s = make_state();
    s.enemies.push(bystander());
    s.enemy_bullets.push(EnemyBullet { x: 405.0, y: 534.0 });
    s.enemy_bullets.push(EnemyBullet { x: 420.0, y: 534.0 });
    tick(&mut s, 16, &mut seeded_rng());
    assert_eq!(s.lives, 1);
}

#[test]
fn loss_when_lives_reach_zero() {
    let mut s = make_state();
    s.lives = 1;
    s.enemies.push(bystander());
    s.enemy_bullets.push(EnemyBullet { x: 410.0, y: 534.0 });
    tick(&mut s, 16, &mut seeded_rng());
    assert_eq!(s.lives, 0);
    assert_eq!(s.status, GameStatus::Over(EndReason::Loss));
}

#[test]
fn three_hits_across_frames_lose_the_session() {
    let mut s = make_state();
    s.score = 30; // loss applies regardless of score below the threshold
    s.enemies.push(bystander());
    for i in 0..3u64 {
        s.enemy_bullets.push(EnemyBullet { x: 410.0, y: 534.0 });
        tick(&mut s, 16 * (i + 1), &mut seeded_rng());
    }
    assert_eq!(s.lives, 0);
    assert_eq!(s.status, GameStatus::Over(EndReason::Loss));
}

#[test]
fn enemy_bullet_missing_the_player_survives() {
    let mut s = make_state();
    s.enemies.push(bystander());
    s.enemy_bullets.push(EnemyBullet { x: 100.0, y: 300.0 });
    tick(&mut s, 16, &mut seeded_rng());
    assert_eq!(s.lives, 3);
    let planted = planted_enemy_bullets(&s);
    assert_eq!(planted.len(), 1);
    assert_eq!(planted[0].y, 305.0);
}

// ── tick — session endings ────────────────────────────────────────────────────

#[test]
fn empty_formation_below_threshold_ends_as_timed_out() {
    // Clearing the grid does not win by itself; the outcome falls through
    // the score/lives precedence
    let mut s = make_state();
    s.score = 38;
    s.enemies.push(make_enemy(300.0, 50.0));
    s.bullets.push(Bullet { x: 310.0, y: 60.0 });
    tick(&mut s, 16, &mut seeded_rng());
    assert_eq!(s.score, 39);
    assert_eq!(s.status, GameStatus::Over(EndReason::TimedOut));
}

#[test]
fn timeout_after_the_ceiling() {
    let mut s = make_state();
    s.enemies.push(bystander());
    tick(&mut s, (TIME_LIMIT_SECS + 1) * 1000, &mut seeded_rng());
    assert_eq!(s.elapsed_secs, TIME_LIMIT_SECS + 1);
    assert_eq!(s.status, GameStatus::Over(EndReason::TimedOut));
}

#[test]
fn no_timeout_at_the_ceiling() {
    let mut s = make_state();
    s.enemies.push(bystander());
    tick(&mut s, TIME_LIMIT_SECS * 1000 + 500, &mut seeded_rng());
    assert_eq!(s.elapsed_secs, TIME_LIMIT_SECS);
    assert_eq!(s.status, GameStatus::Playing);
}

#[test]
fn tick_is_a_no_op_once_over() {
    let mut s = make_state();
    s.enemies.push(make_enemy(300.0, 50.0));
    s.status = GameStatus::Over(EndReason::Win);
    let before = s.clone();
    tick(&mut s, 5000, &mut seeded_rng());
    assert_eq!(s.enemies[0].x, before.enemies[0].x);
    assert_eq!(s.score, before.score);
    assert_eq!(s.status, before.status);
}

#[test]
fn tick_tracks_elapsed_seconds() {
    let mut s = make_state();
    s.enemies.push(bystander());
    tick(&mut s, 5500, &mut seeded_rng());
    assert_eq!(s.elapsed_secs, 5);
}

// ── tick — animation ──────────────────────────────────────────────────────────

#[test]
fn animation_toggles_on_the_deadline() {
    let mut s = make_state();
    s.enemies.push(make_enemy(300.0, 50.0)); // switch_at = 1000
    s.enemies.push(bystander());
    tick(&mut s, 500, &mut seeded_rng());
    assert_eq!(s.enemies[0].phase, AnimPhase::Initial);
    tick(&mut s, 1000, &mut seeded_rng());
    assert_eq!(s.enemies[0].phase, AnimPhase::Intermediate);
    assert_eq!(s.enemies[0].switch_at, 1000 + ANIM_PERIOD_MS);
    tick(&mut s, 2100, &mut seeded_rng());
    assert_eq!(s.enemies[0].phase, AnimPhase::Initial);
}

// ── outcome precedence ────────────────────────────────────────────────────────

#[test]
fn outcome_precedence() {
    assert_eq!(outcome(WIN_SCORE, 0), EndReason::Win); // score beats lives
    assert_eq!(outcome(10, 0), EndReason::Loss);
    assert_eq!(outcome(10, -1), EndReason::Loss);
    assert_eq!(outcome(10, 3), EndReason::TimedOut);
}
