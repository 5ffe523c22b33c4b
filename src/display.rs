/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// world coordinates (800×600) into terminal cells and state into terminal
/// commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use fixed_formation::assets::SpriteSheet;
use fixed_formation::compute::outcome;
use fixed_formation::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use fixed_formation::entities::{AnimPhase, EndReason, GameState, GameStatus};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_TIME: Color = Color::White;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

/// Terminal dimensions plus the scale from world units to cells.
#[derive(Clone, Copy)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    /// Map a world position to a cell inside the bordered play area
    /// (columns 1..width-1, rows 2..height-2).
    fn cell(&self, x: f32, y: f32) -> (u16, u16) {
        let cols = self.width.saturating_sub(2).max(1) as f32;
        let rows = self.height.saturating_sub(4).max(1) as f32;
        let cx = 1 + ((x / SCREEN_WIDTH) * cols) as u16;
        let cy = 2 + ((y / SCREEN_HEIGHT) * rows) as u16;
        (
            cx.min(self.width.saturating_sub(2)),
            cy.min(self.height.saturating_sub(3)),
        )
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    sheet: &SpriteSheet,
    background: Color,
    view: Viewport,
) -> std::io::Result<()> {
    out.queue(style::SetBackgroundColor(background))?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_hud(out, state, view)?;

    out.queue(style::SetForegroundColor(C_ENEMY))?;
    for enemy in &state.enemies {
        let (cx, cy) = view.cell(enemy.x, enemy.y);
        let glyph = sheet.enemy_glyph(enemy.frame_pair, enemy.phase == AnimPhase::Initial);
        out.queue(cursor::MoveTo(cx, cy))?;
        out.queue(Print(glyph))?;
    }

    out.queue(style::SetForegroundColor(C_BULLET_PLAYER))?;
    for bullet in &state.bullets {
        let (cx, cy) = view.cell(bullet.x, bullet.y);
        out.queue(cursor::MoveTo(cx, cy))?;
        out.queue(Print(&sheet.bullet))?;
    }
    out.queue(style::SetForegroundColor(C_BULLET_ENEMY))?;
    for bullet in &state.enemy_bullets {
        let (cx, cy) = view.cell(bullet.x, bullet.y);
        out.queue(cursor::MoveTo(cx, cy))?;
        out.queue(Print(&sheet.enemy_bullet))?;
    }

    let (px, py) = view.cell(state.player.x, state.player.y);
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(px, py))?;
    out.queue(Print(&sheet.player))?;

    draw_controls_hint(out, view)?;

    if let GameStatus::Over(_) = state.status {
        draw_game_over(out, state, view)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2 — bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, view: Viewport) -> std::io::Result<()> {
    // Score — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>4}", state.score)))?;

    // Lives — centre
    let hearts: String = "♥".repeat(state.lives.max(0) as usize);
    let lives_text = format!("Lives: {}", hearts);
    let lx = (view.width / 2).saturating_sub(lives_text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_text))?;

    // Time — right
    let time_text = format!("Time: {}s", state.elapsed_secs);
    let rx = view
        .width
        .saturating_sub(time_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_TIME))?;
    out.queue(Print(&time_text))?;

    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("A D : Move   SPACE/↑ : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameState,
    view: Viewport,
) -> std::io::Result<()> {
    // Message precedence: win threshold beats exhausted lives beats the
    // clock — a quit shows whichever of the three applies.
    let message = match outcome(state.score, state.lives) {
        EndReason::Win => "You Win!",
        EndReason::Loss => "Game Over!",
        _ => "Time Up!",
    };

    let banner = format!("║  {:^14}  ║", message);
    let score_line = format!("Final Score: {}", state.score);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Red),
        (&banner, Color::Red),
        ("╚══════════════════╝", Color::Red),
        (&score_line, Color::Yellow),
        ("R - Play Again  Q - Quit", Color::White),
    ];

    let cx = view.width / 2;
    let start_row = (view.height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
