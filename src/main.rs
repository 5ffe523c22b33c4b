mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::Color,
    terminal,
    ExecutableCommand,
};
use rand::rngs::ThreadRng;
use rand::thread_rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fixed_formation::assets::{
    load_background, load_sprite_sheet, SpriteSheet, BACKGROUND_PATH, SPRITE_SHEET_PATH,
};
use fixed_formation::compute::{init_state, move_player_left, move_player_right, tick, try_shoot};
use fixed_formation::config::TARGET_FPS;
use fixed_formation::entities::{EndReason, GameState, GameStatus};

use display::Viewport;

const FRAME: Duration = Duration::from_millis(1000 / TARGET_FPS);

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs one session to its end and then sits on the game-over overlay.
/// Returns `true` → quit program,  `false` → restart with a fresh session.
///
/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every movement key.  Each frame we check which keys are still
/// "fresh" (within `HOLD_WINDOW` frames) and apply their effects, so Space +
/// A/D can be held at the same time with no interference.  Shots are taken
/// on discrete presses only; the 500 ms cooldown lives in `compute`.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    rng: &mut ThreadRng,
    sheet: &SpriteSheet,
    background: Color,
    view: Viewport,
) -> anyhow::Result<bool> {
    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut quit_requested = false;

    let session_start = Instant::now();

    loop {
        let frame_start = Instant::now();

        // A quit observed last frame is honored here, never mid-frame.
        if quit_requested {
            return Ok(true);
        }
        frame += 1;
        let now_ms = session_start.elapsed().as_millis() as u64;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                // Press: record key + handle one-shot actions
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            quit_requested = true;
                            if state.status == GameStatus::Playing {
                                state.status = GameStatus::Over(EndReason::Quit);
                            }
                        }
                        KeyCode::Char('c')
                            if modifiers.contains(KeyModifiers::CONTROL) =>
                        {
                            quit_requested = true;
                            if state.status == GameStatus::Playing {
                                state.status = GameStatus::Over(EndReason::Quit);
                            }
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if matches!(state.status, GameStatus::Over(_)) =>
                        {
                            return Ok(false);
                        }
                        KeyCode::Char(' ') | KeyCode::Up
                            if state.status == GameStatus::Playing =>
                        {
                            // Attempts inside the cooldown are dropped.
                            try_shoot(state, now_ms);
                        }
                        _ => {}
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        if state.status == GameStatus::Playing {
            // ── Apply held movement keys, then advance the simulation ─────────
            let left = is_held(&key_frame, &KeyCode::Char('a'), frame)
                || is_held(&key_frame, &KeyCode::Char('A'), frame);
            let right = is_held(&key_frame, &KeyCode::Char('d'), frame)
                || is_held(&key_frame, &KeyCode::Char('D'), frame);
            if left {
                move_player_left(state);
            }
            if right {
                move_player_right(state);
            }

            tick(state, now_ms, rng);

            if let GameStatus::Over(reason) = state.status {
                info!(?reason, score = state.score, lives = state.lives, "session ended");
            }
        }

        display::render(out, state, sheet, background, view)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Asset loading happens before the terminal enters raw mode so that a
    // fatal sprite-sheet failure prints a clean diagnostic, and a background
    // fallback can be logged.
    let sheet = load_sprite_sheet(Path::new(SPRITE_SHEET_PATH))
        .context("sprite sheet is required to start")?;
    let background = load_background(Path::new(BACKGROUND_PATH));

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(_) => break,
            }
        }
    });

    let result = run(&mut out, &rx, &sheet, background);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    sheet: &SpriteSheet,
    background: Color,
) -> anyhow::Result<()> {
    let mut rng = thread_rng();

    loop {
        let (width, height) = terminal::size()?;
        let view = Viewport { width, height };

        // The session clock restarts with every session.
        let mut state = init_state(0, &mut rng);
        info!("session started");

        let quit = game_loop(out, &mut state, rx, &mut rng, sheet, background, view)?;
        if quit {
            break;
        }
        // Otherwise fall through to a fresh session (R pressed on the overlay)
    }
    Ok(())
}
