/// Asset loading — the glyph sprite sheet and the background theme.
///
/// The sprite sheet is required: a missing or corrupt file is a fatal error
/// propagated out of `main`.  The background theme is optional: any failure
/// is logged and replaced with a solid fill.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use crossterm::style::Color;
use tracing::warn;

use crate::config::ENEMY_FRAME_PAIRS;

pub const SPRITE_SHEET_PATH: &str = "assets/sprites.txt";
pub const BACKGROUND_PATH: &str = "assets/background.txt";

/// Fill colour used when the background theme cannot be loaded.
pub const FALLBACK_BACKGROUND: Color = Color::Black;

/// Glyph strings for every drawable entity.  Enemy sprites come in pairs:
/// the two frames an enemy toggles between.
#[derive(Clone, Debug)]
pub struct SpriteSheet {
    pub player: String,
    pub enemy_frames: Vec<(String, String)>,
    pub bullet: String,
    pub enemy_bullet: String,
}

impl SpriteSheet {
    /// The glyph an enemy currently shows, given its frame pair and whether
    /// it is on the initial frame.
    pub fn enemy_glyph(&self, frame_pair: usize, initial: bool) -> &str {
        let (a, b) = &self.enemy_frames[frame_pair % self.enemy_frames.len()];
        if initial {
            a
        } else {
            b
        }
    }
}

/// Load the sprite sheet.  Fatal on any failure.
pub fn load_sprite_sheet(path: &Path) -> Result<SpriteSheet> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("unable to load sprite sheet {}", path.display()))?;
    parse_sprite_sheet(&text)
        .with_context(|| format!("corrupt sprite sheet {}", path.display()))
}

/// Sheet format: one `name = glyphs` entry per line, `#` comments and blank
/// lines ignored.  `enemyN` entries carry two whitespace-separated frames;
/// everything else carries one.
fn parse_sprite_sheet(text: &str) -> Result<SpriteSheet> {
    let mut player = None;
    let mut bullet = None;
    let mut enemy_bullet = None;
    let mut enemy_frames: Vec<Option<(String, String)>> = vec![None; ENEMY_FRAME_PAIRS];

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((name, value)) = line.split_once('=') else {
            bail!("malformed line: {line:?}");
        };
        let name = name.trim();
        let frames: Vec<&str> = value.split_whitespace().collect();

        if let Some(index) = name.strip_prefix("enemy").and_then(|n| n.parse::<usize>().ok()) {
            if index >= ENEMY_FRAME_PAIRS {
                bail!("enemy frame index {index} out of range");
            }
            let pair = match frames.as_slice() {
                [a, b] => (a.to_string(), b.to_string()),
                _ => bail!("enemy{index} needs exactly two frames"),
            };
            enemy_frames[index] = Some(pair);
            continue;
        }

        let glyph = match frames.as_slice() {
            [g] => g.to_string(),
            _ => bail!("{name} needs exactly one glyph"),
        };
        match name {
            "player" => player = Some(glyph),
            "bullet" => bullet = Some(glyph),
            "enemy_bullet" => enemy_bullet = Some(glyph),
            other => bail!("unknown sprite {other:?}"),
        }
    }

    let enemy_frames: Vec<(String, String)> = enemy_frames
        .into_iter()
        .enumerate()
        .map(|(i, pair)| pair.with_context(|| format!("missing enemy{i} frames")))
        .collect::<Result<_>>()?;

    Ok(SpriteSheet {
        player: player.context("missing player sprite")?,
        enemy_frames,
        bullet: bullet.context("missing bullet sprite")?,
        enemy_bullet: enemy_bullet.context("missing enemy_bullet sprite")?,
    })
}

/// Load the background fill colour.  Never fails: a missing file or an
/// unknown colour name logs a diagnostic and falls back to a solid fill.
pub fn load_background(path: &Path) -> Color {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %path.display(), %err, "unable to load background, using solid fill");
            return FALLBACK_BACKGROUND;
        }
    };
    let name = text.trim();
    match parse_color(name) {
        Some(color) => color,
        None => {
            warn!(path = %path.display(), name, "unknown background colour, using solid fill");
            FALLBACK_BACKGROUND
        }
    }
}

fn parse_color(name: &str) -> Option<Color> {
    match name.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "blue" => Some(Color::Blue),
        "dark_blue" => Some(Color::DarkBlue),
        "grey" | "gray" => Some(Color::Grey),
        "dark_grey" | "dark_gray" => Some(Color::DarkGrey),
        "magenta" => Some(Color::Magenta),
        "dark_magenta" => Some(Color::DarkMagenta),
        _ => None,
    }
}
