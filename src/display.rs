//! Terminal rendering for the game binary.
//!
//! The game core draws into a [`Canvas`] through the `Renderer` trait, in
//! play-field pixels.  The canvas scales those rectangles onto terminal cells,
//! and [`render`] turns the canvas plus the status snapshot into terminal
//! commands.  No game logic is performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use rand::Rng;
use void_space::entities::Rect;
use void_space::services::Renderer;
use void_space::status::{Phase, StatusSnapshot};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_STATS: Color = Color::Grey;
const C_SHIP: Color = Color::White;
const C_ASTEROID: Color = Color::Grey;
const C_CHUCK_NORRIS: Color = Color::DarkYellow;
const C_ENEMY_SHIP: Color = Color::Green;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_EXPLOSION: Color = Color::Red;
const C_STAR: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;

const STAR_COUNT: usize = 50;

/// Status panel text for the hit ratio: two decimals, or ` --` before the
/// first shot.
pub fn format_ratio(ratio: Option<f32>) -> String {
    match ratio {
        Some(r) => format!("{:.2}", r),
        None => " --".to_string(),
    }
}

// ── Canvas ────────────────────────────────────────────────────────────────────

struct Sprite {
    col: u16,
    row: u16,
    glyph: char,
    color: Color,
}

/// One frame's worth of sprites, already mapped to terminal cells.
///
/// The play area sits inside the border: columns `1..width-1`, rows
/// `2..height-2` (row 0 is the HUD, the last row holds the counters).
pub struct Canvas {
    width: u16,
    height: u16,
    field_width: i32,
    field_height: i32,
    sprites: Vec<Sprite>,
}

impl Canvas {
    pub fn new(width: u16, height: u16, field_width: i32, field_height: i32) -> Self {
        Self {
            width,
            height,
            field_width: field_width.max(1),
            field_height: field_height.max(1),
            sprites: Vec::new(),
        }
    }

    fn inner_width(&self) -> i32 {
        (self.width as i32 - 2).max(1)
    }

    fn inner_height(&self) -> i32 {
        (self.height as i32 - 4).max(1)
    }

    fn to_col(&self, x: i32) -> i32 {
        1 + x * self.inner_width() / self.field_width
    }

    fn to_row(&self, y: i32) -> i32 {
        2 + y * self.inner_height() / self.field_height
    }

    /// Cover every cell the rectangle touches (at least one), clipped to the
    /// play area.
    fn fill(&mut self, rect: &Rect, glyph: char, color: Color) {
        let left = self.to_col(rect.x);
        let top = self.to_row(rect.y);
        let right = self.to_col(rect.right() - 1).max(left);
        let bottom = self.to_row(rect.bottom() - 1).max(top);
        let max_col = self.width as i32 - 2;
        let max_row = self.height as i32 - 3;

        for row in top.max(2)..=bottom.min(max_row) {
            for col in left.max(1)..=right.min(max_col) {
                self.sprites.push(Sprite {
                    col: col as u16,
                    row: row as u16,
                    glyph,
                    color,
                });
            }
        }
    }

    /// Sprinkle background stars; a fresh set every frame.
    pub fn draw_stars(&mut self, rng: &mut impl Rng) {
        for _ in 0..STAR_COUNT {
            let x = rng.gen_range(0..self.field_width);
            let y = rng.gen_range(0..self.field_height);
            self.fill(&Rect::new(x, y, 1, 1), '.', C_STAR);
        }
    }
}

impl Renderer for Canvas {
    fn draw_ship(&mut self, ship: &Rect) {
        self.fill(ship, '▲', C_SHIP);
    }

    fn draw_bullet(&mut self, bullet: &Rect) {
        self.fill(bullet, '║', C_BULLET_PLAYER);
    }

    fn draw_asteroid(&mut self, asteroid: &Rect) {
        self.fill(asteroid, '●', C_ASTEROID);
    }

    fn draw_chuck_norris(&mut self, chuck_norris: &Rect) {
        self.fill(chuck_norris, '█', C_CHUCK_NORRIS);
    }

    fn draw_enemy_ship(&mut self, enemy_ship: &Rect) {
        self.fill(enemy_ship, '▼', C_ENEMY_SHIP);
    }

    fn draw_enemy_bullet(&mut self, enemy_bullet: &Rect) {
        self.fill(enemy_bullet, '↓', C_BULLET_ENEMY);
    }

    fn draw_ship_explosion(&mut self, at: &Rect) {
        self.fill(at, '#', C_EXPLOSION);
    }

    fn draw_asteroid_explosion(&mut self, at: &Rect) {
        self.fill(at, '*', C_EXPLOSION);
    }

    fn draw_enemy_ship_explosion(&mut self, at: &Rect) {
        self.fill(at, '✶', C_EXPLOSION);
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, canvas: &Canvas, status: &StatusSnapshot) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, canvas)?;
    draw_hud(out, canvas, status)?;
    draw_counters(out, canvas, status)?;

    for sprite in &canvas.sprites {
        out.queue(cursor::MoveTo(sprite.col, sprite.row))?;
        out.queue(style::SetForegroundColor(sprite.color))?;
        out.queue(Print(sprite.glyph))?;
    }

    match status.phase {
        Phase::NotStarted => draw_title(out, canvas)?,
        Phase::Starting { .. } => draw_centered(out, canvas, &[("Get Ready!", Color::White)])?,
        Phase::Playing => {}
        Phase::GameOver { .. } => draw_game_over(out, canvas, status)?,
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, canvas.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, canvas: &Canvas) -> std::io::Result<()> {
    let w = canvas.width as usize;
    let h = canvas.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // top bar under the HUD
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // bottom bar above the counters
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(canvas.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, canvas: &Canvas, status: &StatusSnapshot) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Points:{:>8}", status.points)))?;

    let level_str = format!("[ LEVEL {} ]", status.level);
    let lx = (canvas.width / 2).saturating_sub(level_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(Color::Green))?;
    out.queue(Print(&level_str))?;

    let lives_str = format!("Ships Left:{:>3}", status.ships_left);
    let rx = canvas
        .width
        .saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Counters (last row) ───────────────────────────────────────────────────────

fn draw_counters<W: Write>(out: &mut W, canvas: &Canvas, status: &StatusSnapshot) -> std::io::Result<()> {
    let mut line = format!(
        "Asteroids:{}  Enemy Ships:{}  Fired:{}",
        status.asteroids_destroyed, status.enemy_ships_destroyed, status.bullets_fired
    );
    if let Some(remaining) = status.bullets_remaining {
        line.push_str(&format!("  Remaining:{}", remaining));
    }
    line.push_str(&format!("  Hit/Miss:{}", format_ratio(status.hit_miss_ratio)));

    out.queue(cursor::MoveTo(1, canvas.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HUD_STATS))?;
    out.queue(Print(line))?;
    Ok(())
}

// ── Message overlays ──────────────────────────────────────────────────────────

fn draw_centered<W: Write>(out: &mut W, canvas: &Canvas, lines: &[(&str, Color)]) -> std::io::Result<()> {
    let cx = canvas.width / 2;
    let start_row = (canvas.height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

fn draw_title<W: Write>(out: &mut W, canvas: &Canvas) -> std::io::Result<()> {
    draw_centered(
        out,
        canvas,
        &[
            ("★  VOID  SPACE  ★", Color::Yellow),
            ("", Color::White),
            ("Press <Space> to Start a New Game.", Color::White),
            ("Press <Esc> to Exit the Game.", Color::White),
            ("", Color::White),
            ("← → ↑ ↓ / W A S D : Move   SPACE : Shoot", C_HINT),
        ],
    )
}

fn draw_game_over<W: Write>(out: &mut W, canvas: &Canvas, status: &StatusSnapshot) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>8}", status.points);
    let level_line = format!("Level Reached: {:>6}", status.level);
    draw_centered(
        out,
        canvas,
        &[
            ("╔════════════════════╗", Color::Red),
            ("║    GAME  OVER      ║", Color::Red),
            ("╚════════════════════╝", Color::Red),
            (&score_line, Color::Yellow),
            (&level_line, Color::DarkGrey),
        ],
    )
}
