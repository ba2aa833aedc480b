//! Seams between the game core and the outside world.
//!
//! The core never draws, plays audio or measures a window itself.  It calls
//! these traits, and the binary (or a test) supplies the implementations.

use crate::entities::Rect;
use crate::status::StatusSnapshot;

/// Draws entities into whatever frame the implementor owns.  One call per
/// visible entity per tick, keyed off the entity's current rectangle.
pub trait Renderer {
    fn draw_ship(&mut self, ship: &Rect);
    fn draw_bullet(&mut self, bullet: &Rect);
    fn draw_asteroid(&mut self, asteroid: &Rect);
    fn draw_chuck_norris(&mut self, chuck_norris: &Rect);
    fn draw_enemy_ship(&mut self, enemy_ship: &Rect);
    fn draw_enemy_bullet(&mut self, enemy_bullet: &Rect);
    fn draw_ship_explosion(&mut self, at: &Rect);
    fn draw_asteroid_explosion(&mut self, at: &Rect);
    fn draw_enemy_ship_explosion(&mut self, at: &Rect);
}

/// Fire-and-forget sound hooks.  Implementations must return immediately;
/// the tick never waits for playback.  Every hook defaults to a no-op.
pub trait SoundService {
    fn play_bullet_sound(&self) {}
    fn play_enemy_bullet_sound(&self) {}
    fn play_ship_explosion_sound(&self) {}
    fn play_asteroid_explosion_sound(&self) {}
    fn play_enemy_ship_explosion_sound(&self) {}
    fn play_chuck_norris_sound(&self) {}
    fn play_chuck_norris_explosion_sound(&self) {}
}

/// Plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentSound;

impl SoundService for SilentSound {}

/// Current play-field bounds, used for spawn positions and off-field tests.
pub trait DisplaySurface {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
}

/// Fixed-size play field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayField {
    pub width: i32,
    pub height: i32,
}

impl PlayField {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Take a copy of a surface's bounds for the duration of one tick.
    pub fn of(surface: &dyn DisplaySurface) -> Self {
        Self {
            width: surface.width(),
            height: surface.height(),
        }
    }
}

impl DisplaySurface for PlayField {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }
}

/// Receives the status panel values once per tick.
pub trait StatusSink {
    fn publish(&mut self, snapshot: &StatusSnapshot);
}
