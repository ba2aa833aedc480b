//! Frame orchestrator.
//!
//! [`Game`] owns every entity collection and the run status, and hands them
//! by reference to the motion model, the spawner and the collision engine.
//! Time, randomness, sound and the play-field bounds are all injected, so a
//! test can drive it with a fixed clock and a seeded RNG.

use rand::Rng;

use crate::collision::{self, CollisionContext};
use crate::config::Settings;
use crate::entities::{Entities, Entity, Lifecycle, Rect};
use crate::motion::{self, MotionContext};
use crate::services::{DisplaySurface, PlayField, Renderer, SoundService, StatusSink};
use crate::spawn::{self, Respawn};
use crate::status::{GameStatus, Phase, StatusSnapshot};

/// Player ship movement directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Debug)]
pub struct Game {
    pub settings: Settings,
    pub status: GameStatus,
    pub entities: Entities,
    /// When the rate-limited trigger last let a shot through.
    last_shot_ms: Option<u64>,
}

impl Game {
    /// A game sitting on the title screen.
    pub fn new(settings: Settings, surface: &dyn DisplaySurface) -> Self {
        let field = PlayField::of(surface);
        let ship = spawn::new_ship(&settings, &field);
        Self {
            settings,
            status: GameStatus::new(),
            entities: Entities::with_ship(ship),
            last_shot_ms: None,
        }
    }

    // ── Input-driven transitions ─────────────────────────────────────────────

    /// Reset the run, spawn the level-1 population and show "Get Ready".
    pub fn new_game(&mut self, now_ms: u64, surface: &dyn DisplaySurface, rng: &mut impl Rng) {
        let field = PlayField::of(surface);
        self.status.reset(&self.settings, now_ms);
        self.entities = spawn::populate(&self.settings, &field, rng);
        self.last_shot_ms = None;
    }

    /// Fire one bullet from the ship.  Rejected only when limited ammo is
    /// exhausted.
    pub fn fire_bullet(&mut self, sound: &dyn SoundService) -> bool {
        if !self.status.spend_bullet(&self.settings) {
            return false;
        }
        let bullet = spawn::new_bullet(&self.entities.ship.rect, &self.settings);
        self.entities.bullets.push(bullet);
        sound.play_bullet_sound();
        true
    }

    /// Held fire button: shoots at most `fire_rate` times per second, and only
    /// while the ship is in play.
    pub fn pull_trigger(&mut self, now_ms: u64, sound: &dyn SoundService) -> bool {
        if !self.status.is_playing() || !self.entities.ship.is_active() {
            return false;
        }
        let interval = 1000 / self.status.fire_rate(&self.settings);
        if let Some(last) = self.last_shot_ms {
            if now_ms.saturating_sub(last) <= interval {
                return false;
            }
        }
        self.last_shot_ms = Some(now_ms);
        self.fire_bullet(sound)
    }

    /// Move the ship one step.  Refused if the ship would leave the field.
    pub fn move_ship(&mut self, direction: Direction, surface: &dyn DisplaySurface) -> bool {
        let ship = &mut self.entities.ship;
        if !self.status.is_playing() || !ship.is_active() {
            return false;
        }
        let field = PlayField::of(surface);
        let step = ship.speed;
        let (dx, dy) = match direction {
            Direction::Up => (0, -step),
            Direction::Down => (0, step),
            Direction::Left => (-step, 0),
            Direction::Right => (step, 0),
        };
        let mut moved = ship.rect;
        moved.translate(dx, dy);
        if moved.x < 0 || moved.y < 0 || moved.right() > field.width || moved.bottom() > field.height {
            return false;
        }
        ship.rect = moved;
        true
    }

    // ── Per-frame tick ───────────────────────────────────────────────────────

    /// Advance the run by one frame: phase deadlines, then (while playing)
    /// motion, collisions, population top-ups and the game-over check.
    pub fn tick(
        &mut self,
        now_ms: u64,
        surface: &dyn DisplaySurface,
        sound: &dyn SoundService,
        rng: &mut impl Rng,
    ) {
        if self.status.advance_phase(now_ms).is_some() || !self.status.is_playing() {
            return;
        }
        let field = PlayField::of(surface);

        self.advance(now_ms, &field, sound, rng);

        let ctx = CollisionContext {
            settings: &self.settings,
            field,
            now_ms,
        };
        let level_ups = collision::resolve(&mut self.entities, &mut self.status, &ctx, sound);
        for change in level_ups {
            spawn::top_up(&mut self.entities, change.to, &self.settings, &field, rng);
        }

        self.status.check_conditions(&self.settings, now_ms);
    }

    fn advance(&mut self, now_ms: u64, field: &PlayField, sound: &dyn SoundService, rng: &mut impl Rng) {
        let settings = &self.settings;
        let ctx = MotionContext {
            level: self.status.level(),
            now_ms,
            field: *field,
            settings: &settings.motion,
        };
        let Entities {
            ship,
            bullets,
            enemy_bullets,
            asteroids,
            chuck_norrises,
            enemy_ships,
        } = &mut self.entities;

        let asteroid_delay = settings.timing.new_asteroid_delay_ms;
        for body in asteroids.iter_mut().chain(chuck_norrises.iter_mut()) {
            if spawn::try_respawn(body, now_ms, asteroid_delay, field, rng) == Respawn::Active {
                let step = motion::plan(body, &ctx, rng);
                motion::apply(body, step, field, rng);
            }
        }

        let enemy_delay = settings.timing.new_enemy_ship_delay_ms;
        for enemy in enemy_ships.iter_mut() {
            match spawn::try_respawn(enemy, now_ms, enemy_delay, field, rng) {
                Respawn::StillExploding => continue,
                Respawn::Respawned => {
                    tracing::debug!(x = enemy.rect.x, "enemy ship respawned");
                    enemy_bullets.push(spawn::new_enemy_bullet(&enemy.rect, settings));
                    sound.play_enemy_bullet_sound();
                    continue;
                }
                Respawn::Active => {}
            }
            let step = motion::plan(enemy, &ctx, rng);
            motion::apply(enemy, step, field, rng);

            let fired = enemy
                .gun_mut()
                .map_or(false, |gun| motion::pull_enemy_trigger(gun, now_ms, &settings.enemy_fire, rng));
            if fired {
                enemy_bullets.push(spawn::new_enemy_bullet(&enemy.rect, settings));
                sound.play_enemy_bullet_sound();
            }
        }

        bullets.retain_mut(|bullet| {
            let step = motion::plan(bullet, &ctx, rng);
            motion::apply(bullet, step, field, rng)
        });
        enemy_bullets.retain_mut(|bullet| {
            let step = motion::plan(bullet, &ctx, rng);
            motion::apply(bullet, step, field, rng)
        });

        if spawn::try_respawn_ship(ship, now_ms, settings, field) == Respawn::Respawned {
            tracing::debug!("ship respawned");
        }
    }

    // ── Read side ────────────────────────────────────────────────────────────

    /// The ship is exploding and waiting to respawn.
    pub fn is_new_ship(&self) -> bool {
        !self.entities.ship.is_active()
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.status.snapshot(&self.settings, self.is_new_ship())
    }

    pub fn publish(&self, sink: &mut dyn StatusSink) {
        sink.publish(&self.snapshot());
    }

    /// Draw the current frame.  While playing every entity is drawn; during
    /// "Game Over" only explosions younger than their respawn delay are.
    pub fn draw(&self, now_ms: u64, renderer: &mut dyn Renderer) {
        let playing = match self.status.phase() {
            Phase::Playing => true,
            Phase::GameOver { .. } => false,
            Phase::NotStarted | Phase::Starting { .. } => return,
        };
        let timing = &self.settings.timing;
        let explosion = |entity: &Entity, delay_ms: u64| -> Option<Rect> {
            match entity.lifecycle {
                Lifecycle::Exploding { since_ms, at }
                    if playing || now_ms.saturating_sub(since_ms) < delay_ms =>
                {
                    Some(at)
                }
                _ => None,
            }
        };
        let e = &self.entities;

        for asteroid in &e.asteroids {
            if playing && asteroid.is_active() {
                renderer.draw_asteroid(&asteroid.rect);
            } else if let Some(at) = explosion(asteroid, timing.new_asteroid_delay_ms) {
                renderer.draw_asteroid_explosion(&at);
            }
        }
        for chuck in &e.chuck_norrises {
            if playing && chuck.is_active() {
                renderer.draw_chuck_norris(&chuck.rect);
            } else if let Some(at) = explosion(chuck, timing.new_asteroid_delay_ms) {
                renderer.draw_asteroid_explosion(&at);
            }
        }
        for enemy in &e.enemy_ships {
            if playing && enemy.is_active() {
                renderer.draw_enemy_ship(&enemy.rect);
            } else if let Some(at) = explosion(enemy, timing.new_enemy_ship_delay_ms) {
                renderer.draw_enemy_ship_explosion(&at);
            }
        }
        if playing {
            for bullet in &e.bullets {
                renderer.draw_bullet(&bullet.rect);
            }
            for bullet in &e.enemy_bullets {
                renderer.draw_enemy_bullet(&bullet.rect);
            }
        }
        if playing && e.ship.is_active() {
            renderer.draw_ship(&e.ship.rect);
        } else if let Some(at) = explosion(&e.ship, timing.new_ship_delay_ms) {
            renderer.draw_ship_explosion(&at);
        }
    }
}
