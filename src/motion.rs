//! Motion model: per-tick displacement rules for every entity kind.
//!
//! [`plan`] decides what happens to an active entity this tick and
//! [`apply`] carries it out.  The exploding/respawn side lives in
//! [`crate::spawn`].

use rand::Rng;

use crate::config::{DriftPolicy, EnemyFireSettings, MotionSettings};
use crate::entities::{Drift, Entity, EntityKind, Gun};
use crate::services::PlayField;
use crate::spawn;

/// What one tick does to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    Translate { dx: i32, dy: i32 },
    /// Reached the bottom: recycle at the top.  Not a destruction.
    Wrap,
    /// Left the field: drop from its collection.
    Remove,
}

/// Everything the rules read besides the entity itself.
#[derive(Clone, Copy, Debug)]
pub struct MotionContext<'a> {
    pub level: u32,
    pub now_ms: u64,
    pub field: PlayField,
    pub settings: &'a MotionSettings,
}

// ── Speed tables ──────────────────────────────────────────────────────────────

fn scaled(speed: i32, level: u32, level_2x: u32, level_3x: u32, factor_2x: f64, factor_3x: f64) -> i32 {
    if level < level_2x {
        speed
    } else if level < level_3x {
        (speed as f64 * factor_2x) as i32
    } else {
        (speed as f64 * factor_3x) as i32
    }
}

/// Downward step of an asteroid or ChuckNorris at `level`.
pub fn asteroid_vertical_step(speed: i32, level: u32, settings: &MotionSettings) -> i32 {
    scaled(
        speed,
        level,
        settings.asteroid_2x_level,
        settings.asteroid_3x_level,
        settings.asteroid_2x_factor,
        settings.asteroid_3x_factor,
    )
}

/// Downward step of an enemy ship at `level`.
pub fn enemy_ship_vertical_step(speed: i32, level: u32, settings: &MotionSettings) -> i32 {
    scaled(
        speed,
        level,
        settings.enemy_ship_2x_level,
        settings.enemy_ship_3x_level,
        settings.enemy_ship_2x_factor,
        settings.enemy_ship_3x_factor,
    )
}

// ── Sideways motion ───────────────────────────────────────────────────────────

/// `a·cos(θ) + b·cos³(θ)` truncated toward zero, `θ = now_s + phase`.
pub fn sinusoid(now_ms: u64, phase: i32, a: f64, b: f64) -> i32 {
    let cs = (now_ms as f64 / 1000.0 + phase as f64).cos();
    (a * cs + b * cs * cs * cs) as i32
}

fn phase_of(drift: &mut Drift, rng: &mut impl Rng) -> i32 {
    *drift.phase.get_or_insert_with(|| rng.gen::<i32>())
}

/// Sideways step of an asteroid or ChuckNorris.  Zero until drifting is
/// unlocked, then whatever the configured [`DriftPolicy`] says.
pub fn asteroid_horizontal_step(drift: &mut Drift, ctx: &MotionContext, rng: &mut impl Rng) -> i32 {
    if ctx.level < ctx.settings.level_to_move_asteroids {
        return 0;
    }
    let left_half = drift.anchor_x < ctx.field.width / 2;
    match ctx.settings.drift {
        DriftPolicy::Sinusoidal => sinusoid(ctx.now_ms, phase_of(drift, rng), 3.0, 2.0),
        DriftPolicy::SideSteer => {
            if left_half {
                drift.horizontal_speed
            } else {
                -drift.horizontal_speed
            }
        }
        DriftPolicy::Jitter => {
            let factor = rng.gen_range(0..drift.default_speed.max(1)) - 1;
            if left_half {
                drift.horizontal_speed * factor + 1
            } else {
                -drift.horizontal_speed * factor + 1
            }
        }
    }
}

/// Sideways step of an enemy ship: always sinusoidal, wider swings from the
/// 3x level on.
pub fn enemy_ship_horizontal_step(drift: &mut Drift, ctx: &MotionContext, rng: &mut impl Rng) -> i32 {
    let amplitude = if ctx.level < ctx.settings.enemy_ship_3x_level {
        3.0
    } else {
        5.0
    };
    sinusoid(ctx.now_ms, phase_of(drift, rng), amplitude, 2.0)
}

// ── Planning ──────────────────────────────────────────────────────────────────

/// Decide this tick's motion for an active entity.
pub fn plan(entity: &mut Entity, ctx: &MotionContext, rng: &mut impl Rng) -> Motion {
    let speed = entity.speed;
    let y = entity.rect.y;
    match &mut entity.kind {
        EntityKind::Ship => Motion::Translate { dx: 0, dy: 0 },
        EntityKind::Bullet => {
            if y - speed >= 0 {
                Motion::Translate { dx: 0, dy: -speed }
            } else {
                Motion::Remove
            }
        }
        EntityKind::EnemyBullet => {
            if y + speed < ctx.field.height {
                Motion::Translate { dx: 0, dy: speed }
            } else {
                Motion::Remove
            }
        }
        EntityKind::Asteroid(drift) | EntityKind::ChuckNorris(drift) => {
            if y + speed >= ctx.field.height {
                return Motion::Wrap;
            }
            Motion::Translate {
                dx: asteroid_horizontal_step(drift, ctx, rng),
                dy: asteroid_vertical_step(speed, ctx.level, ctx.settings),
            }
        }
        EntityKind::EnemyShip(drift, _) => {
            if y + speed >= ctx.field.height {
                return Motion::Wrap;
            }
            Motion::Translate {
                dx: enemy_ship_horizontal_step(drift, ctx, rng),
                dy: enemy_ship_vertical_step(speed, ctx.level, ctx.settings),
            }
        }
    }
}

/// Carry out a planned motion.  Returns `false` when the entity should be
/// dropped from its collection.
pub fn apply(entity: &mut Entity, motion: Motion, field: &PlayField, rng: &mut impl Rng) -> bool {
    match motion {
        Motion::Translate { dx, dy } => {
            entity.rect.translate(dx, dy);
            true
        }
        Motion::Wrap => {
            spawn::wrap_to_top(entity, field, rng);
            true
        }
        Motion::Remove => false,
    }
}

// ── Enemy fire ────────────────────────────────────────────────────────────────

/// Fire when the cooldown has elapsed since the last shot, then re-roll the
/// cooldown.  Returns whether a bullet should be spawned.
pub fn pull_enemy_trigger(
    gun: &mut Gun,
    now_ms: u64,
    settings: &EnemyFireSettings,
    rng: &mut impl Rng,
) -> bool {
    if now_ms.saturating_sub(gun.last_fire_ms) > gun.cooldown_ms {
        gun.last_fire_ms = now_ms;
        gun.cooldown_ms = rng.gen_range(settings.min_cooldown_ms..settings.max_cooldown_ms);
        true
    } else {
        false
    }
}
