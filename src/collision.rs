//! Collision engine.
//!
//! Runs the eight pairwise checks in a fixed order over the already-moved
//! positions.  Destroyed bodies are parked outside the play field and marked
//! exploding; bullets are removed.  Exploding bodies never collide.
//!
//! Within a category the first qualifying pair wins, except asteroid × ship
//! and ship × enemy ship, which keep scanning every remaining body.

use crate::config::Settings;
use crate::entities::{Entities, Entity};
use crate::services::{PlayField, SoundService};
use crate::spawn;
use crate::status::{GameStatus, LevelUp};

#[derive(Clone, Copy, Debug)]
pub struct CollisionContext<'a> {
    pub settings: &'a Settings,
    pub field: PlayField,
    pub now_ms: u64,
}

/// Park a destroyed asteroid or enemy ship just above the top-left corner.
fn park_target(target: &mut Entity, now_ms: u64) {
    let (w, h) = (target.rect.width, target.rect.height);
    target.explode(now_ms, -w, -h);
}

/// Park the ship just above the top-right corner.
fn explode_ship(ship: &mut Entity, ctx: &CollisionContext) {
    let (w, h) = (ship.rect.width, ship.rect.height);
    ship.explode(ctx.now_ms, ctx.field.width + w, -h);
}

/// Run every category.  Returns the level changes the new counts caused, in
/// the order they happened.
pub fn resolve(
    entities: &mut Entities,
    status: &mut GameStatus,
    ctx: &CollisionContext,
    sound: &dyn SoundService,
) -> Vec<LevelUp> {
    let mut level_ups = Vec::new();
    bullets_vs_asteroids(entities, status, ctx, sound, &mut level_ups);
    bullets_vs_chuck_norris(entities, ctx, sound);
    bullets_vs_enemy_ships(entities, status, ctx, sound, &mut level_ups);
    enemy_bullets_vs_ship(entities, status, ctx, sound);
    asteroids_vs_ship(entities, status, ctx, sound, &mut level_ups);
    chuck_norris_vs_ship(entities, status, ctx, sound);
    ship_vs_enemy_ships(entities, status, ctx, sound, &mut level_ups);
    bullets_vs_enemy_bullets(entities);
    level_ups
}

// ── 1. player bullet × asteroid ───────────────────────────────────────────────

pub fn bullets_vs_asteroids(
    entities: &mut Entities,
    status: &mut GameStatus,
    ctx: &CollisionContext,
    sound: &dyn SoundService,
    level_ups: &mut Vec<LevelUp>,
) {
    for asteroid in entities.asteroids.iter_mut().filter(|a| a.is_active()) {
        let hit = entities
            .bullets
            .iter()
            .position(|b| b.rect.intersects(&asteroid.rect));
        if let Some(i) = hit {
            level_ups.extend(status.record_asteroid_destroyed(ctx.settings));
            tracing::debug!(x = asteroid.rect.x, y = asteroid.rect.y, "asteroid shot down");
            park_target(asteroid, ctx.now_ms);
            sound.play_asteroid_explosion_sound();
            entities.bullets.remove(i);
        }
    }
}

// ── 2. player bullet × ChuckNorris ────────────────────────────────────────────

/// ChuckNorris swallows the bullet and answers with an enemy bullet.
pub fn bullets_vs_chuck_norris(entities: &mut Entities, ctx: &CollisionContext, sound: &dyn SoundService) {
    for chuck in entities.chuck_norrises.iter().filter(|c| c.is_active()) {
        let hit = entities
            .bullets
            .iter()
            .position(|b| b.rect.intersects(&chuck.rect));
        if let Some(i) = hit {
            entities.bullets.remove(i);
            entities
                .enemy_bullets
                .push(spawn::new_enemy_bullet(&chuck.rect, ctx.settings));
            sound.play_chuck_norris_sound();
        }
    }
}

// ── 3. player bullet × enemy ship ─────────────────────────────────────────────

pub fn bullets_vs_enemy_ships(
    entities: &mut Entities,
    status: &mut GameStatus,
    ctx: &CollisionContext,
    sound: &dyn SoundService,
    level_ups: &mut Vec<LevelUp>,
) {
    for enemy in entities.enemy_ships.iter_mut().filter(|e| e.is_active()) {
        let hit = entities
            .bullets
            .iter()
            .position(|b| b.rect.intersects(&enemy.rect));
        if let Some(i) = hit {
            level_ups.extend(status.record_enemy_ship_destroyed(ctx.settings));
            tracing::debug!(x = enemy.rect.x, y = enemy.rect.y, "enemy ship shot down");
            park_target(enemy, ctx.now_ms);
            sound.play_enemy_ship_explosion_sound();
            entities.bullets.remove(i);
        }
    }
}

// ── 4. enemy bullet × ship ────────────────────────────────────────────────────

pub fn enemy_bullets_vs_ship(
    entities: &mut Entities,
    status: &mut GameStatus,
    ctx: &CollisionContext,
    sound: &dyn SoundService,
) {
    let ship = &mut entities.ship;
    let hit = entities
        .enemy_bullets
        .iter()
        .position(|b| b.rect.intersects(&ship.rect));
    if let Some(i) = hit {
        status.lose_ship();
        tracing::debug!(ships = status.ships_left(), "ship hit by enemy bullet");
        explode_ship(ship, ctx);
        sound.play_ship_explosion_sound();
        entities.enemy_bullets.remove(i);
    }
}

// ── 5. asteroid × ship ────────────────────────────────────────────────────────

pub fn asteroids_vs_ship(
    entities: &mut Entities,
    status: &mut GameStatus,
    ctx: &CollisionContext,
    sound: &dyn SoundService,
    level_ups: &mut Vec<LevelUp>,
) {
    let ship = &mut entities.ship;
    for asteroid in entities.asteroids.iter_mut().filter(|a| a.is_active()) {
        if asteroid.rect.intersects(&ship.rect) {
            status.lose_ship();
            level_ups.extend(status.record_asteroid_destroyed(ctx.settings));
            tracing::debug!(ships = status.ships_left(), "ship rammed by asteroid");
            park_target(asteroid, ctx.now_ms);
            explode_ship(ship, ctx);
            sound.play_ship_explosion_sound();
            sound.play_asteroid_explosion_sound();
        }
    }
}

// ── 6. ChuckNorris × ship ─────────────────────────────────────────────────────

/// Only the ship breaks.
pub fn chuck_norris_vs_ship(
    entities: &mut Entities,
    status: &mut GameStatus,
    ctx: &CollisionContext,
    sound: &dyn SoundService,
) {
    let ship = &mut entities.ship;
    for chuck in entities.chuck_norrises.iter().filter(|c| c.is_active()) {
        if chuck.rect.intersects(&ship.rect) {
            status.lose_ship();
            tracing::debug!(ships = status.ships_left(), "ship crushed by ChuckNorris");
            explode_ship(ship, ctx);
            sound.play_chuck_norris_explosion_sound();
        }
    }
}

// ── 7. ship × enemy ship ──────────────────────────────────────────────────────

pub fn ship_vs_enemy_ships(
    entities: &mut Entities,
    status: &mut GameStatus,
    ctx: &CollisionContext,
    sound: &dyn SoundService,
    level_ups: &mut Vec<LevelUp>,
) {
    let ship = &mut entities.ship;
    for enemy in entities.enemy_ships.iter_mut().filter(|e| e.is_active()) {
        if enemy.rect.intersects(&ship.rect) {
            status.lose_ship();
            level_ups.extend(status.record_enemy_ship_destroyed(ctx.settings));
            tracing::debug!(ships = status.ships_left(), "ship rammed enemy ship");
            park_target(enemy, ctx.now_ms);
            explode_ship(ship, ctx);
            sound.play_ship_explosion_sound();
            sound.play_enemy_ship_explosion_sound();
        }
    }
}

// ── 8. player bullet × enemy bullet ───────────────────────────────────────────

/// Each enemy bullet takes out the first player bullet touching it.
pub fn bullets_vs_enemy_bullets(entities: &mut Entities) {
    let mut i = 0;
    while i < entities.enemy_bullets.len() {
        let enemy_rect = entities.enemy_bullets[i].rect;
        match entities.bullets.iter().position(|b| b.rect.intersects(&enemy_rect)) {
            Some(j) => {
                entities.bullets.remove(j);
                entities.enemy_bullets.remove(i);
            }
            None => i += 1,
        }
    }
}
