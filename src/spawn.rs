//! Spawner: where entities appear, when destroyed ones come back, and how the
//! population grows with the level.
//!
//! Every random placement goes through the injected RNG.

use rand::Rng;

use crate::config::Settings;
use crate::entities::{Drift, Entities, Entity, EntityKind, Gun, Lifecycle, Rect};
use crate::services::PlayField;

/// Gap between the ship's home position and the bottom of the field.
const SHIP_Y_OFFSET: i32 = 5;

/// Random x that keeps a body of `width` inside the field.
pub fn random_x(rng: &mut impl Rng, field: &PlayField, width: i32) -> i32 {
    rng.gen_range(0..(field.width - width).max(1))
}

// ── Constructors ──────────────────────────────────────────────────────────────

/// Bottom-centre starting spot of the player's ship.
pub fn ship_home(settings: &Settings, field: &PlayField) -> Rect {
    let body = settings.bodies.ship;
    Rect::new(
        (field.width - body.width) / 2,
        field.height - body.height - SHIP_Y_OFFSET,
        body.width,
        body.height,
    )
}

pub fn new_ship(settings: &Settings, field: &PlayField) -> Entity {
    Entity::new(
        EntityKind::Ship,
        ship_home(settings, field),
        settings.bodies.ship.speed,
    )
}

pub fn new_asteroid(settings: &Settings, field: &PlayField, rng: &mut impl Rng) -> Entity {
    let body = settings.bodies.asteroid;
    let x = random_x(rng, field, body.width);
    Entity::new(
        EntityKind::Asteroid(Drift::new(body.speed, x)),
        Rect::new(x, 0, body.width, body.height),
        body.speed,
    )
}

/// ChuckNorris is heavier and slower, but drifts with the asteroid default speed.
pub fn new_chuck_norris(settings: &Settings, field: &PlayField, rng: &mut impl Rng) -> Entity {
    let body = settings.bodies.chuck_norris;
    let x = random_x(rng, field, body.width);
    Entity::new(
        EntityKind::ChuckNorris(Drift::new(settings.bodies.asteroid.speed, x)),
        Rect::new(x, 0, body.width, body.height),
        body.speed,
    )
}

pub fn new_enemy_ship(settings: &Settings, field: &PlayField, rng: &mut impl Rng) -> Entity {
    let body = settings.bodies.enemy_ship;
    let x = random_x(rng, field, body.width);
    Entity::new(
        EntityKind::EnemyShip(Drift::new(body.speed, x), Gun::default()),
        Rect::new(x, 0, body.width, body.height),
        body.speed,
    )
}

/// Player bullet centred just above the ship.
pub fn new_bullet(ship: &Rect, settings: &Settings) -> Entity {
    let body = settings.bodies.bullet;
    Entity::new(
        EntityKind::Bullet,
        Rect::new(
            ship.x + ship.width / 2 - body.width / 2,
            ship.y - body.height,
            body.width,
            body.height,
        ),
        body.speed,
    )
}

/// Enemy bullet centred on `origin`, one bullet-height below its top edge.
pub fn new_enemy_bullet(origin: &Rect, settings: &Settings) -> Entity {
    let body = settings.bodies.enemy_bullet;
    Entity::new(
        EntityKind::EnemyBullet,
        Rect::new(
            origin.x + origin.width / 2 - body.width / 2,
            origin.y + body.height,
            body.width,
            body.height,
        ),
        body.speed,
    )
}

/// Ship plus the level-1 population.
pub fn populate(settings: &Settings, field: &PlayField, rng: &mut impl Rng) -> Entities {
    let mut entities = Entities::with_ship(new_ship(settings, field));
    let population = &settings.population;
    entities.asteroids = (0..population.initial_asteroids)
        .map(|_| new_asteroid(settings, field, rng))
        .collect();
    entities.enemy_ships = (0..population.initial_enemy_ships)
        .map(|_| new_enemy_ship(settings, field, rng))
        .collect();
    entities.chuck_norrises = (0..population.initial_chuck_norris)
        .map(|_| new_chuck_norris(settings, field, rng))
        .collect();
    entities
}

// ── Recycling ─────────────────────────────────────────────────────────────────

/// Send a body that reached the bottom back to the top at a random x with a
/// fresh sideways speed.  Size and vertical speed are untouched.
pub fn wrap_to_top(entity: &mut Entity, field: &PlayField, rng: &mut impl Rng) {
    let x = random_x(rng, field, entity.rect.width);
    let horizontal_speed = rng.gen_range(0..entity.speed.max(1));
    entity.place(x, 0);
    if let Some(drift) = entity.drift_mut() {
        drift.horizontal_speed = horizontal_speed;
    }
}

/// Outcome of checking an entity's respawn timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Respawn {
    /// The entity was not exploding.
    Active,
    /// Still inside its respawn delay; its explosion should be drawn.
    StillExploding,
    /// The delay passed and the entity is back in play.
    Respawned,
}

fn due(entity: &Entity, now_ms: u64, delay_ms: u64) -> Respawn {
    match entity.lifecycle {
        Lifecycle::Active => Respawn::Active,
        Lifecycle::Exploding { since_ms, .. } if now_ms.saturating_sub(since_ms) > delay_ms => {
            Respawn::Respawned
        }
        Lifecycle::Exploding { .. } => Respawn::StillExploding,
    }
}

/// Bring a destroyed body back at a random x on the top edge once its delay
/// has passed.
pub fn try_respawn(
    entity: &mut Entity,
    now_ms: u64,
    delay_ms: u64,
    field: &PlayField,
    rng: &mut impl Rng,
) -> Respawn {
    let outcome = due(entity, now_ms, delay_ms);
    if outcome == Respawn::Respawned {
        entity.lifecycle = Lifecycle::Active;
        let x = random_x(rng, field, entity.rect.width);
        entity.place(x, 0);
    }
    outcome
}

/// Bring the ship back to its home position once the ship delay has passed.
pub fn try_respawn_ship(
    ship: &mut Entity,
    now_ms: u64,
    settings: &Settings,
    field: &PlayField,
) -> Respawn {
    let outcome = due(ship, now_ms, settings.timing.new_ship_delay_ms);
    if outcome == Respawn::Respawned {
        *ship = new_ship(settings, field);
    }
    outcome
}

// ── Population ────────────────────────────────────────────────────────────────

/// Add asteroids and enemy ships until the counts required at `level` are
/// met.  Never removes anything.
pub fn top_up(
    entities: &mut Entities,
    level: u32,
    settings: &Settings,
    field: &PlayField,
    rng: &mut impl Rng,
) {
    let population = &settings.population;
    if let Some(step) = population.asteroid_steps.iter().find(|s| s.level == level) {
        while entities.asteroids.len() < step.count {
            entities.asteroids.push(new_asteroid(settings, field, rng));
        }
        tracing::debug!(level, asteroids = entities.asteroids.len(), "asteroid population");
    }
    if let Some(step) = population.enemy_ship_steps.iter().find(|s| s.level == level) {
        while entities.enemy_ships.len() < step.count {
            entities.enemy_ships.push(new_enemy_ship(settings, field, rng));
        }
        tracing::debug!(level, enemy_ships = entities.enemy_ships.len(), "enemy ship population");
    }
}
