//! Tunable game settings.
//!
//! [`Settings`] mirrors the reference constant table: level thresholds,
//! speeds, delays, point values and population steps.  Every section is
//! `#[serde(default)]`, so a TOML file only needs the keys it wants to change:
//!
//! ```toml
//! [ammo]
//! initial = 250
//!
//! [motion]
//! drift = "sinusoidal"
//! ```
//!
//! Missing files are not an error for the binary (see [`Settings::load_or_default`]),
//! malformed or inconsistent ones are.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};

// ── Sections ──────────────────────────────────────────────────────────────────

/// Play-field size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    pub width: i32,
    pub height: i32,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            width: 700,
            height: 500,
        }
    }
}

/// Message screens and respawn delays, all in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub get_ready_ms: u64,
    pub game_over_ms: u64,
    pub new_ship_delay_ms: u64,
    pub new_asteroid_delay_ms: u64,
    pub new_enemy_ship_delay_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            get_ready_ms: 1500,
            game_over_ms: 3000,
            new_ship_delay_ms: 500,
            new_asteroid_delay_ms: 500,
            new_enemy_ship_delay_ms: 500,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LivesSettings {
    pub initial_ships: u32,
    pub levels_for_extra_ships: u32,
    pub extra_ships_per_level: u32,
}

impl Default for LivesSettings {
    fn default() -> Self {
        Self {
            initial_ships: 5,
            levels_for_extra_ships: 1,
            extra_ships_per_level: 1,
        }
    }
}

/// Player bullet supply and fire rate.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AmmoSettings {
    pub limited: bool,
    pub initial: u64,
    pub levels_for_gaining_bullets: u32,
    pub bullet_gain_per_level: u64,
    /// Refill granted when the supply runs dry and a ship is traded for it.
    pub bullets_per_life: u64,
    pub bullets_per_second: u64,
    pub bullets_per_second_fast: u64,
    pub level_to_faster_bullets: u32,
}

impl Default for AmmoSettings {
    fn default() -> Self {
        Self {
            limited: true,
            initial: 100,
            levels_for_gaining_bullets: 1,
            bullet_gain_per_level: 75,
            bullets_per_life: 50,
            bullets_per_second: 5,
            bullets_per_second_fast: 7,
            level_to_faster_bullets: 5,
        }
    }
}

/// How the level is derived from the run counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelMode {
    /// One level per `targets_to_next_level` destroyed targets.
    Targets,
    /// One level per `points_to_next_level` points.
    Points,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringSettings {
    pub asteroid_points: u64,
    pub enemy_ship_points: u64,
    pub level_mode: LevelMode,
    pub points_to_next_level: u64,
    pub targets_to_next_level: u64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            asteroid_points: 500,
            enemy_ship_points: 1000,
            level_mode: LevelMode::Targets,
            points_to_next_level: 1000,
            targets_to_next_level: 10,
        }
    }
}

/// Horizontal drift strategy for asteroids and ChuckNorris once drifting is
/// unlocked.  Exactly one is active per run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftPolicy {
    /// Constant sideways speed, sign chosen by which half the body spawned in.
    SideSteer,
    /// `3·cos(θ) + 2·cos³(θ)` with a per-body random phase.
    Sinusoidal,
    /// Side-steer speed scaled by a random factor drawn from the default speed.
    Jitter,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    pub drift: DriftPolicy,
    pub level_to_move_asteroids: u32,
    pub asteroid_2x_level: u32,
    pub asteroid_3x_level: u32,
    pub asteroid_2x_factor: f64,
    pub asteroid_3x_factor: f64,
    pub enemy_ship_2x_level: u32,
    pub enemy_ship_3x_level: u32,
    pub enemy_ship_2x_factor: f64,
    pub enemy_ship_3x_factor: f64,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            drift: DriftPolicy::SideSteer,
            level_to_move_asteroids: 2,
            asteroid_2x_level: 5,
            asteroid_3x_level: 10,
            asteroid_2x_factor: 1.2,
            asteroid_3x_factor: 1.5,
            enemy_ship_2x_level: 5,
            enemy_ship_3x_level: 10,
            enemy_ship_2x_factor: 1.2,
            enemy_ship_3x_factor: 1.5,
        }
    }
}

/// Reaching `level` guarantees at least `count` bodies of a kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct PopulationStep {
    pub level: u32,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PopulationSettings {
    pub initial_asteroids: usize,
    pub initial_enemy_ships: usize,
    pub initial_chuck_norris: usize,
    pub asteroid_steps: Vec<PopulationStep>,
    pub enemy_ship_steps: Vec<PopulationStep>,
}

impl Default for PopulationSettings {
    fn default() -> Self {
        let steps = vec![
            PopulationStep { level: 2, count: 3 },
            PopulationStep { level: 10, count: 5 },
        ];
        Self {
            initial_asteroids: 1,
            initial_enemy_ships: 1,
            initial_chuck_norris: 1,
            asteroid_steps: steps.clone(),
            enemy_ship_steps: steps,
        }
    }
}

/// Enemy ship firing cooldown, re-rolled in `[min_cooldown_ms, max_cooldown_ms)`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnemyFireSettings {
    pub min_cooldown_ms: u64,
    pub max_cooldown_ms: u64,
}

impl Default for EnemyFireSettings {
    fn default() -> Self {
        Self {
            min_cooldown_ms: 250,
            max_cooldown_ms: 750,
        }
    }
}

/// Size and speed of one entity kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct BodySettings {
    pub width: i32,
    pub height: i32,
    pub speed: i32,
}

impl BodySettings {
    const fn new(width: i32, height: i32, speed: i32) -> Self {
        Self {
            width,
            height,
            speed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BodiesSettings {
    pub ship: BodySettings,
    pub bullet: BodySettings,
    pub enemy_bullet: BodySettings,
    pub asteroid: BodySettings,
    pub chuck_norris: BodySettings,
    pub enemy_ship: BodySettings,
}

impl Default for BodiesSettings {
    fn default() -> Self {
        Self {
            ship: BodySettings::new(25, 25, 5),
            bullet: BodySettings::new(8, 8, 12),
            enemy_bullet: BodySettings::new(8, 8, 12),
            asteroid: BodySettings::new(32, 32, 4),
            chuck_norris: BodySettings::new(48, 48, 2),
            enemy_ship: BodySettings::new(25, 25, 3),
        }
    }
}

// ── Root ──────────────────────────────────────────────────────────────────────

/// The full settings table supplied at startup.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub field: FieldSettings,
    pub timing: TimingSettings,
    pub lives: LivesSettings,
    pub ammo: AmmoSettings,
    pub scoring: ScoringSettings,
    pub motion: MotionSettings,
    pub population: PopulationSettings,
    pub enemy_fire: EnemyFireSettings,
    pub bodies: BodiesSettings,
}

impl Settings {
    /// Parse settings from TOML text and validate them.
    pub fn from_toml_str(text: &str, origin: &Path) -> ConfigResult<Self> {
        let settings: Settings = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a settings file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&text, path)?;
        tracing::info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Like [`Settings::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no settings file; using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Reject values that would divide by zero, draw from an empty range or
    /// place a body that cannot fit in the play field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.field.width <= 0 || self.field.height <= 0 {
            return Err(ConfigError::invalid(
                "field",
                format!("{}x{} is not a usable play field", self.field.width, self.field.height),
            ));
        }

        let bodies = [
            ("bodies.ship", self.bodies.ship),
            ("bodies.bullet", self.bodies.bullet),
            ("bodies.enemy_bullet", self.bodies.enemy_bullet),
            ("bodies.asteroid", self.bodies.asteroid),
            ("bodies.chuck_norris", self.bodies.chuck_norris),
            ("bodies.enemy_ship", self.bodies.enemy_ship),
        ];
        for (key, body) in bodies {
            if body.width <= 0 || body.height <= 0 || body.speed <= 0 {
                return Err(ConfigError::invalid(
                    key,
                    "width, height and speed must all be positive",
                ));
            }
            if body.width >= self.field.width || body.height >= self.field.height {
                return Err(ConfigError::invalid(key, "body does not fit in the play field"));
            }
        }

        if self.scoring.targets_to_next_level == 0 {
            return Err(ConfigError::invalid("scoring.targets_to_next_level", "must be > 0"));
        }
        if self.scoring.points_to_next_level == 0 {
            return Err(ConfigError::invalid("scoring.points_to_next_level", "must be > 0"));
        }
        if self.ammo.levels_for_gaining_bullets == 0 {
            return Err(ConfigError::invalid("ammo.levels_for_gaining_bullets", "must be > 0"));
        }
        if self.lives.levels_for_extra_ships == 0 {
            return Err(ConfigError::invalid("lives.levels_for_extra_ships", "must be > 0"));
        }
        if self.ammo.bullets_per_second == 0 || self.ammo.bullets_per_second_fast == 0 {
            return Err(ConfigError::invalid("ammo.bullets_per_second", "must be > 0"));
        }
        if self.enemy_fire.min_cooldown_ms >= self.enemy_fire.max_cooldown_ms {
            return Err(ConfigError::invalid(
                "enemy_fire",
                format!(
                    "cooldown range [{}, {}) is empty",
                    self.enemy_fire.min_cooldown_ms, self.enemy_fire.max_cooldown_ms
                ),
            ));
        }
        if self.motion.asteroid_2x_level > self.motion.asteroid_3x_level {
            return Err(ConfigError::invalid(
                "motion.asteroid_2x_level",
                "must not exceed asteroid_3x_level",
            ));
        }
        if self.motion.enemy_ship_2x_level > self.motion.enemy_ship_3x_level {
            return Err(ConfigError::invalid(
                "motion.enemy_ship_2x_level",
                "must not exceed enemy_ship_3x_level",
            ));
        }
        Ok(())
    }
}
