//! Run state: counters, derived points and level, and the run phase machine.
//!
//! `points` and `level` are never assigned from outside.  They are recomputed
//! from the destroyed counts after every change, and a level change applies
//! its bonuses exactly once.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::{LevelMode, Settings};
use crate::services::StatusSink;

/// Run phase.  The timed phases carry the deadline at which they end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Title screen.
    #[default]
    NotStarted,
    /// "Get Ready" is showing.
    Starting { until_ms: u64 },
    Playing,
    /// "Game Over" is showing; the run returns to the title afterwards.
    GameOver { until_ms: u64 },
}

/// A level change, returned so the owner of the entity collections can apply
/// the population top-ups for `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelUp {
    pub from: u32,
    pub to: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameStatus {
    phase: Phase,
    ships_left: u32,
    asteroids_destroyed: u64,
    enemy_ships_destroyed: u64,
    points: u64,
    bullets_fired: u64,
    bullets_remaining: u64,
    level: u32,
}

impl Default for GameStatus {
    fn default() -> Self {
        Self {
            phase: Phase::NotStarted,
            ships_left: 0,
            asteroids_destroyed: 0,
            enemy_ships_destroyed: 0,
            points: 0,
            bullets_fired: 0,
            bullets_remaining: 0,
            level: 1,
        }
    }
}

impl GameStatus {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Phase machine ─────────────────────────────────────────────────────────

    /// Reset every counter for a new run and enter `Starting`.
    pub fn reset(&mut self, settings: &Settings, now_ms: u64) {
        *self = Self {
            phase: Phase::Starting {
                until_ms: now_ms + settings.timing.get_ready_ms,
            },
            ships_left: settings.lives.initial_ships,
            bullets_remaining: settings.ammo.initial,
            ..Self::default()
        };
        tracing::info!(
            ships = self.ships_left,
            bullets = self.bullets_remaining,
            "new game"
        );
    }

    /// End a timed phase whose deadline has passed.  Returns the new phase.
    pub fn advance_phase(&mut self, now_ms: u64) -> Option<Phase> {
        let next = match self.phase {
            Phase::Starting { until_ms } if now_ms >= until_ms => Phase::Playing,
            Phase::GameOver { until_ms } if now_ms >= until_ms => Phase::NotStarted,
            _ => return None,
        };
        tracing::info!(from = ?self.phase, to = ?next, "phase change");
        self.phase = next;
        Some(next)
    }

    /// Enter `GameOver` when a playing run has no ships left.
    pub fn check_conditions(&mut self, settings: &Settings, now_ms: u64) -> bool {
        if self.phase == Phase::Playing && self.ships_left == 0 {
            self.phase = Phase::GameOver {
                until_ms: now_ms + settings.timing.game_over_ms,
            };
            tracing::info!(points = self.points, level = self.level, "game over");
            return true;
        }
        false
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_starting(&self) -> bool {
        matches!(self.phase, Phase::Starting { .. })
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver { .. })
    }

    // ── Counters ──────────────────────────────────────────────────────────────

    pub fn ships_left(&self) -> u32 {
        self.ships_left
    }

    pub fn asteroids_destroyed(&self) -> u64 {
        self.asteroids_destroyed
    }

    pub fn enemy_ships_destroyed(&self) -> u64 {
        self.enemy_ships_destroyed
    }

    pub fn targets_destroyed(&self) -> u64 {
        self.asteroids_destroyed + self.enemy_ships_destroyed
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn bullets_fired(&self) -> u64 {
        self.bullets_fired
    }

    pub fn bullets_remaining(&self) -> u64 {
        self.bullets_remaining
    }

    /// Percentage of fired bullets that destroyed a target.  `None` until the
    /// first shot.
    pub fn hit_miss_ratio(&self) -> Option<f32> {
        if self.bullets_fired > 0 {
            Some(self.targets_destroyed() as f32 / self.bullets_fired as f32 * 100.0)
        } else {
            None
        }
    }

    pub fn lose_ship(&mut self) {
        self.ships_left = self.ships_left.saturating_sub(1);
    }

    pub fn record_asteroid_destroyed(&mut self, settings: &Settings) -> Option<LevelUp> {
        self.asteroids_destroyed += 1;
        self.recompute(settings)
    }

    pub fn record_enemy_ship_destroyed(&mut self, settings: &Settings) -> Option<LevelUp> {
        self.enemy_ships_destroyed += 1;
        self.recompute(settings)
    }

    fn recompute(&mut self, settings: &Settings) -> Option<LevelUp> {
        self.points = self.asteroids_destroyed * settings.scoring.asteroid_points
            + self.enemy_ships_destroyed * settings.scoring.enemy_ship_points;
        self.set_level(self.derived_level(settings), settings)
    }

    /// The level the current counters call for.
    pub fn derived_level(&self, settings: &Settings) -> u32 {
        let steps = match settings.scoring.level_mode {
            LevelMode::Targets => self.targets_destroyed() / settings.scoring.targets_to_next_level,
            LevelMode::Points => self.points / settings.scoring.points_to_next_level,
        };
        steps as u32 + 1
    }

    /// Move to `level`.  Assigning the current level is a no-op; an actual
    /// change grants the extra ship and bullet bonus (never while starting,
    /// never for level 1) and is reported for population top-ups.
    pub(crate) fn set_level(&mut self, level: u32, settings: &Settings) -> Option<LevelUp> {
        if level == self.level {
            return None;
        }
        if !self.is_starting() && level != 1 {
            if level % settings.lives.levels_for_extra_ships == 0 {
                self.ships_left += settings.lives.extra_ships_per_level;
            }
            if level % settings.ammo.levels_for_gaining_bullets == 0 {
                self.bullets_remaining += settings.ammo.bullet_gain_per_level;
            }
        }
        let change = LevelUp {
            from: self.level,
            to: level,
        };
        self.level = level;
        tracing::info!(from = change.from, to = change.to, "level change");
        Some(change)
    }

    /// Set the bullet supply.  Running dry with more than one ship left trades
    /// a ship for a fresh clip instead of leaving the supply at zero.
    pub fn set_bullets_remaining(&mut self, bullets: u64, settings: &Settings) {
        if bullets == 0 && self.ships_left > 1 {
            self.ships_left -= 1;
            self.bullets_remaining = settings.ammo.bullets_per_life;
            tracing::debug!(ships = self.ships_left, "out of bullets; ship traded for refill");
        } else {
            self.bullets_remaining = bullets;
        }
    }

    /// Account for one shot.  Returns `false` (and changes nothing) when
    /// bullets are limited and none remain.
    pub fn spend_bullet(&mut self, settings: &Settings) -> bool {
        if settings.ammo.limited && self.bullets_remaining == 0 {
            return false;
        }
        self.bullets_fired += 1;
        if settings.ammo.limited {
            self.set_bullets_remaining(self.bullets_remaining - 1, settings);
        }
        true
    }

    /// Player shots allowed per second at the current level.
    pub fn fire_rate(&self, settings: &Settings) -> u64 {
        if self.level >= settings.ammo.level_to_faster_bullets {
            settings.ammo.bullets_per_second_fast
        } else {
            settings.ammo.bullets_per_second
        }
    }

    pub fn snapshot(&self, settings: &Settings, is_new_ship: bool) -> StatusSnapshot {
        StatusSnapshot {
            phase: self.phase,
            ships_left: self.ships_left,
            asteroids_destroyed: self.asteroids_destroyed,
            enemy_ships_destroyed: self.enemy_ships_destroyed,
            points: self.points,
            level: self.level,
            bullets_fired: self.bullets_fired,
            bullets_remaining: settings.ammo.limited.then_some(self.bullets_remaining),
            hit_miss_ratio: self.hit_miss_ratio(),
            is_new_ship,
        }
    }
}

// ── Read side ─────────────────────────────────────────────────────────────────

/// Status panel values as of the end of one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StatusSnapshot {
    pub phase: Phase,
    pub ships_left: u32,
    pub asteroids_destroyed: u64,
    pub enemy_ships_destroyed: u64,
    pub points: u64,
    pub level: u32,
    pub bullets_fired: u64,
    /// `None` when bullets are unlimited.
    pub bullets_remaining: Option<u64>,
    pub hit_miss_ratio: Option<f32>,
    pub is_new_ship: bool,
}

/// Latest snapshot behind a lock, so a UI thread can read whole snapshots
/// between ticks.
#[derive(Clone, Debug, Default)]
pub struct StatusBoard {
    inner: Arc<Mutex<StatusSnapshot>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> StatusSnapshot {
        *self.inner.lock()
    }
}

impl StatusSink for StatusBoard {
    fn publish(&mut self, snapshot: &StatusSnapshot) {
        *self.inner.lock() = *snapshot;
    }
}
