use void_space::config::{DriftPolicy, EnemyFireSettings, MotionSettings};
use void_space::entities::*;
use void_space::motion::*;
use void_space::services::PlayField;

use rand::rngs::StdRng;
use rand::SeedableRng;

const FIELD: PlayField = PlayField::new(700, 500);

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn ctx(level: u32, settings: &MotionSettings) -> MotionContext<'_> {
    MotionContext {
        level,
        now_ms: 0,
        field: FIELD,
        settings,
    }
}

fn asteroid_at(x: i32, y: i32) -> Entity {
    Entity::new(
        EntityKind::Asteroid(Drift::new(4, x)),
        Rect::new(x, y, 32, 32),
        4,
    )
}

fn bullet_at(kind: EntityKind, y: i32) -> Entity {
    Entity::new(kind, Rect::new(100, y, 8, 8), 12)
}

// ── Sinusoid ──────────────────────────────────────────────────────────────────

#[test]
fn sinusoid_peaks_at_zero_phase() {
    assert_eq!(sinusoid(0, 0, 3.0, 2.0), 5);
    assert_eq!(sinusoid(0, 0, 5.0, 2.0), 7);
}

#[test]
fn sinusoid_truncates_toward_zero() {
    // cos(3) ≈ -0.99 → 3·cs + 2·cs³ ≈ -4.91
    assert_eq!(sinusoid(0, 3, 3.0, 2.0), -4);
    // the clock is read in seconds
    assert_eq!(sinusoid(3000, 0, 3.0, 2.0), -4);
}

// ── Vertical speed tables ─────────────────────────────────────────────────────

#[test]
fn asteroid_speed_scales_with_level() {
    let s = MotionSettings::default();
    assert_eq!(asteroid_vertical_step(4, 1, &s), 4);
    assert_eq!(asteroid_vertical_step(4, 4, &s), 4);
    assert_eq!(asteroid_vertical_step(4, 5, &s), 4); // 4.8
    assert_eq!(asteroid_vertical_step(4, 10, &s), 6);
}

#[test]
fn enemy_ship_speed_scales_with_level() {
    let s = MotionSettings::default();
    assert_eq!(enemy_ship_vertical_step(3, 1, &s), 3);
    assert_eq!(enemy_ship_vertical_step(3, 5, &s), 3); // 3.6
    assert_eq!(enemy_ship_vertical_step(3, 12, &s), 4); // 4.5
}

// ── Sideways motion ───────────────────────────────────────────────────────────

#[test]
fn asteroids_fall_straight_before_the_unlock_level() {
    let s = MotionSettings::default();
    let mut rng = seeded_rng();
    let mut drift = Drift::new(4, 10);
    assert_eq!(asteroid_horizontal_step(&mut drift, &ctx(1, &s), &mut rng), 0);
}

#[test]
fn side_steer_heads_for_the_far_half() {
    let s = MotionSettings::default();
    let mut rng = seeded_rng();

    let mut left = Drift::new(4, 100);
    assert_eq!(asteroid_horizontal_step(&mut left, &ctx(2, &s), &mut rng), 4);

    let mut right = Drift::new(4, 500);
    assert_eq!(asteroid_horizontal_step(&mut right, &ctx(2, &s), &mut rng), -4);

    let mut centre = Drift::new(4, 350);
    assert_eq!(asteroid_horizontal_step(&mut centre, &ctx(2, &s), &mut rng), -4);
}

#[test]
fn sinusoidal_drift_draws_its_phase_once() {
    let s = MotionSettings {
        drift: DriftPolicy::Sinusoidal,
        ..MotionSettings::default()
    };
    let mut rng = seeded_rng();
    let mut drift = Drift::new(4, 100);

    asteroid_horizontal_step(&mut drift, &ctx(2, &s), &mut rng);
    let phase = drift.phase;
    assert!(phase.is_some());
    asteroid_horizontal_step(&mut drift, &ctx(2, &s), &mut rng);
    assert_eq!(drift.phase, phase);
}

#[test]
fn sinusoidal_drift_with_known_phase() {
    let s = MotionSettings {
        drift: DriftPolicy::Sinusoidal,
        ..MotionSettings::default()
    };
    let mut rng = seeded_rng();
    let mut drift = Drift::new(4, 100);
    drift.phase = Some(0);
    assert_eq!(asteroid_horizontal_step(&mut drift, &ctx(2, &s), &mut rng), 5);
}

#[test]
fn jitter_stays_within_its_factor_range() {
    let s = MotionSettings {
        drift: DriftPolicy::Jitter,
        ..MotionSettings::default()
    };
    let mut rng = seeded_rng();
    let mut drift = Drift::new(4, 100);
    for _ in 0..200 {
        let dx = asteroid_horizontal_step(&mut drift, &ctx(2, &s), &mut rng);
        assert!([-3, 1, 5, 9].contains(&dx), "unexpected step {dx}");
    }
}

#[test]
fn enemy_ships_swing_wider_at_the_fast_level() {
    let s = MotionSettings::default();
    let mut rng = seeded_rng();
    let mut drift = Drift::new(3, 100);
    drift.phase = Some(0);
    assert_eq!(enemy_ship_horizontal_step(&mut drift, &ctx(1, &s), &mut rng), 5);
    assert_eq!(enemy_ship_horizontal_step(&mut drift, &ctx(5, &s), &mut rng), 5);
    assert_eq!(enemy_ship_horizontal_step(&mut drift, &ctx(9, &s), &mut rng), 5);
    assert_eq!(enemy_ship_horizontal_step(&mut drift, &ctx(10, &s), &mut rng), 7);
}

// ── plan / apply ──────────────────────────────────────────────────────────────

#[test]
fn ship_does_not_move_on_its_own() {
    let s = MotionSettings::default();
    let mut rng = seeded_rng();
    let mut ship = Entity::new(EntityKind::Ship, Rect::new(337, 470, 25, 25), 5);
    assert_eq!(plan(&mut ship, &ctx(1, &s), &mut rng), Motion::Translate { dx: 0, dy: 0 });
}

#[test]
fn player_bullet_leaves_through_the_top() {
    let s = MotionSettings::default();
    let mut rng = seeded_rng();

    let mut b = bullet_at(EntityKind::Bullet, 12);
    assert_eq!(plan(&mut b, &ctx(1, &s), &mut rng), Motion::Translate { dx: 0, dy: -12 });

    let mut b = bullet_at(EntityKind::Bullet, 11);
    assert_eq!(plan(&mut b, &ctx(1, &s), &mut rng), Motion::Remove);
}

#[test]
fn enemy_bullet_leaves_through_the_bottom() {
    let s = MotionSettings::default();
    let mut rng = seeded_rng();

    let mut b = bullet_at(EntityKind::EnemyBullet, 487);
    assert_eq!(plan(&mut b, &ctx(1, &s), &mut rng), Motion::Translate { dx: 0, dy: 12 });

    let mut b = bullet_at(EntityKind::EnemyBullet, 488);
    assert_eq!(plan(&mut b, &ctx(1, &s), &mut rng), Motion::Remove);
}

#[test]
fn asteroid_wraps_at_the_bottom() {
    let s = MotionSettings::default();
    let mut rng = seeded_rng();

    let mut a = asteroid_at(100, 495);
    assert_eq!(plan(&mut a, &ctx(1, &s), &mut rng), Motion::Translate { dx: 0, dy: 4 });

    let mut a = asteroid_at(100, 496);
    assert_eq!(plan(&mut a, &ctx(1, &s), &mut rng), Motion::Wrap);
}

#[test]
fn wrapping_recycles_the_same_body_at_the_top() {
    let mut rng = seeded_rng();
    let mut a = asteroid_at(100, 496);

    assert!(apply(&mut a, Motion::Wrap, &FIELD, &mut rng));
    assert_eq!(a.rect.y, 0);
    assert!(a.rect.x >= 0 && a.rect.right() <= FIELD.width);
    assert_eq!((a.rect.width, a.rect.height, a.speed), (32, 32, 4));
    assert!(a.is_active());

    let drift = a.drift().copied().unwrap();
    assert_eq!(drift.anchor_x, a.rect.x);
    assert!((0..4).contains(&drift.horizontal_speed));
}

#[test]
fn apply_translates_or_drops() {
    let mut rng = seeded_rng();
    let mut a = asteroid_at(100, 100);
    assert!(apply(&mut a, Motion::Translate { dx: -3, dy: 4 }, &FIELD, &mut rng));
    assert_eq!((a.rect.x, a.rect.y), (97, 104));
    assert!(!apply(&mut a, Motion::Remove, &FIELD, &mut rng));
}

// ── Enemy fire ────────────────────────────────────────────────────────────────

#[test]
fn enemy_trigger_waits_out_the_cooldown() {
    let settings = EnemyFireSettings::default();
    let mut rng = seeded_rng();
    let mut gun = Gun::default();

    assert!(!pull_enemy_trigger(&mut gun, 0, &settings, &mut rng));
    assert!(pull_enemy_trigger(&mut gun, 1, &settings, &mut rng));
    assert_eq!(gun.last_fire_ms, 1);
    assert!((250..750).contains(&gun.cooldown_ms));

    let cooldown = gun.cooldown_ms;
    assert!(!pull_enemy_trigger(&mut gun, 1 + cooldown, &settings, &mut rng));
    assert!(pull_enemy_trigger(&mut gun, 2 + cooldown, &settings, &mut rng));
}
