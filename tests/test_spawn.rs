use void_space::config::Settings;
use void_space::entities::*;
use void_space::services::PlayField;
use void_space::spawn::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

const FIELD: PlayField = PlayField::new(700, 500);

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── Placement ─────────────────────────────────────────────────────────────────

#[test]
fn ship_starts_bottom_centre() {
    let settings = Settings::default();
    assert_eq!(ship_home(&settings, &FIELD), Rect::new(337, 470, 25, 25));

    let ship = new_ship(&settings, &FIELD);
    assert_eq!(ship.kind, EntityKind::Ship);
    assert_eq!(ship.speed, 5);
    assert!(ship.is_active());
}

#[test]
fn random_x_keeps_bodies_inside() {
    let mut rng = seeded_rng();
    for _ in 0..500 {
        let x = random_x(&mut rng, &FIELD, 48);
        assert!((0..=700 - 48).contains(&x), "x = {x}");
    }
}

#[test]
fn bullet_leaves_the_ship_nose() {
    let settings = Settings::default();
    let b = new_bullet(&Rect::new(337, 470, 25, 25), &settings);
    assert_eq!(b.kind, EntityKind::Bullet);
    assert_eq!(b.rect, Rect::new(345, 462, 8, 8));
    assert_eq!(b.speed, 12);
}

#[test]
fn enemy_bullet_starts_inside_its_shooter() {
    let settings = Settings::default();
    let b = new_enemy_bullet(&Rect::new(100, 50, 25, 25), &settings);
    assert_eq!(b.kind, EntityKind::EnemyBullet);
    assert_eq!(b.rect, Rect::new(108, 58, 8, 8));
}

#[test]
fn level_one_population() {
    let settings = Settings::default();
    let mut rng = seeded_rng();
    let e = populate(&settings, &FIELD, &mut rng);

    assert_eq!(e.asteroids.len(), 1);
    assert_eq!(e.enemy_ships.len(), 1);
    assert_eq!(e.chuck_norrises.len(), 1);
    assert!(e.bullets.is_empty());
    assert!(e.enemy_bullets.is_empty());

    for body in e.asteroids.iter().chain(&e.enemy_ships).chain(&e.chuck_norrises) {
        assert_eq!(body.rect.y, 0);
        assert!(body.rect.x >= 0 && body.rect.right() <= FIELD.width);
        assert_eq!(body.drift().map(|d| d.anchor_x), Some(body.rect.x));
    }

    let chuck = &e.chuck_norrises[0];
    assert_eq!((chuck.rect.width, chuck.rect.height, chuck.speed), (48, 48, 2));
    assert_eq!(chuck.drift().map(|d| d.default_speed), Some(4));
}

// ── Respawn ───────────────────────────────────────────────────────────────────

#[test]
fn active_bodies_are_left_alone() {
    let settings = Settings::default();
    let mut rng = seeded_rng();
    let mut a = new_asteroid(&settings, &FIELD, &mut rng);
    let before = a;
    assert_eq!(try_respawn(&mut a, 99_999, 500, &FIELD, &mut rng), Respawn::Active);
    assert_eq!(a, before);
}

#[test]
fn respawn_waits_strictly_longer_than_the_delay() {
    let settings = Settings::default();
    let mut rng = seeded_rng();
    let mut a = new_asteroid(&settings, &FIELD, &mut rng);
    a.explode(1000, -32, -32);

    assert_eq!(
        try_respawn(&mut a, 1500, 500, &FIELD, &mut rng),
        Respawn::StillExploding
    );
    assert!(!a.is_active());

    assert_eq!(try_respawn(&mut a, 1501, 500, &FIELD, &mut rng), Respawn::Respawned);
    assert!(a.is_active());
    assert_eq!(a.rect.y, 0);
    assert!(a.rect.x >= 0 && a.rect.right() <= FIELD.width);
    assert_eq!(a.drift().map(|d| d.anchor_x), Some(a.rect.x));
}

#[test]
fn ship_respawns_at_home() {
    let settings = Settings::default();
    let mut ship = new_ship(&settings, &FIELD);
    ship.rect.translate(-100, -100);
    ship.explode(2000, 725, -25);

    assert_eq!(
        try_respawn_ship(&mut ship, 2500, &settings, &FIELD),
        Respawn::StillExploding
    );
    assert_eq!(
        try_respawn_ship(&mut ship, 2501, &settings, &FIELD),
        Respawn::Respawned
    );
    assert_eq!(ship, new_ship(&settings, &FIELD));
}

// ── Population steps ──────────────────────────────────────────────────────────

#[test]
fn level_two_tops_up_to_three() {
    let settings = Settings::default();
    let mut rng = seeded_rng();
    let mut e = populate(&settings, &FIELD, &mut rng);

    top_up(&mut e, 2, &settings, &FIELD, &mut rng);
    assert_eq!(e.asteroids.len(), 3);
    assert_eq!(e.enemy_ships.len(), 3);
    assert_eq!(e.chuck_norrises.len(), 1);
}

#[test]
fn levels_without_a_step_change_nothing() {
    let settings = Settings::default();
    let mut rng = seeded_rng();
    let mut e = populate(&settings, &FIELD, &mut rng);

    for level in [1, 3, 4, 9, 11] {
        top_up(&mut e, level, &settings, &FIELD, &mut rng);
    }
    assert_eq!(e.asteroids.len(), 1);
    assert_eq!(e.enemy_ships.len(), 1);
}

#[test]
fn level_ten_tops_up_to_five() {
    let settings = Settings::default();
    let mut rng = seeded_rng();
    let mut e = populate(&settings, &FIELD, &mut rng);

    top_up(&mut e, 10, &settings, &FIELD, &mut rng);
    assert_eq!(e.asteroids.len(), 5);
    assert_eq!(e.enemy_ships.len(), 5);
}

#[test]
fn top_up_never_removes() {
    let settings = Settings::default();
    let mut rng = seeded_rng();
    let mut e = populate(&settings, &FIELD, &mut rng);
    for _ in 0..6 {
        e.asteroids.push(new_asteroid(&settings, &FIELD, &mut rng));
    }

    top_up(&mut e, 2, &settings, &FIELD, &mut rng);
    assert_eq!(e.asteroids.len(), 7);
    assert_eq!(e.enemy_ships.len(), 3);
}
