use std::path::Path;

use void_space::config::*;
use void_space::error::ConfigError;

fn parse(text: &str) -> Result<Settings, ConfigError> {
    Settings::from_toml_str(text, Path::new("test.toml"))
}

fn invalid_key(result: Result<Settings, ConfigError>) -> &'static str {
    match result {
        Err(ConfigError::Invalid { key, .. }) => key,
        other => panic!("expected an invalid-setting error, got {other:?}"),
    }
}

// ── Defaults ──────────────────────────────────────────────────────────────────

#[test]
fn defaults_match_the_reference_table() {
    let s = Settings::default();
    assert_eq!((s.field.width, s.field.height), (700, 500));
    assert_eq!(s.lives.initial_ships, 5);
    assert_eq!(s.ammo.initial, 100);
    assert_eq!(s.ammo.bullet_gain_per_level, 75);
    assert_eq!(s.scoring.asteroid_points, 500);
    assert_eq!(s.scoring.enemy_ship_points, 1000);
    assert_eq!(s.scoring.targets_to_next_level, 10);
    assert_eq!(s.scoring.level_mode, LevelMode::Targets);
    assert_eq!(s.motion.drift, DriftPolicy::SideSteer);
    assert_eq!(s.timing.get_ready_ms, 1500);
    assert_eq!(s.timing.game_over_ms, 3000);
    assert_eq!(
        s.population.asteroid_steps,
        vec![
            PopulationStep { level: 2, count: 3 },
            PopulationStep { level: 10, count: 5 },
        ]
    );
    assert!(s.validate().is_ok());
}

#[test]
fn empty_file_means_defaults() {
    assert_eq!(parse("").unwrap(), Settings::default());
}

#[test]
fn bundled_settings_file_matches_defaults() {
    let s = Settings::load(Path::new("assets/void_space.toml")).unwrap();
    assert_eq!(s, Settings::default());
}

// ── Partial overrides ─────────────────────────────────────────────────────────

#[test]
fn partial_sections_keep_the_other_defaults() {
    let s = parse(
        r#"
        [ammo]
        initial = 250

        [motion]
        drift = "sinusoidal"
        "#,
    )
    .unwrap();

    assert_eq!(s.ammo.initial, 250);
    assert_eq!(s.ammo.bullets_per_life, 50);
    assert_eq!(s.motion.drift, DriftPolicy::Sinusoidal);
    assert_eq!(s.motion.level_to_move_asteroids, 2);
    assert_eq!(s.lives, LivesSettings::default());
}

#[test]
fn level_mode_and_population_steps_parse() {
    let s = parse(
        r#"
        [scoring]
        level_mode = "points"
        points_to_next_level = 2500

        [population]
        enemy_ship_steps = [{ level = 3, count = 4 }]
        "#,
    )
    .unwrap();

    assert_eq!(s.scoring.level_mode, LevelMode::Points);
    assert_eq!(s.scoring.points_to_next_level, 2500);
    assert_eq!(s.population.enemy_ship_steps, vec![PopulationStep { level: 3, count: 4 }]);
    assert_eq!(s.population.asteroid_steps.len(), 2);
}

#[test]
fn unlimited_ammo_flag() {
    let s = parse("[ammo]\nlimited = false\n").unwrap();
    assert!(!s.ammo.limited);
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[test]
fn unknown_drift_policy_is_a_parse_error() {
    let err = parse("[motion]\ndrift = \"zigzag\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("test.toml"));
}

#[test]
fn wrong_value_type_is_a_parse_error() {
    let err = parse("[lives]\ninitial_ships = \"many\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn zero_level_divisors_are_rejected() {
    assert_eq!(
        invalid_key(parse("[scoring]\ntargets_to_next_level = 0\n")),
        "scoring.targets_to_next_level"
    );
    assert_eq!(
        invalid_key(parse("[scoring]\npoints_to_next_level = 0\n")),
        "scoring.points_to_next_level"
    );
    assert_eq!(
        invalid_key(parse("[lives]\nlevels_for_extra_ships = 0\n")),
        "lives.levels_for_extra_ships"
    );
    assert_eq!(
        invalid_key(parse("[ammo]\nlevels_for_gaining_bullets = 0\n")),
        "ammo.levels_for_gaining_bullets"
    );
    assert_eq!(
        invalid_key(parse("[ammo]\nbullets_per_second = 0\n")),
        "ammo.bullets_per_second"
    );
}

#[test]
fn empty_enemy_cooldown_range_is_rejected() {
    let text = "[enemy_fire]\nmin_cooldown_ms = 500\nmax_cooldown_ms = 500\n";
    assert_eq!(invalid_key(parse(text)), "enemy_fire");
}

#[test]
fn body_larger_than_the_field_is_rejected() {
    let text = "[bodies]\nasteroid = { width = 800, height = 32, speed = 4 }\n";
    assert_eq!(invalid_key(parse(text)), "bodies.asteroid");
}

#[test]
fn motionless_body_is_rejected() {
    let text = "[bodies]\nenemy_ship = { width = 25, height = 25, speed = 0 }\n";
    assert_eq!(invalid_key(parse(text)), "bodies.enemy_ship");
}

#[test]
fn empty_field_is_rejected() {
    assert_eq!(invalid_key(parse("[field]\nwidth = 0\n")), "field");
}

#[test]
fn speed_levels_must_be_ordered() {
    let text = "[motion]\nasteroid_2x_level = 12\nasteroid_3x_level = 10\n";
    assert_eq!(invalid_key(parse(text)), "motion.asteroid_2x_level");
}

#[test]
fn invalid_error_names_the_key() {
    let err = parse("[scoring]\ntargets_to_next_level = 0\n").unwrap_err();
    assert!(err.to_string().contains("scoring.targets_to_next_level"));
}

// ── Loading from disk ─────────────────────────────────────────────────────────

#[test]
fn missing_file_is_an_io_error_for_load() {
    let err = Settings::load(Path::new("assets/does_not_exist.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let s = Settings::load_or_default(Path::new("assets/does_not_exist.toml")).unwrap();
    assert_eq!(s, Settings::default());
}
