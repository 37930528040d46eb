//! End-to-end runs of configured worlds

use eclipse_actions::Scene;
use eclipse_ai::EnemyState;
use eclipse_runtime::*;
use eclipse_solar::SolarState;

const SAMPLE_WORLD: &str = include_str!("../../../eclipse.toml");

#[test]
fn test_sample_world_parses() {
    let config = SimConfig::from_toml_str(SAMPLE_WORLD).expect("sample world is valid");

    assert_eq!(config.entities.len(), 6);
    assert_eq!(config.triggers.len(), 2);
    assert_eq!(config.solar_triggers.len(), 1);
    assert_eq!(config.enemies.len(), 1);
    assert_eq!(config.solar.phases.len(), 3);
    assert!(!config.triggers[1].settings.trigger_once_per_entry);
}

#[test]
fn test_sample_world_opens_door_and_eclipse_gate() {
    let config = SimConfig::from_toml_str(SAMPLE_WORLD).expect("sample world is valid");
    let mut runtime = Runtime::from_config(&config).expect("world builds");

    let door = runtime.scene().find("door").expect("door exists");
    let gate = runtime.scene().find("eclipse_gate").expect("gate exists");
    assert_eq!(runtime.scene().is_active(gate), Some(false));

    // Sun for 20s and moon for 10s, then the eclipse
    let stats = runtime.run(650, config.delta_time);

    assert_eq!(runtime.sky(), SolarState::Eclipse);
    assert_eq!(runtime.scene().is_active(door), Some(true));
    assert_eq!(runtime.scene().is_active(gate), Some(true));
    assert_eq!(stats.solar_firings, 1);
    assert_eq!(stats.action_faults, 0);
    assert!(stats.activations >= 2);
    assert!(stats.state_changes >= 1);
}

#[test]
fn test_gate_stays_closed_before_eclipse() {
    let config = SimConfig::from_toml_str(SAMPLE_WORLD).expect("sample world is valid");
    let mut runtime = Runtime::from_config(&config).expect("world builds");
    let gate = runtime.scene().find("eclipse_gate").expect("gate exists");

    let stats = runtime.run(300, config.delta_time);

    assert_eq!(runtime.sky(), SolarState::Sun);
    assert_eq!(runtime.scene().is_active(gate), Some(false));
    assert_eq!(stats.solar_firings, 0);
}

#[test]
fn test_enemy_kills_and_target_respawns() {
    let config = SimConfig::from_toml_str(
        r#"
        delta_time = 0.05

        [[entities]]
        name = "player"
        tags = ["player"]
        health = { max = 20.0, respawn_delay = 1.0 }

        [[entities]]
        name = "hunter"
        position = [3.0, 0.0, 0.0]

        [[enemies]]
        entity = "hunter"
        speed = 2.0
        detection_radius = 5.0
        attack_range = 1.0
        attack_cooldown = 0.5
        attack_damage = 10.0
        "#,
    )
    .expect("valid world");
    let mut runtime = Runtime::from_config(&config).expect("world builds");

    let stats = runtime.run(100, config.delta_time);

    assert!(stats.deaths >= 1);
    assert!(stats.respawns >= 1);
    assert_ne!(runtime.enemies()[0].ai().state(), EnemyState::Patrol);
}

#[test]
fn test_unknown_enemy_target_is_rejected() {
    let err = SimConfig::from_toml_str(
        r#"
        [[entities]]
        name = "hunter"

        [[enemies]]
        entity = "hunter"
        target = "nobody"
        "#,
    )
    .unwrap_err();

    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_solar_sources_are_independent() {
    let config = SimConfig::from_toml_str(
        r#"
        [solar]
        phases = []
        sources = ["shrine"]

        [[entities]]
        name = "lamp"
        active = false

        [[solar_triggers]]
        conditions = [{ source = "sky", state = "moon" }, { source = "shrine", state = "eclipse" }]
        trigger_once = false
        actions = [{ type = "toggle_active", target = { named = "lamp" } }]
        "#,
    )
    .expect("valid world");
    let mut runtime = Runtime::from_config(&config).expect("world builds");
    let lamp = runtime.scene().find("lamp").expect("lamp exists");

    runtime.source(SKY_SOURCE).set(SolarState::Moon);
    runtime.step(0.1);
    assert_eq!(runtime.scene().is_active(lamp), Some(false));

    runtime.source("shrine").set(SolarState::Eclipse);
    runtime.step(0.1);
    assert_eq!(runtime.scene().is_active(lamp), Some(true));
    assert_eq!(runtime.stats().solar_firings, 1);
    assert!(config.undeclared_sources().is_empty());
}
