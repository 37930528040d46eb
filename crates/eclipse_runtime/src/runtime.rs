//! Headless host loop
//!
//! Owns the scene and every gameplay system and steps them in a fixed
//! order. Each tick has two phases:
//!
//! 1. Mutation: clock, solar cycle, movement, health timers
//! 2. Evaluation: trigger zones, solar triggers, enemy AI
//!
//! Trigger zones therefore always see the positions of the current tick.

use crate::config::{ConfigError, EnemyConfig, SimConfig, TriggerConfig};
use eclipse_actions::{ActionRunner, MemoryScene, Scene, SceneEntity};
use eclipse_ai::{
    AgentBody, EnemyAi, EnemyState, MeleeAttack, ProximityChase, StateChanged, TargetTracker,
    WaypointPatrol,
};
use eclipse_combat::{AliveOption, DamageReaction, Health, HealthEvent, HealthRegistry};
use eclipse_core::{Capability, Clock, EntityId, FrameTime};
use eclipse_event::EventChannel;
use eclipse_solar::{
    SolarCycle, SolarPhase, SolarState, SolarStateActionTrigger, SolarStateCondition,
    SolarStateSource,
};
use eclipse_triggers::{
    GenericTrigger, PointQuery, TriggerEvent, TriggerEventType, TriggerRegion, TriggerSystem,
};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Name of the solar source driven by the cycle
pub const SKY_SOURCE: &str = "sky";

/// Counters collected while running
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    pub ticks: u64,
    pub activations: u32,
    pub solar_firings: u32,
    pub action_faults: u32,
    pub deaths: u32,
    pub respawns: u32,
    pub state_changes: u32,
}

/// An enemy with its kinematic collaborators
pub struct EnemyUnit {
    entity: EntityId,
    target_entity: EntityId,
    ai: EnemyAi,
    body: AgentBody,
    tracker: TargetTracker,
}

impl EnemyUnit {
    pub fn new(
        ai: EnemyAi,
        body: AgentBody,
        tracker: TargetTracker,
        target_entity: EntityId,
    ) -> Self {
        Self {
            entity: ai.owner(),
            target_entity,
            ai,
            body,
            tracker,
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn ai(&self) -> &EnemyAi {
        &self.ai
    }

    pub fn ai_mut(&mut self) -> &mut EnemyAi {
        &mut self.ai
    }

    pub fn body(&self) -> &AgentBody {
        &self.body
    }
}

impl fmt::Debug for EnemyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnemyUnit")
            .field("entity", &self.entity)
            .field("target_entity", &self.target_entity)
            .field("state", &self.ai.state())
            .field("position", &self.body.position())
            .finish()
    }
}

/// The simulated world
pub struct Runtime {
    clock: Clock,
    scene: MemoryScene,
    health: HealthRegistry,
    sources: BTreeMap<String, SolarStateSource>,
    cycle: Option<SolarCycle>,
    triggers: TriggerSystem,
    solar_triggers: Vec<SolarStateActionTrigger>,
    enemies: Vec<EnemyUnit>,
    ai_changes: Arc<EventChannel<(EntityId, StateChanged)>>,
    stats: RuntimeStats,
}

impl Runtime {
    /// Create an empty world with a sunlit sky and no cycle
    pub fn new() -> Self {
        let mut sources = BTreeMap::new();
        sources.insert(
            SKY_SOURCE.to_string(),
            SolarStateSource::new(SKY_SOURCE, SolarState::Sun),
        );
        Self {
            clock: Clock::new(),
            scene: MemoryScene::new(),
            health: HealthRegistry::new(),
            sources,
            cycle: None,
            triggers: TriggerSystem::new(),
            solar_triggers: Vec::new(),
            enemies: Vec::new(),
            ai_changes: Arc::new(EventChannel::new()),
            stats: RuntimeStats::default(),
        }
    }

    /// Build the world a config describes
    pub fn from_config(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut runtime = Self::new();

        if !config.solar.phases.is_empty() {
            runtime.set_solar_cycle(config.solar.phases.clone());
        }
        for name in &config.solar.sources {
            runtime.source(name);
        }
        for name in config.undeclared_sources() {
            log::warn!(
                "Solar source '{}' is not declared in solar.sources; it stays {} unless set",
                name,
                SolarState::default()
            );
        }

        for entity in &config.entities {
            let health = entity.health.clone().map(Health::from);
            runtime.spawn(entity.entity.clone(), health);
        }

        for trigger in &config.triggers {
            let trigger = runtime.build_trigger(trigger)?;
            runtime.add_trigger(trigger);
        }

        for solar in &config.solar_triggers {
            if solar.conditions.is_empty() {
                log::warn!("Solar trigger without conditions will never fire");
            }
            let conditions = solar
                .conditions
                .iter()
                .map(|c| SolarStateCondition::new(runtime.source(&c.source), c.state))
                .collect();
            let mut trigger = SolarStateActionTrigger::new(conditions)
                .with_trigger_once(solar.trigger_once)
                .with_runner(ActionRunner::from_kinds(solar.actions.clone()));
            if let Some(owner) = &solar.owner {
                trigger = trigger.with_owner(runtime.require(owner)?);
            }
            runtime.add_solar_trigger(trigger);
        }

        for enemy in &config.enemies {
            let unit = runtime.build_enemy(enemy)?;
            runtime.add_enemy(unit);
        }

        log::info!(
            "World built: {} entities, {} triggers, {} solar triggers, {} enemies",
            runtime.scene.len(),
            runtime.triggers.trigger_count(),
            runtime.solar_triggers.len(),
            runtime.enemies.len()
        );
        Ok(runtime)
    }

    /// Add an entity, with health if given
    pub fn spawn(&mut self, mut entity: SceneEntity, health: Option<Health>) -> EntityId {
        if health.is_some() {
            entity.capabilities.insert(Capability::Health);
        }
        let name = entity.name.clone();
        let id = self.scene.spawn(entity);
        if let Some(health) = health {
            self.health.insert(id, health);
        }
        log::debug!("Spawned '{}' as {}", name, id);
        id
    }

    /// Get a solar source by name, creating it in the sun state
    pub fn source(&mut self, name: &str) -> SolarStateSource {
        self.sources
            .entry(name.to_string())
            .or_insert_with(|| SolarStateSource::new(name, SolarState::Sun))
            .clone()
    }

    /// Drive the sky source with a phase cycle
    pub fn set_solar_cycle(&mut self, phases: Vec<SolarPhase>) {
        let sky = self.source(SKY_SOURCE);
        self.cycle = Some(SolarCycle::new(sky, phases));
    }

    pub fn add_trigger(&mut self, trigger: GenericTrigger) {
        self.triggers.register(trigger);
    }

    pub fn add_solar_trigger(&mut self, trigger: SolarStateActionTrigger) {
        self.solar_triggers.push(trigger);
    }

    /// Add an enemy; its state changes are logged each tick
    pub fn add_enemy(&mut self, mut unit: EnemyUnit) {
        let changes = self.ai_changes.clone();
        let entity = unit.entity;
        unit.ai
            .on_state_changed(move |change| changes.send((entity, *change)));
        self.enemies.push(unit);
    }

    pub fn scene(&self) -> &MemoryScene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut MemoryScene {
        &mut self.scene
    }

    pub fn health(&self) -> &HealthRegistry {
        &self.health
    }

    pub fn triggers(&self) -> &TriggerSystem {
        &self.triggers
    }

    pub fn triggers_mut(&mut self) -> &mut TriggerSystem {
        &mut self.triggers
    }

    pub fn solar_triggers(&self) -> &[SolarStateActionTrigger] {
        &self.solar_triggers
    }

    pub fn enemies(&self) -> &[EnemyUnit] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [EnemyUnit] {
        &mut self.enemies
    }

    pub fn stats(&self) -> RuntimeStats {
        self.stats
    }

    /// Seconds simulated so far
    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    /// Current state of the sky
    pub fn sky(&self) -> SolarState {
        self.sources
            .get(SKY_SOURCE)
            .map(SolarStateSource::get)
            .unwrap_or_default()
    }

    /// Advance one tick
    pub fn step(&mut self, delta_time: f32) -> FrameTime {
        let time = self.clock.advance(delta_time);
        self.stats.ticks += 1;

        // Mutation phase
        if let Some(cycle) = self.cycle.as_mut() {
            cycle.update(delta_time);
        }
        self.scene.integrate(delta_time);
        for unit in &self.enemies {
            let position = unit.body.step(delta_time);
            if let Err(err) = self.scene.set_position(unit.entity, position) {
                log::debug!("Enemy {} has no scene entity: {}", unit.entity, err);
            }
        }
        self.health.update(delta_time);
        self.apply_health_events();

        // Evaluation phase
        let query = PointQuery::from_scene(&self.scene);
        self.triggers.update(time, &query, &mut self.scene);

        for trigger in &mut self.solar_triggers {
            if let Some(report) = trigger.process(&mut self.scene) {
                self.stats.solar_firings += 1;
                self.stats.action_faults += report.faults.len() as u32;
                for fault in &report.faults {
                    log::warn!(
                        "Solar trigger action {} ('{}') failed: {}",
                        fault.index,
                        fault.action,
                        fault.error
                    );
                }
                let sky = self.sources.get(SKY_SOURCE).map(SolarStateSource::get);
                log::info!("Solar trigger fired under {}", sky.unwrap_or_default());
            }
        }

        for unit in &mut self.enemies {
            unit.tracker.set(target_position(&self.scene, &self.health, unit.target_entity));
            unit.ai.tick(delta_time);
        }

        self.apply_health_events();
        self.log_trigger_events();
        self.log_ai_changes();
        time
    }

    /// Run `ticks` fixed steps
    pub fn run(&mut self, ticks: u32, delta_time: f32) -> RuntimeStats {
        for _ in 0..ticks {
            self.step(delta_time);
        }
        self.stats
    }

    fn require(&self, name: &str) -> Result<EntityId, ConfigError> {
        self.scene
            .find(name)
            .ok_or_else(|| ConfigError::Invalid(format!("unknown entity '{}'", name)))
    }

    fn build_trigger(&self, config: &TriggerConfig) -> Result<GenericTrigger, ConfigError> {
        let owner = self.require(&config.owner)?;
        let position = config
            .position
            .or_else(|| self.scene.position(owner))
            .unwrap_or_default();
        let region = TriggerRegion::new(config.volume.clone()).at(position);

        let mut trigger = GenericTrigger::new(owner, region).with_settings(config.settings.clone());
        if let Some(filter) = &config.filter {
            trigger = trigger.with_option(filter.clone());
        }
        if config.require_alive {
            trigger = trigger.with_option(AliveOption::new(self.health.clone()));
        }
        if let Some(amount) = config.damage {
            trigger = trigger.with_reaction(DamageReaction::new(self.health.clone(), amount));
        }
        if !config.actions.is_empty() {
            trigger = trigger.with_runner(
                ActionRunner::from_kinds(config.actions.clone())
                    .with_stop_on_error(config.stop_on_error),
            );
        }
        Ok(trigger)
    }

    fn build_enemy(&self, config: &EnemyConfig) -> Result<EnemyUnit, ConfigError> {
        let entity = self.require(&config.entity)?;
        let target = self.require(&config.target)?;
        let start = self.scene.position(entity).unwrap_or_default();

        let body = AgentBody::new(start, config.speed);
        let tracker = TargetTracker::new();

        let registry = self.health.clone();
        let damage = config.attack_damage;
        let attack = MeleeAttack::new(
            body.clone(),
            tracker.clone(),
            config.attack_range,
            config.attack_cooldown,
        )
        .on_hit(move || {
            if let Err(err) = registry.apply_damage(target, damage, Some(entity)) {
                log::warn!("Enemy {} hit on {} skipped: {}", entity, target, err);
            }
        });

        let ai = EnemyAi::new(entity, config.ai.clone())
            .with_patrol(WaypointPatrol::new(body.clone(), config.waypoints.clone()))
            .with_chase(ProximityChase::new(
                body.clone(),
                tracker.clone(),
                config.detection_radius,
            ))
            .with_attack(attack)
            .with_movement(body.clone());

        Ok(EnemyUnit::new(ai, body, tracker, target))
    }

    fn apply_health_events(&mut self) {
        for event in self.health.drain_events() {
            match event {
                HealthEvent::Death { entity, killer } => {
                    self.stats.deaths += 1;
                    match killer {
                        Some(killer) => log::info!("Entity {} killed by {}", entity, killer),
                        None => log::info!("Entity {} died", entity),
                    }
                    if let Err(err) = self.scene.set_active(entity, false) {
                        log::warn!("Could not deactivate dead entity {}: {}", entity, err);
                    }
                }
                HealthEvent::Respawned { entity, .. } => {
                    self.stats.respawns += 1;
                    log::info!("Entity {} respawned", entity);
                    if let Err(err) = self.scene.set_active(entity, true) {
                        log::warn!("Could not reactivate entity {}: {}", entity, err);
                    }
                }
                HealthEvent::DamageTaken {
                    entity,
                    amount,
                    new_health,
                    ..
                } => {
                    log::debug!("Entity {} took {} damage ({} left)", entity, amount, new_health);
                }
                HealthEvent::Healed {
                    entity, amount, ..
                } => {
                    log::debug!("Entity {} healed {}", entity, amount);
                }
            }
        }
    }

    fn log_trigger_events(&mut self) {
        for event in self.triggers.drain_events() {
            let TriggerEvent {
                event_type,
                trigger_entity,
                other_entity,
                ..
            } = event;
            match event_type {
                TriggerEventType::Enter => {
                    log::info!("Entity {} entered trigger {}", other_entity, trigger_entity)
                }
                TriggerEventType::Exit => {
                    log::info!("Entity {} exited trigger {}", other_entity, trigger_entity)
                }
                TriggerEventType::Activated => {
                    self.stats.activations += 1;
                    log::info!("Entity {} activated trigger {}", other_entity, trigger_entity)
                }
                TriggerEventType::Reset => {
                    log::debug!("Trigger {} reset for {}", trigger_entity, other_entity)
                }
            }
        }
    }

    fn log_ai_changes(&mut self) {
        for (entity, change) in self.ai_changes.drain() {
            self.stats.state_changes += 1;
            if change.new == EnemyState::Attack {
                log::info!("Enemy {} attacks", entity);
            } else {
                log::info!("Enemy {}: {} -> {}", entity, change.old, change.new);
            }
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("elapsed", &self.clock.elapsed())
            .field("entities", &self.scene.len())
            .field("triggers", &self.triggers.trigger_count())
            .field("solar_triggers", &self.solar_triggers.len())
            .field("enemies", &self.enemies)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Position of a hunted entity, if it is active and not dead
fn target_position(
    scene: &MemoryScene,
    health: &HealthRegistry,
    target: EntityId,
) -> Option<[f32; 3]> {
    if scene.is_active(target) != Some(true) || health.is_alive(target) == Some(false) {
        return None;
    }
    scene.position(target)
}
