//! Health-aware trigger options, reactions and actions

use crate::registry::HealthRegistry;
use eclipse_actions::{Action, ActionContext, Target};
use eclipse_core::Result;
use eclipse_triggers::{TriggerCandidate, TriggerContext, TriggerOption, TriggerReaction};

/// Passes only for candidates that have health and are alive
#[derive(Debug, Clone)]
pub struct AliveOption {
    registry: HealthRegistry,
}

impl AliveOption {
    pub fn new(registry: HealthRegistry) -> Self {
        Self { registry }
    }
}

impl TriggerOption for AliveOption {
    fn should_activate(&self, candidate: &TriggerCandidate, _ctx: &TriggerContext<'_>) -> bool {
        self.registry.is_alive(candidate.id).unwrap_or(false)
    }
}

/// Damages the candidate on activation
#[derive(Debug, Clone)]
pub struct DamageReaction {
    registry: HealthRegistry,
    amount: f32,
}

impl DamageReaction {
    pub fn new(registry: HealthRegistry, amount: f32) -> Self {
        Self { registry, amount }
    }
}

impl TriggerReaction for DamageReaction {
    fn on_activated(&mut self, candidate: &TriggerCandidate, ctx: &TriggerContext<'_>) {
        if let Err(err) = self
            .registry
            .apply_damage(candidate.id, self.amount, Some(ctx.owner))
        {
            log::warn!("Damage from {} skipped: {}", ctx.owner, err);
        }
    }
}

/// Action that damages its target
#[derive(Debug, Clone)]
pub struct DamageAction {
    registry: HealthRegistry,
    target: Option<Target>,
    amount: f32,
}

impl DamageAction {
    pub fn new(registry: HealthRegistry, target: impl Into<Target>, amount: f32) -> Self {
        Self {
            registry,
            target: Some(target.into()),
            amount,
        }
    }

    /// Damage whoever instigated the run
    pub fn instigator(registry: HealthRegistry, amount: f32) -> Self {
        Self::new(registry, Target::Instigator, amount)
    }
}

impl Action for DamageAction {
    fn name(&self) -> &str {
        "damage"
    }

    fn execute(&self, ctx: &mut ActionContext<'_>) -> Result<()> {
        let Some(entity) = ctx.resolve(self.target.as_ref(), self.name())? else {
            return Ok(());
        };
        let source = ctx.instigator.filter(|instigator| *instigator != entity);
        self.registry.apply_damage(entity, self.amount, source)?;
        Ok(())
    }
}
