//! Trigger reactions: observers notified when a trigger activates or resets

use crate::events::TriggerEvent;
use crate::query::TriggerCandidate;
use crate::trigger::TriggerContext;
use eclipse_event::EventChannel;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Observer of trigger activation and reset
pub trait TriggerReaction: Send + Sync {
    /// Called after every option agreed and the trigger activated
    fn on_activated(&mut self, candidate: &TriggerCandidate, ctx: &TriggerContext<'_>);

    /// Called when `candidate` left and the trigger resets on exit
    fn on_reset(&mut self, _candidate: &TriggerCandidate, _ctx: &TriggerContext<'_>) {}
}

/// Reaction callback type
pub type ReactionCallback = Box<dyn FnMut(&TriggerCandidate, &TriggerContext<'_>) + Send + Sync>;

/// Reaction backed by closures
#[derive(Default)]
pub struct CallbackReaction {
    activated: Option<ReactionCallback>,
    reset: Option<ReactionCallback>,
}

impl CallbackReaction {
    /// Create a reaction with no callbacks
    pub fn new() -> Self {
        Self::default()
    }

    /// Set activation callback
    pub fn on_activated<F>(mut self, f: F) -> Self
    where
        F: FnMut(&TriggerCandidate, &TriggerContext<'_>) + Send + Sync + 'static,
    {
        self.activated = Some(Box::new(f));
        self
    }

    /// Set reset callback
    pub fn on_reset<F>(mut self, f: F) -> Self
    where
        F: FnMut(&TriggerCandidate, &TriggerContext<'_>) + Send + Sync + 'static,
    {
        self.reset = Some(Box::new(f));
        self
    }
}

impl TriggerReaction for CallbackReaction {
    fn on_activated(&mut self, candidate: &TriggerCandidate, ctx: &TriggerContext<'_>) {
        if let Some(callback) = self.activated.as_mut() {
            callback(candidate, ctx);
        }
    }

    fn on_reset(&mut self, candidate: &TriggerCandidate, ctx: &TriggerContext<'_>) {
        if let Some(callback) = self.reset.as_mut() {
            callback(candidate, ctx);
        }
    }
}

/// Pushes activation and reset events into a shared channel
pub struct EventReaction {
    channel: Arc<EventChannel<TriggerEvent>>,
}

impl EventReaction {
    pub fn new(channel: Arc<EventChannel<TriggerEvent>>) -> Self {
        Self { channel }
    }

    /// The channel events are sent to
    pub fn channel(&self) -> &Arc<EventChannel<TriggerEvent>> {
        &self.channel
    }
}

impl TriggerReaction for EventReaction {
    fn on_activated(&mut self, candidate: &TriggerCandidate, ctx: &TriggerContext<'_>) {
        self.channel
            .send(TriggerEvent::activated(ctx.owner, candidate.id, ctx.time.now));
    }

    fn on_reset(&mut self, candidate: &TriggerCandidate, ctx: &TriggerContext<'_>) {
        self.channel
            .send(TriggerEvent::reset(ctx.owner, candidate.id, ctx.time.now));
    }
}

/// Counts activations and resets into shared counters
#[derive(Debug, Clone, Default)]
pub struct CounterReaction {
    pub activations: Arc<AtomicU32>,
    pub resets: Arc<AtomicU32>,
}

impl CounterReaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activations(&self) -> u32 {
        self.activations.load(Ordering::SeqCst)
    }

    pub fn resets(&self) -> u32 {
        self.resets.load(Ordering::SeqCst)
    }
}

impl TriggerReaction for CounterReaction {
    fn on_activated(&mut self, _candidate: &TriggerCandidate, _ctx: &TriggerContext<'_>) {
        self.activations.fetch_add(1, Ordering::SeqCst);
    }

    fn on_reset(&mut self, _candidate: &TriggerCandidate, _ctx: &TriggerContext<'_>) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eclipse_actions::MemoryScene;
    use eclipse_core::{EntityId, FrameTime};

    #[test]
    fn test_callback_reaction() {
        let scene = MemoryScene::new();
        let ctx = TriggerContext::new(EntityId::new(1), FrameTime::at(2.0), &scene);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let mut reaction = CallbackReaction::new().on_activated(move |_, _| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        let candidate = TriggerCandidate::new(EntityId::new(7));
        TriggerReaction::on_activated(&mut reaction, &candidate, &ctx);
        TriggerReaction::on_reset(&mut reaction, &candidate, &ctx);

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_event_reaction_sends() {
        let scene = MemoryScene::new();
        let ctx = TriggerContext::new(EntityId::new(1), FrameTime::at(2.0), &scene);
        let channel = Arc::new(EventChannel::new());
        let mut reaction = EventReaction::new(channel.clone());

        let candidate = TriggerCandidate::new(EntityId::new(7));
        reaction.on_activated(&candidate, &ctx);
        reaction.on_reset(&candidate, &ctx);

        let events = channel.drain();
        assert_eq!(events.len(), 2);
        assert!(events[0].is_activation());
        assert_eq!(events[1].other_entity, EntityId::new(7));
        assert_eq!(events[1].time, 2.0);
    }
}
