//! Spatial queries that feed triggers their candidates

use crate::volume::TriggerRegion;
use eclipse_actions::MemoryScene;
use eclipse_core::{EntityId, FrameTime};
use std::collections::HashSet;

/// An entity that may activate a trigger
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerCandidate {
    /// Entity ID
    pub id: EntityId,
    /// World position
    pub position: [f32; 3],
    /// Collision layers
    pub layers: u32,
    /// Entity tags
    pub tags: HashSet<String>,
}

impl TriggerCandidate {
    /// Create a candidate on all layers at the origin
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            position: [0.0, 0.0, 0.0],
            layers: 0xFFFFFFFF,
            tags: HashSet::new(),
        }
    }

    /// Set position
    pub fn with_position(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }

    /// Set layers
    pub fn with_layers(mut self, layers: u32) -> Self {
        self.layers = layers;
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Check for a tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// Supplies the candidates currently overlapping a region
pub trait SpatialQuery {
    /// Candidates overlapping `region` at `time`
    fn overlapping(&self, region: &TriggerRegion, time: FrameTime) -> Vec<TriggerCandidate>;
}

/// Point-cloud query: a candidate overlaps when its position is inside the region
#[derive(Debug, Clone, Default)]
pub struct PointQuery {
    candidates: Vec<TriggerCandidate>,
}

impl PointQuery {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from candidates
    pub fn with_candidates<I: IntoIterator<Item = TriggerCandidate>>(candidates: I) -> Self {
        Self {
            candidates: candidates.into_iter().collect(),
        }
    }

    /// Snapshot the active entities of a scene
    pub fn from_scene(scene: &MemoryScene) -> Self {
        let candidates = scene
            .iter()
            .filter(|entity| entity.active)
            .map(|entity| TriggerCandidate {
                id: entity.id,
                position: entity.position,
                layers: entity.layers,
                tags: entity.tags.clone(),
            })
            .collect();
        Self { candidates }
    }

    /// Add a candidate
    pub fn push(&mut self, candidate: TriggerCandidate) {
        self.candidates.push(candidate);
    }

    /// All candidates, inside a region or not
    pub fn candidates(&self) -> &[TriggerCandidate] {
        &self.candidates
    }
}

impl SpatialQuery for PointQuery {
    fn overlapping(&self, region: &TriggerRegion, _time: FrameTime) -> Vec<TriggerCandidate> {
        self.candidates
            .iter()
            .filter(|candidate| region.contains(candidate.position))
            .cloned()
            .collect()
    }
}
