//! Day cycle driving a solar state source

use crate::state::{SolarState, SolarStateSource};
use serde::{Deserialize, Serialize};

/// One phase of the cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarPhase {
    pub state: SolarState,
    /// Seconds spent in this phase
    pub duration: f32,
}

impl SolarPhase {
    pub fn new(state: SolarState, duration: f32) -> Self {
        Self { state, duration }
    }
}

/// Loops a source through its phases on the host clock
#[derive(Debug, Clone)]
pub struct SolarCycle {
    source: SolarStateSource,
    phases: Vec<SolarPhase>,
    index: usize,
    elapsed: f32,
}

impl SolarCycle {
    /// Create a cycle and put `source` in the first phase
    pub fn new(source: SolarStateSource, phases: Vec<SolarPhase>) -> Self {
        if let Some(first) = phases.first() {
            source.set(first.state);
        }
        Self {
            source,
            phases,
            index: 0,
            elapsed: 0.0,
        }
    }

    /// Sun, moon and a short eclipse
    pub fn day_night(source: SolarStateSource, day: f32, night: f32, eclipse: f32) -> Self {
        Self::new(
            source,
            vec![
                SolarPhase::new(SolarState::Sun, day),
                SolarPhase::new(SolarState::Moon, night),
                SolarPhase::new(SolarState::Eclipse, eclipse),
            ],
        )
    }

    pub fn source(&self) -> &SolarStateSource {
        &self.source
    }

    pub fn phases(&self) -> &[SolarPhase] {
        &self.phases
    }

    /// Phase currently active
    pub fn current_phase(&self) -> Option<&SolarPhase> {
        self.phases.get(self.index)
    }

    /// Seconds spent in the current phase
    pub fn phase_elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advance by `delta` seconds, possibly crossing several phases
    pub fn update(&mut self, delta: f32) {
        let cycle_length: f32 = self.phases.iter().map(|p| p.duration.max(0.0)).sum();
        if cycle_length <= 0.0 {
            if !self.phases.is_empty() {
                log::warn!("Solar cycle has no phase with a positive duration");
            }
            return;
        }

        if !delta.is_finite() {
            log::warn!("Solar cycle ignoring non-finite delta {}", delta);
            return;
        }

        // Whole cycles end where they started
        self.elapsed = (self.elapsed + delta.max(0.0)) % cycle_length;
        loop {
            let duration = self.phases[self.index].duration.max(0.0);
            if self.elapsed < duration {
                break;
            }
            self.elapsed -= duration;
            self.index = (self.index + 1) % self.phases.len();
        }

        let state = self.phases[self.index].state;
        if self.source.set(state) {
            log::debug!("Solar state is now {}", state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_advances_phases() {
        let sky = SolarStateSource::new("sky", SolarState::Eclipse);
        let mut cycle = SolarCycle::day_night(sky.clone(), 10.0, 5.0, 1.0);
        assert_eq!(sky.get(), SolarState::Sun);

        cycle.update(9.0);
        assert_eq!(sky.get(), SolarState::Sun);

        cycle.update(2.0);
        assert_eq!(sky.get(), SolarState::Moon);
        assert!((cycle.phase_elapsed() - 1.0).abs() < 1e-5);

        cycle.update(4.5);
        assert_eq!(sky.get(), SolarState::Eclipse);

        cycle.update(1.0);
        assert_eq!(sky.get(), SolarState::Sun);
    }

    #[test]
    fn test_large_delta_wraps() {
        let sky = SolarStateSource::new("sky", SolarState::Sun);
        let mut cycle = SolarCycle::day_night(sky.clone(), 1.0, 1.0, 1.0);

        cycle.update(7.5);
        assert_eq!(sky.get(), SolarState::Moon);
    }

    #[test]
    fn test_huge_delta_reduces_to_one_cycle() {
        let sky = SolarStateSource::new("sky", SolarState::Sun);
        let mut cycle = SolarCycle::day_night(sky.clone(), 1.0, 1.0, 1.0);

        // 1e8 = 33333333 * 3 + 1
        cycle.update(1.0e8);
        assert_eq!(sky.get(), SolarState::Moon);
        assert!(cycle.phase_elapsed() < 1.0);
    }

    #[test]
    fn test_non_finite_delta_is_ignored() {
        let sky = SolarStateSource::new("sky", SolarState::Sun);
        let mut cycle = SolarCycle::day_night(sky.clone(), 1.0, 1.0, 1.0);

        cycle.update(0.5);
        cycle.update(f32::INFINITY);
        cycle.update(f32::NAN);

        assert_eq!(sky.get(), SolarState::Sun);
        assert_eq!(cycle.phase_elapsed(), 0.5);
    }

    #[test]
    fn test_zero_length_cycle_is_inert() {
        let sky = SolarStateSource::new("sky", SolarState::Sun);
        let mut cycle = SolarCycle::new(sky.clone(), vec![SolarPhase::new(SolarState::Moon, 0.0)]);

        cycle.update(1.0);
        assert_eq!(sky.get(), SolarState::Moon);
    }
}
