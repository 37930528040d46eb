//! Solar state values

use eclipse_event::ObservableState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the sky
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolarState {
    #[default]
    Sun,
    Moon,
    Eclipse,
}

impl fmt::Display for SolarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sun => write!(f, "sun"),
            Self::Moon => write!(f, "moon"),
            Self::Eclipse => write!(f, "eclipse"),
        }
    }
}

/// Shared, observable solar state
pub type SolarStateSource = ObservableState<SolarState>;
