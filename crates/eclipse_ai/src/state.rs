//! Enemy states

use serde::{Deserialize, Serialize};
use std::fmt;

/// What an enemy is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyState {
    #[default]
    Idle,
    Patrol,
    Chase,
    Attack,
}

impl fmt::Display for EnemyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Patrol => write!(f, "patrol"),
            Self::Chase => write!(f, "chase"),
            Self::Attack => write!(f, "attack"),
        }
    }
}

/// Notification sent after a state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChanged {
    pub old: EnemyState,
    pub new: EnemyState,
}
