//! Prize wheel engine: cooldown gate, weighted draw with ultra-rare
//! suppression, and the rotation needed to land on the drawn segment.
//!
//! Everything here is synchronous and side-effect free. Time comes in as
//! `now_ms` and randomness through [`random::UniformSource`], so callers own
//! persistence, notifications and the countdown tick.

pub mod catalog;
pub mod config;
pub mod countdown;
pub mod eligibility;
pub mod error;
pub mod random;
pub mod rotation;
pub mod selector;
pub mod spin;

use serde::{Serialize, Deserialize};

pub use catalog::{PrizeCatalog, PrizeDefinition};
pub use config::WheelConfig;
pub use countdown::{format_countdown, Countdown, CooldownTimer};
pub use eligibility::{compute_eligibility, EligibilityState, SpinHistoryEntry};
pub use error::WheelError;
pub use random::{SequenceSource, UniformSource};
pub use rotation::{compute_rotation_target, RotationTarget};
pub use selector::{select_prize, SelectionResult};
pub use spin::{attempt_spin, PlayerSpinState, SpinAttempt};

// === API Types ===

#[derive(Debug, Serialize, Deserialize)]
pub struct WheelSpinRequest {
    /// The client's accumulated wheel angle, so the next spin continues from it.
    #[serde(default)]
    pub current_angle_deg: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WheelSpinResponse {
    pub success: bool,
    pub message: Option<String>,
    pub prize: Option<PrizeDefinition>,
    pub segment_index: Option<usize>,
    pub rotation: Option<RotationTarget>,
    pub retry_after_ms: Option<i64>,
    pub countdown: Option<Countdown>,
    pub spin_duration_ms: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WheelCooldownResponse {
    pub in_cooldown: bool,
    pub remaining_ms: i64,
    pub cooldown_ends_at_ms: Option<i64>,
    pub countdown: Option<Countdown>,
    pub spins_since_ultra_rare: u32,
    pub ultra_rare_eligible: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WheelCatalogResponse {
    pub segment_count: usize,
    pub prizes: Vec<PrizeDefinition>,
    pub cooldown_ms: u64,
    pub spin_duration_ms: u64,
}

/// A persisted spin, keyed by player.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpinRecord {
    pub player_id: String,
    pub prize_id: String,
    pub timestamp_ms: i64,
    pub is_rare: bool,
}

impl SpinRecord {
    pub fn to_history_entry(&self) -> SpinHistoryEntry {
        SpinHistoryEntry {
            prize_id: self.prize_id.clone(),
            timestamp_ms: self.timestamp_ms,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WheelHistoryResponse {
    pub player_id: String,
    pub records: Vec<SpinRecord>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub player_id: String,
    pub rare_wins: u64,
}
