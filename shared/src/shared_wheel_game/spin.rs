use serde::{Deserialize, Serialize};

use super::catalog::PrizeCatalog;
use super::config::WheelConfig;
use super::eligibility::{compute_eligibility, EligibilityState, SpinHistoryEntry};
use super::error::WheelError;
use super::random::UniformSource;
use super::rotation::{check_angle, compute_rotation_target, RotationTarget};
use super::selector::{select_prize, SelectionResult};

/// Everything the engine needs to know about one player for one attempt.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PlayerSpinState {
    pub last_spin_ms: Option<i64>,
    /// Most recent first.
    pub history: Vec<SpinHistoryEntry>,
    pub current_angle_deg: f64,
}

impl PlayerSpinState {
    /// Takes the last spin time from the head of a most-recent-first history.
    pub fn from_history(history: Vec<SpinHistoryEntry>, current_angle_deg: f64) -> Self {
        Self {
            last_spin_ms: history.first().map(|entry| entry.timestamp_ms),
            history,
            current_angle_deg,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SpinAttempt {
    Denied {
        retry_after_ms: i64,
        eligibility: EligibilityState,
    },
    Granted {
        result: SelectionResult,
        rotation: RotationTarget,
        new_history_entry: SpinHistoryEntry,
        eligibility: EligibilityState,
    },
}

impl SpinAttempt {
    pub fn is_allowed(&self) -> bool {
        matches!(self, SpinAttempt::Granted { .. })
    }
}

/// Gate, draw and aim in one call.
///
/// A denied attempt or an out-of-range angle consumes no randomness. Nothing is persisted: the caller
/// stores `new_history_entry` and restarts its own countdown.
pub fn attempt_spin<R: UniformSource + ?Sized>(
    now_ms: i64,
    state: &PlayerSpinState,
    catalog: &PrizeCatalog,
    config: &WheelConfig,
    rng: &mut R,
) -> Result<SpinAttempt, WheelError> {
    check_angle(state.current_angle_deg)?;

    let eligibility = compute_eligibility(now_ms, state.last_spin_ms, &state.history, catalog, config);

    if !eligibility.can_spin(now_ms) {
        return Ok(SpinAttempt::Denied {
            retry_after_ms: eligibility.remaining_ms(now_ms),
            eligibility,
        });
    }

    let result = select_prize(catalog, config, eligibility.ultra_rare_eligible, rng)?;
    let rotation = compute_rotation_target(
        state.current_angle_deg,
        result.chosen_index,
        catalog.segment_count(),
        config.min_full_revolutions,
        config.jitter_fraction,
        rng,
    )?;

    let new_history_entry = SpinHistoryEntry {
        prize_id: result.chosen_prize.id.clone(),
        timestamp_ms: now_ms,
    };

    Ok(SpinAttempt::Granted {
        result,
        rotation,
        new_history_entry,
        eligibility,
    })
}
