use serde::{Deserialize, Serialize};

use super::catalog::PrizeCatalog;
use super::config::WheelConfig;

/// A past spin, supplied by the caller most-recent-first.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpinHistoryEntry {
    pub prize_id: String,
    pub timestamp_ms: i64,
}

/// Derived per call, never stored.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct EligibilityState {
    /// `None` means the player may spin right away.
    pub cooldown_ends_at_ms: Option<i64>,
    pub spins_since_ultra_rare: u32,
    pub ultra_rare_eligible: bool,
}

impl EligibilityState {
    pub fn can_spin(&self, now_ms: i64) -> bool {
        match self.cooldown_ends_at_ms {
            Some(ends_at) => now_ms >= ends_at,
            None => true,
        }
    }

    /// Milliseconds until the next spin is allowed, zero when eligible.
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        match self.cooldown_ends_at_ms {
            Some(ends_at) => (ends_at - now_ms).max(0),
            None => 0,
        }
    }
}

/// Works out whether a player may spin at `now_ms` and whether ultra-rare
/// prizes are unlocked for that spin.
///
/// A `now_ms` earlier than the last spin (clock skew) stays inside the
/// cooldown: the end instant is never before the last spin itself.
pub fn compute_eligibility(
    now_ms: i64,
    last_spin_ms: Option<i64>,
    history: &[SpinHistoryEntry],
    catalog: &PrizeCatalog,
    config: &WheelConfig,
) -> EligibilityState {
    let Some(last_spin_ms) = last_spin_ms else {
        // A player who has never spun starts at zero.
        return EligibilityState {
            cooldown_ends_at_ms: None,
            spins_since_ultra_rare: 0,
            ultra_rare_eligible: config.ultra_rare_threshold == 0,
        };
    };

    let cooldown_ms = i64::try_from(config.cooldown_ms).unwrap_or(i64::MAX);
    let cooldown_ends_at_ms = last_spin_ms.saturating_add(cooldown_ms);

    let spins_since_ultra_rare = spins_since_ultra_rare(history, catalog, config);

    log::debug!(
        "eligibility: now={} ends_at={} streak={} threshold={}",
        now_ms,
        cooldown_ends_at_ms,
        spins_since_ultra_rare,
        config.ultra_rare_threshold
    );

    EligibilityState {
        cooldown_ends_at_ms: Some(cooldown_ends_at_ms),
        spins_since_ultra_rare,
        ultra_rare_eligible: spins_since_ultra_rare >= config.ultra_rare_threshold,
    }
}

/// Counts consecutive non-ultra-rare entries from the most recent backward.
/// Ids no longer in the catalog count as ordinary spins.
pub fn spins_since_ultra_rare(
    history: &[SpinHistoryEntry],
    catalog: &PrizeCatalog,
    config: &WheelConfig,
) -> u32 {
    let streak = history
        .iter()
        .take_while(|entry| !(catalog.contains(&entry.prize_id) && config.is_ultra_rare(&entry.prize_id)))
        .count();
    u32::try_from(streak).unwrap_or(u32::MAX)
}
