/// Cooldown between spins for a single player.
pub const WHEEL_SPIN_COOLDOWN_MS: u64 = 24 * 60 * 60 * 1000;
/// Non-ultra-rare spins a player needs before ultra-rare prizes unlock again.
pub const ULTRA_RARE_THRESHOLD: u32 = 60;
pub const DEFAULT_ULTRA_RARE_IDS: [&str; 2] = ["vehicle", "clothing_1"];

pub const MIN_FULL_REVOLUTIONS: u32 = 8;
/// Share of a segment span the stop point may wander from the segment center.
pub const JITTER_FRACTION: f64 = 0.6;
pub const SPIN_DURATION_MS: u64 = 6000;

/// Suggested interval for the client-side cooldown tick.
pub const COUNTDOWN_TICK_MS: u64 = 1000;
/// Default number of history records handed to the engine per attempt.
pub const HISTORY_LIMIT: usize = 100;

pub const COOLDOWN_MESSAGE: &str = "The wheel is cooling down. Come back later.";
pub const SPIN_IN_PROGRESS_ERROR: &str = "A spin is already in progress for this player.";
