use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use rand::rngs::OsRng;
use serde::Deserialize;
use shared::constants::COOLDOWN_MESSAGE;
use shared::shared_wheel_game::*;
use shared::validation::validate_player_id;
use tracing::{error, info, warn};

use crate::error::Error;
use crate::AppState;

const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(get_catalog))
        .route("/leaderboard", get(get_leaderboard))
        .route("/:player_id/spin", post(spin_wheel))
        .route("/:player_id/cooldown", get(get_wheel_cooldown))
        .route("/:player_id/history", get(get_history).delete(reset_history))
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// Marks a player's spin as in flight until dropped.
pub struct SpinGuard {
    in_flight: Arc<Mutex<HashSet<String>>>,
    player_id: String,
}

impl SpinGuard {
    pub fn acquire(in_flight: &Arc<Mutex<HashSet<String>>>, player_id: &str) -> Option<Self> {
        let mut players = in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !players.insert(player_id.to_string()) {
            return None;
        }
        Some(Self {
            in_flight: in_flight.clone(),
            player_id: player_id.to_string(),
        })
    }
}

impl Drop for SpinGuard {
    fn drop(&mut self) {
        let mut players = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        players.remove(&self.player_id);
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn check_player(player_id: &str) -> Result<(), Error> {
    validate_player_id(player_id).map_err(|_| Error::InvalidPlayer(player_id.to_string()))
}

async fn player_state(state: &AppState, player_id: &str, current_angle_deg: f64) -> Result<PlayerSpinState, Error> {
    let history = state
        .store
        .recent(player_id, state.history_limit)
        .await?
        .iter()
        .map(SpinRecord::to_history_entry)
        .collect();
    Ok(PlayerSpinState::from_history(history, current_angle_deg))
}

async fn get_catalog(State(state): State<AppState>) -> Json<WheelCatalogResponse> {
    Json(WheelCatalogResponse {
        segment_count: state.catalog.segment_count(),
        prizes: state.catalog.prizes().to_vec(),
        cooldown_ms: state.wheel.cooldown_ms,
        spin_duration_ms: state.wheel.spin_duration_ms,
    })
}

async fn spin_wheel(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Json(request): Json<WheelSpinRequest>,
) -> Result<Json<WheelSpinResponse>, Error> {
    check_player(&player_id)?;
    let _guard = SpinGuard::acquire(&state.in_flight, &player_id).ok_or(Error::SpinInProgress)?;

    let now = now_ms();
    let spin_state = player_state(&state, &player_id, request.current_angle_deg).await?;

    let attempt = {
        let mut rng = OsRng;
        attempt_spin(now, &spin_state, &state.catalog, &state.wheel, &mut rng)
    };
    let attempt = attempt.map_err(|e| {
        if e.is_fatal() {
            error!("🎡 Wheel cannot spin, configuration is broken: {}", e);
        }
        Error::Wheel(e)
    })?;

    match attempt {
        SpinAttempt::Denied { retry_after_ms, .. } => {
            let countdown = format_countdown(retry_after_ms);
            warn!("🎡 WHEEL SPIN denied for {}: {} ms of cooldown left", player_id, retry_after_ms);
            let message = match &countdown {
                Some(countdown) => format!("{} Next spin in {}.", COOLDOWN_MESSAGE, countdown),
                None => COOLDOWN_MESSAGE.to_string(),
            };
            Ok(Json(WheelSpinResponse {
                success: false,
                message: Some(message),
                prize: None,
                segment_index: None,
                rotation: None,
                retry_after_ms: Some(retry_after_ms),
                countdown,
                spin_duration_ms: state.wheel.spin_duration_ms,
            }))
        }
        SpinAttempt::Granted {
            result,
            rotation,
            new_history_entry,
            eligibility,
        } => {
            let record = SpinRecord {
                player_id: player_id.clone(),
                prize_id: new_history_entry.prize_id,
                timestamp_ms: new_history_entry.timestamp_ms,
                is_rare: result.chosen_prize.is_rare,
            };
            state.store.record(&record).await?;

            info!(
                "🎡 WHEEL SPIN: {} won {} (roll {:.2}, streak {})",
                player_id, result.chosen_prize.id, result.roll, eligibility.spins_since_ultra_rare
            );
            state.notifier.notify_spin(&record, &result.chosen_prize);

            Ok(Json(WheelSpinResponse {
                success: true,
                message: Some(format!("You won {}!", result.chosen_prize.label)),
                segment_index: Some(result.chosen_index),
                prize: Some(result.chosen_prize),
                rotation: Some(rotation),
                retry_after_ms: None,
                countdown: None,
                spin_duration_ms: state.wheel.spin_duration_ms,
            }))
        }
    }
}

async fn get_wheel_cooldown(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<WheelCooldownResponse>, Error> {
    check_player(&player_id)?;
    let now = now_ms();
    let spin_state = player_state(&state, &player_id, 0.0).await?;
    let eligibility = compute_eligibility(
        now,
        spin_state.last_spin_ms,
        &spin_state.history,
        &state.catalog,
        &state.wheel,
    );
    let remaining_ms = eligibility.remaining_ms(now);

    Ok(Json(WheelCooldownResponse {
        in_cooldown: !eligibility.can_spin(now),
        remaining_ms,
        cooldown_ends_at_ms: eligibility.cooldown_ends_at_ms,
        countdown: format_countdown(remaining_ms),
        spins_since_ultra_rare: eligibility.spins_since_ultra_rare,
        ultra_rare_eligible: eligibility.ultra_rare_eligible,
    }))
}

async fn get_history(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<WheelHistoryResponse>, Error> {
    check_player(&player_id)?;
    let limit = query.limit.unwrap_or(state.history_limit).min(state.history_limit);
    let records = state.store.recent(&player_id, limit).await?;
    Ok(Json(WheelHistoryResponse { player_id, records }))
}

async fn reset_history(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<WheelCooldownResponse>, Error> {
    check_player(&player_id)?;
    state.store.clear(&player_id).await?;
    info!("🎡 Wheel history reset for {}", player_id);
    get_wheel_cooldown(State(state), Path(player_id)).await
}

async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, Error> {
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT).min(100);
    Ok(Json(state.store.leaderboard(limit).await?))
}
