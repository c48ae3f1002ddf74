use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

static PRIZE_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9_]{1,64}$").expect("prize id pattern is valid")
});

/// Prize ids are stable storage keys: lowercase ascii, digits and underscores.
pub fn validate_prize_id(id: &str) -> Result<(), ValidationError> {
    if !PRIZE_ID_PATTERN.is_match(id) {
        return Err(ValidationError::new("invalid_prize_id"));
    }
    Ok(())
}

pub fn validate_player_id(player_id: &str) -> Result<(), ValidationError> {
    let trimmed = player_id.trim();
    if trimmed.is_empty() || trimmed.len() > 128 || trimmed.len() != player_id.len() {
        return Err(ValidationError::new("invalid_player_id"));
    }
    if player_id.chars().any(|c| c.is_control() || c == ':') {
        return Err(ValidationError::new("invalid_player_id"));
    }
    Ok(())
}
