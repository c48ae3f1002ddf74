use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::catalog::PrizeCatalog;
use super::error::WheelError;
use crate::constants::{
    DEFAULT_ULTRA_RARE_IDS, JITTER_FRACTION, MIN_FULL_REVOLUTIONS, SPIN_DURATION_MS,
    ULTRA_RARE_THRESHOLD, WHEEL_SPIN_COOLDOWN_MS,
};

/// Tunables for the wheel engine. Segment count is not configured here: it is
/// always the catalog length.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
pub struct WheelConfig {
    pub cooldown_ms: u64,
    pub ultra_rare_threshold: u32,
    pub ultra_rare_ids: BTreeSet<String>,
    #[validate(range(min = 1, max = 100))]
    pub min_full_revolutions: u32,
    /// Must stay below 1.0 so jitter never crosses into a neighbouring segment.
    #[validate(range(min = 0.0, max = 0.95))]
    pub jitter_fraction: f64,
    #[validate(range(min = 1))]
    pub spin_duration_ms: u64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: WHEEL_SPIN_COOLDOWN_MS,
            ultra_rare_threshold: ULTRA_RARE_THRESHOLD,
            ultra_rare_ids: DEFAULT_ULTRA_RARE_IDS.iter().map(|id| id.to_string()).collect(),
            min_full_revolutions: MIN_FULL_REVOLUTIONS,
            jitter_fraction: JITTER_FRACTION,
            spin_duration_ms: SPIN_DURATION_MS,
        }
    }
}

impl WheelConfig {
    pub fn is_ultra_rare(&self, prize_id: &str) -> bool {
        self.ultra_rare_ids.contains(prize_id)
    }

    /// Validates the config on its own and against the catalog it will drive.
    pub fn check(&self, catalog: &PrizeCatalog) -> Result<(), WheelError> {
        self.validate()
            .map_err(|e| WheelError::InvalidConfig(e.to_string()))?;

        if !self.jitter_fraction.is_finite() {
            return Err(WheelError::InvalidConfig("jitter_fraction must be finite".to_string()));
        }

        for id in &self.ultra_rare_ids {
            if !catalog.contains(id) {
                return Err(WheelError::InvalidConfig(format!(
                    "ultra-rare prize {} is not in the catalog",
                    id
                )));
            }
        }

        // With everything ultra-rare suppressed, a fresh player would hit an empty draw.
        let unsuppressed: f64 = catalog
            .prizes()
            .iter()
            .filter(|p| !self.is_ultra_rare(&p.id))
            .map(|p| p.weight)
            .sum();
        if unsuppressed <= 0.0 {
            return Err(WheelError::DegenerateWeights { total: unsuppressed });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_wheel_game::catalog::PrizeDefinition;

    #[test]
    fn test_default_config_matches_default_catalog() {
        let config = WheelConfig::default();
        assert!(config.check(&PrizeCatalog::default_catalog()).is_ok());
        assert!(config.is_ultra_rare("vehicle"));
        assert!(!config.is_ultra_rare("cash_250k"));
    }

    #[test]
    fn test_rejects_unknown_ultra_rare_id() {
        let mut config = WheelConfig::default();
        config.ultra_rare_ids.insert("yacht".to_string());
        assert!(matches!(
            config.check(&PrizeCatalog::default_catalog()),
            Err(WheelError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_wide_jitter_and_zero_revolutions() {
        let catalog = PrizeCatalog::default_catalog();

        let mut config = WheelConfig::default();
        config.jitter_fraction = 1.0;
        assert!(config.check(&catalog).is_err());

        let mut config = WheelConfig::default();
        config.min_full_revolutions = 0;
        assert!(config.check(&catalog).is_err());
    }

    #[test]
    fn test_rejects_catalog_that_is_all_ultra_rare() {
        let catalog = PrizeCatalog::new(vec![
            PrizeDefinition::new("vehicle", "Car", 1.0),
            PrizeDefinition::new("clothing_1", "Outfit", 1.0),
        ])
        .unwrap();
        assert!(matches!(
            WheelConfig::default().check(&catalog),
            Err(WheelError::DegenerateWeights { .. })
        ));
    }
}
