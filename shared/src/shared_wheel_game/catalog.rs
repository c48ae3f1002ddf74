use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::error::WheelError;
use crate::validation::validate_prize_id;

/// A single segment on the wheel.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
pub struct PrizeDefinition {
    #[validate(custom = "validate_prize_id")]
    pub id: String,
    #[validate(length(min = 1, max = 80))]
    pub label: String,
    /// Rare prizes are announced and counted on the leaderboard. Ultra-rare
    /// suppression is configured separately by id.
    #[serde(default)]
    pub is_rare: bool,
    #[validate(range(min = 0.0))]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl PrizeDefinition {
    pub fn new(id: &str, label: &str, weight: f64) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            is_rare: false,
            weight,
            metadata: BTreeMap::new(),
        }
    }

    pub fn rare(mut self) -> Self {
        self.is_rare = true;
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }
}

/// An ordered, validated list of prizes. Segment `i` on the wheel is prize `i`.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(transparent)]
pub struct PrizeCatalog {
    prizes: Vec<PrizeDefinition>,
}

impl PrizeCatalog {
    pub fn new(prizes: Vec<PrizeDefinition>) -> Result<Self, WheelError> {
        if prizes.is_empty() {
            return Err(WheelError::EmptyCatalog);
        }

        let mut seen = HashSet::new();
        for prize in &prizes {
            prize.validate().map_err(|e| WheelError::InvalidPrize {
                id: prize.id.clone(),
                reason: e.to_string(),
            })?;
            // NaN and infinity slip past the range check.
            if !prize.weight.is_finite() {
                return Err(WheelError::InvalidPrize {
                    id: prize.id.clone(),
                    reason: "weight must be finite".to_string(),
                });
            }
            if !seen.insert(prize.id.as_str()) {
                return Err(WheelError::DuplicatePrizeId(prize.id.clone()));
            }
        }

        Ok(Self { prizes })
    }

    /// The 13-segment reference wheel. Weights sum to 100.
    pub fn default_catalog() -> Self {
        let prizes = vec![
            PrizeDefinition::new("cash_5k", "$5,000", 20.0),
            PrizeDefinition::new("xp_boost", "Double XP (1h)", 12.0),
            PrizeDefinition::new("cash_10k", "$10,000", 15.0),
            PrizeDefinition::new("crate_common", "Common Crate", 12.0),
            PrizeDefinition::new("cash_25k", "$25,000", 10.0),
            PrizeDefinition::new("vehicle", "Sports Car", 1.0)
                .rare()
                .with_metadata("kind", "vehicle"),
            PrizeDefinition::new("try_again", "Try Again", 8.0),
            PrizeDefinition::new("weapon_skin", "Weapon Skin", 6.0),
            PrizeDefinition::new("cash_50k", "$50,000", 6.0),
            PrizeDefinition::new("crate_rare", "Rare Crate", 5.0).rare(),
            PrizeDefinition::new("clothing_1", "Designer Outfit", 1.0)
                .rare()
                .with_metadata("kind", "clothing"),
            PrizeDefinition::new("cash_100k", "$100,000", 3.0).rare(),
            PrizeDefinition::new("cash_250k", "$250,000", 1.0).rare(),
        ];
        Self { prizes }
    }

    pub fn prizes(&self) -> &[PrizeDefinition] {
        &self.prizes
    }

    pub fn len(&self) -> usize {
        self.prizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prizes.is_empty()
    }

    /// One segment per prize.
    pub fn segment_count(&self) -> usize {
        self.prizes.len()
    }

    pub fn get(&self, index: usize) -> Option<&PrizeDefinition> {
        self.prizes.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&PrizeDefinition> {
        self.prizes.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn total_weight(&self) -> f64 {
        self.prizes.iter().map(|p| p.weight).sum()
    }
}

impl<'de> Deserialize<'de> for PrizeCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let prizes = Vec::<PrizeDefinition>::deserialize(deserializer)?;
        PrizeCatalog::new(prizes).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_shape() {
        let catalog = PrizeCatalog::default_catalog();
        assert_eq!(catalog.len(), 13);
        assert!((catalog.total_weight() - 100.0).abs() < 1e-9);
        assert!(catalog.contains("vehicle"));
        assert!(catalog.contains("clothing_1"));
        // The reference catalog must pass its own validation.
        assert!(PrizeCatalog::new(catalog.prizes().to_vec()).is_ok());
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert_eq!(PrizeCatalog::new(vec![]), Err(WheelError::EmptyCatalog));

        let dup = vec![
            PrizeDefinition::new("cash", "Cash", 1.0),
            PrizeDefinition::new("cash", "More cash", 2.0),
        ];
        assert_eq!(
            PrizeCatalog::new(dup),
            Err(WheelError::DuplicatePrizeId("cash".to_string()))
        );
    }

    #[test]
    fn test_rejects_bad_weights_and_ids() {
        let negative = vec![PrizeDefinition::new("cash", "Cash", -1.0)];
        assert!(matches!(
            PrizeCatalog::new(negative),
            Err(WheelError::InvalidPrize { .. })
        ));

        let nan = vec![PrizeDefinition::new("cash", "Cash", f64::NAN)];
        assert!(matches!(PrizeCatalog::new(nan), Err(WheelError::InvalidPrize { .. })));

        let bad_id = vec![PrizeDefinition::new("Big Cash", "Cash", 1.0)];
        assert!(matches!(PrizeCatalog::new(bad_id), Err(WheelError::InvalidPrize { .. })));
    }

    #[test]
    fn test_zero_weight_prize_is_allowed() {
        let catalog = PrizeCatalog::new(vec![
            PrizeDefinition::new("display_only", "Jackpot", 0.0),
            PrizeDefinition::new("cash", "Cash", 1.0),
        ]);
        assert!(catalog.is_ok());
    }
}
