use serde::{Deserialize, Serialize};

use super::catalog::{PrizeCatalog, PrizeDefinition};
use super::config::WheelConfig;
use super::error::WheelError;
use super::random::UniformSource;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SelectionResult {
    pub chosen_index: usize,
    pub chosen_prize: PrizeDefinition,
    /// The raw draw in `[0, total_weight)`, kept for audit logs.
    pub roll: f64,
}

/// Catalog weights with ultra-rare prizes zeroed while they are locked.
pub fn effective_weights(
    catalog: &PrizeCatalog,
    config: &WheelConfig,
    ultra_rare_eligible: bool,
) -> Vec<f64> {
    catalog
        .prizes()
        .iter()
        .map(|prize| {
            if config.is_ultra_rare(&prize.id) && !ultra_rare_eligible {
                0.0
            } else {
                prize.weight
            }
        })
        .collect()
}

/// Cumulative-weight draw over the catalog in catalog order.
///
/// An exact boundary hit goes to the earlier prize. Prizes with no effective
/// weight are never chosen, even on a zero draw.
pub fn select_prize<R: UniformSource + ?Sized>(
    catalog: &PrizeCatalog,
    config: &WheelConfig,
    ultra_rare_eligible: bool,
    rng: &mut R,
) -> Result<SelectionResult, WheelError> {
    let weights = effective_weights(catalog, config, ultra_rare_eligible);
    let total: f64 = weights.iter().sum();
    if !(total > 0.0) || !total.is_finite() {
        return Err(WheelError::DegenerateWeights { total });
    }

    let roll = rng.next_unit() * total;
    let chosen_index = walk(&weights, roll)
        .or_else(|| weights.iter().rposition(|w| *w > 0.0))
        .ok_or(WheelError::DegenerateWeights { total })?;

    let chosen_prize = catalog
        .get(chosen_index)
        .cloned()
        .ok_or(WheelError::InvalidSegment {
            index: chosen_index,
            count: catalog.len(),
        })?;

    log::debug!(
        "selected {} (index {}) with roll {:.4} of {:.4}, ultra-rare eligible: {}",
        chosen_prize.id,
        chosen_index,
        roll,
        total,
        ultra_rare_eligible
    );

    Ok(SelectionResult {
        chosen_index,
        chosen_prize,
        roll,
    })
}

fn walk(weights: &[f64], roll: f64) -> Option<usize> {
    let mut remainder = roll;
    for (index, weight) in weights.iter().enumerate() {
        if *weight <= 0.0 {
            continue;
        }
        remainder -= weight;
        if remainder <= 0.0 {
            return Some(index);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_wheel_game::random::SequenceSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_catalog() -> PrizeCatalog {
        PrizeCatalog::new(vec![
            PrizeDefinition::new("cash_small", "Small", 50.0),
            PrizeDefinition::new("vehicle", "Car", 10.0).rare(),
            PrizeDefinition::new("cash_big", "Big", 30.0),
            PrizeDefinition::new("clothing_1", "Outfit", 10.0).rare(),
        ])
        .unwrap()
    }

    #[test]
    fn test_effective_weights_suppress_locked_ultra_rare() {
        let config = WheelConfig::default();
        let catalog = small_catalog();
        assert_eq!(effective_weights(&catalog, &config, false), vec![50.0, 0.0, 30.0, 0.0]);
        assert_eq!(effective_weights(&catalog, &config, true), vec![50.0, 10.0, 30.0, 10.0]);
    }

    #[test]
    fn test_boundary_goes_to_earlier_prize() {
        let config = WheelConfig::default();
        let catalog = small_catalog();
        // 0.5 * 100 lands exactly on the end of the first prize.
        let mut rng = SequenceSource::new(vec![0.5]);
        let result = select_prize(&catalog, &config, true, &mut rng).unwrap();
        assert_eq!(result.chosen_index, 0);
        assert_eq!(result.roll, 50.0);

        let mut rng = SequenceSource::new(vec![0.55]);
        let result = select_prize(&catalog, &config, true, &mut rng).unwrap();
        assert_eq!(result.chosen_prize.id, "vehicle");
    }

    #[test]
    fn test_zero_roll_skips_suppressed_first_prize() {
        let config = WheelConfig::default();
        let catalog = PrizeCatalog::new(vec![
            PrizeDefinition::new("vehicle", "Car", 5.0),
            PrizeDefinition::new("cash", "Cash", 5.0),
        ])
        .unwrap();
        let mut rng = SequenceSource::new(vec![0.0]);
        let result = select_prize(&catalog, &config, false, &mut rng).unwrap();
        assert_eq!(result.chosen_prize.id, "cash");
    }

    #[test]
    fn test_degenerate_weights_is_an_error() {
        let config = WheelConfig::default();
        let catalog = PrizeCatalog::new(vec![
            PrizeDefinition::new("vehicle", "Car", 5.0),
            PrizeDefinition::new("nothing", "Nothing", 0.0),
        ])
        .unwrap();
        let mut rng = SequenceSource::new(vec![0.3]);
        let err = select_prize(&catalog, &config, false, &mut rng).unwrap_err();
        assert_eq!(err, WheelError::DegenerateWeights { total: 0.0 });
        assert!(err.is_fatal());
    }

    #[test]
    fn test_walk_falls_back_to_last_weighted_prize() {
        // A roll past the total can only come from float drift.
        assert_eq!(walk(&[1.0, 2.0, 0.0], 3.5), None);
        let weights = [1.0, 2.0, 0.0];
        assert_eq!(walk(&weights, 3.5).or_else(|| weights.iter().rposition(|w| *w > 0.0)), Some(1));
    }

    #[test]
    fn test_distribution_converges_to_weights() {
        let config = WheelConfig::default();
        let catalog = PrizeCatalog::default_catalog();
        let weights = effective_weights(&catalog, &config, true);
        let total: f64 = weights.iter().sum();

        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = vec![0usize; catalog.len()];
        let draws = 100_000;
        for _ in 0..draws {
            let result = select_prize(&catalog, &config, true, &mut rng).unwrap();
            counts[result.chosen_index] += 1;
        }

        for (index, count) in counts.iter().enumerate() {
            let expected = weights[index] / total;
            let observed = *count as f64 / draws as f64;
            assert!(
                (observed - expected).abs() < 0.01,
                "prize {} observed {:.4}, expected {:.4}",
                catalog.prizes()[index].id,
                observed,
                expected
            );
        }
    }

    #[test]
    fn test_locked_ultra_rare_never_drawn() {
        let config = WheelConfig::default();
        let catalog = PrizeCatalog::default_catalog();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..20_000 {
            let result = select_prize(&catalog, &config, false, &mut rng).unwrap();
            assert!(!config.is_ultra_rare(&result.chosen_prize.id));
        }
    }
}
