use serde::{Deserialize, Serialize};

use super::error::WheelError;
use super::random::UniformSource;

/// Largest accepted wheel angle. Past this, f64 can no longer resolve the
/// added turns to a fraction of a degree.
pub const MAX_ANGLE_DEG: f64 = 1e12;

/// Where the wheel starts and where it has to stop. Angles accumulate across
/// spins and are never reset to zero.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct RotationTarget {
    pub from_angle_deg: f64,
    pub to_angle_deg: f64,
}

impl RotationTarget {
    pub fn distance_deg(&self) -> f64 {
        self.to_angle_deg - self.from_angle_deg
    }

    /// Angle at `elapsed_ms` into an animation lasting `duration_ms`, eased so
    /// the wheel decelerates into the target.
    pub fn angle_at(&self, elapsed_ms: u64, duration_ms: u64) -> f64 {
        if duration_ms == 0 || elapsed_ms >= duration_ms {
            return self.to_angle_deg;
        }
        let progress = elapsed_ms as f64 / duration_ms as f64;
        self.from_angle_deg + self.distance_deg() * ease_out_quart(progress)
    }
}

pub fn ease_out_quart(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(4)
}

pub fn segment_span_deg(segment_count: usize) -> f64 {
    360.0 / segment_count as f64
}

/// Center of segment `index`, measured clockwise from the pointer at the top.
pub fn segment_center_deg(index: usize, segment_count: usize) -> f64 {
    let span = segment_span_deg(segment_count);
    index as f64 * span + span / 2.0
}

pub fn check_angle(angle_deg: f64) -> Result<(), WheelError> {
    if !angle_deg.is_finite() || angle_deg.abs() > MAX_ANGLE_DEG {
        return Err(WheelError::InvalidAngle(angle_deg));
    }
    Ok(())
}

/// Computes a forward rotation that lands segment `chosen_index` under the
/// pointer after at least `min_full_revolutions` turns.
///
/// Jitter is drawn from `rng` and stays within
/// `segment_span * jitter_fraction / 2` of the segment center.
pub fn compute_rotation_target<R: UniformSource + ?Sized>(
    current_angle_deg: f64,
    chosen_index: usize,
    segment_count: usize,
    min_full_revolutions: u32,
    jitter_fraction: f64,
    rng: &mut R,
) -> Result<RotationTarget, WheelError> {
    if segment_count == 0 || chosen_index >= segment_count {
        return Err(WheelError::InvalidSegment {
            index: chosen_index,
            count: segment_count,
        });
    }
    check_angle(current_angle_deg)?;
    if !(0.0..1.0).contains(&jitter_fraction) {
        return Err(WheelError::InvalidConfig(format!(
            "jitter fraction {} must be in [0, 1)",
            jitter_fraction
        )));
    }

    let span = segment_span_deg(segment_count);
    let alignment = (360.0 - segment_center_deg(chosen_index, segment_count)).rem_euclid(360.0);

    let min_new_rotation = current_angle_deg + 360.0 * f64::from(min_full_revolutions);
    let remainder = min_new_rotation.rem_euclid(360.0);
    let mut target = min_new_rotation + (alignment - remainder);
    if target < min_new_rotation {
        target += 360.0;
    }

    let max_jitter = span * jitter_fraction / 2.0;
    target += (rng.next_unit() * 2.0 - 1.0) * max_jitter;

    // Negative jitter can pull the stop just short of the minimum travel.
    if target < min_new_rotation || target <= current_angle_deg {
        target += 360.0;
    }

    log::debug!(
        "rotation: segment {}/{} from {:.2} to {:.2}",
        chosen_index,
        segment_count,
        current_angle_deg,
        target
    );

    Ok(RotationTarget {
        from_angle_deg: current_angle_deg,
        to_angle_deg: target,
    })
}

/// The segment currently under the pointer for a wheel rotated by `angle_deg`.
pub fn segment_under_pointer(angle_deg: f64, segment_count: usize) -> usize {
    let pointer = (360.0 - angle_deg.rem_euclid(360.0)).rem_euclid(360.0);
    let index = (pointer / segment_span_deg(segment_count)).floor() as usize;
    index.min(segment_count.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_wheel_game::random::SequenceSource;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn angular_distance(a: f64, b: f64) -> f64 {
        let diff = (a - b).rem_euclid(360.0);
        diff.min(360.0 - diff)
    }

    #[test]
    fn test_segment_geometry() {
        assert_eq!(segment_span_deg(8), 45.0);
        assert_eq!(segment_center_deg(0, 8), 22.5);
        assert_eq!(segment_center_deg(7, 8), 337.5);
    }

    #[test]
    fn test_lands_on_center_without_jitter() {
        let mut rng = SequenceSource::new(vec![0.5]);
        let target = compute_rotation_target(0.0, 2, 8, 5, 0.0, &mut rng).unwrap();
        // Segment 2 is centered at 112.5, so the wheel stops at 247.5 mod 360.
        assert_eq!(target.to_angle_deg, 5.0 * 360.0 + 247.5);
        assert_eq!(segment_under_pointer(target.to_angle_deg, 8), 2);
    }

    #[test]
    fn test_adjustment_wraps_forward() {
        let mut rng = SequenceSource::new(vec![0.5]);
        // Current angle already past the alignment point within the turn.
        let target = compute_rotation_target(300.0, 2, 8, 1, 0.0, &mut rng).unwrap();
        assert_eq!(target.to_angle_deg, 720.0 + 247.5);
        assert!(target.distance_deg() >= 360.0);
    }

    #[test]
    fn test_negative_jitter_keeps_minimum_travel() {
        // alignment == remainder, so the unjittered target is exactly the minimum.
        let mut rng = SequenceSource::new(vec![0.0]);
        let target = compute_rotation_target(247.5, 2, 8, 3, 0.5, &mut rng).unwrap();
        assert!(target.distance_deg() >= 3.0 * 360.0);
        assert_eq!(segment_under_pointer(target.to_angle_deg, 8), 2);
    }

    #[test]
    fn test_forward_progress_and_alignment_hold_for_random_inputs() {
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..5_000 {
            let segments = rng.gen_range(2..24);
            let index = rng.gen_range(0..segments);
            let current = rng.gen_range(-720.0..100_000.0);
            let revolutions = rng.gen_range(1..10);
            let jitter = 0.8;

            let target =
                compute_rotation_target(current, index, segments, revolutions, jitter, &mut rng)
                    .unwrap();

            assert!(target.to_angle_deg > current);
            assert!(target.distance_deg() >= 360.0 * revolutions as f64 - 1e-9);

            let landed = (360.0 - target.to_angle_deg.rem_euclid(360.0)).rem_euclid(360.0);
            let span = segment_span_deg(segments);
            let tolerance = span * jitter / 2.0 + 1e-6;
            assert!(angular_distance(landed, segment_center_deg(index, segments)) <= tolerance);
            assert_eq!(segment_under_pointer(target.to_angle_deg, segments), index);
        }
    }

    #[test]
    fn test_invalid_segment() {
        let mut rng = SequenceSource::new(vec![0.5]);
        assert_eq!(
            compute_rotation_target(0.0, 8, 8, 5, 0.2, &mut rng),
            Err(WheelError::InvalidSegment { index: 8, count: 8 })
        );
        assert!(compute_rotation_target(0.0, 0, 0, 5, 0.2, &mut rng).is_err());
        assert!(compute_rotation_target(0.0, 0, 8, 5, 1.0, &mut rng).is_err());
    }

    #[test]
    fn test_rejects_angles_too_large_to_rotate() {
        let mut rng = SequenceSource::new(vec![0.5]);
        for angle in [1e20, -3e17, f64::INFINITY, f64::NAN] {
            let err = compute_rotation_target(angle, 2, 13, 8, 0.6, &mut rng).unwrap_err();
            assert!(matches!(err, WheelError::InvalidAngle(_)));
            assert!(!err.is_fatal());
        }
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_largest_accepted_angle_still_lands_on_segment() {
        for current in [MAX_ANGLE_DEG, -MAX_ANGLE_DEG, MAX_ANGLE_DEG - 123.4] {
            let mut rng = SequenceSource::new(vec![0.5]);
            let target = compute_rotation_target(current, 2, 13, 8, 0.0, &mut rng).unwrap();
            assert!(target.to_angle_deg > current);
            assert!(target.distance_deg() >= 8.0 * 360.0);
            assert_eq!(segment_under_pointer(target.to_angle_deg, 13), 2);
        }
    }

    #[test]
    fn test_angle_at_eases_to_target() {
        let target = RotationTarget {
            from_angle_deg: 90.0,
            to_angle_deg: 1890.0,
        };
        assert_eq!(target.angle_at(0, 6000), 90.0);
        assert_eq!(target.angle_at(6000, 6000), 1890.0);
        assert_eq!(target.angle_at(10_000, 6000), 1890.0);
        let halfway = target.angle_at(3000, 6000);
        // Ease-out covers most of the distance in the first half.
        assert!(halfway > 90.0 + 1800.0 * 0.9);
        assert!(halfway < 1890.0);
    }
}
