//! Injectable uniform random source.
//!
//! The selector and the rotation jitter only ever need a uniform value in
//! `[0, 1)`. Production code passes any `rand::Rng`; tests can replay fixed
//! draws through [`SequenceSource`].

use rand::Rng;

pub trait UniformSource {
    /// Returns a uniformly distributed value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<R: Rng + ?Sized> UniformSource for R {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    position: usize,
    draws: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, position: 0, draws: 0 }
    }

    /// Number of values handed out so far.
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl UniformSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        self.draws += 1;
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        // Clamp into [0, 1) so a careless fixture can't break the selector's range.
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sequence_source_cycles() {
        let mut source = SequenceSource::new(vec![0.1, 0.5]);
        assert_eq!(source.next_unit(), 0.1);
        assert_eq!(source.next_unit(), 0.5);
        assert_eq!(source.next_unit(), 0.1);
        assert_eq!(source.draws(), 3);
    }

    #[test]
    fn test_rng_draws_stay_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let value = rng.next_unit();
            assert!((0.0..1.0).contains(&value));
        }
    }
}
