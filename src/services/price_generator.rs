//! Random-walk price generator.

use crate::services::random::RandomSource;
use crate::types::PriceSample;

/// Bounded random walk: each step moves the price by at most `volatility / 2`
/// in either direction. There is no floor; the walk may go negative.
#[derive(Debug, Clone, Copy)]
pub struct PriceGenerator {
    volatility: f64,
}

impl PriceGenerator {
    /// Create a generator with the given per-tick swing.
    pub fn new(volatility: f64) -> Self {
        Self { volatility }
    }

    /// Get the per-tick swing.
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Next price: `previous + (u - 0.5) * volatility`, `u` uniform in [0, 1).
    pub fn step(&self, previous: f64, rng: &mut dyn RandomSource) -> f64 {
        previous + (rng.next_uniform() - 0.5) * self.volatility
    }

    /// Synthesize `count` samples of history ending one second before
    /// `now_secs`, walking forward from `initial_price`.
    ///
    /// The last returned value is where live ticking continues from.
    pub fn backfill(
        &self,
        initial_price: f64,
        count: usize,
        now_secs: i64,
        rng: &mut dyn RandomSource,
    ) -> Vec<PriceSample> {
        let mut samples = Vec::with_capacity(count);
        let mut price = initial_price;

        for i in (1..=count as i64).rev() {
            price = self.step(price, rng);
            samples.push(PriceSample::new(now_secs - i, price));
        }

        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::random::{RngSource, SequenceSource};

    #[test]
    fn test_step_midpoint_is_flat() {
        let generator = PriceGenerator::new(15.0);
        let mut rng = SequenceSource::constant(0.5);
        assert_eq!(generator.step(45_000.0, &mut rng), 45_000.0);
    }

    #[test]
    fn test_step_extremes() {
        let generator = PriceGenerator::new(15.0);
        let mut rng = SequenceSource::new(vec![0.0, 1.0]);

        assert_eq!(generator.step(100.0, &mut rng), 92.5);
        assert_eq!(generator.step(100.0, &mut rng), 107.5);
    }

    #[test]
    fn test_step_can_go_negative() {
        let generator = PriceGenerator::new(15.0);
        let mut rng = SequenceSource::constant(0.0);

        let mut price = 10.0;
        for _ in 0..3 {
            price = generator.step(price, &mut rng);
        }
        assert_eq!(price, -12.5);
    }

    #[test]
    fn test_steps_stay_finite_and_bounded() {
        let generator = PriceGenerator::new(15.0);
        let mut rng = RngSource::seeded(42);

        let mut price = 45_000.0;
        for _ in 0..10_000 {
            let next = generator.step(price, &mut rng);
            assert!(next.is_finite());
            assert!((next - price).abs() <= 7.5);
            price = next;
        }
    }

    #[test]
    fn test_backfill_timestamps_precede_now() {
        let generator = PriceGenerator::new(15.0);
        let mut rng = SequenceSource::constant(1.0);

        let samples = generator.backfill(45_000.0, 100, 1_000, &mut rng);

        assert_eq!(samples.len(), 100);
        assert_eq!(samples[0].time, 900);
        assert_eq!(samples[99].time, 999);
        assert_eq!(samples[0].value, 45_007.5);
        assert_eq!(samples[99].value, 45_000.0 + 7.5 * 100.0);
        assert!(samples.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[test]
    fn test_backfill_empty() {
        let generator = PriceGenerator::new(15.0);
        let mut rng = SequenceSource::constant(0.5);
        assert!(generator.backfill(45_000.0, 0, 1_000, &mut rng).is_empty());
    }
}
