//! Order Book Synthesizer
//!
//! Derives a presentation-only bid/ask ladder around the current price.
//! Nothing here is persisted and nothing settles against it; the book is
//! rebuilt from scratch on every price update.

use crate::services::random::RandomSource;
use crate::types::{BookSide, OrderBookLevel, SyntheticOrderBook};

/// Shape of the generated ladder.
#[derive(Debug, Clone)]
pub struct OrderBookConfig {
    /// Levels per side
    pub levels: usize,
    /// Range of the gap added between consecutive levels
    pub offset_step: (f64, f64),
    /// Range of the size at each level
    pub size_range: (f64, f64),
    /// Range of the visual depth bar width
    pub depth_range: (f64, f64),
}

impl Default for OrderBookConfig {
    fn default() -> Self {
        Self {
            levels: 12,
            offset_step: (0.1, 0.6),
            size_range: (0.1, 2.1),
            depth_range: (20.0, 100.0),
        }
    }
}

/// Generates synthetic order books.
#[derive(Debug, Clone, Default)]
pub struct OrderBookSynthesizer {
    config: OrderBookConfig,
}

impl OrderBookSynthesizer {
    /// Create a synthesizer with explicit ranges.
    pub fn new(config: OrderBookConfig) -> Self {
        Self { config }
    }

    /// Default ranges with `levels` levels per side.
    pub fn with_levels(levels: usize) -> Self {
        Self::new(OrderBookConfig {
            levels,
            ..OrderBookConfig::default()
        })
    }

    /// Get the synthesizer configuration.
    pub fn config(&self) -> &OrderBookConfig {
        &self.config
    }

    /// Build a fresh book around `mid_price`.
    pub fn synthesize(&self, mid_price: f64, rng: &mut dyn RandomSource) -> SyntheticOrderBook {
        let asks = self.generate_side(mid_price, BookSide::Ask, rng);
        let bids = self.generate_side(mid_price, BookSide::Bid, rng);
        SyntheticOrderBook::from_levels(mid_price, asks, bids)
    }

    /// Levels for one side, innermost first. Offsets accumulate, so each
    /// level is strictly farther from mid than the one before it.
    fn generate_side(
        &self,
        mid_price: f64,
        side: BookSide,
        rng: &mut dyn RandomSource,
    ) -> Vec<OrderBookLevel> {
        let (step_lo, step_hi) = self.config.offset_step;
        let (size_lo, size_hi) = self.config.size_range;
        let (depth_lo, depth_hi) = self.config.depth_range;

        let mut offset = 0.0;
        let mut levels = Vec::with_capacity(self.config.levels);

        for _ in 0..self.config.levels {
            offset += rng.uniform_range(step_lo, step_hi);
            let price = match side {
                BookSide::Ask => mid_price + offset,
                BookSide::Bid => mid_price - offset,
            };
            let size = rng.uniform_range(size_lo, size_hi);

            levels.push(OrderBookLevel {
                price,
                size,
                total: size * price,
                side,
                depth_percent: rng.uniform_range(depth_lo, depth_hi),
            });
        }

        levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::random::{RngSource, SequenceSource};

    #[test]
    fn test_sides_straddle_mid() {
        let synth = OrderBookSynthesizer::default();
        let mut rng = RngSource::seeded(3);

        for mid in [45_000.0, 1.0, 0.0, -250.0] {
            let book = synth.synthesize(mid, &mut rng);
            assert_eq!(book.asks.len(), 12);
            assert_eq!(book.bids.len(), 12);
            assert!(book.asks.iter().all(|l| l.price > mid && l.side == BookSide::Ask));
            assert!(book.bids.iter().all(|l| l.price < mid && l.side == BookSide::Bid));
        }
    }

    #[test]
    fn test_total_is_size_times_price() {
        let synth = OrderBookSynthesizer::default();
        let mut rng = RngSource::seeded(11);
        let book = synth.synthesize(45_123.45, &mut rng);

        for level in book.asks.iter().chain(book.bids.iter()) {
            assert_eq!(level.total, level.size * level.price);
            assert!((20.0..100.0).contains(&level.depth_percent));
            assert!((0.1..2.1).contains(&level.size));
        }
    }

    #[test]
    fn test_sorted_descending_with_best_next_to_mid() {
        let synth = OrderBookSynthesizer::default();
        let mut rng = RngSource::seeded(5);
        let book = synth.synthesize(100.0, &mut rng);

        assert!(book.asks.windows(2).all(|w| w[0].price > w[1].price));
        assert!(book.bids.windows(2).all(|w| w[0].price > w[1].price));
        assert_eq!(book.best_ask, book.asks.last().map(|l| l.price).unwrap());
        assert_eq!(book.best_bid, book.bids.first().map(|l| l.price).unwrap());
        assert!(book.spread > 0.0);
    }

    #[test]
    fn test_offsets_accumulate() {
        let synth = OrderBookSynthesizer::with_levels(3);
        // step, size, depth per level; constant 0.0 gives minimum of each range
        let mut rng = SequenceSource::constant(0.0);
        let book = synth.synthesize(100.0, &mut rng);

        let ask_prices: Vec<f64> = book.asks.iter().rev().map(|l| l.price).collect();
        let expected = [100.1, 100.2, 100.3];
        for (got, want) in ask_prices.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9);
        }
    }

    #[test]
    fn test_aggregates() {
        let synth = OrderBookSynthesizer::with_levels(4);
        let mut rng = SequenceSource::constant(0.5);
        let book = synth.synthesize(100.0, &mut rng);

        assert!((book.bid_total - book.ask_total).abs() < 1e-9);
        assert!(book.imbalance.abs() < 1e-9);
        assert!((book.bid_share_pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_levels_is_empty_book() {
        let synth = OrderBookSynthesizer::with_levels(0);
        let mut rng = SequenceSource::constant(0.5);
        let book = synth.synthesize(100.0, &mut rng);

        assert!(book.asks.is_empty() && book.bids.is_empty());
        assert_eq!(book.spread, 0.0);
        assert_eq!(book.imbalance, 0.0);
    }
}
