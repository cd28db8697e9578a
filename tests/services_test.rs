//! Unit tests for services module

use arena::services::{
    OrderBookSynthesizer, PriceGenerator, PushOutcome, RngSource, SeriesWindow, SequenceSource,
};
use arena::config::MAX_INITIAL_PRICE;
use arena::types::PriceSample;

#[test]
fn test_price_walk_stays_finite() {
    let generator = PriceGenerator::new(15.0);
    for seed in 0..20 {
        let mut rng = RngSource::seeded(seed);
        let mut price = 45_000.0;
        for _ in 0..5_000 {
            price = generator.step(price, &mut rng);
            assert!(price.is_finite());
        }
    }
}

#[test]
fn test_price_walk_with_zero_volatility_is_flat() {
    let generator = PriceGenerator::new(0.0);
    let mut rng = RngSource::seeded(1);
    assert_eq!(generator.step(123.45, &mut rng), 123.45);
}

#[test]
fn test_backfill_feeds_window() {
    let generator = PriceGenerator::new(15.0);
    let mut rng = SequenceSource::constant(0.5);
    let history = generator.backfill(45_000.0, 100, 10_000, &mut rng);

    let window = SeriesWindow::from_samples(200, history);
    assert_eq!(window.len(), 100);
    assert_eq!(window.last(), Some(&PriceSample::new(9_999, 45_000.0)));
}

#[test]
fn test_window_random_pushes_keep_invariants() {
    let mut rng = RngSource::seeded(99);
    let mut window = SeriesWindow::new(60);
    let mut time = 0i64;
    window.push(PriceSample::new(time, 0.0));

    for _ in 0..1_000 {
        // Mostly forward, sometimes repeated, occasionally backwards.
        let roll: f64 = arena::services::RandomSource::next_uniform(&mut rng);
        time += if roll < 0.2 {
            0
        } else if roll < 0.25 {
            -3
        } else {
            1
        };
        let outcome = window.push(PriceSample::new(time, roll));
        if roll < 0.2 && outcome.accepted() {
            panic!("duplicate timestamp accepted at {}", time);
        }

        let times: Vec<i64> = window.iter().map(|s| s.time).collect();
        assert!(times.len() <= 60);
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn test_window_duplicate_after_eviction() {
    let mut window = SeriesWindow::new(1);
    assert_eq!(window.push(PriceSample::new(1, 1.0)), PushOutcome::Appended);
    assert_eq!(window.push(PriceSample::new(2, 2.0)), PushOutcome::Evicted(1));
    assert_eq!(window.push(PriceSample::new(2, 3.0)), PushOutcome::Duplicate);
    assert_eq!(window.snapshot().samples, vec![PriceSample::new(2, 2.0)]);
}

#[test]
fn test_order_book_property_over_many_mids() {
    let synth = OrderBookSynthesizer::default();
    let mut rng = RngSource::seeded(2024);

    let mut mid = 45_000.0;
    let generator = PriceGenerator::new(15.0);
    for _ in 0..500 {
        mid = generator.step(mid, &mut rng);
        let book = synth.synthesize(mid, &mut rng);

        for ask in &book.asks {
            assert!(ask.price > mid);
            assert_eq!(ask.total, ask.size * ask.price);
        }
        for bid in &book.bids {
            assert!(bid.price < mid);
            assert_eq!(bid.total, bid.size * bid.price);
        }
        assert!(book.best_bid < book.best_ask);
        assert!((-1.0..=1.0).contains(&book.imbalance));
    }
}

#[test]
fn test_order_book_straddles_largest_accepted_mid() {
    let synth = OrderBookSynthesizer::default();
    let mut rng = SequenceSource::constant(0.0);

    for mid in [MAX_INITIAL_PRICE, -MAX_INITIAL_PRICE] {
        let book = synth.synthesize(mid, &mut rng);
        assert!(book.asks.iter().all(|l| l.price > mid));
        assert!(book.bids.iter().all(|l| l.price < mid));
    }
}
