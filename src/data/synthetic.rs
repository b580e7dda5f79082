//! Synthetic OHLCV dataset generation
//!
//! Produces randomized market records with the same shape as real
//! exchange data, for training and exercising the anomaly detector
//! without a live data source.

use rand::prelude::*;
use rand_distr::Normal;

use super::MarketRecord;

/// Configuration for the synthetic generator.
///
/// Defaults reproduce the reference dataset: prices centered near a
/// BTC-like level with bounded candle spreads.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Number of rows to generate
    pub rows: usize,
    /// RNG seed
    pub seed: u64,
    /// Mean of the High price distribution
    pub price_mean: f64,
    /// Standard deviation of the High price distribution
    pub price_std: f64,
    /// High-to-Low spread range
    pub spread_range: (f64, f64),
    /// Low-to-Open offset range
    pub open_offset_range: (f64, f64),
    /// Open-to-Close move range
    pub close_move_range: (f64, f64),
    /// Volume range
    pub volume_range: (f64, f64),
    /// Marketcap range
    pub marketcap_range: (f64, f64),
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            rows: 1000,
            seed: 42,
            price_mean: 30_000.0,
            price_std: 5_000.0,
            spread_range: (200.0, 2_000.0),
            open_offset_range: (100.0, 1_000.0),
            close_move_range: (-1_500.0, 1_500.0),
            volume_range: (1e8, 1e10),
            marketcap_range: (1e11, 2e12),
        }
    }
}

/// Generate a synthetic dataset.
///
/// High is drawn from a normal distribution; Low, Open and Close are
/// derived from it with uniform offsets, so High >= Low always holds.
/// All values are rounded to two decimals like exchange CSV exports.
pub fn generate(config: &SyntheticConfig) -> Vec<MarketRecord> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let price_dist = Normal::new(config.price_mean, config.price_std)
        .expect("price_std must be finite and non-negative");

    (0..config.rows)
        .map(|_| {
            let high: f64 = price_dist.sample(&mut rng);
            let low = high - rng.gen_range(config.spread_range.0..config.spread_range.1);
            let open = low + rng.gen_range(config.open_offset_range.0..config.open_offset_range.1);
            let close = open + rng.gen_range(config.close_move_range.0..config.close_move_range.1);
            let volume = rng.gen_range(config.volume_range.0..config.volume_range.1);
            let marketcap = rng.gen_range(config.marketcap_range.0..config.marketcap_range.1);

            MarketRecord::new(
                round2(high),
                round2(low),
                round2(open),
                round2(close),
                round2(volume),
                round2(marketcap),
            )
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
