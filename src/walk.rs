//! Biased random walk: a sequence that sticks to its previous value with
//! probability `beta` and otherwise redraws uniformly.

use std::iter::FusedIterator;

use rand::Rng;

use crate::config::WalkConfig;
use crate::error::Result;

/// Finite sequence of `num_samples` values in `start..=finish`.
///
/// The walk owns its generator for the lifetime of the sequence; pass
/// `&mut rng` to keep using a generator afterwards.
#[derive(Debug, Clone)]
pub struct BiasedWalk<R> {
    rng: R,
    config: WalkConfig,
    current: i32,
    remaining: usize,
}

impl<R: Rng> BiasedWalk<R> {
    /// # Errors
    /// [`SamplerError::Configuration`](crate::SamplerError::Configuration)
    /// if `beta` is outside `[0, 1]` or the range is empty.
    pub fn new(config: WalkConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        let current = rng.random_range(config.start..=config.finish);
        Ok(BiasedWalk {
            rng,
            config,
            current,
            remaining: config.num_samples,
        })
    }
}

impl<R: Rng> Iterator for BiasedWalk<R> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.current;
        self.remaining -= 1;
        if self.remaining > 0 {
            let u: f64 = self.rng.random();
            if u > self.config.beta {
                self.current = self.rng.random_range(self.config.start..=self.config.finish);
            }
        }
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<R: Rng> ExactSizeIterator for BiasedWalk<R> {}

impl<R: Rng> FusedIterator for BiasedWalk<R> {}
