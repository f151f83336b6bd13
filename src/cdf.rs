//! Cumulative-mass tables for inverse-CDF sampling from a local categorical.
//!
//! The samplers in this crate rebuild one small distribution per token or
//! chain position. [`CumulativeTable`] is the scratch buffer they share: it
//! is refilled in place on every call, so the inner loop never allocates
//! once the buffer has grown to the domain size.
//!
//! ## Tie rule
//! A draw `u` uniform in `[0, 1)` selects the first index `i` with
//! `u < cdf[i]`. Buckets with zero mass are therefore never selected, and
//! the final bucket is exactly `1.0` after normalization, so a well-formed
//! table always yields an index.

use rand::Rng;

use crate::error::{Result, SamplerError};

/// Normalized running sum over a categorical distribution.
#[derive(Debug, Clone, Default)]
pub struct CumulativeTable {
    cdf: Vec<f64>,
    total: f64,
}

impl CumulativeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        CumulativeTable {
            cdf: Vec::with_capacity(n),
            total: 0.0,
        }
    }

    /// Rebuild the table from unnormalized masses.
    ///
    /// # Errors
    /// [`SamplerError::NumericInvariant`] if a mass is negative or not
    /// finite, or if the masses sum to zero. The table is left empty.
    pub fn fill<I>(&mut self, masses: I) -> Result<()>
    where
        I: IntoIterator<Item = f64>,
    {
        self.cdf.clear();
        self.total = 0.0;
        for (i, m) in masses.into_iter().enumerate() {
            if !m.is_finite() || m < 0.0 {
                self.cdf.clear();
                return Err(SamplerError::NumericInvariant(format!(
                    "mass {m} at index {i}"
                )));
            }
            self.total += m;
            self.cdf.push(self.total);
        }
        if !(self.total.is_finite() && self.total > 0.0) {
            let total = self.total;
            self.cdf.clear();
            self.total = 0.0;
            return Err(SamplerError::NumericInvariant(format!(
                "total mass {total} is not positive"
            )));
        }
        let total = self.total;
        for c in self.cdf.iter_mut() {
            *c /= total;
        }
        Ok(())
    }

    /// Index of the first bucket whose cumulative value exceeds `u`.
    #[inline]
    pub fn locate(&self, u: f64) -> Result<usize> {
        let i = self.cdf.partition_point(|&c| c <= u);
        if i >= self.cdf.len() {
            return Err(SamplerError::NumericInvariant(format!(
                "draw {u} fell past the last of {} buckets",
                self.cdf.len()
            )));
        }
        Ok(i)
    }

    /// Draw a 0-based index.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize> {
        let u: f64 = rng.random();
        self.locate(u)
    }

    /// The normalized cumulative values.
    pub fn as_slice(&self) -> &[f64] {
        &self.cdf
    }

    /// The unnormalized grand total of the last successful fill.
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.cdf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cdf.is_empty()
    }
}
