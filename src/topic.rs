//! Collapsed Gibbs topic draw for a single word.

use rand::Rng;
use tracing::trace;

use crate::cdf::CumulativeTable;
use crate::config::LdaConfig;
use crate::counts::CountMatrix;
use crate::error::{Result, SamplerError, one_based};

/// The sufficient statistics a topic draw conditions on.
#[derive(Debug, Clone, Copy)]
pub struct TopicStats<'a> {
    /// Word-topic counts over the whole corpus, `vocab_size x num_topics`.
    pub words: &'a CountMatrix,
    /// Topic histogram of the document being resampled.
    pub document: &'a [u32],
    /// Number of tokens assigned to each topic corpus-wide.
    pub totals: &'a [u32],
}

impl TopicStats<'_> {
    /// Check the tables against the sampler's dimensions.
    pub fn validate(&self, config: &LdaConfig) -> Result<()> {
        let k = config.num_topics;
        if self.words.cols() != k || self.words.rows() != config.vocab_size {
            return Err(SamplerError::config(format!(
                "word-topic counts are {}x{}, expected {}x{k}",
                self.words.rows(),
                self.words.cols(),
                config.vocab_size
            )));
        }
        if self.document.len() != k {
            return Err(SamplerError::config(format!(
                "document histogram has {} topics, expected {k}",
                self.document.len()
            )));
        }
        if self.totals.len() != k {
            return Err(SamplerError::config(format!(
                "topic totals have {} topics, expected {k}",
                self.totals.len()
            )));
        }
        Ok(())
    }
}

/// Draws a topic for one word from its collapsed conditional.
///
/// The sampler owns a scratch [`CumulativeTable`] that is refilled on
/// every draw. It never mutates the statistics it is given.
#[derive(Debug, Clone)]
pub struct TopicSampler {
    config: LdaConfig,
    cdf: CumulativeTable,
}

impl TopicSampler {
    pub fn new(config: LdaConfig) -> Result<Self> {
        config.validate()?;
        Ok(TopicSampler {
            cdf: CumulativeTable::with_capacity(config.num_topics),
            config,
        })
    }

    pub fn config(&self) -> &LdaConfig {
        &self.config
    }

    /// Fill the scratch table with the normalized conditional over topics
    /// for `word` (1-based), whose current topic `current` (1-based) is
    /// excluded from the counts.
    ///
    /// Topic `j` gets mass
    /// `(n_dj + alpha) * (n_wj + eta) / (n_j + K * eta)`.
    pub fn distribution(
        &mut self,
        word: u32,
        current: u32,
        stats: &TopicStats<'_>,
    ) -> Result<&[f64]> {
        stats.validate(&self.config)?;
        self.fill(word, current, stats)?;
        Ok(self.cdf.as_slice())
    }

    /// Draw a new 1-based topic for `word`.
    ///
    /// # Errors
    /// Configuration errors for mismatched tables or out-of-range
    /// indices; [`SamplerError::NumericInvariant`] when the conditional
    /// is degenerate, e.g. self-exclusion drove a count below zero.
    pub fn sample<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        word: u32,
        current: u32,
        stats: &TopicStats<'_>,
    ) -> Result<u32> {
        stats.validate(&self.config)?;
        self.sample_unchecked(rng, word, current, stats)
    }

    /// [`sample`](Self::sample) without re-validating table shapes, for
    /// drivers that validated them once per document.
    pub(crate) fn sample_unchecked<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        word: u32,
        current: u32,
        stats: &TopicStats<'_>,
    ) -> Result<u32> {
        self.fill(word, current, stats)?;
        let k = self.config.num_topics;
        let topic = self.cdf.draw(rng)? + 1;
        if topic > k {
            return Err(SamplerError::NumericInvariant(format!(
                "sampled topic {topic} outside 1..={k}"
            )));
        }
        trace!(word, current, topic, "sampled topic");
        Ok(topic as u32)
    }

    fn fill(&mut self, word: u32, current: u32, stats: &TopicStats<'_>) -> Result<()> {
        let LdaConfig {
            num_topics,
            alpha,
            eta,
            ..
        } = self.config;
        let w = one_based("word", word, stats.words.rows())?;
        let current = one_based("topic", current, num_topics)?;
        let global = stats.words.row(w)?;
        let k_eta = num_topics as f64 * eta;

        let masses = (0..num_topics).map(|j| {
            let mut g = global[j] as f64;
            let mut l = stats.document[j] as f64;
            if j == current {
                g -= 1.0;
                l -= 1.0;
            }
            (l + alpha) * (g + eta) / (stats.totals[j] as f64 + k_eta)
        });
        self.cdf.fill(masses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{SeedableRng, rngs::StdRng};

    fn config(num_topics: usize, vocab_size: usize, alpha: f64, eta: f64) -> LdaConfig {
        LdaConfig {
            num_topics,
            vocab_size,
            alpha,
            eta,
        }
    }

    #[test]
    fn hand_computed_distribution() {
        let (alpha, eta, k) = (0.1, 0.01, 3.0);
        let words = CountMatrix::from_packed(vec![10, 0, 0], 3).unwrap();
        let stats = TopicStats {
            words: &words,
            document: &[5, 0, 0],
            totals: &[20, 5, 5],
        };
        let mut s = TopicSampler::new(config(3, 1, alpha, eta)).unwrap();
        let cdf = s.distribution(1, 1, &stats).unwrap().to_vec();

        let p0 = (4.0 + alpha) * (9.0 + eta) / (20.0 + k * eta);
        let p1 = (0.0 + alpha) * (0.0 + eta) / (5.0 + k * eta);
        let p2 = p1;
        let total = p0 + p1 + p2;
        let expect = [p0 / total, (p0 + p1) / total, 1.0];
        for (c, e) in cdf.iter().zip(expect) {
            assert_abs_diff_eq!(*c, e, epsilon = 1e-9);
        }
    }

    #[test]
    fn concentrated_mass_is_deterministic() {
        // alpha = 0 and an empty document elsewhere leave all mass on topic 3
        let words = CountMatrix::from_packed(vec![2, 2, 7, 2, 1, 1, 1, 1], 4).unwrap();
        let stats = TopicStats {
            words: &words,
            document: &[0, 0, 6, 0],
            totals: &[3, 3, 8, 3],
        };
        let mut s = TopicSampler::new(config(4, 2, 0.0, 0.5)).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..10_000 {
            assert_eq!(s.sample(&mut rng, 1, 3, &stats).unwrap(), 3);
        }
    }

    #[test]
    fn samples_stay_in_domain() {
        let words = CountMatrix::from_packed(vec![3, 1, 4, 1, 5, 9, 2, 6, 5], 3).unwrap();
        let stats = TopicStats {
            words: &words,
            document: &[2, 2, 1],
            totals: &[10, 12, 19],
        };
        let mut s = TopicSampler::new(config(3, 3, 0.5, 0.1)).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for i in 0..2_000u32 {
            let word = i % 3 + 1;
            let t = s.sample(&mut rng, word, 1, &stats).unwrap();
            assert!((1..=3).contains(&t));
        }
    }

    #[test]
    fn rejects_bad_indices_and_shapes() {
        let words = CountMatrix::zero(2, 3).unwrap();
        let stats = TopicStats {
            words: &words,
            document: &[1, 0, 0],
            totals: &[1, 0, 0],
        };
        let mut s = TopicSampler::new(config(3, 2, 0.1, 0.1)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(s.sample(&mut rng, 0, 1, &stats).unwrap_err().is_configuration());
        assert!(s.sample(&mut rng, 3, 1, &stats).unwrap_err().is_configuration());
        assert!(s.sample(&mut rng, 1, 4, &stats).unwrap_err().is_configuration());

        let short = TopicStats {
            document: &[1, 0],
            ..stats
        };
        assert!(s.sample(&mut rng, 1, 1, &short).unwrap_err().is_configuration());

        let mut wide = TopicSampler::new(config(3, 5, 0.1, 0.1)).unwrap();
        assert!(wide.sample(&mut rng, 1, 1, &stats).is_err());
    }

    #[test]
    fn inconsistent_counts_are_a_numeric_error() {
        // excluding the current topic drives the document count negative
        let words = CountMatrix::from_packed(vec![1, 0], 2).unwrap();
        let stats = TopicStats {
            words: &words,
            document: &[0, 0],
            totals: &[1, 0],
        };
        let mut s = TopicSampler::new(config(2, 1, 0.1, 0.1)).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        assert!(matches!(
            s.sample(&mut rng, 1, 1, &stats),
            Err(SamplerError::NumericInvariant(_))
        ));
    }
}
