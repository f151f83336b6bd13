//! Label sampling under a two-class ordering constraint.
//!
//! With the default configuration every label `1` must come before every
//! label `2`: once a `2` has appeared, later positions may not draw `1`,
//! and positions before the last `1` may not draw `2`.

use rand::Rng;
use tracing::debug;

use crate::chain::LabelChain;
use crate::config::ConstraintConfig;
use crate::error::{Result, SamplerError};
use crate::mh::ProposalRule;
use crate::sampler::UniformSampler;

/// 0-based index of the first occurrence of `label`.
pub fn first_index_of(labels: &[u32], label: u32) -> Option<usize> {
    labels.iter().position(|&l| l == label)
}

/// 0-based index of the last occurrence of `label`.
pub fn last_index_of(labels: &[u32], label: u32) -> Option<usize> {
    labels.iter().rposition(|&l| l == label)
}

#[derive(Debug, Clone, Copy)]
pub struct ConstraintSampler {
    config: ConstraintConfig,
    labels: UniformSampler,
}

impl ConstraintSampler {
    pub fn new(config: ConstraintConfig) -> Result<Self> {
        config.validate()?;
        Ok(ConstraintSampler {
            labels: UniformSampler::new(config.num_labels as usize)?,
            config,
        })
    }

    pub fn config(&self) -> &ConstraintConfig {
        &self.config
    }

    /// The label a draw at `position` must avoid, if any.
    pub fn excluded(&self, labels: &[u32], position: usize) -> Option<u32> {
        let ConstraintConfig { before, after, .. } = self.config;
        if first_index_of(labels, after).is_some_and(|first| position > first) {
            Some(before)
        } else if last_index_of(labels, before).is_some_and(|last| position < last) {
            Some(after)
        } else {
            None
        }
    }

    /// Whether no `before` label appears after the first `after` label.
    pub fn satisfied_by(&self, labels: &[u32]) -> bool {
        match (
            first_index_of(labels, self.config.after),
            last_index_of(labels, self.config.before),
        ) {
            (Some(first_after), Some(last_before)) => last_before < first_after,
            _ => true,
        }
    }

    fn check(&self, chain: &LabelChain, position: usize) -> Result<()> {
        if chain.num_labels() != self.config.num_labels {
            return Err(SamplerError::config(format!(
                "chain has {} labels, constraint expects {}",
                chain.num_labels(),
                self.config.num_labels
            )));
        }
        chain.check_position(position)
    }

    /// Draw a label for `position` uniformly among those the constraint
    /// allows, by rejection.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        chain: &LabelChain,
        position: usize,
        rng: &mut R,
    ) -> Result<u32> {
        self.check(chain, position)?;
        let excluded = self.excluded(chain.labels(), position);
        let label = loop {
            let l = self.labels.sample_label(rng);
            if Some(l) != excluded {
                break l;
            }
        };
        debug!(position, ?excluded, label, "constrained label");
        Ok(label)
    }

    /// Draw a constrained label for `position` and write it into the chain.
    pub fn resample<R: Rng + ?Sized>(
        &self,
        chain: &mut LabelChain,
        position: usize,
        rng: &mut R,
    ) -> Result<u32> {
        let label = self.sample(chain, position, rng)?;
        chain.set(position, label)?;
        Ok(label)
    }
}

impl ProposalRule for ConstraintSampler {
    fn propose<R: Rng + ?Sized>(
        &self,
        chain: &LabelChain,
        position: usize,
        rng: &mut R,
    ) -> Result<u32> {
        self.sample(chain, position, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{FactorTable, SamplerState};
    use crate::mh::MetropolisHastings;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn scans() {
        let labels = [3, 1, 2, 1, 2];
        assert_eq!(first_index_of(&labels, 2), Some(2));
        assert_eq!(last_index_of(&labels, 1), Some(3));
        assert_eq!(first_index_of(&labels, 7), None);
        assert_eq!(last_index_of(&[], 1), None);
    }

    #[test]
    fn after_first_b_never_draws_a() {
        let s = ConstraintSampler::new(ConstraintConfig::default()).unwrap();
        let chain = LabelChain::new(vec![3, 4, 5, 6, 7, 2, 3, 8], 10).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let l = s.sample(&chain, 6, &mut rng).unwrap();
            assert_ne!(l, 1);
            assert!((1..=10).contains(&l));
        }
    }

    #[test]
    fn before_any_b_is_unconstrained() {
        let s = ConstraintSampler::new(ConstraintConfig::default()).unwrap();
        let chain = LabelChain::new(vec![3, 4, 5, 6, 7, 2, 3, 8], 10).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let mut seen = [false; 10];
        for _ in 0..1000 {
            seen[s.sample(&chain, 2, &mut rng).unwrap() as usize - 1] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn before_last_a_never_draws_b() {
        let s = ConstraintSampler::new(ConstraintConfig::default()).unwrap();
        let chain = LabelChain::new(vec![3, 4, 1, 5], 10).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            assert_ne!(s.sample(&chain, 1, &mut rng).unwrap(), 2);
        }
    }

    #[test]
    fn configurable_domain() {
        let cfg = ConstraintConfig {
            num_labels: 3,
            before: 3,
            after: 1,
        };
        let s = ConstraintSampler::new(cfg).unwrap();
        let mut chain = LabelChain::new(vec![1, 2, 2], 3).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..500 {
            let l = s.resample(&mut chain, 2, &mut rng).unwrap();
            assert!(l == 1 || l == 2);
        }
        assert!(s.satisfied_by(chain.labels()));
        let wrong = LabelChain::new(vec![1, 2], 10).unwrap();
        assert!(s.sample(&wrong, 0, &mut rng).unwrap_err().is_configuration());
        assert!(s.sample(&chain, 3, &mut rng).is_err());
    }

    #[test]
    fn satisfaction() {
        let s = ConstraintSampler::new(ConstraintConfig::default()).unwrap();
        assert!(s.satisfied_by(&[1, 1, 3, 2, 2]));
        assert!(s.satisfied_by(&[3, 4]));
        assert!(s.satisfied_by(&[2, 2]));
        assert!(!s.satisfied_by(&[1, 2, 1]));
    }

    #[test]
    fn resampling_a_valid_chain_keeps_it_valid() {
        let s = ConstraintSampler::new(ConstraintConfig::default()).unwrap();
        let mut chain = LabelChain::new(vec![1, 3, 1, 4, 2, 5, 2], 10).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for i in 0..5_000 {
            s.resample(&mut chain, i % 7, &mut rng).unwrap();
            assert!(s.satisfied_by(chain.labels()), "{:?}", chain.labels());
        }
    }

    #[test]
    fn drives_metropolis_hastings() {
        let s = ConstraintSampler::new(ConstraintConfig::default()).unwrap();
        let n = 6;
        let lens: Vec<usize> = (0..n).map(|p| if p == 0 { 10 } else { 100 }).collect();
        let factors = vec![0; lens.iter().sum::<usize>()];
        let t = FactorTable::new(factors, lens, 10).unwrap();
        let mut chain = LabelChain::new(vec![1, 1, 3, 2, 2, 4], 10).unwrap();
        let mh = MetropolisHastings::new(s);
        let mut rng = StdRng::seed_from_u64(6);
        let mut state = SamplerState::new();
        for i in 0..3_000 {
            let (next, out) = mh.step(state, &mut chain, &t, i % n, &mut rng).unwrap();
            // flat potentials accept every proposal
            assert!(out.is_accepted());
            state = next;
            assert!(mh.proposal().satisfied_by(chain.labels()));
        }
    }
}
