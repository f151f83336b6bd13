//! # gibbstables
//!
//! Count-table samplers for two discrete inference loops:
//!
//! 1. **Collapsed Gibbs sampling for LDA**: draw a topic for each word from
//!    its conditional given word-topic counts ([`TopicSampler`],
//!    [`reassign`], [`LdaTrainer`]).
//! 2. **Label sampling over a linear-chain CRF**: Metropolis-Hastings
//!    ([`MetropolisHastings`]) and Gibbs ([`GibbsLabelSampler`]) steps
//!    driven by scaled-integer factor potentials, plus an ordering
//!    constrained label sampler ([`ConstraintSampler`]).
//!
//! Both share one inner loop: build a small categorical distribution from
//! the current statistics, draw from it with an inverse-CDF scan, and
//! update the counts or labels. The distribution lives in a reusable
//! [`CumulativeTable`], so the loop does not allocate per token.
//!
//! ## Quick start (LDA)
//!
//! ```rust,ignore
//! use gibbstables::{LdaConfig, LdaTrainer};
//! use rand::SeedableRng;
//!
//! # fn main() -> Result<(), gibbstables::SamplerError> {
//! let config = LdaConfig { num_topics: 2, vocab_size: 4, alpha: 0.1, eta: 0.01 };
//! let corpus = vec![vec![1, 2, 1, 2], vec![3, 4, 4, 3]];
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//!
//! let mut lda = LdaTrainer::new(config, corpus, &mut rng)?;
//! lda.run(&mut rng, 50)?;
//! println!("{:?}", lda.top_words(1, 2)?);
//! # Ok(()) }
//! ```
//!
//! ## Quick start (chain)
//!
//! ```rust,ignore
//! use gibbstables::{FactorTable, LabelChain, MetropolisHastings, SamplerState};
//!
//! # fn main() -> Result<(), gibbstables::SamplerError> {
//! let factors = FactorTable::new(vec![10, 20, 1, 2, 3, 4], vec![2, 4], 2)?;
//! let mut chain = LabelChain::new(vec![1, 1], 2)?;
//! let mh = MetropolisHastings::uniform(2)?;
//! let mut rng = rand::rng();
//!
//! let state = (0..100).map(|i| i % 2).try_fold(SamplerState::new(), |s, p| {
//!     mh.step(s, &mut chain, &factors, p, &mut rng).map(|(s, _)| s)
//! })?;
//! println!("acceptance rate {:?}", state.acceptance_rate());
//! # Ok(()) }
//! ```
//!
//! ## Conventions
//! * Words, topics and labels are **1-based** at the API boundary; rows,
//!   columns and chain positions are 0-based.
//! * Every operation validates its inputs before it mutates anything.
//! * The generator is always passed in. Nothing here seeds or stores a
//!   global RNG, and running state is threaded explicitly by the caller.
//!
//! ## Performance
//! * **Topic draw**: O(K) to build the conditional, O(log K) to search it.
//! * **Chain step**: O(1) factor lookups per label thanks to precomputed
//!   block offsets; O(L) for a Gibbs step.
//!
//! ## Logging
//! Per-step decisions are emitted as `tracing` events at `debug`/`trace`
//! level and sweeps at `info`; install a subscriber to see them.

mod cdf;
mod chain;
mod config;
mod constraint;
mod counts;
mod document;
mod error;
mod gibbs;
mod lda;
mod mh;
mod sampler;
mod topic;
mod walk;

/// A minimal interface for infallible “index samplers”.
/// Implemented by `UniformSampler` (equal odds). `CumulativeTable` can be
/// empty after a failed fill, so it only offers the checked
/// [`CumulativeTable::draw`].
#[allow(clippy::len_without_is_empty)]
pub trait IndexSampler {
    fn len(&self) -> usize;
    fn sample_index<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> usize;
}

pub use cdf::CumulativeTable;
pub use chain::{FactorTable, LabelChain, POTENTIAL_SCALE, Phase, SamplerState};
pub use config::{ConstraintConfig, LdaConfig, WalkConfig};
pub use constraint::{ConstraintSampler, first_index_of, last_index_of};
pub use counts::CountMatrix;
pub use document::{Reassignment, random_topics, reassign};
pub use error::{Result, SamplerError};
pub use gibbs::{GibbsDraw, GibbsLabelSampler};
pub use lda::{Document, LdaTrainer};
pub use mh::{MetropolisHastings, ProposalRule, StepOutcome, UniformProposal, acceptance_ratio};
pub use sampler::UniformSampler;
pub use topic::{TopicSampler, TopicStats};
pub use walk::BiasedWalk;
