//! Metropolis-Hastings label steps over a chain.

use rand::Rng;
use tracing::debug;

use crate::chain::{FactorTable, LabelChain, POTENTIAL_SCALE, SamplerState};
use crate::error::{Result, one_based};
use crate::sampler::UniformSampler;

/// Result of one Metropolis-Hastings step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// The candidate was written into the chain.
    Accepted { label: u32, alpha: f64 },
    /// The chain was left as it was.
    Rejected { alpha: f64 },
}

impl StepOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, StepOutcome::Accepted { .. })
    }

    /// The acceptance ratio the decision was made against.
    pub fn alpha(&self) -> f64 {
        match *self {
            StepOutcome::Accepted { alpha, .. } | StepOutcome::Rejected { alpha } => alpha,
        }
    }
}

/// Proposes a candidate label for a chain position.
pub trait ProposalRule {
    fn propose<R: Rng + ?Sized>(
        &self,
        chain: &LabelChain,
        position: usize,
        rng: &mut R,
    ) -> Result<u32>;
}

/// Proposes any label with equal probability.
#[derive(Debug, Clone, Copy)]
pub struct UniformProposal {
    labels: UniformSampler,
}

impl UniformProposal {
    pub fn new(num_labels: u32) -> Result<Self> {
        Ok(UniformProposal {
            labels: UniformSampler::new(num_labels as usize)?,
        })
    }
}

impl ProposalRule for UniformProposal {
    fn propose<R: Rng + ?Sized>(
        &self,
        _chain: &LabelChain,
        _position: usize,
        rng: &mut R,
    ) -> Result<u32> {
        Ok(self.labels.sample_label(rng))
    }
}

/// `exp((new - old) / 1000)` for a candidate versus the current label.
pub fn acceptance_ratio(new_potential: i64, old_potential: i64) -> f64 {
    ((new_potential - old_potential) as f64 / POTENTIAL_SCALE).exp()
}

/// Metropolis-Hastings sampler over chain labels.
///
/// A step borrows the chain mutably for its duration and writes into it
/// only on acceptance. The [`SamplerState`] is passed in and handed back,
/// so a sequence of steps is a fold over positions.
#[derive(Debug, Clone, Copy)]
pub struct MetropolisHastings<P> {
    proposal: P,
}

impl MetropolisHastings<UniformProposal> {
    pub fn uniform(num_labels: u32) -> Result<Self> {
        Ok(Self::new(UniformProposal::new(num_labels)?))
    }
}

impl<P: ProposalRule> MetropolisHastings<P> {
    pub fn new(proposal: P) -> Self {
        MetropolisHastings { proposal }
    }

    pub fn proposal(&self) -> &P {
        &self.proposal
    }

    /// Propose a label for `position` and accept or reject it.
    pub fn step<R: Rng + ?Sized>(
        &self,
        state: SamplerState,
        chain: &mut LabelChain,
        factors: &FactorTable,
        position: usize,
        rng: &mut R,
    ) -> Result<(SamplerState, StepOutcome)> {
        factors.check_chain(chain)?;
        chain.check_position(position)?;
        let candidate = self.proposal.propose(chain, position, rng)?;
        self.step_with_candidate(state, chain, factors, position, candidate, rng)
    }

    /// Accept or reject an explicit `candidate` for `position`.
    pub fn step_with_candidate<R: Rng + ?Sized>(
        &self,
        state: SamplerState,
        chain: &mut LabelChain,
        factors: &FactorTable,
        position: usize,
        candidate: u32,
        rng: &mut R,
    ) -> Result<(SamplerState, StepOutcome)> {
        factors.check_chain(chain)?;
        let current = chain.label(position)?;
        one_based("label", candidate, chain.num_labels() as usize)?;

        let old_pi = factors.local_potential(chain, position, current);
        let new_pi = factors.local_potential(chain, position, candidate);
        let alpha = acceptance_ratio(new_pi, old_pi);
        let u: f64 = rng.random();
        debug!(position, current, candidate, new_pi, old_pi, alpha, u, "metropolis-hastings step");

        if u < alpha {
            chain.set(position, candidate)?;
            let state = state.advance(position, Some((candidate, candidate != current)));
            Ok((state, StepOutcome::Accepted { label: candidate, alpha }))
        } else {
            Ok((state.advance(position, None), StepOutcome::Rejected { alpha }))
        }
    }
}
