//! Gibbs label steps: resample a position from its full local conditional.

use rand::Rng;
use tracing::debug;

use crate::cdf::CumulativeTable;
use crate::chain::{FactorTable, LabelChain, POTENTIAL_SCALE, SamplerState};
use crate::error::Result;

/// Label drawn by a Gibbs step. Gibbs steps always accept, so the weight
/// is always `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GibbsDraw {
    pub label: u32,
    pub weight: f64,
}

/// Draws each label with probability proportional to
/// `exp(potential / 1000)`.
#[derive(Debug, Clone, Default)]
pub struct GibbsLabelSampler {
    cdf: CumulativeTable,
}

impl GibbsLabelSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the scratch table with the normalized conditional over labels
    /// at `position`, given the chain's other labels.
    pub fn conditional(
        &mut self,
        chain: &LabelChain,
        factors: &FactorTable,
        position: usize,
    ) -> Result<&[f64]> {
        factors.check_chain(chain)?;
        chain.check_position(position)?;
        self.fill(chain, factors, position)?;
        Ok(self.cdf.as_slice())
    }

    fn fill(&mut self, chain: &LabelChain, factors: &FactorTable, position: usize) -> Result<()> {
        let labels = 1..=chain.num_labels();
        // shift by the largest potential so exp() cannot overflow
        let max = labels
            .clone()
            .map(|l| factors.local_potential(chain, position, l))
            .max()
            .unwrap_or(0);
        self.cdf.fill(labels.map(|l| {
            let pi = factors.local_potential(chain, position, l);
            ((pi - max) as f64 / POTENTIAL_SCALE).exp()
        }))
    }

    /// Resample the label at `position` and write it into the chain.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        state: SamplerState,
        chain: &mut LabelChain,
        factors: &FactorTable,
        position: usize,
        rng: &mut R,
    ) -> Result<(SamplerState, GibbsDraw)> {
        factors.check_chain(chain)?;
        let current = chain.label(position)?;
        self.fill(chain, factors, position)?;
        let label = self.cdf.draw(rng)? as u32 + 1;
        debug!(position, current, label, "gibbs step");

        chain.set(position, label)?;
        let state = state.advance(position, Some((label, label != current)));
        Ok((state, GibbsDraw { label, weight: 1.0 }))
    }
}
