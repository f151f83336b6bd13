//! Linear-chain label state and its factor potentials.
//!
//! Potentials are scaled integers. Position `p` owns one block of the flat
//! factor buffer, `lens[p]` entries long and starting at the sum of the
//! lengths before it. Position 0's block begins with one unary entry per
//! label. Every later block ends in an `L x L` pairwise table indexed
//! `(previous label, label)`, preceded by `lens[p] mod L²` prefix entries.

use crate::error::{Result, SamplerError, one_based};

/// Divisor turning integer potentials into log-space scores.
pub const POTENTIAL_SCALE: f64 = 1000.0;

/// Current labels of a chain, each in `1..=num_labels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelChain {
    labels: Vec<u32>,
    num_labels: u32,
}

impl LabelChain {
    pub fn new(labels: Vec<u32>, num_labels: u32) -> Result<Self> {
        if num_labels == 0 {
            return Err(SamplerError::config("label domain is empty"));
        }
        for &l in &labels {
            one_based("label", l, num_labels as usize)?;
        }
        Ok(LabelChain { labels, num_labels })
    }

    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    pub fn into_labels(self) -> Vec<u32> {
        self.labels
    }

    pub fn num_labels(&self) -> u32 {
        self.num_labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn check_position(&self, position: usize) -> Result<()> {
        if position >= self.labels.len() {
            return Err(SamplerError::IndexOutOfRange {
                what: "position",
                index: position,
                bound: self.labels.len(),
            });
        }
        Ok(())
    }

    pub fn label(&self, position: usize) -> Result<u32> {
        self.check_position(position)?;
        Ok(self.labels[position])
    }

    /// Overwrite the label at `position`.
    pub fn set(&mut self, position: usize, label: u32) -> Result<()> {
        self.check_position(position)?;
        one_based("label", label, self.num_labels as usize)?;
        self.labels[position] = label;
        Ok(())
    }
}

/// Read-only factor potentials of a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorTable {
    factors: Vec<i32>,
    lens: Vec<usize>,
    offsets: Vec<usize>,
    num_labels: u32,
}

impl FactorTable {
    /// # Errors
    /// [`SamplerError::Configuration`] unless there is one length per
    /// position, position 0 holds at least `num_labels` entries, every
    /// later position holds at least `num_labels²`, and the lengths add
    /// up to `factors.len()`.
    pub fn new(factors: Vec<i32>, lens: Vec<usize>, num_labels: u32) -> Result<Self> {
        if num_labels == 0 {
            return Err(SamplerError::config("label domain is empty"));
        }
        if lens.is_empty() {
            return Err(SamplerError::config("factor table covers no positions"));
        }
        let l = num_labels as usize;
        let square = l
            .checked_mul(l)
            .ok_or_else(|| SamplerError::config("label domain too large"))?;
        let mut offsets = Vec::with_capacity(lens.len());
        let mut offset = 0usize;
        for (p, &len) in lens.iter().enumerate() {
            let need = if p == 0 { l } else { square };
            if len < need {
                return Err(SamplerError::config(format!(
                    "position {p} holds {len} factors, needs at least {need}"
                )));
            }
            offsets.push(offset);
            offset = offset
                .checked_add(len)
                .ok_or_else(|| SamplerError::config("factor lengths overflow"))?;
        }
        if offset != factors.len() {
            return Err(SamplerError::config(format!(
                "factor lengths sum to {offset} but the buffer holds {}",
                factors.len()
            )));
        }
        Ok(FactorTable {
            factors,
            lens,
            offsets,
            num_labels,
        })
    }

    pub fn num_labels(&self) -> u32 {
        self.num_labels
    }

    /// Number of chain positions covered.
    pub fn positions(&self) -> usize {
        self.lens.len()
    }

    /// Check that `chain` has this table's length and label domain.
    pub fn check_chain(&self, chain: &LabelChain) -> Result<()> {
        if chain.len() != self.positions() || chain.num_labels() != self.num_labels {
            return Err(SamplerError::config(format!(
                "chain of {} positions over {} labels does not match \
                 factors for {} positions over {} labels",
                chain.len(),
                chain.num_labels(),
                self.positions(),
                self.num_labels
            )));
        }
        Ok(())
    }

    #[inline]
    fn unary(&self, label: u32) -> i64 {
        self.factors[label as usize - 1] as i64
    }

    #[inline]
    fn pairwise(&self, position: usize, prev: u32, label: u32) -> i64 {
        let l = self.num_labels as usize;
        let spos = self.lens[position] % (l * l);
        let i = self.offsets[position] + spos + (prev as usize - 1) * l + label as usize - 1;
        self.factors[i] as i64
    }

    /// Potential of putting `label` at `position`, given the labels of its
    /// neighbours in `chain`: the factor linking it to the previous label
    /// (or its unary factor at position 0) plus the factor linking it to
    /// the next label, if any.
    ///
    /// The caller guarantees `chain` matches the table and that
    /// `position` and `label` are in range.
    #[inline]
    pub(crate) fn local_potential(&self, chain: &LabelChain, position: usize, label: u32) -> i64 {
        let labels = chain.labels();
        let mut pi = if position == 0 {
            self.unary(label)
        } else {
            self.pairwise(position, labels[position - 1], label)
        };
        if position + 1 < labels.len() {
            pi += self.pairwise(position + 1, label, labels[position + 1]);
        }
        pi
    }

    /// Checked form of [`local_potential`](Self::local_potential).
    pub fn potential(&self, chain: &LabelChain, position: usize, label: u32) -> Result<i64> {
        self.check_chain(chain)?;
        chain.check_position(position)?;
        one_based("label", label, self.num_labels as usize)?;
        Ok(self.local_potential(chain, position, label))
    }
}

/// Whether a chain sampler has seen its first observation yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingFirstObservation,
    SteadyState,
}

/// Running state threaded by the caller through successive chain steps.
///
/// `run_length` counts consecutive steps that left the chain unchanged,
/// restarting at 1 whenever a step writes a different label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SamplerState {
    pub position: Option<usize>,
    pub label: Option<u32>,
    pub run_length: u32,
    pub accepted: u64,
    pub rejected: u64,
}

impl SamplerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match self.position {
            None => Phase::AwaitingFirstObservation,
            Some(_) => Phase::SteadyState,
        }
    }

    /// Fraction of steps accepted so far, `None` before the first step.
    pub fn acceptance_rate(&self) -> Option<f64> {
        let steps = self.accepted + self.rejected;
        (steps > 0).then(|| self.accepted as f64 / steps as f64)
    }

    /// Record one step at `position`. `accepted` carries the label
    /// written, if any, and whether it differs from the previous one.
    pub(crate) fn advance(mut self, position: usize, accepted: Option<(u32, bool)>) -> Self {
        self.position = Some(position);
        match accepted {
            Some((label, changed)) => {
                self.label = Some(label);
                self.accepted += 1;
                self.run_length = if changed { 1 } else { self.run_length.saturating_add(1) };
            }
            None => {
                self.rejected += 1;
                self.run_length = self.run_length.saturating_add(1);
            }
        }
        self
    }
}
