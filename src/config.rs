//! Sampler configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SamplerError};

/// Hyperparameters and dimensions of an LDA topic sampler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LdaConfig {
    /// Number of topics; topics are labelled `1..=num_topics`.
    pub num_topics: usize,
    /// Vocabulary size; words are labelled `1..=vocab_size`.
    pub vocab_size: usize,
    /// Dirichlet smoothing of the per-document topic mixture.
    pub alpha: f64,
    /// Dirichlet smoothing of the per-topic word distribution.
    pub eta: f64,
}

impl LdaConfig {
    pub fn validate(&self) -> Result<()> {
        if self.num_topics == 0 {
            return Err(SamplerError::config("num_topics must be > 0"));
        }
        if self.vocab_size == 0 {
            return Err(SamplerError::config("vocab_size must be > 0"));
        }
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(SamplerError::config(format!(
                "alpha must be finite and >= 0, got {}",
                self.alpha
            )));
        }
        if !(self.eta.is_finite() && self.eta >= 0.0) {
            return Err(SamplerError::config(format!(
                "eta must be finite and >= 0, got {}",
                self.eta
            )));
        }
        Ok(())
    }
}

/// Ordering constraint between two label classes: every `before` label
/// must precede every `after` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintConfig {
    /// Size of the label domain `1..=num_labels`.
    pub num_labels: u32,
    pub before: u32,
    pub after: u32,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        ConstraintConfig {
            num_labels: 10,
            before: 1,
            after: 2,
        }
    }
}

impl ConstraintConfig {
    pub fn validate(&self) -> Result<()> {
        // A constrained draw excludes one label, so two are needed.
        if self.num_labels < 2 {
            return Err(SamplerError::config("num_labels must be >= 2"));
        }
        for (name, label) in [("before", self.before), ("after", self.after)] {
            if label == 0 || label > self.num_labels {
                return Err(SamplerError::config(format!(
                    "{name} label {label} outside 1..={}",
                    self.num_labels
                )));
            }
        }
        if self.before == self.after {
            return Err(SamplerError::config("before and after labels must differ"));
        }
        Ok(())
    }
}

/// Parameters of a biased random walk over `start..=finish`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkConfig {
    pub start: i32,
    pub finish: i32,
    pub num_samples: usize,
    /// Probability of repeating the previous value.
    pub beta: f64,
}

impl WalkConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.beta) {
            return Err(SamplerError::config(format!(
                "beta has to be within [0,1], got {}",
                self.beta
            )));
        }
        if self.start > self.finish {
            return Err(SamplerError::config(format!(
                "empty range {}..={}",
                self.start, self.finish
            )));
        }
        Ok(())
    }
}
