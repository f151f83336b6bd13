use thiserror::Error;

/// Errors raised by the samplers and their count tables.
///
/// Every variant is reported before any state is mutated.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SamplerError {
    /// Invalid caller-supplied dimension, parameter or buffer size.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// A word, topic, label, row, column or position outside its domain.
    #[error("{what} index {index} is out of range (bound {bound})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        bound: usize,
    },
    /// The local distribution was degenerate or a draw left the domain.
    #[error("numeric invariant violated: {0}")]
    NumericInvariant(String),
    /// A count table of zero or unrepresentable size was requested.
    #[error("cannot allocate a {rows}x{cols} count table")]
    Allocation { rows: usize, cols: usize },
}

pub type Result<T> = std::result::Result<T, SamplerError>;

impl SamplerError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        SamplerError::Configuration(msg.into())
    }

    /// Whether this error belongs to the configuration family, which
    /// includes out-of-range indices.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SamplerError::Configuration(_) | SamplerError::IndexOutOfRange { .. }
        )
    }
}

/// Checks a 1-based index against `1..=bound` and returns it 0-based.
pub(crate) fn one_based(what: &'static str, index: u32, bound: usize) -> Result<usize> {
    let i = index as usize;
    if i == 0 || i > bound {
        return Err(SamplerError::IndexOutOfRange {
            what,
            index: i,
            bound,
        });
    }
    Ok(i - 1)
}
