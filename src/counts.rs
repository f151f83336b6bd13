//! Dense occurrence counts indexed by `(row, col)`.
//!
//! For LDA a row is a word and a column is a topic. The matrix is stored
//! row-major in one flat buffer, which is also the packed layout callers
//! exchange it in.

use crate::error::{Result, SamplerError, one_based};

/// Mutable dense table of non-negative counts.
///
/// Counts only ever grow through [`increment`](Self::increment),
/// [`batch_increment`](Self::batch_increment) and [`merge`](Self::merge);
/// a pass that needs fresh statistics builds a new matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMatrix {
    rows: usize,
    cols: usize,
    data: Vec<u32>,
}

impl CountMatrix {
    /// Allocate a zero-filled `rows x cols` table.
    ///
    /// # Errors
    /// [`SamplerError::Allocation`] if either dimension is zero, the cell
    /// count overflows, or the buffer cannot be reserved.
    pub fn zero(rows: usize, cols: usize) -> Result<Self> {
        let len = rows
            .checked_mul(cols)
            .filter(|&n| n > 0)
            .ok_or(SamplerError::Allocation { rows, cols })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| SamplerError::Allocation { rows, cols })?;
        data.resize(len, 0);
        Ok(CountMatrix { rows, cols, data })
    }

    /// Wrap a packed row-major buffer whose length is the only row signal.
    ///
    /// # Errors
    /// [`SamplerError::Configuration`] if `cols` is zero or does not
    /// divide the buffer length; [`SamplerError::Allocation`] if the
    /// buffer is empty.
    pub fn from_packed(data: Vec<u32>, cols: usize) -> Result<Self> {
        if cols == 0 {
            return Err(SamplerError::config("packed matrix with zero columns"));
        }
        if data.len() % cols != 0 {
            return Err(SamplerError::config(format!(
                "packed buffer of {} cells is not a multiple of {cols} columns",
                data.len()
            )));
        }
        let rows = data.len() / cols;
        if rows == 0 {
            return Err(SamplerError::Allocation { rows, cols });
        }
        Ok(CountMatrix { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows {
            return Err(SamplerError::IndexOutOfRange {
                what: "row",
                index: row,
                bound: self.rows,
            });
        }
        if col >= self.cols {
            return Err(SamplerError::IndexOutOfRange {
                what: "column",
                index: col,
                bound: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    /// Count at 0-based `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<u32> {
        Ok(self.data[self.index(row, col)?])
    }

    /// All counts of one 0-based row.
    pub fn row(&self, row: usize) -> Result<&[u32]> {
        let start = self.index(row, 0)?;
        Ok(&self.data[start..start + self.cols])
    }

    /// Add one to the cell at 0-based `(row, col)`.
    pub fn increment(&mut self, row: usize, col: usize) -> Result<()> {
        let i = self.index(row, col)?;
        self.data[i] = self.data[i]
            .checked_add(1)
            .ok_or_else(|| {
                SamplerError::NumericInvariant(format!("count overflow at ({row}, {col})"))
            })?;
        Ok(())
    }

    /// For each token `i`, add one to `[document[i] - 1][topics[i] - 1]`.
    ///
    /// Both slices hold 1-based indices. Every index is checked before
    /// the first cell is touched, so a failed call leaves the matrix as it
    /// was. Returns `self` so updates can be chained.
    pub fn batch_increment(&mut self, document: &[u32], topics: &[u32]) -> Result<&mut Self> {
        if document.len() != topics.len() {
            return Err(SamplerError::config(format!(
                "document has {} words but {} topic assignments",
                document.len(),
                topics.len()
            )));
        }
        for (&w, &t) in document.iter().zip(topics) {
            one_based("word", w, self.rows)?;
            one_based("topic", t, self.cols)?;
        }
        for (i, (&w, &t)) in document.iter().zip(topics).enumerate() {
            if let Err(e) = self.increment(w as usize - 1, t as usize - 1) {
                // undo the tokens already counted
                for (&w, &t) in document[..i].iter().zip(topics) {
                    let cell = (w as usize - 1) * self.cols + t as usize - 1;
                    self.data[cell] -= 1;
                }
                return Err(e);
            }
        }
        Ok(self)
    }

    /// Element-wise sum with an equally shaped matrix.
    ///
    /// Used to combine counts built from independent document batches;
    /// integer addition makes the merge order irrelevant.
    pub fn merge(&mut self, other: &CountMatrix) -> Result<()> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(SamplerError::config(format!(
                "cannot merge {}x{} counts into {}x{}",
                other.rows, other.cols, self.rows, self.cols
            )));
        }
        let mut merged = self.data.clone();
        for (a, &b) in merged.iter_mut().zip(&other.data) {
            *a = a
                .checked_add(b)
                .ok_or_else(|| SamplerError::NumericInvariant("count overflow in merge".into()))?;
        }
        self.data = merged;
        Ok(())
    }

    /// Per-column sums, i.e. corpus-wide topic totals.
    pub fn column_totals(&self) -> Vec<u32> {
        let mut totals = vec![0u32; self.cols];
        for row in self.data.chunks_exact(self.cols) {
            for (t, &c) in totals.iter_mut().zip(row) {
                *t = t.saturating_add(c);
            }
        }
        totals
    }

    /// Sum of all cells.
    pub fn total(&self) -> u64 {
        self.data.iter().map(|&c| c as u64).sum()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }

    pub fn into_packed(self) -> Vec<u32> {
        self.data
    }
}
