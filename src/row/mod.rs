#[cfg(test)]
mod tests;

use crate::error::Result;

/// A single `(column, value)` cell of one input row. Immutable once pushed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonzeroEntry {
    pub column: usize,
    pub value: f64,
}

/// Growable ordered storage for the nonzeros of one row.
///
/// Growth goes through [`Vec::try_reserve`] so that running out of memory
/// surfaces as [`ResourceExhaustion`](crate::error::ReadSparseError) instead
/// of aborting mid-parse. There is no upper bound on the entry count.
#[derive(Debug, Clone, Default)]
pub struct NonzeroBuffer {
    entries: Vec<NonzeroEntry>,
}

impl NonzeroBuffer {
    pub fn with_capacity(capacity: usize) -> Result<NonzeroBuffer> {
        let mut entries = Vec::new();
        entries.try_reserve(capacity)?;
        Ok(NonzeroBuffer { entries })
    }

    pub fn push(&mut self, entry: NonzeroEntry) -> Result<()> {
        self.entries.try_reserve(1)?;
        self.entries.push(entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the buffer, ordering entries by ascending column index.
    /// The sort is stable: duplicate columns keep their insertion order.
    pub fn into_sorted(mut self) -> Vec<NonzeroEntry> {
        self.entries.sort_by_key(|entry| entry.column);
        self.entries
    }
}

/// Outcome of offering one entry to a [`RowAccumulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Accepted,
    Truncated,
}

/// One row being filled during the parse, with the per-row cap applied.
#[derive(Debug)]
pub struct RowAccumulator {
    row_id: i64,
    buffer: NonzeroBuffer,
    limit: usize,
    truncated: bool,
}

impl RowAccumulator {
    /// `limit == 0` means unlimited. `capacity_hint` only presizes the
    /// buffer; rows grow past it on demand.
    pub fn new(row_id: i64, limit: usize, capacity_hint: usize) -> Result<RowAccumulator> {
        Ok(RowAccumulator {
            row_id,
            buffer: NonzeroBuffer::with_capacity(capacity_hint)?,
            limit,
            truncated: false,
        })
    }

    /// The id parsed from the first token of the line. Informational only:
    /// output positions are assigned by arrival order, never by this value.
    pub fn row_id(&self) -> i64 {
        self.row_id
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// True once the cap is reached. Never true with an unlimited cap.
    pub fn is_full(&self) -> bool {
        self.limit != 0 && self.buffer.len() >= self.limit
    }

    /// Records that the rest of the line was dropped by the cap.
    pub(crate) fn mark_truncated(&mut self) {
        self.truncated = true;
    }

    /// Offers one entry. Past the cap the entry is dropped, the row is
    /// flagged truncated and `Truncated` is returned; this is not an error.
    pub fn accept(&mut self, column: usize, value: f64) -> Result<RowStatus> {
        if self.is_full() {
            self.truncated = true;
            return Ok(RowStatus::Truncated);
        }
        self.buffer.push(NonzeroEntry { column, value })?;
        Ok(RowStatus::Accepted)
    }

    /// Sorts the row and freezes it. Consuming `self` transfers ownership
    /// towards the assembler; no entry can be accepted afterwards.
    pub fn finalize(self) -> FinalizedRow {
        FinalizedRow {
            entries: self.buffer.into_sorted(),
            truncated: self.truncated,
        }
    }
}

/// An immutable, column-sorted row ready for assembly.
///
/// Duplicate column indices are preserved verbatim, in insertion order.
/// The text format does not forbid them and downstream consumers of the
/// legacy format received them unmerged.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedRow {
    entries: Vec<NonzeroEntry>,
    truncated: bool,
}

impl FinalizedRow {
    /// An empty placeholder row, used for rejected or blank lines so that
    /// later rows keep their arrival position.
    pub fn empty() -> FinalizedRow {
        FinalizedRow {
            entries: Vec::new(),
            truncated: false,
        }
    }

    pub fn entries(&self) -> &[NonzeroEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}
