
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::csc::{assemble, CscMatrix};
use crate::error::{ReadSparseError, Result};
use crate::extent::ExtentTracker;
use crate::param_guard::ParamGuard;
use crate::row::{FinalizedRow, RowAccumulator, RowStatus};

/// A verified reader configuration ready to consume input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderValidParams {
    per_row_nonzero_limit: usize,
    treat_nan_as_nonzero: bool,
    max_format_errors: Option<usize>,
    row_capacity_hint: usize,
    progress_log_interval: usize,
}

impl ReaderValidParams {
    pub fn per_row_nonzero_limit(&self) -> usize {
        self.per_row_nonzero_limit
    }

    pub fn treat_nan_as_nonzero(&self) -> bool {
        self.treat_nan_as_nonzero
    }

    pub fn max_format_errors(&self) -> Option<usize> {
        self.max_format_errors
    }

    pub fn row_capacity_hint(&self) -> usize {
        self.row_capacity_hint
    }

    pub fn progress_log_interval(&self) -> usize {
        self.progress_log_interval
    }
}

/// A reader configuration under construction.
///
/// ```
/// use readsparse::param_guard::ParamGuard;
/// use readsparse::reader::ReaderParams;
///
/// let params = ReaderParams::new().per_row_nonzero_limit(64).check().unwrap();
/// let outcome = params.read_str("1 3 1.5 7 2.5\n2 2 4.0").unwrap();
/// assert_eq!(outcome.matrix.nnz(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderParams(ReaderValidParams);

impl Default for ReaderParams {
    fn default() -> Self {
        Self::new()
    }
}

impl ReaderParams {
    /// Create default reader parameters
    pub fn new() -> ReaderParams {
        Self(ReaderValidParams {
            per_row_nonzero_limit: 0,
            treat_nan_as_nonzero: false,
            max_format_errors: None,
            row_capacity_hint: 16,
            progress_log_interval: 100,
        })
    }

    /// Cap the number of nonzeros kept per row; once the cap is reached,
    /// the rest of the line is dropped and the row is flagged truncated.
    /// Defaults to `0` (unlimited) if not set.
    pub fn per_row_nonzero_limit(mut self, per_row_nonzero_limit: usize) -> Self {
        self.0.per_row_nonzero_limit = per_row_nonzero_limit;
        self
    }

    /// Keep `NaN` values as present nonzeros instead of dropping them.
    /// Defaults to `false` if not set.
    pub fn treat_nan_as_nonzero(mut self, treat_nan_as_nonzero: bool) -> Self {
        self.0.treat_nan_as_nonzero = treat_nan_as_nonzero;
        self
    }

    /// Abort the run once more than this many lines have been rejected.
    /// Defaults to `None` (tolerate any number) if not set.
    pub fn max_format_errors(mut self, max_format_errors: Option<usize>) -> Self {
        self.0.max_format_errors = max_format_errors;
        self
    }

    /// Set the initial per-row buffer capacity. Rows grow past the hint on
    /// demand.
    /// Defaults to `16` if not set.
    pub fn row_capacity_hint(mut self, row_capacity_hint: usize) -> Self {
        self.0.row_capacity_hint = row_capacity_hint;
        self
    }

    /// Emit a progress event every this many rows.
    /// Defaults to `100` if not set.
    pub fn progress_log_interval(mut self, progress_log_interval: usize) -> Self {
        self.0.progress_log_interval = progress_log_interval;
        self
    }
}

impl ParamGuard for ReaderParams {
    type Checked = ReaderValidParams;
    type Error = ReadSparseError;

    /// Validate the parameters
    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.row_capacity_hint == 0 {
            Err(ReadSparseError::InvalidCapacityHint(
                self.0.row_capacity_hint,
            ))
        } else if self.0.progress_log_interval == 0 {
            Err(ReadSparseError::InvalidProgressInterval(
                self.0.progress_log_interval,
            ))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// What one line contributed to the parse.
#[derive(Debug)]
enum LineOutcome {
    Row(FinalizedRow),
    Rejected(ReadSparseError),
}

fn malformed(line: usize, position: usize, token: &str) -> ReadSparseError {
    ReadSparseError::MalformedToken {
        line,
        position,
        token: token.to_string(),
    }
}

impl ReaderValidParams {
    /// Routes the tokens of one line: token 0 is the row id, the rest are
    /// `(column, value)` pairs. A malformed token or a dangling column
    /// rejects the whole line; nothing of it is kept.
    fn route_tokens(&self, line_no: usize, line: &str) -> Result<LineOutcome> {
        let mut tokens = line.split_whitespace();

        let row_id = match tokens.next() {
            // a line with no tokens still occupies its arrival slot
            None => return Ok(LineOutcome::Row(FinalizedRow::empty())),
            Some(tok) => match tok.parse::<i64>() {
                Ok(row_id) => row_id,
                Err(_) => return Ok(LineOutcome::Rejected(malformed(line_no, 0, tok))),
            },
        };

        let mut row =
            RowAccumulator::new(row_id, self.per_row_nonzero_limit, self.row_capacity_hint)?;
        let mut position = 0;

        loop {
            let col_tok = match tokens.next() {
                Some(tok) => tok,
                None => break,
            };
            position += 1;

            if row.is_full() {
                // cap reached with pairs left over: drop the rest unread
                row.mark_truncated();
                break;
            }

            let column = match col_tok.parse::<usize>() {
                Ok(column) => column,
                Err(_) => return Ok(LineOutcome::Rejected(malformed(line_no, position, col_tok))),
            };

            let val_tok = match tokens.next() {
                Some(tok) => tok,
                None => {
                    return Ok(LineOutcome::Rejected(ReadSparseError::DanglingColumn {
                        line: line_no,
                    }))
                }
            };
            position += 1;

            let value = match val_tok.parse::<f64>() {
                Ok(value) => value,
                Err(_) => return Ok(LineOutcome::Rejected(malformed(line_no, position, val_tok))),
            };

            // zero is excluded by value; NaN only counts when configured to
            if value == 0.0 || (value.is_nan() && !self.treat_nan_as_nonzero) {
                continue;
            }

            match row.accept(column, value)? {
                RowStatus::Accepted => {}
                RowStatus::Truncated => break,
            }
        }

        Ok(LineOutcome::Row(row.finalize()))
    }

    /// Parses one line into its outcome plus its extent contribution. A
    /// rejected line contributes its row slot and nothing else.
    fn parse_line(&self, line_no: usize, line: &str) -> Result<(LineOutcome, ExtentTracker)> {
        let outcome = self.route_tokens(line_no, line)?;

        let mut extent = ExtentTracker::new();
        extent.observe_row();
        if let LineOutcome::Row(row) = &outcome {
            for entry in row.entries() {
                extent.observe(entry.column);
                extent.observe_accepted();
            }
        }
        Ok((outcome, extent))
    }

    /// Reads every line from `reader` in arrival order.
    pub fn read_from<R: BufRead>(&self, reader: R) -> Result<ReadOutcome> {
        let mut builder = MatrixBuilder::new(self.clone());
        for line in reader.lines() {
            builder.push_line(&line?)?;
        }
        builder.finish()
    }

    /// Reads from an in-memory string.
    pub fn read_str(&self, text: &str) -> Result<ReadOutcome> {
        let mut builder = MatrixBuilder::new(self.clone());
        for line in text.lines() {
            builder.push_line(line)?;
        }
        builder.finish()
    }

    /// Opens `path` and reads it line by line.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<ReadOutcome> {
        self.read_from(BufReader::new(File::open(path)?))
    }

    /// Parses and sorts rows in parallel, one worker-owned accumulator per
    /// line, then merges the per-worker extents at the join point before
    /// assembly. The output is identical to the sequential entry points;
    /// the format-error tolerance is enforced at the join rather than
    /// mid-scan.
    pub fn read_lines_par<S: AsRef<str> + Sync>(&self, lines: &[S]) -> Result<ReadOutcome> {
        let parsed: Vec<(LineOutcome, ExtentTracker)> = lines
            .par_iter()
            .enumerate()
            .map(|(index, line)| self.parse_line(index + 1, line.as_ref()))
            .collect::<Result<_>>()?;

        let mut builder = MatrixBuilder::new(self.clone());
        for (outcome, extent) in parsed {
            builder.absorb(outcome, extent)?;
        }
        builder.finish()
    }
}

/// End-of-run report: what was read, what was dropped, what was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseSummary {
    pub rows_read: usize,
    pub total_nonzeros: usize,
    pub column_count: usize,
    pub format_errors: usize,
    pub truncated_rows: usize,
}

impl ParseSummary {
    /// Average nonzeros per row, the density figure the run log reports.
    pub fn density(&self) -> f64 {
        if self.rows_read == 0 {
            0.0
        } else {
            self.total_nonzeros as f64 / self.rows_read as f64
        }
    }
}

/// A completed run: the assembled matrix plus its summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOutcome {
    pub matrix: CscMatrix,
    pub summary: ParseSummary,
}

/// Streaming builder over the input lines.
///
/// Feed lines in arrival order with [`push_line`](MatrixBuilder::push_line),
/// then [`finish`](MatrixBuilder::finish) to assemble the CSC output. Rows
/// are finalized (capped, filtered, sorted) as their line ends; the matrix
/// extent is only known once the stream closes.
#[derive(Debug)]
pub struct MatrixBuilder {
    params: ReaderValidParams,
    rows: Vec<FinalizedRow>,
    extent: ExtentTracker,
    format_errors: usize,
    truncated_rows: usize,
}

impl MatrixBuilder {
    pub fn new(params: ReaderValidParams) -> MatrixBuilder {
        MatrixBuilder {
            params,
            rows: Vec::new(),
            extent: ExtentTracker::new(),
            format_errors: 0,
            truncated_rows: 0,
        }
    }

    /// Consumes one input line. Format problems reject the line, keep an
    /// empty row at its position and continue; they only become fatal past
    /// the configured tolerance.
    pub fn push_line(&mut self, line: &str) -> Result<()> {
        let line_no = self.extent.rows_read() + 1;
        let (outcome, extent) = self.params.parse_line(line_no, line)?;
        self.absorb(outcome, extent)
    }

    fn absorb(&mut self, outcome: LineOutcome, extent: ExtentTracker) -> Result<()> {
        self.extent = self.extent.merge(extent);

        let row = match outcome {
            LineOutcome::Row(row) => row,
            LineOutcome::Rejected(err) => {
                warn!(%err, "rejecting malformed line");
                self.format_errors += 1;
                if let Some(limit) = self.params.max_format_errors() {
                    if self.format_errors > limit {
                        return Err(ReadSparseError::TooManyFormatErrors {
                            limit,
                            line: self.extent.rows_read(),
                        });
                    }
                }
                FinalizedRow::empty()
            }
        };

        if row.is_truncated() {
            self.truncated_rows += 1;
            debug!(
                row = self.extent.rows_read(),
                kept = row.len(),
                "row truncated by the nonzero cap"
            );
        }

        self.rows.try_reserve(1)?;
        self.rows.push(row);

        if self.extent.rows_read() % self.params.progress_log_interval() == 0 {
            debug!(
                rows = self.extent.rows_read(),
                nonzeros = self.extent.total_nonzeros(),
                "progress"
            );
        }
        Ok(())
    }

    /// Assembles the CSC matrix and the run summary. Consumes the builder;
    /// a failed assembly discards everything rather than expose a partial
    /// matrix.
    pub fn finish(self) -> Result<ReadOutcome> {
        let summary = ParseSummary {
            rows_read: self.extent.rows_read(),
            total_nonzeros: self.extent.total_nonzeros(),
            column_count: self.extent.final_column_count(),
            format_errors: self.format_errors,
            truncated_rows: self.truncated_rows,
        };
        let matrix = assemble(self.rows, &self.extent)?;
        info!(
            rows = summary.rows_read,
            cols = summary.column_count,
            nonzeros = summary.total_nonzeros,
            density = summary.density(),
            format_errors = summary.format_errors,
            truncated_rows = summary.truncated_rows,
            "read sparse matrix"
        );
        Ok(ReadOutcome { matrix, summary })
    }
}
