use std::collections::TryReserveError;

use thiserror::Error;

/// Simplified `Result` using [`ReadSparseError`] as error type
pub type Result<T> = std::result::Result<T, ReadSparseError>;

/// Error variants from configuration, line parsing or assembly.
///
/// The two token-level variants are per-line conditions: the reader rejects
/// the offending line, keeps an empty row at its position and continues.
/// They only abort the run once the configured tolerance is exceeded.
#[derive(Debug, Error)]
pub enum ReadSparseError {
    #[error("malformed token `{token}` at line {line}, position {position}")]
    MalformedToken {
        line: usize,
        position: usize,
        token: String,
    },
    #[error("dangling column index at line {line}")]
    DanglingColumn { line: usize },
    #[error("more than {limit} malformed lines (line {line})")]
    TooManyFormatErrors { limit: usize, line: usize },
    #[error("{rows} finalized rows but {tracked} rows tracked")]
    RowCountMismatch { rows: usize, tracked: usize },
    #[error("assembled {actual} nonzeros where the extent tracked {expected}")]
    AssemblyInconsistency { expected: usize, actual: usize },
    #[error("allocation failure while growing a buffer")]
    ResourceExhaustion(#[from] TryReserveError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid row capacity hint {0}")]
    InvalidCapacityHint(usize),
    #[error("invalid progress interval {0}")]
    InvalidProgressInterval(usize),
}
