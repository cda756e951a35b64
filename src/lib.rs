//! Streaming reader for row-oriented sparse text data.
//!
//! Each input line holds a row id followed by repeated `(column, value)`
//! pairs. The reader streams an unbounded number of such lines, discovers
//! the matrix extent as it goes, optionally caps the nonzeros kept per row,
//! and assembles a single compressed-sparse-column matrix once the stream
//! closes. Malformed lines are rejected without poisoning the rest of the
//! run, and the output is the CSC form of the transpose of the logical
//! input: one output column per input line.
//!
//! ```
//! use readsparse::param_guard::ParamGuard;
//! use readsparse::reader::ReaderParams;
//!
//! let params = ReaderParams::new().check().unwrap();
//! let outcome = params.read_str("1 3 1.5 7 2.5\n2 2 4.0").unwrap();
//!
//! assert_eq!(outcome.matrix.n_cols(), 2);
//! assert_eq!(outcome.matrix.nnz(), 3);
//! assert_eq!(outcome.summary.column_count, 8);
//! ```

pub mod csc;
pub mod error;
pub mod extent;
pub mod helpers;
pub mod param_guard;
pub mod reader;
pub mod row;
