use super::*;
use crate::extent::ExtentTracker;
use crate::row::RowAccumulator;

fn finalized(entries: &[(usize, f64)]) -> FinalizedRow {
    let mut row = RowAccumulator::new(0, 0, 4).unwrap();
    for &(column, value) in entries {
        row.accept(column, value).unwrap();
    }
    row.finalize()
}

fn tracked(rows: &[FinalizedRow]) -> ExtentTracker {
    let mut extent = ExtentTracker::new();
    for row in rows {
        extent.observe_row();
        for entry in row.entries() {
            extent.observe(entry.column);
            extent.observe_accepted();
        }
    }
    extent
}

#[test]
fn assembles_rows_in_arrival_order() {
    let rows = vec![finalized(&[(3, 1.5), (7, 2.5)]), finalized(&[(2, 4.0)])];
    let extent = tracked(&rows);
    let matrix = assemble(rows, &extent).unwrap();

    assert_eq!(matrix.n_rows(), 8);
    assert_eq!(matrix.n_cols(), 2);
    assert_eq!(matrix.nnz(), 3);
    assert_eq!(matrix.col_ptr().to_vec(), vec![0, 2, 3]);
    assert_eq!(matrix.row_idx().to_vec(), vec![3, 7, 2]);
    assert_eq!(matrix.values().to_vec(), vec![1.5, 2.5, 4.0]);
}

#[test]
fn empty_input_assembles_an_empty_matrix() {
    let matrix = assemble(Vec::new(), &ExtentTracker::new()).unwrap();
    assert_eq!(matrix.n_rows(), 0);
    assert_eq!(matrix.n_cols(), 0);
    assert_eq!(matrix.nnz(), 0);
    assert_eq!(matrix.col_ptr().to_vec(), vec![0]);
}

#[test]
fn empty_rows_keep_their_pointer_slots() {
    let rows = vec![
        FinalizedRow::empty(),
        finalized(&[(1, 2.0)]),
        FinalizedRow::empty(),
    ];
    let extent = tracked(&rows);
    let matrix = assemble(rows, &extent).unwrap();

    assert_eq!(matrix.col_ptr().to_vec(), vec![0, 0, 1, 1]);
    assert_eq!(matrix.n_cols(), 3);
}

#[test]
fn column_slices_follow_the_pointers() {
    let rows = vec![finalized(&[(3, 1.5), (7, 2.5)]), finalized(&[(2, 4.0)])];
    let extent = tracked(&rows);
    let matrix = assemble(rows, &extent).unwrap();

    let (row_idx, values) = matrix.col(0);
    assert_eq!(row_idx.to_vec(), vec![3, 7]);
    assert_eq!(values.to_vec(), vec![1.5, 2.5]);

    let (row_idx, values) = matrix.col(1);
    assert_eq!(row_idx.to_vec(), vec![2]);
    assert_eq!(values.to_vec(), vec![4.0]);

    let view = matrix.view();
    assert_eq!(view.indptr.len(), 3);
    assert_eq!(view.data.len(), view.indices.len());
}

#[test]
fn row_count_mismatch_is_caller_misuse() {
    let rows = vec![finalized(&[(0, 1.0)])];
    let extent = ExtentTracker::new();
    assert!(matches!(
        assemble(rows, &extent),
        Err(ReadSparseError::RowCountMismatch { rows: 1, tracked: 0 })
    ));
}

#[test]
fn overfull_rows_abort_assembly() {
    // the extent claims one nonzero, the rows hold two
    let rows = vec![finalized(&[(0, 1.0), (1, 2.0)])];
    let mut extent = ExtentTracker::new();
    extent.observe_row();
    extent.observe(1);
    extent.observe_accepted();

    assert!(matches!(
        assemble(rows, &extent),
        Err(ReadSparseError::AssemblyInconsistency {
            expected: 1,
            actual: 2
        })
    ));
}

#[test]
fn underfull_rows_abort_assembly() {
    // the extent claims two nonzeros, the rows hold one
    let rows = vec![finalized(&[(0, 1.0)])];
    let mut extent = ExtentTracker::new();
    extent.observe_row();
    extent.observe(0);
    extent.observe_accepted();
    extent.observe_accepted();

    assert!(matches!(
        assemble(rows, &extent),
        Err(ReadSparseError::AssemblyInconsistency {
            expected: 2,
            actual: 1
        })
    ));
}
