use super::*;

#[test]
fn buffer_grows_past_the_capacity_hint() {
    let mut row = RowAccumulator::new(0, 0, 2).unwrap();
    for column in 0..100 {
        assert_eq!(row.accept(column, 1.0).unwrap(), RowStatus::Accepted);
    }
    assert_eq!(row.len(), 100);
    assert!(!row.is_truncated());
}

#[test]
fn cap_drops_extra_entries() {
    let mut row = RowAccumulator::new(7, 2, 4).unwrap();
    assert_eq!(row.accept(5, 1.0).unwrap(), RowStatus::Accepted);
    assert_eq!(row.accept(2, 2.0).unwrap(), RowStatus::Accepted);
    assert!(row.is_full());
    assert_eq!(row.accept(9, 3.0).unwrap(), RowStatus::Truncated);
    assert!(row.is_truncated());

    let finalized = row.finalize();
    assert!(finalized.is_truncated());
    assert_eq!(
        finalized.entries(),
        &[
            NonzeroEntry {
                column: 2,
                value: 2.0
            },
            NonzeroEntry {
                column: 5,
                value: 1.0
            },
        ]
    );
}

#[test]
fn unlimited_cap_never_fills() {
    let mut row = RowAccumulator::new(0, 0, 1).unwrap();
    for column in 0..1000 {
        row.accept(column, 0.5).unwrap();
        assert!(!row.is_full());
    }
}

#[test]
fn finalize_sorts_stably() {
    let mut row = RowAccumulator::new(3, 0, 4).unwrap();
    row.accept(4, 1.0).unwrap();
    row.accept(4, 2.0).unwrap();
    row.accept(1, 3.0).unwrap();

    let entries = row.finalize();
    let columns: Vec<usize> = entries.entries().iter().map(|e| e.column).collect();
    let values: Vec<f64> = entries.entries().iter().map(|e| e.value).collect();
    assert_eq!(columns, vec![1, 4, 4]);
    // duplicates keep their insertion order
    assert_eq!(values, vec![3.0, 1.0, 2.0]);
}

#[test]
fn empty_placeholder_has_no_entries() {
    let row = FinalizedRow::empty();
    assert!(row.is_empty());
    assert!(!row.is_truncated());
}

#[test]
fn row_id_is_carried_through() {
    let row = RowAccumulator::new(-5, 0, 4).unwrap();
    assert_eq!(row.row_id(), -5);
}
