/// Running bounds of the matrix being read: highest column index seen,
/// accepted nonzero count and rows consumed.
///
/// One tracker lives per parse invocation and is read once by the assembler
/// after the input stream closes. Nothing here is process-wide state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtentTracker {
    max_column: Option<usize>,
    total_nonzeros: usize,
    rows_read: usize,
}

impl ExtentTracker {
    pub fn new() -> ExtentTracker {
        ExtentTracker::default()
    }

    /// Widens the column extent to cover `column`.
    pub fn observe(&mut self, column: usize) {
        self.max_column = Some(match self.max_column {
            Some(current) => current.max(column),
            None => column,
        });
    }

    pub fn observe_accepted(&mut self) {
        self.total_nonzeros += 1;
    }

    pub fn observe_row(&mut self) {
        self.rows_read += 1;
    }

    pub fn total_nonzeros(&self) -> usize {
        self.total_nonzeros
    }

    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Number of columns needed to cover every index seen, zero when no
    /// entry was ever accepted.
    pub fn final_column_count(&self) -> usize {
        self.max_column.map_or(0, |max| max + 1)
    }

    /// Reduces two trackers into one (max / sum / sum). Per-worker trackers
    /// are merged with this at the join point of the parallel parse, before
    /// assembly sizes its arrays.
    pub fn merge(self, other: ExtentTracker) -> ExtentTracker {
        ExtentTracker {
            max_column: match (self.max_column, other.max_column) {
                (Some(a), Some(b)) => Some(a.max(b)),
                (a, b) => a.or(b),
            },
            total_nonzeros: self.total_nonzeros + other.total_nonzeros,
            rows_read: self.rows_read + other.rows_read,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tracker_has_no_columns() {
        assert_eq!(ExtentTracker::new().final_column_count(), 0);
    }

    #[test]
    fn column_count_covers_the_highest_index() {
        let mut extent = ExtentTracker::new();
        extent.observe(7);
        extent.observe(3);
        assert_eq!(extent.final_column_count(), 8);
    }

    #[test]
    fn merge_reduces_max_and_sums() {
        let mut a = ExtentTracker::new();
        a.observe(3);
        a.observe_accepted();
        a.observe_row();

        let mut b = ExtentTracker::new();
        b.observe(9);
        b.observe_accepted();
        b.observe_accepted();
        b.observe_row();

        let merged = a.merge(b);
        assert_eq!(merged.final_column_count(), 10);
        assert_eq!(merged.total_nonzeros(), 3);
        assert_eq!(merged.rows_read(), 2);
    }

    #[test]
    fn merge_with_empty_keeps_the_extent() {
        let mut a = ExtentTracker::new();
        a.observe(5);
        a.observe_accepted();
        a.observe_row();

        let merged = a.merge(ExtentTracker::new());
        assert_eq!(merged, a);
    }
}
