/// This module contains helper functions to efficiently write tests and
/// benchmarks against generated sparse input.
pub mod test_helpers {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::{Distribution, Normal};

    /// Renders `n_rows` input lines with up to `max_nnz` random pairs each,
    /// columns drawn below `n_cols`, values from a unit normal. The
    /// generator is seeded so runs are reproducible.
    pub fn generate_sparse_lines(n_rows: usize, n_cols: usize, max_nnz: usize) -> Vec<String> {
        let mut rng = StdRng::seed_from_u64(42);
        let normal = Normal::new(0., 1.).unwrap();

        let mut lines = Vec::with_capacity(n_rows);
        for row_id in 0..n_rows {
            let nnz = rng.gen_range(0..=max_nnz);
            let mut line = row_id.to_string();
            for _ in 0..nnz {
                let column = rng.gen_range(0..n_cols);
                let value: f64 = normal.sample(&mut rng);
                line.push_str(&format!(" {} {}", column, value));
            }
            lines.push(line);
        }
        lines
    }

    pub fn assert_slice_all_close(x: &[f64], y: &[f64], delta: f64) {
        assert_eq!(x.len(), y.len());
        for i in 0..x.len() {
            if approx::abs_diff_ne!(x[i], y[i], epsilon = delta) {
                panic!("x: {}, y: {} ; with precision level {}", x[i], y[i], delta);
            }
        }
    }
}
