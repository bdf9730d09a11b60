//! Mapping of real-valued timestamps onto a sorted timestamp grid.
//!
//! Kept separate from coefficient assembly so the assembly loop carries no
//! indexing edge cases.
use ndarray::Array1;

/// Position of a query timestamp on a grid: the enclosing grid index and
/// the offset (in days) past that grid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPosition {
    pub index: usize,
    pub offset: f64,
}

/// Locate `query` on the strictly increasing `grid`.
///
/// Returns the last index `i` with `grid[i] <= query` together with
/// `offset = query − grid[i]`, found by binary search. Queries beyond the
/// last grid point map onto the last index (with an offset that may exceed
/// one day). Returns `None` when `query` lies before `grid[0]` or the grid
/// is empty.
pub fn locate(grid: &Array1<f64>, query: f64) -> Option<GridPosition> {
    let slice = grid.as_slice()?;
    let after = slice.partition_point(|&t| t <= query);
    let index = after.checked_sub(1)?;
    Some(GridPosition { index, offset: query - slice[index] })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover exact hits, interior queries, and both ends of the
    // grid.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Exact grid hits have zero offset; interior queries report the
    // fractional day past the previous grid point.
    fn locate_reports_index_and_fractional_offset() {
        let grid = array![0.0, 1.0, 2.0, 3.0];

        assert_eq!(locate(&grid, 2.0), Some(GridPosition { index: 2, offset: 0.0 }));
        let pos = locate(&grid, 1.25).unwrap();
        assert_eq!(pos.index, 1);
        assert_abs_diff_eq!(pos.offset, 0.25, epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Queries before the grid are `None`; queries after map to the last
    // index.
    fn locate_handles_grid_ends() {
        let grid = array![10.0, 11.0, 12.0];

        assert_eq!(locate(&grid, 9.5), None);
        assert_eq!(locate(&grid, 10.0), Some(GridPosition { index: 0, offset: 0.0 }));
        assert_eq!(locate(&grid, 13.5), Some(GridPosition { index: 2, offset: 1.5 }));
        assert_eq!(locate(&Array1::zeros(0), 1.0), None);
    }
}
