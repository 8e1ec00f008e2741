use std::collections::VecDeque;

use tracing::debug;

use crate::error::{Result, SimError};
use crate::grid::{Cell, Grid};

/// Per-cell step count to the nearest source, via 4-connected obstacle-avoiding paths.
///
/// Cells no source can reach, obstacles included, hold [`DistanceField::sentinel`],
/// which is `rows * cols` and so larger than any real path length on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceField {
    rows: i32,
    cols: i32,
    values: Vec<u32>,
    sentinel: u32,
}

impl DistanceField {
    fn unreached(grid: &Grid) -> Self {
        let sentinel = grid.area() as u32;
        DistanceField {
            rows: grid.rows(),
            cols: grid.cols(),
            values: vec![sentinel; grid.area()],
            sentinel,
        }
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn sentinel(&self) -> u32 {
        self.sentinel
    }

    fn index_of(&self, cell: Cell) -> Option<usize> {
        let inside = cell.row >= 0 && cell.row < self.rows && cell.col >= 0 && cell.col < self.cols;
        inside.then(|| (cell.row as usize) * (self.cols as usize) + cell.col as usize)
    }

    /// Distance at `cell`, or `None` when the cell is off the field
    pub fn get(&self, cell: Cell) -> Option<u32> {
        self.index_of(cell).map(|id| self.values[id])
    }

    pub fn is_reachable(&self, cell: Cell) -> bool {
        self.get(cell).is_some_and(|d| d < self.sentinel)
    }

    /// Number of cells holding a real distance
    pub fn reached_count(&self) -> usize {
        self.values.iter().filter(|&&d| d < self.sentinel).count()
    }

    /// Values as one `Vec` per row
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.values
            .chunks(self.cols as usize)
            .map(<[u32]>::to_vec)
            .collect()
    }
}

/// Multi-source breadth-first search from `sources` over the passable cells of `grid`.
///
/// Every source starts at distance 0; duplicate sources are harmless. An empty
/// source list yields a field that is the sentinel everywhere. All sources are
/// checked before any work is done: off-grid sources are `OutOfBounds`, sources
/// on obstacles are `ObstacleOccupied`.
pub fn compute_distance_field(grid: &Grid, sources: &[Cell]) -> Result<DistanceField> {
    for &source in sources {
        grid.check_bounds(source)?;
        if grid.is_obstacle(source) {
            return Err(SimError::ObstacleOccupied(source));
        }
    }

    let mut field = DistanceField::unreached(grid);
    let mut visited = vec![false; grid.area()];
    let mut boundary = VecDeque::with_capacity(sources.len());

    for &source in sources {
        if let Some(id) = grid.index_of(source) {
            if !visited[id] {
                visited[id] = true;
                field.values[id] = 0;
                boundary.push_back(source);
            }
        }
    }

    while let Some(cell) = boundary.pop_front() {
        let Some(current) = field.get(cell) else {
            continue;
        };
        for neighbor in grid.four_neighbors(cell) {
            if !grid.is_passable(neighbor) {
                continue;
            }
            if let Some(id) = grid.index_of(neighbor) {
                if !visited[id] {
                    visited[id] = true;
                    field.values[id] = current + 1;
                    boundary.push_back(neighbor);
                }
            }
        }
    }

    debug!(
        sources = sources.len(),
        reached = field.reached_count(),
        "computed distance field"
    );
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sources_is_all_sentinel() {
        let grid = Grid::new(3, 4).unwrap();
        let field = compute_distance_field(&grid, &[]).unwrap();
        assert_eq!(field.sentinel(), 12);
        assert_eq!(field.reached_count(), 0);
        assert!(field.to_rows().iter().flatten().all(|&d| d == 12));
    }

    #[test]
    fn test_single_source_open_grid() {
        let grid = Grid::new(3, 3).unwrap();
        let field = compute_distance_field(&grid, &[Cell::new(0, 0)]).unwrap();
        assert_eq!(
            field.to_rows(),
            vec![vec![0, 1, 2], vec![1, 2, 3], vec![2, 3, 4]]
        );
    }

    #[test]
    fn test_split_row_is_unreachable() {
        let grid = Grid::with_obstacles(1, 3, &[Cell::new(0, 1)]).unwrap();
        let field = compute_distance_field(&grid, &[Cell::new(0, 0)]).unwrap();
        assert_eq!(field.get(Cell::new(0, 0)), Some(0));
        assert_eq!(field.get(Cell::new(0, 1)), Some(3));
        assert_eq!(field.get(Cell::new(0, 2)), Some(3));
        assert!(!field.is_reachable(Cell::new(0, 2)));
    }

    #[test]
    fn test_nearest_source_wins() {
        let grid = Grid::new(1, 7).unwrap();
        let field = compute_distance_field(&grid, &[Cell::new(0, 0), Cell::new(0, 6)]).unwrap();
        assert_eq!(field.to_rows(), vec![vec![0, 1, 2, 3, 2, 1, 0]]);
    }

    #[test]
    fn test_duplicate_sources_are_idempotent() {
        let grid = Grid::new(4, 4).unwrap();
        let once = compute_distance_field(&grid, &[Cell::new(1, 1)]).unwrap();
        let twice = compute_distance_field(&grid, &[Cell::new(1, 1), Cell::new(1, 1)]).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_paths_go_around_walls() {
        // . # .
        // . # .
        // . . .
        let grid = Grid::with_obstacles(3, 3, &[Cell::new(0, 1), Cell::new(1, 1)]).unwrap();
        let field = compute_distance_field(&grid, &[Cell::new(0, 0)]).unwrap();
        assert_eq!(field.get(Cell::new(0, 2)), Some(6));
        assert_eq!(field.get(Cell::new(2, 2)), Some(4));
        assert_eq!(field.get(Cell::new(0, 1)), Some(field.sentinel()));
    }

    #[test]
    fn test_bad_sources_are_rejected() {
        let grid = Grid::with_obstacles(2, 2, &[Cell::new(1, 1)]).unwrap();
        assert!(matches!(
            compute_distance_field(&grid, &[Cell::new(0, 0), Cell::new(0, 2)]),
            Err(SimError::OutOfBounds { .. })
        ));
        assert!(matches!(
            compute_distance_field(&grid, &[Cell::new(1, 1)]),
            Err(SimError::ObstacleOccupied(_))
        ));
    }
}
