use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// A (row, col) coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Cell { row, col }
    }

    /// Manhattan distance, the obstacle-free 4-connected step count
    pub fn manhattan(&self, other: &Cell) -> u32 {
        self.row.abs_diff(other.row).saturating_add(self.col.abs_diff(other.col))
    }

    /// `None` when either coordinate would overflow
    fn offset(&self, d_row: i32, d_col: i32) -> Option<Cell> {
        Some(Cell::new(self.row.checked_add(d_row)?, self.col.checked_add(d_col)?))
    }
}

impl From<(i32, i32)> for Cell {
    fn from((row, col): (i32, i32)) -> Self {
        Cell::new(row, col)
    }
}

impl From<Cell> for (i32, i32) {
    fn from(cell: Cell) -> Self {
        (cell.row, cell.col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIAGONAL: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Terrain of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terrain {
    Passable,
    Obstacle,
}

/// Obstacle grid. Dimensions are fixed at construction; cells are stored row-major.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: i32,
    cols: i32,
    cells: Vec<Terrain>,
    /// Incremented whenever a cell actually changes terrain
    revision: u64,
}

impl Grid {
    /// Create a grid with every cell passable
    pub fn new(rows: i32, cols: i32) -> Result<Self> {
        if rows <= 0 || cols <= 0 {
            return Err(SimError::InvalidDimensions { rows, cols });
        }
        Ok(Grid {
            rows,
            cols,
            cells: vec![Terrain::Passable; (rows as usize) * (cols as usize)],
            revision: 0,
        })
    }

    /// Create a grid with the given obstacle cells. Fails without building
    /// anything if one of them lies outside the grid.
    pub fn with_obstacles(rows: i32, cols: i32, obstacles: &[Cell]) -> Result<Self> {
        let mut grid = Self::new(rows, cols)?;
        for &cell in obstacles {
            grid.check_bounds(cell)?;
        }
        for &cell in obstacles {
            grid.mark_obstacle(cell)?;
        }
        Ok(grid)
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Number of cells; also the unreachable sentinel for distance fields
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row >= 0 && cell.row < self.rows && cell.col >= 0 && cell.col < self.cols
    }

    pub fn check_bounds(&self, cell: Cell) -> Result<()> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(SimError::OutOfBounds {
                cell,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Row-major index of an in-bounds cell
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.contains(cell)
            .then(|| (cell.row as usize) * (self.cols as usize) + cell.col as usize)
    }

    /// Convert a row-major index back to a cell
    pub fn cell_at(&self, index: usize) -> Option<Cell> {
        (index < self.cells.len()).then(|| {
            let cols = self.cols as usize;
            Cell::new((index / cols) as i32, (index % cols) as i32)
        })
    }

    /// Out-of-bounds cells are never passable
    pub fn is_passable(&self, cell: Cell) -> bool {
        self.terrain(cell) == Some(Terrain::Passable)
    }

    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.terrain(cell) == Some(Terrain::Obstacle)
    }

    pub fn terrain(&self, cell: Cell) -> Option<Terrain> {
        self.index_of(cell).map(|id| self.cells[id])
    }

    pub fn mark_obstacle(&mut self, cell: Cell) -> Result<()> {
        self.set_terrain(cell, Terrain::Obstacle)
    }

    pub fn mark_passable(&mut self, cell: Cell) -> Result<()> {
        self.set_terrain(cell, Terrain::Passable)
    }

    fn set_terrain(&mut self, cell: Cell, terrain: Terrain) -> Result<()> {
        self.check_bounds(cell)?;
        if let Some(id) = self.index_of(cell) {
            if self.cells[id] != terrain {
                self.cells[id] = terrain;
                self.revision += 1;
            }
        }
        Ok(())
    }

    /// Make every cell passable
    pub fn clear(&mut self) {
        if self.cells.iter().any(|t| *t == Terrain::Obstacle) {
            self.cells.fill(Terrain::Passable);
            self.revision += 1;
        }
    }

    /// Obstacle cells in row-major order
    pub fn obstacles(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, t)| **t == Terrain::Obstacle)
            .filter_map(|(id, _)| self.cell_at(id))
    }

    /// Orthogonal neighbors inside the grid (up, down, left, right)
    pub fn four_neighbors(&self, cell: Cell) -> Vec<Cell> {
        self.neighbors(cell, ORTHOGONAL.iter())
    }

    /// Orthogonal then diagonal neighbors inside the grid
    pub fn eight_neighbors(&self, cell: Cell) -> Vec<Cell> {
        self.neighbors(cell, ORTHOGONAL.iter().chain(DIAGONAL.iter()))
    }

    fn neighbors<'a>(&self, cell: Cell, offsets: impl Iterator<Item = &'a (i32, i32)>) -> Vec<Cell> {
        offsets
            .filter_map(|&(d_row, d_col)| cell.offset(d_row, d_col))
            .filter(|n| self.contains(*n))
            .collect()
    }

    /// Current grid revision number
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
