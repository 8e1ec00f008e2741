use rand::Rng;
use tracing::trace;

use crate::distance::DistanceField;
use crate::error::Result;
use crate::grid::{Cell, Grid};

/// How an entity reacts to the opposing side's distance field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePolicy {
    /// Evaders: 8-connected moves toward the largest distance
    Evade,
    /// Pursuers: 4-connected moves toward the smallest distance
    Pursue,
}

impl MovePolicy {
    /// Cells an entity at `cell` may end up on: itself plus every passable
    /// neighbor under this policy's connectivity.
    pub fn candidates(self, grid: &Grid, cell: Cell) -> Vec<Cell> {
        let neighbors = match self {
            MovePolicy::Evade => grid.eight_neighbors(cell),
            MovePolicy::Pursue => grid.four_neighbors(cell),
        };
        let mut candidates = Vec::with_capacity(neighbors.len() + 1);
        candidates.push(cell);
        candidates.extend(neighbors.into_iter().filter(|n| grid.is_passable(*n)));
        candidates
    }

    fn prefers(self, a: u32, b: u32) -> bool {
        match self {
            MovePolicy::Evade => a > b,
            MovePolicy::Pursue => a < b,
        }
    }

    /// Pick the destination for one entity. Ties on the extremal distance are
    /// broken uniformly at random. An entity off the grid is `OutOfBounds`.
    pub fn choose<R: Rng>(
        self,
        grid: &Grid,
        cell: Cell,
        field: &DistanceField,
        rng: &mut R,
    ) -> Result<Cell> {
        grid.check_bounds(cell)?;
        Ok(self.choose_in_bounds(grid, cell, field, rng))
    }

    fn choose_in_bounds<R: Rng>(
        self,
        grid: &Grid,
        cell: Cell,
        field: &DistanceField,
        rng: &mut R,
    ) -> Cell {
        let mut best: Vec<Cell> = Vec::new();
        let mut best_distance = None;

        for candidate in self.candidates(grid, cell) {
            let Some(distance) = field.get(candidate) else {
                continue;
            };
            match best_distance {
                Some(current) if self.prefers(current, distance) => {}
                Some(current) if current == distance => best.push(candidate),
                _ => {
                    best_distance = Some(distance);
                    best.clear();
                    best.push(candidate);
                }
            }
        }

        let chosen = match best.len() {
            0 => cell,
            1 => best[0],
            n => best[rng.random_range(0..n)],
        };
        trace!(
            policy = ?self,
            from = %cell,
            to = %chosen,
            distance = ?best_distance,
            ties = best.len(),
            "entity move"
        );
        chosen
    }
}

/// Move every entity one step. The output keeps the order and length of
/// `entities`; each decision reads only `field`, never the other outputs.
/// Nothing moves if any entity is off the grid.
pub fn move_entities<R: Rng>(
    grid: &Grid,
    entities: &[Cell],
    field: &DistanceField,
    policy: MovePolicy,
    rng: &mut R,
) -> Result<Vec<Cell>> {
    for &cell in entities {
        grid.check_bounds(cell)?;
    }
    Ok(entities
        .iter()
        .map(|&cell| policy.choose_in_bounds(grid, cell, field, rng))
        .collect())
}
