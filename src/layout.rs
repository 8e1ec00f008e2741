//! Plain-text grid layouts.
//!
//! One character per cell, one line per row:
//! - `#` or `■`: obstacle
//! - `.`, `□` or space: passable
//! - `P` or `Z`: pursuer
//! - `E` or `H`: evader
//!
//! Empty lines are ignored; every other line must have the same width, so a
//! row of spaces is a row of passable cells.

use crate::error::{Result, SimError};
use crate::grid::Cell;
use crate::registry::EntityKind;
use crate::simulation::{Simulation, SimulationSetup};

/// A parsed layout, ready to seed a simulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub rows: i32,
    pub cols: i32,
    pub obstacles: Vec<Cell>,
    pub pursuers: Vec<Cell>,
    pub evaders: Vec<Cell>,
}

impl Layout {
    pub fn into_setup(self) -> SimulationSetup {
        SimulationSetup::new(self.rows, self.cols)
            .with_obstacles(self.obstacles)
            .with_pursuers(self.pursuers)
            .with_evaders(self.evaders)
    }
}

pub fn parse(text: &str) -> Result<Layout> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    let Some(&(_, first)) = lines.first() else {
        return Err(SimError::Layout {
            line: 1,
            reason: "layout has no rows".to_string(),
        });
    };
    let cols = first.chars().count();

    let mut layout = Layout {
        rows: lines.len() as i32,
        cols: cols as i32,
        obstacles: Vec::new(),
        pursuers: Vec::new(),
        evaders: Vec::new(),
    };

    for (row, &(line_no, line)) in lines.iter().enumerate() {
        let width = line.chars().count();
        if width != cols {
            return Err(SimError::Layout {
                line: line_no,
                reason: format!("expected {} columns, found {}", cols, width),
            });
        }
        for (col, ch) in line.chars().enumerate() {
            let cell = Cell::new(row as i32, col as i32);
            match ch {
                '#' | '■' => layout.obstacles.push(cell),
                'P' | 'Z' => layout.pursuers.push(cell),
                'E' | 'H' => layout.evaders.push(cell),
                '.' | '□' | ' ' => {}
                other => {
                    return Err(SimError::Layout {
                        line: line_no,
                        reason: format!("unknown cell character {:?}", other),
                    })
                }
            }
        }
    }

    Ok(layout)
}

/// Draw the current state: `#` obstacle, `P` pursuer, `E` evader,
/// `X` pursuer and evader together, `.` empty
pub fn render(sim: &Simulation) -> String {
    let grid = sim.grid();
    let registry = sim.registry();
    let occupied = |kind: EntityKind, cell: Cell| registry.iter(kind).any(|c| c == cell);

    let mut result = String::with_capacity(grid.area() + grid.rows() as usize);
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let cell = Cell::new(row, col);
            let symbol = if grid.is_obstacle(cell) {
                '#'
            } else {
                match (
                    occupied(EntityKind::Pursuer, cell),
                    occupied(EntityKind::Evader, cell),
                ) {
                    (true, true) => 'X',
                    (true, false) => 'P',
                    (false, true) => 'E',
                    (false, false) => '.',
                }
            };
            result.push(symbol);
        }
        result.push('\n');
    }
    result
}
