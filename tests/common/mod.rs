#![allow(dead_code)]

use gridchase::{layout, Cell, DistanceField, Grid, Simulation};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Distance field scenario stored as JSON under tests/data
#[derive(Debug, Clone, Deserialize)]
pub struct DistanceScenario {
    pub name: String,
    pub layout: Vec<String>,
    /// Entity selector whose positions seed the field
    pub sources: String,
    pub expected: Vec<Vec<u32>>,
}

impl DistanceScenario {
    pub fn simulation(&self) -> Simulation {
        let text = self.layout.join("\n");
        let setup = layout::parse(&text).unwrap().into_setup().with_seed(0);
        Simulation::new(setup).unwrap()
    }
}

pub fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

/// Load every scenario in tests/data, sorted by file name
pub fn load_scenarios() -> Vec<DistanceScenario> {
    let mut entries: Vec<_> = fs::read_dir(data_dir())
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    entries.sort();

    entries
        .iter()
        .map(|path| {
            let contents = fs::read_to_string(path).unwrap();
            serde_json::from_str(&contents)
                .unwrap_or_else(|e| panic!("bad scenario {}: {}", path.display(), e))
        })
        .collect()
}

/// Field values as text, one row per line, `#` for obstacles and `-` for unreachable
pub fn visualize_field(grid: &Grid, field: &DistanceField) -> String {
    let mut result = String::new();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let cell = Cell::new(row, col);
            let symbol = if grid.is_obstacle(cell) {
                "#".to_string()
            } else if field.is_reachable(cell) {
                field.get(cell).unwrap().to_string()
            } else {
                "-".to_string()
            };
            result.push_str(&format!("{:>3}", symbol));
        }
        result.push('\n');
    }
    result
}

/// Random grid with roughly `density` obstacles and entities on passable cells
pub fn random_simulation(seed: u64, rows: i32, cols: i32, density: f64, pursuers: usize, evaders: usize) -> Simulation {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut obstacles = Vec::new();
    let mut open = Vec::new();
    for row in 0..rows {
        for col in 0..cols {
            let cell = Cell::new(row, col);
            if rng.random_bool(density) {
                obstacles.push(cell);
            } else {
                open.push(cell);
            }
        }
    }
    if open.is_empty() {
        open.push(obstacles.pop().unwrap());
    }

    let mut pick = |n: usize| -> Vec<Cell> {
        (0..n).map(|_| open[rng.random_range(0..open.len())]).collect()
    };
    let pursuer_cells = pick(pursuers);
    let evader_cells = pick(evaders);

    Simulation::new(
        gridchase::SimulationSetup::new(rows, cols)
            .with_obstacles(obstacles)
            .with_pursuers(pursuer_cells)
            .with_evaders(evader_cells)
            .with_seed(seed),
    )
    .unwrap()
}
