use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distance::{compute_distance_field, DistanceField};
use crate::error::{Result, SimError};
use crate::grid::{Cell, Grid};
use crate::movement::{move_entities, MovePolicy};
use crate::registry::{EntityKind, EntityRegistry};

/// Everything needed to build a [`Simulation`]
#[derive(Debug, Clone, Default)]
pub struct SimulationSetup {
    pub rows: i32,
    pub cols: i32,
    pub obstacles: Vec<Cell>,
    pub pursuers: Vec<Cell>,
    pub evaders: Vec<Cell>,
    /// Fixed RNG seed; a random one is drawn when absent
    pub seed: Option<u64>,
}

impl SimulationSetup {
    pub fn new(rows: i32, cols: i32) -> Self {
        SimulationSetup {
            rows,
            cols,
            ..Self::default()
        }
    }

    pub fn with_obstacles(mut self, obstacles: impl IntoIterator<Item = Cell>) -> Self {
        self.obstacles.extend(obstacles);
        self
    }

    pub fn with_pursuers(mut self, pursuers: impl IntoIterator<Item = Cell>) -> Self {
        self.pursuers.extend(pursuers);
        self
    }

    pub fn with_evaders(mut self, evaders: impl IntoIterator<Item = Cell>) -> Self {
        self.evaders.extend(evaders);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Positions after one simulation step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub tick: u64,
    pub pursuers: Vec<Cell>,
    pub evaders: Vec<Cell>,
    /// Evaders sharing a cell with at least one pursuer
    pub captured: usize,
}

/// Pursuers chasing evaders across an obstacle grid
#[derive(Debug, Clone)]
pub struct Simulation {
    grid: Grid,
    registry: EntityRegistry,
    rng: StdRng,
    seed: u64,
    tick: u64,
}

impl Simulation {
    /// Build a simulation. Nothing is created unless every obstacle and
    /// entity lies on the grid and no entity stands on an obstacle.
    pub fn new(setup: SimulationSetup) -> Result<Self> {
        let grid = Grid::with_obstacles(setup.rows, setup.cols, &setup.obstacles)?;
        for &cell in setup.pursuers.iter().chain(setup.evaders.iter()) {
            check_placement(&grid, cell)?;
        }

        let mut registry = EntityRegistry::new();
        registry.replace(EntityKind::Pursuer, setup.pursuers);
        registry.replace(EntityKind::Evader, setup.evaders);

        let seed = setup.seed.unwrap_or_else(rand::random);
        debug!(
            rows = grid.rows(),
            cols = grid.cols(),
            obstacles = grid.obstacles().count(),
            pursuers = registry.count(EntityKind::Pursuer),
            evaders = registry.count(EntityKind::Evader),
            seed,
            "created simulation"
        );

        Ok(Simulation {
            grid,
            registry,
            rng: StdRng::seed_from_u64(seed),
            seed,
            tick: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Seed the RNG was built from, for replaying a run
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Steps taken since construction or the last [`Simulation::clear`]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Reset obstacles and both entity lists
    pub fn clear(&mut self) {
        self.grid.clear();
        self.registry.clear();
        self.tick = 0;
    }

    pub fn mark_obstacle(&mut self, cell: Cell) -> Result<()> {
        self.grid.check_bounds(cell)?;
        let occupied = self
            .registry
            .iter(EntityKind::Pursuer)
            .chain(self.registry.iter(EntityKind::Evader))
            .any(|c| c == cell);
        if occupied {
            return Err(SimError::ObstacleOccupied(cell));
        }
        self.grid.mark_obstacle(cell)
    }

    pub fn mark_passable(&mut self, cell: Cell) -> Result<()> {
        self.grid.mark_passable(cell)
    }

    pub fn add(&mut self, kind: EntityKind, cell: Cell) -> Result<()> {
        check_placement(&self.grid, cell)?;
        self.registry.add(kind, cell);
        Ok(())
    }

    pub fn add_pursuer(&mut self, cell: Cell) -> Result<()> {
        self.add(EntityKind::Pursuer, cell)
    }

    pub fn add_evader(&mut self, cell: Cell) -> Result<()> {
        self.add(EntityKind::Evader, cell)
    }

    pub fn remove_pursuer(&mut self, cell: Cell) -> Result<()> {
        self.registry.remove(EntityKind::Pursuer, cell)
    }

    pub fn remove_evader(&mut self, cell: Cell) -> Result<()> {
        self.registry.remove(EntityKind::Evader, cell)
    }

    pub fn num_pursuers(&self) -> usize {
        self.registry.count(EntityKind::Pursuer)
    }

    pub fn num_evaders(&self) -> usize {
        self.registry.count(EntityKind::Evader)
    }

    pub fn pursuers(&self) -> impl Iterator<Item = Cell> + Clone + '_ {
        self.registry.iter(EntityKind::Pursuer)
    }

    pub fn evaders(&self) -> impl Iterator<Item = Cell> + Clone + '_ {
        self.registry.iter(EntityKind::Evader)
    }

    /// Distance field whose sources are the current entities of `kind`
    pub fn distance_field(&self, kind: EntityKind) -> Result<DistanceField> {
        compute_distance_field(&self.grid, self.registry.positions(kind))
    }

    /// Same as [`Simulation::distance_field`], selecting the kind by name
    pub fn distance_field_named(&self, selector: &str) -> Result<DistanceField> {
        self.distance_field(selector.parse()?)
    }

    /// Move evaders away from pursuers using a pursuer distance field
    pub fn move_evaders(&mut self, pursuer_field: &DistanceField) -> Result<()> {
        self.move_kind(EntityKind::Evader, pursuer_field)
    }

    /// Move pursuers toward evaders using an evader distance field
    pub fn move_pursuers(&mut self, evader_field: &DistanceField) -> Result<()> {
        self.move_kind(EntityKind::Pursuer, evader_field)
    }

    fn move_kind(&mut self, kind: EntityKind, field: &DistanceField) -> Result<()> {
        let moved = self.plan_moves(kind, field)?;
        self.registry.replace(kind, moved);
        Ok(())
    }

    fn plan_moves(&mut self, kind: EntityKind, field: &DistanceField) -> Result<Vec<Cell>> {
        move_entities(
            &self.grid,
            self.registry.positions(kind),
            field,
            policy_for(kind),
            &mut self.rng,
        )
    }

    /// Advance one step. Both distance fields come from the positions before
    /// either side moves.
    pub fn step(&mut self) -> Result<StepReport> {
        let evader_field = self.distance_field(EntityKind::Evader)?;
        let pursuer_field = self.distance_field(EntityKind::Pursuer)?;

        let pursuers = self.plan_moves(EntityKind::Pursuer, &evader_field)?;
        let evaders = self.plan_moves(EntityKind::Evader, &pursuer_field)?;
        self.registry.replace(EntityKind::Pursuer, pursuers);
        self.registry.replace(EntityKind::Evader, evaders);
        self.tick += 1;

        let report = StepReport {
            tick: self.tick,
            pursuers: self.registry.positions(EntityKind::Pursuer).to_vec(),
            evaders: self.registry.positions(EntityKind::Evader).to_vec(),
            captured: self.captured(),
        };
        debug!(
            tick = report.tick,
            pursuers = report.pursuers.len(),
            evaders = report.evaders.len(),
            captured = report.captured,
            "step complete"
        );
        Ok(report)
    }

    /// Run `steps` steps, returning one report per step
    pub fn run(&mut self, steps: usize) -> Result<Vec<StepReport>> {
        (0..steps).map(|_| self.step()).collect()
    }

    /// Evaders currently sharing a cell with a pursuer
    pub fn captured(&self) -> usize {
        let pursuers = self.registry.positions(EntityKind::Pursuer);
        self.evaders().filter(|e| pursuers.contains(e)).count()
    }
}

fn policy_for(kind: EntityKind) -> MovePolicy {
    match kind {
        EntityKind::Pursuer => MovePolicy::Pursue,
        EntityKind::Evader => MovePolicy::Evade,
    }
}

fn check_placement(grid: &Grid, cell: Cell) -> Result<()> {
    grid.check_bounds(cell)?;
    if grid.is_obstacle(cell) {
        return Err(SimError::ObstacleOccupied(cell));
    }
    Ok(())
}
