pub mod config;
pub mod distance;
pub mod error;
pub mod grid;
pub mod layout;
pub mod movement;
pub mod registry;
pub mod simulation;
pub mod trace;

pub use distance::{compute_distance_field, DistanceField};
pub use error::{Result, SimError};
pub use grid::{Cell, Grid};
pub use movement::{move_entities, MovePolicy};
pub use registry::{EntityKind, EntityRegistry};
pub use simulation::{Simulation, SimulationSetup, StepReport};
pub use trace::StepTrace;
