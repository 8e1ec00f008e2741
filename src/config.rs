use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::grid::Cell;
use crate::layout;
use crate::simulation::{Simulation, SimulationSetup};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub entities: EntitiesConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_rows")]
    pub rows: i32,
    #[serde(default = "default_cols")]
    pub cols: i32,
    #[serde(default)]
    pub obstacles: Vec<Cell>,
    /// Text layout file; when set it supplies dimensions, obstacles and entities
    #[serde(default)]
    pub layout: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EntitiesConfig {
    #[serde(default)]
    pub pursuers: Vec<Cell>,
    #[serde(default)]
    pub evaders: Vec<Cell>,
}

#[derive(Debug, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_steps")]
    pub steps: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
}

// Default values
fn default_rows() -> i32 { 30 }
fn default_cols() -> i32 { 40 }
fn default_steps() -> usize { 20 }
fn default_filter() -> String { "gridchase=info".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
            obstacles: Vec::new(),
            layout: None,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            seed: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the file
    /// is missing or malformed. A relative layout path is taken relative to
    /// the directory holding the configuration file.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(mut config) => {
                    if let Some(dir) = path.parent() {
                        config.resolve_paths(dir);
                    }
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to parse configuration, using defaults");
                    Config::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no configuration file found, using defaults");
                Config::default()
            }
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Anchor a relative layout path at `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        if let Some(layout) = self.grid.layout.as_mut() {
            if layout.is_relative() {
                *layout = base.join(&*layout);
            }
        }
    }

    /// Simulation setup described by this configuration. A layout file, when
    /// given, replaces the grid section; configured entities are added after
    /// the layout's own.
    pub fn setup(&self) -> Result<SimulationSetup> {
        let base = match &self.grid.layout {
            Some(path) => layout::parse(&fs::read_to_string(path)?)?.into_setup(),
            None => SimulationSetup::new(self.grid.rows, self.grid.cols)
                .with_obstacles(self.grid.obstacles.iter().copied()),
        };
        let mut setup = base
            .with_pursuers(self.entities.pursuers.iter().copied())
            .with_evaders(self.entities.evaders.iter().copied());
        setup.seed = self.simulation.seed;
        Ok(setup)
    }

    pub fn build_simulation(&self) -> Result<Simulation> {
        Simulation::new(self.setup()?)
    }
}
