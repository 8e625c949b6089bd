//! # Generation Module
//!
//! Procedural floor generation: seeded randomness, path carving, wall and
//! entity placement, and the solvability gate.
//!
//! Every generated floor is guaranteed to be solvable. The carved path is
//! kept free of walls, and if validation still fails the generator falls back
//! to an open floor rather than reporting an error.

pub mod floor;
pub mod path;
pub mod rng;
pub mod validate;

pub use floor::*;
pub use path::*;
pub use rng::*;
pub use validate::*;

use crate::config::{
    DEFAULT_CONTAINER_BUDGET, DEFAULT_ENEMY_BUDGET, DEFAULT_FLOOR_HEIGHT, DEFAULT_FLOOR_WIDTH,
    DEFAULT_MIN_PATH_LENGTH, DEFAULT_WALL_DENSITY,
};
use crate::game::Position;
use crate::DelveResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Layout presets applied before random walls are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloorTemplate {
    /// No walls at all
    Open,
    /// Walls around the outer ring, except where the path runs
    Bordered,
}

/// Configuration for floor generation.
///
/// Missing fields take their defaults when deserialized, so a config file
/// only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorConfig {
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    /// Probability that an off-path tile becomes a wall (0.0 to 1.0)
    pub wall_density: f64,
    /// Number of enemies to place
    pub enemy_budget: u32,
    /// Number of containers to place
    pub container_budget: u32,
    /// Minimum length of the carved path, in positions
    pub min_path_length: u32,
    /// Depth of the floor; also the level of its enemies
    pub floor_number: u32,
    /// Explicit entrance, bottom-left when unset or invalid
    pub entrance: Option<Position>,
    /// Explicit exit, top-right when unset or invalid
    pub exit: Option<Position>,
    pub template: Option<FloorTemplate>,
}

impl FloorConfig {
    /// Creates the default configuration for a floor depth.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::FloorConfig;
    ///
    /// let config = FloorConfig::new(3);
    /// assert_eq!(config.floor_number, 3);
    /// assert!(config.wall_density > 0.0 && config.wall_density < 1.0);
    /// ```
    pub fn new(floor_number: u32) -> Self {
        Self {
            width: DEFAULT_FLOOR_WIDTH,
            height: DEFAULT_FLOOR_HEIGHT,
            wall_density: DEFAULT_WALL_DENSITY,
            enemy_budget: DEFAULT_ENEMY_BUDGET,
            container_budget: DEFAULT_CONTAINER_BUDGET,
            min_path_length: DEFAULT_MIN_PATH_LENGTH,
            floor_number,
            entrance: None,
            exit: None,
            template: None,
        }
    }

    /// Creates a configuration for testing with small, sparse floors.
    pub fn for_testing() -> Self {
        Self {
            width: 8,
            height: 6,
            wall_density: 0.2,
            enemy_budget: 2,
            container_budget: 1,
            min_path_length: 6,
            ..Self::new(1)
        }
    }

    /// Creates a configuration for a given depth using `template`.
    pub fn with_template(floor_number: u32, template: FloorTemplate) -> Self {
        Self {
            template: Some(template),
            ..Self::new(floor_number)
        }
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> DelveResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Clamps the configuration into a usable shape.
    ///
    /// Dimensions are raised to at least 2, wall density is clamped to
    /// [0, 1] (NaN counts as 0), the floor number is at least 1, and explicit
    /// endpoints that are out of bounds or equal fall back to the defaults.
    /// The `open` template forces wall density to 0.
    pub fn normalized(&self) -> Self {
        let width = self.width.max(2);
        let height = self.height.max(2);
        let in_bounds = |pos: Position| {
            pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < width && (pos.y as u32) < height
        };

        let mut entrance = self.entrance.filter(|pos| in_bounds(*pos));
        let mut exit = self.exit.filter(|pos| in_bounds(*pos));
        let default_entrance = Position::new(0, height as i32 - 1);
        let default_exit = Position::new(width as i32 - 1, 0);

        let resolved_entrance = entrance.unwrap_or(default_entrance);
        let resolved_exit = exit.unwrap_or(default_exit);
        if resolved_entrance == resolved_exit {
            entrance = None;
            exit = None;
        }

        let wall_density = if self.template == Some(FloorTemplate::Open) || self.wall_density.is_nan()
        {
            0.0
        } else {
            self.wall_density.clamp(0.0, 1.0)
        };

        Self {
            width,
            height,
            wall_density,
            enemy_budget: self.enemy_budget,
            container_budget: self.container_budget,
            min_path_length: self.min_path_length,
            floor_number: self.floor_number.max(1),
            entrance: Some(entrance.unwrap_or(default_entrance)),
            exit: Some(exit.unwrap_or(default_exit)),
            template: self.template,
        }
    }

    /// Entrance after normalization.
    pub fn resolved_entrance(&self) -> Position {
        self.normalized()
            .entrance
            .unwrap_or_else(|| Position::new(0, self.height.max(2) as i32 - 1))
    }

    /// Exit after normalization.
    pub fn resolved_exit(&self) -> Position {
        self.normalized()
            .exit
            .unwrap_or_else(|| Position::new(self.width.max(2) as i32 - 1, 0))
    }
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Trait for content generators.
///
/// Generators are pure functions of their seed and configuration.
pub trait Generator<T> {
    /// Generates content from a seed.
    fn generate(&self, seed: &Seed, config: &FloorConfig) -> T;

    /// Checks generated content.
    fn validate(&self, content: &T) -> ValidationReport;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Generates a complete floor from a seed.
///
/// # Examples
///
/// ```
/// use delve::{generate_floor, validate_floor, FloorConfig};
///
/// let floor = generate_floor("crypt", &FloorConfig::new(1));
/// assert!(validate_floor(&floor).solvable);
/// assert_eq!(floor.seed, "crypt");
/// ```
pub fn generate_floor(seed: impl Into<Seed>, config: &FloorConfig) -> crate::game::Floor {
    FloorGenerator::new().generate(&seed.into(), config)
}
