//! # Delve
//!
//! Deterministic simulation core for a turn-based dungeon crawler.
//!
//! ## Architecture Overview
//!
//! Delve builds each floor procedurally and resolves one discrete turn at a
//! time. Everything is replayable from a seed: the same seed and the same
//! sequence of player actions always yield the same floors and outcomes.
//!
//! - **Generation**: seeded RNG, path carving, reachability validation and
//!   floor assembly with a guaranteed-solvable fallback
//! - **Actors**: the archetype registry with level scaling and floor-tiered
//!   weighted selection
//! - **AI**: the enemy turn engine (aggro state machine, sequential occupancy
//!   reservation, attack intents, ability cooldowns)
//! - **Combat**: player abilities and the shared melee resolution
//! - **Game**: positions, tiles, entities, the player model and the turn
//!   pipeline that ties a player action to the enemy response
//!
//! ## Determinism
//!
//! The only source of randomness is [`SeededRng`]. No wall-clock or platform
//! entropy is consulted by any simulation step; the floor's `generated_at`
//! timestamp is informational only.

pub mod actors;
pub mod ai;
pub mod combat;
pub mod game;
pub mod generation;
pub mod utils;

// Core module re-exports
pub use actors::*;
pub use ai::*;
pub use combat::*;
pub use game::*;
pub use generation::*;
pub use utils::*;

/// Core error type for the Delve simulation core.
///
/// Game operations report their outcomes through discriminated result types
/// (`MoveOutcome`, `CastResult`, `ValidationReport`); this error type is
/// reserved for invalid input at the crate boundary and for I/O in callers.
#[derive(thiserror::Error, Debug)]
pub enum DelveError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Direction is not one of the four cardinals
    #[error("Invalid direction: {0}")]
    InvalidDirection(String),

    /// Ability id is not known to the resolver
    #[error("Unknown ability: {0}")]
    UnknownAbility(String),

    /// Archetype id is not present in the registry
    #[error("Unknown archetype: {0}")]
    UnknownArchetype(String),

    /// Configuration could not be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type used throughout the Delve codebase.
pub type DelveResult<T> = Result<T, DelveError>;

/// Version information for the simulation core.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tuning constants.
pub mod config {
    /// Default floor width in tiles
    pub const DEFAULT_FLOOR_WIDTH: u32 = 12;

    /// Default floor height in tiles
    pub const DEFAULT_FLOOR_HEIGHT: u32 = 10;

    /// Default probability that an off-path tile becomes a wall
    pub const DEFAULT_WALL_DENSITY: f64 = 0.25;

    /// Default number of enemies placed per floor
    pub const DEFAULT_ENEMY_BUDGET: u32 = 4;

    /// Default number of containers placed per floor
    pub const DEFAULT_CONTAINER_BUDGET: u32 = 2;

    /// Default minimum length of the carved entrance-to-exit path
    pub const DEFAULT_MIN_PATH_LENGTH: u32 = 10;

    /// Probability that the path carver widens its candidate pool
    pub const DETOUR_CHANCE: f64 = 0.15;

    /// Number of best-ranked neighbours the path carver normally chooses from
    pub const PATH_CANDIDATE_POOL: usize = 2;

    /// Smallest amount of damage any resolved hit can deal
    pub const MIN_DAMAGE: u32 = 5;

    /// Aggro range for archetypes that do not configure their own
    pub const DEFAULT_AGGRO_RANGE: u32 = 2;

    /// Maximum Manhattan distance a patrolling enemy strays from its spawn
    pub const PATROL_RADIUS: u32 = 2;

    /// Manhattan radius of the shockwave ability
    pub const SHOCKWAVE_RADIUS: u32 = 2;

    /// Damage dealt by stepping on a trap tile, before any armor
    pub const TRAP_DAMAGE: u32 = 4;

    /// Minimum Manhattan distance between the entrance and a spawned enemy
    pub const ENEMY_SPAWN_CLEARANCE: u32 = 2;

    /// Tag stamped on every generated floor
    pub const GENERATOR_VERSION: &str = "delve-floorgen/1";
}
