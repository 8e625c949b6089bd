//! # Game Module
//!
//! The simulation's data model and the player-facing side of a turn.
//!
//! This module contains the fundamental building blocks of Delve:
//! - Grid coordinates and cardinal directions
//! - Floors, tiles and the entities that occupy them
//! - The player's combat attributes and effective stats
//! - Player movement decisions and the turn pipeline

pub mod entities;
pub mod movement;
pub mod player;
pub mod turn;
pub mod world;

pub use entities::*;
pub use movement::*;
pub use player::*;
pub use turn::*;
pub use world::*;

use crate::{DelveError, DelveResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents a 2D coordinate on a floor grid.
///
/// `x` is the column and `y` is the row; grids are row-major.
///
/// # Examples
///
/// ```
/// use delve::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
///
/// let adjacent = pos.cardinal_adjacent_positions();
/// assert_eq!(adjacent.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Calculates the Manhattan distance to another position.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::Position;
    ///
    /// let pos1 = Position::new(0, 0);
    /// let pos2 = Position::new(3, 4);
    /// assert_eq!(pos1.manhattan_distance(pos2), 7);
    /// ```
    pub fn manhattan_distance(self, other: Position) -> u32 {
        (self.x - other.x).unsigned_abs() + (self.y - other.y).unsigned_abs()
    }

    /// Returns the position one step away in the given direction.
    pub fn step(self, direction: Direction) -> Position {
        self + direction.to_delta()
    }

    /// Returns the 4 cardinal adjacent positions in N/S/W/E order.
    pub fn cardinal_adjacent_positions(self) -> Vec<Position> {
        Direction::cardinal()
            .into_iter()
            .map(|direction| self.step(direction))
            .collect()
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Position {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four cardinal directions used for movement and facing.
///
/// Diagonal movement does not exist in the simulation; anything that is not
/// one of these four is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Direction, Position};
    ///
    /// let delta = Direction::North.to_delta();
    /// assert_eq!(delta, Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::North => Position::new(0, -1),
            Direction::South => Position::new(0, 1),
            Direction::West => Position::new(-1, 0),
            Direction::East => Position::new(1, 0),
        }
    }

    /// Converts a position delta to a direction.
    ///
    /// Returns `InvalidDirection` if the delta is not a single cardinal step.
    pub fn from_delta(delta: Position) -> DelveResult<Direction> {
        match (delta.x, delta.y) {
            (0, -1) => Ok(Direction::North),
            (0, 1) => Ok(Direction::South),
            (-1, 0) => Ok(Direction::West),
            (1, 0) => Ok(Direction::East),
            _ => Err(DelveError::InvalidDirection(format!(
                "delta {} is not a cardinal step",
                delta
            ))),
        }
    }

    /// Returns the four cardinals in the fixed N/S/W/E check order.
    pub fn cardinal() -> [Direction; 4] {
        [
            Direction::North,
            Direction::South,
            Direction::West,
            Direction::East,
        ]
    }
}

impl FromStr for Direction {
    type Err = DelveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" | "up" => Ok(Direction::North),
            "s" | "south" | "down" => Ok(Direction::South),
            "w" | "west" | "left" => Ok(Direction::West),
            "e" | "east" | "right" => Ok(Direction::East),
            other => Err(DelveError::InvalidDirection(other.to_string())),
        }
    }
}

/// Unique, stable identifier for entities on a floor.
pub type EntityId = String;
