//! # Utilities Module
//!
//! Grid search helpers shared by generation, validation and the CLI driver.

pub mod pathfinding;

pub use self::pathfinding::*;
