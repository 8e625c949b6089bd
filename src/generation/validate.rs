//! # Floor Validation
//!
//! Post-generation gate: is the exit reachable from the entrance, and does
//! every entity have a cell to itself?

use crate::game::{EntityId, Floor, Position};
use crate::utils::reachable_from;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single problem found on a floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum ValidationError {
    /// Entrance and exit are the same cell
    EntranceIsExit,
    /// The entrance tile cannot be stood on
    EntranceNotWalkable,
    /// No walkable route joins entrance and exit
    ExitUnreachable,
    /// Several entities share one cell
    EntityOverlap {
        position: Position,
        ids: Vec<EntityId>,
    },
}

/// Outcome of validating a floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether the exit can be reached from the entrance
    pub solvable: bool,
    /// Every problem found, route problems first
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// Whether the floor has no problems at all.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether any entity overlap was reported.
    pub fn has_overlap(&self) -> bool {
        self.errors
            .iter()
            .any(|error| matches!(error, ValidationError::EntityOverlap { .. }))
    }
}

/// Validates a floor.
///
/// # Examples
///
/// ```
/// use delve::{validate_floor, Floor};
///
/// let report = validate_floor(&Floor::new(6, 4, "open"));
/// assert!(report.solvable);
/// assert!(report.is_clean());
/// ```
pub fn validate_floor(floor: &Floor) -> ValidationReport {
    let mut errors = Vec::new();

    if floor.entrance == floor.exit {
        errors.push(ValidationError::EntranceIsExit);
    }

    if !floor.is_walkable(floor.entrance) {
        errors.push(ValidationError::EntranceNotWalkable);
    }

    let reachable = reachable_from(floor, floor.entrance);
    let exit_reached = floor.is_walkable(floor.exit) && reachable.contains(&floor.exit);
    if !exit_reached {
        errors.push(ValidationError::ExitUnreachable);
    }

    let solvable = errors.is_empty();

    let mut occupants: BTreeMap<Position, Vec<EntityId>> = BTreeMap::new();
    for entity in &floor.entities {
        occupants
            .entry(entity.position)
            .or_default()
            .push(entity.id.clone());
    }
    for (position, ids) in occupants {
        if ids.len() > 1 {
            errors.push(ValidationError::EntityOverlap { position, ids });
        }
    }

    ValidationReport { solvable, errors }
}
