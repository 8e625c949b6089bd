//! Cell reservations threaded through one enemy turn.

use crate::game::{Floor, Position};
use std::collections::HashSet;

/// Cells claimed by entities during an enemy turn, plus the player's cell.
///
/// Each enemy releases its own cell before deciding and claims its
/// destination straight after, so later enemies in turn order see every
/// earlier move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    claimed: HashSet<Position>,
    player: Position,
}

impl Occupancy {
    /// Seeds the set from every entity on the floor.
    pub fn from_floor(floor: &Floor, player: Position) -> Self {
        Self {
            claimed: floor.entities.iter().map(|entity| entity.position).collect(),
            player,
        }
    }

    /// Whether an enemy may step onto `pos`.
    pub fn is_free(&self, pos: Position) -> bool {
        pos != self.player && !self.claimed.contains(&pos)
    }

    pub fn release(&mut self, pos: Position) {
        self.claimed.remove(&pos);
    }

    /// Claims a cell. Returns false if it was already taken.
    pub fn claim(&mut self, pos: Position) -> bool {
        self.claimed.insert(pos)
    }

    pub fn player(&self) -> Position {
        self.player
    }
}
