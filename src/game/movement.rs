//! # Player Movement
//!
//! Decides what happens when the player tries to step in a direction.
//! The decision is pure; the turn pipeline applies it.

use crate::game::{Direction, EntityId, EntityKind, Floor, Position, TileKind};
use serde::{Deserialize, Serialize};

/// A collectible the player walked onto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pickup {
    pub entity: EntityId,
    /// Catalog id of the item or relic
    pub catalog_id: String,
    pub kind: EntityKind,
}

/// A step that succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSuccess {
    pub from: Position,
    pub to: Position,
    /// Kind of the destination tile
    pub tile: TileKind,
    pub picked_up: Option<Pickup>,
    pub trap_triggered: bool,
    pub reached_exit: bool,
    pub opened_container: bool,
}

/// Why a step did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MoveFailure {
    OutOfBounds,
    Blocked,
    /// An enemy stands there; the caller turns this into a bump attack
    EnemyCollision { target: EntityId },
    NpcCollision { target: EntityId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome {
    Moved(MoveSuccess),
    Failed(MoveFailure),
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved(_))
    }

    /// Destination of a successful move.
    pub fn destination(&self) -> Option<Position> {
        match self {
            MoveOutcome::Moved(success) => Some(success.to),
            MoveOutcome::Failed(_) => None,
        }
    }
}

/// Works out the result of the player stepping from `position`.
///
/// # Examples
///
/// ```
/// use delve::{attempt_player_move, Direction, Floor, MoveFailure, MoveOutcome, Position};
///
/// let floor = Floor::new(4, 4, "walk");
/// let outcome = attempt_player_move(Position::new(0, 3), Direction::North, &floor);
/// assert_eq!(outcome.destination(), Some(Position::new(0, 2)));
///
/// let outcome = attempt_player_move(Position::new(0, 3), Direction::West, &floor);
/// assert_eq!(outcome, MoveOutcome::Failed(MoveFailure::OutOfBounds));
/// ```
pub fn attempt_player_move(position: Position, direction: Direction, floor: &Floor) -> MoveOutcome {
    let target = position.step(direction);

    let Some(tile) = floor.tile(target) else {
        return MoveOutcome::Failed(MoveFailure::OutOfBounds);
    };
    if !tile.walkable {
        return MoveOutcome::Failed(MoveFailure::Blocked);
    }

    let mut picked_up = None;
    if let Some(entity) = floor.entity_at(target) {
        match entity.kind() {
            EntityKind::Enemy => {
                return MoveOutcome::Failed(MoveFailure::EnemyCollision {
                    target: entity.id.clone(),
                })
            }
            EntityKind::Npc => {
                return MoveOutcome::Failed(MoveFailure::NpcCollision {
                    target: entity.id.clone(),
                })
            }
            EntityKind::Item | EntityKind::Relic => {
                picked_up = entity.collectible_id().map(|catalog_id| Pickup {
                    entity: entity.id.clone(),
                    catalog_id: catalog_id.to_string(),
                    kind: entity.kind(),
                });
            }
        }
    }

    MoveOutcome::Moved(MoveSuccess {
        from: position,
        to: target,
        tile: tile.kind,
        picked_up,
        trap_triggered: tile.kind == TileKind::Trap,
        reached_exit: target == floor.exit,
        opened_container: tile.kind == TileKind::Container,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::ActorRegistry;
    use crate::game::Entity;

    fn floor() -> Floor {
        let mut floor = Floor::new(5, 5, "moves");
        floor.set_tile(Position::new(1, 4), TileKind::Wall);
        floor.set_tile(Position::new(0, 2), TileKind::Trap);
        floor.set_tile(Position::new(2, 2), TileKind::Container);
        floor
    }

    #[test]
    fn test_wall_blocks() {
        let outcome = attempt_player_move(Position::new(0, 4), Direction::East, &floor());
        assert_eq!(outcome, MoveOutcome::Failed(MoveFailure::Blocked));
    }

    #[test]
    fn test_enemy_and_npc_collisions() {
        let mut floor = floor();
        floor.entities.push(
            ActorRegistry::standard()
                .spawn("rat", "rat-1", Position::new(0, 3), 1)
                .unwrap(),
        );
        floor.entities.push(Entity::npc("sage", Position::new(1, 3), "Sage"));

        assert_eq!(
            attempt_player_move(Position::new(0, 4), Direction::North, &floor),
            MoveOutcome::Failed(MoveFailure::EnemyCollision {
                target: "rat-1".to_string()
            })
        );
        assert_eq!(
            attempt_player_move(Position::new(1, 2), Direction::South, &floor),
            MoveOutcome::Failed(MoveFailure::NpcCollision {
                target: "sage".to_string()
            })
        );
    }

    #[test]
    fn test_trap_and_container_flags() {
        let floor = floor();
        match attempt_player_move(Position::new(0, 3), Direction::North, &floor) {
            MoveOutcome::Moved(success) => {
                assert!(success.trap_triggered);
                assert!(!success.opened_container);
            }
            other => panic!("expected move, got {:?}", other),
        }
        match attempt_player_move(Position::new(2, 3), Direction::North, &floor) {
            MoveOutcome::Moved(success) => assert!(success.opened_container),
            other => panic!("expected move, got {:?}", other),
        }
    }

    #[test]
    fn test_pickup_and_exit() {
        let mut floor = floor();
        floor.entities.push(Entity::item("loot-1", Position::new(4, 1), "iron-ring"));

        match attempt_player_move(Position::new(4, 2), Direction::North, &floor) {
            MoveOutcome::Moved(success) => {
                let pickup = success.picked_up.unwrap();
                assert_eq!(pickup.catalog_id, "iron-ring");
                assert_eq!(pickup.kind, EntityKind::Item);
                assert!(!success.reached_exit);
            }
            other => panic!("expected move, got {:?}", other),
        }

        let outcome = attempt_player_move(Position::new(3, 0), Direction::East, &floor);
        match outcome {
            MoveOutcome::Moved(success) => {
                assert!(success.reached_exit);
                assert_eq!(success.tile, TileKind::Exit);
            }
            other => panic!("expected move, got {:?}", other),
        }
    }
}
