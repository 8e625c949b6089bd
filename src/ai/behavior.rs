//! # Enemy Behavior
//!
//! Per-enemy movement and attack decisions for one turn.

use crate::actors::{ActorType, AttackPattern, EnemyAbility, MovementPattern};
use crate::ai::Occupancy;
use crate::config::{DEFAULT_AGGRO_RANGE, PATROL_RADIUS};
use crate::game::{BehaviorMode, Direction, Floor, Position};
use serde::{Deserialize, Serialize};

/// Kind of attack an enemy declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackKind {
    Melee,
    Ranged,
    Area,
}

impl From<AttackPattern> for AttackKind {
    fn from(pattern: AttackPattern) -> Self {
        match pattern {
            AttackPattern::Melee => AttackKind::Melee,
            AttackPattern::Ranged => AttackKind::Ranged,
            AttackPattern::Area => AttackKind::Area,
        }
    }
}

/// What an enemy does with its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Stay,
    Move(Position),
    Attack(AttackKind),
}

/// The parts of an archetype that drive decisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorProfile<'a> {
    pub movement: MovementPattern,
    pub attack: AttackPattern,
    pub attack_range: u32,
    pub aggro_range: u32,
    pub abilities: &'a [EnemyAbility],
}

impl<'a> BehaviorProfile<'a> {
    pub fn from_actor(actor: &'a ActorType) -> Self {
        Self {
            movement: actor.movement,
            attack: actor.attack,
            attack_range: actor.attack_range,
            aggro_range: actor.effective_aggro_range(),
            abilities: &actor.abilities,
        }
    }

    /// Melee chaser used for archetypes the registry does not know.
    pub fn fallback() -> Self {
        Self {
            movement: MovementPattern::Chase,
            attack: AttackPattern::Melee,
            attack_range: 1,
            aggro_range: DEFAULT_AGGRO_RANGE,
            abilities: &[],
        }
    }

    /// Whether this enemy fights from range while following.
    fn keeps_distance(&self) -> bool {
        self.movement == MovementPattern::MaintainDistance || self.attack.is_ranged()
    }
}

fn can_enter(floor: &Floor, occupancy: &Occupancy, pos: Position) -> bool {
    floor.is_walkable(pos) && occupancy.is_free(pos)
}

/// Decides an enemy's action for the turn.
///
/// `mode` is the enemy's mode after this turn's aggro check.
pub fn decide(
    profile: &BehaviorProfile<'_>,
    mode: BehaviorMode,
    position: Position,
    spawn: Position,
    floor: &Floor,
    occupancy: &Occupancy,
) -> Decision {
    let player = occupancy.player();
    let distance = position.manhattan_distance(player);

    match mode {
        BehaviorMode::Static => {
            if distance <= profile.attack_range {
                Decision::Attack(profile.attack.into())
            } else {
                Decision::Stay
            }
        }
        BehaviorMode::Patrol => patrol_step(position, spawn, floor, occupancy)
            .map_or(Decision::Stay, Decision::Move),
        BehaviorMode::Follow => {
            if profile.movement == MovementPattern::Teleport {
                if distance <= 1 {
                    return Decision::Attack(AttackKind::Melee);
                }
                return teleport_target(floor, occupancy)
                    .or_else(|| pursue_step(position, floor, occupancy))
                    .map_or(Decision::Stay, Decision::Move);
            }

            let reach = if profile.keeps_distance() {
                profile.attack_range
            } else {
                1
            };
            if distance <= reach {
                let kind = if profile.keeps_distance() {
                    profile.attack.into()
                } else {
                    AttackKind::Melee
                };
                Decision::Attack(kind)
            } else {
                pursue_step(position, floor, occupancy).map_or(Decision::Stay, Decision::Move)
            }
        }
    }
}

/// First of N/S/W/E that stays within the patrol radius of `spawn`.
pub fn patrol_step(
    position: Position,
    spawn: Position,
    floor: &Floor,
    occupancy: &Occupancy,
) -> Option<Position> {
    Direction::cardinal()
        .into_iter()
        .map(|direction| position.step(direction))
        .find(|next| {
            next.manhattan_distance(spawn) <= PATROL_RADIUS && can_enter(floor, occupancy, *next)
        })
}

/// One step toward the player along the axis of greatest displacement.
///
/// Ties go horizontal. If the preferred axis is blocked the other axis is
/// tried when it still has distance to close.
pub fn pursue_step(position: Position, floor: &Floor, occupancy: &Occupancy) -> Option<Position> {
    let delta = occupancy.player() - position;
    let horizontal = Position::new(position.x + delta.x.signum(), position.y);
    let vertical = Position::new(position.x, position.y + delta.y.signum());

    let (primary, secondary, secondary_delta) = if delta.x.abs() >= delta.y.abs() {
        (horizontal, vertical, delta.y)
    } else {
        (vertical, horizontal, delta.x)
    };

    if primary != position && can_enter(floor, occupancy, primary) {
        Some(primary)
    } else if secondary_delta != 0 && can_enter(floor, occupancy, secondary) {
        Some(secondary)
    } else {
        None
    }
}

/// First free walkable cell next to the player, in N/S/W/E order.
pub fn teleport_target(floor: &Floor, occupancy: &Occupancy) -> Option<Position> {
    occupancy
        .player()
        .cardinal_adjacent_positions()
        .into_iter()
        .find(|pos| can_enter(floor, occupancy, *pos))
}
