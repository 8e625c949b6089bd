//! # Enemy Turn Engine
//!
//! Runs every enemy on a floor for one turn: the aggro state machine,
//! movement with sequential occupancy reservation, attack intents and
//! ability cooldowns.
//!
//! ## Modes
//!
//! - `static` never transitions and never moves; it attacks when the player
//!   is within its attack range.
//! - `patrol` wanders near its spawn. It switches to `follow` when the
//!   player comes within its aggro range or when it has lost hit points
//!   since its last turn.
//! - `follow` is sticky for the rest of the floor.
//!
//! The engine never applies damage to the player. It reports intents and
//! ability firings; the turn pipeline resolves them.

pub mod behavior;
pub mod occupancy;

pub use behavior::*;
pub use occupancy::*;

use crate::actors::{ActorRegistry, EffectDescriptor};
use crate::game::{BehaviorMode, EntityId, Floor, Position};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An enemy declaring an attack on the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackIntent {
    pub attacker: EntityId,
    pub kind: AttackKind,
    /// Raw damage before the player's armor
    pub damage: u32,
}

/// An enemy ability that fired this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityFire {
    pub enemy: EntityId,
    pub ability: String,
    pub damage: u32,
    pub effect: EffectDescriptor,
}

/// Enemies that started following the player this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggroNotification {
    /// In entity order
    pub enemies: Vec<EntityId>,
    pub turn: u64,
}

/// Everything the enemy turn produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyTurnResult {
    pub floor: Floor,
    pub attacks: Vec<AttackIntent>,
    pub abilities: Vec<AbilityFire>,
    /// Present only when at least one enemy newly entered `follow`
    pub aggro: Option<AggroNotification>,
}

/// Runs the enemy turn using the built-in archetypes.
///
/// # Examples
///
/// ```
/// use delve::{run_enemy_turn, ActorRegistry, Floor, Position};
///
/// let mut floor = Floor::new(6, 6, "demo");
/// let rat = ActorRegistry::standard()
///     .spawn("rat", "rat-1", Position::new(3, 3), 1)
///     .unwrap();
/// floor.entities.push(rat);
///
/// let result = run_enemy_turn(floor, Position::new(3, 2), 1);
/// assert_eq!(result.attacks.len(), 1);
/// assert_eq!(result.aggro.unwrap().enemies, vec!["rat-1".to_string()]);
/// ```
pub fn run_enemy_turn(floor: Floor, player: Position, turn: u64) -> EnemyTurnResult {
    run_enemy_turn_with(ActorRegistry::standard(), floor, player, turn)
}

/// Runs the enemy turn against a specific archetype registry.
pub fn run_enemy_turn_with(
    registry: &ActorRegistry,
    mut floor: Floor,
    player: Position,
    turn: u64,
) -> EnemyTurnResult {
    let ids = floor.enemy_ids();
    let snapshot: HashMap<EntityId, BehaviorMode> = floor
        .entities
        .iter()
        .filter_map(|entity| {
            entity
                .as_enemy()
                .map(|enemy| (entity.id.clone(), enemy.behavior.mode))
        })
        .collect();

    let profiles: HashMap<EntityId, BehaviorProfile<'_>> = floor
        .entities
        .iter()
        .filter_map(|entity| {
            let enemy = entity.as_enemy()?;
            let profile = match registry.get(&enemy.archetype) {
                Some(actor) => BehaviorProfile::from_actor(actor),
                None => {
                    warn!(
                        "Unknown archetype '{}' for {}; using default chase profile",
                        enemy.archetype, entity.id
                    );
                    BehaviorProfile::fallback()
                }
            };
            Some((entity.id.clone(), profile))
        })
        .collect();

    let mut occupancy = Occupancy::from_floor(&floor, player);
    let mut attacks = Vec::new();

    for id in &ids {
        let Some(entity) = floor.entity(id) else {
            continue;
        };
        let Some(enemy) = entity.as_enemy() else {
            continue;
        };
        if !enemy.is_alive() {
            continue;
        }

        let Some(profile) = profiles.get(id) else {
            continue;
        };
        let position = entity.position;

        let mut mode = enemy.behavior.mode;
        if mode == BehaviorMode::Patrol {
            let in_range = position.manhattan_distance(player) <= profile.aggro_range;
            let hurt = enemy.behavior.was_damaged(enemy.hp);
            if in_range || hurt {
                debug!(
                    "{} starts following (in range: {}, hurt: {})",
                    id, in_range, hurt
                );
                mode = BehaviorMode::Follow;
            }
        }

        occupancy.release(position);
        let decision = decide(profile, mode, position, enemy.spawn, &floor, &occupancy);
        let destination = match decision {
            Decision::Move(to) => to,
            Decision::Stay | Decision::Attack(_) => position,
        };
        occupancy.claim(destination);

        if let Decision::Attack(kind) = decision {
            attacks.push(AttackIntent {
                attacker: id.clone(),
                kind,
                damage: enemy.damage,
            });
        }

        if let Some(entity) = floor.entity_mut(id) {
            entity.position = destination;
            if let Some(enemy) = entity.as_enemy_mut() {
                enemy.behavior.mode = mode;
            }
        }
    }

    // Proximity after movement
    for id in &ids {
        let Some(entity) = floor.entity(id) else {
            continue;
        };
        let Some(enemy) = entity.as_enemy() else {
            continue;
        };
        if enemy.behavior.mode != BehaviorMode::Patrol {
            continue;
        }
        let aggro_range = profiles
            .get(id)
            .map_or(crate::config::DEFAULT_AGGRO_RANGE, |profile| profile.aggro_range);
        if entity.position.manhattan_distance(player) <= aggro_range {
            debug!("{} starts following after moving into range", id);
            if let Some(enemy) = floor.entity_mut(id).and_then(|e| e.as_enemy_mut()) {
                enemy.behavior.mode = BehaviorMode::Follow;
            }
        }
    }

    let mut abilities = Vec::new();
    for id in &ids {
        let Some(entity) = floor.entity(id) else {
            continue;
        };
        let Some(enemy) = entity.as_enemy() else {
            continue;
        };
        if enemy.behavior.mode != BehaviorMode::Follow || !enemy.is_alive() {
            continue;
        }

        let Some(profile) = profiles.get(id) else {
            continue;
        };
        let position = entity.position;
        let mut fired = Vec::new();
        for ability in profile.abilities {
            let last_used = enemy
                .behavior
                .ability_last_used
                .get(&ability.id)
                .copied()
                .unwrap_or(0);
            if !ability.is_ready(turn, last_used) {
                continue;
            }
            if let Some(execution) = ability.execute(enemy.damage, position, player) {
                debug!(
                    "{} fires {} for {} damage on turn {}",
                    id, ability.id, execution.damage, turn
                );
                fired.push(AbilityFire {
                    enemy: id.clone(),
                    ability: ability.id.clone(),
                    damage: execution.damage,
                    effect: execution.effect,
                });
            }
        }

        if let Some(enemy) = floor.entity_mut(id).and_then(|e| e.as_enemy_mut()) {
            for fire in &fired {
                enemy
                    .behavior
                    .ability_last_used
                    .insert(fire.ability.clone(), turn);
            }
        }
        abilities.extend(fired);
    }

    let mut newly_following = Vec::new();
    for entity in floor.entities.iter_mut() {
        let id = entity.id.clone();
        if let Some(enemy) = entity.as_enemy_mut() {
            enemy.behavior.last_seen_hp = enemy.hp;
            let was_following = snapshot.get(&id) == Some(&BehaviorMode::Follow);
            if enemy.behavior.mode == BehaviorMode::Follow && !was_following {
                newly_following.push(id);
            }
        }
    }

    let aggro = (!newly_following.is_empty()).then(|| AggroNotification {
        enemies: newly_following,
        turn,
    });

    EnemyTurnResult {
        floor,
        attacks,
        abilities,
        aggro,
    }
}
