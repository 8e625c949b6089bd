//! # Turn Pipeline
//!
//! One complete game turn: the player's action resolves in full, then every
//! enemy acts on the resulting floor, then enemy attacks and abilities land
//! on the player in entity order.
//!
//! The pipeline consumes the floor and returns the updated one together
//! with the updated player; nothing is mutated in place.

use crate::actors::EffectDescriptor;
use crate::ai::{run_enemy_turn_with, AggroNotification, AttackKind};
use crate::combat::{
    cast_ability, resolve_enemy_attack, resolve_player_attack, AbilityId, CastFailure,
    CombatEvent, Interaction,
};
use crate::config::TRAP_DAMAGE;
use crate::game::{
    attempt_player_move, effective_stats, Direction, EntityId, Floor, ItemCatalog, MoveFailure,
    MoveOutcome, Pickup, PlayerStats, Position, TileKind,
};
use crate::generation::SeededRng;
use crate::ActorRegistry;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// What the player does with a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlayerAction {
    Move { direction: Direction },
    Cast { ability: AbilityId, facing: Direction },
    Wait,
}

/// Something that happened during a turn, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TurnEvent {
    PlayerMoved {
        from: Position,
        to: Position,
    },
    MoveFailed {
        failure: MoveFailure,
    },
    PlayerAttacked {
        hit: CombatEvent,
    },
    EnemyKilled {
        enemy: EntityId,
        xp_value: u32,
    },
    ItemPickedUp {
        pickup: Pickup,
    },
    TrapTriggered {
        position: Position,
        damage: u32,
    },
    ContainerOpened {
        position: Position,
    },
    ReachedExit,
    AbilityCast {
        ability: AbilityId,
        mana_spent: u32,
        interaction: Option<Interaction>,
    },
    AbilityHit {
        hit: CombatEvent,
    },
    CastFailed {
        ability: AbilityId,
        failure: CastFailure,
    },
    Teleported {
        from: Position,
        to: Position,
    },
    Waited,
    EnemyAttack {
        kind: AttackKind,
        hit: CombatEvent,
    },
    EnemyAbility {
        ability: String,
        effect: EffectDescriptor,
        hit: CombatEvent,
    },
    PlayerDied,
}

/// Everything one turn produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: u64,
    pub floor: Floor,
    pub player: PlayerStats,
    pub events: Vec<TurnEvent>,
    pub aggro: Option<AggroNotification>,
    pub player_died: bool,
    pub reached_exit: bool,
}

/// Plays one turn with the built-in archetypes.
///
/// # Examples
///
/// ```
/// use delve::*;
///
/// let floor = Floor::new(5, 5, "turn");
/// let player = PlayerStats::new(floor.entrance);
/// let mut rng = SeededRng::create("turn");
///
/// let action = PlayerAction::Move { direction: Direction::North };
/// let report = play_turn(floor, &player, action, 1, &mut rng, &StaticCatalog::new());
/// assert_eq!(report.player.position, Position::new(0, 3));
/// assert!(!report.player_died);
/// ```
pub fn play_turn(
    floor: Floor,
    player: &PlayerStats,
    action: PlayerAction,
    turn: u64,
    rng: &mut SeededRng,
    catalog: &dyn ItemCatalog,
) -> TurnReport {
    play_turn_with(ActorRegistry::standard(), floor, player, action, turn, rng, catalog)
}

/// Plays one turn against a specific archetype registry.
pub fn play_turn_with(
    registry: &ActorRegistry,
    mut floor: Floor,
    player: &PlayerStats,
    action: PlayerAction,
    turn: u64,
    rng: &mut SeededRng,
    catalog: &dyn ItemCatalog,
) -> TurnReport {
    let stats = effective_stats(player, catalog);
    let mut next = player.clone();
    let mut events = Vec::new();
    let mut reached_exit = false;

    match action {
        PlayerAction::Move { direction } => {
            match attempt_player_move(player.position, direction, &floor) {
                MoveOutcome::Moved(step) => {
                    next.position = step.to;
                    events.push(TurnEvent::PlayerMoved {
                        from: step.from,
                        to: step.to,
                    });

                    if let Some(pickup) = step.picked_up {
                        floor.remove_entity(&pickup.entity);
                        next.held_items.push(pickup.catalog_id.clone());
                        events.push(TurnEvent::ItemPickedUp { pickup });
                    }
                    if step.opened_container {
                        floor.set_tile(step.to, TileKind::Floor);
                        events.push(TurnEvent::ContainerOpened { position: step.to });
                    }
                    if step.trap_triggered {
                        next.hp -= TRAP_DAMAGE as i32;
                        events.push(TurnEvent::TrapTriggered {
                            position: step.to,
                            damage: TRAP_DAMAGE,
                        });
                    }
                    if step.reached_exit {
                        reached_exit = true;
                        events.push(TurnEvent::ReachedExit);
                    }
                }
                MoveOutcome::Failed(MoveFailure::EnemyCollision { target }) => {
                    if let Some(outcome) = resolve_player_attack(&floor, &target, &stats) {
                        events.push(TurnEvent::PlayerAttacked { hit: outcome.event });
                        push_kills(&floor, &outcome.removed, &mut events);
                        floor.entities = outcome.entities;
                    }
                }
                MoveOutcome::Failed(failure) => {
                    events.push(TurnEvent::MoveFailed { failure });
                }
            }
        }
        PlayerAction::Cast { ability, facing } => {
            let result = cast_ability(ability, &floor, player.position, facing, &stats, rng);
            if result.did_cast {
                next.mana -= result.mana_spent as i32;
                events.push(TurnEvent::AbilityCast {
                    ability,
                    mana_spent: result.mana_spent,
                    interaction: result.interaction.clone(),
                });
                events.extend(
                    result
                        .hits
                        .iter()
                        .cloned()
                        .map(|hit| TurnEvent::AbilityHit { hit }),
                );
                push_kills(&floor, &result.removed, &mut events);
                if let Some(to) = result.new_position {
                    events.push(TurnEvent::Teleported {
                        from: player.position,
                        to,
                    });
                    next.position = to;
                }
                floor.entities = result.entities;
            } else if let Some(failure) = result.failure {
                events.push(TurnEvent::CastFailed { ability, failure });
            }
        }
        PlayerAction::Wait => events.push(TurnEvent::Waited),
    }

    if !next.is_alive() || reached_exit {
        return finish(turn, floor, next, events, None, reached_exit);
    }

    let enemy_turn = run_enemy_turn_with(registry, floor, next.position, turn);
    let floor = enemy_turn.floor;

    for intent in &enemy_turn.attacks {
        if !next.is_alive() {
            break;
        }
        let hit = resolve_enemy_attack(&intent.attacker, intent.damage, stats.armor, &mut next);
        events.push(TurnEvent::EnemyAttack {
            kind: intent.kind,
            hit,
        });
    }

    for fire in &enemy_turn.abilities {
        if !next.is_alive() {
            break;
        }
        let hit = resolve_enemy_attack(&fire.enemy, fire.damage, 0, &mut next);
        events.push(TurnEvent::EnemyAbility {
            ability: fire.ability.clone(),
            effect: fire.effect,
            hit,
        });
    }

    finish(turn, floor, next, events, enemy_turn.aggro, reached_exit)
}

fn push_kills(floor: &Floor, removed: &[EntityId], events: &mut Vec<TurnEvent>) {
    for id in removed {
        let xp_value = floor
            .entity(id)
            .and_then(|entity| entity.as_enemy())
            .map_or(0, |enemy| enemy.xp_value);
        events.push(TurnEvent::EnemyKilled {
            enemy: id.clone(),
            xp_value,
        });
    }
}

fn finish(
    turn: u64,
    floor: Floor,
    player: PlayerStats,
    mut events: Vec<TurnEvent>,
    aggro: Option<AggroNotification>,
    reached_exit: bool,
) -> TurnReport {
    let player_died = !player.is_alive();
    if player_died {
        info!("Player died on turn {} of floor {}", turn, floor.floor_number);
        events.push(TurnEvent::PlayerDied);
    } else if reached_exit {
        info!("Player reached the exit on turn {}", turn);
    }
    debug!("Turn {} produced {} event(s)", turn, events.len());

    TurnReport {
        turn,
        floor,
        player,
        events,
        aggro,
        player_died,
        reached_exit,
    }
}
