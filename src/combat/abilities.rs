//! # Player Abilities
//!
//! Definitions and resolvers for the abilities a player can cast.
//!
//! Casting is a pure function of the floor and the caster: it returns the
//! updated entity list and a description of what happened, and leaves the
//! floor itself untouched. Each rule has its own resolver.

use crate::combat::{remove_dead, strike_enemy, CombatEvent, Combatant};
use crate::config::SHOCKWAVE_RADIUS;
use crate::game::{Direction, EffectiveStats, Entity, EntityId, Floor, Position};
use crate::generation::SeededRng;
use crate::{DelveError, DelveResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Abilities the player can cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityId {
    Bolt,
    Shockwave,
    Teleport,
}

impl AbilityId {
    pub fn all() -> [AbilityId; 3] {
        [AbilityId::Bolt, AbilityId::Shockwave, AbilityId::Teleport]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AbilityId::Bolt => "bolt",
            AbilityId::Shockwave => "shockwave",
            AbilityId::Teleport => "teleport",
        }
    }

    /// Full definition of this ability.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{AbilityId, Targeting};
    ///
    /// let bolt = AbilityId::Bolt.definition();
    /// assert_eq!(bolt.mana_cost, 4);
    /// assert_eq!(bolt.targeting, Targeting::Directional);
    /// ```
    pub fn definition(self) -> AbilityDefinition {
        match self {
            AbilityId::Bolt => AbilityDefinition {
                id: self,
                name: "Arcane Bolt",
                mana_cost: 4,
                targeting: Targeting::Directional,
                rule: AbilityRule::Bolt,
            },
            AbilityId::Shockwave => AbilityDefinition {
                id: self,
                name: "Shockwave",
                mana_cost: 6,
                targeting: Targeting::Instant,
                rule: AbilityRule::Area {
                    radius: SHOCKWAVE_RADIUS,
                },
            },
            AbilityId::Teleport => AbilityDefinition {
                id: self,
                name: "Teleport",
                mana_cost: 5,
                targeting: Targeting::Instant,
                rule: AbilityRule::Relocate,
            },
        }
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AbilityId {
    type Err = DelveError;

    fn from_str(s: &str) -> DelveResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bolt" => Ok(AbilityId::Bolt),
            "shockwave" => Ok(AbilityId::Shockwave),
            "teleport" => Ok(AbilityId::Teleport),
            other => Err(DelveError::UnknownAbility(other.to_string())),
        }
    }
}

/// Whether an ability needs a facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Targeting {
    Instant,
    Directional,
}

/// Execution rule of an ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum AbilityRule {
    /// Projectile along the facing, stopped by walls and the first enemy
    Bolt,
    /// Hits every enemy within `radius`, walls notwithstanding
    Area { radius: u32 },
    /// Moves the caster to a random free cell
    Relocate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AbilityDefinition {
    pub id: AbilityId,
    pub name: &'static str,
    pub mana_cost: u32,
    pub targeting: Targeting,
    pub rule: AbilityRule,
}

/// Why a cast did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum CastFailure {
    InsufficientMana { required: u32, available: i32 },
    NoValidTarget,
}

/// What presentation layers need to show a cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "interaction", rename_all = "snake_case")]
pub enum Interaction {
    Projectile {
        origin: Position,
        direction: Direction,
        /// Cells the bolt crossed, impact cell included
        path: Vec<Position>,
        impact: Option<Position>,
    },
    Shockwave {
        center: Position,
        radius: u32,
    },
    Teleport {
        from: Position,
        to: Position,
    },
}

/// Outcome of casting an ability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastResult {
    pub ability: AbilityId,
    pub did_cast: bool,
    pub failure: Option<CastFailure>,
    pub mana_spent: u32,
    /// Entity list after the cast, dead removed
    pub entities: Vec<Entity>,
    /// Per-target hits, in resolution order
    pub hits: Vec<CombatEvent>,
    pub removed: Vec<EntityId>,
    pub interaction: Option<Interaction>,
    /// Where the caster ends up, if the cast moved them
    pub new_position: Option<Position>,
}

impl CastResult {
    fn failed(ability: AbilityId, floor: &Floor, failure: CastFailure) -> Self {
        Self {
            ability,
            did_cast: false,
            failure: Some(failure),
            mana_spent: 0,
            entities: floor.entities.clone(),
            hits: Vec::new(),
            removed: Vec::new(),
            interaction: None,
            new_position: None,
        }
    }

    fn cast(definition: &AbilityDefinition, entities: Vec<Entity>) -> Self {
        Self {
            ability: definition.id,
            did_cast: true,
            failure: None,
            mana_spent: definition.mana_cost,
            entities,
            hits: Vec::new(),
            removed: Vec::new(),
            interaction: None,
            new_position: None,
        }
    }

    /// Damage dealt to each target, in resolution order.
    pub fn damage_by_target(&self) -> Vec<(EntityId, u32)> {
        self.hits
            .iter()
            .filter_map(|hit| match &hit.defender {
                Combatant::Entity(id) => Some((id.clone(), hit.amount)),
                Combatant::Player => None,
            })
            .collect()
    }
}

/// Casts an ability from `position`.
///
/// `facing` only matters for directional abilities. The RNG is drawn from
/// only by rules that need it, and only once mana has been checked.
///
/// # Examples
///
/// ```
/// use delve::*;
///
/// let floor = Floor::new(3, 3, "cast");
/// let stats = effective_stats(&PlayerStats::new(Position::new(0, 2)), &StaticCatalog::new());
/// let mut rng = SeededRng::create("cast");
///
/// let result = cast_ability(AbilityId::Bolt, &floor, Position::new(0, 2), Direction::East, &stats, &mut rng);
/// assert!(result.did_cast);
/// assert!(result.hits.is_empty());
/// assert_eq!(result.mana_spent, 4);
/// ```
pub fn cast_ability(
    ability: AbilityId,
    floor: &Floor,
    position: Position,
    facing: Direction,
    stats: &EffectiveStats,
    rng: &mut SeededRng,
) -> CastResult {
    let definition = ability.definition();

    if stats.mana < definition.mana_cost as i32 {
        debug!(
            "Cannot cast {}: needs {} mana, has {}",
            ability, definition.mana_cost, stats.mana
        );
        return CastResult::failed(
            ability,
            floor,
            CastFailure::InsufficientMana {
                required: definition.mana_cost,
                available: stats.mana,
            },
        );
    }

    let result = match definition.rule {
        AbilityRule::Bolt => resolve_bolt(&definition, floor, position, facing, stats),
        AbilityRule::Area { radius } => resolve_area(&definition, floor, position, radius, stats),
        AbilityRule::Relocate => resolve_relocate(&definition, floor, position, rng),
    };

    debug!(
        "Cast {} from {}: did_cast={}, {} hit(s)",
        ability,
        position,
        result.did_cast,
        result.hits.len()
    );
    result
}

fn resolve_bolt(
    definition: &AbilityDefinition,
    floor: &Floor,
    origin: Position,
    facing: Direction,
    stats: &EffectiveStats,
) -> CastResult {
    let mut result = CastResult::cast(definition, floor.entities.clone());
    let mut path = Vec::new();
    let mut impact = None;
    let mut cursor = origin.step(facing);

    while floor.is_walkable(cursor) {
        path.push(cursor);
        if let Some(target) = floor.entity_at(cursor).filter(|entity| entity.is_enemy()) {
            impact = Some(cursor);
            if let Some(event) = strike_enemy(
                &mut result.entities,
                Combatant::Player,
                &target.id,
                stats.spell_damage,
            ) {
                result.hits.push(event);
            }
            break;
        }
        cursor = cursor.step(facing);
    }

    result.removed = remove_dead(&mut result.entities);
    result.interaction = Some(Interaction::Projectile {
        origin,
        direction: facing,
        path,
        impact,
    });
    result
}

fn resolve_area(
    definition: &AbilityDefinition,
    floor: &Floor,
    center: Position,
    radius: u32,
    stats: &EffectiveStats,
) -> CastResult {
    let mut result = CastResult::cast(definition, floor.entities.clone());
    let targets: Vec<EntityId> = floor
        .entities
        .iter()
        .filter(|entity| entity.is_enemy())
        .filter(|entity| entity.position.manhattan_distance(center) <= radius)
        .map(|entity| entity.id.clone())
        .collect();

    for target in &targets {
        if let Some(event) = strike_enemy(
            &mut result.entities,
            Combatant::Player,
            target,
            stats.spell_damage,
        ) {
            result.hits.push(event);
        }
    }

    result.removed = remove_dead(&mut result.entities);
    result.interaction = Some(Interaction::Shockwave { center, radius });
    result
}

fn resolve_relocate(
    definition: &AbilityDefinition,
    floor: &Floor,
    from: Position,
    rng: &mut SeededRng,
) -> CastResult {
    let candidates: Vec<Position> = floor
        .walkable_positions()
        .into_iter()
        .filter(|pos| *pos != from && floor.entity_at(*pos).is_none())
        .collect();

    let Some(&to) = rng.pick(&candidates) else {
        return CastResult::failed(definition.id, floor, CastFailure::NoValidTarget);
    };

    let mut result = CastResult::cast(definition, floor.entities.clone());
    result.new_position = Some(to);
    result.interaction = Some(Interaction::Teleport { from, to });
    result
}
