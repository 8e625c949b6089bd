//! # Archetype Registry
//!
//! The fixed catalog of enemy archetypes and the floor-tiered spawn weights.

use crate::actors::{
    ActorType, AttackPattern, EnemyAbility, EnemyAbilityRule, MovementPattern, ScalingRule,
    VisualEffect,
};
use crate::game::{BehaviorMode, BehaviorState, EnemyAttributes, Entity, EntityId, Position};
use crate::{DelveError, DelveResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Spawn weights used from `min_floor` upward until the next tier begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnTier {
    pub min_floor: u32,
    pub weights: Vec<(String, u32)>,
}

/// Mapping from archetype id to definition, plus spawn tiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorRegistry {
    types: BTreeMap<String, ActorType>,
    /// Sorted by `min_floor`, ascending
    tiers: Vec<SpawnTier>,
}

static STANDARD: OnceLock<ActorRegistry> = OnceLock::new();

#[allow(clippy::too_many_arguments)]
fn archetype(
    id: &str,
    name: &str,
    (base_hp, base_damage, base_armor, base_xp): (i32, u32, u32, u32),
    movement: MovementPattern,
    attack: AttackPattern,
    attack_range: u32,
    aggro_range: Option<u32>,
    abilities: Vec<EnemyAbility>,
) -> ActorType {
    ActorType {
        id: id.to_string(),
        name: name.to_string(),
        base_hp,
        base_damage,
        base_armor,
        base_xp,
        movement,
        attack,
        attack_range,
        aggro_range,
        abilities,
        scaling: ScalingRule::default(),
    }
}

fn tier(min_floor: u32, weights: &[(&str, u32)]) -> SpawnTier {
    SpawnTier {
        min_floor,
        weights: weights
            .iter()
            .map(|(id, weight)| (id.to_string(), *weight))
            .collect(),
    }
}

impl ActorRegistry {
    /// Builds a registry from archetypes and tiers.
    ///
    /// Tiers are sorted by `min_floor`; weights naming unknown archetypes are
    /// rejected.
    pub fn new(types: Vec<ActorType>, mut tiers: Vec<SpawnTier>) -> DelveResult<Self> {
        let types: BTreeMap<String, ActorType> = types
            .into_iter()
            .map(|actor| (actor.id.clone(), actor))
            .collect();

        if tiers.is_empty() {
            return Err(DelveError::InvalidConfig(
                "registry needs at least one spawn tier".to_string(),
            ));
        }
        for tier in &tiers {
            if tier.weights.iter().all(|(_, weight)| *weight == 0) {
                return Err(DelveError::InvalidConfig(format!(
                    "spawn tier for floor {} has no positive weight",
                    tier.min_floor
                )));
            }
            if let Some((id, _)) = tier.weights.iter().find(|(id, _)| !types.contains_key(id)) {
                return Err(DelveError::UnknownArchetype(id.clone()));
            }
        }
        tiers.sort_by_key(|tier| tier.min_floor);

        Ok(Self { types, tiers })
    }

    /// The built-in archetypes, built once and shared.
    pub fn standard() -> &'static ActorRegistry {
        STANDARD.get_or_init(Self::builtin)
    }

    /// Builds the built-in archetype catalog.
    pub fn builtin() -> ActorRegistry {
        let mut ogre = archetype(
            "ogre",
            "Ogre",
            (30, 9, 3, 12),
            MovementPattern::Chase,
            AttackPattern::Melee,
            1,
            None,
            vec![EnemyAbility {
                id: "slam".to_string(),
                interval: 3,
                rule: EnemyAbilityRule::Slam {
                    multiplier_pct: 150,
                    radius: 1,
                },
                effect: VisualEffect::GroundSlam,
            }],
        );
        ogre.scaling.hp_per_level = 6;

        let types = vec![
            archetype("rat", "Rat", (10, 4, 0, 2), MovementPattern::Chase, AttackPattern::Melee, 1, None, vec![]),
            archetype("skeleton", "Skeleton", (16, 6, 2, 5), MovementPattern::Patrol, AttackPattern::Melee, 1, Some(3), vec![]),
            archetype("archer", "Skeleton Archer", (12, 5, 1, 6), MovementPattern::MaintainDistance, AttackPattern::Ranged, 4, Some(5), vec![]),
            archetype("sentinel", "Sentinel", (24, 6, 4, 8), MovementPattern::Static, AttackPattern::Ranged, 3, Some(3), vec![]),
            ogre,
            archetype(
                "warlock",
                "Warlock",
                (14, 5, 1, 10),
                MovementPattern::MaintainDistance,
                AttackPattern::Area,
                3,
                Some(5),
                vec![EnemyAbility {
                    id: "fireball".to_string(),
                    interval: 4,
                    rule: EnemyAbilityRule::Spell { multiplier_pct: 200 },
                    effect: VisualEffect::Fireball,
                }],
            ),
            archetype("wraith", "Wraith", (14, 6, 2, 9), MovementPattern::Teleport, AttackPattern::Melee, 1, Some(4), vec![]),
        ];

        let tiers = vec![
            tier(1, &[("rat", 50), ("skeleton", 35), ("archer", 15)]),
            tier(3, &[("rat", 25), ("skeleton", 30), ("archer", 20), ("sentinel", 10), ("ogre", 15)]),
            tier(
                5,
                &[
                    ("skeleton", 20),
                    ("archer", 20),
                    ("sentinel", 10),
                    ("ogre", 20),
                    ("warlock", 15),
                    ("wraith", 15),
                ],
            ),
        ];

        let types = types
            .into_iter()
            .map(|actor| (actor.id.clone(), actor))
            .collect();
        ActorRegistry { types, tiers }
    }

    /// Gets an archetype by id.
    pub fn get(&self, id: &str) -> Option<&ActorType> {
        self.types.get(id)
    }

    /// Gets an archetype by id, reporting unknown ids as errors.
    pub fn require(&self, id: &str) -> DelveResult<&ActorType> {
        self.get(id)
            .ok_or_else(|| DelveError::UnknownArchetype(id.to_string()))
    }

    /// Every archetype id, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// The spawn tier in effect on a floor.
    ///
    /// Floors beyond the last tier reuse it; floors before the first tier use
    /// the first. `None` only for a registry without tiers.
    pub fn tier_for(&self, floor_number: u32) -> Option<&SpawnTier> {
        self.tiers
            .iter()
            .rev()
            .find(|tier| tier.min_floor <= floor_number)
            .or_else(|| self.tiers.first())
    }

    /// Picks an archetype id for a floor from a draw in [0, 1).
    ///
    /// Returns an empty id when the registry has no tiers, which
    /// [`ActorRegistry::spawn`] then rejects.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::ActorRegistry;
    ///
    /// let registry = ActorRegistry::standard();
    /// assert_eq!(registry.select(1, 0.0), "rat");
    /// assert_eq!(registry.select(1, 0.99), "archer");
    /// ```
    pub fn select(&self, floor_number: u32, draw: f64) -> &str {
        let Some(tier) = self.tier_for(floor_number) else {
            return "";
        };
        let total: u32 = tier.weights.iter().map(|(_, weight)| weight).sum();
        let target = draw.clamp(0.0, 1.0) * total as f64;

        let mut cumulative = 0.0;
        for (id, weight) in &tier.weights {
            cumulative += *weight as f64;
            if target < cumulative {
                return id;
            }
        }

        tier.weights
            .iter()
            .rev()
            .find(|(_, weight)| *weight > 0)
            .map(|(id, _)| id.as_str())
            .unwrap_or_default()
    }

    /// Creates an enemy of the given archetype and level.
    ///
    /// Static archetypes start `static`; every other archetype starts on
    /// `patrol`. Nothing spawns already following the player.
    pub fn spawn(
        &self,
        archetype_id: &str,
        entity_id: impl Into<EntityId>,
        position: Position,
        level: u32,
    ) -> DelveResult<Entity> {
        let actor = self.require(archetype_id)?;
        let stats = actor.scaled(level);
        let mode = match actor.movement {
            MovementPattern::Static => BehaviorMode::Static,
            _ => BehaviorMode::Patrol,
        };

        Ok(Entity::enemy(
            entity_id,
            position,
            EnemyAttributes {
                archetype: actor.id.clone(),
                level: stats.level,
                hp: stats.hp,
                max_hp: stats.hp,
                damage: stats.damage,
                armor: stats.armor,
                xp_value: stats.xp_value,
                spawn: position,
                behavior: BehaviorState::new(mode, stats.hp),
            },
        ))
    }
}
