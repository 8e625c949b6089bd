//! # Actors Module
//!
//! Enemy archetypes: base stats, movement and attack patterns, special
//! abilities, level scaling and floor-weighted selection.

pub mod registry;

pub use registry::*;

use crate::game::Position;
use serde::{Deserialize, Serialize};

/// How an archetype moves when it acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementPattern {
    /// Never moves
    Static,
    /// Wanders near its spawn until provoked
    Patrol,
    /// Closes distance to the player
    Chase,
    /// Stays at attack range once it gets there
    MaintainDistance,
    /// Blinks next to the player instead of walking
    Teleport,
}

/// How an archetype attacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackPattern {
    Melee,
    Ranged,
    Area,
}

impl AttackPattern {
    /// Whether this pattern attacks from beyond adjacent cells.
    pub fn is_ranged(self) -> bool {
        matches!(self, AttackPattern::Ranged | AttackPattern::Area)
    }
}

/// Visual effect named by an ability or attack for presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualEffect {
    Fireball,
    GroundSlam,
    Projectile,
    Shockwave,
    Blink,
}

/// Where an effect plays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    pub effect: VisualEffect,
    pub origin: Position,
    pub target: Position,
}

/// What an enemy ability does when its cooldown comes around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum EnemyAbilityRule {
    /// Hits the player wherever they are
    Spell { multiplier_pct: u32 },
    /// Hits the player only within `radius`; otherwise holds its charge
    Slam { multiplier_pct: u32, radius: u32 },
}

/// A special ability with a fixed turn-interval cooldown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyAbility {
    pub id: String,
    /// Turns between firings
    pub interval: u64,
    pub rule: EnemyAbilityRule,
    pub effect: VisualEffect,
}

/// Damage and effect produced by an ability firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityExecution {
    pub damage: u32,
    pub effect: EffectDescriptor,
}

impl EnemyAbility {
    /// Whether enough turns have passed since `last_used`.
    pub fn is_ready(&self, turn: u64, last_used: u64) -> bool {
        turn.saturating_sub(last_used) >= self.interval
    }

    /// Runs the ability's rule. `None` means the rule declined to fire.
    pub fn execute(&self, base_damage: u32, caster: Position, player: Position) -> Option<AbilityExecution> {
        let multiplier_pct = match self.rule {
            EnemyAbilityRule::Spell { multiplier_pct } => multiplier_pct,
            EnemyAbilityRule::Slam {
                multiplier_pct,
                radius,
            } => {
                if caster.manhattan_distance(player) > radius {
                    return None;
                }
                multiplier_pct
            }
        };

        let damage = u64::from(base_damage) * u64::from(multiplier_pct) / 100;
        Some(AbilityExecution {
            damage: u32::try_from(damage).unwrap_or(u32::MAX),
            effect: EffectDescriptor {
                effect: self.effect,
                origin: caster,
                target: player,
            },
        })
    }
}

/// Per-level stat increments applied above level 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingRule {
    pub hp_per_level: i32,
    pub damage_per_level: u32,
    pub armor_per_level: u32,
    pub xp_per_level: u32,
}

impl Default for ScalingRule {
    fn default() -> Self {
        Self {
            hp_per_level: 3,
            damage_per_level: 1,
            armor_per_level: 1,
            xp_per_level: 2,
        }
    }
}

/// Stats of an archetype at a particular level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaledStats {
    pub level: u32,
    pub hp: i32,
    pub damage: u32,
    pub armor: u32,
    pub xp_value: u32,
}

/// Definition of an enemy archetype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorType {
    pub id: String,
    pub name: String,
    pub base_hp: i32,
    pub base_damage: u32,
    pub base_armor: u32,
    pub base_xp: u32,
    pub movement: MovementPattern,
    pub attack: AttackPattern,
    pub attack_range: u32,
    /// Falls back to the default aggro range when unset
    pub aggro_range: Option<u32>,
    #[serde(default)]
    pub abilities: Vec<EnemyAbility>,
    #[serde(default)]
    pub scaling: ScalingRule,
}

impl ActorType {
    /// Scales base stats linearly to `level` (levels below 1 count as 1).
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::ActorRegistry;
    ///
    /// let rat = ActorRegistry::standard().get("rat").unwrap();
    /// let at_three = rat.scaled(3);
    /// assert_eq!(at_three.hp, rat.base_hp + 2 * rat.scaling.hp_per_level);
    /// ```
    pub fn scaled(&self, level: u32) -> ScaledStats {
        let level = level.max(1);
        let steps = level - 1;
        let hp = i64::from(self.scaling.hp_per_level)
            .saturating_mul(i64::from(steps))
            .saturating_add(i64::from(self.base_hp));
        let grow = |base: u32, per_level: u32| base.saturating_add(per_level.saturating_mul(steps));
        ScaledStats {
            level,
            hp: hp.clamp(1, i64::from(i32::MAX)) as i32,
            damage: grow(self.base_damage, self.scaling.damage_per_level),
            armor: grow(self.base_armor, self.scaling.armor_per_level),
            xp_value: grow(self.base_xp, self.scaling.xp_per_level),
        }
    }

    /// Aggro range with the default applied.
    pub fn effective_aggro_range(&self) -> u32 {
        self.aggro_range
            .unwrap_or(crate::config::DEFAULT_AGGRO_RANGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slam() -> EnemyAbility {
        EnemyAbility {
            id: "slam".to_string(),
            interval: 3,
            rule: EnemyAbilityRule::Slam {
                multiplier_pct: 150,
                radius: 1,
            },
            effect: VisualEffect::GroundSlam,
        }
    }

    #[test]
    fn test_cooldown_readiness() {
        let ability = slam();
        assert!(!ability.is_ready(2, 0));
        assert!(ability.is_ready(3, 0));
        assert!(!ability.is_ready(5, 3));
        assert!(ability.is_ready(6, 3));
    }

    #[test]
    fn test_slam_needs_proximity() {
        let ability = slam();
        let caster = Position::new(2, 2);
        assert!(ability.execute(10, caster, Position::new(4, 2)).is_none());

        let fired = ability.execute(10, caster, Position::new(3, 2)).unwrap();
        assert_eq!(fired.damage, 15);
        assert_eq!(fired.effect.effect, VisualEffect::GroundSlam);
    }

    #[test]
    fn test_spell_fires_at_any_range() {
        let ability = EnemyAbility {
            id: "fireball".to_string(),
            interval: 4,
            rule: EnemyAbilityRule::Spell { multiplier_pct: 200 },
            effect: VisualEffect::Fireball,
        };
        let fired = ability
            .execute(6, Position::new(0, 0), Position::new(9, 9))
            .unwrap();
        assert_eq!(fired.damage, 12);
        assert_eq!(fired.effect.target, Position::new(9, 9));
    }

    #[test]
    fn test_huge_damage_saturates() {
        let fired = slam()
            .execute(u32::MAX, Position::new(0, 0), Position::new(1, 0))
            .unwrap();
        assert_eq!(fired.damage, u32::MAX);
    }

    #[test]
    fn test_scaling_saturates_at_extreme_levels() {
        let rat = ActorType {
            id: "rat".to_string(),
            name: "Rat".to_string(),
            base_hp: 6,
            base_damage: 4,
            base_armor: 0,
            base_xp: 1,
            movement: MovementPattern::Patrol,
            attack: AttackPattern::Melee,
            attack_range: 1,
            aggro_range: None,
            abilities: Vec::new(),
            scaling: ScalingRule::default(),
        };

        let stats = rat.scaled(u32::MAX);
        assert_eq!(stats.level, u32::MAX);
        assert_eq!(stats.hp, i32::MAX);
        assert_eq!(stats.damage, u32::MAX);
        assert_eq!(stats.armor, u32::MAX);
        assert_eq!(stats.xp_value, u32::MAX);
        assert_eq!(rat.scaled(0), rat.scaled(1));
    }
}
