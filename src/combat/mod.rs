//! # Combat Module
//!
//! Damage math shared by every hit in the game, melee resolution for both
//! sides, and the player's ability resolvers.
//!
//! Every hit deals `max(MIN_DAMAGE, attack - armor)`. Armor can blunt a hit
//! but never cancel it; a hit that armor would have fully absorbed is still
//! reported, flagged `mitigated`.

pub mod abilities;

pub use abilities::*;

use crate::config::MIN_DAMAGE;
use crate::game::{EffectiveStats, Entity, EntityId, Floor, PlayerStats};
use log::debug;
use serde::{Deserialize, Serialize};

/// One side of a hit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combatant {
    Player,
    Entity(EntityId),
}

/// A single resolved hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatEvent {
    pub attacker: Combatant,
    pub defender: Combatant,
    /// Damage actually dealt
    pub amount: u32,
    /// Armor alone would have absorbed the whole attack
    pub mitigated: bool,
    pub killed: bool,
}

/// Damage after armor, never below [`MIN_DAMAGE`].
///
/// # Examples
///
/// ```
/// use delve::mitigated_damage;
///
/// assert_eq!(mitigated_damage(12, 3), 9);
/// assert_eq!(mitigated_damage(6, 4), 5);
/// assert_eq!(mitigated_damage(2, 10), 5);
/// ```
pub fn mitigated_damage(attack: u32, armor: u32) -> u32 {
    attack.saturating_sub(armor).max(MIN_DAMAGE)
}

/// Hit point loss for a resolved damage amount, capped to fit `i32`.
pub(crate) fn hp_loss(amount: u32) -> i32 {
    i32::try_from(amount).unwrap_or(i32::MAX)
}

/// Whether armor would have absorbed the whole attack.
pub fn fully_absorbed(attack: u32, armor: u32) -> bool {
    armor >= attack
}

/// Hits the enemy `target` in `entities` for `attack` before armor.
///
/// Returns `None` if `target` is not a living enemy. Dead enemies stay in
/// the list; callers remove them once every hit of the pass has landed.
pub fn strike_enemy(
    entities: &mut [Entity],
    attacker: Combatant,
    target: &str,
    attack: u32,
) -> Option<CombatEvent> {
    let entity = entities.iter_mut().find(|entity| entity.id == target)?;
    let enemy = entity.as_enemy_mut().filter(|enemy| enemy.is_alive())?;

    let amount = mitigated_damage(attack, enemy.armor);
    let mitigated = fully_absorbed(attack, enemy.armor);
    let killed = enemy.take_damage(amount);

    Some(CombatEvent {
        attacker,
        defender: Combatant::Entity(target.to_string()),
        amount,
        mitigated,
        killed,
    })
}

/// Drops every dead enemy, returning the removed ids in order.
pub fn remove_dead(entities: &mut Vec<Entity>) -> Vec<EntityId> {
    let dead: Vec<EntityId> = entities
        .iter()
        .filter(|entity| !entity.is_alive())
        .map(|entity| entity.id.clone())
        .collect();
    entities.retain(|entity| entity.is_alive());
    dead
}

/// Result of the player's bump attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeleeOutcome {
    /// Entity list after the hit, dead removed
    pub entities: Vec<Entity>,
    pub event: CombatEvent,
    pub removed: Vec<EntityId>,
}

/// Resolves the player hitting `target` with their weapon.
///
/// Returns `None` if `target` is not a living enemy on the floor.
pub fn resolve_player_attack(
    floor: &Floor,
    target: &str,
    stats: &EffectiveStats,
) -> Option<MeleeOutcome> {
    let mut entities = floor.entities.clone();
    let event = strike_enemy(&mut entities, Combatant::Player, target, stats.weapon_damage)?;
    let removed = remove_dead(&mut entities);

    debug!(
        "Player hits {} for {}{}",
        target,
        event.amount,
        if event.killed { " (killed)" } else { "" }
    );

    Some(MeleeOutcome {
        entities,
        event,
        removed,
    })
}

/// Resolves an enemy hit against the player, lowering their hit points.
///
/// `armor` is the player's effective armor; pass 0 for attacks that ignore
/// armor.
pub fn resolve_enemy_attack(
    attacker: &str,
    attack: u32,
    armor: u32,
    player: &mut PlayerStats,
) -> CombatEvent {
    let amount = mitigated_damage(attack, armor);
    let mitigated = fully_absorbed(attack, armor);
    player.hp = player.hp.saturating_sub(hp_loss(amount));

    CombatEvent {
        attacker: Combatant::Entity(attacker.to_string()),
        defender: Combatant::Player,
        amount,
        mitigated,
        killed: !player.is_alive(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::ActorRegistry;
    use crate::game::{ItemCatalog, Position, StaticCatalog};

    fn floor_with_rat() -> Floor {
        let mut floor = Floor::new(5, 5, "combat");
        let rat = ActorRegistry::standard()
            .spawn("rat", "rat-1", Position::new(2, 2), 1)
            .unwrap();
        floor.entities.push(rat);
        floor
    }

    fn stats() -> EffectiveStats {
        let catalog: &dyn ItemCatalog = &StaticCatalog::new();
        crate::game::effective_stats(&PlayerStats::new(Position::new(2, 3)), catalog)
    }

    #[test]
    fn test_damage_floor() {
        assert_eq!(mitigated_damage(0, 0), MIN_DAMAGE);
        assert_eq!(mitigated_damage(5, 5), MIN_DAMAGE);
        assert_eq!(mitigated_damage(20, 5), 15);
        assert!(fully_absorbed(3, 3));
        assert!(!fully_absorbed(4, 3));
    }

    #[test]
    fn test_player_attack_damages_without_touching_floor() {
        let floor = floor_with_rat();
        let outcome = resolve_player_attack(&floor, "rat-1", &stats()).unwrap();

        assert_eq!(outcome.event.amount, 8);
        assert!(!outcome.event.killed);
        assert!(outcome.removed.is_empty());
        assert_eq!(outcome.entities[0].as_enemy().unwrap().hp, 2);
        assert_eq!(floor.entities[0].as_enemy().unwrap().hp, 10);
    }

    #[test]
    fn test_killing_blow_removes_enemy() {
        let mut floor = floor_with_rat();
        floor.entities[0].as_enemy_mut().unwrap().hp = 3;
        let outcome = resolve_player_attack(&floor, "rat-1", &stats()).unwrap();

        assert!(outcome.event.killed);
        assert_eq!(outcome.removed, vec!["rat-1".to_string()]);
        assert!(outcome.entities.is_empty());
    }

    #[test]
    fn test_armored_target_still_takes_minimum() {
        let mut floor = floor_with_rat();
        floor.entities[0].as_enemy_mut().unwrap().armor = 20;
        let outcome = resolve_player_attack(&floor, "rat-1", &stats()).unwrap();
        assert_eq!(outcome.event.amount, MIN_DAMAGE);
        assert!(outcome.event.mitigated);
    }

    #[test]
    fn test_weapon_ten_against_armor_999_still_lands() {
        let mut floor = floor_with_rat();
        floor.entities[0].as_enemy_mut().unwrap().armor = 999;
        let mut attacker = stats();
        attacker.weapon_damage = 10;

        let outcome = resolve_player_attack(&floor, "rat-1", &attacker).unwrap();
        assert_eq!(outcome.event.amount, MIN_DAMAGE);
        assert!(outcome.event.mitigated);
        assert_eq!(outcome.event.defender, Combatant::Entity("rat-1".to_string()));
    }

    #[test]
    fn test_attack_on_non_enemy_is_none() {
        let mut floor = Floor::new(5, 5, "npc");
        floor.entities.push(Entity::npc("sage", Position::new(1, 1), "Sage"));
        assert!(resolve_player_attack(&floor, "sage", &stats()).is_none());
        assert!(resolve_player_attack(&floor, "ghost", &stats()).is_none());
    }

    #[test]
    fn test_enemy_attack_on_player() {
        let mut player = PlayerStats::new(Position::new(0, 0));
        let event = resolve_enemy_attack("ogre", 12, 2, &mut player);
        assert_eq!(event.amount, 10);
        assert_eq!(player.hp, 30);
        assert!(!event.killed);

        player.hp = 4;
        let event = resolve_enemy_attack("ogre", 1, 2, &mut player);
        assert!(event.mitigated);
        assert!(event.killed);
        assert_eq!(player.hp, -1);
    }

    #[test]
    fn test_huge_enemy_damage_never_heals() {
        let mut player = PlayerStats::new(Position::new(0, 0));
        let event = resolve_enemy_attack("titan", u32::MAX, 0, &mut player);
        assert_eq!(event.amount, u32::MAX);
        assert!(event.killed);
        assert!(player.hp < 0);
    }
}
