//! # Entities
//!
//! Units occupying the grid: enemies, items, relics and NPCs.
//!
//! Each entity carries a typed attribute payload selected by its kind. Enemy
//! payloads additionally carry the behavior state the turn engine mutates.

use crate::game::{EntityId, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Discriminant of an entity's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Enemy,
    Item,
    Relic,
    Npc,
}

/// The enemy behavior state machine's current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorMode {
    /// Holds position forever; never transitions
    Static,
    /// Wanders near its spawn anchor
    Patrol,
    /// Pursues or engages the player; sticky once entered
    Follow,
}

/// Per-enemy state carried between turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorState {
    pub mode: BehaviorMode,
    /// Hit points observed at the end of the enemy's previous turn
    pub last_seen_hp: i32,
    /// Turn on which each ability last fired, keyed by ability id
    pub ability_last_used: BTreeMap<String, u64>,
}

impl BehaviorState {
    /// Creates a fresh state for a newly spawned enemy.
    pub fn new(mode: BehaviorMode, hp: i32) -> Self {
        Self {
            mode,
            last_seen_hp: hp,
            ability_last_used: BTreeMap::new(),
        }
    }

    /// Whether the enemy has lost hit points since it last acted.
    pub fn was_damaged(&self, current_hp: i32) -> bool {
        current_hp < self.last_seen_hp
    }
}

/// Attributes of a spawned enemy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyAttributes {
    /// Registry archetype id
    pub archetype: String,
    pub level: u32,
    pub hp: i32,
    pub max_hp: i32,
    pub damage: u32,
    pub armor: u32,
    pub xp_value: u32,
    /// Anchor for the patrol radius
    pub spawn: Position,
    pub behavior: BehaviorState,
}

impl EnemyAttributes {
    /// Applies damage and reports whether the enemy died from it.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.hp = self.hp.saturating_sub(crate::combat::hp_loss(amount));
        self.hp <= 0
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// Kind-specific payload of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntityAttributes {
    Enemy(EnemyAttributes),
    Item { item_id: String },
    Relic { relic_id: String },
    Npc { name: String },
}

/// A unit occupying one grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub position: Position,
    pub attributes: EntityAttributes,
}

impl Entity {
    /// Creates an enemy entity.
    pub fn enemy(id: impl Into<EntityId>, position: Position, attributes: EnemyAttributes) -> Self {
        Self {
            id: id.into(),
            position,
            attributes: EntityAttributes::Enemy(attributes),
        }
    }

    /// Creates an item entity referring to a catalog id.
    pub fn item(id: impl Into<EntityId>, position: Position, item_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position,
            attributes: EntityAttributes::Item {
                item_id: item_id.into(),
            },
        }
    }

    /// Creates a relic entity referring to a catalog id.
    pub fn relic(id: impl Into<EntityId>, position: Position, relic_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position,
            attributes: EntityAttributes::Relic {
                relic_id: relic_id.into(),
            },
        }
    }

    /// Creates a non-player character.
    pub fn npc(id: impl Into<EntityId>, position: Position, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position,
            attributes: EntityAttributes::Npc { name: name.into() },
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self.attributes {
            EntityAttributes::Enemy(_) => EntityKind::Enemy,
            EntityAttributes::Item { .. } => EntityKind::Item,
            EntityAttributes::Relic { .. } => EntityKind::Relic,
            EntityAttributes::Npc { .. } => EntityKind::Npc,
        }
    }

    pub fn is_enemy(&self) -> bool {
        self.kind() == EntityKind::Enemy
    }

    /// Enemy attributes, if this entity is an enemy.
    pub fn as_enemy(&self) -> Option<&EnemyAttributes> {
        match &self.attributes {
            EntityAttributes::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    /// Enemy attributes mutably, if this entity is an enemy.
    pub fn as_enemy_mut(&mut self) -> Option<&mut EnemyAttributes> {
        match &mut self.attributes {
            EntityAttributes::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    /// Catalog id of a collectible (item or relic).
    pub fn collectible_id(&self) -> Option<&str> {
        match &self.attributes {
            EntityAttributes::Item { item_id } => Some(item_id),
            EntityAttributes::Relic { relic_id } => Some(relic_id),
            _ => None,
        }
    }

    /// Non-enemies are always alive; enemies until their hp reaches zero.
    pub fn is_alive(&self) -> bool {
        self.as_enemy().map(EnemyAttributes::is_alive).unwrap_or(true)
    }

    /// Glyph used by the ASCII map dump.
    pub fn glyph(&self) -> char {
        match &self.attributes {
            EntityAttributes::Enemy(enemy) => enemy
                .archetype
                .chars()
                .next()
                .map(|c| c.to_ascii_lowercase())
                .unwrap_or('e'),
            EntityAttributes::Item { .. } => '!',
            EntityAttributes::Relic { .. } => '*',
            EntityAttributes::Npc { .. } => '&',
        }
    }
}
