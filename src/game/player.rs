//! # Player Model
//!
//! The player's combat-relevant attributes and the read-only item catalog
//! consulted for passive bonuses.
//!
//! The core never mutates a player in place; turn resolution returns an
//! updated copy.

use crate::game::Position;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Additive stat bonus granted by holding an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBonus {
    #[serde(default)]
    pub max_hp: i32,
    #[serde(default)]
    pub max_mana: i32,
    #[serde(default)]
    pub weapon_damage: i32,
    #[serde(default)]
    pub spell_damage: i32,
    #[serde(default)]
    pub armor: i32,
}

impl StatBonus {
    fn accumulate(&mut self, other: &StatBonus) {
        self.max_hp += other.max_hp;
        self.max_mana += other.max_mana;
        self.weapon_damage += other.weapon_damage;
        self.spell_damage += other.spell_damage;
        self.armor += other.armor;
    }
}

/// Catalog entry for an item or relic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bonus: StatBonus,
}

/// Read-only lookup of item definitions by id.
///
/// Loading the catalog is the caller's concern; the core only reads
/// passive bonuses through this trait.
pub trait ItemCatalog {
    fn lookup(&self, id: &str) -> Option<&ItemDefinition>;
}

/// `HashMap`-backed catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticCatalog {
    items: HashMap<String, ItemDefinition>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a definition.
    pub fn insert(&mut self, definition: ItemDefinition) {
        self.items.insert(definition.id.clone(), definition);
    }

    /// Builds a catalog from a list of definitions.
    pub fn from_definitions(definitions: impl IntoIterator<Item = ItemDefinition>) -> Self {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.insert(definition);
        }
        catalog
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ItemCatalog for StaticCatalog {
    fn lookup(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }
}

/// The player's base combat attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub position: Position,
    pub hp: i32,
    pub max_hp: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub weapon_damage: u32,
    pub spell_damage: u32,
    pub armor: u32,
    /// Catalog ids of held passive items, in pickup order
    pub held_items: Vec<String>,
}

impl PlayerStats {
    /// Creates a player with starting attributes at a position.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{PlayerStats, Position};
    ///
    /// let player = PlayerStats::new(Position::new(0, 9));
    /// assert!(player.is_alive());
    /// assert_eq!(player.hp, player.max_hp);
    /// ```
    pub fn new(position: Position) -> Self {
        Self {
            position,
            hp: 40,
            max_hp: 40,
            mana: 20,
            max_mana: 20,
            weapon_damage: 8,
            spell_damage: 10,
            armor: 1,
            held_items: Vec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

/// Base stats plus every passive bonus from held items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveStats {
    pub position: Position,
    pub hp: i32,
    pub max_hp: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub weapon_damage: u32,
    pub spell_damage: u32,
    pub armor: u32,
}

fn apply_bonus(base: u32, bonus: i32) -> u32 {
    (base as i64 + bonus as i64).max(0) as u32
}

/// Folds the passive bonuses of every held item into the base stats.
///
/// Ids the catalog does not know contribute nothing.
pub fn effective_stats(player: &PlayerStats, catalog: &dyn ItemCatalog) -> EffectiveStats {
    let mut total = StatBonus::default();
    for id in &player.held_items {
        match catalog.lookup(id) {
            Some(definition) => total.accumulate(&definition.bonus),
            None => debug!("Held item {} is not in the catalog; ignoring", id),
        }
    }

    EffectiveStats {
        position: player.position,
        hp: player.hp,
        max_hp: player.max_hp + total.max_hp,
        mana: player.mana,
        max_mana: player.max_mana + total.max_mana,
        weapon_damage: apply_bonus(player.weapon_damage, total.weapon_damage),
        spell_damage: apply_bonus(player.spell_damage, total.spell_damage),
        armor: apply_bonus(player.armor, total.armor),
    }
}
