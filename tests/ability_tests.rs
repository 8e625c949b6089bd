//! Integration tests for player abilities and effective stats.

use delve::config::MIN_DAMAGE;
use delve::{
    cast_ability, effective_stats, AbilityId, ActorRegistry, CastFailure, Direction, Floor,
    Interaction, ItemDefinition, PlayerStats, Position, SeededRng, StatBonus, StaticCatalog,
    TileKind,
};

fn spawn(floor: &mut Floor, archetype: &str, id: &str, pos: Position) {
    let enemy = ActorRegistry::standard()
        .spawn(archetype, id, pos, 1)
        .unwrap();
    floor.entities.push(enemy);
}

fn wand_catalog() -> StaticCatalog {
    StaticCatalog::from_definitions([ItemDefinition {
        id: "ember-wand".to_string(),
        name: "Ember Wand".to_string(),
        bonus: StatBonus {
            spell_damage: 6,
            ..StatBonus::default()
        },
    }])
}

#[test]
fn test_held_items_boost_bolt_damage() {
    let mut floor = Floor::new(6, 6, "wand");
    spawn(&mut floor, "skeleton", "sk", Position::new(0, 1));
    let mut player = PlayerStats::new(Position::new(0, 5));
    player.held_items.push("ember-wand".to_string());
    player.held_items.push("unknown-trinket".to_string());

    let stats = effective_stats(&player, &wand_catalog());
    assert_eq!(stats.spell_damage, 16);

    let mut rng = SeededRng::create("wand");
    let result = cast_ability(AbilityId::Bolt, &floor, player.position, Direction::North, &stats, &mut rng);
    assert_eq!(result.damage_by_target(), vec![("sk".to_string(), 14)]);
}

#[test]
fn test_bolt_passes_over_items() {
    let mut floor = Floor::new(6, 1, "items");
    floor
        .entities
        .push(delve::Entity::item("loot", Position::new(1, 0), "iron-ring"));
    spawn(&mut floor, "rat", "rat", Position::new(3, 0));
    let origin = Position::new(0, 0);
    let stats = effective_stats(&PlayerStats::new(origin), &StaticCatalog::new());
    let mut rng = SeededRng::create("items");

    let result = cast_ability(AbilityId::Bolt, &floor, origin, Direction::East, &stats, &mut rng);
    assert_eq!(result.hits.len(), 1);
    assert_eq!(result.entities.len(), 1);
    assert_eq!(result.entities[0].id, "loot");
}

#[test]
fn test_bolt_stops_at_wall_even_with_enemy_behind() {
    let mut floor = Floor::new(1, 6, "column");
    floor.set_tile(Position::new(0, 2), TileKind::Wall);
    spawn(&mut floor, "rat", "hidden", Position::new(0, 0));
    let origin = Position::new(0, 5);
    let stats = effective_stats(&PlayerStats::new(origin), &StaticCatalog::new());
    let mut rng = SeededRng::create("column");

    let result = cast_ability(AbilityId::Bolt, &floor, origin, Direction::North, &stats, &mut rng);
    assert!(result.did_cast);
    assert!(result.hits.is_empty());
    assert_eq!(result.mana_spent, 4);
    assert_eq!(result.entities, floor.entities);
}

#[test]
fn test_wall_one_step_ahead_shields_enemy_two_steps_ahead() {
    let mut floor = Floor::new(5, 5, "shielded");
    let origin = Position::new(2, 4);
    floor.set_tile(Position::new(2, 3), TileKind::Wall);
    spawn(&mut floor, "skeleton", "ahead", Position::new(2, 2));
    let stats = effective_stats(&PlayerStats::new(origin), &StaticCatalog::new());
    let mut rng = SeededRng::create("shielded");

    let result = cast_ability(AbilityId::Bolt, &floor, origin, Direction::North, &stats, &mut rng);
    assert!(result.did_cast);
    assert!(result.damage_by_target().is_empty());
    assert!(result.removed.is_empty());
    assert_eq!(result.entities, floor.entities);
}

#[test]
fn test_shockwave_hits_distances_one_and_two_but_not_six() {
    let mut floor = Floor::new(10, 10, "rings");
    let center = Position::new(2, 2);
    spawn(&mut floor, "skeleton", "one", Position::new(2, 1));
    spawn(&mut floor, "skeleton", "two", Position::new(3, 3));
    spawn(&mut floor, "skeleton", "six", Position::new(5, 5));
    let stats = effective_stats(&PlayerStats::new(center), &StaticCatalog::new());
    let mut rng = SeededRng::create("rings");

    let result = cast_ability(AbilityId::Shockwave, &floor, center, Direction::North, &stats, &mut rng);
    let hit: Vec<String> = result.damage_by_target().into_iter().map(|(id, _)| id).collect();
    assert_eq!(hit, vec!["one", "two"]);
    let untouched = result.entities.iter().find(|e| e.id == "six").unwrap();
    assert_eq!(untouched.as_enemy(), floor.entity("six").unwrap().as_enemy());
}

#[test]
fn test_shockwave_hits_each_target_independently() {
    let mut floor = Floor::new(7, 7, "independent");
    let center = Position::new(3, 3);
    spawn(&mut floor, "rat", "weak", Position::new(3, 2));
    spawn(&mut floor, "sentinel", "tough", Position::new(2, 3));
    floor.entity_mut("tough").unwrap().as_enemy_mut().unwrap().armor = 40;
    let stats = effective_stats(&PlayerStats::new(center), &StaticCatalog::new());
    let mut rng = SeededRng::create("independent");

    let result = cast_ability(AbilityId::Shockwave, &floor, center, Direction::North, &stats, &mut rng);
    assert_eq!(
        result.damage_by_target(),
        vec![("weak".to_string(), 10), ("tough".to_string(), MIN_DAMAGE)]
    );
    assert_eq!(result.removed, vec!["weak".to_string()]);
    assert!(matches!(
        result.interaction,
        Some(Interaction::Shockwave { center: c, radius: 2 }) if c == center
    ));
}

#[test]
fn test_teleport_is_deterministic_per_seed() {
    let floor = Floor::new(8, 8, "blink");
    let origin = Position::new(0, 7);
    let stats = effective_stats(&PlayerStats::new(origin), &StaticCatalog::new());

    let mut a = SeededRng::create("same-seed");
    let mut b = SeededRng::create("same-seed");
    let first = cast_ability(AbilityId::Teleport, &floor, origin, Direction::North, &stats, &mut a);
    let second = cast_ability(AbilityId::Teleport, &floor, origin, Direction::North, &stats, &mut b);

    assert!(first.did_cast);
    assert_eq!(first.new_position, second.new_position);
    let landing = first.new_position.unwrap();
    assert_ne!(landing, origin);
    assert!(floor.is_walkable(landing));
}

#[test]
fn test_teleport_on_single_cell_floor_fails() {
    let floor = Floor::new(1, 1, "closet");
    let origin = Position::new(0, 0);
    let stats = effective_stats(&PlayerStats::new(origin), &StaticCatalog::new());
    let mut rng = SeededRng::create("closet");

    let result = cast_ability(AbilityId::Teleport, &floor, origin, Direction::North, &stats, &mut rng);
    assert!(!result.did_cast);
    assert_eq!(result.failure, Some(CastFailure::NoValidTarget));
    assert_eq!(result.mana_spent, 0);
}

#[test]
fn test_exact_mana_is_enough() {
    let floor = Floor::new(4, 4, "exact");
    let origin = Position::new(0, 3);
    let mut stats = effective_stats(&PlayerStats::new(origin), &StaticCatalog::new());
    stats.mana = 5;
    let mut rng = SeededRng::create("exact");

    let teleport = cast_ability(AbilityId::Teleport, &floor, origin, Direction::North, &stats, &mut rng);
    assert!(teleport.did_cast);

    stats.mana = 3;
    let bolt = cast_ability(AbilityId::Bolt, &floor, origin, Direction::North, &stats, &mut rng);
    assert!(!bolt.did_cast);
    assert_eq!(bolt.mana_spent, 0);
}
