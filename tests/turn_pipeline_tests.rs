//! Integration tests for the full turn pipeline.

use delve::{
    generate_floor, play_turn, shortest_path, AbilityId, ActorRegistry, AttackKind, Direction,
    Floor, FloorConfig, PlayerAction, PlayerStats, Position, SeededRng, StaticCatalog, TurnEvent,
};

fn spawn(floor: &mut Floor, archetype: &str, id: &str, pos: Position) {
    let enemy = ActorRegistry::standard()
        .spawn(archetype, id, pos, 1)
        .unwrap();
    floor.entities.push(enemy);
}

fn step_toward_exit(floor: &Floor, player: &PlayerStats) -> PlayerAction {
    shortest_path(floor, player.position, floor.exit)
        .and_then(|route| route.get(1).copied())
        .and_then(|next| Direction::from_delta(next - player.position).ok())
        .map_or(PlayerAction::Wait, |direction| PlayerAction::Move { direction })
}

/// Plays a scripted run and returns the event log of every turn.
fn scripted_run(seed: &str, turns: u64) -> Vec<Vec<TurnEvent>> {
    let config = FloorConfig::new(2);
    let mut floor = generate_floor(seed, &config);
    let mut player = PlayerStats::new(floor.entrance);
    let mut rng = SeededRng::create(format!("{}/turns", seed));
    let catalog = StaticCatalog::new();
    let mut log = Vec::new();

    for turn in 1..=turns {
        let action = step_toward_exit(&floor, &player);
        let report = play_turn(floor, &player, action, turn, &mut rng, &catalog);
        log.push(report.events);
        floor = report.floor;
        player = report.player;
        if report.player_died || report.reached_exit {
            break;
        }
    }
    log
}

#[test]
fn test_scripted_runs_replay_identically() {
    for seed in ["alpha", "beta", "gamma"] {
        assert_eq!(scripted_run(seed, 40), scripted_run(seed, 40));
    }
}

#[test]
fn test_enemy_killed_by_spell_does_not_attack() {
    let mut floor = Floor::new(6, 6, "spell-first");
    spawn(&mut floor, "rat", "rat-1", Position::new(2, 4));
    let player = PlayerStats::new(Position::new(2, 5));
    let mut rng = SeededRng::create("spell-first");

    let report = play_turn(
        floor,
        &player,
        PlayerAction::Cast {
            ability: AbilityId::Bolt,
            facing: Direction::North,
        },
        1,
        &mut rng,
        &StaticCatalog::new(),
    );

    assert_eq!(report.player.mana, player.mana - 4);
    assert_eq!(report.player.hp, player.hp);
    assert!(report.floor.entities.is_empty());
    assert!(!report
        .events
        .iter()
        .any(|event| matches!(event, TurnEvent::EnemyAttack { .. })));
}

#[test]
fn test_enemy_attacks_resolve_in_entity_order() {
    let mut floor = Floor::new(7, 7, "order");
    spawn(&mut floor, "rat", "west", Position::new(2, 3));
    spawn(&mut floor, "skeleton", "east", Position::new(4, 3));
    let player = PlayerStats::new(Position::new(3, 3));
    let mut rng = SeededRng::create("order");

    let report = play_turn(floor, &player, PlayerAction::Wait, 1, &mut rng, &StaticCatalog::new());

    let attackers: Vec<String> = report
        .events
        .iter()
        .filter_map(|event| match event {
            TurnEvent::EnemyAttack { kind, hit } => {
                assert_eq!(*kind, AttackKind::Melee);
                match &hit.attacker {
                    delve::Combatant::Entity(id) => Some(id.clone()),
                    delve::Combatant::Player => None,
                }
            }
            _ => None,
        })
        .collect();
    assert_eq!(attackers, vec!["west", "east"]);
    // rat: max(5, 4 - 1) = 5, skeleton: 6 - 1 = 5
    assert_eq!(report.player.hp, player.hp - 10);
    assert_eq!(report.aggro.unwrap().enemies, vec!["west", "east"]);
}

#[test]
fn test_enemy_spell_ignores_armor() {
    let mut floor = Floor::new(10, 10, "armor");
    spawn(&mut floor, "warlock", "w", Position::new(9, 0));
    floor.entity_mut("w").unwrap().as_enemy_mut().unwrap().hp -= 1;
    let mut player = PlayerStats::new(Position::new(0, 9));
    player.armor = 30;
    let mut rng = SeededRng::create("armor");

    let report = play_turn(floor, &player, PlayerAction::Wait, 4, &mut rng, &StaticCatalog::new());
    let hit = report
        .events
        .iter()
        .find_map(|event| match event {
            TurnEvent::EnemyAbility { hit, .. } => Some(hit.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(hit.amount, 10);
    assert_eq!(report.player.hp, player.hp - 10);
}

#[test]
fn test_player_death_stops_further_damage() {
    let mut floor = Floor::new(7, 7, "death");
    spawn(&mut floor, "skeleton", "a", Position::new(2, 3));
    spawn(&mut floor, "skeleton", "b", Position::new(4, 3));
    let mut player = PlayerStats::new(Position::new(3, 3));
    player.hp = 4;
    let mut rng = SeededRng::create("death");

    let report = play_turn(floor, &player, PlayerAction::Wait, 1, &mut rng, &StaticCatalog::new());
    assert!(report.player_died);
    let enemy_hits = report
        .events
        .iter()
        .filter(|event| matches!(event, TurnEvent::EnemyAttack { .. }))
        .count();
    assert_eq!(enemy_hits, 1);
    assert_eq!(report.events.last(), Some(&TurnEvent::PlayerDied));
}

#[test]
fn test_teleport_moves_player_before_enemies_act() {
    let mut floor = Floor::new(3, 3, "escape");
    spawn(&mut floor, "rat", "rat-1", Position::new(1, 0));
    let player = PlayerStats::new(Position::new(0, 0));
    let mut rng = SeededRng::create("escape");

    let report = play_turn(
        floor,
        &player,
        PlayerAction::Cast {
            ability: AbilityId::Teleport,
            facing: Direction::North,
        },
        1,
        &mut rng,
        &StaticCatalog::new(),
    );
    assert_ne!(report.player.position, player.position);
    assert_eq!(report.player.mana, player.mana - 5);
    assert!(report
        .events
        .iter()
        .any(|event| matches!(event, TurnEvent::Teleported { .. })));
}
