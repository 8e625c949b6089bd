//! # Floor Generator
//!
//! Assembles a complete floor from a seed: carved path, walls, containers and
//! enemies, followed by the solvability gate.
//!
//! Random draws happen strictly in the order path, walls, containers,
//! enemies, so changing e.g. the enemy budget never reshapes the walls.

use crate::actors::ActorRegistry;
use crate::config::ENEMY_SPAWN_CLEARANCE;
use crate::game::{Floor, Position, TileKind};
use crate::generation::{
    carve_path, validate_floor, FloorConfig, FloorTemplate, Generator, GridBounds, Seed, SeededRng,
    ValidationReport,
};
use log::{debug, trace, warn};
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

/// Path-first floor generator.
///
/// Enemies are drawn from the given archetype registry.
#[derive(Debug, Clone, Copy)]
pub struct FloorGenerator<'a> {
    registry: &'a ActorRegistry,
}

impl FloorGenerator<'static> {
    /// Creates a generator using the built-in archetypes.
    pub fn new() -> Self {
        Self {
            registry: ActorRegistry::standard(),
        }
    }
}

impl Default for FloorGenerator<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> FloorGenerator<'a> {
    /// Creates a generator drawing enemies from a custom registry.
    pub fn with_registry(registry: &'a ActorRegistry) -> Self {
        Self { registry }
    }

    /// Walls the outer ring, leaving path cells open. Draws nothing.
    fn apply_border(&self, floor: &mut Floor, path: &HashSet<Position>) {
        let (w, h) = (floor.width as i32, floor.height as i32);
        let ring: Vec<Position> = floor
            .positions()
            .filter(|pos| pos.x == 0 || pos.y == 0 || pos.x == w - 1 || pos.y == h - 1)
            .filter(|pos| !path.contains(pos))
            .collect();

        for pos in ring {
            floor.set_tile(pos, TileKind::Wall);
        }
    }

    /// One draw per off-path floor tile, in row-major order.
    fn place_walls(
        &self,
        floor: &mut Floor,
        path: &HashSet<Position>,
        density: f64,
        rng: &mut SeededRng,
    ) -> usize {
        let candidates: Vec<Position> = floor
            .positions()
            .filter(|pos| !path.contains(pos))
            .filter(|pos| *pos != floor.entrance && *pos != floor.exit)
            .filter(|pos| floor.is_walkable(*pos))
            .collect();

        let mut placed = 0;
        for pos in candidates {
            if rng.chance(density) {
                floor.set_tile(pos, TileKind::Wall);
                placed += 1;
            }
        }
        placed
    }

    fn place_containers(
        &self,
        floor: &mut Floor,
        path: &HashSet<Position>,
        budget: u32,
        rng: &mut SeededRng,
    ) {
        let mut candidates: Vec<Position> = floor
            .positions()
            .filter(|pos| !path.contains(pos))
            .filter(|pos| floor.tile(*pos).map(|tile| tile.kind) == Some(TileKind::Floor))
            .collect();

        for _ in 0..budget {
            if candidates.is_empty() {
                debug!("Ran out of container cells on seed {}", floor.seed);
                break;
            }
            let pos = candidates.remove(rng.index(candidates.len()));
            floor.set_tile(pos, TileKind::Container);
        }
    }

    fn place_enemies(&self, floor: &mut Floor, budget: u32, rng: &mut SeededRng) {
        let entrance = floor.entrance;
        let exit = floor.exit;
        let mut candidates: Vec<Position> = floor
            .positions()
            .filter(|pos| floor.is_walkable(*pos))
            .filter(|pos| pos.manhattan_distance(entrance) >= ENEMY_SPAWN_CLEARANCE)
            .filter(|pos| *pos != exit)
            .filter(|pos| floor.tile(*pos).map(|tile| tile.kind) != Some(TileKind::Container))
            .filter(|pos| floor.entity_at(*pos).is_none())
            .collect();

        for n in 1..=budget {
            if candidates.is_empty() {
                debug!("Ran out of enemy cells on seed {} after {} spawns", floor.seed, n - 1);
                break;
            }
            let pos = candidates.remove(rng.index(candidates.len()));
            let archetype = self.registry.select(floor.floor_number, rng.next_f64());

            match self
                .registry
                .spawn(archetype, format!("enemy-{}", n), pos, floor.floor_number)
            {
                Ok(enemy) => {
                    trace!("Spawned {} ({}) at {}", enemy.id, archetype, pos);
                    floor.entities.push(enemy);
                }
                Err(e) => warn!("Skipping enemy spawn at {}: {}", pos, e),
            }
        }
    }
}

impl Generator<Floor> for FloorGenerator<'_> {
    fn generate(&self, seed: &Seed, config: &FloorConfig) -> Floor {
        let config = config.normalized();
        let entrance = config.resolved_entrance();
        let exit = config.resolved_exit();

        let mut floor =
            Floor::with_endpoints(config.width, config.height, seed.to_string(), entrance, exit);
        floor.floor_number = config.floor_number;
        let mut rng = SeededRng::create(seed.clone());

        let path = carve_path(
            entrance,
            exit,
            GridBounds::new(config.width, config.height),
            &mut rng,
            config.min_path_length as usize,
        );
        let path: HashSet<Position> = path.into_iter().collect();

        if config.template == Some(FloorTemplate::Bordered) {
            self.apply_border(&mut floor, &path);
        }
        let walls = self.place_walls(&mut floor, &path, config.wall_density, &mut rng);
        self.place_containers(&mut floor, &path, config.container_budget, &mut rng);
        self.place_enemies(&mut floor, config.enemy_budget, &mut rng);

        floor.generated_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64);

        let report = self.validate(&floor);
        if !report.solvable {
            warn!(
                "Floor from seed {} failed validation ({:?}); clearing walls",
                floor.seed, report.errors
            );
            floor.clear_walls();
        }

        debug!(
            "Generated floor {} from seed {}: {}x{}, {} path cells, {} random walls, {} entities",
            floor.floor_number,
            floor.seed,
            floor.width,
            floor.height,
            path.len(),
            walls,
            floor.entities.len()
        );
        floor
    }

    fn validate(&self, floor: &Floor) -> ValidationReport {
        validate_floor(floor)
    }

    fn generator_type(&self) -> &'static str {
        "FloorGenerator"
    }
}
