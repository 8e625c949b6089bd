//! # World Representation
//!
//! Floors, tiles and the grid operations the rest of the core relies on.

use crate::game::{Entity, EntityId, Position};
use serde::{Deserialize, Serialize};

/// What occupies a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    Floor,
    Wall,
    Entrance,
    Exit,
    Trap,
    Container,
    Door,
    Hazard,
}

impl TileKind {
    /// Whether a tile of this kind can be stood on.
    ///
    /// Walls are the only obstruction; traps, hazards and the exit are
    /// walkable triggers.
    pub fn is_walkable(self) -> bool {
        !matches!(self, TileKind::Wall)
    }

    /// Glyph used by the ASCII map dump.
    pub fn glyph(self) -> char {
        match self {
            TileKind::Floor => '.',
            TileKind::Wall => '#',
            TileKind::Entrance => '<',
            TileKind::Exit => '>',
            TileKind::Trap => '^',
            TileKind::Container => '=',
            TileKind::Door => '+',
            TileKind::Hazard => '~',
        }
    }
}

/// One cell of a floor.
///
/// `walkable` is always derived from `kind`; construct tiles through
/// [`Tile::new`] so the two never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub walkable: bool,
}

impl Tile {
    /// Creates a tile of the given kind.
    pub fn new(kind: TileKind) -> Self {
        Self {
            kind,
            walkable: kind.is_walkable(),
        }
    }

    /// Creates a plain floor tile.
    pub fn floor() -> Self {
        Self::new(TileKind::Floor)
    }

    /// Creates a wall tile.
    pub fn wall() -> Self {
        Self::new(TileKind::Wall)
    }
}

/// A complete dungeon floor: grid, entities and the entrance/exit pair.
///
/// The entity list is ordered and that order is the enemy turn order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    /// Seed string the floor was generated from
    pub seed: String,
    /// Depth of this floor, starting at 1
    pub floor_number: u32,
    /// Row-major tile array
    pub tiles: Vec<Tile>,
    /// Entities on this floor, in turn order
    pub entities: Vec<Entity>,
    /// Where the player arrives
    pub entrance: Position,
    /// Where the player leaves
    pub exit: Position,
    /// Wall-clock generation time in milliseconds since the Unix epoch
    pub generated_at: u64,
    /// Generator version tag
    pub version: String,
}

impl Floor {
    /// Creates an open floor of the given size with no entities.
    ///
    /// The entrance is placed in the bottom-left corner and the exit in the
    /// top-right corner.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Floor, Position, TileKind};
    ///
    /// let floor = Floor::new(5, 4, "demo");
    /// assert_eq!(floor.tiles.len(), 20);
    /// assert_eq!(floor.tile(Position::new(0, 3)).unwrap().kind, TileKind::Entrance);
    /// assert_eq!(floor.tile(Position::new(4, 0)).unwrap().kind, TileKind::Exit);
    /// ```
    pub fn new(width: u32, height: u32, seed: impl Into<String>) -> Self {
        let entrance = Position::new(0, height as i32 - 1);
        let exit = Position::new(width as i32 - 1, 0);
        Self::with_endpoints(width, height, seed, entrance, exit)
    }

    /// Creates an open floor with an explicit entrance and exit.
    ///
    /// If the two coincide the cell is marked as the entrance.
    pub fn with_endpoints(
        width: u32,
        height: u32,
        seed: impl Into<String>,
        entrance: Position,
        exit: Position,
    ) -> Self {
        let mut floor = Self {
            width,
            height,
            seed: seed.into(),
            floor_number: 1,
            tiles: vec![Tile::floor(); (width * height) as usize],
            entities: Vec::new(),
            entrance,
            exit,
            generated_at: 0,
            version: crate::config::GENERATOR_VERSION.to_string(),
        };

        floor.set_tile(exit, TileKind::Exit);
        floor.set_tile(entrance, TileKind::Entrance);
        floor
    }

    /// Checks whether a position lies on the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Row-major index of a position, if it is on the grid.
    pub fn index_of(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Position of a row-major index.
    pub fn position_of(&self, index: usize) -> Position {
        let width = self.width as usize;
        Position::new((index % width) as i32, (index / width) as i32)
    }

    /// Gets the tile at a position.
    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        self.index_of(pos).map(|index| &self.tiles[index])
    }

    /// Replaces the tile at a position.
    ///
    /// Returns false when the position is off the grid.
    pub fn set_tile(&mut self, pos: Position, kind: TileKind) -> bool {
        match self.index_of(pos) {
            Some(index) => {
                self.tiles[index] = Tile::new(kind);
                true
            }
            None => false,
        }
    }

    /// Whether the tile at a position exists and can be stood on.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tile(pos).map(|tile| tile.walkable).unwrap_or(false)
    }

    /// Iterates over every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.tiles.len()).map(move |index| self.position_of(index))
    }

    /// Every walkable position in row-major order.
    pub fn walkable_positions(&self) -> Vec<Position> {
        self.positions().filter(|pos| self.is_walkable(*pos)).collect()
    }

    /// Gets the first entity standing at a position.
    pub fn entity_at(&self, pos: Position) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.position == pos)
    }

    /// Gets an entity by id.
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    /// Gets an entity by id mutably.
    pub fn entity_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    /// Removes an entity by id, returning it if it was present.
    pub fn remove_entity(&mut self, id: &str) -> Option<Entity> {
        let index = self.entities.iter().position(|entity| entity.id == id)?;
        Some(self.entities.remove(index))
    }

    /// Ids of every enemy on the floor, in turn order.
    pub fn enemy_ids(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|entity| entity.is_enemy())
            .map(|entity| entity.id.clone())
            .collect()
    }

    /// Removes every enemy whose hit points have reached zero.
    ///
    /// Returns the ids removed, in the order they appeared.
    pub fn remove_dead(&mut self) -> Vec<EntityId> {
        let dead: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|entity| !entity.is_alive())
            .map(|entity| entity.id.clone())
            .collect();
        self.entities.retain(|entity| entity.is_alive());
        dead
    }

    /// Clears every wall, leaving an open floor.
    pub fn clear_walls(&mut self) {
        for tile in self.tiles.iter_mut() {
            if tile.kind == TileKind::Wall {
                *tile = Tile::floor();
            }
        }
    }

    /// Renders the floor as ASCII, one line per row.
    ///
    /// Entities are drawn over tiles; `player` (if given) is drawn as `@`.
    pub fn to_ascii(&self, player: Option<Position>) -> String {
        let mut out = String::with_capacity(self.tiles.len() + self.height as usize);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let pos = Position::new(x, y);
                let glyph = if Some(pos) == player {
                    '@'
                } else if let Some(entity) = self.entity_at(pos) {
                    entity.glyph()
                } else {
                    self.tile(pos).map(|tile| tile.kind.glyph()).unwrap_or(' ')
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walkability_follows_kind() {
        assert!(!Tile::wall().walkable);
        for kind in [
            TileKind::Floor,
            TileKind::Entrance,
            TileKind::Exit,
            TileKind::Trap,
            TileKind::Container,
            TileKind::Door,
            TileKind::Hazard,
        ] {
            assert!(Tile::new(kind).walkable, "{:?} should be walkable", kind);
        }
    }

    #[test]
    fn test_floor_bounds_and_indexing() {
        let floor = Floor::new(4, 3, "bounds");
        assert!(floor.in_bounds(Position::new(3, 2)));
        assert!(!floor.in_bounds(Position::new(4, 0)));
        assert!(!floor.in_bounds(Position::new(0, -1)));
        assert_eq!(floor.index_of(Position::new(1, 2)), Some(9));
        assert_eq!(floor.position_of(9), Position::new(1, 2));
        assert!(floor.tile(Position::new(-1, 0)).is_none());
    }

    #[test]
    fn test_set_tile_updates_walkability() {
        let mut floor = Floor::new(3, 3, "tiles");
        let pos = Position::new(1, 1);
        assert!(floor.is_walkable(pos));
        assert!(floor.set_tile(pos, TileKind::Wall));
        assert!(!floor.is_walkable(pos));
        assert!(!floor.set_tile(Position::new(9, 9), TileKind::Wall));

        floor.clear_walls();
        assert!(floor.is_walkable(pos));
    }

    #[test]
    fn test_ascii_dump() {
        let mut floor = Floor::new(3, 2, "ascii");
        floor.set_tile(Position::new(1, 0), TileKind::Wall);
        let dump = floor.to_ascii(Some(Position::new(1, 1)));
        assert_eq!(dump, ".#>\n<@.\n");
    }
}
