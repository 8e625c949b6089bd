//! # Pathfinding Algorithms
//!
//! Breadth-first searches over a floor's walkable tiles.

use crate::game::{Floor, Position};
use ::pathfinding::prelude::{bfs, bfs_reach};
use std::collections::HashSet;

/// Walkable orthogonal neighbours of a position.
fn walkable_neighbours(floor: &Floor, pos: Position) -> impl Iterator<Item = Position> + '_ {
    pos.cardinal_adjacent_positions()
        .into_iter()
        .filter(move |next| floor.is_walkable(*next))
}

/// Every position reachable from `start` over walkable tiles.
///
/// Includes `start` itself, even when it is not walkable.
pub fn reachable_from(floor: &Floor, start: Position) -> HashSet<Position> {
    bfs_reach(start, |pos| walkable_neighbours(floor, *pos).collect::<Vec<_>>()).collect()
}

/// Shortest walkable route from `from` to `to`, both ends included.
///
/// Entities are not obstacles here; callers decide what to do about them.
pub fn shortest_path(floor: &Floor, from: Position, to: Position) -> Option<Vec<Position>> {
    bfs(
        &from,
        |pos| walkable_neighbours(floor, *pos).collect::<Vec<_>>(),
        |pos| *pos == to,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::TileKind;

    #[test]
    fn test_reachability_stops_at_walls() {
        let mut floor = Floor::new(5, 3, "walls");
        for y in 0..3 {
            floor.set_tile(Position::new(2, y), TileKind::Wall);
        }

        let reachable = reachable_from(&floor, Position::new(0, 2));
        assert!(reachable.contains(&Position::new(1, 0)));
        assert!(!reachable.contains(&Position::new(3, 1)));
        assert_eq!(reachable.len(), 6);
    }

    #[test]
    fn test_shortest_path_on_open_floor() {
        let floor = Floor::new(4, 4, "open");
        let path = shortest_path(&floor, Position::new(0, 3), Position::new(3, 0)).unwrap();
        assert_eq!(path.first(), Some(&Position::new(0, 3)));
        assert_eq!(path.last(), Some(&Position::new(3, 0)));
        assert_eq!(path.len(), 7);
    }

    #[test]
    fn test_no_path_through_wall_line() {
        let mut floor = Floor::new(3, 3, "blocked");
        for y in 0..3 {
            floor.set_tile(Position::new(1, y), TileKind::Wall);
        }
        assert!(shortest_path(&floor, Position::new(0, 2), Position::new(2, 0)).is_none());
    }
}
