//! # Path Carving
//!
//! Biased random walk from the entrance to the exit that every generated
//! floor keeps free of walls.
//!
//! The walk is greedy: at each step the in-bounds neighbours are ranked by
//! Manhattan distance to the exit and one of the best few is taken, with an
//! occasional widened pool so paths meander. If the walk runs out of steps
//! the carver falls back to a straight L-shaped connector.

use crate::config::{DETOUR_CHANCE, PATH_CANDIDATE_POOL};
use crate::game::Position;
use crate::generation::SeededRng;
use log::{debug, trace};
use std::collections::HashSet;

/// Grid bounds the carver walks within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub width: u32,
    pub height: u32,
}

impl GridBounds {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    fn neighbours(&self, pos: Position) -> Vec<Position> {
        pos.cardinal_adjacent_positions()
            .into_iter()
            .filter(|next| self.contains(*next))
            .collect()
    }
}

/// Carves an ordered path from `entrance` to `exit`.
///
/// The result always starts at `entrance`, ends at `exit` and is never
/// empty. When it is shorter than `min_length` positions, out-and-back
/// detours are spliced in until it is long enough (or no detour fits).
///
/// # Examples
///
/// ```
/// use delve::{carve_path, GridBounds, Position, SeededRng};
///
/// let mut rng = SeededRng::create("path");
/// let entrance = Position::new(0, 5);
/// let exit = Position::new(7, 0);
/// let path = carve_path(entrance, exit, GridBounds::new(8, 6), &mut rng, 12);
/// assert_eq!(path.first(), Some(&entrance));
/// assert_eq!(path.last(), Some(&exit));
/// assert!(path.len() >= 12);
/// ```
pub fn carve_path(
    entrance: Position,
    exit: Position,
    bounds: GridBounds,
    rng: &mut SeededRng,
    min_length: usize,
) -> Vec<Position> {
    let mut path = match biased_walk(entrance, exit, bounds, rng) {
        Some(path) => path,
        None => {
            debug!(
                "Biased walk from {} to {} exhausted its step bound; using L connector",
                entrance, exit
            );
            l_connector(entrance, exit)
        }
    };

    if path.len() < min_length {
        add_detours(&mut path, bounds, rng, min_length);
    }

    path
}

/// Greedy biased walk. Returns `None` if the exit is not reached within the
/// step bound.
fn biased_walk(
    entrance: Position,
    exit: Position,
    bounds: GridBounds,
    rng: &mut SeededRng,
) -> Option<Vec<Position>> {
    let max_steps = 4 * bounds.width as usize * bounds.height as usize;
    let mut path = vec![entrance];
    let mut visited = HashSet::from([entrance]);
    let mut current = entrance;

    for _ in 0..max_steps {
        if current == exit {
            return Some(path);
        }

        let mut candidates = bounds.neighbours(current);
        if candidates.is_empty() {
            return None;
        }
        candidates.sort_by_key(|pos| pos.manhattan_distance(exit));

        let unvisited: Vec<Position> = candidates
            .iter()
            .copied()
            .filter(|pos| !visited.contains(pos))
            .collect();
        let ranked = if unvisited.is_empty() {
            candidates
        } else {
            unvisited
        };

        let pool = if rng.chance(DETOUR_CHANCE) {
            ranked.len()
        } else {
            PATH_CANDIDATE_POOL.min(ranked.len())
        };
        let next = ranked[rng.index(pool)];

        trace!("Path step {} -> {}", current, next);
        path.push(next);
        visited.insert(next);
        current = next;
    }

    (current == exit).then_some(path)
}

/// Straight connector: horizontal along the entrance row, then vertical
/// along the exit column.
pub fn l_connector(entrance: Position, exit: Position) -> Vec<Position> {
    let mut path = vec![entrance];
    let mut current = entrance;

    let step_x = (exit.x - entrance.x).signum();
    while current.x != exit.x {
        current = Position::new(current.x + step_x, current.y);
        path.push(current);
    }

    let step_y = (exit.y - entrance.y).signum();
    while current.y != exit.y {
        current = Position::new(current.x, current.y + step_y);
        path.push(current);
    }

    path
}

/// Splices single-step out-and-back detours into the path until it reaches
/// `min_length` positions.
fn add_detours(path: &mut Vec<Position>, bounds: GridBounds, rng: &mut SeededRng, min_length: usize) {
    let mut carved: HashSet<Position> = path.iter().copied().collect();
    let area = bounds.width as usize * bounds.height as usize;
    let max_attempts = min_length.min(area).saturating_mul(8).saturating_add(16);

    for _ in 0..max_attempts {
        if path.len() >= min_length {
            return;
        }
        // Every cell is carved, so no anchor has a free neighbour left.
        if carved.len() >= area {
            break;
        }

        let anchor_index = rng.index(path.len());
        let anchor = path[anchor_index];
        let options: Vec<Position> = bounds
            .neighbours(anchor)
            .into_iter()
            .filter(|pos| !carved.contains(pos))
            .collect();

        if let Some(&detour) = rng.pick(&options) {
            path.insert(anchor_index + 1, detour);
            path.insert(anchor_index + 2, anchor);
            carved.insert(detour);
        }
    }

    if path.len() < min_length {
        debug!(
            "Path stopped at {} positions; no room for further detours (wanted {})",
            path.len(),
            min_length
        );
    }
}
