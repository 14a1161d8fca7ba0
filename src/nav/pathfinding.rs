//! Bounded A* pathfinding on the tile grid
//!
//! Four-neighbour moves, unit cost, Manhattan heuristic. The node budget caps
//! how many nodes are popped, so a search across a wide cavern can't stall a turn.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::Coord;
use crate::nav::walkability::Walkability;

/// Default node budget for general searches
pub const DEFAULT_NODE_BUDGET: usize = 2000;

/// Node in the A* open set
#[derive(Debug, Clone, Copy)]
struct PathNode {
    coord: Coord,
    f_cost: i32, // g_cost + heuristic
    seq: u64,    // insertion order, breaks f ties
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost && self.seq == other.seq
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; earlier insertions first on ties
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a path from `start` to `goal`
///
/// The result excludes `start` and ends with `goal`. It is empty when the
/// goal is unreachable, when `start == goal`, or when `node_budget` pops
/// pass without reaching the goal. The goal itself is always enterable.
pub fn find_path<W: Walkability + ?Sized>(
    width: i32,
    height: i32,
    start: Coord,
    goal: Coord,
    walkable: &W,
    node_budget: usize,
) -> Vec<Coord> {
    if start == goal {
        return Vec::new();
    }

    let in_bounds = |c: Coord| c.x >= 0 && c.y >= 0 && c.x < width && c.y < height;
    if !in_bounds(start) || !in_bounds(goal) {
        return Vec::new();
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<Coord, Coord> = AHashMap::new();
    let mut g_scores: AHashMap<Coord, i32> = AHashMap::new();
    let mut seq = 0u64;
    let mut popped = 0usize;

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        coord: start,
        f_cost: start.manhattan(&goal),
        seq,
    });

    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            return reconstruct_path(&came_from, start, goal);
        }

        popped += 1;
        if popped >= node_budget {
            tracing::debug!(%start, %goal, node_budget, "path search exhausted its budget");
            return Vec::new();
        }

        let current_g = g_scores.get(&current.coord).copied().unwrap_or(i32::MAX);
        // Stale heap entry
        if current.f_cost > current_g.saturating_add(current.coord.manhattan(&goal)) {
            continue;
        }

        for neighbor in current.coord.neighbors4() {
            if !in_bounds(neighbor) {
                continue;
            }
            if neighbor != goal && !walkable.is_walkable(neighbor) {
                continue;
            }

            let tentative_g = current_g + 1;
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(i32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);

                seq += 1;
                open_set.push(PathNode {
                    coord: neighbor,
                    f_cost: tentative_g + neighbor.manhattan(&goal),
                    seq,
                });
            }
        }
    }

    Vec::new() // No path found
}

/// Walk `came_from` back from the goal, dropping the start tile
fn reconstruct_path(came_from: &AHashMap<Coord, Coord>, start: Coord, goal: Coord) -> Vec<Coord> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        if prev == start {
            break;
        }
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// A single path request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathQuery {
    pub start: Coord,
    pub goal: Coord,
    pub node_budget: usize,
}

impl PathQuery {
    pub fn new(start: Coord, goal: Coord) -> Self {
        Self {
            start,
            goal,
            node_budget: DEFAULT_NODE_BUDGET,
        }
    }

    pub fn with_budget(mut self, node_budget: usize) -> Self {
        self.node_budget = node_budget;
        self
    }

    pub fn run<W: Walkability + ?Sized>(&self, width: i32, height: i32, walkable: &W) -> Vec<Coord> {
        find_path(width, height, self.start, self.goal, walkable, self.node_budget)
    }
}
