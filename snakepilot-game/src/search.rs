//! Best-first shortest-path search over a set of traversable cells.
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use thiserror::Error;

use crate::geometry::{Cell, CellSet, Direction};

/// Destination cannot be reached from the source within the traversable set.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("no path from {from} to {to}")]
pub struct PathNotFound {
    pub from: Cell,
    pub to: Cell,
}

/// Arena node; steps are recovered by following `parent` links.
#[derive(Debug, Clone, Copy)]
struct SearchNode {
    cell: Cell,
    parent: Option<usize>,
    arrived_by: Option<Direction>,
    depth: usize,
}

/// Frontier entry ordered so that `BinaryHeap` pops the lowest priority
/// first and, among equal priorities, the entry pushed earliest.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    priority: f64,
    sequence: u64,
    node: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Find a short path from `source` to `destination`.
///
/// `traversable` must contain `destination`; it need not contain `source`.
/// Priority is steps taken plus the Euclidean distance to `destination`, and
/// neighbours are expanded in [`Direction::ALL`] order, so equal-cost
/// alternatives resolve identically on every run.
///
/// # Errors
///
/// Returns [`PathNotFound`] when the frontier empties before reaching
/// `destination`.
pub fn find_path(
    source: Cell,
    destination: Cell,
    traversable: &CellSet,
) -> Result<Vec<Direction>, PathNotFound> {
    let mut nodes = vec![SearchNode {
        cell: source,
        parent: None,
        arrived_by: None,
        depth: 0,
    }];
    let mut frontier = BinaryHeap::new();
    let mut sequence = 0_u64;
    frontier.push(Frontier {
        priority: 0.0,
        sequence,
        node: 0,
    });
    let mut visited: HashSet<Cell> = HashSet::new();

    while let Some(entry) = frontier.pop() {
        let current = nodes[entry.node];
        if current.cell == destination {
            return Ok(unwind(&nodes, entry.node));
        }

        // The source pops with an empty path and is always expanded.
        if current.depth > 0 && visited.contains(&current.cell) {
            continue;
        }
        visited.insert(current.cell);

        for direction in Direction::ALL {
            let next = current.cell + direction;
            if !traversable.contains(&next) {
                continue;
            }
            let depth = current.depth + 1;
            nodes.push(SearchNode {
                cell: next,
                parent: Some(entry.node),
                arrived_by: Some(direction),
                depth,
            });
            sequence += 1;
            #[allow(clippy::cast_precision_loss)]
            let steps = depth as f64;
            frontier.push(Frontier {
                priority: steps + next.euclid(destination),
                sequence,
                node: nodes.len() - 1,
            });
        }
    }

    Err(PathNotFound {
        from: source,
        to: destination,
    })
}

fn unwind(nodes: &[SearchNode], mut index: usize) -> Vec<Direction> {
    let mut steps = Vec::with_capacity(nodes[index].depth);
    while let Some(direction) = nodes[index].arrived_by {
        steps.push(direction);
        match nodes[index].parent {
            Some(parent) => index = parent,
            None => break,
        }
    }
    steps.reverse();
    steps
}
