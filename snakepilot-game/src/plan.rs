//! The agent's committed move queue.
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::geometry::{Cell, Direction};

/// Provenance of a planned move, kept for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanTag {
    /// Tick on which the segment containing this move was planned.
    pub tick: u64,
    /// Index of the move within that segment.
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlannedMove {
    pub direction: Direction,
    pub tag: PlanTag,
}

/// Ordered queue of committed future moves.
///
/// Emitted moves are rotated to the back, so a plan that closes a cycle keeps
/// replaying until it is replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    moves: VecDeque<PlannedMove>,
}

impl Plan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a plan whose moves are all tagged with `tick`.
    #[must_use]
    pub fn from_directions(directions: &[Direction], tick: u64) -> Self {
        let mut plan = Self::new();
        plan.replace(directions, tick);
        plan
    }

    /// Discard the current plan and commit to `directions`.
    pub fn replace(&mut self, directions: &[Direction], tick: u64) {
        self.moves = tagged(directions, tick).collect();
    }

    /// Replace `removed` moves starting at `position` with `insertion`.
    ///
    /// Ranges running past the end are clipped.
    pub fn splice(&mut self, position: usize, removed: usize, insertion: &[Direction], tick: u64) {
        let start = position.min(self.moves.len());
        let end = position.saturating_add(removed).min(self.moves.len());
        let back = self.moves.split_off(end);
        self.moves.truncate(start);
        self.moves.extend(tagged(insertion, tick));
        self.moves.extend(back);
    }

    /// Pop the next move and rotate it to the back of the queue.
    pub fn advance(&mut self) -> Option<PlannedMove> {
        let next = self.moves.pop_front()?;
        self.moves.push_back(next);
        Some(next)
    }

    #[must_use]
    pub fn front(&self) -> Option<Direction> {
        self.moves.front().map(|planned| planned.direction)
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[must_use]
    pub fn directions(&self) -> Vec<Direction> {
        self.moves.iter().map(|planned| planned.direction).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlannedMove> {
        self.moves.iter()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let runs = run_lengths(self.moves.iter().map(|planned| planned.direction));
        let rendered: Vec<String> = runs
            .iter()
            .map(|(count, direction)| format!("{count}x{direction}"))
            .collect();
        write!(f, "[{}]", rendered.join(" "))
    }
}

fn tagged(directions: &[Direction], tick: u64) -> impl Iterator<Item = PlannedMove> + '_ {
    directions
        .iter()
        .enumerate()
        .map(move |(position, &direction)| PlannedMove {
            direction,
            tag: PlanTag { tick, position },
        })
}

/// Collapse consecutive equal values into `(count, value)` runs.
pub fn run_lengths<T: PartialEq>(values: impl IntoIterator<Item = T>) -> Vec<(usize, T)> {
    let mut runs: Vec<(usize, T)> = Vec::new();
    for value in values {
        match runs.last_mut() {
            Some((count, last)) if *last == value => *count += 1,
            _ => runs.push((1, value)),
        }
    }
    runs
}

/// Step-by-step head positions of two plans replayed from the same origin.
///
/// A side that has run out of moves reports `None` for the remaining steps.
#[must_use]
pub fn divergence(origin: Cell, before: &Plan, after: &Plan) -> Vec<(Option<Cell>, Option<Cell>)> {
    let walk = |plan: &Plan| -> Vec<Cell> {
        crate::geometry::trajectory(origin, plan.iter().map(|planned| planned.direction)).collect()
    };
    let left = walk(before);
    let right = walk(after);
    (0..left.len().max(right.len()))
        .map(|idx| (left.get(idx).copied(), right.get(idx).copied()))
        .collect()
}
