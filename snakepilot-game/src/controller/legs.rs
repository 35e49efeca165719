//! Two-leg reachability search: head to food, then food back to the tail.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Cell, CellSet, Direction, trajectory};
use crate::search::{PathNotFound, find_path};
use crate::snake::Body;
use crate::trail::retrace;

/// Which leg is routed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOrder {
    /// Route head → food, then food → tail around the first leg.
    #[default]
    HeadFirst,
    /// Reserve the food → tail escape first, then route head → food around it.
    TailFirst,
}

impl SearchOrder {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::HeadFirst => Self::TailFirst,
            Self::TailFirst => Self::HeadFirst,
        }
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum LegFailure {
    #[error("first leg failed: {0}")]
    FirstLeg(PathNotFound),
    #[error("second leg failed: {0}")]
    SecondLeg(PathNotFound),
    #[error("combined plan of {length} moves is shorter than the required {required}")]
    TooShort { length: usize, required: usize },
}

/// Inputs for one search attempt.
#[derive(Debug, Clone, Copy)]
pub struct LegRequest<'a> {
    /// Board minus body.
    pub open: &'a CellSet,
    pub body: &'a Body,
    pub food: Cell,
    /// Pending growth plus growth per food.
    pub min_length: usize,
    pub order: SearchOrder,
}

fn without_trajectory(open: &CellSet, origin: Cell, moves: &[Direction]) -> CellSet {
    let mut remaining = open.clone();
    for cell in trajectory(origin, moves.iter().copied()) {
        remaining.remove(&cell);
    }
    remaining
}

/// Build the cyclic plan head → food → tail → (retraced body) → head.
///
/// # Errors
///
/// Returns a [`LegFailure`] naming the leg that could not be routed, or
/// [`LegFailure::TooShort`] when the plan would let the head catch the tail
/// before pending growth is spent.
pub fn two_leg_search(request: &LegRequest<'_>) -> Result<Vec<Direction>, LegFailure> {
    let (Some(&head), Some(&tail)) = (request.body.front(), request.body.back()) else {
        return Err(LegFailure::TooShort {
            length: 0,
            required: request.min_length,
        });
    };
    let food = request.food;

    let (approach, escape) = match request.order {
        SearchOrder::HeadFirst => {
            let approach = find_path(head, food, request.open).map_err(LegFailure::FirstLeg)?;
            let mut remaining = without_trajectory(request.open, head, &approach);
            remaining.insert(tail);
            let escape = find_path(food, tail, &remaining).map_err(LegFailure::SecondLeg)?;
            (approach, escape)
        }
        SearchOrder::TailFirst => {
            let mut with_tail = request.open.clone();
            with_tail.insert(tail);
            let escape = find_path(food, tail, &with_tail).map_err(LegFailure::FirstLeg)?;
            let remaining = without_trajectory(request.open, food, &escape);
            let approach = find_path(head, food, &remaining).map_err(LegFailure::SecondLeg)?;
            (approach, escape)
        }
    };

    let mut combined = approach;
    combined.extend(escape);
    combined.extend(retrace(request.body));
    if combined.len() < request.min_length {
        return Err(LegFailure::TooShort {
            length: combined.len(),
            required: request.min_length,
        });
    }
    Ok(combined)
}
