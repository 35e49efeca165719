//! Live snake body and growth bookkeeping.
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::geometry::{Cell, CellSet, Direction};

/// Body cells, head first and tail last.
pub type Body = VecDeque<Cell>;

/// Result of committing one move to a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// New head landed on a free cell.
    pub safe: bool,
    pub head: Cell,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    body: Body,
    pending_growth: u32,
}

impl Snake {
    /// Two-cell snake with its head at `head` and its tail directly above.
    #[must_use]
    pub fn spawn(head: Cell) -> Self {
        Self::from_body([head, head + Direction::Up])
    }

    #[must_use]
    pub fn from_body(cells: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            body: cells.into_iter().collect(),
            pending_growth: 0,
        }
    }

    #[must_use]
    pub const fn with_pending_growth(mut self, pending: u32) -> Self {
        self.pending_growth = pending;
        self
    }

    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    #[must_use]
    pub fn head(&self) -> Option<Cell> {
        self.body.front().copied()
    }

    #[must_use]
    pub fn tail(&self) -> Option<Cell> {
        self.body.back().copied()
    }

    #[must_use]
    pub const fn pending_growth(&self) -> u32 {
        self.pending_growth
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Queue `amount` cells of growth.
    pub const fn eat(&mut self, amount: u32) {
        self.pending_growth = self.pending_growth.saturating_add(amount);
    }

    /// Advance the body one cell in `direction`.
    ///
    /// Either one unit of pending growth is consumed or the tail cell is freed
    /// into `open`; the new head is then tested against `open` and claimed.
    pub fn apply_move(&mut self, direction: Direction, open: &mut CellSet) -> MoveOutcome {
        advance_body(&mut self.body, &mut self.pending_growth, direction, open)
    }
}

/// Shared step rule for the live snake and the safety simulator.
pub(crate) fn advance_body(
    body: &mut Body,
    pending_growth: &mut u32,
    direction: Direction,
    open: &mut CellSet,
) -> MoveOutcome {
    let previous = body.front().copied().unwrap_or_default();
    if *pending_growth > 0 {
        *pending_growth -= 1;
    } else if let Some(tail) = body.pop_back() {
        open.insert(tail);
    }
    let head = previous + direction;
    let safe = open.remove(&head);
    body.push_front(head);
    MoveOutcome { safe, head }
}
