//! Forward replay of a candidate plan on a private copy of the game state.
use thiserror::Error;

use crate::geometry::{Cell, CellSet, Direction};
use crate::snake::{Body, advance_body};

/// First step of a replay whose head leaves the open set.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("collision at {cell} on step {step}")]
pub struct Collision {
    pub step: usize,
    pub cell: Cell,
}

/// Owned scratch state for one replay.
///
/// Built once per check and consumed by [`Snapshot::replay`], so nothing the
/// caller holds is ever touched.
#[derive(Debug, Clone)]
pub struct Snapshot {
    body: Body,
    open: CellSet,
    pending_growth: u32,
}

impl Snapshot {
    /// Capture body, growth and the open set (board minus body).
    #[must_use]
    pub fn capture(body: &Body, pending_growth: u32, open: &CellSet) -> Self {
        Self {
            body: body.clone(),
            open: open.clone(),
            pending_growth,
        }
    }

    /// Play `moves` in order using the live step rule.
    ///
    /// # Errors
    ///
    /// Returns the first [`Collision`] encountered.
    pub fn replay(mut self, moves: impl IntoIterator<Item = Direction>) -> Result<(), Collision> {
        for (step, direction) in moves.into_iter().enumerate() {
            let outcome = advance_body(
                &mut self.body,
                &mut self.pending_growth,
                direction,
                &mut self.open,
            );
            if !outcome.safe {
                return Err(Collision {
                    step,
                    cell: outcome.head,
                });
            }
        }
        Ok(())
    }
}

/// Replay `moves` against a snapshot and report the first collision.
///
/// # Errors
///
/// Returns the first [`Collision`] encountered.
pub fn check(
    moves: impl IntoIterator<Item = Direction>,
    body: &Body,
    pending_growth: u32,
    open: &CellSet,
) -> Result<(), Collision> {
    Snapshot::capture(body, pending_growth, open).replay(moves)
}

/// `true` when the whole plan replays without collision.
#[must_use]
pub fn is_safe(
    moves: impl IntoIterator<Item = Direction>,
    body: &Body,
    pending_growth: u32,
    open: &CellSet,
) -> bool {
    check(moves, body, pending_growth, open).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::{Down, Left, Right, Up};

    fn setup(size: i32, cells: &[(i32, i32)]) -> (Body, CellSet) {
        let body: Body = cells.iter().map(|&(x, y)| Cell::new(x, y)).collect();
        let open = (0..size)
            .flat_map(|x| (0..size).map(move |y| Cell::new(x, y)))
            .filter(|cell| !body.contains(cell))
            .collect();
        (body, open)
    }

    #[test]
    fn square_loop_is_safe_without_growth() {
        let (body, open) = setup(4, &[(1, 1), (1, 2), (2, 2), (2, 1)]);
        assert!(is_safe([Right, Down, Left, Up, Right], &body, 0, &open));
    }

    #[test]
    fn square_loop_bites_tail_with_growth_pending() {
        let (body, open) = setup(4, &[(1, 1), (1, 2), (2, 2), (2, 1)]);
        let err = check([Right], &body, 1, &open).unwrap_err();
        assert_eq!(err, Collision { step: 0, cell: Cell::new(2, 1) });
    }

    #[test]
    fn wall_collision_reports_step() {
        let (body, open) = setup(3, &[(1, 1), (1, 2)]);
        let err = check([Up, Up], &body, 0, &open).unwrap_err();
        assert_eq!(err.step, 1);
        assert_eq!(err.cell, Cell::new(1, -1));
    }

    #[test]
    fn replay_leaves_inputs_untouched() {
        let (body, open) = setup(4, &[(1, 1), (1, 2), (2, 2)]);
        let moves = vec![Left, Up, Right, Right, Right, Right];
        let body_before = body.clone();
        let open_before = open.clone();
        let moves_before = moves.clone();

        assert!(!is_safe(moves.iter().copied(), &body, 0, &open));
        assert!(is_safe(moves.iter().copied().take(3), &body, 0, &open));

        assert_eq!(body, body_before);
        assert_eq!(open, open_before);
        assert_eq!(moves, moves_before);
    }
}
