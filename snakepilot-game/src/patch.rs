//! Endpoint-preserving local rewrites of a plan.
//!
//! Both patches first remove every cell the plan itself will visit from the
//! traversable set, so a rewrite can only route through space the plan does
//! not already claim.
use smallvec::{SmallVec, smallvec};

use crate::geometry::{Cell, CellSet, Direction, trajectory};
use crate::plan::Plan;

/// Replacement moves produced by a patch.
pub type Insertion = SmallVec<[Direction; 3]>;

/// Three-move detour `[d, step, -d]` substituted for the single move at
/// `position`; the plan grows by two moves and ends where it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Padding {
    pub insertion: Insertion,
    pub position: usize,
}

/// Swap of the two moves starting at `position`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pull {
    pub replacement: Insertion,
    pub position: usize,
}

fn unclaimed(origin: Cell, moves: &[Direction], traversable: &CellSet) -> CellSet {
    let mut free = traversable.clone();
    for cell in trajectory(origin, moves.iter().copied()) {
        free.remove(&cell);
    }
    free
}

/// Earliest sideways detour that lengthens the plan without leaving
/// `traversable`.
#[must_use]
pub fn pad(origin: Cell, moves: &[Direction], traversable: &CellSet) -> Option<Padding> {
    let free = unclaimed(origin, moves, traversable);
    let mut cell = origin;
    for (position, &step) in moves.iter().enumerate() {
        for side in Direction::ALL {
            if side == step || side == step.reverse() {
                continue;
            }
            let beside = cell + side;
            if free.contains(&beside) && free.contains(&(beside + step)) {
                return Some(Padding {
                    insertion: smallvec![side, step, side.reverse()],
                    position,
                });
            }
        }
        cell += step;
    }
    None
}

/// First `(m0, m1, m0)` triple whose middle pair can be swapped so the path
/// runs through a free cell, pulling the plan into vacated space.
#[must_use]
pub fn pull(origin: Cell, moves: &[Direction], traversable: &CellSet) -> Option<Pull> {
    let free = unclaimed(origin, moves, traversable);
    let mut cell = origin;
    for (idx, window) in moves.windows(3).enumerate() {
        let [first, middle, last] = [window[0], window[1], window[2]];
        if first == last && middle != first && free.contains(&(cell + first + last)) {
            return Some(Pull {
                replacement: smallvec![last, middle],
                position: idx + 1,
            });
        }
        cell += first;
    }
    None
}

/// Apply [`pad`] to `plan`, tagging the detour with `tick`.
pub fn pad_in_place(origin: Cell, plan: &mut Plan, traversable: &CellSet, tick: u64) -> bool {
    let Some(padding) = pad(origin, &plan.directions(), traversable) else {
        return false;
    };
    plan.splice(padding.position, 1, &padding.insertion, tick);
    true
}

/// Apply [`pull`] to `plan`, tagging the swapped moves with `tick`.
pub fn pull_in_place(origin: Cell, plan: &mut Plan, traversable: &CellSet, tick: u64) -> bool {
    let Some(pulled) = pull(origin, &plan.directions(), traversable) else {
        return false;
    };
    plan.splice(pulled.position, 2, &pulled.replacement, tick);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::{Left, Right, Up};

    fn grid(size: i32) -> CellSet {
        (0..size)
            .flat_map(|x| (0..size).map(move |y| Cell::new(x, y)))
            .collect()
    }

    fn displacement(moves: &[Direction]) -> Cell {
        moves
            .iter()
            .fold(Cell::default(), |acc, direction| acc + direction.offset())
    }

    #[test]
    fn pad_finds_first_sideways_detour() {
        let open = grid(5);
        let origin = Cell::new(0, 4);
        let moves = [Up, Up, Up];
        let padding = pad(origin, &moves, &open).unwrap();
        assert_eq!(padding.position, 0);
        assert_eq!(padding.insertion.as_slice(), &[Right, Up, Left]);

        let mut cell = origin;
        for direction in padding.insertion.iter().copied() {
            cell += direction;
            assert!(open.contains(&cell));
        }
        assert_eq!(
            displacement(&padding.insertion),
            displacement(&moves[padding.position..=padding.position])
        );
    }

    #[test]
    fn pad_skips_blocked_positions() {
        let mut open = grid(4);
        open.remove(&Cell::new(1, 3));
        open.remove(&Cell::new(1, 2));
        let origin = Cell::new(0, 3);
        let padding = pad(origin, &[Up, Up, Up], &open).unwrap();
        assert_eq!(padding.position, 2);
        assert_eq!(padding.insertion.as_slice(), &[Right, Up, Left]);
    }

    #[test]
    fn pad_reports_none_in_a_corridor() {
        let open: CellSet = (0..4).map(|x| Cell::new(x, 0)).collect();
        assert!(pad(Cell::new(0, 0), &[Right, Right, Right], &open).is_none());
    }

    #[test]
    fn pull_swaps_into_vacated_cell() {
        let open = grid(4);
        let origin = Cell::new(0, 3);
        let moves = [Up, Right, Up, Right];
        let pulled = pull(origin, &moves, &open).unwrap();
        assert_eq!(pulled.position, 1);
        assert_eq!(pulled.replacement.as_slice(), &[Up, Right]);

        let mut plan = Plan::from_directions(&moves, 0);
        assert!(pull_in_place(origin, &mut plan, &open, 4));
        assert_eq!(plan.directions(), vec![Up, Up, Right, Right]);
        assert_eq!(displacement(&plan.directions()), displacement(&moves));
    }

    #[test]
    fn pull_ignores_occupied_cells() {
        let mut open = grid(4);
        open.remove(&Cell::new(0, 1));
        assert!(pull(Cell::new(0, 3), &[Up, Right, Up], &open).is_none());
        assert!(pull(Cell::new(0, 3), &[Up, Up], &grid(4)).is_none());
    }

    #[test]
    fn pad_in_place_lengthens_plan_by_two() {
        let open = grid(5);
        let mut plan = Plan::from_directions(&[Up, Up], 0);
        assert!(pad_in_place(Cell::new(0, 4), &mut plan, &open, 3));
        assert_eq!(plan.directions(), vec![Right, Up, Left, Up]);
    }
}
