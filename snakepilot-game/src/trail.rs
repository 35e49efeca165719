//! Trajectories that follow the snake's own body.
use crate::geometry::{CellSet, Direction};
use crate::search::{PathNotFound, find_path};
use crate::snake::Body;

/// Moves that walk the body from its tail cell to its head cell.
///
/// Started from the current tail cell this visits each body cell in the order
/// the tail vacates it, which is why it closes every feeding plan: once the
/// head reaches the old tail cell it can safely follow the trail home.
#[must_use]
pub fn retrace(body: &Body) -> Vec<Direction> {
    body.iter()
        .rev()
        .zip(body.iter().rev().skip(1))
        .filter_map(|(from, to)| from.direction_to(*to))
        .collect()
}

/// Head-to-tail approach followed by [`retrace`].
///
/// `open` is the board minus the body; the tail cell is added because it
/// will have been vacated by the time the head arrives.
///
/// # Errors
///
/// Returns [`PathNotFound`] when the tail cannot be reached.
pub fn chase_tail(body: &Body, open: &CellSet) -> Result<Vec<Direction>, PathNotFound> {
    let (Some(&head), Some(&tail)) = (body.front(), body.back()) else {
        return Ok(Vec::new());
    };
    let mut traversable = open.clone();
    traversable.insert(tail);
    let mut path = find_path(head, tail, &traversable)?;
    path.extend(retrace(body));
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Cell, trajectory};

    fn body(cells: &[(i32, i32)]) -> Body {
        cells.iter().map(|&(x, y)| Cell::new(x, y)).collect()
    }

    #[test]
    fn retrace_walks_tail_to_head() {
        let snake = body(&[(2, 2), (3, 2), (3, 3), (2, 3)]);
        let moves = retrace(&snake);
        assert_eq!(moves.len(), snake.len() - 1);
        let visited: Vec<Cell> = trajectory(Cell::new(2, 3), moves).collect();
        assert_eq!(visited, vec![Cell::new(3, 3), Cell::new(3, 2), Cell::new(2, 2)]);
    }

    #[test]
    fn single_cell_body_has_no_trail() {
        assert!(retrace(&body(&[(0, 0)])).is_empty());
    }

    #[test]
    fn chase_tail_approaches_over_free_cells() {
        let snake = body(&[(1, 1), (1, 2), (2, 2), (2, 1)]);
        let board: CellSet = (0..4)
            .flat_map(|x| (0..4).map(move |y| Cell::new(x, y)))
            .collect();
        let open: CellSet = board
            .iter()
            .filter(|cell| !snake.contains(cell))
            .copied()
            .collect();
        let moves = chase_tail(&snake, &open).unwrap();
        let approach = moves.len() - retrace(&snake).len();
        let cells: Vec<Cell> = trajectory(Cell::new(1, 1), moves).collect();
        assert_eq!(cells[approach - 1], Cell::new(2, 1));
        assert!(cells[..approach - 1].iter().all(|cell| open.contains(cell)));
        assert_eq!(cells.last(), Some(&Cell::new(1, 1)));
    }
}
