//! Square playing field.
use serde::{Deserialize, Serialize};

use crate::geometry::{Cell, CellSet};
use crate::snake::Body;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: i32,
    cells: CellSet,
}

impl Board {
    /// `size` × `size` board; non-positive sizes produce an empty board.
    #[must_use]
    pub fn square(size: i32) -> Self {
        let size = size.max(0);
        let cells = (0..size)
            .flat_map(|x| (0..size).map(move |y| Cell::new(x, y)))
            .collect();
        Self { size, cells }
    }

    #[must_use]
    pub const fn size(&self) -> i32 {
        self.size
    }

    #[must_use]
    pub const fn cells(&self) -> &CellSet {
        &self.cells
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    #[must_use]
    pub fn center(&self) -> Cell {
        Cell::new(self.size / 2, self.size / 2)
    }

    /// Board cells not covered by `body`.
    #[must_use]
    pub fn open_cells(&self, body: &Body) -> CellSet {
        let mut open = self.cells.clone();
        for cell in body {
            open.remove(cell);
        }
        open
    }

    /// Free cells in lexicographic order.
    #[must_use]
    pub fn sorted_open_cells(&self, body: &Body) -> Vec<Cell> {
        let mut free: Vec<Cell> = self.open_cells(body).into_iter().collect();
        free.sort_unstable();
        free
    }
}
