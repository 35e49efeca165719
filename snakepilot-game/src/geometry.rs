//! Grid coordinates and the four unit moves.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};

/// Set of cells used for occupancy and traversability queries.
pub type CellSet = HashSet<Cell>;

/// Integer board coordinate. `y` grows downward.
///
/// Ordering is lexicographic on `(x, y)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Taxicab distance.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Straight-line distance.
    #[must_use]
    pub fn euclid(self, other: Self) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        dx.hypot(dy)
    }

    /// Cell reached by taking `direction` from here.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        self + direction.offset()
    }

    /// Direction leading from `self` to an orthogonally adjacent `other`.
    #[must_use]
    pub fn direction_to(self, other: Self) -> Option<Direction> {
        Direction::from_offset(other - self)
    }
}

impl Add for Cell {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Add<Direction> for Cell {
    type Output = Self;

    fn add(self, rhs: Direction) -> Self::Output {
        self.step(rhs)
    }
}

impl AddAssign<Direction> for Cell {
    fn add_assign(&mut self, rhs: Direction) {
        *self = self.step(rhs);
    }
}

impl Sub for Cell {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Cell {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four unit moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Canonical enumeration order. Neighbour expansion follows it, so it
    /// decides which of several equal-cost paths the search returns.
    pub const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    #[must_use]
    pub const fn offset(self) -> Cell {
        match self {
            Self::Up => Cell::new(0, -1),
            Self::Right => Cell::new(1, 0),
            Self::Down => Cell::new(0, 1),
            Self::Left => Cell::new(-1, 0),
        }
    }

    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }

    #[must_use]
    pub const fn from_offset(offset: Cell) -> Option<Self> {
        match (offset.x, offset.y) {
            (0, -1) => Some(Self::Up),
            (1, 0) => Some(Self::Right),
            (0, 1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Right => "right",
            Self::Down => "down",
            Self::Left => "left",
        }
    }
}

impl Neg for Direction {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.reverse()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Walk `moves` from `origin`, yielding every cell entered (origin excluded).
pub fn trajectory(
    origin: Cell,
    moves: impl IntoIterator<Item = Direction>,
) -> impl Iterator<Item = Cell> {
    moves.into_iter().scan(origin, |cell, direction| {
        *cell += direction;
        Some(*cell)
    })
}
