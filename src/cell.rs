use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A map tile coordinate. Cells are plain values; they never refer to whatever
/// happens to stand on them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const ORIGIN: Cell = Cell { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// Scale both components, rounding to the nearest tile.
    pub fn scale(self, factor: f64) -> Cell {
        Cell::round(self.x as f64 * factor, self.y as f64 * factor)
    }

    /// Build a cell from real coordinates, rounding half away from zero.
    pub fn round(x: f64, y: f64) -> Cell {
        Cell {
            x: x.round() as i32,
            y: y.round() as i32,
        }
    }

    /// Euclidean length of the vector from the origin.
    pub fn length_l2(self) -> f64 {
        let x = self.x as f64;
        let y = self.y as f64;

        (x * x + y * y).sqrt()
    }

    /// Board distance: the number of king moves needed to cover the vector.
    pub fn length_chebyshev(self) -> u32 {
        self.x.unsigned_abs().max(self.y.unsigned_abs())
    }

    pub fn distance_l2(self, other: Cell) -> f64 {
        (self - other).length_l2()
    }

    pub fn distance_chebyshev(self, other: Cell) -> u32 {
        (self - other).length_chebyshev()
    }

    /// One king move from `self` toward `target`. Returns `self` when already there.
    pub fn step_toward(self, target: Cell) -> Cell {
        Cell {
            x: self.x + (target.x - self.x).signum(),
            y: self.y + (target.y - self.y).signum(),
        }
    }
}

impl Add for Cell {
    type Output = Cell;

    fn add(self, other: Cell) -> Cell {
        Cell::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Cell {
    type Output = Cell;

    fn sub(self, other: Cell) -> Cell {
        Cell::new(self.x - other.x, self.y - other.y)
    }
}

impl Neg for Cell {
    type Output = Cell;

    fn neg(self) -> Cell {
        Cell::new(-self.x, -self.y)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Cell::new(x, y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
