//! Ship definitions and positioned ships.

use core::fmt;

use crate::board::BB;
use crate::common::BoardError;
use crate::config::BOARD_SIZE;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Extends along increasing `x`.
    Horizontal,
    /// Extends along increasing `y`.
    Vertical,
}

impl Orientation {
    pub fn from_horizontal(horizontal: bool) -> Self {
        if horizontal {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }

    pub fn is_horizontal(self) -> bool {
        self == Orientation::Horizontal
    }
}

/// Type of ship: name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipType {
    name: &'static str,
    length: usize,
}

impl ShipType {
    pub const fn new(name: &'static str, length: usize) -> Self {
        Self { name, length }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

/// A ship anchored at its top-left cell `(x, y)` on the board.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PositionedShip {
    ship: ShipType,
    x: usize,
    y: usize,
    orientation: Orientation,
    mask: BB,
}

impl PositionedShip {
    /// Position `ship` at `(x, y)`. Fails with `ShipOutOfBounds` unless every
    /// cell of the ship lies inside the grid.
    pub fn new(
        ship: ShipType,
        x: usize,
        y: usize,
        orientation: Orientation,
    ) -> Result<Self, BoardError> {
        let size = BOARD_SIZE as usize;
        let len = ship.length();
        let fits = match orientation {
            Orientation::Horizontal => y < size && x.checked_add(len).is_some_and(|end| end <= size),
            Orientation::Vertical => x < size && y.checked_add(len).is_some_and(|end| end <= size),
        };
        if len == 0 || !fits {
            return Err(BoardError::ShipOutOfBounds);
        }

        let mut mask = BB::new();
        for i in 0..len {
            let (cx, cy) = match orientation {
                Orientation::Horizontal => (x + i, y),
                Orientation::Vertical => (x, y + i),
            };
            mask.set(cx, cy)?;
        }
        Ok(Self {
            ship,
            x,
            y,
            orientation,
            mask,
        })
    }

    pub fn ship(&self) -> ShipType {
        self.ship
    }

    /// Top-left anchor `(x, y)`.
    pub fn anchor(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Cells covered by the ship.
    pub fn mask(&self) -> BB {
        self.mask
    }

    /// Covered cells from the anchor outwards.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.ship.length()).map(move |i| match self.orientation {
            Orientation::Horizontal => (self.x + i, self.y),
            Orientation::Vertical => (self.x, self.y + i),
        })
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y).unwrap_or(false)
    }
}

impl fmt::Debug for PositionedShip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PositionedShip {{ name: \"{}\", anchor: ({}, {}), orientation: {:?} }}",
            self.ship.name(),
            self.x,
            self.y,
            self.orientation,
        )
    }
}
