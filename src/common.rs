//! Common types: board errors and shot outcomes.

use crate::bitboard::BitBoardError;

/// Result of resolving one of our shots against the opponent's fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    /// No ship occupies the cell.
    Miss,
    /// Hit the ship at this catalog index, which is still afloat.
    Hit(usize),
    /// Hit the ship at this catalog index and it has no cells left.
    HitAndSunk(usize),
}

impl ShotOutcome {
    pub fn is_hit(&self) -> bool {
        !matches!(self, ShotOutcome::Miss)
    }
}

/// Errors returned by Board operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Underlying bitboard error (e.g., invalid size or index).
    BitBoardError(BitBoardError),
    /// Some cell of the ship would fall outside the grid.
    ShipOutOfBounds,
    /// Ship placement overlaps another ship.
    ShipOverlaps,
    /// Ship is not the next one in catalog order.
    UnexpectedShip { expected: &'static str, got: &'static str },
    /// Every ship of the catalog is already placed.
    FleetComplete,
    /// Board left setup; its fleet can no longer change.
    Finalized,
    /// Nothing to undo.
    NothingPlaced,
    /// More ships than the catalog holds.
    TooManyShips(usize),
    /// Unable to find a random placement.
    UnableToPlaceShip,
}

impl From<BitBoardError> for BoardError {
    fn from(err: BitBoardError) -> Self {
        BoardError::BitBoardError(err)
    }
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardError::BitBoardError(e) => write!(f, "BitBoard error: {}", e),
            BoardError::ShipOutOfBounds => write!(f, "Ship placement is out of bounds"),
            BoardError::ShipOverlaps => write!(f, "Ship placement overlaps with another ship"),
            BoardError::UnexpectedShip { expected, got } => {
                write!(f, "Expected to place {} next, got {}", expected, got)
            }
            BoardError::FleetComplete => write!(f, "All ships are already placed"),
            BoardError::Finalized => write!(f, "Board placement is finalized"),
            BoardError::NothingPlaced => write!(f, "No ship has been placed"),
            BoardError::TooManyShips(n) => write!(f, "Board carries {} ships, too many", n),
            BoardError::UnableToPlaceShip => write!(f, "Unable to place ship"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardError {}

#[cfg(feature = "std")]
impl std::error::Error for BitBoardError {}
