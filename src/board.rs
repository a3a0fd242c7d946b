//! One player's board: placed fleet plus the record of incoming fire.

use alloc::vec::Vec;
use core::fmt;
use log::debug;
use rand::Rng;

use crate::bitboard::BitBoard;
use crate::common::BoardError;
use crate::config::{OverlapPolicy, BOARD_SIZE, NUM_SHIPS, SHIPS};
use crate::ship::{Orientation, PositionedShip, ShipType};

/// Grid type shared by every board-sized mask.
pub type BB = BitBoard<u128, { BOARD_SIZE as usize }>;

/// Ships in placement order, cells claimed by them, and cells fired upon.
///
/// While in setup, ships are placed one at a time in catalog order. Once
/// [`Board::finalize`] has been called the fleet is frozen and only the
/// bombed grid keeps changing.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    ships: Vec<PositionedShip>,
    occupancy: BB,
    bombed: BB,
    finalized: bool,
}

impl Board {
    /// Create an empty board (no ships placed, nothing bombed).
    pub fn new() -> Self {
        Board {
            ships: Vec::with_capacity(NUM_SHIPS),
            occupancy: BB::new(),
            bombed: BB::new(),
            finalized: false,
        }
    }

    /// Rebuild a finalized board from revealed parts. Bounds were checked
    /// when each ship was positioned; overlap is not checked here.
    pub fn from_parts(ships: Vec<PositionedShip>, bombed: BB) -> Result<Self, BoardError> {
        if ships.len() > NUM_SHIPS {
            return Err(BoardError::TooManyShips(ships.len()));
        }
        let occupancy = ships.iter().fold(BB::new(), |acc, s| acc | s.mask());
        Ok(Board {
            ships,
            occupancy,
            bombed,
            finalized: true,
        })
    }

    /// Placed ships, in placement order.
    pub fn placed_ships(&self) -> &[PositionedShip] {
        &self.ships
    }

    /// Cells claimed by any placed ship.
    pub fn occupancy(&self) -> BB {
        self.occupancy
    }

    /// Cells that have been fired upon.
    pub fn bombed(&self) -> BB {
        self.bombed
    }

    pub fn is_bombed(&self, x: usize, y: usize) -> bool {
        self.bombed.get(x, y).unwrap_or(false)
    }

    /// `true` once every catalog ship is placed.
    pub fn is_complete(&self) -> bool {
        self.ships.len() == NUM_SHIPS
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// The catalog ship to place next, if any.
    pub fn next_ship(&self) -> Option<ShipType> {
        SHIPS.get(self.ships.len()).copied()
    }

    /// Index of the last placed ship covering `(x, y)`.
    pub fn ship_at(&self, x: usize, y: usize) -> Option<usize> {
        self.ships.iter().rposition(|s| s.contains(x, y))
    }

    /// Place `ship` with its top-left cell at `(x, y)`.
    pub fn place_ship(
        &mut self,
        ship: ShipType,
        x: usize,
        y: usize,
        orientation: Orientation,
        overlap: OverlapPolicy,
    ) -> Result<(), BoardError> {
        if self.finalized {
            return Err(BoardError::Finalized);
        }
        let expected = self.next_ship().ok_or(BoardError::FleetComplete)?;
        if expected != ship {
            return Err(BoardError::UnexpectedShip {
                expected: expected.name(),
                got: ship.name(),
            });
        }
        let positioned = PositionedShip::new(ship, x, y, orientation)?;
        if overlap == OverlapPolicy::Reject && !(self.occupancy & positioned.mask()).is_empty() {
            return Err(BoardError::ShipOverlaps);
        }
        self.occupancy = self.occupancy | positioned.mask();
        self.ships.push(positioned);
        debug!("placed {:?}", positioned);
        Ok(())
    }

    /// Remove the most recently placed ship.
    pub fn undo_last_placement(&mut self) -> Result<PositionedShip, BoardError> {
        if self.finalized {
            return Err(BoardError::Finalized);
        }
        let removed = self.ships.pop().ok_or(BoardError::NothingPlaced)?;
        self.occupancy = self.ships.iter().fold(BB::new(), |acc, s| acc | s.mask());
        Ok(removed)
    }

    /// Freeze the fleet.
    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    /// Mark `(x, y)` as bombed and report whether it already was.
    /// Bombing a cell twice leaves the grid unchanged.
    pub fn record_bomb(&mut self, x: usize, y: usize) -> Result<bool, BoardError> {
        Ok(self.bombed.insert(x, y)?)
    }

    /// Returns a random legal `(x, y, Orientation)` for the next ship.
    pub fn random_placement<R: Rng>(
        &self,
        rng: &mut R,
        overlap: OverlapPolicy,
    ) -> Result<(usize, usize, Orientation), BoardError> {
        let def = self.next_ship().ok_or(BoardError::FleetComplete)?;
        let size = BOARD_SIZE as usize;
        for _ in 0..100 {
            let orient = if rng.random() {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let (max_x, max_y) = match orient {
                Orientation::Horizontal => (size - def.length(), size - 1),
                Orientation::Vertical => (size - 1, size - def.length()),
            };
            let x = rng.random_range(0..=max_x);
            let y = rng.random_range(0..=max_y);
            let candidate = PositionedShip::new(def, x, y, orient)?;
            if overlap == OverlapPolicy::Allow || (self.occupancy & candidate.mask()).is_empty() {
                return Ok((x, y, orient));
            }
        }
        Err(BoardError::UnableToPlaceShip)
    }

    /// Place every remaining catalog ship at random.
    pub fn place_fleet_randomly<R: Rng>(
        &mut self,
        rng: &mut R,
        overlap: OverlapPolicy,
    ) -> Result<(), BoardError> {
        while let Some(ship) = self.next_ship() {
            let (x, y, orient) = self.random_placement(rng, overlap)?;
            self.place_ship(ship, x, y, orient, overlap)?;
        }
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Board {{\n  ships: {:?},\n  occupancy: {:?},\n  bombed: {:?},\n  finalized: {}\n}}",
            self.ships, self.occupancy, self.bombed, self.finalized
        )
    }
}
