//! What we know about the opponent once their board has been revealed.

use log::debug;

use crate::board::Board;
use crate::common::{BoardError, ShotOutcome};
use crate::config::{BOARD_SIZE, NUM_SHIPS};
use crate::ship::PositionedShip;

const SIZE: usize = BOARD_SIZE as usize;

/// Per-cell ship membership and per-ship remaining-hit counters, derived
/// once from the opponent's revealed board.
///
/// Each cell records every ship covering it as a bit set over catalog
/// indices, so a cell shared by overlapping ships counts against all of
/// them. The revealed board is kept as well; its bombed grid records our
/// own shots so the rendering layer can draw them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpponentKnowledge {
    board: Board,
    ship_grid: [[u8; SIZE]; SIZE],
    remaining: [usize; NUM_SHIPS],
}

impl OpponentKnowledge {
    /// Build the tracker from the opponent's full board.
    ///
    /// Counters start at each placed ship's length; catalog slots without a
    /// placed ship start at zero.
    pub fn ingest(board: Board) -> Self {
        let mut ship_grid = [[0u8; SIZE]; SIZE];
        let mut remaining = [0usize; NUM_SHIPS];
        for (index, ship) in board.placed_ships().iter().enumerate() {
            remaining[index] = ship.ship().length();
            for (x, y) in ship.cells() {
                ship_grid[x][y] |= 1 << index;
            }
        }
        debug!("ingested opponent fleet, remaining hits {:?}", remaining);
        Self {
            board,
            ship_grid,
            remaining,
        }
    }

    /// Resolve a shot at `(x, y)`.
    ///
    /// Every ship covering the cell with hits left loses one; counters never
    /// go below zero. The outcome names the ship placed last among those
    /// covering the cell, preferring one that sank with this shot. Callers
    /// resolve each cell once (see [`OpponentKnowledge::record_bomb`]).
    pub fn resolve_shot(&mut self, x: usize, y: usize) -> ShotOutcome {
        let mut outcome = ShotOutcome::Miss;
        for index in self.ships_at(x, y) {
            let counter = &mut self.remaining[index];
            if *counter == 0 {
                if outcome == ShotOutcome::Miss {
                    outcome = ShotOutcome::Hit(index);
                }
                continue;
            }
            *counter -= 1;
            outcome = match (*counter, outcome) {
                (0, _) => ShotOutcome::HitAndSunk(index),
                (_, ShotOutcome::HitAndSunk(sunk)) => ShotOutcome::HitAndSunk(sunk),
                _ => ShotOutcome::Hit(index),
            };
        }
        outcome
    }

    /// Mark `(x, y)` on the opponent's board as fired upon; returns whether it
    /// already was.
    pub fn record_bomb(&mut self, x: usize, y: usize) -> Result<bool, BoardError> {
        self.board.record_bomb(x, y)
    }

    /// Win condition: every counter is at zero.
    pub fn all_sunk(&self) -> bool {
        self.remaining.iter().all(|&r| r == 0)
    }

    pub fn is_sunk(&self, index: usize) -> bool {
        self.remaining.get(index).is_some_and(|&r| r == 0)
    }

    pub fn remaining_hits(&self) -> &[usize; NUM_SHIPS] {
        &self.remaining
    }

    /// Index of the last placed ship occupying `(x, y)`, if any.
    pub fn ship_index_at(&self, x: usize, y: usize) -> Option<usize> {
        self.ships_at(x, y).last()
    }

    /// Indices of every ship covering `(x, y)`, in placement order.
    pub fn ships_at(&self, x: usize, y: usize) -> impl Iterator<Item = usize> {
        let members = self
            .ship_grid
            .get(x)
            .and_then(|column| column.get(y))
            .copied()
            .unwrap_or(0);
        (0..NUM_SHIPS).filter(move |i| members & (1 << i) != 0)
    }

    /// Placed opponent ships whose counters reached zero.
    pub fn sunk_ships(&self) -> impl Iterator<Item = (usize, &PositionedShip)> + '_ {
        self.board
            .placed_ships()
            .iter()
            .enumerate()
            .filter(|(i, _)| self.is_sunk(*i))
    }

    /// Zero every counter. Used after losing; the whole fleet reads as sunk
    /// and therefore revealed.
    pub fn reset_counters(&mut self) {
        self.remaining = [0; NUM_SHIPS];
    }

    /// The revealed opponent board.
    pub fn board(&self) -> &Board {
        &self.board
    }
}
