//! Player that places and fires at random.

use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::board::Board;
use crate::config::{OverlapPolicy, BOARD_SIZE};
use crate::knowledge::OpponentKnowledge;
use crate::ship::{Orientation, ShipType};

use super::Player;

#[derive(Debug, Default)]
pub struct AutoPlayer;

impl AutoPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Player for AutoPlayer {
    fn place_ship(
        &mut self,
        rng: &mut SmallRng,
        board: &Board,
        ship: ShipType,
        overlap: OverlapPolicy,
    ) -> Option<(usize, usize, Orientation)> {
        match board.random_placement(rng, overlap) {
            Ok(placement) => Some(placement),
            // Crowded board; any in-bounds spot, the session rejects it if
            // it overlaps and we are asked again.
            Err(_) => {
                let size = BOARD_SIZE as usize;
                let x = rng.random_range(0..=size - ship.length());
                let y = rng.random_range(0..size);
                Some((x, y, Orientation::Horizontal))
            }
        }
    }

    fn select_target(
        &mut self,
        rng: &mut SmallRng,
        opponent: &OpponentKnowledge,
    ) -> Option<(usize, usize)> {
        let open: Vec<(usize, usize)> = (!opponent.board().bombed()).iter_set_bits().collect();
        if open.is_empty() {
            return None;
        }
        Some(open[rng.random_range(0..open.len())])
    }
}
