//! Local players: whoever decides where ships go and where to shoot.
//!
//! A [`Player`] is asked for input only when the session is waiting on the
//! local side (fleet placement, our turn). It sees every effect the session
//! produces so it can render or react to them.

use rand::rngs::SmallRng;

use crate::board::Board;
use crate::config::OverlapPolicy;
use crate::knowledge::OpponentKnowledge;
use crate::session::{Effect, Session, SessionError};
use crate::ship::{Orientation, ShipType};

pub trait Player: Send {
    /// Choose where the next catalog ship goes; `None` gives up the match.
    fn place_ship(
        &mut self,
        rng: &mut SmallRng,
        board: &Board,
        ship: ShipType,
        overlap: OverlapPolicy,
    ) -> Option<(usize, usize, Orientation)>;

    /// Choose a cell on the opponent's board to fire at; `None` when there
    /// is nothing left to choose.
    fn select_target(
        &mut self,
        rng: &mut SmallRng,
        opponent: &OpponentKnowledge,
    ) -> Option<(usize, usize)>;

    /// Called with every effect, after the session applied it.
    fn observe(&mut self, _session: &Session, _effect: &Effect) {}

    /// Called when the session rejected this player's input.
    fn rejected(&mut self, _error: &SessionError) {}
}

pub mod auto;
pub use auto::AutoPlayer;

#[cfg(feature = "std")]
pub mod cli;
#[cfg(feature = "std")]
pub use cli::CliPlayer;
