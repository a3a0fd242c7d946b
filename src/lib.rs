#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod bitboard;
mod board;
#[cfg(feature = "std")]
pub mod codec;
mod common;
mod config;
mod knowledge;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod node;
pub mod player;
pub mod protocol;
pub mod session;
mod ship;
#[cfg(feature = "std")]
pub mod transport;

pub use bitboard::{BitBoard, BitBoardError};
pub use board::*;
#[cfg(feature = "std")]
pub use codec::{Codec, DecodeError, EncodeError, Envelope, WireFormat};
pub use common::*;
pub use config::*;
pub use knowledge::OpponentKnowledge;
#[cfg(feature = "std")]
pub use logging::{init_logging, log_level_from_env};
#[cfg(feature = "std")]
pub use node::SessionNode;
pub use player::{AutoPlayer, Player};
#[cfg(feature = "std")]
pub use player::CliPlayer;
pub use protocol::*;
pub use session::*;
pub use ship::*;
#[cfg(feature = "std")]
pub use transport::{in_memory::InMemoryTransport, tcp::TcpTransport, Transport};
