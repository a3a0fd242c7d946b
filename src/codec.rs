#![cfg(feature = "std")]
//! Wire encoding of [`Message`]s.
//!
//! Every message travels as an [`Envelope`] `{kind, payload}` where the
//! payload is itself an encoded document of the kind's payload type. JSON
//! (`serde_json`) is the default document format; a compact `bincode`
//! format is available when both ends agree on it.

use std::fmt;
use std::string::{String, ToString};
use std::vec::Vec;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::board::{Board, BB};
use crate::config::{ship_by_name, BOARD_SIZE};
use crate::protocol::{Coordinate, Message, MessageKind, WorldSnapshot};
use crate::ship::{Orientation, PositionedShip};

/// Document format used for envelopes and payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum WireFormat {
    #[default]
    Json,
    Binary,
}

/// Self-describing message envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub kind: MessageKind,
    pub payload: Option<Vec<u8>>,
}

/// Why an incoming message could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Bytes are not an envelope.
    Envelope(String),
    /// Kind requires a payload but none was sent.
    MissingPayload(MessageKind),
    /// Kind carries no payload but one was sent.
    UnexpectedPayload(MessageKind),
    /// Payload does not have the shape its kind requires.
    Payload { kind: MessageKind, reason: String },
    /// Board payload is well-formed but describes an impossible board.
    InvalidBoard(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Envelope(e) => write!(f, "Malformed envelope: {}", e),
            DecodeError::MissingPayload(kind) => write!(f, "{} message without payload", kind),
            DecodeError::UnexpectedPayload(kind) => {
                write!(f, "{} message carries an unexpected payload", kind)
            }
            DecodeError::Payload { kind, reason } => {
                write!(f, "Malformed {} payload: {}", kind, reason)
            }
            DecodeError::InvalidBoard(reason) => write!(f, "Invalid board payload: {}", reason),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Serialization failure while encoding an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeError(pub String);

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Serialization error: {}", self.0)
    }
}

impl std::error::Error for EncodeError {}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireShip {
    ship_name: String,
    ship_length: usize,
    x: i32,
    y: i32,
    horizontal: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBoard {
    bombed_grid: Vec<Vec<bool>>,
    placed_ships: Vec<WireShip>,
}

impl From<&Board> for WireBoard {
    fn from(board: &Board) -> Self {
        let size = BOARD_SIZE as usize;
        let bombed_grid = (0..size)
            .map(|x| (0..size).map(|y| board.is_bombed(x, y)).collect())
            .collect();
        let placed_ships = board
            .placed_ships()
            .iter()
            .map(|ps| {
                let (x, y) = ps.anchor();
                WireShip {
                    ship_name: ps.ship().name().to_string(),
                    ship_length: ps.ship().length(),
                    x: x as i32,
                    y: y as i32,
                    horizontal: ps.orientation().is_horizontal(),
                }
            })
            .collect();
        WireBoard {
            bombed_grid,
            placed_ships,
        }
    }
}

impl TryFrom<WireBoard> for Board {
    type Error = DecodeError;

    fn try_from(wire: WireBoard) -> Result<Self, Self::Error> {
        let size = BOARD_SIZE as usize;
        if wire.bombed_grid.len() != size || wire.bombed_grid.iter().any(|col| col.len() != size)
        {
            return Err(DecodeError::InvalidBoard(format!(
                "bombed grid is not {}x{}",
                size, size
            )));
        }
        let mut bombed = BB::new();
        for (x, column) in wire.bombed_grid.iter().enumerate() {
            for (y, &cell) in column.iter().enumerate() {
                if cell {
                    bombed
                        .set(x, y)
                        .map_err(|e| DecodeError::InvalidBoard(e.to_string()))?;
                }
            }
        }

        let mut ships = Vec::with_capacity(wire.placed_ships.len());
        for ws in wire.placed_ships {
            let (_, def) = ship_by_name(&ws.ship_name).ok_or_else(|| {
                DecodeError::InvalidBoard(format!("unknown ship {:?}", ws.ship_name))
            })?;
            if def.length() != ws.ship_length {
                return Err(DecodeError::InvalidBoard(format!(
                    "{} has length {}, expected {}",
                    def.name(),
                    ws.ship_length,
                    def.length()
                )));
            }
            let (x, y) = match (usize::try_from(ws.x), usize::try_from(ws.y)) {
                (Ok(x), Ok(y)) => (x, y),
                _ => {
                    return Err(DecodeError::InvalidBoard(format!(
                        "{} anchored at ({}, {})",
                        def.name(),
                        ws.x,
                        ws.y
                    )))
                }
            };
            let orientation = Orientation::from_horizontal(ws.horizontal);
            let ship = PositionedShip::new(def, x, y, orientation)
                .map_err(|e| DecodeError::InvalidBoard(format!("{}: {}", def.name(), e)))?;
            ships.push(ship);
        }
        Board::from_parts(ships, bombed).map_err(|e| DecodeError::InvalidBoard(e.to_string()))
    }
}

/// Encoder/decoder for one [`WireFormat`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codec {
    format: WireFormat,
}

impl Codec {
    pub fn new(format: WireFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> WireFormat {
        self.format
    }

    /// Encode `message` into envelope bytes.
    pub fn encode(&self, message: &Message) -> Result<Vec<u8>, EncodeError> {
        let payload = match message {
            Message::HostSettingUpGame | Message::Win => None,
            Message::WorldMapData(world) => Some(self.to_doc(world)?),
            Message::SendShipInfo(board) => Some(self.to_doc(&WireBoard::from(board))?),
            Message::Shoot(coordinate) => Some(self.to_doc(coordinate)?),
        };
        self.to_doc(&Envelope {
            kind: message.kind(),
            payload,
        })
    }

    /// Decode envelope bytes into a typed message.
    pub fn decode(&self, bytes: &[u8]) -> Result<Message, DecodeError> {
        let envelope: Envelope = self.from_doc(bytes).map_err(DecodeError::Envelope)?;
        let kind = envelope.kind;
        let malformed = |reason| DecodeError::Payload { kind, reason };
        match (kind, envelope.payload) {
            (MessageKind::HostSettingUpGame, None) => Ok(Message::HostSettingUpGame),
            (MessageKind::Win, None) => Ok(Message::Win),
            (MessageKind::HostSettingUpGame | MessageKind::Win, Some(_)) => {
                Err(DecodeError::UnexpectedPayload(kind))
            }
            (MessageKind::WorldMapData, Some(payload)) => {
                let world: WorldSnapshot = self.from_doc(&payload).map_err(malformed)?;
                Ok(Message::WorldMapData(world))
            }
            (MessageKind::SendShipInfo, Some(payload)) => {
                let wire: WireBoard = self.from_doc(&payload).map_err(malformed)?;
                Ok(Message::SendShipInfo(Board::try_from(wire)?))
            }
            (MessageKind::Shoot, Some(payload)) => {
                let coordinate: Coordinate = self.from_doc(&payload).map_err(malformed)?;
                Ok(Message::Shoot(coordinate))
            }
            (MessageKind::WorldMapData | MessageKind::SendShipInfo | MessageKind::Shoot, None) => {
                Err(DecodeError::MissingPayload(kind))
            }
        }
    }

    fn to_doc<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, EncodeError> {
        match self.format {
            WireFormat::Json => serde_json::to_vec(value).map_err(|e| EncodeError(e.to_string())),
            WireFormat::Binary => bincode::serialize(value).map_err(|e| EncodeError(e.to_string())),
        }
    }

    fn from_doc<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, String> {
        match self.format {
            WireFormat::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            WireFormat::Binary => bincode::deserialize(bytes).map_err(|e| e.to_string()),
        }
    }
}
