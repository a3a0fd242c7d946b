//! Messages exchanged between the two endpoints of a match.

use alloc::vec::Vec;
use core::fmt;

use crate::board::Board;

/// Discriminant of every message on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub enum MessageKind {
    HostSettingUpGame,
    WorldMapData,
    SendShipInfo,
    Shoot,
    Win,
}

impl MessageKind {
    /// Whether messages of this kind carry a payload.
    pub fn has_payload(self) -> bool {
        matches!(
            self,
            MessageKind::WorldMapData | MessageKind::SendShipInfo | MessageKind::Shoot
        )
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Target cell of a `Shoot`. Signed so that out-of-range values from a
/// misbehaving peer survive decoding and are rejected by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Grid cell for in-range coordinates.
    pub fn cell(&self, size: usize) -> Option<(usize, usize)> {
        let x = usize::try_from(self.x).ok()?;
        let y = usize::try_from(self.y).ok()?;
        (x < size && y < size).then_some((x, y))
    }
}

/// Host world anchor plus board presentation snapshot. Both blobs belong to
/// the rendering layer; the core only carries them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct WorldSnapshot {
    pub opaque_world_context: Vec<u8>,
    pub board_snapshot: Vec<u8>,
}

/// A decoded message with its typed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Host announces it is preparing the match. Informational.
    HostSettingUpGame,
    /// One-time world context from the host.
    WorldMapData(WorldSnapshot),
    /// Full fleet placement, sent once placement is final.
    SendShipInfo(Board),
    /// One shot per turn.
    Shoot(Coordinate),
    /// Sent by the winner; the receiver has lost.
    Win,
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::HostSettingUpGame => MessageKind::HostSettingUpGame,
            Message::WorldMapData(_) => MessageKind::WorldMapData,
            Message::SendShipInfo(_) => MessageKind::SendShipInfo,
            Message::Shoot(_) => MessageKind::Shoot,
            Message::Win => MessageKind::Win,
        }
    }
}
