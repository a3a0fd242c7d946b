//! Game constants and per-match configuration.

use crate::ship::ShipType;

pub const BOARD_SIZE: u8 = 10;
pub const NUM_SHIPS: usize = 5;
pub const SHIPS: [ShipType; NUM_SHIPS] = [
    ShipType::new("Carrier", 5),
    ShipType::new("Battleship", 4),
    ShipType::new("Cruiser", 3),
    ShipType::new("Submarine", 3),
    ShipType::new("Destroyer", 2),
];

/// Total number of ship segments in the standard fleet.
pub const TOTAL_SHIP_CELLS: usize = 5 + 4 + 3 + 3 + 2;

/// Resolve a ship name to its catalog index and definition.
pub fn ship_by_name(name: &str) -> Option<(usize, ShipType)> {
    SHIPS
        .iter()
        .enumerate()
        .find(|(_, def)| def.name() == name)
        .map(|(i, def)| (i, *def))
}

/// Whether a ship may be placed on cells already claimed by another ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Overlapping placements fail with `BoardError::ShipOverlaps`.
    #[default]
    Reject,
    /// Ships may share cells. A shot on a shared cell counts against every
    /// ship covering it.
    Allow,
}

/// Settings fixed when a match is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Role decided by the connection layer; the host shoots first.
    pub is_server: bool,
    pub overlap: OverlapPolicy,
}

impl SessionConfig {
    pub fn host() -> Self {
        Self {
            is_server: true,
            overlap: OverlapPolicy::default(),
        }
    }

    pub fn peer() -> Self {
        Self {
            is_server: false,
            overlap: OverlapPolicy::default(),
        }
    }

    pub fn with_overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        self
    }
}
