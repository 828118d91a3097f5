//! Static room graph used by movement and kill reachability.
//!
//! Two hubs (Cafeteria, Reactor) each connect to the same three spokes
//! (Electrical, MedBay, Navigation) and never to each other, so travelling
//! hub to hub always takes at least one intermediate hop.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Room {
    Cafeteria,
    Electrical,
    MedBay,
    Navigation,
    Reactor,
}

const HUB_NEIGHBORS: [Room; 3] = [Room::Electrical, Room::MedBay, Room::Navigation];
const SPOKE_NEIGHBORS: [Room; 2] = [Room::Cafeteria, Room::Reactor];

impl Room {
    pub const ALL: [Room; 5] = [
        Room::Cafeteria,
        Room::Electrical,
        Room::MedBay,
        Room::Navigation,
        Room::Reactor,
    ];

    /// Rooms reachable in a single move.
    pub const fn neighbors(self) -> &'static [Room] {
        match self {
            Room::Cafeteria | Room::Reactor => &HUB_NEIGHBORS,
            Room::Electrical | Room::MedBay | Room::Navigation => &SPOKE_NEIGHBORS,
        }
    }

    #[inline]
    pub fn is_adjacent(self, other: Room) -> bool {
        self.neighbors().contains(&other)
    }

    #[inline]
    pub const fn is_hub(self) -> bool {
        matches!(self, Room::Cafeteria | Room::Reactor)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Room::Cafeteria => "cafeteria",
            Room::Electrical => "electrical",
            Room::MedBay => "med_bay",
            Room::Navigation => "navigation",
            Room::Reactor => "reactor",
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Room {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Room::ALL
            .into_iter()
            .find(|room| room.as_str() == normalized || room.as_str().replace('_', "") == normalized)
            .ok_or_else(|| DomainError::validation(ValidationKind::InvalidRoom, format!("unknown room '{s}'")))
    }
}
