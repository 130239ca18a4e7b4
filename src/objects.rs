//! Объекты на карте: поселения и подземелья

use serde::{Deserialize, Serialize};

use crate::grid::Pos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapObjectKind {
    Settlement,
    Dungeon,
}

/// Можно ли (и нужно ли) подводить к объекту дорогу
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoadAffinity {
    MustConnect,
    MayConnect,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapObject {
    pub id: u32,
    pub kind: MapObjectKind,
    pub position: Pos,
}

impl MapObject {
    #[must_use]
    pub fn settlement(id: u32, position: Pos) -> Self {
        Self {
            id,
            kind: MapObjectKind::Settlement,
            position,
        }
    }

    #[must_use]
    pub fn dungeon(id: u32, position: Pos) -> Self {
        Self {
            id,
            kind: MapObjectKind::Dungeon,
            position,
        }
    }

    #[must_use]
    pub fn road_affinity(&self) -> RoadAffinity {
        match self.kind {
            MapObjectKind::Settlement => RoadAffinity::MustConnect,
            MapObjectKind::Dungeon => RoadAffinity::MayConnect,
        }
    }
}
