//! D8 direction codes.
//!
//! Each scheme is a 9-symbol vocabulary: eight compass directions plus one
//! "no outflow" sentinel (sink, designated outlet).
use serde::{Deserialize, Serialize};

/// One of the eight D8 neighbours. Rows grow southward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum D8Direction {
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

impl D8Direction {
    /// Counter-clockwise from east.
    pub const ALL: [D8Direction; 8] = [
        D8Direction::East,
        D8Direction::NorthEast,
        D8Direction::North,
        D8Direction::NorthWest,
        D8Direction::West,
        D8Direction::SouthWest,
        D8Direction::South,
        D8Direction::SouthEast,
    ];

    /// (Δrow, Δcol) of the receiving neighbour.
    pub fn offset(self) -> (isize, isize) {
        match self {
            D8Direction::East => (0, 1),
            D8Direction::NorthEast => (-1, 1),
            D8Direction::North => (-1, 0),
            D8Direction::NorthWest => (-1, -1),
            D8Direction::West => (0, -1),
            D8Direction::SouthWest => (1, -1),
            D8Direction::South => (1, 0),
            D8Direction::SouthEast => (1, 1),
        }
    }

    pub fn is_diagonal(self) -> bool {
        let (dr, dc) = self.offset();
        dr != 0 && dc != 0
    }
}

/// Result of decoding a single raster value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outflow {
    To(D8Direction),
    None,
}

/// Code vocabulary of a direction raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionScheme {
    /// ArcGIS powers of two: 1=E 2=SE 4=S 8=SW 16=W 32=NW 64=N 128=NE, 0=none.
    #[default]
    Esri,
    /// 1=E 2=NE 3=N 4=NW 5=W 6=SW 7=S 8=SE, 0=none.
    Sequential,
    /// 0=E … 7=SE in the same order as `Sequential`, 8=none.
    Indexed,
}

impl DirectionScheme {
    /// Decode a raw value; `None` if it is not one of the scheme's 9 symbols.
    pub fn decode(self, code: i32) -> Option<Outflow> {
        use D8Direction::*;
        let dir = match self {
            DirectionScheme::Esri => match code {
                0 => return Some(Outflow::None),
                1 => East,
                2 => SouthEast,
                4 => South,
                8 => SouthWest,
                16 => West,
                32 => NorthWest,
                64 => North,
                128 => NorthEast,
                _ => return None,
            },
            DirectionScheme::Sequential => match code {
                0 => return Some(Outflow::None),
                1..=8 => D8Direction::ALL[(code - 1) as usize],
                _ => return None,
            },
            DirectionScheme::Indexed => match code {
                8 => return Some(Outflow::None),
                0..=7 => D8Direction::ALL[code as usize],
                _ => return None,
            },
        };
        Some(Outflow::To(dir))
    }

    /// Inverse of [`decode`](Self::decode).
    pub fn encode(self, outflow: Outflow) -> i32 {
        use D8Direction::*;
        match (self, outflow) {
            (DirectionScheme::Esri, Outflow::None) => 0,
            (DirectionScheme::Esri, Outflow::To(d)) => match d {
                East => 1,
                SouthEast => 2,
                South => 4,
                SouthWest => 8,
                West => 16,
                NorthWest => 32,
                North => 64,
                NorthEast => 128,
            },
            (DirectionScheme::Sequential, Outflow::None) => 0,
            (DirectionScheme::Sequential, Outflow::To(d)) => position(d) + 1,
            (DirectionScheme::Indexed, Outflow::None) => 8,
            (DirectionScheme::Indexed, Outflow::To(d)) => position(d),
        }
    }
}

fn position(d: D8Direction) -> i32 {
    D8Direction::ALL.iter().position(|&x| x == d).unwrap_or(0) as i32
}
