use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, FromRepr};

use crate::board::MoveError;

#[rustfmt::skip]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, FromRepr, Display, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    pub(crate) const fn to_rank_file(self) -> (u8, u8) {
        (self as u8 / 8, self as u8 % 8)
    }

    pub(crate) const fn rank(self) -> u8 {
        self as u8 / 8
    }

    pub(crate) const fn file(self) -> u8 {
        self as u8 % 8
    }

    pub(crate) const fn from_u8(idx: u8) -> Square {
        match Square::from_repr(idx) {
            Some(sq) => sq,
            None => panic!("square out of bounds"),
        }
    }

    /// Offsets this square by `vector`, with off-board as an explicit
    /// `None` rather than a wrapped index.
    pub(crate) fn translate(self, vector: Vector) -> Option<Square> {
        let (rank, file) = self.to_rank_file();
        let rank = i16::from(rank) + i16::from(vector.rank);
        let file = i16::from(file) + i16::from(vector.file);
        if (0..8).contains(&rank) && (0..8).contains(&file) {
            Some(Square::from_u8((rank * 8 + file) as u8))
        } else {
            None
        }
    }

    /// Lowercase two-character coordinate, e.g. "e4".
    pub fn algebraic(self) -> String {
        let (rank, file) = self.to_rank_file();
        format!("{}{}", (b'a' + file) as char, rank + 1)
    }
}

impl FromStr for Square {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file_ch), Some(rank_ch), None) = (chars.next(), chars.next(), chars.next())
        else {
            return Err(MoveError::InvalidCoordinate(s.to_string()));
        };

        let file = match file_ch.to_ascii_lowercase() {
            ch @ 'a'..='h' => ch as u8 - b'a',
            _ => return Err(MoveError::InvalidCoordinate(s.to_string())),
        };
        let rank = match rank_ch {
            ch @ '1'..='8' => ch as u8 - b'1',
            _ => return Err(MoveError::InvalidCoordinate(s.to_string())),
        };

        Ok(Square::from_u8(rank * 8 + file))
    }
}

/// A (file, rank) displacement. Direction tables in `piece` are built
/// from these; sliders repeat a unit vector, steppers apply it once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Vector {
    pub(crate) file: i8,
    pub(crate) rank: i8,
}

impl Vector {
    pub(crate) const fn new(file: i8, rank: i8) -> Self {
        Self { file, rank }
    }
}
