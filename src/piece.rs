use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::square::Vector;

#[derive(thiserror::Error, Debug)]
pub enum PieceError {
    #[error("char -> piece: got {0}")]
    FromChar(char),
}

#[derive(Debug, PartialEq, Eq, EnumIter, Clone, Copy, Display, Hash, Deserialize, Serialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opposite_side(self) -> Side {
        if self == Side::White {
            Side::Black
        } else {
            Side::White
        }
    }

    /// Pawns advance toward the opposing back rank.
    pub(crate) const fn pawn_forward(self) -> Vector {
        match self {
            Side::White => Vector::new(0, 1),
            Side::Black => Vector::new(0, -1),
        }
    }

    pub(crate) const fn pawn_attacks(self) -> [Vector; 2] {
        match self {
            Side::White => [Vector::new(-1, 1), Vector::new(1, 1)],
            Side::Black => [Vector::new(-1, -1), Vector::new(1, -1)],
        }
    }

    /// Rank index a pawn starts on; the double step is only legal from here.
    pub(crate) const fn pawn_start_rank(self) -> u8 {
        match self {
            Side::White => 1,
            Side::Black => 6,
        }
    }
}

#[derive(Debug, PartialEq, Eq, EnumIter, Clone, Copy, Display, Hash, Deserialize, Serialize)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

const ROOK_VECTORS: [Vector; 4] = [
    Vector::new(1, 0),
    Vector::new(-1, 0),
    Vector::new(0, 1),
    Vector::new(0, -1),
];

const BISHOP_VECTORS: [Vector; 4] = [
    Vector::new(1, 1),
    Vector::new(1, -1),
    Vector::new(-1, 1),
    Vector::new(-1, -1),
];

const ROYAL_VECTORS: [Vector; 8] = [
    Vector::new(1, 0),
    Vector::new(-1, 0),
    Vector::new(0, 1),
    Vector::new(0, -1),
    Vector::new(1, 1),
    Vector::new(1, -1),
    Vector::new(-1, 1),
    Vector::new(-1, -1),
];

const KNIGHT_VECTORS: [Vector; 8] = [
    Vector::new(1, 2),
    Vector::new(2, 1),
    Vector::new(2, -1),
    Vector::new(1, -2),
    Vector::new(-1, -2),
    Vector::new(-2, -1),
    Vector::new(-2, 1),
    Vector::new(-1, 2),
];

/// How a piece type reaches its targets. Steppers apply each vector
/// once; sliders repeat a unit vector until blocked or off-board. Pawns
/// are asymmetric per side and handled by the board's pawn rules.
#[derive(Clone, Copy, Debug)]
pub(crate) enum MovePattern {
    Step(&'static [Vector]),
    Slide(&'static [Vector]),
    Pawn,
}

impl Piece {
    pub(crate) fn is_slider(&self) -> bool {
        match self {
            Piece::Pawn | Piece::Knight | Piece::King => false,
            Piece::Bishop | Piece::Rook | Piece::Queen => true,
        }
    }

    pub(crate) fn move_pattern(self) -> MovePattern {
        match self {
            Piece::Pawn => MovePattern::Pawn,
            Piece::Knight => MovePattern::Step(&KNIGHT_VECTORS),
            Piece::King => MovePattern::Step(&ROYAL_VECTORS),
            Piece::Bishop => MovePattern::Slide(&BISHOP_VECTORS),
            Piece::Rook => MovePattern::Slide(&ROOK_VECTORS),
            Piece::Queen => MovePattern::Slide(&ROYAL_VECTORS),
        }
    }
}

impl Into<char> for Piece {
    fn into(self) -> char {
        match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        }
    }
}

impl TryFrom<char> for Piece {
    type Error = PieceError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'p' => Ok(Piece::Pawn),
            'n' => Ok(Piece::Knight),
            'b' => Ok(Piece::Bishop),
            'r' => Ok(Piece::Rook),
            'q' => Ok(Piece::Queen),
            'k' => Ok(Piece::King),
            _ => Err(PieceError::FromChar(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use test_case::test_case;

    #[test_case(Piece::Bishop, true)]
    #[test_case(Piece::Rook, true)]
    #[test_case(Piece::Queen, true)]
    #[test_case(Piece::Pawn, false)]
    #[test_case(Piece::Knight, false)]
    #[test_case(Piece::King, false)]
    fn test_is_slider(piece: Piece, want: bool) {
        assert_eq!(piece.is_slider(), want);
    }

    #[test]
    fn test_move_pattern_matches_slider_split() {
        for piece in Piece::iter() {
            match piece.move_pattern() {
                MovePattern::Slide(_) => assert!(piece.is_slider()),
                MovePattern::Step(_) | MovePattern::Pawn => assert!(!piece.is_slider()),
            }
        }
    }

    #[test]
    fn test_pawn_directions_mirrored() {
        assert_eq!(Side::White.pawn_forward().rank, 1);
        assert_eq!(Side::Black.pawn_forward().rank, -1);
        for (white, black) in Side::White
            .pawn_attacks()
            .into_iter()
            .zip(Side::Black.pawn_attacks())
        {
            assert_eq!(white.file, black.file);
            assert_eq!(white.rank, -black.rank);
        }
    }

    #[test]
    fn test_piece_char_round_trip() {
        for piece in Piece::iter() {
            let ch: char = piece.into();
            assert_eq!(Piece::try_from(ch).unwrap(), piece);
        }
    }
}
