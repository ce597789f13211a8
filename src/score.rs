use std::fmt;

use strum::IntoEnumIterator;
use tabled::{Table, Tabled};

use crate::board::Board;
use crate::piece::{Piece, Side};

pub trait ScorePosition {
    fn score(&self, board: &Board, side: Side) -> f64;

    fn score_all(&self, board: &Board) -> ScoreSheet {
        ScoreSheet {
            white: self.score(board, Side::White),
            black: self.score(board, Side::Black),
        }
    }
}

/// Material count with the doubled-pawn penalty: every pawn sharing its
/// file with another friendly pawn counts half. Pure function of the
/// board, recomputed on every call.
#[derive(Clone, Copy)]
pub struct MaterialScorer;

impl ScorePosition for MaterialScorer {
    fn score(&self, board: &Board, side: Side) -> f64 {
        let mut pawns_per_file = [0u8; 8];
        for (piece, piece_side, sq) in board.get_piece_locs() {
            if piece_side == side && piece == Piece::Pawn {
                pawns_per_file[sq.file() as usize] += 1;
            }
        }

        let mut score = 0.0;
        for (piece, piece_side, sq) in board.get_piece_locs() {
            if piece_side != side {
                continue;
            }
            if piece == Piece::Pawn && pawns_per_file[sq.file() as usize] >= 2 {
                score += piece_value(Piece::Pawn) / 2.0;
            } else {
                score += piece_value(piece);
            }
        }
        score
    }
}

pub static MATERIAL_SCORER: MaterialScorer = MaterialScorer {};

fn piece_value(piece: Piece) -> f64 {
    match piece {
        Piece::Pawn => 1.0,
        Piece::Knight => 2.5,
        Piece::Bishop => 3.0,
        Piece::Rook => 5.0,
        Piece::Queen => 9.0,
        Piece::King => 0.0,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreSheet {
    pub white: f64,
    pub black: f64,
}

impl ScoreSheet {
    pub fn get(&self, side: Side) -> f64 {
        match side {
            Side::White => self.white,
            Side::Black => self.black,
        }
    }
}

#[derive(Tabled)]
struct ScoreRow {
    side: Side,
    material: f64,
}

/// Human-readable per-side score table.
pub struct ScoreReport {
    rows: Vec<ScoreRow>,
}

impl ScoreReport {
    pub fn new(board: &Board) -> Self {
        let rows = Side::iter()
            .map(|side| ScoreRow {
                side,
                material: MATERIAL_SCORER.score(board, side),
            })
            .collect();
        Self { rows }
    }
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Table::new(&self.rows))
    }
}
