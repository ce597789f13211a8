use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::piece::{MovePattern, Piece, PieceError, Side};
use crate::square::{Square, Vector};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("invalid coordinate: got {0}")]
    InvalidCoordinate(String),

    #[error("no piece at {0}")]
    NoPieceAtSource(Square),

    #[error("piece at {0} belongs to {1}")]
    NotYourPiece(Square, Side),

    #[error("{1} is not reachable from {0}")]
    IllegalDestination(Square, Square),

    #[error("path {0} -> {1} is blocked")]
    PathBlocked(Square, Square),

    #[error("own piece at {0}")]
    FriendlyFire(Square),

    #[error("game is already terminated")]
    GameAlreadyTerminated,
}

/// Dense 8x8 board. Every square maps to a piece or empty; at most one
/// piece per square holds because `make_move` vacates the source before
/// writing the target.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(
    from = "Vec<(Piece, Side, Square)>",
    into = "Vec<(Piece, Side, Square)>"
)]
pub struct Board {
    squares: [Option<(Piece, Side)>; 64],
}

const BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

impl Board {
    pub fn empty() -> Self {
        Self {
            squares: [None; 64],
        }
    }

    /// Standard starting layout: pawns on ranks 2/7, back ranks
    /// R-N-B-Q-K-B-N-R mirrored between the sides.
    pub fn start() -> Self {
        let mut board = Board::empty();
        for (file, &piece) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            board.place(Square::from_u8(file), piece, Side::White);
            board.place(Square::from_u8(8 + file), Piece::Pawn, Side::White);
            board.place(Square::from_u8(6 * 8 + file), Piece::Pawn, Side::Black);
            board.place(Square::from_u8(7 * 8 + file), piece, Side::Black);
        }
        board
    }

    /// Builds a board from eight rank strings, rank 8 first, in the same
    /// character scheme `Display` renders: uppercase white, lowercase
    /// black, '.' empty. Intended for fixtures and collaborators
    /// restoring a rendered position.
    pub fn from_rows(rows: [&str; 8]) -> Result<Self, PieceError> {
        let mut board = Board::empty();
        for (row_idx, row) in rows.iter().enumerate() {
            let rank = 7 - row_idx as u8;
            for (file, ch) in row.chars().enumerate() {
                if ch == '.' {
                    continue;
                }
                let side = if ch.is_ascii_uppercase() {
                    Side::White
                } else {
                    Side::Black
                };
                let piece = Piece::try_from(ch.to_ascii_lowercase())?;
                board.place(Square::from_u8(rank * 8 + file as u8), piece, side);
            }
        }
        Ok(board)
    }

    pub fn is_piece_at(&self, square: Square) -> Option<(Piece, Side)> {
        self.squares[square as usize]
    }

    pub fn place(&mut self, square: Square, piece: Piece, side: Side) {
        self.squares[square as usize] = Some((piece, side));
    }

    pub fn remove_piece(&mut self, square: Square) -> Result<(), MoveError> {
        if self.squares[square as usize].take().is_none() {
            return Err(MoveError::NoPieceAtSource(square));
        }
        Ok(())
    }

    pub fn get_piece_locs(&self) -> ArrayVec<(Piece, Side, Square), 32> {
        let mut piece_locs = ArrayVec::new();
        for sq in Square::iter() {
            if let Some((piece, side)) = self.is_piece_at(sq) {
                piece_locs.push((piece, side, sq));
            }
        }
        piece_locs
    }

    /// Validates `src -> dest` for `mover` and applies it. On success
    /// returns the captured piece, if any, so the caller can detect a
    /// king capture. On error the board is untouched: every precondition
    /// is checked before any cell changes.
    pub fn make_move(
        &mut self,
        src: Square,
        dest: Square,
        mover: Side,
    ) -> Result<Option<(Piece, Side)>, MoveError> {
        self.check_move(src, dest, mover)?;

        let moving = self.squares[src as usize].take();
        let captured = self.squares[dest as usize].take();
        self.squares[dest as usize] = moving;
        Ok(captured)
    }

    /// Pure legality check, shared by `make_move` and the movable-target
    /// query. Failure order: source occupied, mover owns it, destination
    /// reachable per the piece's pattern, no friendly capture.
    pub fn check_move(&self, src: Square, dest: Square, mover: Side) -> Result<(), MoveError> {
        let (piece, side) = self
            .is_piece_at(src)
            .ok_or(MoveError::NoPieceAtSource(src))?;

        if side != mover {
            return Err(MoveError::NotYourPiece(src, side));
        }

        match piece.move_pattern() {
            MovePattern::Step(vectors) => {
                if !vectors.iter().any(|&v| src.translate(v) == Some(dest)) {
                    return Err(MoveError::IllegalDestination(src, dest));
                }
            }
            MovePattern::Slide(vectors) => self.check_slide(src, dest, vectors)?,
            MovePattern::Pawn => self.check_pawn(src, dest, side)?,
        }

        if let Some((_, dest_side)) = self.is_piece_at(dest) {
            if dest_side == mover {
                return Err(MoveError::FriendlyFire(dest));
            }
        }

        Ok(())
    }

    /// Every legal destination for the piece at `src`, recomputed fresh
    /// each call. A queen tops out at 27 targets on an open board.
    pub fn movable_targets(&self, src: Square, mover: Side) -> ArrayVec<Square, 27> {
        let mut targets = ArrayVec::new();
        for dest in Square::iter() {
            if self.check_move(src, dest, mover).is_ok() {
                targets.push(dest);
            }
        }
        targets
    }

    fn check_slide(&self, src: Square, dest: Square, vectors: &[Vector]) -> Result<(), MoveError> {
        for &vector in vectors {
            let mut blocked = false;
            let mut cursor = src.translate(vector);
            while let Some(sq) = cursor {
                if sq == dest {
                    // Occupancy of dest itself is the friendly-fire
                    // check's business, not path blocking.
                    if blocked {
                        return Err(MoveError::PathBlocked(src, dest));
                    }
                    return Ok(());
                }
                if self.is_piece_at(sq).is_some() {
                    blocked = true;
                }
                cursor = sq.translate(vector);
            }
        }
        Err(MoveError::IllegalDestination(src, dest))
    }

    fn check_pawn(&self, src: Square, dest: Square, side: Side) -> Result<(), MoveError> {
        let forward = side.pawn_forward();

        if src.translate(forward) == Some(dest) {
            if self.is_piece_at(dest).is_some() {
                return Err(MoveError::IllegalDestination(src, dest));
            }
            return Ok(());
        }

        let double = Vector::new(0, forward.rank * 2);
        if src.translate(double) == Some(dest) {
            if src.rank() != side.pawn_start_rank() {
                return Err(MoveError::IllegalDestination(src, dest));
            }
            let Some(mid) = src.translate(forward) else {
                return Err(MoveError::IllegalDestination(src, dest));
            };
            if self.is_piece_at(mid).is_some() || self.is_piece_at(dest).is_some() {
                return Err(MoveError::IllegalDestination(src, dest));
            }
            return Ok(());
        }

        if side.pawn_attacks().iter().any(|&v| src.translate(v) == Some(dest)) {
            // Diagonal onto an empty square is illegal; diagonal onto a
            // friendly piece falls through to the friendly-fire check.
            if self.is_piece_at(dest).is_none() {
                return Err(MoveError::IllegalDestination(src, dest));
            }
            return Ok(());
        }

        Err(MoveError::IllegalDestination(src, dest))
    }
}

impl From<Vec<(Piece, Side, Square)>> for Board {
    fn from(piece_locs: Vec<(Piece, Side, Square)>) -> Self {
        let mut board = Board::empty();
        for (piece, side, sq) in piece_locs {
            board.place(sq, piece, side);
        }
        board
    }
}

impl From<Board> for Vec<(Piece, Side, Square)> {
    fn from(board: Board) -> Self {
        board.get_piece_locs().into_iter().collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board_str = String::with_capacity(64 + 7);
        for rank in (0..8u8).rev() {
            for file in 0..8u8 {
                let ch = match self.is_piece_at(Square::from_u8(rank * 8 + file)) {
                    Some((p, Side::White)) => <Piece as Into<char>>::into(p).to_ascii_uppercase(),
                    Some((p, Side::Black)) => <Piece as Into<char>>::into(p),
                    None => '.',
                };
                board_str.push(ch);
            }
            if rank != 0 {
                board_str.push('\n');
            }
        }
        write!(f, "{}", board_str)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::Square::*;
    use test_case::test_case;
    use testresult::TestResult;

    #[test]
    fn test_display() {
        let got = Board::start();
        let want = "rnbqkbnr\npppppppp\n........\n........\n........\n........\nPPPPPPPP\nRNBQKBNR";

        assert_eq!(format!("{}", got), want);
    }

    #[test]
    fn test_start_layout() {
        let board = Board::start();
        for sq in Square::iter() {
            match sq.rank() {
                0 | 1 => {
                    let (_, side) = board.is_piece_at(sq).unwrap();
                    assert_eq!(side, Side::White);
                }
                6 | 7 => {
                    let (_, side) = board.is_piece_at(sq).unwrap();
                    assert_eq!(side, Side::Black);
                }
                _ => assert!(board.is_piece_at(sq).is_none()),
            }
        }
        assert_eq!(board.get_piece_locs().len(), 32);
    }

    #[test]
    fn test_from_rows_matches_start() -> TestResult {
        let board = Board::from_rows([
            "rnbqkbnr", "pppppppp", "........", "........", "........", "........", "PPPPPPPP",
            "RNBQKBNR",
        ])?;
        assert_eq!(board, Board::start());
        Ok(())
    }

    #[test_case(Board::start(), D2, D4 ; "pawn double step")]
    #[test_case(Board::start(), B1, C3 ; "knight jump")]
    fn test_make_move(mut board: Board, src: Square, dest: Square) -> TestResult {
        let count_before = board.get_piece_locs().len();

        let captured = board.make_move(src, dest, Side::White)?;

        assert!(captured.is_none());
        assert!(board.is_piece_at(src).is_none());
        assert!(board.is_piece_at(dest).is_some());
        assert_eq!(board.get_piece_locs().len(), count_before);
        Ok(())
    }

    #[test]
    fn test_make_move_capture() -> TestResult {
        let mut board = Board::from_rows([
            "........", "........", "........", "...p....", "........", "........", "........",
            "...R....",
        ])?;

        let captured = board.make_move(D1, D5, Side::White)?;

        assert_eq!(captured, Some((Piece::Pawn, Side::Black)));
        assert_eq!(board.get_piece_locs().len(), 1);
        assert_eq!(board.is_piece_at(D5), Some((Piece::Rook, Side::White)));
        Ok(())
    }

    #[test_case(E4, E5, MoveError::NoPieceAtSource(E4) ; "empty source")]
    #[test_case(E7, E5, MoveError::NotYourPiece(E7, Side::Black) ; "opponents piece")]
    #[test_case(A2, A5, MoveError::IllegalDestination(A2, A5) ; "pawn triple step")]
    #[test_case(C1, A3, MoveError::PathBlocked(C1, A3) ; "bishop through pawn")]
    #[test_case(A1, A4, MoveError::PathBlocked(A1, A4) ; "rook through pawn")]
    #[test_case(A1, A2, MoveError::FriendlyFire(A2) ; "rook onto own pawn")]
    #[test_case(B1, D2, MoveError::FriendlyFire(D2) ; "knight onto own pawn")]
    fn test_make_move_rejected(src: Square, dest: Square, want: MoveError) {
        let mut board = Board::start();
        let before = board.clone();

        let got = board.make_move(src, dest, Side::White);

        assert_eq!(got, Err(want));
        assert_eq!(board, before);
    }

    #[test]
    fn test_slide_blocked_regardless_of_target_occupancy() -> TestResult {
        // White rook on a1, white pawn a2, black pawn a4: both a3 (empty
        // target) and a4 (enemy target) are behind the blocker.
        let board = Board::from_rows([
            "........", "........", "........", "........", "p.......", "........", "P.......",
            "R.......",
        ])?;

        assert_eq!(
            board.check_move(A1, A3, Side::White),
            Err(MoveError::PathBlocked(A1, A3))
        );
        assert_eq!(
            board.check_move(A1, A4, Side::White),
            Err(MoveError::PathBlocked(A1, A4))
        );
        Ok(())
    }

    #[test]
    fn test_pawn_double_step_needs_both_squares_empty() -> TestResult {
        let blocked_mid = Board::from_rows([
            "........", "........", "........", "........", "........", "n.......", "P.......",
            "........",
        ])?;
        assert_eq!(
            blocked_mid.check_move(A2, A4, Side::White),
            Err(MoveError::IllegalDestination(A2, A4))
        );

        let blocked_dest = Board::from_rows([
            "........", "........", "........", "........", "n.......", "........", "P.......",
            "........",
        ])?;
        assert_eq!(
            blocked_dest.check_move(A2, A4, Side::White),
            Err(MoveError::IllegalDestination(A2, A4))
        );
        Ok(())
    }

    #[test]
    fn test_pawn_double_step_only_from_start_rank() -> TestResult {
        let mut board = Board::start();
        board.make_move(A2, A3, Side::White)?;

        assert_eq!(
            board.check_move(A3, A5, Side::White),
            Err(MoveError::IllegalDestination(A3, A5))
        );
        Ok(())
    }

    #[test]
    fn test_pawn_forward_cannot_capture() -> TestResult {
        let board = Board::from_rows([
            "........", "........", "........", "........", "........", "p.......", "P.......",
            "........",
        ])?;
        assert_eq!(
            board.check_move(A2, A3, Side::White),
            Err(MoveError::IllegalDestination(A2, A3))
        );
        Ok(())
    }

    #[test]
    fn test_pawn_diagonal() -> TestResult {
        let board = Board::from_rows([
            "........", "........", "........", "........", "........", ".p......", "..P.....",
            "........",
        ])?;

        // onto an enemy piece: legal capture
        assert!(board.check_move(C2, B3, Side::White).is_ok());
        // onto an empty square: rejected
        assert_eq!(
            board.check_move(C2, D3, Side::White),
            Err(MoveError::IllegalDestination(C2, D3))
        );

        let friendly = Board::from_rows([
            "........", "........", "........", "........", "........", ".N......", "..P.....",
            "........",
        ])?;
        assert_eq!(
            friendly.check_move(C2, B3, Side::White),
            Err(MoveError::FriendlyFire(B3))
        );
        Ok(())
    }

    #[test]
    fn test_black_pawn_moves_toward_rank_one() -> TestResult {
        let mut board = Board::start();

        assert_eq!(
            board.check_move(E7, E8, Side::Black),
            Err(MoveError::IllegalDestination(E7, E8))
        );

        board.make_move(E7, E5, Side::Black)?;
        assert_eq!(board.is_piece_at(E5), Some((Piece::Pawn, Side::Black)));
        Ok(())
    }

    #[test]
    fn test_movable_targets_start_board() {
        let board = Board::start();

        assert_eq!(board.movable_targets(B1, Side::White).as_slice(), [A3, C3]);
        assert_eq!(board.movable_targets(D2, Side::White).as_slice(), [D3, D4]);
        assert!(board.movable_targets(D1, Side::White).is_empty());
        // querying an empty or enemy square yields no targets
        assert!(board.movable_targets(E4, Side::White).is_empty());
        assert!(board.movable_targets(E7, Side::White).is_empty());
    }

    #[test]
    fn test_queen_open_board_targets() -> TestResult {
        let board = Board::from_rows([
            "........", "........", "........", "...Q....", "........", "........", "........",
            "........",
        ])?;
        assert_eq!(board.movable_targets(D5, Side::White).len(), 27);
        Ok(())
    }

    #[test]
    fn test_remove_piece() {
        let mut board = Board::start();

        assert!(board.remove_piece(E2).is_ok());
        assert!(board.is_piece_at(E2).is_none());
        assert_eq!(
            board.remove_piece(E2),
            Err(MoveError::NoPieceAtSource(E2))
        );
    }

    #[test]
    fn test_piece_locs_round_trip() {
        let board = Board::start();
        let locs: Vec<(Piece, Side, Square)> = board.clone().into();
        assert_eq!(Board::from(locs), board);
    }
}
