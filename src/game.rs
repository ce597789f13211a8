use std::str::FromStr;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::board::{Board, MoveError};
use crate::piece::{Piece, Side};
use crate::square::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Status {
    InProgress,
    /// `winner` is recorded on king capture; administrative termination
    /// leaves it `None` because the core never observed a win.
    Terminated { winner: Option<Side> },
}

impl Status {
    pub fn is_terminated(&self) -> bool {
        matches!(self, Status::Terminated { .. })
    }
}

/// One game: board, side to move, terminal status. The single entry
/// point the service layer drives; it owns its board exclusively and is
/// mutated by one caller at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    board: Board,
    to_move: Side,
    status: Status,
}

/// Read-only copy of game state for persistence or rendering.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub to_move: Side,
    pub status: Status,
}

impl Game {
    pub fn new() -> Self {
        Self {
            board: Board::start(),
            to_move: Side::White,
            status: Status::InProgress,
        }
    }

    /// Rehydrates a game from persisted state.
    pub fn from_parts(board: Board, to_move: Side, status: Status) -> Self {
        Self {
            board,
            to_move,
            status,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Side {
        self.to_move
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn winner(&self) -> Option<Side> {
        match self.status {
            Status::Terminated { winner } => winner,
            Status::InProgress => None,
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            to_move: self.to_move,
            status: self.status,
        }
    }

    /// Applies one move given as two-character coordinates ("e2", "e4").
    /// Rejections leave board, turn and status untouched. Capturing the
    /// enemy king terminates the game with the mover as winner and does
    /// not flip the turn; any other accepted move flips it.
    pub fn make_move(&mut self, src: &str, dest: &str) -> Result<(), MoveError> {
        if self.status.is_terminated() {
            return Err(MoveError::GameAlreadyTerminated);
        }

        let src = Square::from_str(src)?;
        let dest = Square::from_str(dest)?;

        let captured = self.board.make_move(src, dest, self.to_move)?;
        debug!(
            "{} moved {} -> {}",
            self.to_move,
            src.algebraic(),
            dest.algebraic()
        );

        if let Some((Piece::King, loser)) = captured {
            self.status = Status::Terminated {
                winner: Some(self.to_move),
            };
            info!("{} king captured, {} wins", loser, self.to_move);
            return Ok(());
        }

        self.to_move = self.to_move.opposite_side();
        Ok(())
    }

    /// Administrative termination (forfeit, abandonment). Records no
    /// winner; a status already holding one is left alone.
    pub fn terminate(&mut self) {
        if !self.status.is_terminated() {
            self.status = Status::Terminated { winner: None };
            info!("game terminated administratively");
        }
    }

    /// Legal destinations for the piece at `src`, as lowercase
    /// coordinates. An empty or opposing source simply has none.
    pub fn movable_positions(&self, src: &str) -> Result<Vec<String>, MoveError> {
        let src = Square::from_str(src)?;
        Ok(self
            .board
            .movable_targets(src, self.to_move)
            .into_iter()
            .map(Square::algebraic)
            .collect())
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}
