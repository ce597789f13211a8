pub mod board;
pub mod game;
pub mod piece;
pub mod score;
pub mod square;

pub use board::{Board, MoveError};
pub use game::{Game, GameSnapshot, Status};
pub use piece::{Piece, Side};
pub use score::{MaterialScorer, ScorePosition, ScoreSheet, MATERIAL_SCORER};
pub use square::Square;
