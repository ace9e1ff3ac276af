//! Moves, move records and their text representations

mod base;

pub mod san;
pub mod uci;

pub use base::{
    apply_move, undo_move, Move, MoveRecord, Style, StyledMove, UndoError, ValidateError,
};

pub type SanMove = san::Move;
pub type UciMove = uci::Move;
