//! Utilities to work with moves in UCI format
//!
//! A UCI move is just a pair of squares, like `e2e4`. As there is no promotion, the optional
//! promotion suffix is not supported.

use super::base::{self, ValidateError};
use crate::board::Board;
use crate::types::{Coord, CoordParseError};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error creating a parsed UCI representation from string
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RawParseError {
    /// Bad string length
    #[error("bad string length")]
    BadLength,
    /// Bad source square
    #[error("bad source: {0}")]
    BadSrc(CoordParseError),
    /// Bad destination square
    #[error("bad destination: {0}")]
    BadDst(CoordParseError),
}

/// Error converting a parsed UCI move into [`moves::Move`](super::Move)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum IntoMoveError {
    /// There is no piece on the source square
    #[error("no piece on square {0}")]
    EmptySource(Coord),
}

/// Error parsing UCI into a legal [`moves::Move`](super::Move)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ParseError {
    /// Error parsing move
    #[error("cannot parse move: {0}")]
    Parse(#[from] RawParseError),
    /// Error converting the parsed move into a move
    #[error("cannot create move: {0}")]
    Create(#[from] IntoMoveError),
    /// Move is not legal
    #[error("invalid move: {0}")]
    Validate(#[from] ValidateError),
}

/// Parsed move in UCI format
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    /// Source square
    pub src: Coord,
    /// Destination square
    pub dst: Coord,
}

impl Move {
    /// Converts the UCI move into [`moves::Move`](super::Move) in position `b`
    ///
    /// The piece standing on the source square is taken as the moving piece. The resulting move
    /// is not validated.
    pub fn into_move(self, b: &Board) -> Result<base::Move, IntoMoveError> {
        let piece = b
            .piece_at(self.src)
            .ok_or(IntoMoveError::EmptySource(self.src))?;
        Ok(base::Move::new(*piece, self.dst))
    }
}

impl From<base::Move> for Move {
    #[inline]
    fn from(mv: base::Move) -> Move {
        Move {
            src: mv.src(),
            dst: mv.dst(),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)
    }
}

impl FromStr for Move {
    type Err = RawParseError;

    fn from_str(s: &str) -> Result<Move, Self::Err> {
        if s.len() != 4 || !s.is_ascii() {
            return Err(RawParseError::BadLength);
        }
        let src = Coord::from_str(&s[0..2]).map_err(RawParseError::BadSrc)?;
        let dst = Coord::from_str(&s[2..4]).map_err(RawParseError::BadDst)?;
        Ok(Move { src, dst })
    }
}
