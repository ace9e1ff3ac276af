use super::{san, uci};
use crate::board::{self, Board};
use crate::legal;
use crate::types::{Color, Coord, Piece, PieceId};

use std::fmt;

use thiserror::Error;

/// Move output style
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Style {
    /// Output in minimal SAN format, with capital Latin letters for pieces
    San,
    /// Output in minimal SAN format, with Unicode chess symbols for pieces
    SanUtf8,
    /// Output in UCI format
    Uci,
}

/// Chess move
///
/// The move holds a snapshot of the moving piece, so it is bound to the position it was
/// created in. A move is _legal_ if the snapshot matches the piece on the board and the piece can
/// legally move to the destination (see [`legal::is_legal_move()`]). A legal move is _safe_ if
/// it doesn't leave the own king attacked.
///
/// # Example
///
/// ```
/// # use tapchess::{moves::Style, Board, Move};
/// #
/// let b = Board::initial();
/// let mv = Move::from_uci("g1f3", &b).unwrap();
/// assert_eq!(mv.styled(&b, Style::Uci).to_string(), "g1f3");
/// assert_eq!(mv.styled(&b, Style::San).to_string(), "Nf3");
/// assert_eq!(mv.styled(&b, Style::SanUtf8).to_string(), "♘f3");
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    piece: Piece,
    dst: Coord,
}

/// Error indicating that move is invalid
#[derive(Debug, Copy, Clone, Error, PartialEq, Eq, Hash)]
pub enum ValidateError {
    /// The moving piece is not on the board in the given state
    #[error("piece is not on the board")]
    NoPiece,
    /// Move doesn't follow the movement rules
    #[error("move is not legal")]
    NotLegal,
    /// Move leaves the own king attacked
    #[error("move leaves the king attacked")]
    KingAttacked,
}

/// Error indicating that a move record doesn't match the board it is undone on
#[derive(Debug, Copy, Clone, Error, PartialEq, Eq, Hash)]
pub enum UndoError {
    /// Source square in the record differs from the snapshot of the moving piece
    #[error("record source {0} doesn't match the moved piece")]
    BadSource(Coord),
    /// The moved piece is on the board, but not on the destination square
    #[error("piece {0} is not on square {1}")]
    Misplaced(PieceId, Coord),
    /// Putting the pieces back would break the board invariants
    #[error("cannot restore the position: {0}")]
    Restore(#[from] board::ValidateError),
}

impl Move {
    /// Creates a move of `piece` to square `dst`
    ///
    /// The move is not validated.
    #[inline]
    pub const fn new(piece: Piece, dst: Coord) -> Move {
        Move { piece, dst }
    }

    /// Creates a move from the UCI string `s` if `b` is the position preceding this move
    ///
    /// The returned move is guaranteed to be legal, but not necessarily safe.
    pub fn from_uci(s: &str, b: &Board) -> Result<Move, uci::ParseError> {
        let mv = s.parse::<uci::Move>()?.into_move(b)?;
        mv.validate(b)?;
        Ok(mv)
    }

    /// Creates a move from the minimal SAN string `s` made by `side` in position `b`
    ///
    /// The returned move is guaranteed to be legal, but not necessarily safe.
    pub fn from_san(s: &str, b: &Board, side: Color) -> Result<Move, san::ParseError> {
        Ok(s.parse::<san::Move>()?.into_move(b, side)?)
    }

    /// Returns the snapshot of the moving piece
    #[inline]
    pub const fn piece(&self) -> &Piece {
        &self.piece
    }

    #[inline]
    pub const fn src(&self) -> Coord {
        self.piece.coord
    }

    #[inline]
    pub const fn dst(&self) -> Coord {
        self.dst
    }

    /// Validates whether this move is legal in position `b`
    pub fn validate(&self, b: &Board) -> Result<(), ValidateError> {
        if b.get(self.piece.id) != Some(&self.piece) {
            return Err(ValidateError::NoPiece);
        }
        if !legal::is_legal_move(&self.piece, self.dst, b) {
            return Err(ValidateError::NotLegal);
        }
        Ok(())
    }

    /// Validates whether this move is legal and safe in position `b`
    pub fn validate_safe(&self, b: &Board) -> Result<(), ValidateError> {
        self.validate(b)?;
        if !legal::is_safe_move(&self.piece, self.dst, b) {
            return Err(ValidateError::KingAttacked);
        }
        Ok(())
    }

    #[inline]
    pub fn is_legal(&self, b: &Board) -> bool {
        self.validate(b).is_ok()
    }

    /// Returns `true` if the move captures a piece in position `b`
    #[inline]
    pub fn is_capture(&self, b: &Board) -> bool {
        b.piece_at(self.dst)
            .map_or(false, |p| p.id != self.piece.id)
    }

    /// Converts this move into a parsed UCI representation
    #[inline]
    pub fn uci(&self) -> uci::Move {
        (*self).into()
    }

    /// Converts this move into a minimal SAN representation in position `b`
    #[inline]
    pub fn san(&self, b: &Board) -> san::Move {
        san::Move::from_move(self, b)
    }

    /// Returns the wrapper which helps to format the move with the given style `style`
    ///
    /// The resulting wrapper implements [`fmt::Display`], so can be used with
    /// `write!()`, `println!()`, or `ToString::to_string`.
    pub fn styled(&self, b: &Board, style: Style) -> StyledMove {
        StyledMove(match style {
            Style::Uci => Styled::Uci(self.uci()),
            Style::San => Styled::San(self.san(b), san::Style::Algebraic),
            Style::SanUtf8 => Styled::San(self.san(b), san::Style::Utf8),
        })
    }

    /// Makes this move in position `b`, validating it first
    ///
    /// Returns the new position and the record which allows to undo the move.
    pub fn make(&self, b: &Board) -> Result<(Board, MoveRecord), ValidateError> {
        self.validate(b)?;
        Ok(self.make_unchecked(b))
    }

    /// Makes this move in position `b` without validation
    pub fn make_unchecked(&self, b: &Board) -> (Board, MoveRecord) {
        let (res, captured) = apply_move(b, &self.piece, self.dst);
        let record = MoveRecord {
            piece: self.piece,
            src: self.piece.coord,
            dst: self.dst,
            captured,
        };
        (res, record)
    }
}

impl fmt::Display for Move {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        fmt::Display::fmt(&self.uci(), f)
    }
}

enum Styled {
    Uci(uci::Move),
    San(san::Move, san::Style),
}

/// Wrapper to format the move with the given style
///
/// See [`Move::styled()`] doc for details.
pub struct StyledMove(Styled);

impl fmt::Display for StyledMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.0 {
            Styled::Uci(mv) => fmt::Display::fmt(&mv, f),
            Styled::San(mv, sty) => fmt::Display::fmt(&mv.styled(sty), f),
        }
    }
}

/// Entry of the move history
///
/// Contains everything needed to undo the move.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MoveRecord {
    /// Moving piece, as it was before the move
    pub piece: Piece,
    /// Source square
    pub src: Coord,
    /// Destination square
    pub dst: Coord,
    /// Captured piece, if any
    pub captured: Option<Piece>,
}

impl MoveRecord {
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Returns the move which produced this record
    #[inline]
    pub fn as_move(&self) -> Move {
        Move::new(self.piece, self.dst)
    }

    /// Converts the record into a minimal SAN representation
    #[inline]
    pub fn san(&self) -> san::Move {
        san::Move {
            kind: self.piece.kind(),
            capture: self.is_capture(),
            dst: self.dst,
        }
    }

    /// Returns the wrapper which helps to format the record with the given style `style`
    ///
    /// Unlike [`Move::styled()`], the position is not needed, as the record knows whether
    /// the move was a capture.
    pub fn styled(&self, style: Style) -> StyledMove {
        StyledMove(match style {
            Style::Uci => Styled::Uci(self.as_move().uci()),
            Style::San => Styled::San(self.san(), san::Style::Algebraic),
            Style::SanUtf8 => Styled::San(self.san(), san::Style::Utf8),
        })
    }
}

impl fmt::Display for MoveRecord {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        fmt::Display::fmt(&self.san(), f)
    }
}

/// Moves `piece` to square `dst` on board `b`
///
/// The piece found on `dst`, if any, is captured and returned along with the new board. The
/// moving piece is marked as moved. Legality is not checked, use [`Move::make()`] for that.
///
/// If `piece` is not on the board, the board is returned unchanged.
pub fn apply_move(b: &Board, piece: &Piece, dst: Coord) -> (Board, Option<Piece>) {
    let mut res = b.clone();
    if res.get(piece.id).is_none() {
        return (res, None);
    }
    let captured = match b.piece_at(dst) {
        Some(target) if target.id != piece.id => res.remove(target.id),
        _ => None,
    };
    if let Some(p) = res.get_mut(piece.id) {
        *p = p.moved_to(dst);
    }
    (res, captured)
}

/// Undoes the move described by `record` on board `b`
///
/// The moving piece is restored from its snapshot, including [`Piece::has_moved`], and the
/// captured piece is put back.
///
/// The record must describe the last move made on `b`. Otherwise an error is returned and no
/// board is produced.
pub fn undo_move(b: &Board, record: &MoveRecord) -> Result<Board, UndoError> {
    if record.piece.coord != record.src {
        return Err(UndoError::BadSource(record.src));
    }
    let mut res = b.clone();
    if let Some(p) = res.get(record.piece.id) {
        if p.coord != record.dst {
            return Err(UndoError::Misplaced(record.piece.id, record.dst));
        }
        res.remove(record.piece.id);
    }
    if let Some(captured) = record.captured {
        res.restore(captured)?;
    }
    res.restore(record.piece)?;
    Ok(res)
}
