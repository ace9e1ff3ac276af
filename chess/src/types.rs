//! Core chess types

pub use tapchess_base::types::{
    Cell, CellParseError, Color, ColorParseError, Coord, CoordParseError, PieceKind,
};

use std::fmt;

/// Stable identifier of a piece
///
/// The identifier is assigned once when the board is set up and never recomputed from the
/// piece position, so it can be used to track the piece across moves and undos. It is formed
/// by the piece color, the piece kind and the index of the piece among the pieces of the same
/// color and kind in the initial setup.
///
/// # Example
///
/// ```
/// # use tapchess::{Color, PieceId, PieceKind};
/// #
/// let id = PieceId::new(Color::White, PieceKind::Knight, 1);
/// assert_eq!(id.to_string(), "white-knight-1");
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PieceId {
    color: Color,
    kind: PieceKind,
    index: u8,
}

impl PieceId {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind, index: u8) -> PieceId {
        PieceId { color, kind, index }
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub const fn index(&self) -> u8 {
        self.index
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}-{}-{}", self.color, self.kind, self.index)
    }
}

/// Piece standing on the board
///
/// Pieces are values: moving a piece produces an updated copy, the original one stays
/// untouched. This makes a piece usable as a snapshot of its state before a move.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    /// Identifier of the piece
    pub id: PieceId,
    /// Square the piece stands on
    pub coord: Coord,
    /// Whether the piece has already moved
    ///
    /// Only pawns care about it, as it controls the double step.
    pub has_moved: bool,
}

impl Piece {
    /// Creates a piece which hasn't moved yet
    #[inline]
    pub const fn new(id: PieceId, coord: Coord) -> Piece {
        Piece {
            id,
            coord,
            has_moved: false,
        }
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.id.color
    }

    #[inline]
    pub const fn kind(&self) -> PieceKind {
        self.id.kind
    }

    #[inline]
    pub const fn cell(&self) -> Cell {
        Cell::from_parts(self.id.color, self.id.kind)
    }

    /// Returns a copy of the piece relocated to `dst` and marked as moved
    #[inline]
    pub const fn moved_to(self, dst: Coord) -> Piece {
        Piece {
            id: self.id,
            coord: dst,
            has_moved: true,
        }
    }
}

/// Who controls the pieces
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum GameMode {
    /// Two humans share the board
    #[default]
    HumanVsHuman,
    /// One side is played by the computer
    HumanVsAi,
}

/// Result of a finished game
///
/// The game ends when one of the kings is captured, there is no checkmate detection.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Outcome {
    /// Side whose king survived
    pub winner: Color,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let loser = self.winner.inv();
        write!(f, "{} wins by capturing the {} king", self.winner, loser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_id() {
        let id = PieceId::new(Color::Black, PieceKind::Pawn, 7);
        assert_eq!(id.color(), Color::Black);
        assert_eq!(id.kind(), PieceKind::Pawn);
        assert_eq!(id.index(), 7);
        assert_eq!(id.to_string(), "black-pawn-7");
    }

    #[test]
    fn test_moved_to() {
        let id = PieceId::new(Color::White, PieceKind::Rook, 0);
        let piece = Piece::new(id, Coord::from_row_col(7, 0));
        assert!(!piece.has_moved);

        let moved = piece.moved_to(Coord::from_row_col(4, 0));
        assert_eq!(moved.id, id);
        assert_eq!(moved.coord, Coord::from_row_col(4, 0));
        assert!(moved.has_moved);
        assert_eq!(moved.cell(), Cell::from_parts(Color::White, PieceKind::Rook));
    }

    #[test]
    fn test_outcome() {
        let outcome = Outcome {
            winner: Color::White,
        };
        assert_eq!(
            outcome.to_string(),
            "white wins by capturing the black king"
        );
    }
}
