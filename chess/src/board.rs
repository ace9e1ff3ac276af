//! Board and related things

use crate::geometry;
use crate::movegen;
use crate::types::{Cell, Color, Coord, Piece, PieceId, PieceKind};

use std::fmt::{self, Display};
use std::str::FromStr;

use arrayvec::ArrayVec;
use thiserror::Error;

/// Maximum number of pieces of one color
pub const MAX_PIECES_PER_COLOR: usize = 16;

/// Board validation error
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq, Hash)]
pub enum ValidateError {
    /// Too many pieces of given color
    ///
    /// No more than 16 pieces of each color is allowed.
    #[error("too many pieces of color {0}")]
    TooManyPieces(Color),
    /// One of the sides has more than one king
    #[error("more than one king of color {0}")]
    TooManyKings(Color),
    /// Two pieces share the same identifier
    #[error("duplicate piece {0}")]
    DuplicateId(PieceId),
    /// Two pieces stand on the same square
    #[error("square {0} is occupied twice")]
    Occupied(Coord),
}

/// Error parsing the board from the piece placement part of FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PlacementParseError {
    /// Row is too large
    #[error("too many items in rank {0}")]
    RankOverflow(char),
    /// Row is too small
    #[error("not enough items in rank {0}")]
    RankUnderflow(char),
    /// Too many rows
    #[error("too many ranks")]
    Overflow,
    /// Not enough rows
    #[error("not enough ranks")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
    /// Placement was parsed, but the resulting board is invalid
    #[error("invalid position: {0}")]
    Valid(#[from] ValidateError),
}

/// Chess board
///
/// The board is a collection of pieces, each of them knows its own square. The order of the
/// pieces is irrelevant, and two boards are equal if they contain the same pieces.
///
/// The board upholds the following invariants:
///
/// - no square contains more than one piece
/// - piece identifiers are unique
/// - each side has at most 16 pieces and at most one king
///
/// Note that the kings are not required to be present, as capturing the king is how the game ends.
///
/// # Example
///
/// ```
/// # use tapchess::{Board, Color, Coord, Piece, PieceId, PieceKind};
/// #
/// let board = Board::from_pieces([
///     Piece::new(PieceId::new(Color::White, PieceKind::King, 0), Coord::from_row_col(6, 1)),
///     Piece::new(PieceId::new(Color::Black, PieceKind::King, 0), Coord::from_row_col(3, 3)),
/// ])
/// .unwrap();
///
/// assert_eq!(board.as_placement(), "8/8/8/3k4/8/8/1K6/8");
/// assert_eq!(board.piece_at("d5".parse().unwrap()).unwrap().kind(), PieceKind::King);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Board {
    pieces: ArrayVec<Piece, 32>,
}

impl Board {
    /// Returns a board without pieces
    #[inline]
    pub fn empty() -> Board {
        Board {
            pieces: ArrayVec::new(),
        }
    }

    /// Returns a board with the standard 32-piece setup
    ///
    /// Pawns are indexed by their column, other pieces are indexed from left to right.
    pub fn initial() -> Board {
        let mut res = Board::empty();
        for color in [Color::White, Color::Black] {
            let mut counts = [0_u8; PieceKind::COUNT];
            let row = geometry::back_row(color);
            for (col, kind) in geometry::BACK_ROW.into_iter().enumerate() {
                let id = PieceId::new(color, kind, counts[kind.index()]);
                counts[kind.index()] += 1;
                res.pieces
                    .push(Piece::new(id, Coord::from_row_col(row, col as u8)));
            }
            for col in 0..8 {
                let id = PieceId::new(color, PieceKind::Pawn, col);
                res.pieces.push(Piece::new(
                    id,
                    Coord::from_row_col(geometry::pawn_row(color), col),
                ));
            }
        }
        res
    }

    /// Builds a board from the given pieces, validating the invariants
    pub fn from_pieces<I>(pieces: I) -> Result<Board, ValidateError>
    where
        I: IntoIterator<Item = Piece>,
    {
        let mut res = Board::empty();
        let mut counts = [0_usize; 2];
        let mut kings = [0_usize; 2];
        for piece in pieces {
            if res.get(piece.id).is_some() {
                return Err(ValidateError::DuplicateId(piece.id));
            }
            if res.piece_at(piece.coord).is_some() {
                return Err(ValidateError::Occupied(piece.coord));
            }
            let color = piece.color();
            counts[color.index()] += 1;
            if counts[color.index()] > MAX_PIECES_PER_COLOR {
                return Err(ValidateError::TooManyPieces(color));
            }
            if piece.kind() == PieceKind::King {
                kings[color.index()] += 1;
                if kings[color.index()] > 1 {
                    return Err(ValidateError::TooManyKings(color));
                }
            }
            res.pieces.push(piece);
        }
        Ok(res)
    }

    /// Parses a board from the piece placement part of FEN
    ///
    /// Pieces get their indices in reading order, i.e. row by row from `a8`. Pawns which stand
    /// outside of their initial row are considered to be already moved.
    ///
    /// Does the same as [`Board::from_str`].
    pub fn from_placement(s: &str) -> Result<Board, PlacementParseError> {
        Board::from_str(s)
    }

    /// Converts the board into the piece placement part of FEN
    ///
    /// Does the same as `Board::to_string()`.
    #[inline]
    pub fn as_placement(&self) -> String {
        self.to_string()
    }

    /// Returns all the pieces in unspecified order
    #[inline]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Returns the piece on the square `c`, if any
    #[inline]
    pub fn piece_at(&self, c: Coord) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.coord == c)
    }

    /// Returns the piece with identifier `id`, if it is still on the board
    #[inline]
    pub fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    /// Returns the contents of the square `c`
    #[inline]
    pub fn cell(&self, c: Coord) -> Cell {
        self.piece_at(c).map_or(Cell::EMPTY, Piece::cell)
    }

    #[inline]
    pub fn is_occupied(&self, c: Coord) -> bool {
        self.piece_at(c).is_some()
    }

    /// Returns all the pieces of color `c`
    pub fn pieces_of(&self, c: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter().filter(move |p| p.color() == c)
    }

    /// Returns the king of color `c`, or `None` if it was captured
    #[inline]
    pub fn king(&self, c: Color) -> Option<&Piece> {
        self.pieces
            .iter()
            .find(|p| p.color() == c && p.kind() == PieceKind::King)
    }

    #[inline]
    pub fn has_king(&self, c: Color) -> bool {
        self.king(c).is_some()
    }

    /// Returns `true` if the king of color `c` is attacked by an opponent's piece
    ///
    /// See [`movegen::is_in_check`] for details.
    #[inline]
    pub fn is_check(&self, c: Color) -> bool {
        movegen::is_in_check(self, c)
    }

    /// Wraps the board to allow pretty-printing with the given style `Style`
    ///
    /// The resulting wrapper implements [`fmt::Display`], so can be used with
    /// `write!()`, `println!()`, or `ToString::to_string`.
    ///
    /// # Example
    ///
    /// ```
    /// # use tapchess::{Board, board::PrettyStyle};
    /// #
    /// let b = Board::initial();
    ///
    /// let res = r#"
    /// 8|rnbqkbnr
    /// 7|pppppppp
    /// 6|........
    /// 5|........
    /// 4|........
    /// 3|........
    /// 2|PPPPPPPP
    /// 1|RNBQKBNR
    /// -+--------
    ///  |abcdefgh
    /// "#;
    /// assert_eq!(b.pretty(PrettyStyle::Ascii).to_string().trim(), res.trim());
    /// ```
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { board: self, style }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.iter_mut().find(|p| p.id == id)
    }

    pub(crate) fn remove(&mut self, id: PieceId) -> Option<Piece> {
        let pos = self.pieces.iter().position(|p| p.id == id)?;
        Some(self.pieces.swap_remove(pos))
    }

    /// Puts a piece which was previously removed back to the board
    ///
    /// Fails and leaves the board untouched if the piece would break the board invariants.
    pub(crate) fn restore(&mut self, piece: Piece) -> Result<(), ValidateError> {
        if self.get(piece.id).is_some() {
            return Err(ValidateError::DuplicateId(piece.id));
        }
        if self.is_occupied(piece.coord) {
            return Err(ValidateError::Occupied(piece.coord));
        }
        let color = piece.color();
        if piece.kind() == PieceKind::King && self.has_king(color) {
            return Err(ValidateError::TooManyKings(color));
        }
        if self.pieces_of(color).count() >= MAX_PIECES_PER_COLOR {
            return Err(ValidateError::TooManyPieces(color));
        }
        self.pieces
            .try_push(piece)
            .map_err(|_| ValidateError::TooManyPieces(color))
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Board) -> bool {
        self.pieces.len() == other.pieces.len()
            && self
                .pieces
                .iter()
                .all(|p| other.get(p.id).map_or(false, |q| q == p))
    }
}

impl Eq for Board {}

impl FromStr for Board {
    type Err = PlacementParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        type Error = PlacementParseError;

        let rank_char = |row: usize| (b'8' - row as u8) as char;
        let mut col = 0_usize;
        let mut row = 0_usize;
        let mut counts = [[0_u8; PieceKind::COUNT]; 2];
        let mut pieces = Vec::new();
        for ch in s.chars() {
            match ch {
                '1'..='8' => {
                    let add = (ch as u8 - b'0') as usize;
                    if col + add > 8 {
                        return Err(Error::RankOverflow(rank_char(row)));
                    }
                    col += add;
                }
                '/' => {
                    if col < 8 {
                        return Err(Error::RankUnderflow(rank_char(row)));
                    }
                    row += 1;
                    col = 0;
                    if row >= 8 {
                        return Err(Error::Overflow);
                    }
                }
                _ => {
                    if col >= 8 {
                        return Err(Error::RankOverflow(rank_char(row)));
                    }
                    let cell = Cell::from_char(ch)
                        .filter(|c| c.is_occupied())
                        .ok_or(Error::UnexpectedChar(ch))?;
                    let (color, kind) = match (cell.color(), cell.kind()) {
                        (Some(color), Some(kind)) => (color, kind),
                        _ => return Err(Error::UnexpectedChar(ch)),
                    };
                    let counter = &mut counts[color.index()][kind.index()];
                    let coord = Coord::from_row_col(row as u8, col as u8);
                    let mut piece = Piece::new(PieceId::new(color, kind, *counter), coord);
                    *counter = counter.wrapping_add(1);
                    piece.has_moved =
                        kind == PieceKind::Pawn && coord.row() != geometry::pawn_row(color);
                    pieces.push(piece);
                    col += 1;
                }
            };
        }

        if col < 8 {
            return Err(Error::RankUnderflow(rank_char(row)));
        }
        if row < 7 {
            return Err(Error::Underflow);
        }

        Ok(Board::from_pieces(pieces)?)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for row in 0..8 {
            if row != 0 {
                write!(f, "/")?;
            }
            let mut empty = 0;
            for col in 0..8 {
                let cell = self.cell(Coord::from_row_col(row, col));
                if cell.is_empty() {
                    empty += 1;
                    continue;
                }
                if empty != 0 {
                    write!(f, "{}", empty)?;
                    empty = 0;
                }
                write!(f, "{}", cell)?;
            }
            if empty != 0 {
                write!(f, "{}", empty)?;
            }
        }
        Ok(())
    }
}

/// Style for [`Board::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Print pieces and frames as ASCII characters
    Ascii,
    /// Print pieces and frames as fancy Unicode characters
    Utf8,
}

/// Wrapper to pretty-print the board
///
/// See docs for [`Board::pretty()`] for more details.
pub struct Pretty<'a> {
    board: &'a Board,
    style: PrettyStyle,
}

trait StyleTable {
    const HORZ_FRAME: char;
    const VERT_FRAME: char;
    const ANGLE_FRAME: char;

    fn cell(c: Cell) -> char;

    fn fmt(b: &Board, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let mut cells = [Cell::EMPTY; Coord::COUNT];
        for p in b.pieces() {
            cells[p.coord.index()] = p.cell();
        }
        for row in 0..8 {
            let first = Coord::from_row_col(row, 0);
            write!(f, "{}{}", first.rank_char(), Self::VERT_FRAME)?;
            for col in 0..8 {
                write!(f, "{}", Self::cell(cells[Coord::from_row_col(row, col).index()]))?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", Self::HORZ_FRAME, Self::ANGLE_FRAME)?;
        for _ in 0..8 {
            write!(f, "{}", Self::HORZ_FRAME)?;
        }
        writeln!(f)?;
        write!(f, " {}", Self::VERT_FRAME)?;
        for col in 0..8 {
            write!(f, "{}", Coord::from_row_col(0, col).file_char())?;
        }
        writeln!(f)?;
        Ok(())
    }
}

struct AsciiStyleTable;
struct Utf8StyleTable;

impl StyleTable for AsciiStyleTable {
    const HORZ_FRAME: char = '-';
    const VERT_FRAME: char = '|';
    const ANGLE_FRAME: char = '+';

    fn cell(c: Cell) -> char {
        c.as_char()
    }
}

impl StyleTable for Utf8StyleTable {
    const HORZ_FRAME: char = '─';
    const VERT_FRAME: char = '│';
    const ANGLE_FRAME: char = '┼';

    fn cell(c: Cell) -> char {
        c.as_utf8_char()
    }
}

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.style {
            PrettyStyle::Ascii => AsciiStyleTable::fmt(self.board, f),
            PrettyStyle::Utf8 => Utf8StyleTable::fmt(self.board, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INI_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    fn coord(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    #[test]
    fn test_initial() {
        let b = Board::initial();
        assert_eq!(b.len(), 32);
        assert_eq!(b.to_string(), INI_PLACEMENT);
        assert_eq!(Board::from_placement(INI_PLACEMENT), Ok(b.clone()));
        assert!(b.pieces().iter().all(|p| !p.has_moved));
        assert_eq!(b.pieces_of(Color::White).count(), 16);
        assert_eq!(b.pieces_of(Color::Black).count(), 16);
    }

    #[test]
    fn test_initial_ids() {
        let b = Board::initial();
        let cases = [
            ("a1", PieceId::new(Color::White, PieceKind::Rook, 0)),
            ("h1", PieceId::new(Color::White, PieceKind::Rook, 1)),
            ("g1", PieceId::new(Color::White, PieceKind::Knight, 1)),
            ("d1", PieceId::new(Color::White, PieceKind::Queen, 0)),
            ("e1", PieceId::new(Color::White, PieceKind::King, 0)),
            ("c2", PieceId::new(Color::White, PieceKind::Pawn, 2)),
            ("b8", PieceId::new(Color::Black, PieceKind::Knight, 0)),
            ("f8", PieceId::new(Color::Black, PieceKind::Bishop, 1)),
            ("e8", PieceId::new(Color::Black, PieceKind::King, 0)),
            ("h7", PieceId::new(Color::Black, PieceKind::Pawn, 7)),
        ];
        for (sq, id) in cases {
            assert_eq!(b.piece_at(coord(sq)).unwrap().id, id, "square {}", sq);
            assert_eq!(b.get(id).unwrap().coord, coord(sq));
        }
        assert_eq!(b.piece_at(coord("e4")), None);
    }

    #[test]
    fn test_kings() {
        let b = Board::initial();
        assert_eq!(b.king(Color::White).unwrap().coord, coord("e1"));
        assert_eq!(b.king(Color::Black).unwrap().coord, coord("e8"));

        let b = Board::from_placement("8/8/8/3k4/8/8/8/8").unwrap();
        assert!(b.has_king(Color::Black));
        assert!(!b.has_king(Color::White));
    }

    #[test]
    fn test_placement_has_moved() {
        let b = Board::from_placement("4k3/8/8/8/4P3/8/3P4/4K3").unwrap();
        assert!(b.piece_at(coord("e4")).unwrap().has_moved);
        assert!(!b.piece_at(coord("d2")).unwrap().has_moved);
        assert!(!b.piece_at(coord("e1")).unwrap().has_moved);
    }

    #[test]
    fn test_placement_errors() {
        assert_eq!(
            Board::from_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP"),
            Err(PlacementParseError::Underflow)
        );
        assert_eq!(
            Board::from_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR/8"),
            Err(PlacementParseError::Overflow)
        );
        assert_eq!(
            Board::from_placement("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(PlacementParseError::RankOverflow('8'))
        );
        assert_eq!(
            Board::from_placement("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(PlacementParseError::RankUnderflow('7'))
        );
        assert_eq!(
            Board::from_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX"),
            Err(PlacementParseError::UnexpectedChar('X'))
        );
        assert_eq!(
            Board::from_placement("kk6/8/8/8/8/8/8/7K"),
            Err(PlacementParseError::Valid(ValidateError::TooManyKings(
                Color::Black
            )))
        );
        assert_eq!(
            Board::from_placement("k7/8/8/8/8/8/PPPPPPPP/PPPPPPPP/7K"),
            Err(PlacementParseError::Overflow)
        );
    }

    #[test]
    fn test_from_pieces_errors() {
        let king = PieceId::new(Color::White, PieceKind::King, 0);
        let rook = PieceId::new(Color::White, PieceKind::Rook, 0);
        assert_eq!(
            Board::from_pieces([
                Piece::new(king, coord("e1")),
                Piece::new(king, coord("e2")),
            ]),
            Err(ValidateError::DuplicateId(king))
        );
        assert_eq!(
            Board::from_pieces([
                Piece::new(king, coord("e1")),
                Piece::new(rook, coord("e1")),
            ]),
            Err(ValidateError::Occupied(coord("e1")))
        );

        let too_many = (0..17).map(|i| {
            Piece::new(
                PieceId::new(Color::Black, PieceKind::Pawn, i),
                Coord::from_index(i as usize),
            )
        });
        assert_eq!(
            Board::from_pieces(too_many),
            Err(ValidateError::TooManyPieces(Color::Black))
        );
    }

    #[test]
    fn test_eq_ignores_order() {
        let b = Board::initial();
        let reversed = Board::from_pieces(b.pieces().iter().rev().copied()).unwrap();
        assert_eq!(b, reversed);

        let mut moved = b.clone();
        let pawn = PieceId::new(Color::White, PieceKind::Pawn, 4);
        moved.get_mut(pawn).unwrap().coord = coord("e4");
        assert_ne!(b, moved);

        let mut removed = b.clone();
        let taken = removed.remove(pawn).unwrap();
        assert_ne!(b, removed);
        removed.restore(taken).unwrap();
        assert_eq!(b, removed);
    }

    #[test]
    fn test_restore_checks_invariants() {
        let mut b = Board::from_placement("4k3/8/8/8/8/8/8/4K3").unwrap();
        let before = b.clone();

        let rook = Piece::new(PieceId::new(Color::White, PieceKind::Rook, 0), coord("e1"));
        assert_eq!(b.restore(rook), Err(ValidateError::Occupied(coord("e1"))));

        let king = *b.piece_at(coord("e1")).unwrap();
        assert_eq!(b.restore(king), Err(ValidateError::DuplicateId(king.id)));

        let second_king = Piece::new(PieceId::new(Color::White, PieceKind::King, 1), coord("a1"));
        assert_eq!(
            b.restore(second_king),
            Err(ValidateError::TooManyKings(Color::White))
        );
        assert_eq!(b, before);

        let mut full = Board::initial();
        let extra = Piece::new(PieceId::new(Color::White, PieceKind::Queen, 5), coord("d4"));
        assert_eq!(
            full.restore(extra),
            Err(ValidateError::TooManyPieces(Color::White))
        );
        assert_eq!(full, Board::initial());
    }

    #[test]
    fn test_pretty_utf8() {
        let b = Board::from_placement("4k3/8/8/8/8/8/8/R3K3").unwrap();
        let res = r#"
8│....♚...
7│........
6│........
5│........
4│........
3│........
2│........
1│♖...♔...
─┼────────
 │abcdefgh
"#;
        assert_eq!(
            b.pretty(PrettyStyle::Utf8).to_string().trim(),
            res.trim()
        );
    }
}
