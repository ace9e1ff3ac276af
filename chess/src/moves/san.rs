//! Utilities to work with moves in minimal SAN format
//!
//! Minimal SAN consists of the piece letter (omitted for pawns), the capture sign `x` and the
//! destination square, for example `Nf3`, `Bxc6` or `xd5`. Note that pawn captures don't contain
//! the source file, and there is no disambiguation or check marks.

use super::base::{self, ValidateError};
use super::uci;
use crate::board::Board;
use crate::legal;
use crate::types::{Color, Coord, CoordParseError, PieceKind};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing minimal SAN representation from string
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RawParseError {
    /// String is empty
    #[error("string is empty")]
    EmptyString,
    /// Destination cell is invalid
    #[error("invalid destination cell")]
    InvalidDst(#[from] CoordParseError),
    /// Parsing failed for unspecified reasons
    #[error("syntax error")]
    Syntax,
}

/// Error converting minimal SAN move into [`moves::Move`](super::Move)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum IntoMoveError {
    /// Resulting move is not legal
    #[error("invalid move: {0}")]
    Validate(#[from] ValidateError),
    /// Capture sign is put when the move is non-capture
    #[error("got capture sign on a non-capture move")]
    CaptureExpected,
    /// Cannot find a corresponding legal move
    #[error("no such move")]
    NotFound,
    /// The description is ambiguous
    #[error("ambiguous move (candidates are at least `{0}` and `{1}`)")]
    Ambiguous(uci::Move, uci::Move),
}

/// Error parsing minimal SAN into a legal [`moves::Move`](super::Move)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ParseError {
    /// Error parsing move
    #[error("cannot parse move: {0}")]
    Parse(#[from] RawParseError),
    /// Error converting the parsed move into a legal move
    #[error("cannot convert move: {0}")]
    Convert(#[from] IntoMoveError),
}

/// Minimal SAN formatting style
///
/// Note that only [`Style::Algebraic`] can be parsed back.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Style {
    /// Use capital Latin letters for pieces
    Algebraic,
    /// Use Unicode chess symbols for pieces
    Utf8,
}

trait PieceTheme {
    fn piece_to_char(kind: PieceKind) -> char;
}

struct Utf8Theme;

impl PieceTheme for Utf8Theme {
    fn piece_to_char(kind: PieceKind) -> char {
        match kind {
            PieceKind::Pawn => '♙',
            PieceKind::Knight => '♘',
            PieceKind::Bishop => '♗',
            PieceKind::Rook => '♖',
            PieceKind::Queen => '♕',
            PieceKind::King => '♔',
        }
    }
}

struct AlgebraicTheme;

impl PieceTheme for AlgebraicTheme {
    fn piece_to_char(kind: PieceKind) -> char {
        kind.as_char()
    }
}

/// Parsed minimal SAN move
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    /// Kind of the moving piece
    pub kind: PieceKind,
    /// Is the move capture?
    pub capture: bool,
    /// Destination square
    pub dst: Coord,
}

/// Wrapper to format [`Move`] with the given style
///
/// See [`Move::styled()`] doc for details.
pub struct StyledMove<'a>(&'a Move, Style);

impl Move {
    /// Returns the wrapper which helps to format the move with the given style `style`
    ///
    /// The resulting wrapper implements [`fmt::Display`], so can be used with
    /// `write!()`, `println!()`, or `ToString::to_string`.
    ///
    /// # Example
    ///
    /// ```
    /// # use tapchess::{moves::san, PieceKind};
    /// #
    /// let mv = san::Move {
    ///     kind: PieceKind::Queen,
    ///     capture: true,
    ///     dst: "d7".parse().unwrap(),
    /// };
    /// assert_eq!(mv.styled(san::Style::Algebraic).to_string(), "Qxd7");
    /// assert_eq!(mv.styled(san::Style::Utf8).to_string(), "♕xd7");
    /// ```
    #[inline]
    pub fn styled(&self, style: Style) -> StyledMove<'_> {
        StyledMove(self, style)
    }

    fn do_fmt<P: PieceTheme>(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if self.kind != PieceKind::Pawn {
            write!(f, "{}", P::piece_to_char(self.kind))?;
        }
        if self.capture {
            write!(f, "x")?;
        }
        write!(f, "{}", self.dst)
    }

    /// Creates the minimal SAN from move `mv` in position `b`
    pub fn from_move(mv: &base::Move, b: &Board) -> Move {
        Move {
            kind: mv.piece().kind(),
            capture: mv.is_capture(b),
            dst: mv.dst(),
        }
    }

    /// Converts the minimal SAN into a legal [`moves::Move`](super::Move) of side `side` in
    /// position `b`
    pub fn into_move(self, b: &Board, side: Color) -> Result<base::Move, IntoMoveError> {
        let mut found: Option<base::Move> = None;
        for piece in b.pieces_of(side) {
            if piece.kind() != self.kind || !legal::is_legal_move(piece, self.dst, b) {
                continue;
            }
            let mv = base::Move::new(*piece, self.dst);
            if let Some(prev) = found {
                return Err(IntoMoveError::Ambiguous(prev.uci(), mv.uci()));
            }
            found = Some(mv);
        }
        let mv = found.ok_or(IntoMoveError::NotFound)?;
        if self.capture && !mv.is_capture(b) {
            return Err(IntoMoveError::CaptureExpected);
        }
        mv.validate(b)?;
        Ok(mv)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.do_fmt::<AlgebraicTheme>(f)
    }
}

impl<'a> fmt::Display for StyledMove<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.1 {
            Style::Algebraic => self.0.do_fmt::<AlgebraicTheme>(f),
            Style::Utf8 => self.0.do_fmt::<Utf8Theme>(f),
        }
    }
}

impl FromStr for Move {
    type Err = RawParseError;

    fn from_str(s: &str) -> Result<Move, Self::Err> {
        let mut chars = s.chars().peekable();
        let first = *chars.peek().ok_or(RawParseError::EmptyString)?;
        let kind = match first {
            'N' | 'B' | 'R' | 'Q' | 'K' => {
                chars.next();
                PieceKind::from_char(first).ok_or(RawParseError::Syntax)?
            }
            _ => PieceKind::Pawn,
        };
        let capture = matches!(chars.peek(), Some('x' | ':'));
        if capture {
            chars.next();
        }
        let rest: String = chars.collect();
        if rest.is_empty() {
            return Err(RawParseError::Syntax);
        }
        let dst = Coord::from_str(&rest)?;
        Ok(Move { kind, capture, dst })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    #[test]
    fn test_simple() {
        let mut b = Board::initial();
        let mut side = Color::White;
        for (mv_str, placement) in [
            ("e4", "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR"),
            ("Nc6", "r1bqkbnr/pppppppp/2n5/8/4P3/8/PPPP1PPP/RNBQKBNR"),
            ("Nf3", "r1bqkbnr/pppppppp/2n5/8/4P3/5N2/PPPP1PPP/RNBQKB1R"),
            ("e5", "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R"),
            ("Bb5", "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R"),
            ("Nf6", "r1bqkb1r/pppp1ppp/2n2n2/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R"),
            ("Bxc6", "r1bqkb1r/pppp1ppp/2B2n2/4p3/4P3/5N2/PPPP1PPP/RNBQK2R"),
        ] {
            let mv = base::Move::from_san(mv_str, &b, side).unwrap();
            assert_eq!(mv.san(&b).to_string(), mv_str);
            let (next, _) = mv.make(&b).unwrap();
            assert_eq!(next.as_placement(), placement);
            b = next;
            side = side.inv();
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            Move::from_str("Nf3"),
            Ok(Move {
                kind: PieceKind::Knight,
                capture: false,
                dst: coord("f3"),
            })
        );
        assert_eq!(
            Move::from_str("xd5"),
            Ok(Move {
                kind: PieceKind::Pawn,
                capture: true,
                dst: coord("d5"),
            })
        );
        assert_eq!(
            Move::from_str("K:e2"),
            Ok(Move {
                kind: PieceKind::King,
                capture: true,
                dst: coord("e2"),
            })
        );
        assert_eq!(Move::from_str(""), Err(RawParseError::EmptyString));
        assert_eq!(Move::from_str("Nx"), Err(RawParseError::Syntax));
        assert_eq!(
            Move::from_str("Nf9"),
            Err(RawParseError::InvalidDst(CoordParseError::UnexpectedRankChar('9')))
        );
        assert_eq!(
            Move::from_str("Nbd2"),
            Err(RawParseError::InvalidDst(CoordParseError::BadLength))
        );
    }

    #[test]
    fn test_into_move_errors() {
        let b = Board::initial();
        assert_eq!(
            base::Move::from_san("Nd4", &b, Color::White),
            Err(ParseError::Convert(IntoMoveError::NotFound))
        );
        assert_eq!(
            base::Move::from_san("Nxf3", &b, Color::White),
            Err(ParseError::Convert(IntoMoveError::CaptureExpected))
        );

        let b = Board::from_placement("4k3/8/8/8/8/8/8/1N2KN2").unwrap();
        let res = base::Move::from_san("Nd2", &b, Color::White);
        assert!(matches!(
            res,
            Err(ParseError::Convert(IntoMoveError::Ambiguous(_, _)))
        ));

        // Pawn captures don't name the file, so two pawns can compete for one square
        let b = Board::from_placement("4k3/8/8/3p4/2P1P3/8/8/4K3").unwrap();
        let res = base::Move::from_san("xd5", &b, Color::White);
        assert!(matches!(
            res,
            Err(ParseError::Convert(IntoMoveError::Ambiguous(_, _)))
        ));
    }

    #[test]
    fn test_styles() {
        let b = Board::from_placement("4k3/8/8/3p4/4P3/8/8/4K3").unwrap();
        let mv = base::Move::from_uci("e4d5", &b).unwrap();
        let san = mv.san(&b);
        assert_eq!(san.to_string(), "xd5");
        assert_eq!(san.styled(Style::Utf8).to_string(), "xd5");

        let mv = base::Move::from_uci("e8e7", &b).unwrap();
        assert_eq!(mv.san(&b).styled(Style::Utf8).to_string(), "♔e7");
    }
}
