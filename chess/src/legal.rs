//! Move legality
//!
//! A move is legal if it follows the movement rules of the piece and doesn't jump over other
//! pieces (except for knights). Legality doesn't take checks into account: a legal move can leave
//! the own king attacked. Use [`is_safe_move()`] to filter such moves out.

use crate::between;
use crate::board::Board;
use crate::geometry;
use crate::movegen;
use crate::moves;
use crate::types::{Coord, Piece, PieceKind};

fn is_pawn_move_legal(piece: &Piece, dst: Coord, b: &Board, dr: isize, dc: isize) -> bool {
    let dir = geometry::pawn_forward_delta(piece.color());
    let is_capture = b.is_occupied(dst);

    if dc == 0 && !is_capture {
        if dr == dir {
            return true;
        }
        if !piece.has_moved && dr == 2 * dir {
            return piece
                .coord
                .try_shift(dir, 0)
                .map_or(false, |mid| !b.is_occupied(mid));
        }
        return false;
    }

    dc.abs() == 1 && dr == dir && is_capture
}

/// Returns `true` if `piece` can move to `dst` on board `b`
///
/// The rules are checked in the following order:
///
/// - a piece cannot capture a piece of its own color
/// - the move must follow the movement pattern of the piece
/// - rooks, bishops and queens cannot jump over other pieces
///
/// Pawns move one square forward to an empty square, two squares forward from their
/// initial position if both squares are empty, and capture one square diagonally forward. There is
/// no en passant and no promotion.
///
/// Note that the king can "move" to its own square by the movement pattern, but such a move is
/// rejected as long as the king stands on the board, because the target is occupied by a piece of
/// the same color.
///
/// # Example
///
/// ```
/// # use tapchess::{legal, Board, Coord};
/// #
/// let b = Board::initial();
/// let knight = b.piece_at("g1".parse().unwrap()).unwrap();
/// assert!(legal::is_legal_move(knight, "f3".parse().unwrap(), &b));
/// assert!(!legal::is_legal_move(knight, "e2".parse().unwrap(), &b));
/// ```
pub fn is_legal_move(piece: &Piece, dst: Coord, b: &Board) -> bool {
    if let Some(target) = b.piece_at(dst) {
        if target.color() == piece.color() {
            return false;
        }
    }

    let src = piece.coord;
    let dr = dst.row() as isize - src.row() as isize;
    let dc = dst.col() as isize - src.col() as isize;

    match piece.kind() {
        PieceKind::Pawn => is_pawn_move_legal(piece, dst, b, dr, dc),
        PieceKind::Rook => between::is_line(src, dst) && between::is_clear(b, src, dst),
        PieceKind::Knight => matches!((dr.abs(), dc.abs()), (2, 1) | (1, 2)),
        PieceKind::Bishop => between::is_diag(src, dst) && between::is_clear(b, src, dst),
        PieceKind::Queen => {
            (between::is_line(src, dst) || between::is_diag(src, dst))
                && between::is_clear(b, src, dst)
        }
        PieceKind::King => dr.abs() <= 1 && dc.abs() <= 1,
    }
}

/// Same as [`is_legal_move()`], but accepts raw coordinates
///
/// Returns `false` if `(row, col)` lies outside the board.
pub fn is_legal_target(piece: &Piece, row: isize, col: isize, b: &Board) -> bool {
    Coord::try_from_row_col(row, col).map_or(false, |dst| is_legal_move(piece, dst, b))
}

/// Returns `true` if the move is legal and doesn't leave the own king attacked
pub fn is_safe_move(piece: &Piece, dst: Coord, b: &Board) -> bool {
    if !is_legal_move(piece, dst, b) {
        return false;
    }
    let (after, _) = moves::apply_move(b, piece, dst);
    !movegen::is_in_check(&after, piece.color())
}
