//! Move generation and attack queries
//!
//! Everything here is built on top of [`legal::is_legal_move()`], so a square is considered
//! attacked by a piece if the piece can legally move there. In particular, a pawn attacks the
//! squares it can advance to, and a diagonal square only if it's occupied.

use crate::board::Board;
use crate::legal;
use crate::moves::Move;
use crate::types::{Color, Coord, Piece};

use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;

/// Maximum number of moves a side can have
///
/// Sixteen queens cannot have more than 432 moves in total.
pub const MAX_MOVES: usize = 512;

/// List of moves
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, MAX_MOVES>);

impl Deref for MoveList {
    type Target = ArrayVec<Move, MAX_MOVES>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = arrayvec::IntoIter<Move, MAX_MOVES>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

/// Returns `true` if square `coord` is attacked by any piece of color `by`
pub fn is_cell_attacked(b: &Board, coord: Coord, by: Color) -> bool {
    attackers(b, coord, by).next().is_some()
}

/// Returns all the pieces of color `by` which attack square `coord`
pub fn attackers(b: &Board, coord: Coord, by: Color) -> impl Iterator<Item = &Piece> + '_ {
    b.pieces_of(by)
        .filter(move |p| legal::is_legal_move(p, coord, b))
}

/// Returns `true` if the king of color `c` is attacked
///
/// If the king is absent, then it's not in check.
///
/// # Example
///
/// ```
/// # use tapchess::{movegen, Board, Color};
/// #
/// let b = Board::from_placement("4k3/8/8/8/8/8/8/4R1K1").unwrap();
/// assert!(movegen::is_in_check(&b, Color::Black));
/// assert!(!movegen::is_in_check(&b, Color::White));
/// ```
pub fn is_in_check(b: &Board, c: Color) -> bool {
    match b.king(c) {
        Some(king) => is_cell_attacked(b, king.coord, c.inv()),
        None => false,
    }
}

/// Returns all the squares where `piece` can legally move, in row-major order
pub fn gen_targets(piece: &Piece, b: &Board) -> ArrayVec<Coord, 64> {
    Coord::iter()
        .filter(|&c| legal::is_legal_move(piece, c, b))
        .collect()
}

/// Generates all the legal moves of color `c`
///
/// Moves are grouped by piece, in the order the board stores the pieces. Moves of each piece
/// go in row-major order of their destinations.
pub fn gen_all(b: &Board, c: Color) -> MoveList {
    let mut res = MoveList::new();
    for piece in b.pieces_of(c) {
        for dst in gen_targets(piece, b) {
            res.push(Move::new(*piece, dst));
        }
    }
    res
}

/// Returns `true` if color `c` has at least one legal move
pub fn has_legal_moves(b: &Board, c: Color) -> bool {
    b.pieces_of(c)
        .any(|p| Coord::iter().any(|dst| legal::is_legal_move(p, dst, b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;
    use std::collections::BTreeSet;
    use std::str::FromStr;

    fn coord(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    fn attacker_squares(b: &Board, s: &str, by: Color) -> BTreeSet<String> {
        attackers(b, coord(s), by)
            .map(|p| p.coord.to_string())
            .collect()
    }

    #[test]
    fn test_cell_attackers() {
        let b = Board::from_placement("3R3B/8/3R4/1NP1Q3/3p4/1NP5/5B2/3R1K1k").unwrap();
        assert!(is_cell_attacked(&b, coord("d4"), Color::White));
        assert_eq!(
            attacker_squares(&b, "d4", Color::White),
            BTreeSet::from(["d6", "b5", "e5", "b3", "c3", "f2", "d1"].map(String::from)),
        );
        assert!(!is_cell_attacked(&b, coord("d4"), Color::Black));

        let b = Board::from_placement("8/8/8/2KPk3/8/8/8/8").unwrap();
        assert_eq!(
            attacker_squares(&b, "d5", Color::Black),
            BTreeSet::from(["e5".to_string()]),
        );
        assert!(!is_cell_attacked(&b, coord("d5"), Color::White));
    }

    #[test]
    fn test_pawn_attacks() {
        let b = Board::from_placement("4k3/8/8/8/8/8/3P4/4K3").unwrap();
        assert!(!is_cell_attacked(&b, coord("e3"), Color::White));
        assert!(is_cell_attacked(&b, coord("d3"), Color::White));

        let b = Board::from_placement("4k3/8/8/8/8/4n3/3P4/4K3").unwrap();
        assert!(is_cell_attacked(&b, coord("e3"), Color::White));
    }

    #[test]
    fn test_check() {
        let b = Board::initial();
        assert!(!is_in_check(&b, Color::White));
        assert!(!is_in_check(&b, Color::Black));

        let b = Board::from_placement("4k3/8/8/8/8/2n5/8/4K3").unwrap();
        assert!(!is_in_check(&b, Color::White));
        let b = Board::from_placement("4k3/8/8/8/8/3n4/8/4K3").unwrap();
        assert!(is_in_check(&b, Color::White));
        assert!(b.is_check(Color::White));

        // Blocked slider
        let b = Board::from_placement("4k3/8/8/8/8/8/4N3/4R2K").unwrap();
        let b2 = Board::from_placement("4r3/8/8/8/8/8/4N3/4K3").unwrap();
        assert!(!is_in_check(&b, Color::Black));
        assert!(!is_in_check(&b2, Color::White));

        // Missing king
        let b = Board::from_placement("8/8/8/8/8/8/8/R3K3").unwrap();
        assert!(!is_in_check(&b, Color::Black));
    }

    #[test]
    fn test_gen_targets() {
        let b = Board::initial();
        let knight = b.piece_at(coord("g1")).unwrap();
        let targets: Vec<_> = gen_targets(knight, &b).iter().map(ToString::to_string).collect();
        assert_eq!(targets, vec!["f3", "h3"]);

        let rook = b.piece_at(coord("a1")).unwrap();
        assert!(gen_targets(rook, &b).is_empty());
    }

    #[test]
    fn test_gen_all_initial() {
        let b = Board::initial();
        for color in [Color::White, Color::Black] {
            let moves = gen_all(&b, color);
            assert_eq!(moves.len(), 20);
            assert!(moves.iter().all(|mv| mv.piece().color() == color));
            let knights = moves
                .iter()
                .filter(|mv| mv.piece().kind() == PieceKind::Knight)
                .count();
            assert_eq!(knights, 4);
            assert!(has_legal_moves(&b, color));
        }
    }

    #[test]
    fn test_no_legal_moves() {
        // The white king is boxed in by its own pawns, which are blocked themselves
        let b = Board::from_placement("PP6/PP6/PP6/PP6/PP6/PP6/PP6/KP5k").unwrap();
        assert!(!has_legal_moves(&b, Color::White));
        assert!(gen_all(&b, Color::White).is_empty());

        assert!(has_legal_moves(&b, Color::Black));

        let b = Board::from_placement("4k3/8/8/8/8/8/8/8").unwrap();
        assert!(!has_legal_moves(&b, Color::White));
        assert!(has_legal_moves(&b, Color::Black));
    }
}
