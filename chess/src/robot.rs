//! Naive computer opponent
//!
//! The computer doesn't search: it takes its pieces in random order and plays the first legal
//! move it finds for them, scanning the destination squares row by row.

use crate::board::{Board, MAX_PIECES_PER_COLOR};
use crate::legal;
use crate::moves::Move;
use crate::types::{Color, Coord, Piece};

use arrayvec::ArrayVec;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// Selects a legal move for side `color`, or returns `None` if there is no legal move
///
/// # Example
///
/// ```
/// # use tapchess::{robot, Board, Color};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let b = Board::initial();
/// let mut rng = StdRng::seed_from_u64(42);
/// let mv = robot::select_move(&b, Color::Black, &mut rng).unwrap();
/// assert_eq!(mv.piece().color(), Color::Black);
/// assert!(mv.is_legal(&b));
/// ```
pub fn select_move<R: Rng + ?Sized>(b: &Board, color: Color, rng: &mut R) -> Option<Move> {
    select_move_by(b, color, rng, |_| true)
}

/// Same as [`select_move()`], but skips the legal moves rejected by `accept`
pub fn select_move_by<R, F>(b: &Board, color: Color, rng: &mut R, mut accept: F) -> Option<Move>
where
    R: Rng + ?Sized,
    F: FnMut(&Move) -> bool,
{
    let mut pieces: ArrayVec<Piece, MAX_PIECES_PER_COLOR> = b.pieces_of(color).copied().collect();
    pieces.shuffle(rng);
    for piece in &pieces {
        for dst in Coord::iter() {
            if !legal::is_legal_move(piece, dst, b) {
                continue;
            }
            let mv = Move::new(*piece, dst);
            if accept(&mv) {
                debug!("selected move {} for {}", mv, color);
                return Some(mv);
            }
        }
    }
    debug!("no move found for {}", color);
    None
}
