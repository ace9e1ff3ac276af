//! Squares lying between two squares on a line or a diagonal

use crate::board::Board;
use crate::types::Coord;

/// Iterator over the squares strictly between two aligned squares
///
/// Created by [`strict()`].
#[derive(Debug, Clone)]
pub struct Between {
    cur: Coord,
    dst: Coord,
    step: (isize, isize),
}

impl Iterator for Between {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if self.cur == self.dst {
            return None;
        }
        let next = self.cur.try_shift(self.step.0, self.step.1)?;
        self.cur = next;
        if next == self.dst {
            return None;
        }
        Some(next)
    }
}

#[inline]
fn delta(src: Coord, dst: Coord) -> (isize, isize) {
    (
        dst.row() as isize - src.row() as isize,
        dst.col() as isize - src.col() as isize,
    )
}

/// Returns `true` if `src` and `dst` share a row or a column
#[inline]
pub fn is_line(src: Coord, dst: Coord) -> bool {
    let (dr, dc) = delta(src, dst);
    (dr == 0) != (dc == 0)
}

/// Returns `true` if `src` and `dst` share a diagonal
#[inline]
pub fn is_diag(src: Coord, dst: Coord) -> bool {
    let (dr, dc) = delta(src, dst);
    dr != 0 && dr.abs() == dc.abs()
}

/// Returns the squares strictly between `src` and `dst`, excluding both ends
///
/// Returns `None` if the squares are neither on one line nor on one diagonal.
pub fn strict(src: Coord, dst: Coord) -> Option<Between> {
    if src != dst && !is_line(src, dst) && !is_diag(src, dst) {
        return None;
    }
    let (dr, dc) = delta(src, dst);
    Some(Between {
        cur: src,
        dst,
        step: (dr.signum(), dc.signum()),
    })
}

/// Returns `true` if no piece stands strictly between `src` and `dst`
///
/// The squares must be aligned, otherwise `false` is returned. Occupancy of `src` and `dst`
/// themselves is not considered.
pub fn is_clear(b: &Board, src: Coord, dst: Coord) -> bool {
    match strict(src, dst) {
        Some(mut squares) => squares.all(|c| !b.is_occupied(c)),
        None => false,
    }
}
