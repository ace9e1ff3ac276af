use crate::types::{Color, PieceKind};

/// Pieces of the back row, from column 0 to column 7
pub const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

pub const fn back_row(c: Color) -> u8 {
    match c {
        Color::White => 7,
        Color::Black => 0,
    }
}

pub const fn pawn_row(c: Color) -> u8 {
    match c {
        Color::White => 6,
        Color::Black => 1,
    }
}

/// Row delta of a single pawn step
pub const fn pawn_forward_delta(c: Color) -> isize {
    match c {
        Color::White => -1,
        Color::Black => 1,
    }
}
