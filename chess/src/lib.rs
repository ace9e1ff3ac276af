//! # tapchess
//!
//! Move legality and game state engine for a casual chess game.
//!
//! The rules are simplified: there is no castling, en passant or promotion, and the game ends
//! when a king is captured rather than checkmated. The computer opponent plays the first legal
//! move it finds for a randomly chosen piece.
//!
//! The main entry point is [`Session`], which keeps the board, the side to move, the move
//! history and the outcome. Lower-level building blocks are available as well: [`legal`] checks
//! single moves, [`movegen`] enumerates moves and detects checks, and [`robot`] selects a move for
//! the computer.
//!
//! # Example
//!
//! ```
//! use tapchess::{Color, GameMode, Options, Session};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut session = Session::with_options(Options::default().with_mode(GameMode::HumanVsAi));
//! let mut rng = StdRng::seed_from_u64(1);
//!
//! session.select_at("g1".parse().unwrap()).unwrap();
//! session.move_piece("f3".parse().unwrap()).unwrap();
//! assert!(session.is_computer_turn());
//!
//! session.computer_move(&mut rng).unwrap();
//! assert_eq!(session.side(), Color::White);
//! assert_eq!(session.records().len(), 2);
//! ```

pub mod between;
pub mod board;
pub mod config;
pub mod legal;
pub mod movegen;
pub mod moves;
pub mod robot;
pub mod session;
pub mod types;

pub use tapchess_base::geometry;

pub use board::Board;
pub use config::{CheckPolicy, Options};
pub use moves::{Move, MoveRecord};
pub use session::{NumberPolicy, Rejection, Session};
pub use types::{Cell, Color, Coord, GameMode, Outcome, Piece, PieceId, PieceKind};
