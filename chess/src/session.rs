//! Game session
//!
//! [`Session`] owns the board and everything around it: the side to move, the selected piece,
//! the move history, the outcome and the pending computer move. It's mutated only through its
//! operations. Each operation either succeeds or returns a [`Rejection`], in which case the
//! session stays exactly as it was.

use crate::board::Board;
use crate::config::Options;
use crate::legal;
use crate::moves::{self, Move, MoveRecord, Style, UndoError};
use crate::movegen;
use crate::robot;
use crate::types::{Color, Coord, GameMode, Outcome, Piece, PieceId};

use std::fmt;
use std::time::Instant;

use arrayvec::ArrayVec;
use log::{debug, trace};
use rand::Rng;
use thiserror::Error;

/// Reason why a session operation was rejected
#[derive(Debug, Copy, Clone, Error, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Piece is not on the board
    #[error("piece {0} is not on the board")]
    UnknownPiece(PieceId),
    /// No piece stands on the square
    #[error("no piece on square {0}")]
    EmptySquare(Coord),
    /// Piece of the given color cannot be moved now
    #[error("it's not {0}'s turn")]
    WrongTurn(Color),
    /// No piece is selected
    #[error("no piece selected")]
    NoSelection,
    /// Selected piece cannot move to the given square
    #[error("cannot move to {0}")]
    IllegalMove(Coord),
    /// Move to the given square leaves the own king attacked
    #[error("moving to {0} leaves the king attacked")]
    KingInCheck(Coord),
    /// There are no moves to undo
    #[error("no moves to undo")]
    EmptyHistory,
    /// The last move doesn't match the board
    #[error("cannot undo: {0}")]
    Undo(UndoError),
    /// The side to move is not played by the computer
    #[error("it's not the computer's turn")]
    NotComputerTurn,
    /// The game is already over
    #[error("game is over")]
    GameOver,
    /// The computer has no move to make
    #[error("no move found for the computer")]
    NoMoveFound,
}

/// Game session
///
/// # Example
///
/// ```
/// # use tapchess::{Color, Session};
/// #
/// let mut session = Session::new();
/// session.select_at("e2".parse().unwrap()).unwrap();
/// session.move_piece("e4".parse().unwrap()).unwrap();
/// assert_eq!(session.side(), Color::Black);
///
/// // Black cannot move white pieces
/// assert!(session.select_at("d2".parse().unwrap()).is_err());
///
/// session.undo_move().unwrap();
/// assert_eq!(session.side(), Color::White);
/// assert!(session.records().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    selected: Option<PieceId>,
    side: Color,
    start_side: Color,
    mode: GameMode,
    records: Vec<MoveRecord>,
    outcome: Option<Outcome>,
    options: Options,
    pending_ai: Option<Instant>,
    ai_stuck: bool,
}

impl Default for Session {
    fn default() -> Session {
        Session::new()
    }
}

impl Session {
    /// Creates a session with the standard setup and default options
    pub fn new() -> Session {
        Session::with_options(Options::default())
    }

    /// Creates a session with the standard setup
    pub fn with_options(options: Options) -> Session {
        Session::from_position(Board::initial(), Color::White, options)
    }

    /// Creates a session from an arbitrary position with side `side` to move
    ///
    /// If one of the kings is missing on `board`, the game is already over.
    pub fn from_position(board: Board, side: Color, options: Options) -> Session {
        let mut res = Session {
            board,
            selected: None,
            side,
            start_side: side,
            mode: options.mode,
            records: Vec::new(),
            outcome: None,
            options,
            pending_ai: None,
            ai_stuck: false,
        };
        res.on_board_changed();
        res
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[inline]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the selected piece
    #[inline]
    pub fn selected(&self) -> Option<&Piece> {
        self.selected.and_then(|id| self.board.get(id))
    }

    /// Returns all the moves made so far, oldest first
    #[inline]
    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    #[inline]
    pub fn winner(&self) -> Option<Color> {
        self.outcome.map(|o| o.winner)
    }

    /// Returns `true` if the side to move is played by the computer
    #[inline]
    pub fn is_computer_turn(&self) -> bool {
        self.mode == GameMode::HumanVsAi && self.side == self.options.ai_color
    }

    /// Returns the time when the pending computer move fires, if any
    #[inline]
    pub fn pending_computer_move(&self) -> Option<Instant> {
        self.pending_ai
    }

    /// Returns the squares where the selected piece can move
    ///
    /// The squares are filtered according to the check policy.
    pub fn legal_targets(&self) -> ArrayVec<Coord, 64> {
        let piece = match self.selected() {
            Some(piece) => piece,
            None => return ArrayVec::new(),
        };
        let policy = self.options.check_policy;
        movegen::gen_targets(piece, &self.board)
            .into_iter()
            .filter(|&dst| policy.allows(piece, dst, &self.board))
            .collect()
    }

    /// Returns the wrapper to display the move history, like `1. e4 e5 2. Nf3`
    #[inline]
    pub fn history(&self, policy: NumberPolicy) -> History<'_> {
        History {
            session: self,
            policy,
            style: Style::San,
        }
    }

    fn reject<T>(&self, r: Rejection) -> Result<T, Rejection> {
        trace!("rejected: {}", r);
        Err(r)
    }

    /// Selects the piece with identifier `id`, or clears the selection if `id` is `None`
    ///
    /// Only pieces of the side to move can be selected.
    pub fn select_piece(&mut self, id: Option<PieceId>) -> Result<(), Rejection> {
        let id = match id {
            Some(id) => id,
            None => {
                self.selected = None;
                return Ok(());
            }
        };
        let piece = match self.board.get(id) {
            Some(piece) => piece,
            None => return self.reject(Rejection::UnknownPiece(id)),
        };
        if piece.color() != self.side {
            return self.reject(Rejection::WrongTurn(piece.color()));
        }
        debug!("selected {} on {}", id, piece.coord);
        self.selected = Some(id);
        Ok(())
    }

    /// Selects the piece standing on square `coord`
    pub fn select_at(&mut self, coord: Coord) -> Result<(), Rejection> {
        match self.board.piece_at(coord) {
            Some(piece) => self.select_piece(Some(piece.id)),
            None => self.reject(Rejection::EmptySquare(coord)),
        }
    }

    fn check_move(&self, piece: &Piece, dst: Coord) -> Result<(), Rejection> {
        if !legal::is_legal_move(piece, dst, &self.board) {
            return self.reject(Rejection::IllegalMove(dst));
        }
        if !self.options.check_policy.allows(piece, dst, &self.board) {
            return self.reject(Rejection::KingInCheck(dst));
        }
        Ok(())
    }

    fn commit(&mut self, piece: Piece, dst: Coord) -> MoveRecord {
        let (board, record) = Move::new(piece, dst).make_unchecked(&self.board);
        self.board = board;
        self.records.push(record);
        self.selected = None;
        self.side = self.side.inv();
        debug!("{} played {} ({})", piece.color(), record, record.styled(Style::Uci));
        self.on_board_changed();
        record
    }

    /// Moves the selected piece to square `dst`
    ///
    /// On success, the selection is cleared and the turn passes to the other side. If the move
    /// is rejected, the selection is kept.
    pub fn move_piece(&mut self, dst: Coord) -> Result<MoveRecord, Rejection> {
        let piece = match self.selected() {
            Some(piece) => *piece,
            None => return self.reject(Rejection::NoSelection),
        };
        self.check_move(&piece, dst)?;
        Ok(self.commit(piece, dst))
    }

    /// Moves the piece from square `src` to square `dst`, ignoring the selection
    pub fn play_move(&mut self, src: Coord, dst: Coord) -> Result<MoveRecord, Rejection> {
        let piece = match self.board.piece_at(src) {
            Some(piece) => *piece,
            None => return self.reject(Rejection::EmptySquare(src)),
        };
        if piece.color() != self.side {
            return self.reject(Rejection::WrongTurn(piece.color()));
        }
        self.check_move(&piece, dst)?;
        Ok(self.commit(piece, dst))
    }

    /// Takes back the last move
    ///
    /// The moved piece is restored exactly as it was before the move, and the captured piece
    /// returns to the board.
    pub fn undo_move(&mut self) -> Result<MoveRecord, Rejection> {
        let record = match self.records.last() {
            Some(record) => *record,
            None => return self.reject(Rejection::EmptyHistory),
        };
        self.board = match moves::undo_move(&self.board, &record) {
            Ok(board) => board,
            Err(e) => return self.reject(Rejection::Undo(e)),
        };
        self.records.pop();
        self.side = self.side.inv();
        self.selected = None;
        debug!("undone {}", record);
        self.on_board_changed();
        Ok(record)
    }

    /// Starts a new game with the standard setup
    ///
    /// Game mode and options are kept.
    pub fn reset(&mut self) {
        let mode = self.mode;
        *self = Session::from_position(Board::initial(), Color::White, self.options);
        self.mode = mode;
        debug!("game reset");
    }

    pub fn set_game_mode(&mut self, mode: GameMode) {
        if self.mode != mode {
            debug!("game mode changed to {:?}", mode);
        }
        self.mode = mode;
        self.cancel_computer_move();
    }

    /// Makes a move for the computer
    ///
    /// The computer must be on move, i.e. the side to move must be the computer's color, and
    /// the game must not be over. The game mode is not checked, so the computer can move on
    /// demand in any mode.
    pub fn computer_move<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<MoveRecord, Rejection> {
        if self.is_over() {
            return self.reject(Rejection::GameOver);
        }
        if self.side != self.options.ai_color {
            return self.reject(Rejection::NotComputerTurn);
        }
        let policy = self.options.check_policy;
        let board = &self.board;
        let mv = robot::select_move_by(board, self.side, rng, |mv| {
            policy.allows(mv.piece(), mv.dst(), board)
        });
        match mv {
            Some(mv) => Ok(self.commit(*mv.piece(), mv.dst())),
            None => self.reject(Rejection::NoMoveFound),
        }
    }

    /// Schedules the computer move at `now` plus the configured delay
    ///
    /// Does nothing and returns `None` unless it's the computer's turn and the game is not over.
    /// If the move is already scheduled, the existing deadline is kept. After [`Session::poll()`]
    /// found no move for the computer, nothing is scheduled until the board changes.
    pub fn schedule_computer_move(&mut self, now: Instant) -> Option<Instant> {
        if !self.is_computer_turn() || self.is_over() || self.ai_stuck {
            return None;
        }
        if self.pending_ai.is_none() {
            let deadline = now + self.options.ai_delay;
            trace!("computer move scheduled");
            self.pending_ai = Some(deadline);
        }
        self.pending_ai
    }

    /// Cancels the pending computer move
    ///
    /// Returns `true` if there was a pending move.
    pub fn cancel_computer_move(&mut self) -> bool {
        self.pending_ai.take().is_some()
    }

    /// Drives the deferred computer move
    ///
    /// Schedules the computer move if needed (see [`Session::schedule_computer_move()`]), and
    /// makes it once the deadline is reached. Returns the record of the move if it was made.
    ///
    /// If the computer has no move, polling stops until the board changes.
    pub fn poll<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) -> Option<MoveRecord> {
        let deadline = self.schedule_computer_move(now)?;
        if now < deadline {
            return None;
        }
        self.pending_ai = None;
        match self.computer_move(rng) {
            Ok(record) => Some(record),
            Err(_) => {
                debug!("computer has no move, waiting for the board to change");
                self.ai_stuck = true;
                None
            }
        }
    }

    fn on_board_changed(&mut self) {
        self.cancel_computer_move();
        self.ai_stuck = false;
        let white = self.board.has_king(Color::White);
        let black = self.board.has_king(Color::Black);
        let outcome = match (white, black) {
            (false, _) => Some(Outcome {
                winner: Color::Black,
            }),
            (true, false) => Some(Outcome {
                winner: Color::White,
            }),
            (true, true) => None,
        };
        if outcome != self.outcome {
            match outcome {
                Some(o) => debug!("game over: {}", o),
                None => debug!("game is on"),
            }
        }
        self.outcome = outcome;
    }
}

/// Move numbering for [`Session::history()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum NumberPolicy {
    /// Don't print move numbers
    Omit,
    /// Start numbering from 1
    FromStart,
    /// Start numbering from the given number
    Custom(usize),
}

/// Wrapper to display the move history
///
/// See [`Session::history()`] for details.
pub struct History<'a> {
    session: &'a Session,
    policy: NumberPolicy,
    style: Style,
}

impl<'a> History<'a> {
    /// Sets the style of the moves
    #[inline]
    pub fn styled(mut self, style: Style) -> History<'a> {
        self.style = style;
        self
    }
}

impl<'a> fmt::Display for History<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let mut num = match self.policy {
            NumberPolicy::Omit => None,
            NumberPolicy::FromStart => Some(1),
            NumberPolicy::Custom(n) => Some(n),
        };
        let mut side = self.session.start_side;
        for (i, record) in self.session.records.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            if let Some(n) = num {
                match side {
                    Color::White => write!(f, "{}. ", n)?,
                    Color::Black if i == 0 => write!(f, "{}... ", n)?,
                    Color::Black => {}
                }
            }
            write!(f, "{}", record.styled(self.style))?;
            if side == Color::Black {
                num = num.map(|n| n + 1);
            }
            side = side.inv();
        }
        Ok(())
    }
}
