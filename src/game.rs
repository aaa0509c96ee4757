use crate::board::{Board, BoardError, Layout, Position};
use crate::piece::{Color, Move, MoveError, Verdict};
use crate::rules::{RuleSet, Variant};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;
use tracing::{debug, error, info, trace, warn};

const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Errors raised while setting a game up. Illegal moves are not errors: they
/// end the game in the opponent's favour.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
    #[error("Invalid rules: {0}")]
    InvalidRules(String),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("Bad configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// What a player is told after submitting a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Nothing notable: an advance, a draw, or a detonation.
    Ok,
    /// The red piece won the exchange.
    StrikeRed,
    /// The blue piece won the exchange.
    StrikeBlue,
    RedWins,
    BlueWins,
    /// The game had already ended; the move was ignored.
    GameOver,
}

impl Outcome {
    pub fn strike(winner: Color) -> Self {
        match winner {
            Color::Red => Outcome::StrikeRed,
            Color::Blue => Outcome::StrikeBlue,
        }
    }

    pub fn win(winner: Color) -> Self {
        match winner {
            Color::Red => Outcome::RedWins,
            Color::Blue => Outcome::BlueWins,
        }
    }

    /// The winning colour, if this outcome ends the game.
    pub fn winner(&self) -> Option<Color> {
        match self {
            Outcome::RedWins => Some(Color::Red),
            Outcome::BlueWins => Some(Color::Blue),
            _ => None,
        }
    }

    pub fn is_win(&self) -> bool {
        self.winner().is_some()
    }
}

/// The last two non-strike moves of one colour.
#[derive(Debug, Clone, Default)]
struct MoveHistory {
    recent: VecDeque<Move>,
}

impl MoveHistory {
    const DEPTH: usize = 2;

    /// Moving A to B, back to A, then to B again is refused.
    fn repeats(&self, mv: Move) -> bool {
        self.recent.len() == Self::DEPTH && self.recent.back() == Some(&mv)
    }

    fn record(&mut self, mv: Move) {
        if self.recent.len() == Self::DEPTH {
            self.recent.pop_back();
        }
        self.recent.push_front(mv);
    }

    fn clear(&mut self) {
        self.recent.clear();
    }
}

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    rules: RuleSet,
    to_move: Color,
    /// Full rounds completed, counted each time play returns to Red.
    turns: usize,
    winner: Option<Color>,
    red_history: MoveHistory,
    blue_history: MoveHistory,
}

impl Game {
    /// Start a game on a prepared board. Red moves first.
    ///
    /// The board is taken as is; only its shape is checked against the rules.
    /// Use [`Game::from_layout`] to have the roster and starting rows enforced.
    pub fn new(mut board: Board, rules: RuleSet) -> Result<Self, GameError> {
        if board.rows() != rules.rows || board.cols() != rules.cols {
            return Err(GameError::InvalidRules(format!(
                "rules expect a {}x{} board, got {}x{}",
                rules.rows,
                rules.cols,
                board.rows(),
                board.cols()
            )));
        }
        rules.configure(&mut board);
        debug!(rows = rules.rows, cols = rules.cols, "new game");
        Ok(Game {
            board,
            rules,
            to_move: Color::Red,
            turns: 0,
            winner: None,
            red_history: MoveHistory::default(),
            blue_history: MoveHistory::default(),
        })
    }

    pub fn from_layout<L: Layout + ?Sized>(layout: &L, rules: RuleSet) -> Result<Self, GameError> {
        rules.validate()?;
        let board = Board::from_layout(layout, &rules)?;
        Game::new(board, rules)
    }

    pub fn with_variant<L: Layout + ?Sized>(layout: &L, variant: Variant) -> Result<Self, GameError> {
        Game::from_layout(layout, variant.rules())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    fn history(&self, color: Color) -> &MoveHistory {
        match color {
            Color::Red => &self.red_history,
            Color::Blue => &self.blue_history,
        }
    }

    fn history_mut(&mut self, color: Color) -> &mut MoveHistory {
        match color {
            Color::Red => &mut self.red_history,
            Color::Blue => &mut self.blue_history,
        }
    }

    /// Full legality check of `mv` for `color`, without touching the board.
    fn check(&self, color: Color, mv: Move) -> Result<Verdict, MoveError> {
        let piece = match self.board.piece_at(mv.from) {
            Err(_) => return Err(MoveError::OffBoard(mv.from)),
            Ok(None) => return Err(MoveError::EmptySquare(mv.from)),
            Ok(Some(piece)) => piece,
        };
        if piece.color() != color {
            return Err(MoveError::NotYourPiece(mv.from));
        }

        let verdict = piece.check_move(&self.board, mv)?;
        if verdict == Verdict::Advance
            && self.rules.no_repeat_moves
            && self.history(color).repeats(mv)
        {
            return Err(MoveError::Repeated);
        }
        Ok(verdict)
    }

    /// Every move `color` could legally make right now.
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        if self.is_over() {
            return Vec::new();
        }

        let mut moves = Vec::new();
        for (from, piece) in self.board.pieces() {
            if piece.color() != color || !piece.rank().is_movable() {
                continue;
            }

            for (dr, dc) in DIRECTIONS {
                let mut to = from;
                while let Some(next) = to.offset(dr, dc) {
                    if !self.board.contains(next) {
                        break;
                    }
                    to = next;
                    let mv = Move::new(from, to);
                    if self.check(color, mv).is_ok() {
                        moves.push(mv);
                    }
                    if !piece.rank().is_long_range() || !self.board.is_open(to) {
                        break;
                    }
                }
            }
        }

        moves
    }

    pub fn has_legal_move(&self, color: Color) -> bool {
        !self.legal_moves(color).is_empty()
    }

    /// Submit a move for the colour to move.
    pub fn make_move(&mut self, mv: Move) -> Outcome {
        if self.is_over() {
            return Outcome::GameOver;
        }

        let mover = self.to_move;
        let verdict = match self.check(mover, mv) {
            Ok(verdict) => verdict,
            Err(reason) => {
                warn!(color = %mover, mv = %mv, %reason, "illegal move forfeits the game");
                return self.finish(mover.opponent());
            }
        };

        match verdict {
            Verdict::Advance if self.rules.no_repeat_moves => self.history_mut(mover).record(mv),
            Verdict::Advance => {}
            Verdict::Strike(_) => {
                self.red_history.clear();
                self.blue_history.clear();
            }
        }

        let policy = self.rules.policy;
        let outcome = match policy.apply(&mut self.board, mv, verdict, mover) {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(color = %mover, mv = %mv, %err, "checked move could not be applied");
                return self.finish(mover.opponent());
            }
        };
        debug!(color = %mover, mv = %mv, ?outcome, "move applied");
        trace!("\n{}", self.board);

        if let Some(winner) = outcome.winner() {
            return self.finish(winner);
        }

        self.to_move = mover.opponent();
        if self.to_move == Color::Red {
            self.turns += 1;
            if let Some(max) = self.rules.max_turns {
                if self.turns >= max {
                    info!(turns = self.turns, "turn limit reached");
                    return self.finish(Color::Red);
                }
            }
        }

        if !self.has_legal_move(self.to_move) {
            info!(color = %self.to_move, "no legal moves left");
            return self.finish(mover);
        }

        outcome
    }

    /// Shorthand for [`Game::make_move`] with raw coordinates.
    pub fn play(&mut self, from_row: usize, from_col: usize, to_row: usize, to_col: usize) -> Outcome {
        self.make_move(Move::new(
            Position::new(from_row, from_col),
            Position::new(to_row, to_col),
        ))
    }

    fn finish(&mut self, winner: Color) -> Outcome {
        self.winner = Some(winner);
        info!(%winner, turns = self.turns, "game over");
        Outcome::win(winner)
    }
}
