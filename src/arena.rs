use crate::board::{Board, Position};
use crate::bot::Bot;
use crate::game::{Game, GameError};
use crate::piece::{Color, Piece, Rank};
use crate::rules::RuleSet;
use tracing::{debug, info, warn};

/// Deterministic starting position: each side's strongest pieces stand on its
/// front line, weaker ones behind, Blue mirroring Red.
pub fn standard_layout(rules: &RuleSet) -> Result<Board, GameError> {
    let mut board = Board::for_rules(rules)?;
    let ranks: Vec<Rank> = rules
        .roster
        .iter()
        .rev()
        .flat_map(|(&rank, &count)| std::iter::repeat(rank).take(count))
        .collect();

    for color in [Color::Red, Color::Blue] {
        let rows: Vec<usize> = match color {
            Color::Red => (0..rules.starting_rows).rev().collect(),
            Color::Blue => (rules.rows.saturating_sub(rules.starting_rows)..rules.rows).collect(),
        };
        let squares: Vec<Position> = rows
            .into_iter()
            .flat_map(|row| (0..rules.cols).map(move |col| Position::new(row, col)))
            .filter(|&pos| board.is_open(pos))
            .collect();

        if squares.len() != ranks.len() {
            return Err(GameError::InvalidLayout(format!(
                "{} pieces cannot fill {} free squares for {}",
                ranks.len(),
                squares.len(),
                color
            )));
        }
        for (pos, &rank) in squares.into_iter().zip(&ranks) {
            board.place(pos, Piece::new(rank, color))?;
        }
    }

    rules.configure(&mut board);
    Ok(board)
}

pub struct MatchConfig {
    /// Moves (by either side) before the match is called off unfinished.
    pub max_moves: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig { max_moves: 1000 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    RedWins { winner_name: String, moves: usize },
    BlueWins { winner_name: String, moves: usize },
    Unfinished { moves: usize },
    Resigned { violator: String, winner: String },
}

impl MatchResult {
    pub fn winner(&self) -> Option<&str> {
        match self {
            MatchResult::RedWins { winner_name, .. } => Some(winner_name),
            MatchResult::BlueWins { winner_name, .. } => Some(winner_name),
            MatchResult::Resigned { winner, .. } => Some(winner),
            MatchResult::Unfinished { .. } => None,
        }
    }
}

pub struct Match {
    config: MatchConfig,
    game: Game,
    red_bot: Box<dyn Bot>,
    blue_bot: Box<dyn Bot>,
    moves: usize,
}

impl Match {
    /// Set up a match from the standard layout for `rules`.
    pub fn new(
        red_bot: Box<dyn Bot>,
        blue_bot: Box<dyn Bot>,
        rules: RuleSet,
        config: MatchConfig,
    ) -> Result<Self, GameError> {
        rules.validate()?;
        let board = standard_layout(&rules)?;
        let game = Game::new(board, rules)?;
        Ok(Self::with_game(red_bot, blue_bot, game, config))
    }

    /// Play on from an existing game.
    pub fn with_game(
        red_bot: Box<dyn Bot>,
        blue_bot: Box<dyn Bot>,
        game: Game,
        config: MatchConfig,
    ) -> Self {
        Match {
            config,
            game,
            red_bot,
            blue_bot,
            moves: 0,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    fn name_of(&self, color: Color) -> &str {
        match color {
            Color::Red => self.red_bot.name(),
            Color::Blue => self.blue_bot.name(),
        }
    }

    pub fn play(&mut self) -> MatchResult {
        self.red_bot.game_start(Color::Red);
        self.blue_bot.game_start(Color::Blue);
        info!(
            red = self.red_bot.name(),
            blue = self.blue_bot.name(),
            "match starting"
        );
        debug!("initial board:\n{}", self.game.board());

        while !self.game.is_over() && self.moves < self.config.max_moves {
            let color = self.game.to_move();
            let bot = match color {
                Color::Red => &mut self.red_bot,
                Color::Blue => &mut self.blue_bot,
            };

            let Some(mv) = bot.get_move(&self.game) else {
                let violator = self.name_of(color).to_string();
                let winner = self.name_of(color.opponent()).to_string();
                warn!(%violator, "bot returned no move");
                self.red_bot.game_end();
                self.blue_bot.game_end();
                return MatchResult::Resigned { violator, winner };
            };

            let outcome = self.game.make_move(mv);
            self.moves += 1;
            debug!(move_number = self.moves, %color, %mv, ?outcome, "played");

            self.red_bot.notify_move(mv, outcome);
            self.blue_bot.notify_move(mv, outcome);
        }

        self.red_bot.game_end();
        self.blue_bot.game_end();

        let moves = self.moves;
        let result = match self.game.winner() {
            Some(Color::Red) => MatchResult::RedWins {
                winner_name: self.red_bot.name().to_string(),
                moves,
            },
            Some(Color::Blue) => MatchResult::BlueWins {
                winner_name: self.blue_bot.name().to_string(),
                moves,
            },
            None => MatchResult::Unfinished { moves },
        };
        info!(?result, "match finished");
        result
    }
}
