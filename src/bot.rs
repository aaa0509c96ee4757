use crate::game::{Game, Outcome};
use crate::piece::{Color, Move};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Trait that all bots must implement
pub trait Bot: Send {
    /// Get the name of the bot
    fn name(&self) -> &str;

    /// Pick a move for the colour to move. `None` concedes the game.
    fn get_move(&mut self, game: &Game) -> Option<Move>;

    /// Notified when the game starts
    fn game_start(&mut self, _color: Color) {}

    /// Notified after every move, by either side, with what the players were told
    fn notify_move(&mut self, _mv: Move, _outcome: Outcome) {}

    /// Notified when the game ends
    fn game_end(&mut self) {}
}

/// Always plays the first legal move in board scan order.
pub struct FirstMoveBot {
    name: String,
}

impl FirstMoveBot {
    pub fn new(name: String) -> Self {
        FirstMoveBot { name }
    }
}

impl Bot for FirstMoveBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(&mut self, game: &Game) -> Option<Move> {
        game.legal_moves(game.to_move()).into_iter().next()
    }
}

/// Picks uniformly among the legal moves.
pub struct RandomBot {
    name: String,
    rng: StdRng,
}

impl RandomBot {
    pub fn new(name: String) -> Self {
        RandomBot {
            name,
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible play for tests and demos.
    pub fn seeded(name: String, seed: u64) -> Self {
        RandomBot {
            name,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Bot for RandomBot {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(&mut self, game: &Game) -> Option<Move> {
        let moves = game.legal_moves(game.to_move());
        moves.choose(&mut self.rng).copied()
    }
}
