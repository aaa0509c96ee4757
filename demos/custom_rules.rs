use stratego_engine::*;
use tracing_subscriber::EnvFilter;

const RULES: &str = r#"{
    "rows": 6,
    "cols": 4,
    "obstacles": [{ "row": 2, "col": 1 }, { "row": 3, "col": 2 }],
    "roster": {
        "Flag": 1,
        "Bomb": 2,
        "Spy": 1,
        "Scout": 2,
        "Miner": 1,
        "Marshal": 1
    },
    "starting_rows": 2,
    "max_turns": 40,
    "no_repeat_moves": true,
    "bomb_charges": 1,
    "scout_strike_range": null
}"#;

/// Strikes whenever it can, otherwise falls back to the first legal move.
struct Brawler {
    name: String,
}

impl Bot for Brawler {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_move(&mut self, game: &Game) -> Option<Move> {
        let moves = game.legal_moves(game.to_move());
        moves
            .iter()
            .copied()
            .find(|mv| game.board().piece(mv.to).is_some())
            .or_else(|| moves.first().copied())
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("Custom Rules Demo\n");

    let rules = match RuleSet::from_json(RULES) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("bad rules: {}", e);
            std::process::exit(1);
        }
    };

    let red = Box::new(Brawler {
        name: "Brawler".to_string(),
    });
    let blue = Box::new(RandomBot::seeded("Random".to_string(), 2024));

    let mut demo = match Match::new(red, blue, rules, MatchConfig::default()) {
        Ok(demo) => demo,
        Err(e) => {
            eprintln!("could not set up the match: {}", e);
            std::process::exit(1);
        }
    };
    println!("{}", demo.game().board());

    let result = demo.play();
    println!("{}", demo.game().board());
    match result.winner() {
        Some(winner) => println!("{} wins: {:?}", winner, result),
        None => println!("No winner: {:?}", result),
    }
}
