use stratego_engine::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("Stratego Engine - Demo Match");
    println!("============================\n");

    let variant = match std::env::args().nth(1) {
        Some(name) => match Variant::from_name(&name) {
            Some(variant) => variant,
            None => {
                eprintln!("unknown variant '{}', expected beta, gamma, delta or epsilon", name);
                std::process::exit(2);
            }
        },
        None => Variant::Gamma,
    };
    println!("Variant: {}\n", variant.name());

    let red = Box::new(RandomBot::new("RandomBot".to_string()));
    let blue = Box::new(FirstMoveBot::new("FirstMoveBot".to_string()));
    let config = MatchConfig { max_moves: 500 };

    let mut demo = match Match::new(red, blue, variant.rules(), config) {
        Ok(demo) => demo,
        Err(e) => {
            eprintln!("could not set up the match: {}", e);
            std::process::exit(1);
        }
    };
    let result = demo.play();

    println!("{}", demo.game().board());
    println!("========================================");
    println!("Match Result:");
    match result {
        MatchResult::RedWins { winner_name, moves } => {
            println!("  {} wins as Red in {} moves!", winner_name, moves);
        }
        MatchResult::BlueWins { winner_name, moves } => {
            println!("  {} wins as Blue in {} moves!", winner_name, moves);
        }
        MatchResult::Unfinished { moves } => {
            println!("  No result after {} moves", moves);
        }
        MatchResult::Resigned { violator, winner } => {
            println!("  {} wins, {} had no move to offer", winner, violator);
        }
    }
    println!("========================================");
}
