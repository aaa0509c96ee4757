pub mod arena;
pub mod board;
pub mod bot;
pub mod combat;
pub mod game;
pub mod piece;
pub mod rules;

pub use arena::*;
pub use board::*;
pub use bot::*;
pub use combat::*;
pub use game::*;
pub use piece::*;
pub use rules::*;
