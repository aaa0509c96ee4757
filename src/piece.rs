use crate::board::{Board, Position, SquareKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Blue,
}

impl Color {
    pub fn opponent(&self) -> Color {
        match self {
            Color::Red => Color::Blue,
            Color::Blue => Color::Red,
        }
    }

    fn code(&self) -> char {
        match self {
            Color::Red => 'R',
            Color::Blue => 'B',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "Red"),
            Color::Blue => write!(f, "Blue"),
        }
    }
}

/// Piece ranks, weakest first. The derived ordering is the combat table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Flag,
    Bomb,
    Spy,
    Scout,
    Miner,
    Sergeant,
    Lieutenant,
    Captain,
    Major,
    Colonel,
    General,
    Marshal,
}

impl Rank {
    pub const ALL: [Rank; 12] = [
        Rank::Flag,
        Rank::Bomb,
        Rank::Spy,
        Rank::Scout,
        Rank::Miner,
        Rank::Sergeant,
        Rank::Lieutenant,
        Rank::Captain,
        Rank::Major,
        Rank::Colonel,
        Rank::General,
        Rank::Marshal,
    ];

    /// Flags and bombs never leave their square.
    pub fn is_movable(&self) -> bool {
        !matches!(self, Rank::Flag | Rank::Bomb)
    }

    /// Only scouts may travel more than one square per move.
    pub fn is_long_range(&self) -> bool {
        matches!(self, Rank::Scout)
    }

    /// The sapper rank defeats bombs.
    pub fn defuses_bombs(&self) -> bool {
        matches!(self, Rank::Miner)
    }

    /// Whether this rank wins unconditionally when it is the one striking `target`.
    fn assassinates(&self, target: Rank) -> bool {
        matches!((self, target), (Rank::Spy, Rank::Marshal))
    }

    pub fn name(&self) -> &str {
        match self {
            Rank::Flag => "Flag",
            Rank::Bomb => "Bomb",
            Rank::Spy => "Spy",
            Rank::Scout => "Scout",
            Rank::Miner => "Miner",
            Rank::Sergeant => "Sergeant",
            Rank::Lieutenant => "Lieutenant",
            Rank::Captain => "Captain",
            Rank::Major => "Major",
            Rank::Colonel => "Colonel",
            Rank::General => "General",
            Rank::Marshal => "Marshal",
        }
    }

    fn code(&self) -> char {
        match self {
            Rank::Flag => 'F',
            Rank::Bomb => 'B',
            Rank::Spy => 'Y',
            Rank::Scout => 'U',
            Rank::Miner => 'M',
            Rank::Sergeant => 'S',
            Rank::Lieutenant => 'L',
            Rank::Captain => 'P',
            Rank::Major => 'O',
            Rank::Colonel => 'C',
            Rank::General => 'G',
            Rank::Marshal => 'H',
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub fn new(from: Position, to: Position) -> Self {
        Move { from, to }
    }

    /// Number of squares travelled along the single axis of an orthogonal move.
    fn distance(&self) -> usize {
        self.from.row.abs_diff(self.to.row) + self.from.col.abs_diff(self.to.col)
    }

    fn is_diagonal(&self) -> bool {
        self.from.row != self.to.row && self.from.col != self.to.col
    }

    /// Squares strictly between `from` and `to` on an orthogonal line.
    fn path(&self) -> impl Iterator<Item = Position> + '_ {
        let steps = self.distance().saturating_sub(1);
        (1..=steps).map(move |i| {
            let row = step_towards(self.from.row, self.to.row, i);
            let col = step_towards(self.from.col, self.to.col, i);
            Position::new(row, col)
        })
    }
}

fn step_towards(from: usize, to: usize, n: usize) -> usize {
    if to > from {
        from + n
    } else if to < from {
        from - n
    } else {
        from
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Why a move attempt was rejected. The game turns every one of these into a forfeit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no piece on {0}")]
    EmptySquare(Position),
    #[error("{0} is off the board")]
    OffBoard(Position),
    #[error("piece on {0} belongs to the other side")]
    NotYourPiece(Position),
    #[error("a {0} cannot move")]
    Immovable(Rank),
    #[error("diagonal moves are not allowed")]
    Diagonal,
    #[error("a move must change squares")]
    Stationary,
    #[error("a {0} moves a single square")]
    TooFar(Rank),
    #[error("path blocked at {0}")]
    Obstructed(Position),
    #[error("destination {0} is an obstacle")]
    IntoObstacle(Position),
    #[error("scout cannot strike from {0} squares away")]
    StrikeTooFar(usize),
    #[error("cannot strike a piece of the same color")]
    FriendlyFire,
    #[error("move repeated")]
    Repeated,
}

/// Raw result of a strike, seen from the attacking piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exchange {
    /// Attacker advances, defender is removed.
    AttackerWins,
    /// Attacker is removed, defender holds.
    DefenderWins,
    /// Both pieces are removed.
    Draw,
    /// A bomb spent its last charge on a non-sapper; both pieces are removed.
    Detonation,
    /// A sapper took a charge off a bomb that still has charges left; nobody moves.
    Defused,
    /// The defending flag fell.
    FlagCaptured,
}

/// What a legal move does once it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Advance,
    Strike(Exchange),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    rank: Rank,
    color: Color,
    /// Remaining detonations for a bomb; `None` means unlimited.
    charges: Option<u32>,
    /// Longest distance a scout may cover and still strike; `None` means unlimited.
    strike_range: Option<usize>,
}

impl Piece {
    pub fn new(rank: Rank, color: Color) -> Self {
        Piece {
            rank,
            color,
            charges: None,
            strike_range: Some(1),
        }
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn charges(&self) -> Option<u32> {
        self.charges
    }

    pub fn strike_range(&self) -> Option<usize> {
        self.strike_range
    }

    pub fn with_charges(mut self, charges: Option<u32>) -> Self {
        self.set_charges(charges);
        self
    }

    pub fn with_strike_range(mut self, range: Option<usize>) -> Self {
        self.set_strike_range(range);
        self
    }

    /// Only bombs carry charges; the call is ignored for other ranks.
    pub fn set_charges(&mut self, charges: Option<u32>) {
        if self.rank == Rank::Bomb {
            self.charges = charges;
        }
    }

    /// Only scouts can strike from afar; the call is ignored for other ranks.
    pub fn set_strike_range(&mut self, range: Option<usize>) {
        if self.rank.is_long_range() {
            self.strike_range = range;
        }
    }

    /// Same rank and color, ignoring per-instance state.
    pub fn same_kind(&self, other: &Piece) -> bool {
        self.rank == other.rank && self.color == other.color
    }

    /// Two-character code used in board renders, e.g. `RH` for a red marshal.
    pub fn code(&self) -> String {
        format!("{}{}", self.color.code(), self.rank.code())
    }

    /// Check a move of this piece without touching the board.
    pub fn check_move(&self, board: &Board, mv: Move) -> Result<Verdict, MoveError> {
        if !self.rank.is_movable() {
            return Err(MoveError::Immovable(self.rank));
        }
        if !board.contains(mv.to) {
            return Err(MoveError::OffBoard(mv.to));
        }
        if mv.is_diagonal() {
            return Err(MoveError::Diagonal);
        }

        let distance = mv.distance();
        if distance == 0 {
            return Err(MoveError::Stationary);
        }
        if distance > 1 && !self.rank.is_long_range() {
            return Err(MoveError::TooFar(self.rank));
        }

        for pos in mv.path() {
            if !board.is_open(pos) {
                return Err(MoveError::Obstructed(pos));
            }
        }

        if board.square(mv.to) == SquareKind::Obstacle {
            return Err(MoveError::IntoObstacle(mv.to));
        }

        let Some(target) = board.piece(mv.to) else {
            return Ok(Verdict::Advance);
        };
        if target.color == self.color {
            return Err(MoveError::FriendlyFire);
        }
        if let Some(range) = self.strike_range {
            if distance > range {
                return Err(MoveError::StrikeTooFar(distance));
            }
        }

        Ok(Verdict::Strike(self.strike(target)))
    }

    /// Raw combat verdict of this piece attacking `target`, before the defender
    /// gets its say and before any combat policy is applied.
    pub fn strike(&self, target: &Piece) -> Exchange {
        match target.rank {
            Rank::Flag => Exchange::FlagCaptured,
            Rank::Bomb if self.rank.defuses_bombs() => Exchange::AttackerWins,
            Rank::Bomb => Exchange::DefenderWins,
            _ if self.rank.assassinates(target.rank) => Exchange::AttackerWins,
            other => match self.rank.cmp(&other) {
                std::cmp::Ordering::Greater => Exchange::AttackerWins,
                std::cmp::Ordering::Less => Exchange::DefenderWins,
                std::cmp::Ordering::Equal => Exchange::Draw,
            },
        }
    }

    /// The defender's right of reply. Only bombs with finite charges change the
    /// verdict, and they spend a charge doing so.
    pub fn defend(&mut self, verdict: Exchange) -> Exchange {
        if self.rank != Rank::Bomb {
            return verdict;
        }
        let Some(charges) = self.charges else {
            return verdict;
        };

        let remaining = charges.saturating_sub(1);
        self.charges = Some(remaining);
        match (verdict, remaining) {
            (Exchange::AttackerWins, 0) => Exchange::AttackerWins,
            (Exchange::AttackerWins, _) => Exchange::Defused,
            (_, 0) => Exchange::Detonation,
            (other, _) => other,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.rank)
    }
}
