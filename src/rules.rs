use crate::board::{Board, Position};
use crate::combat::CombatPolicy;
use crate::game::GameError;
use crate::piece::Rank;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    Beta,    // 6x6, open board, eight-round limit
    Gamma,   // 6x6, central obstacle block
    Delta,   // 10x10, full roster, two lakes
    Epsilon, // Delta with aggressor advantage, two-charge bombs, far-striking scouts
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Beta,
        Variant::Gamma,
        Variant::Delta,
        Variant::Epsilon,
    ];

    pub fn name(&self) -> &str {
        match self {
            Variant::Beta => "Beta Strategy",
            Variant::Gamma => "Gamma Strategy",
            Variant::Delta => "Delta Strategy",
            Variant::Epsilon => "Epsilon Strategy",
        }
    }

    pub fn from_name(name: &str) -> Option<Variant> {
        match name.to_lowercase().as_str() {
            "beta" => Some(Variant::Beta),
            "gamma" => Some(Variant::Gamma),
            "delta" => Some(Variant::Delta),
            "epsilon" => Some(Variant::Epsilon),
            _ => None,
        }
    }

    pub fn rules(&self) -> RuleSet {
        match self {
            Variant::Beta => RuleSet {
                max_turns: Some(8),
                ..RuleSet::small(Vec::new())
            },
            Variant::Gamma => RuleSet {
                no_repeat_moves: true,
                ..RuleSet::small(vec![
                    Position::new(2, 2),
                    Position::new(2, 3),
                    Position::new(3, 2),
                    Position::new(3, 3),
                ])
            },
            Variant::Delta => RuleSet::full(),
            Variant::Epsilon => RuleSet {
                policy: CombatPolicy::AggressorAdvantage,
                bomb_charges: Some(2),
                scout_strike_range: Some(3),
                ..RuleSet::full()
            },
        }
    }
}

fn default_strike_range() -> Option<usize> {
    Some(1)
}

/// Everything that distinguishes one variant from another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub rows: usize,
    pub cols: usize,
    #[serde(default)]
    pub obstacles: Vec<Position>,
    /// Pieces per rank, for each side.
    pub roster: BTreeMap<Rank, usize>,
    /// Depth of each side's starting zone.
    pub starting_rows: usize,
    /// Full rounds after which Red wins; `None` plays on forever.
    #[serde(default)]
    pub max_turns: Option<usize>,
    #[serde(default)]
    pub no_repeat_moves: bool,
    #[serde(default)]
    pub policy: CombatPolicy,
    /// Charges given to every bomb; `None` means bombs never run out.
    #[serde(default)]
    pub bomb_charges: Option<u32>,
    /// How far a scout may travel and still strike; `None` means any distance.
    #[serde(default = "default_strike_range")]
    pub scout_strike_range: Option<usize>,
}

impl RuleSet {
    fn small(obstacles: Vec<Position>) -> Self {
        RuleSet {
            rows: 6,
            cols: 6,
            obstacles,
            roster: BTreeMap::from([
                (Rank::Flag, 1),
                (Rank::Marshal, 1),
                (Rank::Colonel, 2),
                (Rank::Captain, 2),
                (Rank::Lieutenant, 3),
                (Rank::Sergeant, 3),
            ]),
            starting_rows: 2,
            max_turns: None,
            no_repeat_moves: false,
            policy: CombatPolicy::Standard,
            bomb_charges: None,
            scout_strike_range: default_strike_range(),
        }
    }

    fn full() -> Self {
        let mut obstacles = Vec::new();
        for row in [4, 5] {
            for col in [2, 3, 6, 7] {
                obstacles.push(Position::new(row, col));
            }
        }
        RuleSet {
            rows: 10,
            cols: 10,
            obstacles,
            roster: BTreeMap::from([
                (Rank::Marshal, 1),
                (Rank::General, 1),
                (Rank::Colonel, 2),
                (Rank::Major, 3),
                (Rank::Captain, 4),
                (Rank::Lieutenant, 4),
                (Rank::Sergeant, 4),
                (Rank::Miner, 5),
                (Rank::Scout, 8),
                (Rank::Spy, 1),
                (Rank::Bomb, 6),
                (Rank::Flag, 1),
            ]),
            starting_rows: 4,
            max_turns: None,
            no_repeat_moves: true,
            policy: CombatPolicy::Standard,
            bomb_charges: None,
            scout_strike_range: default_strike_range(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let rules: RuleSet = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn roster_size(&self) -> usize {
        self.roster
            .values()
            .fold(0usize, |total, &count| total.saturating_add(count))
    }

    /// Reject rule sets no board could satisfy.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GameError::InvalidRules(format!(
                "board must have at least one row and column, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.starting_rows > self.rows / 2 {
            return Err(GameError::InvalidRules(format!(
                "starting zones of {} rows overlap on a {}-row board",
                self.starting_rows, self.rows
            )));
        }
        let zone = self.starting_rows.checked_mul(self.cols);
        let pieces = self
            .roster
            .values()
            .try_fold(0usize, |total, &count| total.checked_add(count));
        if zone.is_none() || pieces != zone {
            return Err(GameError::InvalidRules(format!(
                "roster of {} pieces does not fill a starting zone of {} rows by {} columns",
                pieces.map_or_else(|| "too many".to_string(), |n| n.to_string()),
                self.starting_rows,
                self.cols
            )));
        }
        for pos in &self.obstacles {
            if pos.row >= self.rows || pos.col >= self.cols {
                return Err(GameError::InvalidRules(format!("obstacle {} is off the board", pos)));
            }
            if pos.row < self.starting_rows || pos.row >= self.rows - self.starting_rows {
                return Err(GameError::InvalidRules(format!(
                    "obstacle {} lies in a starting zone",
                    pos
                )));
            }
        }
        Ok(())
    }

    /// Hand the variant's per-piece parameters to every piece on the board.
    pub fn configure(&self, board: &mut Board) {
        for piece in board.pieces_mut() {
            match piece.rank() {
                Rank::Bomb => piece.set_charges(self.bomb_charges),
                Rank::Scout => piece.set_strike_range(self.scout_strike_range),
                _ => {}
            }
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Variant::Gamma.rules()
    }
}
