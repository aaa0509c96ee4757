use crate::board::{Board, BoardError};
use crate::game::Outcome;
use crate::piece::{Color, Exchange, Move, Verdict};
use serde::{Deserialize, Serialize};

/// How a legal move is carried out on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CombatPolicy {
    /// Equal ranks destroy each other.
    #[default]
    Standard,
    /// Equal ranks resolve in the attacker's favour.
    AggressorAdvantage,
}

impl CombatPolicy {
    /// Remap a raw exchange according to the policy, before the board is touched.
    pub fn resolve(&self, exchange: Exchange) -> Exchange {
        match (self, exchange) {
            (CombatPolicy::AggressorAdvantage, Exchange::Draw) => Exchange::AttackerWins,
            (_, other) => other,
        }
    }

    /// Apply a checked move to the board and report what the players see.
    ///
    /// For strikes the defender is asked for its reply first, which is where a
    /// bomb spends its charges.
    pub fn apply(
        &self,
        board: &mut Board,
        mv: Move,
        verdict: Verdict,
        mover: Color,
    ) -> Result<Outcome, BoardError> {
        let exchange = match verdict {
            Verdict::Advance => {
                board.relocate(mv.from, mv.to)?;
                return Ok(Outcome::Ok);
            }
            Verdict::Strike(raw) => {
                let raw = self.resolve(raw);
                match board.piece_at_mut(mv.to)? {
                    Some(defender) => defender.defend(raw),
                    None => raw,
                }
            }
        };

        match exchange {
            Exchange::AttackerWins => {
                board.relocate(mv.from, mv.to)?;
                Ok(Outcome::strike(mover))
            }
            Exchange::DefenderWins => {
                board.clear(mv.from)?;
                Ok(Outcome::strike(mover.opponent()))
            }
            Exchange::Draw | Exchange::Detonation => {
                board.clear(mv.from)?;
                board.clear(mv.to)?;
                Ok(Outcome::Ok)
            }
            Exchange::Defused => Ok(Outcome::strike(mover)),
            Exchange::FlagCaptured => {
                board.relocate(mv.from, mv.to)?;
                Ok(Outcome::win(mover))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;
    use crate::piece::{Piece, Rank};

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn setup(attacker: Piece, defender: Piece) -> Board {
        let mut board = Board::new(6, 6).unwrap();
        board.place(pos(0, 0), attacker).unwrap();
        board.place(pos(0, 1), defender).unwrap();
        board
    }

    fn strike(policy: CombatPolicy, board: &mut Board) -> Outcome {
        let mv = Move::new(pos(0, 0), pos(0, 1));
        let attacker = *board.piece(mv.from).unwrap();
        let verdict = attacker.check_move(board, mv).unwrap();
        policy.apply(board, mv, verdict, attacker.color()).unwrap()
    }

    #[test]
    fn test_advance_moves_piece() {
        let mut board = Board::new(6, 6).unwrap();
        board
            .place(pos(0, 0), Piece::new(Rank::Sergeant, Color::Red))
            .unwrap();
        let mv = Move::new(pos(0, 0), pos(1, 0));
        let outcome = CombatPolicy::Standard
            .apply(&mut board, mv, Verdict::Advance, Color::Red)
            .unwrap();
        assert_eq!(outcome, Outcome::Ok);
        assert!(board.piece(pos(0, 0)).is_none());
        assert_eq!(board.piece(pos(1, 0)).unwrap().rank(), Rank::Sergeant);
    }

    #[test]
    fn test_winner_takes_the_square() {
        let mut board = setup(
            Piece::new(Rank::Marshal, Color::Red),
            Piece::new(Rank::Colonel, Color::Blue),
        );
        assert_eq!(strike(CombatPolicy::Standard, &mut board), Outcome::StrikeRed);
        assert!(board.piece(pos(0, 0)).is_none());
        assert_eq!(board.piece(pos(0, 1)).unwrap().rank(), Rank::Marshal);
    }

    #[test]
    fn test_loser_is_removed_and_defender_stays() {
        let mut board = setup(
            Piece::new(Rank::Sergeant, Color::Blue),
            Piece::new(Rank::General, Color::Red),
        );
        assert_eq!(strike(CombatPolicy::Standard, &mut board), Outcome::StrikeRed);
        assert!(board.piece(pos(0, 0)).is_none());
        assert_eq!(board.piece(pos(0, 1)).unwrap().rank(), Rank::General);
    }

    #[test]
    fn test_draw_clears_both_squares() {
        let mut board = setup(
            Piece::new(Rank::Marshal, Color::Red),
            Piece::new(Rank::Marshal, Color::Blue),
        );
        assert_eq!(strike(CombatPolicy::Standard, &mut board), Outcome::Ok);
        assert!(board.piece(pos(0, 0)).is_none());
        assert!(board.piece(pos(0, 1)).is_none());
    }

    #[test]
    fn test_aggressor_advantage_breaks_ties() {
        let mut board = setup(
            Piece::new(Rank::Marshal, Color::Red),
            Piece::new(Rank::Marshal, Color::Blue),
        );
        assert_eq!(
            strike(CombatPolicy::AggressorAdvantage, &mut board),
            Outcome::StrikeRed
        );
        assert!(board.piece(pos(0, 0)).is_none());
        assert_eq!(board.piece(pos(0, 1)).unwrap().color(), Color::Red);
    }

    #[test]
    fn test_aggressor_advantage_keeps_losses() {
        let mut board = setup(
            Piece::new(Rank::Captain, Color::Red),
            Piece::new(Rank::Major, Color::Blue),
        );
        assert_eq!(
            strike(CombatPolicy::AggressorAdvantage, &mut board),
            Outcome::StrikeBlue
        );
        assert!(board.piece(pos(0, 0)).is_none());
        assert_eq!(board.piece(pos(0, 1)).unwrap().rank(), Rank::Major);
    }

    #[test]
    fn test_unlimited_bomb_survives() {
        let mut board = setup(
            Piece::new(Rank::General, Color::Red),
            Piece::new(Rank::Bomb, Color::Blue),
        );
        assert_eq!(strike(CombatPolicy::Standard, &mut board), Outcome::StrikeBlue);
        assert!(board.piece(pos(0, 0)).is_none());
        assert_eq!(board.piece(pos(0, 1)).unwrap().rank(), Rank::Bomb);
    }

    #[test]
    fn test_miner_clears_unlimited_bomb() {
        let mut board = setup(
            Piece::new(Rank::Miner, Color::Red),
            Piece::new(Rank::Bomb, Color::Blue),
        );
        assert_eq!(strike(CombatPolicy::Standard, &mut board), Outcome::StrikeRed);
        assert_eq!(board.piece(pos(0, 1)).unwrap().rank(), Rank::Miner);
    }

    #[test]
    fn test_charged_bomb_detonates_on_last_charge() {
        let mut board = setup(
            Piece::new(Rank::Marshal, Color::Red),
            Piece::new(Rank::Bomb, Color::Blue).with_charges(Some(1)),
        );
        assert_eq!(strike(CombatPolicy::Standard, &mut board), Outcome::Ok);
        assert!(board.piece(pos(0, 0)).is_none());
        assert!(board.piece(pos(0, 1)).is_none());
    }

    #[test]
    fn test_miner_against_charged_bomb_stays_put() {
        let mut board = setup(
            Piece::new(Rank::Miner, Color::Red),
            Piece::new(Rank::Bomb, Color::Blue).with_charges(Some(2)),
        );
        assert_eq!(strike(CombatPolicy::Standard, &mut board), Outcome::StrikeRed);
        assert_eq!(board.piece(pos(0, 0)).unwrap().rank(), Rank::Miner);
        assert_eq!(board.piece(pos(0, 1)).unwrap().charges(), Some(1));

        assert_eq!(strike(CombatPolicy::Standard, &mut board), Outcome::StrikeRed);
        assert!(board.piece(pos(0, 0)).is_none());
        assert_eq!(board.piece(pos(0, 1)).unwrap().rank(), Rank::Miner);
    }

    #[test]
    fn test_flag_capture_wins_and_moves() {
        let mut board = setup(
            Piece::new(Rank::Spy, Color::Blue),
            Piece::new(Rank::Flag, Color::Red),
        );
        assert_eq!(strike(CombatPolicy::Standard, &mut board), Outcome::BlueWins);
        assert_eq!(board.piece(pos(0, 1)).unwrap().rank(), Rank::Spy);
    }
}
