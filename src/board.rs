use crate::game::GameError;
use crate::piece::{Color, Piece, Rank};
use crate::rules::RuleSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// The square `dr` rows and `dc` columns away, if that does not underflow.
    /// Upper bounds are the board's concern.
    pub fn offset(&self, dr: isize, dc: isize) -> Option<Position> {
        Some(Position::new(
            self.row.checked_add_signed(dr)?,
            self.col.checked_add_signed(dc)?,
        ))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SquareKind {
    #[default]
    Normal,
    /// Impassable; can never hold a piece.
    Obstacle,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board dimensions {rows}x{cols} are invalid")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("{0} is out of bounds")]
    OutOfBounds(Position),
    #[error("cannot place on {0}: {1}")]
    InvalidPlacement(Position, &'static str),
}

/// Anything that can describe a starting position square by square.
pub trait Layout {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;
    fn occupant_at(&self, pos: Position) -> Option<Piece>;
    fn square_at(&self, pos: Position) -> SquareKind;
}

#[derive(Debug, Clone)]
pub struct Board {
    rows: usize,
    cols: usize,
    pieces: Vec<Option<Piece>>,
    squares: Vec<SquareKind>,
}

impl Board {
    /// Create an empty board with only normal squares.
    pub fn new(rows: usize, cols: usize) -> Result<Self, BoardError> {
        if rows == 0 || cols == 0 {
            return Err(BoardError::InvalidDimensions { rows, cols });
        }
        Ok(Board {
            rows,
            cols,
            pieces: vec![None; rows * cols],
            squares: vec![SquareKind::Normal; rows * cols],
        })
    }

    /// Create an empty board shaped by a rule set, obstacles included.
    pub fn for_rules(rules: &RuleSet) -> Result<Self, GameError> {
        let mut board = Board::new(rules.rows, rules.cols)?;
        for &pos in &rules.obstacles {
            board.set_obstacle(pos)?;
        }
        Ok(board)
    }

    /// Copy an external layout into a native board and check it against the
    /// rule set's roster. Obstacles and per-piece parameters come from the rules.
    pub fn from_layout<L: Layout + ?Sized>(layout: &L, rules: &RuleSet) -> Result<Self, GameError> {
        if layout.rows() != rules.rows || layout.cols() != rules.cols {
            return Err(GameError::InvalidLayout(format!(
                "layout is {}x{}, rules expect {}x{}",
                layout.rows(),
                layout.cols(),
                rules.rows,
                rules.cols
            )));
        }

        let mut board = Board::new(rules.rows, rules.cols)?;
        for row in 0..board.rows {
            for col in 0..board.cols {
                let pos = Position::new(row, col);
                let idx = board.index(pos);
                let square = layout.square_at(pos);
                let occupant = layout.occupant_at(pos);
                if square == SquareKind::Obstacle && occupant.is_some() {
                    return Err(GameError::InvalidLayout(format!(
                        "obstacle at {} holds a piece",
                        pos
                    )));
                }
                board.squares[idx] = square;
                board.pieces[idx] = occupant.map(|p| Piece::new(p.rank(), p.color()));
            }
        }

        if !board.validate_layout(&rules.roster, rules.starting_rows) {
            return Err(GameError::InvalidLayout(
                "pieces do not match the roster or starting rows".to_string(),
            ));
        }

        for &pos in &rules.obstacles {
            board.set_obstacle(pos)?;
        }
        rules.configure(&mut board);
        Ok(board)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * self.cols + pos.col
    }

    fn checked_index(&self, pos: Position) -> Result<usize, BoardError> {
        if self.contains(pos) {
            Ok(self.index(pos))
        } else {
            Err(BoardError::OutOfBounds(pos))
        }
    }

    pub fn piece_at(&self, pos: Position) -> Result<Option<&Piece>, BoardError> {
        let idx = self.checked_index(pos)?;
        Ok(self.pieces[idx].as_ref())
    }

    pub fn piece_at_mut(&mut self, pos: Position) -> Result<Option<&mut Piece>, BoardError> {
        let idx = self.checked_index(pos)?;
        Ok(self.pieces[idx].as_mut())
    }

    pub fn square_at(&self, pos: Position) -> Result<SquareKind, BoardError> {
        let idx = self.checked_index(pos)?;
        Ok(self.squares[idx])
    }

    /// Occupant of `pos`, or `None` if it is empty or off the board.
    pub fn piece(&self, pos: Position) -> Option<&Piece> {
        self.piece_at(pos).ok().flatten()
    }

    /// Square kind of `pos`; anything off the board counts as an obstacle.
    pub fn square(&self, pos: Position) -> SquareKind {
        self.square_at(pos).unwrap_or(SquareKind::Obstacle)
    }

    /// A normal, unoccupied square.
    pub fn is_open(&self, pos: Position) -> bool {
        self.square(pos) == SquareKind::Normal && self.piece(pos).is_none()
    }

    /// Put a piece on an empty normal square. Used while setting up.
    pub fn place(&mut self, pos: Position, piece: Piece) -> Result<(), BoardError> {
        let idx = self.checked_index(pos)?;
        if self.squares[idx] == SquareKind::Obstacle {
            return Err(BoardError::InvalidPlacement(pos, "square is an obstacle"));
        }
        if self.pieces[idx].is_some() {
            return Err(BoardError::InvalidPlacement(pos, "square is occupied"));
        }
        self.pieces[idx] = Some(piece);
        Ok(())
    }

    /// Empty a square, returning whatever stood on it.
    pub fn clear(&mut self, pos: Position) -> Result<Option<Piece>, BoardError> {
        let idx = self.checked_index(pos)?;
        Ok(self.pieces[idx].take())
    }

    /// Move the piece on `from` to `to` in one step, returning the piece it displaced.
    pub fn relocate(&mut self, from: Position, to: Position) -> Result<Option<Piece>, BoardError> {
        let from_idx = self.checked_index(from)?;
        let to_idx = self.checked_index(to)?;
        if self.squares[to_idx] == SquareKind::Obstacle {
            return Err(BoardError::InvalidPlacement(to, "square is an obstacle"));
        }
        let piece = self.pieces[from_idx]
            .take()
            .ok_or(BoardError::InvalidPlacement(from, "no piece to move"))?;
        Ok(self.pieces[to_idx].replace(piece))
    }

    /// Turn a square into an obstacle, dropping anything on it.
    pub fn set_obstacle(&mut self, pos: Position) -> Result<Option<Piece>, BoardError> {
        let idx = self.checked_index(pos)?;
        self.squares[idx] = SquareKind::Obstacle;
        Ok(self.pieces[idx].take())
    }

    /// All pieces on the board in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, &Piece)> + '_ {
        let cols = self.cols;
        self.pieces.iter().enumerate().filter_map(move |(idx, piece)| {
            piece
                .as_ref()
                .map(|p| (Position::new(idx / cols, idx % cols), p))
        })
    }

    pub fn pieces_mut(&mut self) -> impl Iterator<Item = &mut Piece> + '_ {
        self.pieces.iter_mut().flatten()
    }

    pub fn count(&self, color: Color) -> usize {
        self.pieces().filter(|(_, p)| p.color() == color).count()
    }

    /// Red must fill the first `starting_rows` rows and Blue the last ones, and
    /// each side's per-rank counts must equal `roster` exactly.
    pub fn validate_layout(&self, roster: &BTreeMap<Rank, usize>, starting_rows: usize) -> bool {
        if starting_rows == 0 || starting_rows > self.rows / 2 {
            return false;
        }

        let mut counts: BTreeMap<(Rank, Color), usize> = BTreeMap::new();
        let zones = [
            (Color::Red, 0..starting_rows),
            (Color::Blue, self.rows - starting_rows..self.rows),
        ];
        for (color, rows) in zones {
            for row in rows {
                for col in 0..self.cols {
                    match self.piece(Position::new(row, col)) {
                        Some(piece) if piece.color() == color => {
                            *counts.entry((piece.rank(), color)).or_insert(0) += 1;
                        }
                        _ => return false,
                    }
                }
            }
        }

        let on_board: usize = counts.values().sum();
        if on_board != self.pieces().count() {
            return false;
        }

        Rank::ALL.iter().all(|&rank| {
            let expected = roster.get(&rank).copied().unwrap_or(0);
            [Color::Red, Color::Blue]
                .iter()
                .all(|&color| counts.get(&(rank, color)).copied().unwrap_or(0) == expected)
        })
    }
}

impl Layout for Board {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn occupant_at(&self, pos: Position) -> Option<Piece> {
        self.piece(pos).copied()
    }

    fn square_at(&self, pos: Position) -> SquareKind {
        self.square(pos)
    }
}

/// Boards are equal when every square has the same kind and the same rank and
/// color on it. Bomb charges and scout ranges are not compared.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.squares == other.squares
            && self
                .pieces
                .iter()
                .zip(&other.pieces)
                .all(|(a, b)| match (a, b) {
                    (None, None) => true,
                    (Some(a), Some(b)) => a.same_kind(b),
                    _ => false,
                })
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..self.cols {
            write!(f, "{:>3}", col)?;
        }
        writeln!(f)?;

        for row in 0..self.rows {
            write!(f, "{:2} ", row)?;
            for col in 0..self.cols {
                let pos = Position::new(row, col);
                let cell = match (self.square(pos), self.piece(pos)) {
                    (SquareKind::Obstacle, _) => "--".to_string(),
                    (_, Some(piece)) => piece.code(),
                    (_, None) => " .".to_string(),
                };
                write!(f, " {}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
