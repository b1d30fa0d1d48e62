use std::fmt;
use std::str::FromStr;

use crate::error::{MoveError, ParseBoardError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Player {
    X,
    O,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Spot {
    Empty,
    Filled(Player),
}

/// Rows, columns, then the two diagonals.
pub(crate) const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Won(Player),
    Draw,
    InProgress,
}

/// A 3x3 grid stored row-major:
///
/// ```text
/// 0 | 1 | 2
/// ---------
/// 3 | 4 | 5
/// ---------
/// 6 | 7 | 8
/// ```
///
/// `Board` is `Copy`, so every clone is an independent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Board {
    spots: [Spot; 9],
}

impl Board {
    pub fn new() -> Self {
        Self {
            spots: [Spot::Empty; 9],
        }
    }

    pub fn get(&self, index: usize) -> Option<Spot> {
        self.spots.get(index).copied()
    }

    pub fn is_full(&self) -> bool {
        self.spots.iter().all(|spot| *spot != Spot::Empty)
    }

    /// Empty cell indices in ascending order.
    pub fn available_moves(&self) -> Vec<usize> {
        self.spots
            .iter()
            .enumerate()
            .filter(|(_, spot)| **spot == Spot::Empty)
            .map(|(index, _)| index)
            .collect()
    }

    /// Checks that `index` names an empty cell without touching the board.
    pub fn validate_move(&self, index: usize) -> Result<(), MoveError> {
        match self.get(index) {
            None => Err(MoveError::OutOfRange {
                value: i64::try_from(index).unwrap_or(i64::MAX),
                max: 8,
            }),
            Some(Spot::Filled(_)) => Err(MoveError::CellOccupied(index)),
            Some(Spot::Empty) => Ok(()),
        }
    }

    /// Marks a single empty cell. On error the board is left unchanged.
    pub fn apply_move(&mut self, index: usize, player: Player) -> Result<(), MoveError> {
        self.validate_move(index)?;
        self.spots[index] = Spot::Filled(player);
        Ok(())
    }

    /// Every position reachable by `player` marking one empty cell, paired
    /// with the cell index, in ascending index order.
    pub fn children(&self, player: Player) -> impl Iterator<Item = (usize, Board)> + '_ {
        self.available_moves().into_iter().map(move |index| {
            let mut next = *self;
            next.spots[index] = Spot::Filled(player);
            (index, next)
        })
    }

    pub fn winner(&self) -> Option<Player> {
        for [a, b, c] in WIN_LINES {
            if let Spot::Filled(player) = self.spots[a] {
                if self.spots[b] == Spot::Filled(player) && self.spots[c] == Spot::Filled(player) {
                    return Some(player);
                }
            }
        }
        None
    }

    pub fn outcome(&self) -> Outcome {
        match self.winner() {
            Some(player) => Outcome::Won(player),
            None if self.is_full() => Outcome::Draw,
            None => Outcome::InProgress,
        }
    }

    pub fn count(&self, player: Player) -> usize {
        self.spots
            .iter()
            .filter(|spot| **spot == Spot::Filled(player))
            .count()
    }

    /// X moves first and turns alternate, so equal counts mean X is next.
    pub fn to_move(&self) -> Player {
        if self.count(Player::X) == self.count(Player::O) {
            Player::X
        } else {
            Player::O
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (row, cells) in self.spots.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f, "---------")?;
            }
            let symbols: Vec<&str> = cells
                .iter()
                .map(|spot| match spot {
                    Spot::Empty => ".",
                    Spot::Filled(Player::X) => "X",
                    Spot::Filled(Player::O) => "O",
                })
                .collect();
            writeln!(f, "{}", symbols.join(" | "))?;
        }
        Ok(())
    }
}

/// Parses layouts like `"XX./OO./..."`; whitespace and `/` are ignored.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut spots = Vec::with_capacity(9);
        for ch in s.chars().filter(|ch| !ch.is_whitespace() && *ch != '/') {
            let spot = match ch {
                '.' | '_' => Spot::Empty,
                'X' | 'x' => Spot::Filled(Player::X),
                'O' | 'o' => Spot::Filled(Player::O),
                other => return Err(ParseBoardError::UnexpectedChar(other)),
            };
            spots.push(spot);
        }
        let spots: [Spot; 9] = spots
            .try_into()
            .map_err(|rest: Vec<Spot>| ParseBoardError::WrongCellCount(rest.len()))?;

        let board = Board { spots };
        let x = board.count(Player::X);
        let o = board.count(Player::O);
        if x != o && x != o + 1 {
            return Err(ParseBoardError::Unreachable { x, o });
        }
        Ok(board)
    }
}
