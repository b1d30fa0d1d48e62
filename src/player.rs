use std::io::{BufRead, Write};

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::MoveError;
use crate::tic_tac_toe::{Board, Player};

/// Something that can pick a move for `player` on `board`.
///
/// Implementations must only return indices of empty cells.
pub(crate) trait MoveSource {
    fn get_move(&mut self, board: &Board, player: Player) -> Result<usize, MoveError>;

    fn name(&self) -> &str;
}

/// Reads moves typed by a person, either a single index `0-8` or `row col`.
pub(crate) struct Human<R, W> {
    name: String,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Human<R, W> {
    pub fn new(name: impl Into<String>, input: R, output: W) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }
}

impl<R: BufRead, W: Write> MoveSource for Human<R, W> {
    fn get_move(&mut self, board: &Board, player: Player) -> Result<usize, MoveError> {
        write!(
            self.output,
            "{} ({}), enter move (0-8 or 'row col'): ",
            self.name, player
        )?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(MoveError::EndOfInput);
        }
        let index = parse_move(&line)?;
        board.validate_move(index)?;
        Ok(index)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn parse_number(token: &str) -> Result<i64, MoveError> {
    token
        .parse()
        .map_err(|_| MoveError::InvalidInput(format!("{:?} is not a number", token)))
}

/// Parses `token` and checks it lies in `0..=max`.
fn parse_bounded(token: &str, max: i64) -> Result<usize, MoveError> {
    let value = parse_number(token)?;
    if !(0..=max).contains(&value) {
        return Err(MoveError::OutOfRange { value, max });
    }
    Ok(value as usize)
}

pub(crate) fn parse_move(line: &str) -> Result<usize, MoveError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        [index] => parse_bounded(index, 8),
        [row, col] => {
            let row = parse_bounded(row, 2)?;
            let col = parse_bounded(col, 2)?;
            Ok(row * 3 + col)
        }
        [] => Err(MoveError::InvalidInput("empty input".to_string())),
        _ => Err(MoveError::InvalidInput(format!(
            "expected an index or 'row col', got {:?}",
            line.trim()
        ))),
    }
}

/// Plays a uniformly random empty cell.
pub(crate) struct RandomPlayer<R> {
    name: String,
    rng: R,
}

impl<R: Rng> RandomPlayer<R> {
    pub fn new(name: impl Into<String>, rng: R) -> Self {
        Self {
            name: name.into(),
            rng,
        }
    }
}

impl<R: Rng> MoveSource for RandomPlayer<R> {
    fn get_move(&mut self, board: &Board, player: Player) -> Result<usize, MoveError> {
        let index = *board
            .available_moves()
            .choose(&mut self.rng)
            .ok_or(MoveError::NoMovesAvailable)?;
        debug!("{} ({}) picked {} at random", self.name, player, index);
        Ok(index)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
