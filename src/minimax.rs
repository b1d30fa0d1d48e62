use log::debug;

use crate::error::MoveError;
use crate::player::MoveSource;
use crate::tic_tac_toe::{Board, Player};

const WIN: i8 = 1;
const LOSS: i8 = -1;
const DRAW: i8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SearchResult {
    pub best_move: usize,
    pub score: i8,
    pub nodes: usize,
}

/// Exhaustive minimax search over the full game tree.
///
/// Scores are from the searching player's point of view: win `+1`,
/// draw `0`, loss `-1`. The live board is never touched; every
/// hypothetical position is a copy.
pub(crate) struct Minimax {
    name: String,
}

impl Minimax {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Picks the move for `me` with the best guaranteed outcome. Ties go to
    /// the lowest index.
    ///
    /// A finished game, won or full, has no moves to search.
    pub fn search(board: &Board, me: Player) -> Result<SearchResult, MoveError> {
        if board.winner().is_some() {
            return Err(MoveError::NoMovesAvailable);
        }

        let mut nodes = 0;
        let mut best: Option<(usize, i8)> = None;

        for (index, next) in board.children(me) {
            let score = Self::minimax(&next, me, me.opponent(), &mut nodes);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((index, score));
            }
        }

        let (best_move, score) = best.ok_or(MoveError::NoMovesAvailable)?;
        let result = SearchResult {
            best_move,
            score,
            nodes,
        };
        debug!(
            "minimax for {}: move {} scores {} after {} nodes",
            me, result.best_move, result.score, result.nodes
        );
        Ok(result)
    }

    /// `None` while the game is still going.
    fn terminal_score(board: &Board, me: Player) -> Option<i8> {
        match board.winner() {
            Some(winner) if winner == me => Some(WIN),
            Some(_) => Some(LOSS),
            None if board.is_full() => Some(DRAW),
            None => None,
        }
    }

    fn minimax(board: &Board, me: Player, to_move: Player, nodes: &mut usize) -> i8 {
        *nodes += 1;
        if let Some(score) = Self::terminal_score(board, me) {
            return score;
        }

        let scores = board
            .children(to_move)
            .map(|(_, next)| Self::minimax(&next, me, to_move.opponent(), nodes));

        let best = if to_move == me {
            scores.max()
        } else {
            scores.min()
        };
        // A non-terminal board always has at least one empty cell.
        best.unwrap_or(DRAW)
    }
}

impl MoveSource for Minimax {
    fn get_move(&mut self, board: &Board, player: Player) -> Result<usize, MoveError> {
        Self::search(board, player).map(|result| result.best_move)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
