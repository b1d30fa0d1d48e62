use std::io::Write;

use anyhow::{bail, Context, Result};
use log::{debug, error, info, warn};

use crate::player::MoveSource;
use crate::tic_tac_toe::{Board, Outcome, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GameState {
    AwaitingMove(Player),
    Won(Player),
    Draw,
}

/// Drives one game between two move sources, X moving first.
pub(crate) struct Game {
    board: Board,
    player_x: Box<dyn MoveSource>,
    player_o: Box<dyn MoveSource>,
    state: GameState,
}

impl Game {
    pub fn new(player_x: Box<dyn MoveSource>, player_o: Box<dyn MoveSource>) -> Self {
        Self {
            board: Board::new(),
            player_x,
            player_o,
            state: GameState::AwaitingMove(Player::X),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Requests one move from the player whose turn it is and applies it.
    ///
    /// A recoverable error from the source is reported to `out` and leaves the
    /// board and turn as they were. A source handing back a move the board
    /// refuses breaks the `MoveSource` contract and ends the game with an error.
    pub fn step<W: Write>(&mut self, out: &mut W) -> Result<GameState> {
        let player = match self.state {
            GameState::AwaitingMove(player) => player,
            finished => return Ok(finished),
        };
        debug_assert_eq!(self.board.to_move(), player);
        let source = match player {
            Player::X => &mut self.player_x,
            Player::O => &mut self.player_o,
        };

        let index = match source.get_move(&self.board, player) {
            Ok(index) => index,
            Err(err) if err.is_recoverable() => {
                warn!("{} ({}) move rejected: {}", source.name(), player, err);
                writeln!(out, "Invalid move: {}", err)?;
                return Ok(self.state);
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("{} ({}) could not move", source.name(), player));
            }
        };

        if let Err(err) = self.board.apply_move(index, player) {
            error!("{} ({}) returned illegal move {}: {}", source.name(), player, index, err);
            bail!("{} ({}) returned illegal move {}: {}", source.name(), player, index, err);
        }
        debug!("{} ({}) plays {}", source.name(), player, index);

        self.state = match self.board.outcome() {
            Outcome::Won(winner) => GameState::Won(winner),
            Outcome::Draw => GameState::Draw,
            Outcome::InProgress => GameState::AwaitingMove(player.opponent()),
        };
        Ok(self.state)
    }

    /// Plays until someone wins or the board fills up, printing the board after
    /// every move.
    pub fn play<W: Write>(&mut self, out: &mut W) -> Result<Outcome> {
        writeln!(out, "\n{}", self.board)?;
        loop {
            let before = self.board;
            let state = self.step(out)?;
            if self.board != before {
                writeln!(out, "\n{}", self.board)?;
            }
            match state {
                GameState::AwaitingMove(_) => continue,
                GameState::Won(winner) => {
                    info!("game over: {} wins", winner);
                    writeln!(out, "Winner: {}", winner)?;
                    return Ok(Outcome::Won(winner));
                }
                GameState::Draw => {
                    info!("game over: draw");
                    writeln!(out, "Draw")?;
                    return Ok(Outcome::Draw);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io::Cursor;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::error::MoveError;
    use crate::minimax::Minimax;
    use crate::player::{Human, RandomPlayer};

    /// Replays a fixed list of moves without checking them. Running out
    /// ends the game instead of being retried.
    struct Scripted {
        moves: VecDeque<usize>,
    }

    impl Scripted {
        fn boxed(moves: &[usize]) -> Box<dyn MoveSource> {
            Box::new(Self {
                moves: moves.iter().copied().collect(),
            })
        }
    }

    impl MoveSource for Scripted {
        fn get_move(&mut self, _board: &Board, _player: Player) -> Result<usize, MoveError> {
            self.moves.pop_front().ok_or(MoveError::EndOfInput)
        }

        fn name(&self) -> &str {
            "Scripted"
        }
    }

    /// Plays a fixed first move, then hands over to another source.
    struct Opening {
        first: Option<usize>,
        then: Box<dyn MoveSource>,
    }

    impl Opening {
        fn boxed(first: usize, then: Box<dyn MoveSource>) -> Box<dyn MoveSource> {
            Box::new(Self {
                first: Some(first),
                then,
            })
        }
    }

    impl MoveSource for Opening {
        fn get_move(&mut self, board: &Board, player: Player) -> Result<usize, MoveError> {
            match self.first.take() {
                Some(index) => Ok(index),
                None => self.then.get_move(board, player),
            }
        }

        fn name(&self) -> &str {
            "Opening"
        }
    }

    fn human(input: &str) -> Box<dyn MoveSource> {
        Box::new(Human::new(
            "You",
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
        ))
    }

    #[test]
    fn test_minimax_vs_minimax_draws() {
        let mut game = Game::new(
            Box::new(Minimax::new("AI X")),
            Box::new(Minimax::new("AI O")),
        );
        let mut out = Vec::new();
        assert_eq!(game.play(&mut out).unwrap(), Outcome::Draw);
        assert_eq!(game.state(), GameState::Draw);
        assert!(game.board().is_full());
        assert!(String::from_utf8(out).unwrap().ends_with("Draw\n"));
    }

    #[test]
    fn test_center_opening_with_best_play_draws() {
        let x = Opening::boxed(4, Box::new(Minimax::new("AI X")));
        let mut game = Game::new(x, Box::new(Minimax::new("AI O")));
        assert_eq!(game.play(&mut Vec::new()).unwrap(), Outcome::Draw);
    }

    #[test]
    fn test_minimax_never_loses_after_center_opening() {
        for seed in 0..20 {
            let random = RandomPlayer::new("Random", StdRng::seed_from_u64(seed));
            let x = Opening::boxed(4, Box::new(random));
            let mut game = Game::new(x, Box::new(Minimax::new("AI O")));
            let outcome = game.play(&mut Vec::new()).unwrap();
            assert_ne!(outcome, Outcome::Won(Player::X), "seed {}", seed);
        }
    }

    #[test]
    fn test_rejected_moves_do_not_advance_turn() {
        let mut game = Game::new(human("9\n0\n0\n1\n2\n"), Scripted::boxed(&[3, 4]));
        let mut out = Vec::new();

        assert_eq!(game.step(&mut out).unwrap(), GameState::AwaitingMove(Player::X));
        assert_eq!(*game.board(), Board::new());

        assert_eq!(game.step(&mut out).unwrap(), GameState::AwaitingMove(Player::O));
        assert_eq!(game.step(&mut out).unwrap(), GameState::AwaitingMove(Player::X));

        let before = *game.board();
        assert_eq!(game.step(&mut out).unwrap(), GameState::AwaitingMove(Player::X));
        assert_eq!(*game.board(), before);

        assert_eq!(game.play(&mut out).unwrap(), Outcome::Won(Player::X));
        assert_eq!(game.state(), GameState::Won(Player::X));

        let output = String::from_utf8(out).unwrap();
        assert_eq!(output.matches("Invalid move").count(), 2);
        assert!(output.contains("out of range"));
        assert!(output.contains("already occupied"));
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let mut game = Game::new(
            Scripted::boxed(&[0, 2, 3, 7, 8]),
            Scripted::boxed(&[1, 4, 5, 6]),
        );
        assert_eq!(game.play(&mut Vec::new()).unwrap(), Outcome::Draw);
        assert!(game.board().is_full());
        assert_eq!(game.board().winner(), None);
    }

    #[test]
    fn test_end_of_input_ends_game() {
        let mut game = Game::new(human("4\n"), Box::new(Minimax::new("AI")));
        assert!(game.play(&mut Vec::new()).is_err());
        assert_eq!(game.state(), GameState::AwaitingMove(Player::X));
        assert_eq!(game.board().available_moves().len(), 7);
    }

    #[test]
    fn test_illegal_move_from_source_is_an_error() {
        let mut game = Game::new(Scripted::boxed(&[4, 4]), Scripted::boxed(&[4]));
        let mut out = Vec::new();
        game.step(&mut out).unwrap();
        let before = *game.board();
        assert!(game.step(&mut out).is_err());
        assert_eq!(*game.board(), before);
        assert_eq!(game.state(), GameState::AwaitingMove(Player::O));
    }

    #[test]
    fn test_exhausted_script_ends_game() {
        let mut game = Game::new(Scripted::boxed(&[0, 1]), Scripted::boxed(&[4]));
        let err = game.play(&mut Vec::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MoveError>(),
            Some(MoveError::EndOfInput)
        ));
        assert_eq!(game.state(), GameState::AwaitingMove(Player::O));
        assert_eq!(game.board().available_moves().len(), 6);
    }

    #[test]
    fn test_finished_game_stays_finished() {
        let mut game = Game::new(Scripted::boxed(&[0, 1, 2]), Scripted::boxed(&[3, 4]));
        assert_eq!(game.play(&mut Vec::new()).unwrap(), Outcome::Won(Player::X));
        assert_eq!(game.step(&mut Vec::new()).unwrap(), GameState::Won(Player::X));
    }
}
