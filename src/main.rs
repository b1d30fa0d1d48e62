mod error;
mod game;
mod minimax;
mod player;
mod tic_tac_toe;

use std::io::{self, BufRead, Write};

use anyhow::bail;
use log::info;

use crate::error::MoveError;
use crate::game::Game;
use crate::minimax::Minimax;
use crate::player::{Human, MoveSource, RandomPlayer};
use crate::tic_tac_toe::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opponent {
    Minimax,
    Random,
}

impl Opponent {
    fn from_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        match args.next().as_deref() {
            None | Some("minimax") => Ok(Opponent::Minimax),
            Some("random") => Ok(Opponent::Random),
            Some(other) => bail!(
                "unknown opponent {:?}, usage: tictactoe-minimax [minimax|random]",
                other
            ),
        }
    }

    fn source(self) -> Box<dyn MoveSource> {
        match self {
            Opponent::Minimax => Box::new(Minimax::new("AI")),
            Opponent::Random => Box::new(RandomPlayer::new("Random", rand::thread_rng())),
        }
    }
}

/// `None` when stdin is closed.
fn ask_play_again() -> anyhow::Result<Option<bool>> {
    print!("Do you want to play again? (y/n): ");
    io::stdout().flush()?;
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer)? == 0 {
        return Ok(None);
    }
    Ok(Some(answer.trim().eq_ignore_ascii_case("y")))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let opponent = Opponent::from_args(std::env::args().skip(1))?;
    info!("starting with {:?} opponent", opponent);
    println!("Tic-Tac-Toe: you are X, cells are numbered 0-8 left to right, top to bottom");

    loop {
        let human = Human::new("You", io::stdin().lock(), io::stdout());
        let mut game = Game::new(Box::new(human), opponent.source());
        let result = game.play(&mut io::stdout());
        info!("finished in state {:?}:\n{}", game.state(), game.board());
        drop(game);

        match result {
            Ok(Outcome::Won(winner)) => println!("Game over! Winner: {}", winner),
            Ok(_) => println!("Game ended in a draw!"),
            Err(err) if matches!(err.downcast_ref::<MoveError>(), Some(MoveError::EndOfInput)) => {
                println!();
                break;
            }
            Err(err) => return Err(err),
        }

        match ask_play_again()? {
            Some(true) => continue,
            _ => break,
        }
    }

    println!("Thanks for playing! Goodbye");
    Ok(())
}
