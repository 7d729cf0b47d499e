use anyhow::{Context, Result};
use chessgpt::board::Position;
use chessgpt::codec::{self, Placement};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "chessgpt-codec", about = "Encode and decode board tokens")]
struct Args {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the token for a position
    Encode {
        /// FEN string or "startpos"
        #[arg(value_name = "FEN", default_value = "startpos")]
        fen: String,
        /// Comma-separated SAN moves played from the start position
        #[arg(long, conflicts_with = "fen")]
        moves: Option<String>,
    },
    /// Print the board behind a token
    Decode {
        #[arg(value_name = "TOKEN")]
        token: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match Args::parse().cmd {
        Cmd::Encode { fen, moves } => {
            let position = match moves {
                Some(list) => {
                    let sans: Vec<&str> = list.split(',').map(str::trim).filter(|m| !m.is_empty()).collect();
                    Position::from_san_history(&sans)?
                }
                None if fen == "startpos" => Position::startpos(),
                None => Position::from_fen(&fen)?,
            };
            let token = codec::checked_token(&Placement::from_board(position.board()))
                .context("token failed to decode back to the same board")?;
            println!("{token}");
        }
        Cmd::Decode { token } => {
            let placement = codec::decode(&token)?;
            println!("{placement}");
            println!("{}", placement.fen_field());
        }
    }
    Ok(())
}
