//! Interactive terminal shell over the fd_core engine.
//!
//! Reads dart hits and declarations from stdin, one command per line, and
//! prints the evolving match state. Useful for manual rule checks and as a
//! reference host for the engine API.

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Result};
use clap::Parser;

use fd_core::{
    advance, apply_dart_hit, attempt_field_goal, attempt_punt, available_actions,
    choose_conversion, new_game, set_overtime_possession, start_next_drive, undo, ConversionKind,
    DartHit, GameState, GameStatus, Multiplier, PlayerSide,
};

#[derive(Parser)]
#[command(name = "fd_cli")]
#[command(about = "Play a football-darts match in the terminal", long_about = None)]
struct Cli {
    /// Player A name
    #[arg(long, default_value = "Player A")]
    player_a: String,

    /// Player B name
    #[arg(long, default_value = "Player B")]
    player_b: String,

    /// Who receives first: "a" or "b"
    #[arg(long, default_value = "a")]
    first: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let first = parse_side(&cli.first)?;
    let mut game = new_game(cli.player_a, cli.player_b, first);

    println!("{}", banner(&game));
    println!("Commands: dart <seg> <ring> | fg <seg> <ring> | punt <seg> <ring>");
    println!("          conv pat|two | advance | start <pos> | flip a|b | undo | log | state | quit");
    println!("Rings: si so d t ib ob miss\n");

    let stdin = io::stdin();
    loop {
        print_status(&game);
        if game.status == GameStatus::Completed {
            break;
        }
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        let outcome = match parts.as_slice() {
            [] => continue,
            ["quit"] | ["q"] => break,
            ["log"] => {
                for event in &game.events {
                    println!("  #{:<3} {}", event.sequence, event.description);
                }
                continue;
            }
            ["state"] => {
                println!("{}", serde_json::to_string_pretty(&game)?);
                continue;
            }
            ["undo"] => {
                game = undo(&game);
                continue;
            }
            ["advance"] => {
                game = advance(&game);
                continue;
            }
            ["start", pos] => match pos.parse::<u8>() {
                Ok(pos) => {
                    game = start_next_drive(&game, pos);
                    continue;
                }
                Err(_) => Err(anyhow!("bad position: {pos}")),
            },
            ["flip", side] => match parse_side(side) {
                Ok(side) => {
                    game = set_overtime_possession(&game, side);
                    continue;
                }
                Err(e) => Err(e),
            },
            ["conv", kind] => {
                let kind = match *kind {
                    "pat" => ConversionKind::Pat,
                    "two" => ConversionKind::TwoPoint,
                    other => {
                        println!("unknown conversion: {other}");
                        continue;
                    }
                };
                choose_conversion(&game, kind)
                    .map_err(|e| anyhow!(e))
                    .map(|next| game = next)
            }
            ["dart", seg, ring] => throw(&game, seg, ring, apply_dart_hit).map(|next| game = next),
            ["fg", seg, ring] => throw(&game, seg, ring, attempt_field_goal).map(|next| game = next),
            ["punt", seg, ring] => throw(&game, seg, ring, attempt_punt).map(|next| game = next),
            other => Err(anyhow!("unknown command: {other:?}")),
        };

        if let Err(e) = outcome {
            println!("!! {e}");
            continue;
        }
        if let Some(event) = game.events.last() {
            println!("   {}", event.description);
        }
    }

    println!("{}", banner(&game));
    Ok(())
}

fn throw(
    game: &GameState,
    seg: &str,
    ring: &str,
    f: impl Fn(&GameState, DartHit) -> fd_core::Result<GameState>,
) -> Result<GameState> {
    let segment: u8 = seg.parse().map_err(|_| anyhow!("bad segment: {seg}"))?;
    let multiplier = parse_ring(ring)?;
    f(game, DartHit::new(segment, multiplier)).map_err(|e| anyhow!(e))
}

fn parse_side(s: &str) -> Result<PlayerSide> {
    match s.to_ascii_lowercase().as_str() {
        "a" => Ok(PlayerSide::A),
        "b" => Ok(PlayerSide::B),
        other => Err(anyhow!("unknown player: {other}")),
    }
}

fn parse_ring(s: &str) -> Result<Multiplier> {
    match s.to_ascii_lowercase().as_str() {
        "si" | "s" => Ok(Multiplier::SingleInner),
        "so" => Ok(Multiplier::SingleOuter),
        "d" => Ok(Multiplier::Double),
        "t" => Ok(Multiplier::Triple),
        "ib" => Ok(Multiplier::InnerBull),
        "ob" => Ok(Multiplier::OuterBull),
        "miss" | "m" => Ok(Multiplier::Miss),
        other => Err(anyhow!("unknown ring: {other}")),
    }
}

fn banner(game: &GameState) -> String {
    match (game.status, game.winner) {
        (GameStatus::Completed, Some(side)) => format!(
            "=== {} {} - {} {} | {} wins ===",
            game.player_a,
            game.score_a,
            game.score_b,
            game.player_b,
            game.player_name(side)
        ),
        _ => format!("=== {} vs {} ===", game.player_a, game.player_b),
    }
}

fn print_status(game: &GameState) {
    let period = if game.current_quarter <= 4 {
        format!("Q{}", game.current_quarter)
    } else {
        format!("OT{}", game.current_quarter - 4)
    };
    print!(
        "[{period}] {} {} - {} {} | ball: {}",
        game.player_a,
        game.score_a,
        game.score_b,
        game.player_b,
        game.player_name(game.possession)
    );
    if let Some(drive) = &game.current_drive {
        print!(
            " at {} ({} darts, {} to go)",
            drive.current_position,
            drive.dart_count,
            drive.remaining()
        );
    }
    if game.awaiting_conversion {
        print!(" | conversion pending");
    }
    let actions = available_actions(game);
    let mut legal = Vec::new();
    if actions.can_throw_dart {
        legal.push("dart");
    }
    if actions.can_attempt_fg {
        legal.push("fg");
    }
    if actions.can_punt {
        legal.push("punt");
    }
    if actions.can_choose_conversion {
        legal.push("conv");
    }
    if actions.can_use_bonus_dart {
        legal.push("bonus");
    }
    if legal.is_empty() && game.status != GameStatus::Completed {
        legal.push("advance");
    }
    println!(" | legal: {}", legal.join(", "));
}
