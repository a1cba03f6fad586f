//! Chess-Device: a single-player chess engine behind a line protocol.
//!
//! ## Usage
//!
//! - `chess-device serve` - Bind stdin/stdout to one game instance
//! - `chess-device demo` - Let a random player face the engine
//! - `chess-device board` - Print the starting snapshot

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chess_device::board::{Board, Color};
use chess_device::constants::DEFAULT_INSTANCES;
use chess_device::device::{Device, DevicePool};
use chess_device::game::State;
use chess_device::protocol::MoveSpec;
use chess_device::rules::legal_moves;

/// Chess-Device: play chess against a rules engine over a text protocol
#[derive(Parser)]
#[command(name = "chess-device")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve one game instance over stdin/stdout, one command per line
    Serve {
        /// Number of game instances to create (at most 4)
        #[arg(long, default_value_t = DEFAULT_INSTANCES)]
        instances: usize,
        /// Instance bound to stdin/stdout
        #[arg(long, default_value_t = 0)]
        instance: usize,
    },
    /// Play a random player against the engine
    Demo {
        /// Seed for the random player
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Stop after this many player moves
        #[arg(long, default_value_t = 40)]
        max_moves: usize,
    },
    /// Print the starting position
    Board,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Some(Commands::Serve {
            instances,
            instance,
        }) => serve(instances, instance),
        Some(Commands::Demo { seed, max_moves }) => run_demo(seed, max_moves),
        Some(Commands::Board) => {
            let board = Board::new();
            print!("{}", board.snapshot());
            print!("{board}");
            Ok(())
        }
        None => run_demo(1, 40),
    }
}

/// Forward each stdin line to the device and print its reply.
fn serve(instances: usize, instance: usize) -> Result<()> {
    let pool = DevicePool::new(instances);
    let Some(dev) = pool.get(instance) else {
        bail!("instance {instance} out of range (0..{})", pool.len());
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let mut line = line.context("reading stdin")?;
        line.push('\n');
        dev.write(line.as_bytes());
        stdout
            .write_all(dev.read().as_bytes())
            .and_then(|_| stdout.flush())
            .context("writing reply")?;
    }
    Ok(())
}

/// Send one command and return the reply without its newline.
fn send(dev: &Device, cmd: &str) -> String {
    dev.write(format!("{cmd}\n").as_bytes());
    dev.read().trim_end().to_string()
}

fn run_demo(seed: u64, max_moves: usize) -> Result<()> {
    println!("Chess-Device: random player vs. first-legal-move engine\n");
    let mut rng = fastrand::Rng::with_seed(seed);
    let dev = Device::new(0);
    send(&dev, "00 W");

    for n in 1..=max_moves {
        let mut board = dev.with_game(|g| g.board().clone());
        let moves = legal_moves(&mut board, Color::White);
        if moves.is_empty() {
            println!("White has no legal move.");
            break;
        }
        let ply = moves[rng.usize(..moves.len())];
        let spec = MoveSpec::describe(&board, &ply).to_string();
        let reply = send(&dev, &format!("02 {spec}"));
        println!("{n:>3}. {spec:<14} {reply}");
        if reply == "MATE" {
            break;
        }

        let reply = send(&dev, "03");
        println!("     engine         {reply}");
        if dev.with_game(|g| g.state()) == State::GameOver {
            break;
        }
    }

    println!();
    dev.with_game(|g| print!("{}", g.board()));
    let outcome = dev.with_game(|g| g.state());
    println!("Final state: {outcome:?}");
    Ok(())
}
