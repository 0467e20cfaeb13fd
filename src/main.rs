//! Tsumego-SGF command line.
//!
//! ## Usage
//!
//! - `tsumego-sgf info <file>` - Show record metadata
//! - `tsumego-sgf flatten <file>` - List the main line
//! - `tsumego-sgf rewrite <file>` - Re-serialize the main line
//! - `tsumego-sgf solve <file>` - Solve a problem interactively
//! - `tsumego-sgf random` - Print a random legal game

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::info;

use tsumego_sgf::config::Config;
use tsumego_sgf::constants::MAX_DISPLAY_SIZE;
use tsumego_sgf::coord::move_label;
use tsumego_sgf::playout::random_game;
use tsumego_sgf::progress::Progress;
use tsumego_sgf::sgf;
use tsumego_sgf::shell::SolveShell;
use tsumego_sgf::solver::{Session, SolveState};
use tsumego_sgf::tree::{GameInfo, GameTree, flatten_main_line};
use tsumego_sgf::writer::SgfWriter;

/// Tsumego-SGF: SGF records and Go problem solving
#[derive(Parser)]
#[command(name = "tsumego-sgf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file overriding configuration defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show board size, players, setup and tree shape
    Info { file: PathBuf },
    /// Print the main-line moves, one per line
    Flatten { file: PathBuf },
    /// Parse, flatten and serialize again
    Rewrite {
        file: PathBuf,
        /// Write passes as `tt`
        #[arg(long)]
        legacy_pass: bool,
    },
    /// Solve a problem on stdin/stdout
    Solve {
        file: PathBuf,
        /// Progress record to update when the shell ends
        #[arg(long)]
        progress: Option<PathBuf>,
        /// Pause before scripted replies, in milliseconds
        #[arg(long)]
        reply_delay_ms: Option<u64>,
    },
    /// Generate a random legal game
    Random {
        #[arg(long)]
        size: Option<usize>,
        #[arg(long, default_value_t = 60)]
        moves: usize,
        #[arg(long, default_value_t = 0)]
        handicap: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Info { file } => show_info(&load_tree(&file)?),
        Commands::Flatten { file } => {
            let line = flatten_main_line(&load_tree(&file)?);
            for play in &line.plays {
                println!("{} {}", play.color.sgf_code(), move_label(play.mv, line.info.size));
            }
            Ok(())
        }
        Commands::Rewrite { file, legacy_pass } => {
            let line = flatten_main_line(&load_tree(&file)?);
            let out = SgfWriter::new(&line.info)
                .legacy_pass(legacy_pass)
                .write(&line.plays);
            info!("{} moves written", out.move_count);
            println!("{}", out.sgf);
            Ok(())
        }
        Commands::Solve {
            file,
            progress,
            reply_delay_ms,
        } => {
            let mut config = config;
            if let Some(ms) = reply_delay_ms {
                config.reply_delay_ms = ms;
            }
            run_solve(&file, progress.as_deref(), config)
        }
        Commands::Random {
            size,
            moves,
            handicap,
            seed,
        } => {
            let size = size.unwrap_or(config.default_size);
            if !(2..=MAX_DISPLAY_SIZE).contains(&size) {
                bail!("board size {size} out of range 2..={MAX_DISPLAY_SIZE}");
            }
            let mut rng = match seed {
                Some(s) => fastrand::Rng::with_seed(s),
                None => fastrand::Rng::new(),
            };
            let plays = random_game(&mut rng, size, moves, handicap);
            let info = GameInfo {
                size,
                handicap,
                ..GameInfo::default()
            };
            println!("{}", SgfWriter::new(&info).write(&plays).sgf);
            Ok(())
        }
    }
}

fn load_tree(path: &Path) -> Result<GameTree> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    sgf::parse(&text).with_context(|| format!("parsing {}", path.display()))
}

fn show_info(tree: &GameTree) -> Result<()> {
    let info = tree.info();
    let setup = tree.setup();
    println!("size:        {}", info.size);
    if let Some(komi) = info.komi {
        println!("komi:        {komi}");
    }
    if info.handicap > 0 {
        println!("handicap:    {}", info.handicap);
    }
    if let Some(rules) = &info.rules {
        println!("rules:       {rules}");
    }
    if let Some(name) = &info.black_player {
        println!("black:       {name}");
    }
    if let Some(name) = &info.white_player {
        println!("white:       {name}");
    }
    println!("setup:       {} black, {} white", setup.black.len(), setup.white.len());
    println!("to play:     {}", tree.next_player());
    println!("nodes:       {}", tree.len());
    println!("main line:   {}", flatten_main_line(tree).plays.len());
    Ok(())
}

fn run_solve(file: &Path, progress_path: Option<&Path>, config: Config) -> Result<()> {
    let tree = load_tree(file)?;
    let session = Session::with_config(tree, config.clone());
    if let Some(comment) = session.tree().root().comment() {
        println!("{comment}");
    }
    println!("{}", session.board());
    println!("{} to play", session.to_play());

    let mut shell = SolveShell::new(session, config);
    let stdin = io::stdin();
    shell.run(stdin.lock(), io::stdout())?;

    if let Some(path) = progress_path {
        let session = shell.session();
        let mut progress = Progress::load(path)?;
        progress.record(session.state() == SolveState::Solved, session.elapsed());
        progress.save(path)?;
        info!("progress saved to {}", path.display());
    }
    Ok(())
}
