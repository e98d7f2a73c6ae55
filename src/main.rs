use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use bloxorz_solver::solve::{self, Node};
use bloxorz_solver::{Block, Direction, Game, Level, NoSolution};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;

/// Find the shortest tilt sequence that brings the block onto the goal.
#[derive(Parser)]
#[command(name = "bloxorz-solver")]
#[command(version)]
struct Cli {
    /// Map files to solve
    #[arg(value_name = "MAP", required = true)]
    maps: Vec<PathBuf>,

    /// Give up after exploring this many block states
    #[arg(long)]
    max_states: Option<usize>,

    /// Take the first start/goal marker instead of rejecting duplicates
    #[arg(long)]
    lenient: bool,

    /// Print the board after every move of the solution
    #[arg(long)]
    trace: bool,
}

enum Outcome {
    Solved(Game, Vec<Direction>),
    Failed(NoSolution),
}

fn load(path: &Path, lenient: bool) -> Result<Level> {
    let map_data = std::fs::read_to_string(path).context("Failed to read the map")?;
    let terrain = map_data.parse().context("Failed to parse the map")?;
    let level = Level::from_terrain(terrain, !lenient).context("Invalid map")?;
    info!(
        "Loaded {}: start {:?}, goal {:?}",
        path.display(),
        level.start(),
        level.goal(),
    );
    Ok(level)
}

fn solve_map(path: &Path, cli: &Cli, on_step: impl FnMut(&Node<Block>)) -> Result<Outcome> {
    let level = load(path, cli.lenient)?;
    Ok(match solve::bfs(&level, cli.max_states, on_step) {
        Ok(steps) => Outcome::Solved(Game::new(level), steps),
        Err(reason) => Outcome::Failed(reason),
    })
}

fn report(path: &Path, cli: &Cli, outcome: Result<Outcome>) -> bool {
    let name = path.display();
    match outcome {
        Err(err) => {
            eprintln!("{name}: {} {err:#}", style("error:").red().bold());
            false
        }
        Ok(Outcome::Failed(NoSolution::Exhausted)) => {
            println!("{name}: {}", style("no solution").yellow());
            true
        }
        Ok(Outcome::Failed(NoSolution::LimitReached)) => {
            let limit = cli.max_states.unwrap_or_default();
            println!("{name}: {} after {limit} states", style("gave up").yellow());
            false
        }
        Ok(Outcome::Solved(mut game, steps)) => {
            let moves = steps.iter().map(|dir| dir.to_string()).collect::<String>();
            println!(
                "{name}: {} {}",
                style(moves).green().bold(),
                style(format!("({} moves)", steps.len())).dim(),
            );
            if cli.trace {
                println!("{game}");
                for dir in steps {
                    if let Err(err) = game.go(dir) {
                        eprintln!("{name}: {} {err}", style("error:").red().bold());
                        return false;
                    }
                    println!("{}\n{game}", style(dir).cyan());
                }
            }
            true
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let all_ok = if let [path] = cli.maps.as_slice() {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::with_template("{spinner} {pos} states, depth {msg}")?);
        pb.enable_steady_tick(Duration::from_millis(100));
        let outcome = solve_map(path, &cli, |node| {
            pb.inc(1);
            pb.set_message(node.depth.to_string());
        });
        pb.finish_and_clear();
        report(path, &cli, outcome)
    } else {
        let outcomes = cli
            .maps
            .par_iter()
            .map(|path| solve_map(path, &cli, |_| {}))
            .collect::<Vec<_>>();
        cli.maps
            .iter()
            .zip(outcomes)
            .fold(true, |ok, (path, outcome)| report(path, &cli, outcome) && ok)
    };

    if !all_ok {
        std::process::exit(1);
    }
    Ok(())
}
