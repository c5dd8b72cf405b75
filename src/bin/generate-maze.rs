//! CLI for maze generation

use astar_maze::{Engine, MazeGenerator, MazeVariant};
use clap::Parser;

/// Maze generator with randomized Prim's algorithm
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Generated field height
    #[arg(long, default_value_t = 27)]
    height: usize,

    /// Generated field width
    #[arg(long, default_value_t = 27)]
    width: usize,

    /// Algorithm: 1 classic, 2 fewer branches, 3 wider passages
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
    variant: u8,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

/// Generate a maze, print its layout
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut engine = Engine::new(args.width, args.height)?;
    let mut gen = MazeGenerator::new(args.seed);
    engine.generate_maze(&mut gen, MazeVariant::try_from(args.variant)?);
    println!("{engine}");
    Ok(())
}
