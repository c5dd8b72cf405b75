//! CLI for maze solving

use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use astar_maze::{Engine, Point};
use clap::Parser;

/// The shortest way through a grid maze, found with A*
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Display the path on the terminal, one step at a time
    #[arg(short, long)]
    playback: bool,

    /// Playback frame length in milliseconds
    #[arg(short, long, default_value_t = 100)]
    frame_length: usize,

    /// Move the start to `x,y`
    #[arg(long)]
    start: Option<Point>,

    /// Move the end to `x,y`
    #[arg(long)]
    end: Option<Point>,

    /// Print the expanded cell count and every path cell with its F, G and H costs
    #[arg(long)]
    costs: bool,

    /// File, where to read the maze. Use `-` for stdin.
    file: PathBuf,
}

/// Read maze from file, print output
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let emojis = if args.file.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(args.file)?
    };
    let mut engine = Engine::parse_emojis(emojis.trim())?;
    if let Some(start) = args.start {
        engine.set_start(start)?;
    }
    if let Some(end) = args.end {
        engine.set_end(end)?;
    }
    engine.solve()?;

    if args.playback {
        engine.playback(args.frame_length);
    } else {
        println!("{engine}");
    }
    println!("{}", engine.summary());
    if args.costs {
        println!("Expanded {} cells", engine.expanded());
        for line in engine.solution_report() {
            println!("{line}");
        }
    }
    Ok(())
}
