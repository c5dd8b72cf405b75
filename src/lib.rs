//! Shortest paths on a grid with A*, through mazes grown by randomized Prim's
//!
//! # Examples
//! ## Open grid (the shortest path costs 4)
//! ```
//! use astar_maze::{Engine, Point};
//!
//! let mut engine = Engine::new(3, 3).unwrap();
//! assert!(engine.solve().unwrap());
//! assert_eq!(engine.path_cost(), Some(4.0));
//! println!("{engine}");
//! ```
//!
//! ## Generated maze
//! ```
//! use astar_maze::{Engine, MazeGenerator, MazeVariant, Point};
//!
//! let mut engine = Engine::new(27, 27).unwrap();
//! let mut gen = MazeGenerator::new(Some(13));
//! engine.generate_maze(&mut gen, MazeVariant::DirectionTagged);
//! engine.reset_search().unwrap();
//! if engine.run_search() {
//!     assert_eq!(engine.path_from_end().last(), Some(&Point::ORIGIN));
//! }
//! println!("{}", engine.summary());
//! ```

mod engine;
mod error;
mod grid;
mod layout;
pub mod maze_generator;
mod pathfinder;

pub use engine::Engine;
pub use error::{Endpoint, Error, Result};
pub use grid::{Cell, CellStatus, Direction, Grid, Point};
pub use maze_generator::{MazeGenerator, MazeVariant};
pub use pathfinder::Pathfinder;
