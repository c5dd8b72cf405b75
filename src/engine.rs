//! Search orchestration: the single entry point for a user interface

use itertools::Itertools;
use rand::Rng;

use crate::error::{Endpoint, Error, Result};
use crate::grid::{Cell, CellStatus, Grid, Point};
use crate::maze_generator::{MazeGenerator, MazeVariant};
use crate::pathfinder::Pathfinder;

/// Grid, endpoints and the last search result
///
/// All operations run to completion before returning. Between calls, the
/// grid can be queried freely; the caller is expected to re-read the state
/// after each mutation.
///
/// # Examples
/// ```
/// use astar_maze::{Engine, Point};
///
/// let mut engine = Engine::new(3, 3).unwrap();
/// engine.set_end(Point::new(2, 2)).unwrap();
/// assert!(engine.solve().unwrap());
/// assert_eq!(engine.path_cost(), Some(4.0));
/// assert_eq!(engine.path_from_end().len(), 5);
/// ```
#[derive(Debug)]
pub struct Engine {
    grid: Grid,
    start: Point,
    end: Point,
    pathfinder: Pathfinder,
}

impl Engine {
    /// Open grid with start at the origin and end at the opposite corner
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let grid = Grid::new(width, height)?;
        Ok(Engine {
            start: Point::ORIGIN,
            end: Point::new(width - 1, height - 1),
            grid,
            pathfinder: Pathfinder::new(),
        })
    }

    /// Engine over an existing grid
    pub fn with_grid(grid: Grid, start: Point, end: Point) -> Result<Self> {
        let mut engine = Engine {
            start: Point::ORIGIN,
            end: Point::ORIGIN,
            grid,
            pathfinder: Pathfinder::new(),
        };
        engine.set_start(start)?;
        engine.set_end(end)?;
        Ok(engine)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Move the start; rejected with [Error::Configuration] outside the grid
    pub fn set_start(&mut self, p: Point) -> Result<()> {
        self.start = self.check_endpoint(Endpoint::Start, p)?;
        Ok(())
    }

    /// Move the end; rejected with [Error::Configuration] outside the grid
    pub fn set_end(&mut self, p: Point) -> Result<()> {
        self.end = self.check_endpoint(Endpoint::End, p)?;
        Ok(())
    }

    pub fn set_blocked(&mut self, p: Point, blocked: bool) -> Result<()> {
        self.grid.set_blocked(p, blocked)
    }

    pub fn is_blocked(&self, p: Point) -> Result<bool> {
        self.grid.is_blocked(p)
    }

    pub fn cell(&self, p: Point) -> Result<&Cell> {
        self.grid.cell(p)
    }

    pub fn cell_status(&self, p: Point) -> Result<CellStatus> {
        self.grid.cell(p).map(Cell::status)
    }

    /// Seed the search on the current grid state, without clearing it first
    pub fn initialize_search(&mut self) -> Result<()> {
        self.pathfinder
            .initialize(&mut self.grid, self.start, self.end)
    }

    /// Clear search state on every cell, then seed the search.
    ///
    /// Must precede every [Self::run_search]; blocked flags are kept.
    pub fn reset_search(&mut self) -> Result<()> {
        self.grid.reset_search();
        self.initialize_search()
    }

    /// Run A* from the seeded state; returns whether a path was found.
    ///
    /// The run consumes the frontier seeded by [Self::reset_search]; a second
    /// call without resetting in between finds it drained and reports `false`.
    pub fn run_search(&mut self) -> bool {
        self.pathfinder.run(&mut self.grid)
    }

    /// [Self::reset_search] followed by [Self::run_search]
    pub fn solve(&mut self) -> Result<bool> {
        self.reset_search()?;
        Ok(self.run_search())
    }

    /// Replace the blocked layout with a generated maze.
    ///
    /// The current start and end are left open, as a search would force them
    /// anyway. Costs and parent links are left stale and the last solution is
    /// dropped; call [Self::reset_search] before searching again.
    ///
    /// Returns the number of open cells.
    pub fn generate_maze<R: Rng>(
        &mut self,
        generator: &mut MazeGenerator<R>,
        variant: MazeVariant,
    ) -> usize {
        generator.generate(&mut self.grid, variant);
        self.grid.at_mut(self.start).set_blocked(false);
        self.grid.at_mut(self.end).set_blocked(false);
        self.pathfinder = Pathfinder::new();
        self.grid.cells().filter(|c| !c.is_blocked()).count()
    }

    pub fn is_solution_found(&self) -> bool {
        self.pathfinder.is_solution_found()
    }

    /// Path from end to start, empty without a solution
    pub fn path_from_end(&self) -> Vec<Point> {
        self.pathfinder.path_from_end(&self.grid)
    }

    /// Cost of the found path
    pub fn path_cost(&self) -> Option<f64> {
        self.is_solution_found().then(|| self.grid[self.end].g())
    }

    /// Number of cells expanded by the last search
    pub fn expanded(&self) -> usize {
        self.pathfinder.expanded()
    }

    /// One line per path cell, end first, with its costs
    pub fn solution_report(&self) -> Vec<String> {
        self.path_from_end()
            .into_iter()
            .map(|p| {
                let cell = &self.grid[p];
                format!("{p} F:{} G:{} H:{}", cell.f(), cell.g(), cell.h())
            })
            .collect()
    }

    /// Human-readable outcome of the last search
    pub fn summary(&self) -> String {
        match self.path_cost() {
            Some(cost) => format!(
                "Solution found: cost {cost}, {} cells ({})",
                self.path_from_end().len(),
                self.path_from_end().iter().rev().join(" -> ")
            ),
            None => "No solution".to_string(),
        }
    }

    fn check_endpoint(&self, endpoint: Endpoint, p: Point) -> Result<Point> {
        if self.grid.contains(p) {
            return Ok(p);
        }
        let err = Error::Configuration {
            endpoint,
            point: p,
            width: self.grid.width(),
            height: self.grid.height(),
        };
        log::warn!("{err}");
        Err(err)
    }
}
