//! Maze generation with randomized Prim's algorithm
//!
//! All variants start from a fully blocked grid, open the origin and grow the
//! open region by annexing randomly chosen frontier cells. They differ in the
//! frontier bookkeeping and the rule for accepting a carve.

use std::fmt;

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::error::Error;
use crate::grid::{CellStatus, Direction, Grid, Point};

/// Maze generation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MazeVariant {
    /// Classic Prim's: one-cell-wide passages with frequent branching
    DirectionTagged = 1,
    /// Prim's with candidates next to two open cells rejected; straighter
    /// corridors
    BranchLimited = 2,
    /// Prim's without rejection; passages one to three cells wide
    OpenRegion = 3,
}

impl MazeVariant {
    pub const ALL: [MazeVariant; 3] = [
        MazeVariant::DirectionTagged,
        MazeVariant::BranchLimited,
        MazeVariant::OpenRegion,
    ];
}

impl TryFrom<u8> for MazeVariant {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MazeVariant::DirectionTagged),
            2 => Ok(MazeVariant::BranchLimited),
            3 => Ok(MazeVariant::OpenRegion),
            other => Err(Error::UnknownVariant(other)),
        }
    }
}

impl fmt::Display for MazeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MazeVariant::DirectionTagged => "direction-tagged",
            MazeVariant::BranchLimited => "branch-limited",
            MazeVariant::OpenRegion => "open-region",
        };
        write!(f, "{} ({})", *self as u8, name)
    }
}

/// Blocked cell next to the open region, with the direction it was reached in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrontierWall {
    cell: Point,
    direction: Direction,
}

/// Maze generator over an injected random source
pub struct MazeGenerator<R: Rng = StdRng> {
    random: R,
}

impl MazeGenerator<StdRng> {
    /// Generator seeded with `seed`, or from entropy when `None`
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            random: if let Some(state) = seed {
                StdRng::seed_from_u64(state)
            } else {
                StdRng::from_entropy()
            },
        }
    }
}

impl<R: Rng> MazeGenerator<R> {
    pub fn with_rng(random: R) -> Self {
        Self { random }
    }

    /// Overwrite the blocked flags of `grid` with a fresh maze.
    ///
    /// The origin is always open, and every open cell is reachable from it.
    /// Every cell's status is left Unseen; costs and parents are untouched.
    ///
    /// Returns the number of open cells.
    ///
    /// # Examples
    /// ```
    /// use astar_maze::{Grid, MazeGenerator, MazeVariant, Point};
    ///
    /// let mut grid = Grid::new(9, 9).unwrap();
    /// let mut gen = MazeGenerator::new(Some(3));
    /// gen.generate(&mut grid, MazeVariant::DirectionTagged);
    /// assert!(!grid.is_blocked(Point::ORIGIN).unwrap());
    /// ```
    pub fn generate(&mut self, grid: &mut Grid, variant: MazeVariant) -> usize {
        fill_walls(grid);
        match variant {
            MazeVariant::DirectionTagged => self.carve_direction_tagged(grid),
            MazeVariant::BranchLimited => self.carve_cells(grid, true),
            MazeVariant::OpenRegion => self.carve_cells(grid, false),
        }
        for offset in 0..grid.len() {
            let p = grid.point(offset);
            grid.at_mut(p).status = CellStatus::Unseen;
        }

        let open = grid.cells().filter(|c| !c.is_blocked()).count();
        log::debug!(
            "generated {}x{} maze with variant {variant}: {open} open cells",
            grid.width(),
            grid.height()
        );
        open
    }

    /// Carve two cells at a time along the direction a wall was reached in.
    ///
    /// A wall is carved only while both it and the cell beyond it are still
    /// blocked, which keeps passages one cell wide.
    fn carve_direction_tagged(&mut self, grid: &mut Grid) {
        open_cell(grid, Point::ORIGIN);

        let mut frontier: Vec<FrontierWall> = Vec::new();
        push_walls(grid, Point::ORIGIN, &mut frontier);

        while !frontier.is_empty() {
            let idx = self.random.gen_range(0..frontier.len());
            let FrontierWall { cell, direction } = frontier.swap_remove(idx);
            if !grid[cell].is_blocked() {
                continue;
            }
            let Some(far) = grid.step(cell, direction) else {
                continue;
            };
            if !grid[far].is_blocked() {
                continue;
            }

            open_cell(grid, cell);
            open_cell(grid, far);
            push_walls(grid, far, &mut frontier);
        }
    }

    /// Open frontier cells one at a time.
    ///
    /// A popped cell opens if some neighbor is still an unvisited wall, so the
    /// region keeps room to grow. With `reject_branches`, a cell already
    /// touching two open cells stays blocked.
    fn carve_cells(&mut self, grid: &mut Grid, reject_branches: bool) {
        open_cell(grid, Point::ORIGIN);

        let mut frontier: Vec<Point> = Vec::new();
        push_candidates(grid, Point::ORIGIN, &mut frontier);

        let mut directions = Direction::ALL;
        while !frontier.is_empty() {
            let idx = self.random.gen_range(0..frontier.len());
            let cur = frontier.swap_remove(idx);

            let skip = reject_branches
                && grid
                    .neighbors(cur)
                    .filter(|&n| !grid[n].is_blocked())
                    .count()
                    >= 2;

            directions.shuffle(&mut self.random);
            let expanded = !skip
                && directions.iter().any(|&d| {
                    grid.step(cur, d)
                        .is_some_and(|n| is_unvisited_wall(grid, n))
                });

            if expanded {
                grid.at_mut(cur).set_blocked(false);
                push_candidates(grid, cur, &mut frontier);
            }
            grid.at_mut(cur).status = CellStatus::Closed;
        }
    }
}

fn fill_walls(grid: &mut Grid) {
    for offset in 0..grid.len() {
        let p = grid.point(offset);
        let cell = grid.at_mut(p);
        cell.set_blocked(true);
        cell.status = CellStatus::Unseen;
    }
}

fn open_cell(grid: &mut Grid, p: Point) {
    let cell = grid.at_mut(p);
    cell.set_blocked(false);
    cell.status = CellStatus::Closed;
}

fn is_unvisited_wall(grid: &Grid, p: Point) -> bool {
    let cell = &grid[p];
    cell.is_blocked() && cell.status() == CellStatus::Unseen
}

/// Queue every blocked neighbor of `p`, tagged with the direction from `p`
fn push_walls(grid: &Grid, p: Point, frontier: &mut Vec<FrontierWall>) {
    for direction in Direction::ALL {
        if let Some(cell) = grid.step(p, direction) {
            if grid[cell].is_blocked() {
                frontier.push(FrontierWall { cell, direction });
            }
        }
    }
}

/// Queue unvisited walls around `p`, marking them Open so each is queued once
fn push_candidates(grid: &mut Grid, p: Point, frontier: &mut Vec<Point>) {
    for direction in Direction::ALL {
        if let Some(n) = grid.step(p, direction) {
            if is_unvisited_wall(grid, n) {
                grid.at_mut(n).status = CellStatus::Open;
                frontier.push(n);
            }
        }
    }
}
