//! Fixed-size rectangular grid of cells

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Location in the grid
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, `|dx| + |dy|`
    pub fn manhattan(self, other: Point) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Euclidean distance between cell centers
    pub fn euclidean(self, other: Point) -> f64 {
        let dx = self.x.abs_diff(other.x) as f64;
        let dy = self.y.abs_diff(other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl FromStr for Point {
    type Err = Error;

    /// Parse `x,y`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidPoint(s.to_string());
        let (x, y) = s.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse().map_err(|_| invalid())?;
        let y = y.trim().parse().map_err(|_| invalid())?;
        Ok(Point { x, y })
    }
}

/// Orthogonal step on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];
}

/// Search progress of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStatus {
    /// Not encountered yet
    #[default]
    Unseen,
    /// Queued in the frontier
    Open,
    /// Already expanded
    Closed,
}

/// One grid position with its per-run search state
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pos: Point,
    blocked: bool,
    pub(crate) status: CellStatus,
    g: f64,
    h: f64,
    f: f64,
    pub(crate) parent: Option<Point>,
}

impl Cell {
    fn new(pos: Point) -> Self {
        Self {
            pos,
            blocked: false,
            status: CellStatus::Unseen,
            g: 0.0,
            h: 0.0,
            f: 0.0,
            parent: None,
        }
    }

    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn status(&self) -> CellStatus {
        self.status
    }

    /// Best known path cost from the start
    pub fn g(&self) -> f64 {
        self.g
    }

    /// Heuristic estimate of the remaining cost to the end
    pub fn h(&self) -> f64 {
        self.h
    }

    /// Always `g + h`
    pub fn f(&self) -> f64 {
        self.f
    }

    /// Previous cell on the best known path from the start
    pub fn parent(&self) -> Option<Point> {
        self.parent
    }

    pub(crate) fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    pub(crate) fn set_g(&mut self, g: f64) {
        self.g = g;
        self.f = self.g + self.h;
    }

    pub(crate) fn set_h(&mut self, h: f64) {
        self.h = h;
        self.f = self.g + self.h;
    }

    fn reset_search(&mut self) {
        self.status = CellStatus::Unseen;
        self.g = 0.0;
        self.h = 0.0;
        self.f = 0.0;
        self.parent = None;
    }
}

/// Rectangular collection of `width × height` cells, stored row by row
///
/// Dimensions are fixed at construction. Blocked flags survive
/// [Self::reset_search]; everything else is per-run search state.
///
/// # Examples
/// ```
/// use astar_maze::{Grid, Point};
///
/// let mut grid = Grid::new(4, 3).unwrap();
/// grid.set_blocked(Point::new(1, 2), true).unwrap();
/// assert!(grid.is_blocked(Point::new(1, 2)).unwrap());
/// assert!(grid.is_blocked(Point::new(4, 0)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an unblocked grid; both dimensions must be positive
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| Cell::new(Point { x, y })))
            .collect();
        Ok(Grid {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Never true, grids have positive dimensions
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x < self.width && p.y < self.height
    }

    /// Cell at `p`, or [Error::OutOfBounds]
    pub fn cell(&self, p: Point) -> Result<&Cell> {
        let idx = self.offset(p)?;
        Ok(&self.cells[idx])
    }

    pub fn is_blocked(&self, p: Point) -> Result<bool> {
        self.cell(p).map(Cell::is_blocked)
    }

    pub fn set_blocked(&mut self, p: Point, blocked: bool) -> Result<()> {
        let idx = self.offset(p)?;
        self.cells[idx].set_blocked(blocked);
        Ok(())
    }

    /// All cells, row by row
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Restore every cell to Unseen with zero costs and no parent.
    ///
    /// Blocked flags are kept.
    pub fn reset_search(&mut self) {
        self.cells.iter_mut().for_each(Cell::reset_search);
    }

    /// Neighbor of `p` one step towards `direction`, if inside the grid
    pub fn step(&self, p: Point, direction: Direction) -> Option<Point> {
        let next = match direction {
            Direction::Right => Point::new(p.x + 1, p.y),
            Direction::Down => Point::new(p.x, p.y + 1),
            Direction::Left => Point::new(p.x.checked_sub(1)?, p.y),
            Direction::Up => Point::new(p.x, p.y.checked_sub(1)?),
        };
        self.contains(next).then_some(next)
    }

    /// Orthogonal neighbors inside the grid: up, down, left, right
    pub fn neighbors(&self, p: Point) -> impl Iterator<Item = Point> + '_ {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
            .into_iter()
            .filter_map(move |d| self.step(p, d))
    }

    /// Row-major position of `p`
    pub(crate) fn offset(&self, p: Point) -> Result<usize> {
        if self.contains(p) {
            Ok(p.y * self.width + p.x)
        } else {
            Err(Error::OutOfBounds {
                point: p,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub(crate) fn point(&self, offset: usize) -> Point {
        self.cells[offset].pos
    }

    /// Mutable cell at a point already known to be inside the grid
    pub(crate) fn at_mut(&mut self, p: Point) -> &mut Cell {
        debug_assert!(self.contains(p), "{p} outside grid");
        &mut self.cells[p.y * self.width + p.x]
    }
}

/// Panics with an out of bounds message for points outside the grid;
/// use [Grid::cell] for fallible access.
impl Index<Point> for Grid {
    type Output = Cell;

    fn index(&self, p: Point) -> &Cell {
        match self.offset(p) {
            Ok(idx) => &self.cells[idx],
            Err(err) => panic!("{err}"),
        }
    }
}
