//! Emoji text layout of an [Engine]
//!
//! One line per grid row, one symbol per cell. Rendered output can be parsed
//! back: visited and path symbols read as open floor.

use std::fmt;
use std::thread;
use std::time::Duration;

use itertools::Itertools;

use crate::engine::Engine;
use crate::error::{Endpoint, Error, Result};
use crate::grid::{CellStatus, Grid, Point};

impl Engine {
    pub const S_START: char = '🏃';
    pub const S_END: char = '❎';
    pub const S_VALID: char = '🟩';
    pub const S_WALL: char = '🟫';
    pub const S_VISITED: char = '🟨';
    pub const S_PATH: char = '🟥';

    /// Parse a layout, as printed by `generate-maze`
    ///
    /// Returns error, if the layout contains unknown characters, rows of
    /// different width, or does not have exactly one start and one end.
    ///
    /// # Examples
    /// ```
    /// use astar_maze::{Engine, Point};
    ///
    /// let emojis = "
    /// 🏃🟩🟩
    /// 🟫🟫🟩
    /// ❎🟩🟩";
    /// let mut engine = Engine::parse_emojis(emojis.trim()).unwrap();
    /// assert_eq!(engine.end(), Point::new(0, 2));
    /// assert!(engine.solve().unwrap());
    /// assert_eq!(engine.path_cost(), Some(6.0));
    /// ```
    pub fn parse_emojis(emojis: &str) -> Result<Self> {
        let squares: Vec<Vec<char>> = emojis
            .lines()
            .map(|row| row.trim_end().chars().collect())
            .collect();
        let width = squares.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(Error::EmptyLayout);
        }

        let mut grid = Grid::new(width, squares.len())?;
        let mut start = None;
        let mut end = None;

        for (y, row) in squares.iter().enumerate() {
            if row.len() != width {
                return Err(Error::RaggedRows {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            for (x, &c) in row.iter().enumerate() {
                let p = Point { x, y };
                match c {
                    Self::S_WALL => grid.set_blocked(p, true)?,
                    Self::S_VALID | Self::S_VISITED | Self::S_PATH => (),
                    Self::S_START => place_endpoint(&mut start, Endpoint::Start, p)?,
                    Self::S_END => place_endpoint(&mut end, Endpoint::End, p)?,
                    found => return Err(Error::UnexpectedCharacter { found, x, y }),
                }
            }
        }

        let start = start.ok_or(Error::MissingEndpoint(Endpoint::Start))?;
        let end = end.ok_or(Error::MissingEndpoint(Endpoint::End))?;
        Engine::with_grid(grid, start, end)
    }

    /// Symbol matrix of the current state
    ///
    /// Walls, floor, cells visited by the last search, the found path, and the
    /// endpoints on top.
    pub fn squares(&self) -> Vec<Vec<char>> {
        let grid = self.grid();
        let mut squares: Vec<Vec<char>> = (0..grid.height())
            .map(|y| {
                (0..grid.width())
                    .map(|x| {
                        let cell = &grid[Point { x, y }];
                        match (cell.is_blocked(), cell.status()) {
                            (true, _) => Self::S_WALL,
                            (false, CellStatus::Unseen) => Self::S_VALID,
                            (false, _) => Self::S_VISITED,
                        }
                    })
                    .collect()
            })
            .collect();

        for p in self.path_from_end() {
            squares[p.y][p.x] = Self::S_PATH;
        }
        squares[self.start().y][self.start().x] = Self::S_START;
        squares[self.end().y][self.end().x] = Self::S_END;
        squares
    }

    /// Draw the found path step by step on the terminal
    ///
    /// ## Arguments
    /// - `step_ms`: Time step for each frame, milliseconds.
    pub fn playback(&self, step_ms: usize) {
        fn print_squares(squares: &[Vec<char>]) {
            print!("\x1B[2J\x1B[1;1H");
            let sq_str = squares.iter().map(|row| row.iter().join("")).join("\n");
            println!("{}", sq_str);
        }

        let mut squares = self.squares();
        let path = self.path_from_end();
        let inner = path.len().saturating_sub(1);

        // Start from the layout without the path, then draw it from the start.
        for p in path.iter().take(inner).skip(1) {
            squares[p.y][p.x] = Self::S_VISITED;
        }
        print_squares(&squares);

        for p in path.iter().take(inner).skip(1).rev() {
            thread::sleep(Duration::from_millis(step_ms as u64));
            squares[p.y][p.x] = Self::S_PATH;
            print_squares(&squares);
        }
    }
}

fn place_endpoint(slot: &mut Option<Point>, endpoint: Endpoint, p: Point) -> Result<()> {
    if slot.replace(p).is_some() {
        return Err(Error::DuplicateEndpoint {
            endpoint,
            x: p.x,
            y: p.y,
        });
    }
    Ok(())
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.squares();
        write!(f, "{}", rows.iter().map(|row| row.iter().join("")).join("\n"))
    }
}
