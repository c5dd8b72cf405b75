//! A* search over a [Grid]
//!
//! The search keeps its state on the grid cells themselves (status, costs and
//! parent links), so the caller can inspect every visited cell after a run.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{Endpoint, Error, Result};
use crate::grid::{CellStatus, Grid, Point};

/// Queued cell in the [Frontier]
#[derive(Debug, Clone, Copy)]
struct Entry {
    f: f64,
    g: f64,
    seq: u64,
    offset: usize,
}

/// Reversed, so that [BinaryHeap] pops the lowest F first.
///
/// Ties go to the lower G, then to the earlier insertion.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.g.total_cmp(&self.g))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

/// Min-priority set of open cells, keyed by cell offset
///
/// Re-keying a queued cell pushes a fresh entry and marks the old one stale;
/// stale entries are dropped when they surface at [Self::pop]. The heap holds
/// at most one live entry per cell, so its size stays bounded by the number of
/// pushes in a single run.
#[derive(Debug, Default)]
pub(crate) struct Frontier {
    heap: BinaryHeap<Entry>,
    /// Sequence number of the live entry of each cell
    live: Vec<Option<u64>>,
    next_seq: u64,
    len: usize,
}

impl Frontier {
    /// Empty the frontier for a grid of `cells` cells
    pub(crate) fn reset(&mut self, cells: usize) {
        self.heap.clear();
        self.live.clear();
        self.live.resize(cells, None);
        self.next_seq = 0;
        self.len = 0;
    }

    /// Insert a cell, or move it to its new priority if already queued
    pub(crate) fn push(&mut self, offset: usize, f: f64, g: f64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        if self.live[offset].replace(seq).is_none() {
            self.len += 1;
        }
        self.heap.push(Entry { f, g, seq, offset });
    }

    /// Remove the cell with the lowest priority
    pub(crate) fn pop(&mut self) -> Option<usize> {
        while let Some(entry) = self.heap.pop() {
            // Skip stale entries.
            if self.live[entry.offset] != Some(entry.seq) {
                continue;
            }
            self.live[entry.offset] = None;
            self.len -= 1;
            return Some(entry.offset);
        }
        None
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

/// A* search between two cells with a Manhattan heuristic
///
/// Usage is two-phase: [Self::initialize] seeds the frontier with the start
/// cell, and [Self::run] drains it until the end cell is popped or nothing is
/// left. The grid should come from [Grid::reset_search] before initializing,
/// otherwise stale costs from an earlier run take part in the search.
#[derive(Debug, Default)]
pub struct Pathfinder {
    start: Point,
    end: Point,
    frontier: Frontier,
    /// Neighbor buffer reused between expansions
    nbuf: Vec<Point>,
    found: bool,
    expanded: usize,
}

impl Pathfinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate endpoints, assign heuristics and seed the frontier.
    ///
    /// ## Arguments
    /// - `grid`: Grid to search, normally fresh from [Grid::reset_search].
    /// - `start`: Cell where the path begins.
    /// - `end`: Cell where the path ends.
    ///
    /// Returns [Error::Configuration] if either endpoint is outside the grid.
    pub fn initialize(&mut self, grid: &mut Grid, start: Point, end: Point) -> Result<()> {
        check_endpoint(grid, Endpoint::Start, start)?;
        check_endpoint(grid, Endpoint::End, end)?;

        self.start = start;
        self.end = end;
        self.found = false;
        self.expanded = 0;

        for offset in 0..grid.len() {
            let p = grid.point(offset);
            grid.at_mut(p).set_h(p.manhattan(end) as f64);
        }

        self.frontier.reset(grid.len());
        let start_offset = grid.offset(start)?;
        let cell = grid.at_mut(start);
        cell.set_g(0.0);
        cell.parent = None;
        cell.status = CellStatus::Open;
        self.frontier.push(start_offset, cell.f(), cell.g());
        Ok(())
    }

    /// Search until the end is reached or the frontier is exhausted.
    ///
    /// Start and end are unblocked first, whatever their previous state.
    /// Returns whether a path was found; an unreachable end is not an error.
    pub fn run(&mut self, grid: &mut Grid) -> bool {
        grid.at_mut(self.start).set_blocked(false);
        grid.at_mut(self.end).set_blocked(false);
        self.found = false;

        let mut nbuf = std::mem::take(&mut self.nbuf);

        while let Some(offset) = self.frontier.pop() {
            let current = grid.point(offset);
            if current == self.end {
                self.found = true;
                break;
            }

            let current_g = {
                let cell = grid.at_mut(current);
                cell.status = CellStatus::Closed;
                cell.g()
            };
            self.expanded += 1;

            nbuf.clear();
            nbuf.extend(grid.neighbors(current).filter(|&n| !grid[n].is_blocked()));

            for &np in nbuf.iter() {
                let candidate_g = current_g + edge_cost(current, np);
                let Ok(n_offset) = grid.offset(np) else {
                    continue;
                };
                let n = grid.at_mut(np);
                match n.status {
                    CellStatus::Unseen => {
                        n.status = CellStatus::Open;
                        n.set_g(candidate_g);
                        n.parent = Some(current);
                        self.frontier.push(n_offset, n.f(), n.g());
                    }
                    CellStatus::Open | CellStatus::Closed => {
                        if n.h() + candidate_g >= n.f() {
                            continue;
                        }
                        if n.status == CellStatus::Closed {
                            log::trace!("re-expanding {np} at cost {candidate_g}");
                        } else {
                            log::trace!("decreasing key of {np} to {candidate_g}");
                        }
                        n.status = CellStatus::Open;
                        n.set_g(candidate_g);
                        n.parent = Some(current);
                        self.frontier.push(n_offset, n.f(), n.g());
                    }
                }
            }
        }

        self.nbuf = nbuf;

        if self.found {
            log::debug!(
                "found path {} -> {} with cost {} after expanding {} cells",
                self.start,
                self.end,
                grid[self.end].g(),
                self.expanded
            );
        } else {
            log::debug!(
                "no path {} -> {} after expanding {} cells",
                self.start,
                self.end,
                self.expanded
            );
        }
        self.found
    }

    pub fn is_solution_found(&self) -> bool {
        self.found
    }

    /// Number of cells closed during the last run
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Number of cells currently queued
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Follow parent links from the end back to the start.
    ///
    /// Empty unless the last run found a solution.
    pub fn path_from_end(&self, grid: &Grid) -> Vec<Point> {
        if !self.found {
            return Vec::new();
        }
        let mut path = Vec::new();
        let mut cur = Some(self.end);
        // Parent links are acyclic; the bound only guards a corrupted grid.
        while let Some(p) = cur {
            if path.len() == grid.len() {
                break;
            }
            path.push(p);
            cur = grid.cell(p).ok().and_then(|c| c.parent());
        }
        path
    }
}

/// Cost of moving between two cells, Euclidean between centers
fn edge_cost(from: Point, to: Point) -> f64 {
    from.euclidean(to)
}

fn check_endpoint(grid: &Grid, endpoint: Endpoint, point: Point) -> Result<()> {
    if grid.contains(point) {
        Ok(())
    } else {
        Err(Error::Configuration {
            endpoint,
            point,
            width: grid.width(),
            height: grid.height(),
        })
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::error::{Endpoint, Error};
    use crate::grid::{CellStatus, Grid, Point};
    use crate::pathfinder::{Frontier, Pathfinder};

    fn search(grid: &mut Grid, start: Point, end: Point) -> Pathfinder {
        grid.reset_search();
        let mut pathfinder = Pathfinder::new();
        pathfinder.initialize(grid, start, end).unwrap();
        pathfinder.run(grid);
        pathfinder
    }

    fn assert_connected(path: &[Point]) {
        for (a, b) in path.iter().tuple_windows() {
            assert_eq!(a.manhattan(*b), 1, "{a} and {b} are not adjacent");
        }
    }

    #[test]
    fn frontier_pops_lowest_f_first() {
        let mut frontier = Frontier::default();
        frontier.reset(4);
        frontier.push(0, 5.0, 0.0);
        frontier.push(1, 3.0, 0.0);
        frontier.push(2, 4.0, 0.0);
        assert_eq!(frontier.len(), 3);
        assert_eq!(frontier.pop(), Some(1));
        assert_eq!(frontier.pop(), Some(2));
        assert_eq!(frontier.pop(), Some(0));
        assert_eq!(frontier.pop(), None);
        assert_eq!(frontier.len(), 0);
    }

    #[test]
    fn frontier_ties_prefer_lower_g_then_insertion() {
        let mut frontier = Frontier::default();
        frontier.reset(4);
        frontier.push(0, 4.0, 2.0);
        frontier.push(1, 4.0, 1.0);
        frontier.push(2, 4.0, 1.0);
        assert_eq!(frontier.pop(), Some(1));
        assert_eq!(frontier.pop(), Some(2));
        assert_eq!(frontier.pop(), Some(0));
    }

    #[test]
    fn frontier_decrease_key_drops_stale_entry() {
        let mut frontier = Frontier::default();
        frontier.reset(3);
        frontier.push(0, 5.0, 5.0);
        frontier.push(1, 4.0, 4.0);
        frontier.push(0, 3.0, 3.0);
        assert_eq!(frontier.len(), 2);

        assert_eq!(frontier.pop(), Some(0));
        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.pop(), Some(1));
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn open_grid_path_has_manhattan_cost() {
        let mut grid = Grid::new(3, 3).unwrap();
        let end = Point::new(2, 2);
        let pathfinder = search(&mut grid, Point::ORIGIN, end);

        assert!(pathfinder.is_solution_found());
        assert_eq!(grid[end].g(), 4.0);
        let path = pathfinder.path_from_end(&grid);
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(&end));
        assert_eq!(path.last(), Some(&Point::ORIGIN));
        assert_connected(&path);
    }

    #[test]
    fn full_wall_has_no_solution() {
        let mut grid = Grid::new(3, 3).unwrap();
        for x in 0..3 {
            grid.set_blocked(Point::new(x, 1), true).unwrap();
        }
        let pathfinder = search(&mut grid, Point::ORIGIN, Point::new(0, 2));

        assert!(!pathfinder.is_solution_found());
        assert!(pathfinder.path_from_end(&grid).is_empty());
        assert_eq!(pathfinder.frontier_len(), 0);
        // Only the top row was reachable
        assert_eq!(pathfinder.expanded(), 3);
    }

    #[test]
    fn detour_around_wall() {
        // .#...
        // .#.#.
        // ...#.
        let mut grid = Grid::new(5, 3).unwrap();
        for p in [(1, 0), (1, 1), (3, 1), (3, 2)] {
            grid.set_blocked(Point::new(p.0, p.1), true).unwrap();
        }
        let end = Point::new(4, 2);
        let pathfinder = search(&mut grid, Point::ORIGIN, end);

        assert!(pathfinder.is_solution_found());
        assert_eq!(grid[end].g(), 10.0);
        let path = pathfinder.path_from_end(&grid);
        assert_eq!(path.len(), 11);
        assert_connected(&path);
        assert!(path.iter().all(|&p| !grid[p].is_blocked()));
    }

    #[test]
    fn blocked_endpoints_are_cleared() {
        let mut grid = Grid::new(3, 3).unwrap();
        let end = Point::new(2, 0);
        grid.set_blocked(Point::ORIGIN, true).unwrap();
        grid.set_blocked(end, true).unwrap();
        let pathfinder = search(&mut grid, Point::ORIGIN, end);

        assert!(pathfinder.is_solution_found());
        assert!(!grid.is_blocked(Point::ORIGIN).unwrap());
        assert!(!grid.is_blocked(end).unwrap());
        assert_eq!(grid[end].g(), 2.0);
    }

    #[test]
    fn start_equal_to_end() {
        let mut grid = Grid::new(2, 2).unwrap();
        let p = Point::new(1, 1);
        let pathfinder = search(&mut grid, p, p);
        assert!(pathfinder.is_solution_found());
        assert_eq!(pathfinder.path_from_end(&grid), vec![p]);
        assert_eq!(pathfinder.expanded(), 0);
    }

    #[test]
    fn f_is_g_plus_h_everywhere() {
        let mut grid = Grid::new(6, 5).unwrap();
        for y in 0..4 {
            grid.set_blocked(Point::new(2, y), true).unwrap();
        }
        search(&mut grid, Point::ORIGIN, Point::new(5, 0));
        for cell in grid.cells() {
            assert_eq!(cell.f(), cell.g() + cell.h(), "at {}", cell.pos());
        }
    }

    #[test]
    fn heuristic_is_manhattan_to_end() {
        let mut grid = Grid::new(4, 4).unwrap();
        let mut pathfinder = Pathfinder::new();
        pathfinder
            .initialize(&mut grid, Point::ORIGIN, Point::new(3, 1))
            .unwrap();
        assert_eq!(grid[Point::new(0, 3)].h(), 5.0);
        assert_eq!(grid[Point::new(3, 1)].h(), 0.0);
        assert_eq!(grid[Point::ORIGIN].status(), CellStatus::Open);
        assert_eq!(pathfinder.frontier_len(), 1);
    }

    #[test]
    fn repeated_runs_give_same_path() {
        let mut grid = Grid::new(7, 7).unwrap();
        for p in [(1, 1), (2, 1), (3, 1), (3, 2), (3, 3), (5, 4), (5, 5), (1, 5)] {
            grid.set_blocked(Point::new(p.0, p.1), true).unwrap();
        }
        let end = Point::new(6, 6);
        let first = search(&mut grid, Point::ORIGIN, end).path_from_end(&grid);
        let second = search(&mut grid, Point::ORIGIN, end).path_from_end(&grid);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn endpoints_outside_grid_are_rejected() {
        let mut grid = Grid::new(3, 3).unwrap();
        let mut pathfinder = Pathfinder::new();
        let err = pathfinder
            .initialize(&mut grid, Point::ORIGIN, Point::new(3, 0))
            .unwrap_err();
        assert_eq!(
            err,
            Error::Configuration {
                endpoint: Endpoint::End,
                point: Point::new(3, 0),
                width: 3,
                height: 3
            }
        );
        assert!(pathfinder
            .initialize(&mut grid, Point::new(0, 9), Point::ORIGIN)
            .is_err());
    }

    #[test]
    fn queued_cell_is_rekeyed_on_cheaper_path() {
        // A cell already queued at a stale, expensive priority moves up once a
        // cheaper route reaches it.
        let mut grid = Grid::new(3, 1).unwrap();
        let mut pathfinder = Pathfinder::new();
        let end = Point::new(2, 0);
        let middle = Point::new(1, 0);
        pathfinder.initialize(&mut grid, Point::ORIGIN, end).unwrap();
        {
            let cell = grid.at_mut(middle);
            cell.status = CellStatus::Open;
            cell.set_g(9.0);
            let (f, g) = (cell.f(), cell.g());
            pathfinder.frontier.push(1, f, g);
        }
        assert_eq!(pathfinder.frontier_len(), 2);

        assert!(pathfinder.run(&mut grid));
        assert_eq!(grid[middle].g(), 1.0);
        assert_eq!(grid[middle].f(), 2.0);
        assert_eq!(grid[middle].parent(), Some(Point::ORIGIN));
        assert_eq!(grid[end].g(), 2.0);
        // The stale entry was never expanded
        assert_eq!(pathfinder.expanded(), 2);
        assert_eq!(pathfinder.frontier_len(), 0);
    }

    #[test]
    fn closed_cell_is_reopened_on_cheaper_path() {
        // Stale costs left on a Closed cell are improved and the cell requeued.
        let mut grid = Grid::new(3, 1).unwrap();
        let mut pathfinder = Pathfinder::new();
        let end = Point::new(2, 0);
        pathfinder.initialize(&mut grid, Point::ORIGIN, end).unwrap();
        {
            let middle = grid.at_mut(Point::new(1, 0));
            middle.status = CellStatus::Closed;
            middle.set_g(9.0);
        }
        assert!(pathfinder.run(&mut grid));
        assert_eq!(grid[Point::new(1, 0)].g(), 1.0);
        assert_eq!(grid[end].g(), 2.0);
        assert_eq!(
            pathfinder.path_from_end(&grid),
            vec![end, Point::new(1, 0), Point::ORIGIN]
        );
    }
}
