//! Shortest-path search module.
//!
//! This module contains the uniform-cost Dijkstra search over the grid and the reconstruction of
//! the path it found from the back-links the search leaves on each cell.

use std::{cmp::Reverse, collections::BinaryHeap};

use crate::grid::{Cell, CellError, Distance, Grid, Position};

/// Ordered record of one search run.
///
/// Holds a snapshot of every settled cell in the order the search settled it, together with the
/// finish position the run was looking for. A run is consumed by the animation that shows it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// Settled cells, in settlement order.
    visited: Vec<Cell>,
    /// Target of the run.
    finish: Position,
}

impl SearchResult {
    /// Returns the settled cells in settlement order.
    #[must_use]
    pub fn visited(&self) -> &[Cell] {
        &self.visited
    }

    /// Returns the finish position the run was looking for.
    #[must_use]
    pub const fn finish(&self) -> Position {
        self.finish
    }

    /// Returns whether the last settled cell is the finish.
    ///
    /// A run that exhausts its frontier without settling the finish found no path.
    #[must_use]
    pub fn reached_finish(&self) -> bool {
        self.visited
            .last()
            .is_some_and(|cell| cell.position == self.finish)
    }

    /// Consumes the run and returns the settled cells.
    #[must_use]
    pub fn into_visited(self) -> Vec<Cell> {
        self.visited
    }
}

/// Outcome of path reconstruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathResult {
    /// Cells from the start to the finish, both included.
    Found(Vec<Cell>),
    /// The finish cannot be reached from the start.
    NoPath,
}

impl PathResult {
    /// Returns the cells of the path, empty when no path exists.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        match self {
            Self::Found(cells) => cells,
            Self::NoPath => &[],
        }
    }

    /// Returns the number of steps from the start to the finish.
    #[must_use]
    pub fn steps(&self) -> Option<usize> {
        match self {
            Self::Found(cells) => cells.len().checked_sub(1),
            Self::NoPath => None,
        }
    }

    /// Consumes the result and returns the path cells, empty when no path exists.
    #[must_use]
    pub fn into_cells(self) -> Vec<Cell> {
        match self {
            Self::Found(cells) => cells,
            Self::NoPath => Vec::new(),
        }
    }
}

/// Runs Dijkstra's algorithm from `start` until `finish` is settled or the frontier runs dry.
///
/// Every edge weighs one step, so the settlement order matches a breadth-first search. Cells at the
/// same distance are settled in row-major order, which makes the visit order deterministic. A
/// neighbour's back-link only changes on a strictly shorter distance, so the first predecessor that
/// reached a cell keeps it.
///
/// The search state of every cell is cleared before the run starts.
pub fn dijkstra(grid: &mut Grid, start: Position, finish: Position) -> SearchResult {
    grid.reset_search_state();

    let mut frontier = BinaryHeap::new();
    let mut visited = Vec::new();

    if let Some(cell) = grid.cell_mut(start) {
        cell.distance = Distance::Finite(0);
        frontier.push(Reverse((0, start)));
    }

    while let Some(Reverse((distance, position))) = frontier.pop() {
        let Some(cell) = grid.cell_mut(position) else {
            continue;
        };
        if cell.visited || cell.is_wall() {
            continue;
        }
        cell.visited = true;
        visited.push(*cell);

        if position == finish {
            break;
        }

        let next = distance + 1;
        for neighbor in position.neighbors() {
            let Some(cell) = grid.cell_mut(neighbor) else {
                continue;
            };
            if cell.visited || cell.is_wall() {
                continue;
            }
            if Distance::Finite(next) < cell.distance {
                cell.distance = Distance::Finite(next);
                cell.previous = Some(position);
                frontier.push(Reverse((next, neighbor)));
            }
        }
    }

    SearchResult { visited, finish }
}

/// Rebuilds the path from `start` to `finish` by following back-links from the finish.
///
/// Returns [`PathResult::NoPath`] when the chain of back-links ends anywhere but the start. The
/// walk is bounded by the number of cells on the grid.
#[must_use]
pub fn reconstruct_path(grid: &Grid, start: Position, finish: Position) -> PathResult {
    let mut path = Vec::new();
    let mut current = grid.cell(finish);

    for _ in 0..grid.len() {
        let Some(cell) = current else {
            break;
        };
        path.push(*cell);

        if cell.position == start {
            path.reverse();
            return PathResult::Found(path);
        }

        current = cell.previous.and_then(|previous| grid.cell(previous));
    }

    PathResult::NoPath
}

/// Searches the grid from its start to its finish and rebuilds the shortest path.
///
/// # Errors
///
/// - [`CellError::MissingEndpoint`] if the grid invariant was broken.
pub fn compute_shortest_path(grid: &mut Grid) -> Result<(SearchResult, PathResult), CellError> {
    let start = grid.find_start()?.position;
    let finish = grid.find_finish()?.position;

    let search = dijkstra(grid, start, finish);
    let path = if search.reached_finish() {
        reconstruct_path(grid, start, finish)
    } else {
        PathResult::NoPath
    };

    Ok((search, path))
}
