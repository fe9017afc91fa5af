//! Maze generation module.
//!
//! This module contains the recursive division generator. It splits the grid into chambers with
//! one-cell-thick walls, leaves a single passage through every wall, and returns the walls in the
//! order they should be drawn.

use rand::{rngs::StdRng, Rng as _, SeedableRng as _};

use crate::grid::{CellError, Grid, Position};

/// Ordered list of wall placements produced by one maze generation run.
///
/// The order is the drawing order: every divider comes before the dividers of the two chambers it
/// creates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MazeWallList(Vec<Position>);

impl MazeWallList {
    /// Returns the wall positions in drawing order.
    #[must_use]
    pub fn walls(&self) -> &[Position] {
        &self.0
    }

    /// Returns the number of walls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no wall was placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the list and returns the wall positions in drawing order.
    #[must_use]
    pub fn into_walls(self) -> Vec<Position> {
        self.0
    }
}

/// Direction a divider runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Orientation {
    /// The divider fills a row and splits the chamber into a top and a bottom half.
    Horizontal,
    /// The divider fills a column and splits the chamber into a left and a right half.
    Vertical,
}

/// Inclusive rectangle of cells processed by one division step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Chamber {
    /// First row.
    top: usize,
    /// First column.
    left: usize,
    /// Last row.
    bottom: usize,
    /// Last column.
    right: usize,
}

impl Chamber {
    /// Number of rows in the chamber.
    const fn height(self) -> usize {
        self.bottom - self.top + 1
    }

    /// Number of columns in the chamber.
    const fn width(self) -> usize {
        self.right - self.left + 1
    }
}

/// Smallest extent across which a divider fits: one cell on each side of it.
const MIN_DIVISIBLE: usize = 3;

/// State shared by every step of one generation run.
struct Divider {
    /// Seeded source of divider and passage choices.
    rng: StdRng,
    /// Cells that must never receive a wall.
    reserved: Vec<Position>,
    /// Walls placed so far, in drawing order.
    walls: Vec<Position>,
}

impl Divider {
    /// Picks the divider orientation for a chamber, or `None` once the chamber is too small.
    ///
    /// The divider cuts across the longer extent of the chamber. Square chambers flip a coin.
    fn orientation(&mut self, chamber: Chamber) -> Option<Orientation> {
        let (height, width) = (chamber.height(), chamber.width());

        match (height >= MIN_DIVISIBLE, width >= MIN_DIVISIBLE) {
            (false, false) => None,
            (true, false) => Some(Orientation::Horizontal),
            (false, true) => Some(Orientation::Vertical),
            (true, true) if width > height => Some(Orientation::Vertical),
            (true, true) if height > width => Some(Orientation::Horizontal),
            (true, true) => {
                if self.rng.random_bool(0.5) {
                    Some(Orientation::Horizontal)
                } else {
                    Some(Orientation::Vertical)
                }
            }
        }
    }

    /// Picks an odd offset strictly inside an extent, where the divider goes.
    fn wall_offset(&mut self, extent: usize) -> usize {
        2 * self.rng.random_range(0..(extent - 1) / 2) + 1
    }

    /// Picks an even offset within an extent, where the passage goes.
    fn passage_offset(&mut self, extent: usize) -> usize {
        2 * self.rng.random_range(0..extent.div_ceil(2))
    }

    /// Records the walls of one divider, leaving the passage and every reserved cell open.
    fn place<I: Iterator<Item = Position>>(&mut self, line: I, passage: Position) {
        for position in line {
            if position != passage && !self.reserved.contains(&position) {
                self.walls.push(position);
            }
        }
    }

    /// Splits a chamber with one divider and recurses into both halves.
    fn divide(&mut self, chamber: Chamber) {
        let Some(orientation) = self.orientation(chamber) else {
            return;
        };

        match orientation {
            Orientation::Horizontal => {
                let row = chamber.top + self.wall_offset(chamber.height());
                let passage = chamber.left + self.passage_offset(chamber.width());

                self.place(
                    (chamber.left..=chamber.right).map(|col| Position::new(row, col)),
                    Position::new(row, passage),
                );

                self.divide(Chamber {
                    bottom: row - 1,
                    ..chamber
                });
                self.divide(Chamber {
                    top: row + 1,
                    ..chamber
                });
            }
            Orientation::Vertical => {
                let col = chamber.left + self.wall_offset(chamber.width());
                let passage = chamber.top + self.passage_offset(chamber.height());

                self.place(
                    (chamber.top..=chamber.bottom).map(|row| Position::new(row, col)),
                    Position::new(passage, col),
                );

                self.divide(Chamber {
                    right: col - 1,
                    ..chamber
                });
                self.divide(Chamber {
                    left: col + 1,
                    ..chamber
                });
            }
        }
    }
}

/// Collects the cells the generator must leave open around one endpoint.
///
/// The endpoint itself is always reserved. An endpoint on a divider junction, an odd row and an odd
/// column, could be boxed in by the dividers crossing there, so its neighbours are reserved too.
fn reserve_around(grid: &Grid, endpoint: Position, reserved: &mut Vec<Position>) {
    reserved.push(endpoint);

    if endpoint.row % 2 == 1 && endpoint.col % 2 == 1 {
        reserved.extend(
            endpoint
                .neighbors()
                .filter(|neighbor| grid.contains(*neighbor)),
        );
    }
}

/// Generates a recursive division maze over the whole grid.
///
/// The grid is only read for its dimensions and endpoints; the walls are returned rather than
/// applied. The same grid and seed always produce the same list. Walls never land on the start or
/// the finish, and every divider keeps one passage open, so the open cells stay connected when the
/// walls are applied to a grid without other walls.
///
/// # Errors
///
/// - [`CellError::MissingEndpoint`] if the grid invariant was broken.
pub fn recursive_division(grid: &Grid, seed: u64) -> Result<MazeWallList, CellError> {
    let mut reserved = Vec::new();
    reserve_around(grid, grid.find_start()?.position, &mut reserved);
    reserve_around(grid, grid.find_finish()?.position, &mut reserved);

    let mut divider = Divider {
        rng: StdRng::seed_from_u64(seed),
        reserved,
        walls: Vec::new(),
    };

    if let (Some(bottom), Some(right)) = (grid.rows().checked_sub(1), grid.cols().checked_sub(1)) {
        divider.divide(Chamber {
            top: 0,
            left: 0,
            bottom,
            right,
        });
    }

    Ok(MazeWallList(divider.walls))
}

/// Generates a maze for the grid from a seed.
///
/// # Errors
///
/// - [`CellError::MissingEndpoint`] if the grid invariant was broken.
pub fn generate_maze(grid: &Grid, seed: u64) -> Result<MazeWallList, CellError> {
    recursive_division(grid, seed)
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use rstest::rstest;

    use super::*;
    use crate::search;

    /// Applies the walls to a copy of the grid.
    fn walled(grid: &Grid, walls: &MazeWallList) -> Grid {
        let mut grid = grid.clone();
        for position in walls.walls() {
            grid.toggle_wall(*position)
                .expect("generator never walls an endpoint");
        }
        grid
    }

    /// Collects every open cell reachable from the start.
    fn reachable(grid: &Grid) -> HashSet<Position> {
        let start = grid.find_start().expect("grid has a start").position;
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some(position) = queue.pop_front() {
            for neighbor in position.neighbors() {
                if grid.cell(neighbor).is_some_and(|cell| !cell.is_wall())
                    && seen.insert(neighbor)
                {
                    queue.push_back(neighbor);
                }
            }
        }

        seen
    }

    #[test]
    fn test_same_seed_same_walls() {
        let grid =
            Grid::new(20, 50, Position::new(2, 3), Position::new(10, 20)).expect("valid grid");

        let first = generate_maze(&grid, 7).expect("grid has endpoints");
        let second = generate_maze(&grid, 7).expect("grid has endpoints");

        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_four_by_four_terminates() {
        let grid = Grid::new(4, 4, Position::new(0, 0), Position::new(3, 3)).expect("valid grid");

        let walls = generate_maze(&grid, 1).expect("grid has endpoints");

        assert!(walls.len() < grid.len());
    }

    #[rstest]
    #[case::tiny(2, 2, Position::new(0, 0), Position::new(1, 1))]
    #[case::single_row(1, 9, Position::new(0, 0), Position::new(0, 8))]
    fn test_chamber_too_small_places_nothing_across_it(
        #[case] rows: usize,
        #[case] cols: usize,
        #[case] start: Position,
        #[case] finish: Position,
    ) {
        let grid = Grid::new(rows, cols, start, finish).expect("valid grid");

        let walls = generate_maze(&grid, 3).expect("grid has endpoints");

        let open = walled(&grid, &walls);
        assert_eq!(reachable(&open).len(), grid.len() - walls.len());
    }

    #[rstest]
    #[case::reference(20, 50, Position::new(2, 3), Position::new(10, 20), 11)]
    #[case::junction_start(15, 15, Position::new(7, 7), Position::new(0, 14), 5)]
    #[case::junction_both(9, 21, Position::new(1, 1), Position::new(7, 19), 42)]
    #[case::corners(10, 10, Position::new(0, 0), Position::new(9, 9), 0)]
    #[case::on_edges(12, 17, Position::new(5, 0), Position::new(11, 9), 99)]
    fn test_walls_avoid_endpoints_and_keep_grid_connected(
        #[case] rows: usize,
        #[case] cols: usize,
        #[case] start: Position,
        #[case] finish: Position,
        #[case] seed: u64,
    ) {
        let grid = Grid::new(rows, cols, start, finish).expect("valid grid");

        let walls = generate_maze(&grid, seed).expect("grid has endpoints");

        assert!(!walls.walls().contains(&start));
        assert!(!walls.walls().contains(&finish));
        let mut maze = walled(&grid, &walls);
        assert_eq!(reachable(&maze).len(), maze.len() - maze.wall_count());
        let (_, path) = search::compute_shortest_path(&mut maze).expect("grid has endpoints");
        assert!(path.steps().is_some());
    }

    #[test]
    fn test_walls_are_unique_and_inside_grid() {
        let grid =
            Grid::new(20, 50, Position::new(2, 3), Position::new(10, 20)).expect("valid grid");

        let walls = generate_maze(&grid, 2024).expect("grid has endpoints");

        let unique: HashSet<&Position> = walls.walls().iter().collect();
        assert_eq!(unique.len(), walls.len());
        assert!(walls.walls().iter().all(|wall| grid.contains(*wall)));
    }

    #[test]
    fn test_first_divider_spans_the_grid_before_children() {
        let grid = Grid::new(5, 11, Position::new(0, 0), Position::new(4, 10)).expect("valid grid");

        let walls = generate_maze(&grid, 8).expect("grid has endpoints");

        // The grid is wider than tall, so the first divider is a full column minus its passage.
        let first = walls.walls().first().expect("grid is divisible");
        let column = first.col;
        let leading = walls
            .walls()
            .iter()
            .take_while(|wall| wall.col == column)
            .count();
        assert_eq!(column % 2, 1);
        assert_eq!(leading, grid.rows() - 1);
    }
}
