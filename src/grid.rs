//! Grid model module.
//!
//! This module contains the cell grid the search and the maze generator operate on, together with
//! the commands that mutate it and the errors those commands reject with.

use std::{error::Error, fmt, str::FromStr};

/// Zero-indexed cell coordinate.
///
/// Positions order row-major: first by row, then by column. The shortest-path engine relies on this
/// ordering to break ties between cells settled at the same distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Row index, counted from the top edge.
    pub row: usize,
    /// Column index, counted from the left edge.
    pub col: usize,
}

impl Position {
    /// Builds a position from its row and column.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the orthogonal neighbours of this position in up, down, left, right order.
    ///
    /// Neighbours that would underflow the grid origin are omitted. Neighbours past the far edges
    /// are still returned; bounds against a concrete grid are checked by the [`Grid`] accessors.
    pub fn neighbors(self) -> impl Iterator<Item = Self> {
        [
            self.row.checked_sub(1).map(|row| Self::new(row, self.col)),
            self.row.checked_add(1).map(|row| Self::new(row, self.col)),
            self.col.checked_sub(1).map(|col| Self::new(self.row, col)),
            self.col.checked_add(1).map(|col| Self::new(self.row, col)),
        ]
        .into_iter()
        .flatten()
    }

    /// Returns the Manhattan distance between two positions.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FromStr for Position {
    type Err = String;

    /// Parses the `row,col` form used on the command line.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (row, col) = input
            .split_once(',')
            .ok_or_else(|| format!("expected `row,col`, found `{input}`"))?;
        let row = row
            .trim()
            .parse::<usize>()
            .map_err(|err| format!("invalid row `{}`: {err}", row.trim()))?;
        let col = col
            .trim()
            .parse::<usize>()
            .map_err(|err| format!("invalid column `{}`: {err}", col.trim()))?;

        Ok(Self::new(row, col))
    }
}

/// The two distinguished cells a search connects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// The cell the search starts from.
    Start,
    /// The cell the search is looking for.
    Finish,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Finish => f.write_str("finish"),
        }
    }
}

/// Role a cell plays on the board.
///
/// A cell has exactly one role, so a wall can never also be the start or the finish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Traversable cell.
    Open,
    /// Impassable cell.
    Wall,
    /// The search origin.
    Start,
    /// The search target.
    Finish,
}

/// Best-known distance of a cell from the start.
///
/// `Finite` values order below `Infinite`, which is what a relaxation step compares against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Distance {
    /// Reached in the given number of steps.
    Finite(usize),
    /// Not reached yet.
    Infinite,
}

impl Distance {
    /// Returns the step count, if the cell has been reached.
    #[must_use]
    pub const fn steps(self) -> Option<usize> {
        match self {
            Self::Finite(steps) => Some(steps),
            Self::Infinite => None,
        }
    }
}

/// One addressable unit of the grid.
///
/// Besides its role, a cell carries the search-local state the shortest-path engine writes:
/// distance, visited flag, and the back-link used to rebuild the path. The back-link is a
/// [`Position`] into the owning grid rather than a reference, which keeps cells `Copy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Coordinates of this cell.
    pub position: Position,
    /// Role of this cell.
    pub role: Role,
    /// Best-known distance from the start found by the last search.
    pub distance: Distance,
    /// Whether the last search settled this cell.
    pub visited: bool,
    /// Predecessor on the best-known route from the start.
    pub previous: Option<Position>,
}

impl Cell {
    /// Builds a cell with the given role and cleared search state.
    #[must_use]
    pub const fn new(position: Position, role: Role) -> Self {
        Self {
            position,
            role,
            distance: Distance::Infinite,
            visited: false,
            previous: None,
        }
    }

    /// Returns whether this cell is the start.
    #[must_use]
    pub const fn is_start(&self) -> bool {
        matches!(self.role, Role::Start)
    }

    /// Returns whether this cell is the finish.
    #[must_use]
    pub const fn is_finish(&self) -> bool {
        matches!(self.role, Role::Finish)
    }

    /// Returns whether this cell is a wall.
    #[must_use]
    pub const fn is_wall(&self) -> bool {
        matches!(self.role, Role::Wall)
    }

    /// Returns whether this cell is the start or the finish.
    #[must_use]
    pub const fn is_endpoint(&self) -> bool {
        matches!(self.role, Role::Start | Role::Finish)
    }
}

/// Errors returned by grid commands.
///
/// Every rejected command leaves the grid exactly as it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellError {
    /// The position lies outside the grid.
    InvalidCoordinate {
        /// Offending position.
        position: Position,
        /// Grid height.
        rows: usize,
        /// Grid width.
        cols: usize,
    },
    /// A wall was aimed at the start or the finish.
    IllegalWallPlacement(Position),
    /// The start and the finish would share a cell.
    EndpointsOverlap(Position),
    /// The grid lost one of its endpoints. The grid invariant makes this unreachable.
    MissingEndpoint(Endpoint),
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCoordinate {
                position,
                rows,
                cols,
            } => write!(f, "{position} lies outside the {rows}x{cols} grid"),
            Self::IllegalWallPlacement(position) => {
                write!(f, "cannot place a wall on the endpoint at {position}")
            }
            Self::EndpointsOverlap(position) => {
                write!(f, "start and finish cannot share the cell at {position}")
            }
            Self::MissingEndpoint(endpoint) => write!(f, "grid has no {endpoint} cell"),
        }
    }
}

impl Error for CellError {}

/// Rectangular, fixed-size container of cells.
///
/// Cells are stored row-major. The grid always holds exactly one start and one finish cell, and
/// neither of them is ever a wall.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Row-major cell storage.
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds an open grid with the start and finish at the given positions.
    ///
    /// # Errors
    ///
    /// - [`CellError::InvalidCoordinate`] if an endpoint lies outside the grid, which is always the
    ///   case for a grid with no rows or no columns.
    /// - [`CellError::EndpointsOverlap`] if both endpoints are the same position.
    pub fn new(
        rows: usize,
        cols: usize,
        start: Position,
        finish: Position,
    ) -> Result<Self, CellError> {
        for position in [start, finish] {
            if position.row >= rows || position.col >= cols {
                return Err(CellError::InvalidCoordinate {
                    position,
                    rows,
                    cols,
                });
            }
        }
        if start == finish {
            return Err(CellError::EndpointsOverlap(start));
        }

        let cells = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| Position::new(row, col)))
            .map(|position| {
                let role = if position == start {
                    Role::Start
                } else if position == finish {
                    Role::Finish
                } else {
                    Role::Open
                };
                Cell::new(position, role)
            })
            .collect();

        Ok(Self { rows, cols, cells })
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns whether the grid has no cells. A constructed grid never is.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns whether the position lies inside the grid.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.row < self.rows && position.col < self.cols
    }

    /// Returns all cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the cell at the given position, if inside the grid.
    #[must_use]
    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.index(position).and_then(|index| self.cells.get(index))
    }

    /// Returns the cell at the given position mutably, if inside the grid.
    pub(crate) fn cell_mut(&mut self, position: Position) -> Option<&mut Cell> {
        self.index(position)
            .and_then(|index| self.cells.get_mut(index))
    }

    /// Converts a position into its row-major storage index.
    fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.row * self.cols + position.col)
    }

    /// Looks up a cell, rejecting positions outside the grid.
    fn checked(&self, position: Position) -> Result<&Cell, CellError> {
        self.cell(position).ok_or(CellError::InvalidCoordinate {
            position,
            rows: self.rows,
            cols: self.cols,
        })
    }

    /// Replaces the cell at a position with a fresh one carrying the given role.
    ///
    /// Search state is cleared on the replaced cell. Callers validate the position first.
    fn replace(&mut self, position: Position, role: Role) {
        if let Some(cell) = self.cell_mut(position) {
            *cell = Cell::new(position, role);
        }
    }

    /// Paints a wall on the given cell.
    ///
    /// Painting an existing wall keeps it a wall.
    ///
    /// # Errors
    ///
    /// - [`CellError::InvalidCoordinate`] if the position lies outside the grid.
    /// - [`CellError::IllegalWallPlacement`] if the cell is the start or the finish.
    pub fn toggle_wall(&mut self, position: Position) -> Result<(), CellError> {
        if self.checked(position)?.is_endpoint() {
            return Err(CellError::IllegalWallPlacement(position));
        }
        self.replace(position, Role::Wall);

        Ok(())
    }

    /// Removes a wall from the given cell. Open cells are left untouched.
    ///
    /// # Errors
    ///
    /// - [`CellError::InvalidCoordinate`] if the position lies outside the grid.
    /// - [`CellError::IllegalWallPlacement`] if the cell is the start or the finish.
    pub fn erase_wall(&mut self, position: Position) -> Result<(), CellError> {
        let cell = self.checked(position)?;
        if cell.is_endpoint() {
            return Err(CellError::IllegalWallPlacement(position));
        }
        if cell.is_wall() {
            self.replace(position, Role::Open);
        }

        Ok(())
    }

    /// Moves the start to the given cell, clearing any wall there.
    ///
    /// # Errors
    ///
    /// - [`CellError::InvalidCoordinate`] if the position lies outside the grid.
    /// - [`CellError::EndpointsOverlap`] if the position holds the finish.
    /// - [`CellError::MissingEndpoint`] if the grid invariant was broken.
    pub fn relocate_start(&mut self, position: Position) -> Result<(), CellError> {
        self.relocate(Endpoint::Start, position)
    }

    /// Moves the finish to the given cell, clearing any wall there.
    ///
    /// # Errors
    ///
    /// - [`CellError::InvalidCoordinate`] if the position lies outside the grid.
    /// - [`CellError::EndpointsOverlap`] if the position holds the start.
    /// - [`CellError::MissingEndpoint`] if the grid invariant was broken.
    pub fn relocate_finish(&mut self, position: Position) -> Result<(), CellError> {
        self.relocate(Endpoint::Finish, position)
    }

    /// Shared implementation of the two relocation commands.
    fn relocate(&mut self, endpoint: Endpoint, position: Position) -> Result<(), CellError> {
        let (role, other) = match endpoint {
            Endpoint::Start => (Role::Start, Role::Finish),
            Endpoint::Finish => (Role::Finish, Role::Start),
        };
        if self.checked(position)?.role == other {
            return Err(CellError::EndpointsOverlap(position));
        }
        let previous = self.find(endpoint)?.position;

        self.replace(previous, Role::Open);
        self.replace(position, role);

        Ok(())
    }

    /// Returns the start cell.
    ///
    /// # Errors
    ///
    /// - [`CellError::MissingEndpoint`] if the grid invariant was broken.
    pub fn find_start(&self) -> Result<&Cell, CellError> {
        self.find(Endpoint::Start)
    }

    /// Returns the finish cell.
    ///
    /// # Errors
    ///
    /// - [`CellError::MissingEndpoint`] if the grid invariant was broken.
    pub fn find_finish(&self) -> Result<&Cell, CellError> {
        self.find(Endpoint::Finish)
    }

    /// Scans the grid for an endpoint.
    fn find(&self, endpoint: Endpoint) -> Result<&Cell, CellError> {
        self.cells
            .iter()
            .find(|cell| match endpoint {
                Endpoint::Start => cell.is_start(),
                Endpoint::Finish => cell.is_finish(),
            })
            .ok_or(CellError::MissingEndpoint(endpoint))
    }

    /// Clears the distance, visited flag, and back-link of every cell.
    pub fn reset_search_state(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::new(cell.position, cell.role);
        }
    }

    /// Counts the walls on the grid.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_wall()).count()
    }
}
