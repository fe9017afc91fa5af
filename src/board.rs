//! Board session module.
//!
//! This module contains the [`Board`], which owns the one grid of a session together with the
//! playback of its current animation, and exposes the commands a front end issues against them.

use std::{fmt, time::Instant};

use log::{debug, info};
use rand::{rngs::StdRng, Rng as _, SeedableRng as _};

use crate::{
    animation::{self, CellState, Playback, Timing},
    config::Config,
    grid::{CellError, Grid, Position},
    maze,
    search,
};

/// Summary of the last algorithm run on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The search reached the finish.
    PathFound {
        /// Length of the shortest path, in steps.
        steps: usize,
        /// Number of cells the search settled.
        visited: usize,
    },
    /// The search exhausted the reachable cells without reaching the finish.
    NoPath {
        /// Number of cells the search settled.
        visited: usize,
    },
    /// A maze was generated.
    Maze {
        /// Number of walls placed.
        walls: usize,
        /// Seed the maze was generated from.
        seed: u64,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathFound { steps, visited } => {
                write!(f, "shortest path: {steps} steps, {visited} cells visited")
            }
            Self::NoPath { visited } => {
                write!(f, "no path found after visiting {visited} cells")
            }
            Self::Maze { walls, seed } => write!(f, "maze of {walls} walls (seed {seed})"),
        }
    }
}

/// Session state shared by every board command.
///
/// The board is the only owner of the grid. Commands that change the grid run synchronously and
/// finish before any animation they trigger starts; the animation itself is played back by calling
/// [`Board::tick`] between frames.
pub struct Board {
    /// The grid of the session.
    grid: Grid,
    /// Start position restored by [`Board::reset`].
    default_start: Position,
    /// Finish position restored by [`Board::reset`].
    default_finish: Position,
    /// Animation delays.
    timing: Timing,
    /// Playback of the current animation.
    playback: Playback,
    /// Summary of the last run.
    outcome: Option<Outcome>,
    /// Session random source, used for maze seeds and endpoint respawns.
    rng: StdRng,
}

impl Board {
    /// Builds a board from the session configuration.
    ///
    /// # Errors
    ///
    /// - [`CellError::InvalidCoordinate`] if a configured endpoint lies outside the grid.
    /// - [`CellError::EndpointsOverlap`] if both configured endpoints are the same position.
    pub fn new(config: &Config) -> Result<Self, CellError> {
        let grid = Grid::new(config.rows, config.cols, config.start, config.finish)?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        info!(
            "board of {}x{} cells, start {}, finish {}, session seed {seed}",
            config.rows, config.cols, config.start, config.finish
        );

        Ok(Self {
            playback: Playback::new(grid.rows(), grid.cols()),
            grid,
            default_start: config.start,
            default_finish: config.finish,
            timing: config.timing(),
            outcome: None,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Returns the grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the playback of the current animation.
    #[must_use]
    pub const fn playback(&self) -> &Playback {
        &self.playback
    }

    /// Returns the summary of the last run, if any.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Returns whether an animation is in flight.
    ///
    /// Front ends must not issue grid-changing commands while this holds.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.playback.is_animating()
    }

    /// Returns the state a renderer should show for a cell.
    ///
    /// Animation states win over the grid; otherwise walls show as [`CellState::Wall`] and every
    /// other cell as [`CellState::Unvisited`].
    #[must_use]
    pub fn display_state(&self, position: Position) -> CellState {
        self.playback.state(position).unwrap_or_else(|| {
            if self.grid.cell(position).is_some_and(|cell| cell.is_wall()) {
                CellState::Wall
            } else {
                CellState::Unvisited
            }
        })
    }

    /// Paints a wall on a cell.
    ///
    /// # Errors
    ///
    /// - [`CellError::InvalidCoordinate`] if the position lies outside the grid.
    /// - [`CellError::IllegalWallPlacement`] if the cell is the start or the finish.
    pub fn toggle_wall(&mut self, position: Position) -> Result<(), CellError> {
        self.grid.toggle_wall(position)?;
        self.playback.preset(position, CellState::Wall);

        Ok(())
    }

    /// Erases the wall on a cell.
    ///
    /// # Errors
    ///
    /// - [`CellError::InvalidCoordinate`] if the position lies outside the grid.
    /// - [`CellError::IllegalWallPlacement`] if the cell is the start or the finish.
    pub fn erase_wall(&mut self, position: Position) -> Result<(), CellError> {
        let was_wall = self.grid.cell(position).is_some_and(|cell| cell.is_wall());
        self.grid.erase_wall(position)?;
        if was_wall {
            self.playback.preset(position, CellState::Unvisited);
        }

        Ok(())
    }

    /// Moves the start to a cell.
    ///
    /// # Errors
    ///
    /// - [`CellError::InvalidCoordinate`] if the position lies outside the grid.
    /// - [`CellError::EndpointsOverlap`] if the cell holds the finish.
    /// - [`CellError::MissingEndpoint`] if the grid invariant was broken.
    pub fn relocate_start(&mut self, position: Position) -> Result<(), CellError> {
        let previous = self.grid.find_start()?.position;
        self.grid.relocate_start(position)?;
        self.playback.preset(previous, CellState::Unvisited);
        self.playback.preset(position, CellState::Unvisited);

        Ok(())
    }

    /// Moves the finish to a cell.
    ///
    /// # Errors
    ///
    /// - [`CellError::InvalidCoordinate`] if the position lies outside the grid.
    /// - [`CellError::EndpointsOverlap`] if the cell holds the start.
    /// - [`CellError::MissingEndpoint`] if the grid invariant was broken.
    pub fn relocate_finish(&mut self, position: Position) -> Result<(), CellError> {
        let previous = self.grid.find_finish()?.position;
        self.grid.relocate_finish(position)?;
        self.playback.preset(previous, CellState::Unvisited);
        self.playback.preset(position, CellState::Unvisited);

        Ok(())
    }

    /// Replaces the grid with an open one holding the configured endpoints.
    ///
    /// Any animation in flight is cancelled.
    ///
    /// # Errors
    ///
    /// - [`CellError`] if the configured endpoints no longer fit the grid, which a board built by
    ///   [`Board::new`] rules out.
    pub fn reset(&mut self) -> Result<(), CellError> {
        self.replace_grid(self.default_start, self.default_finish)
    }

    /// Clears the board and moves the start to a random cell other than the finish.
    ///
    /// # Errors
    ///
    /// - [`CellError::MissingEndpoint`] if the grid invariant was broken.
    pub fn respawn_start(&mut self) -> Result<Position, CellError> {
        let finish = self.grid.find_finish()?.position;
        let start = self.random_position_except(finish);
        self.replace_grid(start, finish)?;
        info!("start respawned at {start}");

        Ok(start)
    }

    /// Moves the finish to a random cell other than the start, keeping the walls.
    ///
    /// # Errors
    ///
    /// - [`CellError::MissingEndpoint`] if the grid invariant was broken.
    pub fn respawn_finish(&mut self) -> Result<Position, CellError> {
        let start = self.grid.find_start()?.position;
        let finish = self.random_position_except(start);
        self.grid.relocate_finish(finish)?;
        self.stop();
        self.playback.clear();
        info!("finish respawned at {finish}");

        Ok(finish)
    }

    /// Runs the shortest-path search and starts its animation.
    ///
    /// # Errors
    ///
    /// - [`CellError::MissingEndpoint`] if the grid invariant was broken.
    pub fn visualize_search(&mut self, now: Instant) -> Result<Outcome, CellError> {
        self.stop();
        let (run, path) = search::compute_shortest_path(&mut self.grid)?;

        let visited = run.visited().len();
        let outcome = match path.steps() {
            Some(steps) => Outcome::PathFound { steps, visited },
            None => Outcome::NoPath { visited },
        };
        info!("search for {} finished: {outcome}", run.finish());

        self.playback.clear();
        self.playback
            .start(animation::schedule_search_animation(run, path, self.timing), now);
        self.outcome = Some(outcome);

        Ok(outcome)
    }

    /// Generates a maze on an open grid and starts its animation.
    ///
    /// The walls are written into the grid right away; the overlay hides them until their events
    /// are played. A seed is drawn from the session random source when none is given.
    ///
    /// # Errors
    ///
    /// - [`CellError::MissingEndpoint`] if the grid invariant was broken.
    pub fn generate_maze(&mut self, seed: Option<u64>, now: Instant) -> Result<Outcome, CellError> {
        let seed = seed.unwrap_or_else(|| self.rng.random());
        let start = self.grid.find_start()?.position;
        let finish = self.grid.find_finish()?.position;
        self.replace_grid(start, finish)?;

        let walls = maze::generate_maze(&self.grid, seed)?;
        for position in walls.walls() {
            self.grid.toggle_wall(*position)?;
            self.playback.preset(*position, CellState::Unvisited);
        }

        let outcome = Outcome::Maze {
            walls: walls.len(),
            seed,
        };
        info!("maze generated: {outcome}");

        self.playback
            .start(animation::schedule_maze_animation(walls, self.timing), now);
        self.outcome = Some(outcome);

        Ok(outcome)
    }

    /// Applies every animation event due at `now` and returns how many were applied.
    pub fn tick(&mut self, now: Instant) -> usize {
        self.playback.advance(now)
    }

    /// Cancels the animation in flight, if any.
    fn stop(&mut self) {
        if self.playback.is_animating() {
            debug!("cancelling the animation in flight");
            self.playback.cancel();
        }
    }

    /// Replaces the grid wholesale and forgets the animation state.
    fn replace_grid(&mut self, start: Position, finish: Position) -> Result<(), CellError> {
        self.grid = Grid::new(self.grid.rows(), self.grid.cols(), start, finish)?;
        self.stop();
        self.playback.clear();
        self.outcome = None;

        Ok(())
    }

    /// Draws a uniformly random position other than `excluded`.
    fn random_position_except(&mut self, excluded: Position) -> Position {
        let cols = self.grid.cols();
        let excluded = excluded.row * cols + excluded.col;
        let mut index = self.rng.random_range(0..self.grid.len() - 1);
        if index >= excluded {
            index += 1;
        }

        Position::new(index / cols, index % cols)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn config() -> Config {
        Config {
            rows: 6,
            cols: 9,
            start: Position::new(1, 1),
            finish: Position::new(4, 7),
            seed: Some(17),
            ..Config::default()
        }
    }

    fn board() -> Board {
        Board::new(&config()).expect("valid configuration")
    }

    #[test]
    fn test_new_rejects_bad_endpoints() {
        let config = Config {
            finish: Position::new(6, 0),
            ..config()
        };

        assert!(matches!(
            Board::new(&config),
            Err(CellError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn test_search_animation_runs_to_completion() {
        let mut board = board();
        let now = Instant::now();

        let outcome = board.visualize_search(now).expect("grid has endpoints");

        assert!(matches!(outcome, Outcome::PathFound { steps: 9, .. }));
        assert!(board.is_animating());
        let _ = board.tick(now + Duration::from_secs(60));
        assert!(!board.is_animating());
        assert_eq!(
            board.display_state(Position::new(4, 7)),
            CellState::ShortestPathEnd
        );
        assert_eq!(
            board.display_state(Position::new(1, 1)),
            CellState::ShortestPathStart
        );
    }

    #[test]
    fn test_no_path_outcome() {
        let mut board = board();
        for col in 0..9 {
            board
                .toggle_wall(Position::new(3, col))
                .expect("open cell accepts a wall");
        }

        let outcome = board
            .visualize_search(Instant::now())
            .expect("grid has endpoints");

        assert_eq!(outcome, Outcome::NoPath { visited: 27 });
        assert_eq!(board.outcome(), Some(outcome));
    }

    #[test]
    fn test_rejected_command_leaves_board_unchanged() {
        let mut board = board();
        let before = board.grid().clone();

        assert_eq!(
            board.toggle_wall(Position::new(4, 7)),
            Err(CellError::IllegalWallPlacement(Position::new(4, 7)))
        );
        assert_eq!(board.grid(), &before);
        assert_eq!(
            board.display_state(Position::new(4, 7)),
            CellState::Unvisited
        );
    }

    #[test]
    fn test_maze_hides_walls_until_played() {
        let mut board = board();
        let now = Instant::now();

        let outcome = board
            .generate_maze(Some(3), now)
            .expect("grid has endpoints");

        let Outcome::Maze { walls, seed } = outcome else {
            panic!("maze generation reports a maze outcome");
        };
        assert_eq!(seed, 3);
        assert_eq!(board.grid().wall_count(), walls);
        assert!(board
            .grid()
            .cells()
            .iter()
            .all(|cell| board.display_state(cell.position) != CellState::MazeWall));
        let _ = board.tick(now + Duration::from_secs(60));
        assert!(board
            .grid()
            .cells()
            .iter()
            .filter(|cell| cell.is_wall())
            .all(|cell| board.display_state(cell.position) == CellState::MazeWall));
    }

    #[test]
    fn test_maze_replaces_painted_walls() {
        let mut board = board();
        board
            .toggle_wall(Position::new(0, 0))
            .expect("open cell accepts a wall");
        let expected = maze::generate_maze(
            &Grid::new(6, 9, Position::new(1, 1), Position::new(4, 7)).expect("valid grid"),
            5,
        )
        .expect("grid has endpoints");

        let _ = board
            .generate_maze(Some(5), Instant::now())
            .expect("grid has endpoints");

        assert_eq!(board.grid().wall_count(), expected.len());
    }

    #[test]
    fn test_new_run_cancels_animation_in_flight() {
        let mut board = board();
        let now = Instant::now();
        let _ = board.visualize_search(now).expect("grid has endpoints");

        let _ = board
            .generate_maze(Some(1), now)
            .expect("grid has endpoints");
        let _ = board.tick(now + Duration::from_secs(60));

        assert!(board
            .grid()
            .cells()
            .iter()
            .all(|cell| !matches!(board.display_state(cell.position), CellState::Visited { .. })));
    }

    #[test]
    fn test_reset_restores_configured_endpoints() {
        let mut board = board();
        board
            .relocate_start(Position::new(0, 0))
            .expect("relocation succeeds");
        board
            .toggle_wall(Position::new(2, 2))
            .expect("open cell accepts a wall");
        let _ = board
            .visualize_search(Instant::now())
            .expect("grid has endpoints");

        board.reset().expect("configured endpoints fit");

        assert_eq!(
            board.grid(),
            &Grid::new(6, 9, Position::new(1, 1), Position::new(4, 7)).expect("valid grid")
        );
        assert!(!board.is_animating());
        assert_eq!(board.outcome(), None);
    }

    #[test]
    fn test_relocation_forgets_shown_state_of_both_cells() {
        let mut board = board();
        let now = Instant::now();
        let _ = board.visualize_search(now).expect("grid has endpoints");
        let _ = board.tick(now + Duration::from_secs(60));

        board
            .relocate_start(Position::new(0, 0))
            .expect("relocation succeeds");
        board
            .relocate_finish(Position::new(4, 6))
            .expect("relocation succeeds");

        for position in [
            Position::new(1, 1),
            Position::new(0, 0),
            Position::new(4, 7),
            Position::new(4, 6),
        ] {
            assert_eq!(board.display_state(position), CellState::Unvisited);
        }
    }

    #[test]
    fn test_erasing_open_cell_keeps_distance_label() {
        let mut board = board();
        let now = Instant::now();
        let _ = board.visualize_search(now).expect("grid has endpoints");
        let _ = board.tick(now + Duration::from_secs(60));
        let position = Position::new(0, 1);
        let shown = board.display_state(position);

        board.erase_wall(position).expect("open cell can be erased");

        assert!(matches!(shown, CellState::Visited { distance: 1 }));
        assert_eq!(board.display_state(position), shown);
    }

    #[test]
    fn test_respawn_start_clears_board() {
        let mut board = board();
        board
            .toggle_wall(Position::new(2, 2))
            .expect("open cell accepts a wall");

        let start = board.respawn_start().expect("grid has endpoints");

        assert_ne!(start, Position::new(4, 7));
        assert_eq!(board.grid().find_start().map(|cell| cell.position), Ok(start));
        assert_eq!(board.grid().wall_count(), 0);
    }

    #[test]
    fn test_respawn_finish_keeps_walls() {
        let mut board = board();
        board
            .toggle_wall(Position::new(0, 8))
            .expect("open cell accepts a wall");

        let finish = board.respawn_finish().expect("grid has endpoints");

        assert_ne!(finish, Position::new(1, 1));
        assert_eq!(
            board.grid().find_finish().map(|cell| cell.position),
            Ok(finish)
        );
        assert_eq!(
            board.grid().wall_count(),
            usize::from(finish != Position::new(0, 8))
        );
    }

    #[test]
    fn test_random_position_never_hits_excluded() {
        let mut board = board();

        for _ in 0..500 {
            let position = board.random_position_except(Position::new(4, 7));
            assert_ne!(position, Position::new(4, 7));
            assert!(board.grid().contains(position));
        }
    }
}
