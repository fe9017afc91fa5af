//! Animation scheduling and playback module.
//!
//! This module turns the output of the search and the maze generator into timed, symbolic render
//! events, and contains the playback state that applies those events as time passes.

use std::{
    iter::Peekable,
    time::{Duration, Instant},
};

use crate::{
    grid::Position,
    maze::MazeWallList,
    search::{PathResult, SearchResult},
};

/// Default delay between two search visit steps, in milliseconds.
pub const VISIT_DELAY_MS: u64 = 10;

/// Default delay between two shortest-path reveal steps, in milliseconds.
///
/// Slower than the visit steps so the final path stands out from the exploration before it.
pub const PATH_DELAY_MS: u64 = 50;

/// Default delay between two maze wall steps, in milliseconds.
pub const MAZE_DELAY_MS: u64 = 10;

/// Symbolic state a renderer should show for a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    /// Nothing to show beyond the bare cell.
    Unvisited,
    /// A painted wall.
    Wall,
    /// Settled by the search, labelled with its distance from the start.
    Visited {
        /// Distance from the start at which the cell was settled.
        distance: usize,
    },
    /// Inner cell of the shortest path.
    ShortestPath,
    /// First cell of the shortest path.
    ShortestPathStart,
    /// Last cell of the shortest path.
    ShortestPathEnd,
    /// A wall placed by the maze generator.
    MazeWall,
}

/// One step of an animation: what to show where, and when.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderEvent {
    /// Cell the event applies to.
    pub position: Position,
    /// State to show for the cell.
    pub state: CellState,
    /// Time from the start of the animation at which to show it.
    pub offset: Duration,
}

/// Per-kind delay units of the animations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// Delay between search visit steps.
    pub visit: Duration,
    /// Delay between shortest-path reveal steps.
    pub path: Duration,
    /// Delay between maze wall steps.
    pub maze: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            visit: Duration::from_millis(VISIT_DELAY_MS),
            path: Duration::from_millis(PATH_DELAY_MS),
            maze: Duration::from_millis(MAZE_DELAY_MS),
        }
    }
}

/// Returns the offset of the `index`-th step of a block spaced by `unit`.
fn step_offset(unit: Duration, index: usize) -> Duration {
    unit.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Schedules the animation of a search run followed by the reveal of its shortest path.
///
/// Every visited cell gets a [`CellState::Visited`] event, one visit delay apart. The path reveal
/// starts one visit delay after the last visit event and spaces its cells by the path delay. No
/// path events are produced when the search found no path.
pub fn schedule_search_animation(
    search: SearchResult,
    path: PathResult,
    timing: Timing,
) -> impl Iterator<Item = RenderEvent> {
    let visited = search.into_visited();
    let reveal_at = step_offset(timing.visit, visited.len());

    let cells = path.into_cells();
    let last = cells.len().saturating_sub(1);

    let visits = visited
        .into_iter()
        .enumerate()
        .map(move |(index, cell)| RenderEvent {
            position: cell.position,
            state: CellState::Visited {
                distance: cell.distance.steps().unwrap_or_default(),
            },
            offset: step_offset(timing.visit, index),
        });

    let reveal = cells
        .into_iter()
        .enumerate()
        .map(move |(index, cell)| RenderEvent {
            position: cell.position,
            state: match index {
                0 => CellState::ShortestPathStart,
                index if index == last => CellState::ShortestPathEnd,
                _ => CellState::ShortestPath,
            },
            offset: reveal_at.saturating_add(step_offset(timing.path, index)),
        });

    visits.chain(reveal)
}

/// Schedules the animation of a maze, one wall per maze delay in generation order.
pub fn schedule_maze_animation(
    walls: MazeWallList,
    timing: Timing,
) -> impl Iterator<Item = RenderEvent> {
    walls
        .into_walls()
        .into_iter()
        .enumerate()
        .map(move |(index, position)| RenderEvent {
            position,
            state: CellState::MazeWall,
            offset: step_offset(timing.maze, index),
        })
}

/// Event stream of the animation in flight.
type Pending = Peekable<Box<dyn Iterator<Item = RenderEvent>>>;

/// Animation playback state.
///
/// This structure applies the render events of at most one animation as time passes, keeping the
/// symbolic state of every cell they touched in an overlay a renderer draws on top of the grid.
pub struct Playback {
    /// Events of the animation in flight that have not been applied yet.
    ///
    /// Replacing this stream is what cancels an animation: stale events are dropped with it.
    pending: Option<Pending>,
    /// Time at which the animation in flight started.
    started: Instant,
    /// Number of columns of the grid the overlay mirrors.
    cols: usize,
    /// Row-major symbolic states applied so far.
    overlay: Vec<Option<CellState>>,
    /// Number of events applied from the animation in flight.
    applied: usize,
    /// Number of events the animation in flight started with.
    total: usize,
}

impl Playback {
    /// Creates an idle playback for a grid of the given dimensions.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            pending: None,
            started: Instant::now(),
            cols,
            overlay: vec![None; rows * cols],
            applied: 0,
            total: 0,
        }
    }

    /// Starts playing a new animation, dropping the events of any animation still in flight.
    pub fn start<I>(&mut self, events: I, now: Instant)
    where
        I: Iterator<Item = RenderEvent> + 'static,
    {
        let events: Box<dyn Iterator<Item = RenderEvent>> = Box::new(events);
        self.total = events.size_hint().0;
        self.applied = 0;
        self.started = now;

        let mut events = events.peekable();
        self.pending = events.peek().is_some().then_some(events);
    }

    /// Drops the events of the animation in flight. The overlay keeps what was already shown.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Cancels the animation in flight and forgets every state shown so far.
    pub fn clear(&mut self) {
        self.cancel();
        self.overlay.fill(None);
        self.applied = 0;
        self.total = 0;
    }

    /// Returns whether an animation still has events to apply.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.pending.is_some()
    }

    /// Applies every event due at `now` and returns how many were applied.
    pub fn advance(&mut self, now: Instant) -> usize {
        self.apply_until(now.saturating_duration_since(self.started))
    }

    /// Applies every pending event whose offset is at most `elapsed`, in emission order.
    ///
    /// The animation ends once its last event is applied.
    pub fn apply_until(&mut self, elapsed: Duration) -> usize {
        let Some(pending) = self.pending.as_mut() else {
            return 0;
        };

        let mut count = 0;
        while let Some(event) = pending.next_if(|event| event.offset <= elapsed) {
            if let Some(slot) = overlay_index(self.cols, event.position)
                .and_then(|index| self.overlay.get_mut(index))
            {
                *slot = Some(event.state);
            }
            count += 1;
        }
        self.applied += count;

        if pending.peek().is_none() {
            self.pending = None;
        }

        count
    }

    /// Sets the state of a cell directly, outside any animation.
    pub fn preset(&mut self, position: Position, state: CellState) {
        if let Some(slot) = self.slot(position) {
            *slot = Some(state);
        }
    }

    /// Returns the state last shown for a cell, if any.
    #[must_use]
    pub fn state(&self, position: Position) -> Option<CellState> {
        overlay_index(self.cols, position)
            .and_then(|index| self.overlay.get(index).copied().flatten())
    }

    /// Returns the applied and total event counts of the animation in flight.
    #[must_use]
    pub const fn progress(&self) -> Option<(usize, usize)> {
        if self.is_animating() {
            Some((self.applied, self.total))
        } else {
            None
        }
    }

    /// Returns the overlay slot of a cell mutably.
    fn slot(&mut self, position: Position) -> Option<&mut Option<CellState>> {
        overlay_index(self.cols, position).and_then(|index| self.overlay.get_mut(index))
    }
}

/// Converts a position into a row-major overlay index for a grid `cols` wide.
///
/// Rows past the end yield an index past the overlay, which the callers' `get` rejects.
fn overlay_index(cols: usize, position: Position) -> Option<usize> {
    (position.col < cols).then(|| position.row * cols + position.col)
}
