//! Grid shortest-path and maze generation visualizer.
//!
//! The library holds the grid model, the Dijkstra search and the reconstruction of its path, the
//! recursive division maze generator, and the scheduler that turns their results into timed render
//! events. The [`App`] drives them from a terminal user interface built on Ratatui.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

pub mod animation;
mod app;
pub mod board;
pub mod config;
mod events;
pub mod grid;
pub mod maze;
pub mod search;
mod types;
mod ui;

pub use app::App;
