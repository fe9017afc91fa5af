//! Core application state and main loop of the visualizer.

use color_eyre::eyre::Result;
use ratatui::DefaultTerminal;

use crate::{
    board::Board,
    config::Config,
    events,
    grid::Position,
    types::{MainMenuItem, Screen},
    ui,
};

/// Application state container for the visualizer.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui will render the screens and Crossterm events will help writing to.
pub struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It is set to `true` when the user
    /// wants to quit but it starts off `false`.
    pub(crate) exit: bool,
    /// Current screen being displayed to the user.
    pub(crate) screen: Screen,
    /// Board session.
    ///
    /// This field holds the grid together with the playback of the animation in flight. Every
    /// command issued from the board screen goes through it.
    pub(crate) board: Board,
    /// Cell under the board cursor.
    pub(crate) cursor: Position,
    /// Message about the last rejected command.
    ///
    /// This field is cleared by the next command that succeeds.
    pub(crate) status: Option<String>,
}

impl App {
    /// Creates a new instance of the App structure from the session configuration.
    ///
    /// # Errors
    ///
    /// - [`crate::grid::CellError`] if the configured endpoints do not fit the configured grid.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            exit: false,
            screen: Screen::MainMenu(MainMenuItem::Visualize),
            board: Board::new(config)?,
            cursor: config.start,
            status: None,
        })
    }

    /// Runs the main loop of the application.
    ///
    /// This function handles user input, advances the animation in flight, and redraws the
    /// application state. The loop continues until the exit condition is `true`, after which the
    /// function returns to the call site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.exit {
            let _ = terminal.try_draw(|frame| ui::draw(self, frame).map_err(std::io::Error::other))?;
            events::handle_events(self)?;
        }

        Ok(())
    }
}
