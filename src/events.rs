//! Event handling functions for user input and application state updates.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use log::warn;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::{
    board::Board,
    grid::{CellError, Position},
    types::{Direction, MainMenuItem, Screen},
    App,
};

/// Poll timeout while an animation is in flight, roughly one frame at 60 Hz.
const ANIMATION_POLL: Duration = Duration::from_millis(16);

/// Poll timeout while the board is idle.
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Handles input events and updates the application state accordingly.
///
/// This function polls for keyboard events and dispatches them to the handler of the current
/// screen, then plays every animation event that has come due. The poll timeout shrinks while an
/// animation is in flight so that frames keep coming without user input.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    let timeout = if app.board.is_animating() {
        ANIMATION_POLL
    } else {
        IDLE_POLL
    };

    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key.code);
            }
        }
    }

    let _ = app.board.tick(Instant::now());

    Ok(())
}

/// Dispatches one key press to the handler of the current screen.
pub(crate) fn handle_key(app: &mut App, code: KeyCode) {
    if code == KeyCode::Char('q') {
        app.exit = true;
        return;
    }

    match app.screen {
        Screen::MainMenu(item) => handle_menu_key(app, item, code),
        Screen::Controls => {
            if matches!(code, KeyCode::Char('h') | KeyCode::Esc) {
                app.screen = Screen::MainMenu(MainMenuItem::Controls);
            }
        }
        Screen::Board => handle_board_key(app, code),
    }
}

/// Handles key presses on the main menu.
///
/// The `j` and `k` keys move the menu cursor down and up, and `l` selects the item under it.
pub(crate) fn handle_menu_key(app: &mut App, item: MainMenuItem, code: KeyCode) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.screen = Screen::MainMenu(item.next()),
        KeyCode::Char('k') | KeyCode::Up => app.screen = Screen::MainMenu(item.previous()),
        KeyCode::Char('l') | KeyCode::Enter => match item {
            MainMenuItem::Visualize => app.screen = Screen::Board,
            MainMenuItem::Controls => app.screen = Screen::Controls,
            MainMenuItem::Quit => app.exit = true,
        },
        _ => {}
    }
}

/// Handles key presses on the board screen.
///
/// Cursor movement and leaving the board are always available. Every other key issues a command
/// against the board, which is rejected while an animation is in flight.
pub(crate) fn handle_board_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Up | KeyCode::Char('k') => move_cursor(app, Direction::Up),
        KeyCode::Down | KeyCode::Char('j') => move_cursor(app, Direction::Down),
        KeyCode::Left | KeyCode::Char('h') => move_cursor(app, Direction::Left),
        KeyCode::Right | KeyCode::Char('l') => move_cursor(app, Direction::Right),
        KeyCode::Esc => app.screen = Screen::MainMenu(MainMenuItem::Visualize),
        KeyCode::Char(' ' | 'w') => command(app, "paint wall", Board::toggle_wall),
        KeyCode::Char('x') => command(app, "erase wall", Board::erase_wall),
        KeyCode::Char('s') => command(app, "place start", Board::relocate_start),
        KeyCode::Char('f') => command(app, "place finish", Board::relocate_finish),
        KeyCode::Char('c') => command(app, "clear board", |board, _| board.reset()),
        KeyCode::Char('S') => command(app, "respawn start", |board, _| board.respawn_start()),
        KeyCode::Char('F') => command(app, "respawn finish", |board, _| board.respawn_finish()),
        KeyCode::Char('d') | KeyCode::Enter => command(app, "search", |board, _| {
            board.visualize_search(Instant::now())
        }),
        KeyCode::Char('m') => command(app, "maze", |board, _| {
            board.generate_maze(None, Instant::now())
        }),
        _ => {}
    }
}

/// Moves the board cursor one cell, staying inside the grid.
fn move_cursor(app: &mut App, direction: Direction) {
    let grid = app.board.grid();
    app.cursor = direction.step(app.cursor, grid.rows(), grid.cols());
}

/// Issues a board command at the cursor and records its rejection, if any.
fn command<F, T>(app: &mut App, name: &str, run: F)
where
    F: FnOnce(&mut Board, Position) -> Result<T, CellError>,
{
    if app.board.is_animating() {
        warn!("{name} rejected at {}: animation in progress", app.cursor);
        app.status = Some(format!("{name}: wait for the animation to finish"));
        return;
    }

    match run(&mut app.board, app.cursor) {
        Ok(_) => app.status = None,
        Err(err) => {
            warn!("{name} rejected at {}: {err}", app.cursor);
            app.status = Some(format!("{name}: {err}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{animation::CellState, board::Outcome, config::Config};

    fn session() -> App {
        let config = Config {
            rows: 5,
            cols: 6,
            start: Position::new(0, 0),
            finish: Position::new(4, 5),
            seed: Some(9),
            ..Config::default()
        };
        let mut app = App::new(&config).expect("valid configuration");
        app.screen = Screen::Board;
        app
    }

    fn press(app: &mut App, keys: &str) {
        for key in keys.chars() {
            handle_key(app, KeyCode::Char(key));
        }
    }

    /// Plays the animation in flight to its end.
    fn finish_animation(app: &mut App) {
        let _ = app.board.tick(Instant::now() + Duration::from_secs(60));
    }

    #[test]
    fn test_menu_navigation() {
        let mut app = session();
        app.screen = Screen::MainMenu(MainMenuItem::Visualize);

        press(&mut app, "j");
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Controls));
        press(&mut app, "l");
        assert_eq!(app.screen, Screen::Controls);
        press(&mut app, "h");
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Controls));
        press(&mut app, "kl");
        assert_eq!(app.screen, Screen::Board);
    }

    #[test]
    fn test_quit_from_menu_and_board() {
        let mut app = session();
        press(&mut app, "q");
        assert!(app.exit);

        let mut app = session();
        app.screen = Screen::MainMenu(MainMenuItem::Quit);
        handle_key(&mut app, KeyCode::Enter);
        assert!(app.exit);
    }

    #[test]
    fn test_cursor_moves_and_clamps() {
        let mut app = session();

        press(&mut app, "kh");
        assert_eq!(app.cursor, Position::new(0, 0));
        press(&mut app, "jjllllllll");
        assert_eq!(app.cursor, Position::new(2, 5));
        handle_key(&mut app, KeyCode::Down);
        handle_key(&mut app, KeyCode::Left);
        assert_eq!(app.cursor, Position::new(3, 4));
    }

    #[test]
    fn test_paint_and_erase_wall() {
        let mut app = session();

        press(&mut app, "lw");
        assert!(app
            .board
            .grid()
            .cell(Position::new(0, 1))
            .is_some_and(|cell| cell.is_wall()));

        press(&mut app, "x");
        assert_eq!(app.board.grid().wall_count(), 0);
        assert_eq!(app.status, None);
    }

    #[test]
    fn test_painting_endpoint_reports_error() {
        let mut app = session();

        press(&mut app, "w");

        assert_eq!(app.board.grid().wall_count(), 0);
        assert_eq!(
            app.status.as_deref(),
            Some("paint wall: cannot place a wall on the endpoint at (0, 0)")
        );
    }

    #[test]
    fn test_mutations_rejected_while_animating() {
        let mut app = session();
        press(&mut app, "d");
        assert!(app.board.is_animating());
        let before = app.board.grid().clone();

        press(&mut app, "lwmc");

        assert_eq!(app.board.grid(), &before);
        assert_eq!(app.cursor, Position::new(0, 1));
        assert_eq!(
            app.status.as_deref(),
            Some("clear board: wait for the animation to finish")
        );
    }

    #[test]
    fn test_search_then_mutate_after_animation() {
        let mut app = session();
        press(&mut app, "d");
        finish_animation(&mut app);

        assert!(matches!(
            app.board.outcome(),
            Some(Outcome::PathFound { steps: 9, .. })
        ));
        assert_eq!(
            app.board.display_state(Position::new(4, 5)),
            CellState::ShortestPathEnd
        );

        press(&mut app, "jw");
        assert_eq!(
            app.board.display_state(Position::new(1, 0)),
            CellState::Wall
        );
    }

    #[test]
    fn test_place_endpoints_at_cursor() {
        let mut app = session();

        press(&mut app, "jjlfl");
        press(&mut app, "s");

        assert_eq!(
            app.board.grid().find_finish().map(|cell| cell.position),
            Ok(Position::new(2, 1))
        );
        assert_eq!(
            app.board.grid().find_start().map(|cell| cell.position),
            Ok(Position::new(2, 2))
        );
    }

    #[test]
    fn test_maze_key_starts_maze_animation() {
        let mut app = session();
        app.cursor = Position::new(2, 2);

        press(&mut app, "m");

        assert!(matches!(app.board.outcome(), Some(Outcome::Maze { .. })));
        finish_animation(&mut app);
        assert!(!app.board.is_animating());
    }

    #[test]
    fn test_escape_returns_to_menu() {
        let mut app = session();

        handle_key(&mut app, KeyCode::Esc);

        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Visualize));
    }
}
