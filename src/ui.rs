//! User interface rendering functions for all application screens.

use std::rc::Rc;

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::DOT,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::{
    animation::CellState,
    board::{Board, Outcome},
    grid::{Position, Role},
    types::{MainMenuItem, MenuType, Screen},
    App,
};

/// Key bindings listed on the controls screen.
const CONTROLS: [(&str, &str); 13] = [
    ("arrows / hjkl", "move the cursor"),
    ("space / w", "paint a wall"),
    ("x", "erase a wall"),
    ("s", "place the start"),
    ("f", "place the finish"),
    ("d / enter", "run Dijkstra"),
    ("m", "generate a maze"),
    ("c", "clear the board"),
    ("S", "respawn the start"),
    ("F", "respawn the finish"),
    ("esc", "back to the menu"),
    ("q", "quit"),
    ("", "edits wait for animations"),
];

/// Style of unselected menu entries.
const CONTENT_STYLE: Style = Style::new().fg(Color::Green);

/// Style of the selected menu entry.
const ACTIVE_CONTENT_STYLE: Style = Style::new().fg(Color::White).bg(Color::Green);

/// Updates the application UI based on the persistent state.
///
/// This function renders different screens based on the current state stored in the [`App`]
/// structure, dispatching to the appropriate rendering function for each screen type.
///
/// # Errors
///
/// This function may return errors from layout lookups or data conversion failures.
pub(crate) fn draw(app: &App, frame: &mut Frame) -> Result<()> {
    match app.screen {
        Screen::MainMenu(item) => main_menu(frame, item),
        Screen::Controls => controls(frame),
        Screen::Board => board(app, frame)?,
    }

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
///
/// This function renders a clear widget over the entire area of the frame to prepare for
/// rendering new content without artifacts from previous buffers rendered on the same frame.
pub(crate) fn clear(frame: &mut Frame) {
    frame.render_widget(Clear, frame.area());
}

/// Renders the generic layout structure for the boxed menus.
///
/// This function creates the common layout and block structure used by the main menu and the
/// controls screen. The generic part includes the centered positioning and border styling, while
/// the specific content is handled by the caller using the returned one-line slots.
pub(crate) fn init_menu(frame: &mut Frame, menu: &MenuType) -> Rc<[Rect]> {
    let [layout] = Layout::vertical([Constraint::Length(u16::from(menu.value()) + 2)])
        .flex(Flex::Center)
        .areas(frame.area());
    let [layout] = Layout::horizontal([Constraint::Length(menu.width())])
        .flex(Flex::Center)
        .areas(layout);

    let block = Block::bordered()
        .title(menu.repr())
        .title_bottom(menu.hint())
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);

    let inner_space = block.inner(layout);

    frame.render_widget(block, layout);

    Layout::vertical(vec![Constraint::Max(1); menu.value().into()]).split(inner_space)
}

/// Renders the main menu screen with navigation options.
///
/// This function displays the main menu with its "Visualize", "Controls", and "Quit" entries,
/// highlighting the one under the menu cursor.
pub(crate) fn main_menu(frame: &mut Frame, item: MainMenuItem) {
    clear(frame);

    let inner_layout = init_menu(frame, &MenuType::MainMenu(3));

    for (entry, area) in MainMenuItem::ALL.into_iter().zip(inner_layout.iter()) {
        let style = if entry == item {
            ACTIVE_CONTENT_STYLE
        } else {
            CONTENT_STYLE
        };
        frame.render_widget(Line::styled(entry.label(), style).centered(), *area);
    }
}

/// Renders the controls screen listing every board key binding.
pub(crate) fn controls(frame: &mut Frame) {
    clear(frame);

    let inner_layout = init_menu(frame, &MenuType::Controls(13));

    for ((keys, action), area) in CONTROLS.into_iter().zip(inner_layout.iter()) {
        let line = Line::from(vec![
            Span::styled(format!("{keys:>14}"), ACTIVE_CONTENT_STYLE),
            Span::styled(format!("  {action}"), CONTENT_STYLE),
        ]);
        frame.render_widget(line, *area);
    }
}

/// Returns the label and style of one board cell.
///
/// The endpoints keep their letter whatever the animation shows on them. Visited cells carry their
/// distance from the start when it fits the cell width, and the cell under the cursor is drawn
/// reversed.
fn cell_span(board: &Board, position: Position, cursor: Position, width: usize) -> Span<'static> {
    let role = board.grid().cell(position).map(|cell| cell.role);
    let state = board.display_state(position);

    let label = match (role, state) {
        (Some(Role::Start), _) => String::from("S"),
        (Some(Role::Finish), _) => String::from("F"),
        (_, CellState::Unvisited) => String::from(DOT),
        (_, CellState::Visited { distance }) => {
            let label = distance.to_string();
            if label.len() <= width {
                label
            } else {
                String::new()
            }
        }
        _ => String::new(),
    };
    let style = match state {
        CellState::Unvisited => Style::new().fg(Color::DarkGray),
        CellState::Wall => Style::new().bg(Color::Green),
        CellState::MazeWall => Style::new().bg(Color::LightGreen),
        CellState::Visited { .. } => Style::new().fg(Color::White).bg(Color::Blue),
        CellState::ShortestPath | CellState::ShortestPathStart | CellState::ShortestPathEnd => {
            Style::new().bg(Color::Yellow)
        }
    };
    let style = match role {
        Some(Role::Start | Role::Finish) => style.fg(Color::Red).add_modifier(Modifier::BOLD),
        _ => style,
    };
    let style = if position == cursor {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    };

    Span::styled(format!("{label:<width$}"), style)
}

/// Returns the progress of an animation as a rounded percentage.
fn progress_percent(applied: usize, total: usize) -> Option<u64> {
    let applied = u64::try_from(applied).ok()?;
    let total = u64::try_from(total).ok().filter(|total| *total > 0)?;

    Some(rounded_div::u64(applied.saturating_mul(100), total).min(100))
}

/// Returns the distance label of a cell, once the animation has shown it.
fn distance_label(board: &Board, position: Position) -> Option<usize> {
    match board.display_state(position) {
        CellState::Visited { distance } => Some(distance),
        CellState::ShortestPath | CellState::ShortestPathStart | CellState::ShortestPathEnd => board
            .grid()
            .cell(position)
            .and_then(|cell| cell.distance.steps()),
        CellState::Unvisited | CellState::Wall | CellState::MazeWall => None,
    }
}

/// Builds the status line shown under the board.
///
/// It holds the cursor position and its distance label, then either the animation progress or the
/// outcome of the last run, then the last rejected command.
pub(crate) fn status_line(app: &App) -> Line<'static> {
    let board = &app.board;
    let mut spans = vec![Span::styled(format!("cursor {}", app.cursor), CONTENT_STYLE)];

    if let Some(distance) = distance_label(board, app.cursor) {
        spans.push(Span::styled(format!("  distance {distance}"), CONTENT_STYLE));
    }

    match (board.playback().progress(), board.outcome()) {
        (Some((applied, total)), _) => {
            if let Some(percent) = progress_percent(applied, total) {
                spans.push(Span::styled(
                    format!("  animating {percent}%"),
                    Style::new().fg(Color::Yellow),
                ));
            }
        }
        (None, Some(outcome @ Outcome::NoPath { .. })) => {
            spans.push(Span::styled(
                format!("  {outcome}"),
                Style::new().fg(Color::White).bg(Color::Red),
            ));
        }
        (None, Some(outcome)) => {
            spans.push(Span::styled(format!("  {outcome}"), CONTENT_STYLE));
        }
        (None, None) => {}
    }

    if let Some(status) = &app.status {
        spans.push(Span::styled(format!("  {status}"), Style::new().fg(Color::Red)));
    }

    Line::from(spans)
}

/// Renders the board screen with the grid and the status line.
///
/// Cells are drawn two columns wide when the terminal leaves room for it, which keeps them roughly
/// square, and one column wide otherwise. Grids larger than the terminal are clipped.
///
/// # Errors
///
/// This function may return errors from layout lookups.
pub(crate) fn board(app: &App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let grid = app.board.grid();
    let overall_layout = Layout::vertical([Constraint::Min(1), Constraint::Length(2)])
        .split(frame.area());
    let board_area = *overall_layout
        .first()
        .ok_or_eyre("failed to get board area from layout")?;
    let status_area = *overall_layout
        .last()
        .ok_or_eyre("failed to get status area from layout")?;

    let block = Block::bordered()
        .title("Board")
        .title_bottom("(d) search / (m) maze / (c) clear / (esc) menu / (q) quit")
        .title_alignment(Alignment::Center)
        .style(Style::new().fg(Color::Green))
        .border_type(BorderType::Rounded);
    let inner_space = block.inner(board_area);
    frame.render_widget(block, board_area);

    let width = if usize::from(inner_space.width) >= grid.cols() * 2 {
        2
    } else {
        1
    };
    let lines: Vec<Line> = (0..grid.rows())
        .map(|row| {
            Line::from(
                (0..grid.cols())
                    .map(|col| cell_span(&app.board, Position::new(row, col), app.cursor, width))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner_space);

    let status = Paragraph::new(status_line(app)).block(
        Block::new()
            .borders(Borders::TOP)
            .border_type(BorderType::Plain)
            .style(Style::new().fg(Color::Green)),
    );
    frame.render_widget(status, status_area);

    Ok(())
}
