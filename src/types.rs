//! Type definitions and enums for the application state and navigation.

use crate::grid::Position;

/// Enumeration of available application screens.
///
/// This enumeration holds information about the current screen of the application. This is used to
/// determine which screen to render and what actions to take based on user input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Screen {
    /// Main menu screen.
    ///
    /// This variant represents the main menu, along with the item under the menu cursor.
    MainMenu(MainMenuItem),
    /// Key binding reference screen.
    Controls,
    /// Board screen.
    ///
    /// This variant represents the screen where the grid is edited and the algorithms are
    /// animated.
    Board,
}

/// Main menu navigation options.
///
/// This enumeration holds the different items in the main menu. It is used to determine which items
/// can the user select in the main menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MainMenuItem {
    /// "Visualize" menu option, which opens the board.
    Visualize,
    /// "Controls" menu option.
    Controls,
    /// "Quit" menu option.
    Quit,
}

impl MainMenuItem {
    /// Every item, in display order.
    pub(crate) const ALL: [Self; 3] = [Self::Visualize, Self::Controls, Self::Quit];

    /// Returns the label shown for the item.
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::Visualize => "Visualize",
            Self::Controls => "Controls",
            Self::Quit => "Quit",
        }
    }

    /// Returns the item below this one, staying on the last item.
    pub(crate) const fn next(self) -> Self {
        match self {
            Self::Visualize => Self::Controls,
            Self::Controls | Self::Quit => Self::Quit,
        }
    }

    /// Returns the item above this one, staying on the first item.
    pub(crate) const fn previous(self) -> Self {
        match self {
            Self::Quit => Self::Controls,
            Self::Controls | Self::Visualize => Self::Visualize,
        }
    }
}

/// Generic menu type configuration.
///
/// This enumeration holds the different specifics particular to each boxed menu in the
/// application's interface, so that they can share the same centered layout.
pub(crate) enum MenuType {
    /// Main menu configuration, holding its number of items.
    MainMenu(u8),
    /// Controls screen configuration, holding its number of lines.
    Controls(u8),
}

impl MenuType {
    /// Returns the string representation of the menu type.
    ///
    /// This function provides the display name for each menu variant, used as the title in the
    /// menu's border when rendering the interface.
    pub(crate) const fn repr(&self) -> &str {
        match self {
            Self::MainMenu(_) => "Main Menu",
            Self::Controls(_) => "Controls",
        }
    }

    /// Returns the numeric value stored by the menu type variant.
    ///
    /// This function provides access to the number of menu lines for layout calculations, allowing
    /// the UI to properly size the menu containers.
    pub(crate) const fn value(&self) -> u8 {
        match self {
            Self::MainMenu(value) | Self::Controls(value) => *value,
        }
    }

    /// Returns the width of the menu box, borders included.
    pub(crate) const fn width(&self) -> u16 {
        match self {
            Self::MainMenu(_) => 34,
            Self::Controls(_) => 46,
        }
    }

    /// Returns the key hint shown on the bottom border of the menu.
    pub(crate) const fn hint(&self) -> &str {
        match self {
            Self::MainMenu(_) => "(j) down / (k) up / (l) select",
            Self::Controls(_) => "(h) return",
        }
    }
}

/// Direction in which the board cursor moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    /// One row up.
    Up,
    /// One row down.
    Down,
    /// One column left.
    Left,
    /// One column right.
    Right,
}

impl Direction {
    /// Moves a position one step, clamping it to a grid of the given dimensions.
    pub(crate) fn step(self, position: Position, rows: usize, cols: usize) -> Position {
        let Position { row, col } = position;

        match self {
            Self::Up => Position::new(row.saturating_sub(1), col),
            Self::Down => Position::new((row + 1).min(rows.saturating_sub(1)), col),
            Self::Left => Position::new(row, col.saturating_sub(1)),
            Self::Right => Position::new(row, (col + 1).min(cols.saturating_sub(1))),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_main_menu_navigation_stops_at_edges() {
        assert_eq!(MainMenuItem::Visualize.next(), MainMenuItem::Controls);
        assert_eq!(MainMenuItem::Controls.next(), MainMenuItem::Quit);
        assert_eq!(MainMenuItem::Quit.next(), MainMenuItem::Quit);

        assert_eq!(MainMenuItem::Quit.previous(), MainMenuItem::Controls);
        assert_eq!(MainMenuItem::Controls.previous(), MainMenuItem::Visualize);
        assert_eq!(MainMenuItem::Visualize.previous(), MainMenuItem::Visualize);
    }

    #[test]
    fn test_main_menu_labels() {
        let labels: Vec<&str> = MainMenuItem::ALL.into_iter().map(MainMenuItem::label).collect();

        assert_eq!(labels, vec!["Visualize", "Controls", "Quit"]);
    }

    #[test]
    fn test_menu_type_repr() {
        let main_menu = MenuType::MainMenu(3);
        let controls = MenuType::Controls(12);

        assert_eq!(main_menu.repr(), "Main Menu");
        assert_eq!(controls.repr(), "Controls");
    }

    #[test]
    fn test_menu_type_value() {
        let main_menu = MenuType::MainMenu(3);
        let controls = MenuType::Controls(12);

        assert_eq!(main_menu.value(), 3);
        assert_eq!(controls.value(), 12);
    }

    #[rstest]
    #[case::up(Direction::Up, Position::new(1, 2))]
    #[case::down(Direction::Down, Position::new(3, 2))]
    #[case::left(Direction::Left, Position::new(2, 1))]
    #[case::right(Direction::Right, Position::new(2, 3))]
    fn test_direction_step(#[case] direction: Direction, #[case] expected: Position) {
        assert_eq!(direction.step(Position::new(2, 2), 5, 5), expected);
    }

    #[rstest]
    #[case::up(Direction::Up, Position::new(0, 0))]
    #[case::left(Direction::Left, Position::new(0, 0))]
    #[case::down(Direction::Down, Position::new(4, 6))]
    #[case::right(Direction::Right, Position::new(4, 6))]
    fn test_direction_step_clamps_to_grid(#[case] direction: Direction, #[case] corner: Position) {
        assert_eq!(direction.step(corner, 5, 7), corner);
    }

    #[test]
    fn test_debug_implementations() {
        assert_eq!(format!("{:?}", Screen::Board), "Board");
        assert_eq!(format!("{:?}", MainMenuItem::Controls), "Controls");
        assert_eq!(format!("{:?}", Direction::Left), "Left");
    }
}
