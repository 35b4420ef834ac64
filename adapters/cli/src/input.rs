//! Parsing of line-based player input.

use creepydom_core::{CellCoord, Direction, Intent};

/// Action requested by a single line of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Move(Intent),
    Undo,
    Retry,
    Next,
    Help,
    Quit,
    /// Blank line; only lets the clock advance.
    Wait,
}

/// Parses one line; `None` means the line was not understood.
pub(crate) fn parse(line: &str) -> Option<Action> {
    let mut words = line.split_whitespace();
    let Some(first) = words.next() else {
        return Some(Action::Wait);
    };

    let action = match first.to_ascii_lowercase().as_str() {
        "w" | "k" | "up" => Action::Move(Intent::Step(Direction::North)),
        "d" | "l" | "right" => Action::Move(Intent::Step(Direction::East)),
        "s" | "j" | "down" => Action::Move(Intent::Step(Direction::South)),
        "a" | "h" | "left" => Action::Move(Intent::Step(Direction::West)),
        "m" | "move" => {
            let column = words.next()?.parse().ok()?;
            let row = words.next()?.parse().ok()?;
            Action::Move(Intent::Target(CellCoord::new(column, row)))
        }
        "u" | "undo" => Action::Undo,
        "r" | "retry" => Action::Retry,
        "n" | "next" => Action::Next,
        "?" | "help" => Action::Help,
        "q" | "quit" | "exit" => Action::Quit,
        _ => return None,
    };

    if words.next().is_some() {
        return None;
    }
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_direction_aliases() {
        assert_eq!(
            parse("W"),
            Some(Action::Move(Intent::Step(Direction::North)))
        );
        assert_eq!(
            parse("  left "),
            Some(Action::Move(Intent::Step(Direction::West)))
        );
        assert_eq!(parse("j"), Some(Action::Move(Intent::Step(Direction::South))));
    }

    #[test]
    fn parses_explicit_targets() {
        assert_eq!(
            parse("m 3 4"),
            Some(Action::Move(Intent::Target(CellCoord::new(3, 4))))
        );
        assert_eq!(parse("m 3"), None);
        assert_eq!(parse("m -1 2"), None);
    }

    #[test]
    fn blank_line_waits() {
        assert_eq!(parse(""), Some(Action::Wait));
        assert_eq!(parse("   "), Some(Action::Wait));
    }

    #[test]
    fn rejects_unknown_and_trailing_words() {
        assert_eq!(parse("jump"), None);
        assert_eq!(parse("q now"), None);
    }
}
