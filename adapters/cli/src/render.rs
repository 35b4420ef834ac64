//! Plain-text presentation of the board and world events.

use std::fmt::Write as _;

use creepydom_core::{CellContent, CellCoord, ClockDisplay, Creature, Event, RankTable, SpecialModifier};
use creepydom_world::{query, World};

const PROGRESS_BAR_WIDTH: usize = 20;

fn creature_glyph(creature: &Creature) -> String {
    let marker = match creature.modifier() {
        None => ' ',
        Some(SpecialModifier::Multiply2) => '*',
        Some(SpecialModifier::Multiply3) => '#',
        Some(SpecialModifier::Divide2) => '/',
        Some(SpecialModifier::Poison) => '!',
    };
    format!("{:>2}{marker}", creature.rank().get())
}

fn cell_glyph(content: CellContent) -> String {
    match content {
        CellContent::Empty => " . ".to_owned(),
        CellContent::Player => " @ ".to_owned(),
        CellContent::Mystery => " ? ".to_owned(),
        CellContent::Creature(creature) => creature_glyph(&creature),
    }
}

/// Renders the running session's grid and status lines.
pub(crate) fn board(world: &World) -> String {
    let Some(session) = query::session(world) else {
        return "no level running\n".to_owned();
    };
    let ranks = query::ranks(world);
    let level = session.level();
    let player = session.player();
    let size = session.grid().size();

    let mut out = String::new();
    for row in 0..size {
        for column in 0..size {
            out.push_str(&cell_glyph(query::cell_content(
                world,
                CellCoord::new(column, row),
            )));
        }
        out.push('\n');
    }

    let progress = query::target_progress(world);
    let filled = (progress * PROGRESS_BAR_WIDTH as f64).round() as usize;
    let _ = writeln!(
        out,
        "level {} | {} (rank {}) | {} pts | goal {} [{}{}] | {}",
        level.number(),
        ranks.lookup(player.rank()).name(),
        player.rank().get(),
        player.points(),
        ranks.lookup(level.target_rank()).name(),
        "=".repeat(filled.min(PROGRESS_BAR_WIDTH)),
        " ".repeat(PROGRESS_BAR_WIDTH.saturating_sub(filled)),
        ClockDisplay(session.clock().remaining_secs()),
    );
    out
}

/// Describes an event for the player; clock ticks stay silent.
pub(crate) fn describe(event: &Event, ranks: &RankTable) -> Option<String> {
    let line = match event {
        Event::LevelStarted {
            level,
            rank,
            target,
            time_budget_secs,
            ..
        } => format!(
            "Level {level}: grow from {} to {} within {}.",
            ranks.lookup(*rank).name(),
            ranks.lookup(*target).name(),
            ClockDisplay(*time_budget_secs),
        ),
        Event::MysteryRevealed { creature, .. } => {
            format!("The box held a {}.", ranks.lookup(creature.rank()).name())
        }
        Event::Consumed {
            creature,
            points_delta,
            ..
        } => {
            let name = ranks.lookup(creature.rank()).name();
            match creature.modifier() {
                Some(modifier) => {
                    format!("Ate a {name} ({}): {points_delta:+} pts.", modifier.label())
                }
                None => format!("Ate a {name}: {points_delta:+} pts."),
            }
        }
        Event::Evolved { to, .. } => format!("Evolved into a {}!", ranks.lookup(*to).name()),
        Event::Devolved { to, .. } => {
            format!("Poisoned back down to a {}.", ranks.lookup(*to).name())
        }
        Event::MoveUndone { .. } => "Stepped back.".to_owned(),
        Event::ClockStarted { remaining_secs } => {
            format!("The clock is running: {}.", ClockDisplay(*remaining_secs))
        }
        Event::GameWon { level, points, .. } => {
            format!("Level {level} complete with {points} pts! Type n for the next level.")
        }
        Event::GameLost { level, reason } => {
            format!("Level {level} lost: {reason}. Type r to retry.")
        }
        Event::Moved { .. } | Event::ClockTicked { .. } => return None,
    };
    Some(line)
}

/// Lists the accepted commands.
pub(crate) const HELP: &str = "\
moves: w/a/s/d (or h/j/k/l, up/down/left/right), m <column> <row>
other: u undo, r retry, n next level, ? help, q quit
an empty line just lets the clock run";

#[cfg(test)]
mod tests {
    use super::*;
    use creepydom_core::{Command, Entity, LossReason, Placement, RankId};

    #[test]
    fn board_draws_player_and_creatures() {
        let mut world = World::with_reference_data(3);
        let mut events = Vec::new();
        creepydom_world::apply(
            &mut world,
            Command::StartArrangedLevel {
                level: 1,
                player: CellCoord::new(0, 0),
                occupants: vec![Placement {
                    cell: CellCoord::new(1, 0),
                    entity: Entity::Creature(Creature::special(
                        RankId::new(12),
                        SpecialModifier::Poison,
                    )),
                }],
            },
            &mut events,
        );
        let text = board(&world);
        let first_row = text.lines().next().expect("grid row");
        assert!(first_row.starts_with(" @ 12!"));
        assert_eq!(text.lines().count(), 7);
        assert!(text.contains("Mite"));
        assert!(text.contains("1:30"));
    }

    #[test]
    fn idle_world_has_no_board() {
        let world = World::with_reference_data(3);
        assert_eq!(board(&world), "no level running\n");
    }

    #[test]
    fn ticks_are_silent() {
        let ranks = RankTable::reference();
        assert!(describe(&Event::ClockTicked { remaining_secs: 5 }, &ranks).is_none());
        let lost = Event::GameLost {
            level: 2,
            reason: LossReason::TimeExpired,
        };
        assert_eq!(
            describe(&lost, &ranks).as_deref(),
            Some("Level 2 lost: time expired. Type r to retry.")
        );
    }
}
