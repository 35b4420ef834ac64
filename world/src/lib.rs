#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state management for Creepydom.

mod clock;
mod grid;
mod player;
mod session;

use creepydom_core::{Command, Event, LevelCatalog, RankTable};
use creepydom_system_spawning::EntityFactory;
use tracing::{debug, warn};

pub use clock::LevelClock;
pub use grid::Grid;
pub use player::Player;
pub use session::Session;

/// Represents the authoritative Creepydom world state.
///
/// The world owns the read-only rank and level registries, the seeded entity
/// factory, and at most one level session.
#[derive(Debug)]
pub struct World {
    ranks: RankTable,
    catalog: LevelCatalog,
    factory: EntityFactory,
    session: Option<Session>,
}

impl World {
    /// Creates an idle world from externally supplied registries.
    #[must_use]
    pub fn new(ranks: RankTable, catalog: LevelCatalog, seed: u64) -> Self {
        Self {
            ranks,
            catalog,
            factory: EntityFactory::from_seed(seed),
            session: None,
        }
    }

    /// Creates an idle world using the built-in ranks and campaign.
    #[must_use]
    pub fn with_reference_data(seed: u64) -> Self {
        let ranks = RankTable::reference();
        let catalog = LevelCatalog::reference(&ranks);
        Self::new(ranks, catalog, seed)
    }

    fn install(&mut self, session: Session, out_events: &mut Vec<Event>) {
        let started = session.started_event();
        debug!(?started, "level session started");
        self.session = Some(session);
        out_events.push(started);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartLevel { level } => {
            let definition = world.catalog.lookup(level);
            match Session::generate(definition, &world.ranks, &mut world.factory) {
                Some(session) => world.install(session, out_events),
                None => warn!(level, "level grid has no room for the player"),
            }
        }
        Command::StartArrangedLevel {
            level,
            player,
            occupants,
        } => {
            let definition = world.catalog.lookup(level);
            match Session::arrange(definition, &world.ranks, player, &occupants) {
                Some(session) => world.install(session, out_events),
                None => warn!(level, ?player, "arranged player cell lies outside the grid"),
            }
        }
        Command::AbandonLevel => {
            if world.session.take().is_some() {
                debug!("level session abandoned");
            }
        }
        Command::SubmitIntent { intent } => {
            if let Some(session) = world.session.as_mut() {
                session.submit_intent(intent, &world.ranks, out_events);
            }
        }
        Command::ReleaseMoveLock => {
            if let Some(session) = world.session.as_mut() {
                session.release_move_lock();
            }
        }
        Command::UndoMove => {
            if let Some(session) = world.session.as_mut() {
                session.undo_move(out_events);
            }
        }
        Command::Tick { dt } => {
            if let Some(session) = world.session.as_mut() {
                session.tick(dt, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use creepydom_core::{
        CellContent, CellCoord, LevelCatalog, Outcome, RankTable, TurnState,
    };
    use creepydom_system_rules as rules;

    use super::{Player, Session, World};

    /// Provides read-only access to the rank registry.
    #[must_use]
    pub fn ranks(world: &World) -> &RankTable {
        &world.ranks
    }

    /// Provides read-only access to the level registry.
    #[must_use]
    pub fn catalog(world: &World) -> &LevelCatalog {
        &world.catalog
    }

    /// Provides read-only access to the running session, if any.
    #[must_use]
    pub fn session(world: &World) -> Option<&Session> {
        world.session.as_ref()
    }

    /// Provides read-only access to the player of the running session.
    #[must_use]
    pub fn player(world: &World) -> Option<&Player> {
        world.session.as_ref().map(Session::player)
    }

    /// Reports the controller state; `Idle` when no session exists.
    #[must_use]
    pub fn turn_state(world: &World) -> TurnState {
        world
            .session
            .as_ref()
            .map_or(TurnState::Idle, Session::turn_state)
    }

    /// Outcome of the running session, if any.
    #[must_use]
    pub fn outcome(world: &World) -> Option<Outcome> {
        world.session.as_ref().map(Session::outcome)
    }

    /// Presentation-safe content of a cell; mysteries stay masked.
    #[must_use]
    pub fn cell_content(world: &World, cell: CellCoord) -> CellContent {
        CellContent::from(
            world
                .session
                .as_ref()
                .and_then(|session| session.grid().occupant(cell)),
        )
    }

    /// Seconds left on the running session's clock.
    #[must_use]
    pub fn remaining_secs(world: &World) -> Option<u32> {
        world
            .session
            .as_ref()
            .map(|session| session.clock().remaining_secs())
    }

    /// Fraction of the target rank's threshold the player has covered.
    #[must_use]
    pub fn target_progress(world: &World) -> f64 {
        world.session.as_ref().map_or(0.0, |session| {
            rules::target_progress(
                &world.ranks,
                session.player().points(),
                session.level().target_rank(),
            )
        })
    }
}
