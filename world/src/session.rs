//! Level sessions and the turn controller that mutates them.

use std::time::Duration;

use creepydom_core::{
    CellCoord, Creature, Entity, Event, Intent, LevelDefinition, LossReason, Outcome, Placement,
    RankTable, TurnState,
};
use creepydom_system_rules::{self as rules, RankChange};
use creepydom_system_spawning::EntityFactory;
use tracing::{debug, info, trace};

use crate::{clock::LevelClock, grid::Grid, player::Player};

/// Share of the grid filled with creatures when a level is generated.
const POPULATION_DENSITY: f64 = 0.6;

/// One attempt at a level: grid, player, clock, and outcome.
///
/// A retry builds a new session; nothing is ever reset in place.
#[derive(Clone, Debug)]
pub struct Session {
    level: LevelDefinition,
    grid: Grid,
    player: Player,
    clock: LevelClock,
    outcome: Outcome,
}

impl Session {
    /// Generates a populated session and spawns the player on a safe cell.
    ///
    /// Returns `None` only when the grid has no room for the player.
    pub(crate) fn generate(
        level: &LevelDefinition,
        ranks: &RankTable,
        factory: &mut EntityFactory,
    ) -> Option<Self> {
        let mut grid = Grid::new(level.grid_size());
        populate(&mut grid, level, ranks, factory);

        let start_rank = ranks.lookup(level.start_rank()).id();
        let candidates = grid.find_safe_spawn_cells(|entity| match entity {
            Entity::Creature(creature) => !rules::can_consume(start_rank, creature),
            Entity::Mystery(_) => true,
            Entity::Player => false,
        });
        let spawn = factory.pick_cell(&candidates)?;
        Self::spawn(level, ranks, grid, spawn)
    }

    /// Builds a session from an explicit layout.
    ///
    /// Occupants outside the grid, on the player's cell, or claiming to be the
    /// player are skipped. Returns `None` when the player cell is out of bounds.
    pub(crate) fn arrange(
        level: &LevelDefinition,
        ranks: &RankTable,
        player: CellCoord,
        occupants: &[Placement],
    ) -> Option<Self> {
        let mut grid = Grid::new(level.grid_size());
        if !grid.contains(player) {
            return None;
        }
        for placement in occupants {
            if placement.cell == player || matches!(placement.entity, Entity::Player) {
                continue;
            }
            if !grid.place(placement.entity, placement.cell) {
                trace!(cell = ?placement.cell, "skipping arranged occupant");
            }
        }
        Self::spawn(level, ranks, grid, player)
    }

    fn spawn(
        level: &LevelDefinition,
        ranks: &RankTable,
        mut grid: Grid,
        cell: CellCoord,
    ) -> Option<Self> {
        if !grid.place(Entity::Player, cell) {
            return None;
        }
        let points = ranks.lookup(level.start_rank()).threshold();
        let rank = rules::evolution_target(ranks, points);
        Some(Self {
            level: level.clone(),
            grid,
            player: Player::spawn(cell, points, rank),
            clock: LevelClock::new(level.time_budget_secs()),
            outcome: Outcome::InProgress,
        })
    }

    pub(crate) fn started_event(&self) -> Event {
        Event::LevelStarted {
            level: self.level.number(),
            grid_size: self.grid.size(),
            player: self.player.cell,
            rank: self.player.rank,
            target: self.level.target_rank(),
            time_budget_secs: self.clock.budget_secs(),
        }
    }

    /// Resolves a movement intent; rejected intents change nothing and emit nothing.
    pub(crate) fn submit_intent(
        &mut self,
        intent: Intent,
        ranks: &RankTable,
        out_events: &mut Vec<Event>,
    ) {
        if self.outcome.is_terminal() || !self.player.movable {
            trace!(?intent, "intent rejected while locked");
            return;
        }

        let from = self.player.cell;
        let target = match intent {
            Intent::Step(direction) => from.step(direction),
            Intent::Target(cell) => Some(cell),
        };
        let Some(target) = target.filter(|cell| self.grid.contains(*cell)) else {
            trace!(?intent, "intent rejected outside the grid");
            return;
        };
        if !Grid::is_adjacent(from, target) {
            trace!(?intent, "intent rejected for non-adjacent cell");
            return;
        }

        match self.grid.occupant(target).copied() {
            None => {
                if self.relocate(target, out_events) {
                    self.finish_move(ranks, out_events);
                }
            }
            Some(Entity::Creature(creature)) => self.engage(target, creature, ranks, out_events),
            Some(Entity::Mystery(mut mystery)) => {
                let creature = mystery.reveal();
                self.grid.replace(Entity::Creature(creature), target);
                out_events.push(Event::MysteryRevealed {
                    cell: target,
                    creature,
                });
                self.engage(target, creature, ranks, out_events);
            }
            Some(Entity::Player) => {}
        }
    }

    fn engage(
        &mut self,
        cell: CellCoord,
        creature: Creature,
        ranks: &RankTable,
        out_events: &mut Vec<Event>,
    ) {
        if !rules::can_consume(self.player.rank, &creature) {
            self.conclude(
                Outcome::Lost(LossReason::Eaten {
                    cell,
                    predator: creature,
                }),
                out_events,
            );
            return;
        }

        let eaten = self.grid.remove(cell);
        if !self.relocate(cell, out_events) {
            if let Some(entity) = eaten {
                self.grid.replace(entity, cell);
            }
            trace!(?cell, "consumption blocked; creature restored");
            return;
        }

        let points_delta = rules::points_gained(ranks, &creature);
        self.player.points = self.player.points.saturating_add(points_delta);
        out_events.push(Event::Consumed {
            cell,
            creature,
            points_delta,
            points: self.player.points,
        });

        let rank = rules::evolution_target(ranks, self.player.points);
        match rules::rank_change(self.player.rank, rank) {
            RankChange::Evolved { from, to } => {
                debug!(from = from.get(), to = to.get(), "player evolved");
                out_events.push(Event::Evolved { from, to });
            }
            RankChange::Devolved { from, to } => {
                debug!(from = from.get(), to = to.get(), "player devolved");
                out_events.push(Event::Devolved { from, to });
            }
            RankChange::Unchanged => {}
        }
        self.player.rank = rank;

        self.finish_move(ranks, out_events);
    }

    fn relocate(&mut self, to: CellCoord, out_events: &mut Vec<Event>) -> bool {
        let from = self.player.cell;
        if !self.grid.relocate(from, to) {
            return false;
        }
        self.player.history.push(from);
        self.player.cell = to;
        self.player.movable = false;
        debug!(?from, ?to, "player moved");
        out_events.push(Event::Moved { from, to });
        true
    }

    fn finish_move(&mut self, ranks: &RankTable, out_events: &mut Vec<Event>) {
        let target = ranks.lookup(self.level.target_rank()).id();
        if self.player.rank >= target {
            self.conclude(Outcome::Won, out_events);
            return;
        }
        if self.clock.start() {
            out_events.push(Event::ClockStarted {
                remaining_secs: self.clock.remaining_secs(),
            });
        }
    }

    fn conclude(&mut self, outcome: Outcome, out_events: &mut Vec<Event>) {
        self.outcome = outcome;
        self.clock.stop();
        let level = self.level.number();
        match outcome {
            Outcome::Won => {
                info!(level, points = self.player.points, "level won");
                out_events.push(Event::GameWon {
                    level,
                    rank: self.player.rank,
                    points: self.player.points,
                });
            }
            Outcome::Lost(reason) => {
                info!(level, %reason, "level lost");
                out_events.push(Event::GameLost { level, reason });
            }
            Outcome::InProgress => {}
        }
    }

    pub(crate) fn release_move_lock(&mut self) {
        if !self.outcome.is_terminal() {
            self.player.movable = true;
        }
    }

    /// Steps the player back one cell; points and eaten creatures stay as they are.
    pub(crate) fn undo_move(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome.is_terminal() {
            return;
        }
        let Some(&previous) = self.player.history.last() else {
            return;
        };
        let from = self.player.cell;
        if !self.grid.relocate(from, previous) {
            trace!(cell = ?previous, "undo blocked by occupied cell");
            return;
        }
        let _ = self.player.history.pop();
        self.player.cell = previous;
        out_events.push(Event::MoveUndone { from, to: previous });
    }

    pub(crate) fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.outcome.is_terminal() {
            return;
        }
        self.clock.accumulate(dt);
        while let Some(remaining_secs) = self.clock.next_tick() {
            out_events.push(Event::ClockTicked { remaining_secs });
        }
        if self.clock.is_expired() {
            self.conclude(Outcome::Lost(LossReason::TimeExpired), out_events);
        }
    }

    /// Definition the session was built from.
    #[must_use]
    pub fn level(&self) -> &LevelDefinition {
        &self.level
    }

    /// Authoritative occupancy grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The player token.
    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The level countdown.
    #[must_use]
    pub fn clock(&self) -> &LevelClock {
        &self.clock
    }

    /// Current outcome; frozen once terminal.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Observable controller state.
    #[must_use]
    pub const fn turn_state(&self) -> TurnState {
        if self.outcome.is_terminal() {
            TurnState::Terminal(self.outcome)
        } else if self.player.movable {
            TurnState::AwaitingIntent
        } else {
            TurnState::ResolvingMove
        }
    }
}

fn populate(grid: &mut Grid, level: &LevelDefinition, ranks: &RankTable, factory: &mut EntityFactory) {
    let mut cells = grid.empty_cells();
    let capacity = cells.len().saturating_sub(1);
    let wanted = (cells.len() as f64 * POPULATION_DENSITY).round() as usize;
    let count = wanted.min(capacity);
    let mysteries = usize::try_from(level.mystery_cells())
        .unwrap_or(usize::MAX)
        .min(count);

    factory.shuffle_cells(&mut cells);
    for (index, cell) in cells.into_iter().take(count).enumerate() {
        let entity = if index < mysteries {
            Entity::Mystery(factory.generate_mystery(ranks.max_rank()))
        } else {
            Entity::Creature(
                factory.generate_creature(level.max_creature_rank(), level.special_probability()),
            )
        };
        let _ = grid.place(entity, cell);
    }
    debug!(
        level = level.number(),
        creatures = count - mysteries,
        mysteries,
        "grid populated"
    );
}
