use std::fmt;

use creepydom_core::{
    CellCoord, Command, Creature, Entity, Event, Intent, LevelCatalog, LevelSpec, Placement,
    ProgressStore, RankId, RankTable,
};
use creepydom_system_progress::{MemoryStore, Progress};
use creepydom_world::{self as world, World};

#[derive(Debug)]
struct Unwritable;

impl fmt::Display for Unwritable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("store is read-only")
    }
}

impl std::error::Error for Unwritable {}

#[derive(Debug, Default)]
struct ReadOnlyStore;

impl ProgressStore for ReadOnlyStore {
    type Error = Unwritable;

    fn get(&self) -> u32 {
        1
    }

    fn set(&mut self, _unlocked: u32) -> Result<(), Self::Error> {
        Err(Unwritable)
    }
}

/// Two short levels: start at rank 2 and reach rank 3.
fn short_campaign() -> World {
    let ranks = RankTable::reference();
    let spec = LevelSpec {
        grid_size: 4,
        start_rank: 2,
        target_rank: 3,
        special_probability: 0.0,
        time_budget_secs: Some(30),
        max_creature_rank: None,
        mystery_cells: 0,
    };
    let catalog =
        LevelCatalog::from_specs(&[spec.clone(), spec], &ranks).expect("valid campaign");
    World::new(ranks, catalog, 11)
}

fn play(world: &mut World, level: u32, meal_rank: u32) -> Vec<Event> {
    let meal = CellCoord::new(1, 0);
    let mut events = Vec::new();
    world::apply(
        world,
        Command::StartArrangedLevel {
            level,
            player: CellCoord::new(0, 0),
            occupants: vec![Placement {
                cell: meal,
                entity: Entity::Creature(Creature::plain(RankId::new(meal_rank))),
            }],
        },
        &mut events,
    );
    world::apply(
        world,
        Command::SubmitIntent {
            intent: Intent::Target(meal),
        },
        &mut events,
    );
    events
}

#[test]
fn winning_in_the_world_unlocks_the_next_level() {
    let mut world = short_campaign();
    // 4 starting points plus a rank-2 meal reaches the rank-3 threshold of 8.
    let events = play(&mut world, 1, 2);
    assert!(matches!(events.last(), Some(Event::GameWon { level: 1, .. })));

    let mut progress = Progress::new(MemoryStore::new());
    progress.handle(&events).expect("memory store");
    assert_eq!(progress.unlocked(), 2);
    assert!(progress.is_completed(1));
    assert!(progress.is_unlocked(2));
    assert_eq!(progress.completed_levels(2), 1);

    let events = play(&mut world, 2, 2);
    progress.handle(&events).expect("memory store");
    assert_eq!(progress.unlocked(), 3);
    assert_eq!(progress.completed_levels(2), 2);
}

#[test]
fn lost_level_leaves_progress_untouched() {
    let mut world = short_campaign();
    let events = play(&mut world, 1, 5);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::GameLost { level: 1, .. })));

    let mut progress = Progress::new(MemoryStore::new());
    progress.handle(&events).expect("memory store");
    assert_eq!(progress.unlocked(), 1);
}

#[test]
fn completed_levels_are_capped_by_catalog_size() {
    let progress = Progress::new(MemoryStore::with_unlocked(25));
    assert_eq!(progress.completed_levels(20), 20);
    assert!(progress.is_completed(20));
    assert!(progress.is_unlocked(25));
}

#[test]
fn store_failures_surface_to_the_caller() {
    let mut progress = Progress::new(ReadOnlyStore);
    let error = progress
        .handle(&[Event::GameWon {
            level: 1,
            rank: RankId::new(3),
            points: 8,
        }])
        .expect_err("read-only store");
    assert_eq!(error.to_string(), "store is read-only");
    assert_eq!(progress.unlocked(), 1);
}

#[test]
fn multiple_wins_keep_the_highest_unlock() {
    let mut progress = Progress::new(MemoryStore::new());
    let wins: Vec<Event> = [4, 2, 7, 3]
        .into_iter()
        .map(|level| Event::GameWon {
            level,
            rank: RankId::new(1),
            points: 2,
        })
        .collect();
    progress.handle(&wins).expect("memory store");
    assert_eq!(progress.unlocked(), 8);
    assert_eq!(progress.store().get(), 8);
}
