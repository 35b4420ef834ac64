//! Square occupancy grid; the single source of truth for what is where.

use creepydom_core::{CellCoord, Direction, Entity};

const NEIGHBOUR_DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

/// Dense square grid where each cell holds at most one entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: u32,
    cells: Vec<Option<Entity>>,
}

impl Grid {
    /// Creates an empty grid with `size` cells per side.
    #[must_use]
    pub fn new(size: u32) -> Self {
        let capacity_u64 = u64::from(size) * u64::from(size);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            size,
            cells: vec![None; capacity],
        }
    }

    /// Number of cells along each side.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Returns the entity occupying the cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<&Entity> {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .and_then(Option::as_ref)
    }

    /// Places `entity` into an empty, in-bounds cell.
    ///
    /// Returns `false` and leaves the grid untouched otherwise.
    pub fn place(&mut self, entity: Entity, cell: CellCoord) -> bool {
        match self.slot_mut(cell) {
            Some(slot) if slot.is_none() => {
                *slot = Some(entity);
                true
            }
            _ => false,
        }
    }

    /// Replaces whatever occupies the cell; used when a mystery box resolves.
    pub(crate) fn replace(&mut self, entity: Entity, cell: CellCoord) {
        if let Some(slot) = self.slot_mut(cell) {
            *slot = Some(entity);
        }
    }

    /// Removes and returns the cell's occupant.
    pub fn remove(&mut self, cell: CellCoord) -> Option<Entity> {
        self.slot_mut(cell).and_then(Option::take)
    }

    /// Moves the occupant of `from` onto the empty cell `to`.
    ///
    /// Returns `false` without mutating when `from` is empty or `to` is
    /// occupied or out of bounds.
    pub fn relocate(&mut self, from: CellCoord, to: CellCoord) -> bool {
        if self.occupant(from).is_none() || !self.contains(to) || self.occupant(to).is_some() {
            return false;
        }
        match self.remove(from) {
            Some(entity) => self.place(entity, to),
            None => false,
        }
    }

    /// Reports whether two cells share an edge; diagonals do not count.
    #[must_use]
    pub fn is_adjacent(first: CellCoord, second: CellCoord) -> bool {
        first.is_adjacent(second)
    }

    /// In-bounds orthogonal neighbours of `cell`.
    pub fn neighbours(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        NEIGHBOUR_DIRECTIONS
            .into_iter()
            .filter_map(move |direction| cell.step(direction))
            .filter(|neighbour| self.contains(*neighbour))
    }

    /// Every empty cell in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<CellCoord> {
        self.iter()
            .filter(|(_, entity)| entity.is_none())
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Empty cells with no lethal neighbour, falling back to every empty cell.
    ///
    /// `is_lethal` decides which neighbouring occupants would threaten a
    /// token standing on the candidate cell. When no candidate is safe the
    /// full empty set is returned so spawning degrades instead of failing.
    #[must_use]
    pub fn find_safe_spawn_cells<F>(&self, is_lethal: F) -> Vec<CellCoord>
    where
        F: Fn(&Entity) -> bool,
    {
        let empty = self.empty_cells();
        let safe: Vec<CellCoord> = empty
            .iter()
            .copied()
            .filter(|cell| {
                !self
                    .neighbours(*cell)
                    .filter_map(|neighbour| self.occupant(neighbour))
                    .any(&is_lethal)
            })
            .collect();

        if safe.is_empty() {
            empty
        } else {
            safe
        }
    }

    /// Iterates every cell with its occupant in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Option<&Entity>)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().map(move |(index, entity)| {
            let index = index as u64;
            let width = u64::from(size.max(1));
            let cell = CellCoord::new((index % width) as u32, (index / width) as u32);
            (cell, entity.as_ref())
        })
    }

    /// Number of occupied cells, the player included.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    fn slot_mut(&mut self, cell: CellCoord) -> Option<&mut Option<Entity>> {
        self.index(cell).and_then(|index| self.cells.get_mut(index))
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.size && cell.row() < self.size {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.size).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creepydom_core::{Creature, Mystery, RankId};

    fn creature(rank: u32) -> Entity {
        Entity::Creature(Creature::plain(RankId::new(rank)))
    }

    #[test]
    fn place_refuses_occupied_and_out_of_bounds_cells() {
        let mut grid = Grid::new(3);
        assert!(grid.place(creature(1), CellCoord::new(1, 1)));
        assert!(!grid.place(creature(2), CellCoord::new(1, 1)));
        assert!(!grid.place(creature(2), CellCoord::new(3, 0)));
        assert_eq!(grid.occupant(CellCoord::new(1, 1)), Some(&creature(1)));
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn remove_empties_the_cell() {
        let mut grid = Grid::new(3);
        assert!(grid.place(Entity::Player, CellCoord::new(0, 2)));
        assert_eq!(grid.remove(CellCoord::new(0, 2)), Some(Entity::Player));
        assert_eq!(grid.remove(CellCoord::new(0, 2)), None);
        assert_eq!(grid.occupant(CellCoord::new(0, 2)), None);
    }

    #[test]
    fn relocate_requires_an_empty_destination() {
        let mut grid = Grid::new(3);
        assert!(grid.place(Entity::Player, CellCoord::new(0, 0)));
        assert!(grid.place(creature(0), CellCoord::new(1, 0)));

        assert!(!grid.relocate(CellCoord::new(0, 0), CellCoord::new(1, 0)));
        assert!(!grid.relocate(CellCoord::new(2, 2), CellCoord::new(2, 1)));
        assert!(grid.relocate(CellCoord::new(0, 0), CellCoord::new(0, 1)));
        assert_eq!(grid.occupant(CellCoord::new(0, 1)), Some(&Entity::Player));
        assert_eq!(grid.occupant(CellCoord::new(0, 0)), None);
    }

    #[test]
    fn neighbours_stay_inside_the_grid() {
        let grid = Grid::new(3);
        let corner: Vec<_> = grid.neighbours(CellCoord::new(0, 0)).collect();
        assert_eq!(corner, vec![CellCoord::new(1, 0), CellCoord::new(0, 1)]);
        assert_eq!(grid.neighbours(CellCoord::new(1, 1)).count(), 4);
        assert_eq!(grid.neighbours(CellCoord::new(2, 2)).count(), 2);
    }

    #[test]
    fn iter_walks_row_major() {
        let mut grid = Grid::new(2);
        assert!(grid.place(creature(3), CellCoord::new(1, 0)));
        let cells: Vec<_> = grid.iter().map(|(cell, _)| cell).collect();
        assert_eq!(
            cells,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(0, 1),
                CellCoord::new(1, 1),
            ]
        );
        assert_eq!(grid.empty_cells().len(), 3);
    }

    #[test]
    fn safe_spawn_avoids_lethal_neighbours() {
        let mut grid = Grid::new(3);
        assert!(grid.place(creature(9), CellCoord::new(1, 1)));
        let lethal = |entity: &Entity| matches!(entity, Entity::Creature(c) if c.rank() > RankId::new(2));

        let safe = grid.find_safe_spawn_cells(lethal);
        assert_eq!(
            safe,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(2, 0),
                CellCoord::new(0, 2),
                CellCoord::new(2, 2),
            ]
        );
    }

    #[test]
    fn safe_spawn_falls_back_to_any_empty_cell() {
        let mut grid = Grid::new(2);
        assert!(grid.place(creature(9), CellCoord::new(0, 0)));
        assert!(grid.place(
            Entity::Mystery(Mystery::new(Creature::plain(RankId::new(9)))),
            CellCoord::new(1, 1)
        ));
        let cells = grid.find_safe_spawn_cells(|entity| !matches!(entity, Entity::Player));
        assert_eq!(cells, vec![CellCoord::new(1, 0), CellCoord::new(0, 1)]);
    }

    #[test]
    fn full_grid_offers_no_spawn_cells() {
        let mut grid = Grid::new(2);
        for cell in grid.empty_cells() {
            assert!(grid.place(creature(0), cell));
        }
        assert!(grid.find_safe_spawn_cells(|_| false).is_empty());
    }
}
