use bevy::prelude::*;
use constants::gameplay::CELL_SIZE;
use serde::{Deserialize, Serialize};

/// Integer coordinate on a level's logical grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: usize,
    pub column: usize,
}

impl GridPosition {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Neighbouring cell one step in `direction`, if it stays inside `field`.
    pub fn step(self, direction: Direction, field: FieldSize) -> Option<Self> {
        let (row, column) = match direction {
            Direction::Up => (self.row.checked_sub(1)?, self.column),
            Direction::Down => (self.row + 1, self.column),
            Direction::Left => (self.row, self.column.checked_sub(1)?),
            Direction::Right => (self.row, self.column + 1),
        };

        let next = Self::new(row, column);
        field.contains(next).then_some(next)
    }

    /// World-space centre of the cell on the ground plane, with the field centred on the origin.
    pub fn to_world(self, field: FieldSize) -> Vec3 {
        let half_columns = (field.columns as f32 - 1.0) * 0.5;
        let half_rows = (field.rows as f32 - 1.0) * 0.5;

        Vec3::new(
            (self.column as f32 - half_columns) * CELL_SIZE,
            0.0,
            (self.row as f32 - half_rows) * CELL_SIZE,
        )
    }
}

impl std::fmt::Display for GridPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Movement directions, shared by keyboard buttons and pointer swipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Field dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSize {
    pub rows: usize,
    pub columns: usize,
}

impl FieldSize {
    pub const fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    pub fn contains(&self, position: GridPosition) -> bool {
        position.row < self.rows && position.column < self.columns
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = GridPosition> + use<> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| GridPosition::new(row, column)))
    }
}

/// Per-category grid overlay recording which entity occupies each cell.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayer<T> {
    size: FieldSize,
    cells: Vec<Option<T>>,
}

impl<T: Copy> MapLayer<T> {
    pub fn new(size: FieldSize) -> Self {
        Self {
            size,
            cells: vec![None; size.cell_count()],
        }
    }

    pub fn size(&self) -> FieldSize {
        self.size
    }

    fn index(&self, position: GridPosition) -> Option<usize> {
        self.size
            .contains(position)
            .then(|| position.row * self.size.columns + position.column)
    }

    pub fn get(&self, position: GridPosition) -> Option<T> {
        self.index(position).and_then(|index| self.cells[index])
    }

    pub fn is_occupied(&self, position: GridPosition) -> bool {
        self.get(position).is_some()
    }

    /// Store `value` at `position`, returning the previous occupant.
    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, position: GridPosition, value: T) -> Option<T> {
        let index = self.index(position)?;
        self.cells[index].replace(value)
    }

    pub fn remove(&mut self, position: GridPosition) -> Option<T> {
        let index = self.index(position)?;
        self.cells[index].take()
    }

    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = None);
    }

    /// Occupied cells in row-major scan order.
    pub fn occupied(&self) -> impl Iterator<Item = (GridPosition, T)> + '_ {
        self.size
            .cells()
            .zip(self.cells.iter())
            .filter_map(|(position, cell)| cell.map(|value| (position, value)))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}

/// Identifier of an entity registered in a map layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// The live map layers of a game session, one per category.
#[derive(Debug, Clone)]
pub struct GameMaps {
    pub obstacles: MapLayer<EntityId>,
    pub consumables: MapLayer<EntityId>,
    pub player: MapLayer<EntityId>,
}

impl GameMaps {
    pub fn new(size: FieldSize) -> Self {
        Self {
            obstacles: MapLayer::new(size),
            consumables: MapLayer::new(size),
            player: MapLayer::new(size),
        }
    }

    pub fn size(&self) -> FieldSize {
        self.obstacles.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_stays_inside_field() {
        let field = FieldSize::new(3, 4);
        let corner = GridPosition::new(0, 0);

        assert_eq!(corner.step(Direction::Up, field), None);
        assert_eq!(corner.step(Direction::Left, field), None);
        assert_eq!(corner.step(Direction::Down, field), Some(GridPosition::new(1, 0)));
        assert_eq!(corner.step(Direction::Right, field), Some(GridPosition::new(0, 1)));

        let far = GridPosition::new(2, 3);
        assert_eq!(far.step(Direction::Down, field), None);
        assert_eq!(far.step(Direction::Right, field), None);
    }

    #[test]
    fn world_position_is_centred() {
        let field = FieldSize::new(5, 5);
        assert_eq!(GridPosition::new(2, 2).to_world(field), Vec3::ZERO);
        assert_eq!(
            GridPosition::new(0, 4).to_world(field),
            Vec3::new(2.0 * CELL_SIZE, 0.0, -2.0 * CELL_SIZE)
        );
    }

    #[test]
    fn layer_set_get_remove() {
        let mut layer = MapLayer::new(FieldSize::new(2, 2));
        let cell = GridPosition::new(1, 0);

        assert_eq!(layer.set(cell, EntityId(7)), None);
        assert_eq!(layer.get(cell), Some(EntityId(7)));
        assert_eq!(layer.set(cell, EntityId(8)), Some(EntityId(7)));
        assert_eq!(layer.remove(cell), Some(EntityId(8)));
        assert!(!layer.is_occupied(cell));
    }

    #[test]
    fn layer_ignores_out_of_bounds() {
        let mut layer = MapLayer::new(FieldSize::new(2, 2));
        let outside = GridPosition::new(2, 0);

        assert_eq!(layer.set(outside, EntityId(1)), None);
        assert_eq!(layer.get(outside), None);
        assert_eq!(layer.occupied_count(), 0);
    }

    #[test]
    fn occupied_scans_row_major() {
        let mut layer = MapLayer::new(FieldSize::new(3, 3));
        layer.set(GridPosition::new(2, 0), EntityId(3));
        layer.set(GridPosition::new(0, 2), EntityId(1));
        layer.set(GridPosition::new(1, 1), EntityId(2));

        let ids: Vec<_> = layer.occupied().map(|(_, id)| id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        layer.clear();
        assert_eq!(layer.occupied().count(), 0);
    }
}
