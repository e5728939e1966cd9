use std::collections::HashMap;

use crate::config::DEFAULT_FOOD_QUANTITY;

pub type Vec2 = (i32, i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    Food,
    Nest,
    Deadly,
}

impl Cell {
    pub fn from_char(c: char) -> Self {
        match c {
            'W' => Cell::Wall,
            'N' => Cell::Nest,
            'F' => Cell::Food,
            'D' => Cell::Deadly,
            _ => Cell::Empty,
        }
    }
}

/// Movement directions, in Q-table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    // y grows downwards
    pub fn delta(self) -> Vec2 {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    pub fn apply(self, pos: Vec2) -> Vec2 {
        let (dx, dy) = self.delta();
        (pos.0 + dx, pos.1 + dy)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodSource {
    pub x: i32,
    pub y: i32,
    pub initial_quantity: u32,
    pub quantity: u32,
}

impl FoodSource {
    pub fn new(x: i32, y: i32, quantity: u32) -> Self {
        Self {
            x,
            y,
            initial_quantity: quantity,
            quantity,
        }
    }

    /// Removes up to `amount` and returns what was actually taken.
    pub fn take(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.quantity);
        self.quantity -= taken;
        taken
    }

    pub fn is_exhausted(&self) -> bool {
        self.quantity == 0
    }
}

#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>, // row-major
    food_sources: Vec<FoodSource>,
    nest: Option<Vec2>,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![Cell::Empty; (width * height) as usize],
            food_sources: Vec::new(),
            nest: None,
        }
    }

    /// Builds a grid from a row-major character map. Food cells take their
    /// quantity from `food_quantities`, or [`DEFAULT_FOOD_QUANTITY`].
    pub fn from_map<S: AsRef<str>>(
        width: i32,
        height: i32,
        map: &[S],
        food_quantities: &HashMap<(usize, usize), u32>,
    ) -> Self {
        let mut grid = Self::new(width, height);
        for (y, row) in map.iter().enumerate() {
            for (x, c) in row.as_ref().chars().enumerate() {
                let cell = Cell::from_char(c);
                if cell == Cell::Empty {
                    continue;
                }
                let quantity = match cell {
                    Cell::Food => food_quantities.get(&(x, y)).copied(),
                    _ => None,
                };
                grid.set_cell(x as i32, y as i32, cell, quantity);
            }
        }
        grid
    }

    pub fn width(&self) -> i32 {self.width}
    pub fn height(&self) -> i32 {self.height}
    pub fn nest(&self) -> Option<Vec2> {self.nest}
    pub fn food_sources(&self) -> &[FoodSource] {&self.food_sources}

    /// Out-of-range coordinates are ignored.
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell, quantity: Option<u32>) {
        if !self.in_bounds((x, y)) {
            return;
        }
        let index = self.index((x, y));
        self.cells[index] = cell;

        match cell {
            Cell::Food => {
                let source = FoodSource::new(x, y, quantity.unwrap_or(DEFAULT_FOOD_QUANTITY));
                match self.food_sources.iter_mut().find(|s| s.x == x && s.y == y) {
                    Some(existing) => *existing = source,
                    None => self.food_sources.push(source),
                }
            }
            Cell::Nest => self.nest = Some((x, y)),
            _ => (),
        }
    }

    pub fn in_bounds(&self, pos: Vec2) -> bool {
        pos.0 >= 0 && pos.0 < self.width && pos.1 >= 0 && pos.1 < self.height
    }

    pub fn cell(&self, pos: Vec2) -> Option<Cell> {
        if self.in_bounds(pos) {
            Some(self.cells[self.index(pos)])
        } else {
            None
        }
    }

    pub fn is_walkable(&self, pos: Vec2) -> bool {
        matches!(self.cell(pos), Some(cell) if cell != Cell::Wall)
    }

    pub fn food_source_at(&self, pos: Vec2) -> Option<&FoodSource> {
        self.food_sources.iter().find(|s| (s.x, s.y) == pos)
    }

    pub fn food_source_at_mut(&mut self, pos: Vec2) -> Option<&mut FoodSource> {
        self.food_sources.iter_mut().find(|s| (s.x, s.y) == pos)
    }

    pub fn remaining_food(&self) -> u64 {
        self.food_sources.iter().map(|s| s.quantity as u64).sum()
    }

    pub(crate) fn index(&self, pos: Vec2) -> usize {
        (pos.1 * self.width + pos.0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_cell_out_of_bounds_ignored() {
        let mut grid = Grid::new(3, 2);
        grid.set_cell(-1, 0, Cell::Wall, None);
        grid.set_cell(3, 0, Cell::Food, None);
        grid.set_cell(0, 2, Cell::Nest, None);

        assert!(grid.food_sources().is_empty());
        assert_eq!(grid.nest(), None);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(grid.cell((x, y)), Some(Cell::Empty));
            }
        }
    }

    #[test]
    fn test_food_default_and_override_quantities() {
        let overrides = HashMap::from([((1, 0), 10)]);
        let grid = Grid::from_map(3, 2, &["NF.", "..F"], &overrides);

        assert_eq!(grid.food_sources().len(), 2);
        assert_eq!(grid.food_source_at((1, 0)).unwrap().quantity, 10);
        assert_eq!(grid.food_source_at((2, 1)).unwrap().quantity, DEFAULT_FOOD_QUANTITY);
        assert_eq!(grid.remaining_food(), 10 + DEFAULT_FOOD_QUANTITY as u64);
    }

    #[test]
    fn test_last_nest_wins() {
        let grid = Grid::from_map(3, 2, &["N..", ".WN"], &HashMap::new());
        assert_eq!(grid.nest(), Some((2, 1)));
        assert_eq!(grid.cell((0, 0)), Some(Cell::Nest));
        assert_eq!(grid.cell((1, 1)), Some(Cell::Wall));
    }

    #[test]
    fn test_map_chars_past_bounds_ignored() {
        let grid = Grid::from_map(2, 1, &["N.FFF", "F"], &HashMap::new());
        assert!(grid.food_sources().is_empty());
        assert_eq!(grid.cell((2, 0)), None);
    }

    #[test]
    fn test_resetting_food_replaces_source() {
        let mut grid = Grid::new(2, 1);
        grid.set_cell(0, 0, Cell::Food, Some(5));
        grid.set_cell(0, 0, Cell::Food, Some(8));
        assert_eq!(grid.food_sources().len(), 1);
        assert_eq!(grid.food_sources()[0].initial_quantity, 8);
    }

    #[test]
    fn test_walkable() {
        let grid = Grid::from_map(3, 1, &["NWD"], &HashMap::new());
        assert!(grid.is_walkable((0, 0)));
        assert!(!grid.is_walkable((1, 0)));
        assert!(grid.is_walkable((2, 0)));
        assert!(!grid.is_walkable((3, 0)));
        assert!(!grid.is_walkable((0, -1)));
    }

    #[test]
    fn test_direction_order_and_deltas() {
        assert_eq!(Direction::from_index(0), Some(Direction::North));
        assert_eq!(Direction::from_index(3), Some(Direction::West));
        assert_eq!(Direction::from_index(4), None);
        assert_eq!(Direction::North.apply((2, 2)), (2, 1));
        assert_eq!(Direction::East.apply((2, 2)), (3, 2));
        assert_eq!(Direction::South.apply((2, 2)), (2, 3));
        assert_eq!(Direction::West.apply((2, 2)), (1, 2));
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.index(), i);
        }
    }

    #[test]
    fn test_food_source_take_never_negative() {
        let mut source = FoodSource::new(0, 0, 15);
        assert_eq!(source.take(10), 10);
        assert_eq!(source.take(10), 5);
        assert_eq!(source.take(10), 0);
        assert!(source.is_exhausted());
        assert_eq!(source.initial_quantity, 15);
    }
}
