use crate::{Direction, GridError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Index, IndexMut};

/// A 1-based `(column, row)` cell address.
///
/// Coordinates order by row first, then column, which is the order cells are
/// stored in a PUZ image and the order clue numbers are handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub col: usize,
    pub row: usize,
}

impl Coordinate {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// The coordinate `distance` cells away in `direction`, or `None` when that
    /// would fall below column or row 1.
    pub fn step(self, direction: Direction, distance: i64) -> Option<Coordinate> {
        let (dc, dr) = direction.delta();
        let col = self.col as i64 + dc * distance;
        let row = self.row as i64 + dr * distance;
        if col < 1 || row < 1 {
            return None;
        }
        Some(Coordinate::new(col as usize, row as usize))
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row.cmp(&other.row).then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.col, self.row)
    }
}

/// Dense per-cell storage for a `width` x `height` rectangle, addressed by [`Coordinate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(Coordinate) -> T) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for row in 1..=height {
            for col in 1..=width {
                cells.push(f(Coordinate::new(col, row)));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Builds a grid from row-major values.
    pub fn from_vec(width: usize, height: usize, cells: Vec<T>) -> Result<Self, GridError> {
        if cells.len() != width * height {
            return Err(GridError::SizeMismatch {
                expected: width * height,
                found: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        (1..=self.width).contains(&coord.col) && (1..=self.height).contains(&coord.row)
    }

    /// Row-major position of `coord` in the backing storage.
    pub fn offset_of(&self, coord: Coordinate) -> Option<usize> {
        self.contains(coord)
            .then(|| (coord.row - 1) * self.width + (coord.col - 1))
    }

    pub fn get(&self, coord: Coordinate) -> Option<&T> {
        self.offset_of(coord).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, coord: Coordinate) -> Option<&mut T> {
        self.offset_of(coord).map(|i| &mut self.cells[i])
    }

    pub fn set(&mut self, coord: Coordinate, value: T) -> Result<(), GridError> {
        let (width, height) = (self.width, self.height);
        match self.get_mut(coord) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(GridError::OutOfBounds {
                coord,
                width,
                height,
            }),
        }
    }

    /// All coordinates in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + use<T> {
        let (width, height) = (self.width, self.height);
        (1..=height).flat_map(move |row| (1..=width).map(move |col| Coordinate::new(col, row)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, &T)> {
        self.coordinates().zip(self.cells.iter())
    }

    /// Values in row-major order.
    pub fn values(&self) -> &[T] {
        &self.cells
    }

    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }
}

impl<T: Clone> Grid<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }
}

impl<T> Index<Coordinate> for Grid<T> {
    type Output = T;

    fn index(&self, coord: Coordinate) -> &T {
        match self.offset_of(coord) {
            Some(i) => &self.cells[i],
            None => panic!(
                "coordinate {coord} out of bounds for {}x{} grid",
                self.width, self.height
            ),
        }
    }
}

impl<T> IndexMut<Coordinate> for Grid<T> {
    fn index_mut(&mut self, coord: Coordinate) -> &mut T {
        let (width, height) = (self.width, self.height);
        match self.offset_of(coord) {
            Some(i) => &mut self.cells[i],
            None => panic!("coordinate {coord} out of bounds for {width}x{height} grid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_are_row_major() {
        let grid = Grid::filled(3, 2, 0u8);
        let coords: Vec<_> = grid.coordinates().collect();
        assert_eq!(coords[0], Coordinate::new(1, 1));
        assert_eq!(coords[2], Coordinate::new(3, 1));
        assert_eq!(coords[3], Coordinate::new(1, 2));

        let mut sorted = coords.clone();
        sorted.sort();
        assert_eq!(coords, sorted);
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut grid = Grid::filled(2, 2, ' ');
        assert!(grid.set(Coordinate::new(2, 2), 'X').is_ok());
        assert_eq!(grid[Coordinate::new(2, 2)], 'X');
        assert!(matches!(
            grid.set(Coordinate::new(3, 1), 'Y'),
            Err(GridError::OutOfBounds { .. })
        ));
        assert!(grid.get(Coordinate::new(0, 1)).is_none());
    }

    #[test]
    fn test_step_stops_at_origin() {
        let c = Coordinate::new(1, 3);
        assert_eq!(c.step(Direction::Across, -1), None);
        assert_eq!(c.step(Direction::Down, -1), Some(Coordinate::new(1, 2)));
        assert_eq!(c.step(Direction::Across, 1), Some(Coordinate::new(2, 3)));
    }
}
