use crate::cells::{BufferPosition, Cell, CellSmallVec, CompassPrimary};
use crate::errors::GridError;
use crate::grid_iterators::{CellIter, RowIter};
use crate::units::{ColumnsCount, Height, RowsCount, Width};

use rand::Rng;
use std::fmt;

/// The state of one buffer position.
///
/// `Empty` and `Selected` are both open. `Selected` marks positions that belong to the structure
/// an algorithm is currently building or exploring and only differs from `Empty` while a
/// generator or solver is running or has just finished.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
#[repr(u8)]
pub enum Structure {
    Empty = 0,
    Selected = 1,
    Wall = 2,
}

impl Structure {
    #[inline]
    pub fn is_open(self) -> bool {
        self != Structure::Wall
    }
}

/// A `(2 * height + 1) x (2 * width + 1)` buffer of walls and passages.
///
/// Logical cells sit at odd `(row, col)` positions. The position directly between two adjacent
/// cells is the wall or passage joining them. Positions where both coordinates are even are wall
/// corners and, like the outer boundary, are never opened.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    buffer: Vec<Structure>,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Grid :: width: {:?}, height: {:?}, passages: {:?}",
            self.width,
            self.height,
            self.passage_count()
        )
    }
}

impl Grid {
    /// Allocate a grid with every cell closed off by walls.
    pub fn new(width: usize, height: usize) -> Result<Grid, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }

        let RowsCount(rows) = RowsCount::from(Height(height));
        let ColumnsCount(columns) = ColumnsCount::from(Width(width));
        let mut grid = Grid {
            width,
            height,
            buffer: vec![Structure::Wall; rows * columns],
        };
        grid.reset();
        Ok(grid)
    }

    /// Restore the all wall state: cells empty, everything else wall.
    pub fn reset(&mut self) {
        let columns = self.columns().0;
        for (i, structure) in self.buffer.iter_mut().enumerate() {
            let (row, col) = (i / columns, i % columns);
            *structure = if row % 2 == 1 && col % 2 == 1 {
                Structure::Empty
            } else {
                Structure::Wall
            };
        }
    }

    /// Open every passage between cells, leaving only the boundary and the wall corners.
    pub fn fill_open(&mut self) {
        let RowsCount(rows) = self.rows();
        let ColumnsCount(columns) = self.columns();
        for (i, structure) in self.buffer.iter_mut().enumerate() {
            let (row, col) = (i / columns, i % columns);
            let is_boundary = row == 0 || col == 0 || row == rows - 1 || col == columns - 1;
            let is_corner = row % 2 == 0 && col % 2 == 0;
            *structure = if is_boundary || is_corner {
                Structure::Wall
            } else {
                Structure::Empty
            };
        }
    }

    /// Turn every `Selected` position back into `Empty`.
    pub fn clear_selected(&mut self) {
        for structure in self.buffer.iter_mut() {
            if *structure == Structure::Selected {
                *structure = Structure::Empty;
            }
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of logical cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        RowsCount::from(Height(self.height))
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        ColumnsCount::from(Width(self.width))
    }

    /// Read only row major view of the whole buffer.
    #[inline]
    pub fn buffer(&self) -> &[Structure] {
        &self.buffer
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    #[inline]
    pub fn contains_position(&self, pos: BufferPosition) -> bool {
        pos.row < self.rows().0 && pos.col < self.columns().0
    }

    /// Row major index of a cell, in the range `0..grid.size()`.
    #[inline]
    pub fn cell_index(&self, cell: Cell) -> usize {
        debug_assert!(self.contains(cell), "cell {} outside {:?}", cell, self);
        cell.y * self.width + cell.x
    }

    #[inline]
    pub fn cell_at_index(&self, index: usize) -> Cell {
        Cell::new(index % self.width, index / self.width)
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Cell {
        self.cell_at_index(rng.gen_range(0..self.size()))
    }

    /// The structure at a buffer position, None if the position is outside the buffer.
    #[inline]
    pub fn get(&self, pos: BufferPosition) -> Option<Structure> {
        if self.contains_position(pos) {
            Some(self.buffer[self.buffer_index(pos)])
        } else {
            None
        }
    }

    /// Overwrite one buffer position.
    ///
    /// Panics if the position is outside the buffer.
    #[inline]
    pub fn set(&mut self, pos: BufferPosition, structure: Structure) {
        let index = self.buffer_index(pos);
        self.buffer[index] = structure;
    }

    /// Positions outside the buffer count as walls.
    #[inline]
    pub fn is_wall(&self, pos: BufferPosition) -> bool {
        self.get(pos).map_or(true, |s| s == Structure::Wall)
    }

    #[inline]
    pub fn is_open(&self, pos: BufferPosition) -> bool {
        !self.is_wall(pos)
    }

    /// Open the wall between two adjacent cells and mark both cells and the passage as part of
    /// the maze. Adjacency is a precondition, checked only in debug builds.
    pub fn carve(&mut self, a: Cell, b: Cell) {
        debug_assert!(self.contains(a) && self.contains(b));
        self.set(a.buffer_position(), Structure::Selected);
        self.set(BufferPosition::between(a, b), Structure::Selected);
        self.set(b.buffer_position(), Structure::Selected);
    }

    /// Put the wall back between two adjacent cells.
    pub fn close_passage(&mut self, a: Cell, b: Cell) {
        debug_assert!(self.contains(a) && self.contains(b));
        self.set(BufferPosition::between(a, b), Structure::Wall);
    }

    /// Mark a cell as part of the current structure without opening any wall.
    pub fn select_cell(&mut self, cell: Cell) {
        self.set(cell.buffer_position(), Structure::Selected);
    }

    /// Mark an already open passage and both of its cells as part of the current structure.
    pub fn select_passage(&mut self, a: Cell, b: Cell) {
        self.set(a.buffer_position(), Structure::Selected);
        self.set(BufferPosition::between(a, b), Structure::Selected);
        self.set(b.buffer_position(), Structure::Selected);
    }

    pub fn neighbour_at_direction(&self, cell: Cell, direction: CompassPrimary) -> Option<Cell> {
        cell.offset(direction).filter(|c| self.contains(*c))
    }

    /// Cells to the south, east, north and west (in that order) of a cell, whether or not a
    /// passage joins them.
    pub fn neighbours(&self, cell: Cell) -> CellSmallVec {
        CompassPrimary::SEARCH_ORDER
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(cell, *dir))
            .collect()
    }

    /// Is there an open passage leading out of `cell` in `direction`?
    pub fn is_passage_open(&self, cell: Cell, direction: CompassPrimary) -> bool {
        self.neighbour_at_direction(cell, direction)
            .map_or(false, |n| self.is_open(BufferPosition::between(cell, n)))
    }

    /// Are two cells adjacent and joined by an open passage?
    pub fn is_linked(&self, a: Cell, b: Cell) -> bool {
        self.contains(a) && self.contains(b) && a.is_adjacent(b)
            && self.is_open(BufferPosition::between(a, b))
    }

    /// Neighbouring cells reachable through an open passage, in search order.
    pub fn passages(&self, cell: Cell) -> CellSmallVec {
        CompassPrimary::SEARCH_ORDER
            .iter()
            .filter(|dir| self.is_passage_open(cell, **dir))
            .filter_map(|dir| self.neighbour_at_direction(cell, *dir))
            .collect()
    }

    /// Count of open passages between cells.
    pub fn passage_count(&self) -> usize {
        self.iter()
            .map(|cell| {
                let east = self.is_passage_open(cell, CompassPrimary::East) as usize;
                let south = self.is_passage_open(cell, CompassPrimary::South) as usize;
                east + south
            })
            .sum()
    }

    /// A cell is a dead end if exactly one of its four wall positions is open. The open
    /// direction is returned.
    pub fn is_dead_end(&self, cell: Cell) -> Option<CompassPrimary> {
        let mut open = CompassPrimary::ALL
            .iter()
            .cloned()
            .filter(|dir| self.is_passage_open(cell, *dir));
        match (open.next(), open.next()) {
            (Some(dir), None) => Some(dir),
            _ => None,
        }
    }

    /// Copy a block of the buffer onto another place of the same buffer.
    /// The source is read in full before anything is written, so the blocks may overlap.
    ///
    /// Panics if either block leaves the buffer.
    pub fn copy_block(
        &mut self,
        source: BufferPosition,
        destination: BufferPosition,
        rows: usize,
        columns: usize,
    ) {
        let block: Vec<Structure> = (0..rows)
            .flat_map(|r| (0..columns).map(move |c| (r, c)))
            .map(|(r, c)| self.buffer[self.buffer_index(BufferPosition::new(source.row + r, source.col + c))])
            .collect();
        for (i, structure) in block.into_iter().enumerate() {
            let (r, c) = (i / columns, i % columns);
            self.set(BufferPosition::new(destination.row + r, destination.col + c), structure);
        }
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.width, self.height)
    }

    #[inline]
    pub fn iter_row(&self) -> RowIter {
        RowIter::new(self.width, self.height)
    }

    #[inline]
    fn buffer_index(&self, pos: BufferPosition) -> usize {
        debug_assert!(self.contains_position(pos), "{:?} outside {:?}", pos, self);
        pos.row * self.columns().0 + pos.col
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn small_grid(w: usize, h: usize) -> Grid {
        Grid::new(w, h).expect("valid grid dimensions")
    }

    fn all_walls_closed(g: &Grid) -> bool {
        g.iter().all(|cell| g.passages(cell).is_empty())
    }

    #[test]
    fn invalid_dimensions() {
        assert_eq!(
            Grid::new(0, 3).unwrap_err(),
            GridError::InvalidDimensions { width: 0, height: 3 }
        );
        assert!(Grid::new(3, 0).is_err());
        assert!(Grid::new(1, 1).is_ok());
    }

    #[test]
    fn buffer_layout() {
        let g = small_grid(3, 2);
        assert_eq!(g.rows(), RowsCount(5));
        assert_eq!(g.columns(), ColumnsCount(7));
        assert_eq!(g.buffer().len(), 35);
        assert_eq!(g.size(), 6);

        for row in 0..5 {
            for col in 0..7 {
                let expected = if row % 2 == 1 && col % 2 == 1 {
                    Structure::Empty
                } else {
                    Structure::Wall
                };
                assert_eq!(g.get(BufferPosition::new(row, col)), Some(expected));
            }
        }
        assert_eq!(g.get(BufferPosition::new(5, 0)), None);
        assert!(g.is_wall(BufferPosition::new(100, 100)));
        assert!(all_walls_closed(&g));
    }

    #[test]
    fn neighbour_cells() {
        let g = small_grid(10, 10);
        let check_expected_neighbours = |cell, expected_neighbours: &[Cell]| {
            let neighbours: Vec<Cell> = g.neighbours(cell).iter().cloned().sorted().collect();
            let expected: Vec<Cell> = expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(neighbours, expected);
        };
        let gc = |x, y| Cell::new(x, y);

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // sides
        check_expected_neighbours(gc(1, 0), &[gc(0, 0), gc(1, 1), gc(2, 0)]);
        check_expected_neighbours(gc(9, 8), &[gc(9, 7), gc(9, 9), gc(8, 8)]);

        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);
    }

    #[test]
    fn neighbours_follow_search_order() {
        let g = small_grid(3, 3);
        let centre = Cell::new(1, 1);
        assert_eq!(
            &*g.neighbours(centre),
            &[Cell::new(1, 2), Cell::new(2, 1), Cell::new(1, 0), Cell::new(0, 1)]
        );
    }

    #[test]
    fn carving_cells() {
        let mut g = small_grid(4, 4);
        let a = Cell::new(0, 1);
        let b = Cell::new(0, 2);
        let c = Cell::new(1, 2);

        g.carve(a, b);
        assert!(g.is_linked(a, b));
        assert!(g.is_linked(b, a));
        assert!(!g.is_linked(b, c));
        assert_eq!(g.get(BufferPosition::new(4, 1)), Some(Structure::Selected));
        assert!(g.is_passage_open(a, CompassPrimary::South));
        assert!(g.is_passage_open(b, CompassPrimary::North));
        assert!(!g.is_passage_open(a, CompassPrimary::North));

        g.carve(b, c);
        assert_eq!(&*g.passages(b), &[c, a]);
        assert_eq!(g.passage_count(), 2);

        g.close_passage(a, b);
        assert!(!g.is_linked(a, b));
        assert_eq!(&*g.passages(b), &[c]);
        assert_eq!(g.passage_count(), 1);
    }

    #[test]
    fn dead_ends() {
        let mut g = small_grid(3, 1);
        let gc = |x, y| Cell::new(x, y);
        assert_eq!(g.is_dead_end(gc(0, 0)), None);

        g.carve(gc(0, 0), gc(1, 0));
        g.carve(gc(1, 0), gc(2, 0));
        assert_eq!(g.is_dead_end(gc(0, 0)), Some(CompassPrimary::East));
        assert_eq!(g.is_dead_end(gc(1, 0)), None);
        assert_eq!(g.is_dead_end(gc(2, 0)), Some(CompassPrimary::West));
    }

    #[test]
    fn reset_is_idempotent() {
        let fresh = small_grid(5, 4);
        let mut g = small_grid(5, 4);
        g.carve(Cell::new(0, 0), Cell::new(1, 0));
        g.carve(Cell::new(3, 3), Cell::new(3, 2));
        g.reset();
        assert_eq!(g, fresh);
        g.reset();
        assert_eq!(g, fresh);
    }

    #[test]
    fn fill_open_keeps_boundary_and_corners() {
        let mut g = small_grid(3, 3);
        g.fill_open();
        assert_eq!(g.passage_count(), 12);
        assert!(g.is_wall(BufferPosition::new(0, 3)));
        assert!(g.is_wall(BufferPosition::new(3, 6)));
        assert!(g.is_wall(BufferPosition::new(2, 2)));
        assert!(g.is_open(BufferPosition::new(2, 1)));
    }

    #[test]
    fn clear_selected() {
        let mut g = small_grid(2, 2);
        g.carve(Cell::new(0, 0), Cell::new(1, 0));
        g.clear_selected();
        assert!(g.buffer().iter().all(|s| *s != Structure::Selected));
        assert!(g.is_linked(Cell::new(0, 0), Cell::new(1, 0)));
    }

    #[test]
    fn cell_indices() {
        let g = small_grid(3, 3);
        let indices = g.iter().map(|c| g.cell_index(c)).collect::<Vec<usize>>();
        assert_eq!(indices, (0..9).collect::<Vec<usize>>());
        assert_eq!(g.cell_at_index(5), Cell::new(2, 1));
        assert!(!g.contains(Cell::new(3, 2)));
        assert!(!g.contains(Cell::new(2, 3)));
    }

    #[test]
    fn random_cell() {
        let g = small_grid(4, 3);
        let mut rng = crate::utils::seeded_rng(7);
        for _ in 0..1000 {
            assert!(g.contains(g.random_cell(&mut rng)));
        }
    }

    #[test]
    fn copy_block() {
        let mut g = small_grid(2, 2);
        g.carve(Cell::new(0, 0), Cell::new(0, 1));
        g.copy_block(BufferPosition::new(0, 0), BufferPosition::new(0, 2), 5, 3);
        assert!(g.is_linked(Cell::new(1, 0), Cell::new(1, 1)));
        assert!(g.is_linked(Cell::new(0, 0), Cell::new(0, 1)));
    }
}
