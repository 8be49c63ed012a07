use crate::cells::Cell;
use std::fmt;

/// Row major iteration over every logical cell of a grid.
#[derive(Clone)]
pub struct CellIter {
    width: usize,
    current_cell_number: usize,
    cells_count: usize,
}

impl CellIter {
    pub(crate) fn new(width: usize, height: usize) -> CellIter {
        CellIter {
            width,
            current_cell_number: 0,
            cells_count: width * height,
        }
    }
}

impl fmt::Debug for CellIter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "CellIter :: current_cell_number: {:?}, cells_count: {:?}",
            self.current_cell_number, self.cells_count
        )
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = Cell;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let n = self.current_cell_number;
            self.current_cell_number += 1;
            Some(Cell::new(n % self.width, n / self.width))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

/// Iteration over the grid one row of cells at a time, north to south, each row west to east.
#[derive(Debug, Clone)]
pub struct RowIter {
    width: usize,
    height: usize,
    current_row: usize,
}

impl RowIter {
    pub(crate) fn new(width: usize, height: usize) -> RowIter {
        RowIter {
            width,
            height,
            current_row: 0,
        }
    }
}

impl ExactSizeIterator for RowIter {}
impl Iterator for RowIter {
    type Item = Vec<Cell>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row < self.height {
            let y = self.current_row;
            self.current_row += 1;
            Some((0..self.width).map(|x| Cell::new(x, y)).collect())
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.height - self.current_row;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_iter() {
        let cells = CellIter::new(2, 2).collect::<Vec<Cell>>();
        assert_eq!(
            cells,
            &[
                Cell::new(0, 0),
                Cell::new(1, 0),
                Cell::new(0, 1),
                Cell::new(1, 1)
            ]
        );
    }

    #[test]
    fn cell_iter_size_hint() {
        let mut iter = CellIter::new(3, 2);
        assert_eq!(iter.len(), 6);
        iter.next();
        assert_eq!(iter.len(), 5);
    }

    #[test]
    fn row_iter() {
        let rows = RowIter::new(2, 3).collect::<Vec<Vec<Cell>>>();
        assert_eq!(
            rows,
            &[
                vec![Cell::new(0, 0), Cell::new(1, 0)],
                vec![Cell::new(0, 1), Cell::new(1, 1)],
                vec![Cell::new(0, 2), Cell::new(1, 2)]
            ]
        );
    }
}
