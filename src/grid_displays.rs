use crate::cells::{BufferPosition, Cell};
use crate::grid::{Grid, Structure};
use crate::pathing::Distances;
use crate::solvers::Path;
use crate::utils::FnvHashSet;

use std::fmt;

/// Something that draws into the bodies of grid cells when a grid is printed as text.
/// A body is three characters wide.
pub trait GridDisplay {
    /// None leaves the cell to the next display, or the default body.
    fn render_cell_body(&self, cell: Cell) -> Option<String>;
}

impl GridDisplay for Distances {
    fn render_cell_body(&self, cell: Cell) -> Option<String> {
        // centre align, padding 3, lowercase hexadecimal
        self.distance_from_start_to(cell)
            .map(|d| format!("{:^3x}", d))
    }
}

#[derive(Debug)]
pub struct PathDisplay {
    on_path_cells: FnvHashSet<Cell>,
}

impl PathDisplay {
    pub fn new(path: &Path) -> Self {
        PathDisplay {
            on_path_cells: path.cells().into_iter().collect(),
        }
    }
}

impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, cell: Cell) -> Option<String> {
        if self.on_path_cells.contains(&cell) {
            Some(String::from(" . "))
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub struct StartEndPointsDisplay {
    starts: Vec<Cell>,
    ends: Vec<Cell>,
}

impl StartEndPointsDisplay {
    pub fn new(starts: Vec<Cell>, ends: Vec<Cell>) -> StartEndPointsDisplay {
        StartEndPointsDisplay { starts, ends }
    }
}

impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, cell: Cell) -> Option<String> {
        if self.starts.contains(&cell) {
            Some(String::from(" S "))
        } else if self.ends.contains(&cell) {
            Some(String::from(" E "))
        } else {
            None
        }
    }
}

/// A grid printed with box drawing walls and any number of displays layered over the cell
/// bodies, the first display to answer for a cell wins.
pub struct GridView<'a> {
    grid: &'a Grid,
    displays: Vec<&'a dyn GridDisplay>,
}

impl<'a> GridView<'a> {
    pub fn new(grid: &'a Grid) -> GridView<'a> {
        GridView {
            grid,
            displays: vec![],
        }
    }

    pub fn with_display(mut self, display: &'a dyn GridDisplay) -> GridView<'a> {
        self.displays.push(display);
        self
    }

    fn cell_body(&self, cell: Cell) -> String {
        self.displays
            .iter()
            .filter_map(|d| d.render_cell_body(cell))
            .next()
            .unwrap_or_else(|| match self.grid.get(cell.buffer_position()) {
                Some(Structure::Selected) => String::from(" ~ "),
                _ => String::from("   "),
            })
    }

    fn is_wall_at(&self, row: Option<usize>, col: Option<usize>) -> bool {
        match (row, col) {
            (Some(row), Some(col)) => {
                self.grid.get(BufferPosition::new(row, col)) == Some(Structure::Wall)
            }
            _ => false,
        }
    }

    /// The junction drawn at a wall corner joins up with the walls on each side of it.
    fn corner(&self, row: usize, col: usize) -> &'static str {
        const WALL_L: &str = "╴";
        const WALL_R: &str = "╶";
        const WALL_U: &str = "╵";
        const WALL_D: &str = "╷";
        const WALL_LR: &str = "─";
        const WALL_UD: &str = "│";
        const WALL_LD: &str = "┐";
        const WALL_RU: &str = "└";
        const WALL_LU: &str = "┘";
        const WALL_RD: &str = "┌";
        const WALL_LRU: &str = "┴";
        const WALL_LRD: &str = "┬";
        const WALL_LRUD: &str = "┼";
        const WALL_RUD: &str = "├";
        const WALL_LUD: &str = "┤";

        let left = self.is_wall_at(Some(row), col.checked_sub(1));
        let right = self.is_wall_at(Some(row), Some(col + 1));
        let up = self.is_wall_at(row.checked_sub(1), Some(col));
        let down = self.is_wall_at(Some(row + 1), Some(col));

        match (left, right, up, down) {
            (true, true, true, true) => WALL_LRUD,
            (true, true, true, false) => WALL_LRU,
            (true, true, false, true) => WALL_LRD,
            (true, false, true, true) => WALL_LUD,
            (false, true, true, true) => WALL_RUD,
            (true, true, false, false) => WALL_LR,
            (false, false, true, true) => WALL_UD,
            (false, true, true, false) => WALL_RU,
            (true, false, false, true) => WALL_LD,
            (true, false, true, false) => WALL_LU,
            (false, true, false, true) => WALL_RD,
            (true, false, false, false) => WALL_L,
            (false, true, false, false) => WALL_R,
            (false, false, true, false) => WALL_U,
            (false, false, false, true) => WALL_D,
            _ => " ",
        }
    }
}

impl<'a> fmt::Display for GridView<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rows = self.grid.rows().0;
        let columns = self.grid.columns().0;
        let mut output = String::with_capacity(rows * (2 * columns + 1) * 3);

        for row in 0..rows {
            for col in 0..columns {
                let pos = BufferPosition::new(row, col);
                let is_wall = self.grid.is_wall(pos);
                match (row % 2 == 0, col % 2 == 0) {
                    (true, true) => output.push_str(self.corner(row, col)),
                    // wall or passage between vertically adjacent cells
                    (true, false) => output.push_str(if is_wall { "───" } else { "   " }),
                    // wall or passage between horizontally adjacent cells
                    (false, true) => output.push_str(if is_wall { "│" } else { " " }),
                    (false, false) => match Cell::from_buffer_position(pos) {
                        Some(cell) => output.push_str(&self.cell_body(cell)),
                        None => output.push_str("   "),
                    },
                }
            }
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", GridView::new(self))
    }
}
