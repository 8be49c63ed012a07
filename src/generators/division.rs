use super::{finish, Generator};
use crate::cells::{BufferPosition, Cell};
use crate::errors::GenError;
use crate::grid::Grid;
use crate::observers::StepObserver;

use log::trace;
use rand::Rng;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    fn flipped(self) -> Orientation {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// A rectangle of cells still to be divided.
#[derive(Copy, Clone, Debug)]
struct Chamber {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    orientation: Orientation,
}

/// Recursive Division: start from a grid with every interior wall removed, split it in half with
/// a wall holding a single random gap, then keep splitting each half the other way until every
/// chamber is one cell wide or one cell tall.
///
/// Unlike the other generators this one adds walls rather than carving passages, leaving long
/// straight walls across the maze.
#[derive(Debug, Default, Copy, Clone)]
pub struct RecursiveDivision;

impl Generator for RecursiveDivision {
    fn name(&self) -> &'static str {
        "recursive-division"
    }

    fn generate_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        rng: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<(), GenError> {
        grid.reset();
        grid.fill_open();
        observer.on_step(grid);

        let mut chambers = vec![Chamber {
            x: 0,
            y: 0,
            width: grid.width(),
            height: grid.height(),
            orientation: Orientation::Horizontal,
        }];

        while let Some(chamber) = chambers.pop() {
            if chamber.width <= 1 || chamber.height <= 1 {
                continue;
            }
            let (first, second) = divide(grid, rng, chamber);
            observer.on_step(grid);
            // the first half is divided first
            chambers.push(second);
            chambers.push(first);
        }

        finish(grid, observer)
    }
}

/// Wall off the chamber through its middle, leaving one random gap, and return the two halves.
fn divide<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R, chamber: Chamber) -> (Chamber, Chamber) {
    let Chamber {
        x,
        y,
        width,
        height,
        orientation,
    } = chamber;
    let next = orientation.flipped();

    match orientation {
        Orientation::Horizontal => {
            let half = height / 2;
            let wall_y = y + half;
            let gap_x = x + rng.gen_range(0..width);
            for cx in x..x + width {
                let (above, below) = (Cell::new(cx, wall_y - 1), Cell::new(cx, wall_y));
                if cx == gap_x {
                    grid.select_passage(above, below);
                } else {
                    grid.close_passage(above, below);
                }
            }
            (
                Chamber { x, y, width, height: half, orientation: next },
                Chamber { x, y: wall_y, width, height: height - half, orientation: next },
            )
        }
        Orientation::Vertical => {
            let half = width / 2;
            let wall_x = x + half;
            let gap_y = y + rng.gen_range(0..height);
            for cy in y..y + height {
                let (left, right) = (Cell::new(wall_x - 1, cy), Cell::new(wall_x, cy));
                if cy == gap_y {
                    grid.select_passage(left, right);
                } else {
                    grid.close_passage(left, right);
                }
            }
            (
                Chamber { x, y, width: half, height, orientation: next },
                Chamber { x: wall_x, y, width: width - half, height, orientation: next },
            )
        }
    }
}

/// Fractal Tessellation: start from a single cell and repeatedly double the maze in both
/// directions by copying it into the three new quadrants, then open three of the four walls
/// between the quadrants at random points.
///
/// Only square grids whose side is a power of two can be reached this way.
#[derive(Debug, Default, Copy, Clone)]
pub struct FractalTessellation;

impl FractalTessellation {
    pub fn accepts(width: usize, height: usize) -> bool {
        width == height && width.is_power_of_two()
    }
}

impl Generator for FractalTessellation {
    fn name(&self) -> &'static str {
        "fractal-tessellation"
    }

    fn generate_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        rng: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<(), GenError> {
        let (width, height) = (grid.width(), grid.height());
        if !FractalTessellation::accepts(width, height) {
            return Err(GenError::DimensionMismatch { width, height });
        }

        grid.reset();
        grid.select_cell(Cell::new(0, 0));
        observer.on_step(grid);

        let mut side = 1;
        while side < width {
            tessellate(grid, rng, side);
            side *= 2;
            trace!("fractal tessellation grown to {}x{}", side, side);
            observer.on_step(grid);
        }

        finish(grid, observer)
    }
}

/// Copy the `side` x `side` maze in the top left corner into the other three quadrants of the
/// `2 * side` square and join the quadrants with three passages.
fn tessellate<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R, side: usize) {
    let block = 2 * side + 1;
    let origin = BufferPosition::new(0, 0);
    for &(row, col) in &[(0, 2 * side), (2 * side, 0), (2 * side, 2 * side)] {
        grid.copy_block(origin, BufferPosition::new(row, col), block, block);
    }

    // upper and lower halves of the vertical seam, then left and right halves of the
    // horizontal seam
    let closed_segment = rng.gen_range(0..4);
    for segment in 0..4 {
        if segment == closed_segment {
            continue;
        }
        let offset = rng.gen_range(0..side);
        let (a, b) = match segment {
            0 => (Cell::new(side - 1, offset), Cell::new(side, offset)),
            1 => (Cell::new(side - 1, side + offset), Cell::new(side, side + offset)),
            2 => (Cell::new(offset, side - 1), Cell::new(offset, side)),
            _ => (Cell::new(side + offset, side - 1), Cell::new(side + offset, side)),
        };
        grid.carve(a, b);
    }
}
