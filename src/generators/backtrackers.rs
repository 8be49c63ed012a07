use super::{finish, Generator};
use crate::cells::{Cell, CellSmallVec, CompassPrimary};
use crate::errors::GenError;
use crate::grid::Grid;
use crate::observers::StepObserver;

use bit_set::BitSet;
use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

/// Depth first search carving: step into a random unvisited neighbour, backtracking along the
/// stack when boxed in. Produces long winding corridors with few dead ends.
///
/// The walk starts in the top left corner.
#[derive(Debug, Copy, Clone)]
pub struct RecursiveBacktracker {
    pub stop_when_all_visited: bool,
}

impl Default for RecursiveBacktracker {
    fn default() -> RecursiveBacktracker {
        RecursiveBacktracker {
            stop_when_all_visited: true,
        }
    }
}

impl Generator for RecursiveBacktracker {
    fn name(&self) -> &'static str {
        "recursive-backtracker"
    }

    fn generate_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        rng: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<(), GenError> {
        grid.reset();
        let mut visited = BitSet::with_capacity(grid.size());
        carve_backtracking(
            grid,
            rng,
            observer,
            Cell::new(0, 0),
            &mut visited,
            self.stop_when_all_visited,
        );
        finish(grid, observer)
    }
}

/// A backtracker that starts from the centre of the grid, followed by a square spiral sweep
/// outwards from the centre that joins any cell the backtracker left unvisited onto a visited
/// neighbour.
#[derive(Debug, Default, Copy, Clone)]
pub struct SpiralBacktracker;

impl Generator for SpiralBacktracker {
    fn name(&self) -> &'static str {
        "spiral-backtracker"
    }

    fn generate_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        rng: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<(), GenError> {
        grid.reset();
        let mut visited = BitSet::with_capacity(grid.size());
        let centre = Cell::new(grid.width() / 2, grid.height() / 2);

        carve_backtracking(grid, rng, observer, centre, &mut visited, false);
        let joined = spiral_sweep(grid, observer, centre, &mut visited);
        trace!("spiral sweep joined {} stray cells", joined);

        finish(grid, observer)
    }
}

/// Randomised depth first carving from `start`. Returns the number of cells visited.
fn carve_backtracking<R: Rng + ?Sized>(
    grid: &mut Grid,
    rng: &mut R,
    observer: &mut dyn StepObserver,
    start: Cell,
    visited: &mut BitSet,
    stop_when_all_visited: bool,
) -> usize {
    let mut stack = vec![start];
    visited.insert(grid.cell_index(start));
    grid.select_cell(start);
    let mut visited_count = 1;

    while let Some(&current) = stack.last() {
        if stop_when_all_visited && visited_count == grid.size() {
            break;
        }

        let unvisited_neighbours: CellSmallVec = grid
            .neighbours(current)
            .into_iter()
            .filter(|c| !visited.contains(grid.cell_index(*c)))
            .collect();

        match unvisited_neighbours.choose(rng) {
            Some(&next) => {
                grid.carve(current, next);
                visited.insert(grid.cell_index(next));
                visited_count += 1;
                stack.push(next);
                observer.on_step(grid);
            }
            None => {
                stack.pop();
            }
        }
    }
    visited_count
}

/// Walk a square spiral out from `centre`, legs of length 1, 1, 2, 2, 3, 3... turning east,
/// south, west then north. Every cell met on the grid that is still unvisited gets joined to its
/// first visited neighbour. Stops once a leg is longer than twice the longest grid side, by which
/// point the spiral has covered the whole grid.
fn spiral_sweep(
    grid: &mut Grid,
    observer: &mut dyn StepObserver,
    centre: Cell,
    visited: &mut BitSet,
) -> usize {
    let limit = 2 * grid.width().max(grid.height()) as isize;
    let (mut x, mut y) = (centre.x as isize, centre.y as isize);
    let mut leg_length = 1;
    let mut heading = 0;
    let mut joined = 0;

    while leg_length <= limit {
        for _ in 0..2 {
            let direction = CompassPrimary::CLOCKWISE[heading];
            let (dx, dy) = match direction {
                CompassPrimary::East => (1, 0),
                CompassPrimary::South => (0, 1),
                CompassPrimary::West => (-1, 0),
                CompassPrimary::North => (0, -1),
            };

            for _ in 0..leg_length {
                x += dx;
                y += dy;
                if x < 0 || y < 0 {
                    continue;
                }
                let cell = Cell::new(x as usize, y as usize);
                if grid.contains(cell)
                    && !visited.contains(grid.cell_index(cell))
                    && join_to_visited(grid, cell, visited)
                {
                    joined += 1;
                    observer.on_step(grid);
                }
            }
            heading = (heading + 1) % 4;
        }
        leg_length += 1;
    }
    joined
}

fn join_to_visited(grid: &mut Grid, cell: Cell, visited: &mut BitSet) -> bool {
    let neighbour = grid
        .neighbours(cell)
        .into_iter()
        .find(|n| visited.contains(grid.cell_index(*n)));

    match neighbour {
        Some(n) => {
            grid.carve(cell, n);
            visited.insert(grid.cell_index(cell));
            true
        }
        None => false,
    }
}
