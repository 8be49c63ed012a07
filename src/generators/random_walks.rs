use super::{finish, Generator};
use crate::cells::{Cell, CellSmallVec};
use crate::errors::GenError;
use crate::grid::Grid;
use crate::observers::StepObserver;
use crate::utils::fnv_hashmap;

use bit_set::BitSet;
use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

/// Aldous-Broder: a uniform random walk over the grid that carves a passage only when it steps
/// onto a cell it has never been to before.
///
/// It generates a uniform spanning tree, every possible perfect maze is equally likely, but it
/// is slow to finish as the walk wanders over already visited territory looking for the last few
/// unvisited cells.
#[derive(Debug, Default, Copy, Clone)]
pub struct AldousBroder;

impl Generator for AldousBroder {
    fn name(&self) -> &'static str {
        "aldous-broder"
    }

    fn generate_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        rng: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<(), GenError> {
        grid.reset();
        let mut visited = BitSet::with_capacity(grid.size());

        let mut current = grid.random_cell(rng);
        visited.insert(grid.cell_index(current));
        grid.select_cell(current);
        let mut unvisited_count = grid.size() - 1;

        while unvisited_count > 0 {
            let next = match grid.neighbours(current).choose(rng) {
                Some(&next) => next,
                None => break,
            };

            if visited.insert(grid.cell_index(next)) {
                grid.carve(current, next);
                unvisited_count -= 1;
                observer.on_step(grid);
            }
            current = next;
        }

        finish(grid, observer)
    }
}

/// Wilson's algorithm: loop erased random walks.
///
/// One random cell seeds the maze. From a random cell outside the maze we walk randomly until we
/// touch the maze, erasing any loop the walk makes with itself as soon as it is made, then splice
/// the whole walk into the maze. Repeat until no cell is left outside.
///
/// Like Aldous-Broder it generates a uniform spanning tree. It is slow to start, the first walk
/// hunts for a single cell, and speeds up as the maze grows.
#[derive(Debug, Default, Copy, Clone)]
pub struct Wilson;

impl Generator for Wilson {
    fn name(&self) -> &'static str {
        "wilson"
    }

    fn generate_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        rng: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<(), GenError> {
        grid.reset();
        let mut in_maze = BitSet::with_capacity(grid.size());

        let first = grid.random_cell(rng);
        in_maze.insert(grid.cell_index(first));
        grid.select_cell(first);

        let mut outside: Vec<Cell> = grid.iter().filter(|c| *c != first).collect();
        loop {
            outside.retain(|c| !in_maze.contains(grid.cell_index(*c)));
            let walk_start = match outside.choose(rng) {
                Some(&cell) => cell,
                None => break,
            };

            let walk = loop_erased_walk(grid, rng, walk_start, &in_maze);
            trace!("wilson walk from {} spliced {} cells", walk_start, walk.len());

            for pair in walk.windows(2) {
                in_maze.insert(grid.cell_index(pair[0]));
                grid.carve(pair[0], pair[1]);
                observer.on_step(grid);
            }
        }

        finish(grid, observer)
    }
}

/// Randomly walk from `start` until a cell of the maze is reached. The returned walk has no
/// repeated cells and ends on the maze cell.
fn loop_erased_walk<R: Rng + ?Sized>(
    grid: &Grid,
    rng: &mut R,
    start: Cell,
    in_maze: &BitSet,
) -> Vec<Cell> {
    let mut walk = vec![start];
    let mut walk_positions = fnv_hashmap(grid.size());
    walk_positions.insert(start, 0);

    let mut current = start;
    while !in_maze.contains(grid.cell_index(current)) {
        let next = match grid.neighbours(current).choose(rng) {
            Some(&next) => next,
            None => break,
        };

        if let Some(&loop_start) = walk_positions.get(&next) {
            for erased in walk.drain(loop_start + 1..) {
                walk_positions.remove(&erased);
            }
        } else {
            walk_positions.insert(next, walk.len());
            walk.push(next);
        }
        current = next;
    }
    walk
}

/// Hunt-and-Kill: random walk carving into unvisited cells until the walk is boxed in, then hunt
/// row by row for the first unvisited cell that borders the maze, join it to the maze and start
/// walking again from there.
#[derive(Debug, Default, Copy, Clone)]
pub struct HuntAndKill;

impl Generator for HuntAndKill {
    fn name(&self) -> &'static str {
        "hunt-and-kill"
    }

    fn generate_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        rng: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<(), GenError> {
        grid.reset();
        let mut visited = BitSet::with_capacity(grid.size());

        let mut current = grid.random_cell(rng);
        visited.insert(grid.cell_index(current));
        grid.select_cell(current);

        loop {
            let unvisited_neighbours: CellSmallVec = grid
                .neighbours(current)
                .into_iter()
                .filter(|c| !visited.contains(grid.cell_index(*c)))
                .collect();

            if let Some(&next) = unvisited_neighbours.choose(rng) {
                grid.carve(current, next);
                visited.insert(grid.cell_index(next));
                current = next;
            } else {
                match hunt(grid, &mut visited) {
                    Some(found) => current = found,
                    None => break,
                }
            }
            observer.on_step(grid);
        }

        finish(grid, observer)
    }
}

/// Row major scan for the first unvisited cell next to a visited one. The cell is carved into
/// the maze through its first visited neighbour.
fn hunt(grid: &mut Grid, visited: &mut BitSet) -> Option<Cell> {
    let found = grid.iter().find_map(|cell| {
        if visited.contains(grid.cell_index(cell)) {
            return None;
        }
        grid.neighbours(cell)
            .into_iter()
            .find(|n| visited.contains(grid.cell_index(*n)))
            .map(|n| (cell, n))
    });

    found.map(|(cell, visited_neighbour)| {
        grid.carve(cell, visited_neighbour);
        visited.insert(grid.cell_index(cell));
        cell
    })
}
