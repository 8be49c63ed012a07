use super::{finish, Generator};
use crate::cells::{Cell, CompassPrimary};
use crate::errors::GenError;
use crate::grid::Grid;
use crate::observers::StepObserver;

use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

/// Boustrophedon order over the grid: even rows west to east, odd rows east to west.
fn serpentine(width: usize, height: usize) -> Vec<Cell> {
    (0..height)
        .flat_map(|y| {
            let row: Vec<Cell> = if y % 2 == 0 {
                (0..width).map(|x| Cell::new(x, y)).collect()
            } else {
                (0..width).rev().map(|x| Cell::new(x, y)).collect()
            };
            row
        })
        .collect()
}

/// A unicursal maze: one path with no branches through every cell, snaking back and forth
/// along the rows.
///
/// Uses no randomness.
#[derive(Debug, Default, Copy, Clone)]
pub struct Unicursal;

impl Generator for Unicursal {
    fn name(&self) -> &'static str {
        "unicursal"
    }

    fn generate_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        _: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<(), GenError> {
        grid.reset();
        let path = serpentine(grid.width(), grid.height());
        grid.select_cell(path[0]);

        for pair in path.windows(2) {
            grid.carve(pair[0], pair[1]);
            observer.on_step(grid);
        }

        finish(grid, observer)
    }
}

/// Origin Shift: keep the maze as a tree of cells that each point at a neighbour, all paths
/// leading to one root cell, the origin. Each iteration the origin points itself at a random
/// neighbour, which drops its own pointer and becomes the new origin.
///
/// The tree starts as the serpentine path ending at the origin and every iteration keeps it a
/// perfect maze, so it can be stopped at any point. Run for long enough it approaches a uniform
/// spanning tree.
#[derive(Debug, Default, Copy, Clone)]
pub struct OriginShift {
    /// Defaults to ten times the number of cells when not given.
    pub iterations: Option<usize>,
}

impl OriginShift {
    pub fn iterations_for(&self, grid: &Grid) -> usize {
        self.iterations.unwrap_or_else(|| 10 * grid.size())
    }
}

impl Generator for OriginShift {
    fn name(&self) -> &'static str {
        "origin-shift"
    }

    fn generate_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        rng: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<(), GenError> {
        grid.reset();

        let path = serpentine(grid.width(), grid.height());
        let mut pointers: Vec<Option<CompassPrimary>> = vec![None; grid.size()];
        for pair in path.windows(2) {
            pointers[grid.cell_index(pair[0])] = pair[0].direction_to(pair[1]);
            grid.carve(pair[0], pair[1]);
        }
        let mut origin = path[path.len() - 1];
        grid.select_cell(origin);
        observer.on_step(grid);

        let iterations = self.iterations_for(grid);
        trace!("origin shift running {} iterations", iterations);
        for _ in 0..iterations {
            let next = match grid.neighbours(origin).choose(rng) {
                Some(&next) => next,
                None => break,
            };

            let next_index = grid.cell_index(next);
            if let Some(old) = pointers[next_index].take() {
                if let Some(old_target) = grid.neighbour_at_direction(next, old) {
                    grid.close_passage(next, old_target);
                }
            }
            pointers[grid.cell_index(origin)] = origin.direction_to(next);
            grid.carve(origin, next);

            origin = next;
            observer.on_step(grid);
        }

        finish(grid, observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathing::is_perfect_maze;
    use crate::utils::seeded_rng;

    #[test]
    fn serpentine_order() {
        let gc = |x, y| Cell::new(x, y);
        assert_eq!(
            serpentine(3, 2),
            vec![gc(0, 0), gc(1, 0), gc(2, 0), gc(2, 1), gc(1, 1), gc(0, 1)]
        );
        assert_eq!(serpentine(1, 3), vec![gc(0, 0), gc(0, 1), gc(0, 2)]);
    }

    #[test]
    fn unicursal_has_no_branches() {
        let mut g = Grid::new(6, 5).unwrap();
        Unicursal.generate(&mut g, &mut seeded_rng(0)).unwrap();

        let degrees: Vec<usize> = g.iter().map(|c| g.passages(c).len()).collect();
        assert!(degrees.iter().all(|d| *d == 1 || *d == 2));
        assert_eq!(degrees.iter().filter(|d| **d == 1).count(), 2);
        assert!(g.is_dead_end(Cell::new(0, 0)).is_some());
        assert!(g.is_dead_end(Cell::new(5, 4)).is_some());
        assert!(is_perfect_maze(&g));
    }

    #[test]
    fn origin_shift_is_perfect_after_every_iteration() {
        let mut g = Grid::new(7, 5).unwrap();
        let mut checks = vec![];
        {
            let mut observer = |grid: &Grid| checks.push(is_perfect_maze(grid));
            OriginShift {
                iterations: Some(200),
            }
            .generate_observed(&mut g, &mut seeded_rng(17), &mut observer)
            .unwrap();
        }
        // initial tree, one per iteration, final
        assert_eq!(checks.len(), 202);
        assert!(checks.into_iter().all(|perfect| perfect));
    }

    #[test]
    fn origin_shift_without_iterations_is_the_serpentine() {
        let mut shifted = Grid::new(5, 4).unwrap();
        let mut unicursal = Grid::new(5, 4).unwrap();
        OriginShift {
            iterations: Some(0),
        }
        .generate(&mut shifted, &mut seeded_rng(1))
        .unwrap();
        Unicursal.generate(&mut unicursal, &mut seeded_rng(1)).unwrap();
        assert_eq!(shifted, unicursal);
    }

    #[test]
    fn default_iterations() {
        let g = Grid::new(4, 3).unwrap();
        assert_eq!(OriginShift { iterations: None }.iterations_for(&g), 120);
        assert_eq!(OriginShift { iterations: Some(5) }.iterations_for(&g), 5);
    }
}
