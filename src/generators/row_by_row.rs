use super::{finish, Generator};
use crate::cells::{Cell, CompassPrimary};
use crate::errors::GenError;
use crate::grid::Grid;
use crate::observers::StepObserver;

use itertools::Itertools;
use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

/// Binary Tree: every cell links either north or west, flipping a coin when both are possible.
///
/// The first row can only link west and the first column only north, which leaves two long
/// unbroken corridors along the top and left edges and a strong diagonal bias.
#[derive(Debug, Default, Copy, Clone)]
pub struct BinaryTree;

impl Generator for BinaryTree {
    fn name(&self) -> &'static str {
        "binary-tree"
    }

    fn generate_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        rng: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<(), GenError> {
        grid.reset();

        for cell in grid.iter() {
            let north = grid.neighbour_at_direction(cell, CompassPrimary::North);
            let west = grid.neighbour_at_direction(cell, CompassPrimary::West);

            let linked = match (north, west) {
                (Some(north), Some(west)) => {
                    if rng.gen_bool(0.5) {
                        north
                    } else {
                        west
                    }
                }
                (Some(north), None) => north,
                (None, Some(west)) => west,
                (None, None) => continue,
            };

            grid.carve(cell, linked);
            observer.on_step(grid);
        }

        finish(grid, observer)
    }
}

/// Sidewinder: work each row left to right, collecting a run of cells joined eastwards. A coin
/// flip, or the east edge, closes the run by carving north from one random member of it.
///
/// The first row has no north so it is always one long corridor.
#[derive(Debug, Default, Copy, Clone)]
pub struct Sidewinder;

impl Generator for Sidewinder {
    fn name(&self) -> &'static str {
        "sidewinder"
    }

    fn generate_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        rng: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<(), GenError> {
        grid.reset();
        let last_column = grid.width() - 1;

        for row in grid.iter_row() {
            let mut run: Vec<Cell> = Vec::with_capacity(row.len());

            for cell in row {
                run.push(cell);
                let at_east_edge = cell.x == last_column;
                let at_north_edge = cell.y == 0;
                let close_out = at_east_edge || (!at_north_edge && rng.gen_bool(0.5));

                if close_out {
                    if let Some(&member) = run.choose(rng) {
                        if let Some(north) =
                            grid.neighbour_at_direction(member, CompassPrimary::North)
                        {
                            grid.carve(member, north);
                        }
                    }
                    run.clear();
                } else {
                    let east = Cell::new(cell.x + 1, cell.y);
                    grid.carve(cell, east);
                }
                observer.on_step(grid);
            }
        }

        finish(grid, observer)
    }
}

/// Eller's algorithm: one row at a time, tracking which cells of the current row are already
/// connected (share a set).
///
/// Adjacent cells of different sets are randomly joined, then every set drops at least one
/// passage down into the next row. The last row joins every remaining pair of different sets so
/// the maze ends up as a single set.
#[derive(Debug, Default, Copy, Clone)]
pub struct Ellers;

impl Generator for Ellers {
    fn name(&self) -> &'static str {
        "ellers"
    }

    fn generate_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        rng: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<(), GenError> {
        grid.reset();
        let (width, height) = (grid.width(), grid.height());

        // set id per column of the current row, 0 for cells not yet in any set
        let mut row_sets = vec![0usize; width];
        let mut next_set_id = 1;

        for y in 0..height {
            let is_last_row = y == height - 1;

            for set in row_sets.iter_mut().filter(|set| **set == 0) {
                *set = next_set_id;
                next_set_id += 1;
            }

            for x in 0..width - 1 {
                let (left, right) = (row_sets[x], row_sets[x + 1]);
                if left != right && (is_last_row || rng.gen_bool(0.5)) {
                    grid.carve(Cell::new(x, y), Cell::new(x + 1, y));
                    for set in row_sets.iter_mut().filter(|set| **set == right) {
                        *set = left;
                    }
                    observer.on_step(grid);
                }
            }

            if is_last_row {
                break;
            }

            let mut next_row_sets = vec![0usize; width];
            let mut columns_by_set: Vec<(usize, usize)> = row_sets
                .iter()
                .cloned()
                .enumerate()
                .map(|(x, set)| (set, x))
                .collect();
            columns_by_set.sort();

            let groups = columns_by_set.into_iter().group_by(|&(set, _)| set);
            for (set, group) in &groups {
                let members: Vec<usize> = group.map(|(_, x)| x).collect();
                let guaranteed = rng.gen_range(0..members.len());

                for (i, &x) in members.iter().enumerate() {
                    if i == guaranteed || rng.gen_bool(0.5) {
                        grid.carve(Cell::new(x, y), Cell::new(x, y + 1));
                        next_row_sets[x] = set;
                        observer.on_step(grid);
                    }
                }
            }

            row_sets = next_row_sets;
        }
        trace!("ellers used {} set ids", next_set_id - 1);

        finish(grid, observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathing::is_perfect_maze;
    use crate::utils::seeded_rng;
    use rand::rngs::mock::StepRng;

    #[test]
    fn binary_tree_with_a_fixed_coin_carves_north() {
        // a constant zero stream always answers true to gen_bool(0.5)
        let mut g = Grid::new(5, 5).unwrap();
        BinaryTree.generate(&mut g, &mut StepRng::new(0, 0)).unwrap();

        for x in 1..5 {
            assert!(g.is_linked(Cell::new(x - 1, 0), Cell::new(x, 0)));
        }
        for cell in g.iter().filter(|c| c.y > 0) {
            assert!(g.is_linked(cell, Cell::new(cell.x, cell.y - 1)));
            if cell.x > 0 {
                assert!(!g.is_linked(cell, Cell::new(cell.x - 1, cell.y)));
            }
        }
        assert!(is_perfect_maze(&g));
    }

    #[test]
    fn binary_tree_edges_are_corridors() {
        let mut g = Grid::new(8, 6).unwrap();
        BinaryTree.generate(&mut g, &mut seeded_rng(12)).unwrap();
        for x in 1..8 {
            assert!(g.is_linked(Cell::new(x - 1, 0), Cell::new(x, 0)));
        }
        for y in 1..6 {
            assert!(g.is_linked(Cell::new(0, y - 1), Cell::new(0, y)));
        }
    }

    #[test]
    fn sidewinder_first_row_is_a_corridor() {
        let mut g = Grid::new(9, 5).unwrap();
        Sidewinder.generate(&mut g, &mut seeded_rng(6)).unwrap();
        for x in 1..9 {
            assert!(g.is_linked(Cell::new(x - 1, 0), Cell::new(x, 0)));
        }
        assert!(is_perfect_maze(&g));
    }

    #[test]
    fn sidewinder_never_carves_through_the_east_edge() {
        let mut g = Grid::new(4, 4).unwrap();
        Sidewinder.generate(&mut g, &mut seeded_rng(1)).unwrap();
        for y in 0..4 {
            assert!(!g.is_passage_open(Cell::new(3, y), CompassPrimary::East));
        }
    }

    #[test]
    fn ellers_is_perfect() {
        for &(w, h) in &[(1, 1), (1, 5), (5, 1), (12, 7)] {
            for seed in 0..10 {
                let mut g = Grid::new(w, h).unwrap();
                Ellers.generate(&mut g, &mut seeded_rng(seed)).unwrap();
                assert!(is_perfect_maze(&g), "{}x{} seed {}", w, h, seed);
            }
        }
    }
}
