use super::{begin_run, Dfs, Path, Solver};
use crate::cells::Cell;
use crate::errors::SolveError;
use crate::grid::Grid;
use crate::observers::{NullObserver, StepObserver};

use bit_set::BitSet;
use log::trace;
use rand::Rng;

/// Dead-end filling: keep filling in dead ends, other than the start and end, until none are
/// left. On a perfect maze only the route from start to end survives, which a depth first
/// search then reads off.
///
/// The filling happens on a private copy of the grid. On the grid itself the filled cells and
/// the final route are marked `Selected`.
#[derive(Debug, Default, Copy, Clone)]
pub struct DeadEndFilling;

impl Solver for DeadEndFilling {
    fn name(&self) -> &'static str {
        "dead-end-filling"
    }

    fn solve_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        start: Cell,
        end: Cell,
        rng: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<Path, SolveError> {
        if let Some(path) = begin_run(grid, start, end)? {
            return Ok(path);
        }

        let mut reduced = grid.clone();
        let filled = fill_dead_ends(&mut reduced, start, end, |cell| {
            grid.select_cell(cell);
            observer.on_step(grid);
        });
        trace!("dead end filling filled {} cells", filled);

        let path = Dfs.solve_observed(&mut reduced, start, end, rng, &mut NullObserver)?;
        let cells = path.cells();
        grid.select_cell(start);
        for pair in cells.windows(2) {
            grid.select_passage(pair[0], pair[1]);
        }
        observer.on_step(grid);
        Ok(path)
    }
}

/// Fill dead ends in row major passes until a pass finds none, calling `on_fill` with each cell
/// filled. Returns how many cells were filled.
fn fill_dead_ends<F>(grid: &mut Grid, start: Cell, end: Cell, mut on_fill: F) -> usize
where
    F: FnMut(Cell),
{
    let mut filled = BitSet::with_capacity(grid.size());
    let mut pass = 0;
    loop {
        pass += 1;
        let mut filled_this_pass = 0;

        for cell in grid.iter() {
            if cell == start || cell == end || filled.contains(grid.cell_index(cell)) {
                continue;
            }
            let exit = grid
                .is_dead_end(cell)
                .and_then(|dir| grid.neighbour_at_direction(cell, dir));
            if let Some(exit) = exit {
                grid.close_passage(cell, exit);
                filled.insert(grid.cell_index(cell));
                filled_this_pass += 1;
                on_fill(cell);
            }
        }

        trace!("dead end filling pass {} filled {}", pass, filled_this_pass);
        if filled_this_pass == 0 {
            return filled.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{Generator, GeneratorKind};
    use crate::pathing::is_perfect_maze;
    use crate::utils::seeded_rng;

    #[test]
    fn filling_a_perfect_maze_leaves_only_the_route() {
        let mut g = Grid::new(9, 9).unwrap();
        GeneratorKind::Kruskals.generate(&mut g, &mut seeded_rng(14)).unwrap();
        assert!(is_perfect_maze(&g));

        let (start, end) = (Cell::new(0, 0), Cell::new(8, 8));
        let route = Dfs.solve(&mut g.clone(), start, end, &mut seeded_rng(0)).unwrap();

        let mut reduced = g.clone();
        let mut filled_cells = vec![];
        let filled = fill_dead_ends(&mut reduced, start, end, |cell| filled_cells.push(cell));

        assert_eq!(filled, filled_cells.len());
        assert_eq!(filled + route.len(), g.size());
        assert!(filled_cells.iter().all(|c| !route.contains(*c)));
        assert_eq!(reduced.passage_count(), route.steps());
    }

    #[test]
    fn start_and_end_are_never_filled() {
        let mut g = Grid::new(4, 1).unwrap();
        for x in 1..4 {
            g.carve(Cell::new(x - 1, 0), Cell::new(x, 0));
        }
        let filled = fill_dead_ends(&mut g, Cell::new(0, 0), Cell::new(2, 0), |_| {});
        assert_eq!(filled, 1);
        assert!(g.is_linked(Cell::new(0, 0), Cell::new(1, 0)));
        assert!(!g.is_linked(Cell::new(2, 0), Cell::new(3, 0)));
    }

    #[test]
    fn the_grid_keeps_its_walls() {
        let mut g = Grid::new(6, 6).unwrap();
        GeneratorKind::Ellers.generate(&mut g, &mut seeded_rng(2)).unwrap();
        let before = g.passage_count();
        let path = DeadEndFilling
            .solve(&mut g, Cell::new(5, 0), Cell::new(0, 5), &mut seeded_rng(0))
            .unwrap();
        assert_eq!(g.passage_count(), before);
        assert!(path.cells().windows(2).all(|p| g.is_linked(p[0], p[1])));
    }
}
