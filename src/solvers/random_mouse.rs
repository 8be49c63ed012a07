use super::{begin_run, Path, Solver};
use crate::cells::{Cell, CompassPrimary, DirectionSmallVec};
use crate::errors::SolveError;
use crate::grid::Grid;
use crate::observers::StepObserver;

use bit_set::BitSet;
use rand::seq::SliceRandom;
use rand::Rng;

/// The random mouse: at every cell shuffle the four directions and take the first open one
/// leading somewhere not yet visited, backing up a cell when there is nowhere new to go.
///
/// Remembering where it has been keeps the mouse from walking forever. Once it has backed all
/// the way out of the start there is no route.
#[derive(Debug, Default, Copy, Clone)]
pub struct RandomMouse;

impl Solver for RandomMouse {
    fn name(&self) -> &'static str {
        "random-mouse"
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

        let mut visited = BitSet::with_capacity(grid.size());
        visited.insert(grid.cell_index(start));
        grid.select_cell(start);
        let mut route = vec![start];
        let mut directions: DirectionSmallVec =
            CompassPrimary::SEARCH_ORDER.iter().cloned().collect();

        while let Some(&current) = route.last() {
            if current == end {
                return Ok(Path::from_cells(&route));
            }

            directions.shuffle(rng);
            let next = directions
                .iter()
                .filter(|dir| grid.is_passage_open(current, **dir))
                .filter_map(|dir| grid.neighbour_at_direction(current, *dir))
                .find(|n| !visited.contains(grid.cell_index(*n)));

            match next {
                Some(next) => {
                    visited.insert(grid.cell_index(next));
                    grid.select_passage(current, next);
                    route.push(next);
                }
                None => {
                    route.pop();
                }
            }
            observer.on_step(grid);
        }
        Err(SolveError::NotFound)
    }
}
