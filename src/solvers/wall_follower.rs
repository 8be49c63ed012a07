use super::{begin_run, Path, Solver};
use crate::cells::{Cell, CompassPrimary};
use crate::errors::SolveError;
use crate::grid::Grid;
use crate::observers::StepObserver;

use log::trace;
use rand::Rng;

/// The hand kept on the wall.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// Clockwise quarter turns from the current facing to try, in order: the hand side,
    /// straight on, the other side and finally back.
    fn turn_preference(self) -> [usize; 4] {
        match self {
            Hand::Left => [3, 0, 1, 2],
            Hand::Right => [1, 0, 3, 2],
        }
    }
}

/// Walk the maze with one hand always touching a wall. Starts facing east.
///
/// Only guaranteed to reach the end in a perfect maze, on a maze with loops it can circle an
/// island forever. A walk longer than `4 * width * height + 1` moves, more than a full tour
/// of any spanning tree, is abandoned with `PreconditionViolation`.
///
/// The returned path is the route actually walked, dead ends and doubling back included.
#[derive(Debug, Copy, Clone)]
pub struct WallFollower {
    pub hand: Hand,
}

impl WallFollower {
    pub fn move_limit(grid: &Grid) -> usize {
        4 * grid.size() + 1
    }
}

impl Solver for WallFollower {
    fn name(&self) -> &'static str {
        match self.hand {
            Hand::Left => "left-hand",
            Hand::Right => "right-hand",
        }
    }

    fn solve_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        start: Cell,
        end: Cell,
        _: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<Path, SolveError> {
        if let Some(path) = begin_run(grid, start, end)? {
            return Ok(path);
        }

        let limit = WallFollower::move_limit(grid);
        let turns = self.hand.turn_preference();
        let mut facing = CompassPrimary::East;
        let mut current = start;
        let mut route = vec![start];
        grid.select_cell(start);

        while current != end {
            if route.len() > limit {
                trace!("{} gave up after {} moves", self.name(), limit);
                return Err(SolveError::PreconditionViolation);
            }

            let heading = turns
                .iter()
                .map(|turn| facing.turned_clockwise(*turn))
                .find(|dir| grid.is_passage_open(current, *dir));
            let next = heading.and_then(|dir| {
                grid.neighbour_at_direction(current, dir)
                    .map(|cell| (dir, cell))
            });

            match next {
                Some((dir, cell)) => {
                    grid.select_passage(current, cell);
                    facing = dir;
                    current = cell;
                    route.push(cell);
                    observer.on_step(grid);
                }
                // walled in on all four sides
                None => return Err(SolveError::NotFound),
            }
        }

        Ok(Path::from_cells(&route))
    }
}
