//! Step callbacks for watching an algorithm build or explore a maze.
//!
//! Generators and solvers call `on_step` after each state changing step, once the grid is
//! consistent again. Whether anything is attached never changes what the algorithm does.

use crate::grid::Grid;

pub trait StepObserver {
    fn on_step(&mut self, grid: &Grid);
}

/// Any `FnMut(&Grid)` closure can watch a run, e.g. to render animation frames.
impl<F: FnMut(&Grid)> StepObserver for F {
    fn on_step(&mut self, grid: &Grid) {
        self(grid)
    }
}

/// Observer used when nobody is watching.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullObserver;

impl StepObserver for NullObserver {
    fn on_step(&mut self, _: &Grid) {}
}

/// Counts the steps of a run.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct StepCounter {
    pub steps: usize,
}

impl StepObserver for StepCounter {
    fn on_step(&mut self, _: &Grid) {
        self.steps += 1;
    }
}
