//! Error values returned by the grid, the generators and the solvers.

use crate::cells::Cell;
use std::error::Error;
use std::fmt;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GridError {
    /// Width or height of zero.
    InvalidDimensions { width: usize, height: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GridError::InvalidDimensions { width, height } => {
                write!(f, "invalid grid dimensions {}x{}, both must be positive", width, height)
            }
        }
    }
}

impl Error for GridError {}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GenError {
    InvalidDimensions { width: usize, height: usize },
    /// The grid size cannot be reached by the generator's doubling scheme.
    DimensionMismatch { width: usize, height: usize },
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GenError::InvalidDimensions { width, height } => {
                write!(f, "cannot generate a maze on a {}x{} grid", width, height)
            }
            GenError::DimensionMismatch { width, height } => write!(
                f,
                "a {}x{} grid is not reachable by doubling from 1x1, use a square power of two size",
                width, height
            ),
        }
    }
}

impl Error for GenError {}

impl From<GridError> for GenError {
    fn from(e: GridError) -> GenError {
        match e {
            GridError::InvalidDimensions { width, height } => {
                GenError::InvalidDimensions { width, height }
            }
        }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum SolveError {
    /// There is no route between the start and end cells. An expected outcome, not a defect.
    NotFound,
    /// A start or end cell lies outside the grid.
    InvalidCell(Cell),
    /// The wall follower walked further than any perfect maze of this size allows, so the maze
    /// has cycles or the end is cut off from the start.
    PreconditionViolation,
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SolveError::NotFound => write!(f, "no path between the start and end cells"),
            SolveError::InvalidCell(cell) => write!(f, "cell {} is outside the grid", cell),
            SolveError::PreconditionViolation => write!(
                f,
                "wall following did not reach the end, the maze is not a perfect maze"
            ),
        }
    }
}

impl Error for SolveError {}

/// An algorithm name that does not match any generator or solver.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct ParseAlgorithmError {
    pub name: String,
}

impl fmt::Display for ParseAlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown algorithm name '{}'", self.name)
    }
}

impl Error for ParseAlgorithmError {}
