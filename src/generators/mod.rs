//! Maze generation algorithms.
//!
//! Every generator carves a maze into a `Grid` in place, starting from a freshly reset grid, and
//! draws all of its randomness from the `Rng` it is handed so that a seed reproduces a maze.
//! `GeneratorKind` is the closed set of available algorithms.

mod backtrackers;
mod division;
mod fixed_paths;
mod random_walks;
mod row_by_row;
mod spanning_trees;

pub use self::backtrackers::{RecursiveBacktracker, SpiralBacktracker};
pub use self::division::{FractalTessellation, RecursiveDivision};
pub use self::fixed_paths::{OriginShift, Unicursal};
pub use self::random_walks::{AldousBroder, HuntAndKill, Wilson};
pub use self::row_by_row::{BinaryTree, Ellers, Sidewinder};
pub use self::spanning_trees::{DisjointSet, Kruskals, Prims};

use crate::errors::{GenError, ParseAlgorithmError};
use crate::grid::Grid;
use crate::observers::{NullObserver, StepObserver};

use log::debug;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

pub trait Generator {
    fn name(&self) -> &'static str;

    /// Carve a maze into `grid`, reporting every carving step to `observer`.
    ///
    /// On error the grid is left in a well defined but unusable state and should be discarded
    /// or reset.
    fn generate_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        rng: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<(), GenError>;

    fn generate<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) -> Result<(), GenError> {
        self.generate_observed(grid, rng, &mut NullObserver)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GeneratorKind {
    AldousBroder,
    Wilson,
    Prims,
    Kruskals,
    /// `stop_when_all_visited` ends the run as soon as the last cell is carved instead of
    /// unwinding the rest of the stack.
    RecursiveBacktracker { stop_when_all_visited: bool },
    HuntAndKill,
    Ellers,
    Sidewinder,
    RecursiveDivision,
    BinaryTree,
    /// `iterations` defaults to ten times the number of cells.
    OriginShift { iterations: Option<usize> },
    SpiralBacktracker,
    Unicursal,
    FractalTessellation,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 14] = [
        GeneratorKind::AldousBroder,
        GeneratorKind::Wilson,
        GeneratorKind::Prims,
        GeneratorKind::Kruskals,
        GeneratorKind::RecursiveBacktracker {
            stop_when_all_visited: true,
        },
        GeneratorKind::HuntAndKill,
        GeneratorKind::Ellers,
        GeneratorKind::Sidewinder,
        GeneratorKind::RecursiveDivision,
        GeneratorKind::BinaryTree,
        GeneratorKind::OriginShift { iterations: None },
        GeneratorKind::SpiralBacktracker,
        GeneratorKind::Unicursal,
        GeneratorKind::FractalTessellation,
    ];

    pub fn name(&self) -> &'static str {
        match *self {
            GeneratorKind::AldousBroder => "aldous-broder",
            GeneratorKind::Wilson => "wilson",
            GeneratorKind::Prims => "prims",
            GeneratorKind::Kruskals => "kruskals",
            GeneratorKind::RecursiveBacktracker { .. } => "recursive-backtracker",
            GeneratorKind::HuntAndKill => "hunt-and-kill",
            GeneratorKind::Ellers => "ellers",
            GeneratorKind::Sidewinder => "sidewinder",
            GeneratorKind::RecursiveDivision => "recursive-division",
            GeneratorKind::BinaryTree => "binary-tree",
            GeneratorKind::OriginShift { .. } => "origin-shift",
            GeneratorKind::SpiralBacktracker => "spiral-backtracker",
            GeneratorKind::Unicursal => "unicursal",
            GeneratorKind::FractalTessellation => "fractal-tessellation",
        }
    }

    /// Can this generator run on a grid of the given size?
    pub fn accepts_dimensions(&self, width: usize, height: usize) -> bool {
        match *self {
            GeneratorKind::FractalTessellation => FractalTessellation::accepts(width, height),
            _ => width > 0 && height > 0,
        }
    }
}

impl Generator for GeneratorKind {
    fn name(&self) -> &'static str {
        GeneratorKind::name(self)
    }

    fn generate_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        rng: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<(), GenError> {
        debug!(
            "{} generation start on a {}x{} grid",
            self.name(),
            grid.width(),
            grid.height()
        );
        let result = match *self {
            GeneratorKind::AldousBroder => AldousBroder.generate_observed(grid, rng, observer),
            GeneratorKind::Wilson => Wilson.generate_observed(grid, rng, observer),
            GeneratorKind::Prims => Prims.generate_observed(grid, rng, observer),
            GeneratorKind::Kruskals => Kruskals.generate_observed(grid, rng, observer),
            GeneratorKind::RecursiveBacktracker {
                stop_when_all_visited,
            } => RecursiveBacktracker {
                stop_when_all_visited,
            }
            .generate_observed(grid, rng, observer),
            GeneratorKind::HuntAndKill => HuntAndKill.generate_observed(grid, rng, observer),
            GeneratorKind::Ellers => Ellers.generate_observed(grid, rng, observer),
            GeneratorKind::Sidewinder => Sidewinder.generate_observed(grid, rng, observer),
            GeneratorKind::RecursiveDivision => {
                RecursiveDivision.generate_observed(grid, rng, observer)
            }
            GeneratorKind::BinaryTree => BinaryTree.generate_observed(grid, rng, observer),
            GeneratorKind::OriginShift { iterations } => {
                OriginShift { iterations }.generate_observed(grid, rng, observer)
            }
            GeneratorKind::SpiralBacktracker => {
                SpiralBacktracker.generate_observed(grid, rng, observer)
            }
            GeneratorKind::Unicursal => Unicursal.generate_observed(grid, rng, observer),
            GeneratorKind::FractalTessellation => {
                FractalTessellation.generate_observed(grid, rng, observer)
            }
        };
        match result {
            Ok(()) => debug!(
                "{} generation done, {} passages",
                self.name(),
                grid.passage_count()
            ),
            Err(e) => debug!("{} generation failed: {}", self.name(), e),
        }
        result
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeneratorKind {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<GeneratorKind, ParseAlgorithmError> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        GeneratorKind::ALL
            .iter()
            .cloned()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| ParseAlgorithmError {
                name: s.to_string(),
            })
    }
}

/// Clear the transient `Selected` marks a generator leaves behind and show the final maze.
fn finish(grid: &mut Grid, observer: &mut dyn StepObserver) -> Result<(), GenError> {
    grid.clear_selected();
    observer.on_step(grid);
    Ok(())
}
