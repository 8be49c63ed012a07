//! **mazes** is a maze generation and route finding library.
//!
//! A `grid::Grid` is a buffer of walls and passages. One of the `generators` carves a maze into
//! it and any of the `solvers` can then find a route through it. `pathing` holds the flood fill
//! analysis used to check and measure mazes.

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_iterators;
pub mod observers;
pub mod pathing;
pub mod solvers;
pub mod units;
pub mod utils;
