//! Flood fill distances and whole-maze analysis, independent of the solvers.
//!
//! `Distances` answers "how far is every cell from here" by breadth first flood fill through
//! the open passages. It is the reference the solvers are checked against and is used to pick
//! the longest path through a maze. The passage graph can also be exported to `petgraph` for
//! connectivity checks.

use crate::cells::Cell;
use crate::grid::Grid;
use crate::utils::{self, FnvHashMap};

use itertools::Itertools;
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use smallvec::SmallVec;

pub type MaxDistance = u32;

#[derive(Debug, Clone)]
pub struct Distances {
    start: Cell,
    distances: FnvHashMap<Cell, MaxDistance>,
    max_distance: MaxDistance,
}

impl Distances {
    /// Flood fill out from `start`. None if `start` is not on the grid.
    pub fn for_grid(grid: &Grid, start: Cell) -> Option<Distances> {
        if !grid.contains(start) {
            return None;
        }

        let mut max = 0;
        let mut distances = utils::fnv_hashmap(grid.size());
        distances.insert(start, 0);

        // Every step costs one, so the first time a cell is reached is along a shortest route
        // and the map doubles as the visited set.
        let mut frontier = vec![start];
        while !frontier.is_empty() {
            let mut new_frontier = vec![];
            for cell in &frontier {
                let distance_to_cell = distances[cell];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                for link in grid.passages(*cell) {
                    if !distances.contains_key(&link) {
                        distances.insert(link, distance_to_cell + 1);
                        new_frontier.push(link);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> Cell {
        self.start
    }

    #[inline(always)]
    pub fn max(&self) -> MaxDistance {
        self.max_distance
    }

    /// None for cells that are unreachable or not on the grid.
    #[inline(always)]
    pub fn distance_from_start_to(&self, cell: Cell) -> Option<MaxDistance> {
        self.distances.get(&cell).cloned()
    }

    /// Number of cells reachable from the start, the start included.
    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    /// All cells at the maximum distance, in row major order.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[Cell; 8]> {
        let furthest_distance = self.max();
        self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(cell, _)| *cell)
            .sorted_by_key(|cell| (cell.y, cell.x))
            .collect()
    }
}

/// Walk back from `end_point` to the start of the flood fill, always stepping to a linked
/// neighbour one closer to the start. None if the end is unreachable.
pub fn shortest_path(
    grid: &Grid,
    distances_from_start: &Distances,
    end_point: Cell,
) -> Option<Vec<Cell>> {
    distances_from_start.distance_from_start_to(end_point)?;

    let mut path = vec![end_point];
    let start = distances_from_start.start();
    let mut current = end_point;

    while current != start {
        let current_distance = distances_from_start.distance_from_start_to(current)?;
        let closer = grid
            .passages(current)
            .into_iter()
            .filter_map(|n| {
                distances_from_start
                    .distance_from_start_to(n)
                    .map(|d| (n, d))
            })
            .min_by_key(|&(_, d)| d);

        match closer {
            Some((cell, distance)) if distance < current_distance => {
                current = cell;
                path.push(current);
            }
            // the distances were computed on some other grid
            _ => return None,
        }
    }

    path.reverse();
    Some(path)
}

/// The longest shortest path in the maze: flood from the top left corner, flood again from the
/// furthest cell found and take the route to the furthest cell of the second flood.
///
/// Exact only on a perfect maze, elsewhere it is just a long path.
pub fn longest_path(grid: &Grid) -> Option<Vec<Cell>> {
    let first_distances = Distances::for_grid(grid, Cell::new(0, 0))?;
    let path_start = *first_distances.furthest_points_on_grid().first()?;

    let distances_from_start = Distances::for_grid(grid, path_start)?;
    let path_end = *distances_from_start.furthest_points_on_grid().first()?;

    shortest_path(grid, &distances_from_start, path_end)
}

/// Export the cells and open passages as an undirected graph. Node `i` is the cell with row
/// major index `i`.
pub fn passage_graph(grid: &Grid) -> UnGraph<Cell, ()> {
    let mut graph = UnGraph::with_capacity(grid.size(), grid.size());
    for cell in grid.iter() {
        graph.add_node(cell);
    }
    for cell in grid.iter() {
        for neighbour in grid.passages(cell) {
            if grid.cell_index(neighbour) > grid.cell_index(cell) {
                graph.add_edge(
                    NodeIndex::new(grid.cell_index(cell)),
                    NodeIndex::new(grid.cell_index(neighbour)),
                    (),
                );
            }
        }
    }
    graph
}

/// A perfect maze is a spanning tree of the cells: connected with exactly one route between any
/// two cells.
pub fn is_perfect_maze(grid: &Grid) -> bool {
    let graph = passage_graph(grid);
    graph.edge_count() + 1 == graph.node_count() && connected_components(&graph) == 1
}
