use super::{finish, Generator};
use crate::cells::{CompassPrimary, Wall};
use crate::errors::GenError;
use crate::grid::Grid;
use crate::observers::StepObserver;

use bit_set::BitSet;
use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

/// Randomised Prim's: grow the maze out from a random cell by repeatedly opening a random wall
/// on the frontier between the maze and a cell not yet in it.
///
/// The frontier is an unordered list and walls whose far side joined the maze after they were
/// queued are dropped when drawn.
#[derive(Debug, Default, Copy, Clone)]
pub struct Prims;

impl Generator for Prims {
    fn name(&self) -> &'static str {
        "prims"
    }

    fn generate_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        rng: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<(), GenError> {
        grid.reset();
        let mut in_maze = BitSet::with_capacity(grid.size());
        let mut frontier: Vec<Wall> = Vec::new();

        let start = grid.random_cell(rng);
        in_maze.insert(grid.cell_index(start));
        grid.select_cell(start);
        frontier.extend(grid.neighbours(start).into_iter().map(|n| Wall::new(start, n)));

        while !frontier.is_empty() {
            let wall = frontier.swap_remove(rng.gen_range(0..frontier.len()));
            if !in_maze.insert(grid.cell_index(wall.to)) {
                continue;
            }

            grid.carve(wall.from, wall.to);
            for n in grid.neighbours(wall.to) {
                if !in_maze.contains(grid.cell_index(n)) {
                    frontier.push(Wall::new(wall.to, n));
                }
            }
            observer.on_step(grid);
        }

        finish(grid, observer)
    }
}

/// Randomised Kruskal's: visit every interior wall in a random order and open it whenever the
/// cells either side of it are not yet connected.
#[derive(Debug, Default, Copy, Clone)]
pub struct Kruskals;

impl Generator for Kruskals {
    fn name(&self) -> &'static str {
        "kruskals"
    }

    fn generate_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        rng: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<(), GenError> {
        grid.reset();

        let mut walls: Vec<Wall> = grid
            .iter()
            .flat_map(|cell| {
                [CompassPrimary::East, CompassPrimary::South]
                    .iter()
                    .filter_map(|dir| grid.neighbour_at_direction(cell, *dir))
                    .map(|n| Wall::new(cell, n))
                    .collect::<Vec<Wall>>()
            })
            .collect();
        walls.shuffle(rng);

        let mut sets = DisjointSet::new(grid.size());
        let mut unions = 0;
        for wall in walls {
            let (a, b) = (grid.cell_index(wall.from), grid.cell_index(wall.to));
            if sets.union(a, b) {
                grid.carve(wall.from, wall.to);
                unions += 1;
                observer.on_step(grid);
                if unions + 1 == grid.size() {
                    break;
                }
            }
        }
        trace!("kruskals joined {} sets", unions);

        finish(grid, observer)
    }
}

/// Union-find over the indices `0..size`, with path compression and union by rank.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parents: Vec<usize>,
    ranks: Vec<u8>,
}

impl DisjointSet {
    /// Every element starts in a set of its own.
    pub fn new(size: usize) -> DisjointSet {
        DisjointSet {
            parents: (0..size).collect(),
            ranks: vec![0; size],
        }
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// The representative of the set containing `element`.
    pub fn find(&mut self, element: usize) -> usize {
        let mut root = element;
        while self.parents[root] != root {
            root = self.parents[root];
        }

        let mut current = element;
        while self.parents[current] != root {
            let next = self.parents[current];
            self.parents[current] = root;
            current = next;
        }
        root
    }

    /// Merge the sets holding `a` and `b`. Returns false if they were already the same set.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return false;
        }

        if self.ranks[root_a] < self.ranks[root_b] {
            self.parents[root_a] = root_b;
        } else if self.ranks[root_a] > self.ranks[root_b] {
            self.parents[root_b] = root_a;
        } else {
            self.parents[root_b] = root_a;
            self.ranks[root_a] += 1;
        }
        true
    }

    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}
