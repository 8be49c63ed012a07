use super::{begin_run, trace_back, Path, Solver};
use crate::cells::Cell;
use crate::errors::SolveError;
use crate::grid::Grid;
use crate::observers::StepObserver;
use crate::utils::fnv_hashmap;

use bit_set::BitSet;
use rand::Rng;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

/// Breadth first search. Explores in rings of equal distance so the first route found to the
/// end is a shortest one.
#[derive(Debug, Default, Copy, Clone)]
pub struct Bfs;

impl Solver for Bfs {
    fn name(&self) -> &'static str {
        "bfs"
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

        let mut visited = BitSet::with_capacity(grid.size());
        let mut parents = fnv_hashmap(grid.size());
        let mut queue = VecDeque::new();

        visited.insert(grid.cell_index(start));
        grid.select_cell(start);
        queue.push_back(start);

        while let Some(cell) = queue.pop_front() {
            if cell == end {
                return Ok(Path::from_cells(&trace_back(&parents, start, end)));
            }

            for next in grid.passages(cell) {
                if visited.insert(grid.cell_index(next)) {
                    parents.insert(next, cell);
                    grid.select_passage(cell, next);
                    queue.push_back(next);
                    observer.on_step(grid);
                }
            }
        }
        Err(SolveError::NotFound)
    }
}

/// Depth first search with an explicit stack. Finds some route, not necessarily a short one.
#[derive(Debug, Default, Copy, Clone)]
pub struct Dfs;

impl Solver for Dfs {
    fn name(&self) -> &'static str {
        "dfs"
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

        let mut visited = BitSet::with_capacity(grid.size());
        let mut parents = fnv_hashmap(grid.size());
        // (cell, the cell it was reached from)
        let mut stack = vec![(start, start)];

        while let Some((cell, parent)) = stack.pop() {
            if !visited.insert(grid.cell_index(cell)) {
                continue;
            }
            if cell == start {
                grid.select_cell(cell);
            } else {
                parents.insert(cell, parent);
                grid.select_passage(parent, cell);
            }
            observer.on_step(grid);

            if cell == end {
                return Ok(Path::from_cells(&trace_back(&parents, start, end)));
            }

            for next in grid.passages(cell) {
                if !visited.contains(grid.cell_index(next)) {
                    stack.push((next, cell));
                }
            }
        }
        Err(SolveError::NotFound)
    }
}

/// Dijkstra's algorithm. Every passage costs one, so on a maze it explores in the same rings as
/// breadth first search, ties broken by the lowest cell.
#[derive(Debug, Default, Copy, Clone)]
pub struct Dijkstra;

impl Solver for Dijkstra {
    fn name(&self) -> &'static str {
        "dijkstra"
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
        best_first(grid, start, end, observer, Revisit::Relax, |_| 0)
    }
}

/// Estimates of the remaining distance to the end for A*.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Heuristic {
    /// `|dx| + |dy|`, never overestimates on a grid so A* stays optimal.
    Manhattan,
    /// `dx² + dy²` without the square root. It overestimates, which makes the search greedier
    /// and its routes possibly longer than the shortest.
    EuclideanSquared,
}

impl Heuristic {
    pub fn estimate(self, from: Cell, to: Cell) -> usize {
        match self {
            Heuristic::Manhattan => from.manhattan_distance(to),
            Heuristic::EuclideanSquared => from.squared_distance(to),
        }
    }

    fn revisit(self) -> Revisit {
        match self {
            Heuristic::Manhattan => Revisit::Relax,
            Heuristic::EuclideanSquared => Revisit::FirstWins,
        }
    }
}

/// What a best first search does on reaching an already discovered cell more cheaply.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
enum Revisit {
    /// Lower its cost, take the new parent and queue it again.
    Relax,
    /// Nothing. The first discovery fixes a cell's cost and parent.
    FirstWins,
}

#[derive(Debug, Copy, Clone)]
pub struct AStar {
    pub heuristic: Heuristic,
}

impl Default for AStar {
    fn default() -> AStar {
        AStar {
            heuristic: Heuristic::Manhattan,
        }
    }
}

impl Solver for AStar {
    fn name(&self) -> &'static str {
        match self.heuristic {
            Heuristic::Manhattan => "a-star-manhattan",
            Heuristic::EuclideanSquared => "a-star-euclidean",
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
        let heuristic = self.heuristic;
        best_first(grid, start, end, observer, heuristic.revisit(), |cell| {
            heuristic.estimate(cell, end)
        })
    }
}

/// Search ordered by a min heap on `cost so far + heuristic(cell)`, ties going to the lowest
/// cell. With `Revisit::Relax` a cell whose cost improves is pushed again and the outdated heap
/// entry skipped when it surfaces. With `Revisit::FirstWins` every cell is queued once, so an
/// overestimating heuristic keeps whatever route it found first.
fn best_first<H>(
    grid: &mut Grid,
    start: Cell,
    end: Cell,
    observer: &mut dyn StepObserver,
    revisit: Revisit,
    heuristic: H,
) -> Result<Path, SolveError>
where
    H: Fn(Cell) -> usize,
{
    let mut costs = fnv_hashmap(grid.size());
    let mut parents = fnv_hashmap(grid.size());
    let mut heap = BinaryHeap::new();

    costs.insert(start, 0usize);
    grid.select_cell(start);
    heap.push(Reverse((heuristic(start), start)));

    while let Some(Reverse((priority, cell))) = heap.pop() {
        let cost = costs[&cell];
        if revisit == Revisit::Relax && priority > cost + heuristic(cell) {
            continue;
        }
        if cell == end {
            return Ok(Path::from_cells(&trace_back(&parents, start, end)));
        }

        for next in grid.passages(cell) {
            let next_cost = cost + 1;
            let improved = match (revisit, costs.get(&next)) {
                (_, None) => true,
                (Revisit::Relax, Some(known)) => next_cost < *known,
                (Revisit::FirstWins, Some(_)) => false,
            };
            if improved {
                costs.insert(next, next_cost);
                parents.insert(next, cell);
                grid.select_passage(cell, next);
                heap.push(Reverse((next_cost + heuristic(next), next)));
                observer.on_step(grid);
            }
        }
    }
    Err(SolveError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observers::NullObserver;
    use crate::utils::seeded_rng;

    fn corridor(length: usize) -> Grid {
        let mut g = Grid::new(length, 1).unwrap();
        for x in 1..length {
            g.carve(Cell::new(x - 1, 0), Cell::new(x, 0));
        }
        g.clear_selected();
        g
    }

    #[test]
    fn heuristics() {
        let (a, b) = (Cell::new(0, 0), Cell::new(3, 4));
        assert_eq!(Heuristic::Manhattan.estimate(a, b), 7);
        assert_eq!(Heuristic::EuclideanSquared.estimate(a, b), 25);
        assert_eq!(Heuristic::Manhattan.estimate(b, b), 0);
    }

    #[test]
    fn bfs_along_a_corridor() {
        let mut g = corridor(6);
        let path = Bfs
            .solve(&mut g, Cell::new(5, 0), Cell::new(1, 0), &mut seeded_rng(0))
            .unwrap();
        let xs: Vec<usize> = path.cells().iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn dfs_follows_the_last_pushed_passage() {
        // from the centre of an open 3x3 grid the west passage is pushed last and taken first
        let mut g = Grid::new(3, 3).unwrap();
        g.fill_open();
        let path = Dfs
            .solve(&mut g, Cell::new(1, 1), Cell::new(0, 1), &mut seeded_rng(0))
            .unwrap();
        assert_eq!(path.cells(), vec![Cell::new(1, 1), Cell::new(0, 1)]);
    }

    #[test]
    fn best_first_with_inadmissible_heuristic_still_finds_a_route() {
        let mut g = Grid::new(7, 7).unwrap();
        g.fill_open();
        let (start, end) = (Cell::new(0, 6), Cell::new(6, 0));
        let path = best_first(&mut g, start, end, &mut NullObserver, Revisit::FirstWins, |c| {
            Heuristic::EuclideanSquared.estimate(c, end)
        })
        .unwrap();
        let cells = path.cells();
        assert_eq!(cells.first(), Some(&start));
        assert_eq!(cells.last(), Some(&end));
        assert!(cells.windows(2).all(|p| g.is_linked(p[0], p[1])));
    }

    // open 4x3 grid, every corner to corner route is a shortest one
    fn open_four_by_three() -> Grid {
        let mut g = Grid::new(4, 3).unwrap();
        g.fill_open();
        g
    }

    #[test]
    fn bfs_ties_go_south_first() {
        let mut g = open_four_by_three();
        let gc = |x, y| Cell::new(x, y);
        let path = Bfs
            .solve(&mut g, gc(0, 0), gc(3, 2), &mut seeded_rng(0))
            .unwrap();
        assert_eq!(
            path.cells(),
            vec![gc(0, 0), gc(0, 1), gc(0, 2), gc(1, 2), gc(2, 2), gc(3, 2)]
        );

        let back = Bfs
            .solve(&mut g, gc(3, 2), gc(0, 0), &mut seeded_rng(0))
            .unwrap();
        assert_eq!(
            back.cells(),
            vec![gc(3, 2), gc(3, 1), gc(3, 0), gc(2, 0), gc(1, 0), gc(0, 0)]
        );
    }

    #[test]
    fn dijkstra_ties_go_to_the_lowest_cell() {
        let mut g = open_four_by_three();
        let gc = |x, y| Cell::new(x, y);
        let path = Dijkstra
            .solve(&mut g, gc(3, 2), gc(0, 0), &mut seeded_rng(0))
            .unwrap();
        assert_eq!(
            path.cells(),
            vec![gc(3, 2), gc(2, 2), gc(1, 2), gc(0, 2), gc(0, 1), gc(0, 0)]
        );
    }

    #[test]
    fn euclidean_a_star_keeps_the_first_route_to_each_cell() {
        // open 4x4 grid, full of loops, with two walls put back
        let mut g = Grid::new(4, 4).unwrap();
        g.fill_open();
        let gc = |x, y| Cell::new(x, y);
        g.close_passage(gc(1, 2), gc(2, 2));
        g.close_passage(gc(2, 3), gc(3, 3));
        let (start, end) = (gc(0, 0), gc(3, 3));

        let euclidean = AStar {
            heuristic: Heuristic::EuclideanSquared,
        }
        .solve(&mut g.clone(), start, end, &mut seeded_rng(0))
        .unwrap();
        assert_eq!(
            euclidean.cells(),
            vec![
                gc(0, 0),
                gc(0, 1),
                gc(1, 1),
                gc(1, 2),
                gc(1, 3),
                gc(2, 3),
                gc(2, 2),
                gc(3, 2),
                gc(3, 3)
            ]
        );
        assert_eq!(euclidean.steps(), 8);

        let manhattan = AStar::default()
            .solve(&mut g.clone(), start, end, &mut seeded_rng(0))
            .unwrap();
        assert_eq!(manhattan.steps(), 6);
    }

    #[test]
    fn a_star_names() {
        assert_eq!(AStar::default().name(), "a-star-manhattan");
        assert_eq!(
            AStar {
                heuristic: Heuristic::EuclideanSquared
            }
            .name(),
            "a-star-euclidean"
        );
    }
}
