//! Maze solving algorithms.
//!
//! A solver finds a route between two cells through the open passages of a grid. It marks what
//! it explores as `Selected` on the grid but never moves a wall. The route comes back as a
//! `Path` of buffer positions.

mod dead_end_filling;
mod random_mouse;
mod search;
mod wall_follower;

pub use self::dead_end_filling::DeadEndFilling;
pub use self::random_mouse::RandomMouse;
pub use self::search::{AStar, Bfs, Dfs, Dijkstra, Heuristic};
pub use self::wall_follower::{Hand, WallFollower};

use crate::cells::{BufferPosition, Cell};
use crate::errors::{ParseAlgorithmError, SolveError};
use crate::grid::Grid;
use crate::observers::{NullObserver, StepObserver};
use crate::utils::FnvHashMap;

use log::debug;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// A route from a start cell to an end cell, as the buffer positions of the cell centres.
/// Consecutive positions are adjacent cells joined by an open passage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    positions: Vec<BufferPosition>,
}

impl Path {
    pub fn from_cells(cells: &[Cell]) -> Path {
        Path {
            positions: cells.iter().map(|c| c.buffer_position()).collect(),
        }
    }

    #[inline]
    pub fn positions(&self) -> &[BufferPosition] {
        &self.positions
    }

    /// Number of positions, start and end included.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of moves between cells.
    #[inline]
    pub fn steps(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<BufferPosition> {
        self.positions.first().cloned()
    }

    pub fn end(&self) -> Option<BufferPosition> {
        self.positions.last().cloned()
    }

    pub fn cells(&self) -> Vec<Cell> {
        self.positions
            .iter()
            .filter_map(|pos| Cell::from_buffer_position(*pos))
            .collect()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.positions.contains(&cell.buffer_position())
    }
}

pub trait Solver {
    fn name(&self) -> &'static str;

    /// Find a route from `start` to `end`, reporting every exploration step to `observer`.
    fn solve_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        start: Cell,
        end: Cell,
        rng: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<Path, SolveError>;

    fn solve<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        start: Cell,
        end: Cell,
        rng: &mut R,
    ) -> Result<Path, SolveError> {
        self.solve_observed(grid, start, end, rng, &mut NullObserver)
    }
}

/// Common opening of every solver run: check both cells are on the grid and wipe the marks of
/// any earlier run. A run whose start is its end is already solved.
fn begin_run(grid: &mut Grid, start: Cell, end: Cell) -> Result<Option<Path>, SolveError> {
    for &cell in &[start, end] {
        if !grid.contains(cell) {
            return Err(SolveError::InvalidCell(cell));
        }
    }
    grid.clear_selected();

    if start == end {
        grid.select_cell(start);
        Ok(Some(Path::from_cells(&[start])))
    } else {
        Ok(None)
    }
}

/// Follow the parent links back from `end` to `start`, returning the route start first.
fn trace_back(parents: &FnvHashMap<Cell, Cell>, start: Cell, end: Cell) -> Vec<Cell> {
    let mut route = vec![end];
    let mut current = end;
    while current != start {
        match parents.get(&current) {
            Some(&parent) => {
                route.push(parent);
                current = parent;
            }
            None => break,
        }
    }
    route.reverse();
    route
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum SolverKind {
    Bfs,
    Dfs,
    Dijkstra,
    AStarManhattan,
    AStarEuclidean,
    RandomMouse,
    LeftHand,
    RightHand,
    DeadEndFilling,
}

impl SolverKind {
    pub const ALL: [SolverKind; 9] = [
        SolverKind::Bfs,
        SolverKind::Dfs,
        SolverKind::Dijkstra,
        SolverKind::AStarManhattan,
        SolverKind::AStarEuclidean,
        SolverKind::RandomMouse,
        SolverKind::LeftHand,
        SolverKind::RightHand,
        SolverKind::DeadEndFilling,
    ];

    pub fn name(&self) -> &'static str {
        match *self {
            SolverKind::Bfs => "bfs",
            SolverKind::Dfs => "dfs",
            SolverKind::Dijkstra => "dijkstra",
            SolverKind::AStarManhattan => "a-star-manhattan",
            SolverKind::AStarEuclidean => "a-star-euclidean",
            SolverKind::RandomMouse => "random-mouse",
            SolverKind::LeftHand => "left-hand",
            SolverKind::RightHand => "right-hand",
            SolverKind::DeadEndFilling => "dead-end-filling",
        }
    }

    /// Is the returned path always a shortest one?
    pub fn is_optimal(&self) -> bool {
        match *self {
            SolverKind::Bfs | SolverKind::Dijkstra | SolverKind::AStarManhattan => true,
            _ => false,
        }
    }
}

impl Solver for SolverKind {
    fn name(&self) -> &'static str {
        SolverKind::name(self)
    }

    fn solve_observed<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        start: Cell,
        end: Cell,
        rng: &mut R,
        observer: &mut dyn StepObserver,
    ) -> Result<Path, SolveError> {
        debug!("{} solving from {} to {}", self.name(), start, end);
        let result = match *self {
            SolverKind::Bfs => Bfs.solve_observed(grid, start, end, rng, observer),
            SolverKind::Dfs => Dfs.solve_observed(grid, start, end, rng, observer),
            SolverKind::Dijkstra => Dijkstra.solve_observed(grid, start, end, rng, observer),
            SolverKind::AStarManhattan => AStar {
                heuristic: Heuristic::Manhattan,
            }
            .solve_observed(grid, start, end, rng, observer),
            SolverKind::AStarEuclidean => AStar {
                heuristic: Heuristic::EuclideanSquared,
            }
            .solve_observed(grid, start, end, rng, observer),
            SolverKind::RandomMouse => RandomMouse.solve_observed(grid, start, end, rng, observer),
            SolverKind::LeftHand => WallFollower { hand: Hand::Left }
                .solve_observed(grid, start, end, rng, observer),
            SolverKind::RightHand => WallFollower { hand: Hand::Right }
                .solve_observed(grid, start, end, rng, observer),
            SolverKind::DeadEndFilling => {
                DeadEndFilling.solve_observed(grid, start, end, rng, observer)
            }
        };
        match result {
            Ok(ref path) => debug!("{} found a path of {} steps", self.name(), path.steps()),
            Err(ref e) => debug!("{} failed: {}", self.name(), e),
        }
        result
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverKind {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<SolverKind, ParseAlgorithmError> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        SolverKind::ALL
            .iter()
            .cloned()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| ParseAlgorithmError {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{BinaryTree, Generator, GeneratorKind};
    use crate::grid::Structure;
    use crate::observers::StepCounter;
    use crate::pathing::{self, Distances};
    use crate::utils::seeded_rng;
    use quickcheck::quickcheck;
    use rand::rngs::mock::StepRng;

    fn maze(kind: GeneratorKind, width: usize, height: usize, seed: u64) -> Grid {
        let mut g = Grid::new(width, height).unwrap();
        kind.generate(&mut g, &mut seeded_rng(seed)).unwrap();
        g
    }

    fn far_corner(g: &Grid) -> Cell {
        Cell::new(g.width() - 1, g.height() - 1)
    }

    fn is_valid_route(g: &Grid, path: &Path, start: Cell, end: Cell) -> bool {
        let cells = path.cells();
        cells.len() == path.len()
            && cells.first() == Some(&start)
            && cells.last() == Some(&end)
            && cells.windows(2).all(|p| g.is_linked(p[0], p[1]))
    }

    #[test]
    fn path_accessors() {
        let gc = |x, y| Cell::new(x, y);
        let path = Path::from_cells(&[gc(0, 0), gc(1, 0), gc(1, 1)]);
        assert_eq!(path.len(), 3);
        assert_eq!(path.steps(), 2);
        assert_eq!(path.start(), Some(BufferPosition::new(1, 1)));
        assert_eq!(path.end(), Some(BufferPosition::new(3, 3)));
        assert_eq!(path.cells(), vec![gc(0, 0), gc(1, 0), gc(1, 1)]);
        assert!(path.contains(gc(1, 0)));
        assert!(!path.contains(gc(0, 1)));
        assert_eq!(
            path.positions(),
            &[
                BufferPosition::new(1, 1),
                BufferPosition::new(1, 3),
                BufferPosition::new(3, 3)
            ]
        );
    }

    #[test]
    fn every_solver_finds_a_valid_route_in_a_perfect_maze() {
        for gen in GeneratorKind::ALL.iter().filter(|k| k.accepts_dimensions(12, 9)) {
            let g = maze(*gen, 12, 9, 21);
            let (start, end) = (Cell::new(0, 0), far_corner(&g));
            let expected = Distances::for_grid(&g, start)
                .and_then(|d| d.distance_from_start_to(end))
                .unwrap() as usize;

            for solver in SolverKind::ALL.iter() {
                let mut solved = g.clone();
                let path = solver
                    .solve(&mut solved, start, end, &mut seeded_rng(4))
                    .unwrap_or_else(|e| panic!("{} on {}: {}", solver, gen, e));
                assert!(is_valid_route(&g, &path, start, end), "{} on {}", solver, gen);

                match *solver {
                    SolverKind::RandomMouse | SolverKind::LeftHand | SolverKind::RightHand => {
                        assert!(path.steps() >= expected)
                    }
                    _ => assert_eq!(path.steps(), expected, "{} on {}", solver, gen),
                }
            }
        }
    }

    #[test]
    fn optimal_solvers_agree_on_an_open_grid() {
        let mut g = Grid::new(8, 6).unwrap();
        g.fill_open();
        let (start, end) = (Cell::new(1, 4), Cell::new(6, 0));
        for solver in SolverKind::ALL.iter().filter(|s| s.is_optimal()) {
            let path = solver
                .solve(&mut g.clone(), start, end, &mut seeded_rng(0))
                .unwrap();
            assert_eq!(path.steps(), start.manhattan_distance(end), "{}", solver);
            assert!(is_valid_route(&g, &path, start, end));
        }
    }

    #[test]
    fn start_is_end() {
        let mut g = maze(GeneratorKind::Prims, 5, 5, 2);
        let cell = Cell::new(2, 3);
        for solver in SolverKind::ALL.iter() {
            let path = solver.solve(&mut g, cell, cell, &mut seeded_rng(1)).unwrap();
            assert_eq!(path.positions(), &[cell.buffer_position()], "{}", solver);
        }
    }

    #[test]
    fn cells_off_the_grid_are_rejected() {
        let mut g = maze(GeneratorKind::Sidewinder, 4, 4, 2);
        for solver in SolverKind::ALL.iter() {
            assert_eq!(
                solver.solve(&mut g, Cell::new(0, 0), Cell::new(4, 0), &mut seeded_rng(1)),
                Err(SolveError::InvalidCell(Cell::new(4, 0)))
            );
            assert_eq!(
                solver.solve(&mut g, Cell::new(0, 9), Cell::new(0, 0), &mut seeded_rng(1)),
                Err(SolveError::InvalidCell(Cell::new(0, 9)))
            );
        }
    }

    #[test]
    fn unreachable_end() {
        // two halves with no passage between them
        let mut g = Grid::new(4, 2).unwrap();
        let gc = |x, y| Cell::new(x, y);
        g.carve(gc(0, 0), gc(1, 0));
        g.carve(gc(0, 0), gc(0, 1));
        g.carve(gc(0, 1), gc(1, 1));
        g.carve(gc(2, 0), gc(3, 0));
        g.carve(gc(3, 0), gc(3, 1));
        g.clear_selected();

        for solver in &[
            SolverKind::Bfs,
            SolverKind::Dfs,
            SolverKind::Dijkstra,
            SolverKind::AStarManhattan,
            SolverKind::AStarEuclidean,
            SolverKind::RandomMouse,
            SolverKind::DeadEndFilling,
        ] {
            assert_eq!(
                solver.solve(&mut g, gc(0, 0), gc(3, 1), &mut seeded_rng(3)),
                Err(SolveError::NotFound),
                "{}",
                solver
            );
        }
        for solver in &[SolverKind::LeftHand, SolverKind::RightHand] {
            assert_eq!(
                solver.solve(&mut g, gc(0, 0), gc(3, 1), &mut seeded_rng(3)),
                Err(SolveError::PreconditionViolation),
                "{}",
                solver
            );
        }
    }

    #[test]
    fn solvers_never_move_walls() {
        let g = maze(GeneratorKind::HuntAndKill, 10, 10, 8);
        let walls = |g: &Grid| {
            g.buffer()
                .iter()
                .map(|s| *s == Structure::Wall)
                .collect::<Vec<bool>>()
        };
        for solver in SolverKind::ALL.iter() {
            let mut solved = g.clone();
            solver
                .solve(&mut solved, Cell::new(9, 0), Cell::new(0, 9), &mut seeded_rng(6))
                .unwrap();
            assert_eq!(walls(&solved), walls(&g), "{}", solver);
            assert!(
                solved.buffer().iter().any(|s| *s == Structure::Selected),
                "{}",
                solver
            );
        }
    }

    #[test]
    fn stale_marks_are_cleared() {
        let mut g = maze(GeneratorKind::Kruskals, 6, 6, 1);
        let end = far_corner(&g);
        SolverKind::Bfs
            .solve(&mut g, Cell::new(0, 0), end, &mut seeded_rng(1))
            .unwrap();
        let path = SolverKind::Bfs
            .solve(&mut g, Cell::new(0, 0), Cell::new(0, 0), &mut seeded_rng(1))
            .unwrap();
        assert_eq!(path.len(), 1);
        let selected = g
            .buffer()
            .iter()
            .filter(|s| **s == Structure::Selected)
            .count();
        assert_eq!(selected, 1);
    }

    #[test]
    fn binary_tree_golden_route() {
        let mut g = Grid::new(5, 5).unwrap();
        BinaryTree.generate(&mut g, &mut StepRng::new(0, 0)).unwrap();

        let path = SolverKind::Bfs
            .solve(&mut g, Cell::new(0, 0), Cell::new(4, 4), &mut seeded_rng(0))
            .unwrap();
        assert_eq!(path.len(), 9);
        assert_eq!(path.steps(), 8);
        let expected: Vec<Cell> = (0..5)
            .map(|x| Cell::new(x, 0))
            .chain((1..5).map(|y| Cell::new(4, y)))
            .collect();
        assert_eq!(path.cells(), expected);
    }

    #[test]
    fn solvers_report_steps() {
        let g = maze(GeneratorKind::Wilson, 6, 6, 9);
        for solver in SolverKind::ALL.iter() {
            let mut counter = StepCounter::default();
            solver
                .solve_observed(
                    &mut g.clone(),
                    Cell::new(0, 0),
                    far_corner(&g),
                    &mut seeded_rng(2),
                    &mut counter,
                )
                .unwrap();
            assert!(counter.steps > 0, "{}", solver);
        }
    }

    #[test]
    fn names_round_trip() {
        for kind in SolverKind::ALL.iter() {
            assert_eq!(kind.name().parse::<SolverKind>(), Ok(*kind));
        }
        assert_eq!("A_Star_Manhattan".parse::<SolverKind>(), Ok(SolverKind::AStarManhattan));
        assert!("teleport".parse::<SolverKind>().is_err());
    }

    #[test]
    fn quickcheck_shortest_paths_match_flood_fill() {
        fn p(seed: u64, w: u8, h: u8, sx: u8, sy: u8) -> bool {
            let (w, h) = (w as usize % 10 + 1, h as usize % 10 + 1);
            let start = Cell::new(sx as usize % w, sy as usize % h);
            let end = Cell::new(w - 1, h - 1);
            let g = maze(GeneratorKind::RecursiveDivision, w, h, seed);
            let expected = Distances::for_grid(&g, start)
                .and_then(|d| d.distance_from_start_to(end))
                .map(|d| d as usize);

            pathing::is_perfect_maze(&g)
                && [
                    SolverKind::Bfs,
                    SolverKind::Dijkstra,
                    SolverKind::AStarManhattan,
                    SolverKind::DeadEndFilling,
                ]
                .iter()
                .all(|solver| {
                    solver
                        .solve(&mut g.clone(), start, end, &mut seeded_rng(seed))
                        .ok()
                        .map(|path| path.steps())
                        == expected
                })
        }
        quickcheck(p as fn(u64, u8, u8, u8, u8) -> bool)
    }
}
