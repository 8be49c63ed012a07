use docopt::Docopt;
use log::{debug, info, warn};
use mazes::{
    cells::Cell,
    errors::SolveError,
    generators::{Generator, GeneratorKind},
    grid::Grid,
    grid_displays::{GridView, PathDisplay, StartEndPointsDisplay},
    pathing::{self, Distances},
    solvers::{Solver, SolverKind},
    utils,
};
use serde_derive::Deserialize;

const USAGE: &str = "Mazes

Usage:
    mazes_driver -h | --help
    mazes_driver --list
    mazes_driver [<generator>] [options]

Options:
    -h --help                       Show this screen.
    --list                          List the generator and solver names.
    --width=<w>                     The grid width in a w*h grid [default: 10].
    --height=<h>                    The grid height in a w*h grid [default: 10].
    --size=<n>                      The grid size is n * n.
    --seed=<s>                      Seed for the random number generator, random if not given.
    --origin-shift-iterations=<n>   Origin shift iterations, ten per cell if not given.
    --no-early-exit                 Let the recursive backtracker unwind its whole stack.
    --solve=<names>                 Comma separated solver names to run on the maze.
    --solve-all                     Run every solver on the maze.
    --start-x=<x>                   x coordinate of the path start [default: 0].
    --start-y=<y>                   y coordinate of the path start [default: 0].
    --end-x=<x>                     x coordinate of the path end, the last column if not given.
    --end-y=<y>                     y coordinate of the path end, the last row if not given.
    --furthest-end-point            Use the cell furthest from the start as the path end.
    --show-distances                Show the distance from the start to every cell off the path.
    --no-display                    Do not print the maze.
    --verbose                       Debug logging, unless RUST_LOG says otherwise.

The generator defaults to sidewinder.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    arg_generator: Option<String>,
    flag_list: bool,
    flag_width: usize,
    flag_height: usize,
    flag_size: Option<usize>,
    flag_seed: Option<u64>,
    flag_origin_shift_iterations: Option<usize>,
    flag_no_early_exit: bool,
    flag_solve: Option<String>,
    flag_solve_all: bool,
    flag_start_x: usize,
    flag_start_y: usize,
    flag_end_x: Option<usize>,
    flag_end_y: Option<usize>,
    flag_furthest_end_point: bool,
    flag_show_distances: bool,
    flag_no_display: bool,
    flag_verbose: bool,
}

mod errors {
    use error_chain::*;
    error_chain! {
        foreign_links {
            InvalidGrid(::mazes::errors::GridError);
            GenerationFailure(::mazes::errors::GenError);
            SolveFailure(::mazes::errors::SolveError);
            UnknownAlgorithm(::mazes::errors::ParseAlgorithmError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    let args: MazeArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    let default_filter = if args.flag_verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if args.flag_list {
        print_algorithm_names();
        return Ok(());
    }

    let (width, height) = if let Some(square_grid_size) = args.flag_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_width, args.flag_height)
    };
    let generator = generator_from_args(&args)?;
    let solvers = solvers_from_args(&args)?;

    let seed = args.flag_seed.unwrap_or_else(utils::random_seed);
    info!("{} maze {}x{} with seed {}", generator, width, height, seed);

    let mut maze_grid = Grid::new(width, height)?;
    generator.generate(&mut maze_grid, &mut utils::seeded_rng(seed))?;
    debug!("perfect maze: {}", pathing::is_perfect_maze(&maze_grid));

    let start = Cell::new(args.flag_start_x, args.flag_start_y);
    let end = end_point_from_args(&args, &maze_grid, start)?;

    if solvers.is_empty() {
        if !args.flag_no_display {
            print_maze(&maze_grid, &args, start, end)?;
        }
        return Ok(());
    }

    let distances = if args.flag_show_distances {
        Some(distances_from(&maze_grid, start)?)
    } else {
        None
    };

    for solver in solvers {
        let mut solved_grid = maze_grid.clone();
        match solver.solve(&mut solved_grid, start, end, &mut utils::seeded_rng(seed)) {
            Ok(path) => {
                println!("{}: {} steps from {} to {}", solver, path.steps(), start, end);
                if !args.flag_no_display {
                    let path_display = PathDisplay::new(&path);
                    let start_end = StartEndPointsDisplay::new(vec![start], vec![end]);
                    let mut view = GridView::new(&maze_grid)
                        .with_display(&start_end)
                        .with_display(&path_display);
                    if let Some(ref distances) = distances {
                        view = view.with_display(distances);
                    }
                    println!("{}", view);
                }
            }
            Err(e @ SolveError::InvalidCell(_)) => return Err(e.into()),
            Err(e) => {
                warn!("{} did not find a path: {}", solver, e);
                println!("{}: no path ({})", solver, e);
            }
        }
    }

    Ok(())
}

fn print_algorithm_names() {
    println!("Generators:");
    for kind in GeneratorKind::ALL.iter() {
        println!("    {}", kind);
    }
    println!("Solvers:");
    for kind in SolverKind::ALL.iter() {
        println!("    {}", kind);
    }
}

fn generator_from_args(maze_args: &MazeArgs) -> Result<GeneratorKind> {
    let name = maze_args
        .arg_generator
        .as_ref()
        .map_or("sidewinder", |s| s.as_str());
    let kind = match name.parse::<GeneratorKind>()? {
        GeneratorKind::RecursiveBacktracker { .. } => GeneratorKind::RecursiveBacktracker {
            stop_when_all_visited: !maze_args.flag_no_early_exit,
        },
        GeneratorKind::OriginShift { .. } => GeneratorKind::OriginShift {
            iterations: maze_args.flag_origin_shift_iterations,
        },
        other => other,
    };
    Ok(kind)
}

fn solvers_from_args(maze_args: &MazeArgs) -> Result<Vec<SolverKind>> {
    if maze_args.flag_solve_all {
        return Ok(SolverKind::ALL.to_vec());
    }
    let names = match maze_args.flag_solve {
        Some(ref names) => names,
        None => return Ok(vec![]),
    };

    let mut solvers = vec![];
    for name in names.split(',').filter(|name| !name.trim().is_empty()) {
        solvers.push(name.parse::<SolverKind>()?);
    }
    Ok(solvers)
}

/// The given end point, else the cell furthest from the start if asked for, else the corner
/// opposite the origin.
fn end_point_from_args(maze_args: &MazeArgs, maze_grid: &Grid, start: Cell) -> Result<Cell> {
    if maze_args.flag_furthest_end_point {
        let distances = distances_from(maze_grid, start)?;
        let furthest = distances.furthest_points_on_grid();
        return Ok(furthest.first().cloned().unwrap_or(start));
    }

    Ok(Cell::new(
        maze_args.flag_end_x.unwrap_or(maze_grid.width() - 1),
        maze_args.flag_end_y.unwrap_or(maze_grid.height() - 1),
    ))
}

fn print_maze(maze_grid: &Grid, maze_args: &MazeArgs, start: Cell, end: Cell) -> Result<()> {
    if maze_args.flag_show_distances {
        let distances = distances_from(maze_grid, start)?;
        println!("{}", GridView::new(maze_grid).with_display(&distances));
    } else {
        let start_end = StartEndPointsDisplay::new(vec![start], vec![end]);
        println!("{}", GridView::new(maze_grid).with_display(&start_end));
    }
    Ok(())
}

fn distances_from(maze_grid: &Grid, start: Cell) -> Result<Distances> {
    Distances::for_grid(maze_grid, start)
        .ok_or_else(|| Error::from(SolveError::InvalidCell(start)))
}
