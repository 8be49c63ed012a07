use rand::Rng;
use smallvec::SmallVec;
use std::fmt;

/// A logical maze cell. `x` is the column, `y` the row.
///
/// The derived ordering is lexicographic on `(x, y)`, which the priority queue searches use to
/// break ties between equally costed cells.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub fn new(x: usize, y: usize) -> Cell {
        Cell { x, y }
    }

    /// The buffer position of this cell's centre, `(2y + 1, 2x + 1)`.
    #[inline]
    pub fn buffer_position(&self) -> BufferPosition {
        BufferPosition::new(2 * self.y + 1, 2 * self.x + 1)
    }

    /// The logical cell whose centre sits at `pos`, if `pos` is a cell centre at all.
    /// Wall and corner positions have at least one even coordinate and map to `None`.
    pub fn from_buffer_position(pos: BufferPosition) -> Option<Cell> {
        if pos.row % 2 == 1 && pos.col % 2 == 1 {
            Some(Cell::new(pos.col / 2, pos.row / 2))
        } else {
            None
        }
    }

    /// Creates a new `Cell` offset one step away in the given direction.
    /// Returns None if the offset would underflow; the upper grid bound is not checked here.
    #[inline]
    pub fn offset(&self, direction: CompassPrimary) -> Option<Cell> {
        let (x, y) = (self.x, self.y);
        match direction {
            CompassPrimary::North => y.checked_sub(1).map(|y| Cell::new(x, y)),
            CompassPrimary::South => Some(Cell::new(x, y + 1)),
            CompassPrimary::East => Some(Cell::new(x + 1, y)),
            CompassPrimary::West => x.checked_sub(1).map(|x| Cell::new(x, y)),
        }
    }

    /// The direction to step from `self` to reach the adjacent cell `other`.
    pub fn direction_to(&self, other: Cell) -> Option<CompassPrimary> {
        CompassPrimary::ALL
            .iter()
            .cloned()
            .find(|dir| self.offset(*dir) == Some(other))
    }

    #[inline]
    pub fn is_adjacent(&self, other: Cell) -> bool {
        self.manhattan_distance(other) == 1
    }

    #[inline]
    pub fn manhattan_distance(&self, other: Cell) -> usize {
        abs_diff(self.x, other.x) + abs_diff(self.y, other.y)
    }

    /// Euclidean distance without the square root.
    #[inline]
    pub fn squared_distance(&self, other: Cell) -> usize {
        let dx = abs_diff(self.x, other.x);
        let dy = abs_diff(self.y, other.y);
        dx * dx + dy * dy
    }
}

impl From<(usize, usize)> for Cell {
    fn from(x_y_pair: (usize, usize)) -> Cell {
        Cell::new(x_y_pair.0, x_y_pair.1)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[inline]
fn abs_diff(a: usize, b: usize) -> usize {
    if a > b {
        a - b
    } else {
        b - a
    }
}

/// A `(row, col)` coordinate into the wall/passage buffer.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct BufferPosition {
    pub row: usize,
    pub col: usize,
}

impl BufferPosition {
    pub fn new(row: usize, col: usize) -> BufferPosition {
        BufferPosition { row, col }
    }

    /// The wall/passage position separating two adjacent cells.
    #[inline]
    pub fn between(a: Cell, b: Cell) -> BufferPosition {
        debug_assert!(a.is_adjacent(b), "{} and {} are not adjacent", a, b);
        BufferPosition::new(a.y + b.y + 1, a.x + b.x + 1)
    }
}

impl From<(usize, usize)> for BufferPosition {
    fn from(row_col_pair: (usize, usize)) -> BufferPosition {
        BufferPosition::new(row_col_pair.0, row_col_pair.1)
    }
}

/// A transient wall entry between two adjacent cells, as collected by the wall list based
/// generators before any passages exist.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub struct Wall {
    pub from: Cell,
    pub to: Cell,
}

impl Wall {
    pub fn new(from: Cell, to: Cell) -> Wall {
        Wall { from, to }
    }
}

pub type CellSmallVec = SmallVec<[Cell; 4]>;
pub type DirectionSmallVec = SmallVec<[CompassPrimary; 4]>;

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    pub const ALL: [CompassPrimary; 4] = [
        CompassPrimary::North,
        CompassPrimary::South,
        CompassPrimary::East,
        CompassPrimary::West,
    ];

    /// Neighbour enumeration order of the searches: +y, +x, -y, -x.
    pub const SEARCH_ORDER: [CompassPrimary; 4] = [
        CompassPrimary::South,
        CompassPrimary::East,
        CompassPrimary::North,
        CompassPrimary::West,
    ];

    /// Clockwise ring starting east, the facing order of the wall followers.
    pub const CLOCKWISE: [CompassPrimary; 4] = [
        CompassPrimary::East,
        CompassPrimary::South,
        CompassPrimary::West,
        CompassPrimary::North,
    ];

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    /// Index of this direction within `CLOCKWISE`.
    pub fn clockwise_index(self) -> usize {
        match self {
            CompassPrimary::East => 0,
            CompassPrimary::South => 1,
            CompassPrimary::West => 2,
            CompassPrimary::North => 3,
        }
    }

    /// The direction reached by turning clockwise `quarter_turns` times.
    pub fn turned_clockwise(self, quarter_turns: usize) -> CompassPrimary {
        CompassPrimary::CLOCKWISE[(self.clockwise_index() + quarter_turns) % 4]
    }

    pub fn rand_direction<R: Rng + ?Sized>(rng: &mut R) -> CompassPrimary {
        CompassPrimary::ALL[rng.gen_range(0..CompassPrimary::ALL.len())]
    }
}
