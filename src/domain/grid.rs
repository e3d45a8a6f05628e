/// Board geometry: fixed surface size, cell size, and wrapping positions.
///
/// Positions live in surface coordinates ("pixels"), always a multiple of
/// `CELL_SIZE`. Moving off one edge re-enters from the opposite edge.

pub const SURFACE_WIDTH: i32 = 640;
pub const SURFACE_HEIGHT: i32 = 480;
pub const CELL_SIZE: i32 = 20;

/// Board size in cells.
pub const GRID_WIDTH: i32 = SURFACE_WIDTH / CELL_SIZE;
pub const GRID_HEIGHT: i32 = SURFACE_HEIGHT / CELL_SIZE;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Position of the cell at grid column `col`, row `row`.
    pub const fn from_cell(col: i32, row: i32) -> Self {
        Position { x: col * CELL_SIZE, y: row * CELL_SIZE }
    }

    /// Centre of the surface. Where every snake starts.
    pub const fn center() -> Self {
        Position { x: SURFACE_WIDTH / 2, y: SURFACE_HEIGHT / 2 }
    }

    /// Grid column / row of this position.
    pub fn cell(self) -> (i32, i32) {
        (self.x / CELL_SIZE, self.y / CELL_SIZE)
    }

    /// One cell step in `dir`, wrapping both axes around the surface.
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Position {
            x: (self.x + dx * CELL_SIZE).rem_euclid(SURFACE_WIDTH),
            y: (self.y + dy * CELL_SIZE).rem_euclid(SURFACE_HEIGHT),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    #[allow(dead_code)]
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Unit vector; y grows downward.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}
