/// The apple: one cell, re-placed at random whenever it is eaten.

use rand::Rng;

use super::draw::{Canvas, Drawable, APPLE_COLOR, CELL_BORDER};
use super::grid::{Position, GRID_HEIGHT, GRID_WIDTH};

#[derive(Clone, Debug)]
pub struct Apple {
    pub position: Position,
}

impl Apple {
    /// Create an apple on a random cell outside `occupied`.
    pub fn new<R: Rng + ?Sized>(occupied: &[Position], rng: &mut R) -> Self {
        let mut apple = Apple { position: Position::new(0, 0) };
        apple.place_randomly(occupied, rng);
        apple
    }

    /// Move to a uniformly random cell not in `occupied`, by resampling.
    ///
    /// Returns false and stays put when every cell is occupied.
    pub fn place_randomly<R: Rng + ?Sized>(&mut self, occupied: &[Position], rng: &mut R) -> bool {
        if board_full(occupied) {
            return false;
        }
        loop {
            let col = rng.gen_range(0..GRID_WIDTH);
            let row = rng.gen_range(0..GRID_HEIGHT);
            let candidate = Position::from_cell(col, row);
            if !occupied.contains(&candidate) {
                self.position = candidate;
                return true;
            }
        }
    }
}

/// True if `occupied` covers every cell. Duplicates are counted once.
fn board_full(occupied: &[Position]) -> bool {
    let total = (GRID_WIDTH * GRID_HEIGHT) as usize;
    if occupied.len() < total {
        return false;
    }
    let mut seen = vec![false; total];
    let mut distinct = 0;
    for p in occupied {
        let (col, row) = p.cell();
        if !(0..GRID_WIDTH).contains(&col) || !(0..GRID_HEIGHT).contains(&row) {
            continue;
        }
        let idx = (row * GRID_WIDTH + col) as usize;
        if !seen[idx] {
            seen[idx] = true;
            distinct += 1;
        }
    }
    distinct == total
}

impl Drawable for Apple {
    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.fill_cell(self.position, APPLE_COLOR, CELL_BORDER);
    }
}
