/// The snake: body cells, heading, speed, and the pause / game-over flags.
///
/// A tick is split into small steps so the loop can check collision
/// between computing the next head and committing it:
///   1. `next_head()`: apply buffered turn, compute wrapped head
///   2. `check_collision()`: flag game over if the head hits the body
///   3. `push_head()`: commit the new head
///   4. `trim_tail()`: drop the tail unless the snake is growing

use super::draw::{Canvas, Drawable, CELL_BORDER, SNAKE_COLOR};
use super::grid::{Direction, Position};

pub const INITIAL_SPEED: u32 = 20;
pub const MAX_SPEED: u32 = 100;

#[derive(Clone, Debug)]
pub struct Snake {
    /// Body cells, head first. Never empty.
    pub body: Vec<Position>,
    /// Length the body converges to.
    pub length: usize,
    pub direction: Direction,
    /// Turn requested since the last tick; applied by `next_head()`.
    pub pending: Option<Direction>,
    /// Ticks per second.
    pub speed: u32,
    pub paused: bool,
    pub game_over: bool,
    /// Tail cell removed on the most recent tick (erased when drawing).
    pub last: Option<Position>,

    initial_speed: u32,
    max_speed: u32,
}

impl Snake {
    pub fn new() -> Self {
        Snake::with_speeds(INITIAL_SPEED, MAX_SPEED)
    }

    pub fn with_speeds(initial_speed: u32, max_speed: u32) -> Self {
        Snake {
            body: vec![Position::center()],
            length: 1,
            direction: Direction::Right,
            pending: None,
            speed: initial_speed,
            paused: false,
            game_over: false,
            last: None,
            initial_speed,
            max_speed,
        }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Buffer a turn for the next tick. A direct reversal of the current
    /// heading is ignored. Returns whether the turn was accepted.
    pub fn steer(&mut self, dir: Direction) -> bool {
        if dir == self.direction.opposite() {
            return false;
        }
        self.pending = Some(dir);
        true
    }

    /// Apply the buffered turn and compute where the head goes next.
    pub fn next_head(&mut self) -> Position {
        if let Some(dir) = self.pending.take() {
            self.direction = dir;
        }
        self.head().step(self.direction)
    }

    /// Flag game over if `next` lands on the body. The head and the cell
    /// right behind it are skipped: the second cell is vacated on this very
    /// tick, and the head cannot be reached in one step.
    pub fn check_collision(&mut self, next: Position) {
        if self.body.iter().skip(2).any(|&p| p == next) {
            self.game_over = true;
        }
    }

    pub fn push_head(&mut self, next: Position) {
        self.body.insert(0, next);
    }

    /// Drop the tail cell if the body is longer than `length`.
    pub fn trim_tail(&mut self) {
        if self.body.len() > self.length {
            self.last = self.body.pop();
        }
    }

    /// Grow by one and speed up, capped at the maximum speed.
    pub fn eat(&mut self) {
        self.length += 1;
        if self.speed < self.max_speed {
            self.speed += 1;
        }
    }

    /// Back to a single cell at the centre, heading right, initial speed.
    /// Flags are left to the caller.
    pub fn reset(&mut self) {
        self.body.clear();
        self.body.push(Position::center());
        self.length = 1;
        self.speed = self.initial_speed;
        self.direction = Direction::Right;
        self.pending = None;
        self.last = None;
    }
}

impl Default for Snake {
    fn default() -> Self {
        Snake::new()
    }
}

impl Drawable for Snake {
    fn draw(&self, canvas: &mut dyn Canvas) {
        for &pos in &self.body {
            canvas.fill_cell(pos, SNAKE_COLOR, CELL_BORDER);
        }
        if let Some(last) = self.last {
            if !self.body.contains(&last) {
                canvas.erase_cell(last);
            }
        }
    }
}
