/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Game objects paint themselves through the `Canvas` trait; `BoardView`
/// maps board positions onto the frame buffer. The terminal title carries
/// the caption and is only rewritten when it changes.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, SetTitle},
};

use crate::domain::draw::{Canvas, Drawable, Rgb, BOARD_BACKGROUND};
use crate::domain::grid::{Position, GRID_HEIGHT, GRID_WIDTH};
use crate::sim::world::{Phase, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit background for everything outside the board, so the
    /// terminal's own default never shows through.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer.
    /// Different from any real cell, so every position will be diff'd.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

fn color(c: Rgb) -> Color {
    Color::Rgb { r: c.0, g: c.1, b: c.2 }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column; clipped at the edge.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    /// Fill a whole row with `bg`, then write `s` from the left.
    fn put_bar(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', fg, bg));
        }
        self.put_str(0, y, s, fg, bg);
    }
}

// ── BoardView: Canvas over the frame buffer ──

/// Each board cell is two terminal columns wide so squares look square.
const CELL_W: usize = 2;

/// Board size in terminal columns / rows.
const BOARD_COLS: usize = GRID_WIDTH as usize * CELL_W;
const BOARD_ROWS: usize = GRID_HEIGHT as usize;

/// Vertical layout
const HUD_ROW: usize = 0;
const MAP_ROW: usize = 2;
const MSG_ROW: usize = MAP_ROW + BOARD_ROWS + 1;
const HELP_ROW: usize = MSG_ROW + 1;

/// Smallest terminal that shows the whole board plus HUD and help.
pub const MIN_TERM_W: usize = BOARD_COLS;
pub const MIN_TERM_H: usize = HELP_ROW + 1;

struct BoardView<'a> {
    buf: &'a mut FrameBuffer,
    left: usize,
    top: usize,
}

impl BoardView<'_> {
    fn origin(&self, pos: Position) -> Option<(usize, usize)> {
        let (col, row) = pos.cell();
        if !(0..GRID_WIDTH).contains(&col) || !(0..GRID_HEIGHT).contains(&row) {
            return None;
        }
        Some((self.left + col as usize * CELL_W, self.top + row as usize))
    }

    /// Paint the empty board.
    fn clear(&mut self) {
        let bg = color(BOARD_BACKGROUND);
        for row in 0..BOARD_ROWS {
            for col in 0..BOARD_COLS {
                self.buf.set(self.left + col, self.top + row, Cell::new(' ', Color::White, bg));
            }
        }
    }
}

impl Canvas for BoardView<'_> {
    fn fill_cell(&mut self, pos: Position, fill: Rgb, border: Rgb) {
        if let Some((x, y)) = self.origin(pos) {
            let (fg, bg) = (color(border), color(fill));
            self.buf.set(x, y, Cell::new('[', fg, bg));
            self.buf.set(x + 1, y, Cell::new(']', fg, bg));
        }
    }

    fn erase_cell(&mut self, pos: Position) {
        if let Some((x, y)) = self.origin(pos) {
            let bg = color(BOARD_BACKGROUND);
            self.buf.set(x, y, Cell::new(' ', Color::White, bg));
            self.buf.set(x + 1, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_title: Option<String>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_title: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);
        if self.term_w < MIN_TERM_W || self.term_h < MIN_TERM_H {
            log::warn!(
                "terminal is {}x{}, board needs {}x{}; output will be clipped",
                self.term_w, self.term_h, MIN_TERM_W, MIN_TERM_H
            );
        }
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        // Detect terminal resize
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        let caption = world.caption();
        if self.last_title.as_deref() != Some(caption.as_str()) {
            queue!(self.writer, SetTitle(&caption))?;
            self.last_title = Some(caption);
        }

        self.compose(world);
        self.flush_diff()?;

        // Swap: current front becomes next back
        std::mem::swap(&mut self.front, &mut self.back);

        Ok(())
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        // Force full repaint: back ≠ front for every cell.
        self.back.cells.fill(Cell::INVALID);
    }

    // ── Compose: build front buffer content ──

    fn compose(&mut self, w: &WorldState) {
        self.front.clear();

        // HUD mirrors the title, for terminals that hide it.
        let hud_bg = Color::Rgb { r: 20, g: 20, b: 60 };
        let hud = format!(" {} ", w.caption());
        self.front.put_bar(HUD_ROW, &hud, Color::White, hud_bg);

        let left = self.front.width.saturating_sub(BOARD_COLS) / 2;
        let mut board = BoardView { buf: &mut self.front, left, top: MAP_ROW };
        board.clear();
        w.snake.draw(&mut board);
        w.apple.draw(&mut board);

        match w.phase() {
            Phase::Running => {}
            Phase::Paused => {
                let bar_bg = Color::Rgb { r: 200, g: 180, b: 50 };
                self.front.put_bar(MSG_ROW, " ◈ PAUSED  [Space] Resume ", Color::Black, bar_bg);
            }
            Phase::GameOver => {
                let bar_bg = Color::Rgb { r: 170, g: 30, b: 30 };
                let msg = format!(" ✖ GAME OVER  length {}  [X] Restart  [Esc] Quit ", w.snake.len());
                self.front.put_bar(MSG_ROW, &msg, Color::White, bar_bg);
            }
        }

        let help = " ←↑↓→/WASD:Steer  Space:Pause  X:Restart  Esc/Q:Quit";
        self.front.put_str(0, HELP_ROW, help, Color::DarkGrey, Cell::BASE_BG);
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeedConfig;
    use crate::domain::draw::{APPLE_COLOR, SNAKE_COLOR};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn composed(world: &WorldState) -> Renderer {
        let mut r = Renderer::new();
        r.resize(MIN_TERM_W, MIN_TERM_H);
        r.compose(world);
        r
    }

    fn world() -> WorldState {
        let mut rng = StdRng::seed_from_u64(8);
        WorldState::new(&SpeedConfig::default(), &mut rng)
    }

    fn screen_xy(pos: Position) -> (usize, usize) {
        let (col, row) = pos.cell();
        (col as usize * CELL_W, MAP_ROW + row as usize)
    }

    fn row_text(r: &Renderer, y: usize) -> String {
        (0..r.front.width).map(|x| r.front.get(x, y).ch).collect()
    }

    #[test]
    fn snake_and_apple_are_bordered_squares() {
        let w = world();
        let r = composed(&w);

        let (x, y) = screen_xy(w.snake.head());
        assert_eq!(r.front.get(x, y).ch, '[');
        assert_eq!(r.front.get(x + 1, y).ch, ']');
        assert_eq!(r.front.get(x, y).bg, color(SNAKE_COLOR));

        let (x, y) = screen_xy(w.apple.position);
        assert_eq!(r.front.get(x, y).bg, color(APPLE_COLOR));
    }

    #[test]
    fn empty_board_cells_use_board_background() {
        let mut w = world();
        w.apple.position = Position::from_cell(0, 0);
        let r = composed(&w);
        let (x, y) = screen_xy(Position::from_cell(GRID_WIDTH - 1, GRID_HEIGHT - 1));
        assert_eq!(r.front.get(x, y), Cell::new(' ', Color::White, color(BOARD_BACKGROUND)));
    }

    #[test]
    fn hud_shows_caption() {
        let w = world();
        let r = composed(&w);
        assert!(row_text(&r, HUD_ROW).contains("Snake | Speed: 20 | Length: 1"));
    }

    #[test]
    fn paused_and_game_over_bars() {
        let mut w = world();
        w.snake.paused = true;
        let r = composed(&w);
        assert!(row_text(&r, MSG_ROW).contains("PAUSED"));
        assert!(row_text(&r, HUD_ROW).contains("Paused!"));

        w.snake.paused = false;
        w.snake.game_over = true;
        let r = composed(&w);
        assert!(row_text(&r, MSG_ROW).contains("GAME OVER"));
        assert!(row_text(&r, HUD_ROW).contains("Press: x"));
    }

    #[test]
    fn off_board_positions_are_clipped() {
        let mut buf = FrameBuffer::new(MIN_TERM_W, MIN_TERM_H);
        let mut view = BoardView { buf: &mut buf, left: 0, top: MAP_ROW };
        view.fill_cell(Position::new(-20, 0), SNAKE_COLOR, SNAKE_COLOR);
        view.fill_cell(Position::from_cell(GRID_WIDTH, 0), SNAKE_COLOR, SNAKE_COLOR);
        assert!(buf.cells.iter().all(|c| *c == Cell::BLANK));
    }

    #[test]
    fn small_terminal_does_not_panic() {
        let w = world();
        let mut r = Renderer::new();
        r.resize(10, 3);
        r.compose(&w);
        assert_eq!(r.front.cells.len(), 30);
    }
}
