/// Drawing capability shared by the game objects.
///
/// Game objects only know about cells and colours. The terminal renderer
/// provides a `Canvas`; tests provide a recording one.

use super::grid::Position;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BOARD_BACKGROUND: Rgb = Rgb(0, 0, 0);
pub const CELL_BORDER: Rgb = Rgb(93, 216, 228);
pub const SNAKE_COLOR: Rgb = Rgb(0, 255, 0);
pub const APPLE_COLOR: Rgb = Rgb(255, 0, 0);

pub trait Canvas {
    /// Paint a filled square at `pos` with a contrasting border.
    fn fill_cell(&mut self, pos: Position, fill: Rgb, border: Rgb);

    /// Paint `pos` back to the board background.
    fn erase_cell(&mut self, pos: Position);
}

pub trait Drawable {
    fn draw(&self, canvas: &mut dyn Canvas);
}
