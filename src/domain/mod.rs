pub mod apple;
pub mod draw;
pub mod grid;
pub mod snake;
