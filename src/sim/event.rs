/// Events emitted during a simulation step.
/// The loop turns these into sound effects and log lines.

use crate::domain::grid::Position;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    AppleEaten { at: Position, length: usize, speed: u32 },
    SnakeCrashed { at: Position, length: usize },
}
