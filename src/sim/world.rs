/// WorldState: everything a running game needs, independent of the terminal.
///
/// The phase is not stored. It is derived from the snake's flags so the
/// two can never disagree; game over wins over pause.

use rand::Rng;

use crate::config::SpeedConfig;
use crate::domain::apple::Apple;
use crate::domain::grid::Direction;
use crate::domain::snake::Snake;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Running,
    Paused,
    GameOver,
}

/// A player intent, already decoded from keyboard or gamepad.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Steer(Direction),
    TogglePause,
    Restart,
    Quit,
}

pub struct WorldState {
    pub snake: Snake,
    pub apple: Apple,
    /// Simulation ticks since start (not reset on restart).
    pub tick: u64,
}

impl WorldState {
    pub fn new<R: Rng + ?Sized>(speed: &SpeedConfig, rng: &mut R) -> Self {
        let snake = Snake::with_speeds(speed.initial, speed.max);
        let apple = Apple::new(&snake.body, rng);
        WorldState { snake, apple, tick: 0 }
    }

    pub fn phase(&self) -> Phase {
        if self.snake.game_over {
            Phase::GameOver
        } else if self.snake.paused {
            Phase::Paused
        } else {
            Phase::Running
        }
    }

    /// Window caption for the current phase.
    pub fn caption(&self) -> String {
        let speed = self.snake.speed;
        let length = self.snake.len();
        match self.phase() {
            Phase::Running => format!("Snake | Speed: {speed} | Length: {length}"),
            Phase::Paused => format!("Paused! | Speed: {speed} | Length: {length}"),
            Phase::GameOver => {
                format!("Game over! | Speed: {speed} | Length: {length} | Press: x")
            }
        }
    }

    /// Apply one command. Returns false when the game should quit.
    pub fn apply<R: Rng + ?Sized>(&mut self, cmd: Command, rng: &mut R) -> bool {
        match cmd {
            Command::Quit => return false,
            Command::Steer(dir) => {
                if self.phase() != Phase::GameOver {
                    self.snake.steer(dir);
                }
            }
            Command::TogglePause => {
                if self.phase() != Phase::GameOver {
                    self.snake.paused = !self.snake.paused;
                    log::debug!("pause toggled: {}", self.snake.paused);
                }
            }
            Command::Restart => {
                if self.phase() == Phase::GameOver {
                    self.restart(rng);
                }
            }
        }
        true
    }

    /// Clear game over and put the snake back at the start.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.snake.reset();
        self.snake.game_over = false;
        self.snake.paused = false;
        if self.snake.body.contains(&self.apple.position) {
            self.apple.place_randomly(&self.snake.body, rng);
        }
        log::info!("restarted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::Position;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world() -> (WorldState, StdRng) {
        let mut rng = StdRng::seed_from_u64(11);
        let w = WorldState::new(&SpeedConfig::default(), &mut rng);
        (w, rng)
    }

    #[test]
    fn new_world_is_running_with_apple_off_snake() {
        let (w, _) = world();
        assert_eq!(w.phase(), Phase::Running);
        assert!(!w.snake.body.contains(&w.apple.position));
    }

    #[test]
    fn captions_follow_phase() {
        let (mut w, _) = world();
        assert_eq!(w.caption(), "Snake | Speed: 20 | Length: 1");
        w.snake.paused = true;
        assert_eq!(w.caption(), "Paused! | Speed: 20 | Length: 1");
        w.snake.game_over = true;
        assert_eq!(w.caption(), "Game over! | Speed: 20 | Length: 1 | Press: x");
    }

    #[test]
    fn pause_toggles_both_ways() {
        let (mut w, mut rng) = world();
        assert!(w.apply(Command::TogglePause, &mut rng));
        assert_eq!(w.phase(), Phase::Paused);
        assert!(w.apply(Command::TogglePause, &mut rng));
        assert_eq!(w.phase(), Phase::Running);
    }

    #[test]
    fn pause_is_ignored_after_game_over() {
        let (mut w, mut rng) = world();
        w.snake.game_over = true;
        w.apply(Command::TogglePause, &mut rng);
        assert!(!w.snake.paused);
        assert_eq!(w.phase(), Phase::GameOver);
    }

    #[test]
    fn restart_only_from_game_over() {
        let (mut w, mut rng) = world();
        w.snake.length = 4;
        w.apply(Command::Restart, &mut rng);
        assert_eq!(w.snake.length, 4);

        w.snake.game_over = true;
        w.snake.speed = 33;
        w.apply(Command::Restart, &mut rng);
        assert_eq!(w.phase(), Phase::Running);
        assert_eq!(w.snake.length, 1);
        assert_eq!(w.snake.speed, 20);
        assert_eq!(w.snake.body, vec![Position::center()]);
    }

    #[test]
    fn restart_moves_apple_off_start_cell() {
        let (mut w, mut rng) = world();
        w.apple.position = Position::center();
        w.snake.game_over = true;
        w.apply(Command::Restart, &mut rng);
        assert_ne!(w.apple.position, Position::center());
    }

    #[test]
    fn steering_rejects_reversal() {
        let (mut w, mut rng) = world();
        w.apply(Command::Steer(Direction::Left), &mut rng);
        assert_eq!(w.snake.pending, None);
        w.apply(Command::Steer(Direction::Down), &mut rng);
        assert_eq!(w.snake.pending, Some(Direction::Down));
    }

    #[test]
    fn quit_stops_the_loop() {
        let (mut w, mut rng) = world();
        assert!(!w.apply(Command::Quit, &mut rng));
    }
}
