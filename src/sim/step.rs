/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Next head (buffered turn applied, position wrapped)
///   2. Self-collision check against the pre-move body
///   3. Commit head
///   4. Apple check: grow, speed up, re-place apple
///   5. Trim tail (a no-op right after growth)
///
/// A crash still commits the move, so the final frame shows the head
/// inside the body.

use rand::Rng;

use super::event::GameEvent;
use super::world::{Phase, WorldState};

pub fn step<R: Rng + ?Sized>(world: &mut WorldState, rng: &mut R) -> Vec<GameEvent> {
    if world.phase() != Phase::Running {
        return vec![];
    }

    let mut events = Vec::new();
    world.tick += 1;

    let snake = &mut world.snake;
    let next = snake.next_head();
    snake.check_collision(next);
    snake.push_head(next);

    let ate = next == world.apple.position;
    if ate {
        snake.eat();
    }
    snake.trim_tail();

    if ate {
        world.apple.place_randomly(&snake.body, rng);
        events.push(GameEvent::AppleEaten {
            at: next,
            length: snake.len(),
            speed: snake.speed,
        });
    }
    if snake.game_over {
        events.push(GameEvent::SnakeCrashed { at: next, length: snake.len() });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeedConfig;
    use crate::domain::grid::{Direction, Position};
    use crate::domain::snake::{INITIAL_SPEED, MAX_SPEED};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world(seed: u64) -> (WorldState, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let w = WorldState::new(&SpeedConfig::default(), &mut rng);
        (w, rng)
    }

    /// Put the apple where the head lands next tick.
    fn bait(w: &mut WorldState) {
        let dir = w.snake.pending.unwrap_or(w.snake.direction);
        w.apple.position = w.snake.head().step(dir);
    }

    #[test]
    fn single_eat_from_start() {
        let (mut w, mut rng) = world(1);
        bait(&mut w);
        let events = step(&mut w, &mut rng);

        let head = Position::center().step(Direction::Right);
        assert_eq!(w.snake.body, vec![head, Position::center()]);
        assert_eq!(w.snake.length, 2);
        assert_eq!(w.snake.speed, INITIAL_SPEED + 1);
        assert_eq!(w.snake.last, None);
        assert_eq!(
            events,
            vec![GameEvent::AppleEaten { at: head, length: 2, speed: INITIAL_SPEED + 1 }]
        );
        assert!(!w.snake.body.contains(&w.apple.position));

        // Without an apple the next tick moves at constant length.
        w.apple.position = Position::from_cell(0, 0);
        step(&mut w, &mut rng);
        assert_eq!(w.snake.len(), 2);
        assert_eq!(w.snake.last, Some(Position::center()));
    }

    #[test]
    fn n_eats_grow_length_and_cap_speed() {
        for n in [1usize, 5, 30] {
            let (mut w, mut rng) = world(2);
            for i in 0..n {
                bait(&mut w);
                step(&mut w, &mut rng);
                assert_eq!(w.phase(), Phase::Running);
                // Turn down every row so a long snake never bites itself.
                if i % 20 == 19 {
                    w.snake.steer(Direction::Down);
                    w.apple.position = Position::new(-1, -1);
                    step(&mut w, &mut rng);
                    w.snake.steer(Direction::Right);
                }
            }
            assert_eq!(w.snake.len(), n + 1);
            assert_eq!(w.snake.speed, (INITIAL_SPEED + n as u32).min(MAX_SPEED));
        }
    }

    #[test]
    fn speed_stops_at_cap() {
        let mut rng = StdRng::seed_from_u64(9);
        let speed = SpeedConfig { initial: 98, max: 100 };
        let mut w = WorldState::new(&speed, &mut rng);
        for _ in 0..5 {
            bait(&mut w);
            step(&mut w, &mut rng);
        }
        assert_eq!(w.snake.len(), 6);
        assert_eq!(w.snake.speed, 100);
    }

    #[test]
    fn apple_never_spawns_on_snake() {
        let (mut w, mut rng) = world(3);
        for _ in 0..200 {
            bait(&mut w);
            let events = step(&mut w, &mut rng);
            if w.phase() == Phase::GameOver {
                break;
            }
            if events.iter().any(|e| matches!(e, GameEvent::AppleEaten { .. })) {
                assert!(!w.snake.body.contains(&w.apple.position));
            }
            // Staircase path so the body spreads over the board.
            if w.tick % 7 == 0 {
                let turn = match w.snake.direction {
                    Direction::Right | Direction::Left => Direction::Down,
                    Direction::Up | Direction::Down => Direction::Right,
                };
                w.snake.steer(turn);
            }
        }
    }

    #[test]
    fn paused_world_does_not_move() {
        let (mut w, mut rng) = world(4);
        w.snake.paused = true;
        let before = w.snake.body.clone();
        for _ in 0..5 {
            assert!(step(&mut w, &mut rng).is_empty());
        }
        assert_eq!(w.snake.body, before);
        assert_eq!(w.tick, 0);
        assert!(w.caption().starts_with("Paused!"));
    }

    #[test]
    fn crash_reports_and_freezes() {
        let (mut w, mut rng) = world(5);
        w.snake.body = [(5, 5), (5, 6), (4, 6), (4, 5), (4, 4)]
            .iter()
            .map(|&(c, r)| Position::from_cell(c, r))
            .collect();
        w.snake.length = 5;
        w.snake.direction = Direction::Up;
        w.apple.position = Position::from_cell(20, 20);
        w.snake.steer(Direction::Left);

        let events = step(&mut w, &mut rng);
        assert_eq!(
            events,
            vec![GameEvent::SnakeCrashed { at: Position::from_cell(4, 5), length: 5 }]
        );
        assert_eq!(w.phase(), Phase::GameOver);

        let frozen = w.snake.body.clone();
        assert!(step(&mut w, &mut rng).is_empty());
        assert_eq!(w.snake.body, frozen);
    }

    #[test]
    fn vacating_tail_still_counts_as_collision() {
        // Ring of four: the next head is the cell the tail is about to leave.
        let (mut w, mut rng) = world(6);
        w.snake.body = [(5, 5), (5, 6), (4, 6), (4, 5)]
            .iter()
            .map(|&(c, r)| Position::from_cell(c, r))
            .collect();
        w.snake.length = 4;
        w.snake.direction = Direction::Up;
        w.apple.position = Position::from_cell(20, 20);
        w.snake.steer(Direction::Left);
        step(&mut w, &mut rng);
        // (4,5) is index 3 of the pre-move body, so this is a crash.
        assert_eq!(w.phase(), Phase::GameOver);
    }
}
