/// Keyboard input.
///
/// Every frame the pending terminal events are drained and decoded into
/// `Command`s, in arrival order. Only key-down events count; releases are
/// dropped, and auto-repeat only ever steers (a held Space must not flicker
/// the pause state).

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::grid::Direction;
use crate::sim::world::Command;

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Char(' '), KeyCode::Char('p'), KeyCode::Char('P')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('x'), KeyCode::Char('X')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

pub struct InputState {
    /// Commands decoded during the most recent `drain_events()`.
    pub commands: Vec<Command>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { commands: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events without blocking.
    /// Call once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.commands.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if let Some(cmd) = map_key(key) {
                        self.commands.push(cmd);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("terminal event read failed: {e}");
                    break;
                }
            }
        }
    }
}

/// Decode one key event. Unbound keys map to `None`.
pub fn map_key(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return Some(Command::Quit);
    }

    let steer = if KEYS_UP.contains(&key.code) {
        Some(Direction::Up)
    } else if KEYS_DOWN.contains(&key.code) {
        Some(Direction::Down)
    } else if KEYS_LEFT.contains(&key.code) {
        Some(Direction::Left)
    } else if KEYS_RIGHT.contains(&key.code) {
        Some(Direction::Right)
    } else {
        None
    };
    if let Some(dir) = steer {
        return Some(Command::Steer(dir));
    }

    if key.kind == KeyEventKind::Repeat {
        return None;
    }

    if KEYS_PAUSE.contains(&key.code) {
        Some(Command::TogglePause)
    } else if KEYS_RESTART.contains(&key.code) {
        Some(Command::Restart)
    } else if KEYS_QUIT.contains(&key.code) {
        Some(Command::Quit)
    } else {
        None
    }
}
