/// Gamepad input using gilrs.
///
/// Button mapping for pause / restart / quit is loaded from config.toml via
/// `load_button_config()`. Default mapping:
///   D-pad / Left Stick    →  Steer
///   Start                 →  Pause
///   A                     →  Restart (after game over)
///   Select                →  Quit
///
/// Everything is edge-triggered: a held direction steers once.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::grid::Direction;
use crate::sim::world::Command;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Logical button identifiers for mappable actions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    Start,
    Select,
}

const BTN_COUNT: usize = 8;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East  => Some(Btn::B),
            Button::West  => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start  => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
struct ActionMap {
    pause: Vec<Btn>,
    restart: Vec<Btn>,
    quit: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            pause: vec![Btn::Start],
            restart: vec![Btn::A],
            quit: vec![Btn::Select],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Buttons pressed since the last `update()`.
    pressed: [bool; BTN_COUNT],
    /// Directions that became active since the last `update()`, in order.
    steer: Vec<Direction>,

    // Stick, quantised to one direction (or none)
    stick_x: f32,
    stick_y: f32,
    stick_dir: Option<Direction>,

    action_map: ActionMap,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                if g.gamepads().next().is_some() {
                    log::info!("gamepad connected");
                }
                Some(g)
            }
            Err(e) => {
                log::warn!("gamepad support unavailable: {e}");
                None
            }
        };

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs,
            pressed: [false; BTN_COUNT],
            steer: Vec::new(),
            stick_x: 0.0,
            stick_y: 0.0,
            stick_dir: None,
            action_map: ActionMap::default(),
        }
    }

    /// Load button mapping from config. Unknown names are skipped; an
    /// action whose list ends up empty keeps its default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let map = &mut self.action_map;
        let pause = parse_list(&cfg.pause);
        if !pause.is_empty() { map.pause = pause; }
        let restart = parse_list(&cfg.restart);
        if !restart.is_empty() { map.restart = restart; }
        let quit = parse_list(&cfg.quit);
        if !quit.is_empty() { map.quit = quit; }
    }

    pub fn update(&mut self) {
        self.pressed = [false; BTN_COUNT];
        self.steer.clear();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    /// Append this frame's commands to `out`: steering first, then
    /// quit, pause, restart.
    pub fn collect_commands(&self, out: &mut Vec<Command>) {
        out.extend(self.steer.iter().map(|&d| Command::Steer(d)));
        if self.any_pressed(&self.action_map.quit) {
            out.push(Command::Quit);
        }
        if self.any_pressed(&self.action_map.pause) {
            out.push(Command::TogglePause);
        }
        if self.any_pressed(&self.action_map.restart) {
            out.push(Command::Restart);
        }
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => self.press_button(btn),
                EventType::AxisChanged(axis, value, _) => match axis {
                    Axis::LeftStickX => self.stick_x = value,
                    Axis::LeftStickY => self.stick_y = value,
                    _ => {}
                },
                EventType::Connected => log::info!("gamepad connected"),
                EventType::Disconnected => {
                    log::info!("gamepad disconnected");
                    self.stick_x = 0.0;
                    self.stick_y = 0.0;
                }
                _ => {}
            }
        }

        let dir = stick_direction(self.stick_x, self.stick_y);
        if dir != self.stick_dir {
            if let Some(d) = dir {
                self.steer.push(d);
            }
            self.stick_dir = dir;
        }
    }

    #[cfg(feature = "gamepad")]
    fn press_button(&mut self, btn: Button) {
        match btn {
            Button::DPadUp => self.steer.push(Direction::Up),
            Button::DPadDown => self.steer.push(Direction::Down),
            Button::DPadLeft => self.steer.push(Direction::Left),
            Button::DPadRight => self.steer.push(Direction::Right),
            other => {
                if let Some(b) = Btn::from_gilrs(other) {
                    self.pressed[b as usize] = true;
                }
            }
        }
    }

    fn any_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.pressed[b as usize])
    }
}

/// Quantise the left stick to its dominant axis. Stick Y is positive up.
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
fn stick_direction(x: f32, y: f32) -> Option<Direction> {
    if x.abs() < STICK_DEADZONE && y.abs() < STICK_DEADZONE {
        return None;
    }
    if x.abs() >= y.abs() {
        Some(if x > 0.0 { Direction::Right } else { Direction::Left })
    } else {
        Some(if y > 0.0 { Direction::Up } else { Direction::Down })
    }
}
