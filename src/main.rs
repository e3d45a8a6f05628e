/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::time::{Duration, Instant};

use rand::Rng;
use simplelog::{Config, WriteLogger};

use config::GameConfig;
use sim::event::GameEvent;
use sim::step;
use sim::world::{Phase, WorldState};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let (config, config_err) = GameConfig::load();
    init_logging(&config);

    log::info!("starting snake");
    match (&config.source, &config_err) {
        (_, Some(e)) => log::warn!("{e}; using default settings"),
        (Some(path), None) => log::info!("settings loaded from {}", path.display()),
        (None, None) => log::info!("no config.toml found, using defaults"),
    }

    let mut rng = rand::thread_rng();
    let mut world = WorldState::new(&config.speed, &mut rng);
    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        log::error!("terminal init failed: {e}");
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = if config.sound { SoundEngine::new() } else { None };

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &config, &mut rng);

    if let Err(e) = renderer.cleanup() {
        log::error!("terminal cleanup failed: {e}");
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("game error: {e}");
        eprintln!("Game error: {e}");
    }

    log::info!(
        "exiting after {} ticks, final length {}",
        world.tick,
        world.snake.len()
    );
    println!("Final length: {}", world.snake.len());
}

/// Log to a file: the terminal belongs to the game while it runs.
/// A log file that cannot be created just means no logging.
fn init_logging(config: &GameConfig) {
    match File::create(&config.log_file) {
        Ok(file) => {
            if WriteLogger::init(config.log_level, Config::default(), file).is_err() {
                eprintln!("Warning: logger already initialised");
            }
        }
        Err(e) => {
            eprintln!("Warning: could not create {}: {e}", config.log_file.display());
        }
    }
}

fn game_loop<R: Rng + ?Sized>(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
    rng: &mut R,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let mut last_tick = Instant::now();

    loop {
        kb.drain_events();
        gp.update();
        gp.collect_commands(&mut kb.commands);

        for &cmd in &kb.commands {
            let before = world.phase();
            if !world.apply(cmd, rng) {
                log::info!("quit requested");
                return Ok(());
            }
            if before == Phase::GameOver && world.phase() == Phase::Running {
                if let Some(sfx) = sound {
                    sfx.play_restart();
                }
            }
        }

        if world.phase() != Phase::Running {
            // Resume a full interval after unpausing, not instantly.
            last_tick = Instant::now();
        } else if last_tick.elapsed() >= tick_interval(world.snake.speed) {
            let events = step::step(world, rng);
            process_events(sound, &events);
            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }
}

/// Time between ticks at `speed` ticks per second.
fn tick_interval(speed: u32) -> Duration {
    Duration::from_millis(1000 / u64::from(speed.max(1)))
}

fn process_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::AppleEaten { at, length, speed } => {
                log::debug!("apple eaten at ({}, {}): length {length}, speed {speed}", at.x, at.y);
                if let Some(sfx) = sound {
                    sfx.play_eat(*speed);
                }
            }
            GameEvent::SnakeCrashed { at, length } => {
                log::info!("game over at ({}, {}) with length {length}", at.x, at.y);
                if let Some(sfx) = sound {
                    sfx.play_crash();
                }
            }
        }
    }
}
