mod config;
mod game;
mod input;
mod render;

use anyhow::{ensure, Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info, warn};
use ratatui::{backend::CrosstermBackend, Terminal};
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::io::{self, Stdout};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::GameConfig;
use crate::game::{GameState, Outcome, TickEvent};
use crate::input::Command;

const LOG_FILE: &str = "tsnake.log";
// Yield between frames so the loop does not spin a core
const IDLE_DELAY: Duration = Duration::from_millis(1);

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn main() -> ExitCode {
    print_banner();

    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize game: {:#}", e);
        return ExitCode::FAILURE;
    }
    info!("Starting T-Snake");

    let config = GameConfig::default();
    let (mut terminal, mut game) = match setup(&config) {
        Ok(ready) => ready,
        Err(e) => {
            error!("Initialization failed: {:#}", e);
            eprintln!("Failed to initialize game: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = run(&mut terminal, &mut game, &config);
    let restored = restore_terminal(&mut terminal);
    if let Err(e) = result.and(restored) {
        error!("Terminal error: {:#}", e);
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }

    match game.outcome() {
        Some(Outcome::Crashed(collision)) => {
            info!("Snake hit {:?}", collision);
            println!("Game Over! Score: {}", game.score());
        }
        Some(Outcome::Cleared) => println!("Board cleared! Score: {}", game.score()),
        Some(Outcome::Quit) | None => {}
    }
    info!("Exiting T-Snake");

    ExitCode::SUCCESS
}

fn print_banner() {
    println!("T-Snake 3");
    println!("Copyright © 2005 T-RonX Modding (original VB6 version)");
    println!("Terminal edition in Rust");
    println!();
    println!("Controls:");
    println!("  Arrow Keys or WASD - Move snake");
    println!("  ESC - Quit game");
    println!();
}

fn init_logging() -> Result<()> {
    let file = File::create(LOG_FILE).with_context(|| format!("Failed to create {}", LOG_FILE))?;
    WriteLogger::init(LevelFilter::Info, Config::default(), file)
        .context("Failed to initialize logger")?;
    Ok(())
}

fn setup(config: &GameConfig) -> Result<(Tui, GameState)> {
    let game = GameState::new(*config).context("Invalid game configuration")?;

    let (cols, rows) = terminal::size().context("Failed to query terminal size")?;
    let (min_cols, min_rows) = render::required_size(config);
    ensure!(
        cols >= min_cols && rows >= min_rows,
        "terminal is {}x{}, the arena needs at least {}x{}",
        cols,
        rows,
        min_cols,
        min_rows
    );

    enable_raw_mode().context("Failed to enable raw mode")?;
    match open_terminal() {
        Ok(terminal) => Ok((terminal, game)),
        Err(e) => {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
            Err(e)
        }
    }
}

fn open_terminal() -> Result<Tui> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")?;
    terminal.hide_cursor().context("Failed to hide cursor")?;
    terminal.clear().context("Failed to clear terminal")?;
    Ok(terminal)
}

/// Runs every step even when an earlier one fails, reporting the first error.
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    first_error([
        disable_raw_mode().context("Failed to disable raw mode"),
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen"),
        terminal.show_cursor().context("Failed to show cursor"),
    ])
}

fn first_error<const N: usize>(steps: [Result<()>; N]) -> Result<()> {
    steps.into_iter().collect()
}

/// Input, at most one tick per interval, then a frame. The running flag is
/// only checked at the top, so a tick/draw pair always completes.
fn run(terminal: &mut Tui, game: &mut GameState, config: &GameConfig) -> Result<()> {
    let (min_cols, min_rows) = render::required_size(config);
    let mut last_tick = Instant::now();

    while game.is_running() {
        while event::poll(Duration::ZERO)? {
            let event = event::read()?;
            if let Event::Resize(cols, rows) = event {
                if cols < min_cols || rows < min_rows {
                    warn!("Terminal resized to {}x{}, arena will be clipped", cols, rows);
                }
            }

            match Command::from_event(&event) {
                Some(Command::Turn(direction)) => game.submit_direction(direction),
                Some(Command::Quit) => {
                    info!("Quit requested heading {:?}", game.current_direction());
                    game.quit();
                }
                None => {}
            }
        }

        if last_tick.elapsed() >= config.tick_interval {
            if let TickEvent::Ended(outcome) = game.tick() {
                info!("Session over: {:?} with score {}", outcome, game.score());
            }
            last_tick = Instant::now();
        }

        terminal.draw(|frame| frame.render_widget(game.snapshot(), frame.area()))?;
        thread::sleep(IDLE_DELAY);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_first_error_wins() {
        let result = first_error([
            Ok(()),
            Err(anyhow!("leave alternate screen")),
            Err(anyhow!("show cursor")),
        ]);
        assert_eq!(result.unwrap_err().to_string(), "leave alternate screen");
    }

    #[test]
    fn test_first_error_all_ok() {
        assert!(first_error([Ok(()), Ok(()), Ok(())]).is_ok());
    }

    #[test]
    fn test_restore_steps_all_run() {
        let mut ran = Vec::new();
        let mut step = |name: &'static str, fail: bool| {
            ran.push(name);
            if fail {
                Err(anyhow!(name))
            } else {
                Ok(())
            }
        };
        let result = first_error([
            step("raw mode", true),
            step("alternate screen", false),
            step("cursor", false),
        ]);

        assert_eq!(result.unwrap_err().to_string(), "raw mode");
        assert_eq!(ran, ["raw mode", "alternate screen", "cursor"]);
    }
}
