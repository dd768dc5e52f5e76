use anyhow::{Context, Result};
use log::{debug, info};
use rand::rngs::ThreadRng;
use rand::Rng;
use std::collections::HashSet;

use crate::config::GameConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// A grid position, measured in segment units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn step(self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell::new(self.x + dx, self.y + dy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

/// Why a session stopped running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    Crashed(Collision),
    /// No free cell left for food
    Cleared,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickEvent {
    /// Session already over, nothing moved
    Idle,
    Moved,
    /// Stepped onto food, snake grew
    Ate,
    /// This step ended the session
    Ended(Outcome),
}

/// Moves every segment onto its predecessor's cell and puts the head on
/// `new_head`. Runs tail first so each segment reads a pre-move position.
fn shift_segments(segments: &mut [Cell], new_head: Cell) {
    for i in (1..segments.len()).rev() {
        segments[i] = segments[i - 1];
    }
    if let Some(head) = segments.first_mut() {
        *head = new_head;
    }
}

/// Read-only view of the board handed to renderers once per frame.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    /// Head first, tail last
    pub segments: &'a [Cell],
    pub food: Cell,
    pub score: u32,
    pub running: bool,
    pub grid_width: i32,
    pub grid_height: i32,
}

impl<'a> Snapshot<'a> {
    pub fn head(&self) -> Cell {
        self.segments[0]
    }

    pub fn body(&self) -> &'a [Cell] {
        &self.segments[1..]
    }
}

#[derive(Debug)]
pub struct GameState<R = ThreadRng> {
    config: GameConfig,
    rng: R,
    snake: Vec<Cell>,
    current: Direction,
    next: Direction,
    food: Cell,
    score: u32,
    running: bool,
    outcome: Option<Outcome>,
}

impl GameState<ThreadRng> {
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> GameState<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self> {
        config.validate()?;

        let centre = Cell::new(config.grid_width() / 2, config.grid_height() / 2);
        let snake = (0..config.initial_length as i32)
            .map(|i| Cell::new(centre.x - i, centre.y))
            .collect();

        let mut game = GameState {
            config,
            rng,
            snake,
            current: Direction::Right,
            next: Direction::Right,
            food: centre,
            score: 0,
            running: true,
            outcome: None,
        };
        game.spawn_food().context("no free cell for the first food")?;
        Ok(game)
    }

    /// Queues a turn for the next tick. Turning straight back against the
    /// direction applied on the last tick is dropped.
    pub fn submit_direction(&mut self, requested: Direction) {
        if !self.running {
            return;
        }
        if requested == self.current.opposite() {
            debug!("Ignoring reversal from {:?} to {:?}", self.current, requested);
            return;
        }
        self.next = requested;
    }

    pub fn quit(&mut self) {
        if self.running {
            self.finish(Outcome::Quit);
        }
    }

    /// Advances the snake by exactly one cell.
    pub fn tick(&mut self) -> TickEvent {
        if !self.running {
            return TickEvent::Idle;
        }

        self.current = self.next;
        let new_head = self.head().step(self.current);
        shift_segments(&mut self.snake, new_head);

        let mut event = TickEvent::Moved;
        if new_head == self.food {
            self.score += self.config.score_per_food;
            // Doubles up on the tail cell until the next shift pulls it apart
            let tail = self.snake[self.snake.len() - 1];
            self.snake.push(tail);
            info!("Food eaten: score {}, length {}", self.score, self.snake.len());

            if self.spawn_food().is_none() {
                self.finish(Outcome::Cleared);
                return TickEvent::Ended(Outcome::Cleared);
            }
            event = TickEvent::Ate;
        }

        if let Some(collision) = self.collision() {
            let outcome = Outcome::Crashed(collision);
            self.finish(outcome);
            return TickEvent::Ended(outcome);
        }

        event
    }

    /// Places food on a uniformly random free cell. `None` when the snake
    /// covers the whole grid.
    fn spawn_food(&mut self) -> Option<Cell> {
        let occupied: HashSet<Cell> = self
            .snake
            .iter()
            .copied()
            .filter(|&cell| self.in_bounds(cell))
            .collect();
        if occupied.len() >= self.config.cell_count() {
            return None;
        }

        loop {
            let cell = Cell::new(
                self.rng.gen_range(0..self.config.grid_width()),
                self.rng.gen_range(0..self.config.grid_height()),
            );
            if !occupied.contains(&cell) {
                self.food = cell;
                return Some(cell);
            }
        }
    }
}

impl<R> GameState<R> {
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            segments: &self.snake,
            food: self.food,
            score: self.score,
            running: self.running,
            grid_width: self.config.grid_width(),
            grid_height: self.config.grid_height(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Direction applied on the last tick.
    pub fn current_direction(&self) -> Direction {
        self.current
    }

    fn head(&self) -> Cell {
        self.snake[0]
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.config.grid_width()).contains(&cell.x)
            && (0..self.config.grid_height()).contains(&cell.y)
    }

    // Uses post-move positions of every segment
    fn collision(&self) -> Option<Collision> {
        let head = self.head();
        if !self.in_bounds(head) {
            Some(Collision::Wall)
        } else if self.snake[1..].contains(&head) {
            Some(Collision::Body)
        } else {
            None
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.running = false;
        self.outcome = Some(outcome);
    }
}
