//! Snake game - state machine table, movement step and snapshot projection
//!
//! Turning never goes through the machine: directional input only records
//! the intended direction in any state, and the next `Tick` in `Move`
//! consumes it. A step
//! that hits a wall or the body, or that fills the field, raises `ended`;
//! [`SnakeGame`] answers it with `Terminate`. In `GameOver` every tick feeds
//! the cooldown counter and the automatic `AutoReset` transition re-arms
//! `Init` once it runs out. The last board stays on screen until `Start`.

use brickgame_fsm::{Event, FsmError, Machine, Transition};

use crate::config::GameConfig;
use crate::game::Game;
use crate::rng::SimpleRng;
use crate::score::ScoreStore;
use crate::types::{
    GameInfo, UserAction, FIELD_HEIGHT, FIELD_WIDTH, SNAKE_APPLE_CELL, SNAKE_BODY_CELL,
    SNAKE_HEAD_CELL,
};

use super::body::{Body, Direction, Point};

/// Name used for the score file
pub const SNAKE_NAME: &str = "snake";

/// Segments at the start of every round
pub const INITIAL_LENGTH: usize = 4;

/// Reaching this length wins the round
pub const MAX_LENGTH: usize = FIELD_WIDTH * FIELD_HEIGHT;

/// Ticks spent in `GameOver` before re-arming
pub const COOLDOWN_TICKS: u32 = 10;

/// Points per apple
pub const APPLE_SCORE: u32 = 1;

pub const POINTS_PER_LEVEL: u32 = 10;

pub const BASE_SPEED: u32 = 100;

pub const MIN_SPEED: u32 = 50;

pub const SPEED_STEP: u32 = 5;

/// Head cell at the start of a round
pub const START_HEAD: Point = Point::new(FIELD_WIDTH as i32 / 2, FIELD_HEIGHT as i32 / 2);

pub fn level_for_score(score: u32) -> u32 {
    1 + score / POINTS_PER_LEVEL
}

pub fn speed_for_level(level: u32) -> u32 {
    BASE_SPEED
        .saturating_sub(level.saturating_mul(SPEED_STEP))
        .max(MIN_SPEED)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnakeState {
    Init,
    Move,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnakeEvent {
    Start,
    PauseToggle,
    Terminate,
    Tick,
    /// Taken automatically once the game-over cooldown has run out
    AutoReset,
}

impl Event for SnakeEvent {
    fn is_automatic(&self) -> bool {
        matches!(self, SnakeEvent::AutoReset)
    }
}

/// What a host action means to the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeInput {
    Event(SnakeEvent),
    Turn(Direction),
}

impl SnakeInput {
    pub fn from_action(action: UserAction) -> Option<Self> {
        match action {
            UserAction::Start => Some(SnakeInput::Event(SnakeEvent::Start)),
            UserAction::Pause => Some(SnakeInput::Event(SnakeEvent::PauseToggle)),
            UserAction::Terminate => Some(SnakeInput::Event(SnakeEvent::Terminate)),
            UserAction::Up => Some(SnakeInput::Turn(Direction::Up)),
            UserAction::Down => Some(SnakeInput::Turn(Direction::Down)),
            UserAction::Left => Some(SnakeInput::Turn(Direction::Left)),
            UserAction::Right => Some(SnakeInput::Turn(Direction::Right)),
            UserAction::Action => None,
        }
    }
}

type Row = Transition<SnakeState, SnakeEvent, SnakeModel>;

static TRANSITIONS: [Row; 9] = {
    use SnakeEvent as E;
    use SnakeState as S;
    [
        Row::new(S::Init, E::Start, S::Move, None, Some(new_round)),
        Row::new(S::Move, E::Tick, S::Move, None, Some(step)),
        Row::new(S::Move, E::PauseToggle, S::Paused, None, None),
        Row::new(S::Paused, E::PauseToggle, S::Move, None, None),
        Row::new(S::Move, E::Terminate, S::GameOver, None, Some(finish_round)),
        Row::new(S::Paused, E::Terminate, S::GameOver, None, Some(finish_round)),
        Row::new(S::GameOver, E::Tick, S::GameOver, None, Some(cool_down)),
        Row::new(S::GameOver, E::Start, S::Move, None, Some(new_round)),
        Row::new(S::GameOver, E::AutoReset, S::Init, None, Some(rearm)),
    ]
};

/// Everything the transition callbacks read and write
#[derive(Debug)]
pub struct SnakeModel {
    body: Body,
    direction: Direction,
    intended: Direction,
    apple: Point,
    rng: SimpleRng,
    score: u32,
    high_score: u32,
    level: u32,
    speed: u32,
    ended: bool,
    cooldown: u32,
    store: ScoreStore,
}

impl SnakeModel {
    fn new(rng: SimpleRng, store: ScoreStore) -> Self {
        let high_score = store.load();
        let mut model = Self {
            body: Body::default(),
            direction: Direction::Right,
            intended: Direction::Right,
            apple: START_HEAD,
            rng,
            score: 0,
            high_score,
            level: 1,
            speed: speed_for_level(1),
            ended: false,
            cooldown: 0,
            store,
        };
        model.reset_board();
        model
    }

    fn reset_board(&mut self) {
        self.body = Body::straight(START_HEAD, INITIAL_LENGTH, Direction::Right);
        self.direction = Direction::Right;
        self.intended = Direction::Right;
        self.score = 0;
        self.level = level_for_score(0);
        self.speed = speed_for_level(self.level);
        self.ended = false;
        self.cooldown = 0;
        self.spawn_apple();
    }

    /// Put the apple on a random free cell, or on the tail when none is left
    fn spawn_apple(&mut self) {
        let free = MAX_LENGTH.saturating_sub(self.body.occupied_count());
        let pick = self.rng.next_range(free as u32) as usize;
        self.apple = match self.body.free_cells().nth(pick) {
            Some(cell) => cell,
            None => self.body.tail().unwrap_or(START_HEAD),
        };
    }

    fn record_high_score(&mut self) {
        if self.score > self.high_score {
            self.high_score = self.score;
            log::info!("snake: new high score {}", self.high_score);
            self.store.save(self.high_score);
        }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn apple(&self) -> Point {
        self.apple
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }
}

fn new_round(m: &mut SnakeModel) {
    m.reset_board();
    log::info!("snake: round started");
}

fn step(m: &mut SnakeModel) {
    if m.intended != m.direction.opposite() {
        m.direction = m.intended;
    }
    m.intended = m.direction;

    let Some(head) = m.body.head() else {
        return;
    };
    let next = head.step(m.direction);
    let eats = next == m.apple;
    if !next.in_field() || m.body.hits(next, !eats) {
        log::debug!("snake: crashed at ({}, {})", next.x, next.y);
        m.ended = true;
        return;
    }

    if !eats {
        m.body.pop_tail();
    }
    m.body.push_head(next);
    if !eats {
        return;
    }

    m.score = m.score.saturating_add(APPLE_SCORE);
    m.level = level_for_score(m.score);
    m.speed = speed_for_level(m.level);
    m.record_high_score();

    if m.body.len() >= MAX_LENGTH {
        log::info!("snake: field filled");
        m.ended = true;
        return;
    }
    m.spawn_apple();
}

fn finish_round(m: &mut SnakeModel) {
    m.record_high_score();
    m.cooldown = 0;
    log::info!("snake: game over with score {}", m.score);
}

fn cool_down(m: &mut SnakeModel) {
    m.cooldown = m.cooldown.saturating_add(1);
}

fn rearm(m: &mut SnakeModel) {
    m.cooldown = 0;
    m.ended = false;
}

/// A Snake instance behind the [`Game`] contract
#[derive(Debug)]
pub struct SnakeGame {
    machine: Machine<SnakeState, SnakeEvent, SnakeModel>,
    model: SnakeModel,
    info: GameInfo,
}

impl SnakeGame {
    pub fn new(config: &GameConfig) -> Result<Self, FsmError> {
        Self::with_parts(config.rng(), config.score_store(SNAKE_NAME))
    }

    pub fn with_parts(rng: SimpleRng, store: ScoreStore) -> Result<Self, FsmError> {
        let machine = Machine::new(&TRANSITIONS, SnakeState::Init)?;
        let model = SnakeModel::new(rng, store);
        log::info!("snake: created (high score {})", model.high_score);
        Ok(Self {
            machine,
            model,
            info: GameInfo::default(),
        })
    }

    pub fn state(&self) -> SnakeState {
        self.machine.current()
    }

    pub fn model(&self) -> &SnakeModel {
        &self.model
    }

    /// Feed one event and answer a step that ended the round
    pub fn dispatch(&mut self, event: SnakeEvent) {
        if self.machine.process_event(&mut self.model, event).is_err() {
            return;
        }
        if std::mem::take(&mut self.model.ended) {
            let _ = self
                .machine
                .process_event(&mut self.model, SnakeEvent::Terminate);
        }
    }

    /// Record a turn for the next step
    ///
    /// Buffered in every state. A turn queued while paused applies on resume,
    /// and `Start` resets the buffer for a new round.
    pub fn turn(&mut self, dir: Direction) {
        self.model.intended = dir;
    }

    /// Rebuild the field from body and apple
    fn project(&mut self) {
        let m = &self.model;
        let info = &mut self.info;

        info.clear_matrices();
        if m.apple.in_field() {
            info.field[m.apple.y as usize][m.apple.x as usize] = SNAKE_APPLE_CELL;
        }
        for (i, p) in m.body.iter().enumerate() {
            if p.in_field() {
                info.field[p.y as usize][p.x as usize] = if i == 0 {
                    SNAKE_HEAD_CELL
                } else {
                    SNAKE_BODY_CELL
                };
            }
        }
        info.score = m.score;
        info.high_score = m.high_score;
        info.level = m.level;
        info.speed = m.speed;
        info.pause = self.machine.current() == SnakeState::Paused;
    }
}

impl Game for SnakeGame {
    fn input(&mut self, action: UserAction, _hold: bool) {
        match SnakeInput::from_action(action) {
            Some(SnakeInput::Event(event)) => self.dispatch(event),
            Some(SnakeInput::Turn(dir)) => self.turn(dir),
            None => {}
        }
    }

    fn update(&mut self) {
        self.dispatch(SnakeEvent::Tick);
        if self.machine.current() == SnakeState::GameOver && self.model.cooldown >= COOLDOWN_TICKS
        {
            let _ = self.machine.update(&mut self.model);
        }
    }

    fn info(&mut self) -> &GameInfo {
        self.project();
        &self.info
    }
}

impl Drop for SnakeGame {
    fn drop(&mut self) {
        self.model.store.save(self.model.high_score);
        log::info!("snake: destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> SnakeGame {
        SnakeGame::with_parts(SimpleRng::new(2024), ScoreStore::memory()).unwrap()
    }

    fn started() -> SnakeGame {
        let mut g = game();
        g.input(UserAction::Start, false);
        assert_eq!(g.state(), SnakeState::Move);
        // Keep the apple out of the way unless a test places it.
        g.model.apple = Point::new(0, 0);
        g
    }

    fn head(g: &SnakeGame) -> Point {
        g.model().body().head().unwrap()
    }

    #[test]
    fn test_initial_board() {
        let mut g = game();
        assert_eq!(g.state(), SnakeState::Init);
        let info = *g.info();
        assert_eq!(info.find(SNAKE_HEAD_CELL), Some((10, 5)));
        assert_eq!(
            info.field.iter().flatten().filter(|&&c| c == SNAKE_BODY_CELL).count(),
            INITIAL_LENGTH - 1
        );
        assert!(info.find(SNAKE_APPLE_CELL).is_some());
        assert_eq!(info.level, 1);
        assert_eq!(info.speed, 95);
    }

    #[test]
    fn test_moves_right_one_cell_per_tick() {
        let mut g = started();
        for i in 1..=3 {
            g.update();
            assert_eq!(head(&g), Point::new(START_HEAD.x + i, START_HEAD.y));
        }
        assert_eq!(g.model().body().len(), INITIAL_LENGTH);
        assert!(g.model().body().is_consistent());
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut g = started();
        g.input(UserAction::Left, false);
        g.update();
        assert_eq!(head(&g), Point::new(START_HEAD.x + 1, START_HEAD.y));
        assert_eq!(g.model().direction(), Direction::Right);
    }

    #[test]
    fn test_turn_applies_on_next_tick() {
        let mut g = started();
        g.input(UserAction::Up, false);
        assert_eq!(head(&g), START_HEAD);
        g.update();
        assert_eq!(head(&g), Point::new(START_HEAD.x, START_HEAD.y - 1));
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut g = started();
        g.model.apple = Point::new(START_HEAD.x + 1, START_HEAD.y);
        let tail = g.model().body().tail();

        g.update();
        assert_eq!(g.model().body().len(), INITIAL_LENGTH + 1);
        assert_eq!(g.model().body().tail(), tail);
        assert_eq!(g.model().score(), 1);
        assert_eq!(g.model().high_score(), 1);
        assert!(!g.model().body().contains(g.model().apple()));
        assert!(g.model().body().is_consistent());
    }

    #[test]
    fn test_level_and_speed_from_score() {
        assert_eq!(level_for_score(0), 1);
        assert_eq!(level_for_score(10), 2);
        assert_eq!(speed_for_level(1), 95);
        assert_eq!(speed_for_level(10), 50);
        assert_eq!(speed_for_level(30), 50);
    }

    #[test]
    fn test_wall_crash_ends_round() {
        let mut g = started();
        for _ in 0..FIELD_WIDTH {
            g.update();
        }
        assert_eq!(g.state(), SnakeState::GameOver);
        assert_eq!(head(&g), Point::new(FIELD_WIDTH as i32 - 1, START_HEAD.y));
    }

    #[test]
    fn test_self_collision_ends_round() {
        let mut g = started();
        g.model.body = Body::from_segments([
            Point::new(5, 5),
            Point::new(6, 5),
            Point::new(6, 6),
            Point::new(5, 6),
            Point::new(4, 6),
        ]);
        g.model.direction = Direction::Left;
        g.model.intended = Direction::Left;
        g.input(UserAction::Down, false);
        g.update();
        assert_eq!(g.state(), SnakeState::GameOver);
    }

    #[test]
    fn test_chasing_the_tail_is_legal() {
        let mut g = started();
        g.model.body = Body::from_segments([
            Point::new(5, 5),
            Point::new(6, 5),
            Point::new(6, 6),
            Point::new(5, 6),
        ]);
        g.model.direction = Direction::Left;
        g.model.intended = Direction::Left;
        g.input(UserAction::Down, false);
        g.update();
        assert_eq!(g.state(), SnakeState::Move);
        assert_eq!(head(&g), Point::new(5, 6));
        assert_eq!(g.model().body().len(), 4);
        assert!(g.model().body().is_consistent());
    }

    #[test]
    fn test_game_over_cooldown_rearms_without_clearing() {
        let mut g = started();
        g.input(UserAction::Terminate, false);
        assert_eq!(g.state(), SnakeState::GameOver);

        let frozen = g.info().field;
        for _ in 0..COOLDOWN_TICKS - 1 {
            g.update();
            assert_eq!(g.state(), SnakeState::GameOver);
        }
        g.update();
        assert_eq!(g.state(), SnakeState::Init);

        for _ in 0..5 {
            g.update();
            assert_eq!(g.info().field, frozen);
        }

        g.input(UserAction::Start, false);
        assert_eq!(g.state(), SnakeState::Move);
        assert_eq!(head(&g), START_HEAD);
        assert_eq!(g.model().score(), 0);
    }

    #[test]
    fn test_pause_freezes_snake() {
        let mut g = started();
        g.input(UserAction::Pause, false);
        assert!(g.info().pause);
        g.update();
        g.input(UserAction::Up, false);
        assert_eq!(head(&g), START_HEAD);

        g.input(UserAction::Pause, false);
        g.update();
        assert_eq!(head(&g), Point::new(START_HEAD.x, START_HEAD.y - 1));
    }

    #[test]
    fn test_turn_before_start_is_discarded() {
        let mut g = game();
        g.input(UserAction::Up, false);
        g.input(UserAction::Start, false);
        g.model.apple = Point::new(0, 0);
        g.update();
        assert_eq!(head(&g), Point::new(START_HEAD.x + 1, START_HEAD.y));
    }

    #[test]
    fn test_apple_falls_back_to_tail_on_full_field() {
        let mut g = started();
        // Serpentine covering every cell, head at the top-left.
        let mut cells = Vec::with_capacity(MAX_LENGTH);
        for y in 0..FIELD_HEIGHT as i32 {
            for i in 0..FIELD_WIDTH as i32 {
                let x = if y % 2 == 0 { i } else { FIELD_WIDTH as i32 - 1 - i };
                cells.push(Point::new(x, y));
            }
        }
        g.model.body = Body::from_segments(cells);
        g.model.spawn_apple();
        assert_eq!(Some(g.model().apple()), g.model().body().tail());
    }

    #[test]
    fn test_filling_the_field_wins() {
        let mut g = started();
        let mut cells = Vec::with_capacity(MAX_LENGTH);
        for y in 0..FIELD_HEIGHT as i32 {
            for i in 0..FIELD_WIDTH as i32 {
                let x = if y % 2 == 0 { i } else { FIELD_WIDTH as i32 - 1 - i };
                cells.push(Point::new(x, y));
            }
        }
        // Drop the first cell: head at (1, 0) moving left onto the apple at (0, 0).
        cells.remove(0);
        g.model.body = Body::from_segments(cells);
        g.model.direction = Direction::Left;
        g.model.intended = Direction::Left;
        g.model.apple = Point::new(0, 0);

        g.update();
        assert_eq!(g.model().body().len(), MAX_LENGTH);
        assert_eq!(g.state(), SnakeState::GameOver);
        assert_eq!(g.model().high_score(), 1);
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let mut g = started();
        g.update();
        let first = *g.info();
        let second = *g.info();
        assert_eq!(first, second);
        assert_eq!(g.model().body().len(), INITIAL_LENGTH);
    }
}
