//! Lane runner engine
//!
//! Continuous ticks: obstacles fall down three lanes at an ever-increasing
//! speed and the player dodges by switching lanes or jumping. Touching an
//! obstacle on the ground ends the run.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::{Command, Direction, Engine, GameEvent, GameKind, RunState, ScoreReport};
use crate::highscores::BestScore;
use crate::renderer::{self, RenderSink};
use crate::settings::RunnerConfig;

/// A falling obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub lane: i32,
    pub rect: Rect,
}

/// An active jump, tagged with the run epoch it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Jump {
    /// Sim clock value at which the player lands
    pub until_ms: f64,
    pub epoch: u64,
}

/// Runner game state
#[derive(Debug)]
pub struct RunnerGame {
    pub config: RunnerConfig,
    pub lane: i32,
    pub jump: Option<Jump>,
    /// Active obstacles (spawn order)
    pub obstacles: Vec<Obstacle>,
    /// Pixels per tick
    pub speed: f32,
    /// Ticks survived this run
    pub distance: u64,
    pub run_state: RunState,
    /// Simulated time, advanced one period per tick
    pub clock_ms: f64,
    /// Bumped on every start/reset so stale landings are ignored
    epoch: u64,
    pending_shift: Option<i32>,
    pending_jump: bool,
    next_id: u32,
    best: BestScore,
    rng: Pcg32,
}

impl RunnerGame {
    pub fn new(config: RunnerConfig, best: BestScore, seed: u64) -> Self {
        Self {
            lane: config.start_lane.clamp(0, config.max_lane()),
            jump: None,
            obstacles: Vec::new(),
            speed: config.base_speed,
            distance: 0,
            run_state: RunState::Idle,
            clock_ms: 0.0,
            epoch: 0,
            pending_shift: None,
            pending_jump: false,
            next_id: 1,
            best,
            rng: Pcg32::seed_from_u64(seed),
            config,
        }
    }

    /// Displayed score
    pub fn score(&self) -> u64 {
        self.distance / self.config.score_divisor.max(1)
    }

    pub fn best(&self) -> u64 {
        self.best.value()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_jumping(&self) -> bool {
        self.jump.is_some()
    }

    /// The player's box at its current lane and height
    pub fn player_rect(&self) -> Rect {
        let y = if self.is_jumping() {
            self.config.jump_y
        } else {
            self.config.ground_y
        };
        Rect::new(
            self.config.lane_x(self.lane),
            y,
            self.config.player_width,
            self.config.player_height,
        )
    }

    /// Latch a lane change, applied (and clamped) on the next tick
    pub fn move_lane(&mut self, delta: i32) -> bool {
        if self.run_state != RunState::Running {
            return false;
        }
        self.pending_shift = Some(delta);
        true
    }

    /// Latch a jump. Ignored while airborne or when not running.
    pub fn jump(&mut self) -> bool {
        if self.run_state != RunState::Running || self.is_jumping() || self.pending_jump {
            return false;
        }
        self.pending_jump = true;
        true
    }

    /// Deferred end of a jump. Only lands a jump from the same epoch, so a
    /// landing scheduled before a reset cannot touch the new run.
    pub fn land(&mut self, epoch: u64) -> bool {
        match self.jump {
            Some(jump) if jump.epoch == epoch && epoch == self.epoch => {
                self.jump = None;
                true
            }
            _ => false,
        }
    }

    /// Clear everything that belongs to a single run except the distance
    fn clear_run(&mut self) {
        self.epoch += 1;
        self.lane = self.config.start_lane.clamp(0, self.config.max_lane());
        self.jump = None;
        self.obstacles.clear();
        self.speed = self.config.base_speed;
        self.clock_ms = 0.0;
        self.pending_shift = None;
        self.pending_jump = false;
    }

    fn spawn_obstacle(&mut self) {
        let lane = self.rng.random_range(0..self.config.lanes.max(1));
        let id = self.next_id;
        self.next_id += 1;
        self.obstacles.push(Obstacle {
            id,
            lane,
            rect: Rect::new(
                self.config.lane_x(lane),
                self.config.spawn_y,
                self.config.obstacle_width,
                self.config.obstacle_height,
            ),
        });
        log::debug!("Obstacle {} spawned in lane {}", id, lane);
    }

    fn game_over(&mut self, events: &mut Vec<GameEvent>) {
        self.run_state = RunState::Over;
        self.pending_shift = None;
        self.pending_jump = false;
        let score = self.score();
        self.best.record(score);
        log::info!(
            "Runner over: score {}, best {}, speed {:.3}",
            score,
            self.best.value(),
            self.speed
        );
        events.push(GameEvent::GameOver {
            score,
            best: self.best.value(),
        });
    }
}

impl Engine for RunnerGame {
    fn kind(&self) -> GameKind {
        GameKind::Runner
    }

    fn tick_period_ms(&self) -> f64 {
        self.config.tick_ms
    }

    fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Begin ticking. From Over the track is cleared but the distance is
    /// kept; pair with `reset` for a fresh run.
    fn start(&mut self) {
        match self.run_state {
            RunState::Idle => {}
            RunState::Over => self.clear_run(),
            RunState::Running | RunState::Paused => return,
        }
        self.run_state = RunState::Running;
        log::info!("Runner started");
    }

    fn reset(&mut self) {
        self.clear_run();
        self.distance = 0;
        self.run_state = RunState::Idle;
        log::info!("Runner reset");
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Steer(Direction::Left) => {
                self.move_lane(-1);
            }
            Command::Steer(Direction::Right) => {
                self.move_lane(1);
            }
            Command::Steer(Direction::Up) | Command::Jump => {
                self.jump();
            }
            Command::Steer(Direction::Down) => {}
            Command::Start => self.restart(),
            Command::TogglePause => self.toggle_pause(),
        }
    }

    fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.run_state != RunState::Running {
            return events;
        }
        self.clock_ms += self.config.tick_ms;

        if let Some(jump) = self.jump {
            if self.clock_ms >= jump.until_ms {
                self.land(jump.epoch);
            }
        }

        // Pending commands
        if let Some(delta) = self.pending_shift.take() {
            self.lane = self.lane.saturating_add(delta).clamp(0, self.config.max_lane());
        }
        if std::mem::take(&mut self.pending_jump) && !self.is_jumping() {
            self.jump = Some(Jump {
                until_ms: self.clock_ms + self.config.jump_ms,
                epoch: self.epoch,
            });
        }

        if self.rng.random_bool(self.config.spawn_chance.clamp(0.0, 1.0)) {
            self.spawn_obstacle();
        }

        for obstacle in &mut self.obstacles {
            obstacle.rect.pos.y += self.speed;
        }
        let view_height = self.config.view_height;
        self.obstacles.retain(|o| o.rect.top() < view_height);

        if !self.is_jumping() {
            let player = self.player_rect();
            if self.obstacles.iter().any(|o| o.rect.overlaps(&player)) {
                self.game_over(&mut events);
                return events;
            }
        }

        let before = self.score();
        self.distance += 1;
        let score = self.score();
        if score != before {
            events.push(GameEvent::Scored(score));
            if self.best.record(score) {
                events.push(GameEvent::NewBest(score));
            }
        }

        // Uncapped difficulty ramp
        self.speed += self.config.speed_ramp;

        events
    }

    fn render(&self, sink: &mut dyn RenderSink) {
        renderer::draw_runner(self, sink);
    }

    fn report(&self) -> ScoreReport {
        ScoreReport {
            game: GameKind::Runner,
            score: self.score(),
            best: self.best.value(),
            run_state: self.run_state,
        }
    }
}
