//! Grid motion engine (snake)
//!
//! Discrete ticks on a bounded grid. The body moves one cell per tick in
//! the committed direction and grows by one cell when the head lands on
//! the target. Leaving the grid or running into the body ends the run.

use std::collections::VecDeque;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{Command, Direction, Engine, GameEvent, GameKind, RunState, ScoreReport};
use crate::highscores::BestScore;
use crate::renderer::{self, RenderSink};
use crate::settings::GridConfig;

/// Random draws before falling back to an explicit scan of free cells
const TARGET_ATTEMPTS_PER_CELL: usize = 4;

/// Snake game state
#[derive(Debug)]
pub struct GridGame {
    pub config: GridConfig,
    /// Occupied cells, head first
    pub body: VecDeque<IVec2>,
    /// Committed direction (None = idle zero vector)
    pub direction: Option<Direction>,
    /// Latched by input, consumed at the start of the next tick
    pending: Option<Direction>,
    pub target: IVec2,
    pub score: u64,
    pub run_state: RunState,
    best: BestScore,
    rng: Pcg32,
}

impl GridGame {
    pub fn new(config: GridConfig, best: BestScore, seed: u64) -> Self {
        let start = IVec2::from(config.start);
        let first_target = IVec2::from(config.first_target);
        let mut game = Self {
            body: VecDeque::from([start]),
            direction: None,
            pending: None,
            target: first_target,
            score: 0,
            run_state: RunState::Idle,
            best,
            rng: Pcg32::seed_from_u64(seed),
            config,
        };
        if !game.in_bounds(first_target) || game.is_occupied(first_target) {
            game.target = game.place_target().unwrap_or(first_target);
        }
        game
    }

    pub fn head(&self) -> IVec2 {
        self.body[0]
    }

    pub fn best(&self) -> u64 {
        self.best.value()
    }

    /// The committed movement vector ((0,0) while idle)
    pub fn direction_vec(&self) -> IVec2 {
        self.direction.map(Direction::to_ivec2).unwrap_or(IVec2::ZERO)
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending
    }

    pub fn in_bounds(&self, cell: IVec2) -> bool {
        cell.x >= 0 && cell.x < self.config.width && cell.y >= 0 && cell.y < self.config.height
    }

    pub fn is_occupied(&self, cell: IVec2) -> bool {
        self.body.contains(&cell)
    }

    /// Latch the next direction. Ignored unless running, and ignored when it
    /// would reverse the committed direction.
    pub fn set_direction(&mut self, dir: Direction) -> bool {
        if self.run_state != RunState::Running {
            return false;
        }
        if self.direction == Some(dir.opposite()) {
            return false;
        }
        self.pending = Some(dir);
        true
    }

    /// Put the board back to a single cell with no motion
    fn clear_board(&mut self) {
        self.body.clear();
        self.body.push_back(IVec2::from(self.config.start));
        self.direction = None;
        self.pending = None;
    }

    /// Pick a free cell for the target
    ///
    /// Uniform rejection sampling; a board with almost no free cells would
    /// spin, so after a bounded number of draws the free cells are listed
    /// and one is chosen uniformly. Returns None when the body fills the grid.
    fn place_target(&mut self) -> Option<IVec2> {
        let cells = self.config.cell_count();
        if cells == 0 {
            return None;
        }
        for _ in 0..cells * TARGET_ATTEMPTS_PER_CELL {
            let cell = IVec2::new(
                self.rng.random_range(0..self.config.width),
                self.rng.random_range(0..self.config.height),
            );
            if !self.is_occupied(cell) {
                return Some(cell);
            }
        }

        let free: Vec<IVec2> = (0..self.config.height)
            .flat_map(|y| (0..self.config.width).map(move |x| IVec2::new(x, y)))
            .filter(|cell| !self.is_occupied(*cell))
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[self.rng.random_range(0..free.len())])
    }

    fn game_over(&mut self, events: &mut Vec<GameEvent>) {
        self.run_state = RunState::Over;
        self.pending = None;
        log::info!(
            "Snake over: score {}, best {}, length {}",
            self.score,
            self.best.value(),
            self.body.len()
        );
        events.push(GameEvent::GameOver {
            score: self.score,
            best: self.best.value(),
        });
    }
}

impl Engine for GridGame {
    fn kind(&self) -> GameKind {
        GameKind::Grid
    }

    fn tick_period_ms(&self) -> f64 {
        self.config.tick_ms
    }

    fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Begin ticking. From Over the board is cleared but the score is kept;
    /// pair with `reset` for a fresh run.
    fn start(&mut self) {
        match self.run_state {
            RunState::Idle => {}
            RunState::Over => {
                self.clear_board();
                if self.is_occupied(self.target) {
                    if let Some(target) = self.place_target() {
                        self.target = target;
                    }
                }
            }
            RunState::Running | RunState::Paused => return,
        }
        self.run_state = RunState::Running;
        log::info!("Snake started");
    }

    fn reset(&mut self) {
        self.clear_board();
        self.score = 0;
        if let Some(target) = self.place_target() {
            self.target = target;
        }
        self.run_state = RunState::Idle;
        log::info!("Snake reset");
    }

    fn pause(&mut self) {
        if self.run_state == RunState::Running {
            self.run_state = RunState::Paused;
            log::info!("Snake paused");
        }
    }

    fn resume(&mut self) {
        if self.run_state == RunState::Paused {
            self.run_state = RunState::Running;
            log::info!("Snake resumed");
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Steer(dir) => {
                self.set_direction(dir);
            }
            Command::Start => self.restart(),
            Command::TogglePause => self.toggle_pause(),
            Command::Jump => {}
        }
    }

    fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.run_state != RunState::Running {
            return events;
        }

        if let Some(dir) = self.pending.take() {
            self.direction = Some(dir);
        }
        let Some(dir) = self.direction else {
            return events;
        };

        let next = self.head() + dir.to_ivec2();
        if !self.in_bounds(next) || self.is_occupied(next) {
            self.game_over(&mut events);
            return events;
        }

        self.body.push_front(next);
        if next == self.target {
            self.score += self.config.reward;
            events.push(GameEvent::Scored(self.score));
            if self.best.record(self.score) {
                events.push(GameEvent::NewBest(self.score));
            }
            match self.place_target() {
                Some(target) => {
                    log::debug!("Target moved to ({}, {})", target.x, target.y);
                    self.target = target;
                }
                None => {
                    log::info!("Snake fills the board");
                    self.game_over(&mut events);
                }
            }
        } else {
            self.body.pop_back();
        }

        events
    }

    fn render(&self, sink: &mut dyn RenderSink) {
        renderer::draw_grid(self, sink);
    }

    fn report(&self) -> ScoreReport {
        ScoreReport {
            game: GameKind::Grid,
            score: self.score,
            best: self.best.value(),
            run_state: self.run_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::{MemoryScoreStore, ScoreStore, SharedScoreStore};
    use proptest::prelude::*;

    fn game_with(store: SharedScoreStore, seed: u64) -> GridGame {
        let best = BestScore::load(GameKind::Grid.score_key(), store);
        GridGame::new(GridConfig::default(), best, seed)
    }

    fn running_game(seed: u64) -> GridGame {
        let mut game = game_with(MemoryScoreStore::new().shared(), seed);
        game.start();
        game
    }

    fn body_vec(game: &GridGame) -> Vec<IVec2> {
        game.body.iter().copied().collect()
    }

    #[test]
    fn test_new_game_is_idle() {
        let game = game_with(MemoryScoreStore::new().shared(), 1);
        assert_eq!(game.run_state, RunState::Idle);
        assert_eq!(body_vec(&game), vec![IVec2::new(10, 10)]);
        assert_eq!(game.direction_vec(), IVec2::ZERO);
        assert_eq!(game.target, IVec2::new(5, 5));
    }

    #[test]
    fn test_eat_target_grows_and_scores() {
        let mut game = running_game(7);
        game.body = VecDeque::from([IVec2::new(5, 5)]);
        game.direction = Some(Direction::Right);
        game.target = IVec2::new(6, 5);

        let events = game.tick();

        assert_eq!(body_vec(&game), vec![IVec2::new(6, 5), IVec2::new(5, 5)]);
        assert_eq!(game.score, 1);
        assert!(events.contains(&GameEvent::Scored(1)));
        assert_ne!(game.target, IVec2::new(6, 5));
        assert_ne!(game.target, IVec2::new(5, 5));
        assert_eq!(game.run_state, RunState::Running);
    }

    #[test]
    fn test_wall_collision_leaves_body() {
        let mut game = running_game(3);
        game.body = VecDeque::from([IVec2::new(19, 5)]);
        game.direction = Some(Direction::Right);

        let events = game.tick();

        assert_eq!(game.run_state, RunState::Over);
        assert_eq!(body_vec(&game), vec![IVec2::new(19, 5)]);
        assert_eq!(events, vec![GameEvent::GameOver { score: 0, best: 0 }]);
    }

    #[test]
    fn test_self_collision() {
        let mut game = running_game(3);
        // Head at (5,5) heading down into a loop of its own body
        game.body = VecDeque::from([
            IVec2::new(5, 5),
            IVec2::new(6, 5),
            IVec2::new(6, 6),
            IVec2::new(5, 6),
            IVec2::new(4, 6),
        ]);
        game.direction = Some(Direction::Left);
        game.set_direction(Direction::Down);
        game.target = IVec2::new(0, 0);

        let before = body_vec(&game);
        game.tick();

        assert_eq!(game.run_state, RunState::Over);
        assert_eq!(body_vec(&game), before);
    }

    #[test]
    fn test_reversal_rejected() {
        let mut game = running_game(1);
        game.direction = Some(Direction::Right);

        assert!(!game.set_direction(Direction::Left));
        assert_eq!(game.pending_direction(), None);

        game.tick();
        assert_eq!(game.direction_vec(), IVec2::new(1, 0));
    }

    #[test]
    fn test_last_writer_wins() {
        let mut game = running_game(1);
        game.direction = Some(Direction::Right);
        assert!(game.set_direction(Direction::Up));
        assert!(game.set_direction(Direction::Down));
        game.tick();
        assert_eq!(game.direction, Some(Direction::Down));
        assert_eq!(game.head(), IVec2::new(10, 11));
    }

    #[test]
    fn test_steer_ignored_when_not_running() {
        let mut game = game_with(MemoryScoreStore::new().shared(), 1);
        assert!(!game.set_direction(Direction::Up));
        game.start();
        game.pause();
        assert!(!game.set_direction(Direction::Up));
        assert_eq!(game.pending_direction(), None);
    }

    #[test]
    fn test_idle_direction_does_not_move() {
        let mut game = running_game(1);
        let events = game.tick();
        assert!(events.is_empty());
        assert_eq!(body_vec(&game), vec![IVec2::new(10, 10)]);
        assert_eq!(game.run_state, RunState::Running);
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut game = running_game(1);
        game.pause();
        game.pause();
        assert_eq!(game.run_state, RunState::Paused);

        game.resume();
        assert_eq!(game.run_state, RunState::Running);
    }

    #[test]
    fn test_paused_tick_is_frozen() {
        let mut game = running_game(1);
        game.set_direction(Direction::Up);
        game.pause();
        game.tick();
        assert_eq!(game.head(), IVec2::new(10, 10));
        assert_eq!(game.pending_direction(), Some(Direction::Up));

        game.resume();
        game.tick();
        assert_eq!(game.head(), IVec2::new(10, 9));
    }

    #[test]
    fn test_pause_noop_outside_running() {
        let mut game = game_with(MemoryScoreStore::new().shared(), 1);
        game.pause();
        assert_eq!(game.run_state, RunState::Idle);
        game.resume();
        assert_eq!(game.run_state, RunState::Idle);
    }

    #[test]
    fn test_reset_clears_run() {
        let mut game = running_game(9);
        game.body = VecDeque::from([IVec2::new(5, 5)]);
        game.direction = Some(Direction::Right);
        game.target = IVec2::new(6, 5);
        game.tick();
        assert_eq!(game.score, 1);

        game.reset();
        assert_eq!(game.run_state, RunState::Idle);
        assert_eq!(game.score, 0);
        assert_eq!(body_vec(&game), vec![IVec2::new(10, 10)]);
        assert_eq!(game.direction, None);
        assert!(!game.is_occupied(game.target));
        // Best survives a reset
        assert_eq!(game.best(), 1);
    }

    #[test]
    fn test_start_from_over_keeps_score() {
        let mut game = running_game(9);
        game.score = 4;
        game.body = VecDeque::from([IVec2::new(0, 0)]);
        game.direction = Some(Direction::Left);
        game.tick();
        assert_eq!(game.run_state, RunState::Over);

        game.start();
        assert_eq!(game.run_state, RunState::Running);
        assert_eq!(game.score, 4);
        assert_eq!(body_vec(&game), vec![IVec2::new(10, 10)]);
        assert_eq!(game.direction, None);
    }

    #[test]
    fn test_restart_from_over_is_fresh() {
        let mut game = running_game(9);
        game.score = 4;
        game.run_state = RunState::Over;
        game.apply(Command::Start);
        assert_eq!(game.run_state, RunState::Running);
        assert_eq!(game.score, 0);
    }

    #[test]
    fn test_start_ignored_while_running() {
        let mut game = running_game(9);
        game.direction = Some(Direction::Up);
        game.tick();
        game.start();
        assert_eq!(game.head(), IVec2::new(10, 9));
    }

    #[test]
    fn test_best_score_persisted() {
        let store = MemoryScoreStore::new().shared();
        let mut game = game_with(store.clone(), 5);
        game.start();
        game.body = VecDeque::from([IVec2::new(5, 5)]);
        game.direction = Some(Direction::Right);
        game.target = IVec2::new(6, 5);

        let events = game.tick();

        assert!(events.contains(&GameEvent::NewBest(1)));
        assert_eq!(store.borrow().get("snake"), Some(1));

        game.reset();
        game.start();
        game.body = VecDeque::from([IVec2::new(0, 0)]);
        game.direction = Some(Direction::Up);
        let events = game.tick();
        assert_eq!(events, vec![GameEvent::GameOver { score: 0, best: 1 }]);
    }

    #[test]
    fn test_full_board_ends_run() {
        let config = GridConfig {
            width: 2,
            height: 1,
            start: (0, 0),
            first_target: (1, 0),
            ..GridConfig::default()
        };
        let best = BestScore::load("snake", MemoryScoreStore::new().shared());
        let mut game = GridGame::new(config, best, 1);
        game.start();
        game.set_direction(Direction::Right);

        let events = game.tick();

        assert_eq!(game.body.len(), 2);
        assert_eq!(game.score, 1);
        assert_eq!(game.run_state, RunState::Over);
        assert!(matches!(events.last(), Some(GameEvent::GameOver { score: 1, .. })));
    }

    #[test]
    fn test_target_found_on_crowded_board() {
        let config = GridConfig {
            width: 3,
            height: 3,
            start: (0, 0),
            first_target: (2, 2),
            ..GridConfig::default()
        };
        let best = BestScore::load("snake", MemoryScoreStore::new().shared());
        let mut game = GridGame::new(config, best, 11);
        game.body = (0..3)
            .flat_map(|y| (0..3).map(move |x| IVec2::new(x, y)))
            .filter(|c| *c != IVec2::new(1, 1))
            .collect();
        assert_eq!(game.place_target(), Some(IVec2::new(1, 1)));
    }

    #[test]
    fn test_same_seed_same_targets() {
        let mut a = running_game(1234);
        let mut b = running_game(1234);
        for game in [&mut a, &mut b] {
            game.body = VecDeque::from([IVec2::new(5, 5)]);
            game.direction = Some(Direction::Right);
            game.target = IVec2::new(6, 5);
            game.tick();
        }
        assert_eq!(a.target, b.target);
    }

    fn arb_direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    proptest! {
        #[test]
        fn body_grows_by_at_most_one(seed in any::<u64>(), moves in prop::collection::vec(arb_direction(), 1..200)) {
            let mut game = running_game(seed);
            for dir in moves {
                if game.run_state != RunState::Running {
                    break;
                }
                game.set_direction(dir);
                let before = game.body.len();
                let score_before = game.score;
                game.tick();
                let after = game.body.len();
                prop_assert!(after == before || after == before + 1);
                prop_assert_eq!(after == before + 1, game.score > score_before);
                prop_assert!(game.score >= score_before);
            }
        }

        #[test]
        fn target_never_on_body(seed in any::<u64>(), moves in prop::collection::vec(arb_direction(), 1..200)) {
            let mut game = running_game(seed);
            for dir in moves {
                if game.run_state != RunState::Running {
                    break;
                }
                game.set_direction(dir);
                game.tick();
                if game.run_state == RunState::Running {
                    prop_assert!(!game.is_occupied(game.target));
                    prop_assert!(game.in_bounds(game.target));
                }
            }
        }

        #[test]
        fn body_never_self_overlaps(seed in any::<u64>(), moves in prop::collection::vec(arb_direction(), 1..200)) {
            let mut game = running_game(seed);
            for dir in moves {
                game.set_direction(dir);
                game.tick();
                let mut cells: Vec<(i32, i32)> = game.body.iter().map(|c| (c.x, c.y)).collect();
                cells.sort_unstable();
                cells.dedup();
                prop_assert_eq!(cells.len(), game.body.len());
            }
        }
    }
}
