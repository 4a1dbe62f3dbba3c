use crate::boundary::Boundary;
use crate::config::{Difficulty, SessionConfig};
use crate::contact::{self, Contact};
use crate::entity::{Direction, Hazard, Player, Position, Spin};
use crate::error::ConfigError;
use crate::grid::{CellState, Grid};
use crate::hazard::{Patroller, Roamer};
use crate::partition;
use crate::trail::{Trail, TrailController, TrailStep};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Menu,
    Playing,
    /// A life was lost and lives remain; play resumes when the count runs out.
    RoundTransition { ticks_left: u32 },
    Lost,
    Won,
}

/// What the player is asking for on this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub direction: Option<Direction>,
    pub draw: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LifeLossCause {
    SelfCrossing { at: Position },
    HazardContact(Contact),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionEvent {
    RoundStarted { difficulty: Difficulty },
    TrailStarted { anchor: Position },
    TrailCommitted { region_cells: usize, trail_cells: usize },
    LifeLost { cause: LifeLossCause, lives_left: u32 },
    Won,
    Lost,
}

/// Read-only view handed to renderers between ticks.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot<'a> {
    pub phase: Phase,
    pub difficulty: Difficulty,
    pub lives: u32,
    pub claimed_fraction: f64,
    pub win_threshold: f64,
    pub player: Position,
    pub facing: Direction,
    pub drawing: bool,
    pub roamers: Vec<Position>,
    pub patrollers: Vec<Position>,
    pub trail: Option<&'a Trail>,
    pub grid: &'a Grid,
    /// Events raised since the previous tick.
    pub events: &'a [SessionEvent],
}

enum PlayerOutcome {
    SelfCrossing(Position),
    Closed(Trail),
}

pub struct Session {
    config: SessionConfig,
    phase: Phase,
    difficulty: Difficulty,
    grid: Grid,
    boundary: Boundary,
    player: Player,
    trail: TrailController,
    roamers: Vec<Roamer>,
    patrollers: Vec<Patroller>,
    lives: u32,
    rng: StdRng,
    events: Vec<SessionEvent>,
    delivered: usize,
}

impl Session {
    /// Creates a session sitting in the menu. Hazard motion is seeded from
    /// the operating system.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Same as [`Session::new`] but reproducible.
    pub fn with_seed(config: SessionConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SessionConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height);
        let boundary = Boundary::new(&grid);
        let player = Player::new(player_spawn(&grid), config.player_step_ticks);

        let mut session = Self {
            difficulty: config.difficulty,
            lives: config.difficulty.lives(),
            config,
            phase: Phase::Menu,
            grid,
            boundary,
            player,
            trail: TrailController::new(),
            roamers: Vec::new(),
            patrollers: Vec::new(),
            rng,
            events: Vec::new(),
            delivered: 0,
        };
        session.reset_field(session.difficulty);
        Ok(session)
    }

    /// Clears the field, places everyone at their start cells and starts play.
    pub fn new_round(&mut self, difficulty: Difficulty) {
        self.reset_field(difficulty);
        self.phase = Phase::Playing;
        log::info!(
            "new {} round on a {}x{} field",
            difficulty,
            self.grid.width(),
            self.grid.height()
        );
        self.events.push(SessionEvent::RoundStarted { difficulty });
    }

    /// Back to the menu from any phase.
    pub fn restart(&mut self) {
        self.trail.abort(&mut self.grid);
        self.phase = Phase::Menu;
    }

    /// Advances one frame.
    pub fn tick(&mut self, input: InputState) -> SessionSnapshot<'_> {
        self.events.drain(..self.delivered);

        match self.phase {
            Phase::Playing => self.play_tick(input),
            Phase::RoundTransition { ticks_left } => {
                self.phase = if ticks_left <= 1 {
                    Phase::Playing
                } else {
                    Phase::RoundTransition {
                        ticks_left: ticks_left - 1,
                    }
                };
            }
            Phase::Menu | Phase::Lost | Phase::Won => {}
        }

        self.delivered = self.events.len();
        self.snapshot()
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            phase: self.phase,
            difficulty: self.difficulty,
            lives: self.lives,
            claimed_fraction: self.grid.area_claimed_fraction(),
            win_threshold: self.config.win_threshold,
            player: self.player.position,
            facing: self.player.facing,
            drawing: self.trail.is_drawing(),
            roamers: self.roamers.iter().map(|r| r.position).collect(),
            patrollers: self.patrollers.iter().map(|p| p.position).collect(),
            trail: self.trail.trail(),
            grid: &self.grid,
            events: &self.events,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn roamers(&self) -> &[Roamer] {
        &self.roamers
    }

    pub fn patrollers(&self) -> &[Patroller] {
        &self.patrollers
    }

    pub fn trail(&self) -> Option<&Trail> {
        self.trail.trail()
    }

    pub fn claimed_fraction(&self) -> f64 {
        self.grid.area_claimed_fraction()
    }

    fn reset_field(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.lives = difficulty.lives();
        self.grid = Grid::new(self.config.width, self.config.height);
        self.boundary = Boundary::new(&self.grid);
        self.trail = TrailController::new();
        self.player = Player::new(player_spawn(&self.grid), self.config.player_step_ticks);
        self.roamers = spawn_roamers(&self.grid, &self.config, difficulty, &mut self.rng);
        self.patrollers = spawn_patrollers(&self.grid, &self.boundary, &self.config, difficulty);
    }

    fn hazards(&self) -> impl Iterator<Item = &dyn Hazard> + '_ {
        self.roamers
            .iter()
            .map(|r| r as &dyn Hazard)
            .chain(self.patrollers.iter().map(|p| p as &dyn Hazard))
    }

    // input -> player/trail -> hazards -> contact -> partition -> win check
    fn play_tick(&mut self, input: InputState) {
        let closed = match self.update_player(input) {
            Some(PlayerOutcome::SelfCrossing(at)) => {
                self.lose_life(LifeLossCause::SelfCrossing { at });
                return;
            }
            Some(PlayerOutcome::Closed(trail)) => Some(trail),
            None => None,
        };

        self.update_hazards();

        let active = closed.as_ref().or(self.trail.trail());
        if let Some(contact) =
            contact::detect(self.player.position, active, &self.grid, self.hazards())
        {
            if let Some(trail) = &closed {
                trail.revert(&mut self.grid);
            }
            self.lose_life(LifeLossCause::HazardContact(contact));
            return;
        }

        if let Some(trail) = closed {
            self.commit(&trail);
        }
        self.check_win();
    }

    fn update_player(&mut self, input: InputState) -> Option<PlayerOutcome> {
        if !self.player.step_ready() {
            return None;
        }
        let direction = input.direction?;
        let drawing = self.trail.is_drawing();
        if drawing && direction == self.player.facing.opposite() {
            return None;
        }

        let from = self.player.position;
        let target = from.moved(direction);

        if drawing {
            return match self.trail.extend(&mut self.grid, target, input.draw) {
                Ok(TrailStep::Extended(pos)) => {
                    self.move_player(pos, direction);
                    None
                }
                Ok(TrailStep::Blocked) => None,
                Ok(TrailStep::SelfCrossing { at, .. }) => Some(PlayerOutcome::SelfCrossing(at)),
                Ok(TrailStep::Closed(trail)) => {
                    self.move_player(target, direction);
                    Some(PlayerOutcome::Closed(trail))
                }
                Err(err) => {
                    log::debug!("move to {target} rejected: {err}");
                    None
                }
            };
        }

        match self.grid.classify(target) {
            CellState::Open if input.draw => match self.trail.begin(&mut self.grid, from, target) {
                Ok(()) => {
                    self.move_player(target, direction);
                    self.events.push(SessionEvent::TrailStarted { anchor: from });
                }
                Err(err) => log::debug!("could not start a trail at {from}: {err}"),
            },
            state if state.is_land() && self.grid.in_bounds(target) => {
                // idle players keep to the walk unless they were already off it
                if self.boundary.contains(target) || !self.boundary.contains(from) {
                    self.move_player(target, direction);
                }
            }
            _ => {}
        }
        None
    }

    fn move_player(&mut self, to: Position, facing: Direction) {
        self.player.position = to;
        self.player.facing = facing;
    }

    fn update_hazards(&mut self) {
        let turn_chance = self.config.roamer_turn_chance;
        for roamer in &mut self.roamers {
            roamer.advance(&self.grid, &mut self.rng, turn_chance);
        }
        let reverse_every = self.config.patroller_reverse_steps;
        for patroller in &mut self.patrollers {
            patroller.advance(&self.boundary, reverse_every);
        }
    }

    fn lose_life(&mut self, cause: LifeLossCause) {
        self.trail.abort(&mut self.grid);
        self.lives = self.lives.saturating_sub(1);
        log::info!("life lost to {:?}, {} left", cause, self.lives);
        self.events.push(SessionEvent::LifeLost {
            cause,
            lives_left: self.lives,
        });
        self.respawn();

        if self.lives == 0 {
            log::info!(
                "game over with {:.1}% claimed",
                self.grid.area_claimed_fraction() * 100.0
            );
            self.phase = Phase::Lost;
            self.events.push(SessionEvent::Lost);
        } else if self.config.transition_ticks == 0 {
            self.phase = Phase::Playing;
        } else {
            self.phase = Phase::RoundTransition {
                ticks_left: self.config.transition_ticks,
            };
        }
    }

    fn respawn(&mut self) {
        let spawn = self.player.spawn();
        let at = self.boundary.nearest(spawn).unwrap_or(spawn);
        self.player.respawn_at(at);
        for roamer in &mut self.roamers {
            roamer.respawn(&self.grid);
        }
        for patroller in &mut self.patrollers {
            patroller.respawn(&self.boundary);
        }
    }

    fn commit(&mut self, trail: &Trail) {
        let roamers: Vec<Position> = self.roamers.iter().map(|r| r.position).collect();
        let closed_at = trail.end().unwrap_or(self.player.position);
        let claim = partition::commit(&mut self.grid, trail, &roamers, closed_at);

        self.boundary.refresh_around(&self.grid, &claim.changed);
        for roamer in &mut self.roamers {
            roamer.relocate(&self.grid);
        }
        for patroller in &mut self.patrollers {
            patroller.remap(&self.boundary);
        }
        if !self.boundary.contains(self.player.position) {
            if let Some(nearest) = self.boundary.nearest(self.player.position) {
                self.player.position = nearest;
            }
        }

        log::info!(
            "claimed {} cells, {:.1}% of the field is land",
            claim.total(),
            self.grid.area_claimed_fraction() * 100.0
        );
        self.events.push(SessionEvent::TrailCommitted {
            region_cells: claim.region_cells,
            trail_cells: claim.trail_cells,
        });
    }

    fn check_win(&mut self) {
        if self.grid.area_claimed_fraction() >= self.config.win_threshold {
            log::info!("round won");
            self.phase = Phase::Won;
            self.events.push(SessionEvent::Won);
        }
    }
}

fn player_spawn(grid: &Grid) -> Position {
    Position::new(grid.width() / 2, grid.height() - 1)
}

fn spawn_roamers<R: Rng + ?Sized>(
    grid: &Grid,
    config: &SessionConfig,
    difficulty: Difficulty,
    rng: &mut R,
) -> Vec<Roamer> {
    let (w, h) = (grid.width(), grid.height());
    [Position::new(w / 3, h / 3), Position::new(2 * w / 3, 2 * h / 3)]
        .into_iter()
        .take(difficulty.roamers())
        .map(|spawn| {
            let heading = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
            let mut roamer = Roamer::new(spawn, heading, config.roamer_step_ticks);
            roamer.respawn(grid);
            roamer
        })
        .collect()
}

fn spawn_patrollers(
    grid: &Grid,
    boundary: &Boundary,
    config: &SessionConfig,
    difficulty: Difficulty,
) -> Vec<Patroller> {
    let (w, h) = (grid.width(), grid.height());
    let top = Position::new(w - 1 - w / 2, 0);
    let top = boundary.nearest(top).unwrap_or(top);

    let mut patrollers = vec![
        Patroller::new(top, Spin::Clockwise, config.patroller_step_ticks),
        Patroller::new(top, Spin::CounterClockwise, config.patroller_step_ticks),
    ];
    if difficulty.patrollers() > 2 {
        let left = Position::new(0, h / 2);
        let left = boundary.nearest(left).unwrap_or(left);
        patrollers.push(Patroller::new(left, Spin::Clockwise, config.patroller_step_ticks));
    }
    patrollers
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn quick_config(width: i32, height: i32) -> SessionConfig {
        SessionConfig {
            width,
            height,
            player_step_ticks: 1,
            roamer_step_ticks: 1,
            patroller_step_ticks: 1,
            roamer_turn_chance: 0.0,
            ..SessionConfig::default()
        }
    }

    /// A playing session with no hazards on the field.
    fn empty_session(width: i32, height: i32) -> Session {
        let mut session = Session::with_seed(quick_config(width, height), 42).unwrap();
        session.new_round(Difficulty::Normal);
        session.roamers.clear();
        session.patrollers.clear();
        session
    }

    fn steer(direction: Direction) -> InputState {
        InputState {
            direction: Some(direction),
            draw: true,
        }
    }

    #[test]
    fn test_menu_round_restart_flow() {
        let mut session = Session::with_seed(SessionConfig::default(), 1).unwrap();
        assert_eq!(session.phase(), Phase::Menu);
        assert_eq!(session.tick(InputState::default()).phase, Phase::Menu);

        session.new_round(Difficulty::Hard);
        let snapshot = session.tick(InputState::default());
        assert_eq!(snapshot.phase, Phase::Playing);
        assert_eq!(
            snapshot.events,
            &[SessionEvent::RoundStarted {
                difficulty: Difficulty::Hard
            }]
        );
        assert_eq!(snapshot.roamers.len(), 2);
        assert_eq!(snapshot.patrollers.len(), 3);
        assert_eq!(snapshot.lives, 9);

        // events are only reported once
        assert!(session.tick(InputState::default()).events.is_empty());

        session.restart();
        assert_eq!(session.tick(InputState::default()).phase, Phase::Menu);
    }

    #[test]
    fn test_spawn_layout() {
        let mut session = Session::with_seed(SessionConfig::default(), 7).unwrap();
        session.new_round(Difficulty::Normal);

        assert_eq!(session.player().position, Position::new(40, 59));
        assert_eq!(session.roamers().len(), 1);
        assert_eq!(session.roamers()[0].position, Position::new(26, 20));
        assert_eq!(session.patrollers().len(), 2);
        assert_eq!(session.patrollers()[0].position, Position::new(39, 0));
        assert_ne!(session.patrollers()[0].spin, session.patrollers()[1].spin);
        assert!(session.patrollers().iter().all(|p| session.boundary().contains(p.position)));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SessionConfig {
            width: 2,
            ..SessionConfig::default()
        };
        assert!(matches!(
            Session::with_seed(config, 0),
            Err(ConfigError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_idle_player_keeps_to_the_walk() {
        let mut session = empty_session(10, 10);
        let start = session.player().position;

        // into open water without draw held: refused
        session.tick(InputState {
            direction: Some(Direction::Up),
            draw: false,
        });
        assert_eq!(session.player().position, start);

        session.tick(InputState {
            direction: Some(Direction::Left),
            draw: false,
        });
        assert_eq!(session.player().position, start.moved(Direction::Left));
    }

    #[test]
    fn test_player_halts_when_draw_released() {
        let mut session = empty_session(10, 10);
        session.tick(steer(Direction::Up));
        let head = session.player().position;

        session.tick(InputState {
            direction: Some(Direction::Up),
            draw: false,
        });

        assert_eq!(session.player().position, head);
        assert_eq!(session.trail().map(Trail::len), Some(1));
    }

    #[test]
    fn test_no_reversal_while_drawing() {
        let mut session = empty_session(10, 10);
        session.tick(steer(Direction::Up));
        session.tick(steer(Direction::Up));
        let head = session.player().position;

        session.tick(steer(Direction::Down));

        assert_eq!(session.player().position, head);
        assert_eq!(session.trail().map(Trail::len), Some(2));
    }

    #[test]
    fn test_win_fires_on_the_tick_that_reaches_threshold() {
        let mut session = empty_session(10, 10);
        // 8x8 interior: 39 claimed cells, one short strip away from 48
        for y in 1..=4 {
            for x in 1..=8 {
                session.grid.set_cell(Position::new(x, y), CellState::Claimed).unwrap();
            }
        }
        for x in 1..=7 {
            session.grid.set_cell(Position::new(x, 5), CellState::Claimed).unwrap();
        }
        session.boundary.rebuild(&session.grid);
        session.player.position = Position::new(3, 5);

        for _ in 0..3 {
            assert_eq!(session.tick(steer(Direction::Down)).phase, Phase::Playing);
        }
        assert_eq!(session.grid().claimed_cells(), 39);

        let snapshot = session.tick(steer(Direction::Down));

        // left pocket of 6 cells plus 3 trail cells
        assert_eq!(snapshot.phase, Phase::Won);
        assert_eq!(snapshot.claimed_fraction, 0.75);
        assert!(snapshot.events.contains(&SessionEvent::TrailCommitted {
            region_cells: 6,
            trail_cells: 3
        }));
        assert!(snapshot.events.contains(&SessionEvent::Won));
    }

    #[test]
    fn test_self_crossing_costs_exactly_one_life() {
        let mut session = empty_session(10, 10);
        let open_before = session.grid().open_cells();
        let moves = [
            Direction::Up,
            Direction::Up,
            Direction::Up,
            Direction::Right,
            Direction::Down,
        ];
        for direction in moves {
            session.tick(steer(direction));
        }
        assert_eq!(session.grid().trail_cells(), 5);

        let snapshot = session.tick(steer(Direction::Left));

        let losses = snapshot
            .events
            .iter()
            .filter(|e| matches!(e, SessionEvent::LifeLost { .. }))
            .count();
        assert_eq!(losses, 1);
        assert_eq!(snapshot.lives, 8);
        assert!(matches!(snapshot.phase, Phase::RoundTransition { .. }));
        assert!(!snapshot.drawing);
        assert_eq!(session.grid().trail_cells(), 0);
        assert_eq!(session.grid().open_cells(), open_before);
        assert_eq!(session.player().position, Position::new(5, 9));
    }

    #[test]
    fn test_round_transition_counts_down() {
        let mut config = quick_config(10, 10);
        config.transition_ticks = 2;
        let mut session = Session::with_seed(config, 3).unwrap();
        session.new_round(Difficulty::Normal);
        session.roamers.clear();
        session.patrollers.clear();

        session.lose_life(LifeLossCause::SelfCrossing {
            at: Position::new(1, 1),
        });
        assert_eq!(session.phase(), Phase::RoundTransition { ticks_left: 2 });
        assert_eq!(
            session.tick(InputState::default()).phase,
            Phase::RoundTransition { ticks_left: 1 }
        );
        assert_eq!(session.tick(InputState::default()).phase, Phase::Playing);
    }

    #[test]
    fn test_last_life_ends_the_game() {
        let mut session = empty_session(10, 10);
        session.lives = 1;

        session.lose_life(LifeLossCause::SelfCrossing {
            at: Position::new(1, 1),
        });
        let snapshot = session.tick(steer(Direction::Up));

        assert_eq!(snapshot.phase, Phase::Lost);
        assert_eq!(snapshot.lives, 0);
        assert!(snapshot.events.contains(&SessionEvent::Lost));
    }

    #[test]
    fn test_roamer_strike_cuts_the_trail() {
        let mut session = empty_session(12, 12);
        session.roamers = vec![Roamer::new(Position::new(3, 9), Direction::Right, 1)];

        session.tick(steer(Direction::Up));
        session.tick(steer(Direction::Up));
        assert_eq!(session.grid().trail_cells(), 2);
        assert_eq!(session.lives(), 9);

        let snapshot = session.tick(InputState::default());

        assert_eq!(snapshot.lives, 8);
        assert!(snapshot.events.contains(&SessionEvent::LifeLost {
            cause: LifeLossCause::HazardContact(Contact::Trail {
                hazard: crate::entity::HazardKind::Roamer,
                at: Position::new(6, 9),
            }),
            lives_left: 8,
        }));
        assert_eq!(session.grid().trail_cells(), 0);
    }

    #[test]
    fn test_hazard_contact_respawns_everyone() {
        let mut session = empty_session(12, 12);
        session.roamers = vec![Roamer::new(Position::new(3, 7), Direction::Right, 1)];
        session.patrollers = vec![Patroller::new(Position::new(2, 0), Spin::Clockwise, 1)];

        // the roamer runs along row 7 and waits at (6, 7) for the trail head
        for _ in 0..3 {
            session.tick(steer(Direction::Up));
        }
        assert_eq!(session.roamers()[0].position, Position::new(6, 7));
        assert_eq!(session.patrollers()[0].position, Position::new(5, 0));
        assert_eq!(session.grid().trail_cells(), 3);

        let snapshot = session.tick(steer(Direction::Up));

        assert_eq!(snapshot.lives, 8);
        assert!(snapshot.events.contains(&SessionEvent::LifeLost {
            cause: LifeLossCause::HazardContact(Contact::Player {
                hazard: crate::entity::HazardKind::Roamer,
                at: Position::new(6, 7),
            }),
            lives_left: 8,
        }));
        assert_eq!(session.grid().trail_cells(), 0);
        assert!(session.trail().is_none());
        let roamer = &session.roamers()[0];
        assert_eq!(roamer.position, roamer.spawn());
        assert_eq!(session.patrollers()[0].position, Position::new(2, 0));
        assert_eq!(session.player().position, Position::new(6, 11));
    }

    #[test]
    fn test_trail_closed_onto_a_hazard_is_reverted_not_claimed() {
        let mut session = empty_session(12, 12);
        // parked on the closing cell; its timer never fires during the run
        session.patrollers = vec![Patroller::new(Position::new(6, 0), Spin::Clockwise, 100)];

        for _ in 0..10 {
            session.tick(steer(Direction::Up));
        }
        assert_eq!(session.grid().trail_cells(), 10);

        let snapshot = session.tick(steer(Direction::Up));

        let causes: Vec<_> = snapshot
            .events
            .iter()
            .filter_map(|event| match event {
                SessionEvent::LifeLost { cause, .. } => Some(*cause),
                _ => None,
            })
            .collect();
        assert_eq!(
            causes,
            vec![LifeLossCause::HazardContact(Contact::Player {
                hazard: crate::entity::HazardKind::Patroller,
                at: Position::new(6, 0),
            })]
        );
        assert!(!snapshot
            .events
            .iter()
            .any(|event| matches!(event, SessionEvent::TrailCommitted { .. })));
        assert_eq!(session.grid().claimed_cells(), 0);
        assert_eq!(session.grid().trail_cells(), 0);
        assert_eq!(session.lives(), 8);
    }

    #[test]
    fn test_commit_snaps_hazards_back_onto_their_ground() {
        let mut session = empty_session(12, 12);
        // roamers parked on both sides of the line; slow timers keep them put
        session.roamers = vec![
            Roamer::new(Position::new(1, 5), Direction::Up, 100),
            Roamer::new(Position::new(8, 5), Direction::Up, 100),
        ];
        session.patrollers = vec![Patroller::new(Position::new(0, 6), Spin::Clockwise, 50)];
        session.player.position = Position::new(3, 11);

        for _ in 0..11 {
            session.tick(steer(Direction::Up));
        }

        assert_eq!(session.grid().classify(Position::new(2, 5)), CellState::Claimed);
        assert!(session
            .roamers()
            .iter()
            .all(|r| session.grid().classify(r.position) == CellState::Open));
        assert!(session.boundary().contains(session.patrollers()[0].position));
        assert!(session.boundary().contains(session.player().position));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut session = Session::with_seed(quick_config(8, 6), 11).unwrap();
        session.new_round(Difficulty::Normal);
        let snapshot = session.tick(steer(Direction::Up));

        let json = serde_json::to_string(&snapshot).unwrap();

        assert!(json.contains("\"phase\""));
        assert!(json.contains("\"grid\""));
    }

    fn input_strategy() -> impl Strategy<Value = InputState> {
        (
            prop::option::of(prop_oneof![
                Just(Direction::Up),
                Just(Direction::Down),
                Just(Direction::Left),
                Just(Direction::Right),
            ]),
            prop::bool::weighted(0.8),
        )
            .prop_map(|(direction, draw)| InputState { direction, draw })
    }

    proptest! {
        #[test]
        fn prop_session_invariants_hold_every_tick(
            seed in any::<u64>(),
            hard in any::<bool>(),
            inputs in prop::collection::vec(input_strategy(), 1..400),
        ) {
            let mut config = quick_config(16, 12);
            config.roamer_turn_chance = 0.1;
            config.transition_ticks = 0;
            let difficulty = if hard { Difficulty::Hard } else { Difficulty::Normal };
            let mut session = Session::with_seed(config, seed).unwrap();
            session.new_round(difficulty);

            let mut last_fraction = 0.0;
            for input in inputs {
                let fraction = session.tick(input).claimed_fraction;
                prop_assert!(fraction >= last_fraction);
                prop_assert!(fraction <= 1.0);
                last_fraction = fraction;

                let grid = session.grid();
                for x in 0..grid.width() {
                    prop_assert_eq!(grid.classify(Position::new(x, 0)), CellState::Border);
                    let bottom = Position::new(x, grid.height() - 1);
                    prop_assert_eq!(grid.classify(bottom), CellState::Border);
                }
                for y in 0..grid.height() {
                    prop_assert_eq!(grid.classify(Position::new(0, y)), CellState::Border);
                    let right = Position::new(grid.width() - 1, y);
                    prop_assert_eq!(grid.classify(right), CellState::Border);
                }
                for roamer in session.roamers() {
                    prop_assert_eq!(grid.classify(roamer.position), CellState::Open);
                }
                for patroller in session.patrollers() {
                    prop_assert!(grid.classify(patroller.position).is_land());
                    prop_assert!(session.boundary().contains(patroller.position));
                }
                prop_assert_eq!(
                    grid.trail_cells(),
                    session.trail().map_or(0, Trail::len)
                );
            }
        }
    }
}
