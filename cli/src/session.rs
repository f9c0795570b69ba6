use chrono::prelude::*;
use rand::rngs::StdRng;
use sweeper_core::{Coord2, GameState, ShuffleGenerator};

use crate::command::{Button, Command};
use crate::settings::BoardParams;

/// Which terminal state the game reached; the engine only reports that the game is over.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A running game plus everything the shell tracks around it: parameters, timer, and the outcome.
pub struct GameSession {
    params: BoardParams,
    generator: ShuffleGenerator<StdRng>,
    game: GameState,
    outcome: Option<Outcome>,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl GameSession {
    /// With a seed every game of the session is reproducible, otherwise boards come from OS entropy.
    pub fn new(
        params: BoardParams,
        seed: Option<u64>,
        now: DateTime<Utc>,
    ) -> sweeper_core::Result<Self> {
        let mut generator = match seed {
            Some(seed) => ShuffleGenerator::seeded(seed),
            None => ShuffleGenerator::from_os_rng(),
        };
        let game = GameState::with_generator(params.config()?, &mut generator);
        log::info!("New game: {}", params);

        Ok(Self {
            params,
            generator,
            game,
            outcome: None,
            started_at: now,
            ended_at: None,
        })
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn params(&self) -> BoardParams {
        self.params
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Whole seconds since the game started, frozen once it ended.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        let secs = (self.ended_at.unwrap_or(now) - self.started_at).num_seconds();
        u32::try_from(secs.max(0)).unwrap_or(u32::MAX)
    }

    pub fn apply(&mut self, command: Command, now: DateTime<Utc>) -> sweeper_core::Result<Flow> {
        log::debug!("{:?}", command);

        match command {
            Command::Dig(cell) => self.dig(cell, now),
            Command::Flag(cell) => self.flag(cell),
            Command::Hover(cell) => self.game.hover(cell),
            Command::Click { .. } if self.game.is_game_over() => self.start(self.params, now)?,
            Command::Click {
                cell,
                button: Button::Left,
            } => self.dig(cell, now),
            Command::Click {
                cell,
                button: Button::Right,
            } => self.flag(cell),
            Command::New(params) => self.start(params.unwrap_or(self.params), now)?,
            Command::Restart => self.start(self.params, now)?,
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn dig(&mut self, cell: Coord2, now: DateTime<Utc>) {
        let revealed = self.game.reveal(cell);
        if !revealed.has_update() {
            return;
        }
        let loss = revealed.hit_mine();
        let win = !loss && self.game.check_for_win();

        if self.outcome.is_none() {
            self.outcome = match (loss, win) {
                (true, _) => Some(Outcome::Lost),
                (false, true) => Some(Outcome::Won),
                (false, false) => None,
            };
            if let Some(outcome) = self.outcome {
                self.ended_at = Some(now);
                log::info!("{:?} after {} seconds", outcome, self.elapsed_secs(now));
            }
        }
    }

    fn flag(&mut self, cell: Coord2) {
        let marked = self.game.flag(cell);
        if marked.has_update() {
            log::debug!("{:?} {:?}, {} flags left", marked, cell, self.game.remaining_flags());
        }
    }

    fn start(&mut self, params: BoardParams, now: DateTime<Utc>) -> sweeper_core::Result<()> {
        self.game = GameState::with_generator(params.config()?, &mut self.generator);
        self.params = params;
        self.outcome = None;
        self.started_at = now;
        self.ended_at = None;
        log::info!("New game: {}", params);
        Ok(())
    }
}
