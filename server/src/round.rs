//! Secret number for the active round

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use shared::{SECRET_MAX, SECRET_MIN};

/// Holds the current secret and the random source used to draw new ones.
///
/// Not synchronized on its own; the server keeps it inside the same lock as
/// the connection registry so a round change and its announcement happen
/// together.
pub struct RoundState {
    current: u32,
    rounds_played: u64,
    rng: Box<dyn RngCore + Send + Sync>,
}

impl RoundState {
    /// Uses the given random source. The first round is not started yet.
    pub fn with_rng(rng: impl RngCore + Send + Sync + 'static) -> Self {
        Self {
            current: SECRET_MIN,
            rounds_played: 0,
            rng: Box::new(rng),
        }
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible sequence of secrets for tests and replayable sessions
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn current_number(&self) -> u32 {
        self.current
    }

    /// Number of rounds started so far, including the first one
    pub fn rounds_played(&self) -> u64 {
        self.rounds_played
    }

    /// Draws a fresh secret and makes it the only active one.
    ///
    /// The new value is drawn independently and may equal the previous one.
    pub fn start_new_round(&mut self) -> u32 {
        self.current = self.rng.gen_range(SECRET_MIN..=SECRET_MAX);
        self.rounds_played += 1;
        info!("Round {} started", self.rounds_played);
        debug!("Secret for round {} is {}", self.rounds_played, self.current);
        self.current
    }
}
