//! Shared game state: the active round and the connections that play it
//!
//! Both live behind a single lock. Comparing a guess, replacing the secret
//! and announcing the winner happen in one critical section, so two players
//! can never win the same round.

use crate::registry::{BoxedWriter, Connection, ConnectionRegistry};
use crate::round::RoundState;
use log::{debug, info};
use shared::{winner_announcement, Feedback};
use std::net::SocketAddr;
use tokio::sync::Mutex;

pub struct GameState {
    pub round: RoundState,
    pub registry: ConnectionRegistry,
}

pub struct Game {
    state: Mutex<GameState>,
}

impl Game {
    /// Creates the game and starts its first round
    pub fn new(mut round: RoundState) -> Self {
        round.start_new_round();
        Self {
            state: Mutex::new(GameState {
                round,
                registry: ConnectionRegistry::new(),
            }),
        }
    }

    pub async fn register(&self, addr: SocketAddr, writer: BoxedWriter) -> Connection {
        let mut state = self.state.lock().await;
        state.registry.register(addr, writer)
    }

    pub async fn unregister(&self, connection_id: u64) -> bool {
        let mut state = self.state.lock().await;
        state.registry.unregister(connection_id)
    }

    pub async fn current_number(&self) -> u32 {
        self.state.lock().await.round.current_number()
    }

    pub async fn rounds_played(&self) -> u64 {
        self.state.lock().await.round.rounds_played()
    }

    pub async fn connection_count(&self) -> usize {
        self.state.lock().await.registry.len()
    }

    pub async fn is_registered(&self, connection_id: u64) -> bool {
        self.state.lock().await.registry.contains(connection_id)
    }

    /// Compares a guess with the active secret.
    ///
    /// On a correct guess the next round is started and the winner is
    /// announced to every registered connection before the lock is released.
    /// Private low/high replies are left to the caller.
    pub async fn submit_guess(&self, connection: &Connection, guess: i64) -> Feedback {
        let mut state = self.state.lock().await;
        let feedback = Feedback::evaluate(guess, state.round.current_number());
        debug!(
            "Guess {} from {} is {}",
            guess,
            connection.addr(),
            feedback
        );

        if feedback == Feedback::Correct {
            let announcement = winner_announcement(connection.addr());
            state.round.start_new_round();
            let delivered = state.registry.broadcast(&announcement).await;
            info!(
                "Player {} won, announced to {}/{} connections",
                connection.addr(),
                delivered,
                state.registry.len()
            );
        }

        feedback
    }
}
