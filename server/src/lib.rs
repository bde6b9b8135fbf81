//! # Guessing Game Server Library
//!
//! A multiplayer number-guessing game served over plain TCP. The server keeps
//! one secret integer in `[1, 100]`; every connected player sends guesses as
//! newline-terminated lines and gets a private "too low" / "too high" hint.
//! The first correct guess is announced to every connected player and a new
//! secret is drawn.
//!
//! ## Module Organization
//!
//! ### Round Module (`round`)
//! The active secret and the injectable random source that draws new ones.
//!
//! ### Registry Module (`registry`)
//! The set of live connections and the broadcast over them. A failed
//! delivery is logged and skipped; membership only changes when a
//! connection's own handler sees the peer go away.
//!
//! ### Game Module (`game`)
//! Puts the round and the registry behind one lock. Checking a guess, drawing
//! the next secret and announcing the winner form a single critical section.
//!
//! ### Handler Module (`handler`)
//! The per-connection loop: read a line, parse it, compare, reply. Invalid
//! input never closes the connection; only a read failure or EOF does.
//!
//! ### Network Module (`network`)
//! The TCP listener. Registers every accepted stream and spawns a handler task
//! for it.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::Server;
//! use server::round::RoundState;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let server = Server::bind("0.0.0.0:8080", RoundState::from_entropy()).await?;
//!
//!     // Runs until accepting a connection fails
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod game;
pub mod handler;
pub mod network;
pub mod registry;
pub mod round;
