//! TCP listener and accept loop

use crate::game::Game;
use crate::handler::handle_connection;
use crate::round::RoundState;
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Accepts players and hands each one to its own handler task
pub struct Server {
    listener: TcpListener,
    game: Arc<Game>,
}

impl Server {
    /// Binds the listening socket and starts the first round.
    ///
    /// A bind failure is returned to the caller, which is expected to treat
    /// it as fatal.
    pub async fn bind(
        addr: &str,
        round: RoundState,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Server {
            listener,
            game: Arc::new(Game::new(round)),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn game(&self) -> Arc<Game> {
        Arc::clone(&self.game)
    }

    /// Runs the accept loop until accepting fails.
    ///
    /// Each connection's write half is registered before its handler starts,
    /// so it receives broadcasts from the moment it is accepted.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        loop {
            let (stream, addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    return Err(e.into());
                }
            };

            let (reader, writer) = stream.into_split();
            let connection = self.game.register(addr, Box::new(writer)).await;

            tokio::spawn(handle_connection(Arc::clone(&self.game), connection, reader));
        }
    }
}
