//! Per-connection read/parse/respond loop

use crate::game::Game;
use crate::registry::Connection;
use log::{debug, info, warn};
use shared::{parse_guess, INVALID_GUESS_MESSAGE};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Serves one player until the read side fails or the peer closes.
///
/// Every complete line is treated as a guess. Invalid input gets a retry
/// prompt, wrong guesses get a private hint, and a correct guess is announced
/// through the game's broadcast. Write failures are only logged; the loop
/// ends on read failure alone, after which the connection is unregistered.
pub async fn handle_connection<R>(game: Arc<Game>, connection: Connection, reader: R)
where
    R: AsyncRead + Unpin,
{
    let addr = connection.addr();
    info!("Received connection from {}", addr);

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                info!("Connection {} closed by peer", addr);
                break;
            }
            Ok(_) if !buf.ends_with(b"\n") => {
                // EOF in the middle of a line; the fragment is never evaluated
                info!("Connection {} closed mid-line", addr);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Error reading guess from {}: {}", addr, e);
                break;
            }
        }

        // Bytes that are not UTF-8 are bad input like any other non-number
        let line = String::from_utf8_lossy(&buf);
        let guess = match parse_guess(&line) {
            Ok(guess) => guess,
            Err(e) => {
                warn!("Invalid guess {:?} from {}: {}", line.trim(), addr, e);
                send_private(&connection, INVALID_GUESS_MESSAGE).await;
                continue;
            }
        };

        let feedback = game.submit_guess(&connection, guess).await;
        if let Some(message) = feedback.private_message() {
            send_private(&connection, message).await;
        }
    }

    game.unregister(connection.id()).await;
    debug!("Handler for {} finished", addr);
}

async fn send_private(connection: &Connection, message: &str) {
    if let Err(e) = connection.send(message).await {
        warn!("Error writing to {}: {}", connection.addr(), e);
    }
}
