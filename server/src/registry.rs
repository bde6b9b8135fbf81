//! Registry of live player connections used for broadcasting
//!
//! Each entry owns the write half of a client socket. Membership follows the
//! handler lifecycle: a connection is added when it is accepted and removed
//! when its handler observes that the peer is gone.

use log::{info, warn};
use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

pub type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Cloneable handle to one client's outbound stream
///
/// The writer sits behind its own lock so a private reply and a broadcast
/// never interleave their bytes on the wire.
#[derive(Clone)]
pub struct Connection {
    id: u64,
    addr: SocketAddr,
    writer: Arc<Mutex<BoxedWriter>>,
}

impl Connection {
    pub fn new(id: u64, addr: SocketAddr, writer: BoxedWriter) -> Self {
        Self {
            id,
            addr,
            writer: Arc::new(Mutex::new(writer)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Writes the whole message and flushes it
    pub async fn send(&self, message: &str) -> io::Result<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(message.as_bytes()).await?;
        writer.flush().await
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("addr", &self.addr)
            .finish()
    }
}

/// Set of currently open connections, keyed by server-assigned ID
pub struct ConnectionRegistry {
    connections: HashMap<u64, Connection>,
    next_connection_id: u64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
            next_connection_id: 1,
        }
    }

    /// Adds a freshly accepted connection and returns its handle
    pub fn register(&mut self, addr: SocketAddr, writer: BoxedWriter) -> Connection {
        // Never hand out an ID that a live connection still holds
        let mut id = self.next_connection_id;
        while self.connections.contains_key(&id) {
            id = id.wrapping_add(1);
        }
        self.next_connection_id = id.wrapping_add(1);

        let connection = Connection::new(id, addr, writer);
        self.connections.insert(id, connection.clone());
        info!(
            "Connection {} registered from {} ({} connected)",
            id,
            addr,
            self.connections.len()
        );

        connection
    }

    /// Removes a connection. Returns false if it was already gone, which is
    /// not an error.
    pub fn unregister(&mut self, connection_id: u64) -> bool {
        match self.connections.remove(&connection_id) {
            Some(connection) => {
                info!(
                    "Connection {} from {} unregistered ({} connected)",
                    connection_id,
                    connection.addr,
                    self.connections.len()
                );
                true
            }
            None => false,
        }
    }

    /// Sends the message to every registered connection.
    ///
    /// A failed send is logged and skipped; it does not remove the recipient.
    /// Returns how many deliveries succeeded.
    pub async fn broadcast(&self, message: &str) -> usize {
        let mut delivered = 0;

        for connection in self.connections.values() {
            match connection.send(message).await {
                Ok(()) => delivered += 1,
                Err(e) => warn!(
                    "Failed to broadcast to connection {} ({}): {}",
                    connection.id, connection.addr, e
                ),
            }
        }

        delivered
    }

    pub fn contains(&self, connection_id: u64) -> bool {
        self.connections.contains_key(&connection_id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{duplex, AsyncReadExt, DuplexStream};

    fn test_addr() -> SocketAddr {
        "127.0.0.1:8080".parse().unwrap()
    }

    fn test_addr2() -> SocketAddr {
        "127.0.0.1:8081".parse().unwrap()
    }

    /// Returns a writer for the registry and the peer end that receives its bytes
    fn pipe() -> (BoxedWriter, DuplexStream) {
        let (local, peer) = duplex(1024);
        (Box::new(local), peer)
    }

    async fn read_exact_string(peer: &mut DuplexStream, len: usize) -> String {
        let mut buf = vec![0u8; len];
        peer.read_exact(&mut buf).await.unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_registry_creation() {
        let registry = ConnectionRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_register_assigns_increasing_ids() {
        let mut registry = ConnectionRegistry::new();
        let (w1, _p1) = pipe();
        let (w2, _p2) = pipe();

        let c1 = registry.register(test_addr(), w1);
        let c2 = registry.register(test_addr2(), w2);

        assert_eq!(c1.id(), 1);
        assert_eq!(c2.id(), 2);
        assert_eq!(c2.addr(), test_addr2());
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(1) && registry.contains(2));
    }

    #[test]
    fn test_register_skips_ids_in_use() {
        let mut registry = ConnectionRegistry::new();
        let (w1, _p1) = pipe();
        let (w2, _p2) = pipe();
        let (w3, _p3) = pipe();

        let first = registry.register(test_addr(), w1);
        registry.next_connection_id = u64::MAX;
        let last = registry.register(test_addr2(), w2);
        // Counter wrapped back onto ids that are still registered
        registry.next_connection_id = first.id();
        let third = registry.register(test_addr2(), w3);

        assert_eq!(last.id(), u64::MAX);
        assert_ne!(third.id(), first.id());
        assert_ne!(third.id(), last.id());
        assert_eq!(registry.len(), 3);

        registry.unregister(third.id());
        assert!(registry.contains(first.id()));
        assert!(registry.contains(last.id()));
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let mut registry = ConnectionRegistry::new();
        let (writer, _peer) = pipe();
        let connection = registry.register(test_addr(), writer);

        assert!(registry.unregister(connection.id()));
        assert!(!registry.unregister(connection.id()));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_broadcast_to_empty_registry() {
        let registry = ConnectionRegistry::new();
        let delivered = tokio_test::block_on(registry.broadcast("nobody\n"));
        assert_eq!(delivered, 0);
    }

    #[test]
    fn test_unregister_unknown_id() {
        let mut registry = ConnectionRegistry::new();
        assert!(!registry.unregister(999));
        assert_eq!(registry.len(), 0);
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_connection() {
        let mut registry = ConnectionRegistry::new();
        let (w1, mut p1) = pipe();
        let (w2, mut p2) = pipe();
        registry.register(test_addr(), w1);
        registry.register(test_addr2(), w2);

        let delivered = registry.broadcast("hello\n").await;
        assert_eq!(delivered, 2);

        assert_eq!(read_exact_string(&mut p1, 6).await, "hello\n");
        assert_eq!(read_exact_string(&mut p2, 6).await, "hello\n");
    }

    #[tokio::test]
    async fn test_broadcast_skips_broken_connection() {
        let mut registry = ConnectionRegistry::new();
        let (w1, p1) = pipe();
        let (w2, mut p2) = pipe();
        let broken = registry.register(test_addr(), w1);
        registry.register(test_addr2(), w2);

        // Dropping the peer end makes writes to this connection fail
        drop(p1);

        let delivered = registry.broadcast("round over\n").await;
        assert_eq!(delivered, 1);
        assert_eq!(read_exact_string(&mut p2, 11).await, "round over\n");

        // Send failures never remove members
        assert!(registry.contains(broken.id()));
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_broadcast_after_unregister() {
        let mut registry = ConnectionRegistry::new();
        let (w1, mut p1) = pipe();
        let (w2, mut p2) = pipe();
        let gone = registry.register(test_addr(), w1);
        registry.register(test_addr2(), w2);

        registry.unregister(gone.id());
        // The handle held by the test keeps the writer open, so p1 would see
        // any bytes that were mistakenly sent to it
        let delivered = registry.broadcast("x\n").await;
        assert_eq!(delivered, 1);
        assert_eq!(read_exact_string(&mut p2, 2).await, "x\n");

        drop(gone);
        let mut rest = Vec::new();
        p1.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn test_connection_send_on_clone() {
        let (writer, mut peer) = pipe();
        let connection = Connection::new(5, test_addr(), writer);
        let clone = connection.clone();

        connection.send("a\n").await.unwrap();
        clone.send("b\n").await.unwrap();

        assert_eq!(read_exact_string(&mut peer, 4).await, "a\nb\n");
    }
}
