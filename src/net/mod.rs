//! Socket capabilities the server is built on.
//!
//! The listener and the connection handler never touch tokio's networking
//! types directly. They go through these traits, so tests can drive a
//! connection with a scripted in-memory socket, and the real server uses
//! [`TcpProvider`].
//!
//! | Capability   | Trait method                      |
//! |--------------|-----------------------------------|
//! | create+listen| [`SocketProvider::listen`]        |
//! | accept       | [`ServerSocket::accept`]          |
//! | receive      | [`ClientSocket::receive`]         |
//! | send         | [`ClientSocket::send`]            |
//! | getInfo      | [`ClientSocket::is_connected`]    |
//! | setKeepAlive | [`ClientSocket::set_keep_alive`]  |
//! | close        | [`ClientSocket::disconnect`], drop|

pub mod tcp;

pub use tcp::{TcpClient, TcpProvider, TcpServer};

use bytes::BytesMut;
use std::io;
use std::net::SocketAddr;

/// One accepted connection endpoint.
///
/// Owned by exactly one connection handler. Dropping the value releases the
/// handle.
#[async_trait::async_trait]
pub trait ClientSocket: Send {
    /// Waits for data and appends it to `buf`. Returns 0 once the peer has
    /// closed its side.
    async fn receive(&mut self, buf: &mut BytesMut) -> io::Result<usize>;

    /// Writes the whole buffer.
    async fn send(&mut self, data: &[u8]) -> io::Result<()>;

    /// Whether the socket still reports itself as connected.
    fn is_connected(&self) -> bool;

    /// Enables or disables transport-level keep-alive probes.
    fn set_keep_alive(&mut self, enabled: bool) -> io::Result<()>;

    /// Shuts the connection down. The handle itself is released on drop.
    async fn disconnect(&mut self) -> io::Result<()>;
}

/// A bound, listening server socket.
#[async_trait::async_trait]
pub trait ServerSocket: Send + 'static {
    type Client: ClientSocket + 'static;

    async fn accept(&mut self) -> io::Result<(Self::Client, SocketAddr)>;

    fn local_addr(&self) -> io::Result<SocketAddr>;
}

/// Factory for listening sockets.
#[async_trait::async_trait]
pub trait SocketProvider: Send + Sync + 'static {
    type Listener: ServerSocket;

    /// Creates a socket, binds it to `addr` and starts listening with the
    /// given backlog of pending connections.
    async fn listen(&self, addr: SocketAddr, backlog: u32) -> io::Result<Self::Listener>;
}
