use bytes::BytesMut;
use socket2::{SockRef, TcpKeepalive};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket, TcpStream};

use crate::net::{ClientSocket, ServerSocket, SocketProvider};

/// Idle time before the first keep-alive probe.
const KEEPALIVE_DELAY: Duration = Duration::from_secs(1);

/// Real TCP sockets on the tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProvider;

#[async_trait::async_trait]
impl SocketProvider for TcpProvider {
    type Listener = TcpServer;

    async fn listen(&self, addr: SocketAddr, backlog: u32) -> io::Result<TcpServer> {
        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4()?,
            SocketAddr::V6(_) => TcpSocket::new_v6()?,
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;

        let listener = socket.listen(backlog)?;
        Ok(TcpServer { listener })
    }
}

pub struct TcpServer {
    listener: TcpListener,
}

#[async_trait::async_trait]
impl ServerSocket for TcpServer {
    type Client = TcpClient;

    async fn accept(&mut self) -> io::Result<(TcpClient, SocketAddr)> {
        let (stream, peer) = self.listener.accept().await?;
        Ok((TcpClient::new(stream), peer))
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

pub struct TcpClient {
    stream: TcpStream,
    connected: bool,
}

impl TcpClient {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            connected: true,
        }
    }
}

#[async_trait::async_trait]
impl ClientSocket for TcpClient {
    async fn receive(&mut self, buf: &mut BytesMut) -> io::Result<usize> {
        match self.stream.read_buf(buf).await {
            Ok(0) => {
                self.connected = false;
                Ok(0)
            }
            Ok(n) => Ok(n),
            Err(e) => {
                self.connected = false;
                Err(e)
            }
        }
    }

    async fn send(&mut self, data: &[u8]) -> io::Result<()> {
        let result = async {
            self.stream.write_all(data).await?;
            self.stream.flush().await
        }
        .await;

        if result.is_err() {
            self.connected = false;
        }
        result
    }

    fn is_connected(&self) -> bool {
        self.connected && self.stream.peer_addr().is_ok()
    }

    fn set_keep_alive(&mut self, enabled: bool) -> io::Result<()> {
        let sock = SockRef::from(&self.stream);
        if enabled {
            sock.set_tcp_keepalive(&TcpKeepalive::new().with_time(KEEPALIVE_DELAY))
        } else {
            sock.set_keepalive(false)
        }
    }

    async fn disconnect(&mut self) -> io::Result<()> {
        self.connected = false;
        match self.stream.shutdown().await {
            Err(e) if e.kind() != io::ErrorKind::NotConnected => Err(e),
            _ => Ok(()),
        }
    }
}
