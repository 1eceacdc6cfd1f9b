#![allow(dead_code)]

use bytes::BytesMut;
use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use webviewer::net::{ClientSocket, ServerSocket, SocketProvider};

/// What the scripted socket observed, shared with the test.
#[derive(Debug, Default)]
pub struct MockState {
    pub written: Vec<Vec<u8>>,
    pub connected: bool,
    pub keep_alive: Vec<bool>,
    pub disconnected: bool,
    pub fail_send: bool,
    pub fail_keep_alive: bool,
    pub receives: usize,
}

/// In-memory socket: each scripted chunk is returned by one `receive`,
/// then the peer appears closed.
pub struct MockSocket {
    incoming: VecDeque<Vec<u8>>,
    state: Arc<Mutex<MockState>>,
}

#[derive(Clone)]
pub struct MockHandle(Arc<Mutex<MockState>>);

impl MockSocket {
    pub fn new<I, B>(requests: I) -> (Self, MockHandle)
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let state = Arc::new(Mutex::new(MockState {
            connected: true,
            ..MockState::default()
        }));
        let socket = Self {
            incoming: requests.into_iter().map(|r| r.as_ref().to_vec()).collect(),
            state: state.clone(),
        };
        (socket, MockHandle(state))
    }
}

impl MockHandle {
    pub fn set_connected(&self, connected: bool) {
        self.0.lock().unwrap().connected = connected;
    }

    pub fn fail_sends(&self) {
        self.0.lock().unwrap().fail_send = true;
    }

    pub fn fail_keep_alive(&self) {
        self.0.lock().unwrap().fail_keep_alive = true;
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.0.lock().unwrap().written.clone()
    }

    pub fn write_texts(&self) -> Vec<String> {
        self.writes()
            .iter()
            .map(|w| String::from_utf8_lossy(w).into_owned())
            .collect()
    }

    pub fn disconnected(&self) -> bool {
        self.0.lock().unwrap().disconnected
    }

    pub fn receives(&self) -> usize {
        self.0.lock().unwrap().receives
    }

    pub fn keep_alive_settings(&self) -> Vec<bool> {
        self.0.lock().unwrap().keep_alive.clone()
    }
}

#[async_trait::async_trait]
impl ClientSocket for MockSocket {
    async fn receive(&mut self, buf: &mut BytesMut) -> io::Result<usize> {
        self.state.lock().unwrap().receives += 1;
        match self.incoming.pop_front() {
            Some(chunk) => {
                buf.extend_from_slice(&chunk);
                Ok(chunk.len())
            }
            None => Ok(0),
        }
    }

    async fn send(&mut self, data: &[u8]) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_send {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "scripted send failure"));
        }
        state.written.push(data.to_vec());
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }

    fn set_keep_alive(&mut self, enabled: bool) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_keep_alive {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "scripted keep-alive failure"));
        }
        state.keep_alive.push(enabled);
        Ok(())
    }

    async fn disconnect(&mut self) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.connected = false;
        state.disconnected = true;
        Ok(())
    }
}

pub fn peer() -> SocketAddr {
    "127.0.0.1:50000".parse().unwrap()
}

pub type Accepted = io::Result<(MockSocket, SocketAddr)>;

/// Hands out one scripted listener. Records every `listen` call.
pub struct MockProvider {
    listener: Mutex<Option<MockListener>>,
    pub listens: Arc<Mutex<Vec<(SocketAddr, u32)>>>,
}

/// Listener whose accepts are pushed by the test through the sender.
pub struct MockListener {
    accepts: mpsc::UnboundedReceiver<Accepted>,
    addr: SocketAddr,
}

impl MockProvider {
    pub fn new(port: u16) -> (Self, mpsc::UnboundedSender<Accepted>) {
        let (tx, accepts) = mpsc::unbounded_channel();
        let listener = MockListener {
            accepts,
            addr: SocketAddr::from(([127, 0, 0, 1], port)),
        };
        let provider = Self {
            listener: Mutex::new(Some(listener)),
            listens: Arc::new(Mutex::new(Vec::new())),
        };
        (provider, tx)
    }
}

#[async_trait::async_trait]
impl SocketProvider for MockProvider {
    type Listener = MockListener;

    async fn listen(&self, addr: SocketAddr, backlog: u32) -> io::Result<MockListener> {
        self.listens.lock().unwrap().push((addr, backlog));
        self.listener
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::AddrInUse, "scripted listener already used"))
    }
}

#[async_trait::async_trait]
impl ServerSocket for MockListener {
    type Client = MockSocket;

    async fn accept(&mut self) -> Accepted {
        match self.accepts.recv().await {
            Some(accepted) => accepted,
            None => std::future::pending().await,
        }
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        Ok(self.addr)
    }
}
