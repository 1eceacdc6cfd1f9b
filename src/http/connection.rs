use bytes::BytesMut;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::http::codec;
use crate::http::parser::parse_request;
use crate::http::request::ParsedRequest;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::net::ClientSocket;
use crate::project::file::FileReader;
use crate::server::path_map::PathMapStore;

pub const DEFAULT_READ_BUFFER_SIZE: usize = 8192;

pub struct Connection<S: ClientSocket> {
    socket: S,
    peer: SocketAddr,
    path_map: PathMapStore,
    reader: Arc<dyn FileReader>,
    buffer: BytesMut,
    read_buffer_size: usize,
    state: ConnectionState,
}

#[derive(Debug)]
pub enum ConnectionState {
    AwaitingRequest,
    Parsing,
    Resolving(ParsedRequest),
    Responding(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

impl<S: ClientSocket> Connection<S> {
    pub fn new(
        socket: S,
        peer: SocketAddr,
        path_map: PathMapStore,
        reader: Arc<dyn FileReader>,
    ) -> Self {
        Self {
            socket,
            peer,
            path_map,
            reader,
            buffer: BytesMut::with_capacity(DEFAULT_READ_BUFFER_SIZE),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            state: ConnectionState::AwaitingRequest,
        }
    }

    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Drives the socket until it is closed.
    ///
    /// Every failure on the way (unparseable request, transport error)
    /// ends in `Closed`; the socket is always torn down before returning.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::AwaitingRequest => {
                    self.buffer.clear();
                    self.buffer.reserve(self.read_buffer_size);

                    self.state = match self.socket.receive(&mut self.buffer).await {
                        Ok(0) => {
                            debug!(peer = %self.peer, "Peer closed connection");
                            ConnectionState::Closed
                        }
                        Ok(_) => ConnectionState::Parsing,
                        Err(e) => {
                            warn!(peer = %self.peer, error = %e, "Receive failed");
                            ConnectionState::Closed
                        }
                    };
                }

                ConnectionState::Parsing => {
                    let data = codec::decode(&self.buffer);

                    self.state = match parse_request(&data) {
                        Ok(req) => ConnectionState::Resolving(req),
                        Err(e) => {
                            debug!(peer = %self.peer, error = ?e, "Dropping unparseable request");
                            ConnectionState::Closed
                        }
                    };
                }

                ConnectionState::Resolving(req) => {
                    let response = resolve(&self.path_map, self.reader.as_ref(), req).await;

                    info!(
                        peer = %self.peer,
                        uri = %req.uri,
                        status = response.status.as_u16(),
                        "GET"
                    );

                    let keep_alive = response.keep_alive;
                    let writer = ResponseWriter::new(&response);
                    self.state = ConnectionState::Responding(writer, keep_alive);
                }

                ConnectionState::Responding(writer, keep_alive) => {
                    let keep_alive = *keep_alive;

                    if !self.socket.is_connected() {
                        debug!(peer = %self.peer, "Socket no longer connected, skipping write");
                        self.state = ConnectionState::Closed;
                        continue;
                    }

                    if let Err(e) = self.socket.set_keep_alive(keep_alive) {
                        warn!(peer = %self.peer, error = %e, "Failed to set keep-alive");
                        self.state = ConnectionState::Closed;
                        continue;
                    }

                    let result = writer.write_to_socket(&mut self.socket).await;
                    match result {
                        Ok(()) if keep_alive => {
                            self.state = ConnectionState::AwaitingRequest; // go back for next request
                        }
                        Ok(()) => {
                            self.state = ConnectionState::Closed;
                        }
                        Err(e) => {
                            warn!(peer = %self.peer, error = %e, "Send failed");
                            self.state = ConnectionState::Closed;
                        }
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        self.teardown().await;
        Ok(())
    }

    async fn teardown(&mut self) {
        if let Err(e) = self.socket.disconnect().await {
            debug!(peer = %self.peer, error = %e, "Disconnect failed");
        }
    }
}

/// Looks the URI up in the current snapshot and produces the response.
///
/// The snapshot is captured once, so a concurrent path-map swap does not
/// affect this lookup.
async fn resolve(path_map: &PathMapStore, reader: &dyn FileReader, req: &ParsedRequest) -> Response {
    let snapshot = path_map.snapshot().await;

    let Some(entry) = snapshot.get(&req.uri) else {
        warn!(uri = %req.uri, "File does not exist");
        return Response::not_found(req.keep_alive);
    };

    match reader.read(entry).await {
        Ok(contents) => {
            let content_type = contents.content_type.or_else(|| entry.content_type.clone());
            Response::ok(content_type.as_deref(), contents.bytes, req.keep_alive)
        }
        Err(e) => {
            warn!(uri = %req.uri, error = %e, "File read failed");
            Response::internal_error()
        }
    }
}
