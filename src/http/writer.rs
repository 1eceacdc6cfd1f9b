use crate::http::codec;
use crate::http::response::Response;
use crate::net::ClientSocket;

/// Serializes a response into one contiguous buffer: encoded header text
/// followed immediately by the body bytes.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let header = codec::encode(&resp.header().to_text());

    let mut buf = Vec::with_capacity(header.len() + resp.body.len());
    buf.extend_from_slice(&header);
    buf.extend_from_slice(&resp.body);
    buf
}

#[derive(Debug)]
pub struct ResponseWriter {
    buffer: Vec<u8>,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub async fn write_to_socket<S: ClientSocket>(&self, socket: &mut S) -> anyhow::Result<()> {
        socket.send(&self.buffer).await?;
        Ok(())
    }
}
