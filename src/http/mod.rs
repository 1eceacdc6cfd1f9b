//! HTTP/1.0 subset spoken by the preview server.
//!
//! Only `GET` is understood. Responses use loose `\n` framing and carry
//! `Content-length`, `Content-type` and, when requested, `Connection:
//! keep-alive`.
//!
//! # Architecture
//!
//! - **`codec`**: byte ↔ text conversion (one byte per character)
//! - **`parser`**: extracts the target URI and keep-alive preference
//! - **`request`**: the parsed request
//! - **`response`**: status codes, response header and builder
//! - **`writer`**: serializes a response into one buffer and sends it
//! - **`connection`**: the per-socket state machine
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!        │ AwaitingRequest  │ ← Wait for the next request
//!        └──────┬───────────┘
//!               │ Bytes received
//!               ▼
//!        ┌──────────────────┐
//!        │     Parsing      │ ── not GET / no target ──┐
//!        └──────┬───────────┘                          │
//!               │ ParsedRequest                        │
//!               ▼                                      │
//!        ┌──────────────────┐                          │
//!        │    Resolving     │ ← Path map lookup + read │
//!        └──────┬───────────┘                          │
//!               │ 200 / 404 / 500                      │
//!               ▼                                      │
//!        ┌──────────────────┐                          │
//!        │   Responding     │ ── send error ───────────┤
//!        └──────┬───────────┘                          │
//!               ├─ Keep-Alive → AwaitingRequest        │
//!               └─ Close ────────────────────────────► Closed
//! ```

pub mod codec;
pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
