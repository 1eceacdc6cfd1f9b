/// A request accepted by the parser.
///
/// Only lives for one receive cycle: the connection parses it, resolves the
/// URI and drops it once the response has been built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    /// The request method. Always `"GET"`, the only one the parser accepts.
    pub method: String,
    /// The request target with any query string removed (e.g. "/index.html")
    pub uri: String,
    /// Whether the client asked for the connection to stay open
    pub keep_alive: bool,
}

impl ParsedRequest {
    pub fn new(uri: impl Into<String>, keep_alive: bool) -> Self {
        Self {
            method: "GET".to_string(),
            uri: uri.into(),
            keep_alive,
        }
    }

    /// Returns `true` if the connection should stay open after the response.
    pub fn keep_alive(&self) -> bool {
        self.keep_alive
    }
}
