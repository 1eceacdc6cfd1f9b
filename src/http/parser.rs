use crate::http::request::ParsedRequest;

const METHOD_PREFIX: &str = "GET ";

/// Substring that marks a keep-alive request.
///
/// Matched anywhere in the request text, not against a parsed header line,
/// so a header value containing it also counts.
pub const KEEP_ALIVE_MARKER: &str = "Connection: keep-alive";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The request does not start with `GET `
    NotGet,
    /// No space terminates the request target
    MissingTarget,
}

/// Parses the text of one received request.
///
/// The target is everything between `GET ` and the next space. A query
/// string is cut off at the first `?`; the rest of the path is left exactly
/// as sent (no percent-decoding, no slash or case normalization).
pub fn parse_request(data: &str) -> Result<ParsedRequest, ParseError> {
    let rest = data.strip_prefix(METHOD_PREFIX).ok_or(ParseError::NotGet)?;

    let keep_alive = data.contains(KEEP_ALIVE_MARKER);

    let target_end = rest.find(' ').ok_or(ParseError::MissingTarget)?;
    let target = &rest[..target_end];

    let uri = match target.find('?') {
        Some(q) => &target[..q],
        None => target,
    };

    Ok(ParsedRequest::new(uri, keep_alive))
}
