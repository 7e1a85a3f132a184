use crate::error::{Error, NetworkError, ParseError};

/// Cap on raw text copied into an error, so a multi-megabyte HTML error page
/// does not ride along in every log line.
pub(crate) const MAX_ERROR_MESSAGE_LEN: usize = 1024;

pub(crate) fn truncate_message(mut msg: String) -> String {
    if msg.len() <= MAX_ERROR_MESSAGE_LEN {
        return msg;
    }
    let cut = (0..=MAX_ERROR_MESSAGE_LEN)
        .rev()
        .find(|&i| msg.is_char_boundary(i))
        .unwrap_or(0);
    msg.truncate(cut);
    msg.push_str("... (truncated)");
    msg
}

impl From<NetworkError> for Error {
    fn from(e: NetworkError) -> Self {
        Error::Network(Box::new(e))
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(Box::new(e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        ParseError::Json(e).into()
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(e: reqwest::Error) -> Self {
        let e = e.without_url();
        if e.is_connect() {
            NetworkError::Connect(truncate_message(e.to_string()))
        } else if e.is_body() || e.is_decode() {
            NetworkError::Body(truncate_message(e.to_string()))
        } else if e.is_builder() {
            NetworkError::Setup(e.to_string())
        } else {
            NetworkError::Transport(Box::new(e))
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        NetworkError::from(e).into()
    }
}
