use thiserror::Error;

/// Reasons a buffer does not yield a request. The connection is closed without
/// a response for every one of them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("request line is not terminated by CRLF")]
    MissingRequestLine,
    #[error("request line has {0} tokens, expected 3")]
    TokenCount(usize),
    #[error("unsupported method {0:?}")]
    UnsupportedMethod(String),
}

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("no root directory configured")]
    NoRoot,
    #[error("invalid file name {0:?}")]
    InvalidName(String),
    #[error("missing Content-Length header")]
    MissingContentLength,
    #[error("invalid Content-Length value {0:?}")]
    InvalidContentLength(String),
    #[error("Content-Length is {declared} but only {available} body bytes were received")]
    TruncatedBody { declared: usize, available: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
