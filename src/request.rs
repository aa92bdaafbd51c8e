use crate::error::RequestError;
use crate::header::{HeaderMap, CONTENT_LENGTH};
use crate::request_method::RequestMethod;
use crate::utils::{ByteUtils, CRLF, HEAD_TERMINATOR};
use std::fmt;
use std::num::ParseIntError;
use std::ops::Range;
use std::str::FromStr;

type Result<T> = std::result::Result<T, RequestError>;

pub struct Request {
    pub method: RequestMethod,
    pub path: String,
    pub version: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Request {
    pub fn header(&self, header_name: &str) -> Option<&str> {
        self.headers.get(header_name)
    }

    /// `None` when the header is absent, `Some(Err(_))` when it is not a
    /// non-negative integer.
    pub fn content_length(&self) -> Option<std::result::Result<usize, ParseIntError>> {
        self.headers
            .get(CONTENT_LENGTH)
            .map(|content_length_value| content_length_value.trim().parse::<usize>())
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("version", &self.version)
            .field("headers", &self.headers)
            .field("body", &format!("{} bytes", self.body.len()))
            .finish()
    }
}

/// Walks an owned request buffer with an explicit cursor. Nothing past the
/// bytes actually received is ever looked at.
pub struct RequestParser {
    buf: Vec<u8>,
    pos: usize,
}

impl RequestParser {
    pub fn new(buf: Vec<u8>) -> Self {
        RequestParser { buf, pos: 0 }
    }

    fn remaining(&self) -> &[u8] {
        self.buf.get(self.pos..).unwrap_or(&[])
    }

    /// Range of the next CRLF-terminated line, cursor moved past the CRLF.
    fn take_line(&mut self) -> Option<Range<usize>> {
        let offset = self.remaining().find_bytes(&CRLF)?;
        let line = self.pos..self.pos + offset;
        self.pos += offset + CRLF.len();

        Some(line)
    }

    fn parse_request_line(&mut self) -> Result<(RequestMethod, String, String)> {
        let line = self.take_line().ok_or(RequestError::MissingRequestLine)?;
        // invalid UTF-8 becomes U+FFFD, same as in header lines
        let line = String::from_utf8_lossy(&self.buf[line]);

        let tokens: Vec<&str> = line.split(' ').filter(|token| !token.is_empty()).collect();
        let [method, path, version] = tokens[..] else {
            return Err(RequestError::TokenCount(tokens.len()));
        };

        let method = RequestMethod::from_str(method)
            .map_err(|_| RequestError::UnsupportedMethod(method.to_string()))?;

        Ok((method, path.to_string(), version.to_string()))
    }

    fn parse_headers(&mut self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        while let Some(line) = self.take_line() {
            if line.is_empty() {
                return headers;
            }

            let line = &self.buf[line];
            let Some(colon) = line.iter().position(|byte| *byte == b':') else {
                continue;
            };

            let header_name = String::from_utf8_lossy(&line[..colon]);
            // only a single space after the colon is dropped
            let header_value = match &line[colon + 1..] {
                [b' ', rest @ ..] => rest,
                rest => rest,
            };

            headers.insert(&header_name, &String::from_utf8_lossy(header_value));
        }

        // no blank line: whatever is left is a partial header, not a body
        self.pos = self.buf.len();

        headers
    }

    pub fn parse(mut self) -> Result<Request> {
        let (method, path, version) = self.parse_request_line()?;
        let headers = self.parse_headers();
        let body = self.buf.split_off(self.pos.min(self.buf.len()));

        Ok(Request {
            method,
            path,
            version,
            headers,
            body,
        })
    }
}

pub fn parse_request(bytes: &[u8]) -> Result<Request> {
    RequestParser::new(bytes.to_vec()).parse()
}

/// Total size of the request once its head has arrived: the head plus the
/// declared `content-length`, or the head alone when that header is absent or
/// unusable.
pub fn expected_length(bytes: &[u8]) -> Option<usize> {
    let head_end = bytes.find_bytes(&HEAD_TERMINATOR)? + HEAD_TERMINATOR.len();

    let mut parser = RequestParser::new(bytes[..head_end].to_vec());
    parser.take_line()?;
    let headers = parser.parse_headers();

    let body_length = headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    Some(head_end.saturating_add(body_length))
}
