use crate::request::expected_length;
use log::debug;
use std::io::{ErrorKind, Read, Write};

/// One request in, one response out.
pub struct Connection<S: Read + Write> {
    stream: S,
    max_request_size: usize,
}

impl<S: Read + Write> Connection<S> {
    pub fn new(stream: S, max_request_size: usize) -> Self {
        Connection {
            stream,
            max_request_size,
        }
    }

    /// Reads until the head and its declared body have arrived, the peer closes
    /// or goes quiet past the read timeout, or `max_request_size` bytes are held.
    /// Whatever was received is returned as is; a cut-short request is left to
    /// the parser. A timeout before any byte arrived is an error.
    pub fn read(&mut self) -> std::io::Result<Vec<u8>> {
        let mut request_bytes: Vec<u8> = Vec::new();
        let mut stream_buf = vec![0u8; self.max_request_size];

        while request_bytes.len() < self.max_request_size {
            let free = self.max_request_size - request_bytes.len();
            let n = match self.stream.read(&mut stream_buf[..free]) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if is_timeout(&err) && !request_bytes.is_empty() => {
                    debug!("Client went quiet, using the bytes received so far");
                    break;
                }
                Err(err) => return Err(err),
            };

            if n == 0 {
                break;
            }

            request_bytes.extend_from_slice(&stream_buf[..n]);

            if let Some(expected) = expected_length(&request_bytes) {
                if request_bytes.len() >= expected {
                    break;
                }
            }
        }

        debug!("Read {} request bytes", request_bytes.len());

        Ok(request_bytes)
    }

    pub fn write(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.stream.write_all(bytes)?;
        self.stream.flush()
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

fn is_timeout(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}
