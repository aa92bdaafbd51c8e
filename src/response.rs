use crate::response_status_code::ResponseStatusCode;
use crate::utils::CRLF;

/// Status, optional content type and optional body of one response.
/// `Content-Length` is never stored; it is derived from the body when the
/// response is serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status_code: ResponseStatusCode,
    content_type: Option<String>,
    body: Option<Vec<u8>>,
}

impl Response {
    pub fn status_code(&self) -> &ResponseStatusCode {
        &self.status_code
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn not_found() -> Self {
        Response::builder()
            .status_code(ResponseStatusCode::NotFound)
            .get()
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = vec![];

        bytes.extend_from_slice(self.status_code.status_line().as_bytes());
        bytes.extend_from_slice(&CRLF);

        if let Some(content_type) = &self.content_type {
            bytes.extend_from_slice(format!("Content-Type: {content_type}").as_bytes());
            bytes.extend_from_slice(&CRLF);
        }

        if let Some(body) = &self.body {
            bytes.extend_from_slice(format!("Content-Length: {}", body.len()).as_bytes());
            bytes.extend_from_slice(&CRLF);
        }

        bytes.extend_from_slice(&CRLF);

        if let Some(body) = &self.body {
            bytes.extend_from_slice(body);
        }

        bytes
    }

    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::new()
    }
}

#[derive(Debug)]
pub struct ResponseBuilder {
    response: Response,
}

#[allow(clippy::new_without_default)]
impl ResponseBuilder {
    pub fn new() -> Self {
        ResponseBuilder {
            response: Response {
                status_code: ResponseStatusCode::Ok,
                content_type: None,
                body: None,
            },
        }
    }

    pub fn status_code(mut self, status_code: ResponseStatusCode) -> Self {
        self.response.status_code = status_code;

        self
    }

    pub fn content_type(mut self, content_type: &str) -> Self {
        self.response.content_type = Some(String::from(content_type));

        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.response.body = Some(body);

        self
    }

    pub fn text_body(mut self, body: &str) -> Self {
        self.response.body = Some(body.as_bytes().to_vec());

        self
    }

    pub fn get(self) -> Response {
        self.response
    }
}
