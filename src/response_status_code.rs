use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResponseStatusCode {
    Ok = 200,
    Created = 201,
    NotFound = 404,
}

impl ResponseStatusCode {
    pub fn status_line(&self) -> &'static str {
        match self {
            ResponseStatusCode::Ok => "HTTP/1.1 200 OK",
            ResponseStatusCode::Created => "HTTP/1.1 201 Created",
            ResponseStatusCode::NotFound => "HTTP/1.1 404 Not Found",
        }
    }
}

impl Display for ResponseStatusCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let string_value = match self {
            ResponseStatusCode::Ok => "OK",
            ResponseStatusCode::Created => "Created",
            ResponseStatusCode::NotFound => "Not Found",
        };

        write!(f, "{}", string_value)
    }
}

impl TryFrom<u16> for ResponseStatusCode {
    type Error = u16;

    fn try_from(code: u16) -> Result<Self, u16> {
        match code {
            200 => Ok(ResponseStatusCode::Ok),
            201 => Ok(ResponseStatusCode::Created),
            404 => Ok(ResponseStatusCode::NotFound),
            other => Err(other),
        }
    }
}
