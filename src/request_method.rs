use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RequestMethod {
    Get,
    Post,
}

impl FromStr for RequestMethod {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, ()> {
        match value {
            "GET" => Ok(RequestMethod::Get),
            "POST" => Ok(RequestMethod::Post),
            _ => Err(()),
        }
    }
}

impl Display for RequestMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let string_value = match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
        };

        write!(f, "{}", string_value)
    }
}
