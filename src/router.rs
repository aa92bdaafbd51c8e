use crate::error::FileStoreError;
use crate::file_store::FileStore;
use crate::header::USER_AGENT;
use crate::request::Request;
use crate::request_method::RequestMethod;
use crate::response::Response;
use crate::response_status_code::ResponseStatusCode;
use log::{debug, warn};

static TEXT_PLAIN: &str = "text/plain";
static OCTET_STREAM: &str = "application/octet-stream";

/// A path split at its last `/`: `/echo/abc` is prefix `/echo`, argument `abc`.
#[derive(Debug, PartialEq, Eq)]
pub struct RouteTarget<'a> {
    pub prefix: &'a str,
    pub argument: &'a str,
}

impl<'a> RouteTarget<'a> {
    pub fn from_path(path: &'a str) -> Option<Self> {
        let slash = path.rfind('/')?;

        Some(RouteTarget {
            prefix: &path[..slash],
            argument: &path[slash + 1..],
        })
    }
}

pub fn route(request: &Request, store: &FileStore) -> Response {
    let path = request.path.as_str();

    if !path.starts_with('/') {
        return Response::not_found();
    }

    if path == "/" {
        return Response::builder().status_code(ResponseStatusCode::Ok).get();
    }

    let Some(target) = RouteTarget::from_path(path) else {
        return Response::not_found();
    };

    match (request.method, target.prefix) {
        (RequestMethod::Get, "/echo") => echo(target.argument),
        (RequestMethod::Get, _) if path == "/user-agent" => user_agent(request),
        (RequestMethod::Get, "/files") => get_file(target.argument, store),
        (RequestMethod::Post, "/files") => put_file(target.argument, request, store),
        _ => Response::not_found(),
    }
}

fn echo(argument: &str) -> Response {
    Response::builder()
        .status_code(ResponseStatusCode::Ok)
        .content_type(TEXT_PLAIN)
        .text_body(argument)
        .get()
}

fn user_agent(request: &Request) -> Response {
    let Some(user_agent) = request.header(USER_AGENT) else {
        debug!("No User-Agent header in request");
        return Response::not_found();
    };

    Response::builder()
        .status_code(ResponseStatusCode::Ok)
        .content_type(TEXT_PLAIN)
        .text_body(user_agent)
        .get()
}

fn get_file(name: &str, store: &FileStore) -> Response {
    match store.get(name) {
        Ok(content) => Response::builder()
            .status_code(ResponseStatusCode::Ok)
            .content_type(OCTET_STREAM)
            .body(content)
            .get(),
        Err(FileStoreError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("File {name:?} not found");
            Response::not_found()
        }
        Err(err) => {
            warn!("Could not serve file {name:?}: {err}");
            Response::not_found()
        }
    }
}

fn put_file(name: &str, request: &Request, store: &FileStore) -> Response {
    match store.put(name, request) {
        Ok(()) => Response::builder()
            .status_code(ResponseStatusCode::Created)
            .get(),
        Err(err) => {
            warn!("Could not store file {name:?}: {err}");
            Response::not_found()
        }
    }
}
