use crate::utils::panic_after;
use oneshot_http::response_status_code::ResponseStatusCode;
use oneshot_http::server::Server;
use oneshot_http::server_config::ServerConfigBuilder;
use rand::Rng;
use std::collections::HashMap;
use std::io::{Read, Result, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::Path;
use std::time::Duration;

mod utils;

struct ParsedResponse {
    status_code: ResponseStatusCode,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

fn default_server_config() -> ServerConfigBuilder {
    ServerConfigBuilder::new().host("127.0.0.1").port(0)
}

fn run_test(directory: Option<&Path>, test: impl FnOnce(SocketAddr)) {
    let mut config = default_server_config();

    if let Some(directory) = directory {
        config = config.directory(directory);
    }

    run_test_with_config(config, test);
}

fn run_test_with_config(config: ServerConfigBuilder, test: impl FnOnce(SocketAddr)) {
    let server = Server::bind(config.get()).expect("Server binds");
    let addr = server.local_addr().unwrap();
    let shutdown = server.shutdown_handle().unwrap();

    let handle = std::thread::spawn(move || {
        server.run().expect("Server runs");
    });

    test(addr);

    shutdown.shutdown();
    handle.join().unwrap();
}

fn issue_raw_request(addr: SocketAddr, segments: &[&[u8]]) -> Result<Vec<u8>> {
    let mut tcp = TcpStream::connect(addr)?;

    for (index, segment) in segments.iter().enumerate() {
        if index > 0 {
            std::thread::sleep(Duration::from_millis(50));
        }
        tcp.write_all(segment)?;
    }

    let mut response_bytes: Vec<u8> = vec![];
    tcp.read_to_end(&mut response_bytes)?;

    Ok(response_bytes)
}

fn parse_response(bytes: &[u8]) -> ParsedResponse {
    let head_end = bytes
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .expect("Response has a head");
    let head = std::str::from_utf8(&bytes[..head_end]).unwrap();

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap();
    let code = status_line.split(' ').nth(1).unwrap().parse::<u16>().unwrap();

    let headers = lines
        .map(|line| {
            let (name, value) = line.split_once(": ").unwrap();
            (name.to_string(), value.to_string())
        })
        .collect();

    ParsedResponse {
        status_code: ResponseStatusCode::try_from(code).unwrap(),
        headers,
        body: bytes[head_end + 4..].to_vec(),
    }
}

fn issue_request(addr: SocketAddr, request: &[u8]) -> ParsedResponse {
    parse_response(&issue_raw_request(addr, &[request]).unwrap())
}

fn upload(addr: SocketAddr, name: &str, body: &[u8]) -> ParsedResponse {
    let mut request =
        format!("POST /files/{name} HTTP/1.1\r\nContent-Length: {}\r\n\r\n", body.len())
            .into_bytes();
    request.extend_from_slice(body);

    issue_request(addr, &request)
}

#[test]
fn root_is_empty_ok() {
    run_test(None, |addr| {
        let response = issue_raw_request(addr, &[b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n"]);

        assert_eq!(response.unwrap(), b"HTTP/1.1 200 OK\r\n\r\n");
    });
}

#[test]
fn echo() {
    run_test(None, |addr| {
        let response = issue_request(addr, b"GET /echo/abc HTTP/1.1\r\n\r\n");

        assert_eq!(response.status_code, ResponseStatusCode::Ok);
        assert_eq!(response.headers.get("Content-Type").unwrap(), "text/plain");
        assert_eq!(response.headers.get("Content-Length").unwrap(), "3");
        assert_eq!(response.body, b"abc");
    });
}

#[test]
fn user_agent() {
    run_test(None, |addr| {
        let response = issue_request(
            addr,
            b"GET /user-agent HTTP/1.1\r\nHost: localhost\r\nUser-Agent: xyz\r\n\r\n",
        );
        assert_eq!(response.status_code, ResponseStatusCode::Ok);
        assert_eq!(response.body, b"xyz");

        let response = issue_request(addr, b"GET /user-agent HTTP/1.1\r\n\r\n");
        assert_eq!(response.status_code, ResponseStatusCode::NotFound);
        assert!(response.body.is_empty());
    });
}

#[test]
fn malformed_requests_are_dropped() {
    run_test(None, |addr| {
        for request in [&b"GET /\r\n\r\n"[..], &b"PUT / HTTP/1.1\r\n\r\n"[..]] {
            let response = issue_raw_request(addr, &[request]).unwrap();

            assert!(response.is_empty());
        }
    });
}

#[test]
fn files_without_directory() {
    run_test(None, |addr| {
        let get = issue_request(addr, b"GET /files/foo HTTP/1.1\r\n\r\n");
        let post = upload(addr, "foo", b"hi");

        assert_eq!(get.status_code, ResponseStatusCode::NotFound);
        assert_eq!(post.status_code, ResponseStatusCode::NotFound);
    });
}

#[test]
fn upload_then_download() {
    let dir = tempfile::tempdir().unwrap();

    run_test(Some(dir.path()), |addr| {
        let created = upload(addr, "foo", b"hi");
        assert_eq!(created.status_code, ResponseStatusCode::Created);
        assert!(created.headers.is_empty());

        for _ in 0..2 {
            let response = issue_request(addr, b"GET /files/foo HTTP/1.1\r\n\r\n");

            assert_eq!(response.status_code, ResponseStatusCode::Ok);
            assert_eq!(
                response.headers.get("Content-Type").unwrap(),
                "application/octet-stream"
            );
            assert_eq!(response.headers.get("Content-Length").unwrap(), "2");
            assert_eq!(response.body, b"hi");
        }
    });
}

#[test]
fn binary_upload_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = vec![0u8; 512];
    rand::thread_rng().fill(&mut body[..]);
    let name = format!("blob-{}", rand::random::<u32>());

    run_test(Some(dir.path()), |addr| {
        assert_eq!(
            upload(addr, &name, &body).status_code,
            ResponseStatusCode::Created
        );

        let request = format!("GET /files/{name} HTTP/1.1\r\n\r\n");
        let response = issue_request(addr, request.as_bytes());
        assert_eq!(response.body, body);
    });

    assert_eq!(std::fs::read(dir.path().join(&name)).unwrap(), body);
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();

    run_test(Some(dir.path()), |addr| {
        let response = issue_request(addr, b"GET /files/nope HTTP/1.1\r\n\r\n");

        assert_eq!(response.status_code, ResponseStatusCode::NotFound);
    });
}

#[test]
fn segmented_upload() {
    let dir = tempfile::tempdir().unwrap();

    run_test(Some(dir.path()), |addr| {
        let response = issue_raw_request(
            addr,
            &[
                b"POST /files/parts HTTP/1.1\r\n",
                b"Content-Length: 10\r\n\r\n01234",
                b"56789",
            ],
        )
        .unwrap();

        assert_eq!(response, b"HTTP/1.1 201 Created\r\n\r\n");
    });

    assert_eq!(
        std::fs::read(dir.path().join("parts")).unwrap(),
        b"0123456789"
    );
}

#[test]
fn concurrent_connections_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b"), b"existing").unwrap();

    run_test(Some(dir.path()), |addr| {
        panic_after(Duration::from_secs(10), move || {
            let post = std::thread::spawn(move || upload(addr, "a", b"new file"));
            let get = std::thread::spawn(move || {
                issue_request(addr, b"GET /files/b HTTP/1.1\r\n\r\n")
            });

            let post = post.join().unwrap();
            let get = get.join().unwrap();

            assert_eq!(post.status_code, ResponseStatusCode::Created);
            assert_eq!(get.status_code, ResponseStatusCode::Ok);
            assert_eq!(get.body, b"existing");
        });
    });

    assert_eq!(std::fs::read(dir.path().join("a")).unwrap(), b"new file");
}

#[test]
fn quiet_client_with_unterminated_head_is_answered() {
    let config = default_server_config().read_timeout(Some(Duration::from_millis(200)));

    run_test_with_config(config, |addr| {
        panic_after(Duration::from_secs(5), move || {
            let mut tcp = TcpStream::connect(addr).unwrap();
            tcp.write_all(b"GET /echo/abc HTTP/1.1\r\nHost: x\r\n").unwrap();

            let mut response_bytes: Vec<u8> = vec![];
            tcp.read_to_end(&mut response_bytes).unwrap();

            let response = parse_response(&response_bytes);
            assert_eq!(response.status_code, ResponseStatusCode::Ok);
            assert_eq!(response.body, b"abc");
        });
    });
}

#[test]
fn hung_client_does_not_stall_other_connections() {
    let config = default_server_config()
        .max_workers(2)
        .read_timeout(Some(Duration::from_secs(30)));

    run_test_with_config(config, |addr| {
        let mut hung = TcpStream::connect(addr).unwrap();
        hung.write_all(b"GET /echo/stuck HTTP/1.1\r\n").unwrap();

        panic_after(Duration::from_secs(5), move || {
            for index in 0..5 {
                let request = format!("GET /echo/{index} HTTP/1.1\r\n\r\n");
                let response = issue_request(addr, request.as_bytes());

                assert_eq!(response.status_code, ResponseStatusCode::Ok);
                assert_eq!(response.body, index.to_string().as_bytes());
            }
        });

        // lets the stuck worker see EOF so shutdown can join it
        drop(hung);
    });
}
