use crate::connection::Connection;
use crate::file_store::FileStore;
use crate::request::parse_request;
use crate::router;
use crate::server_config::ServerConfig;
use crate::workers::WorkerSet;
use log::{debug, error, info, warn};
use std::io::{Read, Result, Write};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct Server {
    listener: TcpListener,
    config: Arc<ServerConfig>,
    store: Arc<FileStore>,
    stop: Arc<AtomicBool>,
}

/// Stops a running [`Server`] from another thread.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    stop: Arc<AtomicBool>,
    wake_addr: SocketAddr,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.stop.store(true, Ordering::SeqCst);

        // the accept loop only notices the flag once a connection comes in
        if let Err(err) = TcpStream::connect(self.wake_addr) {
            warn!("Could not wake server at {}: {err}", self.wake_addr);
        }
    }
}

impl Server {
    pub fn bind(config: ServerConfig) -> Result<Self> {
        let listener = TcpListener::bind(config.address())?;
        let store = FileStore::new(config.directory.clone());

        Ok(Server {
            listener,
            config: Arc::new(config),
            store: Arc::new(store),
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn shutdown_handle(&self) -> Result<ShutdownHandle> {
        let mut wake_addr = self.local_addr()?;

        if wake_addr.ip().is_unspecified() {
            wake_addr.set_ip(match wake_addr.ip() {
                IpAddr::V4(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
                IpAddr::V6(_) => IpAddr::V6(Ipv6Addr::LOCALHOST),
            });
        }

        Ok(ShutdownHandle {
            stop: Arc::clone(&self.stop),
            wake_addr,
        })
    }

    /// Accepts connections until shut down, then waits for every worker.
    pub fn run(&self) -> Result<()> {
        info!("Listening on {}", self.local_addr()?);
        match self.store.root() {
            Some(root) => info!("Serving files from {}", root.display()),
            None => info!("No directory configured, /files is disabled"),
        }

        let mut workers = WorkerSet::new(self.config.max_workers);

        for stream in self.listener.incoming() {
            if self.stop.load(Ordering::SeqCst) {
                break;
            }

            let stream = match stream {
                Ok(stream) => stream,
                Err(err) => {
                    error!("Could not accept connection: {err}");
                    continue;
                }
            };

            let config = Arc::clone(&self.config);
            let store = Arc::clone(&self.store);
            let spawned = workers.spawn(move || {
                let peer = stream
                    .peer_addr()
                    .map(|addr| addr.to_string())
                    .unwrap_or_else(|_| String::from("unknown peer"));
                debug!("Client {peer} connected");

                if let Err(err) = handle_connection(stream, &config, &store) {
                    error!("Connection with {peer} failed: {err}");
                }
            });

            if let Err(err) = spawned {
                error!("Could not spawn worker: {err}");
            }
        }

        info!("Shutting down, waiting for {} workers", workers.len());
        workers.join_all();

        Ok(())
    }
}

fn handle_connection(stream: TcpStream, config: &ServerConfig, store: &FileStore) -> Result<()> {
    stream.set_read_timeout(config.read_timeout)?;

    serve(stream, config, store)
}

/// Reads one request from `stream`, answers it and drops the stream. Malformed
/// requests get no answer at all.
pub fn serve<S: Read + Write>(stream: S, config: &ServerConfig, store: &FileStore) -> Result<()> {
    let mut connection = Connection::new(stream, config.max_request_size);
    let request_bytes = connection.read()?;

    let request = match parse_request(&request_bytes) {
        Ok(request) => request,
        Err(err) => {
            warn!("Dropping malformed request: {err}");
            return Ok(());
        }
    };
    debug!("{request:?}");

    let response = router::route(&request, store);
    let status_code = *response.status_code();
    info!(
        "{} {} -> {} {}",
        request.method, request.path, status_code as u16, status_code
    );

    connection.write(&response.as_bytes())
}
