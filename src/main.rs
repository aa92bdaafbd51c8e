use clap::Parser;
use log::LevelFilter;
use oneshot_http::server::Server;
use oneshot_http::server_config::{
    ServerConfigBuilder, DEFAULT_MAX_REQUEST_SIZE, DEFAULT_MAX_WORKERS, DEFAULT_PORT,
    DEFAULT_READ_TIMEOUT,
};
use std::io::Result;
use std::path::PathBuf;
use std::time::Duration;

/// Answers one HTTP/1.1 request per connection: echo, user-agent and files.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Directory served and written by /files/<name>
    #[arg(long)]
    directory: Option<PathBuf>,

    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Upper bound on connections handled at the same time
    #[arg(long, default_value_t = DEFAULT_MAX_WORKERS)]
    max_workers: usize,

    /// Bytes read from a connection before the request is parsed
    #[arg(long, default_value_t = DEFAULT_MAX_REQUEST_SIZE)]
    max_request_size: usize,

    /// Answer (or drop) clients that stay silent this long (0 waits forever)
    #[arg(long, default_value_t = DEFAULT_READ_TIMEOUT.as_millis() as u64)]
    read_timeout_ms: u64,
}

fn main() -> Result<()> {
    pretty_env_logger::formatted_timed_builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let mut builder = ServerConfigBuilder::new()
        .host(&args.host)
        .port(args.port)
        .max_workers(args.max_workers)
        .max_request_size(args.max_request_size)
        .read_timeout(Some(Duration::from_millis(args.read_timeout_ms)));

    if let Some(directory) = &args.directory {
        builder = builder.directory(directory);
    }

    Server::bind(builder.get())?.run()
}
