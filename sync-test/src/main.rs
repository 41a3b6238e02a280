use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;

use sync_test::{
    models::{PollSettings, DEFAULT_BACKEND_URL},
    server::{initialize_router, SERVER_NAME},
    tools::SyncTester,
    validation::validate_http_url,
};

#[derive(Parser, Debug)]
#[command(name = "sync-test-server", about = "Tools for testing source integrations")]
struct Args {
    /// Backend used when a tool call does not pass `backend_url`
    #[arg(long, env = "BACKEND_URL", default_value = DEFAULT_BACKEND_URL)]
    backend_url: String,

    #[arg(long, env = "SYNC_TEST_HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "SYNC_TEST_PORT", default_value_t = 8100)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .pretty()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_target(false)
        .init();

    let args = Args::parse();
    validate_http_url(&args.backend_url)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;

    let tester = SyncTester::new(args.backend_url.clone(), PollSettings::default());
    let app = initialize_router(tester);

    tracing::info!(
        "{} listening on {} (backend: {})",
        SERVER_NAME,
        addr,
        args.backend_url
    );
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_fall_back_to_env() {
        std::env::set_var("SYNC_TEST_HOST", "127.0.0.1");
        std::env::set_var("SYNC_TEST_PORT", "9100");

        let args = Args::try_parse_from(["sync-test-server"]).unwrap();
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.port, 9100);

        let args = Args::try_parse_from(["sync-test-server", "--host", "10.0.0.5"]).unwrap();
        assert_eq!(args.host, "10.0.0.5");

        std::env::remove_var("SYNC_TEST_HOST");
        std::env::remove_var("SYNC_TEST_PORT");
    }
}
