//! Serve the API with a mock GitHub.
//!
//! Every code is accepted, and each redirect returns a small JSON document
//! naming the kind and the mock token, so clients of the redirect endpoints
//! can be developed without a GitHub OAuth app.
//!
//! Run with: `cargo run --example mock_server`

use github_login::api::{
    login_api_mod,
    mock::{MockApiImpl, MockAppState},
};
use slog::Drain;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let api = login_api_mod::api_description::<MockApiImpl>().map_err(|e| {
        anyhow::anyhow!("Failed to create API description: {e}")
    })?;

    let mock_state = MockAppState::new();

    let config_dropshot = dropshot::ConfigDropshot {
        bind_address: "127.0.0.1:3001".parse()?,
        default_request_body_max_bytes: 1024,
        default_handler_task_mode: dropshot::HandlerTaskMode::Detached,
        log_headers: vec![],
    };

    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let log = slog::Logger::root(drain, slog::o!());

    let server = dropshot::HttpServerStarter::new(
        &config_dropshot,
        api,
        mock_state,
        &log,
    )
    .map_err(|e| anyhow::anyhow!("Failed to create server: {e}"))?
    .start();

    slog::info!(log, "Mock server running on http://127.0.0.1:3001");
    slog::info!(
        log,
        "Try: curl 'http://127.0.0.1:3001/oauth/redirect/emails?code=test'"
    );

    server
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {e}"))?;

    Ok(())
}
