//! Server startup and configuration.

use anyhow::anyhow;
use dropshot::{ConfigDropshot, HttpServerStarter};
use github_login::api::{AppState, LoginApiImpl, login_api_mod};
use github_login::config::Config;
use github_login::views::Template;

/// Start web server for API.
///
/// # Errors
///
/// Returns an error if:
/// - The bind address cannot be parsed
/// - The API description cannot be created
/// - The HTTP client cannot be created
/// - The server cannot be created
/// - The server encounters an error during operation
#[tokio::main]
pub async fn serve(
    address: &str,
    config: Config,
    home_template: Template,
    log: &slog::Logger,
) -> anyhow::Result<()> {
    let config_dropshot = ConfigDropshot {
        bind_address: address
            .parse()
            .map_err(|error| anyhow!("Invalid bind address: {error}"))?,
        default_request_body_max_bytes: 1024,
        default_handler_task_mode: dropshot::HandlerTaskMode::Detached,
        log_headers: vec![],
    };

    let api = login_api_mod::api_description::<LoginApiImpl>().map_err(
        |error| anyhow!("Failed to create API description: {error}"),
    )?;

    match config.timeout {
        Some(timeout) => {
            slog::debug!(log, "GitHub requests time out after {timeout:?}");
        }
        None => slog::warn!(log, "GitHub requests will never time out"),
    }
    let token_endpoint = config.endpoints.access_token.as_str();
    slog::debug!(log, "GitHub token endpoint: {token_endpoint}");

    let state = AppState::new(config, home_template)?;

    let server = HttpServerStarter::new(&config_dropshot, api, state, log)
        .map_err(|error| anyhow!("Failed to create server: {error}"))?
        .start();

    slog::info!(log, "Server running on http://{}", server.local_addr());

    server
        .await
        .map_err(|error| anyhow!("Server error: {error}"))
}
