//! Test helpers for unit tests

use dropshot::{
    ApiDescription, ConfigDropshot, HandlerTaskMode, HttpServer,
    HttpServerStarter, ServerContext,
};

/// A logger that throws everything away.
#[must_use]
pub fn discard_log() -> slog::Logger {
    slog::Logger::root(slog::Discard, slog::o!())
}

/// A running API server on an ephemeral port.
pub struct TestServer<C: ServerContext> {
    /// The server, kept so it can be shut down.
    server: HttpServer<C>,
    /// Client for making requests to the server.
    client: reqwest::Client,
}

impl<C: ServerContext> TestServer<C> {
    /// Start a server for `api` on `127.0.0.1` with a random port.
    ///
    /// # Panics
    ///
    /// Panics if the server can’t be started.
    pub fn start(api: ApiDescription<C>, context: C) -> Self {
        let config = ConfigDropshot {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            default_request_body_max_bytes: 1024,
            default_handler_task_mode: HandlerTaskMode::Detached,
            log_headers: vec![],
        };

        let log = discard_log();
        let server = HttpServerStarter::new(&config, api, context, &log)
            .unwrap()
            .start();

        Self { server, client: reqwest::Client::new() }
    }

    /// Make a `GET` request to `path` on the server.
    ///
    /// # Panics
    ///
    /// Panics if the request can’t be sent.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        let url = format!("http://{}{path}", self.server.local_addr());
        self.client.get(url).send().await.unwrap()
    }

    /// Stop the server.
    ///
    /// # Panics
    ///
    /// Panics if the server doesn’t shut down cleanly.
    pub async fn close(self) {
        self.server.close().await.unwrap();
    }
}
