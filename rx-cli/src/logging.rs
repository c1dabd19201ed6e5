use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};
use task_local_extensions::Extensions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logs every request going out and the status of what comes back.
///
/// Unsuccessful responses are passed on untouched, the API client
/// needs their bodies to tell validation errors apart.
pub(crate) struct LogRequestsMiddleware;

#[async_trait::async_trait]
impl Middleware for LogRequestsMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        tracing::info!(
            url = %req.url(),
            method = %req.method(),
            "Running request"
        );
        let result = next.run(req, extensions).await;
        match &result {
            Ok(resp) => {
                let status = resp.status();
                let content_length = resp.content_length();
                if status.is_client_error() {
                    tracing::warn!(?status, ?content_length, "Client error on response");
                } else if status.is_server_error() {
                    tracing::error!(?status, ?content_length, "Server error on response");
                } else {
                    tracing::info!(?status, ?content_length, "Got response");
                }
            }
            Err(e) => {
                tracing::error!(%e, "Request failed without a response");
            }
        }
        result
    }
}

pub fn setup_tracing(ansi: bool) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(ansi)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::from_default_env())
        .try_init();
}
