use futures::future::{self, Either};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use shared::{ContentRequest, DashboardConfig, DashboardError, SessionVar, Snapshot};
use web_sys::AbortController;

/// Posts the current selection to the content endpoint and decodes the reply.
#[derive(Clone, Debug)]
pub struct SnapshotFetcher {
    content_url: String,
    timeout_ms: u32,
}

impl SnapshotFetcher {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            content_url: config.endpoints.content.clone(),
            timeout_ms: config.refresh.request_timeout_ms,
        }
    }

    pub async fn fetch(&self, request: &ContentRequest) -> Result<Snapshot, DashboardError> {
        let abort = AbortController::new()
            .map_err(|error| DashboardError::NetworkFailure(format!("{:?}", error)))?;
        let signal = abort.signal();

        let response = Box::pin(self.post(request, &signal));
        let timeout = Box::pin(TimeoutFuture::new(self.timeout_ms));

        match future::select(response, timeout).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => {
                abort.abort();
                Err(DashboardError::NetworkTimeout)
            }
        }
    }

    async fn post(
        &self,
        request: &ContentRequest,
        signal: &web_sys::AbortSignal,
    ) -> Result<Snapshot, DashboardError> {
        let response = Request::post(&self.content_url)
            .abort_signal(Some(signal))
            .json(request)
            .map_err(network_failure)?
            .send()
            .await
            .map_err(network_failure)?;

        if !response.ok() {
            return Err(DashboardError::NetworkFailure(format!(
                "{} returned HTTP {}",
                self.content_url,
                response.status()
            )));
        }

        let text = response.text().await.map_err(network_failure)?;
        Snapshot::from_response_text(&text)
    }
}

fn network_failure(error: gloo_net::Error) -> DashboardError {
    DashboardError::NetworkFailure(error.to_string())
}

/// Fire-and-forget; a failed push only reaches the console.
pub async fn push_session_var(url: String, var: SessionVar) {
    let result = match Request::post(&url).json(&var) {
        Ok(request) => request.send().await.map(|response| response.status()),
        Err(error) => Err(error),
    };
    match result {
        Ok(status) if (200..300).contains(&status) => {}
        Ok(status) => zoon::eprintln!("Setting {} failed with HTTP {}", var.key, status),
        Err(error) => zoon::eprintln!("Setting {} failed: {}", var.key, error),
    }
}
