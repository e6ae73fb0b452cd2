pub mod auth;
pub mod campaign_requests;
pub mod campaigns;
pub mod creator_requests;
pub mod donations;
pub mod error;
pub mod reports;
pub mod routes;
pub mod session;
pub mod updates;
pub mod uploads;

pub use auth::{AppState, AppStateInner};
pub use routes::router;

use fundwell_core::{WorkflowError, WorkflowResult};
use tracing::error;

/// Run a synchronous workflow off the async runtime.
pub(crate) async fn blocking<T, F>(f: F) -> WorkflowResult<T>
where
    F: FnOnce() -> WorkflowResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        WorkflowError::Persistence(anyhow::anyhow!("worker task failed: {}", e))
    })?
}
