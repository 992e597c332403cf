use axum::{extract::Extension, http::StatusCode, Json};
use serde::de::DeserializeOwned;

use crate::domains::harvesting::{spawn_workflow, Workflow};
use crate::server::app::AppState;

/// Start a workflow run in the background and acknowledge immediately.
///
/// No run id is returned; the caller learns the outcome through its webhook.
pub async fn accept_workflow<W>(
    Extension(state): Extension<AppState>,
    Json(request): Json<W>,
) -> StatusCode
where
    W: Workflow + DeserializeOwned,
{
    tracing::info!(call_type = %W::CALL_TYPE, "Harvest request accepted");
    spawn_workflow(request, state.server_deps.clone());
    StatusCode::ACCEPTED
}
