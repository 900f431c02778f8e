//! Axum router assembly — the single endpoint hosting all three services.

use std::path::Path;

use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use hearth_app::ports::HomeStateStore;

use crate::state::RpcState;

/// Build the top-level axum [`Router`].
///
/// Mounts every RPC method plus `/health`. When `static_dir` is given, any
/// other path is served from that directory (the controller's web page).
/// Includes a [`TraceLayer`] that logs each request/response at the `DEBUG`
/// level using the `tracing` ecosystem.
pub fn build<S>(state: RpcState<S>, static_dir: Option<&Path>) -> Router
where
    S: HomeStateStore + Send + Sync + 'static,
{
    let mut router = Router::new()
        .route("/health", get(health_check))
        .merge(crate::rpc::routes());

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
