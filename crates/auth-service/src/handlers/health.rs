use tracing::instrument;

/// Liveness probe.
///
/// GET /health
#[instrument(skip_all, name = "auth.health.check")]
pub async fn health_check() -> &'static str {
    "OK"
}
