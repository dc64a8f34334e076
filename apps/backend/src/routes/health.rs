//! Liveness endpoints

/// GET /
pub async fn root() -> &'static str {
    "OK"
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "healthy"
}
