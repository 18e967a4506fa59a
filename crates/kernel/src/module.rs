use async_trait::async_trait;
use axum::Router;

use crate::settings::Settings;

/// Everything a module may read while it boots.
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
}

/// A self-contained slice of the service (routes, docs, lifecycle hooks).
///
/// Hooks default to no-ops so a module only implements what it needs.
#[async_trait]
pub trait Module: Send + Sync {
    /// Mount name; routes are served under `/api/{name}`.
    fn name(&self) -> &'static str;

    /// Runs once for every module before any of them is started.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment with paths relative to the mount point.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs during shutdown, in reverse registration order.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
