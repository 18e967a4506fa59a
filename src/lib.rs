//! Book lending service.
//!
//! Wires the books module onto the kernel registry and the HTTP facade.

pub mod modules;

use std::sync::Arc;

use anyhow::Context;
use lending_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use modules::books::repository::{BookRepository, InMemoryBookRepository};

/// Build a registry backed by a fresh in-memory store.
pub fn build_registry() -> ModuleRegistry {
    build_registry_with(Arc::new(InMemoryBookRepository::new()))
}

/// Build a registry around an externally owned repository.
pub fn build_registry_with(repository: Arc<dyn BookRepository>) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, repository);
    registry
}

/// Initialize modules, serve HTTP until shutdown, then stop modules.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry();
    let ctx = InitCtx {
        settings: &settings,
    };

    registry
        .init_modules(&ctx)
        .await
        .context("module initialization failed")?;
    registry
        .start_modules(&ctx)
        .await
        .context("module start failed")?;

    let served = lending_http::start_server(&registry, &settings).await;

    registry
        .stop_modules()
        .await
        .context("module shutdown failed")?;

    served
}
