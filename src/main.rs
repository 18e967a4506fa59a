use anyhow::Context;
use lending_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load lending settings")?;
    lending_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        address = %settings.server.bind_address(),
        "lending-app bootstrap starting"
    );

    lending_app::run(settings).await?;

    tracing::info!("lending-app shut down");
    Ok(())
}
