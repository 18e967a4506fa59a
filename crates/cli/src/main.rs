use anyhow::Context;
use clap::{Parser, Subcommand};
use lending_kernel::settings::Settings;

/// Book lending service command line
#[derive(Debug, Parser)]
#[command(name = "lending-cli", version, about)]
struct Cli {
    /// Override the bind port from configuration
    #[arg(long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Print the resolved settings as JSON
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load lending settings")?;
    if let Some(port) = cli.port {
        settings.server.port = port;
    }

    match cli.command {
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
        Command::Serve => {
            lending_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "lending-cli serve");

            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime.block_on(lending_app::run(settings))
        }
    }
}
