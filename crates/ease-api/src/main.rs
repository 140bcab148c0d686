//! Ease CLI and REST API entry point.
//!
//! Binary name: `ease`
//!
//! Parses CLI arguments, loads config, then dispatches to the terminal
//! chat loop or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match args.verbose {
        0 if args.quiet => "error",
        0 => "warn",
        1 => "info,ease=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let config = ease_infra::config::load_config(&args.config).await;

    match args.command {
        Commands::Serve { port, host } => {
            let state = AppState::new(config);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(%addr, "REST API starting");

            println!(
                "  {} Ease API listening on {}",
                console::style("🌱").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
        }

        Commands::History { user } => {
            let history = ease_core::history::SessionService::new(
                ease_infra::history::InMemorySessionHistory::with_samples(),
                config,
            );
            let summaries = history.list_recent(&user).await?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else if summaries.is_empty() {
                println!("  {}", console::style("No sessions recorded yet.").dim());
            } else {
                for summary in &summaries {
                    let mood = summary
                        .mood
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "-".into());
                    println!(
                        "  {}  {}  {}",
                        console::style(summary.started_at.format("%Y-%m-%d")).dim(),
                        console::style(&summary.title).bold(),
                        console::style(format!("[{mood}, {} messages]", summary.message_count))
                            .dim()
                    );
                }
            }
        }

        Commands::Chat { user, scripted } => {
            cli::chat::run(&user, scripted, config).await?;
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
