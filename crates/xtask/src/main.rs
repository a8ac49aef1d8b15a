// Dev task runner
//
// `xtask serve` hosts a self-contained demo app with a theme toggle, the
// reference target for probes. `xtask probe` runs the canonical theme-toggle
// verification against it (or any other conformant target).

use anyhow::Context;
use axum::{Router, response::Html, routing::get};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use uiprobe::{Runner, Step};

#[derive(Parser)]
#[command(about = "Development tasks for uiprobe")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the demo target app with a theme toggle
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 8154)]
        port: u16,
    },
    /// Run the theme-toggle verification probe
    Probe {
        /// Base URL of the target app
        #[arg(long, default_value = "http://127.0.0.1:8154/")]
        target: String,
        /// Directory for the captured screenshots
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    match Cli::parse().command {
        Commands::Serve { port } => serve(port).await,
        Commands::Probe { target, out_dir } => probe(&target, &out_dir).await,
    }
}

async fn serve(port: u16) -> anyhow::Result<()> {
    let app = Router::new().route("/", get(demo_page));

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind 127.0.0.1:{}", port))?;

    tracing::info!("demo app listening on http://127.0.0.1:{}/", port);
    axum::serve(listener, app).await.context("demo app failed")
}

async fn probe(target: &str, out_dir: &std::path::Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let steps = vec![
        Step::navigate("/"),
        Step::wait_for_visible("#main-content", Duration::from_secs(20)),
        Step::capture(out_dir.join("light_mode.png")),
        Step::click("#theme_toggle"),
        Step::wait_for_class("body", "dark", Duration::from_secs(5)),
        Step::capture(out_dir.join("dark_mode.png")),
    ];

    let report = Runner::new().run(target, &steps).await;

    for artifact in report.artifacts() {
        println!("captured {}", artifact.display());
    }

    let artifacts = report
        .into_result()
        .context("theme-toggle probe failed")?;
    tracing::info!(artifacts = artifacts.len(), "probe succeeded");
    Ok(())
}

async fn demo_page() -> Html<&'static str> {
    Html(DEMO_PAGE)
}

const DEMO_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>uiprobe demo</title>
  <style>
    body { background: #ffffff; color: #1a1a1a; font-family: sans-serif; }
    body.dark { background: #1a1a1a; color: #f5f5f5; }
    #main-content { max-width: 40rem; margin: 4rem auto; }
  </style>
</head>
<body>
  <div id="main-content">
    <h1>Demo app</h1>
    <p>A minimal target for the theme-toggle verification probe.</p>
    <button id="theme_toggle">Toggle theme</button>
  </div>
  <script>
    document.getElementById('theme_toggle').addEventListener('click', () => {
      document.body.className = document.body.className === 'dark' ? '' : 'dark';
    });
  </script>
</body>
</html>
"#;
