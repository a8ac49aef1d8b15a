// Theme-toggle verification probe
//
// Visits a locally running app, waits for the main content to render,
// captures a light-mode screenshot, toggles the theme, waits for the body
// class to flip, and captures a dark-mode screenshot. The browser session is
// released on every exit path.
//
// Run with:
//     cargo run --package uiprobe --example theme_check
//
// The target app must be listening on localhost:8154 (see `cargo run
// --package xtask -- serve`).

use std::time::Duration;
use uiprobe::{Runner, Step};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let steps = vec![
        Step::navigate("/"),
        Step::wait_for_visible("#main-content", Duration::from_secs(20)),
        Step::capture("light_mode.png"),
        Step::click("#theme_toggle"),
        Step::wait_for_class("body", "dark", Duration::from_secs(5)),
        Step::capture("dark_mode.png"),
    ];

    let report = Runner::new().run("http://localhost:8154/", &steps).await;

    for artifact in report.artifacts() {
        println!("captured {}", artifact.display());
    }

    // A failed step has already been logged; surface it to the exit code
    report.into_result()?;
    Ok(())
}
