// Browser process management
//
// Locates a Chromium/Chrome executable, spawns it headless with a dedicated
// user data directory, and extracts the DevTools WebSocket endpoint from the
// process's stderr.
//
// Discovery order:
// 1. Explicit executable on LaunchOptions (user override)
// 2. UIPROBE_CHROMIUM environment variable (user override)
// 3. which/where lookup on PATH for the usual executable names
// 4. Well-known install locations for the current platform

use crate::api::LaunchOptions;
use crate::error::{Error, Result};
use regex::Regex;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};

/// Environment variable overriding executable discovery
pub const CHROMIUM_ENV: &str = "UIPROBE_CHROMIUM";

static LAUNCH_SEQ: AtomicU32 = AtomicU32::new(0);

/// A spawned headless browser and its DevTools endpoint
pub struct BrowserProcess {
    pub child: Child,
    pub ws_url: String,
    pub user_data_dir: PathBuf,
}

/// Spawns a headless browser and waits for its DevTools endpoint.
pub async fn launch(options: &LaunchOptions) -> Result<BrowserProcess> {
    let executable = find_executable(options)?;
    let user_data_dir = create_user_data_dir()?;

    tracing::debug!(
        executable = %executable.display(),
        user_data_dir = %user_data_dir.display(),
        "launching browser"
    );

    let mut command = Command::new(&executable);
    if options.headless {
        command.arg("--headless=new");
    }
    command
        .arg("--remote-debugging-port=0")
        .arg(format!("--user-data-dir={}", user_data_dir.display()))
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .args(&options.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        // Backstop: if the session is dropped without an orderly close,
        // the runtime reaps the process.
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .map_err(|e| Error::LaunchFailed(format!("{}: {}", executable.display(), e)))?;

    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| Error::LaunchFailed("browser stderr not captured".to_string()))?;

    let mut lines = BufReader::new(stderr).lines();

    let ws_url = tokio::time::timeout(options.launch_timeout, async {
        let mut tail = Vec::new();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| Error::LaunchFailed(format!("reading browser stderr: {}", e)))?
        {
            if let Some(url) = parse_endpoint_line(&line) {
                return Ok(url);
            }
            tracing::trace!(target: "uiprobe::browser", "{}", line);
            tail.push(line);
            if tail.len() > 20 {
                tail.remove(0);
            }
        }
        Err(Error::LaunchFailed(format!(
            "browser exited before advertising a DevTools endpoint: {}",
            tail.join(" | ")
        )))
    })
    .await
    .map_err(|_| {
        Error::Timeout(format!(
            "browser did not advertise a DevTools endpoint within {:?}",
            options.launch_timeout
        ))
    })??;

    // Keep draining stderr so the browser never blocks on a full pipe
    tokio::spawn(async move {
        while let Ok(Some(line)) = lines.next_line().await {
            tracing::trace!(target: "uiprobe::browser", "{}", line);
        }
    });

    tracing::debug!(ws_url = %ws_url, "browser advertised DevTools endpoint");

    Ok(BrowserProcess {
        child,
        ws_url,
        user_data_dir,
    })
}

/// Extracts the DevTools WebSocket URL from a browser stderr line.
pub(crate) fn parse_endpoint_line(line: &str) -> Option<String> {
    // The pattern is fixed; compiling it cannot fail
    let re = Regex::new(r"DevTools listening on (ws://\S+)").ok()?;
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn find_executable(options: &LaunchOptions) -> Result<PathBuf> {
    if let Some(path) = &options.executable {
        if path.exists() {
            return Ok(path.clone());
        }
        return Err(Error::LaunchFailed(format!(
            "configured executable does not exist: {}",
            path.display()
        )));
    }

    if let Ok(path) = std::env::var(CHROMIUM_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(path);
        }
        return Err(Error::LaunchFailed(format!(
            "{} points at a missing executable: {}",
            CHROMIUM_ENV,
            path.display()
        )));
    }

    const CANDIDATES: &[&str] = &[
        "chromium",
        "chromium-browser",
        "google-chrome",
        "google-chrome-stable",
        "chrome",
    ];

    for candidate in CANDIDATES {
        if let Some(path) = find_in_path(candidate) {
            return Ok(path);
        }
    }

    #[cfg(target_os = "macos")]
    let well_known: &[&str] = &[
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    ];

    #[cfg(target_os = "windows")]
    let well_known: &[&str] = &[
        "C:\\Program Files\\Google\\Chrome\\Application\\chrome.exe",
        "C:\\Program Files (x86)\\Google\\Chrome\\Application\\chrome.exe",
    ];

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let well_known: &[&str] = &[
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/usr/bin/google-chrome",
        "/snap/bin/chromium",
    ];

    for location in well_known {
        let path = PathBuf::from(location);
        if path.exists() {
            return Ok(path);
        }
    }

    Err(Error::BrowserNotFound)
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&paths) {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        #[cfg(windows)]
        {
            let exe = dir.join(format!("{}.exe", name));
            if exe.is_file() {
                return Some(exe);
            }
        }
    }
    None
}

fn create_user_data_dir() -> Result<PathBuf> {
    let seq = LAUNCH_SEQ.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("uiprobe-{}-{}", std::process::id(), seq));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Best-effort removal of the per-launch user data directory.
pub fn remove_user_data_dir(dir: &PathBuf) {
    if let Err(e) = std::fs::remove_dir_all(dir) {
        tracing::debug!(dir = %dir.display(), error = %e, "failed to remove user data dir");
    }
}
