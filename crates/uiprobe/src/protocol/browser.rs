// Browser session
//
// One Browser is one running browser instance: either a process spawned by
// the launcher or an already-running instance attached via connect(). The
// session owns the DevTools connection and must be released exactly once;
// close() is idempotent and a Drop backstop reaps a spawned process that was
// never closed in an orderly way.

use crate::error::{Error, Result};
use crate::protocol::Page;
use crate::server::connection::Connection;
use crate::server::launcher::{self, BrowserProcess};
use crate::server::transport::WebSocketTransport;
use crate::LaunchOptions;
use parking_lot::Mutex as ParkingLotMutex;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

/// How long an orderly `Browser.close` may take before the process is killed
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// A browser session: one running browser instance owned by the probe
pub struct Browser {
    connection: Arc<Connection>,
    dispatch: ParkingLotMutex<Option<JoinHandle<()>>>,
    process: ParkingLotMutex<Option<BrowserProcess>>,
    closed: AtomicBool,
}

impl Browser {
    /// Spawns a headless browser and attaches to its DevTools endpoint.
    pub async fn launch(options: &LaunchOptions) -> Result<Browser> {
        let process = launcher::launch(options).await?;
        let ws_url = process.ws_url.clone();
        let browser = match Self::attach(&ws_url).await {
            Ok(browser) => browser,
            Err(e) => {
                // kill_on_drop reaps the process; only the data dir needs help
                launcher::remove_user_data_dir(&process.user_data_dir);
                return Err(e);
            }
        };
        *browser.process.lock() = Some(process);
        Ok(browser)
    }

    /// Attaches to an already-running browser at the given DevTools endpoint.
    ///
    /// The session still owns the connection: `close()` sends `Browser.close`
    /// to the remote instance.
    pub async fn connect(ws_url: &str) -> Result<Browser> {
        Self::attach(ws_url).await
    }

    async fn attach(ws_url: &str) -> Result<Browser> {
        let (transport, message_rx) = WebSocketTransport::connect(ws_url).await?;
        let (sender, receiver) = transport.into_parts();
        let connection = Arc::new(Connection::new(sender, receiver, message_rx));

        let dispatch = tokio::spawn(Arc::clone(&connection).run());

        Ok(Browser {
            connection,
            dispatch: ParkingLotMutex::new(Some(dispatch)),
            process: ParkingLotMutex::new(None),
            closed: AtomicBool::new(false),
        })
    }

    /// Opens a new page context in this session.
    pub async fn new_page(&self) -> Result<Page> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::TargetClosed {
                target_type: "Browser".to_string(),
                context: "new_page called after close".to_string(),
            });
        }

        let created = self
            .connection
            .send_command(None, "Target.createTarget", json!({ "url": "about:blank" }))
            .await?;
        let target_id = created["targetId"]
            .as_str()
            .ok_or_else(|| {
                Error::ProtocolError("Target.createTarget response missing 'targetId'".to_string())
            })?
            .to_string();

        let attached = self
            .connection
            .send_command(
                None,
                "Target.attachToTarget",
                json!({ "targetId": target_id, "flatten": true }),
            )
            .await?;
        let session_id = attached["sessionId"]
            .as_str()
            .ok_or_else(|| {
                Error::ProtocolError(
                    "Target.attachToTarget response missing 'sessionId'".to_string(),
                )
            })?
            .to_string();

        tracing::debug!(target_id = %target_id, session_id = %session_id, "page context created");

        Ok(Page::new(
            Arc::clone(&self.connection),
            target_id,
            session_id,
        ))
    }

    /// Releases the session.
    ///
    /// Sends an orderly `Browser.close`, stops the dispatch loop, reaps a
    /// spawned process (killing it if it ignores the close), and removes the
    /// per-launch user data directory. Calling close more than once is a
    /// no-op.
    pub async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        tracing::debug!("closing browser session");

        let close_result = tokio::time::timeout(
            CLOSE_TIMEOUT,
            self.connection
                .send_command(None, "Browser.close", serde_json::Value::Null),
        )
        .await;
        match close_result {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Browser.close was rejected");
            }
            Err(_) => {
                tracing::warn!("Browser.close did not complete within {:?}", CLOSE_TIMEOUT);
            }
        }

        if let Some(dispatch) = self.dispatch.lock().take() {
            dispatch.abort();
        }

        let process = self.process.lock().take();
        if let Some(mut process) = process {
            match tokio::time::timeout(CLOSE_TIMEOUT, process.child.wait()).await {
                Ok(Ok(status)) => {
                    tracing::debug!(%status, "browser process exited");
                }
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "failed to reap browser process");
                }
                Err(_) => {
                    tracing::warn!("browser process ignored close; killing it");
                    if let Err(e) = process.child.start_kill() {
                        tracing::warn!(error = %e, "failed to kill browser process");
                    }
                    let _ = tokio::time::timeout(CLOSE_TIMEOUT, process.child.wait()).await;
                }
            }
            launcher::remove_user_data_dir(&process.user_data_dir);
        }

        Ok(())
    }

    /// Whether this session has been released.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Drop for Browser {
    fn drop(&mut self) {
        if let Some(dispatch) = self.dispatch.lock().take() {
            dispatch.abort();
        }
        // kill_on_drop reaps the child; this only covers the data dir and
        // the log line for an unreleased session.
        if let Some(mut process) = self.process.lock().take() {
            tracing::warn!("browser session dropped without close; killing process");
            let _ = process.child.start_kill();
            launcher::remove_user_data_dir(&process.user_data_dir);
        }
    }
}
