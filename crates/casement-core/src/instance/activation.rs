//! Forwarding a denied launch to the running instance.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::ipc::codec::{read_message, write_message};
use crate::ipc::server::backoff_after_accept_error;

const FORWARD_ATTEMPTS: u32 = 5;
const FORWARD_RETRY_DELAY: Duration = Duration::from_millis(100);
/// A forwarding process writes one line right after connecting.
const ACTIVATION_READ_TIMEOUT: Duration = Duration::from_secs(2);

/// What a second launch asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activation {
    pub args: Vec<String>,
    pub cwd: String,
}

impl Activation {
    /// Arguments and working directory of the current process.
    pub fn current() -> Self {
        Self {
            args: std::env::args().collect(),
            cwd: std::env::current_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }
}

pub type ActivationCallback = Arc<dyn Fn(Activation) + Send + Sync>;

/// Callbacks shared between the guard and its listener task.
#[derive(Clone, Default)]
pub(crate) struct Callbacks {
    inner: Arc<Mutex<Vec<ActivationCallback>>>,
}

impl Callbacks {
    pub(crate) fn push(&self, callback: ActivationCallback) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(callback);
    }

    fn notify(&self, activation: &Activation) {
        let callbacks: Vec<ActivationCallback> = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for callback in callbacks {
            callback(activation.clone());
        }
    }
}

/// Send `activation` to the holder's socket.
///
/// The holder binds its socket right after taking the lock, so a launch
/// that races it retries briefly.
pub(crate) async fn forward(socket_path: &Path, activation: &Activation) -> std::io::Result<()> {
    let mut attempt = 1;
    let mut stream = loop {
        match UnixStream::connect(socket_path).await {
            Ok(stream) => break stream,
            Err(e) if attempt < FORWARD_ATTEMPTS => {
                debug!(
                    event = "core.instance.forward_retry",
                    attempt = attempt,
                    error = %e
                );
                attempt += 1;
                tokio::time::sleep(FORWARD_RETRY_DELAY).await;
            }
            Err(e) => return Err(e),
        }
    };

    write_message(&mut stream, activation)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    stream.shutdown().await
}

pub(crate) async fn listen(listener: UnixListener, callbacks: Callbacks, shutdown: CancellationToken) {
    loop {
        tokio::select! {
            result = listener.accept() => match result {
                Ok((stream, _)) => {
                    tokio::spawn(receive(stream, callbacks.clone(), ACTIVATION_READ_TIMEOUT));
                }
                Err(e) => {
                    warn!(event = "core.instance.accept_failed", error = %e);
                    if !backoff_after_accept_error(&shutdown).await {
                        break;
                    }
                }
            },
            _ = shutdown.cancelled() => break,
        }
    }
    debug!(event = "core.instance.listener_stopped");
}

async fn receive(stream: UnixStream, callbacks: Callbacks, read_timeout: Duration) {
    let mut reader = BufReader::new(stream);
    let Ok(result) =
        tokio::time::timeout(read_timeout, read_message::<_, Activation>(&mut reader)).await
    else {
        warn!(
            event = "core.instance.activation_timed_out",
            timeout_ms = read_timeout.as_millis() as u64
        );
        return;
    };
    match result {
        Ok(Some(activation)) => {
            info!(
                event = "core.instance.second_instance_received",
                args = ?activation.args,
                cwd = %activation.cwd
            );
            callbacks.notify(&activation);
        }
        Ok(None) => debug!(event = "core.instance.empty_activation"),
        Err(e) => warn!(event = "core.instance.activation_invalid", error = %e),
    }
}
