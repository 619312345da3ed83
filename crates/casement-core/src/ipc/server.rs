//! Bridge IPC server.
//!
//! Accepts connections on the bridge socket and forwards each request to the
//! host loop as a [`HostEvent`]. Requests on one connection are answered in
//! order; the connection waits for each reply before reading the next line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::BufReader;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::codec::{read_message, write_message};
use super::errors::IpcError;
use super::messages::{ClientMessage, HostMessage};
use crate::app::{HostEvent, HostSender, QuitReason};

/// Pause before retrying `accept()` after an error such as `EMFILE`.
pub(crate) const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

pub struct IpcServer {
    path: PathBuf,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl IpcServer {
    /// Bind `path` and start accepting. A stale socket file is replaced.
    pub async fn start(
        path: &Path,
        host: HostSender,
        shutdown: CancellationToken,
    ) -> Result<Self, IpcError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!(event = "core.ipc.stale_socket_removed", path = %path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let listener = UnixListener::bind(path).map_err(|source| IpcError::BindFailed {
            path: path.display().to_string(),
            source,
        })?;

        info!(event = "core.ipc.server_started", path = %path.display());

        let task = tokio::spawn(accept_loop(listener, host, shutdown.clone()));
        Ok(Self {
            path: path.to_path_buf(),
            shutdown,
            task,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stop accepting, close open connections and remove the socket file.
    pub async fn stop(self) {
        self.shutdown.cancel();
        if let Err(e) = self.task.await {
            warn!(event = "core.ipc.server_join_failed", error = %e);
        }
        if let Err(e) = tokio::fs::remove_file(&self.path).await
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(
                event = "core.ipc.socket_remove_failed",
                path = %self.path.display(),
                error = %e
            );
        }
        info!(event = "core.ipc.server_stopped", path = %self.path.display());
    }
}

async fn accept_loop(listener: UnixListener, host: HostSender, shutdown: CancellationToken) {
    loop {
        tokio::select! {
            result = listener.accept() => match result {
                Ok((stream, _)) => {
                    tokio::spawn(handle_connection(stream, host.clone(), shutdown.clone()));
                }
                Err(e) => {
                    warn!(event = "core.ipc.accept_failed", error = %e);
                    if !backoff_after_accept_error(&shutdown).await {
                        break;
                    }
                }
            },
            _ = shutdown.cancelled() => break,
        }
    }
}

/// Wait [`ACCEPT_RETRY_DELAY`] before the next `accept()`. Returns `false`
/// if shutdown fired in the meantime.
pub(crate) async fn backoff_after_accept_error(shutdown: &CancellationToken) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(ACCEPT_RETRY_DELAY) => true,
        _ = shutdown.cancelled() => false,
    }
}

/// Serve one client until it disconnects or the server shuts down.
pub async fn handle_connection(stream: UnixStream, host: HostSender, shutdown: CancellationToken) {
    debug!(event = "core.ipc.connection_accepted");

    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);

    loop {
        let next = tokio::select! {
            result = read_message::<_, ClientMessage>(&mut reader) => result,
            _ = shutdown.cancelled() => {
                debug!(event = "core.ipc.connection_shutdown");
                break;
            }
        };

        let reply = match next {
            Ok(Some(message)) => handle_message(message, &host).await,
            Ok(None) => {
                debug!(event = "core.ipc.connection_closed");
                break;
            }
            Err(IpcError::Decode { message }) => {
                warn!(event = "core.ipc.malformed_message", error = %message);
                HostMessage::Error {
                    id: String::new(),
                    code: "invalid_message".to_string(),
                    message,
                }
            }
            Err(e) => {
                warn!(event = "core.ipc.read_failed", error = %e);
                break;
            }
        };

        if let Err(e) = write_message(&mut writer, &reply).await {
            warn!(event = "core.ipc.write_failed", error = %e);
            break;
        }
    }
}

async fn handle_message(message: ClientMessage, host: &HostSender) -> HostMessage {
    match message {
        ClientMessage::Invoke { id, command, args } => {
            debug!(event = "core.ipc.invoke_received", request_id = %id, command = %command);
            let (reply, response) = oneshot::channel();
            if host
                .send(HostEvent::Invoke {
                    command,
                    args,
                    reply,
                })
                .is_err()
            {
                return host_unavailable(id);
            }
            match response.await {
                Ok(envelope) => HostMessage::Response { id, envelope },
                Err(_) => host_unavailable(id),
            }
        }
        ClientMessage::Ping { id } => HostMessage::Ack { id },
        ClientMessage::Quit { id } => {
            info!(event = "core.ipc.quit_requested", request_id = %id);
            if host.send(HostEvent::Quit(QuitReason::Ipc)).is_err() {
                return host_unavailable(id);
            }
            HostMessage::Ack { id }
        }
    }
}

fn host_unavailable(id: String) -> HostMessage {
    HostMessage::Error {
        id,
        code: "host_unavailable".to_string(),
        message: "host is shutting down".to_string(),
    }
}
