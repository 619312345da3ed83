use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use nix::errno::Errno;
use nix::fcntl::{Flock, FlockArg};
use tokio::net::UnixListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::activation::{self, Activation, Callbacks};
use super::errors::InstanceError;
use crate::config::PathsConfig;

struct Listener {
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

/// Process-wide single-instance lock.
///
/// The holder keeps an exclusive `flock` on the lock file for its lifetime
/// and listens on the activation socket for later launches.
pub struct SingleInstanceGuard {
    lock_path: PathBuf,
    socket_path: PathBuf,
    lock: Option<Flock<File>>,
    callbacks: Callbacks,
    listener: Option<Listener>,
}

impl SingleInstanceGuard {
    pub fn new(lock_path: impl Into<PathBuf>, socket_path: impl Into<PathBuf>) -> Self {
        Self {
            lock_path: lock_path.into(),
            socket_path: socket_path.into(),
            lock: None,
            callbacks: Callbacks::default(),
            listener: None,
        }
    }

    pub fn from_paths(paths: &PathsConfig) -> Self {
        Self::new(paths.lock_path(), paths.instance_socket_path())
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    pub fn is_held(&self) -> bool {
        self.lock.is_some()
    }

    /// Register a handler for forwarded activations. Works before or after
    /// [`Self::acquire`].
    pub fn on_second_instance<F>(&self, callback: F)
    where
        F: Fn(Activation) + Send + Sync + 'static,
    {
        self.callbacks.push(Arc::new(callback));
    }

    /// [`Self::acquire_with`] using this process's argv and cwd.
    pub async fn acquire(&mut self) -> Result<bool, InstanceError> {
        self.acquire_with(&Activation::current()).await
    }

    /// Try to become the primary instance.
    ///
    /// Returns `false` when another process holds the lock. In that case
    /// `activation` has been forwarded to it and the caller should exit.
    pub async fn acquire_with(&mut self, activation: &Activation) -> Result<bool, InstanceError> {
        if self.is_held() {
            return Ok(true);
        }

        let lock_display = self.lock_path.display().to_string();
        if let Some(parent) = self.lock_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| InstanceError::LockFile {
                path: lock_display.clone(),
                source,
            })?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(|source| InstanceError::LockFile {
                path: lock_display.clone(),
                source,
            })?;

        let lock = match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(lock) => lock,
            Err((_, errno)) if errno == Errno::EWOULDBLOCK => {
                self.deny(activation).await;
                return Ok(false);
            }
            Err((_, errno)) => {
                return Err(InstanceError::LockFailed {
                    path: lock_display,
                    message: errno.to_string(),
                });
            }
        };

        write_pid(&lock).map_err(|source| InstanceError::LockFile {
            path: lock_display.clone(),
            source,
        })?;

        let listener = self.bind_listener()?;
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(activation::listen(
            listener,
            self.callbacks.clone(),
            shutdown.clone(),
        ));

        self.lock = Some(lock);
        self.listener = Some(Listener { shutdown, task });

        info!(
            event = "core.instance.acquire_completed",
            lock = %lock_display,
            pid = std::process::id()
        );
        Ok(true)
    }

    fn bind_listener(&self) -> Result<UnixListener, InstanceError> {
        let socket_error = |source| InstanceError::Socket {
            path: self.socket_path.display().to_string(),
            source,
        };

        // Holding the lock means any existing socket file is stale.
        match std::fs::remove_file(&self.socket_path) {
            Ok(()) => debug!(event = "core.instance.stale_socket_removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(socket_error(e)),
        }

        UnixListener::bind(&self.socket_path).map_err(socket_error)
    }

    async fn deny(&self, activation: &Activation) {
        info!(
            event = "core.instance.acquire_denied",
            lock = %self.lock_path.display(),
            holder_pid = ?read_holder_pid(&self.lock_path)
        );

        if let Err(e) = activation::forward(&self.socket_path, activation).await {
            warn!(
                event = "core.instance.forward_failed",
                socket = %self.socket_path.display(),
                error = %e
            );
        }
    }

    /// Stop listening, remove the socket and drop the lock. Idempotent.
    pub async fn release(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.shutdown.cancel();
            if let Err(e) = listener.task.await {
                warn!(event = "core.instance.listener_join_failed", error = %e);
            }
        }

        if self.lock.take().is_some() {
            remove_socket(&self.socket_path);
            info!(event = "core.instance.release_completed", lock = %self.lock_path.display());
        }
    }
}

impl Drop for SingleInstanceGuard {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.shutdown.cancel();
        }
        if self.lock.take().is_some() {
            remove_socket(&self.socket_path);
        }
    }
}

fn write_pid(file: &File) -> std::io::Result<()> {
    file.set_len(0)?;
    let mut writer = file;
    writeln!(writer, "{}", std::process::id())?;
    writer.flush()
}

fn remove_socket(path: &Path) {
    if let Err(e) = std::fs::remove_file(path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!(
            event = "core.instance.socket_remove_failed",
            socket = %path.display(),
            error = %e
        );
    }
}

/// Pid recorded by the current holder, if readable.
pub fn read_holder_pid(lock_path: &Path) -> Option<u32> {
    std::fs::read_to_string(lock_path)
        .ok()
        .and_then(|content| content.trim().parse().ok())
}
