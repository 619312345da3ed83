//! Top-level host state machine.
//!
//! `Starting → AwaitingReady → Ready → Running → ShuttingDown → Terminated`.
//! A denied single-instance lock goes straight from `Starting` to
//! `Terminated`.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::context::HostContext;
use super::errors::AppError;
use super::events::{HostEvent, HostReceiver, HostSender, QuitReason, host_channel};
use super::state::AppPhase;
use crate::bridge::{CommandBridge, ResponseEnvelope, Route, handlers, respond};
use crate::config::CasementConfig;
use crate::events::{log_app_error, log_app_shutdown, log_app_startup};
use crate::files::{DialogProvider, HeadlessDialogs};
use crate::instance::{Activation, SingleInstanceGuard};
use crate::ipc::IpcServer;
use crate::window::{
    APP_PROTOCOL, HeadlessBackend, LifecycleNotice, MAIN_WINDOW_ID, Outcome, PlatformEvent,
    PlatformReceiver, PlatformSender, WindowBackend, WindowOptions, platform_channel,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// This process was the primary instance and has shut down.
    Exited,
    /// Another instance holds the lock; the activation was forwarded.
    SecondaryInstance,
}

pub struct Orchestrator {
    ctx: HostContext,
    bridge: CommandBridge,
    guard: SingleInstanceGuard,
    activation: Activation,
    host_tx: HostSender,
    host_rx: HostReceiver,
    platform_rx: Option<PlatformReceiver>,
    ipc: Option<IpcServer>,
    shutdown: CancellationToken,
    handle_signals: bool,
}

impl Orchestrator {
    pub fn new(
        config: CasementConfig,
        backend: Box<dyn WindowBackend>,
        platform_tx: PlatformSender,
        platform_rx: PlatformReceiver,
    ) -> Self {
        let guard = SingleInstanceGuard::from_paths(&config.paths);
        let ctx = HostContext::new(config, backend, platform_tx, Arc::new(HeadlessDialogs));
        let (host_tx, host_rx) = host_channel();

        Self {
            ctx,
            bridge: CommandBridge::new(),
            guard,
            activation: Activation::current(),
            host_tx,
            host_rx,
            platform_rx: Some(platform_rx),
            ipc: None,
            shutdown: CancellationToken::new(),
            handle_signals: true,
        }
    }

    /// Orchestrator on the headless backend. The returned handle shares
    /// state with the backend the host drives.
    pub fn headless(config: CasementConfig) -> (Self, HeadlessBackend) {
        let (tx, rx) = platform_channel();
        let backend = HeadlessBackend::new(tx.clone());
        let orchestrator = Self::new(config, Box::new(backend.clone()), tx, rx);
        (orchestrator, backend)
    }

    /// Argv and cwd to forward if another instance already runs.
    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    pub fn with_dialogs(mut self, dialogs: Arc<dyn DialogProvider>) -> Self {
        self.ctx.dialogs = dialogs;
        self
    }

    /// Do not install the ctrl-c handler.
    pub fn without_signal_handling(mut self) -> Self {
        self.handle_signals = false;
        self
    }

    /// Sender for injecting host events, e.g. a quit from an embedder.
    pub fn host_sender(&self) -> HostSender {
        self.host_tx.clone()
    }

    pub fn context(&self) -> &HostContext {
        &self.ctx
    }

    pub async fn run(mut self) -> Result<RunOutcome, AppError> {
        info!(
            event = "core.app.run_started",
            environment = %self.ctx.config.app.environment(),
            runtime_dir = %self.ctx.config.paths.runtime_dir().display()
        );

        let host_tx = self.host_tx.clone();
        self.guard.on_second_instance(move |activation| {
            let _ = host_tx.send(HostEvent::SecondInstance(activation));
        });

        if !self.guard.acquire_with(&self.activation).await? {
            self.ctx.state.advance(AppPhase::Terminated);
            info!(event = "core.app.secondary_instance_exit");
            return Ok(RunOutcome::SecondaryInstance);
        }
        self.ctx.state.advance(AppPhase::AwaitingReady);

        if let Some(platform_rx) = self.platform_rx.take() {
            tokio::spawn(forward_platform_events(
                platform_rx,
                self.host_tx.clone(),
                self.shutdown.clone(),
            ));
        }
        if self.handle_signals {
            tokio::spawn(listen_for_ctrl_c(self.host_tx.clone(), self.shutdown.clone()));
        }

        if let Err(e) = self.ctx.windows.backend_mut().launch() {
            error!(event = "core.app.launch_failed", error = %e);
            self.abort_launch().await;
            return Err(e.into());
        }

        while self.ctx.state.phase() < AppPhase::ShuttingDown {
            let Some(event) = self.host_rx.recv().await else {
                break;
            };

            if let Err(e) = self.handle_event(event).await {
                if self.ctx.state.phase() < AppPhase::Running {
                    error!(event = "core.app.launch_failed", error = %e);
                    self.abort_launch().await;
                    return Err(e);
                }
                log_app_error(&e);
            }
        }

        self.before_quit().await;
        Ok(RunOutcome::Exited)
    }

    async fn handle_event(&mut self, event: HostEvent) -> Result<(), AppError> {
        match event {
            HostEvent::Platform(PlatformEvent::Ready) => self.on_ready().await?,
            HostEvent::Platform(PlatformEvent::Activate) => self.reactivate()?,
            HostEvent::Platform(PlatformEvent::QuitRequested) => {
                self.begin_shutdown(QuitReason::Platform)
            }
            HostEvent::Platform(PlatformEvent::Window { id, event }) => {
                self.ctx.windows.handle_platform_event(&id, event)
            }
            HostEvent::SecondInstance(activation) => {
                info!(
                    event = "core.app.second_instance",
                    args = ?activation.args,
                    cwd = %activation.cwd
                );
                self.reactivate()?
            }
            HostEvent::Invoke {
                command,
                args,
                reply,
            } => self.invoke(command, args, reply),
            HostEvent::Quit(reason) => self.begin_shutdown(reason),
        }

        self.apply_notices();
        Ok(())
    }

    /// Commands, protocol, bridge socket, main window. Any failure here
    /// aborts the launch.
    async fn on_ready(&mut self) -> Result<(), AppError> {
        if self.ctx.state.phase() != AppPhase::AwaitingReady {
            debug!(event = "core.app.ready_ignored", phase = ?self.ctx.state.phase());
            return Ok(());
        }
        self.ctx.state.advance(AppPhase::Ready);
        info!(event = "core.app.ready_started");

        self.bridge.register_defaults()?;

        if !self.ctx.config.app.environment().is_development() {
            let root = self.ctx.config.app.bundle_dir();
            self.ctx
                .windows
                .backend_mut()
                .register_protocol(APP_PROTOCOL, &root)?;
        }

        let server = IpcServer::start(
            &self.ctx.config.paths.bridge_socket_path(),
            self.host_tx.clone(),
            self.shutdown.child_token(),
        )
        .await?;
        self.ipc = Some(server);

        self.ctx.windows.create_main(&WindowOptions::default())?;

        self.ctx.state.advance(AppPhase::Running);
        log_app_startup(&self.ctx.config);
        Ok(())
    }

    fn invoke(
        &mut self,
        command: String,
        args: Vec<Value>,
        reply: oneshot::Sender<ResponseEnvelope<Value>>,
    ) {
        match self.bridge.route(&command, &args) {
            Ok(Route::Inline(inline)) => {
                let envelope = respond(&command, handlers::run_inline(&mut self.ctx, inline));
                send_reply(&command, reply, envelope);
            }
            Ok(Route::Background(file_command)) => {
                let dialogs = self.ctx.dialogs.clone();
                tokio::spawn(async move {
                    let result = handlers::run_file(file_command, dialogs).await;
                    let envelope = respond(&command, result);
                    send_reply(&command, reply, envelope);
                });
            }
            Err(e) => {
                let envelope = respond(&command, Err(e));
                send_reply(&command, reply, envelope);
            }
        }
    }

    /// Second launch or dock click: bring the app back to the front.
    fn reactivate(&mut self) -> Result<(), AppError> {
        if !self.ctx.state.is_running() {
            debug!(event = "core.app.reactivate_ignored", phase = ?self.ctx.state.phase());
            return Ok(());
        }

        if self.ctx.windows.registry().is_empty() {
            info!(event = "core.app.reactivate_recreating_main");
            self.ctx.windows.create_main(&WindowOptions::default())?;
            return Ok(());
        }

        let restored = self.ctx.windows.restore(MAIN_WINDOW_ID);
        if restored == Outcome::Applied {
            self.ctx.windows.focus(MAIN_WINDOW_ID);
        }
        debug!(event = "core.app.reactivate_completed", outcome = ?restored);
        Ok(())
    }

    fn apply_notices(&mut self) {
        for notice in self.ctx.windows.take_notices() {
            match notice {
                LifecycleNotice::WindowClosed { id } => {
                    debug!(event = "core.app.window_closed", window_id = %id);
                }
                LifecycleNotice::MainWindowClosed | LifecycleNotice::AllWindowsClosed => {
                    if !self.ctx.state.is_running() {
                        continue;
                    }
                    if self.ctx.config.app.keep_alive_without_windows() {
                        info!(event = "core.app.keep_alive", notice = ?notice);
                    } else {
                        self.begin_shutdown(QuitReason::WindowsClosed);
                    }
                }
            }
        }
    }

    fn begin_shutdown(&mut self, reason: QuitReason) {
        if self.ctx.state.phase() >= AppPhase::ShuttingDown {
            return;
        }
        info!(event = "core.app.shutdown_requested", reason = ?reason);
        self.ctx.state.advance(AppPhase::ShuttingDown);
        self.ctx.windows.begin_shutdown();
    }

    /// Close windows, stop the bridge socket, release the lock. Bounded by
    /// `shutdown_timeout_ms`; failures are logged and never stop the exit.
    async fn before_quit(&mut self) {
        log_app_shutdown(self.ctx.windows.registry().len());

        let timeout_ms = self.ctx.config.app.shutdown_timeout_ms();
        let windows = &mut self.ctx.windows;
        let guard = &mut self.guard;
        let ipc = self.ipc.take();

        let cleanup = async move {
            let closed = windows.close_all();
            if let Some(server) = ipc {
                server.stop().await;
            }
            guard.release().await;
            closed
        };

        match tokio::time::timeout(Duration::from_millis(timeout_ms), cleanup).await {
            Ok(closed) => info!(event = "core.app.shutdown_completed", windows_closed = closed),
            Err(_) => warn!(event = "core.app.shutdown_timed_out", timeout_ms = timeout_ms),
        }

        self.shutdown.cancel();
        self.ctx.state.advance(AppPhase::Terminated);
    }

    async fn abort_launch(&mut self) {
        self.shutdown.cancel();
        if let Some(server) = self.ipc.take() {
            server.stop().await;
        }
        self.ctx.windows.begin_shutdown();
        self.ctx.windows.close_all();
        self.guard.release().await;
        self.ctx.state.advance(AppPhase::Terminated);
    }
}

fn send_reply(
    command: &str,
    reply: oneshot::Sender<ResponseEnvelope<Value>>,
    envelope: ResponseEnvelope<Value>,
) {
    if reply.send(envelope).is_err() {
        debug!(event = "core.app.reply_dropped", command = command);
    }
}

async fn forward_platform_events(
    mut platform_rx: PlatformReceiver,
    host: HostSender,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            event = platform_rx.recv() => match event {
                Some(event) => {
                    if host.send(HostEvent::Platform(event)).is_err() {
                        break;
                    }
                }
                None => break,
            },
            _ = shutdown.cancelled() => break,
        }
    }
}

async fn listen_for_ctrl_c(host: HostSender, shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => {
                info!(event = "core.app.signal_received", signal = "SIGINT");
                let _ = host.send(HostEvent::Quit(QuitReason::Signal));
            }
            Err(e) => warn!(event = "core.app.signal_handler_failed", error = %e),
        },
        _ = shutdown.cancelled() => {}
    }
}
