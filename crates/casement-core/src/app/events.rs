use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::bridge::ResponseEnvelope;
use crate::instance::Activation;
use crate::window::PlatformEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitReason {
    /// `quit` over the bridge socket.
    Ipc,
    /// SIGINT / ctrl-c.
    Signal,
    /// The platform asked to quit (e.g. Cmd+Q).
    Platform,
    /// Main or last window closed and the platform does not keep apps alive.
    WindowsClosed,
}

/// Everything the host loop reacts to, in arrival order.
#[derive(Debug)]
pub enum HostEvent {
    Platform(PlatformEvent),
    SecondInstance(Activation),
    Invoke {
        command: String,
        args: Vec<Value>,
        reply: oneshot::Sender<ResponseEnvelope<Value>>,
    },
    Quit(QuitReason),
}

pub type HostSender = mpsc::UnboundedSender<HostEvent>;
pub type HostReceiver = mpsc::UnboundedReceiver<HostEvent>;

pub fn host_channel() -> (HostSender, HostReceiver) {
    mpsc::unbounded_channel()
}
