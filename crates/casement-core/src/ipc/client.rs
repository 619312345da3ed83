use std::path::Path;

use serde_json::Value;
use tokio::io::BufReader;
use tokio::net::UnixStream;
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tracing::debug;

use super::codec::{read_message, write_message};
use super::errors::IpcError;
use super::messages::{ClientMessage, HostMessage};
use crate::bridge::ResponseEnvelope;

/// UI-side client of the bridge socket.
pub struct BridgeClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    next_id: u64,
}

impl BridgeClient {
    pub async fn connect(socket_path: &Path) -> Result<Self, IpcError> {
        let stream = UnixStream::connect(socket_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::ConnectionRefused
                || e.kind() == std::io::ErrorKind::NotFound
            {
                IpcError::NotRunning {
                    path: socket_path.display().to_string(),
                }
            } else {
                IpcError::ConnectionFailed(e.to_string())
            }
        })?;

        let (reader, writer) = stream.into_split();
        debug!(event = "core.ipc.client_connected", socket = %socket_path.display());

        Ok(Self {
            reader: BufReader::new(reader),
            writer,
            next_id: 1,
        })
    }

    fn next_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id += 1;
        format!("req-{}", id)
    }

    async fn request(&mut self, message: &ClientMessage) -> Result<HostMessage, IpcError> {
        write_message(&mut self.writer, message).await?;
        let response: HostMessage = read_message(&mut self.reader)
            .await?
            .ok_or_else(|| IpcError::ConnectionFailed("connection closed".to_string()))?;

        let echoed = match &response {
            HostMessage::Error { code, message: text, .. } => {
                return Err(IpcError::Remote {
                    code: code.clone(),
                    message: text.clone(),
                });
            }
            HostMessage::Response { id, .. } | HostMessage::Ack { id } => id,
        };
        if echoed != message.id() {
            return Err(IpcError::ProtocolError(format!(
                "response id '{}' does not match request '{}'",
                echoed,
                message.id()
            )));
        }
        Ok(response)
    }

    /// Run one bridge command on the host.
    pub async fn invoke(
        &mut self,
        command: &str,
        args: Vec<Value>,
    ) -> Result<ResponseEnvelope<Value>, IpcError> {
        let id = self.next_id();
        let message = ClientMessage::Invoke {
            id,
            command: command.to_string(),
            args,
        };

        match self.request(&message).await? {
            HostMessage::Response { envelope, .. } => Ok(envelope),
            _ => Err(IpcError::ProtocolError(
                "unexpected response type".to_string(),
            )),
        }
    }

    pub async fn ping(&mut self) -> Result<(), IpcError> {
        let id = self.next_id();
        match self.request(&ClientMessage::Ping { id }).await? {
            HostMessage::Ack { .. } => Ok(()),
            _ => Err(IpcError::ProtocolError(
                "unexpected response type".to_string(),
            )),
        }
    }

    /// Ask the host to shut down. Returns once the request is acknowledged.
    pub async fn quit(&mut self) -> Result<(), IpcError> {
        let id = self.next_id();
        match self.request(&ClientMessage::Quit { id }).await? {
            HostMessage::Ack { .. } => Ok(()),
            _ => Err(IpcError::ProtocolError(
                "unexpected response type".to_string(),
            )),
        }
    }
}
