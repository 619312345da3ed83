//! JSON Lines framing: one JSON object per `\n`-terminated line.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::errors::IpcError;

/// Read the next message. `Ok(None)` means the peer closed the stream.
///
/// Blank lines are skipped. A line that does not decode yields
/// [`IpcError::Decode`] and leaves the stream positioned at the next line.
pub async fn read_message<R, T>(reader: &mut R) -> Result<Option<T>, IpcError>
where
    R: AsyncBufRead + Unpin,
    T: DeserializeOwned,
{
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        return serde_json::from_str(trimmed)
            .map(Some)
            .map_err(|e| IpcError::Decode {
                message: e.to_string(),
            });
    }
}

pub async fn write_message<W, T>(writer: &mut W, message: &T) -> Result<(), IpcError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut line = serde_json::to_string(message).map_err(|e| IpcError::Encode {
        message: e.to_string(),
    })?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}
