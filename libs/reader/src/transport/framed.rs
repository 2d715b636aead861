use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Error, Result};

/// Largest frame accepted from a peer (100 MiB)
pub const MAX_FRAME_LEN: usize = 100 * 1024 * 1024;

/// Stream wrapper with 4-byte big-endian length-prefix framing
pub(crate) struct Framed<S> {
    stream: S,
    pub(crate) send_timeout: Option<Duration>,
    pub(crate) receive_timeout: Option<Duration>,
}

impl<S> Framed<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub(crate) fn new(stream: S) -> Self {
        Self {
            stream,
            send_timeout: None,
            receive_timeout: None,
        }
    }

    pub(crate) fn get_ref(&self) -> &S {
        &self.stream
    }

    pub(crate) async fn send(&mut self, bytes: &[u8]) -> Result<()> {
        let len = u32::try_from(bytes.len())
            .ok()
            .filter(|len| *len as usize <= MAX_FRAME_LEN)
            .ok_or_else(|| {
                Error::InvalidFrame(format!("Message too large: {} bytes", bytes.len()))
            })?;

        let stream = &mut self.stream;
        let send_op = async move {
            stream.write_u32(len).await?;
            stream.write_all(bytes).await?;
            stream.flush().await?;
            Ok::<(), Error>(())
        };

        with_timeout(self.send_timeout, "Send", send_op).await
    }

    pub(crate) async fn receive(&mut self) -> Result<Vec<u8>> {
        let stream = &mut self.stream;
        let receive_op = async move {
            let len = stream.read_u32().await.map_err(closed_on_eof)? as usize;

            if len > MAX_FRAME_LEN {
                return Err(Error::InvalidFrame(format!(
                    "Message too large: {} bytes",
                    len
                )));
            }

            let mut buf = vec![0u8; len];
            stream.read_exact(&mut buf).await.map_err(closed_on_eof)?;
            Ok::<Vec<u8>, Error>(buf)
        };

        with_timeout(self.receive_timeout, "Receive", receive_op).await
    }

    pub(crate) async fn close(&mut self) -> Result<()> {
        self.stream.shutdown().await?;
        Ok(())
    }
}

fn closed_on_eof(e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::ConnectionClosed
    } else {
        e.into()
    }
}

pub(crate) async fn with_timeout<T>(
    timeout: Option<Duration>,
    what: &str,
    op: impl Future<Output = Result<T>>,
) -> Result<T> {
    match timeout {
        Some(timeout) => tokio::time::timeout(timeout, op)
            .await
            .map_err(|_| Error::Custom(format!("{what} timeout exceeded")))?,
        None => op.await,
    }
}
