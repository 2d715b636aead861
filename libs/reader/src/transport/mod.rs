use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;

mod framed;
pub mod tcp;
pub mod unix;

pub use self::framed::MAX_FRAME_LEN;
pub use self::tcp::{TcpTransport, TcpTransportBuilder, TcpTransportListener};
pub use self::unix::{UnixTransport, UnixTransportBuilder, UnixTransportListener};

/// Transport trait for sending and receiving length-prefixed frames
///
/// Each transport instance represents a single connection.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send one frame
    async fn send(&mut self, bytes: &[u8]) -> Result<()>;

    /// Receive one frame
    async fn receive(&mut self) -> Result<Vec<u8>>;

    /// Close the transport connection
    async fn close(&mut self) -> Result<()>;
}

/// Listener side of a transport, handing out one transport per peer
#[async_trait::async_trait]
pub trait TransportListener: Send + Sync {
    type Transport: Transport;

    async fn accept(&self) -> Result<Self::Transport>;

    async fn close(&mut self) -> Result<()>;
}

/// Where a socket data space can be reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Tcp(SocketAddr),
    Unix(PathBuf),
}

impl Endpoint {
    /// Open a transport to this endpoint
    pub async fn connect(&self, timeout: Option<Duration>) -> Result<Box<dyn Transport>> {
        match self {
            Endpoint::Tcp(addr) => {
                let mut builder = TcpTransport::builder().address(*addr);
                if let Some(timeout) = timeout {
                    builder = builder.connect_timeout(timeout);
                }
                Ok(Box::new(builder.connect().await?))
            }
            Endpoint::Unix(path) => {
                let mut builder = UnixTransport::builder().path(path);
                if let Some(timeout) = timeout {
                    builder = builder.connect_timeout(timeout);
                }
                Ok(Box::new(builder.connect().await?))
            }
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Tcp(addr) => write!(f, "tcp://{addr}"),
            Endpoint::Unix(path) => write!(f, "unix://{}", path.display()),
        }
    }
}
