use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use samplebridge_core::ServiceIdentity;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::codec::{BincodeCodec, Codec};
use crate::error::{Error, ReaderError, ReaderResult, Result};
use crate::reader::{check_take_next, SampleReader};
use crate::transport::Endpoint;

/// Samples buffered between the session task and the reader by default
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// [`SampleReader`] backed by a framed TCP or Unix socket session
///
/// `connect` spawns a session task on the configured tokio runtime. The task
/// decodes incoming [`SampleFrame`](crate::codec::SampleFrame)s, keeps those
/// addressed to this reader's identity and queues their payloads. The reader
/// methods only look at that queue, so they never block. When the queue is
/// full the task stops reading from the socket until samples are taken.
pub struct SocketReader<C = BincodeCodec> {
    identity: ServiceIdentity,
    endpoint: Endpoint,
    connect_timeout: Option<Duration>,
    queue_capacity: usize,
    runtime: Handle,
    codec: C,
    connection: Option<Connection>,
}

struct Connection {
    samples: mpsc::Receiver<Vec<u8>>,
    lookahead: Option<Vec<u8>>,
    task: JoinHandle<()>,
}

impl Connection {
    /// Next queued sample, pulled into the look-ahead slot if needed
    fn front(&mut self) -> Option<&Vec<u8>> {
        if self.lookahead.is_none() {
            match self.samples.try_recv() {
                Ok(sample) => self.lookahead = Some(sample),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => {}
            }
        }
        self.lookahead.as_ref()
    }
}

impl SocketReader {
    /// Create a builder for configuring the reader
    pub fn builder() -> SocketReaderBuilder {
        SocketReaderBuilder::new()
    }
}

impl<C> SocketReader<C> {
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Whether the session task has ended
    ///
    /// Samples queued before the end can still be taken.
    pub fn session_finished(&self) -> bool {
        self.connection
            .as_ref()
            .is_some_and(|connection| connection.task.is_finished())
    }
}

impl<C: Codec + Clone + 'static> SampleReader for SocketReader<C> {
    fn connect(&mut self) {
        if self.connection.is_some() {
            return;
        }

        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let task = self.runtime.spawn(run_session(
            self.endpoint.clone(),
            self.connect_timeout,
            self.identity.clone(),
            self.codec.clone(),
            tx,
        ));

        self.connection = Some(Connection {
            samples: rx,
            lookahead: None,
            task,
        });
    }

    fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn peek_next(&mut self) -> ReaderResult<Option<usize>> {
        let connection = self.connection.as_mut().ok_or(ReaderError::NotConnected)?;
        Ok(connection.front().map(Vec::len))
    }

    fn take_next(&mut self, buffer: &mut [u8]) -> ReaderResult<bool> {
        let connection = self.connection.as_mut().ok_or(ReaderError::NotConnected)?;
        let pending = connection.front().map(Vec::len);
        if !check_take_next(buffer, pending)? {
            return Ok(false);
        }
        if let Some(sample) = connection.lookahead.take() {
            buffer.copy_from_slice(&sample);
        }
        Ok(true)
    }

    fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }
}

impl<C> Drop for SocketReader<C> {
    fn drop(&mut self) {
        if let Some(connection) = &self.connection {
            connection.task.abort();
        }
    }
}

async fn run_session<C: Codec>(
    endpoint: Endpoint,
    connect_timeout: Option<Duration>,
    identity: ServiceIdentity,
    codec: C,
    samples: mpsc::Sender<Vec<u8>>,
) {
    let mut transport = match endpoint.connect(connect_timeout).await {
        Ok(transport) => transport,
        Err(error) => {
            error!(%endpoint, stream = %identity, %error, "Failed to connect to data space");
            return;
        }
    };
    info!(%endpoint, stream = %identity, "Connected to data space");

    loop {
        let bytes = match transport.receive().await {
            Ok(bytes) => bytes,
            Err(Error::ConnectionClosed) => {
                info!(%endpoint, stream = %identity, "Data space closed the session");
                break;
            }
            Err(error) => {
                warn!(%endpoint, stream = %identity, %error, "Session failed");
                break;
            }
        };

        let frame = match codec.decode_frame(&bytes) {
            Ok(frame) => frame,
            Err(error) => {
                warn!(stream = %identity, %error, "Skipping undecodable frame");
                continue;
            }
        };
        if frame.identity() != &identity {
            debug!(stream = %identity, other = %frame.identity(), "Ignoring frame for another stream");
            continue;
        }

        let payload = frame.into_payload();
        if payload.is_empty() {
            debug!(stream = %identity, "Dropping empty sample");
            continue;
        }
        if samples.send(payload).await.is_err() {
            debug!(stream = %identity, "Reader dropped, ending session");
            break;
        }
    }
}

/// Builder for configuring a [`SocketReader`]
pub struct SocketReaderBuilder<C = BincodeCodec> {
    endpoint: Option<Endpoint>,
    identity: Option<ServiceIdentity>,
    connect_timeout: Option<Duration>,
    queue_capacity: usize,
    runtime: Option<Handle>,
    codec: C,
}

impl Default for SocketReaderBuilder {
    fn default() -> Self {
        Self {
            endpoint: None,
            identity: None,
            connect_timeout: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            runtime: None,
            codec: BincodeCodec,
        }
    }
}

impl SocketReaderBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Codec + Clone + 'static> SocketReaderBuilder<C> {
    /// Set the endpoint to read from
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Read from a TCP address
    pub fn tcp(self, addr: SocketAddr) -> Self {
        self.endpoint(Endpoint::Tcp(addr))
    }

    /// Read from a Unix socket path
    pub fn unix(self, path: impl AsRef<Path>) -> Self {
        self.endpoint(Endpoint::Unix(path.as_ref().to_path_buf()))
    }

    /// Set the stream this reader is bound to
    pub fn identity(mut self, identity: ServiceIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set how many samples may wait between the session and the reader
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Run the session on this runtime instead of the current one
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Decode frames with another codec
    pub fn codec<D: Codec + Clone + 'static>(self, codec: D) -> SocketReaderBuilder<D> {
        SocketReaderBuilder {
            endpoint: self.endpoint,
            identity: self.identity,
            connect_timeout: self.connect_timeout,
            queue_capacity: self.queue_capacity,
            runtime: self.runtime,
            codec,
        }
    }

    /// Build the reader; it stays disconnected until `connect` is called
    pub fn build(self) -> Result<SocketReader<C>> {
        let endpoint = self
            .endpoint
            .ok_or_else(|| Error::Custom("Endpoint not set".to_string()))?;
        let identity = self
            .identity
            .ok_or_else(|| Error::Custom("Identity not set".to_string()))?;
        if self.queue_capacity == 0 {
            return Err(Error::Custom("Queue capacity must be non-zero".to_string()));
        }
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current()
                .map_err(|e| Error::Custom(format!("No tokio runtime: {e}")))?,
        };

        Ok(SocketReader {
            identity,
            endpoint,
            connect_timeout: self.connect_timeout,
            queue_capacity: self.queue_capacity,
            runtime,
            codec: self.codec,
            connection: None,
        })
    }
}
