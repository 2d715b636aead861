use samplebridge_core::ServiceIdentity;
use tracing::trace;

use crate::codec::{Codec, SampleFrame};
use crate::error::Result;
use crate::transport::Transport;

/// Writing side of a socket data space
///
/// Wraps every payload in a [`SampleFrame`] tagged with this publisher's
/// identity, so readers sharing the session can pick out their stream.
pub struct SamplePublisher<C> {
    transport: Box<dyn Transport>,
    codec: C,
    identity: ServiceIdentity,
}

impl<C: Codec> SamplePublisher<C> {
    /// Create a publisher from an existing transport
    pub fn from_transport(
        transport: impl Transport + 'static,
        identity: ServiceIdentity,
        codec: C,
    ) -> Self {
        Self {
            transport: Box::new(transport),
            codec,
            identity,
        }
    }

    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    /// Publish one sample
    pub async fn publish(&mut self, payload: &[u8]) -> Result<()> {
        let frame = SampleFrame::new(self.identity.clone(), payload.to_vec());
        let bytes = self.codec.encode_frame(&frame)?;
        trace!(stream = %self.identity, len = payload.len(), "Publishing sample");
        self.transport.send(&bytes).await
    }

    /// Close the underlying transport
    pub async fn close(mut self) -> Result<()> {
        self.transport.close().await
    }
}
