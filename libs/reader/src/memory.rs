use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use samplebridge_core::ServiceIdentity;
use tracing::debug;

use crate::error::{ReaderError, ReaderResult};
use crate::reader::{check_take_next, SampleReader};

/// In-process data space holding one FIFO queue per stream
///
/// Cloning yields another handle to the same queues.
#[derive(Clone, Default)]
pub struct MemoryDataSpace {
    streams: Arc<Mutex<HashMap<ServiceIdentity, VecDeque<Vec<u8>>>>>,
}

impl MemoryDataSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample to a stream
    ///
    /// Empty samples are dropped since no receive buffer can take them.
    pub fn publish(&self, identity: &ServiceIdentity, sample: impl Into<Vec<u8>>) {
        let sample = sample.into();
        if sample.is_empty() {
            debug!(stream = %identity, "Dropping empty sample");
            return;
        }
        self.streams
            .lock()
            .entry(identity.clone())
            .or_default()
            .push_back(sample);
    }

    /// Number of samples waiting on a stream
    pub fn pending(&self, identity: &ServiceIdentity) -> usize {
        self.streams.lock().get(identity).map_or(0, VecDeque::len)
    }

    /// Create a reader bound to one stream of this data space
    pub fn reader(&self, identity: ServiceIdentity) -> MemoryReader {
        MemoryReader::new(self.clone(), identity)
    }

    fn peek_len(&self, identity: &ServiceIdentity) -> Option<usize> {
        self.streams
            .lock()
            .get(identity)
            .and_then(|queue| queue.front())
            .map(Vec::len)
    }
}

/// [`SampleReader`] over a [`MemoryDataSpace`] stream
pub struct MemoryReader {
    space: MemoryDataSpace,
    identity: ServiceIdentity,
    connected: bool,
}

impl MemoryReader {
    pub fn new(space: MemoryDataSpace, identity: ServiceIdentity) -> Self {
        Self {
            space,
            identity,
            connected: false,
        }
    }
}

impl SampleReader for MemoryReader {
    fn connect(&mut self) {
        if !self.connected {
            debug!(stream = %self.identity, "Memory reader connected");
            self.connected = true;
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn peek_next(&mut self) -> ReaderResult<Option<usize>> {
        if !self.connected {
            return Err(ReaderError::NotConnected);
        }
        Ok(self.space.peek_len(&self.identity))
    }

    fn take_next(&mut self, buffer: &mut [u8]) -> ReaderResult<bool> {
        if !self.connected {
            return Err(ReaderError::NotConnected);
        }
        let mut streams = self.space.streams.lock();
        let queue = streams.get_mut(&self.identity);
        let pending = queue.as_ref().and_then(|queue| queue.front()).map(Vec::len);
        if !check_take_next(buffer, pending)? {
            return Ok(false);
        }
        if let Some(sample) = queue.and_then(VecDeque::pop_front) {
            buffer.copy_from_slice(&sample);
        }
        Ok(true)
    }

    fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> ServiceIdentity {
        ServiceIdentity::parse("Camera", "Rear", "Frames").unwrap()
    }

    #[test]
    fn publish_skips_empty_samples() {
        let space = MemoryDataSpace::new();
        space.publish(&identity(), Vec::new());
        assert_eq!(space.pending(&identity()), 0);
    }

    #[test]
    fn streams_are_isolated() {
        let space = MemoryDataSpace::new();
        let other = ServiceIdentity::parse("Camera", "Front", "Frames").unwrap();
        space.publish(&identity(), vec![1, 2, 3]);

        let mut reader = space.reader(other);
        reader.connect();
        assert_eq!(reader.peek_next(), Ok(None));
        assert_eq!(space.pending(&identity()), 1);
    }

    #[test]
    fn connect_is_reentrant() {
        let space = MemoryDataSpace::new();
        let mut reader = space.reader(identity());
        reader.connect();
        reader.connect();
        assert!(reader.is_connected());
    }
}
