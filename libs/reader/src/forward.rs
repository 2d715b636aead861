use samplebridge_core::ServiceIdentity;
use tracing::{info, warn};

use crate::error::{Error, ReaderError, ReaderResult, Result};
use crate::reader::SampleReader;

/// Destination for samples drained by a [`Forwarder`]
pub trait SampleSink {
    fn deliver(&mut self, identity: &ServiceIdentity, sample: &[u8]);
}

impl<F> SampleSink for F
where
    F: FnMut(&ServiceIdentity, &[u8]),
{
    fn deliver(&mut self, identity: &ServiceIdentity, sample: &[u8]) {
        self(identity, sample)
    }
}

/// Outcome of one [`Forwarder::poll_once`] cycle
#[derive(Debug, Default)]
pub struct PollReport {
    /// Samples handed to the sink
    pub forwarded: usize,
    /// Readers that failed this cycle, with their error
    pub failures: Vec<(ServiceIdentity, ReaderError)>,
}

/// Polls a set of readers and hands their samples to a sink
///
/// Each reader gets the same per-cycle budget, so one busy stream cannot
/// starve the others. Samples are sized with `peek_next` before they are
/// taken, which lets a stream carry samples of any size.
pub struct Forwarder {
    readers: Vec<Box<dyn SampleReader>>,
    max_samples_per_reader: usize,
}

impl Forwarder {
    pub fn new(max_samples_per_reader: usize) -> Self {
        Self {
            readers: Vec::new(),
            max_samples_per_reader,
        }
    }

    /// Connect a reader and add it to the poll set
    ///
    /// Fails if a reader with the same identity is already registered.
    pub fn add_reader(&mut self, mut reader: Box<dyn SampleReader>) -> Result<()> {
        if self
            .readers
            .iter()
            .any(|existing| existing.identity() == reader.identity())
        {
            return Err(Error::DuplicateIdentity(reader.identity().clone()));
        }

        reader.connect();
        info!(stream = %reader.identity(), "Forwarding stream");
        self.readers.push(reader);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.readers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }

    /// Run one poll cycle over every reader
    pub fn poll_once(&mut self, sink: &mut impl SampleSink) -> PollReport {
        let budget = self.max_samples_per_reader;
        let mut report = PollReport::default();

        for reader in &mut self.readers {
            if let Err(error) = drain_reader(reader.as_mut(), budget, sink, &mut report.forwarded) {
                warn!(
                    stream = %reader.identity(),
                    kind = error.kind().as_str(),
                    %error,
                    "Reader failed during poll"
                );
                report.failures.push((reader.identity().clone(), error));
            }
        }

        report
    }
}

fn drain_reader(
    reader: &mut dyn SampleReader,
    budget: usize,
    sink: &mut impl SampleSink,
    forwarded: &mut usize,
) -> ReaderResult<()> {
    for _ in 0..budget {
        let Some(size) = reader.peek_next()? else {
            break;
        };
        let mut sample = vec![0u8; size];
        if !reader.take_next(&mut sample)? {
            break;
        }
        sink.deliver(reader.identity(), &sample);
        *forwarded += 1;
    }
    Ok(())
}
