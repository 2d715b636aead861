use samplebridge_core::{IdString, ServiceIdentity};

use crate::error::{ReaderError, ReaderResult};

/// Reader side of a bridge between a pub/sub data space and caller memory
///
/// Each binding (in-memory, socket, ...) owns its own session with the data
/// space. Callers hold a `dyn SampleReader` and drain samples into buffers
/// they own. Every operation returns promptly: an empty data space is reported
/// as `None`, `false` or a zero count, never as an error.
///
/// Instances are meant to be driven from one thread at a time.
pub trait SampleReader: Send {
    /// Establish the session with the data space
    ///
    /// Calling it again on a connected reader does nothing.
    fn connect(&mut self);

    /// Whether [`connect`](Self::connect) has been called
    fn is_connected(&self) -> bool;

    /// Size in bytes of the next available sample, without consuming it
    fn peek_next(&mut self) -> ReaderResult<Option<usize>>;

    /// Take the next sample into `buffer`
    ///
    /// The sample must be exactly `buffer.len()` bytes; nothing is truncated.
    /// Returns `Ok(false)` when no sample is available. On a size mismatch the
    /// sample stays in the data space and `buffer` is untouched.
    fn take_next(&mut self, buffer: &mut [u8]) -> ReaderResult<bool>;

    /// The stream this reader is bound to
    fn identity(&self) -> &ServiceIdentity;

    /// Take as many `sample_size` samples as fit in `buffer`
    ///
    /// Returns the number of samples placed back to back from the start of
    /// `buffer`. All samples on the stream are assumed to share one size.
    fn take(&mut self, buffer: &mut [u8], sample_size: usize) -> ReaderResult<usize> {
        self.take_up_to(buffer, sample_size, usize::MAX)
    }

    /// Take at most `max_samples` samples of `sample_size` bytes
    ///
    /// The cap is `min(buffer.len() / sample_size, max_samples)`. When a sample
    /// of another size shows up the drain stops there; the error reports how
    /// many samples were already placed and those slots remain valid.
    fn take_up_to(
        &mut self,
        buffer: &mut [u8],
        sample_size: usize,
        max_samples: usize,
    ) -> ReaderResult<usize> {
        if !self.is_connected() {
            return Err(ReaderError::NotConnected);
        }
        if buffer.is_empty() || sample_size == 0 {
            return Err(ReaderError::InvalidRecvBuffer);
        }
        if buffer.len() < sample_size {
            return Err(ReaderError::RecvBufferTooSmall {
                buffer_size: buffer.len(),
                sample_size,
            });
        }

        let capacity = (buffer.len() / sample_size).min(max_samples);
        let mut taken = 0;
        for slot in buffer.chunks_exact_mut(sample_size).take(capacity) {
            match self.peek_next()? {
                None => break,
                Some(actual) if actual != sample_size => {
                    return Err(ReaderError::SampleSizeMismatch {
                        expected: sample_size,
                        actual,
                        taken,
                    });
                }
                Some(_) => {}
            }
            if !self.take_next(slot)? {
                break;
            }
            taken += 1;
        }
        Ok(taken)
    }

    fn service_id(&self) -> &IdString {
        self.identity().service_id()
    }

    fn instance_id(&self) -> &IdString {
        self.identity().instance_id()
    }

    fn event_id(&self) -> &IdString {
        self.identity().event_id()
    }
}

/// Shared checks for `take_next` once the binding knows it is connected
///
/// `pending` is the size of the next sample, if any. Returns whether the
/// binding should go ahead and pop it into `buffer`.
pub(crate) fn check_take_next(buffer: &[u8], pending: Option<usize>) -> ReaderResult<bool> {
    if buffer.is_empty() {
        return Err(ReaderError::InvalidRecvBuffer);
    }
    match pending {
        None => Ok(false),
        Some(actual) if actual != buffer.len() => Err(ReaderError::SampleSizeMismatch {
            expected: buffer.len(),
            actual,
            taken: 0,
        }),
        Some(_) => Ok(true),
    }
}
