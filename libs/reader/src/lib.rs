//! Samplebridge Reader - Draining pub/sub samples into caller memory
//!
//! The [`SampleReader`] trait pulls discrete samples out of a data space and
//! copies them into buffers owned by the caller, so they can be republished
//! on another transport. Bindings provided here:
//!
//! - [`MemoryReader`] over an in-process [`MemoryDataSpace`]
//! - [`SocketReader`] over a framed TCP or Unix socket session, fed by a
//!   [`SamplePublisher`]
//!
//! [`Forwarder`] drives several readers with a per-cycle budget.
//!
//! # Example
//!
//! ```
//! use samplebridge_core::ServiceIdentity;
//! use samplebridge_reader::{MemoryDataSpace, SampleReader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let identity = ServiceIdentity::parse("Radar", "FrontLeft", "Objects")?;
//! let space = MemoryDataSpace::new();
//! for _ in 0..3 {
//!     space.publish(&identity, vec![0xAB; 20]);
//! }
//!
//! let mut reader = space.reader(identity);
//! reader.connect();
//!
//! let mut buf = [0u8; 100];
//! let taken = reader.take_up_to(&mut buf, 20, 2)?;
//! assert_eq!(taken, 2);
//! assert_eq!(reader.peek_next()?, Some(20));
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod error;
pub mod forward;
pub mod memory;
pub mod publisher;
pub mod reader;
pub mod socket;
pub mod transport;

// Re-exports for convenience
pub use error::{Error, ReaderError, ReaderErrorKind, ReaderResult, Result};
pub use forward::{Forwarder, PollReport, SampleSink};
pub use memory::{MemoryDataSpace, MemoryReader};
pub use publisher::SamplePublisher;
pub use reader::SampleReader;
pub use socket::{SocketReader, SocketReaderBuilder};
pub use transport::Endpoint;
