//! Samplebridge Core - Shared identity types
//!
//! A [`ServiceIdentity`] names the logical stream a sample reader is bound to.
//! Forwarding code uses it to route drained bytes to the right destination.

pub mod error;
pub mod identity;

pub use error::{Error, Result};
pub use identity::{IdString, ServiceIdentity};
