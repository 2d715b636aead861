use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Bounded identifier used for service, instance and event ids
///
/// Holds at most [`IdString::CAPACITY`] bytes of UTF-8. Construction rejects
/// longer input; use [`IdString::truncating`] to cut it instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdString(String);

impl IdString {
    /// Maximum length in bytes
    pub const CAPACITY: usize = 100;

    /// Create an identifier, failing if it exceeds the capacity
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.len() > Self::CAPACITY {
            return Err(Error::IdTooLong {
                len: value.len(),
                capacity: Self::CAPACITY,
            });
        }
        Ok(Self(value))
    }

    /// Create an identifier, dropping whatever does not fit
    ///
    /// The cut lands on the last char boundary at or below the capacity.
    pub fn truncating(value: &str) -> Self {
        let mut end = value.len().min(Self::CAPACITY);
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        Self(value[..end].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for IdString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for IdString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for IdString {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for IdString {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<IdString> for String {
    fn from(value: IdString) -> Self {
        value.0
    }
}

/// Service / instance / event triple naming one logical stream
///
/// Immutable once built. Two live readers should never share a triple; the
/// collaborator that owns the readers is responsible for checking that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceIdentity {
    service_id: IdString,
    instance_id: IdString,
    event_id: IdString,
}

impl ServiceIdentity {
    pub fn new(service_id: IdString, instance_id: IdString, event_id: IdString) -> Self {
        Self {
            service_id,
            instance_id,
            event_id,
        }
    }

    /// Build from plain strings, rejecting any component over capacity
    pub fn parse(service_id: &str, instance_id: &str, event_id: &str) -> Result<Self> {
        Ok(Self::new(
            IdString::new(service_id)?,
            IdString::new(instance_id)?,
            IdString::new(event_id)?,
        ))
    }

    pub fn service_id(&self) -> &IdString {
        &self.service_id
    }

    pub fn instance_id(&self) -> &IdString {
        &self.instance_id
    }

    pub fn event_id(&self) -> &IdString {
        &self.event_id
    }
}

impl fmt::Display for ServiceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.service_id, self.instance_id, self.event_id)
    }
}
