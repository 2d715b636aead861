use samplebridge_core::ServiceIdentity;
use serde::{Deserialize, Serialize};

/// Wire envelope carrying one sample for one stream
///
/// Several streams may share a session; readers keep only the frames whose
/// identity matches their own. The payload is opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleFrame {
    identity: ServiceIdentity,
    payload: Vec<u8>,
}

impl SampleFrame {
    pub fn new(identity: ServiceIdentity, payload: Vec<u8>) -> Self {
        Self { identity, payload }
    }

    pub fn identity(&self) -> &ServiceIdentity {
        &self.identity
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}
