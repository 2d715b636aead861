use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod bincode;
pub mod frame;

pub use self::bincode::BincodeCodec;
pub use self::frame::SampleFrame;

/// Codec trait for turning sample frames into wire bytes and back
pub trait Codec: Send + Sync {
    /// Encode a value into bytes
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>>;

    /// Decode bytes into a value
    fn decode<T: for<'de> Deserialize<'de>>(&self, bytes: &[u8]) -> Result<T>;

    fn encode_frame(&self, frame: &SampleFrame) -> Result<Vec<u8>> {
        self.encode(frame)
    }

    fn decode_frame(&self, bytes: &[u8]) -> Result<SampleFrame> {
        self.decode(bytes)
    }
}
