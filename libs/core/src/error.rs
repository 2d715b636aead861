use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Identifier too long: {len} bytes (capacity {capacity})")]
    IdTooLong { len: usize, capacity: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
