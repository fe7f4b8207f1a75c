//! The crate's single error type.
//!
//! Every fallible public operation returns `Result<T, Error>`; no module invents its
//! own ad hoc error type.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    /// A malformed range (empty or wrap-around), or an otherwise invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A cardinality, index, or count exceeds what the caller asked for, or the
    /// bitmap was empty where a non-empty result was required.
    #[error("out of range: {0}")]
    OutOfRange(&'static str),

    /// An operation the core does not provide.
    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    /// Underlying byte-stream failure during serialization or deserialization.
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialized input failed structural validation.
    #[error("format error: {0}")]
    FormatError(&'static str),
}

pub type Result<T> = core::result::Result<T, Error>;
