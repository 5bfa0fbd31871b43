use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Generic(&'static str),
    /// Caller mistake, detected eagerly at construction time
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// Operation invoked on a reader or handle in the wrong lifecycle state
    #[error("illegal state: {0}")]
    IllegalState(&'static str),
    /// Fatal error reported by the capture library
    #[error("capture error: {0}")]
    Pcap(#[from] pcap::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<&'static str> for Error {
    fn from(s: &'static str) -> Self {
        Error::Generic(s)
    }
}
