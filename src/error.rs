//! Unified error type.

use std::net::SocketAddr;

/// The error type returned by ordo's fallible operations.
///
/// Application-level errors (404, 422, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// two kinds of failure: middleware registry misuse at startup, and
/// infrastructure failures such as binding to a port.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A middleware with this name is already in the registry.
    #[error("Middleware with name `{0}` already exists")]
    DuplicateName(String),

    /// `before`/`after` referenced a middleware that is not in the registry.
    #[error("Middleware named `{0}` could not be found")]
    NotFound(String),

    #[error("invalid socket address `{0}`")]
    InvalidAddr(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}
